// src/github/link.rs
// =============================================================================
// This module decodes the HTTP `Link` header GitHub uses for pagination.
//
// A header looks like this (one line, wrapped here):
//   <https://api.github.com/repositories/1/comments?page=2>; rel="next",
//   <https://api.github.com/repositories/1/comments?page=3>; rel="last"
//
// We turn it into a LinkSet: relation name ("next", "last", ...) -> Link.
// Each Link keeps the absolute URL plus the `page` query parameter if the
// URL has one.
//
// Malformed entries are skipped instead of failing the whole header, and a
// missing header simply means "single page, nothing more to fetch".
//
// Rust concepts:
// - HashMap: For looking up links by relation name
// - Option<T>: For values that may be missing (no header, no page number)
// - Iterators: split(), trim(), filter_map() for string parsing
// =============================================================================

use std::collections::HashMap;
use url::Url;

/// One target of a Link header entry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Link {
    /// Absolute URL of the page
    pub url: String,
    /// Value of the `page` query parameter, when the URL carries one
    pub page: Option<u32>,
}

/// All relations found in a Link header.
///
/// "next" is present iff more pages remain, "last" iff the total page count
/// is known (GitHub omits it on single-page results).
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LinkSet {
    links: HashMap<String, Link>,
}

impl LinkSet {
    /// Looks up a relation by name
    pub fn get(&self, rel: &str) -> Option<&Link> {
        self.links.get(rel)
    }

    pub fn next(&self) -> Option<&Link> {
        self.get("next")
    }

    pub fn last(&self) -> Option<&Link> {
        self.get("last")
    }

    /// Page number of the "last" relation, if known
    pub fn last_page(&self) -> Option<u32> {
        self.last().and_then(|link| link.page)
    }
}

// Parses a raw Link header value into a LinkSet
//
// Parameters:
//   header: the header value, or None when the response had no Link header
//
// Returns: LinkSet (empty when the header is absent or nothing could be parsed)
//
// Example:
//   r#"<https://x/y?page=2>; rel="next""# -> { "next": Link { url, page: Some(2) } }
pub fn parse_link_header(header: Option<&str>) -> LinkSet {
    let mut set = LinkSet::default();

    let header = match header {
        Some(value) => value,
        None => return set,
    };

    for entry in split_entries(header) {
        if let Some((rels, link)) = parse_entry(entry) {
            // A single entry may name several relations: rel="next last"
            for rel in rels {
                set.links.insert(rel, link.clone());
            }
        }
    }

    set
}

// Splits a header on the commas between entries
//
// Commas inside <...> belong to the URL (e.g. `?labels=a,b`) and are kept.
fn split_entries(header: &str) -> Vec<&str> {
    let mut entries = Vec::new();
    let mut in_url = false;
    let mut start = 0;

    for (i, c) in header.char_indices() {
        match c {
            '<' => in_url = true,
            '>' => in_url = false,
            ',' if !in_url => {
                entries.push(&header[start..i]);
                start = i + 1;
            }
            _ => {}
        }
    }
    entries.push(&header[start..]);

    entries
}

// Parses one `<url>; rel="name"; other="param"` entry
//
// Returns None for anything malformed:
//   - no <...> around the URL
//   - URL that does not parse
//   - no rel parameter
fn parse_entry(entry: &str) -> Option<(Vec<String>, Link)> {
    let mut segments = entry.split(';').map(str::trim);

    // The first segment must be the URL wrapped in angle brackets
    let target = segments.next()?;
    let url = target.strip_prefix('<')?.strip_suffix('>')?.trim();
    let parsed = Url::parse(url).ok()?;

    let mut rels = Vec::new();
    for segment in segments {
        let (key, value) = match segment.split_once('=') {
            Some(pair) => pair,
            None => continue,
        };
        if key.trim().eq_ignore_ascii_case("rel") {
            let value = value.trim().trim_matches('"');
            rels.extend(value.split_whitespace().map(|rel| rel.to_ascii_lowercase()));
        }
    }

    if rels.is_empty() {
        return None;
    }

    let page = parsed
        .query_pairs()
        .find(|(key, _)| key == "page")
        .and_then(|(_, value)| value.parse::<u32>().ok());

    Some((
        rels,
        Link {
            url: url.to_string(),
            page,
        },
    ))
}
