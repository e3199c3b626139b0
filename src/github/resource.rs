// src/github/resource.rs
// =============================================================================
// This module parses the repository the user asked about.
//
// Supported formats:
//   - owner/repo
//   - https://github.com/owner/repo
//   - https://github.com/owner/repo.git
//   - github.com/owner/repo
//
// The result is a RepoId, which knows how to build the API route
// `repos/{owner}/{repo}` that every request is relative to.
// =============================================================================

use anyhow::{anyhow, Result};
use std::fmt;

/// Identifies the target repository. Immutable once parsed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RepoId {
    pub owner: String,
    pub name: String,
}

impl RepoId {
    // Parses the --repo argument into owner and repository name
    //
    // Example:
    //   "rust-lang/rust" -> RepoId { owner: "rust-lang", name: "rust" }
    pub fn parse(input: &str) -> Result<RepoId> {
        let trimmed = input.trim();

        // Remove common prefixes
        let path = trimmed
            .trim_start_matches("https://")
            .trim_start_matches("http://")
            .trim_start_matches("www.");
        let path = path.strip_prefix("github.com/").unwrap_or(path);

        let parts: Vec<&str> = path.trim_end_matches('/').split('/').collect();

        if parts.len() != 2 || parts.iter().any(|part| part.is_empty()) {
            return Err(anyhow!(
                "Invalid repository '{}': expected the form 'owner/name'",
                input
            ));
        }

        let owner = parts[0].to_string();
        let name = parts[1].trim_end_matches(".git").to_string();

        if name.is_empty() {
            return Err(anyhow!("Invalid repository '{}': missing name", input));
        }

        Ok(RepoId { owner, name })
    }

    /// API route every repository request is relative to
    pub fn route(&self) -> String {
        format!("repos/{}/{}", self.owner, self.name)
    }
}

impl fmt::Display for RepoId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.owner, self.name)
    }
}
