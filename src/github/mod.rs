// GitHub API module.
// Provides the search client and response types.

pub mod client;
pub mod endpoints;
pub mod types;

pub use client::{GITHUB_API_BASE, GitHubClient};
pub use endpoints::{SEARCH_PER_PAGE, repositories_from_payload};
pub use types::*;
