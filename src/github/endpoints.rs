// GitHub API endpoint functions.
// Builds the repository search URL and decodes its payload.

use url::Url;

use crate::error::{Result, ScoutError};

use super::client::GitHubClient;
use super::types::{Repository, SearchResponse};

/// Results requested per search. The API maximum, so the displayed page size
/// can change locally without another request.
pub const SEARCH_PER_PAGE: u32 = 100;

impl GitHubClient {
    /// Build the deterministic search URL for `text`.
    ///
    /// The same text always yields the same string, which is what the
    /// response cache is keyed on.
    pub fn search_url(&self, text: &str) -> Result<String> {
        let per_page = SEARCH_PER_PAGE.to_string();
        let params = [
            ("q", text),
            ("sort", "stars"),
            ("order", "desc"),
            ("per_page", per_page.as_str()),
        ];
        let url = Url::parse_with_params(
            &format!("{}/search/repositories", self.base_url()),
            &params,
        )?;
        Ok(url.to_string())
    }
}

/// Extract the item list from a raw search payload.
///
/// A payload without `items` becomes [`ScoutError::Search`] carrying the
/// provider's `message`.
pub fn repositories_from_payload(payload: &serde_json::Value) -> Result<Vec<Repository>> {
    let response: SearchResponse = serde_json::from_value(payload.clone())?;
    match response.items {
        Some(items) => Ok(items),
        None => Err(ScoutError::Search {
            message: response
                .message
                .unwrap_or_else(|| "Unexpected response from GitHub".to_string()),
        }),
    }
}
