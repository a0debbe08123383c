// GitHub API response types.
// Defines structs for deserializing repository search responses.

use serde::{Deserialize, Serialize};

/// Repository owner (user or organization). Only the login is displayed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Owner {
    pub login: String,
}

/// Repository record as returned by the search endpoint.
///
/// `created_at` stays as the raw ISO-8601 string: ordering compares it
/// lexicographically and the table shows its date prefix.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Repository {
    pub name: String,
    pub full_name: String,
    pub owner: Owner,
    #[serde(default)]
    pub stargazers_count: u64,
    #[serde(default)]
    pub created_at: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub html_url: Option<String>,
}

/// Body of `GET /search/repositories`.
///
/// Error bodies (rate limiting, validation failures) share the endpoint and
/// arrive without `items` but with a `message`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SearchResponse {
    #[serde(default)]
    pub total_count: Option<u64>,
    #[serde(default)]
    pub items: Option<Vec<Repository>>,
    #[serde(default)]
    pub message: Option<String>,
}

/// Rate limit information from response headers.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RateLimit {
    pub limit: u64,
    pub remaining: u64,
    pub reset: u64,
}

impl RateLimit {
    /// Whether any rate limit header has been seen yet.
    pub fn is_known(&self) -> bool {
        self.limit > 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_search_response_with_items() {
        let body = json!({
            "total_count": 1,
            "incomplete_results": false,
            "items": [{
                "id": 10270250,
                "name": "react",
                "full_name": "facebook/react",
                "owner": { "login": "facebook", "id": 69631 },
                "stargazers_count": 230000,
                "created_at": "2013-05-24T16:15:54Z",
                "html_url": "https://github.com/facebook/react"
            }]
        });

        let parsed: SearchResponse = serde_json::from_value(body).unwrap();
        let items = parsed.items.unwrap();
        assert_eq!(items.len(), 1);
        assert_eq!(items[0].owner.login, "facebook");
        assert_eq!(items[0].stargazers_count, 230000);
        assert!(parsed.message.is_none());
    }

    #[test]
    fn test_search_response_error_body() {
        let body = json!({
            "message": "API rate limit exceeded for 127.0.0.1.",
            "documentation_url": "https://docs.github.com/rest/overview/resources-in-the-rest-api#rate-limiting"
        });

        let parsed: SearchResponse = serde_json::from_value(body).unwrap();
        assert!(parsed.items.is_none());
        assert_eq!(
            parsed.message.as_deref(),
            Some("API rate limit exceeded for 127.0.0.1.")
        );
    }
}
