// GitHub API HTTP client.
// Handles default headers, optional authentication, and rate limit tracking.

use std::sync::{Arc, Mutex};
use std::time::Duration;

use reqwest::{
    Client, Response,
    header::{ACCEPT, AUTHORIZATION, HeaderMap, HeaderValue, USER_AGENT},
};
use tracing::debug;

use crate::error::{Result, ScoutError};

use super::types::RateLimit;

pub const GITHUB_API_BASE: &str = "https://api.github.com";
const GITHUB_API_VERSION: &str = "2022-11-28";
const CONNECT_TIMEOUT: Duration = Duration::from_secs(10);

/// GitHub API client with rate limit tracking.
///
/// Cloning is cheap; clones share the underlying connection pool and the
/// rate limit snapshot, so fetches can run on spawned tasks.
#[derive(Clone)]
pub struct GitHubClient {
    client: Client,
    base_url: String,
    rate_limit: Arc<Mutex<RateLimit>>,
}

impl GitHubClient {
    /// Create a new client against `base_url`, authenticated when a token is given.
    pub fn new(base_url: &str, token: Option<&str>) -> Result<Self> {
        let mut headers = HeaderMap::new();

        if let Some(token) = token {
            headers.insert(
                AUTHORIZATION,
                HeaderValue::from_str(&format!("Bearer {}", token))
                    .map_err(|e| ScoutError::Other(e.to_string()))?,
            );
        }
        headers.insert(
            ACCEPT,
            HeaderValue::from_static("application/vnd.github+json"),
        );
        headers.insert(
            "X-GitHub-Api-Version",
            HeaderValue::from_static(GITHUB_API_VERSION),
        );
        headers.insert(USER_AGENT, HeaderValue::from_static("reposcout"));

        let client = Client::builder()
            .default_headers(headers)
            .connect_timeout(CONNECT_TIMEOUT)
            .build()
            .map_err(ScoutError::Api)?;

        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
            rate_limit: Arc::new(Mutex::new(RateLimit::default())),
        })
    }

    /// Base URL every endpoint is resolved against.
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Snapshot of the most recent rate limit headers.
    pub fn rate_limit(&self) -> RateLimit {
        self.rate_limit
            .lock()
            .map(|guard| guard.clone())
            .unwrap_or_default()
    }

    /// GET an absolute URL and decode the JSON body, whatever the HTTP status.
    ///
    /// GitHub reports failures (rate limiting, invalid queries) as JSON bodies
    /// with a `message` field; callers inspect the payload shape instead of
    /// the status code.
    pub async fn fetch_json(&self, url: &str) -> Result<serde_json::Value> {
        debug!(url, "GET");
        let response = self.client.get(url).send().await.map_err(ScoutError::Api)?;

        self.update_rate_limit(&response);
        debug!(status = %response.status(), url, "response");

        let body = response.bytes().await.map_err(ScoutError::Api)?;
        let value = serde_json::from_slice(&body)?;
        Ok(value)
    }

    /// Update rate limit from response headers.
    fn update_rate_limit(&self, response: &Response) {
        let header = |name: &str| -> Option<u64> {
            response
                .headers()
                .get(name)
                .and_then(|v| v.to_str().ok())
                .and_then(|v| v.parse().ok())
        };

        let Ok(mut rate_limit) = self.rate_limit.lock() else {
            return;
        };

        if let Some(limit) = header("x-ratelimit-limit") {
            rate_limit.limit = limit;
        }
        if let Some(remaining) = header("x-ratelimit-remaining") {
            rate_limit.remaining = remaining;
        }
        if let Some(reset) = header("x-ratelimit-reset") {
            rate_limit.reset = reset;
        }
    }
}
