use std::time::Duration;

use reqwest::StatusCode;
use serde_json::Value;
use thiserror::Error;
use tracing::debug;

use crate::cache::ResponseCache;

const USER_AGENT: &str = concat!("atomodon/", env!("CARGO_PKG_VERSION"));

#[derive(Debug, Error)]
pub enum FetchError {
    #[error("request for {url} failed: {source}")]
    Network {
        url: String,
        #[source]
        source: reqwest::Error,
    },
    #[error("{url} returned HTTP {status}")]
    Http { url: String, status: StatusCode },
    #[error("invalid JSON from {url}: {source}")]
    Parse {
        url: String,
        #[source]
        source: serde_json::Error,
    },
}

/// Fetches JSON resources over HTTP, memoizing responses in a cache.
pub struct Fetcher {
    client: reqwest::Client,
    cache: ResponseCache,
}

impl Fetcher {
    #[must_use]
    pub fn new(cache: ResponseCache) -> Self {
        Self {
            client: reqwest::Client::builder()
                .user_agent(USER_AGENT)
                .timeout(Duration::from_secs(30))
                .build()
                .expect("Failed to build HTTP client"),
            cache,
        }
    }

    /// Fetch `url` and parse the body as JSON.
    ///
    /// A cache hit returns the stored value without any network access.
    /// Otherwise the response is parsed and stored in the cache before
    /// being returned.
    ///
    /// # Errors
    ///
    /// Returns an error if the transport fails, the server responds with a
    /// non-success status, or the body is not valid JSON.
    pub async fn fetch_json(&mut self, url: &str) -> Result<Value, FetchError> {
        if let Some(value) = self.cache.get(url) {
            debug!(%url, "found in cache");
            return Ok(value.clone());
        }

        debug!(%url, "fetching");
        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|source| FetchError::Network {
                url: url.to_string(),
                source,
            })?;

        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::Http {
                url: url.to_string(),
                status,
            });
        }

        let body = response
            .text()
            .await
            .map_err(|source| FetchError::Network {
                url: url.to_string(),
                source,
            })?;
        let value: Value = serde_json::from_str(&body).map_err(|source| FetchError::Parse {
            url: url.to_string(),
            source,
        })?;

        self.cache.insert(url.to_string(), value.clone());
        Ok(value)
    }

    #[must_use]
    pub fn cache(&self) -> &ResponseCache {
        &self.cache
    }
}
