//! Mastodon REST API types and calls.

use chrono::{DateTime, Utc};
use reqwest::StatusCode;
use serde::Deserialize;
use thiserror::Error;
use tracing::debug;

use crate::fetch::{FetchError, Fetcher};

#[derive(Debug, Error)]
pub enum ApiError {
    #[error("no account named @{username} on {server}")]
    AccountNotFound { server: String, username: String },
    #[error("unexpected response from {url}: {source}")]
    Decode {
        url: String,
        #[source]
        source: serde_json::Error,
    },
    #[error(transparent)]
    Fetch(#[from] FetchError),
}

/// A resolved account, built once per run from the lookup response.
#[derive(Debug, Clone)]
pub struct Profile {
    pub id: String,
    pub username: String,
    pub server: String,
    pub display_name: String,
    pub avatar_url: String,
    pub canonical_url: String,
}

/// Lookup endpoint response fields we care about.
#[derive(Debug, Deserialize)]
struct Account {
    id: String,
    #[serde(default)]
    display_name: String,
    #[serde(default)]
    avatar: String,
    url: String,
}

/// One post as returned by the statuses endpoint.
///
/// Optional fields are absent-tolerant: a post with no attachments, tags,
/// or reblog deserializes with empty defaults rather than erroring.
#[derive(Debug, Clone, Deserialize)]
pub struct Status {
    pub uri: String,
    #[serde(default)]
    pub url: Option<String>,
    pub created_at: DateTime<Utc>,
    pub content: String,
    pub account: StatusAccount,
    #[serde(default)]
    pub media_attachments: Vec<MediaAttachment>,
    #[serde(default)]
    pub tags: Vec<Tag>,
    #[serde(default)]
    pub reblog: Option<Box<Status>>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct StatusAccount {
    #[serde(default)]
    pub display_name: String,
    #[serde(default)]
    pub acct: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct MediaAttachment {
    #[serde(default)]
    pub id: String,
    #[serde(rename = "type")]
    pub kind: String,
    #[serde(default)]
    pub url: Option<String>,
    #[serde(default)]
    pub preview_url: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Tag {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub url: Option<String>,
}

/// Account lookup endpoint for `username` on the server at `base_url`.
#[must_use]
pub fn lookup_url(base_url: &str, username: &str) -> String {
    format!(
        "{base_url}/api/v1/accounts/lookup?acct={}",
        urlencoding::encode(username)
    )
}

/// Statuses listing endpoint for the account `id`, excluding replies.
#[must_use]
pub fn statuses_url(base_url: &str, id: &str) -> String {
    format!("{base_url}/api/v1/accounts/{id}/statuses?exclude_replies=true")
}

/// Resolve `username` on `server` to a canonical [`Profile`].
///
/// In production `base_url` is `https://{server}`; tests point it at a
/// local mock server instead.
///
/// # Errors
///
/// Returns [`ApiError::AccountNotFound`] when the lookup returns 404 or a
/// body that is not an account record; other fetch failures propagate.
pub async fn resolve_account(
    fetcher: &mut Fetcher,
    base_url: &str,
    server: &str,
    username: &str,
) -> Result<Profile, ApiError> {
    let url = lookup_url(base_url, username);
    let not_found = || ApiError::AccountNotFound {
        server: server.to_string(),
        username: username.to_string(),
    };

    let value = match fetcher.fetch_json(&url).await {
        Ok(value) => value,
        Err(FetchError::Http { status, .. }) if status == StatusCode::NOT_FOUND => {
            return Err(not_found());
        }
        Err(e) => return Err(e.into()),
    };

    let account: Account = serde_json::from_value(value).map_err(|_| not_found())?;
    debug!(id = %account.id, "resolved account");

    Ok(Profile {
        id: account.id,
        username: username.to_string(),
        server: server.to_string(),
        display_name: account.display_name,
        avatar_url: account.avatar,
        canonical_url: account.url,
    })
}

/// Fetch the account's public posts, in API response order.
///
/// # Errors
///
/// Returns an error if the fetch fails or the body does not decode into a
/// list of posts.
pub async fn fetch_statuses(
    fetcher: &mut Fetcher,
    base_url: &str,
    id: &str,
) -> Result<Vec<Status>, ApiError> {
    let url = statuses_url(base_url, id);
    let value = fetcher.fetch_json(&url).await?;
    let statuses: Vec<Status> =
        serde_json::from_value(value).map_err(|source| ApiError::Decode { url, source })?;
    debug!(count = statuses.len(), "got statuses");
    Ok(statuses)
}
