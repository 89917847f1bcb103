//! Assembles a feed document from a resolved profile and its posts.

use chrono::{DateTime, Utc};
use thiserror::Error;
use tracing::debug;

use crate::mastodon::{Profile, Status};
use crate::render::{render_entry, RenderedEntry};

#[derive(Debug, Error)]
pub enum FeedError {
    #[error("account has no posts, cannot compute feed update time")]
    Empty,
}

/// A complete feed document: metadata plus entries in API response order.
#[derive(Debug)]
pub struct FeedDocument {
    pub id: String,
    pub title: String,
    pub author: String,
    pub link: String,
    pub image: String,
    pub subtitle: String,
    pub updated: DateTime<Utc>,
    pub entries: Vec<RenderedEntry>,
}

/// Build the feed: metadata from the profile, one entry per post, and
/// `updated` set to the newest entry timestamp.
///
/// # Errors
///
/// Returns [`FeedError::Empty`] when there are no posts, since the feed's
/// `updated` value has no defined maximum.
pub fn build_feed(profile: &Profile, statuses: &[Status]) -> Result<FeedDocument, FeedError> {
    let entries: Vec<RenderedEntry> = statuses.iter().map(render_entry).collect();
    let updated = entries
        .iter()
        .map(|e| e.updated)
        .max()
        .ok_or(FeedError::Empty)?;
    debug!(entries = entries.len(), %updated, "feed assembled");

    Ok(FeedDocument {
        id: profile.canonical_url.clone(),
        title: format!("{}'s Mastodon feed", profile.display_name),
        author: profile.display_name.clone(),
        link: profile.canonical_url.clone(),
        image: profile.avatar_url.clone(),
        subtitle: format!("@{}@{}", profile.username, profile.server),
        updated,
        entries,
    })
}
