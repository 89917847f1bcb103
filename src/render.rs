//! Renders one post into syndication-entry fields.

use chrono::{DateTime, Utc};
use html_escape::encode_safe;
use scraper::Html;
use tracing::debug;

use crate::mastodon::{Status, Tag};

/// Number of plain-text words kept when deriving an entry title.
const TITLE_MAX_WORDS: usize = 10;

/// One feed entry derived from a post. Pure data, nothing persisted.
#[derive(Debug, Clone)]
pub struct RenderedEntry {
    pub id: String,
    pub link: String,
    pub updated: DateTime<Utc>,
    pub title: String,
    pub content: String,
}

/// Render a post into entry fields. Pure function, no I/O; boosted posts
/// are rendered recursively.
#[must_use]
pub fn render_entry(status: &Status) -> RenderedEntry {
    RenderedEntry {
        id: status.uri.clone(),
        link: status.url.clone().unwrap_or_default(),
        updated: status.created_at,
        title: title(status, TITLE_MAX_WORDS),
        content: content(status),
    }
}

/// Derive a plain-text title from the post body.
///
/// A boost has an empty body of its own, so the title comes from the
/// innermost original post.
fn title(status: &Status, max_words: usize) -> String {
    if let Some(original) = &status.reblog {
        return title(original, max_words);
    }
    let text = html_to_text(&status.content);
    text.split_whitespace()
        .take(max_words)
        .collect::<Vec<_>>()
        .join(" ")
}

/// Collect the text nodes of an HTML fragment, in document order.
fn html_to_text(html: &str) -> String {
    let fragment = Html::parse_fragment(html);
    fragment.root_element().text().collect::<Vec<_>>().join(" ")
}

/// Build the entry's HTML content block: author line and body, image
/// attachments, tag links, then the boosted post in a blockquote.
///
/// The post body is inserted verbatim (pre-sanitized by the server);
/// attachment and tag fields are escaped, with null fields rendered as
/// empty strings.
fn content(status: &Status) -> String {
    let mut c = format!(
        "<p>{}<br>\n@{}<br>\n{}</p>",
        status.account.display_name, status.account.acct, status.content
    );

    for media in &status.media_attachments {
        if media.kind != "image" {
            continue;
        }
        debug!(id = %media.id, description = ?media.description, "found image");
        c.push_str(&format!(
            "<a href=\"{}\"><img src=\"{}\" alt=\"{}\"></a>\n",
            encode_safe(media.url.as_deref().unwrap_or("")),
            encode_safe(media.preview_url.as_deref().unwrap_or("")),
            encode_safe(media.description.as_deref().unwrap_or("")),
        ));
    }

    if !status.tags.is_empty() {
        let links: Vec<String> = status.tags.iter().map(format_tag).collect();
        c.push_str(&format!("\n<p> {} </p>\n", links.join(", ")));
    }

    if let Some(original) = &status.reblog {
        c.push_str(&format!(
            "\n<p>boosted:</p><blockquote>{}</blockquote>",
            content(original)
        ));
    }

    c
}

fn format_tag(tag: &Tag) -> String {
    format!(
        "<a href=\"{}\">#{}</a>",
        encode_safe(tag.url.as_deref().unwrap_or("")),
        encode_safe(&tag.name),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn status(value: serde_json::Value) -> Status {
        serde_json::from_value(value).expect("test status should deserialize")
    }

    fn plain_status(content: &str) -> Status {
        status(json!({
            "uri": "u1",
            "url": "https://x/p1",
            "created_at": "2023-01-01T00:00:00Z",
            "content": content,
            "account": {"display_name": "Alice", "acct": "alice"}
        }))
    }

    #[test]
    fn test_title_truncates_to_ten_words() {
        let s = plain_status(
            "<p>Hello world this is a test post with more than ten words in it</p>",
        );
        let entry = render_entry(&s);
        assert_eq!(entry.title, "Hello world this is a test post with more than");
    }

    #[test]
    fn test_title_short_body_kept_whole() {
        let s = plain_status("<p>just three words</p>");
        assert_eq!(render_entry(&s).title, "just three words");
    }

    #[test]
    fn test_title_strips_nested_markup() {
        let s = plain_status("<p>one <b>two</b> <a href=\"x\">three</a></p>");
        assert_eq!(render_entry(&s).title, "one two three");
    }

    #[test]
    fn test_title_of_boost_uses_original_body() {
        let s = status(json!({
            "uri": "wrapper",
            "url": "https://x/w",
            "created_at": "2023-02-01T00:00:00Z",
            "content": "",
            "account": {"display_name": "Bob", "acct": "bob"},
            "reblog": {
                "uri": "original",
                "url": "https://x/o",
                "created_at": "2023-01-01T00:00:00Z",
                "content": "<p>the original words</p>",
                "account": {"display_name": "Alice", "acct": "alice"}
            }
        }));
        assert_eq!(render_entry(&s).title, "the original words");
    }

    #[test]
    fn test_title_of_nested_boost_uses_innermost_body() {
        let s = status(json!({
            "uri": "outer",
            "url": "https://x/1",
            "created_at": "2023-03-01T00:00:00Z",
            "content": "",
            "account": {"display_name": "C", "acct": "c"},
            "reblog": {
                "uri": "middle",
                "url": "https://x/2",
                "created_at": "2023-02-01T00:00:00Z",
                "content": "",
                "account": {"display_name": "B", "acct": "b"},
                "reblog": {
                    "uri": "inner",
                    "url": "https://x/3",
                    "created_at": "2023-01-01T00:00:00Z",
                    "content": "<p>innermost text</p>",
                    "account": {"display_name": "A", "acct": "a"}
                }
            }
        }));
        assert_eq!(render_entry(&s).title, "innermost text");
    }

    #[test]
    fn test_content_plain_post_is_author_paragraph_only() {
        let s = plain_status("<p>Hello world</p>");
        assert_eq!(
            render_entry(&s).content,
            "<p>Alice<br>\n@alice<br>\n<p>Hello world</p></p>"
        );
    }

    #[test]
    fn test_content_body_inserted_verbatim() {
        let s = plain_status("<p>a &amp; b <a href=\"https://x\">link</a></p>");
        let content = render_entry(&s).content;
        assert!(content.contains("<p>a &amp; b <a href=\"https://x\">link</a></p>"));
    }

    #[test]
    fn test_content_image_attachment() {
        let s = status(json!({
            "uri": "u1",
            "url": "https://x/p1",
            "created_at": "2023-01-01T00:00:00Z",
            "content": "<p>pic</p>",
            "account": {"display_name": "Alice", "acct": "alice"},
            "media_attachments": [{
                "id": "m1",
                "type": "image",
                "url": "https://x/full.png",
                "preview_url": "https://x/thumb.png",
                "description": "a <cat> & dog"
            }]
        }));
        let content = render_entry(&s).content;
        assert!(content.contains(
            "<a href=\"https://x/full.png\"><img src=\"https://x/thumb.png\" \
             alt=\"a &lt;cat&gt; &amp; dog\"></a>\n"
        ));
    }

    #[test]
    fn test_content_skips_non_image_attachments() {
        let s = status(json!({
            "uri": "u1",
            "url": "https://x/p1",
            "created_at": "2023-01-01T00:00:00Z",
            "content": "<p>clip</p>",
            "account": {"display_name": "Alice", "acct": "alice"},
            "media_attachments": [{
                "id": "m1",
                "type": "video",
                "url": "https://x/clip.mp4",
                "preview_url": "https://x/thumb.png",
                "description": "a video"
            }]
        }));
        let content = render_entry(&s).content;
        assert_eq!(content, "<p>Alice<br>\n@alice<br>\n<p>clip</p></p>");
    }

    #[test]
    fn test_content_null_attachment_fields_become_empty_strings() {
        let s = status(json!({
            "uri": "u1",
            "url": "https://x/p1",
            "created_at": "2023-01-01T00:00:00Z",
            "content": "",
            "account": {"display_name": "Alice", "acct": "alice"},
            "media_attachments": [{
                "id": "m1",
                "type": "image",
                "url": null,
                "preview_url": null,
                "description": null
            }]
        }));
        let content = render_entry(&s).content;
        assert!(content.contains("<a href=\"\"><img src=\"\" alt=\"\"></a>\n"));
        assert!(!content.contains("None"));
        assert!(!content.contains("null"));
    }

    #[test]
    fn test_content_tags_paragraph() {
        let s = status(json!({
            "uri": "u1",
            "url": "https://x/p1",
            "created_at": "2023-01-01T00:00:00Z",
            "content": "<p>tagged</p>",
            "account": {"display_name": "Alice", "acct": "alice"},
            "tags": [
                {"name": "cats", "url": "https://x/tags/cats"},
                {"name": "dogs", "url": null}
            ]
        }));
        let content = render_entry(&s).content;
        assert!(content.contains(
            "\n<p> <a href=\"https://x/tags/cats\">#cats</a>, <a href=\"\">#dogs</a> </p>\n"
        ));
    }

    #[test]
    fn test_content_boost_wrapped_in_blockquote() {
        let s = status(json!({
            "uri": "wrapper",
            "url": "https://x/w",
            "created_at": "2023-02-01T00:00:00Z",
            "content": "",
            "account": {"display_name": "Bob", "acct": "bob"},
            "reblog": {
                "uri": "original",
                "url": "https://x/o",
                "created_at": "2023-01-01T00:00:00Z",
                "content": "<p>inner body</p>",
                "account": {"display_name": "Alice", "acct": "alice"}
            }
        }));
        let content = render_entry(&s).content;
        assert_eq!(
            content,
            "<p>Bob<br>\n@bob<br>\n</p>\
             \n<p>boosted:</p><blockquote>\
             <p>Alice<br>\n@alice<br>\n<p>inner body</p></p>\
             </blockquote>"
        );
    }

    #[test]
    fn test_entry_passthrough_fields() {
        let s = plain_status("<p>hi</p>");
        let entry = render_entry(&s);
        assert_eq!(entry.id, "u1");
        assert_eq!(entry.link, "https://x/p1");
        assert_eq!(
            entry.updated,
            "2023-01-01T00:00:00Z".parse::<DateTime<Utc>>().unwrap()
        );
    }
}
