//! Atom 1.0 serialization of a feed document.

use chrono::SecondsFormat;
use html_escape::encode_safe;

use crate::feed::FeedDocument;
use crate::render::RenderedEntry;

/// Serialize the feed as an Atom 1.0 document.
#[must_use]
pub fn render_feed(feed: &FeedDocument) -> String {
    let entries: String = feed
        .entries
        .iter()
        .map(render_entry)
        .collect::<Vec<_>>()
        .join("\n");

    format!(
        r#"<?xml version="1.0" encoding="UTF-8"?>
<feed xmlns="http://www.w3.org/2005/Atom">
  <id>{id}</id>
  <title>{title}</title>
  <subtitle>{subtitle}</subtitle>
  <updated>{updated}</updated>
  <author>
    <name>{author}</name>
  </author>
  <link href="{link}" rel="alternate"/>
  <logo>{logo}</logo>
{entries}
</feed>
"#,
        id = encode_safe(&feed.id),
        title = encode_safe(&feed.title),
        subtitle = encode_safe(&feed.subtitle),
        updated = feed.updated.to_rfc3339_opts(SecondsFormat::Secs, true),
        author = encode_safe(&feed.author),
        link = encode_safe(&feed.link),
        logo = encode_safe(&feed.image),
    )
}

fn render_entry(entry: &RenderedEntry) -> String {
    format!(
        r#"  <entry>
    <id>{id}</id>
    <title>{title}</title>
    <updated>{updated}</updated>
    <link href="{link}" rel="alternate"/>
    <content type="html">{content}</content>
  </entry>"#,
        id = encode_safe(&entry.id),
        title = encode_safe(&entry.title),
        updated = entry.updated.to_rfc3339_opts(SecondsFormat::Secs, true),
        link = encode_safe(&entry.link),
        content = encode_safe(&entry.content),
    )
}
