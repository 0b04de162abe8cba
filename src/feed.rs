use chrono::{DateTime, Utc};
use feed_rs::parser;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::{Error, Result};

/// Elements holding an entry date, in order of preference.
const DATE_TAGS: [&str; 4] = ["pubDate", "published", "dc:date", "updated"];

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Feed {
    pub title: String,
    pub link: String,
    /// The source identifier this feed was fetched from
    pub source: String,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Item {
    pub title: String,
    pub link: String,
    pub description: String,
    pub content: String,
    pub published: Option<DateTime<Utc>>,
    /// Date text as written in the document, kept when it could not be parsed
    pub published_raw: Option<String>,
    /// Index of the owning feed in the run's feed list
    pub feed: usize,
}

/// One successfully parsed source, before its items join the merged list.
#[derive(Debug, Clone)]
pub struct FetchedFeed {
    pub feed: Feed,
    pub items: Vec<Item>,
}

impl Item {
    fn from_entry(entry: feed_rs::model::Entry) -> Self {
        let link = entry
            .links
            .first()
            .map(|l| l.href.clone())
            .unwrap_or_default();

        Self {
            title: entry.title.map(|t| t.content).unwrap_or_default(),
            link,
            description: entry.summary.map(|s| s.content).unwrap_or_default(),
            content: entry.content.and_then(|c| c.body).unwrap_or_default(),
            published: entry.published.or(entry.updated),
            published_raw: None,
            feed: 0,
        }
    }
}

/// Parse a feed document fetched from `source`.
///
/// Items come back in document order with `feed` set to 0; the caller
/// assigns the final feed index once the feed's position is known.
pub fn parse_feed(source: &str, bytes: &[u8]) -> Result<FetchedFeed> {
    let parsed = parser::parse(bytes).map_err(|e| Error::FeedParse {
        source_id: source.to_string(),
        message: e.to_string(),
    })?;

    let title = parsed
        .title
        .map(|t| t.content)
        .filter(|t| !t.trim().is_empty())
        .unwrap_or_else(|| source.to_string());
    let link = parsed
        .links
        .first()
        .map(|l| l.href.clone())
        .unwrap_or_else(|| source.to_string());

    let mut items: Vec<Item> = parsed.entries.into_iter().map(Item::from_entry).collect();

    if items.iter().any(|item| item.published.is_none()) {
        attach_raw_dates(&mut items, &extract_raw_dates(bytes));
    }

    Ok(FetchedFeed {
        feed: Feed {
            title,
            link,
            source: source.to_string(),
        },
        items,
    })
}

/// Give undated items the raw date text found at the same position in the
/// document. Skipped when the block count does not line up with the entries.
fn attach_raw_dates(items: &mut [Item], raw_dates: &[Option<String>]) {
    if raw_dates.len() != items.len() {
        debug!(
            "Found {} entry blocks for {} entries, not attaching raw dates",
            raw_dates.len(),
            items.len()
        );
        return;
    }

    for (item, raw) in items.iter_mut().zip(raw_dates) {
        if item.published.is_none() {
            item.published_raw = raw.clone();
        }
    }
}

/// Extract the raw date text of every `<item>`/`<entry>` block, since
/// feed_rs discards dates it fails to parse.
pub fn extract_raw_dates(xml_bytes: &[u8]) -> Vec<Option<String>> {
    let xml_str = match std::str::from_utf8(xml_bytes) {
        Ok(s) => s,
        Err(_) => return Vec::new(),
    };

    entry_blocks(xml_str)
        .into_iter()
        .map(|block| {
            DATE_TAGS
                .iter()
                .find_map(|tag| extract_xml_element(block, tag))
                .filter(|date| !date.is_empty())
        })
        .collect()
}

fn entry_blocks(xml: &str) -> Vec<&str> {
    let mut blocks = Vec::new();
    let mut rest = xml;

    while let Some((start, tag)) = next_entry_start(rest) {
        let block = &rest[start..];
        let end_tag = format!("</{}>", tag);
        let end = block
            .find(&end_tag)
            .map(|i| i + end_tag.len())
            .unwrap_or(block.len());
        blocks.push(&block[..end]);
        rest = &block[end..];
    }

    blocks
}

fn next_entry_start(xml: &str) -> Option<(usize, &'static str)> {
    ["item", "entry"]
        .into_iter()
        .filter_map(|tag| find_open_tag(xml, tag).map(|pos| (pos, tag)))
        .min_by_key(|(pos, _)| *pos)
}

/// Position of `<tag>` or `<tag attr...>`, ignoring longer names like `<items>`.
fn find_open_tag(xml: &str, tag: &str) -> Option<usize> {
    let needle = format!("<{}", tag);
    let mut from = 0;

    while let Some(found) = xml[from..].find(&needle) {
        let at = from + found;
        let after = at + needle.len();
        match xml[after..].chars().next() {
            Some(c) if c == '>' || c.is_whitespace() => return Some(at),
            _ => from = after,
        }
    }

    None
}

pub fn extract_xml_element(xml: &str, tag: &str) -> Option<String> {
    let start_tag = format!("<{}>", tag);
    let end_tag = format!("</{}>", tag);

    let start = xml.find(&start_tag)? + start_tag.len();
    let end = xml[start..].find(&end_tag)? + start;

    Some(xml[start..end].trim().to_string())
}
