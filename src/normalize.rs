//! Display fields derived from an [`Item`] while the page is rendered.

use scraper::Html;
use tracing::warn;
use url::Url;

use crate::feed::Item;

/// Maximum preview length in characters, truncation indicator included.
pub const PREVIEW_LENGTH: usize = 600;

pub const UNKNOWN_DATE: &str = "Once upon a time";

const ELLIPSIS: char = '…';

/// Host of the item's link without a leading `www.`.
///
/// Links that do not parse as absolute URLs are logged and yield an empty
/// string so a single bad entry never stops the page from rendering. An
/// entry without a link is not an error.
pub fn domain(item: &Item) -> String {
    if item.link.is_empty() {
        return String::new();
    }

    match Url::parse(&item.link) {
        Ok(url) => url
            .host_str()
            .map(|host| host.strip_prefix("www.").unwrap_or(host).to_string())
            .unwrap_or_default(),
        Err(e) => {
            warn!("fail to parse domain {:?}: {}", item.link, e);
            String::new()
        }
    }
}

pub fn preview(item: &Item) -> String {
    let text = if item.description.is_empty() {
        &item.content
    } else {
        &item.description
    };

    truncate(&plain_text(text), PREVIEW_LENGTH)
}

pub fn publication(item: &Item) -> String {
    match (&item.published, &item.published_raw) {
        (Some(date), _) => date.format("%Y-%m-%d").to_string(),
        (None, Some(raw)) if !raw.is_empty() => raw.clone(),
        _ => UNKNOWN_DATE.to_string(),
    }
}

/// Shorten `text` to at most `max` characters, indicator included.
///
/// Cuts on a char boundary. When the cut lands inside a word it backs up to
/// the last whitespace, as long as that keeps at least half of the budget.
pub fn truncate(text: &str, max: usize) -> String {
    if text.chars().count() <= max {
        return text.to_string();
    }
    if max == 0 {
        return String::new();
    }

    let budget = max - 1;
    let cut = text
        .char_indices()
        .nth(budget)
        .map(|(i, _)| i)
        .unwrap_or(text.len());
    let head = &text[..cut];
    let mid_word = text[cut..]
        .chars()
        .next()
        .is_some_and(|c| !c.is_whitespace());

    let head = match head.rfind(char::is_whitespace) {
        Some(space) if mid_word && head[..space].chars().count() >= budget / 2 => {
            &head[..space]
        }
        _ => head,
    };

    let mut out = head.trim_end().to_string();
    out.push(ELLIPSIS);
    out
}

/// Reduce markup to readable text: tags dropped, entities decoded,
/// whitespace runs collapsed.
pub fn plain_text(markup: &str) -> String {
    let fragment = Html::parse_fragment(markup);
    let mut text = String::with_capacity(markup.len());

    for node in fragment.root_element().descendants() {
        if let Some(text_node) = node.value().as_text() {
            text.push_str(text_node);
        }
        // Block elements separate words
        if let Some(element) = node.value().as_element() {
            match element.name() {
                "p" | "br" | "div" | "li" | "h1" | "h2" | "h3" | "h4" | "blockquote" => {
                    text.push(' ')
                }
                _ => {}
            }
        }
    }

    text.split_whitespace().collect::<Vec<_>>().join(" ")
}
