use std::cmp::Ordering;

use crate::feed::Item;

/// Order items newest first, undated items last, and keep the first `limit`.
///
/// The sort is stable: items with equal dates, and undated items among
/// themselves, keep the order they were fetched in.
pub fn merge(mut items: Vec<Item>, limit: usize) -> Vec<Item> {
    items.sort_by(recency);
    items.truncate(limit);
    items
}

fn recency(a: &Item, b: &Item) -> Ordering {
    match (&a.published, &b.published) {
        (Some(a), Some(b)) => b.cmp(a),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    }
}
