//! Patch records for successful downloads.

use crate::bookmarks::BookmarkCollection;

use super::run::JobResult;

/// Point every record of every successful job at its local icon path.
///
/// Failed jobs leave their records untouched. Returns the number of records
/// whose icon reference actually changed.
pub fn apply(collection: &mut BookmarkCollection, results: &[JobResult]) -> usize {
    let mut changed = 0;
    for r in results.iter().filter(|r| r.outcome.is_success()) {
        for &(c, i) in &r.job.records {
            let Some(item) = collection.item_mut(c, i) else {
                tracing::warn!(category = c, item = i, "record vanished before patching");
                continue;
            };
            if item.favicon() != Some(r.job.relative_path.as_str()) {
                item.set_favicon(&r.job.relative_path);
                changed += 1;
            }
        }
    }
    changed
}
