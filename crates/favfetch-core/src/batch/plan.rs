//! Decide which items need a download and where each icon will be saved.

use std::collections::HashMap;

use crate::bookmarks::{BookmarkCollection, IconRef};
use crate::config::IconOverride;
use crate::naming::{icon_file_stem, IconNaming};

/// Location of an item inside the collection: (category index, item index).
pub type RecordPos = (usize, usize);

/// One download and the records it patches on success.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IconJob {
    pub title: String,
    pub url: String,
    /// File name inside the icon directory.
    pub file_name: String,
    /// Value written into each record's icon field on success.
    pub relative_path: String,
    /// Per-item headers layered over the fetcher's base headers.
    pub headers: HashMap<String, String>,
    /// Every record sharing this title and URL. Never empty.
    pub records: Vec<RecordPos>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SkipReason {
    /// Remote icon on an item without a title; no file name can be derived.
    MissingTitle,
    /// Another item already claimed this file name with a different URL.
    DuplicateFileName { file_name: String, first_title: String },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SkippedItem {
    pub record: RecordPos,
    pub reason: SkipReason,
}

/// Output of planning: jobs in document order plus what was left out.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Plan {
    pub jobs: Vec<IconJob>,
    pub skipped: Vec<SkippedItem>,
    /// Items whose icon already points at a local path.
    pub local: usize,
    /// Items with no icon reference at all.
    pub without_icon: usize,
}

/// Walk the collection and build one job per distinct remote icon.
///
/// Items without an icon reference never produce a job. Items whose
/// reference is already local are only fetched when an override supplies a
/// URL for their title.
pub fn plan(
    collection: &BookmarkCollection,
    naming: &IconNaming,
    overrides: &[IconOverride],
) -> Plan {
    let mut out = Plan::default();
    let mut by_file: HashMap<String, usize> = HashMap::new();

    for (c, i, item) in collection.items() {
        let Some(icon) = item.icon_ref() else {
            out.without_icon += 1;
            continue;
        };
        let ov = item
            .title()
            .and_then(|t| overrides.iter().find(|o| o.title == t));

        let url = match (ov.and_then(|o| o.url.as_deref()), &icon) {
            (Some(u), _) => u.trim(),
            (None, IconRef::Remote(u)) => *u,
            (None, IconRef::Local(_)) => {
                out.local += 1;
                continue;
            }
        };

        let Some(title) = item.title() else {
            tracing::warn!(category = c, item = i, "item with remote icon has no title; skipping");
            out.skipped.push(SkippedItem {
                record: (c, i),
                reason: SkipReason::MissingTitle,
            });
            continue;
        };

        let stem = ov
            .and_then(|o| o.name.clone())
            .unwrap_or_else(|| icon_file_stem(title));
        let file_name = naming.file_name(&stem);

        if let Some(&idx) = by_file.get(&file_name) {
            let job = &mut out.jobs[idx];
            if job.url == url {
                job.records.push((c, i));
            } else {
                tracing::warn!(
                    title,
                    file_name = %file_name,
                    first = %job.title,
                    "file name already used by another item; skipping"
                );
                out.skipped.push(SkippedItem {
                    record: (c, i),
                    reason: SkipReason::DuplicateFileName {
                        file_name,
                        first_title: job.title.clone(),
                    },
                });
            }
            continue;
        }

        by_file.insert(file_name.clone(), out.jobs.len());
        out.jobs.push(IconJob {
            title: title.to_string(),
            url: url.to_string(),
            relative_path: naming.relative_path(&file_name),
            file_name,
            headers: ov.map(|o| o.headers.clone()).unwrap_or_default(),
            records: vec![(c, i)],
        });
    }

    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bookmarks::{Category, Item};

    fn coll(items: Vec<Item>) -> BookmarkCollection {
        BookmarkCollection::new(vec![Category::new(items)])
    }

    #[test]
    fn items_without_icon_produce_no_jobs() {
        let c = coll(vec![Item::new("A"), Item::new("B").with_favicon("")]);
        let p = plan(&c, &IconNaming::default(), &[]);
        assert!(p.jobs.is_empty());
        assert_eq!(p.without_icon, 2);
    }

    #[test]
    fn remote_icons_become_jobs_in_order() {
        let c = BookmarkCollection::new(vec![
            Category::new(vec![Item::new("Open Sea").with_favicon("https://opensea.io/favicon.ico")]),
            Category::new(vec![
                Item::new("Docs"),
                Item::new("Uniswap").with_favicon("https://uniswap.org/favicon.ico"),
            ]),
        ]);
        let p = plan(&c, &IconNaming::default(), &[]);
        assert_eq!(p.jobs.len(), 2);
        assert_eq!(p.jobs[0].file_name, "open-sea.ico");
        assert_eq!(p.jobs[0].relative_path, "./assets/icons/open-sea.ico");
        assert_eq!(p.jobs[0].records, vec![(0, 0)]);
        assert_eq!(p.jobs[1].url, "https://uniswap.org/favicon.ico");
        assert_eq!(p.jobs[1].records, vec![(1, 1)]);
    }

    #[test]
    fn local_icons_are_not_refetched() {
        let c = coll(vec![Item::new("A").with_favicon("./assets/icons/a.ico")]);
        let p = plan(&c, &IconNaming::default(), &[]);
        assert!(p.jobs.is_empty());
        assert_eq!(p.local, 1);
    }

    #[test]
    fn same_title_and_url_share_one_job() {
        let c = BookmarkCollection::new(vec![
            Category::new(vec![Item::new("Dex").with_favicon("https://d.io/f.ico")]),
            Category::new(vec![Item::new("Dex").with_favicon("https://d.io/f.ico")]),
        ]);
        let p = plan(&c, &IconNaming::default(), &[]);
        assert_eq!(p.jobs.len(), 1);
        assert_eq!(p.jobs[0].records, vec![(0, 0), (1, 0)]);
    }

    #[test]
    fn colliding_file_names_with_different_urls_are_skipped() {
        let c = coll(vec![
            Item::new("My Site").with_favicon("https://a.io/f.ico"),
            Item::new("my  site").with_favicon("https://b.io/f.ico"),
        ]);
        let p = plan(&c, &IconNaming::default(), &[]);
        assert_eq!(p.jobs.len(), 1);
        assert_eq!(p.skipped.len(), 1);
        assert_eq!(
            p.skipped[0].reason,
            SkipReason::DuplicateFileName {
                file_name: "my-site.ico".to_string(),
                first_title: "My Site".to_string(),
            }
        );
    }

    #[test]
    fn override_replaces_url_name_and_headers() {
        let c = coll(vec![
            Item::new("OpenSea").with_favicon("./assets/icons/opensea.ico"),
            Item::new("Other").with_favicon("https://other.io/f.ico"),
        ]);
        let mut headers = HashMap::new();
        headers.insert("Referer".to_string(), "http://localhost:5173/".to_string());
        let ov = IconOverride {
            title: "OpenSea".to_string(),
            url: Some("https://opensea.io/favicon.ico".to_string()),
            name: Some("opensea-logo".to_string()),
            headers: headers.clone(),
        };
        let p = plan(&c, &IconNaming::default(), &[ov]);
        assert_eq!(p.jobs.len(), 2);
        assert_eq!(p.jobs[0].url, "https://opensea.io/favicon.ico");
        assert_eq!(p.jobs[0].file_name, "opensea-logo.ico");
        assert_eq!(p.jobs[0].headers, headers);
        assert!(p.jobs[1].headers.is_empty());
    }

    #[test]
    fn remote_icon_without_title_is_skipped() {
        let mut item = Item::default();
        item.set_favicon("https://x.io/f.ico");
        let c = coll(vec![item]);
        let p = plan(&c, &IconNaming::default(), &[]);
        assert!(p.jobs.is_empty());
        assert_eq!(p.skipped[0].reason, SkipReason::MissingTitle);
    }
}
