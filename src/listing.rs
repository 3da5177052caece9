use serde::Serialize;

use log::{debug, error, Logger};

use crate::entry::DirectoryEntry;
use crate::environment::SharedStore;
use crate::store::SortOrder;

/// What the listing view shows.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Listing {
    /// The query has not finished yet.
    Loading,

    /// Nothing to show. Also used when the query failed.
    Empty,

    /// Every entry, newest first.
    Loaded(Vec<DirectoryEntry>),
}

impl Listing {
    pub fn entries(&self) -> &[DirectoryEntry] {
        match self {
            Listing::Loaded(entries) => entries,
            _ => &[],
        }
    }

    pub fn is_loading(&self) -> bool {
        matches!(self, Listing::Loading)
    }
}

/// Queries every entry of `collection`, newest first. A failed query is
/// logged and shown the same way as an empty directory.
pub async fn load_listing(store: &SharedStore, collection: &str, logger: &Logger) -> Listing {
    debug!(logger, "Loading listing..."; "collection" => collection);

    match store.query(collection, SortOrder::newest_first()).await {
        Ok(entries) if entries.is_empty() => Listing::Empty,
        Ok(entries) => Listing::Loaded(entries),
        Err(e) => {
            error!(logger, "Failed to load listing"; "collection" => collection, "error" => ?e, "message" => %e);
            Listing::Empty
        }
    }
}

/// One entry as the listing view renders it.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ListedEntry<'a> {
    #[serde(flatten)]
    entry: &'a DirectoryEntry,

    /// "City, Country", leaving out whichever is empty.
    location: Option<String>,

    /// The Instagram handle with its `@`.
    instagram_handle: Option<String>,
}

impl<'a> From<&'a DirectoryEntry> for ListedEntry<'a> {
    fn from(entry: &'a DirectoryEntry) -> Self {
        ListedEntry {
            entry,
            location: entry.location(),
            instagram_handle: entry.instagram_handle(),
        }
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::{load_listing, ListedEntry, Listing};
    use crate::entry::SubmissionForm;
    use crate::environment::SharedStore;
    use crate::store::MemoryStore;
    use crate::submission::{Phase, SubmissionWorkflow};

    const COLLECTION: &str = "barbershops";

    async fn add(store: &Arc<MemoryStore>, name: &str) {
        let form = SubmissionForm {
            name: name.to_owned(),
            city: "Lagos".to_owned(),
            country: "Nigeria".to_owned(),
            instagram: format!("@{}", name),
            ..SubmissionForm::default()
        };

        let mut workflow =
            SubmissionWorkflow::with_form(store.clone(), COLLECTION, Arc::new(log::discard()), form);

        assert_eq!(workflow.submit().await, Ok(Phase::Submitted));
    }

    #[tokio::test]
    async fn listing_is_newest_first() {
        let memory = Arc::new(MemoryStore::new());
        add(&memory, "older").await;
        add(&memory, "newer").await;

        let store: SharedStore = memory;
        let listing = load_listing(&store, COLLECTION, &log::discard()).await;

        let names = listing
            .entries()
            .iter()
            .map(|e| e.fields().name.as_str())
            .collect::<Vec<_>>();
        assert_eq!(names, vec!["newer", "older"]);
        assert!(!listing.is_loading());
    }

    #[tokio::test]
    async fn empty_directories_are_empty() {
        let store: SharedStore = Arc::new(MemoryStore::new());

        assert_eq!(load_listing(&store, COLLECTION, &log::discard()).await, Listing::Empty);
    }

    #[tokio::test]
    async fn failed_queries_look_empty() {
        let memory = Arc::new(MemoryStore::new());
        add(&memory, "hidden").await;
        memory.set_unavailable(true);

        let store: SharedStore = memory;
        let listing = load_listing(&store, COLLECTION, &log::discard()).await;

        assert_eq!(listing, Listing::Empty);
        assert!(listing.entries().is_empty());
    }

    #[tokio::test]
    async fn listed_entries_carry_display_fields() {
        let memory = Arc::new(MemoryStore::new());
        add(&memory, "fade").await;

        let store: SharedStore = memory;
        let listing = load_listing(&store, COLLECTION, &log::discard()).await;
        let listed = ListedEntry::from(&listing.entries()[0]);

        let value = serde_json::to_value(&listed).expect("serialize listed entry");
        assert_eq!(value["location"], "Lagos, Nigeria");
        assert_eq!(value["instagramHandle"], "@fade");
        assert_eq!(value["instagram"], "fade");
        assert_eq!(value["name"], "fade");
    }
}
