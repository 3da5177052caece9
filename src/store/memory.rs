use std::cmp::Ordering;
use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering as AtomicOrdering};
use std::sync::RwLock;

use futures::future::{BoxFuture, FutureExt};
use time::OffsetDateTime;
use uuid::Uuid;

use super::{Direction, SortOrder, Store};
use crate::entry::{DirectoryEntry, EntryId, Field, NewEntry};
use crate::errors::StoreError;

/// A store that keeps every collection in memory. Used for tests and
/// for running the service without a database.
#[derive(Default)]
pub struct MemoryStore {
    inner: RwLock<Inner>,
    unavailable: AtomicBool,
}

#[derive(Default)]
struct Inner {
    collections: HashMap<String, Vec<Stored>>,
    sequence: u64,
    last_created_at: Option<OffsetDateTime>,
}

struct Stored {
    sequence: u64,
    entry: DirectoryEntry,
}

impl MemoryStore {
    pub fn new() -> Self {
        MemoryStore::default()
    }

    /// Makes every subsequent call fail with `StoreError::Unavailable`
    /// until switched back.
    pub fn set_unavailable(&self, unavailable: bool) {
        self.unavailable.store(unavailable, AtomicOrdering::SeqCst);
    }

    /// The number of entries in the named collection.
    pub fn len(&self, collection: &str) -> usize {
        self.inner
            .read()
            .map(|inner| inner.collections.get(collection).map(Vec::len).unwrap_or(0))
            .unwrap_or(0)
    }

    fn check_available(&self) -> Result<(), StoreError> {
        if self.unavailable.load(AtomicOrdering::SeqCst) {
            Err(StoreError::Unavailable)
        } else {
            Ok(())
        }
    }
}

impl Store for MemoryStore {
    fn insert(&self, collection: &str, entry: NewEntry) -> BoxFuture<Result<EntryId, StoreError>> {
        let collection = collection.to_owned();

        async move { memory_insert(self, collection, entry) }.boxed()
    }

    fn query(
        &self,
        collection: &str,
        order: SortOrder,
    ) -> BoxFuture<Result<Vec<DirectoryEntry>, StoreError>> {
        let collection = collection.to_owned();

        async move { memory_query(self, &collection, &order) }.boxed()
    }
}

fn memory_insert(
    store: &MemoryStore,
    collection: String,
    entry: NewEntry,
) -> Result<EntryId, StoreError> {
    store.check_available()?;

    let mut inner = store.inner.write().map_err(|_| StoreError::Unavailable)?;

    // the clock may step backwards; creation times must not
    let now = OffsetDateTime::now_utc();
    let created_at = match inner.last_created_at {
        Some(last) if last > now => last,
        _ => now,
    };
    inner.last_created_at = Some(created_at);
    inner.sequence += 1;

    let id = Uuid::new_v4();
    let stored = Stored {
        sequence: inner.sequence,
        entry: DirectoryEntry::new(id, created_at, entry.into_fields()),
    };

    inner.collections.entry(collection).or_default().push(stored);

    Ok(id)
}

fn memory_query(
    store: &MemoryStore,
    collection: &str,
    order: &SortOrder,
) -> Result<Vec<DirectoryEntry>, StoreError> {
    store.check_available()?;

    let inner = store.inner.read().map_err(|_| StoreError::Unavailable)?;

    let mut documents = match inner.collections.get(collection) {
        Some(documents) => documents.iter().collect::<Vec<_>>(),
        None => return Ok(vec![]),
    };

    // `createdAt` is not a form field, so it only takes part through
    // the tie-breakers below
    let field = Field::ALL.iter().copied().find(|f| f.key() == order.field());

    documents.sort_by(|a, b| {
        let by_field = match field {
            Some(field) => a.entry.fields().get(field).cmp(b.entry.fields().get(field)),
            None => Ordering::Equal,
        };

        let ordering = by_field
            .then_with(|| a.entry.created_at().cmp(&b.entry.created_at()))
            .then_with(|| a.sequence.cmp(&b.sequence));

        match order.direction() {
            Direction::Ascending => ordering,
            Direction::Descending => ordering.reverse(),
        }
    });

    Ok(documents.into_iter().map(|d| d.entry.clone()).collect())
}
