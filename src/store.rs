use futures::future::BoxFuture;

use crate::entry::{DirectoryEntry, EntryId, NewEntry};
use crate::errors::StoreError;

pub mod memory;

pub use self::memory::MemoryStore;
pub use self::postgres::*;

/// The field every document carries, set by the store on insert.
pub const CREATED_AT: &str = "createdAt";

/// The document database behind the directory.
pub trait Store: Send + Sync {
    /// Saves a new entry in the named collection. The store assigns the
    /// ID and the creation time.
    fn insert(&self, collection: &str, entry: NewEntry) -> BoxFuture<Result<EntryId, StoreError>>;

    /// Retrieves every entry in the named collection in the given order.
    fn query(
        &self,
        collection: &str,
        order: SortOrder,
    ) -> BoxFuture<Result<Vec<DirectoryEntry>, StoreError>>;
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Direction {
    Ascending,
    Descending,
}

/// A field to sort by and which way.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SortOrder {
    pub(crate) field: String,
    pub(crate) direction: Direction,
}

impl SortOrder {
    pub fn new(field: impl Into<String>, direction: Direction) -> Self {
        SortOrder {
            field: field.into(),
            direction,
        }
    }

    /// Most recently created first.
    pub fn newest_first() -> Self {
        SortOrder::new(CREATED_AT, Direction::Descending)
    }

    pub fn field(&self) -> &str {
        &self.field
    }

    pub fn direction(&self) -> Direction {
        self.direction
    }
}

mod postgres {
    use futures::future::BoxFuture;
    use futures::FutureExt;
    use sqlx::{postgres::PgPool, types::Json};
    use time::OffsetDateTime;
    use uuid::Uuid;

    use super::{Direction, SortOrder};
    use crate::entry::{DirectoryEntry, EntryFields, EntryId, NewEntry};
    use crate::errors::StoreError;

    /// A store that keeps each entry as a JSON document in Postgres.
    pub struct PgStore {
        pool: PgPool,
    }

    impl PgStore {
        pub fn new(pool: PgPool) -> Self {
            PgStore { pool }
        }
    }

    // these can be simplified once async functions in traits are stabilized
    impl super::Store for PgStore {
        fn insert(&self, collection: &str, entry: NewEntry) -> BoxFuture<Result<EntryId, StoreError>> {
            let collection = collection.to_owned();

            async move {
                let query = sqlx::query_as(include_str!("queries/insert.sql"));

                let (id, _created_at): (Uuid, OffsetDateTime) = query
                    .bind(collection)
                    .bind(Json(entry.into_fields()))
                    .fetch_one(&self.pool)
                    .await
                    .map_err(map_sqlx_error)?;

                Ok(id)
            }
            .boxed()
        }

        fn query(
            &self,
            collection: &str,
            order: SortOrder,
        ) -> BoxFuture<Result<Vec<DirectoryEntry>, StoreError>> {
            let collection = collection.to_owned();

            async move {
                let sql = match order.direction {
                    Direction::Ascending => include_str!("queries/retrieve_ascending.sql"),
                    Direction::Descending => include_str!("queries/retrieve_descending.sql"),
                };

                let rows: Vec<(Uuid, OffsetDateTime, Json<EntryFields>)> = sqlx::query_as(sql)
                    .bind(collection)
                    .bind(order.field)
                    .fetch_all(&self.pool)
                    .await
                    .map_err(map_sqlx_error)?;

                let entries = rows
                    .into_iter()
                    .map(|(id, created_at, Json(fields))| DirectoryEntry::new(id, created_at, fields))
                    .collect();

                Ok(entries)
            }
            .boxed()
        }
    }

    fn map_sqlx_error(error: sqlx::Error) -> StoreError {
        use sqlx::Error;

        match error {
            Error::PoolTimedOut | Error::PoolClosed | Error::Io(_) => StoreError::Unavailable,
            _ => StoreError::Sqlx { source: error },
        }
    }
}
