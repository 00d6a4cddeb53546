//! Abstract persistence contract.
//!
//! An entity-agnostic create/read/update/delete collaborator keyed by string
//! id. The in-memory stores are written against this trait; the SQLite
//! implementation lives in [`sqlite`]. Wire field names never cross this
//! boundary: implementations map rows to the entity model themselves.

pub mod sqlite;

use thiserror::Error;

/// Failures at the persistence boundary.
#[derive(Debug, Error)]
pub enum StorageError {
    /// The targeted record does not exist upstream.
    #[error("record '{id}' not found")]
    NotFound { id: String },

    /// The backing store is unreachable or the operation failed outright.
    #[error("storage unavailable: {0}")]
    Unavailable(String),

    /// A stored row could not be mapped back into the entity model
    /// (e.g. an unrecognized category value).
    #[error("corrupt record: {0}")]
    Corrupt(String),
}

impl From<rusqlite::Error> for StorageError {
    fn from(err: rusqlite::Error) -> Self {
        match err {
            rusqlite::Error::FromSqlConversionFailure(_, _, source) => {
                StorageError::Corrupt(source.to_string())
            }
            rusqlite::Error::IntegralValueOutOfRange(_, _) => {
                StorageError::Corrupt(err.to_string())
            }
            other => StorageError::Unavailable(other.to_string()),
        }
    }
}

/// Abstract CRUD over one entity collection.
///
/// `insert` takes a draft (the record minus its id) and returns the stored
/// record with an id assigned. `replace` fails with [`StorageError::NotFound`]
/// for an unknown id; `remove` is idempotent.
#[allow(async_fn_in_trait)]
pub trait Collection {
    type Record;
    type Draft;

    async fn list(&self) -> Result<Vec<Self::Record>, StorageError>;

    async fn insert(&self, draft: Self::Draft) -> Result<Self::Record, StorageError>;

    async fn replace(&self, id: &str, record: &Self::Record)
        -> Result<Self::Record, StorageError>;

    async fn remove(&self, id: &str) -> Result<(), StorageError>;
}
