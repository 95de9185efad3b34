//! Persistence slot contracts and backends.
//!
//! # Responsibility
//! - Define the key-value slot the task store mirrors its collection to.
//! - Provide in-memory and SQLite-backed slot implementations.
//!
//! # Invariants
//! - `load` returns `Ok(None)` for a key that was never saved.
//! - `save` fully replaces the value stored under a key.

use crate::db::DbError;
use std::error::Error;
use std::fmt::{Display, Formatter};

pub mod memory;
pub mod sqlite;

pub type SlotResult<T> = Result<T, SlotError>;

/// Error raised by a persistence slot backend.
#[derive(Debug)]
pub enum SlotError {
    Db(DbError),
    /// Backend refused or could not complete the request.
    Unavailable(String),
}

impl Display for SlotError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Db(err) => write!(f, "{err}"),
            Self::Unavailable(message) => write!(f, "persistence slot unavailable: {message}"),
        }
    }
}

impl Error for SlotError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Db(err) => Some(err),
            Self::Unavailable(_) => None,
        }
    }
}

impl From<DbError> for SlotError {
    fn from(value: DbError) -> Self {
        Self::Db(value)
    }
}

impl From<rusqlite::Error> for SlotError {
    fn from(value: rusqlite::Error) -> Self {
        Self::Db(DbError::Sqlite(value))
    }
}

/// Key-value persistence slot.
pub trait PersistenceSlot {
    fn load(&self, key: &str) -> SlotResult<Option<String>>;
    fn save(&mut self, key: &str, value: &str) -> SlotResult<()>;
}

impl<S: PersistenceSlot + ?Sized> PersistenceSlot for &mut S {
    fn load(&self, key: &str) -> SlotResult<Option<String>> {
        (**self).load(key)
    }

    fn save(&mut self, key: &str, value: &str) -> SlotResult<()> {
        (**self).save(key, value)
    }
}
