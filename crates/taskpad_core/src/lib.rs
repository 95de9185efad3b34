//! Core domain logic for taskpad.
//! This crate is the single source of truth for task list invariants.

pub mod config;
pub mod db;
pub mod logging;
pub mod model;
pub mod seed;
pub mod service;
pub mod slot;
pub mod view;

pub use config::{ConfigError, StoreConfig, DEFAULT_SLOT_KEY};
pub use logging::{default_log_level, init_logging, logging_status, LoggingError};
pub use model::id_gen::IdGenerator;
pub use model::task::{Priority, Task, TaskDraft, TaskId, TaskPatch, TaskValidationError};
pub use seed::{DefaultSeed, SeedProvider};
pub use service::task_store::{
    decode_tasks, encode_tasks, BootstrapSource, EditState, MutationOutcome, PayloadError,
    StoreError, StoreResult, StoreState, TaskEditBuffer, TaskStore,
};
pub use slot::memory::MemorySlot;
pub use slot::sqlite::SqliteSlot;
pub use slot::{PersistenceSlot, SlotError, SlotResult};
pub use view::{derive_rows, derive_view, TaskRow};

/// Minimal health-check API for early integration.
pub fn ping() -> &'static str {
    "pong"
}

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}

#[cfg(test)]
mod tests {
    use super::{core_version, ping};

    #[test]
    fn ping_returns_pong() {
        assert_eq!(ping(), "pong");
    }

    #[test]
    fn version_is_not_empty() {
        assert!(!core_version().is_empty());
    }
}
