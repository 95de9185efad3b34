//! Task domain model.
//!
//! # Responsibility
//! - Define the task record, draft and patch shapes used by the store.
//! - Provide the ID generator owned by each store instance.
//!
//! # Invariants
//! - Every task in a collection has a unique `TaskId`.
//! - IDs are assigned only on successful creation, never on edit.

pub mod id_gen;
pub mod task;
