//! Core use-case services.
//!
//! # Responsibility
//! - Orchestrate task mutations, derived views and persistence sync.
//! - Keep UI/CLI layers decoupled from slot storage details.

pub mod task_store;
