//! Task ID generator.
//!
//! # Invariants
//! - Each `next()` call returns a value strictly greater than every value
//!   previously returned by the same instance.
//! - The counter never moves backwards.
//! - Once `TaskId::MAX` has been handed out or reserved, the generator is
//!   exhausted and `next()` returns `None` forever.

use super::task::TaskId;

/// Strictly increasing task ID source owned by one store.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IdGenerator {
    /// `None` once the ID space is used up.
    next: Option<TaskId>,
}

impl IdGenerator {
    /// Creates a generator starting at `0`.
    pub fn new() -> Self {
        Self::with_base(0)
    }

    /// Creates a generator whose first value is `base`.
    pub fn with_base(base: TaskId) -> Self {
        Self { next: Some(base) }
    }

    /// Returns the next ID and advances the counter.
    ///
    /// Returns `None` when no unused ID is left.
    pub fn next(&mut self) -> Option<TaskId> {
        let id = self.next?;
        self.next = id.checked_add(1);
        Some(id)
    }

    /// Returns the value the next `next()` call will produce.
    pub fn peek(&self) -> Option<TaskId> {
        self.next
    }

    pub fn is_exhausted(&self) -> bool {
        self.next.is_none()
    }

    /// Ensures future IDs are strictly greater than `id`.
    ///
    /// Never moves the counter backwards. Reserving `TaskId::MAX` exhausts
    /// the generator.
    pub fn reserve_through(&mut self, id: TaskId) {
        let Some(next) = self.next else {
            return;
        };
        if id >= next {
            self.next = id.checked_add(1);
        }
    }
}

impl Default for IdGenerator {
    fn default() -> Self {
        Self::new()
    }
}
