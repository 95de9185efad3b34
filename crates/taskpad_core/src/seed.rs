//! Seed collections used when no persisted tasks are available.

use crate::model::task::{Priority, Task};

/// Supplies the default collection for bootstrap fallback.
pub trait SeedProvider {
    fn seed_tasks(&self) -> Vec<Task>;
}

/// Built-in starter tasks (ids 1..=3).
#[derive(Debug, Clone, Copy, Default)]
pub struct DefaultSeed;

impl SeedProvider for DefaultSeed {
    fn seed_tasks(&self) -> Vec<Task> {
        vec![
            seed_task(
                1,
                "Complete project proposal",
                "Write and submit the project proposal by Friday",
                Priority::High,
            ),
            seed_task(2, "Buy groceries", "Get milk, eggs, and bread", Priority::Medium),
            seed_task(3, "Go for a run", "30-minute jog in the park", Priority::Low),
        ]
    }
}

impl SeedProvider for Vec<Task> {
    fn seed_tasks(&self) -> Vec<Task> {
        self.clone()
    }
}

impl SeedProvider for [Task] {
    fn seed_tasks(&self) -> Vec<Task> {
        self.to_vec()
    }
}

fn seed_task(id: u64, title: &str, description: &str, priority: Priority) -> Task {
    Task {
        id,
        title: title.to_string(),
        description: description.to_string(),
        priority,
        completed: false,
    }
}
