//! Data model: estimates, tasks, subtasks, and the task list container.

mod estimate;
mod list;
mod task;

pub use estimate::{Estimate, ParseEstimateError};
pub use list::{EditError, TaskList};
pub use task::{SubTask, Task};
