use serde::{Deserialize, Serialize};

use super::estimate::Estimate;

/// A leaf unit of work belonging to exactly one [`Task`]. Always
/// independently editable.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct SubTask {
    pub description: String,
    pub estimation: Estimate,
}

/// A top-level unit of work with an ordered list of subtasks.
///
/// While `sub_tasks` is non-empty, `estimation` is derived: it must equal
/// the normalized sum of the subtask estimations and is not independently
/// editable. [`crate::model::TaskList`] enforces this by rolling the task up
/// after every subtask mutation.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Task {
    pub description: String,
    pub estimation: Estimate,
    pub sub_tasks: Vec<SubTask>,
}

impl Task {
    /// Returns `true` if this task's estimation is derived from subtasks
    /// rather than entered directly.
    #[must_use]
    pub fn estimation_is_derived(&self) -> bool {
        !self.sub_tasks.is_empty()
    }
}
