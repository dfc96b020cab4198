use serde::{Deserialize, Deserializer, Serialize};

use super::estimate::Estimate;
use super::task::{SubTask, Task};
use crate::rollup;

/// Error returned when an edit cannot be applied to a [`TaskList`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum EditError {
    #[error("task index {0} out of range")]
    TaskOutOfRange(usize),
    #[error("subtask index {sub} out of range for task {task}")]
    SubTaskOutOfRange { task: usize, sub: usize },
    #[error("task {0} has subtasks; its estimation is derived")]
    EstimationDerived(usize),
}

/// The ordered, never-empty collection of tasks under edit.
///
/// All mutation goes through these methods so two invariants hold at every
/// return:
///
/// - the list contains at least one task (removing the last one resets it to
///   a single fresh empty task), and
/// - any task with subtasks carries the normalized sum of their estimations.
///
/// Subtask mutations (add, edit, delete) all trigger a rollup of the parent
/// before returning, so a derived estimation is never stale.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct TaskList {
    tasks: Vec<Task>,
}

/// Deserializes from a bare array of tasks, re-establishing both list
/// invariants: empty input becomes the fresh single-task list, and every
/// derived estimation is recomputed so stale input values never survive.
impl<'de> Deserialize<'de> for TaskList {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let tasks = Vec::<Task>::deserialize(deserializer)?;
        Ok(Self::from_tasks(tasks))
    }
}

impl Default for TaskList {
    fn default() -> Self {
        Self {
            tasks: vec![Task::default()],
        }
    }
}

impl TaskList {
    /// A list holding one fresh empty task.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a list from existing tasks, rolling up every derived
    /// estimation. An empty input yields the fresh single-task list.
    #[must_use]
    pub fn from_tasks(mut tasks: Vec<Task>) -> Self {
        if tasks.is_empty() {
            return Self::default();
        }
        for task in &mut tasks {
            rollup::recompute(task);
        }
        Self { tasks }
    }

    #[must_use]
    pub fn tasks(&self) -> &[Task] {
        &self.tasks
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.tasks.len()
    }

    /// Always `false`: the list never becomes empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        false
    }

    #[must_use]
    pub fn task(&self, index: usize) -> Option<&Task> {
        self.tasks.get(index)
    }

    /// Append a fresh empty task and return its index.
    pub fn add_task(&mut self) -> usize {
        self.tasks.push(Task::default());
        self.tasks.len() - 1
    }

    /// Remove the task at `index`. Removing the sole remaining task resets
    /// the list to a single fresh empty task instead of leaving it empty.
    pub fn remove_task(&mut self, index: usize) -> Result<(), EditError> {
        if index >= self.tasks.len() {
            return Err(EditError::TaskOutOfRange(index));
        }
        if self.tasks.len() == 1 {
            self.tasks[0] = Task::default();
        } else {
            self.tasks.remove(index);
        }
        Ok(())
    }

    pub fn set_task_description(
        &mut self,
        index: usize,
        description: impl Into<String>,
    ) -> Result<(), EditError> {
        let task = self
            .tasks
            .get_mut(index)
            .ok_or(EditError::TaskOutOfRange(index))?;
        task.description = description.into();
        Ok(())
    }

    /// Set a task's own estimate. Rejected while the task has subtasks,
    /// since the estimation is then derived.
    pub fn set_task_estimation(
        &mut self,
        index: usize,
        estimation: Estimate,
    ) -> Result<(), EditError> {
        let task = self
            .tasks
            .get_mut(index)
            .ok_or(EditError::TaskOutOfRange(index))?;
        if task.estimation_is_derived() {
            return Err(EditError::EstimationDerived(index));
        }
        task.estimation = estimation;
        Ok(())
    }

    /// Append a fresh empty subtask under `task` and return its index.
    pub fn add_sub_task(&mut self, task: usize) -> Result<usize, EditError> {
        let parent = self
            .tasks
            .get_mut(task)
            .ok_or(EditError::TaskOutOfRange(task))?;
        parent.sub_tasks.push(SubTask::default());
        rollup::recompute(parent);
        Ok(parent.sub_tasks.len() - 1)
    }

    pub fn remove_sub_task(&mut self, task: usize, sub: usize) -> Result<(), EditError> {
        let parent = self
            .tasks
            .get_mut(task)
            .ok_or(EditError::TaskOutOfRange(task))?;
        if sub >= parent.sub_tasks.len() {
            return Err(EditError::SubTaskOutOfRange { task, sub });
        }
        parent.sub_tasks.remove(sub);
        // When the last subtask goes, the last derived value stands and the
        // task becomes directly editable again.
        rollup::recompute(parent);
        Ok(())
    }

    pub fn set_sub_task_description(
        &mut self,
        task: usize,
        sub: usize,
        description: impl Into<String>,
    ) -> Result<(), EditError> {
        let parent = self
            .tasks
            .get_mut(task)
            .ok_or(EditError::TaskOutOfRange(task))?;
        let sub_task = parent
            .sub_tasks
            .get_mut(sub)
            .ok_or(EditError::SubTaskOutOfRange { task, sub })?;
        sub_task.description = description.into();
        Ok(())
    }

    pub fn set_sub_task_estimation(
        &mut self,
        task: usize,
        sub: usize,
        estimation: Estimate,
    ) -> Result<(), EditError> {
        let parent = self
            .tasks
            .get_mut(task)
            .ok_or(EditError::TaskOutOfRange(task))?;
        let sub_task = parent
            .sub_tasks
            .get_mut(sub)
            .ok_or(EditError::SubTaskOutOfRange { task, sub })?;
        sub_task.estimation = estimation;
        rollup::recompute(parent);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::{EditError, Estimate, TaskList};

    #[test]
    fn new_list_holds_one_empty_task() {
        let list = TaskList::new();
        assert_eq!(list.len(), 1);
        let task = &list.tasks()[0];
        assert_eq!(task.description, "");
        assert_eq!(task.estimation, Estimate::default());
        assert!(task.sub_tasks.is_empty());
    }

    #[test]
    fn removing_sole_task_resets_to_fresh_empty_task() {
        let mut list = TaskList::new();
        list.set_task_description(0, "only").unwrap();
        list.set_task_estimation(0, Estimate::new(0, 2, 0)).unwrap();

        list.remove_task(0).unwrap();
        assert_eq!(list.len(), 1);
        let task = &list.tasks()[0];
        assert_eq!(task.description, "");
        assert_eq!(task.estimation, Estimate::default());
        assert!(task.sub_tasks.is_empty());
    }

    #[test]
    fn removing_a_task_keeps_the_rest_in_order() {
        let mut list = TaskList::new();
        list.set_task_description(0, "a").unwrap();
        list.add_task();
        list.set_task_description(1, "b").unwrap();
        list.add_task();
        list.set_task_description(2, "c").unwrap();

        list.remove_task(1).unwrap();
        let names: Vec<&str> = list.tasks().iter().map(|t| t.description.as_str()).collect();
        assert_eq!(names, ["a", "c"]);
    }

    #[test]
    fn subtask_edits_keep_parent_estimation_derived() {
        let mut list = TaskList::new();
        let s0 = list.add_sub_task(0).unwrap();
        let s1 = list.add_sub_task(0).unwrap();
        list.set_sub_task_estimation(0, s0, Estimate::new(0, 1, 30))
            .unwrap();
        list.set_sub_task_estimation(0, s1, Estimate::new(0, 0, 45))
            .unwrap();

        assert_eq!(list.tasks()[0].estimation, Estimate::new(0, 2, 15));
    }

    #[test]
    fn subtask_removal_triggers_rollup() {
        let mut list = TaskList::new();
        let s0 = list.add_sub_task(0).unwrap();
        let s1 = list.add_sub_task(0).unwrap();
        list.set_sub_task_estimation(0, s0, Estimate::new(0, 1, 30))
            .unwrap();
        list.set_sub_task_estimation(0, s1, Estimate::new(0, 0, 45))
            .unwrap();

        list.remove_sub_task(0, s1).unwrap();
        assert_eq!(list.tasks()[0].estimation, Estimate::new(0, 1, 30));
    }

    #[test]
    fn direct_estimation_rejected_while_subtasks_exist() {
        let mut list = TaskList::new();
        list.add_sub_task(0).unwrap();
        assert_eq!(
            list.set_task_estimation(0, Estimate::new(1, 0, 0)),
            Err(EditError::EstimationDerived(0))
        );
    }

    #[test]
    fn direct_estimation_allowed_again_after_last_subtask_removed() {
        let mut list = TaskList::new();
        let s0 = list.add_sub_task(0).unwrap();
        list.set_sub_task_estimation(0, s0, Estimate::new(0, 3, 0))
            .unwrap();
        list.remove_sub_task(0, s0).unwrap();

        // Last derived value stands until the user edits it.
        assert_eq!(list.tasks()[0].estimation, Estimate::new(0, 3, 0));
        list.set_task_estimation(0, Estimate::new(0, 1, 0)).unwrap();
        assert_eq!(list.tasks()[0].estimation, Estimate::new(0, 1, 0));
    }

    #[test]
    fn out_of_range_indexes_are_rejected() {
        let mut list = TaskList::new();
        assert_eq!(
            list.remove_task(5),
            Err(EditError::TaskOutOfRange(5))
        );
        assert_eq!(
            list.add_sub_task(2),
            Err(EditError::TaskOutOfRange(2))
        );
        assert_eq!(
            list.remove_sub_task(0, 0),
            Err(EditError::SubTaskOutOfRange { task: 0, sub: 0 })
        );
    }

    #[test]
    fn from_tasks_rolls_up_stale_estimations() {
        let json = r#"[
            {
                "description": "A",
                "estimation": {"days": 9, "hours": 9, "minutes": 9},
                "sub_tasks": [
                    {"description": "A1", "estimation": {"hours": 1, "minutes": 30}},
                    {"description": "A2", "estimation": {"minutes": 45}}
                ]
            }
        ]"#;
        let tasks: Vec<super::super::Task> = serde_json::from_str(json).unwrap();
        let list = TaskList::from_tasks(tasks);
        assert_eq!(list.tasks()[0].estimation, Estimate::new(0, 2, 15));
    }

    #[test]
    fn from_tasks_on_empty_input_yields_fresh_list() {
        let list = TaskList::from_tasks(Vec::new());
        assert_eq!(list.len(), 1);
    }

    #[test]
    fn deserializing_restores_both_invariants() {
        let empty: TaskList = serde_json::from_str("[]").unwrap();
        assert_eq!(empty.len(), 1);

        let stale: TaskList = serde_json::from_str(
            r#"[{"description":"A","estimation":{"days":7},"sub_tasks":[{"estimation":{"minutes":90}}]}]"#,
        )
        .unwrap();
        assert_eq!(stale.tasks()[0].estimation, Estimate::new(0, 1, 30));
    }
}
