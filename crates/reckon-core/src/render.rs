//! Markdown document rendering for a task list.
//!
//! Rendering is pure string assembly; delivering the document anywhere (a
//! clipboard, a file) is the caller's job.

use std::fmt::Write as _;

use crate::model::{Estimate, TaskList};
use crate::rollup;

/// Headings used in the exported document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DocumentOptions {
    pub list_heading: String,
    pub total_heading: String,
}

impl Default for DocumentOptions {
    fn default() -> Self {
        Self {
            list_heading: "Tasks".to_string(),
            total_heading: "Total estimate".to_string(),
        }
    }
}

/// Sum of the top-level task estimations, normalized.
///
/// Subtasks are not re-descended: a task with subtasks already carries their
/// normalized sum as its own estimation.
#[must_use]
pub fn grand_total(list: &TaskList) -> Estimate {
    rollup::sum(list.tasks().iter().map(|task| &task.estimation))
}

/// Render the full export document.
///
/// ```text
/// ## <list_heading>
/// * [ ] `<token>`: <task description>
///     * [ ] `<token>`: <subtask description>
///
/// ### <total_heading>
/// `<token>`
/// ```
///
/// Tasks appear in collection order, subtasks in stored order, indented by
/// exactly four spaces.
#[must_use]
pub fn document(list: &TaskList, options: &DocumentOptions) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "## {}", options.list_heading);

    for task in list.tasks() {
        let _ = writeln!(out, "* [ ] `{}`: {}", task.estimation, task.description);
        for sub in &task.sub_tasks {
            let _ = writeln!(out, "    * [ ] `{}`: {}", sub.estimation, sub.description);
        }
    }

    let _ = writeln!(out, "\n### {}", options.total_heading);
    let _ = write!(out, "`{}`", grand_total(list));
    out
}

#[cfg(test)]
mod tests {
    use super::{DocumentOptions, document, grand_total};
    use crate::model::{Estimate, TaskList};

    fn sample_list() -> TaskList {
        let mut list = TaskList::new();
        list.set_task_description(0, "A").unwrap();
        let s0 = list.add_sub_task(0).unwrap();
        list.set_sub_task_description(0, s0, "A1").unwrap();
        list.set_sub_task_estimation(0, s0, Estimate::new(0, 1, 30))
            .unwrap();
        let s1 = list.add_sub_task(0).unwrap();
        list.set_sub_task_description(0, s1, "A2").unwrap();
        list.set_sub_task_estimation(0, s1, Estimate::new(0, 0, 45))
            .unwrap();

        let t1 = list.add_task();
        list.set_task_description(t1, "B").unwrap();
        list.set_task_estimation(t1, Estimate::new(0, 0, 45)).unwrap();
        list
    }

    #[test]
    fn grand_total_sums_top_level_estimations_with_carry() {
        let mut list = TaskList::new();
        list.set_task_estimation(0, Estimate::new(0, 20, 0)).unwrap();
        let t1 = list.add_task();
        list.set_task_estimation(t1, Estimate::new(0, 10, 0)).unwrap();

        let total = grand_total(&list);
        assert_eq!(total, Estimate::new(1, 6, 0));
        assert_eq!(total.to_string(), "1d6h");
    }

    #[test]
    fn document_layout_matches_the_export_grammar() {
        let rendered = document(&sample_list(), &DocumentOptions::default());
        let expected = "\
## Tasks
* [ ] `2h15m`: A
    * [ ] `1h30m`: A1
    * [ ] `45m`: A2
* [ ] `45m`: B

### Total estimate
`3h`";
        assert_eq!(rendered, expected);
    }

    #[test]
    fn document_honors_custom_headings() {
        let options = DocumentOptions {
            list_heading: "Backlog".to_string(),
            total_heading: "Sum".to_string(),
        };
        let rendered = document(&sample_list(), &options);
        assert!(rendered.starts_with("## Backlog\n"));
        assert!(rendered.contains("### Sum\n"));
    }

    #[test]
    fn fresh_list_renders_a_single_zero_task() {
        let rendered = document(&TaskList::new(), &DocumentOptions::default());
        // The task line ends in ": " because the description is empty.
        let expected = "## Tasks\n* [ ] `0m`: \n\n### Total estimate\n`0m`";
        assert_eq!(rendered, expected);
    }
}
