//! Unit-carrying rollup of estimates.
//!
//! All arithmetic runs on the total-minutes form in `u64`, where no valid
//! triple can overflow, and is decomposed back afterwards: minutes carry
//! into hours at 60, hours carry into days at 24. Days are never reduced
//! further, since no higher unit exists.

use crate::model::{Estimate, Task};

/// Rebuild a normalized triple from a total-minutes count.
///
/// Totals whose day count exceeds `u32::MAX` clamp the days field; the
/// rollup never panics on any input.
#[allow(clippy::cast_possible_truncation)]
const fn from_total_minutes(total: u64) -> Estimate {
    // Both remainders are < 60 and < 24, so the casts cannot truncate.
    let minutes = (total % 60) as u32;
    let hours = ((total / 60) % 24) as u32;
    let days_wide = total / (24 * 60);
    let days = if days_wide > u32::MAX as u64 {
        u32::MAX
    } else {
        days_wide as u32
    };
    Estimate::new(days, hours, minutes)
}

/// Carry overflowing minutes into hours and overflowing hours into days.
///
/// Preserves the total duration (`normalize(e).total_minutes() ==
/// e.total_minutes()`) whenever the carried day count fits in `u32`;
/// beyond that the days field saturates at `u32::MAX`.
#[must_use]
pub const fn normalize(estimate: Estimate) -> Estimate {
    from_total_minutes(estimate.total_minutes())
}

/// Sum of estimates, normalized. Total across all inputs, not element-wise,
/// so intermediate field overflow cannot occur.
pub fn sum<'a>(estimates: impl IntoIterator<Item = &'a Estimate>) -> Estimate {
    let total = estimates
        .into_iter()
        .fold(0u64, |acc, est| acc.saturating_add(est.total_minutes()));
    from_total_minutes(total)
}

/// Recompute a task's derived estimation from its subtasks.
///
/// A task without subtasks is left untouched: its own estimation stands.
pub fn recompute(task: &mut Task) {
    if task.sub_tasks.is_empty() {
        return;
    }
    task.estimation = sum(task.sub_tasks.iter().map(|sub| &sub.estimation));
}

#[cfg(test)]
mod tests {
    use super::{normalize, recompute, sum};
    use crate::model::{Estimate, SubTask, Task};

    #[test]
    fn normalize_carries_minutes_and_hours() {
        assert_eq!(normalize(Estimate::new(0, 1, 135)), Estimate::new(0, 3, 15));
        assert_eq!(normalize(Estimate::new(0, 30, 0)), Estimate::new(1, 6, 0));
        assert_eq!(normalize(Estimate::new(0, 23, 60)), Estimate::new(1, 0, 0));
    }

    #[test]
    fn normalize_leaves_normalized_values_alone() {
        let est = Estimate::new(2, 23, 59);
        assert_eq!(normalize(est), est);
    }

    #[test]
    fn sum_of_no_estimates_is_zero() {
        let none: [&Estimate; 0] = [];
        assert_eq!(sum(none), Estimate::default());
    }

    #[test]
    fn sum_carries_across_fields() {
        let total = sum([&Estimate::new(0, 1, 30), &Estimate::new(0, 0, 45)]);
        assert_eq!(total, Estimate::new(0, 2, 15));
    }

    #[test]
    fn sum_of_maximum_estimates_saturates_days_instead_of_panicking() {
        let max_days = Estimate::new(u32::MAX, 0, 0);
        assert_eq!(sum([&max_days, &max_days]), Estimate::new(u32::MAX, 0, 0));

        let all_max = Estimate::new(u32::MAX, u32::MAX, u32::MAX);
        let total = sum([&all_max, &all_max, &all_max]);
        assert!(total.is_normalized());
        assert_eq!(total.days, u32::MAX);
    }

    #[test]
    fn normalize_handles_maximum_fields_without_panicking() {
        let normalized = normalize(Estimate::new(u32::MAX, u32::MAX, u32::MAX));
        assert!(normalized.is_normalized());
        assert_eq!(normalized.days, u32::MAX);
    }

    #[test]
    fn normalize_preserves_total_below_the_day_cap() {
        // Largest carry that still fits: the day count stays well under
        // u32::MAX, so the total must be preserved exactly.
        let est = Estimate::new(0, u32::MAX, u32::MAX);
        assert_eq!(normalize(est).total_minutes(), est.total_minutes());
    }

    #[test]
    fn recompute_without_subtasks_is_passthrough() {
        let mut task = Task {
            description: "own estimate".to_string(),
            estimation: Estimate::new(0, 5, 30),
            sub_tasks: Vec::new(),
        };
        recompute(&mut task);
        assert_eq!(task.estimation, Estimate::new(0, 5, 30));
    }

    #[test]
    fn recompute_replaces_estimation_with_normalized_subtask_sum() {
        let mut task = Task {
            description: "parent".to_string(),
            estimation: Estimate::new(9, 9, 9),
            sub_tasks: vec![
                SubTask {
                    description: "a".to_string(),
                    estimation: Estimate::new(0, 1, 30),
                },
                SubTask {
                    description: "b".to_string(),
                    estimation: Estimate::new(0, 0, 45),
                },
            ],
        };
        recompute(&mut task);
        assert_eq!(task.estimation, Estimate::new(0, 2, 15));
    }
}
