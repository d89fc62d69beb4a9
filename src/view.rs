// Derived, display-ordered projections of the task collection

use crate::models::{Priority, Task};
use crate::remaining::{Locale, Remaining};
use chrono::{DateTime, Utc};
use std::cmp::Reverse;

/// Which tasks a listing shows
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ViewFilter {
    #[default]
    All,
    Active,
    Completed,
}

impl ViewFilter {
    pub fn matches(self, task: &Task) -> bool {
        match self {
            ViewFilter::All => true,
            ViewFilter::Active => !task.is_completed,
            ViewFilter::Completed => task.is_completed,
        }
    }
}

/// Copy of `tasks` sorted by priority, highest first.
///
/// The sort is stable: tasks of equal priority keep their input order.
pub fn by_priority(tasks: &[Task]) -> Vec<Task> {
    let mut sorted = tasks.to_vec();
    sorted.sort_by_key(|t| Reverse(t.priority));
    sorted
}

/// One rendered line of the list
#[derive(Debug, Clone, PartialEq)]
pub struct TaskRow {
    pub id: i64,
    pub name: String,
    pub priority: Priority,
    pub priority_label: &'static str,
    pub remaining: Remaining,
    pub remaining_label: String,
    pub is_completed: bool,
    pub is_editing: bool,
}

/// Filtered, priority-ordered rows with labels computed against `now`
pub fn rows(tasks: &[Task], filter: ViewFilter, now: DateTime<Utc>, locale: Locale) -> Vec<TaskRow> {
    let visible: Vec<Task> = tasks.iter().filter(|t| filter.matches(t)).cloned().collect();

    by_priority(&visible)
        .into_iter()
        .map(|task| {
            let remaining = Remaining::between(task.date, now);
            TaskRow {
                id: task.id,
                priority_label: locale.priority_label(task.priority),
                priority: task.priority,
                remaining,
                remaining_label: remaining.render(locale),
                is_completed: task.is_completed,
                is_editing: task.is_editing,
                name: task.name,
            }
        })
        .collect()
}
