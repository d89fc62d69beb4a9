// Data models for the to-do list

use chrono::{DateTime, Utc};
use eyre::{Result, eyre};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// A single to-do item
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Task {
    /// Creation timestamp in milliseconds, unique within a store
    pub id: i64,
    pub name: String,
    pub priority: Priority,
    /// Due date
    pub date: DateTime<Utc>,
    /// True while the inline edit form for this task is open
    pub is_editing: bool,
    pub is_completed: bool,
}

impl Task {
    /// Check a name before handing it to the store.
    ///
    /// The store accepts any name; callers reject empty input up front.
    pub fn validate_name(name: &str) -> Result<()> {
        if name.trim().is_empty() {
            return Err(eyre!("Task name cannot be empty"));
        }
        Ok(())
    }
}

/// Urgency level, serialized as its integer value
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub enum Priority {
    Low = 1,
    Medium = 2,
    High = 3,
}

impl Priority {
    pub fn value(self) -> u8 {
        self as u8
    }
}

impl TryFrom<u8> for Priority {
    type Error = String;

    fn try_from(value: u8) -> std::result::Result<Self, Self::Error> {
        match value {
            1 => Ok(Priority::Low),
            2 => Ok(Priority::Medium),
            3 => Ok(Priority::High),
            other => Err(format!("invalid priority {} (expected 1, 2 or 3)", other)),
        }
    }
}

impl From<Priority> for u8 {
    fn from(priority: Priority) -> Self {
        priority.value()
    }
}

impl FromStr for Priority {
    type Err = eyre::Report;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "1" | "low" => Ok(Priority::Low),
            "2" | "medium" | "med" => Ok(Priority::Medium),
            "3" | "high" => Ok(Priority::High),
            other => Err(eyre!("Invalid priority: {} (use low, medium, high or 1-3)", other)),
        }
    }
}

impl fmt::Display for Priority {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Priority::Low => write!(f, "low"),
            Priority::Medium => write!(f, "medium"),
            Priority::High => write!(f, "high"),
        }
    }
}

/// Payload for [`crate::TodoStore::update`].
///
/// `None` fields keep the task's current value. There is no editing flag:
/// a successful update always closes the editor.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TaskUpdate {
    pub id: i64,
    pub name: Option<String>,
    pub priority: Option<Priority>,
    pub date: Option<DateTime<Utc>>,
    pub is_completed: Option<bool>,
}

impl TaskUpdate {
    pub fn new(id: i64) -> Self {
        Self {
            id,
            ..Default::default()
        }
    }

    pub fn name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    pub fn priority(mut self, priority: Priority) -> Self {
        self.priority = Some(priority);
        self
    }

    pub fn date(mut self, date: DateTime<Utc>) -> Self {
        self.date = Some(date);
        self
    }

    pub fn completed(mut self, is_completed: bool) -> Self {
        self.is_completed = Some(is_completed);
        self
    }

    /// Overwrite the fields present in this payload and close the editor
    pub(crate) fn apply_to(self, task: &mut Task) {
        if let Some(name) = self.name {
            task.name = name;
        }
        if let Some(priority) = self.priority {
            task.priority = priority;
        }
        if let Some(date) = self.date {
            task.date = date;
        }
        if let Some(is_completed) = self.is_completed {
            task.is_completed = is_completed;
        }
        task.is_editing = false;
    }
}

impl From<Task> for TaskUpdate {
    fn from(task: Task) -> Self {
        Self {
            id: task.id,
            name: Some(task.name),
            priority: Some(task.priority),
            date: Some(task.date),
            is_completed: Some(task.is_completed),
        }
    }
}
