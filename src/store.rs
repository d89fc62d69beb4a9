// In-memory task store with reducer-style transitions

use crate::clock::{Clock, SystemClock};
use crate::models::{Priority, Task, TaskUpdate};
use crate::view;
use chrono::{DateTime, Utc};
use std::collections::HashSet;
use tracing::{debug, warn};

/// Owns the task collection and applies user actions to it
///
/// Every transition is total: an id that matches no task is a silent no-op.
/// The returned `bool` tells whether a task matched, for callers that care.
#[derive(Debug)]
pub struct TodoStore<C: Clock = SystemClock> {
    tasks: Vec<Task>,
    clock: C,
    last_id: i64,
}

impl TodoStore<SystemClock> {
    /// Empty store on the wall clock
    pub fn new() -> Self {
        Self::with_clock(SystemClock)
    }

    /// Restore a store from a previously saved collection
    pub fn from_tasks(tasks: Vec<Task>) -> Self {
        Self::from_tasks_with_clock(tasks, SystemClock)
    }
}

impl Default for TodoStore<SystemClock> {
    fn default() -> Self {
        Self::new()
    }
}

impl<C: Clock> TodoStore<C> {
    pub fn with_clock(clock: C) -> Self {
        Self {
            tasks: Vec::new(),
            clock,
            last_id: 0,
        }
    }

    /// Restore from a collection, keeping the first task for any repeated id
    pub fn from_tasks_with_clock(tasks: Vec<Task>, clock: C) -> Self {
        let mut seen = HashSet::new();
        let mut kept = Vec::with_capacity(tasks.len());

        for task in tasks {
            if !seen.insert(task.id) {
                warn!(id = task.id, "Dropping task with duplicate id");
                continue;
            }
            kept.push(task);
        }

        let last_id = kept.iter().map(|t| t.id).max().unwrap_or(0);
        debug!(count = kept.len(), "Restored task store");

        Self {
            tasks: kept,
            clock,
            last_id,
        }
    }

    pub fn clock(&self) -> &C {
        &self.clock
    }

    // ========================================================================
    // Transitions
    // ========================================================================

    /// Append a new task and return its id
    ///
    /// The name is not validated here; see [`Task::validate_name`].
    pub fn add(&mut self, name: impl Into<String>, priority: Priority, date: DateTime<Utc>) -> i64 {
        let id = self.next_id();
        let task = Task {
            id,
            name: name.into(),
            priority,
            date,
            is_editing: false,
            is_completed: false,
        };
        debug!(id, priority = %priority, "add: appending task");
        self.tasks.push(task);
        id
    }

    /// Flip the completed flag
    pub fn complete(&mut self, id: i64) -> bool {
        match self.find_mut(id) {
            Some(task) => {
                task.is_completed = !task.is_completed;
                debug!(id, completed = task.is_completed, "complete: toggled");
                true
            }
            None => false,
        }
    }

    /// Flip the editing flag; calling it twice restores the previous mode
    pub fn edit(&mut self, id: i64) -> bool {
        match self.find_mut(id) {
            Some(task) => {
                task.is_editing = !task.is_editing;
                debug!(id, editing = task.is_editing, "edit: toggled");
                true
            }
            None => false,
        }
    }

    /// Overwrite the matching task with the payload and close its editor
    pub fn update(&mut self, data: impl Into<TaskUpdate>) -> bool {
        let data = data.into();
        let id = data.id;
        match self.find_mut(id) {
            Some(task) => {
                data.apply_to(task);
                debug!(id, "update: applied");
                true
            }
            None => false,
        }
    }

    /// Remove the first task with this id
    pub fn delete(&mut self, id: i64) -> bool {
        match self.tasks.iter().position(|t| t.id == id) {
            Some(index) => {
                self.tasks.remove(index);
                debug!(id, "delete: removed");
                true
            }
            None => false,
        }
    }

    // ========================================================================
    // Explicit edit verbs
    // ========================================================================

    /// Open the editor for one task, closing any other open editor
    pub fn begin_edit(&mut self, id: i64) -> bool {
        if self.find_mut(id).is_none() {
            return false;
        }
        for task in &mut self.tasks {
            task.is_editing = task.id == id;
        }
        debug!(id, "begin_edit: editor open");
        true
    }

    /// Close the editor without applying changes
    pub fn cancel_edit(&mut self, id: i64) -> bool {
        match self.find_mut(id) {
            Some(task) => {
                task.is_editing = false;
                true
            }
            None => false,
        }
    }

    /// Apply an edit; same as [`TodoStore::update`]
    pub fn commit_edit(&mut self, data: impl Into<TaskUpdate>) -> bool {
        self.update(data)
    }

    /// The task whose editor is open, if any
    pub fn editing(&self) -> Option<&Task> {
        self.tasks.iter().find(|t| t.is_editing)
    }

    // ========================================================================
    // Reads
    // ========================================================================

    /// Tasks in insertion order
    pub fn tasks(&self) -> &[Task] {
        &self.tasks
    }

    pub fn get(&self, id: i64) -> Option<&Task> {
        self.tasks.iter().find(|t| t.id == id)
    }

    pub fn len(&self) -> usize {
        self.tasks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tasks.is_empty()
    }

    /// Display order: priority descending, ties in insertion order
    pub fn view(&self) -> Vec<Task> {
        view::by_priority(&self.tasks)
    }

    pub fn into_tasks(self) -> Vec<Task> {
        self.tasks
    }

    // ========================================================================
    // Helper methods
    // ========================================================================

    fn find_mut(&mut self, id: i64) -> Option<&mut Task> {
        self.tasks.iter_mut().find(|t| t.id == id)
    }

    /// Millisecond timestamp, bumped past the last issued id when the clock stalls
    ///
    /// Once `i64::MAX` has been issued, falls back to the smallest unused positive id.
    fn next_id(&mut self) -> i64 {
        let now = self.clock.now().timestamp_millis();
        match self.last_id.checked_add(1) {
            Some(floor) => {
                let id = now.max(floor);
                self.last_id = id;
                id
            }
            None => {
                let id = (1..=i64::MAX)
                    .find(|candidate| self.get(*candidate).is_none())
                    .unwrap_or(0);
                warn!(id, "Id space exhausted, reusing smallest free id");
                id
            }
        }
    }
}
