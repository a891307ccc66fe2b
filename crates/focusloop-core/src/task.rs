//! Tasks as seen by the timer.
//!
//! The task list is owned by the caller. The timer only ever reads snapshots
//! of it and remembers the current task by id.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Task {
    pub id: String,
    pub title: String,
    #[serde(default)]
    pub completed: bool,
}

impl Task {
    pub fn new(id: impl Into<String>, title: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            title: title.into(),
            completed: false,
        }
    }

    /// A task nobody has finished yet.
    pub fn is_pending(&self) -> bool {
        !self.completed
    }
}

/// First task in list order that is not completed.
pub fn find_pending_task(tasks: &[Task]) -> Option<&Task> {
    tasks.iter().find(|t| t.is_pending())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn task(id: &str, completed: bool) -> Task {
        Task {
            id: id.into(),
            title: format!("task {id}"),
            completed,
        }
    }

    #[test]
    fn empty_list_has_no_pending_task() {
        assert!(find_pending_task(&[]).is_none());
    }

    #[test]
    fn all_completed_has_no_pending_task() {
        let tasks = vec![task("a", true), task("b", true)];
        assert!(find_pending_task(&tasks).is_none());
    }

    #[test]
    fn returns_first_pending_in_list_order() {
        let tasks = vec![task("a", true), task("b", false), task("c", false)];
        assert_eq!(find_pending_task(&tasks).map(|t| t.id.as_str()), Some("b"));
    }

    #[test]
    fn follows_reordering() {
        let mut tasks = vec![task("a", false), task("b", false)];
        tasks.reverse();
        assert_eq!(find_pending_task(&tasks).map(|t| t.id.as_str()), Some("b"));
    }

    #[test]
    fn completed_defaults_to_false_when_missing() {
        let t: Task = serde_json::from_str(r#"{"id":"x","title":"Write"}"#).unwrap();
        assert!(t.is_pending());
    }
}
