//! User-facing notifications.

use async_trait::async_trait;

use crate::error::TimerError;
use crate::timer::Mode;

/// What the user is being told.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Notice {
    /// Work was started with an empty task list.
    CreateTaskFirst,
    /// Work was started or selected but every task is done.
    AllTasksCompleted,
    /// The last pending task was completed while work was running.
    TasksExhausted,
    /// An interval ran out; `to` starts once acknowledged.
    IntervalFinished { from: Mode, to: Mode },
}

impl Notice {
    pub fn message(&self) -> String {
        match self {
            Notice::CreateTaskFirst => "Please create a task first.".to_string(),
            Notice::AllTasksCompleted => {
                "All tasks are completed. Create a new one!".to_string()
            }
            Notice::TasksExhausted => {
                "All tasks are completed. Consider adding new tasks.".to_string()
            }
            Notice::IntervalFinished { from, to } => {
                format!("Time's up! {from} finished, next up: {to}.")
            }
        }
    }
}

impl From<TimerError> for Notice {
    fn from(err: TimerError) -> Self {
        match err {
            TimerError::NoTasks => Notice::CreateTaskFirst,
            TimerError::NoPendingTask => Notice::AllTasksCompleted,
        }
    }
}

impl std::fmt::Display for Notice {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.message())
    }
}

/// Delivers notices to the user.
///
/// `alert` and `confirm` block the controller until the user has seen the
/// notice; `warn` returns immediately.
#[async_trait]
pub trait Notifier: Send + Sync {
    async fn alert(&self, notice: &Notice);
    async fn confirm(&self, notice: &Notice);
    fn warn(&self, notice: &Notice);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn interval_message_names_both_modes() {
        let notice = Notice::IntervalFinished {
            from: Mode::Work,
            to: Mode::LongBreak,
        };
        assert_eq!(notice.to_string(), "Time's up! Focus finished, next up: Long break.");
    }

    #[test]
    fn timer_errors_map_to_notices() {
        assert_eq!(Notice::from(TimerError::NoTasks), Notice::CreateTaskFirst);
        assert_eq!(Notice::from(TimerError::NoPendingTask), Notice::AllTasksCompleted);
    }
}
