mod display;
mod engine;
mod mode;

pub use display::{format_time, DisplayState};
pub use engine::{PomodoroTimer, TaskUpdate, Transition};
pub use mode::Mode;
