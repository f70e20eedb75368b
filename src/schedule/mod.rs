//! Pursuit scheduling core

pub mod alert;
pub mod persist;
pub mod pursuit;
pub mod windows;

pub use alert::{AlertSeverity, ThreatAlert, IMMINENT_WINDOW_TICKS};
pub use persist::ScheduleSnapshot;
pub use pursuit::{PursuitSchedule, PursuitState};
pub use windows::{TickWindow, TimeBase, TimerWindows};
