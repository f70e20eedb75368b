//! Player-notification surface interface

use serde::{Deserialize, Serialize};

/// Visual severity of a notification
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Severity {
    Neutral,
    ThreatSmall,
    ThreatBig,
    Positive,
}

/// A (title, body, severity) triple rendered by the host's letter stack
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Notification {
    pub title: String,
    pub body: String,
    pub severity: Severity,
}

impl Notification {
    pub fn new(title: impl Into<String>, body: impl Into<String>, severity: Severity) -> Self {
        Self {
            title: title.into(),
            body: body.into(),
            severity,
        }
    }
}

/// Notification surface, supplied by the host
pub trait NotificationSink {
    fn deliver(&mut self, notice: Notification);
}
