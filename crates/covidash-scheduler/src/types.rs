use std::fmt;

use chrono::Duration;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Opaque reference to one queued action.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct EventHandle(pub(crate) u64);

impl fmt::Display for EventHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "event-{}", self.0)
    }
}

/// Identifies one registered update (two updates may share a name).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct UpdateId(Uuid);

impl UpdateId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for UpdateId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for UpdateId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Work the scheduler can defer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ScheduledAction {
    RefreshNews,
    RefreshCovid,
    /// Drop a one-shot update's toast once it has fired.
    RemoveCompleted { update: UpdateId },
    /// Start the next 24 h cycle of a repeating update.
    RenewCycle { update: UpdateId },
}

impl ScheduledAction {
    /// Tiebreak among actions due at the same instant; lower runs first.
    pub fn priority(&self) -> u8 {
        match self {
            ScheduledAction::RefreshNews => 1,
            ScheduledAction::RefreshCovid => 2,
            ScheduledAction::RemoveCompleted { .. } => 3,
            ScheduledAction::RenewCycle { .. } => 4,
        }
    }

    pub fn is_refresh(&self) -> bool {
        matches!(self, ScheduledAction::RefreshNews | ScheduledAction::RefreshCovid)
    }
}

/// Everything needed to register (and later renew) an update.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UpdateRequest {
    /// Toast title; not unique.
    pub name: String,
    /// Time label shown in the toast, as the user typed it.
    pub label: String,
    /// Time from registration until the first firing.
    pub delay: Duration,
    pub repeat: bool,
    pub covid: bool,
    pub news: bool,
}
