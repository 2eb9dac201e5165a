use thiserror::Error;

use crate::types::EventHandle;

/// Errors that can occur within the scheduler subsystem.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum SchedulerError {
    /// The handle already fired, was cancelled, or never existed.
    #[error("Event not pending: {handle}")]
    EventNotFound { handle: EventHandle },
}

pub type Result<T> = std::result::Result<T, SchedulerError>;
