//! `covidash-scheduler`: cooperative deferred-action queue and the registry of
//! user-scheduled dashboard updates.
//!
//! # Overview
//!
//! Nothing here runs on its own. The host calls [`UpdateScheduler::tick`] (the
//! gateway does so on every request) and receives every action whose fire time
//! has passed, in deterministic order. Registry bookkeeping (self-removal,
//! cycle renewal) is applied inside `tick`; data refreshes are handed back to
//! the caller to execute.
//!
//! # Actions at a shared fire time
//!
//! | Order | Action            | Effect                                     |
//! |-------|-------------------|--------------------------------------------|
//! | 1     | `RefreshNews`     | caller refetches articles                  |
//! | 2     | `RefreshCovid`    | caller rebuilds the case snapshot          |
//! | 3     | `RemoveCompleted` | one-shot update leaves the registry        |
//! | 4     | `RenewCycle`      | repeating update starts its next 24 h cycle |
//!
//! Repeating updates are recurring timers: their handles stay valid across
//! cycles, so cancelling works at any point.

pub mod engine;
pub mod error;
pub mod registry;
pub mod types;
pub mod updates;

pub use engine::Scheduler;
pub use error::{Result, SchedulerError};
pub use registry::{UpdateEntry, UpdateRegistry};
pub use types::{EventHandle, ScheduledAction, UpdateId, UpdateRequest};
pub use updates::{UpdateScheduler, REPEAT_PERIOD};
