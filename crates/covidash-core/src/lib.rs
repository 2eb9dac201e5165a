//! `covidash-core`: configuration, errors, and the data types shared by every
//! other covidash crate.

pub mod clock;
pub mod config;
pub mod error;
pub mod news;
pub mod types;

pub use error::{DashError, Result};
pub use news::NewsFeed;
pub use types::{Article, AreaStatistics, CovidSnapshot, NotificationDescriptor};
