//! `covidash-data`: case-data and news providers, CSV parsing, and the
//! statistics extractor.
//!
//! # Pipeline
//!
//! ```text
//! CaseDataSource::fetch_csv ──► raw CSV lines ──► stats::extract_statistics ──► AreaStatistics
//!                          └──► csv::convert_csv_to_dict ──► BTreeMap<date, CaseRecord>
//! NewsSource::fetch_articles ──► Vec<Article>
//! ```
//!
//! Both sources are traits so the gateway can be exercised against fakes.

pub mod csv;
pub mod error;
pub mod newsapi;
pub mod refresh;
pub mod source;
pub mod stats;
pub mod ukhsa;

pub use error::{FetchError, Result};
pub use newsapi::NewsApiClient;
pub use refresh::{refresh_news, refresh_snapshot, snapshot_from_file};
pub use source::{CaseData, CaseDataSource, NewsSource};
pub use stats::{extract_statistics, Layout};
pub use ukhsa::UkhsaClient;
