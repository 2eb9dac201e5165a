use std::path::Path;

use covidash_core::{config::DashConfig, AreaStatistics, CovidSnapshot, NewsFeed};
use tracing::{info, warn};

use crate::csv::{parse_csv_file, split_lines};
use crate::error::Result;
use crate::source::{CaseDataSource, NewsSource};
use crate::stats::{extract_statistics, Layout};

/// Area type used for the national column.
pub const NATION_AREA_TYPE: &str = "nation";

/// Fetch local and national case data and build a fresh snapshot.
///
/// The raw local response is written to `config.covid_file_name` so the next
/// start can seed from it; a failed write is logged and otherwise ignored.
/// Nothing is returned unless both fetches succeed.
pub async fn refresh_snapshot(
    source: &dyn CaseDataSource,
    config: &DashConfig,
) -> Result<CovidSnapshot> {
    let local_csv = source
        .fetch_csv(&config.area_name, &config.location_type)
        .await?;
    if let Err(e) = tokio::fs::write(&config.covid_file_name, &local_csv).await {
        warn!(path = %config.covid_file_name, error = %e, "could not persist raw case data");
    }

    let national_csv = source
        .fetch_csv(&config.nation_name, NATION_AREA_TYPE)
        .await?;

    let snapshot = CovidSnapshot {
        local: extract_statistics(&split_lines(&local_csv), Layout::Local),
        national: extract_statistics(&split_lines(&national_csv), Layout::National),
    };
    info!(
        source = source.name(),
        local_cases = snapshot.local.cases_7_day,
        national_cases = snapshot.national.cases_7_day,
        "covid snapshot refreshed"
    );
    Ok(snapshot)
}

/// Local statistics from a previously persisted raw response.
pub async fn snapshot_from_file(path: impl AsRef<Path>) -> Result<AreaStatistics> {
    let lines = parse_csv_file(path).await?;
    Ok(extract_statistics(&lines, Layout::Local))
}

/// Fetch articles and hand them to `feed`, which filters dismissed ones.
///
/// Returns the number of articles now shown.
pub async fn refresh_news(
    source: &dyn NewsSource,
    feed: &mut NewsFeed,
    search_terms: &str,
) -> Result<usize> {
    let articles = source.fetch_articles(search_terms).await?;
    feed.replace(articles);
    info!(source = source.name(), shown = feed.articles().len(), "news refreshed");
    Ok(feed.articles().len())
}
