use std::collections::BTreeMap;

use async_trait::async_trait;
use covidash_core::Article;

use crate::csv::{convert_csv_to_dict, split_lines, CaseRecord};
use crate::error::Result;

/// A case-data response in both shapes the dashboard needs.
#[derive(Debug, Clone, Default)]
pub struct CaseData {
    /// Raw lines, header included; input to the statistics extractor.
    pub lines: Vec<String>,
    /// Records keyed by reporting date.
    pub by_date: BTreeMap<String, CaseRecord>,
}

impl CaseData {
    pub fn from_csv(text: &str) -> Self {
        Self {
            lines: split_lines(text),
            by_date: convert_csv_to_dict(text),
        }
    }
}

/// Provider of per-area case data as CSV text.
#[async_trait]
pub trait CaseDataSource: Send + Sync {
    /// Short identifier used in log fields.
    fn name(&self) -> &str;

    /// Fetch the raw CSV export for an area.
    async fn fetch_csv(&self, area_name: &str, area_type: &str) -> Result<String>;

    /// Fetch and parse in one step.
    async fn fetch_case_data(&self, area_name: &str, area_type: &str) -> Result<CaseData> {
        let text = self.fetch_csv(area_name, area_type).await?;
        Ok(CaseData::from_csv(&text))
    }
}

/// Provider of news articles.
#[async_trait]
pub trait NewsSource: Send + Sync {
    fn name(&self) -> &str;

    /// Fetch articles matching `search_terms`, unfiltered.
    async fn fetch_articles(&self, search_terms: &str) -> Result<Vec<Article>>;
}
