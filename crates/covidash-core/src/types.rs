use serde::{Deserialize, Serialize};

/// Three headline figures for one area.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AreaStatistics {
    /// Sum of new cases over the 7-day window.
    pub cases_7_day: u64,
    /// Latest reported hospital occupancy.
    pub hospital_cases: u64,
    /// Latest reported cumulative deaths.
    pub cumulative_deaths: u64,
}

/// Everything the dashboard shows about case data.
///
/// Replaced wholesale on every refresh; never merged field by field.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CovidSnapshot {
    pub local: AreaStatistics,
    pub national: AreaStatistics,
}

/// A user-visible toast describing a scheduled update.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NotificationDescriptor {
    pub title: String,
    pub content: String,
}

impl NotificationDescriptor {
    /// Build the toast text for an update.
    ///
    /// `at` is the label the user typed (e.g. `"10:30"`); it is shown verbatim.
    pub fn for_update(title: &str, at: &str, covid: bool, news: bool, repeat: bool) -> Self {
        let what = match (covid, news) {
            (true, true) => "covid and news",
            (true, false) => "covid",
            (false, true) => "news",
            (false, false) => "nothing",
        };
        let prefix = if repeat { "REPEATING: " } else { "" };
        Self {
            title: title.to_string(),
            content: format!("{prefix}Updating {what} at {at}"),
        }
    }
}

/// One article from the news provider.
///
/// Only `title` is guaranteed; the provider omits the rest freely.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Article {
    pub title: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub content: Option<String>,
    #[serde(default)]
    pub url: Option<String>,
    #[serde(default)]
    pub published_at: Option<String>,
    #[serde(default)]
    pub source: Option<ArticleSource>,
}

impl Article {
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            description: None,
            content: None,
            url: None,
            published_at: None,
            source: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ArticleSource {
    #[serde(default)]
    pub id: Option<String>,
    #[serde(default)]
    pub name: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn descriptor_text_per_selection() {
        let d = NotificationDescriptor::for_update("morning", "9:30", true, true, false);
        assert_eq!(d.title, "morning");
        assert_eq!(d.content, "Updating covid and news at 9:30");

        let d = NotificationDescriptor::for_update("m", "9:30", true, false, true);
        assert_eq!(d.content, "REPEATING: Updating covid at 9:30");

        let d = NotificationDescriptor::for_update("m", "9:30", false, true, false);
        assert_eq!(d.content, "Updating news at 9:30");

        let d = NotificationDescriptor::for_update("m", "9:30", false, false, true);
        assert_eq!(d.content, "REPEATING: Updating nothing at 9:30");
    }

    #[test]
    fn article_tolerates_sparse_provider_json() {
        let json = r#"{"title":"Cases rise","publishedAt":"2021-10-28T09:00:00Z","source":{"id":null,"name":"BBC"}}"#;
        let a: Article = serde_json::from_str(json).unwrap();
        assert_eq!(a.title, "Cases rise");
        assert_eq!(a.published_at.as_deref(), Some("2021-10-28T09:00:00Z"));
        assert_eq!(a.source.and_then(|s| s.name).as_deref(), Some("BBC"));
        assert!(a.content.is_none());
    }
}
