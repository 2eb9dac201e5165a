//! Mutable dashboard state and the operations the controller performs on it.
//!
//! Everything here runs under the single `AppState::dashboard` lock.

use chrono::{DateTime, Duration, Utc};
use covidash_core::{clock, config::DashConfig, CovidSnapshot, NewsFeed};
use covidash_data::{refresh, CaseDataSource, NewsSource};
use covidash_scheduler::{ScheduledAction, UpdateId, UpdateRequest, UpdateScheduler};
use tracing::{info, warn};

#[derive(Default)]
pub struct DashboardState {
    pub snapshot: CovidSnapshot,
    pub feed: NewsFeed,
    pub updates: UpdateScheduler,
}

/// What the user asked for in one page load.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct UpdateForm {
    pub name: String,
    pub at: String,
    pub covid: bool,
    pub news: bool,
    pub repeat: bool,
}

impl DashboardState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Rebuild the case snapshot. On failure the previous snapshot stays.
    pub async fn refresh_covid(&mut self, source: &dyn CaseDataSource, config: &DashConfig) -> bool {
        match refresh::refresh_snapshot(source, config).await {
            Ok(snapshot) => {
                self.snapshot = snapshot;
                true
            }
            Err(e) => {
                warn!(source = source.name(), error = %e, "covid refresh failed, keeping stale data");
                false
            }
        }
    }

    /// Refetch articles. On failure the current articles stay.
    pub async fn refresh_news(&mut self, source: &dyn NewsSource, config: &DashConfig) -> bool {
        match refresh::refresh_news(source, &mut self.feed, &config.news.search_terms).await {
            Ok(_) => true,
            Err(e) => {
                warn!(source = source.name(), error = %e, "news refresh failed, keeping stale articles");
                false
            }
        }
    }

    /// Initial load before serving.
    ///
    /// When the covid fetch fails the local figures are seeded from the last
    /// persisted response, if there is one.
    pub async fn startup(
        &mut self,
        cases: &dyn CaseDataSource,
        news: &dyn NewsSource,
        config: &DashConfig,
    ) {
        if !self.refresh_covid(cases, config).await {
            match refresh::snapshot_from_file(&config.covid_file_name).await {
                Ok(local) => {
                    info!(path = %config.covid_file_name, "seeded local figures from disk");
                    self.snapshot.local = local;
                }
                Err(e) => {
                    warn!(path = %config.covid_file_name, error = %e, "no persisted case data to seed from");
                }
            }
        }
        self.refresh_news(news, config).await;
    }

    /// Advance the scheduler and run the refreshes that came due.
    ///
    /// Returns the number of actions fired.
    pub async fn run_due(
        &mut self,
        now: DateTime<Utc>,
        cases: &dyn CaseDataSource,
        news: &dyn NewsSource,
        config: &DashConfig,
    ) -> usize {
        let fired = self.updates.tick(now);
        for action in &fired {
            match action {
                ScheduledAction::RefreshNews => {
                    self.refresh_news(news, config).await;
                }
                ScheduledAction::RefreshCovid => {
                    self.refresh_covid(cases, config).await;
                }
                // applied by the scheduler itself
                ScheduledAction::RemoveCompleted { .. } | ScheduledAction::RenewCycle { .. } => {}
            }
        }
        fired.len()
    }

    /// Register an update due at the next occurrence of `form.at`.
    ///
    /// A malformed time is logged and nothing is registered.
    pub fn schedule(&mut self, form: UpdateForm, now: DateTime<Utc>) -> Option<UpdateId> {
        let Some(secs) = clock::seconds_until(&form.at, now) else {
            warn!(name = %form.name, at = %form.at, "ignoring update with malformed time");
            return None;
        };
        let request = UpdateRequest {
            name: form.name,
            label: form.at,
            delay: Duration::seconds(secs),
            repeat: form.repeat,
            covid: form.covid,
            news: form.news,
        };
        Some(self.updates.register_update(request, now))
    }

    pub fn cancel(&mut self, name: &str) -> usize {
        self.updates.cancel_update(name)
    }

    pub fn dismiss(&mut self, title: &str) -> bool {
        self.feed.dismiss(title)
    }
}
