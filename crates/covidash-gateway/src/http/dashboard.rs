//! The dashboard page: GET / and GET /index
//!
//! Every load first runs whatever scheduled work has come due, then applies
//! the form parameters below, then renders.
//!
//! | Param         | Effect                                               |
//! |---------------|------------------------------------------------------|
//! | `two`         | label of a new update (needs `update`)               |
//! | `update`      | `HH:MM` the new update fires at                      |
//! | `covid-data`  | checkbox: the update refreshes case data             |
//! | `news`        | checkbox: the update refreshes news                  |
//! | `repeat`      | checkbox: the update repeats every 24 h              |
//! | `update_item` | cancel every update with this label                  |
//! | `notif`       | dismiss the article with this title                  |
//!
//! Each mutation is best-effort; the page always renders.

use axum::{
    extract::{rejection::QueryRejection, Query, State},
    response::Html,
};
use chrono::{DateTime, Utc};
use serde::Deserialize;
use std::sync::Arc;
use tracing::{debug, warn};

use crate::{
    app::AppState,
    dashboard::{DashboardState, UpdateForm},
    render::{render_page, PageView},
};

#[derive(Debug, Default, Deserialize)]
pub struct DashboardQuery {
    pub notif: Option<String>,
    pub update: Option<String>,
    pub two: Option<String>,
    #[serde(rename = "covid-data")]
    pub covid_data: Option<String>,
    pub news: Option<String>,
    pub repeat: Option<String>,
    pub update_item: Option<String>,
}

pub async fn dashboard_handler(
    State(state): State<Arc<AppState>>,
    query: Result<Query<DashboardQuery>, QueryRejection>,
) -> Html<String> {
    let query = match query {
        Ok(Query(q)) => q,
        Err(e) => {
            warn!("ignoring unparseable query: {e}");
            DashboardQuery::default()
        }
    };
    let now = Utc::now();

    let mut dashboard = state.dashboard.lock().await;
    let fired = dashboard
        .run_due(now, state.cases.as_ref(), state.news.as_ref(), &state.config)
        .await;
    if fired > 0 {
        debug!(fired, "ran due scheduled actions");
    }

    apply_query(&mut dashboard, query, now);

    let updates = dashboard.updates.notifications();
    Html(render_page(&PageView {
        location: &state.config.area_name,
        nation: &state.config.nation_name,
        snapshot: &dashboard.snapshot,
        articles: dashboard.feed.articles(),
        updates: &updates,
    }))
}

/// Register, then cancel, then dismiss; each step independent of the others.
fn apply_query(dashboard: &mut DashboardState, query: DashboardQuery, now: DateTime<Utc>) {
    if let (Some(name), Some(at)) = (query.two, query.update) {
        let form = UpdateForm {
            name,
            at,
            covid: query.covid_data.is_some(),
            news: query.news.is_some(),
            repeat: query.repeat.is_some(),
        };
        dashboard.schedule(form, now);
    }

    if let Some(name) = query.update_item {
        let removed = dashboard.cancel(&name);
        debug!(%name, removed, "update_item handled");
    }

    if let Some(title) = query.notif {
        if !dashboard.dismiss(&title) {
            debug!(%title, "dismiss for article not shown");
        }
    }
}
