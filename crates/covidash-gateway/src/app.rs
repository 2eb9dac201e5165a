use std::sync::Arc;

use axum::{routing::get, Router};
use covidash_core::config::DashConfig;
use covidash_data::{CaseDataSource, NewsSource};

use crate::dashboard::DashboardState;

/// Central shared state, passed as `Arc<AppState>` to all handlers.
pub struct AppState {
    pub config: DashConfig,
    pub cases: Arc<dyn CaseDataSource>,
    pub news: Arc<dyn NewsSource>,
    /// Snapshot, feed and scheduler. tokio::sync::Mutex because refreshes
    /// are awaited while the lock is held.
    pub dashboard: tokio::sync::Mutex<DashboardState>,
}

impl AppState {
    pub fn new(
        config: DashConfig,
        cases: Arc<dyn CaseDataSource>,
        news: Arc<dyn NewsSource>,
        dashboard: DashboardState,
    ) -> Self {
        Self {
            config,
            cases,
            news,
            dashboard: tokio::sync::Mutex::new(dashboard),
        }
    }
}

/// Assemble the Axum router.
pub fn build_router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/", get(crate::http::dashboard::dashboard_handler))
        .route("/index", get(crate::http::dashboard::dashboard_handler))
        .route("/health", get(crate::http::health::health_handler))
        .with_state(state)
        .layer(tower_http::trace::TraceLayer::new_for_http())
}
