use std::sync::Arc;

use axum::extract::State;
use axum::http::StatusCode;
use axum::response::Html;
use axum::routing::get;
use axum::Router;
use tracing::info;

use crate::config::DashboardConfig;
use crate::dashboard::render::render_error;
use crate::dashboard::render_dashboard;
use crate::error::DashboardError;

/// Shared, read-only server state.
pub struct DashboardState {
    pub config: DashboardConfig,
}

/// Creates the dashboard router: a single `GET /`.
pub fn create_router(state: Arc<DashboardState>) -> Router {
    Router::new()
        .route("/", get(get_dashboard))
        .with_state(state)
}

/// GET /
/// Always 200; missing or broken data is reported in the page body.
pub async fn get_dashboard(State(s): State<Arc<DashboardState>>) -> (StatusCode, Html<String>) {
    info!("GET /");
    let state = Arc::clone(&s);
    let html = tokio::task::spawn_blocking(move || render_dashboard(&state.config))
        .await
        .unwrap_or_else(|e| {
            render_error(&DashboardError::Unreadable {
                reason: e.to_string(),
            })
        });
    (StatusCode::OK, Html(html))
}
