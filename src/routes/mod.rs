use axum::Router;

use crate::{Refresher, SharedDashboard};

mod controls;
mod dashboard;
mod health;

// ---

/// State shared by every dashboard route.
#[derive(Debug, Clone)]
pub struct AppState {
    pub dashboard: SharedDashboard,
    pub refresher: Refresher,
    /// Seconds between page reloads, matching the poll cadence.
    pub refresh_secs: u64,
}

pub fn router(state: AppState) -> Router {
    // ---
    Router::new()
        .merge(dashboard::router())
        .merge(controls::router())
        .merge(health::router())
        .with_state(state)
}
