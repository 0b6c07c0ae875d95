//! User actions: feed toggle and tab switching.
//!
//! Both answer with a redirect back to the page so plain HTML forms drive
//! them.

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Redirect, Response},
    routing::post,
    Router,
};
use tracing::{info, warn};

use super::AppState;

// ---

pub fn router() -> Router<AppState> {
    // ---
    Router::new()
        .route("/feed/toggle", post(toggle_feed))
        .route("/tabs/{tab}", post(activate_tab))
}

async fn toggle_feed(State(state): State<AppState>) -> Redirect {
    // ---
    let feed = state.dashboard.lock().toggle_feed();
    info!("POST /feed/toggle - feed is now {:?}", feed);
    Redirect::to("/")
}

async fn activate_tab(Path(tab): Path<String>, State(state): State<AppState>) -> Response {
    // ---
    let activated = state.dashboard.lock().activate_tab(&tab);
    match activated {
        Ok(refresh_now) => {
            info!("POST /tabs/{} - tab activated", tab);
            if refresh_now {
                state.refresher.refresh();
            }
            Redirect::to("/").into_response()
        }
        Err(e) => {
            warn!("POST /tabs/{} - {}", tab, e);
            (StatusCode::NOT_FOUND, e.to_string()).into_response()
        }
    }
}
