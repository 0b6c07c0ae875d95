//! Dashboard page and its JSON view.

use axum::{
    extract::State,
    http::header,
    response::{Html, IntoResponse},
    routing::get,
    Json, Router,
};
use tracing::debug;

use super::AppState;
use crate::charts::{CONFIDENCE_CHART_ID, DETECTIONS_CHART_ID};
use crate::dom::ids;
use crate::tabs::{pane_id, tab_id, ANALYTICS_TAB, DASHBOARD_TAB, TABS};
use crate::DashboardController;

const STYLE: &str = r#"
body { font-family: system-ui, sans-serif; background: #f3f4f6; color: #1f2937; margin: 0; }
header { display: flex; gap: 1rem; align-items: center; padding: 1rem 1.5rem; background: #111827; color: #f9fafb; }
header h1 { font-size: 1.1rem; margin: 0 auto 0 0; }
main { max-width: 1100px; margin: 0 auto; padding: 1.5rem; }
form { display: inline; margin: 0; }
button { cursor: pointer; border: 0; border-radius: 0.375rem; padding: 0.5rem 1rem; font-weight: 600; }
.nav-tabs button { background: transparent; color: #d1d5db; }
.nav-tabs button.active { background: #f97316; color: #fff; }
.cards { display: grid; grid-template-columns: repeat(auto-fit, minmax(200px, 1fr)); gap: 1rem; margin-bottom: 1.5rem; }
.card { background: #fff; border-radius: 0.5rem; padding: 1rem; box-shadow: 0 1px 2px rgba(0,0,0,.06); }
.card .value { font-size: 1.75rem; font-weight: 700; }
.feed { position: relative; background: #374151; border-radius: 0.5rem; min-height: 240px; }
.feed img { width: 100%; display: block; border-radius: 0.5rem; transition: opacity .3s; }
.feed .no-signal { position: absolute; inset: 0; display: flex; align-items: center; justify-content: center; color: #f3f4f6; font-weight: 700; }
.charts { display: grid; grid-template-columns: 2fr 1fr; gap: 1rem; margin-bottom: 1.5rem; }
table { width: 100%; border-collapse: collapse; background: #fff; }
th { text-align: left; padding: 0.5rem 1rem; font-size: 0.75rem; text-transform: uppercase; color: #6b7280; }
.hidden { display: none !important; }
.opacity-0 { opacity: 0; }
.opacity-100 { opacity: 1; }
.bg-red-600 { background: #dc2626; color: #fff; }
.bg-green-600 { background: #16a34a; color: #fff; }
"#;

// ---

pub fn router() -> Router<AppState> {
    // ---
    Router::new()
        .route("/", get(page))
        .route("/api/dashboard", get(snapshot))
}

async fn page(State(state): State<AppState>) -> impl IntoResponse {
    // ---
    let html = render_page(&state.dashboard.lock(), state.refresh_secs);
    debug!("GET / - rendered {} bytes", html.len());
    ([(header::CACHE_CONTROL, "no-store")], Html(html))
}

async fn snapshot(State(state): State<AppState>) -> impl IntoResponse {
    // ---
    let snapshot = state.dashboard.lock().snapshot();
    Json(snapshot)
}

fn tab_title(tab: &str) -> &'static str {
    match tab {
        DASHBOARD_TAB => "Dashboard",
        ANALYTICS_TAB => "Analytics",
        _ => "",
    }
}

/// Whole page from the controller's current document and charts.
pub fn render_page(c: &DashboardController, refresh_secs: u64) -> String {
    // ---
    let doc = c.document();
    let nav: String = TABS
        .iter()
        .map(|tab| {
            format!(
                r#"<form method="post" action="/tabs/{tab}"><button type="submit" {attrs}>{title}</button></form>"#,
                attrs = doc.attributes_of(&tab_id(tab)),
                title = tab_title(tab),
            )
        })
        .collect();

    format!(
        r#"<!DOCTYPE html>
<html lang="en">
<head>
<meta charset="UTF-8">
<meta name="viewport" content="width=device-width, initial-scale=1.0">
<meta http-equiv="refresh" content="{refresh_secs}">
<title>Fire Detection Dashboard</title>
<style>{STYLE}</style>
</head>
<body>
<header><h1>Fire Detection Dashboard</h1><nav class="nav-tabs">{nav}</nav></header>
<main>
<section {dashboard_pane}>
  <div class="cards">
    <div class="card"><div>Active Detections</div><div class="value" {active}>{active_html}</div></div>
    <div class="card"><div>Last Detection</div><div class="value" {last}>{last_html}</div></div>
    <div class="card"><div>Total Detections</div><div class="value" {total}>{total_html}</div></div>
  </div>
  <div class="cards">
    <div class="card">
      <div class="feed"><img alt="Live feed" {video}><div class="no-signal"><span {no_signal}>NO SIGNAL</span></div></div>
      <form method="post" action="/feed/toggle"><button type="submit" {toggle}>{toggle_html}</button></form>
    </div>
    <div class="card"><div>Recent Alerts</div><div {alerts}>{alerts_html}</div></div>
  </div>
</section>
<section {analytics_pane}>
  <div class="cards">
    <div class="card"><div>Average Accuracy</div><div class="value" {accuracy}>{accuracy_html}</div></div>
    <div class="card"><div>Alerts Sent</div><div class="value" {sent}>{sent_html}</div></div>
  </div>
  <div class="charts">
    <div class="card">{detections_chart}</div>
    <div class="card">{confidence_chart}</div>
  </div>
  <table>
    <thead><tr><th>Date</th><th>Time</th><th>Confidence</th><th>Location</th><th>Status</th></tr></thead>
    <tbody {table}>{table_html}</tbody>
  </table>
</section>
</main>
</body>
</html>
"#,
        dashboard_pane = doc.attributes_of(&pane_id(DASHBOARD_TAB)),
        analytics_pane = doc.attributes_of(&pane_id(ANALYTICS_TAB)),
        active = doc.attributes_of(ids::ACTIVE_DETECTIONS),
        active_html = doc.inner_html(ids::ACTIVE_DETECTIONS),
        last = doc.attributes_of(ids::LAST_DETECTION_TIME),
        last_html = doc.inner_html(ids::LAST_DETECTION_TIME),
        total = doc.attributes_of(ids::TOTAL_DETECTIONS_DASH),
        total_html = doc.inner_html(ids::TOTAL_DETECTIONS_DASH),
        video = doc.attributes_of(ids::VIDEO_FEED),
        no_signal = doc.attributes_of(ids::NO_SIGNAL_TEXT),
        toggle = doc.attributes_of(ids::TOGGLE_FEED_BUTTON),
        toggle_html = doc.inner_html(ids::TOGGLE_FEED_BUTTON),
        alerts = doc.attributes_of(ids::RECENT_ALERTS_CONTAINER),
        alerts_html = doc.inner_html(ids::RECENT_ALERTS_CONTAINER),
        accuracy = doc.attributes_of(ids::AVG_ACCURACY),
        accuracy_html = doc.inner_html(ids::AVG_ACCURACY),
        sent = doc.attributes_of(ids::ALERTS_SENT),
        sent_html = doc.inner_html(ids::ALERTS_SENT),
        detections_chart = c.detections_chart().to_svg(DETECTIONS_CHART_ID),
        confidence_chart = c.confidence_chart().to_svg(CONFIDENCE_CHART_ID),
        table = doc.attributes_of(ids::ALL_DETECTIONS_TABLE),
        table_html = doc.inner_html(ids::ALL_DETECTIONS_TABLE),
    )
}
