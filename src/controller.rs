//! The dashboard controller: derived detections, page mirror, charts, feed
//! and tabs, owned by one struct and mutated only through its methods.

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use chrono::{DateTime, NaiveDateTime, Utc};
use serde::Serialize;
use tracing::debug;

use crate::charts::{self, Chart};
use crate::derived::{DerivedState, RECENT_ALERT_LIMIT};
use crate::dom::{ids, Document};
use crate::feed::{Feed, FeedSources, FeedState};
use crate::models::StatusSnapshot;
use crate::render;
use crate::tabs::{self, UnknownTab, ANALYTICS_TAB, DASHBOARD_TAB};

/// Result of handing a fetched snapshot to the controller.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PollOutcome {
    Applied { seq: u64 },
    /// A newer poll had already been applied; the snapshot was dropped.
    Stale { seq: u64, applied: u64 },
}

/// Owned copy of everything the page shows, for the JSON view.
#[derive(Debug, Clone, Serialize)]
pub struct DashboardSnapshot {
    pub document: Document,
    pub detections: DerivedState,
    pub detections_chart: Chart,
    pub confidence_chart: Chart,
    pub feed: FeedState,
    pub applied_poll: u64,
    pub last_updated: Option<DateTime<Utc>>,
    pub last_detection_at: Option<NaiveDateTime>,
}

// ---

#[derive(Debug)]
pub struct DashboardController {
    document: Document,
    detections: DerivedState,
    detections_chart: Chart,
    confidence_chart: Chart,
    feed: Feed,
    issued_seq: u64,
    applied_seq: u64,
    last_updated: Option<DateTime<Utc>>,
}

impl DashboardController {
    // ---
    /// Controller showing the empty state, dashboard tab active, feed running.
    pub fn new(sources: FeedSources) -> Self {
        let mut controller = Self {
            document: Document::new(),
            detections: DerivedState::default(),
            detections_chart: Chart::detections_timeline(),
            confidence_chart: Chart::confidence_doughnut(),
            feed: Feed::new(sources),
            issued_seq: 0,
            applied_seq: 0,
            last_updated: None,
        };
        // DASHBOARD_TAB is always in the tab set
        tabs::activate(&mut controller.document, DASHBOARD_TAB).ok();
        controller.feed.start(&mut controller.document);
        controller.update_dashboard(false);
        controller.update_analytics();
        controller
    }

    /// Reserve the sequence number for a poll about to be issued.
    pub fn begin_poll(&mut self) -> u64 {
        self.issued_seq += 1;
        self.issued_seq
    }

    /// Apply the snapshot fetched by poll `seq`, unless a newer one already was.
    pub fn apply(&mut self, seq: u64, snapshot: StatusSnapshot) -> PollOutcome {
        // ---
        if seq <= self.applied_seq {
            debug!(
                "Dropping stale status from poll #{} (poll #{} already applied)",
                seq, self.applied_seq
            );
            return PollOutcome::Stale {
                seq,
                applied: self.applied_seq,
            };
        }

        self.applied_seq = seq;
        self.last_updated = Some(Utc::now());
        self.detections = DerivedState::from_log(snapshot.full_log);
        self.update_dashboard(snapshot.alarm_active);
        if self.analytics_visible() {
            self.update_analytics();
        }
        PollOutcome::Applied { seq }
    }

    /// Summary view: live alarm flag, totals and the most recent alerts.
    pub fn update_dashboard(&mut self, alarm_active: bool) {
        // ---
        let doc = &mut self.document;
        doc.element_mut(ids::ACTIVE_DETECTIONS)
            .set_text(if alarm_active { "1" } else { "0" });
        doc.element_mut(ids::TOTAL_DETECTIONS_DASH)
            .set_text(self.detections.len().to_string());

        match self.detections.last() {
            Some(last) => {
                doc.element_mut(ids::LAST_DETECTION_TIME).set_text(last.time_part());
                let cards: String = self
                    .detections
                    .recent(RECENT_ALERT_LIMIT)
                    .map(render::alert_card)
                    .collect();
                doc.element_mut(ids::RECENT_ALERTS_CONTAINER).set_html(cards);
            }
            None => {
                doc.element_mut(ids::LAST_DETECTION_TIME).set_text("N/A");
                doc.element_mut(ids::RECENT_ALERTS_CONTAINER)
                    .set_html(render::NO_DETECTIONS);
            }
        }
    }

    /// Analytics view: accuracy, alert count, full table, then charts.
    pub fn update_analytics(&mut self) {
        // ---
        let doc = &mut self.document;
        doc.element_mut(ids::AVG_ACCURACY)
            .set_text(self.detections.average_accuracy());
        doc.element_mut(ids::ALERTS_SENT)
            .set_text(self.detections.alerts_sent().to_string());

        let table = if self.detections.is_empty() {
            render::NO_DATA_ROW.to_string()
        } else {
            self.detections
                .newest_first()
                .map(render::detection_row)
                .collect()
        };
        doc.element_mut(ids::ALL_DETECTIONS_TABLE).set_html(table);

        self.update_charts();
    }

    pub fn update_charts(&mut self) {
        charts::refresh_charts(
            &self.detections,
            &mut self.detections_chart,
            &mut self.confidence_chart,
        );
    }

    pub fn toggle_feed(&mut self) -> FeedState {
        self.feed.toggle(&mut self.document)
    }

    /// Switch tabs. Returns `true` when the caller should poll right away.
    pub fn activate_tab(&mut self, tab: &str) -> Result<bool, UnknownTab> {
        tabs::activate(&mut self.document, tab)?;
        Ok(tab == ANALYTICS_TAB)
    }

    pub fn analytics_visible(&self) -> bool {
        tabs::is_visible(&self.document, ANALYTICS_TAB)
    }

    pub fn document(&self) -> &Document {
        &self.document
    }

    pub fn detections(&self) -> &DerivedState {
        &self.detections
    }

    pub fn detections_chart(&self) -> &Chart {
        &self.detections_chart
    }

    pub fn confidence_chart(&self) -> &Chart {
        &self.confidence_chart
    }

    pub fn feed_state(&self) -> FeedState {
        self.feed.state()
    }

    pub fn applied_seq(&self) -> u64 {
        self.applied_seq
    }

    pub fn snapshot(&self) -> DashboardSnapshot {
        DashboardSnapshot {
            document: self.document.clone(),
            detections: self.detections.clone(),
            detections_chart: self.detections_chart.clone(),
            confidence_chart: self.confidence_chart.clone(),
            feed: self.feed.state(),
            applied_poll: self.applied_seq,
            last_updated: self.last_updated,
            last_detection_at: self.detections.last_detection_at(),
        }
    }
}

/// Controller handle shared by the poll loop and the HTTP handlers.
///
/// The lock is never held across an await point, so every update lands
/// atomically with respect to readers.
#[derive(Debug, Clone)]
pub struct SharedDashboard(Arc<Mutex<DashboardController>>);

impl SharedDashboard {
    // ---
    pub fn new(controller: DashboardController) -> Self {
        Self(Arc::new(Mutex::new(controller)))
    }

    pub fn lock(&self) -> MutexGuard<'_, DashboardController> {
        self.0.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

#[cfg(test)]
mod tests {
    // ---
    use super::*;
    use crate::models::DetectionEvent;

    fn controller() -> DashboardController {
        // ---
        DashboardController::new(FeedSources {
            live_url: "http://camera.local:5000/video_feed".to_string(),
            no_signal_url: "https://placehold.co/600x400?text=NO+SIGNAL".to_string(),
        })
    }

    fn snapshot(alarm_active: bool, rows: &[(&str, f64, &str)]) -> StatusSnapshot {
        // ---
        StatusSnapshot {
            alarm_active,
            full_log: rows
                .iter()
                .map(|(time, confidence, status)| DetectionEvent {
                    time: time.to_string(),
                    confidence: *confidence,
                    gps: "26.4567°N, 88.4567°E".to_string(),
                    status: status.to_string(),
                })
                .collect(),
        }
    }

    #[test]
    fn test_initial_page_is_empty_state() {
        // ---
        let c = controller();
        let doc = c.document();
        assert_eq!(doc.inner_html(ids::ACTIVE_DETECTIONS), "0");
        assert_eq!(doc.inner_html(ids::TOTAL_DETECTIONS_DASH), "0");
        assert_eq!(doc.inner_html(ids::LAST_DETECTION_TIME), "N/A");
        assert_eq!(doc.inner_html(ids::RECENT_ALERTS_CONTAINER), render::NO_DETECTIONS);
        assert_eq!(doc.inner_html(ids::AVG_ACCURACY), "0%");
        assert_eq!(doc.inner_html(ids::ALL_DETECTIONS_TABLE), render::NO_DATA_ROW);
        assert_eq!(c.feed_state(), FeedState::Running);
        assert!(!c.analytics_visible());
        assert!(tabs::is_visible(doc, DASHBOARD_TAB));
        assert!(doc.has_class("tab-dashboard", "active"));
    }

    #[test]
    fn test_apply_updates_summary_view() {
        // ---
        let mut c = controller();
        let seq = c.begin_poll();
        let outcome = c.apply(
            seq,
            snapshot(
                true,
                &[
                    ("2024-01-01 10:00:00", 90.0, "Active"),
                    ("2024-01-01 10:05:00", 0.0, "Cleared"),
                    ("2024-01-01 11:30:15", 70.0, "Active"),
                ],
            ),
        );

        assert_eq!(outcome, PollOutcome::Applied { seq: 1 });
        let doc = c.document();
        assert_eq!(doc.inner_html(ids::ACTIVE_DETECTIONS), "1");
        assert_eq!(doc.inner_html(ids::TOTAL_DETECTIONS_DASH), "2");
        assert_eq!(doc.inner_html(ids::LAST_DETECTION_TIME), "11:30:15");
        let alerts = doc.inner_html(ids::RECENT_ALERTS_CONTAINER);
        assert_eq!(alerts.matches("FIRE ALERT").count(), 2);
        assert!(alerts.find("70% Confidence") < alerts.find("90% Confidence"));
    }

    #[test]
    fn test_alarm_flag_and_totals_are_independent() {
        // ---
        let mut c = controller();
        let seq = c.begin_poll();
        c.apply(seq, snapshot(false, &[("2024-01-01 10:00:00", 90.0, "Active")]));
        assert_eq!(c.document().inner_html(ids::ACTIVE_DETECTIONS), "0");
        assert_eq!(c.document().inner_html(ids::TOTAL_DETECTIONS_DASH), "1");
    }

    #[test]
    fn test_analytics_only_refreshes_when_visible() {
        // ---
        let mut c = controller();
        let rows = [("2024-01-01 10:00:00", 80.0, "Active"), ("2024-01-02 10:00:00", 90.0, "Active")];

        let seq = c.begin_poll();
        c.apply(seq, snapshot(false, &rows));
        assert_eq!(c.document().inner_html(ids::AVG_ACCURACY), "0%");
        let revision = c.detections_chart().revision;

        assert_eq!(c.activate_tab(ANALYTICS_TAB), Ok(true));
        let seq = c.begin_poll();
        c.apply(seq, snapshot(false, &rows));

        let doc = c.document();
        assert_eq!(doc.inner_html(ids::AVG_ACCURACY), "85.0%");
        assert_eq!(doc.inner_html(ids::ALERTS_SENT), "2");
        let table = doc.inner_html(ids::ALL_DETECTIONS_TABLE);
        assert!(table.find("2024-01-02") < table.find("2024-01-01"));
        assert_eq!(c.detections_chart().revision, revision + 1);
        assert_eq!(c.detections_chart().labels, ["2024-01-01", "2024-01-02"]);
        assert_eq!(c.confidence_chart().dataset.data, [1, 1]);
    }

    #[test]
    fn test_empty_log_zeroes_analytics() {
        // ---
        let mut c = controller();
        c.activate_tab(ANALYTICS_TAB).unwrap();
        let seq = c.begin_poll();
        c.apply(seq, snapshot(true, &[("2024-01-01 10:00:00", 99.0, "Active")]));
        let seq = c.begin_poll();
        c.apply(seq, snapshot(false, &[("2024-01-01 10:05:00", 0.0, "Cleared")]));

        assert_eq!(c.document().inner_html(ids::AVG_ACCURACY), "0%");
        assert_eq!(c.document().inner_html(ids::ALERTS_SENT), "0");
        assert!(c.detections_chart().dataset.data.is_empty());
        assert_eq!(c.confidence_chart().dataset.data, [0, 0]);
    }

    #[test]
    fn test_stale_snapshot_is_dropped() {
        // ---
        let mut c = controller();
        let slow = c.begin_poll();
        let fast = c.begin_poll();

        c.apply(fast, snapshot(true, &[("2024-01-02 09:00:00", 95.0, "Active")]));
        let before = c.document().clone();

        let outcome = c.apply(slow, snapshot(false, &[]));
        assert_eq!(outcome, PollOutcome::Stale { seq: 1, applied: 2 });
        assert_eq!(c.document(), &before);
        assert_eq!(c.detections().len(), 1);
        assert_eq!(c.applied_seq(), 2);
    }

    #[test]
    fn test_recent_alerts_cap_at_five() {
        // ---
        let mut c = controller();
        let times: Vec<String> = (1..=7).map(|i| format!("2024-01-01 10:00:0{i}")).collect();
        let rows: Vec<(&str, f64, &str)> = times
            .iter()
            .enumerate()
            .map(|(i, t)| (t.as_str(), 60.0 + i as f64, "Active"))
            .collect();

        let seq = c.begin_poll();
        c.apply(seq, snapshot(true, &rows));

        let alerts = c.document().inner_html(ids::RECENT_ALERTS_CONTAINER);
        assert_eq!(alerts.matches("FIRE ALERT").count(), 5);
        assert!(!alerts.contains("10:00:01"));
        assert!(!alerts.contains("10:00:02"));
        assert!(alerts.find("10:00:07") < alerts.find("10:00:03"));
    }
}
