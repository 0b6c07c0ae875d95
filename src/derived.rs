//! Confirmed detections derived from one status snapshot.
//!
//! The list is rebuilt from scratch for every applied poll; nothing is merged
//! or deduplicated across polls.

use chrono::NaiveDateTime;
use serde::Serialize;

use crate::models::DetectionEvent;

/// Number of alert cards shown on the summary view.
pub const RECENT_ALERT_LIMIT: usize = 5;

/// Confidence at or above which a detection counts as high confidence.
pub const HIGH_CONFIDENCE_THRESHOLD: f64 = 85.0;

// ---

/// Confirmed detections in chronological (log) order.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(transparent)]
pub struct DerivedState {
    detections: Vec<DetectionEvent>,
}

/// Two-band classification used by the proportion chart.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct ConfidenceSplit {
    pub high: u32,
    pub warning: u32,
}

impl DerivedState {
    // ---
    /// Keep only the confirmed entries of `full_log`, preserving their order.
    pub fn from_log(full_log: Vec<DetectionEvent>) -> Self {
        Self {
            detections: full_log.into_iter().filter(|d| d.is_confirmed()).collect(),
        }
    }

    pub fn len(&self) -> usize {
        self.detections.len()
    }

    pub fn is_empty(&self) -> bool {
        self.detections.is_empty()
    }

    pub fn iter(&self) -> impl DoubleEndedIterator<Item = &DetectionEvent> {
        self.detections.iter()
    }

    /// Chronologically last confirmed detection.
    pub fn last(&self) -> Option<&DetectionEvent> {
        self.detections.last()
    }

    pub fn last_detection_at(&self) -> Option<NaiveDateTime> {
        self.last().and_then(DetectionEvent::timestamp)
    }

    /// The `limit` most recent detections, newest first.
    pub fn recent(&self, limit: usize) -> impl Iterator<Item = &DetectionEvent> {
        self.detections.iter().rev().take(limit)
    }

    /// Every detection, newest first.
    pub fn newest_first(&self) -> impl Iterator<Item = &DetectionEvent> {
        self.detections.iter().rev()
    }

    pub fn mean_confidence(&self) -> Option<f64> {
        if self.detections.is_empty() {
            return None;
        }
        let total: f64 = self.detections.iter().map(|d| d.confidence).sum();
        Some(total / self.detections.len() as f64)
    }

    /// Mean confidence as shown on the analytics card, e.g. `85.0%`.
    pub fn average_accuracy(&self) -> String {
        match self.mean_confidence() {
            // Ties round up, e.g. 80.25 shows as 80.3%
            Some(mean) => {
                let shown = (mean * 10.0).round() / 10.0;
                format!("{shown:.1}%")
            }
            None => "0%".to_string(),
        }
    }

    /// Alerts are dispatched once per confirmed detection.
    pub fn alerts_sent(&self) -> usize {
        self.detections.len()
    }

    /// Detection count per calendar date, dates in first-encounter order.
    pub fn detections_by_day(&self) -> Vec<(String, u32)> {
        let mut days: Vec<(String, u32)> = Vec::new();
        for det in &self.detections {
            let date = det.date_part();
            match days.iter_mut().find(|(day, _)| day == date) {
                Some((_, count)) => *count += 1,
                None => days.push((date.to_string(), 1)),
            }
        }
        days
    }

    pub fn confidence_split(&self) -> ConfidenceSplit {
        let high = self
            .detections
            .iter()
            .filter(|d| d.confidence >= HIGH_CONFIDENCE_THRESHOLD)
            .count();
        ConfidenceSplit {
            high: high as u32,
            warning: (self.detections.len() - high) as u32,
        }
    }
}
