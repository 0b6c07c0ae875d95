//! Data models for the upstream status feed.

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

/// Status value the backend writes when a fire is confirmed.
pub const CONFIRMED_STATUS: &str = "Active";

/// Layout of [`DetectionEvent::time`].
pub const TIME_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

// ---

/// One entry of the backend's detection log
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct DetectionEvent {
    // ---
    /// Local wall-clock time, `YYYY-MM-DD HH:MM:SS`.
    pub time: String,
    pub confidence: f64,
    pub gps: String,
    pub status: String,
}

/// Body of `GET /api/status`
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct StatusSnapshot {
    // ---
    pub alarm_active: bool,
    pub full_log: Vec<DetectionEvent>,
}

impl DetectionEvent {
    // ---
    pub fn is_confirmed(&self) -> bool {
        self.status == CONFIRMED_STATUS
    }

    /// Date portion of `time`. The whole string when it has no space.
    pub fn date_part(&self) -> &str {
        self.split_time().0
    }

    /// Time-of-day portion of `time`. Empty when it has no space.
    pub fn time_part(&self) -> &str {
        self.split_time().1
    }

    /// Parsed timestamp, if `time` follows [`TIME_FORMAT`].
    pub fn timestamp(&self) -> Option<NaiveDateTime> {
        NaiveDateTime::parse_from_str(&self.time, TIME_FORMAT).ok()
    }

    fn split_time(&self) -> (&str, &str) {
        self.time.split_once(' ').unwrap_or((self.time.as_str(), ""))
    }
}
