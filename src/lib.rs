//! Fire detection dashboard.
//!
//! Polls the detection backend's status endpoint, derives the confirmed
//! detections, and keeps a server-side mirror of the dashboard page (counters,
//! alert list, analytics table, two charts, feed toggle and tabs) that the
//! `routes` gateway serves over HTTP.
//!
//! Module layout follows the Explicit Module Boundary Pattern (EMBP): each
//! module exposes a small surface and siblings reach each other through the
//! re-exports below.

pub mod charts;
pub mod client;
pub mod clock;
pub mod config;
pub mod controller;
pub mod derived;
pub mod dom;
pub mod feed;
pub mod models;
pub mod poller;
pub mod render;
pub mod routes;
pub mod tabs;

pub use client::{HttpStatusClient, PollError, StatusClient};
pub use clock::{Clock, Ticker, TokioClock};
pub use config::Config;
pub use controller::{DashboardController, DashboardSnapshot, PollOutcome, SharedDashboard};
pub use derived::DerivedState;
pub use feed::{FeedSources, FeedState};
pub use models::{DetectionEvent, StatusSnapshot};
pub use poller::{poll_once, PollerHandle, Refresher};
pub use routes::AppState;
