//! Repeating timers for the poll loop.

use std::time::Duration;

use async_trait::async_trait;
use tokio::time::{self, Interval, MissedTickBehavior};

/// A repeating schedule. Dropping it cancels the schedule.
#[async_trait]
pub trait Ticker: Send {
    /// Wait for the next period to elapse.
    async fn tick(&mut self);
}

pub trait Clock: Send + Sync {
    /// Schedule ticks every `period`, the first one a full period from now.
    fn every(&self, period: Duration) -> Box<dyn Ticker>;
}

// ---

/// Wall-clock [`Clock`] on the tokio timer.
#[derive(Debug, Clone, Copy, Default)]
pub struct TokioClock;

struct IntervalTicker(Interval);

impl Clock for TokioClock {
    fn every(&self, period: Duration) -> Box<dyn Ticker> {
        let mut interval = time::interval_at(time::Instant::now() + period, period);
        interval.set_missed_tick_behavior(MissedTickBehavior::Delay);
        Box::new(IntervalTicker(interval))
    }
}

#[async_trait]
impl Ticker for IntervalTicker {
    async fn tick(&mut self) {
        self.0.tick().await;
    }
}
