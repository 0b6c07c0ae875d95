//! Status polling loop.
//!
//! One poll is issued at start-up, one per clock tick and one per explicit
//! refresh request. Ticks never wait for an in-flight request: polls may
//! overlap, and the controller's sequence check keeps only the newest
//! result. Shutting the poller down stops the schedule and aborts whatever
//! is still in flight.

use std::{sync::Arc, time::Duration};

use tokio::{
    sync::{watch, Notify},
    task::{JoinHandle, JoinSet},
};
use tracing::{debug, info, warn};

use crate::client::{PollError, StatusClient};
use crate::clock::{Clock, Ticker};
use crate::controller::{PollOutcome, SharedDashboard};

/// Fetch one snapshot and hand it to the controller.
///
/// On error the controller is left exactly as it was.
pub async fn poll_once(
    shared: &SharedDashboard,
    client: &dyn StatusClient,
) -> Result<PollOutcome, PollError> {
    // ---
    let seq = shared.lock().begin_poll();
    let snapshot = client.fetch_status().await?;
    Ok(shared.lock().apply(seq, snapshot))
}

/// Cloneable trigger for an out-of-cadence poll.
#[derive(Debug, Clone)]
pub struct Refresher(Arc<Notify>);

impl Refresher {
    // ---
    pub fn refresh(&self) {
        self.0.notify_one();
    }
}

/// Owner of the running poll loop.
#[derive(Debug)]
pub struct PollerHandle {
    refresh: Refresher,
    shutdown: watch::Sender<bool>,
    task: JoinHandle<()>,
}

impl PollerHandle {
    // ---
    pub fn refresher(&self) -> Refresher {
        self.refresh.clone()
    }

    /// Request a poll now, outside the regular cadence.
    pub fn refresh(&self) {
        self.refresh.refresh();
    }

    /// Stop the schedule, abort in-flight polls and wait for the loop to exit.
    pub async fn shutdown(self) {
        let _ = self.shutdown.send(true);
        if let Err(e) = self.task.await {
            warn!("Status poller ended abnormally: {}", e);
        }
    }
}

/// Start polling `client` every `period` on the current tokio runtime.
pub fn spawn(
    shared: SharedDashboard,
    client: Arc<dyn StatusClient>,
    clock: &dyn Clock,
    period: Duration,
) -> PollerHandle {
    // ---
    let refresh = Arc::new(Notify::new());
    let (shutdown_tx, shutdown_rx) = watch::channel(false);
    let ticker = clock.every(period);

    info!("Polling status every {} ms", period.as_millis());
    let task = tokio::spawn(run(shared, client, ticker, refresh.clone(), shutdown_rx));

    PollerHandle {
        refresh: Refresher(refresh),
        shutdown: shutdown_tx,
        task,
    }
}

async fn run(
    shared: SharedDashboard,
    client: Arc<dyn StatusClient>,
    mut ticker: Box<dyn Ticker>,
    refresh: Arc<Notify>,
    mut shutdown: watch::Receiver<bool>,
) {
    // ---
    let mut in_flight = JoinSet::new();
    in_flight.spawn(poll_and_log(shared.clone(), client.clone()));

    loop {
        tokio::select! {
            biased;
            _ = shutdown.changed() => break,
            _ = ticker.tick() => {
                in_flight.spawn(poll_and_log(shared.clone(), client.clone()));
            }
            _ = refresh.notified() => {
                debug!("Immediate status refresh requested");
                in_flight.spawn(poll_and_log(shared.clone(), client.clone()));
            }
            Some(_) = in_flight.join_next(), if !in_flight.is_empty() => {}
        }
    }

    in_flight.abort_all();
    info!("Status poller stopped");
}

async fn poll_and_log(shared: SharedDashboard, client: Arc<dyn StatusClient>) {
    // ---
    match poll_once(&shared, client.as_ref()).await {
        Ok(PollOutcome::Applied { seq }) => debug!("Applied status from poll #{}", seq),
        Ok(PollOutcome::Stale { .. }) => {}
        Err(e) => warn!("Error fetching status data: {}", e),
    }
}

#[cfg(test)]
mod tests {
    // ---
    use std::collections::VecDeque;
    use std::sync::Mutex;

    use async_trait::async_trait;
    use reqwest::StatusCode;
    use tokio::sync::{mpsc, oneshot};

    use super::*;
    use crate::controller::DashboardController;
    use crate::dom::ids;
    use crate::feed::FeedSources;
    use crate::models::{DetectionEvent, StatusSnapshot};

    struct ManualClock(Mutex<Option<mpsc::UnboundedReceiver<()>>>);

    struct ManualTicker(mpsc::UnboundedReceiver<()>);

    impl Clock for ManualClock {
        fn every(&self, _period: Duration) -> Box<dyn Ticker> {
            let rx = self.0.lock().unwrap().take().expect("clock used twice");
            Box::new(ManualTicker(rx))
        }
    }

    #[async_trait]
    impl Ticker for ManualTicker {
        async fn tick(&mut self) {
            if self.0.recv().await.is_none() {
                std::future::pending::<()>().await;
            }
        }
    }

    fn manual_clock() -> (ManualClock, mpsc::UnboundedSender<()>) {
        // ---
        let (tx, rx) = mpsc::unbounded_channel();
        (ManualClock(Mutex::new(Some(rx))), tx)
    }

    /// Answers from a script, then keeps failing with 503.
    struct ScriptedClient {
        replies: Mutex<VecDeque<Result<StatusSnapshot, PollError>>>,
        calls: Mutex<usize>,
    }

    impl ScriptedClient {
        fn new(replies: Vec<Result<StatusSnapshot, PollError>>) -> Self {
            Self {
                replies: Mutex::new(replies.into()),
                calls: Mutex::new(0),
            }
        }

        fn calls(&self) -> usize {
            *self.calls.lock().unwrap()
        }
    }

    #[async_trait]
    impl StatusClient for ScriptedClient {
        async fn fetch_status(&self) -> Result<StatusSnapshot, PollError> {
            *self.calls.lock().unwrap() += 1;
            self.replies
                .lock()
                .unwrap()
                .pop_front()
                .unwrap_or(Err(PollError::Status(StatusCode::SERVICE_UNAVAILABLE)))
        }
    }

    /// Each call waits until the test releases its snapshot.
    struct GatedClient {
        gates: Mutex<VecDeque<oneshot::Receiver<StatusSnapshot>>>,
        issued: Mutex<usize>,
    }

    #[async_trait]
    impl StatusClient for GatedClient {
        async fn fetch_status(&self) -> Result<StatusSnapshot, PollError> {
            let gate = self.gates.lock().unwrap().pop_front().expect("unexpected poll");
            *self.issued.lock().unwrap() += 1;
            Ok(gate.await.expect("gate dropped"))
        }
    }

    fn shared() -> SharedDashboard {
        // ---
        SharedDashboard::new(DashboardController::new(FeedSources {
            live_url: "/video_feed".to_string(),
            no_signal_url: "/no-signal.png".to_string(),
        }))
    }

    fn status(alarm_active: bool, detections: usize) -> StatusSnapshot {
        // ---
        StatusSnapshot {
            alarm_active,
            full_log: (0..detections)
                .map(|i| DetectionEvent {
                    time: format!("2024-03-0{} 12:00:00", i + 1),
                    confidence: 90.0,
                    gps: "26.4567°N, 88.4567°E".to_string(),
                    status: "Active".to_string(),
                })
                .collect(),
        }
    }

    async fn wait_until(mut cond: impl FnMut() -> bool) {
        // ---
        for _ in 0..400 {
            if cond() {
                return;
            }
            tokio::time::sleep(Duration::from_millis(5)).await;
        }
        panic!("condition not reached");
    }

    #[tokio::test]
    async fn test_poll_failure_leaves_view_untouched() {
        // ---
        let shared = shared();
        let client = ScriptedClient::new(vec![
            Ok(status(true, 2)),
            Err(PollError::Status(StatusCode::BAD_GATEWAY)),
            Err(serde_json::from_str::<StatusSnapshot>("{").unwrap_err().into()),
        ]);

        poll_once(&shared, &client).await.unwrap();
        let before = shared.lock().snapshot();

        assert!(matches!(
            poll_once(&shared, &client).await,
            Err(PollError::Status(StatusCode::BAD_GATEWAY))
        ));
        assert!(matches!(
            poll_once(&shared, &client).await,
            Err(PollError::Decode(_))
        ));

        let after = shared.lock().snapshot();
        assert_eq!(after.document, before.document);
        assert_eq!(after.detections, before.detections);
        assert_eq!(after.document.inner_html(ids::TOTAL_DETECTIONS_DASH), "2");
    }

    #[tokio::test]
    async fn test_slow_older_response_cannot_overwrite_newer() {
        // ---
        let shared = shared();
        let (older_tx, older_rx) = oneshot::channel();
        let (newer_tx, newer_rx) = oneshot::channel();
        let client = Arc::new(GatedClient {
            gates: Mutex::new(VecDeque::from([older_rx, newer_rx])),
            issued: Mutex::new(0),
        });

        let first = tokio::spawn({
            let (shared, client) = (shared.clone(), client.clone());
            async move { poll_once(&shared, client.as_ref()).await }
        });
        wait_until(|| *client.issued.lock().unwrap() == 1).await;
        let second = tokio::spawn({
            let (shared, client) = (shared.clone(), client.clone());
            async move { poll_once(&shared, client.as_ref()).await }
        });
        wait_until(|| *client.issued.lock().unwrap() == 2).await;

        newer_tx.send(status(true, 3)).unwrap();
        assert_eq!(second.await.unwrap().unwrap(), PollOutcome::Applied { seq: 2 });

        older_tx.send(status(false, 0)).unwrap();
        assert_eq!(
            first.await.unwrap().unwrap(),
            PollOutcome::Stale { seq: 1, applied: 2 }
        );

        let c = shared.lock();
        assert_eq!(c.detections().len(), 3);
        assert_eq!(c.document().inner_html(ids::ACTIVE_DETECTIONS), "1");
    }

    #[tokio::test]
    async fn test_loop_polls_at_start_on_tick_and_on_refresh() {
        // ---
        let shared = shared();
        let client = Arc::new(ScriptedClient::new(vec![
            Ok(status(false, 1)),
            Ok(status(true, 2)),
            Ok(status(false, 3)),
        ]));
        let (clock, tick) = manual_clock();

        let handle = spawn(
            shared.clone(),
            client.clone(),
            &clock,
            Duration::from_millis(2000),
        );

        wait_until(|| shared.lock().detections().len() == 1).await;

        tick.send(()).unwrap();
        wait_until(|| shared.lock().detections().len() == 2).await;

        handle.refresh();
        wait_until(|| shared.lock().detections().len() == 3).await;
        assert_eq!(client.calls(), 3);

        handle.shutdown().await;
        tick.send(()).ok();
        tokio::time::sleep(Duration::from_millis(20)).await;
        assert_eq!(client.calls(), 3);
    }

    #[tokio::test]
    async fn test_loop_survives_failures() {
        // ---
        let shared = shared();
        let client = Arc::new(ScriptedClient::new(vec![
            Err(PollError::Status(StatusCode::INTERNAL_SERVER_ERROR)),
            Ok(status(true, 1)),
        ]));
        let (clock, tick) = manual_clock();
        let handle = spawn(shared.clone(), client.clone(), &clock, Duration::from_secs(2));

        wait_until(|| client.calls() == 1).await;
        assert_eq!(shared.lock().applied_seq(), 0);

        tick.send(()).unwrap();
        wait_until(|| shared.lock().applied_seq() == 2).await;
        assert_eq!(shared.lock().detections().len(), 1);

        handle.shutdown().await;
    }
}
