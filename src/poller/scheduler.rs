//! Poll Scheduler
//!
//! Runs the poll-and-render cycle on a fixed cadence.
//!
//! Every tick starts its own cycle task. A slow request never delays the
//! next tick, so cycles can overlap and finish out of order; whichever
//! payload is applied last is what the dashboard shows.

use serde::Serialize;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::{watch, RwLock};
use tokio::task::JoinHandle;
use tokio::time::{Instant, MissedTickBehavior};

use super::error::ScheduleError;
use super::source::TelemetrySource;
use crate::render::{Dashboard, RenderOutcome};

/// Default tick cadence
pub const DEFAULT_POLL_INTERVAL: Duration = Duration::from_millis(1000);

/// Result of one poll-and-render cycle
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TickOutcome {
    /// Payload rendered onto the dashboard
    Rendered { points: usize },
    /// Payload had no samples; dashboard left as it was
    Skipped,
    /// Fetch or parse failed; dashboard left as it was
    Failed,
}

/// Counters across all cycles run by a poller
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct PollStats {
    pub started: u64,
    pub rendered: u64,
    pub skipped: u64,
    pub failed: u64,
}

impl PollStats {
    /// Cycles started but not yet finished
    pub fn in_flight(&self) -> u64 {
        // Counters are read one at a time, so a cycle can finish between loads.
        self.started
            .saturating_sub(self.rendered + self.skipped + self.failed)
    }
}

impl std::fmt::Display for PollStats {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{} cycles ({} rendered, {} skipped, {} failed, {} in flight)",
            self.started,
            self.rendered,
            self.skipped,
            self.failed,
            self.in_flight()
        )
    }
}

#[derive(Debug, Default)]
struct Counters {
    started: AtomicU64,
    rendered: AtomicU64,
    skipped: AtomicU64,
    failed: AtomicU64,
}

/// Fetches payloads and renders them onto a shared dashboard
#[derive(Clone)]
pub struct Poller {
    source: Arc<dyn TelemetrySource>,
    dashboard: Arc<RwLock<Dashboard>>,
    interval: Duration,
    counters: Arc<Counters>,
}

impl Poller {
    /// Create a poller
    pub fn new(
        source: Arc<dyn TelemetrySource>,
        dashboard: Arc<RwLock<Dashboard>>,
        interval: Duration,
    ) -> Self {
        Self {
            source,
            dashboard,
            interval,
            counters: Arc::new(Counters::default()),
        }
    }

    pub fn interval(&self) -> Duration {
        self.interval
    }

    /// The dashboard this poller renders onto
    pub fn dashboard(&self) -> Arc<RwLock<Dashboard>> {
        Arc::clone(&self.dashboard)
    }

    /// Snapshot of the cycle counters
    pub fn stats(&self) -> PollStats {
        PollStats {
            started: self.counters.started.load(Ordering::Relaxed),
            rendered: self.counters.rendered.load(Ordering::Relaxed),
            skipped: self.counters.skipped.load(Ordering::Relaxed),
            failed: self.counters.failed.load(Ordering::Relaxed),
        }
    }

    /// Run one poll-and-render cycle now
    ///
    /// Failures are logged and swallowed; the next tick is the only retry.
    pub async fn tick(&self) -> TickOutcome {
        self.counters.started.fetch_add(1, Ordering::Relaxed);

        let payload = match self.source.fetch().await {
            Ok(payload) => payload,
            Err(e) => {
                tracing::error!(source = %self.source.describe(), "Fetch failed: {}", e);
                self.counters.failed.fetch_add(1, Ordering::Relaxed);
                return TickOutcome::Failed;
            }
        };

        let outcome = self.dashboard.write().await.apply(&payload);

        match outcome {
            RenderOutcome::Updated { points } => {
                self.counters.rendered.fetch_add(1, Ordering::Relaxed);
                TickOutcome::Rendered { points }
            }
            RenderOutcome::Skipped => {
                tracing::debug!("Payload had no samples, keeping previous charts");
                self.counters.skipped.fetch_add(1, Ordering::Relaxed);
                TickOutcome::Skipped
            }
        }
    }

    /// Start ticking on the configured cadence
    ///
    /// The first tick fires one interval from now. Dropping the returned
    /// handle cancels the schedule, same as calling [`PollHandle::cancel`].
    pub fn spawn(&self) -> Result<PollHandle, ScheduleError> {
        if self.interval.is_zero() {
            return Err(ScheduleError::ZeroInterval);
        }

        let (cancel_tx, mut cancel_rx) = watch::channel(false);
        let ticks = Arc::new(AtomicU64::new(0));

        let poller = self.clone();
        let tick_count = Arc::clone(&ticks);
        let period = self.interval;

        let task = tokio::spawn(async move {
            let mut interval = tokio::time::interval_at(Instant::now() + period, period);
            interval.set_missed_tick_behavior(MissedTickBehavior::Delay);

            tracing::info!(
                source = %poller.source.describe(),
                interval_ms = period.as_millis() as u64,
                "Polling started"
            );

            loop {
                tokio::select! {
                    _ = interval.tick() => {
                        tick_count.fetch_add(1, Ordering::Relaxed);
                        let cycle = poller.clone();
                        tokio::spawn(async move {
                            cycle.tick().await;
                        });
                    }
                    _ = cancel_rx.changed() => break,
                }
            }

            tracing::info!("Polling stopped");
        });

        Ok(PollHandle {
            cancel: cancel_tx,
            ticks,
            task,
        })
    }
}

/// Handle to a running schedule
pub struct PollHandle {
    cancel: watch::Sender<bool>,
    ticks: Arc<AtomicU64>,
    task: JoinHandle<()>,
}

impl PollHandle {
    /// Stop scheduling new ticks; cycles already in flight still complete
    pub fn cancel(&self) {
        let _ = self.cancel.send(true);
    }

    pub fn is_cancelled(&self) -> bool {
        *self.cancel.borrow()
    }

    /// Ticks fired so far
    pub fn ticks(&self) -> u64 {
        self.ticks.load(Ordering::Relaxed)
    }

    /// Cancel and wait for the schedule task to exit
    pub async fn shutdown(self) {
        self.cancel();
        if let Err(e) = self.task.await {
            tracing::warn!("Poll schedule task ended abnormally: {}", e);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::poller::error::{FetchError, FetchResult};
    use crate::render::LabelClock;
    use crate::telemetry::{Payload, Sample};
    use async_trait::async_trait;
    use std::collections::VecDeque;
    use std::sync::Mutex;

    /// Returns scripted results in order, then empty payloads
    struct ScriptedSource {
        script: Mutex<VecDeque<FetchResult<Payload>>>,
    }

    impl ScriptedSource {
        fn new(script: Vec<FetchResult<Payload>>) -> Arc<Self> {
            Arc::new(Self {
                script: Mutex::new(script.into()),
            })
        }
    }

    #[async_trait]
    impl TelemetrySource for ScriptedSource {
        fn describe(&self) -> String {
            "scripted".to_string()
        }

        async fn fetch(&self) -> FetchResult<Payload> {
            self.script
                .lock()
                .unwrap()
                .pop_front()
                .unwrap_or_else(|| Ok(Payload::default()))
        }
    }

    /// Call N sleeps for `delays[N]` and then returns `payloads[N]`
    struct DelayedSource {
        calls: AtomicU64,
        steps: Vec<(Duration, Payload)>,
    }

    #[async_trait]
    impl TelemetrySource for DelayedSource {
        fn describe(&self) -> String {
            "delayed".to_string()
        }

        async fn fetch(&self) -> FetchResult<Payload> {
            let call = self.calls.fetch_add(1, Ordering::SeqCst) as usize;
            match self.steps.get(call) {
                Some((delay, payload)) => {
                    tokio::time::sleep(*delay).await;
                    Ok(payload.clone())
                }
                None => Ok(Payload::default()),
            }
        }
    }

    fn payload(angle: f64) -> Payload {
        Payload::new(
            vec![Sample::new(1000.0).tilt_angle(angle)],
            vec![format!("angle {}", angle)],
        )
    }

    fn poller(source: Arc<dyn TelemetrySource>) -> Poller {
        let dashboard = Arc::new(RwLock::new(Dashboard::headless(LabelClock::utc())));
        Poller::new(source, dashboard, DEFAULT_POLL_INTERVAL)
    }

    async fn angles(poller: &Poller) -> Vec<f64> {
        poller
            .dashboard()
            .read()
            .await
            .view()
            .angle
            .series
            .values
            .clone()
    }

    #[tokio::test]
    async fn test_tick_renders_payload() {
        let poller = poller(ScriptedSource::new(vec![Ok(payload(5.0))]));

        assert_eq!(poller.tick().await, TickOutcome::Rendered { points: 1 });
        assert_eq!(angles(&poller).await, vec![5.0]);
        assert_eq!(poller.stats().rendered, 1);
    }

    #[tokio::test]
    async fn test_failed_tick_keeps_state_and_next_tick_proceeds() {
        let poller = poller(ScriptedSource::new(vec![
            Ok(payload(5.0)),
            Err(FetchError::Unavailable("simulated network error".to_string())),
            Ok(payload(9.0)),
        ]));

        poller.tick().await;
        let before = poller.dashboard().read().await.view().clone();

        assert_eq!(poller.tick().await, TickOutcome::Failed);
        assert_eq!(*poller.dashboard().read().await.view(), before);

        assert_eq!(poller.tick().await, TickOutcome::Rendered { points: 1 });
        assert_eq!(angles(&poller).await, vec![9.0]);

        let stats = poller.stats();
        assert_eq!(stats.started, 3);
        assert_eq!(stats.failed, 1);
        assert_eq!(stats.rendered, 2);
        assert_eq!(stats.in_flight(), 0);
    }

    #[tokio::test]
    async fn test_empty_payload_is_skipped() {
        let poller = poller(ScriptedSource::new(vec![
            Ok(payload(3.0)),
            Ok(Payload::default()),
        ]));

        poller.tick().await;
        assert_eq!(poller.tick().await, TickOutcome::Skipped);
        assert_eq!(angles(&poller).await, vec![3.0]);
        let logs = poller.dashboard().read().await.view().logs.lines().to_vec();
        assert_eq!(logs, vec!["angle 3".to_string()]);
    }

    #[tokio::test(start_paused = true)]
    async fn test_schedule_ticks_every_interval_until_cancelled() {
        let poller = poller(ScriptedSource::new(vec![
            Ok(payload(1.0)),
            Ok(payload(2.0)),
            Ok(payload(3.0)),
        ]));

        let handle = poller.spawn().unwrap();
        tokio::time::sleep(Duration::from_millis(999)).await;
        assert_eq!(handle.ticks(), 0);

        tokio::time::sleep(Duration::from_millis(2501)).await;
        assert_eq!(handle.ticks(), 3);
        assert_eq!(poller.stats().rendered, 3);
        assert_eq!(angles(&poller).await, vec![3.0]);

        handle.cancel();
        assert!(handle.is_cancelled());
        tokio::time::sleep(Duration::from_millis(5000)).await;
        assert_eq!(handle.ticks(), 3);
        assert_eq!(poller.stats().started, 3);

        handle.shutdown().await;
    }

    #[tokio::test(start_paused = true)]
    async fn test_ticks_fire_while_requests_are_in_flight() {
        let steps = (0..10)
            .map(|i| (Duration::from_secs(10), payload(i as f64)))
            .collect();
        let source = Arc::new(DelayedSource {
            calls: AtomicU64::new(0),
            steps,
        });
        let poller = poller(source);

        let handle = poller.spawn().unwrap();
        tokio::time::sleep(Duration::from_millis(3500)).await;

        assert_eq!(handle.ticks(), 3);
        let stats = poller.stats();
        assert_eq!(stats.started, 3);
        assert_eq!(stats.in_flight(), 3);
        assert!(angles(&poller).await.is_empty());

        handle.shutdown().await;
    }

    #[tokio::test(start_paused = true)]
    async fn test_out_of_order_completion_last_applied_wins() {
        // Tick 1 (t=1s) is slow and lands at t=4s; tick 2 (t=2s) lands at once.
        let source = Arc::new(DelayedSource {
            calls: AtomicU64::new(0),
            steps: vec![
                (Duration::from_secs(3), payload(1.0)),
                (Duration::ZERO, payload(2.0)),
            ],
        });
        let poller = poller(source);

        let handle = poller.spawn().unwrap();
        tokio::time::sleep(Duration::from_millis(2500)).await;
        handle.cancel();
        assert_eq!(angles(&poller).await, vec![2.0]);

        tokio::time::sleep(Duration::from_millis(2500)).await;
        assert_eq!(angles(&poller).await, vec![1.0]);
        assert_eq!(poller.stats().in_flight(), 0);

        handle.shutdown().await;
    }

    #[tokio::test(start_paused = true)]
    async fn test_dropping_handle_stops_schedule() {
        let poller = poller(ScriptedSource::new(Vec::new()));
        let handle = poller.spawn().unwrap();
        drop(handle);

        tokio::time::sleep(Duration::from_millis(3000)).await;
        assert_eq!(poller.stats().started, 0);
    }

    #[tokio::test]
    async fn test_zero_interval_is_rejected() {
        let dashboard = Arc::new(RwLock::new(Dashboard::headless(LabelClock::utc())));
        let poller = Poller::new(ScriptedSource::new(Vec::new()), dashboard, Duration::ZERO);

        assert!(matches!(poller.spawn(), Err(ScheduleError::ZeroInterval)));
        assert_eq!(poller.stats().started, 0);
    }

    #[test]
    fn test_in_flight_never_underflows() {
        // A cycle that finished after `started` was read.
        let stats = PollStats {
            started: 2,
            rendered: 2,
            skipped: 0,
            failed: 1,
        };
        assert_eq!(stats.in_flight(), 0);
        assert!(stats.to_string().contains("0 in flight"));
    }
}
