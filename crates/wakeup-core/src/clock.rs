//! Clock sampling.
//!
//! Every "now" the engine sees comes from a [`Clock`]. The [`ClockSampler`]
//! holds the most recently sampled instant; the caller is responsible for
//! calling `tick()` (or spawning the periodic ticker) to advance it.
//!
//! ## Usage
//!
//! ```ignore
//! let mut sampler = ClockSampler::new(SystemClock);
//! let now = sampler.tick();
//! // Or drive it every second:
//! let mut handle = sampler.spawn(Duration::from_secs(1));
//! handle.changed().await;
//! ```

use std::sync::Mutex;
use std::time::Duration;

use chrono::{DateTime, FixedOffset, Local};
use tokio::sync::watch;
use tokio::task::JoinHandle;

/// Shortest period [`ClockSampler::spawn`] will tick at.
pub const MIN_TICK_PERIOD: Duration = Duration::from_millis(1);

/// Source of the current instant, carrying the viewer's UTC offset.
pub trait Clock: Send + Sync + 'static {
    fn now(&self) -> DateTime<FixedOffset>;
}

/// Wall clock in the machine's local timezone.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<FixedOffset> {
        Local::now().fixed_offset()
    }
}

/// Always reports the same instant.
#[derive(Debug, Clone, Copy)]
pub struct FixedClock(pub DateTime<FixedOffset>);

impl Clock for FixedClock {
    fn now(&self) -> DateTime<FixedOffset> {
        self.0
    }
}

/// Clock that only moves when told to.
#[derive(Debug)]
pub struct ManualClock {
    instant: Mutex<DateTime<FixedOffset>>,
}

impl ManualClock {
    pub fn new(start: DateTime<FixedOffset>) -> Self {
        Self {
            instant: Mutex::new(start),
        }
    }

    pub fn advance(&self, by: chrono::Duration) {
        let mut guard = self.instant.lock().unwrap_or_else(|e| e.into_inner());
        *guard += by;
    }

    pub fn set(&self, to: DateTime<FixedOffset>) {
        let mut guard = self.instant.lock().unwrap_or_else(|e| e.into_inner());
        *guard = to;
    }
}

impl Clock for ManualClock {
    fn now(&self) -> DateTime<FixedOffset> {
        *self.instant.lock().unwrap_or_else(|e| e.into_inner())
    }
}

impl<C: Clock> Clock for std::sync::Arc<C> {
    fn now(&self) -> DateTime<FixedOffset> {
        (**self).now()
    }
}

/// Holds the externally observable "now".
///
/// Samples once on construction so `now()` is valid immediately.
#[derive(Debug)]
pub struct ClockSampler<C: Clock = SystemClock> {
    clock: C,
    now: DateTime<FixedOffset>,
}

impl<C: Clock> ClockSampler<C> {
    pub fn new(clock: C) -> Self {
        let now = clock.now();
        Self { clock, now }
    }

    /// Last sampled instant.
    pub fn now(&self) -> DateTime<FixedOffset> {
        self.now
    }

    /// Re-sample the clock and return the new instant.
    pub fn tick(&mut self) -> DateTime<FixedOffset> {
        self.now = self.clock.now();
        self.now
    }

    /// Run `tick()` every `period` on the tokio runtime.
    ///
    /// The first instant is published immediately. The periodic task stops
    /// when the returned handle is stopped or dropped. Periods shorter than
    /// [`MIN_TICK_PERIOD`] are raised to it.
    pub fn spawn(mut self, period: Duration) -> TickerHandle {
        let period = period.max(MIN_TICK_PERIOD);
        let (tx, rx) = watch::channel(self.now);
        let task = tokio::spawn(async move {
            let mut interval = tokio::time::interval(period);
            interval.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Delay);
            loop {
                interval.tick().await;
                let now = self.tick();
                if tx.send(now).is_err() {
                    break;
                }
            }
        });
        tracing::debug!(period_ms = period.as_millis() as u64, "clock sampler started");
        TickerHandle {
            rx,
            task: Some(task),
        }
    }
}

/// Consumer side of a running sampler.
#[derive(Debug)]
pub struct TickerHandle {
    rx: watch::Receiver<DateTime<FixedOffset>>,
    task: Option<JoinHandle<()>>,
}

impl TickerHandle {
    /// Most recently published instant.
    pub fn now(&self) -> DateTime<FixedOffset> {
        *self.rx.borrow()
    }

    /// Wait for the next tick. Returns `None` once the sampler has stopped.
    pub async fn changed(&mut self) -> Option<DateTime<FixedOffset>> {
        self.rx.changed().await.ok()?;
        Some(*self.rx.borrow_and_update())
    }

    pub fn is_running(&self) -> bool {
        self.task.as_ref().is_some_and(|t| !t.is_finished())
    }

    /// Abort the periodic task and wait for it to wind down.
    pub async fn stop(&mut self) {
        if let Some(task) = self.task.take() {
            task.abort();
            let _ = task.await;
            tracing::debug!("clock sampler stopped");
        }
    }
}

impl Drop for TickerHandle {
    fn drop(&mut self) {
        if let Some(task) = self.task.take() {
            task.abort();
        }
    }
}
