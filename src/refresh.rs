//! Live-results refresh controller.
//!
//! Opt-in polling loop around a caller-supplied async refresh callback:
//! enabling runs the callback immediately and then once per interval;
//! disabling cancels the timer while letting an in-flight invocation
//! finish. Invocations never overlap — a manual trigger that arrives
//! while one is running is skipped, not queued, so racing writes to
//! shared UI state cannot happen.
//!
//! The controller refreshes a narrow slice of state (typically live
//! results) and deliberately does not touch the cache stores itself;
//! the callback may populate them as a side effect.

use std::future::Future;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use chrono::{DateTime, Local};
use futures_util::FutureExt;
use futures_util::future::BoxFuture;
use tokio::sync::{Mutex as AsyncMutex, watch};
use tokio::time::MissedTickBehavior;
use tracing::{debug, warn};

use crate::period::{Clock, SystemClock};
use crate::telemetry;

/// Default gap between scheduled refresh invocations.
const DEFAULT_INTERVAL: Duration = Duration::from_secs(30);

/// Configuration for the refresh loop.
///
/// ```rust
/// # use caissa::RefreshConfig;
/// # use std::time::Duration;
/// let config = RefreshConfig::new().interval(Duration::from_secs(10));
/// ```
#[derive(Debug, Clone)]
pub struct RefreshConfig {
    /// Gap between scheduled invocations. Default: 30 s.
    pub interval: Duration,
}

impl Default for RefreshConfig {
    fn default() -> Self {
        Self {
            interval: DEFAULT_INTERVAL,
        }
    }
}

impl RefreshConfig {
    /// Create a new config with the default interval.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the gap between scheduled invocations.
    pub fn interval(mut self, interval: Duration) -> Self {
        self.interval = interval;
        self
    }
}

type RefreshTask = Box<dyn Fn() -> BoxFuture<'static, crate::Result<()>> + Send + Sync>;

struct Inner {
    task: RefreshTask,
    /// Non-overlap gate shared by the timer and manual triggers.
    gate: AsyncMutex<()>,
    refreshing: AtomicBool,
    last_updated: Mutex<Option<DateTime<Local>>>,
    clock: Arc<dyn Clock>,
}

impl Inner {
    /// Run the callback once, unless an invocation is already in flight.
    /// Returns whether it actually ran.
    async fn run_once(&self) -> bool {
        let Ok(_guard) = self.gate.try_lock() else {
            metrics::counter!(telemetry::REFRESH_RUNS_TOTAL, "status" => "skipped").increment(1);
            return false;
        };

        self.refreshing.store(true, Ordering::SeqCst);
        let started = std::time::Instant::now();
        let result = (self.task)().await;
        metrics::histogram!(telemetry::REFRESH_DURATION_SECONDS)
            .record(started.elapsed().as_secs_f64());

        match result {
            Ok(()) => {
                *self
                    .last_updated
                    .lock()
                    .unwrap_or_else(|e| e.into_inner()) = Some(self.clock.now());
                metrics::counter!(telemetry::REFRESH_RUNS_TOTAL, "status" => "ok").increment(1);
            }
            Err(e) => {
                // Not retried immediately; the next tick or manual
                // trigger will try again.
                warn!(error = %e, "live refresh failed");
                metrics::counter!(telemetry::REFRESH_RUNS_TOTAL, "status" => "error").increment(1);
            }
        }

        self.refreshing.store(false, Ordering::SeqCst);
        true
    }
}

/// Cancellable polling loop over an async refresh callback.
///
/// ```rust,no_run
/// # use caissa::{LiveRefresh, RefreshConfig};
/// # async fn reload_results() -> caissa::Result<()> { Ok(()) }
/// # async fn demo() {
/// let refresh = LiveRefresh::new(RefreshConfig::new(), || reload_results());
/// refresh.enable();          // runs immediately, then every interval
/// refresh.manual_refresh().await;
/// refresh.disable();         // no further scheduled runs
/// # }
/// ```
pub struct LiveRefresh {
    inner: Arc<Inner>,
    interval: Duration,
    stop: Mutex<Option<watch::Sender<bool>>>,
}

impl LiveRefresh {
    /// Create a controller around `task`. Nothing runs until
    /// [`enable`](Self::enable).
    pub fn new<F, Fut>(config: RefreshConfig, task: F) -> Self
    where
        F: Fn() -> Fut + Send + Sync + 'static,
        Fut: Future<Output = crate::Result<()>> + Send + 'static,
    {
        Self::with_clock(config, Arc::new(SystemClock), task)
    }

    /// Create a controller with an injected clock for the
    /// `last_updated` stamp.
    pub fn with_clock<F, Fut>(config: RefreshConfig, clock: Arc<dyn Clock>, task: F) -> Self
    where
        F: Fn() -> Fut + Send + Sync + 'static,
        Fut: Future<Output = crate::Result<()>> + Send + 'static,
    {
        let task: RefreshTask = Box::new(move || task().boxed());
        Self {
            inner: Arc::new(Inner {
                task,
                gate: AsyncMutex::new(()),
                refreshing: AtomicBool::new(false),
                last_updated: Mutex::new(None),
                clock,
            }),
            interval: config.interval,
            stop: Mutex::new(None),
        }
    }

    /// Start polling: one invocation immediately, then one per interval.
    ///
    /// No-op when already enabled. Must be called within a tokio
    /// runtime — the loop runs on a spawned task.
    pub fn enable(&self) {
        let mut stop = self.stop.lock().unwrap_or_else(|e| e.into_inner());
        if stop.is_some() {
            return;
        }

        let (stop_tx, mut stop_rx) = watch::channel(false);
        let inner = Arc::clone(&self.inner);
        let interval = self.interval;

        tokio::spawn(async move {
            let mut ticks = tokio::time::interval(interval);
            ticks.set_missed_tick_behavior(MissedTickBehavior::Delay);
            loop {
                tokio::select! {
                    // Stop wins over a due tick, so disable never races an
                    // extra invocation in.
                    biased;
                    changed = stop_rx.changed() => {
                        if changed.is_err() || *stop_rx.borrow() {
                            break;
                        }
                    }
                    _ = ticks.tick() => {
                        // Awaited in the arm body, so a stop signal never
                        // interrupts an in-flight invocation.
                        inner.run_once().await;
                    }
                }
            }
            debug!("live refresh loop stopped");
        });

        *stop = Some(stop_tx);
    }

    /// Stop polling. An in-flight invocation completes; nothing further
    /// is scheduled. No-op when idle.
    pub fn disable(&self) {
        let sender = self
            .stop
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .take();
        if let Some(sender) = sender {
            let _ = sender.send(true);
        }
    }

    /// Trigger one out-of-band invocation.
    ///
    /// Returns `false` when an invocation was already in flight — the
    /// request is skipped, not queued. Works whether or not polling is
    /// enabled.
    pub async fn manual_refresh(&self) -> bool {
        self.inner.run_once().await
    }

    /// Whether the polling loop is active.
    pub fn is_enabled(&self) -> bool {
        self.stop
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .is_some()
    }

    /// Whether an invocation is outstanding right now.
    pub fn is_refreshing(&self) -> bool {
        self.inner.refreshing.load(Ordering::SeqCst)
    }

    /// Completion time of the last successful invocation.
    pub fn last_updated(&self) -> Option<DateTime<Local>> {
        *self
            .inner
            .last_updated
            .lock()
            .unwrap_or_else(|e| e.into_inner())
    }
}

impl Drop for LiveRefresh {
    fn drop(&mut self) {
        self.disable();
    }
}
