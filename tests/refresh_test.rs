//! Tests for [`LiveRefresh`] — scheduling, non-overlap, teardown.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::time::Duration;

use chrono::{DateTime, Local, TimeZone};
use tokio::sync::Semaphore;

use caissa::{CaissaError, Clock, LiveRefresh, RefreshConfig};

struct FixedClock(DateTime<Local>);

impl Clock for FixedClock {
    fn now(&self) -> DateTime<Local> {
        self.0
    }
}

/// Controller whose callback just counts invocations.
fn counting_refresh(interval: Duration, runs: &Arc<AtomicUsize>) -> LiveRefresh {
    let runs = Arc::clone(runs);
    LiveRefresh::new(RefreshConfig::new().interval(interval), move || {
        let runs = Arc::clone(&runs);
        async move {
            runs.fetch_add(1, Ordering::SeqCst);
            Ok(())
        }
    })
}

// ============================================================================
// Scheduling
// ============================================================================

#[tokio::test(start_paused = true)]
async fn enable_runs_immediately_then_per_interval() {
    let runs = Arc::new(AtomicUsize::new(0));
    let refresh = counting_refresh(Duration::from_secs(30), &runs);

    refresh.enable();
    assert!(refresh.is_enabled());

    tokio::time::sleep(Duration::from_millis(1)).await;
    assert_eq!(runs.load(Ordering::SeqCst), 1, "first run is immediate");

    tokio::time::sleep(Duration::from_secs(30)).await;
    assert_eq!(runs.load(Ordering::SeqCst), 2);

    tokio::time::sleep(Duration::from_secs(60)).await;
    assert_eq!(runs.load(Ordering::SeqCst), 4);
}

#[tokio::test(start_paused = true)]
async fn enable_twice_is_a_noop() {
    let runs = Arc::new(AtomicUsize::new(0));
    let refresh = counting_refresh(Duration::from_secs(30), &runs);

    refresh.enable();
    refresh.enable();

    tokio::time::sleep(Duration::from_millis(1)).await;
    assert_eq!(runs.load(Ordering::SeqCst), 1, "only one loop is running");
}

// ============================================================================
// Teardown
// ============================================================================

#[tokio::test(start_paused = true)]
async fn disable_stops_scheduled_invocations() {
    let runs = Arc::new(AtomicUsize::new(0));
    let refresh = counting_refresh(Duration::from_secs(30), &runs);

    refresh.enable();
    tokio::time::sleep(Duration::from_millis(1)).await;
    assert_eq!(runs.load(Ordering::SeqCst), 1);

    refresh.disable();
    assert!(!refresh.is_enabled());

    tokio::time::sleep(Duration::from_secs(120)).await;
    assert_eq!(
        runs.load(Ordering::SeqCst),
        1,
        "no invocations after disable"
    );
}

#[tokio::test(start_paused = true)]
async fn drop_stops_the_loop() {
    let runs = Arc::new(AtomicUsize::new(0));
    let refresh = counting_refresh(Duration::from_secs(30), &runs);

    refresh.enable();
    tokio::time::sleep(Duration::from_millis(1)).await;
    drop(refresh);

    tokio::time::sleep(Duration::from_secs(120)).await;
    assert_eq!(runs.load(Ordering::SeqCst), 1);
}

// ============================================================================
// Non-overlap
// ============================================================================

#[tokio::test]
async fn manual_refresh_is_skipped_while_in_flight() {
    let gate = Arc::new(Semaphore::new(0));
    let runs = Arc::new(AtomicUsize::new(0));

    let callback_gate = Arc::clone(&gate);
    let callback_runs = Arc::clone(&runs);
    let refresh = Arc::new(LiveRefresh::new(
        RefreshConfig::new().interval(Duration::from_secs(3600)),
        move || {
            let gate = Arc::clone(&callback_gate);
            let runs = Arc::clone(&callback_runs);
            async move {
                runs.fetch_add(1, Ordering::SeqCst);
                let _permit = gate.acquire().await;
                Ok(())
            }
        },
    ));

    // Park one invocation inside the callback.
    let in_flight = {
        let refresh = Arc::clone(&refresh);
        tokio::spawn(async move { refresh.manual_refresh().await })
    };
    tokio::task::yield_now().await;
    tokio::task::yield_now().await;
    assert!(refresh.is_refreshing());
    assert_eq!(runs.load(Ordering::SeqCst), 1);

    // A second trigger is skipped, not queued.
    assert!(!refresh.manual_refresh().await);
    assert_eq!(runs.load(Ordering::SeqCst), 1);

    gate.add_permits(1);
    assert!(in_flight.await.expect("refresh task completes"));
    assert!(!refresh.is_refreshing());

    // With the first invocation done, manual triggers run again.
    gate.add_permits(1);
    assert!(refresh.manual_refresh().await);
    assert_eq!(runs.load(Ordering::SeqCst), 2);
}

#[tokio::test]
async fn manual_refresh_works_while_polling_is_disabled() {
    let runs = Arc::new(AtomicUsize::new(0));
    let refresh = counting_refresh(Duration::from_secs(30), &runs);

    assert!(!refresh.is_enabled());
    assert!(refresh.manual_refresh().await);
    assert_eq!(runs.load(Ordering::SeqCst), 1);
}

// ============================================================================
// Status tracking
// ============================================================================

#[tokio::test]
async fn last_updated_is_set_only_on_success() {
    let now = Local.with_ymd_and_hms(2026, 3, 15, 12, 0, 0).unwrap();
    let failing = Arc::new(AtomicBool::new(true));

    let callback_failing = Arc::clone(&failing);
    let refresh = LiveRefresh::with_clock(
        RefreshConfig::new(),
        Arc::new(FixedClock(now)),
        move || {
            let failing = Arc::clone(&callback_failing);
            async move {
                if failing.load(Ordering::SeqCst) {
                    Err(CaissaError::Http("upstream down".into()))
                } else {
                    Ok(())
                }
            }
        },
    );

    assert!(refresh.last_updated().is_none());

    // A failing invocation still runs but leaves no timestamp.
    assert!(refresh.manual_refresh().await);
    assert!(refresh.last_updated().is_none());

    failing.store(false, Ordering::SeqCst);
    assert!(refresh.manual_refresh().await);
    assert_eq!(refresh.last_updated(), Some(now));
}

#[tokio::test(start_paused = true)]
async fn a_failing_callback_does_not_stop_the_loop() {
    let runs = Arc::new(AtomicUsize::new(0));
    let callback_runs = Arc::clone(&runs);
    let refresh = LiveRefresh::new(
        RefreshConfig::new().interval(Duration::from_secs(30)),
        move || {
            let runs = Arc::clone(&callback_runs);
            async move {
                runs.fetch_add(1, Ordering::SeqCst);
                Err(CaissaError::Http("still down".into()))
            }
        },
    );

    refresh.enable();
    tokio::time::sleep(Duration::from_millis(1)).await;
    assert_eq!(runs.load(Ordering::SeqCst), 1);

    tokio::time::sleep(Duration::from_secs(30)).await;
    assert_eq!(runs.load(Ordering::SeqCst), 2, "loop continues after failure");
    assert!(refresh.last_updated().is_none());
}
