//! Telemetry metric name constants.
//!
//! Centralised metric names for caissa cache and refresh operations.
//! Consumers install their own `metrics` recorder (e.g. prometheus,
//! statsd); without a recorder installed, all metric calls are no-ops.
//!
//! # Metric naming conventions
//!
//! All metrics are prefixed with `caissa_`. Counters end in `_total`,
//! histograms use meaningful units (e.g. `_seconds`).
//!
//! # Common labels
//!
//! - `entity` — cached entity kind ("player" | "tournament")
//! - `status` — outcome: "ok" or "error"

/// Total cache hits, counted per requested key.
///
/// Labels: `entity`.
pub const CACHE_HITS_TOTAL: &str = "caissa_cache_hits_total";

/// Total cache misses, counted per requested key that needed a fetch.
///
/// Labels: `entity`.
pub const CACHE_MISSES_TOTAL: &str = "caissa_cache_misses_total";

/// Total entity fetches issued to the rating service.
///
/// Counted per entity within a batch, not per network call.
///
/// Labels: `entity`, `status` ("ok" | "error").
pub const FETCHES_TOTAL: &str = "caissa_fetches_total";

/// Total live-refresh invocations.
///
/// Labels: `status` ("ok" | "error" | "skipped").
pub const REFRESH_RUNS_TOTAL: &str = "caissa_refresh_runs_total";

/// Live-refresh invocation duration in seconds.
///
/// Only recorded for invocations that actually ran (not skipped).
pub const REFRESH_DURATION_SECONDS: &str = "caissa_refresh_duration_seconds";
