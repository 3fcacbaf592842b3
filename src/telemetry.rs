//! Logging bootstrap for hosts embedding `chart-painter`.
//!
//! The engine only emits `tracing` events. Hosts either call
//! [`init_default_tracing`] once at startup or install their own subscriber.

/// Default filter applied when `RUST_LOG` is not set.
pub const DEFAULT_FILTER: &str = "chart_painter=info";

/// Installs a compact `tracing` subscriber when the `telemetry` feature is enabled.
///
/// Returns `false` when the feature is disabled or another global subscriber
/// is already in place.
#[must_use]
pub fn init_default_tracing() -> bool {
    init_tracing_with_filter(DEFAULT_FILTER)
}

/// Same as [`init_default_tracing`] with an explicit fallback filter directive,
/// e.g. `"chart_painter=trace"` to follow every increment step.
#[must_use]
pub fn init_tracing_with_filter(fallback_filter: &str) -> bool {
    #[cfg(feature = "telemetry")]
    {
        let filter = tracing_subscriber::EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(fallback_filter));

        return tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_target(true)
            .compact()
            .try_init()
            .is_ok();
    }

    #[cfg(not(feature = "telemetry"))]
    {
        let _ = fallback_filter;
        false
    }
}
