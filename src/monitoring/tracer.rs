/*!
 * Tracing Setup
 * Structured logging for binaries built on the synchronization layer
 *
 * Features:
 * - `RUST_LOG` filtering with an `info` default
 * - JSON output for machine parsing
 * - Timed spans around demo and benchmark scenarios
 */

use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Instant;
use tracing::{debug, info, span, Level};
use tracing_subscriber::{
    fmt::format::FmtSpan, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter,
};

/// Initialize structured tracing
///
/// Environment variables:
/// - RUST_LOG: Set log level (default: info)
/// - SYNCTL_TRACE_JSON: Enable JSON output (default: false)
///
/// Calling it again after a subscriber is installed is a no-op.
pub fn init_tracing() {
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    let use_json = std::env::var("SYNCTL_TRACE_JSON")
        .map(|v| v == "1" || v == "true")
        .unwrap_or(false);

    let registry = tracing_subscriber::registry().with(env_filter);

    let installed = if use_json {
        registry
            .with(
                tracing_subscriber::fmt::layer()
                    .json()
                    .with_target(true)
                    .with_thread_ids(true)
                    .with_thread_names(true)
                    .with_current_span(true)
                    .with_span_events(FmtSpan::CLOSE),
            )
            .try_init()
            .is_ok()
    } else {
        registry
            .with(
                tracing_subscriber::fmt::layer()
                    .with_target(true)
                    .with_thread_ids(true)
                    .with_line_number(true)
                    .with_span_events(FmtSpan::CLOSE)
                    .compact(),
            )
            .try_init()
            .is_ok()
    };

    if installed {
        info!(json = use_json, "Structured tracing initialized");
    }
}

static NEXT_SCENARIO: AtomicU64 = AtomicU64::new(1);

/// Span around one scenario run, recording its duration and result on finish
pub struct ScenarioSpan {
    span: tracing::Span,
    start: Instant,
    scenario_id: u64,
}

impl ScenarioSpan {
    pub fn new(scenario: &str) -> Self {
        let scenario_id = NEXT_SCENARIO.fetch_add(1, Ordering::Relaxed);
        let span = span!(
            Level::INFO,
            "scenario",
            scenario_id,
            scenario = scenario,
            duration_us = tracing::field::Empty,
            result = tracing::field::Empty,
        );

        span.in_scope(|| debug!(scenario, scenario_id, "scenario started"));

        Self {
            span,
            start: Instant::now(),
            scenario_id,
        }
    }

    #[inline]
    pub fn scenario_id(&self) -> u64 {
        self.scenario_id
    }

    /// Enter the span for the duration of `f`
    pub fn in_scope<R>(&self, f: impl FnOnce() -> R) -> R {
        self.span.in_scope(f)
    }

    /// Record the result and elapsed time; returns the elapsed microseconds
    pub fn finish(self, success: bool) -> u64 {
        let duration_us = self.start.elapsed().as_micros() as u64;
        self.span.record("duration_us", duration_us);
        self.span
            .record("result", if success { "success" } else { "error" });
        duration_us
    }
}

/// Helper to create a scenario span
#[inline]
pub fn span_scenario(name: &str) -> ScenarioSpan {
    ScenarioSpan::new(name)
}
