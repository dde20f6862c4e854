/*!
 * Structured Tracing
 * Subscriber setup and per-operation spans for filesystem sessions
 *
 * Features:
 * - Trace ID generation for correlating an operation's events
 * - JSON-formatted logs for structured parsing
 * - Duration recording with slow-operation warnings
 */

use std::fmt::Display;
use std::time::Instant;
use tracing::{debug, info, span, warn, Level};
use tracing_subscriber::{
    fmt::format::FmtSpan, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter,
};
use uuid::Uuid;

use crate::core::config::ENV_TRACE_JSON;
use crate::core::limits::SLOW_OPERATION_THRESHOLD;

/// Initialize structured tracing
///
/// Environment variables:
/// - RUST_LOG: Set log level (default: info)
/// - SIMFS_TRACE_JSON: Enable JSON output (default: false)
///
/// Returns quietly if a global subscriber is already installed.
pub fn init_tracing() {
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    let use_json = std::env::var(ENV_TRACE_JSON)
        .map(|v| v == "1" || v == "true")
        .unwrap_or(false);

    let registry = tracing_subscriber::registry().with(env_filter);

    if use_json {
        let installed = registry
            .with(
                tracing_subscriber::fmt::layer()
                    .json()
                    .with_target(true)
                    .with_line_number(true)
                    .with_file(true)
                    .with_current_span(true)
                    .with_span_list(true)
                    .with_span_events(FmtSpan::CLOSE),
            )
            .try_init();
        if installed.is_ok() {
            info!("Structured tracing initialized with JSON output");
        }
    } else {
        let installed = registry
            .with(
                tracing_subscriber::fmt::layer()
                    .with_target(true)
                    .with_line_number(true)
                    .with_span_events(FmtSpan::CLOSE)
                    .compact(),
            )
            .try_init();
        if installed.is_ok() {
            info!("Structured tracing initialized");
        }
    }
}

/// Generate a unique trace ID for event correlation
pub fn generate_trace_id() -> String {
    Uuid::new_v4().to_string()
}

/// Span around one session operation
///
/// Records the outcome explicitly and the duration when dropped.
pub struct OperationSpan {
    span: tracing::Span,
    start: Instant,
    operation: &'static str,
    trace_id: String,
}

impl OperationSpan {
    pub fn new(operation: &'static str, session: &Uuid) -> Self {
        let trace_id = generate_trace_id();

        let span = span!(
            Level::DEBUG,
            "fs_operation",
            trace_id = %trace_id,
            session = %session,
            operation = operation,
            duration_us = tracing::field::Empty,
            result = tracing::field::Empty,
            error = tracing::field::Empty,
        );

        Self {
            span,
            start: Instant::now(),
            operation,
            trace_id,
        }
    }

    /// Get the trace ID for this operation
    pub fn trace_id(&self) -> &str {
        &self.trace_id
    }

    /// Record the result of the operation and pass it through
    pub fn finish<T, E: Display>(&self, result: Result<T, E>) -> Result<T, E> {
        let _entered = self.span.enter();
        match &result {
            Ok(_) => {
                self.span.record("result", "success");
            }
            Err(e) => {
                let message = e.to_string();
                self.span.record("result", "error");
                self.span.record("error", message.as_str());
                debug!(operation = self.operation, error = %message, "operation failed");
            }
        }
        result
    }
}

impl Drop for OperationSpan {
    fn drop(&mut self) {
        let duration = self.start.elapsed();
        let _entered = self.span.enter();
        self.span.record("duration_us", duration.as_micros() as u64);

        if duration > SLOW_OPERATION_THRESHOLD {
            warn!(
                trace_id = %self.trace_id,
                operation = self.operation,
                duration_ms = duration.as_millis() as u64,
                slow = true,
                "slow operation detected"
            );
        }
    }
}
