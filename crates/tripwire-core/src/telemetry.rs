//! Centralised tracing initialisation and lifecycle event emission.
//!
//! Call [`init_tracing`] once at program start. Harness components emit
//! structured lifecycle events through the `emit_*` helpers so runs can be
//! followed from logs alone.

use tracing::{info, Level};
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{fmt, EnvFilter};

/// Initialise the global tracing subscriber.
///
/// * `json` - when `true`, emit newline-delimited JSON log lines.
/// * `level` - default verbosity when `RUST_LOG` is not set.
///
/// Respects `RUST_LOG` for fine-grained filtering. Safe to call more than
/// once; only the first call takes effect.
pub fn init_tracing(json: bool, level: Level) {
    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level.as_str()));

    if json {
        tracing_subscriber::registry()
            .with(env_filter)
            .with(fmt::layer().with_target(false).json())
            .try_init()
            .ok();
    } else {
        tracing_subscriber::registry()
            .with(env_filter)
            .with(fmt::layer().with_target(false))
            .try_init()
            .ok();
    }
}

/// Emit event: an external tool was invoked against a fixture.
pub fn emit_tool_invoked(run_id: &str, tool: &str, fixture_id: &str) {
    info!(
        event = "tool.invoked",
        run_id = %run_id,
        tool = %tool,
        fixture_id = %fixture_id,
    );
}

/// Emit event: an external tool finished, with its exit code.
pub fn emit_tool_completed(run_id: &str, tool: &str, exit_code: i32, duration_ms: u64) {
    info!(
        event = "tool.completed",
        run_id = %run_id,
        tool = %tool,
        exit_code = exit_code,
        duration_ms = duration_ms,
    );
}

/// Emit event: a fixture verdict was produced.
pub fn emit_fixture_verdict(run_id: &str, fixture_id: &str, confirmed: bool) {
    info!(
        event = "fixture.verdict",
        run_id = %run_id,
        fixture_id = %fixture_id,
        confirmed = confirmed,
    );
}

/// Emit event: the gate evaluated all verdicts.
pub fn emit_gate_evaluated(run_id: &str, passed: bool, confirmed: usize, total: usize) {
    info!(
        event = "gate.evaluated",
        run_id = %run_id,
        passed = passed,
        confirmed = confirmed,
        total = total,
    );
}
