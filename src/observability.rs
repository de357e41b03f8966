use std::net::SocketAddr;

use crate::command::Command;

// ── Derivation ──────────────────────────────────────────────────

/// Counter: board recomputations (props or selection changed).
pub const RECOMPUTES_TOTAL: &str = "timegrid_recomputes_total";

/// Histogram: cells produced per recomputation.
pub const CELLS_DERIVED: &str = "timegrid_cells_derived";

// ── Interaction ─────────────────────────────────────────────────

/// Counter: `expand` calls. Labels: outcome.
pub const EXPAND_TOTAL: &str = "timegrid_expand_total";

/// Counter: host commands handled. Labels: command, status.
pub const COMMANDS_TOTAL: &str = "timegrid_commands_total";

/// Install Prometheus metrics exporter on the given port. No-op if port is None.
pub fn init(port: Option<u16>) -> Result<(), metrics_exporter_prometheus::BuildError> {
    let Some(port) = port else { return Ok(()) };
    let addr: SocketAddr = ([0, 0, 0, 0], port).into();
    metrics_exporter_prometheus::PrometheusBuilder::new()
        .with_http_listener(addr)
        .install()?;
    tracing::info!("metrics endpoint: http://0.0.0.0:{port}/metrics");
    Ok(())
}

/// Map a Command variant to a short label for metrics.
pub fn command_label(cmd: &Command) -> &'static str {
    match cmd {
        Command::Activate { .. } => "activate",
        Command::Step { .. } => "step",
        Command::Select { .. } => "select",
        Command::Clear => "clear",
        Command::Show => "show",
    }
}
