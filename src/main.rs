use std::io::{self, BufRead, Write};
use std::path::PathBuf;

use chrono::NaiveDateTime;
use tracing::info;

use timegrid::command::{parse_command, Command};
use timegrid::observability::{command_label, COMMANDS_TOTAL};
use timegrid::{Board, BoardConfig};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt().with_writer(io::stderr).init();

    let metrics_port: Option<u16> = std::env::var("TIMEGRID_METRICS_PORT")
        .ok()
        .and_then(|s| s.parse().ok());
    timegrid::observability::init(metrics_port)?;

    let config_path = std::env::args()
        .nth(1)
        .or_else(|| std::env::var("TIMEGRID_CONFIG").ok())
        .map(PathBuf::from)
        .ok_or("usage: timegrid <config.json> (or set TIMEGRID_CONFIG)")?;

    let now = match std::env::var("TIMEGRID_NOW") {
        Ok(s) => NaiveDateTime::parse_from_str(&s, "%Y-%m-%dT%H:%M")
            .map_err(|e| format!("TIMEGRID_NOW {s:?}: {e}"))?,
        Err(_) => chrono::Local::now().naive_local(),
    };

    let config = BoardConfig::load(&config_path)?;
    info!("timegrid loaded {}", config_path.display());
    info!("  date: {}", config.selected_date);
    info!("  hours: {}-{} every {} min", config.start_time, config.end_time, config.interval);
    info!("  now: {now}");

    let mut board = Board::new(config, now);
    let mut out = io::stdout().lock();
    emit(&mut out, &board)?;

    for line in io::stdin().lock().lines() {
        let line = line?;
        let cmd = match parse_command(&line) {
            Ok(Some(cmd)) => cmd,
            Ok(None) => continue,
            Err(e) => {
                tracing::warn!("{e}");
                continue;
            }
        };

        let label = command_label(&cmd);
        let result = match cmd {
            Command::Activate { index } => board.on_cell_activate(index).map(drop),
            Command::Step { index, offset } => board.on_step(index, offset).map(drop),
            Command::Select { start, end } => {
                board.on_programmatic_select(start, end);
                Ok(())
            }
            Command::Clear => {
                board.clear_selection();
                Ok(())
            }
            Command::Show => Ok(()),
        };

        match result {
            Ok(()) => {
                metrics::counter!(COMMANDS_TOTAL, "command" => label, "status" => "ok").increment(1);
                emit(&mut out, &board)?;
            }
            Err(e) => {
                metrics::counter!(COMMANDS_TOTAL, "command" => label, "status" => "error").increment(1);
                tracing::warn!("{label} rejected: {e}");
            }
        }
    }

    info!("timegrid session ended");
    Ok(())
}

fn emit(out: &mut impl Write, board: &Board) -> Result<(), Box<dyn std::error::Error>> {
    serde_json::to_writer(&mut *out, &board.view())?;
    writeln!(out)?;
    out.flush()?;
    Ok(())
}
