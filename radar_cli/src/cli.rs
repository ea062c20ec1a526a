//! CLI argument definitions and shared statics.

use clap::{ArgAction, Parser, Subcommand};
use std::path::PathBuf;
use std::sync::OnceLock;

pub static FILE_GUARD: OnceLock<tracing_appender::non_blocking::WorkerGuard> = OnceLock::new();
/// Whether the user asked for JSON output (controls structured error output).
pub static JSON_MODE: OnceLock<bool> = OnceLock::new();

#[derive(Parser, Debug)]
#[command(name = "radar", version, about = "Radar measurement unit CLI")]
pub struct Cli {
    /// Path to config TOML (typed)
    #[arg(long, value_name = "FILE", default_value = "etc/radar_config.toml")]
    pub config: PathBuf,

    /// Log as JSON lines instead of pretty
    #[arg(long, action = ArgAction::SetTrue)]
    pub json: bool,

    /// Console log level (error|warn|info|debug|trace). When passed it
    /// overrides logging.level from the config; defaults to info.
    #[arg(long = "log-level", value_name = "LEVEL")]
    pub log_level: Option<String>,

    /// Command to execute
    #[command(subcommand)]
    pub cmd: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Run the measurement scheduler against simulated radar boards
    Run {
        /// Stop after this many scheduler ticks (runs until Ctrl-C if unset)
        #[arg(long, value_name = "N")]
        ticks: Option<u64>,
        /// Distance the simulated board reports; 0 means "no target in view"
        #[arg(long, value_name = "CM")]
        distance: Option<u16>,
        /// Speed the simulated board reports
        #[arg(long, value_name = "CM_S")]
        speed: Option<u16>,
        /// Boards never answer (exercises the timeout/retry path)
        #[arg(long, action = ArgAction::SetTrue)]
        silent: bool,
    },
    /// Quick health check (sim boards answer a trigger)
    SelfCheck,
}
