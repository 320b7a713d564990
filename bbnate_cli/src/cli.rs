//! CLI argument definitions and shared statics.

use clap::{ArgAction, Parser, Subcommand};
use std::path::PathBuf;
use std::sync::OnceLock;

pub static FILE_GUARD: OnceLock<tracing_appender::non_blocking::WorkerGuard> = OnceLock::new();
/// Whether the user asked for JSON output (controls structured error output).
pub static JSON_MODE: OnceLock<bool> = OnceLock::new();

#[derive(Parser, Debug)]
#[command(name = "bbnate", version, about = "BBnate bone-density interface")]
pub struct Cli {
    /// Path to config TOML
    #[arg(long, value_name = "FILE", default_value = "etc/bbnate.toml")]
    pub config: PathBuf,

    /// Print results and errors as JSON, and log as JSON lines
    #[arg(long, action = ArgAction::SetTrue)]
    pub json: bool,

    /// Console log level (error|warn|info|debug|trace)
    #[arg(long = "log-level", value_name = "LEVEL", default_value = "info")]
    pub log_level: String,

    /// Command to execute
    #[command(subcommand)]
    pub cmd: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// One ping/acquire/classify pass, then show the result screen
    Measure {
        /// Raw ADC count the simulated echo channel returns
        #[arg(long, value_name = "RAW", default_value_t = 0)]
        echo_raw: u16,
    },
    /// Full keypad-driven cycles: ACQUIRE, measure, present, CLEAR
    Run {
        /// Raw ADC count the simulated echo channel returns
        #[arg(long, value_name = "RAW", default_value_t = 0)]
        echo_raw: u16,
        /// Number of cycles to script on the simulated keypad
        #[arg(long, value_name = "N", default_value_t = 1)]
        cycles: u32,
    },
    /// Classify an energy value with the configured thresholds
    Classify {
        /// Integrated echo energy
        #[arg(long, allow_negative_numbers = true)]
        energy: f32,
    },
    /// Validate the config and exercise the devices once
    SelfCheck,
}
