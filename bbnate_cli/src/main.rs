mod cli;
mod error_fmt;
mod session;

use std::fs;
use std::path::Path;

use bbnate_core::CancelToken;
use clap::Parser;
use eyre::{Result, WrapErr};
use tracing_subscriber::{EnvFilter, Layer, fmt, prelude::*};

use crate::cli::{Cli, Commands, FILE_GUARD, JSON_MODE};
use crate::error_fmt::{exit_code_for_error, format_error_json, humanize};

fn main() {
    let cli = Cli::parse();
    let _ = JSON_MODE.set(cli.json);
    let _ = color_eyre::install();

    if let Err(e) = run(cli) {
        if JSON_MODE.get().copied().unwrap_or(false) {
            eprintln!("{}", format_error_json(&e));
        } else {
            eprintln!("{}", humanize(&e));
        }
        tracing::error!(error = %e, "bbnate failed");
        std::process::exit(exit_code_for_error(&e));
    }
}

fn run(cli: Cli) -> Result<()> {
    let cfg = load_config(&cli.config);
    let logging = cfg
        .as_ref()
        .map(|c| c.logging.clone())
        .unwrap_or_default();
    init_tracing(cli.json, &cli.log_level, &logging)?;
    let cfg = cfg?;
    tracing::debug!(config = %cli.config.display(), "config loaded");

    let cancel = CancelToken::new();
    {
        let token = cancel.clone();
        if let Err(e) = ctrlc::set_handler(move || token.cancel()) {
            tracing::warn!(error = %e, "failed to install Ctrl-C handler");
        }
    }

    match cli.cmd {
        Commands::Measure { echo_raw } => session::measure(&cfg, echo_raw, cancel, cli.json),
        Commands::Run { echo_raw, cycles } => {
            session::run(&cfg, echo_raw, cycles, cancel, cli.json)
        }
        Commands::Classify { energy } => {
            session::classify(&cfg, energy, cli.json);
            Ok(())
        }
        Commands::SelfCheck => session::self_check(&cfg, cancel, cli.json),
    }
}

fn load_config(path: &Path) -> Result<bbnate_config::Config> {
    let text = fs::read_to_string(path)
        .wrap_err_with(|| format!("failed to read config {}", path.display()))?;
    let cfg: bbnate_config::Config = toml::from_str(&text)
        .wrap_err_with(|| format!("invalid configuration in {}", path.display()))?;
    cfg.validate().wrap_err("invalid configuration")?;
    Ok(cfg)
}

/// Console logs go to stderr so stdout only carries results.
/// `RUST_LOG` overrides `--log-level`; `[logging] file` adds a JSON-lines file sink.
fn init_tracing(json: bool, level: &str, logging: &bbnate_config::Logging) -> Result<()> {
    let console_filter = match EnvFilter::try_from_default_env() {
        Ok(f) => f,
        Err(_) => EnvFilter::try_new(level).wrap_err_with(|| format!("bad --log-level {level}"))?,
    };
    let console = if json {
        fmt::layer()
            .json()
            .with_writer(std::io::stderr)
            .with_filter(console_filter)
            .boxed()
    } else {
        fmt::layer()
            .with_target(false)
            .with_writer(std::io::stderr)
            .with_filter(console_filter)
            .boxed()
    };

    let file = match logging.file.as_deref() {
        Some(path) => {
            let path = Path::new(path);
            let dir = path
                .parent()
                .filter(|p| !p.as_os_str().is_empty())
                .unwrap_or_else(|| Path::new("."));
            let name = path
                .file_name()
                .ok_or_else(|| eyre::eyre!("logging.file has no file name"))?;
            fs::create_dir_all(dir)
                .wrap_err_with(|| format!("failed to create log dir {}", dir.display()))?;
            let appender = match logging.rotation.as_deref().unwrap_or("never") {
                "daily" => tracing_appender::rolling::daily(dir, name),
                "hourly" => tracing_appender::rolling::hourly(dir, name),
                _ => tracing_appender::rolling::never(dir, name),
            };
            let (writer, guard) = tracing_appender::non_blocking(appender);
            let _ = FILE_GUARD.set(guard);
            let file_filter = EnvFilter::try_new(logging.level.as_deref().unwrap_or("info"))
                .wrap_err("bad logging.level")?;
            Some(
                fmt::layer()
                    .json()
                    .with_ansi(false)
                    .with_writer(writer)
                    .with_filter(file_filter)
                    .boxed(),
            )
        }
        None => None,
    };

    tracing_subscriber::registry()
        .with(console)
        .with(file)
        .try_init()
        .wrap_err("failed to install tracing subscriber")?;
    Ok(())
}
