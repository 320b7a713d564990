//! Human-readable error descriptions and structured JSON error formatting.

use bbnate_core::error::{BbnateError, BuildError};

/// Map an eyre::Report to a human-readable explanation with likely causes and fix hints.
pub fn humanize(err: &eyre::Report) -> String {
    if let Some(be) = err.downcast_ref::<BuildError>() {
        return match be {
            BuildError::MissingOutputs => {
                "What happened: No output pins were provided to the device.\nLikely causes: The GPIO backend failed to initialize.\nHow to fix: Check GPIO permissions, or run without the hardware feature to use the simulator.".to_string()
            }
            BuildError::MissingAnalog => {
                "What happened: No analog input was provided to the device.\nLikely causes: The ADC backend failed to initialize.\nHow to fix: Check the ADC wiring and rerun.".to_string()
            }
            BuildError::MissingDisplay => {
                "What happened: No display was provided to the device.\nLikely causes: The LCD backend failed to initialize.\nHow to fix: Check the LCD shield and rerun.".to_string()
            }
            BuildError::InvalidConfig(msg) => format!(
                "What happened: Invalid configuration ({msg}).\nLikely causes: Out-of-range values in the TOML.\nHow to fix: Edit the config file, then rerun. See etc/bbnate.toml for a sample."
            ),
        };
    }

    if let Some(be) = err.downcast_ref::<BbnateError>() {
        return match be {
            BbnateError::Cancelled => {
                "What happened: The operation was cancelled.\nLikely causes: Ctrl-C was pressed.\nHow to fix: Start a new run.".to_string()
            }
            BbnateError::KeypadTimeout => {
                "What happened: Timed out waiting for a keypad press.\nLikely causes: No key was pressed, or keypad.timeout_ms is too short.\nHow to fix: Press the key shown on the LCD, or raise keypad.timeout_ms in the config.".to_string()
            }
            BbnateError::Config(msg) => format!(
                "What happened: A device was addressed that is not configured ({msg}).\nLikely causes: Wrong [pins] values in the config.\nHow to fix: Check [pins] against the wiring and rerun."
            ),
            other => format!(
                "What happened: {other}.\nLikely causes: See logs.\nHow to fix: Re-run with --log-level=debug or set RUST_LOG for more detail."
            ),
        };
    }

    let msg = err.to_string();
    let lower = msg.to_ascii_lowercase();
    let root = err.root_cause().to_string();

    if lower.contains("failed to read config") {
        return format!(
            "What happened: The config file could not be read ({root}).\nLikely causes: Wrong --config path or missing permissions.\nHow to fix: Pass --config pointing at a readable TOML file (see etc/bbnate.toml)."
        );
    }

    if lower.contains("invalid configuration") {
        return format!(
            "What happened: Configuration is invalid ({root}).\nLikely causes: Missing [pins] entries, shared pins, or out-of-range values.\nHow to fix: Edit the TOML config and try again."
        );
    }

    if lower.contains("echo-raw") {
        return format!("What happened: {msg}.\nHow to fix: Pass a raw count within the ADC range.");
    }

    let mut cause = String::new();
    if let Some(src) = err.source() {
        cause = format!(" Cause: {src}");
    }
    format!(
        "Something went wrong.{cause}\nHow to fix: Re-run with --log-level=debug for details. Original: {msg}"
    )
}

/// Stable name of the failure for JSON output.
pub fn reason_name(err: &eyre::Report) -> &'static str {
    match err.downcast_ref::<BbnateError>() {
        Some(BbnateError::Cancelled) => "Cancelled",
        Some(BbnateError::KeypadTimeout) => "KeypadTimeout",
        Some(BbnateError::Config(_)) => "Config",
        Some(BbnateError::Hardware(_) | BbnateError::HardwareFault(_)) => "Hardware",
        None if err.downcast_ref::<BuildError>().is_some() => "Build",
        None => "Error",
    }
}

/// Cancelled runs exit 2, keypad timeouts 3, everything else 1.
pub fn exit_code_for_error(err: &eyre::Report) -> i32 {
    match err.downcast_ref::<BbnateError>() {
        Some(BbnateError::Cancelled) => 2,
        Some(BbnateError::KeypadTimeout) => 3,
        _ => 1,
    }
}

/// Structured JSON for errors when --json is enabled.
pub fn format_error_json(err: &eyre::Report) -> String {
    serde_json::json!({
        "reason": reason_name(err),
        "message": humanize(err),
    })
    .to_string()
}
