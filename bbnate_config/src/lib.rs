#![cfg_attr(all(not(debug_assertions), not(test)), deny(warnings))]
#![cfg_attr(
    all(not(debug_assertions), not(test)),
    deny(clippy::all, clippy::pedantic, clippy::nursery)
)]
#![allow(clippy::module_name_repetitions, clippy::missing_errors_doc)]
//! Config schema for the BBnate device.
//!
//! `Config` and its sections are deserialized from TOML and checked with
//! `Config::validate`. Every section except `[pins]` has defaults matching the
//! reference device (Arduino Uno + SainSmart LCD keypad shield).
use serde::Deserialize;
use std::path::Path;

#[derive(Debug, Deserialize, Clone)]
pub struct Pins {
    /// Digital pin driving the ultrasonic transducer trigger.
    pub transducer: u8,
    /// Power LED.
    pub green_led: u8,
    /// Measurement-in-progress LED.
    pub yellow_led: u8,
    /// Error LED.
    pub red_led: u8,
    /// ADC channel of the resistor-ladder keypad (A0 on the shield).
    #[serde(default)]
    pub keypad_channel: u8,
    /// ADC channel of the echo return line (A1).
    #[serde(default = "default_echo_channel")]
    pub echo_channel: u8,
}

const fn default_echo_channel() -> u8 {
    1
}

#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct AdcCfg {
    /// ADC reference voltage (V).
    pub reference_v: f32,
    /// Largest raw reading (1023 for a 10-bit converter).
    pub max_raw: u16,
}

impl Default for AdcCfg {
    fn default() -> Self {
        Self {
            reference_v: 5.00,
            max_raw: 1023,
        }
    }
}

#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct KeypadCfg {
    /// Half-width of each button's voltage window (V).
    pub tolerance_v: f32,
    /// Delay between keypad polls; 0 polls back-to-back.
    pub poll_ms: u64,
    /// Give up waiting for a press after this long. Absent waits forever.
    pub timeout_ms: Option<u64>,
}

impl Default for KeypadCfg {
    fn default() -> Self {
        Self {
            tolerance_v: 0.05,
            poll_ms: 0,
            timeout_ms: None,
        }
    }
}

#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct PingCfg {
    /// How long the transducer pin is held high.
    pub pulse_ms: u64,
}

impl Default for PingCfg {
    fn default() -> Self {
        Self { pulse_ms: 5 }
    }
}

/// Energy thresholds for the BMD bands. Placeholders until real calibration exists.
#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct BmdCfg {
    pub max: f32,
    pub mid1: f32,
    pub mid2: f32,
    pub min: f32,
}

impl Default for BmdCfg {
    fn default() -> Self {
        Self {
            max: 17.00,
            mid1: 12.00,
            mid2: 8.00,
            min: 3.00,
        }
    }
}

#[derive(Debug, Deserialize, Default, Clone)]
#[serde(default)]
pub struct Logging {
    pub file: Option<String>,  // path to .log (JSON lines)
    pub level: Option<String>, // "info","debug"
    /// Log rotation policy: "never" | "daily" | "hourly" (default: never)
    pub rotation: Option<String>,
}

#[derive(Debug, Deserialize, Clone)]
pub struct Config {
    pub pins: Pins,
    #[serde(default)]
    pub adc: AdcCfg,
    #[serde(default)]
    pub keypad: KeypadCfg,
    #[serde(default)]
    pub ping: PingCfg,
    #[serde(default)]
    pub bmd: BmdCfg,
    #[serde(default)]
    pub logging: Logging,
}

pub fn load_toml(s: &str) -> Result<Config, toml::de::Error> {
    toml::from_str::<Config>(s)
}

/// Read, parse and validate a config file.
pub fn load_file(path: &Path) -> eyre::Result<Config> {
    let text = std::fs::read_to_string(path)
        .map_err(|e| eyre::eyre!("read config {}: {}", path.display(), e))?;
    let cfg = load_toml(&text).map_err(|e| eyre::eyre!("parse config {}: {}", path.display(), e))?;
    cfg.validate()?;
    Ok(cfg)
}

impl Config {
    pub fn validate(&self) -> eyre::Result<()> {
        // Pins
        let digital = [
            ("pins.transducer", self.pins.transducer),
            ("pins.green_led", self.pins.green_led),
            ("pins.yellow_led", self.pins.yellow_led),
            ("pins.red_led", self.pins.red_led),
        ];
        for (i, (name, pin)) in digital.iter().enumerate() {
            if let Some((other, _)) = digital[i + 1..].iter().find(|(_, p)| p == pin) {
                eyre::bail!("{name} and {other} share pin {pin}");
            }
        }
        if self.pins.keypad_channel == self.pins.echo_channel {
            eyre::bail!("pins.keypad_channel and pins.echo_channel must differ");
        }

        // ADC
        if !(self.adc.reference_v.is_finite() && self.adc.reference_v > 0.0) {
            eyre::bail!("adc.reference_v must be > 0");
        }
        if self.adc.max_raw == 0 {
            eyre::bail!("adc.max_raw must be >= 1");
        }

        // Keypad
        if !(self.keypad.tolerance_v > 0.0 && self.keypad.tolerance_v < self.adc.reference_v) {
            eyre::bail!("keypad.tolerance_v must be in (0.0, adc.reference_v)");
        }
        if self.keypad.poll_ms > 1000 {
            eyre::bail!("keypad.poll_ms is unreasonably large (>1s)");
        }
        if self.keypad.timeout_ms == Some(0) {
            eyre::bail!("keypad.timeout_ms must be >= 1 when set");
        }

        // Ping
        if self.ping.pulse_ms == 0 {
            eyre::bail!("ping.pulse_ms must be >= 1");
        }
        if self.ping.pulse_ms > 1000 {
            eyre::bail!("ping.pulse_ms is unreasonably large (>1s)");
        }

        // BMD bands
        let b = &self.bmd;
        if ![b.max, b.mid1, b.mid2, b.min].iter().all(|v| v.is_finite()) {
            eyre::bail!("bmd thresholds must be finite");
        }
        if b.min <= 0.0 {
            eyre::bail!("bmd.min must be > 0");
        }
        if !(b.max > b.mid1 && b.mid1 > b.mid2 && b.mid2 > b.min) {
            eyre::bail!("bmd thresholds must satisfy max > mid1 > mid2 > min");
        }

        // Logging
        if let Some(rot) = self.logging.rotation.as_deref()
            && !matches!(rot, "never" | "daily" | "hourly")
        {
            eyre::bail!("logging.rotation must be one of never|daily|hourly, got {rot}");
        }

        Ok(())
    }
}
