//! Runtime configuration types for the device.
//!
//! These are the structs the core works with. They are separate from the
//! TOML-deserialized config in `bbnate_config`; see `conversions`.

use std::time::Duration;

use crate::voltage::AdcScale;

/// Pin and channel assignment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PinMap {
    pub transducer: u8,
    pub green_led: u8,
    pub yellow_led: u8,
    pub red_led: u8,
    pub keypad_channel: u8,
    pub echo_channel: u8,
}

impl Default for PinMap {
    fn default() -> Self {
        Self {
            transducer: 2,
            green_led: 3,
            yellow_led: 11,
            red_led: 12,
            keypad_channel: 0,
            echo_channel: 1,
        }
    }
}

/// Keypad decoding and polling.
#[derive(Debug, Clone)]
pub struct KeypadCfg {
    /// Half-width of each button's voltage window (V). Default: 0.05 V.
    pub tolerance_v: f32,
    /// Delay between polls. Zero polls back-to-back.
    pub poll: Duration,
    /// Upper bound on a single wait. `None` waits until a press or cancellation.
    pub timeout: Option<Duration>,
}

impl Default for KeypadCfg {
    fn default() -> Self {
        Self {
            tolerance_v: 0.05,
            poll: Duration::ZERO,
            timeout: None,
        }
    }
}

/// Transducer trigger pulse.
#[derive(Debug, Clone)]
pub struct PingCfg {
    pub pulse: Duration,
}

impl Default for PingCfg {
    fn default() -> Self {
        Self {
            pulse: Duration::from_millis(5),
        }
    }
}

/// Energy thresholds of the BMD bands. Must satisfy `max > mid1 > mid2 > min`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BmdThresholds {
    pub max: f32,
    pub mid1: f32,
    pub mid2: f32,
    pub min: f32,
}

impl Default for BmdThresholds {
    fn default() -> Self {
        // Placeholders until the device is calibrated.
        Self {
            max: 17.00,
            mid1: 12.00,
            mid2: 8.00,
            min: 3.00,
        }
    }
}

impl BmdThresholds {
    pub fn is_ordered(&self) -> bool {
        self.max > self.mid1 && self.mid1 > self.mid2 && self.mid2 > self.min
    }

    /// Finite, strictly ordered and with a positive bottom band.
    pub fn is_valid(&self) -> bool {
        [self.max, self.mid1, self.mid2, self.min]
            .iter()
            .all(|v| v.is_finite())
            && self.min > 0.0
            && self.is_ordered()
    }
}

/// Everything the device aggregate needs besides its hardware handles.
#[derive(Debug, Clone, Default)]
pub struct DeviceCfg {
    pub pins: PinMap,
    pub adc: AdcScale,
    pub keypad: KeypadCfg,
    pub ping: PingCfg,
    pub bmd: BmdThresholds,
}
