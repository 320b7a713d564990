//! `From` implementations bridging `bbnate_config` types to `bbnate_core` types.

use std::time::Duration;

use crate::config::{BmdThresholds, DeviceCfg, KeypadCfg, PingCfg, PinMap};
use crate::voltage::AdcScale;

// ── PinMap ───────────────────────────────────────────────────────────────────

impl From<&bbnate_config::Pins> for PinMap {
    fn from(c: &bbnate_config::Pins) -> Self {
        Self {
            transducer: c.transducer,
            green_led: c.green_led,
            yellow_led: c.yellow_led,
            red_led: c.red_led,
            keypad_channel: c.keypad_channel,
            echo_channel: c.echo_channel,
        }
    }
}

// ── AdcScale ─────────────────────────────────────────────────────────────────

impl From<&bbnate_config::AdcCfg> for AdcScale {
    fn from(c: &bbnate_config::AdcCfg) -> Self {
        Self {
            reference_v: c.reference_v,
            max_raw: c.max_raw,
        }
    }
}

// ── KeypadCfg ────────────────────────────────────────────────────────────────

impl From<&bbnate_config::KeypadCfg> for KeypadCfg {
    fn from(c: &bbnate_config::KeypadCfg) -> Self {
        Self {
            tolerance_v: c.tolerance_v,
            poll: Duration::from_millis(c.poll_ms),
            timeout: c.timeout_ms.map(Duration::from_millis),
        }
    }
}

// ── PingCfg ──────────────────────────────────────────────────────────────────

impl From<&bbnate_config::PingCfg> for PingCfg {
    fn from(c: &bbnate_config::PingCfg) -> Self {
        Self {
            pulse: Duration::from_millis(c.pulse_ms),
        }
    }
}

// ── BmdThresholds ────────────────────────────────────────────────────────────

impl From<&bbnate_config::BmdCfg> for BmdThresholds {
    fn from(c: &bbnate_config::BmdCfg) -> Self {
        Self {
            max: c.max,
            mid1: c.mid1,
            mid2: c.mid2,
            min: c.min,
        }
    }
}

// ── DeviceCfg ────────────────────────────────────────────────────────────────

impl From<&bbnate_config::Config> for DeviceCfg {
    fn from(c: &bbnate_config::Config) -> Self {
        Self {
            pins: (&c.pins).into(),
            adc: (&c.adc).into(),
            keypad: (&c.keypad).into(),
            ping: (&c.ping).into(),
            bmd: (&c.bmd).into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn full_config_maps_field_for_field() {
        let toml = r#"
[pins]
transducer = 5
green_led = 6
yellow_led = 7
red_led = 8
keypad_channel = 2
echo_channel = 3

[keypad]
poll_ms = 4
timeout_ms = 900

[ping]
pulse_ms = 10
"#;
        let cfg = bbnate_config::load_toml(toml).unwrap();
        let dev = DeviceCfg::from(&cfg);
        assert_eq!(dev.pins.transducer, 5);
        assert_eq!(dev.pins.echo_channel, 3);
        assert_eq!(dev.keypad.poll, Duration::from_millis(4));
        assert_eq!(dev.keypad.timeout, Some(Duration::from_millis(900)));
        assert_eq!(dev.ping.pulse, Duration::from_millis(10));
        assert_eq!(dev.bmd, BmdThresholds::default());
        assert_eq!(dev.adc, AdcScale::default());
    }
}
