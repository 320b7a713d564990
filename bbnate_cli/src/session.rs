//! Device assembly and the measure/run/classify/self-check commands.
//!
//! The keypad, echo line and LCD are always simulated here; with the
//! `hardware` feature the LEDs and transducer trigger drive real GPIO.

use bbnate_config::Config;
use bbnate_core::error::{BbnateError, Result as CoreResult};
use bbnate_core::keypad::LADDER;
use bbnate_core::{
    AdcScale, Bbnate, BmdClassifier, BmdOutcome, BmdThresholds, Button, CancelToken,
    CycleOutcome, DeviceCfg, Measurement, WaitStop, format_bmd,
};
use bbnate_hardware::{AdcHandle, LcdProbe, PinProbe, SimulatedAdc, SimulatedLcd, volts_to_raw};
use bbnate_traits::DigitalOutput;
use eyre::WrapErr;
use serde_json::json;

/// A device plus the handles used to script its keypad and read its screen.
pub struct Rig {
    pub device: Bbnate,
    keypad: AdcHandle,
    keypad_channel: u8,
    scale: AdcScale,
    lcd: LcdProbe,
    leds: Option<PinProbe>,
}

#[cfg(all(feature = "hardware", target_os = "linux"))]
fn outputs() -> eyre::Result<(Box<dyn DigitalOutput>, Option<PinProbe>)> {
    let gpio = bbnate_hardware::gpio::GpioOutputs::new().wrap_err("open GPIO outputs")?;
    Ok((Box::new(gpio), None))
}

#[cfg(not(all(feature = "hardware", target_os = "linux")))]
fn outputs() -> eyre::Result<(Box<dyn DigitalOutput>, Option<PinProbe>)> {
    let sim = bbnate_hardware::SimulatedOutputs::new();
    let probe = sim.probe();
    Ok((Box::new(sim), Some(probe)))
}

impl Rig {
    pub fn assemble(cfg: &Config, echo_raw: u16, cancel: CancelToken) -> eyre::Result<Self> {
        let dev: DeviceCfg = cfg.into();
        if echo_raw > dev.adc.max_raw {
            eyre::bail!(
                "--echo-raw {echo_raw} exceeds adc.max_raw {}",
                dev.adc.max_raw
            );
        }

        // With no key down the ladder line sits at the reference voltage.
        let adc = SimulatedAdc::new()
            .with_channel(dev.pins.keypad_channel, dev.adc.max_raw)
            .with_channel(dev.pins.echo_channel, echo_raw);
        let keypad = adc.handle();
        let lcd = SimulatedLcd::default();
        let screen = lcd.probe();
        let (outs, leds) = outputs()?;

        let device = Bbnate::builder()
            .with_outputs(outs)
            .with_analog(adc)
            .with_display(lcd)
            .with_config(dev.clone())
            .with_cancel(cancel)
            .build()?;
        tracing::debug!(echo_raw, "simulated rig assembled");

        Ok(Self {
            device,
            keypad,
            keypad_channel: dev.pins.keypad_channel,
            scale: dev.adc,
            lcd: screen,
            leds,
        })
    }

    /// Queue one press of `button` on the simulated keypad.
    pub fn press(&self, button: Button) {
        if let Some((_, volts)) = LADDER.iter().find(|(b, _)| *b == button) {
            let raw = volts_to_raw(*volts, self.scale.reference_v, self.scale.max_raw);
            self.keypad.push(self.keypad_channel, raw);
        }
    }

    pub fn screen(&self) -> Vec<String> {
        (0..2).map(|r| self.lcd.row(r)).collect()
    }

    fn led_json(&self) -> serde_json::Value {
        let Some(probe) = &self.leds else {
            return serde_json::Value::Null;
        };
        let pins = &self.device.config().pins;
        json!({
            "green": probe.is_high(pins.green_led),
            "yellow": probe.is_high(pins.yellow_led),
            "red": probe.is_high(pins.red_led),
        })
    }

    fn print_screen(&self) {
        println!("+----------------+");
        for row in self.screen() {
            println!("|{row}|");
        }
        println!("+----------------+");
        if let Some(probe) = &self.leds {
            let pins = &self.device.config().pins;
            let on = |pin| if probe.is_high(pin) { "on" } else { "off" };
            println!(
                "leds: green={} yellow={} red={}",
                on(pins.green_led),
                on(pins.yellow_led),
                on(pins.red_led)
            );
        }
    }
}

fn outcome_json(energy: f32, outcome: BmdOutcome) -> serde_json::Value {
    json!({
        "energy": energy,
        "bmd": outcome.value(),
        "display": format_bmd(outcome.value()),
        "outcome": outcome.name(),
    })
}

fn summary(m: &Measurement) -> String {
    format!(
        "energy={:.3} bmd={} outcome={}",
        m.energy,
        format_bmd(m.bmd()),
        m.outcome.name()
    )
}

fn stop_error(stop: WaitStop) -> BbnateError {
    match stop {
        WaitStop::Cancelled => BbnateError::Cancelled,
        WaitStop::TimedOut => BbnateError::KeypadTimeout,
    }
}

pub fn measure(cfg: &Config, echo_raw: u16, cancel: CancelToken, json_out: bool) -> CoreResult<()> {
    let mut rig = Rig::assemble(cfg, echo_raw, cancel)?;
    rig.device.start()?;
    let m = rig.device.measure().wrap_err("measurement failed")?;
    rig.device.present(&m)?;

    if json_out {
        let mut obj = outcome_json(m.energy, m.outcome);
        obj["series"] = json!(m.acquisition.series);
        obj["lcd"] = json!(rig.screen());
        obj["leds"] = rig.led_json();
        println!("{obj}");
    } else {
        rig.print_screen();
        println!("{}", summary(&m));
    }
    Ok(())
}

/// Script `cycles` ACQUIRE/CLEAR pairs and run that many full cycles.
pub fn run(
    cfg: &Config,
    echo_raw: u16,
    cycles: u32,
    cancel: CancelToken,
    json_out: bool,
) -> CoreResult<()> {
    let mut rig = Rig::assemble(cfg, echo_raw, cancel)?;
    rig.device.start()?;
    for _ in 0..cycles {
        rig.press(Button::Acquire);
        rig.press(Button::Clear);
    }

    for cycle in 1..=cycles {
        match rig
            .device
            .run_cycle()
            .wrap_err_with(|| format!("cycle {cycle}"))?
        {
            CycleOutcome::Completed(m) => {
                if json_out {
                    let mut obj = outcome_json(m.energy, m.outcome);
                    obj["cycle"] = json!(cycle);
                    println!("{obj}");
                } else {
                    println!("cycle {cycle}: {}", summary(&m));
                }
            }
            CycleOutcome::Stopped { stop, measurement } => {
                tracing::warn!(cycle, ?stop, measured = measurement.is_some(), "cycle stopped");
                return Err(eyre::Report::new(stop_error(stop)).wrap_err(format!("cycle {cycle}")));
            }
        }
    }

    if !json_out {
        rig.print_screen();
    }
    Ok(())
}

pub fn classify(cfg: &Config, energy: f32, json_out: bool) {
    let classifier = BmdClassifier::new(BmdThresholds::from(&cfg.bmd));
    let outcome = classifier.evaluate(energy);
    if json_out {
        println!("{}", outcome_json(energy, outcome));
    } else {
        println!("bmd={} outcome={}", format_bmd(outcome.value()), outcome.name());
    }
}

/// Power up, ping once and read one scripted key press.
pub fn self_check(cfg: &Config, cancel: CancelToken, json_out: bool) -> CoreResult<()> {
    let mut rig = Rig::assemble(cfg, 0, cancel)?;
    rig.device.start().wrap_err("display/LED check")?;
    rig.device.send_ping().wrap_err("transducer check")?;
    rig.press(Button::Acquire);
    let pressed = rig.device.wait_press().wrap_err("keypad check")?;
    if pressed != Button::Acquire {
        eyre::bail!("keypad check read {:?}, expected Acquire", pressed);
    }
    tracing::info!("self-check passed");

    if json_out {
        println!("{}", json!({ "status": "ok", "leds": rig.led_json() }));
    } else {
        println!("self-check ok");
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config() -> Config {
        bbnate_config::load_toml(
            "[pins]\ntransducer = 2\ngreen_led = 3\nyellow_led = 11\nred_led = 12\n",
        )
        .unwrap()
    }

    #[test]
    fn echo_raw_above_adc_range_is_rejected() {
        let err = Rig::assemble(&config(), 1024, CancelToken::new())
            .err()
            .expect("out of range");
        assert!(err.to_string().contains("--echo-raw 1024"));
    }

    #[test]
    fn scripted_presses_decode_to_the_same_button() {
        let mut rig = Rig::assemble(&config(), 0, CancelToken::new()).unwrap();
        for b in [Button::Clear, Button::Up, Button::Down, Button::Left, Button::Acquire] {
            rig.press(b);
            assert_eq!(rig.device.wait_press().unwrap(), b);
        }
    }

    #[test]
    fn stop_reasons_become_core_errors() {
        assert!(matches!(stop_error(WaitStop::Cancelled), BbnateError::Cancelled));
        assert!(matches!(
            stop_error(WaitStop::TimedOut),
            BbnateError::KeypadTimeout
        ));
    }
}
