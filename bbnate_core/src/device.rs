//! The device aggregate and its builder.
//!
//! `Bbnate` owns every hardware handle and wires the pipeline stages together.
//! Handles are injected through `BbnateBuilder`; building configures the
//! transducer and LED pins as outputs.

use bbnate_traits::{AnalogInput, CharDisplay, Clock, DigitalOutput, MonotonicClock};
use eyre::WrapErr;

use crate::acquire::{Acquisition, SignalAcquirer};
use crate::bmd::BmdClassifier;
use crate::cancel::{CancelToken, WaitLimit, WaitStop};
use crate::config::DeviceCfg;
use crate::error::{BuildError, Result};
use crate::hw_error::map_hw_error;
use crate::integrate::integrate;
use crate::keypad::{Button, KeypadDecoder};
use crate::ping::Transducer;
use crate::presenter::{LedPins, Presenter};
use crate::status::{CycleOutcome, Measurement};

pub struct Bbnate {
    outputs: Box<dyn DigitalOutput>,
    analog: Box<dyn AnalogInput>,
    display: Box<dyn CharDisplay>,
    clock: Box<dyn Clock>,
    cfg: DeviceCfg,
    leds: LedPins,
    keypad: KeypadDecoder,
    transducer: Transducer,
    acquirer: SignalAcquirer,
    classifier: BmdClassifier,
    cancel: CancelToken,
}

impl core::fmt::Debug for Bbnate {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("Bbnate")
            .field("cfg", &self.cfg)
            .field("cancelled", &self.cancel.is_cancelled())
            .finish_non_exhaustive()
    }
}

impl Bbnate {
    pub fn builder() -> BbnateBuilder {
        BbnateBuilder::default()
    }

    pub fn config(&self) -> &DeviceCfg {
        &self.cfg
    }

    /// Token observed by every keypad wait and acquisition of this device.
    pub fn cancel_token(&self) -> CancelToken {
        self.cancel.clone()
    }

    pub fn classifier(&self) -> &BmdClassifier {
        &self.classifier
    }

    pub fn presenter(&mut self) -> Presenter<'_, dyn CharDisplay, dyn DigitalOutput> {
        Presenter::new(self.display.as_mut(), self.outputs.as_mut(), self.leds)
    }

    fn wait_limit(&self) -> WaitLimit {
        WaitLimit::unbounded()
            .with_timeout(self.cfg.keypad.timeout)
            .with_cancel(self.cancel.clone())
    }

    fn stop_reason(&self) -> WaitStop {
        if self.cancel.is_cancelled() {
            WaitStop::Cancelled
        } else {
            WaitStop::TimedOut
        }
    }

    /// Power-up screen sequence: size the LCD, light the power LED, greet.
    pub fn start(&mut self) -> Result<()> {
        let mut p = self.presenter();
        p.setup()?;
        p.power_on()?;
        p.welcome()
    }

    /// Wait for any key, bounded by the configured timeout and the cancel token.
    pub fn wait_press(&mut self) -> Result<Button> {
        let limit = self.wait_limit();
        self.keypad
            .wait_press(self.analog.as_mut(), self.clock.as_ref(), &limit)
    }

    /// Wait for `target`, ignoring other keys. `Button::None` if the wait stopped.
    pub fn wait_for(&mut self, target: Button) -> Result<Button> {
        let limit = self.wait_limit();
        self.keypad.wait_matching(
            self.analog.as_mut(),
            self.clock.as_ref(),
            &limit,
            |b| b == target,
        )
    }

    pub fn send_ping(&mut self) -> Result<()> {
        self.transducer
            .send_ping(self.outputs.as_mut(), self.clock.as_ref())
    }

    pub fn read_signal(&mut self) -> Result<Acquisition> {
        self.acquirer
            .read_signal(self.analog.as_mut(), Some(&self.cancel))
    }

    /// Ping, acquire, integrate and classify, with the measuring screen and
    /// yellow LED up for the duration of the acquisition.
    pub fn measure(&mut self) -> Result<Measurement> {
        self.presenter().measure_on()?;
        let acquired = self.send_ping().and_then(|()| self.read_signal());
        // The yellow LED goes off even when acquisition failed.
        let off = self.presenter().measure_off();
        let acquisition = acquired?;
        off?;

        let energy = integrate(&acquisition.series);
        let outcome = self.classifier.evaluate(energy);
        let bmd = self.classifier.classify(energy);
        tracing::info!(energy, bmd, outcome = outcome.name(), "measurement complete");
        Ok(Measurement {
            acquisition,
            energy,
            outcome,
        })
    }

    /// Result screen plus the clear prompt.
    pub fn present(&mut self, m: &Measurement) -> Result<()> {
        let mut p = self.presenter();
        p.present_result(m.bmd())?;
        p.prompt_clear()
    }

    /// instructions → Acquire → measure → present → Clear → red LED off.
    pub fn run_cycle(&mut self) -> Result<CycleOutcome> {
        self.presenter().instructions()?;

        if self.wait_for(Button::Acquire)? == Button::None {
            return Ok(CycleOutcome::Stopped {
                stop: self.stop_reason(),
                measurement: None,
            });
        }

        let measurement = self.measure()?;
        self.present(&measurement)?;

        if self.wait_for(Button::Clear)? == Button::None {
            return Ok(CycleOutcome::Stopped {
                stop: self.stop_reason(),
                measurement: Some(measurement),
            });
        }
        self.presenter().error_off()?;
        Ok(CycleOutcome::Completed(measurement))
    }
}

/// Builder for `Bbnate`. Outputs, analog input and display are required;
/// the clock defaults to `MonotonicClock` and the config to the reference device.
#[derive(Default)]
pub struct BbnateBuilder {
    outputs: Option<Box<dyn DigitalOutput>>,
    analog: Option<Box<dyn AnalogInput>>,
    display: Option<Box<dyn CharDisplay>>,
    clock: Option<Box<dyn Clock>>,
    cfg: Option<DeviceCfg>,
    cancel: Option<CancelToken>,
}

impl BbnateBuilder {
    pub fn with_outputs(mut self, o: impl DigitalOutput + 'static) -> Self {
        self.outputs = Some(Box::new(o));
        self
    }

    pub fn with_analog(mut self, a: impl AnalogInput + 'static) -> Self {
        self.analog = Some(Box::new(a));
        self
    }

    pub fn with_display(mut self, d: impl CharDisplay + 'static) -> Self {
        self.display = Some(Box::new(d));
        self
    }

    pub fn with_clock(mut self, c: impl Clock + 'static) -> Self {
        self.clock = Some(Box::new(c));
        self
    }

    pub fn with_config(mut self, cfg: DeviceCfg) -> Self {
        self.cfg = Some(cfg);
        self
    }

    /// Share an existing token, e.g. one already wired to a signal handler.
    pub fn with_cancel(mut self, token: CancelToken) -> Self {
        self.cancel = Some(token);
        self
    }

    pub fn build(self) -> Result<Bbnate> {
        let mut outputs = self
            .outputs
            .ok_or_else(|| eyre::Report::new(BuildError::MissingOutputs))?;
        let analog = self
            .analog
            .ok_or_else(|| eyre::Report::new(BuildError::MissingAnalog))?;
        let display = self
            .display
            .ok_or_else(|| eyre::Report::new(BuildError::MissingDisplay))?;
        let clock = self
            .clock
            .unwrap_or_else(|| Box::new(MonotonicClock::new()));
        let cfg = self.cfg.unwrap_or_default();

        if !cfg.bmd.is_valid() {
            return Err(eyre::Report::new(BuildError::InvalidConfig(
                "bmd thresholds must be finite and satisfy max > mid1 > mid2 > min > 0",
            )));
        }
        if !(cfg.keypad.tolerance_v > 0.0) {
            return Err(eyre::Report::new(BuildError::InvalidConfig(
                "keypad tolerance must be > 0",
            )));
        }
        if cfg.adc.max_raw == 0 || !(cfg.adc.reference_v > 0.0) {
            return Err(eyre::Report::new(BuildError::InvalidConfig(
                "adc scale must be positive",
            )));
        }

        let pins = &cfg.pins;
        for pin in [pins.transducer, pins.green_led, pins.yellow_led, pins.red_led] {
            outputs
                .configure_output(pin)
                .map_err(|e| eyre::Report::new(map_hw_error(&*e)))
                .wrap_err_with(|| format!("configuring pin {pin} as output"))?;
        }

        let leds = LedPins {
            green: pins.green_led,
            yellow: pins.yellow_led,
            red: pins.red_led,
        };
        let keypad = KeypadDecoder::new(pins.keypad_channel, cfg.adc, &cfg.keypad);
        let transducer = Transducer::new(pins.transducer, &cfg.ping);
        let acquirer = SignalAcquirer::new(pins.echo_channel, cfg.adc);
        let classifier = BmdClassifier::new(cfg.bmd);
        tracing::debug!(?pins, "device pins configured");

        Ok(Bbnate {
            outputs,
            analog,
            display,
            clock,
            cfg,
            leds,
            keypad,
            transducer,
            acquirer,
            classifier,
            cancel: self.cancel.unwrap_or_default(),
        })
    }
}
