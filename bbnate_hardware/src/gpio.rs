//! Raspberry Pi GPIO output bank (LEDs and transducer trigger) via `rppal`.
use std::collections::BTreeMap;

use bbnate_traits::{BoxError, DigitalOutput, Level};
use rppal::gpio::{Gpio, OutputPin};

use crate::error::{HwError, Result};

pub struct GpioOutputs {
    gpio: Gpio,
    pins: BTreeMap<u8, OutputPin>,
}

impl GpioOutputs {
    pub fn new() -> Result<Self> {
        let gpio = Gpio::new().map_err(|e| HwError::Gpio(format!("open gpio: {e}")))?;
        Ok(Self {
            gpio,
            pins: BTreeMap::new(),
        })
    }
}

impl DigitalOutput for GpioOutputs {
    fn configure_output(&mut self, pin: u8) -> std::result::Result<(), BoxError> {
        if self.pins.contains_key(&pin) {
            return Ok(());
        }
        let mut out = self
            .gpio
            .get(pin)
            .map_err(|e| HwError::Gpio(format!("open pin {pin}: {e}")))?
            .into_output();
        out.set_low();
        tracing::debug!(pin, "gpio output configured");
        self.pins.insert(pin, out);
        Ok(())
    }

    fn write(&mut self, pin: u8, level: Level) -> std::result::Result<(), BoxError> {
        let out = self.pins.get_mut(&pin).ok_or(HwError::InvalidPin(pin))?;
        match level {
            Level::High => out.set_high(),
            Level::Low => out.set_low(),
        }
        Ok(())
    }
}
