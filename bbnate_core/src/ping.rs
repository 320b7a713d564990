use std::time::Duration;

use bbnate_traits::{Clock, DigitalOutput, Level};
use eyre::WrapErr;

use crate::config::PingCfg;
use crate::error::Result;
use crate::hw_error::map_hw_error;

/// Ultrasonic transducer trigger.
#[derive(Debug, Clone)]
pub struct Transducer {
    pin: u8,
    pulse: Duration,
}

impl Transducer {
    pub fn new(pin: u8, cfg: &PingCfg) -> Self {
        Self {
            pin,
            pulse: cfg.pulse,
        }
    }

    pub fn pin(&self) -> u8 {
        self.pin
    }

    /// Drive the trigger pin high for the pulse length, then low.
    pub fn send_ping<O, C>(&self, out: &mut O, clock: &C) -> Result<()>
    where
        O: DigitalOutput + ?Sized,
        C: Clock + ?Sized,
    {
        out.write(self.pin, Level::High)
            .map_err(|e| eyre::Report::new(map_hw_error(&*e)))
            .wrap_err("raising transducer pin")?;
        clock.sleep(self.pulse);
        out.write(self.pin, Level::Low)
            .map_err(|e| eyre::Report::new(map_hw_error(&*e)))
            .wrap_err("lowering transducer pin")?;
        let pulse_ms = u64::try_from(self.pulse.as_millis()).unwrap_or(u64::MAX);
        tracing::trace!(pin = self.pin, pulse_ms, "ping sent");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use bbnate_hardware::{SimulatedClock, SimulatedOutputs};

    #[test]
    fn pulse_is_high_then_low_for_five_ms() {
        let mut out = SimulatedOutputs::new();
        let probe = out.probe();
        out.configure_output(2).unwrap();
        let clock = SimulatedClock::new();

        Transducer::new(2, &PingCfg::default())
            .send_ping(&mut out, &clock)
            .unwrap();

        assert_eq!(probe.writes_to(2), vec![Level::High, Level::Low]);
        assert_eq!(clock.elapsed(), Duration::from_millis(5));
    }

    #[test]
    fn oversized_pulse_still_completes() {
        let mut out = SimulatedOutputs::new();
        let probe = out.probe();
        out.configure_output(2).unwrap();
        let clock = SimulatedClock::new();
        let cfg = PingCfg {
            pulse: Duration::MAX,
        };

        Transducer::new(2, &cfg).send_ping(&mut out, &clock).unwrap();

        assert_eq!(probe.writes_to(2), vec![Level::High, Level::Low]);
        assert_eq!(clock.elapsed(), Duration::MAX);
    }

    #[test]
    fn unconfigured_pin_surfaces_an_error() {
        let mut out = SimulatedOutputs::new();
        let clock = SimulatedClock::new();
        let err = Transducer::new(9, &PingCfg::default())
            .send_ping(&mut out, &clock)
            .unwrap_err();
        assert!(format!("{err:#}").contains("transducer"));
    }
}
