//! Results of a measurement and of a full keypad-driven cycle.

use crate::acquire::Acquisition;
use crate::bmd::BmdOutcome;
use crate::cancel::WaitStop;

/// One pass of ping → acquire → integrate → classify.
#[derive(Debug, Clone)]
pub struct Measurement {
    pub acquisition: Acquisition,
    pub energy: f32,
    pub outcome: BmdOutcome,
}

impl Measurement {
    /// The value shown on the device; 0.00 when no band matched.
    pub fn bmd(&self) -> f32 {
        self.outcome.value()
    }
}

#[derive(Debug, Clone)]
pub enum CycleOutcome {
    /// Measured, presented and acknowledged with Clear.
    Completed(Measurement),
    /// A keypad wait stopped. `measurement` is set when it was the Clear wait.
    Stopped {
        stop: WaitStop,
        measurement: Option<Measurement>,
    },
}
