//! Threshold-band bone mineral density estimate.
//!
//! Energy is compared against four ordered thresholds (`max > mid1 > mid2 > min`)
//! and mapped to a band midpoint normalized by `max`:
//!
//! | energy                  | estimate              |
//! |-------------------------|-----------------------|
//! | `> max`                 | 0.00 (no band)        |
//! | `== max`                | 1.00                  |
//! | `mid1 <= e < max`       | `(max + mid1) / 2 / max` |
//! | `mid2 <= e < mid1`      | `(mid1 + mid2) / 2 / max` |
//! | `min < e < mid2`        | `(mid2 + min) / 2 / max` |
//! | `== min`                | `min / max`           |
//! | `< min`                 | 0.00 (no band)        |
//!
//! 0.00 doubles as the "no usable result" sentinel consumed by the presenter.

use crate::config::BmdThresholds;

/// Value reported when energy falls outside every band.
pub const NO_ESTIMATE: f32 = 0.00;

/// Classification with the out-of-band causes kept apart.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum BmdOutcome {
    Estimate(f32),
    /// Energy strictly above the top threshold.
    AboveMax,
    /// Energy strictly below the bottom threshold.
    BelowMin,
    /// Energy was NaN.
    NotFinite,
}

impl BmdOutcome {
    /// Collapse to the device-level value: the estimate, or 0.00 for every miss.
    pub fn value(self) -> f32 {
        match self {
            BmdOutcome::Estimate(v) => v,
            BmdOutcome::AboveMax | BmdOutcome::BelowMin | BmdOutcome::NotFinite => NO_ESTIMATE,
        }
    }

    pub fn is_estimate(self) -> bool {
        matches!(self, BmdOutcome::Estimate(_))
    }

    pub fn name(self) -> &'static str {
        match self {
            BmdOutcome::Estimate(_) => "estimate",
            BmdOutcome::AboveMax => "above_max",
            BmdOutcome::BelowMin => "below_min",
            BmdOutcome::NotFinite => "not_finite",
        }
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct BmdClassifier {
    thresholds: BmdThresholds,
}

impl BmdClassifier {
    pub fn new(thresholds: BmdThresholds) -> Self {
        Self { thresholds }
    }

    pub fn thresholds(&self) -> &BmdThresholds {
        &self.thresholds
    }

    #[allow(clippy::float_cmp)]
    pub fn evaluate(&self, energy: f32) -> BmdOutcome {
        let BmdThresholds {
            max,
            mid1,
            mid2,
            min,
        } = self.thresholds;

        if energy.is_nan() {
            BmdOutcome::NotFinite
        } else if energy > max {
            BmdOutcome::AboveMax
        } else if energy == max {
            BmdOutcome::Estimate(max / max)
        } else if energy >= mid1 {
            BmdOutcome::Estimate((max + mid1) / 2.0 / max)
        } else if energy >= mid2 {
            BmdOutcome::Estimate((mid1 + mid2) / 2.0 / max)
        } else if energy > min {
            BmdOutcome::Estimate((mid2 + min) / 2.0 / max)
        } else if energy == min {
            BmdOutcome::Estimate(min / max)
        } else {
            BmdOutcome::BelowMin
        }
    }

    /// Device-level estimate; 0.00 when no band matched. The cause of a miss is logged.
    pub fn classify(&self, energy: f32) -> f32 {
        let outcome = self.evaluate(energy);
        match outcome {
            BmdOutcome::Estimate(bmd) => tracing::debug!(energy, bmd, "bmd estimate"),
            BmdOutcome::AboveMax => tracing::warn!(
                energy,
                max = self.thresholds.max,
                "energy above top band; reporting no estimate"
            ),
            BmdOutcome::BelowMin => tracing::warn!(
                energy,
                min = self.thresholds.min,
                "energy below bottom band; reporting no estimate"
            ),
            BmdOutcome::NotFinite => tracing::warn!("energy is NaN; reporting no estimate"),
        }
        outcome.value()
    }
}

/// Classify with the placeholder thresholds.
pub fn classify(energy: f32) -> f32 {
    BmdClassifier::default().classify(energy)
}
