//! Raw ADC counts to volts.

/// Reference voltage of the reference device's ADC.
pub const REFERENCE_V: f32 = 5.00;
/// Full-scale reading of a 10-bit converter.
pub const MAX_RAW: u16 = 1023;

/// Linear raw→volts scale: `volts = raw * (reference_v / max_raw)`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AdcScale {
    pub reference_v: f32,
    pub max_raw: u16,
}

impl Default for AdcScale {
    fn default() -> Self {
        Self {
            reference_v: REFERENCE_V,
            max_raw: MAX_RAW,
        }
    }
}

impl AdcScale {
    #[inline]
    pub fn volts_per_count(&self) -> f32 {
        self.reference_v / f32::from(self.max_raw)
    }

    #[inline]
    pub fn to_voltage(&self, raw: u16) -> f32 {
        f32::from(raw) * self.volts_per_count()
    }
}

/// Convert with the reference device's 5.00 V / 1023 scale.
#[inline]
pub fn to_voltage(raw: u16) -> f32 {
    AdcScale::default().to_voltage(raw)
}
