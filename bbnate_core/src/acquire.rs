//! Windowed echo acquisition.
//!
//! The echo line is sampled in `WINDOW_COUNT` windows of `WINDOW_LEN`
//! conversions. A single running total accumulates across all windows and is
//! recorded after each one, giving a non-decreasing cumulative array. The
//! returned series is that array differenced and divided by the window length:
//!
//! ```text
//! series[0] = cumulative[0] / WINDOW_LEN
//! series[i] = (cumulative[i] - cumulative[i - 1]) / WINDOW_LEN
//! ```

use bbnate_traits::AnalogInput;
use eyre::WrapErr;

use crate::cancel::CancelToken;
use crate::error::{BbnateError, Result};
use crate::hw_error::map_hw_error;
use crate::voltage::AdcScale;

/// Windows per acquisition.
pub const WINDOW_COUNT: usize = 20;
/// Conversions per window.
pub const WINDOW_LEN: usize = 50;

/// Differenced per-window averages (volts).
pub type VoltageWindowSeries = [f32; WINDOW_COUNT];

/// Result of one acquisition: the running sums and the series derived from them.
#[derive(Debug, Clone, PartialEq)]
pub struct Acquisition {
    pub cumulative: [f32; WINDOW_COUNT],
    pub series: VoltageWindowSeries,
}

/// Second pass of the acquisition: difference the running sums and normalize
/// by the window length.
pub fn difference_windows(cumulative: &[f32; WINDOW_COUNT]) -> VoltageWindowSeries {
    let n = WINDOW_LEN as f32;
    let mut series = [0.0; WINDOW_COUNT];
    series[0] = cumulative[0] / n;
    for i in 1..WINDOW_COUNT {
        series[i] = (cumulative[i] - cumulative[i - 1]) / n;
    }
    series
}

#[derive(Debug, Clone)]
pub struct SignalAcquirer {
    channel: u8,
    scale: AdcScale,
}

impl SignalAcquirer {
    pub fn new(channel: u8, scale: AdcScale) -> Self {
        Self { channel, scale }
    }

    /// Sample the echo line and build the window series.
    ///
    /// `cancel` is checked between windows; a cancelled acquisition returns
    /// `BbnateError::Cancelled` and discards the partial sums.
    pub fn read_signal<A>(&self, adc: &mut A, cancel: Option<&CancelToken>) -> Result<Acquisition>
    where
        A: AnalogInput + ?Sized,
    {
        let mut running = 0.0_f32;
        let mut cumulative = [0.0_f32; WINDOW_COUNT];

        for (window, slot) in cumulative.iter_mut().enumerate() {
            if cancel.is_some_and(CancelToken::is_cancelled) {
                tracing::info!(window, "acquisition cancelled");
                return Err(BbnateError::Cancelled.into());
            }
            for _ in 0..WINDOW_LEN {
                let raw = adc
                    .read_raw(self.channel)
                    .map_err(|e| eyre::Report::new(map_hw_error(&*e)))
                    .wrap_err("reading echo signal")?;
                running += self.scale.to_voltage(raw);
            }
            tracing::debug!(window, sum = running, "sum");
            *slot = running;
        }

        let series = difference_windows(&cumulative);
        for (window, value) in series.iter().enumerate().skip(1) {
            tracing::debug!(window, filtered = *value, "filtered sum");
        }

        Ok(Acquisition { cumulative, series })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn first_element_is_unadjusted_first_window_average() {
        let mut cumulative = [0.0; WINDOW_COUNT];
        for (i, c) in cumulative.iter_mut().enumerate() {
            *c = 50.0 * (i as f32 + 1.0);
        }
        let series = difference_windows(&cumulative);
        assert_eq!(series[0], 1.0);
        assert!(series.iter().all(|v| (*v - 1.0).abs() < 1e-6));
    }

    #[test]
    fn flat_cumulative_differences_to_zero_after_first() {
        let cumulative = [25.0; WINDOW_COUNT];
        let series = difference_windows(&cumulative);
        assert_eq!(series[0], 0.5);
        assert!(series[1..].iter().all(|v| *v == 0.0));
    }
}
