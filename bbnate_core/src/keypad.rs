//! Resistor-ladder keypad decoding (SainSmart LCD keypad shield).
//!
//! All five keys share one ADC channel; each key pulls it to a known voltage.
//! With no key pressed the line sits at the reference voltage.

use std::time::Duration;

use bbnate_traits::{AnalogInput, Clock};
use eyre::WrapErr;

use crate::cancel::{WaitLimit, WaitStop};
use crate::config::KeypadCfg;
use crate::error::Result;
use crate::hw_error::map_hw_error;
use crate::voltage::AdcScale;

/// Keypad identities. `None` is the idle/polling state and never the result
/// of a completed press; `Reset` is the shield's hardware reset line and is
/// never produced by decoding.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Button {
    None,
    /// Select key, starts a measurement.
    Acquire,
    /// Right key, clears the result screen.
    Clear,
    Left,
    Up,
    Down,
    Reset,
}

impl Button {
    /// Single-character legend code.
    pub fn code(self) -> char {
        match self {
            Button::None => 'N',
            Button::Acquire => 'A',
            Button::Clear => 'R',
            Button::Left => 'L',
            Button::Up => 'U',
            Button::Down => 'D',
            Button::Reset => 'S',
        }
    }

    pub fn from_code(c: char) -> Option<Self> {
        Some(match c {
            'N' => Button::None,
            'A' => Button::Acquire,
            'R' => Button::Clear,
            'L' => Button::Left,
            'U' => Button::Up,
            'D' => Button::Down,
            'S' => Button::Reset,
            _ => return None,
        })
    }
}

/// Shortest sleep between polls of a wait that has a timeout, so the
/// timeout is reached on clocks that only advance when slept on.
pub const MIN_BOUNDED_POLL: Duration = Duration::from_millis(1);

/// Reference voltages in match order. The first window containing the
/// sample wins, so Right/Clear owns 0.00 V even if windows overlap.
pub const LADDER: [(Button, f32); 5] = [
    (Button::Clear, 0.00),
    (Button::Up, 0.70),
    (Button::Down, 1.60),
    (Button::Left, 2.45),
    (Button::Acquire, 3.62),
];

#[derive(Debug, Clone)]
pub struct KeypadDecoder {
    channel: u8,
    scale: AdcScale,
    tolerance_v: f32,
    poll: Duration,
}

impl KeypadDecoder {
    pub fn new(channel: u8, scale: AdcScale, cfg: &KeypadCfg) -> Self {
        Self {
            channel,
            scale,
            tolerance_v: cfg.tolerance_v,
            poll: cfg.poll,
        }
    }

    pub fn tolerance_v(&self) -> f32 {
        self.tolerance_v
    }

    /// Map one voltage sample to a button; `Button::None` when no window matches.
    pub fn decode_voltage(&self, volts: f32) -> Button {
        let thr = self.tolerance_v;
        LADDER
            .iter()
            .find(|(_, reference)| volts >= reference - thr && volts <= reference + thr)
            .map_or(Button::None, |(button, _)| *button)
    }

    /// Poll the keypad channel until a key is pressed or `limit` stops the wait.
    ///
    /// Returns `Button::None` when the wait was cancelled or timed out; with
    /// `WaitLimit::unbounded()` this only returns once a key is pressed.
    pub fn wait_press<A, C>(&self, adc: &mut A, clock: &C, limit: &WaitLimit) -> Result<Button>
    where
        A: AnalogInput + ?Sized,
        C: Clock + ?Sized,
    {
        self.wait_matching(adc, clock, limit, |_| true)
    }

    /// Like `wait_press`, but keys rejected by `accept` are ignored and the
    /// wait goes on. The timeout covers the whole wait, not each press.
    pub fn wait_matching<A, C, F>(
        &self,
        adc: &mut A,
        clock: &C,
        limit: &WaitLimit,
        accept: F,
    ) -> Result<Button>
    where
        A: AnalogInput + ?Sized,
        C: Clock + ?Sized,
        F: Fn(Button) -> bool,
    {
        let started = clock.now();
        let poll = if limit.timeout.is_some() {
            self.poll.max(MIN_BOUNDED_POLL)
        } else {
            self.poll
        };
        let mut polls: u64 = 0;
        loop {
            let raw = adc
                .read_raw(self.channel)
                .map_err(|e| eyre::Report::new(map_hw_error(&*e)))
                .wrap_err("reading keypad")?;
            polls = polls.saturating_add(1);
            let volts = self.scale.to_voltage(raw);
            let button = self.decode_voltage(volts);
            if button != Button::None {
                if accept(button) {
                    tracing::debug!(button = %button.code(), volts, polls, "keypad press");
                    return Ok(button);
                }
                tracing::trace!(button = %button.code(), "ignoring keypad press");
            }
            if let Some(stop) = limit.check(clock, started) {
                match stop {
                    WaitStop::Cancelled => tracing::info!(polls, "keypad wait cancelled"),
                    WaitStop::TimedOut => tracing::warn!(
                        polls,
                        waited_ms = clock.ms_since(started),
                        "keypad wait timed out"
                    ),
                }
                return Ok(Button::None);
            }
            clock.sleep(poll);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn decoder(tolerance_v: f32) -> KeypadDecoder {
        KeypadDecoder::new(
            0,
            AdcScale::default(),
            &KeypadCfg {
                tolerance_v,
                ..KeypadCfg::default()
            },
        )
    }

    #[test]
    fn window_covers_tolerance_band() {
        let d = decoder(0.05);
        assert_eq!(d.decode_voltage(0.66), Button::Up);
        assert_eq!(d.decode_voltage(0.74), Button::Up);
        assert_eq!(d.decode_voltage(0.76), Button::None);
        assert_eq!(d.decode_voltage(0.64), Button::None);
        assert_eq!(d.decode_voltage(3.62), Button::Acquire);
    }

    #[test]
    fn idle_line_decodes_to_none() {
        assert_eq!(decoder(0.05).decode_voltage(5.0), Button::None);
    }

    #[test]
    fn codes_round_trip_for_every_button() {
        for b in [
            Button::None,
            Button::Acquire,
            Button::Clear,
            Button::Left,
            Button::Up,
            Button::Down,
            Button::Reset,
        ] {
            assert_eq!(Button::from_code(b.code()), Some(b));
        }
        assert_eq!(Button::from_code('x'), None);
    }
}
