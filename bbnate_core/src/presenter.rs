//! Screens and status LEDs.
//!
//! A `Presenter` borrows the display and the output bank for the duration of
//! a call sequence; nothing here holds global state.

use bbnate_traits::{BoxError, CharDisplay, DigitalOutput, Level};
use eyre::WrapErr;

use crate::bmd::NO_ESTIMATE;
use crate::error::Result;
use crate::hw_error::map_hw_error;

pub const LCD_COLS: u8 = 16;
pub const LCD_ROWS: u8 = 2;

pub const WELCOME: [&str; 2] = [" Welcome to the ", "BBnate Interface"];
pub const INSTRUCTIONS: [&str; 2] = ["Press \"ACQUIRE\" ", "to take measure."];
pub const MEASURING: &str = "Measuring...";
pub const RESULT_LABEL: &str = "Baby's BMD: ";
pub const NO_RESULT: &str = "n/a";
pub const CLEAR_PROMPT: &str = "Press \"CLEAR\"   ";

/// Status LED assignment.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LedPins {
    /// Power.
    pub green: u8,
    /// Measurement in progress.
    pub yellow: u8,
    /// Error.
    pub red: u8,
}

/// Format an estimate the way the LCD shows it (two decimals).
pub fn format_bmd(bmd: f32) -> String {
    format!("{bmd:.2}")
}

fn hw<T>(r: std::result::Result<T, BoxError>, what: &'static str) -> Result<T> {
    r.map_err(|e| eyre::Report::new(map_hw_error(&*e)))
        .wrap_err(what)
}

pub struct Presenter<'a, D: ?Sized, O: ?Sized> {
    display: &'a mut D,
    leds: &'a mut O,
    pins: LedPins,
}

impl<'a, D, O> Presenter<'a, D, O>
where
    D: CharDisplay + ?Sized,
    O: DigitalOutput + ?Sized,
{
    pub fn new(display: &'a mut D, leds: &'a mut O, pins: LedPins) -> Self {
        Self {
            display,
            leds,
            pins,
        }
    }

    fn two_lines(&mut self, lines: [&str; 2]) -> Result<()> {
        hw(self.display.clear(), "clearing display")?;
        for (row, text) in (0u8..).zip(lines) {
            hw(self.display.set_cursor(0, row), "moving cursor")?;
            hw(self.display.print(text), "printing to display")?;
        }
        Ok(())
    }

    fn led(&mut self, pin: u8, level: Level) -> Result<()> {
        hw(self.leds.write(pin, level), "driving status LED")
    }

    /// Clear the screen and size it for the 16x2 shield.
    pub fn setup(&mut self) -> Result<()> {
        hw(self.display.clear(), "clearing display")?;
        hw(self.display.begin(LCD_COLS, LCD_ROWS), "initializing display")
    }

    pub fn power_on(&mut self) -> Result<()> {
        self.led(self.pins.green, Level::High)
    }

    pub fn welcome(&mut self) -> Result<()> {
        self.two_lines(WELCOME)
    }

    pub fn instructions(&mut self) -> Result<()> {
        self.two_lines(INSTRUCTIONS)
    }

    pub fn measure_on(&mut self) -> Result<()> {
        self.led(self.pins.yellow, Level::High)?;
        hw(self.display.clear(), "clearing display")?;
        hw(self.display.set_cursor(0, 0), "moving cursor")?;
        hw(self.display.print(MEASURING), "printing to display")
    }

    pub fn measure_off(&mut self) -> Result<()> {
        self.led(self.pins.yellow, Level::Low)
    }

    /// Show the estimate, or the error indication when `bmd` is the 0.00 sentinel.
    #[allow(clippy::float_cmp)]
    pub fn present_result(&mut self, bmd: f32) -> Result<()> {
        hw(self.display.clear(), "clearing display")?;
        hw(self.display.set_cursor(0, 0), "moving cursor")?;
        hw(self.display.print(RESULT_LABEL), "printing to display")?;
        if bmd == NO_ESTIMATE {
            self.error_on()
        } else {
            hw(self.display.print(&format_bmd(bmd)), "printing to display")
        }
    }

    /// Red LED on and "n/a" at the cursor.
    pub fn error_on(&mut self) -> Result<()> {
        self.led(self.pins.red, Level::High)?;
        hw(self.display.print(NO_RESULT), "printing to display")
    }

    pub fn error_off(&mut self) -> Result<()> {
        self.led(self.pins.red, Level::Low)
    }

    pub fn prompt_clear(&mut self) -> Result<()> {
        hw(self.display.set_cursor(0, 1), "moving cursor")?;
        hw(self.display.print(CLEAR_PROMPT), "printing to display")
    }
}
