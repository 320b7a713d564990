pub mod clock;

pub use clock::{Clock, MonotonicClock};

/// Error type crossing every capability boundary.
pub type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// Logic level of a discrete output pin.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Level {
    Low,
    High,
}

impl Level {
    #[inline]
    pub fn is_high(self) -> bool {
        matches!(self, Level::High)
    }
}

impl From<bool> for Level {
    fn from(high: bool) -> Self {
        if high { Level::High } else { Level::Low }
    }
}

/// Discrete output pins (LEDs, transducer trigger).
pub trait DigitalOutput {
    /// Put `pin` into output mode. Called once per pin at initialization.
    fn configure_output(&mut self, pin: u8) -> Result<(), BoxError>;
    fn write(&mut self, pin: u8, level: Level) -> Result<(), BoxError>;
}

/// Synchronous ADC access.
pub trait AnalogInput {
    /// One raw conversion on `channel`; `0..=max_raw` for the device's bit depth.
    fn read_raw(&mut self, channel: u8) -> Result<u16, BoxError>;
}

/// Character LCD with a text cursor.
pub trait CharDisplay {
    fn begin(&mut self, cols: u8, rows: u8) -> Result<(), BoxError>;
    fn clear(&mut self) -> Result<(), BoxError>;
    fn set_cursor(&mut self, col: u8, row: u8) -> Result<(), BoxError>;
    /// Print at the cursor, advancing it by the printed width.
    fn print(&mut self, text: &str) -> Result<(), BoxError>;
}

impl<T: DigitalOutput + ?Sized> DigitalOutput for Box<T> {
    fn configure_output(&mut self, pin: u8) -> Result<(), BoxError> {
        (**self).configure_output(pin)
    }
    fn write(&mut self, pin: u8, level: Level) -> Result<(), BoxError> {
        (**self).write(pin, level)
    }
}

impl<T: AnalogInput + ?Sized> AnalogInput for Box<T> {
    fn read_raw(&mut self, channel: u8) -> Result<u16, BoxError> {
        (**self).read_raw(channel)
    }
}

impl<T: CharDisplay + ?Sized> CharDisplay for Box<T> {
    fn begin(&mut self, cols: u8, rows: u8) -> Result<(), BoxError> {
        (**self).begin(cols, rows)
    }
    fn clear(&mut self) -> Result<(), BoxError> {
        (**self).clear()
    }
    fn set_cursor(&mut self, col: u8, row: u8) -> Result<(), BoxError> {
        (**self).set_cursor(col, row)
    }
    fn print(&mut self, text: &str) -> Result<(), BoxError> {
        (**self).print(text)
    }
}
