use thiserror::Error;

#[derive(Debug, Error)]
pub enum HwError {
    #[error("gpio error: {0}")]
    Gpio(String),
    #[error("pin {0} is not configured as an output")]
    InvalidPin(u8),
    #[error("adc channel {0} is not wired")]
    InvalidChannel(u8),
}

pub type Result<T> = std::result::Result<T, HwError>;
