use thiserror::Error;

#[derive(Debug, Error, Clone)]
pub enum BbnateError {
    #[error("hardware error: {0}")]
    Hardware(String),
    #[error("hardware fault: {0}")]
    HardwareFault(String),
    #[error("configuration error: {0}")]
    Config(String),
    #[error("operation cancelled")]
    Cancelled,
    #[error("timed out waiting for keypad press")]
    KeypadTimeout,
}

#[derive(Debug, Error, Clone)]
pub enum BuildError {
    #[error("missing digital outputs")]
    MissingOutputs,
    #[error("missing analog input")]
    MissingAnalog,
    #[error("missing display")]
    MissingDisplay,
    #[error("invalid config: {0}")]
    InvalidConfig(&'static str),
}

pub type Result<T> = eyre::Result<T>;
pub use eyre::Report;
