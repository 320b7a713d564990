#![cfg_attr(all(not(debug_assertions), not(test)), deny(warnings))]
#![cfg_attr(
    all(not(debug_assertions), not(test)),
    deny(clippy::all, clippy::pedantic, clippy::nursery)
)]
#![allow(
    clippy::module_name_repetitions,
    clippy::missing_errors_doc,
    clippy::cast_precision_loss
)]
#![cfg_attr(not(test), deny(clippy::unwrap_used, clippy::expect_used))]
//! Core BBnate logic (hardware-agnostic).
//!
//! All hardware access goes through the `bbnate_traits` capabilities
//! (`DigitalOutput`, `AnalogInput`, `CharDisplay`, `Clock`).
//!
//! ## Pipeline
//!
//! - **Voltage**: raw ADC counts → volts (`voltage`)
//! - **Keypad**: resistor-ladder voltage → button, bounded polling (`keypad`, `cancel`)
//! - **Ping**: transducer trigger pulse (`ping`)
//! - **Acquisition**: 20 × 50-sample windows, cumulative then differenced (`acquire`)
//! - **Integration**: series → energy (`integrate`)
//! - **Classification**: energy → BMD estimate via threshold bands (`bmd`)
//! - **Presentation**: LCD screens and status LEDs (`presenter`)
//!
//! `Bbnate` (`device`) owns the hardware and sequences a full measurement cycle.

pub mod acquire;
pub mod bmd;
pub mod cancel;
pub mod config;
pub mod conversions;
pub mod device;
pub mod error;
pub mod hw_error;
pub mod integrate;
pub mod keypad;
pub mod ping;
pub mod presenter;
pub mod status;
pub mod voltage;

pub use acquire::{Acquisition, SignalAcquirer, VoltageWindowSeries, WINDOW_COUNT, WINDOW_LEN};
pub use bmd::{BmdClassifier, BmdOutcome, NO_ESTIMATE, classify};
pub use cancel::{CancelToken, WaitLimit, WaitStop};
pub use config::{BmdThresholds, DeviceCfg, KeypadCfg, PinMap, PingCfg};
pub use device::{Bbnate, BbnateBuilder};
pub use error::{BbnateError, BuildError};
pub use integrate::integrate;
pub use keypad::{Button, KeypadDecoder};
pub use ping::Transducer;
pub use presenter::{LedPins, Presenter, format_bmd};
pub use status::{CycleOutcome, Measurement};
pub use voltage::{AdcScale, to_voltage};
