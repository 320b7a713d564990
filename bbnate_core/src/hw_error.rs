//! Maps `Box<dyn Error>` from trait boundaries to typed `BbnateError`.
//!
//! The capability traits in `bbnate_traits` return `Box<dyn Error + Send + Sync>`;
//! this module converts those to the core error enum, with an optional
//! feature-gated path for `bbnate_hardware::HwError` downcasting.

use crate::error::BbnateError;

/// Map a trait-boundary error to a typed `BbnateError`.
///
/// Known hardware error types are downcast first; anything else is
/// classified by its message.
pub fn map_hw_error(e: &(dyn std::error::Error + 'static)) -> BbnateError {
    #[cfg(feature = "hardware-errors")]
    {
        use bbnate_hardware::error::HwError;
        if let Some(hw) = e.downcast_ref::<HwError>() {
            return match hw {
                HwError::InvalidPin(_) | HwError::InvalidChannel(_) => {
                    BbnateError::Config(hw.to_string())
                }
                HwError::Gpio(_) => BbnateError::HardwareFault(hw.to_string()),
            };
        }
    }

    let s = e.to_string();
    if s.to_lowercase().contains("not configured") {
        BbnateError::Config(s)
    } else {
        BbnateError::Hardware(s)
    }
}
