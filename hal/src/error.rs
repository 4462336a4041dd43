//! Failures reported by timer handles and specifier decoding

use core::fmt;

/// HAL operation errors
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HalError {
    /// Malformed request, e.g. a short or out-of-range PWM specifier
    InvalidParameter,
    /// Register access failed
    HardwareError,
    /// Timer handle has already been released
    Released,
}

impl fmt::Display for HalError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidParameter => write!(f, "invalid parameter"),
            Self::HardwareError => write!(f, "timer register access failed"),
            Self::Released => write!(f, "timer released"),
        }
    }
}

#[cfg(feature = "std")]
impl std::error::Error for HalError {}

#[cfg(feature = "defmt")]
impl defmt::Format for HalError {
    fn format(&self, fmt: defmt::Formatter) {
        match self {
            Self::InvalidParameter => defmt::write!(fmt, "InvalidParameter"),
            Self::HardwareError => defmt::write!(fmt, "HardwareError"),
            Self::Released => defmt::write!(fmt, "Released"),
        }
    }
}

/// Result type for HAL operations
pub type HalResult<T> = Result<T, HalError>;

#[cfg(all(test, feature = "std"))]
mod tests {
    use super::*;
    use std::string::ToString;

    #[test]
    fn display_names_the_failure() {
        assert_eq!(HalError::InvalidParameter.to_string(), "invalid parameter");
        assert_eq!(
            HalError::HardwareError.to_string(),
            "timer register access failed"
        );
        assert_eq!(HalError::Released.to_string(), "timer released");
    }
}
