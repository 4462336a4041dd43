//! PWM operations and consumer specifiers

use crate::error::{HalError, HalResult};

/// Flag bit in the third specifier cell selecting inverted output.
pub const PWM_POLARITY_INVERTED: u32 = 1 << 0;

/// Output polarity
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Polarity {
    /// High for the duty cycle, low for the rest of the period
    #[default]
    Normal,
    /// Low for the duty cycle, high for the rest of the period
    Inversed,
}

#[cfg(feature = "defmt")]
impl defmt::Format for Polarity {
    fn format(&self, fmt: defmt::Formatter) {
        match self {
            Self::Normal => defmt::write!(fmt, "Normal"),
            Self::Inversed => defmt::write!(fmt, "Inversed"),
        }
    }
}

/// Operations a PWM core invokes on a bound channel.
///
/// Durations are signed nanoseconds as handed down by the core; implementations
/// reject negative values.
pub trait PwmOps {
    type Error;

    /// Start producing the configured waveform
    fn enable(&self) -> Result<(), Self::Error>;

    /// Stop the output
    fn disable(&self) -> Result<(), Self::Error>;

    /// Set duty cycle and period
    fn config(&self, duty_ns: i32, period_ns: i32) -> Result<(), Self::Error>;

    /// Change output polarity. Only valid while disabled.
    fn set_polarity(&self, polarity: Polarity) -> Result<(), Self::Error>;
}

/// Consumer request decoded from a PWM specifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PwmArgs {
    pub index: u32,
    pub period_ns: u32,
    pub polarity: Polarity,
}

/// Decode a `<index period flags>` specifier.
///
/// # Arguments
/// * `cells` - specifier cells supplied by the consumer
/// * `npwm` - number of outputs the chip provides
/// * `pwm_cells` - number of cells the chip expects (at least 3)
pub fn xlate_with_flags(cells: &[u32], npwm: u32, pwm_cells: u32) -> HalResult<PwmArgs> {
    if pwm_cells < 3 || cells.len() < pwm_cells as usize {
        return Err(HalError::InvalidParameter);
    }

    let index = cells[0];
    if index >= npwm {
        return Err(HalError::InvalidParameter);
    }

    let polarity = if cells[2] & PWM_POLARITY_INVERTED != 0 {
        Polarity::Inversed
    } else {
        Polarity::Normal
    };

    Ok(PwmArgs {
        index,
        period_ns: cells[1],
        polarity,
    })
}
