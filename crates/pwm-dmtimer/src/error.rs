//! Driver error types.

use dmtimer_hal::{AcquireError, HalError};
use embedded_hal::pwm::ErrorKind;
use thiserror::Error;

/// Errors returned by channel operations.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum PwmError {
    #[error("negative duration: {0} ns")]
    NegativeDuration(i32),
    #[error("duty cycle {duty_ns} ns exceeds period {period_ns} ns")]
    DutyExceedsPeriod { duty_ns: u32, period_ns: u32 },
    #[error("duty {duty} exceeds maximum {max}")]
    DutyOutOfRange { duty: u16, max: u16 },
    #[error("period {period_ns} ns does not fit the counter at {clk_rate_hz} Hz")]
    PeriodOutOfRange { period_ns: u32, clk_rate_hz: u64 },
    #[error("functional clock reports 0 Hz")]
    ClockStopped,
    #[error("polarity cannot change while the output is enabled")]
    PolarityWhileEnabled,
    #[error("no period configured")]
    NotConfigured,
    #[error("timer access failed: {0}")]
    Hal(HalError),
}

impl From<HalError> for PwmError {
    fn from(value: HalError) -> Self {
        Self::Hal(value)
    }
}

impl embedded_hal::pwm::Error for PwmError {
    fn kind(&self) -> ErrorKind {
        ErrorKind::Other
    }
}

/// Errors returned when binding a timer.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProbeError {
    #[error("device is not handled by this driver")]
    Incompatible,
    #[error("timer not available yet")]
    Deferred,
    #[error("timer does not exist")]
    NotFound,
    #[error("timer has no PWM capability")]
    NoPwmCapability,
    #[error("timer access failed: {0}")]
    Hal(HalError),
}

impl ProbeError {
    /// Binding may succeed if retried later; every other error is permanent.
    pub fn is_deferred(&self) -> bool {
        matches!(self, Self::Deferred)
    }
}

impl From<AcquireError> for ProbeError {
    fn from(value: AcquireError) -> Self {
        match value {
            AcquireError::Deferred => Self::Deferred,
            AcquireError::NotFound => Self::NotFound,
        }
    }
}

impl From<HalError> for ProbeError {
    fn from(value: HalError) -> Self {
        Self::Hal(value)
    }
}

#[cfg(feature = "defmt")]
impl defmt::Format for PwmError {
    fn format(&self, fmt: defmt::Formatter) {
        match self {
            Self::NegativeDuration(ns) => defmt::write!(fmt, "NegativeDuration({})", ns),
            Self::DutyExceedsPeriod { duty_ns, period_ns } => {
                defmt::write!(fmt, "DutyExceedsPeriod({}, {})", duty_ns, period_ns)
            }
            Self::DutyOutOfRange { duty, max } => {
                defmt::write!(fmt, "DutyOutOfRange({}, {})", duty, max)
            }
            Self::PeriodOutOfRange {
                period_ns,
                clk_rate_hz,
            } => defmt::write!(fmt, "PeriodOutOfRange({}, {})", period_ns, clk_rate_hz),
            Self::ClockStopped => defmt::write!(fmt, "ClockStopped"),
            Self::PolarityWhileEnabled => defmt::write!(fmt, "PolarityWhileEnabled"),
            Self::NotConfigured => defmt::write!(fmt, "NotConfigured"),
            Self::Hal(err) => defmt::write!(fmt, "Hal({})", err),
        }
    }
}
