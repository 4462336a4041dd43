//! Dual-mode timer abstraction
//!
//! A dual-mode timer is a 32-bit up-counter that reloads on overflow and can
//! compare against a match register. Both events can drive an output pin, which
//! is what PWM generation is built on.

use core::fmt;
use core::ops::BitOr;

use crate::error::HalResult;

/// Largest value the 32-bit counter can hold before it wraps.
pub const COUNTER_MAX: u32 = u32::MAX;

/// Event(s) that toggle the timer output pin.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TriggerMode {
    /// Output is not driven by timer events
    None,
    /// Toggle on overflow only
    Overflow,
    /// Toggle on overflow and on match
    OverflowAndCompare,
}

/// Functional clock feeding the counter.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClockSource {
    /// System clock
    SysClk,
    /// 32 kHz always-on clock
    Clk32k,
    /// External clock input
    ExtClk,
}

/// Feature set reported by a timer instance.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Capabilities(u32);

impl Capabilities {
    /// Timer sits in an always-on power domain
    pub const ALWAYS_ON: Self = Self(1 << 0);
    /// Timer can drive a PWM output pin
    pub const HAS_PWM: Self = Self(1 << 1);
    /// Timer interrupt is routed to the DSP
    pub const HAS_DSP_IRQ: Self = Self(1 << 2);

    pub const fn empty() -> Self {
        Self(0)
    }

    pub const fn bits(self) -> u32 {
        self.0
    }

    pub const fn contains(self, other: Self) -> bool {
        self.0 & other.0 == other.0
    }
}

impl BitOr for Capabilities {
    type Output = Self;

    fn bitor(self, rhs: Self) -> Self {
        Self(self.0 | rhs.0)
    }
}

/// Register-level interface of one dual-mode timer instance.
///
/// The handle is owned exclusively by whoever acquired it. Dropping it
/// releases the timer back to its provider.
pub trait DmTimer: Send {
    /// Feature set of this instance
    fn capabilities(&self) -> Capabilities;

    /// Select the functional clock
    fn set_source(&mut self, source: ClockSource) -> HalResult<()>;

    /// Gain register access (interface clock on). Does not start counting.
    fn enable_access(&mut self) -> HalResult<()>;

    /// Drop register access taken with [`DmTimer::enable_access`]
    fn disable_access(&mut self) -> HalResult<()>;

    /// Write the live counter value
    ///
    /// Only defined while the counter is stopped.
    fn write_counter(&mut self, value: u32) -> HalResult<()>;

    /// Program the value the counter reloads with on overflow
    fn set_load(&mut self, autoreload: bool, value: u32) -> HalResult<()>;

    /// Program the compare register
    fn set_match(&mut self, enabled: bool, value: u32) -> HalResult<()>;

    /// Configure the output pin: polarity, toggle mode and trigger events
    fn set_output_mode(&mut self, inverted: bool, toggle: bool, trigger: TriggerMode)
        -> HalResult<()>;

    /// Start counting
    fn start(&mut self) -> HalResult<()>;

    /// Stop counting
    ///
    /// Calls must balance [`DmTimer::start`]; stopping twice in a row is not
    /// allowed.
    fn stop(&mut self) -> HalResult<()>;

    /// Current rate of the functional clock in Hz
    fn clock_rate_hz(&self) -> u64;

    /// Whether the timer's register/power domain is currently active
    fn is_register_domain_active(&self) -> bool;
}

/// Opaque reference to a timer in the hardware description.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct TimerRef(pub u32);

/// Reasons a timer could not be acquired.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AcquireError {
    /// Timer exists but is not available yet; try again later
    Deferred,
    /// No timer matches the reference
    NotFound,
}

impl fmt::Display for AcquireError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Deferred => write!(f, "timer not available yet"),
            Self::NotFound => write!(f, "timer does not exist"),
        }
    }
}

#[cfg(feature = "std")]
impl std::error::Error for AcquireError {}

#[cfg(feature = "defmt")]
impl defmt::Format for AcquireError {
    fn format(&self, fmt: defmt::Formatter) {
        match self {
            Self::Deferred => defmt::write!(fmt, "Deferred"),
            Self::NotFound => defmt::write!(fmt, "NotFound"),
        }
    }
}

/// Source of timer handles.
pub trait TimerProvider {
    type Timer: DmTimer;

    /// Acquire the timer named by `timer` for exclusive use
    fn request(&mut self, timer: TimerRef) -> Result<Self::Timer, AcquireError>;
}
