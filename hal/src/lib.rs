//! Hardware Abstraction Layer for dual-mode timers
//!
//! This crate provides the vendor-agnostic seams of a timer-backed PWM driver:
//! the register-level timer interface, timer acquisition, and the operations a
//! PWM core calls on a bound channel.

#![cfg_attr(not(feature = "std"), no_std)]

pub mod error;
pub mod pwm;
pub mod timer;

// Re-export commonly used types
pub use error::{HalError, HalResult};
pub use pwm::{xlate_with_flags, Polarity, PwmArgs, PwmOps, PWM_POLARITY_INVERTED};
pub use timer::{
    AcquireError, Capabilities, ClockSource, DmTimer, TimerProvider, TimerRef, TriggerMode,
    COUNTER_MAX,
};
