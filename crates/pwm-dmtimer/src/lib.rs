//! # pwm-dmtimer
//!
//! Single-channel PWM output on a dual-mode timer: a 32-bit up-counter that
//! reloads on overflow and toggles its output pin on overflow and on match.
//!
//! ## Module Overview
//! - [`calc`]    – nanosecond to load/match register value conversion.
//! - [`channel`] – the timer sequencer: enable, disable, configure, polarity.
//! - [`chip`]    – binding and unbinding a timer.
//! - [`config`]  – binding-time configuration.
//! - [`output`]  – `embedded-hal` duty-cycle adapter.
//!
//! ## Example
//! ```
//! use dmtimer_hal::TimerRef;
//! use dmtimer_sim::{SimBank, SimConfig};
//! use pwm_dmtimer::{ChipConfig, PwmChip, PwmNode, COMPATIBLE};
//!
//! let mut bank = SimBank::new();
//! let probe = bank.add(TimerRef(9), SimConfig::default());
//! let node = PwmNode { compatible: COMPATIBLE, timers: &[TimerRef(9)] };
//!
//! let chip = PwmChip::probe(&mut bank, &node, ChipConfig::default()).unwrap();
//! chip.channel().configure(500_000, 1_000_000).unwrap();
//! chip.channel().enable().unwrap();
//! assert!(probe.is_counting());
//!
//! chip.remove();
//! assert!(!probe.is_counting());
//! assert_eq!(probe.release_count(), 1);
//! ```

#![cfg_attr(not(feature = "std"), no_std)]

pub mod calc;
pub mod channel;
pub mod chip;
pub mod config;
pub mod error;
pub mod output;
mod sync;

pub use calc::{LoadMatch, MAX_COUNT};
pub use channel::{ChannelSnapshot, TimerChannel};
pub use chip::{PwmChip, PwmNode, COMPATIBLE, NPWM};
pub use config::{ChipConfig, ChipConfigBuilder};
pub use error::{ProbeError, PwmError};
pub use output::DutyCycle;

#[cfg(test)]
mod tests;
