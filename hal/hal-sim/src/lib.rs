//! Simulated dual-mode timer
//!
//! Host-side implementation of the `dmtimer-hal` traits. Every call made on a
//! [`SimTimer`] is recorded together with the calling thread, and the register
//! and power-domain state is modelled closely enough to catch sequencing bugs:
//! counter writes while counting, unbalanced stops, access after release.
//!
//! ## Example
//! ```
//! use dmtimer_hal::DmTimer;
//! use dmtimer_sim::{Op, SimConfig, SimTimer};
//!
//! let mut timer = SimTimer::new(SimConfig::default());
//! let probe = timer.probe();
//! timer.start().unwrap();
//! assert!(probe.is_counting());
//! assert_eq!(probe.ops(), vec![Op::Start]);
//! ```

pub mod bank;
pub mod timer;

// Re-export commonly used types
pub use bank::SimBank;
pub use timer::{Fault, Op, Record, Registers, SimConfig, SimProbe, SimTimer};
