//! Nanosecond to counter value conversion.
//!
//! The timer counts up and toggles its output on overflow, so a duration is
//! expressed as the value the counter must start from to overflow that many
//! ticks later.

use dmtimer_hal::COUNTER_MAX;

pub const NSEC_PER_SEC: u64 = 1_000_000_000;

/// Base of every load and match value, and the counter value the timer is
/// started from. The top count is left as the overflow step.
pub const MAX_COUNT: u32 = COUNTER_MAX - 1;

/// Whole clock ticks in `duration_ns` at `clk_rate_hz`, truncated.
pub fn ticks(clk_rate_hz: u64, duration_ns: u32) -> u64 {
    let ticks = u128::from(clk_rate_hz) * u128::from(duration_ns) / u128::from(NSEC_PER_SEC);
    u64::try_from(ticks).unwrap_or(u64::MAX)
}

/// Counter value that overflows `duration_ns` after counting starts.
///
/// Durations longer than the counter can represent saturate at 0; use
/// [`checked_counter_value`] to detect them.
pub fn counter_value(clk_rate_hz: u64, duration_ns: u32) -> u32 {
    let ticks = ticks(clk_rate_hz, duration_ns).min(u64::from(MAX_COUNT));
    // ticks <= MAX_COUNT after the clamp
    MAX_COUNT - ticks as u32
}

/// Like [`counter_value`], but `None` when the duration does not fit.
pub fn checked_counter_value(clk_rate_hz: u64, duration_ns: u32) -> Option<u32> {
    let ticks = u32::try_from(ticks(clk_rate_hz, duration_ns)).ok()?;
    MAX_COUNT.checked_sub(ticks)
}

/// Register values for one PWM waveform.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LoadMatch {
    /// Reload value; sets the period
    pub load: u32,
    /// Compare value; sets where in the period the output toggles back
    pub match_value: u32,
}

impl LoadMatch {
    /// Computes load and match for `duty_ns` out of `period_ns`.
    ///
    /// Returns `None` if the period does not fit the counter. `duty_ns` must
    /// not exceed `period_ns`.
    pub fn compute(clk_rate_hz: u64, duty_ns: u32, period_ns: u32) -> Option<Self> {
        debug_assert!(duty_ns <= period_ns, "duty {duty_ns} > period {period_ns}");

        let load = checked_counter_value(clk_rate_hz, period_ns)?;
        let match_value = counter_value(clk_rate_hz, period_ns.saturating_sub(duty_ns));

        Some(Self { load, match_value })
    }
}
