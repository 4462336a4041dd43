//! Timer sequencer: one PWM output driven by one dual-mode timer.
//!
//! All operations run end to end under the channel lock, including the clock
//! rate read and the load/match computation, so a configure can never split an
//! enable or disable's start/stop pair.
//!
//! Two notions of "running" are kept apart on purpose:
//! - the logical `running` flag, set by [`TimerChannel::enable`] and
//!   [`TimerChannel::disable`], which gates polarity changes;
//! - the timer's register domain activity, queried live by
//!   [`TimerChannel::configure`] to decide whether it must stop and restart
//!   the counter around the register writes.

use dmtimer_hal::{DmTimer, HalResult, Polarity, PwmOps, TriggerMode};

use crate::calc::{LoadMatch, MAX_COUNT};
use crate::error::PwmError;
use crate::output::DutyCycle;
use crate::sync::Mutex;

struct ChannelState<T> {
    timer: T,
    duty_ns: u32,
    period_ns: u32,
    running: bool,
    polarity: Polarity,
}

/// Copy of a channel's state taken under its lock.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ChannelSnapshot {
    pub duty_ns: u32,
    pub period_ns: u32,
    pub running: bool,
    pub polarity: Polarity,
}

impl ChannelSnapshot {
    /// A zero period means no waveform has been programmed yet.
    pub fn is_configured(&self) -> bool {
        self.period_ns != 0
    }
}

/// A PWM channel bound to a timer.
///
/// Shared between callers by reference (`&self` everywhere); the timer handle
/// lives inside the lock and is never handed out.
pub struct TimerChannel<T: DmTimer> {
    name: &'static str,
    state: Mutex<ChannelState<T>>,
}

impl<T: DmTimer> TimerChannel<T> {
    pub(crate) fn new(timer: T, name: &'static str, polarity: Polarity) -> Self {
        Self {
            name,
            state: Mutex::new(ChannelState {
                timer,
                duty_ns: 0,
                period_ns: 0,
                running: false,
                polarity,
            }),
        }
    }

    /// Starts the output from a phase-correct point.
    pub fn enable(&self) -> Result<(), PwmError> {
        self.state.with(|state| -> Result<(), PwmError> {
            start(&mut state.timer)?;
            state.running = true;
            Ok(())
        })
    }

    /// Stops the output. Must pair with a preceding [`TimerChannel::enable`].
    pub fn disable(&self) -> Result<(), PwmError> {
        self.state.with(|state| -> Result<(), PwmError> {
            state.timer.stop()?;
            state.running = false;
            Ok(())
        })
    }

    /// Programs duty cycle and period.
    ///
    /// A running timer is stopped for the register writes and restarted
    /// afterwards; a stopped one stays stopped. Repeating the current values
    /// touches nothing.
    pub fn configure(&self, duty_ns: i32, period_ns: i32) -> Result<(), PwmError> {
        let duty_ns = u32::try_from(duty_ns).map_err(|_| PwmError::NegativeDuration(duty_ns))?;
        let period_ns =
            u32::try_from(period_ns).map_err(|_| PwmError::NegativeDuration(period_ns))?;
        if duty_ns > period_ns {
            return Err(PwmError::DutyExceedsPeriod { duty_ns, period_ns });
        }

        log::debug!(
            "{}: duty cycle: {} ns, period {} ns",
            self.name,
            duty_ns,
            period_ns
        );

        self.state
            .with(|state| state.reprogram(self.name, duty_ns, period_ns))
    }

    /// Sets the duty cycle to `duty / max` of the configured period.
    pub fn set_duty_fraction(&self, duty: u16, max: u16) -> Result<(), PwmError> {
        if duty > max {
            return Err(PwmError::DutyOutOfRange { duty, max });
        }

        self.state.with(|state| {
            if state.period_ns == 0 {
                return Err(PwmError::NotConfigured);
            }
            let duty_ns = if max == 0 {
                0
            } else {
                // duty <= max, so the result is at most period_ns
                (u64::from(state.period_ns) * u64::from(duty) / u64::from(max)) as u32
            };
            let period_ns = state.period_ns;
            state.reprogram(self.name, duty_ns, period_ns)
        })
    }

    /// Changes output polarity.
    ///
    /// Rejected while the channel is enabled: the output mode is rewritten
    /// without stopping the counter.
    pub fn set_polarity(&self, polarity: Polarity) -> Result<(), PwmError> {
        self.state.with(|state| -> Result<(), PwmError> {
            if state.running {
                log::warn!("{}: polarity change rejected while enabled", self.name);
                return Err(PwmError::PolarityWhileEnabled);
            }

            state.timer.set_output_mode(
                polarity == Polarity::Inversed,
                true,
                TriggerMode::OverflowAndCompare,
            )?;
            state.polarity = polarity;
            Ok(())
        })
    }

    pub fn snapshot(&self) -> ChannelSnapshot {
        self.state.with(|state| ChannelSnapshot {
            duty_ns: state.duty_ns,
            period_ns: state.period_ns,
            running: state.running,
            polarity: state.polarity,
        })
    }

    pub fn is_running(&self) -> bool {
        self.state.with(|state| state.running)
    }

    /// `embedded-hal` view of this channel
    pub fn duty_cycle(&self) -> DutyCycle<'_, T> {
        DutyCycle::new(self)
    }

    /// Stops the counter if its domain is active. Used on unbind.
    pub(crate) fn shutdown(&self) -> Result<(), PwmError> {
        self.state.with(|state| -> Result<(), PwmError> {
            if state.timer.is_register_domain_active() {
                state.timer.stop()?;
            }
            state.running = false;
            Ok(())
        })
    }
}

impl<T: DmTimer> ChannelState<T> {
    fn reprogram(&mut self, name: &str, duty_ns: u32, period_ns: u32) -> Result<(), PwmError> {
        if self.duty_ns == duty_ns && self.period_ns == period_ns {
            // No change - don't cause any transients.
            return Ok(());
        }

        let clk_rate_hz = self.timer.clock_rate_hz();
        if clk_rate_hz == 0 && period_ns != 0 {
            return Err(PwmError::ClockStopped);
        }

        let LoadMatch { load, match_value } = LoadMatch::compute(clk_rate_hz, duty_ns, period_ns)
            .ok_or(PwmError::PeriodOutOfRange {
                period_ns,
                clk_rate_hz,
            })?;

        log::debug!(
            "{}: load value: {:#010x} ({}), match value: {:#010x} ({})",
            name,
            load,
            load,
            match_value,
            match_value
        );

        // Registers may only be written while stopped, and start/stop must
        // stay balanced: only stop what is actually active.
        let was_active = self.timer.is_register_domain_active();
        if was_active {
            self.timer.stop()?;
        }

        let written = self.write_registers(load, match_value);

        // A counter found running is restarted even when a register write
        // failed, so the caller's next disable still pairs with a start.
        let restarted = if was_active {
            start(&mut self.timer)
        } else {
            Ok(())
        };
        written?;
        restarted?;

        self.duty_ns = duty_ns;
        self.period_ns = period_ns;
        Ok(())
    }

    fn write_registers(&mut self, load: u32, match_value: u32) -> HalResult<()> {
        self.timer.set_load(true, load)?;
        self.timer.set_match(true, match_value)?;
        self.timer.set_output_mode(
            self.polarity == Polarity::Inversed,
            true,
            TriggerMode::OverflowAndCompare,
        )
    }
}

/// Starts the counter just below wraparound so the output toggles on the first
/// event instead of a full period later.
///
/// Register access is only taken for the counter write; it is not what makes
/// the timer count.
fn start<T: DmTimer>(timer: &mut T) -> HalResult<()> {
    timer.enable_access()?;
    let written = timer.write_counter(MAX_COUNT);
    timer.disable_access()?;
    written?;

    timer.start()
}

impl<T: DmTimer> PwmOps for TimerChannel<T> {
    type Error = PwmError;

    fn enable(&self) -> Result<(), PwmError> {
        TimerChannel::enable(self)
    }

    fn disable(&self) -> Result<(), PwmError> {
        TimerChannel::disable(self)
    }

    fn config(&self, duty_ns: i32, period_ns: i32) -> Result<(), PwmError> {
        self.configure(duty_ns, period_ns)
    }

    fn set_polarity(&self, polarity: Polarity) -> Result<(), PwmError> {
        TimerChannel::set_polarity(self, polarity)
    }
}
