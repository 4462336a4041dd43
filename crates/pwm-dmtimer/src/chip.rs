//! Binding a timer to a PWM chip.
//!
//! A [`PwmChip`] owns its timer from [`PwmChip::probe`] until it is removed
//! or dropped. Unbinding stops the counter if its domain is still active and
//! then drops the handle, which releases the timer. Probe failures after the
//! timer was acquired release it the same way.

use dmtimer_hal::{
    xlate_with_flags, Capabilities, DmTimer, HalResult, PwmArgs, TimerProvider, TimerRef,
};

use crate::channel::TimerChannel;
use crate::config::ChipConfig;
use crate::error::ProbeError;

/// Compatible string of devices this driver binds to.
pub const COMPATIBLE: &str = "ti,omap-pwm";

/// Outputs per chip.
pub const NPWM: u32 = 1;

/// Hardware description of a PWM device.
#[derive(Debug, Clone, Copy)]
pub struct PwmNode<'a> {
    pub compatible: &'a str,
    /// Timers referenced by the device; the first one drives the output
    pub timers: &'a [TimerRef],
}

impl PwmNode<'_> {
    pub fn is_compatible(&self) -> bool {
        self.compatible == COMPATIBLE
    }
}

/// A bound single-channel PWM chip.
pub struct PwmChip<T: DmTimer> {
    channel: TimerChannel<T>,
    config: ChipConfig,
}

impl<T: DmTimer> PwmChip<T> {
    /// Acquires the timer referenced by `node` and prepares it for PWM.
    ///
    /// [`ProbeError::Deferred`] means the timer may become available later;
    /// every other error is permanent.
    pub fn probe<P>(
        provider: &mut P,
        node: &PwmNode<'_>,
        config: ChipConfig,
    ) -> Result<Self, ProbeError>
    where
        P: TimerProvider<Timer = T>,
    {
        if !node.is_compatible() {
            return Err(ProbeError::Incompatible);
        }

        let timer_ref = node.timers.first().copied().ok_or(ProbeError::NotFound)?;
        let mut timer = provider.request(timer_ref)?;

        if !timer.capabilities().contains(Capabilities::HAS_PWM) {
            log::error!("{}: timer has no PWM capability", config.name);
            return Err(ProbeError::NoPwmCapability);
        }

        timer.set_source(config.clock_source)?;

        // Consumers may only enable a stopped timer.
        if timer.is_register_domain_active() {
            timer.stop()?;
        }

        log::debug!("{}: bound to timer {:?}", config.name, timer_ref);

        Ok(Self {
            channel: TimerChannel::new(timer, config.name, config.polarity),
            config,
        })
    }

    /// Unbinds the chip, leaving the timer stopped and released.
    pub fn remove(self) {
        log::debug!("{}: unbinding", self.config.name);
        drop(self);
    }

    pub fn channel(&self) -> &TimerChannel<T> {
        &self.channel
    }

    pub fn config(&self) -> &ChipConfig {
        &self.config
    }

    /// Number of outputs
    pub fn npwm(&self) -> u32 {
        NPWM
    }

    /// Decodes a consumer specifier for this chip.
    pub fn xlate(&self, cells: &[u32]) -> HalResult<PwmArgs> {
        xlate_with_flags(cells, NPWM, self.config.pwm_cells)
    }
}

impl<T: DmTimer> Drop for PwmChip<T> {
    fn drop(&mut self) {
        if let Err(err) = self.channel.shutdown() {
            log::error!("{}: failed to stop timer: {}", self.config.name, err);
        }
    }
}
