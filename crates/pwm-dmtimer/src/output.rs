//! `embedded-hal` duty-cycle adapter.

use dmtimer_hal::DmTimer;
use embedded_hal::pwm::{ErrorType, SetDutyCycle};

use crate::channel::TimerChannel;
use crate::error::PwmError;

/// Drives a configured channel through [`SetDutyCycle`].
///
/// The period stays whatever was last configured; duty values scale it.
pub struct DutyCycle<'a, T: DmTimer> {
    channel: &'a TimerChannel<T>,
}

impl<'a, T: DmTimer> DutyCycle<'a, T> {
    pub(crate) fn new(channel: &'a TimerChannel<T>) -> Self {
        Self { channel }
    }
}

impl<T: DmTimer> ErrorType for DutyCycle<'_, T> {
    type Error = PwmError;
}

impl<T: DmTimer> SetDutyCycle for DutyCycle<'_, T> {
    fn max_duty_cycle(&self) -> u16 {
        u16::MAX
    }

    fn set_duty_cycle(&mut self, duty: u16) -> Result<(), PwmError> {
        self.channel.set_duty_fraction(duty, u16::MAX)
    }
}
