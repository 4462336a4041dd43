//! Simulated timer provider

use std::collections::HashMap;

use dmtimer_hal::timer::{AcquireError, TimerProvider, TimerRef};

use crate::timer::{SimConfig, SimProbe, SimTimer};

enum Slot {
    Available(SimTimer),
    /// Known but not ready yet, or already handed out
    Busy,
}

/// Set of simulated timers addressable by [`TimerRef`].
#[derive(Default)]
pub struct SimBank {
    slots: HashMap<TimerRef, Slot>,
}

impl SimBank {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds an available timer and returns its probe.
    pub fn add(&mut self, timer: TimerRef, config: SimConfig) -> SimProbe {
        let sim = SimTimer::new(config);
        let probe = sim.probe();
        self.slots.insert(timer, Slot::Available(sim));
        probe
    }

    /// Adds a timer that exists but cannot be acquired yet.
    pub fn add_pending(&mut self, timer: TimerRef) {
        self.slots.insert(timer, Slot::Busy);
    }
}

impl TimerProvider for SimBank {
    type Timer = SimTimer;

    fn request(&mut self, timer: TimerRef) -> Result<SimTimer, AcquireError> {
        match self.slots.get_mut(&timer) {
            None => Err(AcquireError::NotFound),
            Some(slot) => match core::mem::replace(slot, Slot::Busy) {
                Slot::Available(sim) => Ok(sim),
                Slot::Busy => Err(AcquireError::Deferred),
            },
        }
    }
}
