//! Simulated timer instance

use std::sync::Arc;
use std::thread::{self, ThreadId};

use dmtimer_hal::error::{HalError, HalResult};
use dmtimer_hal::timer::{Capabilities, ClockSource, DmTimer, TriggerMode};
use parking_lot::Mutex;

/// Calls observed on a simulated timer, in the order they were made.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Op {
    SetSource(ClockSource),
    EnableAccess,
    DisableAccess,
    WriteCounter(u32),
    SetLoad { autoreload: bool, value: u32 },
    SetMatch { enabled: bool, value: u32 },
    SetOutputMode { inverted: bool, toggle: bool, trigger: TriggerMode },
    Start,
    Stop,
    /// Clock rate query and the rate returned
    ClockRate(u64),
    /// Domain activity query and the answer returned
    DomainActive(bool),
    /// Handle dropped
    Release,
}

impl Op {
    /// True for calls that change timer state (queries and release excluded)
    pub fn is_write(&self) -> bool {
        !matches!(self, Op::ClockRate(_) | Op::DomainActive(_) | Op::Release)
    }
}

/// One recorded call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Record {
    pub thread: ThreadId,
    pub op: Op,
}

/// Misuse detected by the model.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Fault {
    /// Live counter written while the timer was counting
    CounterWriteWhileCounting,
    /// `stop` without a matching `start`
    UnbalancedStop,
    /// `disable_access` or `stop` would drop the domain usage count below zero
    UsageUnderflow,
    /// Handle used after it was released
    UseAfterRelease,
}

/// Register file of the simulated timer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Registers {
    pub counter: u32,
    pub load: u32,
    pub autoreload: bool,
    pub match_value: u32,
    pub match_enabled: bool,
    pub inverted: bool,
    pub toggle: bool,
    pub trigger: TriggerMode,
    pub source: ClockSource,
}

impl Default for Registers {
    fn default() -> Self {
        Self {
            counter: 0,
            load: 0,
            autoreload: false,
            match_value: 0,
            match_enabled: false,
            inverted: false,
            toggle: false,
            trigger: TriggerMode::None,
            source: ClockSource::SysClk,
        }
    }
}

/// Construction parameters for a [`SimTimer`].
#[derive(Debug, Clone)]
pub struct SimConfig {
    pub clock_rate_hz: u64,
    pub capabilities: Capabilities,
    /// Timer is already counting when handed out (e.g. left running by a
    /// bootloader)
    pub running_at_reset: bool,
    /// Yield the thread after every call to widen race windows
    pub yield_on_access: bool,
}

impl Default for SimConfig {
    fn default() -> Self {
        Self {
            clock_rate_hz: 24_000_000,
            capabilities: Capabilities::HAS_PWM,
            running_at_reset: false,
            yield_on_access: false,
        }
    }
}

impl SimConfig {
    pub fn with_clock_rate(mut self, hz: u64) -> Self {
        self.clock_rate_hz = hz;
        self
    }

    pub fn with_capabilities(mut self, capabilities: Capabilities) -> Self {
        self.capabilities = capabilities;
        self
    }

    pub fn running_at_reset(mut self) -> Self {
        self.running_at_reset = true;
        self
    }

    pub fn yield_on_access(mut self) -> Self {
        self.yield_on_access = true;
        self
    }
}

struct SimState {
    config: SimConfig,
    regs: Registers,
    counting: bool,
    usage: u32,
    releases: u32,
    /// Writes to let through before failing, and the error to fail with
    fail: Option<(usize, HalError)>,
    records: Vec<Record>,
    faults: Vec<Fault>,
}

impl SimState {
    fn new(config: SimConfig) -> Self {
        let counting = config.running_at_reset;
        Self {
            config,
            regs: Registers::default(),
            counting,
            usage: u32::from(counting),
            releases: 0,
            fail: None,
            records: Vec::new(),
            faults: Vec::new(),
        }
    }

    fn record(&mut self, op: Op) {
        self.records.push(Record {
            thread: thread::current().id(),
            op,
        });
    }

    fn fault(&mut self, fault: Fault) {
        log::warn!("simulated timer fault: {:?}", fault);
        self.faults.push(fault);
    }

    /// Records a state-changing call and applies it unless a failure is armed.
    fn write(&mut self, op: Op) -> HalResult<()> {
        self.record(op);
        if self.releases > 0 {
            self.fault(Fault::UseAfterRelease);
            return Err(HalError::Released);
        }
        match self.fail.take() {
            Some((0, err)) => return Err(err),
            Some((skip, err)) => self.fail = Some((skip - 1, err)),
            None => {}
        }

        match op {
            Op::SetSource(source) => self.regs.source = source,
            Op::EnableAccess => self.usage += 1,
            Op::DisableAccess => self.put(),
            Op::WriteCounter(value) => {
                if self.counting {
                    self.fault(Fault::CounterWriteWhileCounting);
                }
                self.regs.counter = value;
            }
            Op::SetLoad { autoreload, value } => {
                self.regs.autoreload = autoreload;
                self.regs.load = value;
            }
            Op::SetMatch { enabled, value } => {
                self.regs.match_enabled = enabled;
                self.regs.match_value = value;
            }
            Op::SetOutputMode {
                inverted,
                toggle,
                trigger,
            } => {
                self.regs.inverted = inverted;
                self.regs.toggle = toggle;
                self.regs.trigger = trigger;
            }
            // Starting takes a domain reference on every call, like the real
            // driver does; only `stop` gives it back.
            Op::Start => {
                self.usage += 1;
                self.counting = true;
            }
            Op::Stop => {
                if !self.counting {
                    self.fault(Fault::UnbalancedStop);
                }
                self.counting = false;
                self.put();
            }
            Op::ClockRate(_) | Op::DomainActive(_) | Op::Release => {}
        }
        Ok(())
    }

    fn put(&mut self) {
        if self.usage == 0 {
            self.fault(Fault::UsageUnderflow);
        } else {
            self.usage -= 1;
        }
    }
}

/// Simulated timer handle.
pub struct SimTimer {
    state: Arc<Mutex<SimState>>,
}

impl SimTimer {
    pub fn new(config: SimConfig) -> Self {
        Self {
            state: Arc::new(Mutex::new(SimState::new(config))),
        }
    }

    /// Observer sharing this timer's state; stays valid after the handle is
    /// moved or dropped.
    pub fn probe(&self) -> SimProbe {
        SimProbe {
            state: Arc::clone(&self.state),
        }
    }

    fn write(&self, op: Op) -> HalResult<()> {
        let (result, yield_now) = {
            let mut state = self.state.lock();
            (state.write(op), state.config.yield_on_access)
        };
        if yield_now {
            thread::yield_now();
        }
        result
    }

    fn query<R: Copy>(&self, f: impl FnOnce(&SimState) -> R, op: impl FnOnce(R) -> Op) -> R {
        let (value, yield_now) = {
            let mut state = self.state.lock();
            let value = f(&*state);
            state.record(op(value));
            (value, state.config.yield_on_access)
        };
        if yield_now {
            thread::yield_now();
        }
        value
    }
}

impl DmTimer for SimTimer {
    fn capabilities(&self) -> Capabilities {
        self.state.lock().config.capabilities
    }

    fn set_source(&mut self, source: ClockSource) -> HalResult<()> {
        self.write(Op::SetSource(source))
    }

    fn enable_access(&mut self) -> HalResult<()> {
        self.write(Op::EnableAccess)
    }

    fn disable_access(&mut self) -> HalResult<()> {
        self.write(Op::DisableAccess)
    }

    fn write_counter(&mut self, value: u32) -> HalResult<()> {
        self.write(Op::WriteCounter(value))
    }

    fn set_load(&mut self, autoreload: bool, value: u32) -> HalResult<()> {
        self.write(Op::SetLoad { autoreload, value })
    }

    fn set_match(&mut self, enabled: bool, value: u32) -> HalResult<()> {
        self.write(Op::SetMatch { enabled, value })
    }

    fn set_output_mode(
        &mut self,
        inverted: bool,
        toggle: bool,
        trigger: TriggerMode,
    ) -> HalResult<()> {
        self.write(Op::SetOutputMode {
            inverted,
            toggle,
            trigger,
        })
    }

    fn start(&mut self) -> HalResult<()> {
        self.write(Op::Start)
    }

    fn stop(&mut self) -> HalResult<()> {
        self.write(Op::Stop)
    }

    fn clock_rate_hz(&self) -> u64 {
        self.query(|s| s.config.clock_rate_hz, Op::ClockRate)
    }

    fn is_register_domain_active(&self) -> bool {
        self.query(|s| s.usage > 0, Op::DomainActive)
    }
}

impl Drop for SimTimer {
    fn drop(&mut self) {
        let mut state = self.state.lock();
        state.record(Op::Release);
        state.releases += 1;
    }
}

/// Inspection and fault-injection handle for a [`SimTimer`].
#[derive(Clone)]
pub struct SimProbe {
    state: Arc<Mutex<SimState>>,
}

impl SimProbe {
    /// All recorded calls with their threads
    pub fn records(&self) -> Vec<Record> {
        self.state.lock().records.clone()
    }

    /// All recorded calls
    pub fn ops(&self) -> Vec<Op> {
        self.state.lock().records.iter().map(|r| r.op).collect()
    }

    /// Recorded calls, clearing the log
    pub fn take_ops(&self) -> Vec<Op> {
        let records = core::mem::take(&mut self.state.lock().records);
        records.into_iter().map(|r| r.op).collect()
    }

    /// Number of state-changing calls recorded
    pub fn write_count(&self) -> usize {
        self.state
            .lock()
            .records
            .iter()
            .filter(|r| r.op.is_write())
            .count()
    }

    pub fn faults(&self) -> Vec<Fault> {
        self.state.lock().faults.clone()
    }

    pub fn registers(&self) -> Registers {
        self.state.lock().regs
    }

    pub fn is_counting(&self) -> bool {
        self.state.lock().counting
    }

    /// Domain activity as the driver would see it, without recording a call
    pub fn is_domain_active(&self) -> bool {
        self.state.lock().usage > 0
    }

    pub fn usage_count(&self) -> u32 {
        self.state.lock().usage
    }

    /// How many times the handle has been released
    pub fn release_count(&self) -> u32 {
        self.state.lock().releases
    }

    /// Reprogram the functional clock behind the driver's back
    pub fn set_clock_rate(&self, hz: u64) {
        self.state.lock().config.clock_rate_hz = hz;
    }

    /// Make the next state-changing call fail with `err`
    pub fn fail_next(&self, err: HalError) {
        self.fail_after(0, err);
    }

    /// Let `skip` state-changing calls through, then fail the one after with
    /// `err`.
    pub fn fail_after(&self, skip: usize, err: HalError) {
        self.state.lock().fail = Some((skip, err));
    }

    /// Stop the counter from outside the driver (e.g. a suspend path),
    /// dropping its domain reference.
    pub fn force_stop(&self) {
        let mut state = self.state.lock();
        if state.counting {
            state.counting = false;
            state.usage = state.usage.saturating_sub(1);
        }
    }
}
