//! Concurrent callers on one channel.
//!
//! The simulated timer yields after every call, so unserialized operations
//! would interleave their register accesses in the recorded log.

use std::sync::Arc;
use std::thread;

use dmtimer_hal::TimerRef;
use dmtimer_sim::{Op, Record, SimBank, SimConfig, SimProbe, SimTimer};
use pwm_dmtimer::{ChipConfig, PwmChip, PwmNode, COMPATIBLE, MAX_COUNT};

const START_SEQUENCE: [Op; 4] = [
    Op::EnableAccess,
    Op::WriteCounter(MAX_COUNT),
    Op::DisableAccess,
    Op::Start,
];

fn bind() -> (Arc<PwmChip<SimTimer>>, SimProbe) {
    let mut bank = SimBank::new();
    let probe = bank.add(TimerRef(3), SimConfig::default().yield_on_access());
    let node = PwmNode {
        compatible: COMPATIBLE,
        timers: &[TimerRef(3)],
    };
    let chip = PwmChip::probe(&mut bank, &node, ChipConfig::default()).expect("probe");
    probe.take_ops();
    (Arc::new(chip), probe)
}

/// Index after `ops[at]` if it satisfies `f`.
fn step(ops: &[Op], at: usize, f: impl Fn(&Op) -> bool) -> Option<usize> {
    ops.get(at).filter(|op| f(*op)).map(|_| at + 1)
}

/// Length of the complete operation at the front of `ops`, if there is one.
fn operation_len(ops: &[Op]) -> Option<usize> {
    match ops.first()? {
        // enable
        Op::EnableAccess => ops.starts_with(&START_SEQUENCE).then_some(START_SEQUENCE.len()),
        // disable
        Op::Stop => Some(1),
        // configure
        Op::ClockRate(_) => {
            let active = match ops.get(1)? {
                Op::DomainActive(active) => *active,
                _ => return None,
            };
            let mut at = 2;
            if active {
                at = step(ops, at, |op| *op == Op::Stop)?;
            }
            at = step(ops, at, |op| matches!(op, Op::SetLoad { .. }))?;
            at = step(ops, at, |op| matches!(op, Op::SetMatch { .. }))?;
            at = step(ops, at, |op| matches!(op, Op::SetOutputMode { .. }))?;
            if active {
                if !ops[at..].starts_with(&START_SEQUENCE) {
                    return None;
                }
                at += START_SEQUENCE.len();
            }
            Some(at)
        }
        _ => None,
    }
}

/// Splits the log into runs of calls from one thread and checks each run is a
/// sequence of whole operations.
fn assert_serialized(records: &[Record]) {
    let mut start = 0;
    while start < records.len() {
        let thread = records[start].thread;
        let end = records[start..]
            .iter()
            .position(|r| r.thread != thread)
            .map_or(records.len(), |len| start + len);

        let run: Vec<Op> = records[start..end].iter().map(|r| r.op).collect();
        let mut at = 0;
        while at < run.len() {
            match operation_len(&run[at..]) {
                Some(len) => at += len,
                None => panic!(
                    "interleaved access at record {}: {:?}",
                    start + at,
                    &run[at..]
                ),
            }
        }
        start = end;
    }
}

#[test]
fn concurrent_operations_never_interleave() {
    let (chip, probe) = bind();

    let toggler = {
        let chip = Arc::clone(&chip);
        thread::spawn(move || {
            for _ in 0..100 {
                chip.channel().enable().unwrap();
                chip.channel().disable().unwrap();
            }
        })
    };

    let configurers: Vec<_> = (0..3)
        .map(|i: i32| {
            let chip = Arc::clone(&chip);
            thread::spawn(move || {
                let period = 1_000_000 + i * 1_000;
                for n in 0..100 {
                    let duty = (n * 7_500) % period;
                    chip.channel().configure(duty, period).unwrap();
                }
            })
        })
        .collect();

    toggler.join().unwrap();
    for handle in configurers {
        handle.join().unwrap();
    }

    assert!(probe.faults().is_empty(), "{:?}", probe.faults());
    assert!(!probe.is_counting());
    assert_eq!(probe.usage_count(), 0);
    assert!(!chip.channel().is_running());
    assert_serialized(&probe.records());
}

#[test]
fn identical_concurrent_configures_program_once() {
    let (chip, probe) = bind();

    let handles: Vec<_> = (0..8)
        .map(|_| {
            let chip = Arc::clone(&chip);
            thread::spawn(move || chip.channel().configure(500_000, 1_000_000).unwrap())
        })
        .collect();
    for handle in handles {
        handle.join().unwrap();
    }

    assert_eq!(probe.write_count(), 3);
    assert_eq!(probe.registers().load, MAX_COUNT - 24_000);
    assert_serialized(&probe.records());
}

#[test]
fn configure_racing_enable_keeps_start_stop_balanced() {
    let (chip, probe) = bind();
    chip.channel().configure(500_000, 1_000_000).unwrap();

    let enabler = {
        let chip = Arc::clone(&chip);
        thread::spawn(move || chip.channel().enable().unwrap())
    };
    let configurer = {
        let chip = Arc::clone(&chip);
        thread::spawn(move || {
            for n in 1..50 {
                chip.channel().configure(n * 10_000, 1_000_000).unwrap();
            }
        })
    };
    enabler.join().unwrap();
    configurer.join().unwrap();

    assert!(probe.is_counting());
    assert_eq!(probe.usage_count(), 1);
    assert!(probe.faults().is_empty());
    assert_serialized(&probe.records());

    chip.channel().disable().unwrap();
    assert_eq!(probe.usage_count(), 0);
}
