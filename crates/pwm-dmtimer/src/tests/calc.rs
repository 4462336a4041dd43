use crate::calc::{checked_counter_value, counter_value, ticks, LoadMatch, MAX_COUNT};

const RATES: [u64; 4] = [32_768, 19_200_000, 24_000_000, 100_000_000];

#[test]
fn max_count_leaves_top_value_for_overflow() {
    assert_eq!(MAX_COUNT, 0xFFFF_FFFE);
    assert_eq!(counter_value(24_000_000, 0), MAX_COUNT);
}

#[test]
fn one_millisecond_half_duty_at_24mhz() {
    let lm = LoadMatch::compute(24_000_000, 500_000, 1_000_000).unwrap();
    assert_eq!(lm.load, MAX_COUNT - 24_000);
    assert_eq!(lm.match_value, MAX_COUNT - 12_000);
}

#[test]
fn ticks_truncate() {
    // 32.768 ticks
    assert_eq!(ticks(32_768, 1_000_000), 32);
    assert_eq!(counter_value(32_768, 1_000_000), MAX_COUNT - 32);
    // 0.9 ticks
    assert_eq!(ticks(900_000_000, 1), 0);
}

#[test]
fn counter_value_decreases_with_duration() {
    for rate in RATES {
        let mut previous = counter_value(rate, 0);
        for duration in (0..=2_000_000_000u32).step_by(7_919_111) {
            let value = counter_value(rate, duration);
            assert!(
                value <= previous,
                "rate {rate} Hz: {duration} ns gave {value:#x} after {previous:#x}"
            );
            previous = value;
        }
    }
}

#[test]
fn match_never_below_load() {
    for rate in RATES {
        for period in [1_000u32, 20_000, 1_000_000, 20_000_000, 1_000_000_000] {
            for duty in [0, 1, period / 3, period / 2, period - 1, period] {
                let lm = LoadMatch::compute(rate, duty, period).unwrap();
                assert!(
                    lm.match_value >= lm.load,
                    "rate {rate} duty {duty} period {period}: {lm:?}"
                );
            }
        }
    }
}

#[test]
fn full_duty_matches_at_load_and_zero_duty_at_top() {
    let full = LoadMatch::compute(24_000_000, 1_000_000, 1_000_000).unwrap();
    assert_eq!(full.match_value, MAX_COUNT);

    let none = LoadMatch::compute(24_000_000, 0, 1_000_000).unwrap();
    assert_eq!(none.match_value, none.load);
}

#[test]
fn wide_multiplication_does_not_overflow() {
    assert_eq!(ticks(u64::MAX, u32::MAX), u64::MAX);
    assert_eq!(counter_value(u64::MAX, u32::MAX), 0);
    assert_eq!(checked_counter_value(u64::MAX, u32::MAX), None);

    // 4 GHz for ~4.29 s would overflow a 64-bit product of a 32-bit rate
    assert_eq!(ticks(4_000_000_000, u32::MAX), 17_179_869_180);
}

#[test]
fn checked_counter_value_boundary() {
    // 1 GHz: one tick per nanosecond
    assert_eq!(checked_counter_value(1_000_000_000, MAX_COUNT), Some(0));
    assert_eq!(checked_counter_value(1_000_000_000, u32::MAX), None);
    assert_eq!(counter_value(1_000_000_000, u32::MAX), 0);
}

#[test]
fn period_out_of_range_has_no_load_match() {
    assert_eq!(LoadMatch::compute(4_000_000_000, 0, 2_000_000_000), None);
}
