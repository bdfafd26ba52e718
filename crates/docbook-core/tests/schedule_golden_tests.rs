//! Golden and property tests for slot generation.

use chrono::NaiveTime;
use docbook_core::schedule::{available_time_slots, generate_slots, slots_or_empty, TimeRange};
use proptest::prelude::*;

/// Test case from golden file.
struct GoldenCase {
    id: &'static str,
    timing: &'static str,
    interval: u32,
    expected: &'static [&'static str],
}

fn get_golden_cases() -> Vec<GoldenCase> {
    vec![
        GoldenCase {
            id: "hour-quarter",
            timing: "10:00AM-11:00AM",
            interval: 15,
            expected: &["10:00 AM", "10:15 AM", "10:30 AM", "10:45 AM"],
        },
        GoldenCase {
            id: "half-hour-spaced",
            timing: "9:00 AM - 11:00 AM",
            interval: 30,
            expected: &["9:00 AM", "9:30 AM", "10:00 AM", "10:30 AM"],
        },
        GoldenCase {
            id: "weekday-prefix",
            timing: "Monday - Friday: 2:00PM - 4:00PM",
            interval: 60,
            expected: &["2:00 PM", "3:00 PM"],
        },
        GoldenCase {
            id: "en-dash",
            timing: "11:00AM\u{2013}1:00PM",
            interval: 45,
            expected: &["11:00 AM", "11:45 AM", "12:30 PM"],
        },
        GoldenCase {
            id: "hour-only",
            timing: "5PM-7PM",
            interval: 60,
            expected: &["5:00 PM", "6:00 PM"],
        },
        GoldenCase {
            id: "late-evening",
            timing: "10:00 PM to 11:59 PM",
            interval: 40,
            expected: &["10:00 PM", "10:40 PM", "11:20 PM"],
        },
    ]
}

#[test]
fn test_golden_slots() {
    for case in get_golden_cases() {
        let slots = available_time_slots(case.timing, case.interval)
            .unwrap_or_else(|e| panic!("[{}] failed to parse: {}", case.id, e));
        let labels: Vec<String> = slots.iter().map(|s| s.label()).collect();
        assert_eq!(labels, case.expected, "[{}] slot mismatch", case.id);
    }
}

#[test]
fn test_malformed_timings_fail_closed() {
    for timing in ["", "   ", "closed", "10:00AM", "10:00AM-", "4:00PM-10:00AM", "10:00AM-10:00AM", "25:00-26:00"] {
        let (slots, err) = slots_or_empty(timing, 15);
        assert!(slots.is_empty(), "{:?} produced slots", timing);
        assert!(err.is_some(), "{:?} produced no error", timing);
    }
}

fn time_strategy() -> impl Strategy<Value = NaiveTime> {
    (0u32..24, 0u32..60).prop_map(|(h, m)| NaiveTime::from_hms_opt(h, m, 0).unwrap())
}

proptest! {
    #[test]
    fn prop_slots_are_on_grid_and_inside_range(
        a in time_strategy(),
        b in time_strategy(),
        interval in 1u32..240,
    ) {
        prop_assume!(a != b);
        let (start, end) = if a < b { (a, b) } else { (b, a) };
        let range = TimeRange::new(start, end).unwrap();
        let slots = generate_slots(&range, interval);

        prop_assert!(!slots.is_empty());
        let start_minute = slots[0].minute_of_day();
        prop_assert_eq!(slots[0].start(), start);

        for pair in slots.windows(2) {
            prop_assert!(pair[0] < pair[1]);
        }
        for slot in &slots {
            prop_assert_eq!((slot.minute_of_day() - start_minute) % interval, 0);
            prop_assert!(range.contains(slot));
        }

        let last = slots.last().unwrap();
        prop_assert!(last.start() < end);
        prop_assert!(last.minute_of_day() + interval >= range.duration_minutes() + start_minute);
    }

    #[test]
    fn prop_slot_count_matches_duration(
        a in time_strategy(),
        b in time_strategy(),
        interval in 1u32..240,
    ) {
        prop_assume!(a < b);
        let range = TimeRange::new(a, b).unwrap();
        let expected = (range.duration_minutes() + interval - 1) / interval;
        prop_assert_eq!(generate_slots(&range, interval).len() as u32, expected);
    }

    #[test]
    fn prop_labels_reparse(a in time_strategy(), b in time_strategy()) {
        prop_assume!(a < b);
        let range = TimeRange::new(a, b).unwrap();
        let reparsed = TimeRange::parse(&range.to_string()).unwrap();
        prop_assert_eq!(reparsed, range);
    }
}
