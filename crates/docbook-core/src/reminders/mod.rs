//! Medication reminders derived from a prescription's schedule text.
//!
//! The schedule is free text written by the doctor ("morning and night for
//! 5 days", "8:00 AM, 2:00 PM", "twice daily"). We pick out times of day and
//! an optional course length; anything we cannot read falls back to a single
//! morning reminder.

use chrono::{Duration, NaiveDate, NaiveTime};
use serde::{Deserialize, Serialize};

use crate::models::{MedicationReminder, Prescription};
use crate::schedule::Slot;

const MORNING: (u32, u32) = (8, 0);
const NOON: (u32, u32) = (12, 0);
const AFTERNOON: (u32, u32) = (14, 0);
const EVENING: (u32, u32) = (18, 0);
const NIGHT: (u32, u32) = (21, 0);

/// Word → times of day.
const KEYWORDS: &[(&str, &[(u32, u32)])] = &[
    ("morning", &[MORNING]),
    ("breakfast", &[MORNING]),
    ("noon", &[NOON]),
    ("lunch", &[NOON]),
    ("afternoon", &[AFTERNOON]),
    ("evening", &[EVENING]),
    ("dinner", &[EVENING]),
    ("night", &[NIGHT]),
    ("bedtime", &[NIGHT]),
    ("od", &[MORNING]),
    ("once", &[MORNING]),
    ("bd", &[MORNING, NIGHT]),
    ("bid", &[MORNING, NIGHT]),
    ("twice", &[MORNING, NIGHT]),
    ("tds", &[MORNING, AFTERNOON, NIGHT]),
    ("tid", &[MORNING, AFTERNOON, NIGHT]),
    ("thrice", &[MORNING, AFTERNOON, NIGHT]),
];

/// Times of day and course length read from a schedule.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ReminderPlan {
    pub times: Vec<NaiveTime>,
    pub days: Option<u32>,
}

/// Read a free-text schedule.
pub fn parse_schedule(schedule: &str) -> ReminderPlan {
    let lower = schedule.to_lowercase();
    let words: Vec<&str> = lower
        .split(|c: char| c.is_whitespace() || c == ',' || c == '/' || c == '+')
        .filter(|w| !w.is_empty())
        .collect();

    let mut times: Vec<NaiveTime> = Vec::new();
    let mut days = None;

    for (i, word) in words.iter().enumerate() {
        let word = word.trim_matches(|c: char| c == '.' || c == ';' || c == '(' || c == ')');

        if let Some((_, slots)) = KEYWORDS.iter().find(|(k, _)| *k == word) {
            times.extend(slots.iter().filter_map(|(h, m)| NaiveTime::from_hms_opt(*h, *m, 0)));
            continue;
        }

        if word == "three" && words.get(i + 1).map(|w| w.starts_with("time")).unwrap_or(false) {
            times.extend(
                [MORNING, AFTERNOON, NIGHT]
                    .iter()
                    .filter_map(|(h, m)| NaiveTime::from_hms_opt(*h, *m, 0)),
            );
            continue;
        }

        if word.contains(':') {
            let candidate = match words.get(i + 1) {
                Some(next) if matches!(*next, "am" | "pm" | "a.m." | "p.m.") => {
                    format!("{} {}", word, next)
                }
                _ => word.to_string(),
            };
            if let Ok(slot) = Slot::parse(&candidate) {
                times.push(slot.start());
            }
            continue;
        }

        if word.starts_with("day") && i > 0 {
            if let Ok(n) = words[i - 1].parse::<u32>() {
                if n > 0 {
                    days = Some(n);
                }
            }
        }
    }

    if times.is_empty() {
        times.extend(NaiveTime::from_hms_opt(MORNING.0, MORNING.1, 0));
    }
    times.sort();
    times.dedup();

    ReminderPlan { times, days }
}

/// One reminder per prescribed medicine, starting on `start_date`.
pub fn reminders_from_prescription(
    prescription: &Prescription,
    patient_id: &str,
    start_date: NaiveDate,
) -> Vec<MedicationReminder> {
    let plan = parse_schedule(&prescription.schedule);
    let end_date = plan
        .days
        .and_then(|days| start_date.checked_add_signed(Duration::days(i64::from(days) - 1)));

    prescription
        .medicines
        .iter()
        .map(|medicine| {
            let mut reminder = MedicationReminder::new(
                patient_id.to_string(),
                medicine.clone(),
                plan.times.clone(),
                start_date,
            );
            reminder.end_date = end_date;
            reminder
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn t(h: u32, m: u32) -> NaiveTime {
        NaiveTime::from_hms_opt(h, m, 0).unwrap()
    }

    #[test]
    fn test_keywords_and_duration() {
        let plan = parse_schedule("Morning and night for 5 days");
        assert_eq!(plan.times, vec![t(8, 0), t(21, 0)]);
        assert_eq!(plan.days, Some(5));
    }

    #[test]
    fn test_explicit_times() {
        let plan = parse_schedule("8:30 AM, 2:00 PM and 22:00");
        assert_eq!(plan.times, vec![t(8, 30), t(14, 0), t(22, 0)]);
        assert_eq!(plan.days, None);
    }

    #[test]
    fn test_frequency_words() {
        assert_eq!(parse_schedule("twice daily").times, vec![t(8, 0), t(21, 0)]);
        assert_eq!(
            parse_schedule("three times a day").times,
            vec![t(8, 0), t(14, 0), t(21, 0)]
        );
        assert_eq!(parse_schedule("1-0-1 BD").times, vec![t(8, 0), t(21, 0)]);
    }

    #[test]
    fn test_unreadable_defaults_to_morning() {
        let plan = parse_schedule("as directed");
        assert_eq!(plan.times, vec![t(8, 0)]);
    }

    #[test]
    fn test_reminders_from_prescription() {
        let rx = Prescription::new(
            "Asha".into(),
            "asha@example.com".into(),
            vec!["Amoxicillin 500mg".into(), "Paracetamol 650mg".into()],
            "morning, evening for 3 days".into(),
            String::new(),
        )
        .unwrap();
        let start = NaiveDate::from_ymd_opt(2026, 5, 1).unwrap();

        let reminders = reminders_from_prescription(&rx, "pat-1", start);
        assert_eq!(reminders.len(), 2);
        assert_eq!(reminders[0].medicine, "Amoxicillin 500mg");
        assert_eq!(reminders[0].times, vec![t(8, 0), t(18, 0)]);
        assert_eq!(reminders[0].end_date, NaiveDate::from_ymd_opt(2026, 5, 3));
        assert!(reminders.iter().all(|r| r.patient_id == "pat-1" && r.active));
    }
}
