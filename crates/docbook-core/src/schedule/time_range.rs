//! Working-hours ranges and slot labels.

use chrono::{NaiveTime, Timelike};
use serde::{Deserialize, Serialize};

use super::{ScheduleError, ScheduleResult};

/// A doctor's working-hours window on a single day.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(try_from = "RawTimeRange")]
pub struct TimeRange {
    start: NaiveTime,
    end: NaiveTime,
}

/// Unvalidated wire form of [`TimeRange`].
#[derive(Deserialize)]
struct RawTimeRange {
    start: NaiveTime,
    end: NaiveTime,
}

impl TryFrom<RawTimeRange> for TimeRange {
    type Error = ScheduleError;

    fn try_from(raw: RawTimeRange) -> Result<Self, Self::Error> {
        TimeRange::new(raw.start, raw.end)
    }
}

impl TimeRange {
    /// Create a range, rejecting `end <= start`.
    pub fn new(start: NaiveTime, end: NaiveTime) -> ScheduleResult<Self> {
        if end <= start {
            return Err(ScheduleError::EmptyRange {
                start: Slot::new(start).label(),
                end: Slot::new(end).label(),
            });
        }
        Ok(Self { start, end })
    }

    /// Parse a doctor timing string such as `"10:00AM-4:00PM"`.
    ///
    /// Accepts en/em dashes or `to` as the separator and an optional
    /// day prefix terminated by a colon (`"Monday - Friday: 10:00AM - 4:00PM"`).
    /// Anything else is rejected rather than guessed at.
    pub fn parse(input: &str) -> ScheduleResult<Self> {
        let trimmed = input.trim();
        if trimmed.is_empty() {
            return Err(ScheduleError::Empty);
        }

        let normalized = trimmed.replace(['\u{2013}', '\u{2014}', '\u{2212}'], "-");
        let body = strip_day_prefix(&normalized)
            .ok_or_else(|| ScheduleError::MalformedRange(trimmed.to_string()))?;

        let (start, end) = split_range(body)
            .ok_or_else(|| ScheduleError::MalformedRange(trimmed.to_string()))?;

        Self::new(parse_clock(start)?, parse_clock(end)?)
    }

    pub fn start(&self) -> NaiveTime {
        self.start
    }

    pub fn end(&self) -> NaiveTime {
        self.end
    }

    /// Length of the range in minutes (zero for a degenerate range).
    pub fn duration_minutes(&self) -> u32 {
        minute_of_day(self.end).saturating_sub(minute_of_day(self.start))
    }

    /// Check whether a slot starts inside this range.
    pub fn contains(&self, slot: &Slot) -> bool {
        slot.start() >= self.start && slot.start() < self.end
    }
}

impl std::fmt::Display for TimeRange {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{} - {}",
            Slot::new(self.start).label(),
            Slot::new(self.end).label()
        )
    }
}

/// A bookable slot, identified by its start time.
///
/// Slots compare by minute-of-day so that `"10:00AM"` and `"10:00 AM"`
/// refer to the same slot. On the wire a slot is its label.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Slot {
    start: NaiveTime,
}

impl Slot {
    pub fn new(start: NaiveTime) -> Self {
        // Seconds are not meaningful for a slot label.
        let start = start.with_second(0).and_then(|t| t.with_nanosecond(0)).unwrap_or(start);
        Self { start }
    }

    /// Build a slot from a minute-of-day offset.
    pub fn from_minute_of_day(minutes: u32) -> Option<Self> {
        NaiveTime::from_hms_opt(minutes / 60, minutes % 60, 0).map(Self::new)
    }

    /// Parse a slot label (`"10:00 AM"`, `"10:00AM"`, `"09:00 am"`, `"14:30"`).
    pub fn parse(label: &str) -> ScheduleResult<Self> {
        parse_clock(label).map(Self::new)
    }

    pub fn start(&self) -> NaiveTime {
        self.start
    }

    /// Minutes since midnight.
    pub fn minute_of_day(&self) -> u32 {
        minute_of_day(self.start)
    }

    /// 12-hour display label, e.g. `"9:30 AM"`.
    pub fn label(&self) -> String {
        self.start.format("%-I:%M %p").to_string()
    }
}

impl std::fmt::Display for Slot {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.label())
    }
}

impl From<Slot> for String {
    fn from(slot: Slot) -> Self {
        slot.label()
    }
}

impl TryFrom<String> for Slot {
    type Error = ScheduleError;

    fn try_from(label: String) -> Result<Self, Self::Error> {
        Slot::parse(&label)
    }
}

impl std::str::FromStr for Slot {
    type Err = ScheduleError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Slot::parse(s)
    }
}

pub(crate) fn minute_of_day(time: NaiveTime) -> u32 {
    time.num_seconds_from_midnight() / 60
}

/// Drop a `"Monday - Friday:"` style prefix. Returns `None` if text precedes
/// the first time without a terminating colon.
fn strip_day_prefix(input: &str) -> Option<&str> {
    let first_digit = input.find(|c: char| c.is_ascii_digit())?;
    let prefix = input[..first_digit].trim();
    if prefix.is_empty() || prefix.ends_with(':') {
        Some(&input[first_digit..])
    } else {
        None
    }
}

fn split_range(body: &str) -> Option<(&str, &str)> {
    let lower = body.to_ascii_lowercase();
    let parts: Vec<&str> = if lower.contains(" to ") {
        let idx = lower.find(" to ")?;
        vec![&body[..idx], &body[idx + 4..]]
    } else {
        body.split('-').collect()
    };

    match parts.as_slice() {
        [start, end] if !start.trim().is_empty() && !end.trim().is_empty() => {
            Some((start.trim(), end.trim()))
        }
        _ => None,
    }
}

/// Parse a wall-clock time in 12-hour (`"4:30PM"`, `"4 pm"`) or
/// 24-hour (`"16:30"`) form.
fn parse_clock(input: &str) -> ScheduleResult<NaiveTime> {
    let compact: String = input
        .chars()
        .filter(|c| !c.is_whitespace() && *c != '.')
        .collect::<String>()
        .to_ascii_uppercase();

    let invalid = || ScheduleError::InvalidTime(input.trim().to_string());

    if compact.is_empty() {
        return Err(invalid());
    }

    let (digits, meridiem) = if let Some(rest) = compact.strip_suffix("AM") {
        (rest, Some(false))
    } else if let Some(rest) = compact.strip_suffix("PM") {
        (rest, Some(true))
    } else {
        (compact.as_str(), None)
    };

    let (hour_str, minute_str) = match digits.split_once(':') {
        Some((h, m)) => (h, m),
        None if meridiem.is_some() => (digits, "00"),
        None => return Err(invalid()),
    };

    if hour_str.is_empty()
        || minute_str.len() != 2
        || !hour_str.chars().all(|c| c.is_ascii_digit())
        || !minute_str.chars().all(|c| c.is_ascii_digit())
    {
        return Err(invalid());
    }

    let hour: u32 = hour_str.parse().map_err(|_| invalid())?;
    let minute: u32 = minute_str.parse().map_err(|_| invalid())?;

    let hour = match meridiem {
        Some(is_pm) => {
            if !(1..=12).contains(&hour) {
                return Err(invalid());
            }
            match (hour, is_pm) {
                (12, false) => 0,
                (12, true) => 12,
                (h, false) => h,
                (h, true) => h + 12,
            }
        }
        None => hour,
    };

    NaiveTime::from_hms_opt(hour, minute, 0).ok_or_else(invalid)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn t(h: u32, m: u32) -> NaiveTime {
        NaiveTime::from_hms_opt(h, m, 0).unwrap()
    }

    #[test]
    fn test_parse_compact_range() {
        let range = TimeRange::parse("10:00AM-4:00PM").unwrap();
        assert_eq!(range.start(), t(10, 0));
        assert_eq!(range.end(), t(16, 0));
        assert_eq!(range.duration_minutes(), 360);
    }

    #[test]
    fn test_parse_day_prefix_and_en_dash() {
        let range = TimeRange::parse("Monday - Friday: 9:30 AM \u{2013} 1:00 PM").unwrap();
        assert_eq!(range.start(), t(9, 30));
        assert_eq!(range.end(), t(13, 0));
    }

    #[test]
    fn test_parse_to_separator_and_24h() {
        let range = TimeRange::parse("08:00 to 12:15").unwrap();
        assert_eq!(range.start(), t(8, 0));
        assert_eq!(range.end(), t(12, 15));
    }

    #[test]
    fn test_parse_rejects_garbage() {
        assert!(matches!(TimeRange::parse(""), Err(ScheduleError::Empty)));
        assert!(matches!(
            TimeRange::parse("whenever"),
            Err(ScheduleError::MalformedRange(_))
        ));
        assert!(matches!(
            TimeRange::parse("Mon-Fri 10AM-4PM"),
            Err(ScheduleError::MalformedRange(_))
        ));
        assert!(matches!(
            TimeRange::parse("10:00AM-13:00PM"),
            Err(ScheduleError::InvalidTime(_))
        ));
    }

    #[test]
    fn test_parse_rejects_inverted_range() {
        let err = TimeRange::parse("4:00PM-10:00AM").unwrap_err();
        assert!(matches!(err, ScheduleError::EmptyRange { .. }));
    }

    #[test]
    fn test_deserialize_validates_range() {
        let range: TimeRange =
            serde_json::from_str(r#"{"start":"10:00:00","end":"16:00:00"}"#).unwrap();
        assert_eq!(range.duration_minutes(), 360);
        assert_eq!(
            serde_json::from_str::<TimeRange>(&serde_json::to_string(&range).unwrap()).unwrap(),
            range
        );

        assert!(serde_json::from_str::<TimeRange>(r#"{"start":"16:00:00","end":"10:00:00"}"#).is_err());
        assert!(serde_json::from_str::<TimeRange>(r#"{"start":"10:00:00","end":"10:00:00"}"#).is_err());
    }

    #[test]
    fn test_midnight_and_noon() {
        assert_eq!(Slot::parse("12:00 AM").unwrap().minute_of_day(), 0);
        assert_eq!(Slot::parse("12:00 PM").unwrap().minute_of_day(), 720);
    }

    #[test]
    fn test_slot_label_formats() {
        assert_eq!(Slot::new(t(9, 5)).label(), "9:05 AM");
        assert_eq!(Slot::new(t(16, 45)).label(), "4:45 PM");
    }

    #[test]
    fn test_slot_labels_compare_by_time() {
        let a = Slot::parse("10:00AM").unwrap();
        let b = Slot::parse("10:00 am").unwrap();
        let c = Slot::parse("10:00").unwrap();
        assert_eq!(a, b);
        assert_eq!(b, c);
    }

    #[test]
    fn test_slot_serde_uses_label() {
        let slot = Slot::new(t(14, 30));
        let json = serde_json::to_string(&slot).unwrap();
        assert_eq!(json, "\"2:30 PM\"");

        let back: Slot = serde_json::from_str("\"2:30PM\"").unwrap();
        assert_eq!(back, slot);
        assert!(serde_json::from_str::<Slot>("\"later\"").is_err());
    }

    #[test]
    fn test_range_contains() {
        let range = TimeRange::parse("10:00AM-11:00AM").unwrap();
        assert!(range.contains(&Slot::new(t(10, 0))));
        assert!(range.contains(&Slot::new(t(10, 45))));
        assert!(!range.contains(&Slot::new(t(11, 0))));
    }
}
