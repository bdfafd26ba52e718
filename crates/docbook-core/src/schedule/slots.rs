//! Slot generator.

use super::{ScheduleError, ScheduleResult, Slot, TimeRange};

/// Produce the ordered slot starts for a working-hours range.
///
/// Emits `start, start + interval, ...` while the slot start is strictly
/// before `end`. A zero interval or a degenerate range yields no slots.
pub fn generate_slots(range: &TimeRange, interval_minutes: u32) -> Vec<Slot> {
    if interval_minutes == 0 || range.end() <= range.start() {
        return Vec::new();
    }

    let start = Slot::new(range.start()).minute_of_day();
    let end = Slot::new(range.end()).minute_of_day();

    (start..end)
        .step_by(interval_minutes as usize)
        .filter_map(Slot::from_minute_of_day)
        .collect()
}

/// Parse a timing string and generate its slots.
pub fn available_time_slots(timing: &str, interval_minutes: u32) -> ScheduleResult<Vec<Slot>> {
    if interval_minutes == 0 {
        return Err(ScheduleError::InvalidInterval);
    }
    let range = TimeRange::parse(timing)?;
    Ok(generate_slots(&range, interval_minutes))
}

/// Like [`available_time_slots`], but never fails: malformed input produces
/// an empty list alongside the error to surface.
pub fn slots_or_empty(timing: &str, interval_minutes: u32) -> (Vec<Slot>, Option<ScheduleError>) {
    match available_time_slots(timing, interval_minutes) {
        Ok(slots) => (slots, None),
        Err(e) => {
            log::warn!("Cannot generate slots for {:?}: {}", timing, e);
            (Vec::new(), Some(e))
        }
    }
}
