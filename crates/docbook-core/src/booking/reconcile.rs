//! Reconciles generated slots with bookings reported by the backend.

use std::collections::HashSet;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::models::Appointment;
use crate::schedule::Slot;

/// Generated slots split by availability. Both lists keep generation order.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct SlotPartition {
    pub available: Vec<Slot>,
    pub booked: Vec<Slot>,
}

impl SlotPartition {
    /// Whether the slot was generated for this day at all.
    pub fn contains(&self, slot: &Slot) -> bool {
        self.available.contains(slot) || self.booked.contains(slot)
    }

    pub fn is_available(&self, slot: &Slot) -> bool {
        self.available.contains(slot)
    }

    pub fn is_fully_booked(&self) -> bool {
        self.available.is_empty() && !self.booked.is_empty()
    }

    pub fn available_labels(&self) -> Vec<String> {
        self.available.iter().map(Slot::label).collect()
    }

    pub fn booked_labels(&self) -> Vec<String> {
        self.booked.iter().map(Slot::label).collect()
    }
}

/// Split `all_slots` into available and booked.
///
/// Booked slots that were never generated (outside working hours, off-grid)
/// are ignored.
pub fn partition(all_slots: &[Slot], booked: &[Slot]) -> SlotPartition {
    let taken: HashSet<u32> = booked.iter().map(Slot::minute_of_day).collect();

    let (booked, available): (Vec<Slot>, Vec<Slot>) = all_slots
        .iter()
        .copied()
        .partition(|slot| taken.contains(&slot.minute_of_day()));

    SlotPartition { available, booked }
}

/// [`partition`] over raw labels from the backend. Labels that cannot be
/// parsed are logged and skipped.
pub fn partition_labels(all_slots: &[Slot], booked_labels: &[String]) -> SlotPartition {
    let booked: Vec<Slot> = booked_labels
        .iter()
        .filter_map(|label| match Slot::parse(label) {
            Ok(slot) => Some(slot),
            Err(e) => {
                log::warn!("Ignoring unparseable booked slot {:?}: {}", label, e);
                None
            }
        })
        .collect();

    partition(all_slots, &booked)
}

/// Slots held by a doctor's non-cancelled appointments on `date`.
pub fn booked_slots_for(appointments: &[Appointment], doctor_id: &str, date: NaiveDate) -> Vec<Slot> {
    let mut slots: Vec<Slot> = appointments
        .iter()
        .filter(|a| a.doctor_id == doctor_id && a.date == date && a.holds_slot())
        .map(|a| a.slot)
        .collect();
    slots.sort();
    slots.dedup();
    slots
}

#[cfg(test)]
mod tests {
    use super::*;

    fn slots(labels: &[&str]) -> Vec<Slot> {
        labels.iter().map(|l| Slot::parse(l).unwrap()).collect()
    }

    #[test]
    fn test_partition_basic() {
        let result = partition(&slots(&["10:00 AM", "10:15 AM"]), &slots(&["10:00 AM"]));
        assert_eq!(result.available_labels(), vec!["10:15 AM"]);
        assert_eq!(result.booked_labels(), vec!["10:00 AM"]);
    }

    #[test]
    fn test_partition_ignores_unknown_bookings() {
        let result = partition(
            &slots(&["10:00 AM", "10:15 AM"]),
            &slots(&["3:00 PM", "10:07 AM"]),
        );
        assert_eq!(result.available.len(), 2);
        assert!(result.booked.is_empty());
    }

    #[test]
    fn test_partition_labels_normalizes_format() {
        let all = slots(&["9:00 AM", "9:30 AM", "10:00 AM"]);
        let booked = vec!["09:30AM".to_string(), "10:00 am".to_string(), "soon".to_string()];
        let result = partition_labels(&all, &booked);
        assert_eq!(result.available_labels(), vec!["9:00 AM"]);
        assert_eq!(result.booked_labels(), vec!["9:30 AM", "10:00 AM"]);
    }

    #[test]
    fn test_fully_booked() {
        let all = slots(&["9:00 AM"]);
        assert!(partition(&all, &all).is_fully_booked());
        assert!(!partition(&[], &[]).is_fully_booked());
    }

    #[test]
    fn test_booked_slots_skip_cancelled() {
        let date = NaiveDate::from_ymd_opt(2026, 6, 1).unwrap();
        let mut a = Appointment::new("doc-1".into(), "p1".into(), date, Slot::parse("9:00 AM").unwrap());
        let b = Appointment::new("doc-1".into(), "p2".into(), date, Slot::parse("9:30 AM").unwrap());
        let other_doc = Appointment::new("doc-2".into(), "p3".into(), date, Slot::parse("10:00 AM").unwrap());
        a.cancel().unwrap();

        let booked = booked_slots_for(&[a, b, other_doc], "doc-1", date);
        assert_eq!(booked, slots(&["9:30 AM"]));
    }
}
