//! # Capacity invariant
//!
//! Every bookable window keeps `0 <= available <= capacity`. The checks in
//! this module are the only place availability is changed; both storage
//! backends call them while holding the slot's exclusive lock.

use crate::errors::{GymError, GymResult};
use crate::models::class::ClassSlot;
use crate::models::slot::Slot;

pub trait Capacity {
    fn slot_id(&self) -> i64;
    fn capacity(&self) -> i32;
    fn available(&self) -> i32;
    fn set_available(&mut self, available: i32);

    /// Claims one place for `user_id`.
    ///
    /// Capacity is checked before duplication, so a full slot reports
    /// `CapacityExceeded` even to a user who already holds a place in it.
    /// On error nothing is changed.
    fn reserve(&mut self, user_id: i64, already_booked: bool) -> GymResult<()> {
        if self.available() <= 0 {
            return Err(GymError::CapacityExceeded(self.slot_id()));
        }
        if already_booked {
            return Err(GymError::DuplicateBooking {
                user_id,
                slot_id: self.slot_id(),
            });
        }
        self.set_available(self.available() - 1);
        Ok(())
    }

    /// Returns one place to the pool, saturating at `capacity`.
    fn release(&mut self) {
        let available = (self.available() + 1).min(self.capacity());
        self.set_available(available);
    }
}

impl Capacity for Slot {
    fn slot_id(&self) -> i64 {
        self.id
    }

    fn capacity(&self) -> i32 {
        self.capacity
    }

    fn available(&self) -> i32 {
        self.available
    }

    fn set_available(&mut self, available: i32) {
        self.available = available;
    }
}

impl Capacity for ClassSlot {
    fn slot_id(&self) -> i64 {
        self.id
    }

    fn capacity(&self) -> i32 {
        self.capacity
    }

    fn available(&self) -> i32 {
        self.available
    }

    fn set_available(&mut self, available: i32) {
        self.available = available;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{NaiveDate, NaiveTime};

    fn slot(capacity: i32, available: i32) -> Slot {
        Slot {
            id: 7,
            date: NaiveDate::from_ymd_opt(2026, 10, 19).unwrap(),
            start_time: NaiveTime::from_hms_opt(8, 0, 0).unwrap(),
            end_time: NaiveTime::from_hms_opt(9, 0, 0).unwrap(),
            capacity,
            available,
        }
    }

    #[test]
    fn reserve_decrements() {
        let mut slot = slot(2, 2);
        slot.reserve(1, false).unwrap();
        assert_eq!(slot.available, 1);
    }

    #[test]
    fn full_slot_is_rejected_before_duplicate_check() {
        let mut slot = slot(1, 0);
        let err = slot.reserve(1, true).unwrap_err();
        assert!(matches!(err, GymError::CapacityExceeded(7)));
        assert_eq!(slot.available, 0);
    }

    #[test]
    fn duplicate_leaves_availability_alone() {
        let mut slot = slot(3, 2);
        let err = slot.reserve(1, true).unwrap_err();
        assert!(matches!(
            err,
            GymError::DuplicateBooking {
                user_id: 1,
                slot_id: 7
            }
        ));
        assert_eq!(slot.available, 2);
    }

    #[test]
    fn release_never_exceeds_capacity() {
        let mut slot = slot(2, 2);
        slot.release();
        assert_eq!(slot.available, 2);

        let mut slot = self::slot(2, 0);
        slot.release();
        assert_eq!(slot.available, 1);
    }
}
