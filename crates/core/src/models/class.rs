//! Trainer-led classes. A class slot behaves exactly like a general slot for
//! booking purposes but is owned by one trainer and one class type.

use chrono::{DateTime, NaiveDate, NaiveTime, Utc};
use serde::{Deserialize, Serialize};

use super::slot::{DEFAULT_CAPACITY, validate_window};
use super::{DATE_FORMAT, TIME_FORMAT, TIMESTAMP_FORMAT};
use crate::errors::{GymError, GymResult};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Trainer {
    pub id: i64,
    pub name: String,
    pub specialization: String,
    pub bio: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewTrainer {
    pub name: String,
    pub specialization: String,
    pub bio: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClassType {
    pub id: i64,
    pub name: String,
    pub description: String,
    pub duration_minutes: i32,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewClassType {
    pub name: String,
    pub description: String,
    pub duration_minutes: i32,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClassSlot {
    pub id: i64,
    pub date: NaiveDate,
    pub start_time: NaiveTime,
    pub end_time: NaiveTime,
    pub class_type_id: i64,
    pub trainer_id: i64,
    pub capacity: i32,
    pub available: i32,
}

impl ClassSlot {
    /// Whether this slot occupies the same trainer at an overlapping time.
    pub fn overlaps(&self, other: &NewClassSlot) -> bool {
        self.trainer_id == other.trainer_id
            && self.date == other.date
            && self.start_time < other.end_time
            && other.start_time < self.end_time
    }

    pub fn label(&self) -> String {
        format!(
            "{} {}-{}",
            self.date.format(DATE_FORMAT),
            self.start_time.format(TIME_FORMAT),
            self.end_time.format(TIME_FORMAT)
        )
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewClassSlot {
    pub date: NaiveDate,
    pub start_time: NaiveTime,
    pub end_time: NaiveTime,
    pub class_type_id: i64,
    pub trainer_id: i64,
    pub capacity: i32,
}

impl NewClassSlot {
    pub fn new(
        date: NaiveDate,
        start_time: NaiveTime,
        end_time: NaiveTime,
        class_type_id: i64,
        trainer_id: i64,
    ) -> Self {
        Self {
            date,
            start_time,
            end_time,
            class_type_id,
            trainer_id,
            capacity: DEFAULT_CAPACITY,
        }
    }

    pub fn with_capacity(mut self, capacity: i32) -> Self {
        self.capacity = capacity;
        self
    }

    pub fn validate(&self) -> GymResult<()> {
        validate_window(self.start_time, self.end_time, self.capacity)
    }

    /// Fails with `TrainerConflict` if any of `existing` overlaps this slot.
    pub fn check_trainer_free<'a>(
        &self,
        existing: impl IntoIterator<Item = &'a ClassSlot>,
    ) -> GymResult<()> {
        if existing.into_iter().any(|slot| slot.overlaps(self)) {
            return Err(GymError::TrainerConflict {
                trainer_id: self.trainer_id,
            });
        }
        Ok(())
    }
}

/// A class slot joined with its trainer and class type names.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClassSlotDetail {
    pub slot: ClassSlot,
    pub trainer_name: String,
    pub class_name: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClassBooking {
    pub id: i64,
    pub user_id: i64,
    pub class_slot_id: i64,
    pub booked_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClassBookingReceipt {
    pub booking: ClassBooking,
    pub slot: ClassSlot,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClassBookingDetail {
    pub id: i64,
    pub class_slot_id: i64,
    pub class_name: String,
    pub trainer_name: String,
    pub date: NaiveDate,
    pub start_time: NaiveTime,
    pub end_time: NaiveTime,
    pub booked_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClassSlotResponse {
    pub id: i64,
    pub class_name: String,
    pub trainer_name: String,
    pub date: String,
    pub start_time: String,
    pub end_time: String,
    pub available: i32,
    pub capacity: i32,
}

impl From<&ClassSlotDetail> for ClassSlotResponse {
    fn from(detail: &ClassSlotDetail) -> Self {
        Self {
            id: detail.slot.id,
            class_name: detail.class_name.clone(),
            trainer_name: detail.trainer_name.clone(),
            date: detail.slot.date.format(DATE_FORMAT).to_string(),
            start_time: detail.slot.start_time.format(TIME_FORMAT).to_string(),
            end_time: detail.slot.end_time.format(TIME_FORMAT).to_string(),
            available: detail.slot.available,
            capacity: detail.slot.capacity,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ListClassesResponse {
    pub classes: Vec<ClassSlotResponse>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BookClassRequest {
    pub class_slot_id: Option<i64>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClassBookingResponse {
    pub id: i64,
    pub class_slot_id: i64,
    pub class_name: String,
    pub trainer_name: String,
    pub date: String,
    pub start_time: String,
    pub end_time: String,
    pub booked_at: String,
}

impl From<&ClassBookingDetail> for ClassBookingResponse {
    fn from(detail: &ClassBookingDetail) -> Self {
        Self {
            id: detail.id,
            class_slot_id: detail.class_slot_id,
            class_name: detail.class_name.clone(),
            trainer_name: detail.trainer_name.clone(),
            date: detail.date.format(DATE_FORMAT).to_string(),
            start_time: detail.start_time.format(TIME_FORMAT).to_string(),
            end_time: detail.end_time.format(TIME_FORMAT).to_string(),
            booked_at: detail.booked_at.format(TIMESTAMP_FORMAT).to_string(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MyClassBookingsResponse {
    pub bookings: Vec<ClassBookingResponse>,
}
