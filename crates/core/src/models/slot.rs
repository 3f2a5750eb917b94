use chrono::{NaiveDate, NaiveTime};
use serde::{Deserialize, Serialize};

use super::{DATE_FORMAT, TIME_FORMAT};
use crate::errors::{GymError, GymResult};

pub const DEFAULT_CAPACITY: i32 = 10;

/// A bookable window on the general gym floor.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Slot {
    pub id: i64,
    pub date: NaiveDate,
    pub start_time: NaiveTime,
    pub end_time: NaiveTime,
    pub capacity: i32,
    pub available: i32,
}

impl Slot {
    /// Human readable description used in booking confirmations.
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
pub struct NewSlot {
    pub date: NaiveDate,
    pub start_time: NaiveTime,
    pub end_time: NaiveTime,
    #[serde(default = "default_capacity")]
    pub capacity: i32,
}

fn default_capacity() -> i32 {
    DEFAULT_CAPACITY
}

impl NewSlot {
    pub fn new(date: NaiveDate, start_time: NaiveTime, end_time: NaiveTime, capacity: i32) -> Self {
        Self {
            date,
            start_time,
            end_time,
            capacity,
        }
    }

    pub fn validate(&self) -> GymResult<()> {
        validate_window(self.start_time, self.end_time, self.capacity)
    }
}

/// Shared validation for any slot-like window.
pub fn validate_window(start_time: NaiveTime, end_time: NaiveTime, capacity: i32) -> GymResult<()> {
    if capacity <= 0 {
        return Err(GymError::Validation(format!(
            "Capacity must be positive, got {}",
            capacity
        )));
    }
    if end_time <= start_time {
        return Err(GymError::Validation(format!(
            "End time {} must be after start time {}",
            end_time.format(TIME_FORMAT),
            start_time.format(TIME_FORMAT)
        )));
    }
    Ok(())
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SlotResponse {
    pub id: i64,
    pub date: String,
    pub start_time: String,
    pub end_time: String,
    pub available: i32,
    pub capacity: i32,
}

impl From<&Slot> for SlotResponse {
    fn from(slot: &Slot) -> Self {
        Self {
            id: slot.id,
            date: slot.date.format(DATE_FORMAT).to_string(),
            start_time: slot.start_time.format(TIME_FORMAT).to_string(),
            end_time: slot.end_time.format(TIME_FORMAT).to_string(),
            available: slot.available,
            capacity: slot.capacity,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ListSlotsResponse {
    pub slots: Vec<SlotResponse>,
}

/// `slot_id` is optional so that a missing id surfaces as a validation
/// error instead of a JSON rejection.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BookSlotRequest {
    pub slot_id: Option<i64>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BookSlotResponse {
    pub success: bool,
    pub booking_id: i64,
    pub slot_info: String,
    pub available: i32,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DeleteSlotResponse {
    pub success: bool,
    pub removed_bookings: u64,
}
