use chrono::{DateTime, NaiveDate, NaiveTime, Utc};
use serde::{Deserialize, Serialize};

use super::slot::Slot;
use super::{DATE_FORMAT, TIME_FORMAT, TIMESTAMP_FORMAT};

/// A user's claim on one general slot. Unique per (user, slot).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Booking {
    pub id: i64,
    pub user_id: i64,
    pub slot_id: i64,
    pub booked_at: DateTime<Utc>,
}

/// Result of a committed booking transaction: the new ledger row and the
/// slot as it stood at commit time.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BookingReceipt {
    pub booking: Booking,
    pub slot: Slot,
}

/// A booking joined with the slot it refers to.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BookingDetail {
    pub id: i64,
    pub slot_id: i64,
    pub date: NaiveDate,
    pub start_time: NaiveTime,
    pub end_time: NaiveTime,
    pub booked_at: DateTime<Utc>,
}

impl BookingDetail {
    pub fn new(booking: &Booking, slot: &Slot) -> Self {
        Self {
            id: booking.id,
            slot_id: slot.id,
            date: slot.date,
            start_time: slot.start_time,
            end_time: slot.end_time,
            booked_at: booking.booked_at,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BookingResponse {
    pub id: i64,
    pub slot_id: i64,
    pub date: String,
    pub start_time: String,
    pub end_time: String,
    pub booked_at: String,
}

impl From<&BookingDetail> for BookingResponse {
    fn from(detail: &BookingDetail) -> Self {
        Self {
            id: detail.id,
            slot_id: detail.slot_id,
            date: detail.date.format(DATE_FORMAT).to_string(),
            start_time: detail.start_time.format(TIME_FORMAT).to_string(),
            end_time: detail.end_time.format(TIME_FORMAT).to_string(),
            booked_at: detail.booked_at.format(TIMESTAMP_FORMAT).to_string(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MyBookingsResponse {
    pub bookings: Vec<BookingResponse>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CancelBookingResponse {
    pub success: bool,
    pub available: i32,
}
