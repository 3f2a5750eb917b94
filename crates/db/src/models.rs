use chrono::{DateTime, NaiveDate, NaiveTime, Utc};
use gymbook_core::models::{
    booking::{Booking, BookingDetail},
    class::{ClassBooking, ClassBookingDetail, ClassSlot, ClassSlotDetail, ClassType, Trainer},
    slot::Slot,
    user::User,
};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct DbSlot {
    pub id: i64,
    pub date: NaiveDate,
    pub start_time: NaiveTime,
    pub end_time: NaiveTime,
    pub capacity: i32,
    pub available: i32,
}

impl From<DbSlot> for Slot {
    fn from(row: DbSlot) -> Self {
        Self {
            id: row.id,
            date: row.date,
            start_time: row.start_time,
            end_time: row.end_time,
            capacity: row.capacity,
            available: row.available,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct DbBooking {
    pub id: i64,
    pub user_id: i64,
    pub slot_id: i64,
    pub booked_at: DateTime<Utc>,
}

impl From<DbBooking> for Booking {
    fn from(row: DbBooking) -> Self {
        Self {
            id: row.id,
            user_id: row.user_id,
            slot_id: row.slot_id,
            booked_at: row.booked_at,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct DbBookingDetail {
    pub id: i64,
    pub slot_id: i64,
    pub date: NaiveDate,
    pub start_time: NaiveTime,
    pub end_time: NaiveTime,
    pub booked_at: DateTime<Utc>,
}

impl From<DbBookingDetail> for BookingDetail {
    fn from(row: DbBookingDetail) -> Self {
        Self {
            id: row.id,
            slot_id: row.slot_id,
            date: row.date,
            start_time: row.start_time,
            end_time: row.end_time,
            booked_at: row.booked_at,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct DbTrainer {
    pub id: i64,
    pub name: String,
    pub specialization: String,
    pub bio: Option<String>,
}

impl From<DbTrainer> for Trainer {
    fn from(row: DbTrainer) -> Self {
        Self {
            id: row.id,
            name: row.name,
            specialization: row.specialization,
            bio: row.bio,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct DbClassType {
    pub id: i64,
    pub name: String,
    pub description: String,
    pub duration_minutes: i32,
}

impl From<DbClassType> for ClassType {
    fn from(row: DbClassType) -> Self {
        Self {
            id: row.id,
            name: row.name,
            description: row.description,
            duration_minutes: row.duration_minutes,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct DbClassSlot {
    pub id: i64,
    pub date: NaiveDate,
    pub start_time: NaiveTime,
    pub end_time: NaiveTime,
    pub class_type_id: i64,
    pub trainer_id: i64,
    pub capacity: i32,
    pub available: i32,
}

impl From<DbClassSlot> for ClassSlot {
    fn from(row: DbClassSlot) -> Self {
        Self {
            id: row.id,
            date: row.date,
            start_time: row.start_time,
            end_time: row.end_time,
            class_type_id: row.class_type_id,
            trainer_id: row.trainer_id,
            capacity: row.capacity,
            available: row.available,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct DbClassSlotDetail {
    pub id: i64,
    pub date: NaiveDate,
    pub start_time: NaiveTime,
    pub end_time: NaiveTime,
    pub class_type_id: i64,
    pub trainer_id: i64,
    pub capacity: i32,
    pub available: i32,
    pub trainer_name: String,
    pub class_name: String,
}

impl From<DbClassSlotDetail> for ClassSlotDetail {
    fn from(row: DbClassSlotDetail) -> Self {
        Self {
            slot: ClassSlot {
                id: row.id,
                date: row.date,
                start_time: row.start_time,
                end_time: row.end_time,
                class_type_id: row.class_type_id,
                trainer_id: row.trainer_id,
                capacity: row.capacity,
                available: row.available,
            },
            trainer_name: row.trainer_name,
            class_name: row.class_name,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct DbClassBooking {
    pub id: i64,
    pub user_id: i64,
    pub class_slot_id: i64,
    pub booked_at: DateTime<Utc>,
}

impl From<DbClassBooking> for ClassBooking {
    fn from(row: DbClassBooking) -> Self {
        Self {
            id: row.id,
            user_id: row.user_id,
            class_slot_id: row.class_slot_id,
            booked_at: row.booked_at,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct DbClassBookingDetail {
    pub id: i64,
    pub class_slot_id: i64,
    pub class_name: String,
    pub trainer_name: String,
    pub date: NaiveDate,
    pub start_time: NaiveTime,
    pub end_time: NaiveTime,
    pub booked_at: DateTime<Utc>,
}

impl From<DbClassBookingDetail> for ClassBookingDetail {
    fn from(row: DbClassBookingDetail) -> Self {
        Self {
            id: row.id,
            class_slot_id: row.class_slot_id,
            class_name: row.class_name,
            trainer_name: row.trainer_name,
            date: row.date,
            start_time: row.start_time,
            end_time: row.end_time,
            booked_at: row.booked_at,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct DbUser {
    pub id: i64,
    pub username: String,
    pub email: String,
    pub password_hash: String,
    pub is_staff: bool,
    pub created_at: DateTime<Utc>,
}

impl From<DbUser> for User {
    fn from(row: DbUser) -> Self {
        Self {
            id: row.id,
            username: row.username,
            email: row.email,
            password_hash: row.password_hash,
            is_staff: row.is_staff,
            created_at: row.created_at,
        }
    }
}
