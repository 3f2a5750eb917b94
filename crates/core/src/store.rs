//! # Store contracts
//!
//! The booking core is expressed as three traits. Transports (HTTP, the line
//! protocol) only ever talk to these; `gymbook-db` provides a Postgres and an
//! in-memory implementation of each.
//!
//! Implementations must uphold the booking transaction contract:
//!
//! 1. Lock the single slot so concurrent bookings for it serialize.
//! 2. Re-read `available` under the lock.
//! 3. Reject with `CapacityExceeded` when nothing is left.
//! 4. Reject with `DuplicateBooking` when the user already holds a place.
//! 5. Insert the booking and decrement `available` as one atomic unit.
//!
//! Operations on different slots must never block each other.

use async_trait::async_trait;
use chrono::NaiveDate;

use crate::errors::GymResult;
use crate::models::booking::{BookingDetail, BookingReceipt};
use crate::models::class::{
    ClassBookingDetail, ClassBookingReceipt, ClassSlot, ClassSlotDetail, ClassType, NewClassSlot,
    NewClassType, NewTrainer, Trainer,
};
use crate::models::slot::{NewSlot, Slot};
use crate::models::user::{NewUser, User};

#[async_trait]
pub trait SlotStore: Send + Sync {
    async fn create_slot(&self, new_slot: NewSlot) -> GymResult<Slot>;

    async fn get_slot(&self, slot_id: i64) -> GymResult<Slot>;

    /// Slots dated on or after `from`, ordered by (date, start time).
    async fn list_upcoming(&self, from: NaiveDate) -> GymResult<Vec<Slot>>;

    /// Fails with `Validation` when `user_id` is not a registered user.
    async fn book(&self, user_id: i64, slot_id: i64) -> GymResult<BookingReceipt>;

    /// Reverses `book`: removes the user's booking and returns the place.
    async fn cancel_booking(&self, user_id: i64, slot_id: i64) -> GymResult<Slot>;

    /// Deletes the slot together with all of its bookings. Returns the number
    /// of bookings removed.
    async fn delete_slot(&self, slot_id: i64) -> GymResult<u64>;

    async fn bookings_for_user(&self, user_id: i64) -> GymResult<Vec<BookingDetail>>;
}

#[async_trait]
pub trait ClassStore: Send + Sync {
    async fn create_trainer(&self, trainer: NewTrainer) -> GymResult<Trainer>;

    async fn list_trainers(&self) -> GymResult<Vec<Trainer>>;

    async fn create_class_type(&self, class_type: NewClassType) -> GymResult<ClassType>;

    async fn list_class_types(&self) -> GymResult<Vec<ClassType>>;

    /// Rejects windows that overlap another class of the same trainer.
    async fn create_class_slot(&self, new_slot: NewClassSlot) -> GymResult<ClassSlot>;

    async fn list_upcoming_classes(&self, from: NaiveDate) -> GymResult<Vec<ClassSlotDetail>>;

    async fn book_class(&self, user_id: i64, class_slot_id: i64)
    -> GymResult<ClassBookingReceipt>;

    async fn cancel_class_booking(&self, user_id: i64, class_slot_id: i64)
    -> GymResult<ClassSlot>;

    async fn delete_class_slot(&self, class_slot_id: i64) -> GymResult<u64>;

    async fn class_bookings_for_user(&self, user_id: i64) -> GymResult<Vec<ClassBookingDetail>>;
}

/// Identity store consulted by the transports. The booking core never
/// mutates it.
#[async_trait]
pub trait UserDirectory: Send + Sync {
    async fn register(&self, new_user: NewUser) -> GymResult<User>;

    /// Fails with `InvalidCredentials` for an unknown user or a wrong
    /// password alike.
    async fn authenticate(&self, username: &str, password: &str) -> GymResult<User>;

    async fn get_user(&self, user_id: i64) -> GymResult<Option<User>>;

    async fn set_staff(&self, user_id: i64, is_staff: bool) -> GymResult<User>;
}
