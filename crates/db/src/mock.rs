//! Mock stores for testing transports against failures the real backends
//! only produce under load or outage (storage errors, lock timeouts).

use async_trait::async_trait;
use chrono::NaiveDate;
use gymbook_core::{
    errors::GymResult,
    models::{
        booking::{BookingDetail, BookingReceipt},
        slot::{NewSlot, Slot},
    },
    store::SlotStore,
};
use mockall::mock;

mock! {
    pub SlotStore {}

    #[async_trait]
    impl SlotStore for SlotStore {
        async fn create_slot(&self, new_slot: NewSlot) -> GymResult<Slot>;
        async fn get_slot(&self, slot_id: i64) -> GymResult<Slot>;
        async fn list_upcoming(&self, from: NaiveDate) -> GymResult<Vec<Slot>>;
        async fn book(&self, user_id: i64, slot_id: i64) -> GymResult<BookingReceipt>;
        async fn cancel_booking(&self, user_id: i64, slot_id: i64) -> GymResult<Slot>;
        async fn delete_slot(&self, slot_id: i64) -> GymResult<u64>;
        async fn bookings_for_user(&self, user_id: i64) -> GymResult<Vec<BookingDetail>>;
    }
}
