use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use chrono::NaiveDate;
use gymbook_core::{
    errors::{GymError, GymResult},
    models::{
        booking::{Booking, BookingDetail, BookingReceipt},
        slot::{NewSlot, Slot},
    },
    store::SlotStore,
};
use tracing::{debug, info};

use super::table::SlotTable;
use super::users::MemoryUserDirectory;

pub struct MemorySlotStore {
    table: SlotTable<Slot>,
    users: Option<Arc<MemoryUserDirectory>>,
}

impl MemorySlotStore {
    /// A store that takes any user id on trust.
    pub fn new(lock_timeout: Duration) -> Self {
        Self {
            table: SlotTable::new(lock_timeout),
            users: None,
        }
    }

    /// A store that only books for users registered in `users`.
    pub fn with_users(lock_timeout: Duration, users: Arc<MemoryUserDirectory>) -> Self {
        Self {
            table: SlotTable::new(lock_timeout),
            users: Some(users),
        }
    }
}

#[async_trait]
impl SlotStore for MemorySlotStore {
    async fn create_slot(&self, new_slot: NewSlot) -> GymResult<Slot> {
        new_slot.validate()?;

        let slot = self
            .table
            .insert(
                |existing| {
                    let taken = existing.iter().any(|slot| {
                        slot.date == new_slot.date
                            && slot.start_time == new_slot.start_time
                            && slot.end_time == new_slot.end_time
                    });
                    if taken {
                        return Err(GymError::Conflict(format!(
                            "A slot already exists on {} from {} to {}",
                            new_slot.date, new_slot.start_time, new_slot.end_time
                        )));
                    }
                    Ok(())
                },
                |id| Slot {
                    id,
                    date: new_slot.date,
                    start_time: new_slot.start_time,
                    end_time: new_slot.end_time,
                    capacity: new_slot.capacity,
                    available: new_slot.capacity,
                },
            )
            .await?;

        debug!("Created slot: id={}", slot.id);
        Ok(slot)
    }

    async fn get_slot(&self, slot_id: i64) -> GymResult<Slot> {
        self.table.get(slot_id).await
    }

    async fn list_upcoming(&self, from: NaiveDate) -> GymResult<Vec<Slot>> {
        let mut slots: Vec<Slot> = self
            .table
            .slots()
            .await
            .into_iter()
            .filter(|slot| slot.date >= from)
            .collect();
        slots.sort_by_key(|slot| (slot.date, slot.start_time));

        Ok(slots)
    }

    async fn book(&self, user_id: i64, slot_id: i64) -> GymResult<BookingReceipt> {
        if let Some(users) = &self.users {
            users.require(user_id).await?;
        }
        let (row, slot) = self.table.book(user_id, slot_id).await?;

        info!(
            "User {} booked slot {} ({} places left)",
            user_id, slot_id, slot.available
        );
        Ok(BookingReceipt {
            booking: Booking {
                id: row.id,
                user_id,
                slot_id,
                booked_at: row.booked_at,
            },
            slot,
        })
    }

    async fn cancel_booking(&self, user_id: i64, slot_id: i64) -> GymResult<Slot> {
        let slot = self.table.cancel(user_id, slot_id).await?;

        info!("User {} cancelled booking on slot {}", user_id, slot_id);
        Ok(slot)
    }

    async fn delete_slot(&self, slot_id: i64) -> GymResult<u64> {
        let removed = self.table.delete(slot_id).await?;

        info!("Deleted slot {} and {} bookings", slot_id, removed);
        Ok(removed)
    }

    async fn bookings_for_user(&self, user_id: i64) -> GymResult<Vec<BookingDetail>> {
        let mut bookings: Vec<BookingDetail> = self
            .table
            .bookings_of(user_id)
            .await
            .into_iter()
            .map(|(row, slot)| {
                let booking = Booking {
                    id: row.id,
                    user_id,
                    slot_id: slot.id,
                    booked_at: row.booked_at,
                };
                BookingDetail::new(&booking, &slot)
            })
            .collect();
        bookings.sort_by_key(|booking| (booking.date, booking.start_time));

        Ok(bookings)
    }
}
