use std::collections::BTreeMap;
use std::sync::Arc;
use std::sync::atomic::{AtomicI64, Ordering};
use std::time::Duration;

use async_trait::async_trait;
use chrono::NaiveDate;
use gymbook_core::{
    errors::{GymError, GymResult},
    models::class::{
        ClassBooking, ClassBookingDetail, ClassBookingReceipt, ClassSlot, ClassSlotDetail,
        ClassType, NewClassSlot, NewClassType, NewTrainer, Trainer,
    },
    store::ClassStore,
};
use tokio::sync::RwLock;
use tracing::{debug, info};

use super::table::SlotTable;
use super::users::MemoryUserDirectory;

pub struct MemoryClassStore {
    trainers: RwLock<BTreeMap<i64, Trainer>>,
    class_types: RwLock<BTreeMap<i64, ClassType>>,
    next_trainer_id: AtomicI64,
    next_class_type_id: AtomicI64,
    slots: SlotTable<ClassSlot>,
    users: Option<Arc<MemoryUserDirectory>>,
}

impl MemoryClassStore {
    pub fn new(lock_timeout: Duration) -> Self {
        Self {
            trainers: RwLock::new(BTreeMap::new()),
            class_types: RwLock::new(BTreeMap::new()),
            next_trainer_id: AtomicI64::new(1),
            next_class_type_id: AtomicI64::new(1),
            slots: SlotTable::new(lock_timeout),
            users: None,
        }
    }

    pub fn with_users(lock_timeout: Duration, users: Arc<MemoryUserDirectory>) -> Self {
        Self {
            users: Some(users),
            ..Self::new(lock_timeout)
        }
    }

    /// Trainer and class names for a slot, if both still exist.
    async fn names_for(&self, slot: &ClassSlot) -> Option<(String, String)> {
        let trainer = self.trainers.read().await.get(&slot.trainer_id)?.name.clone();
        let class_name = self
            .class_types
            .read()
            .await
            .get(&slot.class_type_id)?
            .name
            .clone();
        Some((trainer, class_name))
    }
}

#[async_trait]
impl ClassStore for MemoryClassStore {
    async fn create_trainer(&self, trainer: NewTrainer) -> GymResult<Trainer> {
        let mut trainers = self.trainers.write().await;
        if trainers.values().any(|t| t.name == trainer.name) {
            return Err(GymError::Conflict(format!(
                "Trainer {} already exists",
                trainer.name
            )));
        }

        let id = self.next_trainer_id.fetch_add(1, Ordering::Relaxed);
        let trainer = Trainer {
            id,
            name: trainer.name,
            specialization: trainer.specialization,
            bio: trainer.bio,
        };
        trainers.insert(id, trainer.clone());

        Ok(trainer)
    }

    async fn list_trainers(&self) -> GymResult<Vec<Trainer>> {
        Ok(self.trainers.read().await.values().cloned().collect())
    }

    async fn create_class_type(&self, class_type: NewClassType) -> GymResult<ClassType> {
        let mut class_types = self.class_types.write().await;
        if class_types.values().any(|c| c.name == class_type.name) {
            return Err(GymError::Conflict(format!(
                "Class type {} already exists",
                class_type.name
            )));
        }

        let id = self.next_class_type_id.fetch_add(1, Ordering::Relaxed);
        let class_type = ClassType {
            id,
            name: class_type.name,
            description: class_type.description,
            duration_minutes: class_type.duration_minutes,
        };
        class_types.insert(id, class_type.clone());

        Ok(class_type)
    }

    async fn list_class_types(&self) -> GymResult<Vec<ClassType>> {
        Ok(self.class_types.read().await.values().cloned().collect())
    }

    async fn create_class_slot(&self, new_slot: NewClassSlot) -> GymResult<ClassSlot> {
        new_slot.validate()?;

        if !self.trainers.read().await.contains_key(&new_slot.trainer_id) {
            return Err(GymError::Validation(format!(
                "Unknown trainer {}",
                new_slot.trainer_id
            )));
        }
        if !self
            .class_types
            .read()
            .await
            .contains_key(&new_slot.class_type_id)
        {
            return Err(GymError::Validation(format!(
                "Unknown class type {}",
                new_slot.class_type_id
            )));
        }

        let slot = self
            .slots
            .insert(
                |existing| new_slot.check_trainer_free(existing.iter().copied()),
                |id| ClassSlot {
                    id,
                    date: new_slot.date,
                    start_time: new_slot.start_time,
                    end_time: new_slot.end_time,
                    class_type_id: new_slot.class_type_id,
                    trainer_id: new_slot.trainer_id,
                    capacity: new_slot.capacity,
                    available: new_slot.capacity,
                },
            )
            .await?;

        debug!("Created class slot: id={}", slot.id);
        Ok(slot)
    }

    async fn list_upcoming_classes(&self, from: NaiveDate) -> GymResult<Vec<ClassSlotDetail>> {
        let mut slots: Vec<ClassSlot> = self
            .slots
            .slots()
            .await
            .into_iter()
            .filter(|slot| slot.date >= from)
            .collect();
        slots.sort_by_key(|slot| (slot.date, slot.start_time));

        let mut classes = Vec::with_capacity(slots.len());
        for slot in slots {
            if let Some((trainer_name, class_name)) = self.names_for(&slot).await {
                classes.push(ClassSlotDetail {
                    slot,
                    trainer_name,
                    class_name,
                });
            }
        }

        Ok(classes)
    }

    async fn book_class(
        &self,
        user_id: i64,
        class_slot_id: i64,
    ) -> GymResult<ClassBookingReceipt> {
        if let Some(users) = &self.users {
            users.require(user_id).await?;
        }
        let (row, slot) = self.slots.book(user_id, class_slot_id).await?;

        info!(
            "User {} booked class slot {} ({} places left)",
            user_id, class_slot_id, slot.available
        );
        Ok(ClassBookingReceipt {
            booking: ClassBooking {
                id: row.id,
                user_id,
                class_slot_id,
                booked_at: row.booked_at,
            },
            slot,
        })
    }

    async fn cancel_class_booking(&self, user_id: i64, class_slot_id: i64) -> GymResult<ClassSlot> {
        self.slots.cancel(user_id, class_slot_id).await
    }

    async fn delete_class_slot(&self, class_slot_id: i64) -> GymResult<u64> {
        let removed = self.slots.delete(class_slot_id).await?;

        info!("Deleted class slot {} and {} bookings", class_slot_id, removed);
        Ok(removed)
    }

    async fn class_bookings_for_user(&self, user_id: i64) -> GymResult<Vec<ClassBookingDetail>> {
        let mut bookings = Vec::new();
        for (row, slot) in self.slots.bookings_of(user_id).await {
            if let Some((trainer_name, class_name)) = self.names_for(&slot).await {
                bookings.push(ClassBookingDetail {
                    id: row.id,
                    class_slot_id: slot.id,
                    class_name,
                    trainer_name,
                    date: slot.date,
                    start_time: slot.start_time,
                    end_time: slot.end_time,
                    booked_at: row.booked_at,
                });
            }
        }
        bookings.sort_by_key(|booking| (booking.date, booking.start_time));

        Ok(bookings)
    }
}
