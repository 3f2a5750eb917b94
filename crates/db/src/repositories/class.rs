use std::time::Duration;

use async_trait::async_trait;
use chrono::{NaiveDate, Utc};
use gymbook_core::{
    capacity::Capacity,
    errors::{GymError, GymResult},
    models::class::{
        ClassBookingDetail, ClassBookingReceipt, ClassSlot, ClassSlotDetail, ClassType,
        NewClassSlot, NewClassType, NewTrainer, Trainer,
    },
    store::ClassStore,
};
use sqlx::{Postgres, Transaction};
use tracing::{debug, info};

use super::{is_foreign_key_violation, is_unique_violation, lock_error, set_lock_timeout, storage};
use crate::DbPool;
use crate::models::{
    DbClassBooking, DbClassBookingDetail, DbClassSlot, DbClassSlotDetail, DbClassType, DbTrainer,
};

/// Trainer-led classes on Postgres. Booking follows the same row-lock
/// protocol as `PgSlotStore`; creating a class slot additionally locks the
/// trainer row so overlap checks for one trainer serialize.
pub struct PgClassStore {
    pool: DbPool,
    lock_timeout: Duration,
}

impl PgClassStore {
    pub fn new(pool: DbPool, lock_timeout: Duration) -> Self {
        Self { pool, lock_timeout }
    }

    async fn begin(&self) -> GymResult<Transaction<'static, Postgres>> {
        let mut tx = self.pool.begin().await.map_err(storage)?;
        set_lock_timeout(&mut tx, self.lock_timeout).await?;
        Ok(tx)
    }

    async fn lock_class_slot(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        class_slot_id: i64,
    ) -> GymResult<ClassSlot> {
        let slot = sqlx::query_as::<_, DbClassSlot>(
            r#"
            SELECT id, date, start_time, end_time, class_type_id, trainer_id, capacity, available
            FROM class_slots
            WHERE id = $1
            FOR UPDATE
            "#,
        )
        .bind(class_slot_id)
        .fetch_optional(&mut **tx)
        .await
        .map_err(lock_error(class_slot_id, self.lock_timeout))?
        .ok_or(GymError::SlotNotFound(class_slot_id))?;

        Ok(slot.into())
    }

    async fn store_available(tx: &mut Transaction<'_, Postgres>, slot: &ClassSlot) -> GymResult<()> {
        sqlx::query(
            r#"
            UPDATE class_slots
            SET available = $2
            WHERE id = $1
            "#,
        )
        .bind(slot.id)
        .bind(slot.available)
        .execute(&mut **tx)
        .await
        .map_err(storage)?;

        Ok(())
    }
}

#[async_trait]
impl ClassStore for PgClassStore {
    async fn create_trainer(&self, trainer: NewTrainer) -> GymResult<Trainer> {
        let trainer = sqlx::query_as::<_, DbTrainer>(
            r#"
            INSERT INTO trainers (name, specialization, bio)
            VALUES ($1, $2, $3)
            RETURNING id, name, specialization, bio
            "#,
        )
        .bind(&trainer.name)
        .bind(&trainer.specialization)
        .bind(&trainer.bio)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| {
            if is_unique_violation(&e) {
                GymError::Conflict(format!("Trainer {} already exists", trainer.name))
            } else {
                storage(e)
            }
        })?;

        Ok(trainer.into())
    }

    async fn list_trainers(&self) -> GymResult<Vec<Trainer>> {
        let trainers = sqlx::query_as::<_, DbTrainer>(
            r#"
            SELECT id, name, specialization, bio
            FROM trainers
            ORDER BY id ASC
            "#,
        )
        .fetch_all(&self.pool)
        .await
        .map_err(storage)?;

        Ok(trainers.into_iter().map(Trainer::from).collect())
    }

    async fn create_class_type(&self, class_type: NewClassType) -> GymResult<ClassType> {
        let class_type = sqlx::query_as::<_, DbClassType>(
            r#"
            INSERT INTO class_types (name, description, duration_minutes)
            VALUES ($1, $2, $3)
            RETURNING id, name, description, duration_minutes
            "#,
        )
        .bind(&class_type.name)
        .bind(&class_type.description)
        .bind(class_type.duration_minutes)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| {
            if is_unique_violation(&e) {
                GymError::Conflict(format!("Class type {} already exists", class_type.name))
            } else {
                storage(e)
            }
        })?;

        Ok(class_type.into())
    }

    async fn list_class_types(&self) -> GymResult<Vec<ClassType>> {
        let class_types = sqlx::query_as::<_, DbClassType>(
            r#"
            SELECT id, name, description, duration_minutes
            FROM class_types
            ORDER BY id ASC
            "#,
        )
        .fetch_all(&self.pool)
        .await
        .map_err(storage)?;

        Ok(class_types.into_iter().map(ClassType::from).collect())
    }

    async fn create_class_slot(&self, new_slot: NewClassSlot) -> GymResult<ClassSlot> {
        new_slot.validate()?;

        let mut tx = self.begin().await?;

        // Serialize schedule changes per trainer so two overlapping classes
        // cannot both pass the overlap check.
        sqlx::query_scalar::<_, i64>(
            r#"
            SELECT id FROM trainers WHERE id = $1 FOR UPDATE
            "#,
        )
        .bind(new_slot.trainer_id)
        .fetch_optional(&mut *tx)
        .await
        .map_err(storage)?
        .ok_or_else(|| GymError::Validation(format!("Unknown trainer {}", new_slot.trainer_id)))?;

        let same_day = sqlx::query_as::<_, DbClassSlot>(
            r#"
            SELECT id, date, start_time, end_time, class_type_id, trainer_id, capacity, available
            FROM class_slots
            WHERE trainer_id = $1 AND date = $2
            "#,
        )
        .bind(new_slot.trainer_id)
        .bind(new_slot.date)
        .fetch_all(&mut *tx)
        .await
        .map_err(storage)?;

        let same_day: Vec<ClassSlot> = same_day.into_iter().map(ClassSlot::from).collect();
        new_slot.check_trainer_free(&same_day)?;

        let slot = sqlx::query_as::<_, DbClassSlot>(
            r#"
            INSERT INTO class_slots (date, start_time, end_time, class_type_id, trainer_id, capacity, available)
            VALUES ($1, $2, $3, $4, $5, $6, $6)
            RETURNING id, date, start_time, end_time, class_type_id, trainer_id, capacity, available
            "#,
        )
        .bind(new_slot.date)
        .bind(new_slot.start_time)
        .bind(new_slot.end_time)
        .bind(new_slot.class_type_id)
        .bind(new_slot.trainer_id)
        .bind(new_slot.capacity)
        .fetch_one(&mut *tx)
        .await
        .map_err(|e| {
            if is_foreign_key_violation(&e) {
                GymError::Validation(format!("Unknown class type {}", new_slot.class_type_id))
            } else {
                storage(e)
            }
        })?;

        tx.commit().await.map_err(storage)?;

        debug!("Created class slot: id={}", slot.id);
        Ok(slot.into())
    }

    async fn list_upcoming_classes(&self, from: NaiveDate) -> GymResult<Vec<ClassSlotDetail>> {
        let classes = sqlx::query_as::<_, DbClassSlotDetail>(
            r#"
            SELECT cs.id, cs.date, cs.start_time, cs.end_time, cs.class_type_id, cs.trainer_id,
                   cs.capacity, cs.available, t.name AS trainer_name, ct.name AS class_name
            FROM class_slots cs
            JOIN trainers t ON t.id = cs.trainer_id
            JOIN class_types ct ON ct.id = cs.class_type_id
            WHERE cs.date >= $1
            ORDER BY cs.date ASC, cs.start_time ASC
            "#,
        )
        .bind(from)
        .fetch_all(&self.pool)
        .await
        .map_err(storage)?;

        Ok(classes.into_iter().map(ClassSlotDetail::from).collect())
    }

    async fn book_class(
        &self,
        user_id: i64,
        class_slot_id: i64,
    ) -> GymResult<ClassBookingReceipt> {
        let mut tx = self.begin().await?;
        let mut slot = self.lock_class_slot(&mut tx, class_slot_id).await?;

        let already_booked = sqlx::query_scalar::<_, bool>(
            r#"
            SELECT EXISTS (
                SELECT 1 FROM class_bookings WHERE user_id = $1 AND class_slot_id = $2
            )
            "#,
        )
        .bind(user_id)
        .bind(class_slot_id)
        .fetch_one(&mut *tx)
        .await
        .map_err(storage)?;

        slot.reserve(user_id, already_booked)?;

        let booking = sqlx::query_as::<_, DbClassBooking>(
            r#"
            INSERT INTO class_bookings (user_id, class_slot_id, booked_at)
            VALUES ($1, $2, $3)
            RETURNING id, user_id, class_slot_id, booked_at
            "#,
        )
        .bind(user_id)
        .bind(class_slot_id)
        .bind(Utc::now())
        .fetch_one(&mut *tx)
        .await
        .map_err(|e| {
            if is_unique_violation(&e) {
                GymError::DuplicateBooking {
                    user_id,
                    slot_id: class_slot_id,
                }
            } else if is_foreign_key_violation(&e) {
                GymError::Validation(format!("Unknown user {}", user_id))
            } else {
                storage(e)
            }
        })?;

        Self::store_available(&mut tx, &slot).await?;
        tx.commit().await.map_err(storage)?;

        info!(
            "User {} booked class slot {} ({} places left)",
            user_id, class_slot_id, slot.available
        );
        Ok(ClassBookingReceipt {
            booking: booking.into(),
            slot,
        })
    }

    async fn cancel_class_booking(&self, user_id: i64, class_slot_id: i64) -> GymResult<ClassSlot> {
        let mut tx = self.begin().await?;
        let mut slot = self.lock_class_slot(&mut tx, class_slot_id).await?;

        let removed = sqlx::query(
            r#"
            DELETE FROM class_bookings
            WHERE user_id = $1 AND class_slot_id = $2
            "#,
        )
        .bind(user_id)
        .bind(class_slot_id)
        .execute(&mut *tx)
        .await
        .map_err(storage)?
        .rows_affected();

        if removed == 0 {
            return Err(GymError::BookingNotFound {
                user_id,
                slot_id: class_slot_id,
            });
        }

        slot.release();
        Self::store_available(&mut tx, &slot).await?;
        tx.commit().await.map_err(storage)?;

        Ok(slot)
    }

    async fn delete_class_slot(&self, class_slot_id: i64) -> GymResult<u64> {
        let mut tx = self.begin().await?;
        self.lock_class_slot(&mut tx, class_slot_id).await?;

        let removed = sqlx::query(
            r#"
            DELETE FROM class_bookings
            WHERE class_slot_id = $1
            "#,
        )
        .bind(class_slot_id)
        .execute(&mut *tx)
        .await
        .map_err(storage)?
        .rows_affected();

        sqlx::query(
            r#"
            DELETE FROM class_slots
            WHERE id = $1
            "#,
        )
        .bind(class_slot_id)
        .execute(&mut *tx)
        .await
        .map_err(storage)?;

        tx.commit().await.map_err(storage)?;

        info!("Deleted class slot {} and {} bookings", class_slot_id, removed);
        Ok(removed)
    }

    async fn class_bookings_for_user(&self, user_id: i64) -> GymResult<Vec<ClassBookingDetail>> {
        let bookings = sqlx::query_as::<_, DbClassBookingDetail>(
            r#"
            SELECT cb.id, cb.class_slot_id, ct.name AS class_name, t.name AS trainer_name,
                   cs.date, cs.start_time, cs.end_time, cb.booked_at
            FROM class_bookings cb
            JOIN class_slots cs ON cs.id = cb.class_slot_id
            JOIN trainers t ON t.id = cs.trainer_id
            JOIN class_types ct ON ct.id = cs.class_type_id
            WHERE cb.user_id = $1
            ORDER BY cs.date ASC, cs.start_time ASC
            "#,
        )
        .bind(user_id)
        .fetch_all(&self.pool)
        .await
        .map_err(storage)?;

        Ok(bookings.into_iter().map(ClassBookingDetail::from).collect())
    }
}
