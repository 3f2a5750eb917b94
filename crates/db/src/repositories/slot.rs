use std::time::Duration;

use async_trait::async_trait;
use chrono::{NaiveDate, Utc};
use gymbook_core::{
    capacity::Capacity,
    errors::{GymError, GymResult},
    models::{
        booking::{BookingDetail, BookingReceipt},
        slot::{NewSlot, Slot},
    },
    store::SlotStore,
};
use sqlx::{Postgres, Transaction};
use tracing::{debug, info};

use super::{is_foreign_key_violation, is_unique_violation, lock_error, set_lock_timeout, storage};
use crate::DbPool;
use crate::models::{DbBooking, DbBookingDetail, DbSlot};

/// Slot store backed by Postgres. Each booking runs in its own transaction
/// that holds `FOR UPDATE` on the slot row for the read-check-write sequence.
pub struct PgSlotStore {
    pool: DbPool,
    lock_timeout: Duration,
}

impl PgSlotStore {
    pub fn new(pool: DbPool, lock_timeout: Duration) -> Self {
        Self { pool, lock_timeout }
    }

    async fn begin(&self) -> GymResult<Transaction<'static, Postgres>> {
        let mut tx = self.pool.begin().await.map_err(storage)?;
        set_lock_timeout(&mut tx, self.lock_timeout).await?;
        Ok(tx)
    }

    async fn lock_slot(&self, tx: &mut Transaction<'_, Postgres>, slot_id: i64) -> GymResult<Slot> {
        let slot = sqlx::query_as::<_, DbSlot>(
            r#"
            SELECT id, date, start_time, end_time, capacity, available
            FROM slots
            WHERE id = $1
            FOR UPDATE
            "#,
        )
        .bind(slot_id)
        .fetch_optional(&mut **tx)
        .await
        .map_err(lock_error(slot_id, self.lock_timeout))?
        .ok_or(GymError::SlotNotFound(slot_id))?;

        Ok(slot.into())
    }

    async fn store_available(tx: &mut Transaction<'_, Postgres>, slot: &Slot) -> GymResult<()> {
        sqlx::query(
            r#"
            UPDATE slots
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
impl SlotStore for PgSlotStore {
    async fn create_slot(&self, new_slot: NewSlot) -> GymResult<Slot> {
        new_slot.validate()?;

        let slot = sqlx::query_as::<_, DbSlot>(
            r#"
            INSERT INTO slots (date, start_time, end_time, capacity, available)
            VALUES ($1, $2, $3, $4, $4)
            RETURNING id, date, start_time, end_time, capacity, available
            "#,
        )
        .bind(new_slot.date)
        .bind(new_slot.start_time)
        .bind(new_slot.end_time)
        .bind(new_slot.capacity)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| {
            if is_unique_violation(&e) {
                GymError::Conflict(format!(
                    "A slot already exists on {} from {} to {}",
                    new_slot.date, new_slot.start_time, new_slot.end_time
                ))
            } else {
                storage(e)
            }
        })?;

        debug!("Created slot: id={}", slot.id);
        Ok(slot.into())
    }

    async fn get_slot(&self, slot_id: i64) -> GymResult<Slot> {
        let slot = sqlx::query_as::<_, DbSlot>(
            r#"
            SELECT id, date, start_time, end_time, capacity, available
            FROM slots
            WHERE id = $1
            "#,
        )
        .bind(slot_id)
        .fetch_optional(&self.pool)
        .await
        .map_err(storage)?
        .ok_or(GymError::SlotNotFound(slot_id))?;

        Ok(slot.into())
    }

    async fn list_upcoming(&self, from: NaiveDate) -> GymResult<Vec<Slot>> {
        let slots = sqlx::query_as::<_, DbSlot>(
            r#"
            SELECT id, date, start_time, end_time, capacity, available
            FROM slots
            WHERE date >= $1
            ORDER BY date ASC, start_time ASC
            "#,
        )
        .bind(from)
        .fetch_all(&self.pool)
        .await
        .map_err(storage)?;

        Ok(slots.into_iter().map(Slot::from).collect())
    }

    async fn book(&self, user_id: i64, slot_id: i64) -> GymResult<BookingReceipt> {
        let mut tx = self.begin().await?;
        let mut slot = self.lock_slot(&mut tx, slot_id).await?;

        let already_booked = sqlx::query_scalar::<_, bool>(
            r#"
            SELECT EXISTS (
                SELECT 1 FROM bookings WHERE user_id = $1 AND slot_id = $2
            )
            "#,
        )
        .bind(user_id)
        .bind(slot_id)
        .fetch_one(&mut *tx)
        .await
        .map_err(storage)?;

        // An early return drops `tx`, which rolls the transaction back.
        slot.reserve(user_id, already_booked)?;

        let booking = sqlx::query_as::<_, DbBooking>(
            r#"
            INSERT INTO bookings (user_id, slot_id, booked_at)
            VALUES ($1, $2, $3)
            RETURNING id, user_id, slot_id, booked_at
            "#,
        )
        .bind(user_id)
        .bind(slot_id)
        .bind(Utc::now())
        .fetch_one(&mut *tx)
        .await
        .map_err(|e| {
            if is_unique_violation(&e) {
                GymError::DuplicateBooking { user_id, slot_id }
            } else if is_foreign_key_violation(&e) {
                GymError::Validation(format!("Unknown user {}", user_id))
            } else {
                storage(e)
            }
        })?;

        Self::store_available(&mut tx, &slot).await?;
        tx.commit().await.map_err(storage)?;

        info!(
            "User {} booked slot {} ({} places left)",
            user_id, slot_id, slot.available
        );
        Ok(BookingReceipt {
            booking: booking.into(),
            slot,
        })
    }

    async fn cancel_booking(&self, user_id: i64, slot_id: i64) -> GymResult<Slot> {
        let mut tx = self.begin().await?;
        let mut slot = self.lock_slot(&mut tx, slot_id).await?;

        let removed = sqlx::query(
            r#"
            DELETE FROM bookings
            WHERE user_id = $1 AND slot_id = $2
            "#,
        )
        .bind(user_id)
        .bind(slot_id)
        .execute(&mut *tx)
        .await
        .map_err(storage)?
        .rows_affected();

        if removed == 0 {
            return Err(GymError::BookingNotFound { user_id, slot_id });
        }

        slot.release();
        Self::store_available(&mut tx, &slot).await?;
        tx.commit().await.map_err(storage)?;

        info!("User {} cancelled booking on slot {}", user_id, slot_id);
        Ok(slot)
    }

    async fn delete_slot(&self, slot_id: i64) -> GymResult<u64> {
        let mut tx = self.begin().await?;
        self.lock_slot(&mut tx, slot_id).await?;

        let removed = sqlx::query(
            r#"
            DELETE FROM bookings
            WHERE slot_id = $1
            "#,
        )
        .bind(slot_id)
        .execute(&mut *tx)
        .await
        .map_err(storage)?
        .rows_affected();

        sqlx::query(
            r#"
            DELETE FROM slots
            WHERE id = $1
            "#,
        )
        .bind(slot_id)
        .execute(&mut *tx)
        .await
        .map_err(storage)?;

        tx.commit().await.map_err(storage)?;

        info!("Deleted slot {} and {} bookings", slot_id, removed);
        Ok(removed)
    }

    async fn bookings_for_user(&self, user_id: i64) -> GymResult<Vec<BookingDetail>> {
        let bookings = sqlx::query_as::<_, DbBookingDetail>(
            r#"
            SELECT b.id, b.slot_id, s.date, s.start_time, s.end_time, b.booked_at
            FROM bookings b
            JOIN slots s ON s.id = b.slot_id
            WHERE b.user_id = $1
            ORDER BY s.date ASC, s.start_time ASC
            "#,
        )
        .bind(user_id)
        .fetch_all(&self.pool)
        .await
        .map_err(storage)?;

        Ok(bookings.into_iter().map(BookingDetail::from).collect())
    }
}
