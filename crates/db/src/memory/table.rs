use std::collections::BTreeMap;
use std::sync::Arc;
use std::sync::atomic::{AtomicI64, Ordering};
use std::time::Duration;

use chrono::{DateTime, Utc};
use gymbook_core::{
    capacity::Capacity,
    errors::{GymError, GymResult},
};
use tokio::sync::{Mutex, OwnedMutexGuard, RwLock};

#[derive(Debug, Clone, Copy)]
pub(crate) struct LedgerRow {
    pub id: i64,
    pub booked_at: DateTime<Utc>,
}

pub(crate) struct SlotEntry<S> {
    pub slot: S,
    /// Keyed by user id, so a user can appear at most once.
    pub bookings: BTreeMap<i64, LedgerRow>,
    deleted: bool,
}

struct Row<S> {
    /// Copy of the slot as created. Only `available` ever changes after
    /// creation, so this is safe to read without the slot lock for
    /// uniqueness and overlap checks.
    header: S,
    entry: Arc<Mutex<SlotEntry<S>>>,
}

/// A set of lockable slots plus their booking ledgers.
pub(crate) struct SlotTable<S> {
    rows: RwLock<BTreeMap<i64, Row<S>>>,
    next_slot_id: AtomicI64,
    next_booking_id: AtomicI64,
    lock_timeout: Duration,
}

impl<S> SlotTable<S>
where
    S: Capacity + Clone + Send + Sync + 'static,
{
    pub fn new(lock_timeout: Duration) -> Self {
        Self {
            rows: RwLock::new(BTreeMap::new()),
            next_slot_id: AtomicI64::new(1),
            next_booking_id: AtomicI64::new(1),
            lock_timeout,
        }
    }

    /// Inserts a new slot. `check` sees every existing slot and may veto the
    /// insert; it runs under the table's write lock so checks and inserts
    /// cannot interleave.
    pub async fn insert<C, B>(&self, check: C, build: B) -> GymResult<S>
    where
        C: FnOnce(&[&S]) -> GymResult<()>,
        B: FnOnce(i64) -> S,
    {
        let mut rows = self.rows.write().await;

        let existing: Vec<&S> = rows.values().map(|row| &row.header).collect();
        check(&existing)?;

        let id = self.next_slot_id.fetch_add(1, Ordering::Relaxed);
        let slot = build(id);
        rows.insert(
            id,
            Row {
                header: slot.clone(),
                entry: Arc::new(Mutex::new(SlotEntry {
                    slot: slot.clone(),
                    bookings: BTreeMap::new(),
                    deleted: false,
                })),
            },
        );

        Ok(slot)
    }

    /// Acquires the exclusive lock for one slot, waiting at most the
    /// configured timeout.
    pub(super) async fn lock(&self, slot_id: i64) -> GymResult<OwnedMutexGuard<SlotEntry<S>>> {
        let entry = self
            .rows
            .read()
            .await
            .get(&slot_id)
            .map(|row| Arc::clone(&row.entry))
            .ok_or(GymError::SlotNotFound(slot_id))?;

        let guard = tokio::time::timeout(self.lock_timeout, entry.lock_owned())
            .await
            .map_err(|_| GymError::LockTimeout {
                slot_id,
                timeout: self.lock_timeout,
            })?;

        // The slot may have been deleted while we queued for its lock.
        if guard.deleted {
            return Err(GymError::SlotNotFound(slot_id));
        }

        Ok(guard)
    }

    pub async fn get(&self, slot_id: i64) -> GymResult<S> {
        let entry = self.lock(slot_id).await?;
        Ok(entry.slot.clone())
    }

    pub async fn book(&self, user_id: i64, slot_id: i64) -> GymResult<(LedgerRow, S)> {
        let mut entry = self.lock(slot_id).await?;

        let already_booked = entry.bookings.contains_key(&user_id);
        entry.slot.reserve(user_id, already_booked)?;

        let row = LedgerRow {
            id: self.next_booking_id.fetch_add(1, Ordering::Relaxed),
            booked_at: Utc::now(),
        };
        entry.bookings.insert(user_id, row);

        Ok((row, entry.slot.clone()))
    }

    pub async fn cancel(&self, user_id: i64, slot_id: i64) -> GymResult<S> {
        let mut entry = self.lock(slot_id).await?;

        if entry.bookings.remove(&user_id).is_none() {
            return Err(GymError::BookingNotFound { user_id, slot_id });
        }
        entry.slot.release();

        Ok(entry.slot.clone())
    }

    /// Removes the slot and its whole ledger. Readers either see both or
    /// neither: the entry is marked deleted under its own lock before it is
    /// unlinked from the table.
    pub async fn delete(&self, slot_id: i64) -> GymResult<u64> {
        let mut entry = self.lock(slot_id).await?;

        entry.deleted = true;
        let removed = entry.bookings.len() as u64;
        entry.bookings.clear();

        self.rows.write().await.remove(&slot_id);

        Ok(removed)
    }

    async fn entries(&self) -> Vec<Arc<Mutex<SlotEntry<S>>>> {
        self.rows
            .read()
            .await
            .values()
            .map(|row| Arc::clone(&row.entry))
            .collect()
    }

    /// Current state of every live slot, in id order.
    pub async fn slots(&self) -> Vec<S> {
        let mut slots = Vec::new();
        for entry in self.entries().await {
            let entry = entry.lock().await;
            if !entry.deleted {
                slots.push(entry.slot.clone());
            }
        }
        slots
    }

    /// Every live slot the user holds a booking for, with the ledger row.
    pub async fn bookings_of(&self, user_id: i64) -> Vec<(LedgerRow, S)> {
        let mut bookings = Vec::new();
        for entry in self.entries().await {
            let entry = entry.lock().await;
            if entry.deleted {
                continue;
            }
            if let Some(row) = entry.bookings.get(&user_id) {
                bookings.push((*row, entry.slot.clone()));
            }
        }
        bookings
    }
}
