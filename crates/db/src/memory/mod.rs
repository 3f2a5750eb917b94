//! # In-memory backend
//!
//! Keeps every slot behind its own `tokio::sync::Mutex`, with the slot's
//! booking ledger stored inside the same mutex. Holding that one lock is
//! therefore enough to make the capacity check, the ledger insert and the
//! decrement a single atomic step, and bookings on different slots never
//! contend.
//!
//! Used when no `DATABASE_URL` is configured and throughout the test suites.

mod classes;
mod slots;
mod table;
mod users;

pub use classes::MemoryClassStore;
pub use slots::MemorySlotStore;
pub use users::MemoryUserDirectory;
