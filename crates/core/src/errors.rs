use std::time::Duration;

use thiserror::Error;

/// Errors produced by the booking core and the stores behind it.
///
/// Every variant except `Storage` is a recoverable, user-facing outcome.
/// `Storage` is fatal to the single request that hit it, never to the process.
#[derive(Error, Debug)]
pub enum GymError {
    #[error("Slot not found: {0}")]
    SlotNotFound(i64),

    #[error("No booking for user {user_id} on slot {slot_id}")]
    BookingNotFound { user_id: i64, slot_id: i64 },

    #[error("No available space in slot {0}")]
    CapacityExceeded(i64),

    #[error("User {user_id} already has a booking for slot {slot_id}")]
    DuplicateBooking { user_id: i64, slot_id: i64 },

    #[error("Authentication required: {0}")]
    AuthenticationRequired(String),

    #[error("Invalid credentials")]
    InvalidCredentials,

    #[error("Forbidden: {0}")]
    Forbidden(String),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Conflict: {0}")]
    Conflict(String),

    #[error("Trainer {trainer_id} is already scheduled at an overlapping time")]
    TrainerConflict { trainer_id: i64 },

    #[error("Timed out after {timeout:?} waiting for the lock on slot {slot_id}")]
    LockTimeout { slot_id: i64, timeout: Duration },

    #[error("Storage failure: {0}")]
    Storage(#[from] eyre::Report),
}

impl GymError {
    /// Whether the error is a normal business outcome rather than an
    /// infrastructure failure.
    pub fn is_user_facing(&self) -> bool {
        !matches!(self, GymError::Storage(_) | GymError::LockTimeout { .. })
    }

    /// The message shown to clients. Infrastructure detail never leaves the
    /// process; it is logged instead.
    pub fn client_message(&self) -> String {
        match self {
            GymError::SlotNotFound(_) => "Slot not found".to_string(),
            GymError::BookingNotFound { .. } => "Booking not found".to_string(),
            GymError::CapacityExceeded(_) => "No available space in this slot".to_string(),
            GymError::DuplicateBooking { .. } => {
                "You already have a booking for this slot".to_string()
            }
            GymError::AuthenticationRequired(_) => "Authentication required".to_string(),
            GymError::InvalidCredentials => "Invalid credentials".to_string(),
            GymError::Forbidden(message)
            | GymError::Validation(message)
            | GymError::Conflict(message) => message.clone(),
            GymError::TrainerConflict { .. } => {
                "Trainer is already scheduled at an overlapping time".to_string()
            }
            GymError::LockTimeout { .. } => "Slot is busy, please try again".to_string(),
            GymError::Storage(_) => "Internal server error".to_string(),
        }
    }
}

pub type GymResult<T> = Result<T, GymError>;
