pub mod class;
pub mod slot;
pub mod user;

use std::time::Duration;

use gymbook_core::errors::GymError;
use sqlx::{Postgres, Transaction};

/// Postgres SQLSTATE codes the repositories translate into domain errors.
const UNIQUE_VIOLATION: &str = "23505";
const FOREIGN_KEY_VIOLATION: &str = "23503";
const LOCK_NOT_AVAILABLE: &str = "55P03";

pub(crate) fn storage(err: sqlx::Error) -> GymError {
    GymError::Storage(eyre::Report::new(err))
}

fn sqlstate(err: &sqlx::Error) -> Option<String> {
    match err {
        sqlx::Error::Database(db_err) => db_err.code().map(|code| code.into_owned()),
        _ => None,
    }
}

pub(crate) fn is_unique_violation(err: &sqlx::Error) -> bool {
    sqlstate(err).as_deref() == Some(UNIQUE_VIOLATION)
}

pub(crate) fn is_foreign_key_violation(err: &sqlx::Error) -> bool {
    sqlstate(err).as_deref() == Some(FOREIGN_KEY_VIOLATION)
}

/// Maps a failed row-lock acquisition to `LockTimeout`, anything else to
/// `Storage`.
pub(crate) fn lock_error(slot_id: i64, timeout: Duration) -> impl FnOnce(sqlx::Error) -> GymError {
    move |err| {
        if sqlstate(&err).as_deref() == Some(LOCK_NOT_AVAILABLE) {
            GymError::LockTimeout { slot_id, timeout }
        } else {
            storage(err)
        }
    }
}

/// Bounds how long statements in this transaction wait for row locks.
pub(crate) async fn set_lock_timeout(
    tx: &mut Transaction<'_, Postgres>,
    timeout: Duration,
) -> Result<(), GymError> {
    // SET does not accept bind parameters; the value is an integer we own.
    sqlx::query(&format!("SET LOCAL lock_timeout = '{}ms'", timeout.as_millis()))
        .execute(&mut **tx)
        .await
        .map_err(storage)?;
    Ok(())
}
