//! Startup steps shared by the server binaries.

use std::env;
use std::time::Duration;

use chrono::Utc;
use color_eyre::eyre::Result;
use gymbook_db::{Stores, seed};
use rand::{SeedableRng, rngs::StdRng};
use tracing::{Level, info};
use tracing_subscriber::FmtSubscriber;

pub fn init_tracing(level: Level) -> Result<()> {
    let subscriber = FmtSubscriber::builder().with_max_level(level).finish();
    tracing::subscriber::set_global_default(subscriber)?;
    Ok(())
}

/// Connects the configured backend. An in-memory backend starts empty, so
/// it is seeded with the demo timetable; Postgres is left to `seed-slots`.
/// `ADMIN_USERNAME`/`ADMIN_PASSWORD`, when both set, provision a staff
/// account either way.
pub async fn prepare_stores(database_url: Option<&str>, lock_timeout: Duration) -> Result<Stores> {
    let stores = Stores::connect(database_url, lock_timeout).await?;

    if database_url.is_none() {
        let today = Utc::now().date_naive();
        seed::seed_all(&stores, today, &mut StdRng::from_entropy()).await?;
    }

    if let (Ok(username), Ok(password)) = (env::var("ADMIN_USERNAME"), env::var("ADMIN_PASSWORD")) {
        let admin = seed::ensure_staff_user(&stores, &username, &password).await?;
        info!("Staff account {} is ready", admin.username);
    }

    Ok(stores)
}
