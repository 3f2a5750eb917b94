pub mod memory;
pub mod models;
pub mod password;
pub mod repositories;
pub mod schema;
pub mod seed;

pub mod mock;

use std::sync::Arc;
use std::time::Duration;

use eyre::Result;
use gymbook_core::store::{ClassStore, SlotStore, UserDirectory};
use sqlx::postgres::PgPoolOptions;
use sqlx::{Pool, Postgres};
use tracing::{info, warn};

pub type DbPool = Pool<Postgres>;

/// Default bound on how long a booking waits for a slot's lock.
pub const DEFAULT_LOCK_TIMEOUT: Duration = Duration::from_millis(5000);

pub async fn create_pool(database_url: &str) -> Result<DbPool> {
    let pool = PgPoolOptions::new()
        .max_connections(5)
        .connect(database_url)
        .await?;

    Ok(pool)
}

/// The three store handles every transport needs, behind trait objects so
/// the backend can be picked at startup.
#[derive(Clone)]
pub struct Stores {
    pub slots: Arc<dyn SlotStore>,
    pub classes: Arc<dyn ClassStore>,
    pub users: Arc<dyn UserDirectory>,
    /// "postgres" or "memory", for diagnostics.
    pub backend: &'static str,
}

impl Stores {
    pub fn postgres(pool: DbPool, lock_timeout: Duration) -> Self {
        Self {
            slots: Arc::new(repositories::slot::PgSlotStore::new(pool.clone(), lock_timeout)),
            classes: Arc::new(repositories::class::PgClassStore::new(pool.clone(), lock_timeout)),
            users: Arc::new(repositories::user::PgUserDirectory::new(pool)),
            backend: "postgres",
        }
    }

    /// The memory stores share one user directory, so booking for an
    /// unregistered id fails just as the Postgres foreign key makes it fail.
    pub fn in_memory(lock_timeout: Duration) -> Self {
        let users = Arc::new(memory::MemoryUserDirectory::new());
        Self {
            slots: Arc::new(memory::MemorySlotStore::with_users(lock_timeout, Arc::clone(&users))),
            classes: Arc::new(memory::MemoryClassStore::with_users(lock_timeout, Arc::clone(&users))),
            users,
            backend: "memory",
        }
    }

    /// Connects to Postgres and prepares the schema when a URL is given,
    /// otherwise falls back to the in-memory backend.
    pub async fn connect(database_url: Option<&str>, lock_timeout: Duration) -> Result<Self> {
        match database_url {
            Some(url) => {
                let pool = create_pool(url).await?;
                schema::initialize_database(&pool).await?;
                info!("Using Postgres storage backend");
                Ok(Self::postgres(pool, lock_timeout))
            }
            None => {
                warn!("DATABASE_URL not set, using in-memory storage; data will not survive a restart");
                Ok(Self::in_memory(lock_timeout))
            }
        }
    }
}
