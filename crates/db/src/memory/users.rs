use std::collections::BTreeMap;
use std::sync::atomic::{AtomicI64, Ordering};

use async_trait::async_trait;
use chrono::Utc;
use gymbook_core::{
    errors::{GymError, GymResult},
    models::user::{NewUser, User},
    store::UserDirectory,
};
use tokio::sync::RwLock;
use tracing::debug;

use crate::password::{hash_password, verify_password};

pub struct MemoryUserDirectory {
    users: RwLock<BTreeMap<i64, User>>,
    next_id: AtomicI64,
}

impl MemoryUserDirectory {
    pub fn new() -> Self {
        Self {
            users: RwLock::new(BTreeMap::new()),
            next_id: AtomicI64::new(1),
        }
    }
}

impl MemoryUserDirectory {
    /// Fails with `Validation` for an id nobody registered, the error the
    /// Postgres foreign key produces.
    pub(crate) async fn require(&self, user_id: i64) -> GymResult<()> {
        if self.users.read().await.contains_key(&user_id) {
            Ok(())
        } else {
            Err(GymError::Validation(format!("Unknown user {}", user_id)))
        }
    }
}

impl Default for MemoryUserDirectory {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl UserDirectory for MemoryUserDirectory {
    async fn register(&self, new_user: NewUser) -> GymResult<User> {
        new_user.validate()?;
        // Hash before taking the lock; Argon2 is deliberately slow.
        let password_hash = hash_password(&new_user.password)?;
        let username = new_user.username.trim().to_string();

        let mut users = self.users.write().await;
        if users.values().any(|user| user.username == username) {
            return Err(GymError::Conflict("Username already taken".to_string()));
        }

        let id = self.next_id.fetch_add(1, Ordering::Relaxed);
        let user = User {
            id,
            username,
            email: new_user.email,
            password_hash,
            is_staff: false,
            created_at: Utc::now(),
        };
        users.insert(id, user.clone());

        debug!("Registered user: id={}, username={}", user.id, user.username);
        Ok(user)
    }

    async fn authenticate(&self, username: &str, password: &str) -> GymResult<User> {
        let user = self
            .users
            .read()
            .await
            .values()
            .find(|user| user.username == username)
            .cloned()
            .ok_or(GymError::InvalidCredentials)?;

        if verify_password(password, &user.password_hash)? {
            Ok(user)
        } else {
            Err(GymError::InvalidCredentials)
        }
    }

    async fn get_user(&self, user_id: i64) -> GymResult<Option<User>> {
        Ok(self.users.read().await.get(&user_id).cloned())
    }

    async fn set_staff(&self, user_id: i64, is_staff: bool) -> GymResult<User> {
        let mut users = self.users.write().await;
        let user = users
            .get_mut(&user_id)
            .ok_or_else(|| GymError::Validation(format!("Unknown user {}", user_id)))?;
        user.is_staff = is_staff;

        Ok(user.clone())
    }
}
