use async_trait::async_trait;
use chrono::Utc;
use gymbook_core::{
    errors::{GymError, GymResult},
    models::user::{NewUser, User},
    store::UserDirectory,
};
use tracing::debug;

use super::{is_unique_violation, storage};
use crate::DbPool;
use crate::models::DbUser;
use crate::password::{hash_password, verify_password};

pub struct PgUserDirectory {
    pool: DbPool,
}

impl PgUserDirectory {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }

    async fn find_by_username(&self, username: &str) -> GymResult<Option<User>> {
        let user = sqlx::query_as::<_, DbUser>(
            r#"
            SELECT id, username, email, password_hash, is_staff, created_at
            FROM users
            WHERE username = $1
            "#,
        )
        .bind(username)
        .fetch_optional(&self.pool)
        .await
        .map_err(storage)?;

        Ok(user.map(User::from))
    }
}

#[async_trait]
impl UserDirectory for PgUserDirectory {
    async fn register(&self, new_user: NewUser) -> GymResult<User> {
        new_user.validate()?;
        let password_hash = hash_password(&new_user.password)?;

        let user = sqlx::query_as::<_, DbUser>(
            r#"
            INSERT INTO users (username, email, password_hash, is_staff, created_at)
            VALUES ($1, $2, $3, FALSE, $4)
            RETURNING id, username, email, password_hash, is_staff, created_at
            "#,
        )
        .bind(new_user.username.trim())
        .bind(&new_user.email)
        .bind(&password_hash)
        .bind(Utc::now())
        .fetch_one(&self.pool)
        .await
        .map_err(|e| {
            if is_unique_violation(&e) {
                GymError::Conflict("Username already taken".to_string())
            } else {
                storage(e)
            }
        })?;

        debug!("Registered user: id={}, username={}", user.id, user.username);
        Ok(user.into())
    }

    async fn authenticate(&self, username: &str, password: &str) -> GymResult<User> {
        let user = self
            .find_by_username(username)
            .await?
            .ok_or(GymError::InvalidCredentials)?;

        if verify_password(password, &user.password_hash)? {
            Ok(user)
        } else {
            Err(GymError::InvalidCredentials)
        }
    }

    async fn get_user(&self, user_id: i64) -> GymResult<Option<User>> {
        let user = sqlx::query_as::<_, DbUser>(
            r#"
            SELECT id, username, email, password_hash, is_staff, created_at
            FROM users
            WHERE id = $1
            "#,
        )
        .bind(user_id)
        .fetch_optional(&self.pool)
        .await
        .map_err(storage)?;

        Ok(user.map(User::from))
    }

    async fn set_staff(&self, user_id: i64, is_staff: bool) -> GymResult<User> {
        let user = sqlx::query_as::<_, DbUser>(
            r#"
            UPDATE users
            SET is_staff = $2
            WHERE id = $1
            RETURNING id, username, email, password_hash, is_staff, created_at
            "#,
        )
        .bind(user_id)
        .bind(is_staff)
        .fetch_optional(&self.pool)
        .await
        .map_err(storage)?
        .ok_or_else(|| GymError::Validation(format!("Unknown user {}", user_id)))?;

        Ok(user.into())
    }
}
