//! # Authentication Module
//!
//! Session tokens and the extractors that resolve them.
//!
//! `POST /login` issues an opaque UUID token which clients send back as
//! `Authorization: Bearer <token>`. Handlers that need a caller take an
//! [`AuthUser`] (or [`StaffUser`]) argument; the extractor rejects the request
//! before the handler runs if the token is missing, unknown, expired or
//! revoked.

use std::collections::HashMap;
use std::sync::Arc;
use std::time::{Duration, Instant};

use axum::{
    async_trait,
    extract::FromRequestParts,
    http::{header::AUTHORIZATION, request::Parts},
};
use gymbook_core::errors::GymError;
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::{ApiState, middleware::error_handling::AppError};

pub const DEFAULT_SESSION_TTL: Duration = Duration::from_secs(24 * 60 * 60);

#[derive(Debug, Clone, Copy)]
struct SessionEntry {
    user_id: i64,
    expires_at: Instant,
}

impl SessionEntry {
    fn is_live(&self, now: Instant) -> bool {
        now < self.expires_at
    }
}

/// Live sessions, token to user id. Tokens stop resolving once their
/// lifetime has passed; expired entries are pruned whenever a new session
/// starts.
#[derive(Clone)]
pub struct SessionRegistry {
    sessions: Arc<RwLock<HashMap<Uuid, SessionEntry>>>,
    ttl: Duration,
}

impl Default for SessionRegistry {
    fn default() -> Self {
        Self::with_ttl(DEFAULT_SESSION_TTL)
    }
}

impl SessionRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_ttl(ttl: Duration) -> Self {
        Self {
            sessions: Arc::new(RwLock::new(HashMap::new())),
            ttl,
        }
    }

    /// Starts a session for `user_id` and returns its token.
    pub async fn create(&self, user_id: i64) -> Uuid {
        let token = Uuid::new_v4();
        let now = Instant::now();

        let mut sessions = self.sessions.write().await;
        sessions.retain(|_, entry| entry.is_live(now));
        sessions.insert(
            token,
            SessionEntry {
                user_id,
                expires_at: now + self.ttl,
            },
        );
        token
    }

    pub async fn resolve(&self, token: &Uuid) -> Option<i64> {
        let now = Instant::now();
        self.sessions
            .read()
            .await
            .get(token)
            .filter(|entry| entry.is_live(now))
            .map(|entry| entry.user_id)
    }

    /// Number of sessions held, expired ones not yet pruned included.
    pub async fn len(&self) -> usize {
        self.sessions.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.len().await == 0
    }

    /// Returns whether the token was live.
    pub async fn revoke(&self, token: &Uuid) -> bool {
        self.sessions.write().await.remove(token).is_some()
    }
}

/// The authenticated caller of a request.
#[derive(Debug, Clone)]
pub struct AuthUser {
    pub user_id: i64,
    pub username: String,
    pub is_staff: bool,
    pub token: Uuid,
}

fn bearer_token(parts: &Parts) -> Option<Uuid> {
    let header = parts.headers.get(AUTHORIZATION)?.to_str().ok()?;
    let token = header.strip_prefix("Bearer ")?;
    Uuid::parse_str(token.trim()).ok()
}

#[async_trait]
impl FromRequestParts<Arc<ApiState>> for AuthUser {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &Arc<ApiState>,
    ) -> Result<Self, Self::Rejection> {
        let token = bearer_token(parts).ok_or_else(|| {
            GymError::AuthenticationRequired("missing or malformed bearer token".to_string())
        })?;

        let user_id = state.sessions.resolve(&token).await.ok_or_else(|| {
            GymError::AuthenticationRequired("unknown or expired session".to_string())
        })?;

        // The account may have been removed since login.
        let user = state.stores.users.get_user(user_id).await?.ok_or_else(|| {
            GymError::AuthenticationRequired(format!("user {} no longer exists", user_id))
        })?;

        Ok(AuthUser {
            user_id: user.id,
            username: user.username,
            is_staff: user.is_staff,
            token,
        })
    }
}

/// An authenticated caller with the staff flag set.
#[derive(Debug, Clone)]
pub struct StaffUser(pub AuthUser);

#[async_trait]
impl FromRequestParts<Arc<ApiState>> for StaffUser {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &Arc<ApiState>,
    ) -> Result<Self, Self::Rejection> {
        let user = AuthUser::from_request_parts(parts, state).await?;
        if !user.is_staff {
            return Err(AppError(GymError::Forbidden(
                "Staff access required".to_string(),
            )));
        }
        Ok(StaffUser(user))
    }
}
