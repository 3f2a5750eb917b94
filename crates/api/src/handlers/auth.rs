use std::sync::Arc;

use axum::{Json, extract::State};
use gymbook_core::models::user::{
    LoginRequest, LoginResponse, LogoutResponse, NewUser, RegisterRequest, RegisterResponse,
};
use tracing::info;

use crate::{
    ApiState,
    extract::AppJson,
    middleware::{auth::AuthUser, error_handling::AppError},
};

#[axum::debug_handler(state = Arc<ApiState>)]
pub async fn register(
    State(state): State<Arc<ApiState>>,
    AppJson(payload): AppJson<RegisterRequest>,
) -> Result<Json<RegisterResponse>, AppError> {
    let user = state.stores.users.register(NewUser::from(payload)).await?;

    info!("Registered user {} ({})", user.username, user.id);
    Ok(Json(RegisterResponse {
        success: true,
        user_id: user.id,
    }))
}

#[axum::debug_handler(state = Arc<ApiState>)]
pub async fn login(
    State(state): State<Arc<ApiState>>,
    AppJson(payload): AppJson<LoginRequest>,
) -> Result<Json<LoginResponse>, AppError> {
    let user = state
        .stores
        .users
        .authenticate(&payload.username, &payload.password)
        .await?;
    let token = state.sessions.create(user.id).await;

    info!("User {} logged in", user.username);
    Ok(Json(LoginResponse {
        success: true,
        user_id: user.id,
        username: user.username,
        token: token.to_string(),
    }))
}

#[axum::debug_handler(state = Arc<ApiState>)]
pub async fn logout(
    State(state): State<Arc<ApiState>>,
    user: AuthUser,
) -> Json<LogoutResponse> {
    state.sessions.revoke(&user.token).await;

    info!("User {} logged out", user.username);
    Json(LogoutResponse { success: true })
}
