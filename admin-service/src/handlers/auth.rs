use axum::{extract::State, http::StatusCode, response::IntoResponse, Json};
use service_core::error::AppError;

use crate::{
    dtos::auth::{AccessResponse, LoginRequest, RefreshRequest, RegisterRequest, RegisterResponse},
    utils::ValidatedJson,
    AppState,
};

/// Register a new account.
pub async fn register(
    State(state): State<AppState>,
    ValidatedJson(req): ValidatedJson<RegisterRequest>,
) -> Result<impl IntoResponse, AppError> {
    let account = state.auth_service.register(req).await?;

    Ok((
        StatusCode::OK,
        Json(RegisterResponse {
            user_id: account.id,
            message: "Registration successful.".to_string(),
        }),
    ))
}

/// Login with email and password; returns a refresh/access token pair.
pub async fn login(
    State(state): State<AppState>,
    ValidatedJson(req): ValidatedJson<LoginRequest>,
) -> Result<impl IntoResponse, AppError> {
    let account = state.auth_service.login(req).await?;
    let tokens = state.jwt.issue_pair(&account)?;

    Ok((StatusCode::OK, Json(tokens)))
}

/// Mint a new access token from a refresh token.
pub async fn refresh(
    State(state): State<AppState>,
    Json(req): Json<RefreshRequest>,
) -> Result<impl IntoResponse, AppError> {
    let access = state
        .jwt
        .refresh_access_token(&req.refresh)
        .map_err(AppError::AuthError)?;

    Ok((StatusCode::OK, Json(AccessResponse { access })))
}
