use axum::{extract::State, response::IntoResponse, Json};
use service_core::error::AppError;

use crate::{dtos::auth::UserResponse, middleware::AuthUser, AppState};

/// List all accounts. Requires a bearer access token.
pub async fn list_users(
    State(state): State<AppState>,
    _user: AuthUser,
) -> Result<impl IntoResponse, AppError> {
    let accounts = state.accounts.list_all().await?;

    let users: Vec<UserResponse> = accounts.into_iter().map(UserResponse::from).collect();
    Ok(Json(users))
}
