use axum::{extract::State, http::StatusCode, response::IntoResponse, Json};
use service_core::error::AppError;

use crate::{
    dtos::org::{CreateOrganizationRequest, LinkedPairResponse},
    AppState,
};

/// Create an organization and its primary person as a mutually-referential
/// pair.
pub async fn create_organization(
    State(state): State<AppState>,
    Json(req): Json<CreateOrganizationRequest>,
) -> Result<impl IntoResponse, AppError> {
    let (organization, person) = state.org_service.create_linked(req).await?;

    Ok((
        StatusCode::CREATED,
        Json(LinkedPairResponse {
            organization: organization.into(),
            person: person.into(),
        }),
    ))
}
