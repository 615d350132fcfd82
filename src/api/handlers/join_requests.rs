use axum::{
    extract::{Extension, Path, State},
    http::StatusCode,
    Json,
};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{
    api::{middleware::auth::CurrentUser, state::AppState},
    domain::{JoinDecision, JoinRequest, JoinRequestStatus},
    error::Result,
};

#[derive(Debug, Serialize)]
pub struct JoinRequestDto {
    id: Uuid,
    family_id: Uuid,
    requester_id: Uuid,
    status: JoinRequestStatus,
    created_at: String,
    reviewed_at: Option<String>,
}

impl From<JoinRequest> for JoinRequestDto {
    fn from(request: JoinRequest) -> Self {
        Self {
            id: request.id,
            family_id: request.family_id,
            requester_id: request.requester_id,
            status: request.status,
            created_at: request.created_at.to_rfc3339(),
            reviewed_at: request.reviewed_at.map(|dt| dt.to_rfc3339()),
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct ProcessDto {
    pub decision: JoinDecision,
}

pub async fn submit(
    State(state): State<AppState>,
    Extension(current): Extension<CurrentUser>,
    Path(family_id): Path<Uuid>,
) -> Result<(StatusCode, Json<JoinRequestDto>)> {
    let request = state
        .service_context
        .join_request_service
        .submit(family_id, current.user.id)
        .await?;

    Ok((StatusCode::CREATED, Json(request.into())))
}

pub async fn list(
    State(state): State<AppState>,
    Extension(current): Extension<CurrentUser>,
    Path(family_id): Path<Uuid>,
) -> Result<Json<Vec<JoinRequestDto>>> {
    let requests = state
        .service_context
        .join_request_service
        .list_by_family(family_id, current.user.id)
        .await?;

    Ok(Json(requests.into_iter().map(Into::into).collect()))
}

pub async fn process(
    State(state): State<AppState>,
    Extension(current): Extension<CurrentUser>,
    Path((family_id, request_id)): Path<(Uuid, Uuid)>,
    Json(dto): Json<ProcessDto>,
) -> Result<Json<JoinRequestDto>> {
    let request = state
        .service_context
        .join_request_service
        .process(family_id, request_id, dto.decision, current.user.id)
        .await?;

    Ok(Json(request.into()))
}
