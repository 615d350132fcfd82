use axum::{
    extract::{Extension, Path, State},
    http::StatusCode,
    Json,
};
use serde::Serialize;
use uuid::Uuid;

use crate::{
    api::{middleware::auth::CurrentUser, state::AppState},
    domain::{CreateFamilyRequest, Family, UpdateFamilyRequest},
    error::Result,
};

#[derive(Debug, Serialize)]
pub struct FamilyDto {
    id: Uuid,
    name: String,
    description: Option<String>,
    profile_image: Option<String>,
    created_at: String,
}

impl From<Family> for FamilyDto {
    fn from(family: Family) -> Self {
        Self {
            id: family.id,
            name: family.name,
            description: family.description,
            profile_image: family.profile_image,
            created_at: family.created_at.to_rfc3339(),
        }
    }
}

pub async fn create(
    State(state): State<AppState>,
    Extension(current): Extension<CurrentUser>,
    Json(request): Json<CreateFamilyRequest>,
) -> Result<(StatusCode, Json<FamilyDto>)> {
    let family = state
        .service_context
        .family_service
        .create_family(&current.user, request)
        .await?;

    Ok((StatusCode::CREATED, Json(family.into())))
}

pub async fn list(
    State(state): State<AppState>,
    Extension(current): Extension<CurrentUser>,
) -> Result<Json<Vec<FamilyDto>>> {
    let families = state
        .service_context
        .family_service
        .list_families_for_user(current.user.id)
        .await?;

    Ok(Json(families.into_iter().map(Into::into).collect()))
}

pub async fn get(
    State(state): State<AppState>,
    Extension(current): Extension<CurrentUser>,
    Path(family_id): Path<Uuid>,
) -> Result<Json<FamilyDto>> {
    let family = state
        .service_context
        .family_service
        .get_family(family_id, current.user.id)
        .await?;

    Ok(Json(family.into()))
}

pub async fn update(
    State(state): State<AppState>,
    Extension(current): Extension<CurrentUser>,
    Path(family_id): Path<Uuid>,
    Json(request): Json<UpdateFamilyRequest>,
) -> Result<Json<FamilyDto>> {
    let family = state
        .service_context
        .family_service
        .update_family(family_id, current.user.id, request)
        .await?;

    Ok(Json(family.into()))
}
