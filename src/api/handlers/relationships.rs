use axum::{
    extract::{Extension, Path, State},
    Json,
};
use serde::Serialize;
use uuid::Uuid;

use crate::{
    api::{middleware::auth::CurrentUser, state::AppState},
    domain::{Kinship, Relationship, UpsertRelationshipRequest},
    error::Result,
};

#[derive(Debug, Serialize)]
pub struct RelationshipDto {
    id: Uuid,
    family_id: Uuid,
    from_member_id: Uuid,
    to_member_id: Uuid,
    kinship: Kinship,
    kinship_label: Option<String>,
    description: Option<String>,
}

impl From<Relationship> for RelationshipDto {
    fn from(relationship: Relationship) -> Self {
        Self {
            id: relationship.id,
            family_id: relationship.family_id,
            from_member_id: relationship.from_member_id,
            to_member_id: relationship.to_member_id,
            kinship: relationship.kinship,
            kinship_label: relationship.kinship_label,
            description: relationship.description,
        }
    }
}

pub async fn upsert(
    State(state): State<AppState>,
    Extension(current): Extension<CurrentUser>,
    Path((family_id, from_member_id)): Path<(Uuid, Uuid)>,
    Json(request): Json<UpsertRelationshipRequest>,
) -> Result<Json<RelationshipDto>> {
    let relationship = state
        .service_context
        .relationship_service
        .upsert(family_id, current.user.id, from_member_id, request)
        .await?;

    Ok(Json(relationship.into()))
}

pub async fn list_from(
    State(state): State<AppState>,
    Extension(current): Extension<CurrentUser>,
    Path((family_id, from_member_id)): Path<(Uuid, Uuid)>,
) -> Result<Json<Vec<RelationshipDto>>> {
    let relationships = state
        .service_context
        .relationship_service
        .list_from(family_id, current.user.id, from_member_id)
        .await?;

    Ok(Json(relationships.into_iter().map(Into::into).collect()))
}

pub async fn get(
    State(state): State<AppState>,
    Extension(current): Extension<CurrentUser>,
    Path((family_id, from_member_id, to_member_id)): Path<(Uuid, Uuid, Uuid)>,
) -> Result<Json<RelationshipDto>> {
    let relationship = state
        .service_context
        .relationship_service
        .find(family_id, current.user.id, from_member_id, to_member_id)
        .await?;

    Ok(Json(relationship.into()))
}
