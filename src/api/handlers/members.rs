use axum::{
    extract::{Extension, Path, State},
    http::StatusCode,
    Json,
};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{
    api::{middleware::auth::CurrentUser, state::AppState},
    domain::{
        BirthCalendar, CreateManualMemberRequest, Kinship, Member, MemberRole, MemberStatus,
        UpdateMemberInfoRequest,
    },
    error::Result,
};

#[derive(Debug, Serialize)]
pub struct MemberDto {
    id: Uuid,
    family_id: Uuid,
    user_id: Option<Uuid>,
    name: String,
    profile_image: Option<String>,
    birth_date: Option<String>,
    birth_calendar: BirthCalendar,
    country: Option<String>,
    kinship: Kinship,
    kinship_label: Option<String>,
    role: MemberRole,
    status: MemberStatus,
}

impl From<Member> for MemberDto {
    fn from(member: Member) -> Self {
        Self {
            id: member.id,
            family_id: member.family_id,
            user_id: member.user_id,
            name: member.name,
            profile_image: member.profile_image,
            birth_date: member.birth_date.map(|d| d.to_string()),
            birth_calendar: member.birth_calendar,
            country: member.country,
            kinship: member.kinship,
            kinship_label: member.kinship_label,
            role: member.role,
            status: member.status,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct ListResponse {
    members: Vec<MemberDto>,
    total: usize,
}

#[derive(Debug, Deserialize)]
pub struct ChangeRoleDto {
    pub role: MemberRole,
}

#[derive(Debug, Deserialize)]
pub struct ChangeStatusDto {
    pub status: MemberStatus,
}

pub async fn list(
    State(state): State<AppState>,
    Extension(current): Extension<CurrentUser>,
    Path(family_id): Path<Uuid>,
) -> Result<Json<ListResponse>> {
    let members = state
        .service_context
        .member_service
        .list_members(family_id, current.user.id)
        .await?;

    let total = members.len();
    let members: Vec<MemberDto> = members.into_iter().map(Into::into).collect();

    Ok(Json(ListResponse { members, total }))
}

pub async fn get(
    State(state): State<AppState>,
    Extension(current): Extension<CurrentUser>,
    Path((family_id, member_id)): Path<(Uuid, Uuid)>,
) -> Result<Json<MemberDto>> {
    let member = state
        .service_context
        .member_service
        .get_member(family_id, member_id, current.user.id)
        .await?;

    Ok(Json(member.into()))
}

pub async fn register_manual(
    State(state): State<AppState>,
    Extension(current): Extension<CurrentUser>,
    Path(family_id): Path<Uuid>,
    Json(request): Json<CreateManualMemberRequest>,
) -> Result<(StatusCode, Json<MemberDto>)> {
    let member = state
        .service_context
        .member_service
        .register_manual(family_id, current.user.id, request)
        .await?;

    Ok((StatusCode::CREATED, Json(member.into())))
}

pub async fn change_role(
    State(state): State<AppState>,
    Extension(current): Extension<CurrentUser>,
    Path((family_id, member_id)): Path<(Uuid, Uuid)>,
    Json(dto): Json<ChangeRoleDto>,
) -> Result<Json<MemberDto>> {
    let member = state
        .service_context
        .member_service
        .change_role(family_id, member_id, dto.role, current.user.id)
        .await?;

    Ok(Json(member.into()))
}

pub async fn change_status(
    State(state): State<AppState>,
    Extension(current): Extension<CurrentUser>,
    Path((family_id, member_id)): Path<(Uuid, Uuid)>,
    Json(dto): Json<ChangeStatusDto>,
) -> Result<Json<MemberDto>> {
    let member = state
        .service_context
        .member_service
        .change_status(family_id, member_id, dto.status, current.user.id)
        .await?;

    Ok(Json(member.into()))
}

pub async fn update_info(
    State(state): State<AppState>,
    Extension(current): Extension<CurrentUser>,
    Path((family_id, member_id)): Path<(Uuid, Uuid)>,
    Json(request): Json<UpdateMemberInfoRequest>,
) -> Result<Json<MemberDto>> {
    let member = state
        .service_context
        .member_service
        .update_info(family_id, member_id, request, current.user.id)
        .await?;

    Ok(Json(member.into()))
}
