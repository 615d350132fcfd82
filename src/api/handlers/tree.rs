use axum::{
    extract::{Extension, Path, State},
    Json,
};
use serde::Serialize;
use uuid::Uuid;

use crate::{
    api::{
        handlers::members::MemberDto,
        middleware::auth::CurrentUser,
        state::AppState,
    },
    domain::{FamilyTree, Kinship, TreeMember},
    error::Result,
};

#[derive(Debug, Serialize)]
pub struct FamilyTreeDto {
    family_id: Uuid,
    center: MemberDto,
    members: Vec<TreeMemberDto>,
}

#[derive(Debug, Serialize)]
pub struct TreeMemberDto {
    #[serde(flatten)]
    member: MemberDto,
    kinship: Option<Kinship>,
    kinship_label: Option<String>,
}

impl From<TreeMember> for TreeMemberDto {
    fn from(node: TreeMember) -> Self {
        Self {
            member: node.member.into(),
            kinship: node.kinship,
            kinship_label: node.kinship_label,
        }
    }
}

impl From<FamilyTree> for FamilyTreeDto {
    fn from(tree: FamilyTree) -> Self {
        Self {
            family_id: tree.family_id,
            center: tree.center.into(),
            members: tree.members.into_iter().map(Into::into).collect(),
        }
    }
}

pub async fn get(
    State(state): State<AppState>,
    Extension(current): Extension<CurrentUser>,
    Path((family_id, member_id)): Path<(Uuid, Uuid)>,
) -> Result<Json<FamilyTreeDto>> {
    let tree = state
        .service_context
        .family_tree_service
        .build_tree(family_id, member_id, current.user.id)
        .await?;

    Ok(Json(tree.into()))
}
