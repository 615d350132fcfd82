use std::sync::Arc;

use chrono::Utc;
use uuid::Uuid;

use crate::{
    domain::*,
    error::{AppError, Result},
    repository::{MemberRepository, RelationshipRepository},
    service::{normalize_kinship_label, require_active_membership},
};

pub struct RelationshipService {
    member_repo: Arc<dyn MemberRepository>,
    relationship_repo: Arc<dyn RelationshipRepository>,
}

impl RelationshipService {
    pub fn new(
        member_repo: Arc<dyn MemberRepository>,
        relationship_repo: Arc<dyn RelationshipRepository>,
    ) -> Self {
        Self {
            member_repo,
            relationship_repo,
        }
    }

    /// Both endpoints must resolve and belong to the edge's family; a
    /// relationship never crosses family boundaries.
    async fn resolve_endpoint(&self, family_id: Uuid, member_id: Uuid) -> Result<Member> {
        let member = self
            .member_repo
            .find_by_id(member_id)
            .await?
            .ok_or_else(|| AppError::NotFound("Member not found".to_string()))?;

        if member.family_id != family_id {
            return Err(AppError::MemberNotInFamily);
        }

        Ok(member)
    }

    /// Declares (or re-declares) a directed edge. Any ACTIVE family member
    /// may do this; declaring the same (from, to) pair again updates the
    /// existing edge in place. No inverse edge is created.
    pub async fn upsert(
        &self,
        family_id: Uuid,
        actor_user_id: Uuid,
        from_member_id: Uuid,
        request: UpsertRelationshipRequest,
    ) -> Result<Relationship> {
        require_active_membership(self.member_repo.as_ref(), family_id, actor_user_id).await?;

        self.resolve_endpoint(family_id, from_member_id).await?;
        self.resolve_endpoint(family_id, request.to_member_id).await?;

        if from_member_id == request.to_member_id {
            return Err(AppError::BadRequest(
                "A member cannot have a relationship with themselves".to_string(),
            ));
        }

        let kinship_label = normalize_kinship_label(request.kinship, request.kinship_label)?;
        let now = Utc::now();

        let relationship = Relationship {
            id: Uuid::new_v4(),
            family_id,
            from_member_id,
            to_member_id: request.to_member_id,
            kinship: request.kinship,
            kinship_label,
            description: request.description,
            created_by: actor_user_id,
            created_at: now,
            modified_by: actor_user_id,
            modified_at: now,
        };

        self.relationship_repo.upsert(&relationship).await
    }

    pub async fn find(
        &self,
        family_id: Uuid,
        viewer_user_id: Uuid,
        from_member_id: Uuid,
        to_member_id: Uuid,
    ) -> Result<Relationship> {
        require_active_membership(self.member_repo.as_ref(), family_id, viewer_user_id).await?;

        self.relationship_repo
            .find(family_id, from_member_id, to_member_id)
            .await?
            .ok_or_else(|| AppError::NotFound("Relationship not found".to_string()))
    }

    pub async fn list_from(
        &self,
        family_id: Uuid,
        viewer_user_id: Uuid,
        from_member_id: Uuid,
    ) -> Result<Vec<Relationship>> {
        require_active_membership(self.member_repo.as_ref(), family_id, viewer_user_id).await?;

        self.resolve_endpoint(family_id, from_member_id).await?;

        self.relationship_repo
            .list_from(family_id, from_member_id)
            .await
    }
}
