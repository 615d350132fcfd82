use std::collections::HashMap;
use std::sync::Arc;

use uuid::Uuid;

use crate::{
    domain::*,
    error::{AppError, Result},
    policy,
    repository::{FamilyRepository, MemberRepository, RelationshipRepository},
    service::{require_active_membership, sort_members_by_birth_date},
};

/// Composes the member registry and the relationship graph into a
/// center-rooted, one-hop view. No caching: rebuilt in full on every call.
pub struct FamilyTreeService {
    family_repo: Arc<dyn FamilyRepository>,
    member_repo: Arc<dyn MemberRepository>,
    relationship_repo: Arc<dyn RelationshipRepository>,
}

impl FamilyTreeService {
    pub fn new(
        family_repo: Arc<dyn FamilyRepository>,
        member_repo: Arc<dyn MemberRepository>,
        relationship_repo: Arc<dyn RelationshipRepository>,
    ) -> Self {
        Self {
            family_repo,
            member_repo,
            relationship_repo,
        }
    }

    pub async fn build_tree(
        &self,
        family_id: Uuid,
        center_member_id: Uuid,
        viewer_user_id: Uuid,
    ) -> Result<FamilyTree> {
        self.family_repo
            .find_by_id(family_id)
            .await?
            .ok_or_else(|| AppError::NotFound("Family not found".to_string()))?;

        let viewer =
            require_active_membership(self.member_repo.as_ref(), family_id, viewer_user_id).await?;
        let view_hidden = policy::can_view_hidden_members(viewer.role);

        let mut members = self.member_repo.list_by_family(family_id).await?;
        if !view_hidden {
            members.retain(|m| m.is_active());
        }

        let center_idx = members
            .iter()
            .position(|m| m.id == center_member_id)
            .ok_or_else(|| AppError::NotFound("Member not found".to_string()))?;
        let center = members.remove(center_idx);

        sort_members_by_birth_date(&mut members);

        // One-hop annotation: only edges declared from the center matter.
        // Members without a direct edge stay in the tree unannotated.
        let edges = self.relationship_repo.list_by_family(family_id).await?;
        let from_center: HashMap<Uuid, &Relationship> = edges
            .iter()
            .filter(|e| e.from_member_id == center.id)
            .map(|e| (e.to_member_id, e))
            .collect();

        let members = members
            .into_iter()
            .map(|member| {
                let edge = from_center.get(&member.id);
                TreeMember {
                    kinship: edge.map(|e| e.kinship),
                    kinship_label: edge.and_then(|e| e.kinship_label.clone()),
                    member,
                }
            })
            .collect();

        Ok(FamilyTree {
            family_id,
            center,
            members,
        })
    }
}
