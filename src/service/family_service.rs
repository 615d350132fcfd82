use std::sync::Arc;

use chrono::Utc;
use uuid::Uuid;

use crate::{
    domain::*,
    error::{AppError, Result},
    policy,
    repository::{FamilyRepository, MemberRepository},
    service::require_active_membership,
};

pub struct FamilyService {
    family_repo: Arc<dyn FamilyRepository>,
    member_repo: Arc<dyn MemberRepository>,
}

impl FamilyService {
    pub fn new(
        family_repo: Arc<dyn FamilyRepository>,
        member_repo: Arc<dyn MemberRepository>,
    ) -> Self {
        Self {
            family_repo,
            member_repo,
        }
    }

    /// Creates a family and its owner member in one atomic unit. The creator
    /// becomes the single OWNER; ownership is never reassigned afterwards.
    pub async fn create_family(&self, creator: &User, request: CreateFamilyRequest) -> Result<Family> {
        let now = Utc::now();

        let family = Family {
            id: Uuid::new_v4(),
            name: request.name,
            description: request.description,
            profile_image: request.profile_image,
            created_by: creator.id,
            created_at: now,
            updated_at: now,
        };

        let owner = Member {
            id: Uuid::new_v4(),
            family_id: family.id,
            user_id: Some(creator.id),
            name: creator.display_name.clone(),
            profile_image: None,
            birth_date: None,
            birth_calendar: BirthCalendar::Solar,
            country: None,
            kinship: Kinship::Me,
            kinship_label: None,
            role: MemberRole::Owner,
            status: MemberStatus::Active,
            created_by: creator.id,
            created_at: now,
            modified_by: creator.id,
            modified_at: now,
        };

        self.family_repo.create_with_owner(&family, &owner).await
    }

    pub async fn get_family(&self, family_id: Uuid, viewer_user_id: Uuid) -> Result<Family> {
        require_active_membership(self.member_repo.as_ref(), family_id, viewer_user_id).await?;

        self.family_repo
            .find_by_id(family_id)
            .await?
            .ok_or_else(|| AppError::NotFound("Family not found".to_string()))
    }

    /// Family-wide settings follow policy rule 6: owner only.
    pub async fn update_family(
        &self,
        family_id: Uuid,
        actor_user_id: Uuid,
        request: UpdateFamilyRequest,
    ) -> Result<Family> {
        self.family_repo
            .find_by_id(family_id)
            .await?
            .ok_or_else(|| AppError::NotFound("Family not found".to_string()))?;

        let actor =
            require_active_membership(self.member_repo.as_ref(), family_id, actor_user_id).await?;
        policy::authorize_family_settings(&actor)?;

        self.family_repo.update(family_id, request).await
    }

    pub async fn list_families_for_user(&self, user_id: Uuid) -> Result<Vec<Family>> {
        self.family_repo.list_for_user(user_id).await
    }
}
