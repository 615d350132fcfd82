use std::sync::Arc;

use chrono::Utc;
use uuid::Uuid;

use crate::{
    domain::*,
    error::{AppError, Result},
    policy,
    repository::{FamilyRepository, MemberRepository},
    service::{normalize_kinship_label, require_active_membership, sort_members_by_birth_date},
};

pub struct MemberService {
    family_repo: Arc<dyn FamilyRepository>,
    member_repo: Arc<dyn MemberRepository>,
}

impl MemberService {
    pub fn new(
        family_repo: Arc<dyn FamilyRepository>,
        member_repo: Arc<dyn MemberRepository>,
    ) -> Self {
        Self {
            family_repo,
            member_repo,
        }
    }

    /// Loads a target member scoped to one family. A member that exists but
    /// belongs to another family reads as not-found, so ids never leak
    /// across family boundaries.
    async fn find_in_family(&self, family_id: Uuid, member_id: Uuid) -> Result<Member> {
        let member = self
            .member_repo
            .find_by_id(member_id)
            .await?
            .ok_or_else(|| AppError::NotFound("Member not found".to_string()))?;

        if member.family_id != family_id {
            return Err(AppError::NotFound("Member not found".to_string()));
        }

        Ok(member)
    }

    /// Adds a member with no linked account (a child, a grandparent without
    /// a phone, a pet). Owner/admin only; the admins maintain the profile.
    pub async fn register_manual(
        &self,
        family_id: Uuid,
        actor_user_id: Uuid,
        request: CreateManualMemberRequest,
    ) -> Result<Member> {
        self.family_repo
            .find_by_id(family_id)
            .await?
            .ok_or_else(|| AppError::NotFound("Family not found".to_string()))?;

        let actor =
            require_active_membership(self.member_repo.as_ref(), family_id, actor_user_id).await?;
        policy::authorize_manual_registration(&actor)?;

        let kinship_label = normalize_kinship_label(request.kinship, request.kinship_label)?;
        let now = Utc::now();

        let member = Member {
            id: Uuid::new_v4(),
            family_id,
            user_id: None,
            name: request.name,
            profile_image: request.profile_image,
            birth_date: request.birth_date,
            birth_calendar: request.birth_calendar,
            country: request.country,
            kinship: request.kinship,
            kinship_label,
            role: MemberRole::Member,
            status: MemberStatus::Active,
            created_by: actor_user_id,
            created_at: now,
            modified_by: actor_user_id,
            modified_at: now,
        };

        self.member_repo.save(&member).await
    }

    pub async fn get_member(
        &self,
        family_id: Uuid,
        member_id: Uuid,
        viewer_user_id: Uuid,
    ) -> Result<Member> {
        let viewer =
            require_active_membership(self.member_repo.as_ref(), family_id, viewer_user_id).await?;

        let member = self.find_in_family(family_id, member_id).await?;

        // Non-active members are invisible below admin level.
        if !member.is_active() && !policy::can_view_hidden_members(viewer.role) {
            return Err(AppError::NotFound("Member not found".to_string()));
        }

        Ok(member)
    }

    /// Lists a family's members with role-based visibility: plain members
    /// see ACTIVE rows only, owner/admin see everyone. Sorted by birth date
    /// ascending, members without one last.
    pub async fn list_members(&self, family_id: Uuid, viewer_user_id: Uuid) -> Result<Vec<Member>> {
        let viewer =
            require_active_membership(self.member_repo.as_ref(), family_id, viewer_user_id).await?;

        let mut members = self.member_repo.list_by_family(family_id).await?;

        if !policy::can_view_hidden_members(viewer.role) {
            members.retain(|m| m.is_active());
        }

        sort_members_by_birth_date(&mut members);

        Ok(members)
    }

    pub async fn change_role(
        &self,
        family_id: Uuid,
        target_member_id: Uuid,
        new_role: MemberRole,
        actor_user_id: Uuid,
    ) -> Result<Member> {
        let actor =
            require_active_membership(self.member_repo.as_ref(), family_id, actor_user_id).await?;
        let mut target = self.find_in_family(family_id, target_member_id).await?;

        policy::authorize_role_change(&actor, &target, new_role)?;

        target.role = new_role;
        target.modified_by = actor_user_id;
        target.modified_at = Utc::now();

        self.member_repo.save(&target).await
    }

    pub async fn change_status(
        &self,
        family_id: Uuid,
        target_member_id: Uuid,
        new_status: MemberStatus,
        actor_user_id: Uuid,
    ) -> Result<Member> {
        let actor =
            require_active_membership(self.member_repo.as_ref(), family_id, actor_user_id).await?;
        let mut target = self.find_in_family(family_id, target_member_id).await?;

        policy::authorize_status_change(&actor, &target)?;

        target.status = new_status;
        target.modified_by = actor_user_id;
        target.modified_at = Utc::now();

        self.member_repo.save(&target).await
    }

    pub async fn update_info(
        &self,
        family_id: Uuid,
        target_member_id: Uuid,
        request: UpdateMemberInfoRequest,
        actor_user_id: Uuid,
    ) -> Result<Member> {
        let actor =
            require_active_membership(self.member_repo.as_ref(), family_id, actor_user_id).await?;
        let mut target = self.find_in_family(family_id, target_member_id).await?;

        policy::authorize_info_edit(&actor, &target, request.touches_birth_fields())?;

        if let Some(name) = request.name {
            target.name = name;
        }
        if let Some(profile_image) = request.profile_image {
            target.profile_image = Some(profile_image);
        }
        if let Some(birth_date) = request.birth_date {
            target.birth_date = Some(birth_date);
        }
        if let Some(birth_calendar) = request.birth_calendar {
            target.birth_calendar = birth_calendar;
        }
        if let Some(country) = request.country {
            target.country = Some(country);
        }
        target.modified_by = actor_user_id;
        target.modified_at = Utc::now();

        self.member_repo.save(&target).await
    }
}
