use std::sync::Arc;

use chrono::Utc;
use uuid::Uuid;

use crate::{
    domain::*,
    error::{AppError, Result},
    policy,
    repository::{FamilyRepository, JoinRequestRepository, MemberRepository, UserRepository},
    service::require_active_membership,
};

/// The join-request state machine: Pending -> Approved | Rejected, both
/// terminal. Approval creates the membership row in the same transaction as
/// the status flip.
pub struct JoinRequestService {
    family_repo: Arc<dyn FamilyRepository>,
    member_repo: Arc<dyn MemberRepository>,
    join_request_repo: Arc<dyn JoinRequestRepository>,
    user_repo: Arc<dyn UserRepository>,
    max_families_per_user: i64,
}

impl JoinRequestService {
    pub fn new(
        family_repo: Arc<dyn FamilyRepository>,
        member_repo: Arc<dyn MemberRepository>,
        join_request_repo: Arc<dyn JoinRequestRepository>,
        user_repo: Arc<dyn UserRepository>,
        max_families_per_user: i64,
    ) -> Self {
        Self {
            family_repo,
            member_repo,
            join_request_repo,
            user_repo,
            max_families_per_user,
        }
    }

    pub async fn submit(&self, family_id: Uuid, requester_id: Uuid) -> Result<JoinRequest> {
        self.family_repo
            .find_by_id(family_id)
            .await?
            .ok_or_else(|| AppError::NotFound("Family not found".to_string()))?;

        if let Some(membership) = self
            .member_repo
            .find_by_family_and_user(family_id, requester_id)
            .await?
        {
            if membership.is_active() {
                return Err(AppError::Conflict(
                    "Already a member of this family".to_string(),
                ));
            }
        }

        // "Already pending" and "already joined" stay distinguishable:
        // clients resubmit after rejection but not while a request is open.
        if let Some(existing) = self
            .join_request_repo
            .find_active_by_family_and_requester(family_id, requester_id)
            .await?
        {
            return Err(match existing.status {
                JoinRequestStatus::Pending => {
                    AppError::Conflict("A join request is already pending".to_string())
                }
                _ => AppError::Conflict("Join request was already approved".to_string()),
            });
        }

        let active_families = self.member_repo.count_active_families(requester_id).await?;
        if active_families >= self.max_families_per_user {
            return Err(AppError::Conflict(format!(
                "Cannot join more than {} families",
                self.max_families_per_user
            )));
        }

        let request = JoinRequest {
            id: Uuid::new_v4(),
            family_id,
            requester_id,
            status: JoinRequestStatus::Pending,
            created_at: Utc::now(),
            reviewed_by: None,
            reviewed_at: None,
        };

        self.join_request_repo.create(&request).await
    }

    pub async fn process(
        &self,
        family_id: Uuid,
        request_id: Uuid,
        decision: JoinDecision,
        reviewer_user_id: Uuid,
    ) -> Result<JoinRequest> {
        let reviewer =
            require_active_membership(self.member_repo.as_ref(), family_id, reviewer_user_id)
                .await?;
        policy::authorize_join_request_review(&reviewer)?;

        // A request from another family reads as not-found rather than a
        // mismatch, so request ids don't leak across families.
        let request = self
            .join_request_repo
            .find_by_id(request_id)
            .await?
            .filter(|r| r.family_id == family_id)
            .ok_or_else(|| AppError::NotFound("Join request not found".to_string()))?;

        if request.status != JoinRequestStatus::Pending {
            return Err(AppError::InvalidStateTransition(
                "Join request has already been processed".to_string(),
            ));
        }

        let now = Utc::now();

        match decision {
            JoinDecision::Reject => {
                self.join_request_repo
                    .reject(request.id, reviewer_user_id, now)
                    .await
            }
            JoinDecision::Approve => {
                let requester = self
                    .user_repo
                    .find_by_id(request.requester_id)
                    .await?
                    .ok_or_else(|| AppError::NotFound("Requesting user not found".to_string()))?;

                let member = Member {
                    id: Uuid::new_v4(),
                    family_id,
                    user_id: Some(requester.id),
                    name: requester.display_name,
                    profile_image: None,
                    birth_date: None,
                    birth_calendar: BirthCalendar::Solar,
                    country: None,
                    kinship: Kinship::Me,
                    kinship_label: None,
                    role: MemberRole::Member,
                    status: MemberStatus::Active,
                    created_by: reviewer_user_id,
                    created_at: now,
                    modified_by: reviewer_user_id,
                    modified_at: now,
                };

                self.join_request_repo
                    .approve(request.id, reviewer_user_id, now, &member)
                    .await
            }
        }
    }

    pub async fn list_by_family(
        &self,
        family_id: Uuid,
        reviewer_user_id: Uuid,
    ) -> Result<Vec<JoinRequest>> {
        let reviewer =
            require_active_membership(self.member_repo.as_ref(), family_id, reviewer_user_id)
                .await?;
        policy::authorize_join_request_review(&reviewer)?;

        self.join_request_repo.list_by_family(family_id).await
    }
}
