pub mod family_service;
pub mod family_tree_service;
pub mod join_request_service;
pub mod member_service;
pub mod relationship_service;

use std::cmp::Ordering;
use std::sync::Arc;

use sqlx::SqlitePool;
use uuid::Uuid;

use crate::auth::AuthService;
use crate::config::Settings;
use crate::domain::{Kinship, Member, KINSHIP_LABEL_MAX_LEN};
use crate::error::{AppError, Result};
use crate::policy;
use crate::repository::*;

pub use family_service::FamilyService;
pub use family_tree_service::FamilyTreeService;
pub use join_request_service::JoinRequestService;
pub use member_service::MemberService;
pub use relationship_service::RelationshipService;

pub struct ServiceContext {
    pub user_repo: Arc<dyn UserRepository>,
    pub family_repo: Arc<dyn FamilyRepository>,
    pub member_repo: Arc<dyn MemberRepository>,
    pub join_request_repo: Arc<dyn JoinRequestRepository>,
    pub relationship_repo: Arc<dyn RelationshipRepository>,
    pub auth_service: Arc<AuthService>,
    pub family_service: Arc<FamilyService>,
    pub member_service: Arc<MemberService>,
    pub join_request_service: Arc<JoinRequestService>,
    pub relationship_service: Arc<RelationshipService>,
    pub family_tree_service: Arc<FamilyTreeService>,
    pub db_pool: SqlitePool,
}

impl ServiceContext {
    pub fn new(settings: &Settings, db_pool: SqlitePool) -> Self {
        let user_repo: Arc<dyn UserRepository> =
            Arc::new(SqliteUserRepository::new(db_pool.clone()));
        let family_repo: Arc<dyn FamilyRepository> =
            Arc::new(SqliteFamilyRepository::new(db_pool.clone()));
        let member_repo: Arc<dyn MemberRepository> =
            Arc::new(SqliteMemberRepository::new(db_pool.clone()));
        let join_request_repo: Arc<dyn JoinRequestRepository> =
            Arc::new(SqliteJoinRequestRepository::new(db_pool.clone()));
        let relationship_repo: Arc<dyn RelationshipRepository> =
            Arc::new(SqliteRelationshipRepository::new(db_pool.clone()));

        let auth_service = Arc::new(AuthService::new(db_pool.clone()));

        let family_service = Arc::new(FamilyService::new(
            family_repo.clone(),
            member_repo.clone(),
        ));
        let member_service = Arc::new(MemberService::new(
            family_repo.clone(),
            member_repo.clone(),
        ));
        let join_request_service = Arc::new(JoinRequestService::new(
            family_repo.clone(),
            member_repo.clone(),
            join_request_repo.clone(),
            user_repo.clone(),
            settings.membership.max_families_per_user,
        ));
        let relationship_service = Arc::new(RelationshipService::new(
            member_repo.clone(),
            relationship_repo.clone(),
        ));
        let family_tree_service = Arc::new(FamilyTreeService::new(
            family_repo.clone(),
            member_repo.clone(),
            relationship_repo.clone(),
        ));

        Self {
            user_repo,
            family_repo,
            member_repo,
            join_request_repo,
            relationship_repo,
            auth_service,
            family_service,
            member_service,
            join_request_service,
            relationship_service,
            family_tree_service,
            db_pool,
        }
    }
}

/// Loads the acting user's membership row for a family and applies policy
/// rule 1 (member exists, status ACTIVE). Every mutating operation starts
/// here.
pub(crate) async fn require_active_membership(
    member_repo: &dyn MemberRepository,
    family_id: Uuid,
    user_id: Uuid,
) -> Result<Member> {
    let membership = member_repo.find_by_family_and_user(family_id, user_id).await?;
    let member = policy::ensure_active_member(membership.as_ref())?;
    Ok(member.clone())
}

/// Custom kinship requires a non-blank bounded label; every other kinship
/// drops whatever label was sent.
pub(crate) fn normalize_kinship_label(
    kinship: Kinship,
    label: Option<String>,
) -> Result<Option<String>> {
    if kinship != Kinship::Custom {
        return Ok(None);
    }
    let label = label
        .map(|l| l.trim().to_string())
        .filter(|l| !l.is_empty())
        .ok_or_else(|| {
            AppError::Validation("A custom kinship requires a label".to_string())
        })?;
    if label.len() > KINSHIP_LABEL_MAX_LEN {
        return Err(AppError::Validation(format!(
            "Kinship label must be at most {} characters",
            KINSHIP_LABEL_MAX_LEN
        )));
    }
    Ok(Some(label))
}

/// Active-member listings sort ascending by birth date; members without a
/// birth date go last.
pub(crate) fn sort_members_by_birth_date(members: &mut [Member]) {
    members.sort_by(|a, b| match (a.birth_date, b.birth_date) {
        (Some(x), Some(y)) => x.cmp(&y),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    });
}
