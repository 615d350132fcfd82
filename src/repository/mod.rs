use async_trait::async_trait;
use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::domain::*;
use crate::error::Result;

pub mod family_repository;
pub mod join_request_repository;
pub mod member_repository;
pub mod relationship_repository;
pub mod user_repository;

pub use family_repository::SqliteFamilyRepository;
pub use join_request_repository::SqliteJoinRequestRepository;
pub use member_repository::SqliteMemberRepository;
pub use relationship_repository::SqliteRelationshipRepository;
pub use user_repository::SqliteUserRepository;

#[async_trait]
pub trait UserRepository: Send + Sync {
    async fn create(&self, request: CreateUserRequest) -> Result<User>;
    async fn find_by_id(&self, id: Uuid) -> Result<Option<User>>;
    async fn find_by_email(&self, email: &str) -> Result<Option<User>>;
}

#[async_trait]
pub trait FamilyRepository: Send + Sync {
    /// Creates the family together with its owner member row in one
    /// transaction; a family never exists without exactly one owner.
    async fn create_with_owner(&self, family: &Family, owner: &Member) -> Result<Family>;
    async fn find_by_id(&self, id: Uuid) -> Result<Option<Family>>;
    async fn update(&self, id: Uuid, update: UpdateFamilyRequest) -> Result<Family>;
    async fn list_for_user(&self, user_id: Uuid) -> Result<Vec<Family>>;
}

#[async_trait]
pub trait MemberRepository: Send + Sync {
    /// Full-entity upsert. Callers supply an already-policy-checked,
    /// fully-constructed member; family_id, user_id and the created-by/at
    /// audit pair are never overwritten for an existing row.
    async fn save(&self, member: &Member) -> Result<Member>;
    async fn find_by_id(&self, id: Uuid) -> Result<Option<Member>>;
    async fn find_by_family_and_user(&self, family_id: Uuid, user_id: Uuid)
        -> Result<Option<Member>>;
    async fn list_by_family(&self, family_id: Uuid) -> Result<Vec<Member>>;
    /// ACTIVE membership rows held by one user across all families.
    async fn count_active_families(&self, user_id: Uuid) -> Result<i64>;
}

#[async_trait]
pub trait JoinRequestRepository: Send + Sync {
    async fn create(&self, request: &JoinRequest) -> Result<JoinRequest>;
    async fn find_by_id(&self, id: Uuid) -> Result<Option<JoinRequest>>;
    /// The at-most-one non-terminal request per (family, requester) pair.
    async fn find_active_by_family_and_requester(
        &self,
        family_id: Uuid,
        requester_id: Uuid,
    ) -> Result<Option<JoinRequest>>;
    async fn list_by_family(&self, family_id: Uuid) -> Result<Vec<JoinRequest>>;
    async fn reject(
        &self,
        id: Uuid,
        reviewer_id: Uuid,
        reviewed_at: DateTime<Utc>,
    ) -> Result<JoinRequest>;
    /// Transitions the request to Approved and inserts the new member row
    /// in a single transaction; both effects or neither.
    async fn approve(
        &self,
        id: Uuid,
        reviewer_id: Uuid,
        reviewed_at: DateTime<Utc>,
        new_member: &Member,
    ) -> Result<JoinRequest>;
}

#[async_trait]
pub trait RelationshipRepository: Send + Sync {
    /// Insert-or-update keyed by (family_id, from_member_id, to_member_id);
    /// the row id stays stable across updates.
    async fn upsert(&self, relationship: &Relationship) -> Result<Relationship>;
    async fn find(
        &self,
        family_id: Uuid,
        from_member_id: Uuid,
        to_member_id: Uuid,
    ) -> Result<Option<Relationship>>;
    async fn list_from(&self, family_id: Uuid, from_member_id: Uuid)
        -> Result<Vec<Relationship>>;
    async fn list_by_family(&self, family_id: Uuid) -> Result<Vec<Relationship>>;
}
