use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// One person's (or manually-added entity's) membership row within one
/// family. `family_id` and `user_id` are immutable after creation; role,
/// status and profile fields mutate in place. Members are never hard-deleted,
/// a status transition models removal.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Member {
    pub id: Uuid,
    pub family_id: Uuid,
    /// None for manually-registered members (children, pets) without an
    /// account of their own.
    pub user_id: Option<Uuid>,
    pub name: String,
    pub profile_image: Option<String>,
    pub birth_date: Option<NaiveDate>,
    pub birth_calendar: BirthCalendar,
    pub country: Option<String>,
    /// Kinship to the member who registered this row.
    pub kinship: Kinship,
    pub kinship_label: Option<String>,
    pub role: MemberRole,
    pub status: MemberStatus,
    pub created_by: Uuid,
    pub created_at: DateTime<Utc>,
    pub modified_by: Uuid,
    pub modified_at: DateTime<Utc>,
}

impl Member {
    /// Manually-registered members have no linked account; their profile
    /// (including birth fields) is maintained by the family's admins.
    pub fn is_manual(&self) -> bool {
        self.user_id.is_none()
    }

    pub fn is_active(&self) -> bool {
        self.status == MemberStatus::Active
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, sqlx::Type, PartialEq, Eq)]
#[sqlx(type_name = "TEXT")]
pub enum MemberRole {
    Owner,
    Admin,
    Member,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, sqlx::Type, PartialEq, Eq)]
#[sqlx(type_name = "TEXT")]
pub enum MemberStatus {
    Active,
    Suspended,
    Inactive,
    Banned,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, sqlx::Type, PartialEq, Eq, Default)]
#[sqlx(type_name = "TEXT")]
pub enum BirthCalendar {
    #[default]
    Solar,
    Lunar,
}

/// Enumerated kinship labels shared by the member registration form and the
/// relationship graph. `Custom` carries its free-text label separately.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, sqlx::Type, PartialEq, Eq)]
#[sqlx(type_name = "TEXT")]
pub enum Kinship {
    Me,
    Father,
    Mother,
    Son,
    Daughter,
    Brother,
    Sister,
    Grandfather,
    Grandmother,
    Grandson,
    Granddaughter,
    Husband,
    Wife,
    Uncle,
    Aunt,
    Nephew,
    Niece,
    Cousin,
    Pet,
    Custom,
}

#[derive(Debug, Clone, Deserialize)]
pub struct CreateManualMemberRequest {
    pub name: String,
    pub profile_image: Option<String>,
    pub birth_date: Option<NaiveDate>,
    #[serde(default)]
    pub birth_calendar: BirthCalendar,
    pub country: Option<String>,
    pub kinship: Kinship,
    pub kinship_label: Option<String>,
}

#[derive(Debug, Clone, Deserialize, Default)]
pub struct UpdateMemberInfoRequest {
    pub name: Option<String>,
    pub profile_image: Option<String>,
    pub birth_date: Option<NaiveDate>,
    pub birth_calendar: Option<BirthCalendar>,
    pub country: Option<String>,
}

impl UpdateMemberInfoRequest {
    /// Birth fields are user-owned profile data on linked members; the
    /// policy layer needs to know whether this edit touches them.
    pub fn touches_birth_fields(&self) -> bool {
        self.birth_date.is_some() || self.birth_calendar.is_some()
    }
}
