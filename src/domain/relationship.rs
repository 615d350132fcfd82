use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::domain::Kinship;

/// Upper bound for the free-text label on Custom kinship edges.
pub const KINSHIP_LABEL_MAX_LEN: usize = 50;

/// A directed, typed edge between two members of the same family.
/// Keyed uniquely by (family_id, from_member_id, to_member_id); saving again
/// for the same pair updates the existing row. No inverse edge is created
/// automatically.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Relationship {
    pub id: Uuid,
    pub family_id: Uuid,
    pub from_member_id: Uuid,
    pub to_member_id: Uuid,
    pub kinship: Kinship,
    pub kinship_label: Option<String>,
    pub description: Option<String>,
    pub created_by: Uuid,
    pub created_at: DateTime<Utc>,
    pub modified_by: Uuid,
    pub modified_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct UpsertRelationshipRequest {
    pub to_member_id: Uuid,
    pub kinship: Kinship,
    pub kinship_label: Option<String>,
    pub description: Option<String>,
}
