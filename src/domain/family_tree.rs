use serde::Serialize;
use uuid::Uuid;

use crate::domain::{Kinship, Member};

/// Read-only aggregate answering "who is in this family, seen from one
/// member". Rebuilt from the member registry and the relationship graph on
/// every query; never persisted.
#[derive(Debug, Clone, Serialize)]
pub struct FamilyTree {
    pub family_id: Uuid,
    pub center: Member,
    pub members: Vec<TreeMember>,
}

/// A family member as seen from the tree's center. `kinship` carries the
/// center-to-member edge when one was declared; members without a direct
/// edge stay in the tree unannotated.
#[derive(Debug, Clone, Serialize)]
pub struct TreeMember {
    pub member: Member,
    pub kinship: Option<Kinship>,
    pub kinship_label: Option<String>,
}
