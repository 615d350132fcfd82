//! Role & status policy for every mutating membership operation.
//!
//! Pure decision functions: given the acting member's row and (where
//! relevant) the target member's row, decide whether an operation is
//! permitted. Rules are evaluated in a fixed precedence order and the first
//! failing rule wins, so every denial maps to exactly one stable error kind.
//!
//! Permission matrix for member mutations (rows: actor role, columns: what
//! the actor may do to whom; membership + ACTIVE status is always checked
//! first):
//!
//! | actor  | change role          | change status                  | edit info                       |
//! |--------|----------------------|--------------------------------|---------------------------------|
//! | Owner  | yes, except the owner| yes, except self and the owner | yes, except self; birth fields  |
//! |        | (incl. self)         |                                | only on manual members          |
//! | Admin  | no                   | members only (not admins, not  | same as owner                   |
//! |        |                      | the owner, not self)           |                                 |
//! | Member | no                   | no                             | no                              |
//!
//! Relationship declarations and tree queries need membership only; family
//! settings are owner-only.

use crate::domain::{Member, MemberRole, MemberStatus};
use crate::error::{AppError, Result};

/// Rule 1: the actor must hold a membership row (else not-a-member) and be
/// ACTIVE (else not-authorized). Every other check builds on this one.
pub fn ensure_active_member(membership: Option<&Member>) -> Result<&Member> {
    let member = membership.ok_or(AppError::NotAMember)?;
    if member.status != MemberStatus::Active {
        return Err(AppError::NotAuthorized(
            "membership is not active".to_string(),
        ));
    }
    Ok(member)
}

/// Role changes: the owner's role is immutable no matter who asks, so the
/// owner-target check comes first. Otherwise only the owner may initiate,
/// and nobody can be promoted to owner.
pub fn authorize_role_change(actor: &Member, target: &Member, new_role: MemberRole) -> Result<()> {
    if target.role == MemberRole::Owner {
        return Err(AppError::CannotChangeOwnerRole);
    }
    if actor.role != MemberRole::Owner {
        return Err(AppError::NotAuthorized(
            "only the family owner can change roles".to_string(),
        ));
    }
    if new_role == MemberRole::Owner {
        return Err(AppError::CannotChangeOwnerRole);
    }
    Ok(())
}

/// Status changes: owner or admin initiates; self-targeting is rejected
/// before the owner-target rule so the single-owner self case reports
/// self-modification; nobody touches the owner's status; admins cannot
/// touch other admins.
pub fn authorize_status_change(actor: &Member, target: &Member) -> Result<()> {
    if actor.role == MemberRole::Member {
        return Err(AppError::NotAuthorized(
            "only owners and admins can change member status".to_string(),
        ));
    }
    if actor.id == target.id {
        return Err(AppError::SelfModificationNotAllowed);
    }
    if target.role == MemberRole::Owner {
        return Err(AppError::CannotChangeOwnerStatus);
    }
    if actor.role == MemberRole::Admin && target.role == MemberRole::Admin {
        return Err(AppError::AdminModificationNotAllowed);
    }
    Ok(())
}

/// Info edits (name, image, birth fields): owner or admin, never on their
/// own row through this path. Birth fields on linked members are user-owned
/// profile data and stay off-limits even to the owner; manual members
/// (no linked account) are fully editable.
pub fn authorize_info_edit(actor: &Member, target: &Member, touches_birth_fields: bool) -> Result<()> {
    if actor.role == MemberRole::Member {
        return Err(AppError::NotAuthorized(
            "only owners and admins can edit member info".to_string(),
        ));
    }
    if actor.id == target.id {
        return Err(AppError::SelfModificationNotAllowed);
    }
    if touches_birth_fields && !target.is_manual() {
        return Err(AppError::NotAuthorized(
            "birth fields of a linked member belong to that member's account".to_string(),
        ));
    }
    Ok(())
}

/// Manual registration (adding a member without an account): owner or admin.
pub fn authorize_manual_registration(actor: &Member) -> Result<()> {
    if actor.role == MemberRole::Member {
        return Err(AppError::NotAuthorized(
            "only owners and admins can register members manually".to_string(),
        ));
    }
    Ok(())
}

/// Join-request review: owner or admin.
pub fn authorize_join_request_review(reviewer: &Member) -> Result<()> {
    if reviewer.role == MemberRole::Member {
        return Err(AppError::NotAuthorized(
            "only owners and admins can review join requests".to_string(),
        ));
    }
    Ok(())
}

/// Family-wide settings: owner only.
pub fn authorize_family_settings(actor: &Member) -> Result<()> {
    if actor.role != MemberRole::Owner {
        return Err(AppError::NotAuthorized(
            "only the family owner can change family settings".to_string(),
        ));
    }
    Ok(())
}

/// Owners and admins see suspended/inactive/banned members in listings;
/// plain members see ACTIVE members only.
pub fn can_view_hidden_members(role: MemberRole) -> bool {
    matches!(role, MemberRole::Owner | MemberRole::Admin)
}
