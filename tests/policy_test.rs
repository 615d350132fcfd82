use chrono::Utc;
use uuid::Uuid;

use kindred::{
    domain::{BirthCalendar, Kinship, Member, MemberRole, MemberStatus},
    error::AppError,
    policy,
};

fn member(role: MemberRole, status: MemberStatus, linked: bool) -> Member {
    let user_id = Uuid::new_v4();
    let now = Utc::now();
    Member {
        id: Uuid::new_v4(),
        family_id: Uuid::new_v4(),
        user_id: linked.then_some(user_id),
        name: "Test Member".to_string(),
        profile_image: None,
        birth_date: None,
        birth_calendar: BirthCalendar::Solar,
        country: None,
        kinship: Kinship::Me,
        kinship_label: None,
        role,
        status,
        created_by: user_id,
        created_at: now,
        modified_by: user_id,
        modified_at: now,
    }
}

fn active(role: MemberRole) -> Member {
    member(role, MemberStatus::Active, true)
}

#[test]
fn test_membership_rule() {
    assert!(matches!(
        policy::ensure_active_member(None),
        Err(AppError::NotAMember)
    ));

    let suspended = member(MemberRole::Member, MemberStatus::Suspended, true);
    assert!(matches!(
        policy::ensure_active_member(Some(&suspended)),
        Err(AppError::NotAuthorized(_))
    ));

    let ok = active(MemberRole::Member);
    assert!(policy::ensure_active_member(Some(&ok)).is_ok());
}

#[test]
fn test_role_change_owner_only() {
    let admin = active(MemberRole::Admin);
    let target = active(MemberRole::Member);
    assert!(matches!(
        policy::authorize_role_change(&admin, &target, MemberRole::Admin),
        Err(AppError::NotAuthorized(_))
    ));

    let plain = active(MemberRole::Member);
    assert!(matches!(
        policy::authorize_role_change(&plain, &target, MemberRole::Admin),
        Err(AppError::NotAuthorized(_))
    ));

    let owner = active(MemberRole::Owner);
    assert!(policy::authorize_role_change(&owner, &target, MemberRole::Admin).is_ok());
}

#[test]
fn test_owner_role_is_immutable() {
    let owner = active(MemberRole::Owner);
    let other_owner = active(MemberRole::Owner);

    // Target already owner: denied with the same kind regardless of actor.
    assert!(matches!(
        policy::authorize_role_change(&owner, &other_owner, MemberRole::Member),
        Err(AppError::CannotChangeOwnerRole)
    ));

    let plain = active(MemberRole::Member);
    assert!(matches!(
        policy::authorize_role_change(&plain, &other_owner, MemberRole::Member),
        Err(AppError::CannotChangeOwnerRole)
    ));

    // Promoting anyone to owner is also denied.
    let target = active(MemberRole::Member);
    assert!(matches!(
        policy::authorize_role_change(&owner, &target, MemberRole::Owner),
        Err(AppError::CannotChangeOwnerRole)
    ));
}

#[test]
fn test_status_change_matrix() {
    let owner = active(MemberRole::Owner);
    let admin = active(MemberRole::Admin);
    let other_admin = active(MemberRole::Admin);
    let plain = active(MemberRole::Member);
    let target = active(MemberRole::Member);

    // Plain members may not change anyone's status.
    assert!(matches!(
        policy::authorize_status_change(&plain, &target),
        Err(AppError::NotAuthorized(_))
    ));

    // Admin on admin is denied.
    assert!(matches!(
        policy::authorize_status_change(&admin, &other_admin),
        Err(AppError::AdminModificationNotAllowed)
    ));

    // Nobody touches the owner's status.
    assert!(matches!(
        policy::authorize_status_change(&admin, &owner),
        Err(AppError::CannotChangeOwnerStatus)
    ));

    // Allowed combinations.
    assert!(policy::authorize_status_change(&owner, &target).is_ok());
    assert!(policy::authorize_status_change(&owner, &admin).is_ok());
    assert!(policy::authorize_status_change(&admin, &target).is_ok());
}

#[test]
fn test_self_status_change_rejected_even_for_owner() {
    let owner = active(MemberRole::Owner);
    assert!(matches!(
        policy::authorize_status_change(&owner, &owner),
        Err(AppError::SelfModificationNotAllowed)
    ));

    let admin = active(MemberRole::Admin);
    assert!(matches!(
        policy::authorize_status_change(&admin, &admin),
        Err(AppError::SelfModificationNotAllowed)
    ));
}

#[test]
fn test_info_edit_rules() {
    let owner = active(MemberRole::Owner);
    let plain = active(MemberRole::Member);
    let linked_target = active(MemberRole::Member);
    let manual_target = member(MemberRole::Member, MemberStatus::Active, false);

    // Plain members may not edit info.
    assert!(matches!(
        policy::authorize_info_edit(&plain, &linked_target, false),
        Err(AppError::NotAuthorized(_))
    ));

    // Self edits through this path are rejected.
    assert!(matches!(
        policy::authorize_info_edit(&owner, &owner, false),
        Err(AppError::SelfModificationNotAllowed)
    ));

    // Birth fields on a linked member are user-owned.
    assert!(matches!(
        policy::authorize_info_edit(&owner, &linked_target, true),
        Err(AppError::NotAuthorized(_))
    ));

    // Name-only edits on linked members are fine, and manual members are
    // fully editable.
    assert!(policy::authorize_info_edit(&owner, &linked_target, false).is_ok());
    assert!(policy::authorize_info_edit(&owner, &manual_target, true).is_ok());
}

#[test]
fn test_administrative_rules() {
    let owner = active(MemberRole::Owner);
    let admin = active(MemberRole::Admin);
    let plain = active(MemberRole::Member);

    assert!(policy::authorize_manual_registration(&owner).is_ok());
    assert!(policy::authorize_manual_registration(&admin).is_ok());
    assert!(policy::authorize_manual_registration(&plain).is_err());

    assert!(policy::authorize_join_request_review(&admin).is_ok());
    assert!(policy::authorize_join_request_review(&plain).is_err());

    assert!(policy::authorize_family_settings(&owner).is_ok());
    assert!(matches!(
        policy::authorize_family_settings(&admin),
        Err(AppError::NotAuthorized(_))
    ));
}

#[test]
fn test_visibility_by_role() {
    assert!(policy::can_view_hidden_members(MemberRole::Owner));
    assert!(policy::can_view_hidden_members(MemberRole::Admin));
    assert!(!policy::can_view_hidden_members(MemberRole::Member));
}
