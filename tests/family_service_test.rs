mod common;

use kindred::domain::{Kinship, MemberRole, MemberStatus, UpdateFamilyRequest};

use common::{create_family, create_user, join_family, setup};

#[tokio::test]
async fn test_creator_becomes_owner_atomically() -> anyhow::Result<()> {
    let ctx = setup().await?;
    let haeun = create_user(&ctx, "haeun@example.com", "Haeun Kim").await?;

    let (family, owner) = create_family(&ctx, &haeun, "The Kims").await?;
    assert_eq!(family.created_by, haeun.id);

    assert_eq!(owner.family_id, family.id);
    assert_eq!(owner.user_id, Some(haeun.id));
    assert_eq!(owner.name, "Haeun Kim");
    assert_eq!(owner.role, MemberRole::Owner);
    assert_eq!(owner.status, MemberStatus::Active);
    assert_eq!(owner.kinship, Kinship::Me);

    let members = ctx.member_repo.list_by_family(family.id).await?;
    assert_eq!(members.len(), 1);

    Ok(())
}

#[tokio::test]
async fn test_family_settings_are_owner_only() -> anyhow::Result<()> {
    let ctx = setup().await?;
    let haeun = create_user(&ctx, "haeun@example.com", "Haeun Kim").await?;
    let minsu = create_user(&ctx, "minsu@example.com", "Minsu Kim").await?;
    let (family, _) = create_family(&ctx, &haeun, "The Kims").await?;
    let minsu_member = join_family(&ctx, family.id, &minsu, haeun.id).await?;

    // Even an admin may not change family-wide settings.
    ctx.member_service
        .change_role(family.id, minsu_member.id, MemberRole::Admin, haeun.id)
        .await?;

    let err = ctx
        .family_service
        .update_family(
            family.id,
            minsu.id,
            UpdateFamilyRequest {
                name: Some("Renamed".to_string()),
                description: None,
                profile_image: None,
            },
        )
        .await
        .unwrap_err();
    assert_eq!(err.kind(), "not-authorized");

    let updated = ctx
        .family_service
        .update_family(
            family.id,
            haeun.id,
            UpdateFamilyRequest {
                name: Some("The Kims of Seoul".to_string()),
                description: Some("Updated".to_string()),
                profile_image: None,
            },
        )
        .await?;
    assert_eq!(updated.name, "The Kims of Seoul");
    assert_eq!(updated.description.as_deref(), Some("Updated"));

    Ok(())
}

#[tokio::test]
async fn test_reads_require_membership() -> anyhow::Result<()> {
    let ctx = setup().await?;
    let haeun = create_user(&ctx, "haeun@example.com", "Haeun Kim").await?;
    let outsider = create_user(&ctx, "out@example.com", "Outsider").await?;
    let (family, _) = create_family(&ctx, &haeun, "The Kims").await?;

    let err = ctx
        .family_service
        .get_family(family.id, outsider.id)
        .await
        .unwrap_err();
    assert_eq!(err.kind(), "not-a-member");

    let seen = ctx.family_service.get_family(family.id, haeun.id).await?;
    assert_eq!(seen.id, family.id);

    Ok(())
}

#[tokio::test]
async fn test_list_families_for_user() -> anyhow::Result<()> {
    let ctx = setup().await?;
    let haeun = create_user(&ctx, "haeun@example.com", "Haeun Kim").await?;
    let jun = create_user(&ctx, "jun@example.com", "Jun Park").await?;
    let (kims, _) = create_family(&ctx, &haeun, "The Kims").await?;
    let (parks, _) = create_family(&ctx, &jun, "The Parks").await?;

    let haeun_families = ctx.family_service.list_families_for_user(haeun.id).await?;
    assert_eq!(haeun_families.len(), 1);
    assert_eq!(haeun_families[0].id, kims.id);

    // Joining a second family shows up in the listing.
    join_family(&ctx, parks.id, &haeun, jun.id).await?;

    let haeun_families = ctx.family_service.list_families_for_user(haeun.id).await?;
    assert_eq!(haeun_families.len(), 2);

    Ok(())
}
