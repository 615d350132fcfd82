mod common;

use chrono::NaiveDate;
use uuid::Uuid;

use kindred::domain::{
    CreateManualMemberRequest, Kinship, MemberStatus, UpsertRelationshipRequest,
};

use common::{create_family, create_user, join_family, setup};

async fn add_manual(
    ctx: &kindred::service::ServiceContext,
    family_id: Uuid,
    actor_id: Uuid,
    name: &str,
    birth_date: Option<NaiveDate>,
) -> anyhow::Result<kindred::domain::Member> {
    let member = ctx
        .member_service
        .register_manual(
            family_id,
            actor_id,
            CreateManualMemberRequest {
                name: name.to_string(),
                profile_image: None,
                birth_date,
                birth_calendar: Default::default(),
                country: None,
                kinship: Kinship::Father,
                kinship_label: None,
            },
        )
        .await?;
    Ok(member)
}

async fn declare(
    ctx: &kindred::service::ServiceContext,
    family_id: Uuid,
    actor_id: Uuid,
    from: Uuid,
    to: Uuid,
    kinship: Kinship,
) -> anyhow::Result<()> {
    ctx.relationship_service
        .upsert(
            family_id,
            actor_id,
            from,
            UpsertRelationshipRequest {
                to_member_id: to,
                kinship,
                kinship_label: None,
                description: None,
            },
        )
        .await?;
    Ok(())
}

#[tokio::test]
async fn test_one_hop_annotation_from_the_center() -> anyhow::Result<()> {
    let ctx = setup().await?;
    let haeun = create_user(&ctx, "haeun@example.com", "Haeun Kim").await?;
    let (family, me) = create_family(&ctx, &haeun, "The Kims").await?;

    let dad = add_manual(&ctx, family.id, haeun.id, "Dad Kim", None).await?;
    let cousin = add_manual(&ctx, family.id, haeun.id, "Cousin Kim", None).await?;

    // Only the center->dad edge exists; dad->cousin is not the center's.
    declare(&ctx, family.id, haeun.id, me.id, dad.id, Kinship::Father).await?;
    declare(&ctx, family.id, haeun.id, dad.id, cousin.id, Kinship::Nephew).await?;

    let tree = ctx
        .family_tree_service
        .build_tree(family.id, me.id, haeun.id)
        .await?;

    assert_eq!(tree.family_id, family.id);
    assert_eq!(tree.center.id, me.id);
    assert_eq!(tree.members.len(), 2);
    // The center never appears in its own member list.
    assert!(tree.members.iter().all(|m| m.member.id != me.id));

    let dad_node = tree.members.iter().find(|m| m.member.id == dad.id).unwrap();
    assert_eq!(dad_node.kinship, Some(Kinship::Father));

    // No direct edge from the center: present but unannotated.
    let cousin_node = tree.members.iter().find(|m| m.member.id == cousin.id).unwrap();
    assert!(cousin_node.kinship.is_none());
    assert!(cousin_node.kinship_label.is_none());

    Ok(())
}

#[tokio::test]
async fn test_tree_members_sorted_by_birth_date() -> anyhow::Result<()> {
    let ctx = setup().await?;
    let haeun = create_user(&ctx, "haeun@example.com", "Haeun Kim").await?;
    let (family, me) = create_family(&ctx, &haeun, "The Kims").await?;

    let young = add_manual(
        &ctx,
        family.id,
        haeun.id,
        "Young Kim",
        NaiveDate::from_ymd_opt(2015, 6, 1),
    )
    .await?;
    let old = add_manual(
        &ctx,
        family.id,
        haeun.id,
        "Old Kim",
        NaiveDate::from_ymd_opt(1948, 3, 2),
    )
    .await?;
    let undated = add_manual(&ctx, family.id, haeun.id, "Undated Kim", None).await?;

    let tree = ctx
        .family_tree_service
        .build_tree(family.id, me.id, haeun.id)
        .await?;

    let order: Vec<Uuid> = tree.members.iter().map(|m| m.member.id).collect();
    assert_eq!(order, vec![old.id, young.id, undated.id]);

    Ok(())
}

#[tokio::test]
async fn test_hidden_members_follow_viewer_role() -> anyhow::Result<()> {
    let ctx = setup().await?;
    let haeun = create_user(&ctx, "haeun@example.com", "Haeun Kim").await?;
    let minsu = create_user(&ctx, "minsu@example.com", "Minsu Kim").await?;
    let sora = create_user(&ctx, "sora@example.com", "Sora Lee").await?;
    let (family, me) = create_family(&ctx, &haeun, "The Kims").await?;
    join_family(&ctx, family.id, &minsu, haeun.id).await?;
    let sora_member = join_family(&ctx, family.id, &sora, haeun.id).await?;

    ctx.member_service
        .change_status(family.id, sora_member.id, MemberStatus::Suspended, haeun.id)
        .await?;

    // Plain viewer: suspended member is absent from the tree.
    let tree = ctx
        .family_tree_service
        .build_tree(family.id, me.id, minsu.id)
        .await?;
    assert!(tree.members.iter().all(|m| m.member.id != sora_member.id));

    // Owner sees the whole family.
    let tree = ctx
        .family_tree_service
        .build_tree(family.id, me.id, haeun.id)
        .await?;
    assert!(tree.members.iter().any(|m| m.member.id == sora_member.id));

    // A hidden center reads as not-found for a plain viewer.
    let err = ctx
        .family_tree_service
        .build_tree(family.id, sora_member.id, minsu.id)
        .await
        .unwrap_err();
    assert_eq!(err.kind(), "not-found");

    Ok(())
}

#[tokio::test]
async fn test_tree_requires_membership_and_valid_center() -> anyhow::Result<()> {
    let ctx = setup().await?;
    let haeun = create_user(&ctx, "haeun@example.com", "Haeun Kim").await?;
    let outsider = create_user(&ctx, "out@example.com", "Outsider").await?;
    let (family, me) = create_family(&ctx, &haeun, "The Kims").await?;

    let err = ctx
        .family_tree_service
        .build_tree(family.id, me.id, outsider.id)
        .await
        .unwrap_err();
    assert_eq!(err.kind(), "not-a-member");

    let err = ctx
        .family_tree_service
        .build_tree(family.id, Uuid::new_v4(), haeun.id)
        .await
        .unwrap_err();
    assert_eq!(err.kind(), "not-found");

    let err = ctx
        .family_tree_service
        .build_tree(Uuid::new_v4(), me.id, haeun.id)
        .await
        .unwrap_err();
    assert_eq!(err.kind(), "not-found");

    Ok(())
}

#[tokio::test]
async fn test_any_member_can_be_the_center() -> anyhow::Result<()> {
    let ctx = setup().await?;
    let haeun = create_user(&ctx, "haeun@example.com", "Haeun Kim").await?;
    let (family, me) = create_family(&ctx, &haeun, "The Kims").await?;
    let dad = add_manual(&ctx, family.id, haeun.id, "Dad Kim", None).await?;
    let mom = add_manual(&ctx, family.id, haeun.id, "Mom Kim", None).await?;

    declare(&ctx, family.id, haeun.id, dad.id, mom.id, Kinship::Wife).await?;

    // Recentering on dad: mom is annotated from dad's edges, the original
    // owner is not.
    let tree = ctx
        .family_tree_service
        .build_tree(family.id, dad.id, haeun.id)
        .await?;
    assert_eq!(tree.center.id, dad.id);

    let mom_node = tree.members.iter().find(|m| m.member.id == mom.id).unwrap();
    assert_eq!(mom_node.kinship, Some(Kinship::Wife));

    let me_node = tree.members.iter().find(|m| m.member.id == me.id).unwrap();
    assert!(me_node.kinship.is_none());

    Ok(())
}
