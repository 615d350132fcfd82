mod common;

use chrono::NaiveDate;

use kindred::domain::{CreateManualMemberRequest, Kinship, UpsertRelationshipRequest};

use common::{create_family, create_user, join_family, setup};

fn edge(to: uuid::Uuid, kinship: Kinship) -> UpsertRelationshipRequest {
    UpsertRelationshipRequest {
        to_member_id: to,
        kinship,
        kinship_label: None,
        description: None,
    }
}

async fn add_manual(
    ctx: &kindred::service::ServiceContext,
    family_id: uuid::Uuid,
    actor_id: uuid::Uuid,
    name: &str,
) -> anyhow::Result<kindred::domain::Member> {
    let member = ctx
        .member_service
        .register_manual(
            family_id,
            actor_id,
            CreateManualMemberRequest {
                name: name.to_string(),
                profile_image: None,
                birth_date: NaiveDate::from_ymd_opt(1970, 1, 1),
                birth_calendar: Default::default(),
                country: None,
                kinship: Kinship::Father,
                kinship_label: None,
            },
        )
        .await?;
    Ok(member)
}

#[tokio::test]
async fn test_redeclaring_updates_in_place() -> anyhow::Result<()> {
    let ctx = setup().await?;
    let haeun = create_user(&ctx, "haeun@example.com", "Haeun Kim").await?;
    let (family, me) = create_family(&ctx, &haeun, "The Kims").await?;
    let dad = add_manual(&ctx, family.id, haeun.id, "Dad Kim").await?;

    let first = ctx
        .relationship_service
        .upsert(family.id, haeun.id, me.id, edge(dad.id, Kinship::Uncle))
        .await?;
    assert_eq!(first.kinship, Kinship::Uncle);

    // Same directed pair again: the edge is corrected, not duplicated,
    // and keeps its id.
    let second = ctx
        .relationship_service
        .upsert(family.id, haeun.id, me.id, edge(dad.id, Kinship::Father))
        .await?;
    assert_eq!(second.id, first.id);
    assert_eq!(second.kinship, Kinship::Father);

    let listed = ctx
        .relationship_service
        .list_from(family.id, haeun.id, me.id)
        .await?;
    assert_eq!(listed.len(), 1);

    Ok(())
}

#[tokio::test]
async fn test_no_inverse_edge_is_created() -> anyhow::Result<()> {
    let ctx = setup().await?;
    let haeun = create_user(&ctx, "haeun@example.com", "Haeun Kim").await?;
    let (family, me) = create_family(&ctx, &haeun, "The Kims").await?;
    let dad = add_manual(&ctx, family.id, haeun.id, "Dad Kim").await?;

    ctx.relationship_service
        .upsert(family.id, haeun.id, me.id, edge(dad.id, Kinship::Father))
        .await?;

    let found = ctx
        .relationship_service
        .find(family.id, haeun.id, me.id, dad.id)
        .await?;
    assert_eq!(found.kinship, Kinship::Father);

    // The reverse direction does not exist until someone declares it.
    let err = ctx
        .relationship_service
        .find(family.id, haeun.id, dad.id, me.id)
        .await
        .unwrap_err();
    assert_eq!(err.kind(), "not-found");

    Ok(())
}

#[tokio::test]
async fn test_self_edge_is_rejected() -> anyhow::Result<()> {
    let ctx = setup().await?;
    let haeun = create_user(&ctx, "haeun@example.com", "Haeun Kim").await?;
    let (family, me) = create_family(&ctx, &haeun, "The Kims").await?;

    let err = ctx
        .relationship_service
        .upsert(family.id, haeun.id, me.id, edge(me.id, Kinship::Brother))
        .await
        .unwrap_err();
    assert_eq!(err.kind(), "bad-request");

    Ok(())
}

#[tokio::test]
async fn test_endpoints_must_share_the_family() -> anyhow::Result<()> {
    let ctx = setup().await?;
    let haeun = create_user(&ctx, "haeun@example.com", "Haeun Kim").await?;
    let jun = create_user(&ctx, "jun@example.com", "Jun Park").await?;
    let (kims, me) = create_family(&ctx, &haeun, "The Kims").await?;
    let (_parks, jun_member) = create_family(&ctx, &jun, "The Parks").await?;

    // A real member of another family is a family-mismatch, not not-found.
    let err = ctx
        .relationship_service
        .upsert(kims.id, haeun.id, me.id, edge(jun_member.id, Kinship::Uncle))
        .await
        .unwrap_err();
    assert_eq!(err.kind(), "member-not-in-family");

    // An id that resolves to nothing at all is not-found.
    let err = ctx
        .relationship_service
        .upsert(kims.id, haeun.id, me.id, edge(uuid::Uuid::new_v4(), Kinship::Uncle))
        .await
        .unwrap_err();
    assert_eq!(err.kind(), "not-found");

    Ok(())
}

#[tokio::test]
async fn test_declaring_requires_active_membership() -> anyhow::Result<()> {
    let ctx = setup().await?;
    let haeun = create_user(&ctx, "haeun@example.com", "Haeun Kim").await?;
    let outsider = create_user(&ctx, "out@example.com", "Outsider").await?;
    let (family, me) = create_family(&ctx, &haeun, "The Kims").await?;
    let dad = add_manual(&ctx, family.id, haeun.id, "Dad Kim").await?;

    let err = ctx
        .relationship_service
        .upsert(family.id, outsider.id, me.id, edge(dad.id, Kinship::Father))
        .await
        .unwrap_err();
    assert_eq!(err.kind(), "not-a-member");

    // Any ACTIVE member may declare, not just admins.
    let minsu = create_user(&ctx, "minsu@example.com", "Minsu Kim").await?;
    let minsu_member = join_family(&ctx, family.id, &minsu, haeun.id).await?;
    let declared = ctx
        .relationship_service
        .upsert(family.id, minsu.id, minsu_member.id, edge(dad.id, Kinship::Father))
        .await?;
    assert_eq!(declared.created_by, minsu.id);

    Ok(())
}

#[tokio::test]
async fn test_custom_kinship_label_on_edges() -> anyhow::Result<()> {
    let ctx = setup().await?;
    let haeun = create_user(&ctx, "haeun@example.com", "Haeun Kim").await?;
    let (family, me) = create_family(&ctx, &haeun, "The Kims").await?;
    let friend = add_manual(&ctx, family.id, haeun.id, "Family Friend").await?;

    let err = ctx
        .relationship_service
        .upsert(family.id, haeun.id, me.id, edge(friend.id, Kinship::Custom))
        .await
        .unwrap_err();
    assert_eq!(err.kind(), "validation");

    let declared = ctx
        .relationship_service
        .upsert(
            family.id,
            haeun.id,
            me.id,
            UpsertRelationshipRequest {
                kinship_label: Some("Godfather".to_string()),
                ..edge(friend.id, Kinship::Custom)
            },
        )
        .await?;
    assert_eq!(declared.kinship_label.as_deref(), Some("Godfather"));

    // A label sent alongside an enumerated kinship is dropped.
    let declared = ctx
        .relationship_service
        .upsert(
            family.id,
            haeun.id,
            me.id,
            UpsertRelationshipRequest {
                kinship_label: Some("ignored".to_string()),
                ..edge(friend.id, Kinship::Uncle)
            },
        )
        .await?;
    assert!(declared.kinship_label.is_none());

    Ok(())
}

#[tokio::test]
async fn test_list_from_scopes_to_the_source_member() -> anyhow::Result<()> {
    let ctx = setup().await?;
    let haeun = create_user(&ctx, "haeun@example.com", "Haeun Kim").await?;
    let (family, me) = create_family(&ctx, &haeun, "The Kims").await?;
    let dad = add_manual(&ctx, family.id, haeun.id, "Dad Kim").await?;
    let mom = add_manual(&ctx, family.id, haeun.id, "Mom Kim").await?;

    ctx.relationship_service
        .upsert(family.id, haeun.id, me.id, edge(dad.id, Kinship::Father))
        .await?;
    ctx.relationship_service
        .upsert(family.id, haeun.id, me.id, edge(mom.id, Kinship::Mother))
        .await?;
    ctx.relationship_service
        .upsert(family.id, haeun.id, dad.id, edge(mom.id, Kinship::Wife))
        .await?;

    let from_me = ctx
        .relationship_service
        .list_from(family.id, haeun.id, me.id)
        .await?;
    assert_eq!(from_me.len(), 2);
    assert!(from_me.iter().all(|r| r.from_member_id == me.id));

    let from_dad = ctx
        .relationship_service
        .list_from(family.id, haeun.id, dad.id)
        .await?;
    assert_eq!(from_dad.len(), 1);
    assert_eq!(from_dad[0].kinship, Kinship::Wife);

    Ok(())
}
