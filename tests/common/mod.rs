#![allow(dead_code)]

use sqlx::sqlite::SqlitePoolOptions;
use uuid::Uuid;

use kindred::{
    config::Settings,
    domain::{
        CreateFamilyRequest, CreateUserRequest, Family, JoinDecision, Member, User,
    },
    service::ServiceContext,
};

/// Fresh in-memory database with migrations applied. One connection so the
/// memory database is shared across all queries in the test.
pub async fn setup() -> anyhow::Result<ServiceContext> {
    setup_with(Settings::default()).await
}

pub async fn setup_with(settings: Settings) -> anyhow::Result<ServiceContext> {
    let pool = SqlitePoolOptions::new()
        .max_connections(1)
        .connect("sqlite::memory:")
        .await?;
    sqlx::migrate!("./migrations").run(&pool).await?;
    Ok(ServiceContext::new(&settings, pool))
}

pub async fn create_user(ctx: &ServiceContext, email: &str, name: &str) -> anyhow::Result<User> {
    let user = ctx
        .user_repo
        .create(CreateUserRequest {
            email: email.to_string(),
            display_name: name.to_string(),
            password: "password123".to_string(),
        })
        .await?;
    Ok(user)
}

/// Creates a family owned by `owner` and returns it together with the
/// owner's member row.
pub async fn create_family(
    ctx: &ServiceContext,
    owner: &User,
    name: &str,
) -> anyhow::Result<(Family, Member)> {
    let family = ctx
        .family_service
        .create_family(
            owner,
            CreateFamilyRequest {
                name: name.to_string(),
                description: None,
                profile_image: None,
            },
        )
        .await?;

    let member = ctx
        .member_repo
        .find_by_family_and_user(family.id, owner.id)
        .await?
        .expect("owner member row must exist");

    Ok((family, member))
}

/// Runs `user` through the join-request workflow (submitted, then approved
/// by `approver`) and returns the resulting member row.
pub async fn join_family(
    ctx: &ServiceContext,
    family_id: Uuid,
    user: &User,
    approver_id: Uuid,
) -> anyhow::Result<Member> {
    let request = ctx.join_request_service.submit(family_id, user.id).await?;
    ctx.join_request_service
        .process(family_id, request.id, JoinDecision::Approve, approver_id)
        .await?;

    let member = ctx
        .member_repo
        .find_by_family_and_user(family_id, user.id)
        .await?
        .expect("approved member row must exist");

    Ok(member)
}
