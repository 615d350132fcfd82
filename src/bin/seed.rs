use chrono::NaiveDate;
use sqlx::sqlite::SqlitePoolOptions;

use kindred::{
    config::Settings,
    domain::{
        CreateFamilyRequest, CreateManualMemberRequest, CreateUserRequest, JoinDecision, Kinship,
        UpsertRelationshipRequest,
    },
    service::ServiceContext,
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    println!("🌱 Starting database seeding...");

    // Initialize database connection
    let database_url =
        std::env::var("DATABASE_URL").unwrap_or_else(|_| "sqlite:kindred.db".to_string());

    let db_pool = SqlitePoolOptions::new()
        .max_connections(5)
        .connect(&database_url)
        .await?;

    // Run migrations first
    println!("📋 Running migrations...");
    sqlx::migrate!("./migrations").run(&db_pool).await?;

    let settings = Settings::default();
    let ctx = ServiceContext::new(&settings, db_pool);

    // Seed users
    println!("👥 Creating users...");

    let haeun = ctx
        .user_repo
        .create(CreateUserRequest {
            email: "haeun@example.com".to_string(),
            display_name: "Haeun Kim".to_string(),
            password: "password123".to_string(),
        })
        .await?;

    let minsu = ctx
        .user_repo
        .create(CreateUserRequest {
            email: "minsu@example.com".to_string(),
            display_name: "Minsu Kim".to_string(),
            password: "password123".to_string(),
        })
        .await?;

    let sora = ctx
        .user_repo
        .create(CreateUserRequest {
            email: "sora@example.com".to_string(),
            display_name: "Sora Lee".to_string(),
            password: "password123".to_string(),
        })
        .await?;

    println!("  ✅ Created 3 users (password for all: password123)");

    // Haeun founds the family and becomes its owner
    println!("🏠 Creating family...");

    let family = ctx
        .family_service
        .create_family(
            &haeun,
            CreateFamilyRequest {
                name: "The Kims".to_string(),
                description: Some("Three generations under one roof".to_string()),
                profile_image: None,
            },
        )
        .await?;

    println!("  ✅ Created family '{}' owned by {}", family.name, haeun.display_name);

    // Minsu joins through the request workflow
    let request = ctx
        .join_request_service
        .submit(family.id, minsu.id)
        .await?;
    ctx.join_request_service
        .process(family.id, request.id, JoinDecision::Approve, haeun.id)
        .await?;

    println!("  ✅ {} joined via approved join request", minsu.display_name);

    // Sora's request stays pending for demo purposes
    ctx.join_request_service.submit(family.id, sora.id).await?;
    println!("  ✅ Pending join request from {}", sora.display_name);

    // A manually-registered member without an account
    let grandma = ctx
        .member_service
        .register_manual(
            family.id,
            haeun.id,
            CreateManualMemberRequest {
                name: "Grandma Kim".to_string(),
                profile_image: None,
                birth_date: NaiveDate::from_ymd_opt(1948, 3, 2),
                birth_calendar: Default::default(),
                country: Some("KR".to_string()),
                kinship: Kinship::Grandmother,
                kinship_label: None,
            },
        )
        .await?;

    println!("  ✅ Manually registered '{}'", grandma.name);

    // Declare a couple of relationship edges
    println!("🌳 Declaring relationships...");

    let owner_member = ctx
        .member_repo
        .find_by_family_and_user(family.id, haeun.id)
        .await?
        .expect("owner member row must exist");
    let minsu_member = ctx
        .member_repo
        .find_by_family_and_user(family.id, minsu.id)
        .await?
        .expect("approved member row must exist");

    ctx.relationship_service
        .upsert(
            family.id,
            haeun.id,
            owner_member.id,
            UpsertRelationshipRequest {
                to_member_id: minsu_member.id,
                kinship: Kinship::Brother,
                kinship_label: None,
                description: Some("Younger brother".to_string()),
            },
        )
        .await?;

    ctx.relationship_service
        .upsert(
            family.id,
            haeun.id,
            owner_member.id,
            UpsertRelationshipRequest {
                to_member_id: grandma.id,
                kinship: Kinship::Grandmother,
                kinship_label: None,
                description: None,
            },
        )
        .await?;

    println!("  ✅ Declared 2 relationships");

    println!("\n✨ Database seeding complete!");
    println!("\n📝 Test credentials:");
    println!("  Users: haeun@example.com, minsu@example.com, sora@example.com");
    println!("  Password for all test users: password123");
    println!("\n  Family id: {}", family.id);
    println!("  Center member id (owner): {}", owner_member.id);

    Ok(())
}
