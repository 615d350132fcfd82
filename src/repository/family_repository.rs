use async_trait::async_trait;
use chrono::{DateTime, NaiveDateTime, Utc};
use sqlx::{FromRow, SqlitePool};
use uuid::Uuid;

use crate::{
    domain::{Family, Member, UpdateFamilyRequest},
    error::{AppError, Result},
    repository::{member_repository, FamilyRepository},
};

// Database row struct that matches the SQLite schema
#[derive(FromRow)]
struct FamilyRow {
    id: String,
    name: String,
    description: Option<String>,
    profile_image: Option<String>,
    created_by: String,
    created_at: NaiveDateTime,
    updated_at: NaiveDateTime,
}

const SELECT_FAMILIES: &str = r#"
    SELECT id, name, description, profile_image, created_by, created_at, updated_at
    FROM families
"#;

pub struct SqliteFamilyRepository {
    pool: SqlitePool,
}

impl SqliteFamilyRepository {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    fn row_to_family(row: FamilyRow) -> Result<Family> {
        Ok(Family {
            id: Uuid::parse_str(&row.id).map_err(|e| AppError::Database(e.to_string()))?,
            name: row.name,
            description: row.description,
            profile_image: row.profile_image,
            created_by: Uuid::parse_str(&row.created_by)
                .map_err(|e| AppError::Database(e.to_string()))?,
            created_at: DateTime::from_naive_utc_and_offset(row.created_at, Utc),
            updated_at: DateTime::from_naive_utc_and_offset(row.updated_at, Utc),
        })
    }
}

#[async_trait]
impl FamilyRepository for SqliteFamilyRepository {
    async fn create_with_owner(&self, family: &Family, owner: &Member) -> Result<Family> {
        let mut tx = self
            .pool
            .begin()
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;

        sqlx::query(
            r#"
            INSERT INTO families (id, name, description, profile_image, created_by, created_at, updated_at)
            VALUES (?, ?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(family.id.to_string())
        .bind(&family.name)
        .bind(&family.description)
        .bind(&family.profile_image)
        .bind(family.created_by.to_string())
        .bind(family.created_at.naive_utc())
        .bind(family.updated_at.naive_utc())
        .execute(&mut *tx)
        .await
        .map_err(|e| AppError::Database(e.to_string()))?;

        member_repository::insert_member_tx(&mut tx, owner).await?;

        tx.commit()
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;

        self.find_by_id(family.id)
            .await?
            .ok_or_else(|| AppError::Database("Failed to retrieve created family".to_string()))
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<Family>> {
        let row = sqlx::query_as::<_, FamilyRow>(&format!("{SELECT_FAMILIES} WHERE id = ?"))
            .bind(id.to_string())
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;

        match row {
            Some(r) => Ok(Some(Self::row_to_family(r)?)),
            None => Ok(None),
        }
    }

    async fn update(&self, id: Uuid, update: UpdateFamilyRequest) -> Result<Family> {
        let now = Utc::now();

        sqlx::query(
            r#"
            UPDATE families
            SET name = COALESCE(?, name),
                description = COALESCE(?, description),
                profile_image = COALESCE(?, profile_image),
                updated_at = ?
            WHERE id = ?
            "#,
        )
        .bind(&update.name)
        .bind(&update.description)
        .bind(&update.profile_image)
        .bind(now.naive_utc())
        .bind(id.to_string())
        .execute(&self.pool)
        .await
        .map_err(|e| AppError::Database(e.to_string()))?;

        self.find_by_id(id)
            .await?
            .ok_or_else(|| AppError::NotFound("Family not found".to_string()))
    }

    async fn list_for_user(&self, user_id: Uuid) -> Result<Vec<Family>> {
        let rows = sqlx::query_as::<_, FamilyRow>(
            r#"
            SELECT f.id, f.name, f.description, f.profile_image, f.created_by,
                   f.created_at, f.updated_at
            FROM families f
            INNER JOIN members m ON m.family_id = f.id
            WHERE m.user_id = ?
            ORDER BY f.created_at ASC
            "#,
        )
        .bind(user_id.to_string())
        .fetch_all(&self.pool)
        .await
        .map_err(|e| AppError::Database(e.to_string()))?;

        rows.into_iter().map(Self::row_to_family).collect()
    }
}
