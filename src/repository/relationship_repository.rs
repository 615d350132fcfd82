use async_trait::async_trait;
use chrono::{DateTime, NaiveDateTime, Utc};
use sqlx::{FromRow, SqlitePool};
use uuid::Uuid;

use crate::{
    domain::Relationship,
    error::{AppError, Result},
    repository::{
        member_repository::{kinship_to_str, parse_kinship},
        RelationshipRepository,
    },
};

// Database row struct that matches the SQLite schema
#[derive(FromRow)]
struct RelationshipRow {
    id: String,
    family_id: String,
    from_member_id: String,
    to_member_id: String,
    kinship: String,
    kinship_label: Option<String>,
    description: Option<String>,
    created_by: String,
    created_at: NaiveDateTime,
    modified_by: String,
    modified_at: NaiveDateTime,
}

const SELECT_RELATIONSHIPS: &str = r#"
    SELECT id, family_id, from_member_id, to_member_id, kinship, kinship_label,
           description, created_by, created_at, modified_by, modified_at
    FROM relationships
"#;

pub struct SqliteRelationshipRepository {
    pool: SqlitePool,
}

impl SqliteRelationshipRepository {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    fn row_to_relationship(row: RelationshipRow) -> Result<Relationship> {
        let parse = |s: &str| Uuid::parse_str(s).map_err(|e| AppError::Database(e.to_string()));
        Ok(Relationship {
            id: parse(&row.id)?,
            family_id: parse(&row.family_id)?,
            from_member_id: parse(&row.from_member_id)?,
            to_member_id: parse(&row.to_member_id)?,
            kinship: parse_kinship(&row.kinship)?,
            kinship_label: row.kinship_label,
            description: row.description,
            created_by: parse(&row.created_by)?,
            created_at: DateTime::from_naive_utc_and_offset(row.created_at, Utc),
            modified_by: parse(&row.modified_by)?,
            modified_at: DateTime::from_naive_utc_and_offset(row.modified_at, Utc),
        })
    }
}

#[async_trait]
impl RelationshipRepository for SqliteRelationshipRepository {
    async fn upsert(&self, relationship: &Relationship) -> Result<Relationship> {
        // Keyed by (family_id, from_member_id, to_member_id); on conflict the
        // existing row keeps its id and created-by/at, only the declared
        // kinship and description move.
        sqlx::query(
            r#"
            INSERT INTO relationships (
                id, family_id, from_member_id, to_member_id, kinship,
                kinship_label, description, created_by, created_at,
                modified_by, modified_at
            ) VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
            ON CONFLICT(family_id, from_member_id, to_member_id) DO UPDATE SET
                kinship = excluded.kinship,
                kinship_label = excluded.kinship_label,
                description = excluded.description,
                modified_by = excluded.modified_by,
                modified_at = excluded.modified_at
            "#,
        )
        .bind(relationship.id.to_string())
        .bind(relationship.family_id.to_string())
        .bind(relationship.from_member_id.to_string())
        .bind(relationship.to_member_id.to_string())
        .bind(kinship_to_str(relationship.kinship))
        .bind(&relationship.kinship_label)
        .bind(&relationship.description)
        .bind(relationship.created_by.to_string())
        .bind(relationship.created_at.naive_utc())
        .bind(relationship.modified_by.to_string())
        .bind(relationship.modified_at.naive_utc())
        .execute(&self.pool)
        .await
        .map_err(|e| AppError::Database(e.to_string()))?;

        self.find(
            relationship.family_id,
            relationship.from_member_id,
            relationship.to_member_id,
        )
        .await?
        .ok_or_else(|| AppError::Database("Failed to retrieve saved relationship".to_string()))
    }

    async fn find(
        &self,
        family_id: Uuid,
        from_member_id: Uuid,
        to_member_id: Uuid,
    ) -> Result<Option<Relationship>> {
        let row = sqlx::query_as::<_, RelationshipRow>(&format!(
            "{SELECT_RELATIONSHIPS} WHERE family_id = ? AND from_member_id = ? AND to_member_id = ?"
        ))
        .bind(family_id.to_string())
        .bind(from_member_id.to_string())
        .bind(to_member_id.to_string())
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| AppError::Database(e.to_string()))?;

        match row {
            Some(r) => Ok(Some(Self::row_to_relationship(r)?)),
            None => Ok(None),
        }
    }

    async fn list_from(&self, family_id: Uuid, from_member_id: Uuid) -> Result<Vec<Relationship>> {
        let rows = sqlx::query_as::<_, RelationshipRow>(&format!(
            "{SELECT_RELATIONSHIPS} WHERE family_id = ? AND from_member_id = ? ORDER BY created_at ASC"
        ))
        .bind(family_id.to_string())
        .bind(from_member_id.to_string())
        .fetch_all(&self.pool)
        .await
        .map_err(|e| AppError::Database(e.to_string()))?;

        rows.into_iter().map(Self::row_to_relationship).collect()
    }

    async fn list_by_family(&self, family_id: Uuid) -> Result<Vec<Relationship>> {
        let rows = sqlx::query_as::<_, RelationshipRow>(&format!(
            "{SELECT_RELATIONSHIPS} WHERE family_id = ? ORDER BY created_at ASC"
        ))
        .bind(family_id.to_string())
        .fetch_all(&self.pool)
        .await
        .map_err(|e| AppError::Database(e.to_string()))?;

        rows.into_iter().map(Self::row_to_relationship).collect()
    }
}
