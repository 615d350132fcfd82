use async_trait::async_trait;
use chrono::{DateTime, NaiveDateTime, Utc};
use sqlx::{FromRow, SqlitePool};
use uuid::Uuid;

use crate::{
    domain::{JoinRequest, JoinRequestStatus, Member},
    error::{AppError, Result},
    repository::{member_repository, JoinRequestRepository},
};

// Database row struct that matches the SQLite schema
#[derive(FromRow)]
struct JoinRequestRow {
    id: String,
    family_id: String,
    requester_id: String,
    status: String,
    created_at: NaiveDateTime,
    reviewed_by: Option<String>,
    reviewed_at: Option<NaiveDateTime>,
}

const SELECT_REQUESTS: &str = r#"
    SELECT id, family_id, requester_id, status, created_at, reviewed_by, reviewed_at
    FROM join_requests
"#;

pub struct SqliteJoinRequestRepository {
    pool: SqlitePool,
}

impl SqliteJoinRequestRepository {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    fn row_to_request(row: JoinRequestRow) -> Result<JoinRequest> {
        Ok(JoinRequest {
            id: Uuid::parse_str(&row.id).map_err(|e| AppError::Database(e.to_string()))?,
            family_id: Uuid::parse_str(&row.family_id)
                .map_err(|e| AppError::Database(e.to_string()))?,
            requester_id: Uuid::parse_str(&row.requester_id)
                .map_err(|e| AppError::Database(e.to_string()))?,
            status: Self::parse_status(&row.status)?,
            created_at: DateTime::from_naive_utc_and_offset(row.created_at, Utc),
            reviewed_by: row
                .reviewed_by
                .as_deref()
                .map(Uuid::parse_str)
                .transpose()
                .map_err(|e| AppError::Database(e.to_string()))?,
            reviewed_at: row
                .reviewed_at
                .map(|dt| DateTime::from_naive_utc_and_offset(dt, Utc)),
        })
    }

    fn parse_status(s: &str) -> Result<JoinRequestStatus> {
        match s {
            "Pending" => Ok(JoinRequestStatus::Pending),
            "Approved" => Ok(JoinRequestStatus::Approved),
            "Rejected" => Ok(JoinRequestStatus::Rejected),
            _ => Err(AppError::Database(format!(
                "Invalid join request status: {}",
                s
            ))),
        }
    }

    fn status_to_str(status: JoinRequestStatus) -> &'static str {
        match status {
            JoinRequestStatus::Pending => "Pending",
            JoinRequestStatus::Approved => "Approved",
            JoinRequestStatus::Rejected => "Rejected",
        }
    }
}

#[async_trait]
impl JoinRequestRepository for SqliteJoinRequestRepository {
    async fn create(&self, request: &JoinRequest) -> Result<JoinRequest> {
        sqlx::query(
            r#"
            INSERT INTO join_requests (id, family_id, requester_id, status, created_at)
            VALUES (?, ?, ?, ?, ?)
            "#,
        )
        .bind(request.id.to_string())
        .bind(request.family_id.to_string())
        .bind(request.requester_id.to_string())
        .bind(Self::status_to_str(request.status))
        .bind(request.created_at.naive_utc())
        .execute(&self.pool)
        .await
        .map_err(|e| {
            // The partial unique index on non-terminal requests serializes
            // concurrent submissions for the same (family, requester) pair.
            if e.to_string().contains("UNIQUE") {
                AppError::Conflict("A join request for this family is already open".to_string())
            } else {
                AppError::Database(e.to_string())
            }
        })?;

        self.find_by_id(request.id)
            .await?
            .ok_or_else(|| AppError::Database("Failed to retrieve created join request".to_string()))
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<JoinRequest>> {
        let row = sqlx::query_as::<_, JoinRequestRow>(&format!("{SELECT_REQUESTS} WHERE id = ?"))
            .bind(id.to_string())
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;

        match row {
            Some(r) => Ok(Some(Self::row_to_request(r)?)),
            None => Ok(None),
        }
    }

    async fn find_active_by_family_and_requester(
        &self,
        family_id: Uuid,
        requester_id: Uuid,
    ) -> Result<Option<JoinRequest>> {
        let row = sqlx::query_as::<_, JoinRequestRow>(&format!(
            "{SELECT_REQUESTS} WHERE family_id = ? AND requester_id = ? AND status IN ('Pending', 'Approved')"
        ))
        .bind(family_id.to_string())
        .bind(requester_id.to_string())
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| AppError::Database(e.to_string()))?;

        match row {
            Some(r) => Ok(Some(Self::row_to_request(r)?)),
            None => Ok(None),
        }
    }

    async fn list_by_family(&self, family_id: Uuid) -> Result<Vec<JoinRequest>> {
        let rows = sqlx::query_as::<_, JoinRequestRow>(&format!(
            "{SELECT_REQUESTS} WHERE family_id = ? ORDER BY created_at DESC"
        ))
        .bind(family_id.to_string())
        .fetch_all(&self.pool)
        .await
        .map_err(|e| AppError::Database(e.to_string()))?;

        rows.into_iter().map(Self::row_to_request).collect()
    }

    async fn reject(
        &self,
        id: Uuid,
        reviewer_id: Uuid,
        reviewed_at: DateTime<Utc>,
    ) -> Result<JoinRequest> {
        sqlx::query(
            r#"
            UPDATE join_requests
            SET status = ?, reviewed_by = ?, reviewed_at = ?
            WHERE id = ?
            "#,
        )
        .bind(Self::status_to_str(JoinRequestStatus::Rejected))
        .bind(reviewer_id.to_string())
        .bind(reviewed_at.naive_utc())
        .bind(id.to_string())
        .execute(&self.pool)
        .await
        .map_err(|e| AppError::Database(e.to_string()))?;

        self.find_by_id(id)
            .await?
            .ok_or_else(|| AppError::NotFound("Join request not found".to_string()))
    }

    async fn approve(
        &self,
        id: Uuid,
        reviewer_id: Uuid,
        reviewed_at: DateTime<Utc>,
        new_member: &Member,
    ) -> Result<JoinRequest> {
        // The approval's dual effect must not be observable half-applied:
        // request transition and member insert share one transaction.
        let mut tx = self
            .pool
            .begin()
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;

        sqlx::query(
            r#"
            UPDATE join_requests
            SET status = ?, reviewed_by = ?, reviewed_at = ?
            WHERE id = ?
            "#,
        )
        .bind(Self::status_to_str(JoinRequestStatus::Approved))
        .bind(reviewer_id.to_string())
        .bind(reviewed_at.naive_utc())
        .bind(id.to_string())
        .execute(&mut *tx)
        .await
        .map_err(|e| AppError::Database(e.to_string()))?;

        member_repository::insert_member_tx(&mut tx, new_member).await?;

        tx.commit()
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;

        self.find_by_id(id)
            .await?
            .ok_or_else(|| AppError::NotFound("Join request not found".to_string()))
    }
}
