use async_trait::async_trait;
use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use sqlx::{FromRow, Sqlite, SqlitePool, Transaction};
use uuid::Uuid;

use crate::{
    domain::{BirthCalendar, Kinship, Member, MemberRole, MemberStatus},
    error::{AppError, Result},
    repository::MemberRepository,
};

// Database row struct that matches the SQLite schema
#[derive(FromRow)]
struct MemberRow {
    id: String,
    family_id: String,
    user_id: Option<String>,
    name: String,
    profile_image: Option<String>,
    birth_date: Option<NaiveDate>,
    birth_calendar: String,
    country: Option<String>,
    kinship: String,
    kinship_label: Option<String>,
    role: String,
    status: String,
    created_by: String,
    created_at: NaiveDateTime,
    modified_by: String,
    modified_at: NaiveDateTime,
}

const SELECT_MEMBERS: &str = r#"
    SELECT id, family_id, user_id, name, profile_image, birth_date,
           birth_calendar, country, kinship, kinship_label, role, status,
           created_by, created_at, modified_by, modified_at
    FROM members
"#;

pub struct SqliteMemberRepository {
    pool: SqlitePool,
}

impl SqliteMemberRepository {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }
}

fn parse_uuid(s: &str) -> Result<Uuid> {
    Uuid::parse_str(s).map_err(|e| AppError::Database(e.to_string()))
}

fn row_to_member(row: MemberRow) -> Result<Member> {
    Ok(Member {
        id: parse_uuid(&row.id)?,
        family_id: parse_uuid(&row.family_id)?,
        user_id: row.user_id.as_deref().map(parse_uuid).transpose()?,
        name: row.name,
        profile_image: row.profile_image,
        birth_date: row.birth_date,
        birth_calendar: parse_birth_calendar(&row.birth_calendar)?,
        country: row.country,
        kinship: parse_kinship(&row.kinship)?,
        kinship_label: row.kinship_label,
        role: parse_member_role(&row.role)?,
        status: parse_member_status(&row.status)?,
        created_by: parse_uuid(&row.created_by)?,
        created_at: DateTime::from_naive_utc_and_offset(row.created_at, Utc),
        modified_by: parse_uuid(&row.modified_by)?,
        modified_at: DateTime::from_naive_utc_and_offset(row.modified_at, Utc),
    })
}

pub(crate) fn parse_member_role(s: &str) -> Result<MemberRole> {
    match s {
        "Owner" => Ok(MemberRole::Owner),
        "Admin" => Ok(MemberRole::Admin),
        "Member" => Ok(MemberRole::Member),
        _ => Err(AppError::Database(format!("Invalid member role: {}", s))),
    }
}

pub(crate) fn member_role_to_str(role: MemberRole) -> &'static str {
    match role {
        MemberRole::Owner => "Owner",
        MemberRole::Admin => "Admin",
        MemberRole::Member => "Member",
    }
}

pub(crate) fn parse_member_status(s: &str) -> Result<MemberStatus> {
    match s {
        "Active" => Ok(MemberStatus::Active),
        "Suspended" => Ok(MemberStatus::Suspended),
        "Inactive" => Ok(MemberStatus::Inactive),
        "Banned" => Ok(MemberStatus::Banned),
        _ => Err(AppError::Database(format!("Invalid member status: {}", s))),
    }
}

pub(crate) fn member_status_to_str(status: MemberStatus) -> &'static str {
    match status {
        MemberStatus::Active => "Active",
        MemberStatus::Suspended => "Suspended",
        MemberStatus::Inactive => "Inactive",
        MemberStatus::Banned => "Banned",
    }
}

pub(crate) fn parse_birth_calendar(s: &str) -> Result<BirthCalendar> {
    match s {
        "Solar" => Ok(BirthCalendar::Solar),
        "Lunar" => Ok(BirthCalendar::Lunar),
        _ => Err(AppError::Database(format!("Invalid birth calendar: {}", s))),
    }
}

pub(crate) fn birth_calendar_to_str(calendar: BirthCalendar) -> &'static str {
    match calendar {
        BirthCalendar::Solar => "Solar",
        BirthCalendar::Lunar => "Lunar",
    }
}

pub(crate) fn parse_kinship(s: &str) -> Result<Kinship> {
    match s {
        "Me" => Ok(Kinship::Me),
        "Father" => Ok(Kinship::Father),
        "Mother" => Ok(Kinship::Mother),
        "Son" => Ok(Kinship::Son),
        "Daughter" => Ok(Kinship::Daughter),
        "Brother" => Ok(Kinship::Brother),
        "Sister" => Ok(Kinship::Sister),
        "Grandfather" => Ok(Kinship::Grandfather),
        "Grandmother" => Ok(Kinship::Grandmother),
        "Grandson" => Ok(Kinship::Grandson),
        "Granddaughter" => Ok(Kinship::Granddaughter),
        "Husband" => Ok(Kinship::Husband),
        "Wife" => Ok(Kinship::Wife),
        "Uncle" => Ok(Kinship::Uncle),
        "Aunt" => Ok(Kinship::Aunt),
        "Nephew" => Ok(Kinship::Nephew),
        "Niece" => Ok(Kinship::Niece),
        "Cousin" => Ok(Kinship::Cousin),
        "Pet" => Ok(Kinship::Pet),
        "Custom" => Ok(Kinship::Custom),
        _ => Err(AppError::Database(format!("Invalid kinship: {}", s))),
    }
}

pub(crate) fn kinship_to_str(kinship: Kinship) -> &'static str {
    match kinship {
        Kinship::Me => "Me",
        Kinship::Father => "Father",
        Kinship::Mother => "Mother",
        Kinship::Son => "Son",
        Kinship::Daughter => "Daughter",
        Kinship::Brother => "Brother",
        Kinship::Sister => "Sister",
        Kinship::Grandfather => "Grandfather",
        Kinship::Grandmother => "Grandmother",
        Kinship::Grandson => "Grandson",
        Kinship::Granddaughter => "Granddaughter",
        Kinship::Husband => "Husband",
        Kinship::Wife => "Wife",
        Kinship::Uncle => "Uncle",
        Kinship::Aunt => "Aunt",
        Kinship::Nephew => "Nephew",
        Kinship::Niece => "Niece",
        Kinship::Cousin => "Cousin",
        Kinship::Pet => "Pet",
        Kinship::Custom => "Custom",
    }
}

/// Inserts a member row inside an open transaction. Shared with the
/// join-request approval path, which must create the member and flip the
/// request in the same transaction.
pub(crate) async fn insert_member_tx(
    tx: &mut Transaction<'_, Sqlite>,
    member: &Member,
) -> Result<()> {
    sqlx::query(
        r#"
        INSERT INTO members (
            id, family_id, user_id, name, profile_image, birth_date,
            birth_calendar, country, kinship, kinship_label, role, status,
            created_by, created_at, modified_by, modified_at
        ) VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
        "#,
    )
    .bind(member.id.to_string())
    .bind(member.family_id.to_string())
    .bind(member.user_id.map(|id| id.to_string()))
    .bind(&member.name)
    .bind(&member.profile_image)
    .bind(member.birth_date)
    .bind(birth_calendar_to_str(member.birth_calendar))
    .bind(&member.country)
    .bind(kinship_to_str(member.kinship))
    .bind(&member.kinship_label)
    .bind(member_role_to_str(member.role))
    .bind(member_status_to_str(member.status))
    .bind(member.created_by.to_string())
    .bind(member.created_at.naive_utc())
    .bind(member.modified_by.to_string())
    .bind(member.modified_at.naive_utc())
    .execute(&mut **tx)
    .await
    .map_err(|e| AppError::Database(e.to_string()))?;

    Ok(())
}

#[async_trait]
impl MemberRepository for SqliteMemberRepository {
    async fn save(&self, member: &Member) -> Result<Member> {
        // Upsert keyed by id. family_id, user_id and created-by/at are
        // immutable: the conflict branch deliberately leaves them alone.
        sqlx::query(
            r#"
            INSERT INTO members (
                id, family_id, user_id, name, profile_image, birth_date,
                birth_calendar, country, kinship, kinship_label, role, status,
                created_by, created_at, modified_by, modified_at
            ) VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
            ON CONFLICT(id) DO UPDATE SET
                name = excluded.name,
                profile_image = excluded.profile_image,
                birth_date = excluded.birth_date,
                birth_calendar = excluded.birth_calendar,
                country = excluded.country,
                kinship = excluded.kinship,
                kinship_label = excluded.kinship_label,
                role = excluded.role,
                status = excluded.status,
                modified_by = excluded.modified_by,
                modified_at = excluded.modified_at
            "#,
        )
        .bind(member.id.to_string())
        .bind(member.family_id.to_string())
        .bind(member.user_id.map(|id| id.to_string()))
        .bind(&member.name)
        .bind(&member.profile_image)
        .bind(member.birth_date)
        .bind(birth_calendar_to_str(member.birth_calendar))
        .bind(&member.country)
        .bind(kinship_to_str(member.kinship))
        .bind(&member.kinship_label)
        .bind(member_role_to_str(member.role))
        .bind(member_status_to_str(member.status))
        .bind(member.created_by.to_string())
        .bind(member.created_at.naive_utc())
        .bind(member.modified_by.to_string())
        .bind(member.modified_at.naive_utc())
        .execute(&self.pool)
        .await
        .map_err(|e| AppError::Database(e.to_string()))?;

        self.find_by_id(member.id)
            .await?
            .ok_or_else(|| AppError::Database("Failed to retrieve saved member".to_string()))
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<Member>> {
        let id_str = id.to_string();
        let row = sqlx::query_as::<_, MemberRow>(&format!("{SELECT_MEMBERS} WHERE id = ?"))
            .bind(id_str)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;

        match row {
            Some(r) => Ok(Some(row_to_member(r)?)),
            None => Ok(None),
        }
    }

    async fn find_by_family_and_user(
        &self,
        family_id: Uuid,
        user_id: Uuid,
    ) -> Result<Option<Member>> {
        let row = sqlx::query_as::<_, MemberRow>(&format!(
            "{SELECT_MEMBERS} WHERE family_id = ? AND user_id = ?"
        ))
        .bind(family_id.to_string())
        .bind(user_id.to_string())
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| AppError::Database(e.to_string()))?;

        match row {
            Some(r) => Ok(Some(row_to_member(r)?)),
            None => Ok(None),
        }
    }

    async fn list_by_family(&self, family_id: Uuid) -> Result<Vec<Member>> {
        let rows = sqlx::query_as::<_, MemberRow>(&format!(
            "{SELECT_MEMBERS} WHERE family_id = ? ORDER BY created_at ASC"
        ))
        .bind(family_id.to_string())
        .fetch_all(&self.pool)
        .await
        .map_err(|e| AppError::Database(e.to_string()))?;

        rows.into_iter().map(row_to_member).collect()
    }

    async fn count_active_families(&self, user_id: Uuid) -> Result<i64> {
        let count = sqlx::query_scalar::<_, i64>(
            "SELECT COUNT(*) FROM members WHERE user_id = ? AND status = ?",
        )
        .bind(user_id.to_string())
        .bind(member_status_to_str(MemberStatus::Active))
        .fetch_one(&self.pool)
        .await
        .map_err(|e| AppError::Database(e.to_string()))?;

        Ok(count)
    }
}
