use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct Family {
    pub id: Uuid,
    pub name: String,
    pub description: Option<String>,
    pub profile_image: Option<String>,
    pub created_by: Uuid,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct CreateFamilyRequest {
    pub name: String,
    pub description: Option<String>,
    pub profile_image: Option<String>,
}

#[derive(Debug, Clone, Deserialize, Default)]
pub struct UpdateFamilyRequest {
    pub name: Option<String>,
    pub description: Option<String>,
    pub profile_image: Option<String>,
}
