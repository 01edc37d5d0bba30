use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

#[derive(Debug, Serialize, Deserialize, FromRow, Clone)]
pub struct Image {
    pub id: i32,
    pub origin_name: String,
    pub source_name: String,
    pub mime_type: String,
    pub license_type_id: Option<i32>,
    pub image_type_id: Option<i32>,
    pub alt_text: Option<String>,
    pub caption: Option<String>,
    pub copyright: Option<String>,
    pub created_by: Option<String>,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Deserialize, Clone)]
pub struct ImageInput {
    pub origin_name: String,
    pub source_name: String,
    pub mime_type: String,
    pub license_type_id: Option<i32>,
    pub image_type_id: Option<i32>,
    pub alt_text: Option<String>,
    pub caption: Option<String>,
    pub copyright: Option<String>,
    pub created_by: Option<String>,
}
