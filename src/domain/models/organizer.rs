use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

#[derive(Debug, Serialize, Deserialize, FromRow, Clone)]
pub struct Organizer {
    pub id: i32,
    pub name: String,
    pub description: Option<String>,
    pub contact_email: Option<String>,
    pub contact_phone: Option<String>,
    pub website_url: Option<String>,
    pub street: Option<String>,
    pub house_number: Option<String>,
    pub postal_code: Option<String>,
    pub city: Option<String>,
    pub country: Option<String>,
    pub created_at: DateTime<Utc>,
    pub modified_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Deserialize, Clone)]
pub struct OrganizerInput {
    pub name: String,
    pub description: Option<String>,
    pub contact_email: Option<String>,
    pub contact_phone: Option<String>,
    pub website_url: Option<String>,
    pub street: Option<String>,
    pub house_number: Option<String>,
    pub postal_code: Option<String>,
    pub city: Option<String>,
    pub country: Option<String>,
}

#[derive(Debug, Serialize, FromRow, Clone, PartialEq)]
pub struct OrganizerStats {
    pub organizer_id: i32,
    pub count_venues: i64,
    pub count_spaces: i64,
    pub count_events: i64,
}

#[derive(Debug, Serialize, FromRow, Clone)]
pub struct UserOrganizer {
    pub organizer_id: i32,
    pub organizer_name: String,
    pub user_role_id: i32,
    pub can_edit: bool,
}
