use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

#[derive(Debug, Serialize, Deserialize, FromRow, Clone)]
pub struct Space {
    pub id: i32,
    pub venue_id: i32,
    pub name: String,
    pub total_capacity: Option<i32>,
    pub seating_capacity: Option<i32>,
    pub space_type_id: Option<i32>,
    pub building_level: Option<i32>,
    pub url: Option<String>,
    pub created_at: DateTime<Utc>,
    pub modified_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Deserialize, Clone, Default)]
pub struct SpaceInput {
    pub name: String,
    pub total_capacity: Option<i32>,
    pub seating_capacity: Option<i32>,
    pub space_type_id: Option<i32>,
    pub building_level: Option<i32>,
    pub url: Option<String>,
}
