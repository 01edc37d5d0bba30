use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

#[derive(Debug, Serialize, Deserialize, FromRow, Clone)]
pub struct Venue {
    pub id: i32,
    pub organizer_id: Option<i32>,
    pub name: String,
    pub street: Option<String>,
    pub house_number: Option<String>,
    pub postal_code: Option<String>,
    pub city: Option<String>,
    pub country_code: Option<String>,
    pub state_code: Option<String>,
    pub longitude: Option<f64>,
    pub latitude: Option<f64>,
    pub opened_at: Option<NaiveDate>,
    pub closed_at: Option<NaiveDate>,
    pub created_at: DateTime<Utc>,
    pub modified_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Deserialize, Clone, Default)]
pub struct VenueInput {
    pub name: String,
    pub street: Option<String>,
    pub house_number: Option<String>,
    pub postal_code: Option<String>,
    pub city: Option<String>,
    pub country_code: Option<String>,
    pub state_code: Option<String>,
    pub longitude: Option<f64>,
    pub latitude: Option<f64>,
    pub opened_at: Option<NaiveDate>,
    pub closed_at: Option<NaiveDate>,
    #[serde(default)]
    pub venue_type_ids: Vec<i32>,
}

#[derive(Debug, Serialize, Clone)]
pub struct VenueDetail {
    #[serde(flatten)]
    pub venue: Venue,
    pub venue_type_ids: Vec<i32>,
    pub venue_types: Vec<String>,
}

#[derive(Debug, Serialize, FromRow, Clone)]
pub struct UserVenueRole {
    pub venue_id: i32,
    pub venue_name: String,
    pub user_role_id: i32,
    pub user_role_name: String,
}
