use serde::Serialize;
use sqlx::FromRow;

/// Locale-scoped type tables that share the `(type_id, i18n_locale_id, name)` shape.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TypeTable {
    Event,
    Genre,
    Venue,
    Space,
}

impl TypeTable {
    pub fn table(&self) -> &'static str {
        match self {
            TypeTable::Event => "event_type",
            TypeTable::Genre => "genre_type",
            TypeTable::Venue => "venue_type",
            TypeTable::Space => "space_type",
        }
    }
}

#[derive(Debug, Clone, Serialize, FromRow, PartialEq)]
pub struct LocalizedType {
    pub type_id: i32,
    pub name: String,
    pub locale_id: i32,
    pub iso_639_1: String,
}

#[derive(Debug, Clone, Serialize, FromRow)]
pub struct ImageType {
    pub image_type_id: i32,
    pub image_type_name: String,
    pub image_type_description: Option<String>,
    pub image_locale_id: i32,
}

#[derive(Debug, Clone, Serialize, FromRow)]
pub struct LicenseType {
    pub license_type_id: i32,
    pub license_type_name: String,
    pub license_type_short_name: String,
    pub license_type_url: String,
    pub license_locale_id: i32,
}

#[derive(Debug, Clone, Serialize, FromRow)]
pub struct Locale {
    pub locale_id: i32,
    pub locale_name: String,
    pub locale_code: String,
}

#[derive(Debug, Clone, Serialize, FromRow)]
pub struct Country {
    pub country_code: String,
    pub country_name: String,
    pub country_iso_639_1: String,
}

#[derive(Debug, Clone, Serialize, FromRow)]
pub struct State {
    pub state_code: String,
    pub state_name: String,
    pub state_country_code: String,
}

#[derive(Debug, Clone, Serialize, FromRow)]
pub struct UserRole {
    pub id: i32,
    pub name: String,
    pub organization: bool,
    pub venue: bool,
    pub space: bool,
    pub event: bool,
}
