use chrono::{DateTime, Utc};
use serde::Serialize;
use sqlx::FromRow;

#[derive(Debug, Serialize, FromRow, Clone)]
pub struct User {
    pub id: i32,
    pub first_name: String,
    pub last_name: String,
    pub email_address: String,
    pub username: String,
    #[serde(skip_serializing)]
    pub password_hash: String,
    pub disabled: bool,
    pub i18n_locale_id: Option<i32>,
    pub created_at: DateTime<Utc>,
    pub modified_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone)]
pub struct NewUser {
    pub first_name: String,
    pub last_name: String,
    pub email_address: String,
    pub username: String,
    pub password_hash: String,
    pub i18n_locale_id: Option<i32>,
}

#[derive(Debug, Clone, Default)]
pub struct UserUpdate {
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub i18n_locale_id: Option<i32>,
    pub password_hash: Option<String>,
}

/// Role flags a user holds on one organizer.
#[derive(Debug, Clone, Copy, FromRow, Default, PartialEq, Eq)]
pub struct OrganizerPermissions {
    pub organization: bool,
    pub venue: bool,
    pub space: bool,
    pub event: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Permission {
    Organization,
    Venue,
    Space,
    Event,
}

impl OrganizerPermissions {
    pub fn allows(&self, permission: Permission) -> bool {
        match permission {
            Permission::Organization => self.organization,
            Permission::Venue => self.venue,
            Permission::Space => self.space,
            Permission::Event => self.event,
        }
    }
}

impl Permission {
    pub fn label(&self) -> &'static str {
        match self {
            Permission::Organization => "organization",
            Permission::Venue => "venue",
            Permission::Space => "space",
            Permission::Event => "event",
        }
    }
}
