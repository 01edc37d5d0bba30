use crate::domain::models::event::{ensure_date_order, EventUpdate, NewEvent, NewEventDate};
use crate::domain::models::space::SpaceInput;
use crate::domain::models::venue::VenueInput;
use crate::error::AppError;
use chrono::{DateTime, NaiveTime, Utc};
use serde::Deserialize;

#[derive(Deserialize)]
pub struct SignupRequest {
    pub first_name: String,
    pub last_name: String,
    pub email_address: String,
    pub username: Option<String>,
    pub password: String,
    pub i18n_locale_id: Option<i32>,
}

#[derive(Deserialize)]
pub struct SigninRequest {
    pub email_address: String,
    pub password: String,
}

#[derive(Deserialize)]
pub struct RefreshRequest {
    pub refresh_token: String,
}

#[derive(Deserialize)]
pub struct UpdateUserRequest {
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub i18n_locale_id: Option<i32>,
    pub password: Option<String>,
}

#[derive(Deserialize)]
pub struct RenewPasswordRequest {
    pub email_address: String,
}

#[derive(Deserialize)]
pub struct ConfirmPasswordRequest {
    pub token: String,
    pub password: String,
}

#[derive(Deserialize)]
pub struct LinkVenueRequest {
    /// Defaults to the calling user.
    pub user_id: Option<i32>,
    pub venue_id: i32,
    pub user_role_id: i32,
}

#[derive(Deserialize)]
pub struct CreateVenueRequest {
    pub organizer_id: i32,
    #[serde(flatten)]
    pub venue: VenueInput,
}

#[derive(Deserialize)]
pub struct CreateSpaceRequest {
    pub venue_id: i32,
    #[serde(flatten)]
    pub space: SpaceInput,
}

#[derive(Deserialize)]
pub struct CreateEventRequest {
    pub organizer_id: i32,
    pub venue_id: i32,
    pub space_id: Option<i32>,
    pub title: String,
    #[serde(default)]
    pub description: String,
    pub date_start: DateTime<Utc>,
    pub date_end: Option<DateTime<Utc>>,
    pub entry_time: Option<NaiveTime>,
    #[serde(default)]
    pub event_type_ids: Vec<i32>,
    #[serde(default)]
    pub genre_type_ids: Vec<i32>,
    pub image_id: Option<i32>,
}

impl CreateEventRequest {
    pub fn into_new_event(self) -> Result<NewEvent, AppError> {
        if self.title.trim().is_empty() {
            return Err(AppError::Validation("Event title must not be empty".into()));
        }
        ensure_date_order(self.date_start, self.date_end)?;

        Ok(NewEvent {
            organizer_id: self.organizer_id,
            venue_id: self.venue_id,
            space_id: self.space_id,
            title: self.title.trim().to_string(),
            description: self.description,
            date: NewEventDate {
                venue_id: None,
                space_id: None,
                date_start: self.date_start,
                date_end: self.date_end,
                entry_time: self.entry_time,
                main_image_id: None,
            },
            event_type_ids: self.event_type_ids,
            genre_type_ids: self.genre_type_ids,
            main_image_id: self.image_id,
        })
    }
}

#[derive(Deserialize)]
pub struct AddEventDateRequest {
    pub venue_id: Option<i32>,
    pub space_id: Option<i32>,
    pub date_start: DateTime<Utc>,
    pub date_end: Option<DateTime<Utc>>,
    pub entry_time: Option<NaiveTime>,
    pub image_id: Option<i32>,
}

impl AddEventDateRequest {
    pub fn into_new_date(self) -> Result<NewEventDate, AppError> {
        ensure_date_order(self.date_start, self.date_end)?;
        Ok(NewEventDate {
            venue_id: self.venue_id,
            space_id: self.space_id,
            date_start: self.date_start,
            date_end: self.date_end,
            entry_time: self.entry_time,
            main_image_id: self.image_id,
        })
    }
}

/// Absent fields keep their stored value; `null` clears `space_id`,
/// `date_end` and `entry_time`.
#[derive(Deserialize, Default)]
pub struct UpdateEventRequest {
    pub title: Option<String>,
    pub description: Option<String>,
    pub venue_id: Option<i32>,
    #[serde(default, with = "::serde_with::rust::double_option")]
    pub space_id: Option<Option<i32>>,
    pub date_start: Option<DateTime<Utc>>,
    #[serde(default, with = "::serde_with::rust::double_option")]
    pub date_end: Option<Option<DateTime<Utc>>>,
    #[serde(default, with = "::serde_with::rust::double_option")]
    pub entry_time: Option<Option<NaiveTime>>,
    pub event_type_ids: Option<Vec<i32>>,
    pub genre_type_ids: Option<Vec<i32>>,
    pub image_id: Option<i32>,
    /// Main image of the addressed date.
    pub date_image_id: Option<i32>,
}

impl UpdateEventRequest {
    pub fn into_update(self) -> Result<EventUpdate, AppError> {
        if self.title.as_deref().is_some_and(|t| t.trim().is_empty()) {
            return Err(AppError::Validation("Event title must not be empty".into()));
        }
        if let (Some(start), Some(end)) = (self.date_start, self.date_end.flatten()) {
            ensure_date_order(start, Some(end))?;
        }

        Ok(EventUpdate {
            title: self.title.map(|t| t.trim().to_string()),
            description: self.description,
            venue_id: self.venue_id,
            space_id: self.space_id,
            date_start: self.date_start,
            date_end: self.date_end,
            entry_time: self.entry_time,
            event_type_ids: self.event_type_ids,
            genre_type_ids: self.genre_type_ids,
            main_image_id: self.image_id,
            date_main_image_id: self.date_image_id,
        })
    }
}

#[derive(Deserialize)]
pub struct LangQuery {
    pub lang: Option<String>,
}

#[derive(Deserialize)]
pub struct NameQuery {
    pub name: String,
}

#[derive(Deserialize)]
pub struct CodeQuery {
    pub code: String,
}

#[derive(Deserialize)]
pub struct SpaceListQuery {
    pub venue_id: Option<i32>,
}

#[derive(Deserialize)]
pub struct BoundsQuery {
    pub xmin: f64,
    pub ymin: f64,
    pub xmax: f64,
    pub ymax: f64,
}

#[derive(Deserialize)]
pub struct FuzzyQuery {
    #[serde(default)]
    pub q: String,
}
