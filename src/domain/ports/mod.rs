use crate::domain::models::{
    event::{Event, EventDate, EventDetail, EventOccurrence, EventQuery, EventUpdate, NewEvent, NewEventDate},
    geo::{Bbox, VenueName, VenuePoint},
    image::{Image, ImageInput},
    lookup::{Country, ImageType, LicenseType, Locale, LocalizedType, State, TypeTable, UserRole},
    organizer::{Organizer, OrganizerInput, OrganizerStats, UserOrganizer},
    space::{Space, SpaceInput},
    user::{NewUser, OrganizerPermissions, User, UserUpdate},
    venue::{UserVenueRole, Venue, VenueDetail, VenueInput},
};
use crate::error::AppError;
use async_trait::async_trait;
use chrono::{DateTime, Utc};

#[async_trait]
pub trait LookupRepository: Send + Sync {
    async fn list_types(&self, table: TypeTable, lang: Option<&str>) -> Result<Vec<LocalizedType>, AppError>;
    async fn list_image_types(&self, lang: Option<&str>) -> Result<Vec<ImageType>, AppError>;
    async fn list_license_types(&self, lang: Option<&str>) -> Result<Vec<LicenseType>, AppError>;
    async fn list_locales(&self) -> Result<Vec<Locale>, AppError>;
    async fn list_user_roles(&self) -> Result<Vec<UserRole>, AppError>;
    async fn list_countries(&self, lang: Option<&str>) -> Result<Vec<Country>, AppError>;
    async fn find_country_by_name(&self, name: &str) -> Result<Option<Country>, AppError>;
    async fn find_countries_by_code(&self, code: &str) -> Result<Vec<Country>, AppError>;
    async fn list_states(&self) -> Result<Vec<State>, AppError>;
    async fn find_state_by_name(&self, name: &str) -> Result<Option<State>, AppError>;
    async fn find_state_by_code(&self, code: &str) -> Result<Option<State>, AppError>;
}

#[async_trait]
pub trait OrganizerRepository: Send + Sync {
    /// Inserts the organizer and links `owner_id` to it with `role_id` in one transaction.
    async fn create(&self, input: &OrganizerInput, owner_id: i32, role_id: i32) -> Result<Organizer, AppError>;
    async fn find_by_id(&self, id: i32) -> Result<Option<Organizer>, AppError>;
    async fn list(&self) -> Result<Vec<Organizer>, AppError>;
    async fn update(&self, id: i32, input: &OrganizerInput) -> Result<Organizer, AppError>;
    async fn delete(&self, id: i32) -> Result<(), AppError>;
    async fn stats(&self, id: i32, now: DateTime<Utc>) -> Result<OrganizerStats, AppError>;
    async fn list_for_user(&self, user_id: i32) -> Result<Vec<UserOrganizer>, AppError>;
    async fn permissions(&self, user_id: i32, organizer_id: i32) -> Result<Option<OrganizerPermissions>, AppError>;
}

#[async_trait]
pub trait VenueRepository: Send + Sync {
    async fn create(&self, organizer_id: i32, input: &VenueInput) -> Result<Venue, AppError>;
    async fn find_by_id(&self, id: i32) -> Result<Option<Venue>, AppError>;
    async fn find_detail(&self, id: i32, lang: &str) -> Result<Option<VenueDetail>, AppError>;
    async fn list(&self) -> Result<Vec<Venue>, AppError>;
    async fn update(&self, id: i32, input: &VenueInput) -> Result<Venue, AppError>;
    async fn delete(&self, id: i32) -> Result<(), AppError>;
    async fn within_bbox(&self, bbox: &Bbox) -> Result<Vec<VenuePoint>, AppError>;
    /// Up to ten venues matching `query`: prefix, then substring, then trigram similarity.
    async fn search_names(&self, query: &str) -> Result<Vec<VenueName>, AppError>;
    async fn link_user(&self, user_id: i32, venue_id: i32, role_id: i32) -> Result<(), AppError>;
    async fn list_user_roles(&self, user_id: i32) -> Result<Vec<UserVenueRole>, AppError>;
}

#[async_trait]
pub trait SpaceRepository: Send + Sync {
    async fn create(&self, venue_id: i32, input: &SpaceInput) -> Result<Space, AppError>;
    async fn find_by_id(&self, id: i32) -> Result<Option<Space>, AppError>;
    async fn list(&self, venue_id: Option<i32>) -> Result<Vec<Space>, AppError>;
    async fn update(&self, id: i32, input: &SpaceInput) -> Result<Space, AppError>;
    async fn delete(&self, id: i32) -> Result<(), AppError>;
}

#[async_trait]
pub trait EventRepository: Send + Sync {
    async fn search(&self, query: &EventQuery) -> Result<Vec<EventOccurrence>, AppError>;
    /// Event row, first date, type links and main image in one transaction.
    async fn create(&self, event: &NewEvent) -> Result<EventDetail, AppError>;
    async fn add_date(&self, event_id: i32, date: &NewEventDate) -> Result<EventDate, AppError>;
    async fn update_by_date(&self, event_date_id: i32, update: &EventUpdate) -> Result<EventDetail, AppError>;
    async fn find_by_id(&self, id: i32) -> Result<Option<Event>, AppError>;
    async fn find_date(&self, event_date_id: i32) -> Result<Option<EventDate>, AppError>;
    async fn delete(&self, id: i32) -> Result<(), AppError>;
}

#[async_trait]
pub trait ImageRepository: Send + Sync {
    async fn create(&self, input: &ImageInput) -> Result<Image, AppError>;
    async fn find_by_id(&self, id: i32) -> Result<Option<Image>, AppError>;
}

#[async_trait]
pub trait UserRepository: Send + Sync {
    async fn create(&self, user: &NewUser) -> Result<User, AppError>;
    async fn find_by_id(&self, id: i32) -> Result<Option<User>, AppError>;
    async fn find_by_email(&self, email: &str) -> Result<Option<User>, AppError>;
    async fn update(&self, id: i32, update: &UserUpdate) -> Result<User, AppError>;
}

#[async_trait]
pub trait Mailer: Send + Sync {
    async fn send(&self, recipient: &str, subject: &str, body: &str) -> Result<(), AppError>;
}
