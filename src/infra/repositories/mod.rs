pub mod integrity;
pub mod occurrence_query;

pub mod postgres_event_repo;
pub mod postgres_image_repo;
pub mod postgres_lookup_repo;
pub mod postgres_organizer_repo;
pub mod postgres_space_repo;
pub mod postgres_user_repo;
pub mod postgres_venue_repo;

pub mod sqlite_event_repo;
pub mod sqlite_image_repo;
pub mod sqlite_lookup_repo;
pub mod sqlite_organizer_repo;
pub mod sqlite_space_repo;
pub mod sqlite_user_repo;
pub mod sqlite_venue_repo;
