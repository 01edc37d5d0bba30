use std::sync::Arc;
use crate::domain::ports::{
    EventRepository, ImageRepository, LookupRepository, Mailer, OrganizerRepository,
    SpaceRepository, UserRepository, VenueRepository,
};
use crate::domain::services::auth_service::AuthService;
use crate::config::Config;

#[derive(Clone)]
pub struct AppState {
    pub config: Config,
    pub lookup_repo: Arc<dyn LookupRepository>,
    pub organizer_repo: Arc<dyn OrganizerRepository>,
    pub venue_repo: Arc<dyn VenueRepository>,
    pub space_repo: Arc<dyn SpaceRepository>,
    pub event_repo: Arc<dyn EventRepository>,
    pub image_repo: Arc<dyn ImageRepository>,
    pub user_repo: Arc<dyn UserRepository>,
    pub auth_service: Arc<AuthService>,
    pub mailer: Arc<dyn Mailer>,
}
