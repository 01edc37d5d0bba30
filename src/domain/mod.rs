pub mod models {
    pub mod auth;
    pub mod event;
    pub mod geo;
    pub mod image;
    pub mod lookup;
    pub mod organizer;
    pub mod space;
    pub mod user;
    pub mod venue;
}
pub mod ports;
pub mod services {
    pub mod auth_service;
    pub mod date_filter;
    pub mod event_filter;
    pub mod links;
    pub mod password_policy;
    pub mod permissions;
    pub mod venue_search;
}
