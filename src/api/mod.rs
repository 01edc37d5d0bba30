pub mod dtos {
    pub mod requests;
    pub mod responses;
}
pub mod extractors {
    pub mod auth;
}
pub mod handlers {
    pub mod event;
    pub mod health;
    pub mod image;
    pub mod lookup;
    pub mod organizer;
    pub mod space;
    pub mod user;
    pub mod venue;
}
pub mod router;
