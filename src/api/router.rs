use axum::{
    body::Body,
    extract::Request,
    routing::{get, post, put},
    Router,
};
use std::sync::Arc;
use std::time::Duration;
use crate::state::AppState;
use crate::api::handlers::{event, health, image, lookup, organizer, space, user, venue};
use tower_http::{
    classify::ServerErrorsFailureClass,
    cors::CorsLayer,
    services::ServeDir,
    trace::TraceLayer,
};
use tracing::{info_span, Span, error, info};
use uuid::Uuid;

pub fn create_router(state: Arc<AppState>) -> Router {
    let uploads = ServeDir::new(&state.config.upload_dir);

    Router::new()
        .route("/health", get(health::health_check))

        // User
        .route("/user/signup", post(user::signup))
        .route("/user/signin", post(user::signin))
        .route("/user/token/refresh", post(user::refresh_token))
        .route("/user/profile", get(user::profile))
        .route("/user/update", put(user::update_user))
        .route("/user/renew/password", post(user::renew_password))
        .route("/user/confirm/password", post(user::confirm_password))
        .route("/user/role/venue", get(user::list_venue_roles).post(user::link_venue))
        .route("/user/organizer", get(organizer::list_user_organizers))

        // Lookups
        .route("/event/type", get(lookup::event_types))
        .route("/genre/type", get(lookup::genre_types))
        .route("/venue/type", get(lookup::venue_types))
        .route("/space/type", get(lookup::space_types))
        .route("/image/type", get(lookup::image_types))
        .route("/license/type", get(lookup::license_types))
        .route("/locale/type", get(lookup::locales))
        .route("/user/role", get(lookup::user_roles))
        .route("/country", get(lookup::countries))
        .route("/country/name", get(lookup::country_by_name))
        .route("/country/code", get(lookup::country_by_code))
        .route("/state", get(lookup::states))
        .route("/state/name", get(lookup::state_by_name))
        .route("/state/code", get(lookup::state_by_code))

        // Events
        .route("/event/", get(event::search_events).post(event::create_event))
        .route("/event/sort", get(event::sort_events))
        // GET and DELETE take an event id, PUT an event date id.
        .route("/event/{id}", get(event::get_event).put(event::update_event).delete(event::delete_event))
        .route("/event/{id}/date", post(event::add_event_date))

        // Venues
        .route("/venue/", get(venue::list_venues).post(venue::create_venue))
        .route("/venue/bounds", get(venue::venues_in_bounds))
        .route("/venue/junk", get(venue::search_venue_names))
        .route("/venue/{id}", get(venue::get_venue).put(venue::update_venue).delete(venue::delete_venue))

        // Spaces
        .route("/space/", get(space::list_spaces).post(space::create_space))
        .route("/space/{id}", get(space::get_space).put(space::update_space).delete(space::delete_space))

        // Organizers
        .route("/organizer/", get(organizer::list_organizers).post(organizer::create_organizer))
        .route("/organizer/{id}", get(organizer::get_organizer).put(organizer::update_organizer).delete(organizer::delete_organizer))
        .route("/organizer/{id}/stats", get(organizer::organizer_stats))

        // Images
        .route("/image/", post(image::register_image))
        .route("/image/{id}", get(image::get_image))

        .nest_service("/uploads", uploads)

        .layer(
            TraceLayer::new_for_http()
                .make_span_with(|request: &Request<Body>| {
                    let request_id = Uuid::new_v4().to_string();
                    info_span!(
                        "http_request",
                        request_id = %request_id,
                        method = ?request.method(),
                        uri = ?request.uri(),
                        version = ?request.version(),
                        user_id = tracing::field::Empty,
                    )
                })
                .on_request(|request: &Request<Body>, _span: &Span| {
                    info!("started processing request: {} {}", request.method(), request.uri().path());
                })
                .on_response(|response: &axum::http::Response<Body>, latency: Duration, _span: &Span| {
                    info!(
                        status = response.status().as_u16(),
                        latency_ms = latency.as_millis(),
                        "finished processing request"
                    );
                })
                .on_failure(|error: ServerErrorsFailureClass, _latency: Duration, _span: &Span| {
                    error!("request failed: {:?}", error);
                })
        )
        .layer(CorsLayer::permissive())
        .with_state(state)
}
