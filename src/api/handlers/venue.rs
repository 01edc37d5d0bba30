use axum::{extract::{Path, Query, State}, http::StatusCode, response::IntoResponse, Json};
use crate::api::dtos::requests::{BoundsQuery, CreateVenueRequest, FuzzyQuery, LangQuery};
use crate::api::dtos::responses::FeatureCollection;
use crate::api::extractors::auth::AuthUser;
use crate::domain::models::geo::Bbox;
use crate::domain::models::user::Permission;
use crate::domain::models::venue::{Venue, VenueInput};
use crate::domain::services::event_filter::parse_lang;
use crate::domain::services::permissions::ensure_permission;
use crate::error::AppError;
use crate::state::AppState;
use std::sync::Arc;
use tracing::info;

pub async fn create_venue(
    State(state): State<Arc<AppState>>,
    AuthUser(user): AuthUser,
    Json(payload): Json<CreateVenueRequest>,
) -> Result<impl IntoResponse, AppError> {
    validate_venue(&payload.venue)?;
    ensure_permission(state.organizer_repo.as_ref(), user.id, payload.organizer_id, Permission::Venue).await?;

    info!("Creating venue '{}' for organizer {}", payload.venue.name, payload.organizer_id);
    let venue = state.venue_repo.create(payload.organizer_id, &payload.venue).await?;

    Ok((StatusCode::CREATED, Json(venue)))
}

pub async fn list_venues(
    State(state): State<Arc<AppState>>,
) -> Result<impl IntoResponse, AppError> {
    let venues = state.venue_repo.list().await?;
    Ok(Json(venues))
}

pub async fn get_venue(
    State(state): State<Arc<AppState>>,
    Path(venue_id): Path<i32>,
    Query(params): Query<LangQuery>,
) -> Result<impl IntoResponse, AppError> {
    let lang = parse_lang(params.lang.as_deref().unwrap_or_default().trim())?;
    let venue = state.venue_repo.find_detail(venue_id, &lang).await?
        .ok_or_else(|| venue_not_found(venue_id))?;
    Ok(Json(venue))
}

pub async fn update_venue(
    State(state): State<Arc<AppState>>,
    AuthUser(user): AuthUser,
    Path(venue_id): Path<i32>,
    Json(payload): Json<VenueInput>,
) -> Result<impl IntoResponse, AppError> {
    validate_venue(&payload)?;
    let venue = load_for_edit(&state, user.id, venue_id).await?;

    let updated = state.venue_repo.update(venue.id, &payload).await?;
    Ok(Json(updated))
}

pub async fn delete_venue(
    State(state): State<Arc<AppState>>,
    AuthUser(user): AuthUser,
    Path(venue_id): Path<i32>,
) -> Result<impl IntoResponse, AppError> {
    let venue = load_for_edit(&state, user.id, venue_id).await?;

    state.venue_repo.delete(venue.id).await?;
    info!(venue_id, "Venue deleted");
    Ok(StatusCode::NO_CONTENT)
}

/// `GET /venue/bounds`: venues inside the box, edges included, as GeoJSON.
pub async fn venues_in_bounds(
    State(state): State<Arc<AppState>>,
    Query(params): Query<BoundsQuery>,
) -> Result<impl IntoResponse, AppError> {
    let bbox = Bbox::new(params.xmin, params.ymin, params.xmax, params.ymax)
        .map_err(|e| AppError::Validation(e.to_string()))?;

    let points = state.venue_repo.within_bbox(&bbox).await?;
    if points.is_empty() {
        return Err(AppError::NotFound("No venues found in the given bounds".into()));
    }

    Ok(Json(FeatureCollection::from(points)))
}

/// `GET /venue/junk`: fuzzy venue name search.
pub async fn search_venue_names(
    State(state): State<Arc<AppState>>,
    Query(params): Query<FuzzyQuery>,
) -> Result<impl IntoResponse, AppError> {
    let q = params.q.trim();
    if q.is_empty() {
        return Err(AppError::Validation("Query parameter q must not be empty".into()));
    }

    let ranked = state.venue_repo.search_names(q).await?;
    if ranked.is_empty() {
        return Err(AppError::NotFound(format!("No venues matching '{q}'")));
    }

    Ok(Json(ranked))
}

/// Loads the venue and checks the caller's `venue` permission on its organizer.
pub(crate) async fn load_for_edit(state: &AppState, user_id: i32, venue_id: i32) -> Result<Venue, AppError> {
    let venue = state.venue_repo.find_by_id(venue_id).await?
        .ok_or_else(|| venue_not_found(venue_id))?;
    let organizer_id = venue.organizer_id
        .ok_or_else(|| AppError::Forbidden(format!("Venue {venue_id} has no organizer")))?;

    ensure_permission(state.organizer_repo.as_ref(), user_id, organizer_id, Permission::Venue).await?;
    Ok(venue)
}

fn venue_not_found(venue_id: i32) -> AppError {
    AppError::NotFound(format!("Venue with id {venue_id} not found"))
}

fn validate_venue(input: &VenueInput) -> Result<(), AppError> {
    if input.name.trim().is_empty() {
        return Err(AppError::Validation("Venue name must not be empty".into()));
    }
    match (input.longitude, input.latitude) {
        (Some(lon), Some(lat)) => {
            Bbox::new(lon, lat, lon, lat).map_err(|e| AppError::Validation(e.to_string()))?;
        }
        (None, None) => {}
        _ => return Err(AppError::Validation("longitude and latitude must be given together".into())),
    }
    Ok(())
}
