use axum::{extract::{Path, Query, State}, http::StatusCode, response::IntoResponse, Json};
use crate::api::dtos::requests::{AddEventDateRequest, CreateEventRequest, LangQuery, UpdateEventRequest};
use crate::api::dtos::responses::EventOccurrenceResponse;
use crate::api::extractors::auth::AuthUser;
use crate::domain::models::event::{EventOccurrence, EventQuery};
use crate::domain::models::user::Permission;
use crate::domain::services::event_filter::{parse_event_query, parse_lang, parse_sort_query};
use crate::domain::services::permissions::ensure_permission;
use crate::error::{AppError, FilterError};
use crate::state::AppState;
use std::sync::Arc;
use tracing::info;

/// `GET /event/`: filtered search. At least one filter key is required.
pub async fn search_events(
    State(state): State<Arc<AppState>>,
    Query(params): Query<Vec<(String, String)>>,
) -> Result<impl IntoResponse, AppError> {
    let query = parse_event_query(&params)?;
    if query.filter.is_empty() {
        return Err(FilterError::Empty.into());
    }

    let rows = state.event_repo.search(&query).await?;
    if rows.is_empty() {
        return Err(AppError::NotFound("No events found for the given filters".into()));
    }

    info!(count = rows.len(), "Event search");
    Ok(Json(to_responses(rows, &state.config.base_url)))
}

/// `GET /event/sort`: every occurrence ordered by creation time.
pub async fn sort_events(
    State(state): State<Arc<AppState>>,
    Query(params): Query<Vec<(String, String)>>,
) -> Result<impl IntoResponse, AppError> {
    let query = parse_sort_query(&params)?;

    let rows = state.event_repo.search(&query).await?;
    if rows.is_empty() {
        return Err(AppError::NotFound("No events found".into()));
    }

    Ok(Json(to_responses(rows, &state.config.base_url)))
}

/// `GET /event/{event_id}`: all occurrences of one event.
pub async fn get_event(
    State(state): State<Arc<AppState>>,
    Path(event_id): Path<i32>,
    Query(params): Query<LangQuery>,
) -> Result<impl IntoResponse, AppError> {
    let mut query = EventQuery {
        lang: parse_lang(params.lang.as_deref().unwrap_or_default().trim())?,
        ..EventQuery::default()
    };
    query.filter.event_ids = vec![event_id];

    let rows = state.event_repo.search(&query).await?;
    if rows.is_empty() {
        return Err(event_not_found(event_id));
    }

    Ok(Json(to_responses(rows, &state.config.base_url)))
}

pub async fn create_event(
    State(state): State<Arc<AppState>>,
    AuthUser(user): AuthUser,
    Json(payload): Json<CreateEventRequest>,
) -> Result<impl IntoResponse, AppError> {
    let new_event = payload.into_new_event()?;
    ensure_permission(state.organizer_repo.as_ref(), user.id, new_event.organizer_id, Permission::Event).await?;

    info!("Creating event '{}' for organizer {}", new_event.title, new_event.organizer_id);
    let detail = state.event_repo.create(&new_event).await?;

    Ok((StatusCode::CREATED, Json(detail)))
}

/// `PUT /event/{event_date_id}`: updates the occurrence and its event.
pub async fn update_event(
    State(state): State<Arc<AppState>>,
    AuthUser(user): AuthUser,
    Path(event_date_id): Path<i32>,
    Json(payload): Json<UpdateEventRequest>,
) -> Result<impl IntoResponse, AppError> {
    let update = payload.into_update()?;

    let event_date = state.event_repo.find_date(event_date_id).await?
        .ok_or_else(|| AppError::NotFound(format!("Event date with id {event_date_id} not found")))?;
    let event = state.event_repo.find_by_id(event_date.event_id).await?
        .ok_or_else(|| event_not_found(event_date.event_id))?;
    ensure_permission(state.organizer_repo.as_ref(), user.id, event.organizer_id, Permission::Event).await?;

    let detail = state.event_repo.update_by_date(event_date_id, &update).await?;
    Ok(Json(detail))
}

pub async fn add_event_date(
    State(state): State<Arc<AppState>>,
    AuthUser(user): AuthUser,
    Path(event_id): Path<i32>,
    Json(payload): Json<AddEventDateRequest>,
) -> Result<impl IntoResponse, AppError> {
    let date = payload.into_new_date()?;

    let event = state.event_repo.find_by_id(event_id).await?
        .ok_or_else(|| event_not_found(event_id))?;
    ensure_permission(state.organizer_repo.as_ref(), user.id, event.organizer_id, Permission::Event).await?;

    let event_date = state.event_repo.add_date(event_id, &date).await?;
    info!(event_id, event_date_id = event_date.id, "Event date added");

    Ok((StatusCode::CREATED, Json(event_date)))
}

pub async fn delete_event(
    State(state): State<Arc<AppState>>,
    AuthUser(user): AuthUser,
    Path(event_id): Path<i32>,
) -> Result<impl IntoResponse, AppError> {
    let event = state.event_repo.find_by_id(event_id).await?
        .ok_or_else(|| event_not_found(event_id))?;
    ensure_permission(state.organizer_repo.as_ref(), user.id, event.organizer_id, Permission::Event).await?;

    state.event_repo.delete(event_id).await?;
    Ok(StatusCode::NO_CONTENT)
}

fn event_not_found(event_id: i32) -> AppError {
    AppError::NotFound(format!("Event with id {event_id} not found"))
}

fn to_responses(rows: Vec<EventOccurrence>, base_url: &str) -> Vec<EventOccurrenceResponse> {
    rows.into_iter()
        .map(|row| EventOccurrenceResponse::new(row, base_url))
        .collect()
}
