use axum::{extract::{Path, Query, State}, http::StatusCode, response::IntoResponse, Json};
use crate::api::dtos::requests::{CreateSpaceRequest, SpaceListQuery};
use crate::api::extractors::auth::AuthUser;
use crate::domain::models::space::{Space, SpaceInput};
use crate::domain::models::user::Permission;
use crate::domain::services::permissions::ensure_permission;
use crate::error::AppError;
use crate::state::AppState;
use std::sync::Arc;
use tracing::info;

pub async fn create_space(
    State(state): State<Arc<AppState>>,
    AuthUser(user): AuthUser,
    Json(payload): Json<CreateSpaceRequest>,
) -> Result<impl IntoResponse, AppError> {
    validate_space(&payload.space)?;
    check_venue_permission(&state, user.id, payload.venue_id).await?;

    info!("Creating space '{}' in venue {}", payload.space.name, payload.venue_id);
    let space = state.space_repo.create(payload.venue_id, &payload.space).await?;

    Ok((StatusCode::CREATED, Json(space)))
}

pub async fn list_spaces(
    State(state): State<Arc<AppState>>,
    Query(params): Query<SpaceListQuery>,
) -> Result<impl IntoResponse, AppError> {
    let spaces = state.space_repo.list(params.venue_id).await?;
    Ok(Json(spaces))
}

pub async fn get_space(
    State(state): State<Arc<AppState>>,
    Path(space_id): Path<i32>,
) -> Result<impl IntoResponse, AppError> {
    let space = find_space(&state, space_id).await?;
    Ok(Json(space))
}

pub async fn update_space(
    State(state): State<Arc<AppState>>,
    AuthUser(user): AuthUser,
    Path(space_id): Path<i32>,
    Json(payload): Json<SpaceInput>,
) -> Result<impl IntoResponse, AppError> {
    validate_space(&payload)?;
    let space = find_space(&state, space_id).await?;
    check_venue_permission(&state, user.id, space.venue_id).await?;

    let updated = state.space_repo.update(space_id, &payload).await?;
    Ok(Json(updated))
}

pub async fn delete_space(
    State(state): State<Arc<AppState>>,
    AuthUser(user): AuthUser,
    Path(space_id): Path<i32>,
) -> Result<impl IntoResponse, AppError> {
    let space = find_space(&state, space_id).await?;
    check_venue_permission(&state, user.id, space.venue_id).await?;

    state.space_repo.delete(space_id).await?;
    info!(space_id, "Space deleted");
    Ok(StatusCode::NO_CONTENT)
}

async fn find_space(state: &AppState, space_id: i32) -> Result<Space, AppError> {
    state.space_repo.find_by_id(space_id).await?
        .ok_or_else(|| AppError::NotFound(format!("Space with id {space_id} not found")))
}

async fn check_venue_permission(state: &AppState, user_id: i32, venue_id: i32) -> Result<(), AppError> {
    let venue = state.venue_repo.find_by_id(venue_id).await?
        .ok_or_else(|| AppError::invalid_reference("venue_id", venue_id))?;
    let organizer_id = venue.organizer_id
        .ok_or_else(|| AppError::Forbidden(format!("Venue {venue_id} has no organizer")))?;

    ensure_permission(state.organizer_repo.as_ref(), user_id, organizer_id, Permission::Space).await
}

fn validate_space(input: &SpaceInput) -> Result<(), AppError> {
    if input.name.trim().is_empty() {
        return Err(AppError::Validation("Space name must not be empty".into()));
    }
    if input.total_capacity.is_some_and(|c| c < 0) || input.seating_capacity.is_some_and(|c| c < 0) {
        return Err(AppError::Validation("Capacities must not be negative".into()));
    }
    Ok(())
}
