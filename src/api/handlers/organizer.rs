use axum::{extract::{Path, State}, http::StatusCode, response::IntoResponse, Json};
use crate::api::extractors::auth::AuthUser;
use crate::domain::models::organizer::OrganizerInput;
use crate::domain::models::user::Permission;
use crate::domain::services::permissions::ensure_permission;
use crate::error::AppError;
use crate::state::AppState;
use chrono::Utc;
use std::sync::Arc;
use tracing::info;

/// Role given to the user who creates an organizer.
const OWNER_ROLE_ID: i32 = 1;

pub async fn create_organizer(
    State(state): State<Arc<AppState>>,
    AuthUser(user): AuthUser,
    Json(mut payload): Json<OrganizerInput>,
) -> Result<impl IntoResponse, AppError> {
    validate_organizer(&payload)?;
    if payload.contact_email.as_deref().map_or(true, |e| e.trim().is_empty()) {
        payload.contact_email = Some(user.email_address.clone());
    }

    info!("User {} creating organizer '{}'", user.id, payload.name);
    let organizer = state.organizer_repo.create(&payload, user.id, OWNER_ROLE_ID).await?;

    Ok((StatusCode::CREATED, Json(organizer)))
}

pub async fn list_organizers(
    State(state): State<Arc<AppState>>,
) -> Result<impl IntoResponse, AppError> {
    let organizers = state.organizer_repo.list().await?;
    Ok(Json(organizers))
}

pub async fn get_organizer(
    State(state): State<Arc<AppState>>,
    Path(organizer_id): Path<i32>,
) -> Result<impl IntoResponse, AppError> {
    let organizer = state.organizer_repo.find_by_id(organizer_id).await?
        .ok_or_else(|| organizer_not_found(organizer_id))?;
    Ok(Json(organizer))
}

pub async fn update_organizer(
    State(state): State<Arc<AppState>>,
    AuthUser(user): AuthUser,
    Path(organizer_id): Path<i32>,
    Json(payload): Json<OrganizerInput>,
) -> Result<impl IntoResponse, AppError> {
    validate_organizer(&payload)?;
    ensure_exists(&state, organizer_id).await?;
    ensure_permission(state.organizer_repo.as_ref(), user.id, organizer_id, Permission::Organization).await?;

    let organizer = state.organizer_repo.update(organizer_id, &payload).await?;
    Ok(Json(organizer))
}

pub async fn delete_organizer(
    State(state): State<Arc<AppState>>,
    AuthUser(user): AuthUser,
    Path(organizer_id): Path<i32>,
) -> Result<impl IntoResponse, AppError> {
    ensure_exists(&state, organizer_id).await?;
    ensure_permission(state.organizer_repo.as_ref(), user.id, organizer_id, Permission::Organization).await?;

    state.organizer_repo.delete(organizer_id).await?;
    info!(organizer_id, "Organizer deleted");
    Ok(StatusCode::NO_CONTENT)
}

/// Venue, space and upcoming event counts.
pub async fn organizer_stats(
    State(state): State<Arc<AppState>>,
    Path(organizer_id): Path<i32>,
) -> Result<impl IntoResponse, AppError> {
    ensure_exists(&state, organizer_id).await?;
    let stats = state.organizer_repo.stats(organizer_id, Utc::now()).await?;
    Ok(Json(stats))
}

/// Organizers the calling user is linked to.
pub async fn list_user_organizers(
    State(state): State<Arc<AppState>>,
    AuthUser(user): AuthUser,
) -> Result<impl IntoResponse, AppError> {
    let organizers = state.organizer_repo.list_for_user(user.id).await?;
    Ok(Json(organizers))
}

async fn ensure_exists(state: &AppState, organizer_id: i32) -> Result<(), AppError> {
    state.organizer_repo.find_by_id(organizer_id).await?
        .map(|_| ())
        .ok_or_else(|| organizer_not_found(organizer_id))
}

fn organizer_not_found(organizer_id: i32) -> AppError {
    AppError::NotFound(format!("Organizer with id {organizer_id} not found"))
}

fn validate_organizer(input: &OrganizerInput) -> Result<(), AppError> {
    if input.name.trim().is_empty() {
        return Err(AppError::Validation("Organizer name must not be empty".into()));
    }
    if let Some(email) = input.contact_email.as_deref().filter(|e| !e.trim().is_empty()) {
        if !fast_chemail::is_valid_email(email) {
            return Err(AppError::Validation(format!("Invalid contact email: {email}")));
        }
    }
    Ok(())
}
