use axum::{extract::State, http::StatusCode, response::IntoResponse, Json};
use crate::api::dtos::requests::{
    ConfirmPasswordRequest, LinkVenueRequest, RefreshRequest, RenewPasswordRequest, SigninRequest,
    SignupRequest, UpdateUserRequest,
};
use crate::api::dtos::responses::MessageResponse;
use crate::api::extractors::auth::AuthUser;
use crate::api::handlers::venue::load_for_edit;
use crate::domain::models::auth::{AccessToken, TokenPair};
use crate::domain::models::user::{NewUser, UserUpdate};
use crate::domain::services::auth_service::{hash_password, verify_password};
use crate::domain::services::password_policy::validate_password;
use crate::error::AppError;
use crate::state::AppState;
use std::sync::Arc;
use tracing::{error, info, warn};

const TOKEN_TYPE: &str = "bearer";

pub async fn signup(
    State(state): State<Arc<AppState>>,
    Json(payload): Json<SignupRequest>,
) -> Result<impl IntoResponse, AppError> {
    let email = normalize_email(&payload.email_address)?;
    if payload.first_name.trim().is_empty() || payload.last_name.trim().is_empty() {
        return Err(AppError::Validation("First and last name are required".into()));
    }
    validate_password(&payload.password)?;

    if state.user_repo.find_by_email(&email).await?.is_some() {
        return Err(AppError::Conflict(format!("A user with email {email} already exists")));
    }

    let new_user = NewUser {
        first_name: payload.first_name.trim().to_string(),
        last_name: payload.last_name.trim().to_string(),
        username: payload.username
            .map(|u| u.trim().to_string())
            .filter(|u| !u.is_empty())
            .unwrap_or_else(|| email.clone()),
        email_address: email,
        password_hash: hash_password(&payload.password)?,
        i18n_locale_id: payload.i18n_locale_id,
    };

    let user = state.user_repo.create(&new_user).await?;
    info!(user_id = user.id, "User signed up");

    Ok((StatusCode::CREATED, Json(user)))
}

pub async fn signin(
    State(state): State<Arc<AppState>>,
    Json(payload): Json<SigninRequest>,
) -> Result<impl IntoResponse, AppError> {
    let email = payload.email_address.trim().to_lowercase();
    let user = state.user_repo.find_by_email(&email).await?
        .ok_or(AppError::Unauthorized)?;

    if user.disabled || !verify_password(&payload.password, &user.password_hash)? {
        warn!(user_id = user.id, "Failed sign in");
        return Err(AppError::Unauthorized);
    }

    let subject = user.id.to_string();
    let tokens = TokenPair {
        access_token: state.auth_service.create_access_token(&subject, None)?,
        refresh_token: state.auth_service.create_refresh_token(&subject, None)?,
        token_type: TOKEN_TYPE,
    };

    info!(user_id = user.id, "User signed in");
    Ok(Json(tokens))
}

pub async fn refresh_token(
    State(state): State<Arc<AppState>>,
    Json(payload): Json<RefreshRequest>,
) -> Result<impl IntoResponse, AppError> {
    let subject = state.auth_service.verify_refresh_token(&payload.refresh_token)?;
    let user_id: i32 = subject.parse().map_err(|_| AppError::Unauthorized)?;

    let user = state.user_repo.find_by_id(user_id).await?
        .filter(|u| !u.disabled)
        .ok_or(AppError::Unauthorized)?;

    Ok(Json(AccessToken {
        access_token: state.auth_service.create_access_token(&user.id.to_string(), None)?,
        token_type: TOKEN_TYPE,
    }))
}

pub async fn profile(AuthUser(user): AuthUser) -> impl IntoResponse {
    Json(user)
}

pub async fn update_user(
    State(state): State<Arc<AppState>>,
    AuthUser(user): AuthUser,
    Json(payload): Json<UpdateUserRequest>,
) -> Result<impl IntoResponse, AppError> {
    let first_name = non_blank(payload.first_name, "first_name")?;
    let last_name = non_blank(payload.last_name, "last_name")?;

    let password_hash = match payload.password {
        Some(password) => {
            validate_password(&password)?;
            Some(hash_password(&password)?)
        }
        None => None,
    };

    let update = UserUpdate {
        first_name,
        last_name,
        i18n_locale_id: payload.i18n_locale_id,
        password_hash,
    };

    let updated = state.user_repo.update(user.id, &update).await?;
    info!(user_id = user.id, "User updated");
    Ok(Json(updated))
}

/// Always answers 200 so the endpoint cannot be used to probe for accounts.
pub async fn renew_password(
    State(state): State<Arc<AppState>>,
    Json(payload): Json<RenewPasswordRequest>,
) -> Result<impl IntoResponse, AppError> {
    let email = payload.email_address.trim().to_lowercase();

    match state.user_repo.find_by_email(&email).await? {
        Some(user) if !user.disabled => {
            let token = state.auth_service.create_reset_token(&user.id.to_string())?;
            let (subject, body) = reset_mail(&state.config.frontend_url, &user.first_name, &token);
            if let Err(e) = state.mailer.send(&user.email_address, &subject, &body).await {
                error!(user_id = user.id, "Failed to send password reset mail: {}", e);
            }
            info!(user_id = user.id, "Password reset requested");
        }
        _ => info!("Password reset requested for unknown address"),
    }

    Ok(Json(MessageResponse {
        message: "If the address is registered, a reset link has been sent".into(),
    }))
}

pub async fn confirm_password(
    State(state): State<Arc<AppState>>,
    Json(payload): Json<ConfirmPasswordRequest>,
) -> Result<impl IntoResponse, AppError> {
    let subject = state.auth_service.decode_reset_token(&payload.token)?;
    let user_id: i32 = subject.parse().map_err(|_| AppError::Unauthorized)?;
    validate_password(&payload.password)?;

    state.user_repo.find_by_id(user_id).await?
        .filter(|u| !u.disabled)
        .ok_or(AppError::Unauthorized)?;

    let update = UserUpdate {
        password_hash: Some(hash_password(&payload.password)?),
        ..UserUpdate::default()
    };
    state.user_repo.update(user_id, &update).await?;

    info!(user_id, "Password reset confirmed");
    Ok(Json(MessageResponse { message: "Password updated".into() }))
}

/// Links a user to a venue with a role. Requires `venue` permission on the
/// venue's organizer.
pub async fn link_venue(
    State(state): State<Arc<AppState>>,
    AuthUser(user): AuthUser,
    Json(payload): Json<LinkVenueRequest>,
) -> Result<impl IntoResponse, AppError> {
    load_for_edit(&state, user.id, payload.venue_id).await?;

    let target = payload.user_id.unwrap_or(user.id);
    state.venue_repo.link_user(target, payload.venue_id, payload.user_role_id).await?;

    info!(user_id = target, venue_id = payload.venue_id, "User linked to venue");
    Ok(StatusCode::CREATED)
}

pub async fn list_venue_roles(
    State(state): State<Arc<AppState>>,
    AuthUser(user): AuthUser,
) -> Result<impl IntoResponse, AppError> {
    Ok(Json(state.venue_repo.list_user_roles(user.id).await?))
}

fn normalize_email(raw: &str) -> Result<String, AppError> {
    let email = raw.trim().to_lowercase();
    if fast_chemail::is_valid_email(&email) {
        Ok(email)
    } else {
        Err(AppError::Validation(format!("Invalid email address: {}", raw.trim())))
    }
}

fn non_blank(value: Option<String>, field: &str) -> Result<Option<String>, AppError> {
    match value.map(|v| v.trim().to_string()) {
        Some(v) if v.is_empty() => Err(AppError::Validation(format!("{field} must not be empty"))),
        other => Ok(other),
    }
}

fn reset_mail(frontend_url: &str, first_name: &str, token: &str) -> (String, String) {
    let link = format!("{}/reset/password?token={}", frontend_url.trim_end_matches('/'), token);
    let body = format!(
        "Hello {first_name},\n\nuse the following link to choose a new password:\n{link}\n\n\
         If you did not ask for this, ignore this mail."
    );
    ("Reset your Uranus password".to_string(), body)
}
