use axum::{extract::{Path, State}, http::StatusCode, response::IntoResponse, Json};
use crate::api::extractors::auth::AuthUser;
use crate::domain::models::image::ImageInput;
use crate::error::AppError;
use crate::state::AppState;
use std::sync::Arc;
use tracing::{info, warn};

/// Registers metadata for a file already placed in the upload directory.
pub async fn register_image(
    State(state): State<Arc<AppState>>,
    AuthUser(user): AuthUser,
    Json(payload): Json<ImageInput>,
) -> Result<impl IntoResponse, AppError> {
    if !is_plain_file_name(&payload.source_name) {
        return Err(AppError::Validation(format!("Invalid source_name: {}", payload.source_name)));
    }
    if !payload.mime_type.starts_with("image/") {
        return Err(AppError::Validation(format!("Unsupported mime_type: {}", payload.mime_type)));
    }

    if !state.config.upload_dir.join(&payload.source_name).is_file() {
        warn!("Image {} registered before the file exists in the upload directory", payload.source_name);
    }

    let image = state.image_repo.create(&payload).await?;
    info!(image_id = image.id, user_id = user.id, "Image registered");

    Ok((StatusCode::CREATED, Json(image)))
}

pub async fn get_image(
    State(state): State<Arc<AppState>>,
    Path(image_id): Path<i32>,
) -> Result<impl IntoResponse, AppError> {
    let image = state.image_repo.find_by_id(image_id).await?
        .ok_or_else(|| AppError::NotFound(format!("Image with id {image_id} not found")))?;
    Ok(Json(image))
}

fn is_plain_file_name(name: &str) -> bool {
    !name.is_empty()
        && name != "."
        && name != ".."
        && !name.contains(['/', '\\'])
        && !name.starts_with('.')
}

#[cfg(test)]
mod tests {
    use super::is_plain_file_name;

    #[test]
    fn source_name_must_not_escape_upload_dir() {
        assert!(is_plain_file_name("3f2a.webp"));
        assert!(!is_plain_file_name("../secret"));
        assert!(!is_plain_file_name("a/b.png"));
        assert!(!is_plain_file_name(".hidden"));
        assert!(!is_plain_file_name(""));
    }
}
