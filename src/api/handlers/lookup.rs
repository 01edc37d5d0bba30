use axum::{extract::{Query, State}, response::IntoResponse, Json};
use crate::api::dtos::requests::{CodeQuery, LangQuery, NameQuery};
use crate::domain::models::lookup::{LocalizedType, TypeTable};
use crate::domain::services::event_filter::parse_lang;
use crate::error::AppError;
use crate::state::AppState;
use std::sync::Arc;

pub async fn event_types(
    State(state): State<Arc<AppState>>,
    Query(params): Query<LangQuery>,
) -> Result<impl IntoResponse, AppError> {
    localized_types(&state, TypeTable::Event, params).await
}

pub async fn genre_types(
    State(state): State<Arc<AppState>>,
    Query(params): Query<LangQuery>,
) -> Result<impl IntoResponse, AppError> {
    localized_types(&state, TypeTable::Genre, params).await
}

pub async fn venue_types(
    State(state): State<Arc<AppState>>,
    Query(params): Query<LangQuery>,
) -> Result<impl IntoResponse, AppError> {
    localized_types(&state, TypeTable::Venue, params).await
}

pub async fn space_types(
    State(state): State<Arc<AppState>>,
    Query(params): Query<LangQuery>,
) -> Result<impl IntoResponse, AppError> {
    localized_types(&state, TypeTable::Space, params).await
}

/// All locales when `lang` is absent.
pub async fn image_types(
    State(state): State<Arc<AppState>>,
    Query(params): Query<LangQuery>,
) -> Result<impl IntoResponse, AppError> {
    let lang = optional_lang(params)?;
    let types = state.lookup_repo.list_image_types(lang.as_deref()).await?;
    Ok(Json(types))
}

/// All locales when `lang` is absent.
pub async fn license_types(
    State(state): State<Arc<AppState>>,
    Query(params): Query<LangQuery>,
) -> Result<impl IntoResponse, AppError> {
    let lang = optional_lang(params)?;
    let types = state.lookup_repo.list_license_types(lang.as_deref()).await?;
    Ok(Json(types))
}

pub async fn locales(
    State(state): State<Arc<AppState>>,
) -> Result<impl IntoResponse, AppError> {
    Ok(Json(state.lookup_repo.list_locales().await?))
}

pub async fn user_roles(
    State(state): State<Arc<AppState>>,
) -> Result<impl IntoResponse, AppError> {
    Ok(Json(state.lookup_repo.list_user_roles().await?))
}

pub async fn countries(
    State(state): State<Arc<AppState>>,
    Query(params): Query<LangQuery>,
) -> Result<impl IntoResponse, AppError> {
    let lang = optional_lang(params)?;
    Ok(Json(state.lookup_repo.list_countries(lang.as_deref()).await?))
}

pub async fn country_by_name(
    State(state): State<Arc<AppState>>,
    Query(params): Query<NameQuery>,
) -> Result<impl IntoResponse, AppError> {
    let country = state.lookup_repo.find_country_by_name(params.name.trim()).await?
        .ok_or_else(|| AppError::NotFound(format!("Country '{}' not found", params.name.trim())))?;
    Ok(Json(country))
}

/// One row per locale the country name is stored in.
pub async fn country_by_code(
    State(state): State<Arc<AppState>>,
    Query(params): Query<CodeQuery>,
) -> Result<impl IntoResponse, AppError> {
    let code = params.code.trim().to_ascii_uppercase();
    let countries = state.lookup_repo.find_countries_by_code(&code).await?;
    if countries.is_empty() {
        return Err(AppError::NotFound(format!("Country with code {code} not found")));
    }
    Ok(Json(countries))
}

pub async fn states(
    State(state): State<Arc<AppState>>,
) -> Result<impl IntoResponse, AppError> {
    Ok(Json(state.lookup_repo.list_states().await?))
}

pub async fn state_by_name(
    State(state): State<Arc<AppState>>,
    Query(params): Query<NameQuery>,
) -> Result<impl IntoResponse, AppError> {
    let found = state.lookup_repo.find_state_by_name(params.name.trim()).await?
        .ok_or_else(|| AppError::NotFound(format!("State '{}' not found", params.name.trim())))?;
    Ok(Json(found))
}

pub async fn state_by_code(
    State(state): State<Arc<AppState>>,
    Query(params): Query<CodeQuery>,
) -> Result<impl IntoResponse, AppError> {
    let code = params.code.trim().to_ascii_uppercase();
    let found = state.lookup_repo.find_state_by_code(&code).await?
        .ok_or_else(|| AppError::NotFound(format!("State with code {code} not found")))?;
    Ok(Json(found))
}

async fn localized_types(
    state: &AppState,
    table: TypeTable,
    params: LangQuery,
) -> Result<Json<Vec<LocalizedType>>, AppError> {
    let lang = parse_lang(params.lang.as_deref().unwrap_or_default().trim())?;
    let types = state.lookup_repo.list_types(table, Some(&lang)).await?;
    Ok(Json(types))
}

fn optional_lang(params: LangQuery) -> Result<Option<String>, AppError> {
    match params.lang.as_deref().map(str::trim) {
        None | Some("") => Ok(None),
        Some(lang) => Ok(Some(parse_lang(lang)?)),
    }
}
