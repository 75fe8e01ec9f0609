//! Settings endpoints

use axum::{extract::State, Json};

use crate::{
    error::AppResult,
    models::settings::{Settings, UpdateSettings},
};

use super::AuthenticatedUser;

/// Get current settings (admin)
#[utoipa::path(
    get,
    path = "/admin/settings",
    tag = "settings",
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Current settings", body = Settings),
        (status = 403, description = "Not an administrator")
    )
)]
pub async fn get_settings(
    State(state): State<crate::AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
) -> AppResult<Json<Settings>> {
    claims.require_admin()?;

    let settings = state.services.settings.get_settings().await?;
    Ok(Json(settings))
}

/// Update settings (admin)
#[utoipa::path(
    put,
    path = "/admin/settings",
    tag = "settings",
    security(("bearer_auth" = [])),
    request_body = UpdateSettings,
    responses(
        (status = 200, description = "Settings updated", body = Settings),
        (status = 403, description = "Not an administrator")
    )
)]
pub async fn update_settings(
    State(state): State<crate::AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
    Json(request): Json<UpdateSettings>,
) -> AppResult<Json<Settings>> {
    claims.require_admin()?;

    let settings = state.services.settings.update_settings(request).await?;
    Ok(Json(settings))
}

/// Get settings (public, read-only)
#[utoipa::path(
    get,
    path = "/settings/public",
    tag = "settings",
    responses(
        (status = 200, description = "Current settings", body = Settings)
    )
)]
pub async fn get_public_settings(
    State(state): State<crate::AppState>,
) -> AppResult<Json<Settings>> {
    let settings = state.services.settings.get_settings().await?;
    Ok(Json(settings))
}
