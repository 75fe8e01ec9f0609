//! User management endpoints (admin)

use axum::{extract::State, http::StatusCode, Json};

use crate::{
    api::auth::UserInfo,
    error::AppResult,
    models::user::CreateUser,
};

use super::AuthenticatedUser;

/// Create a new user account (admin)
#[utoipa::path(
    post,
    path = "/admin/users",
    tag = "users",
    security(("bearer_auth" = [])),
    request_body = CreateUser,
    responses(
        (status = 201, description = "User created", body = UserInfo),
        (status = 403, description = "Not an administrator"),
        (status = 409, description = "Name or email already registered"),
        (status = 422, description = "Invalid input")
    )
)]
pub async fn create_user(
    State(state): State<crate::AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
    Json(request): Json<CreateUser>,
) -> AppResult<(StatusCode, Json<UserInfo>)> {
    claims.require_admin()?;

    let user = state.services.auth.create_user(request).await?;
    Ok((StatusCode::CREATED, Json(user.into())))
}
