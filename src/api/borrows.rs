//! Borrow workflow endpoints

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::{
    error::{AppError, AppResult},
    models::borrow::{
        BorrowDetails, BorrowRecord, BorrowStatus, CreateBorrow, RequestStatus, UpdateBorrowStatus,
    },
};

use super::AuthenticatedUser;

/// Count response for status statistics
#[derive(Serialize, ToSchema)]
pub struct BorrowCountResponse {
    pub count: i64,
}

/// Request status update (admin)
#[derive(Deserialize, ToSchema)]
pub struct UpdateRequestStatus {
    pub request_status: RequestStatus,
}

/// Borrow a book. The borrower is the authenticated caller.
#[utoipa::path(
    post,
    path = "/borrow",
    tag = "borrow",
    security(("bearer_auth" = [])),
    request_body = CreateBorrow,
    responses(
        (status = 201, description = "Borrow record created", body = BorrowRecord),
        (status = 404, description = "Book not found"),
        (status = 409, description = "Book unavailable or borrow limit reached"),
        (status = 422, description = "return_date before borrow_date")
    )
)]
pub async fn create_borrow(
    State(state): State<crate::AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
    Json(request): Json<CreateBorrow>,
) -> AppResult<(StatusCode, Json<BorrowRecord>)> {
    let record = state
        .services
        .borrows
        .create_borrow(claims.user_id, request)
        .await?;

    tracing::info!(
        "User {} borrowed book {} (record {})",
        claims.user_id,
        record.book_id,
        record.id
    );

    Ok((StatusCode::CREATED, Json(record)))
}

/// Get the caller's borrow records
#[utoipa::path(
    get,
    path = "/borrow/my",
    tag = "borrow",
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Caller's borrow records", body = Vec<BorrowDetails>)
    )
)]
pub async fn my_borrows(
    State(state): State<crate::AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
) -> AppResult<Json<Vec<BorrowDetails>>> {
    let records = state
        .services
        .borrows
        .get_user_borrows(claims.user_id)
        .await?;
    Ok(Json(records))
}

/// Update borrow and/or request status (admin).
/// Transition to `returned` makes the book available again.
#[utoipa::path(
    patch,
    path = "/borrow/{id}/status",
    tag = "borrow",
    security(("bearer_auth" = [])),
    params(
        ("id" = i32, Path, description = "Borrow record ID")
    ),
    request_body = UpdateBorrowStatus,
    responses(
        (status = 200, description = "Status updated", body = BorrowRecord),
        (status = 403, description = "Not an administrator"),
        (status = 404, description = "Borrow record not found"),
        (status = 422, description = "Invalid status transition")
    )
)]
pub async fn update_borrow_status(
    State(state): State<crate::AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
    Path(id): Path<i32>,
    Json(request): Json<UpdateBorrowStatus>,
) -> AppResult<Json<BorrowRecord>> {
    claims.require_admin()?;

    let record = state.services.borrows.update_status(id, request).await?;
    Ok(Json(record))
}

/// Update request status only (admin)
#[utoipa::path(
    patch,
    path = "/borrow/{id}/request",
    tag = "borrow",
    security(("bearer_auth" = [])),
    params(
        ("id" = i32, Path, description = "Borrow record ID")
    ),
    request_body = UpdateRequestStatus,
    responses(
        (status = 200, description = "Request status updated", body = BorrowRecord),
        (status = 403, description = "Not an administrator"),
        (status = 404, description = "Borrow record not found"),
        (status = 422, description = "Invalid status transition")
    )
)]
pub async fn update_request_status(
    State(state): State<crate::AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
    Path(id): Path<i32>,
    Json(request): Json<UpdateRequestStatus>,
) -> AppResult<Json<BorrowRecord>> {
    claims.require_admin()?;

    let update = UpdateBorrowStatus {
        borrow_status: None,
        request_status: Some(request.request_status),
    };
    let record = state.services.borrows.update_status(id, update).await?;
    Ok(Json(record))
}

/// Delete a borrow record (admin); deleting an active borrow frees the book
#[utoipa::path(
    delete,
    path = "/borrow/{id}",
    tag = "borrow",
    security(("bearer_auth" = [])),
    params(
        ("id" = i32, Path, description = "Borrow record ID")
    ),
    responses(
        (status = 204, description = "Borrow record deleted"),
        (status = 404, description = "Borrow record not found")
    )
)]
pub async fn delete_borrow(
    State(state): State<crate::AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
    Path(id): Path<i32>,
) -> AppResult<StatusCode> {
    claims.require_admin()?;

    state.services.borrows.delete_borrow(id).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// Count borrow records by borrow status (admin)
#[utoipa::path(
    get,
    path = "/borrow/status/{status}/count",
    tag = "borrow",
    security(("bearer_auth" = [])),
    params(
        ("status" = String, Path, description = "borrowed, returned or overdue")
    ),
    responses(
        (status = 200, description = "Record count", body = BorrowCountResponse),
        (status = 422, description = "Unknown status value")
    )
)]
pub async fn count_by_borrow_status(
    State(state): State<crate::AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
    Path(status): Path<String>,
) -> AppResult<Json<BorrowCountResponse>> {
    claims.require_admin()?;

    let status: BorrowStatus = status.parse().map_err(AppError::Validation)?;
    let count = state.services.borrows.count_by_borrow_status(status).await?;
    Ok(Json(BorrowCountResponse { count }))
}

/// List borrow records by borrow status (admin)
#[utoipa::path(
    get,
    path = "/borrow/status/{status}/list",
    tag = "borrow",
    security(("bearer_auth" = [])),
    params(
        ("status" = String, Path, description = "borrowed, returned or overdue")
    ),
    responses(
        (status = 200, description = "Matching records", body = Vec<BorrowDetails>),
        (status = 422, description = "Unknown status value")
    )
)]
pub async fn list_by_borrow_status(
    State(state): State<crate::AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
    Path(status): Path<String>,
) -> AppResult<Json<Vec<BorrowDetails>>> {
    claims.require_admin()?;

    let status: BorrowStatus = status.parse().map_err(AppError::Validation)?;
    let records = state.services.borrows.list_by_borrow_status(status).await?;
    Ok(Json(records))
}

/// Count borrow records by request status (admin)
#[utoipa::path(
    get,
    path = "/borrow/request/{status}/count",
    tag = "borrow",
    security(("bearer_auth" = [])),
    params(
        ("status" = String, Path, description = "accept, pending or reject")
    ),
    responses(
        (status = 200, description = "Record count", body = BorrowCountResponse),
        (status = 422, description = "Unknown status value")
    )
)]
pub async fn count_by_request_status(
    State(state): State<crate::AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
    Path(status): Path<String>,
) -> AppResult<Json<BorrowCountResponse>> {
    claims.require_admin()?;

    let status: RequestStatus = status.parse().map_err(AppError::Validation)?;
    let count = state
        .services
        .borrows
        .count_by_request_status(status)
        .await?;
    Ok(Json(BorrowCountResponse { count }))
}

/// List borrow records by request status (admin)
#[utoipa::path(
    get,
    path = "/borrow/request/{status}/list",
    tag = "borrow",
    security(("bearer_auth" = [])),
    params(
        ("status" = String, Path, description = "accept, pending or reject")
    ),
    responses(
        (status = 200, description = "Matching records", body = Vec<BorrowDetails>),
        (status = 422, description = "Unknown status value")
    )
)]
pub async fn list_by_request_status(
    State(state): State<crate::AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
    Path(status): Path<String>,
) -> AppResult<Json<Vec<BorrowDetails>>> {
    claims.require_admin()?;

    let status: RequestStatus = status.parse().map_err(AppError::Validation)?;
    let records = state
        .services
        .borrows
        .list_by_request_status(status)
        .await?;
    Ok(Json(records))
}
