//! Book (catalog) endpoints

use axum::{
    extract::{Multipart, Path, Query, State},
    http::StatusCode,
    Json,
};
use serde::Serialize;
use utoipa::ToSchema;

use crate::{
    error::{AppError, AppResult},
    models::{
        book::{Book, BookQuery, BookSummary, CreateBook, UpdateBook},
        rating::{CreateReview, RateBook, Review, UserRating},
    },
};

use super::AuthenticatedUser;

/// Paginated response wrapper
#[derive(Serialize, ToSchema)]
#[aliases(PaginatedBooks = PaginatedResponse<BookSummary>)]
pub struct PaginatedResponse<T>
where
    T: for<'a> ToSchema<'a>,
{
    /// List of items
    pub items: Vec<T>,
    /// Total number of items
    pub total: i64,
    /// Current page number
    pub page: i64,
    /// Items per page
    pub per_page: i64,
}

/// List books with search and pagination (public)
#[utoipa::path(
    get,
    path = "/books",
    tag = "books",
    params(
        ("q" = Option<String>, Query, description = "Substring search over title, author and details"),
        ("page" = Option<i64>, Query, description = "Page number (default: 1)"),
        ("per_page" = Option<i64>, Query, description = "Items per page (default: 20, max: 100)")
    ),
    responses(
        (status = 200, description = "List of books", body = PaginatedBooks)
    )
)]
pub async fn list_books(
    State(state): State<crate::AppState>,
    Query(query): Query<BookQuery>,
) -> AppResult<Json<PaginatedResponse<BookSummary>>> {
    let (items, total) = state.services.catalog.search_books(&query).await?;

    Ok(Json(PaginatedResponse {
        items,
        total,
        page: query.page.unwrap_or(1),
        per_page: query.limit(),
    }))
}

/// Get book details by ID (public)
#[utoipa::path(
    get,
    path = "/books/{id}",
    tag = "books",
    params(
        ("id" = i32, Path, description = "Book ID")
    ),
    responses(
        (status = 200, description = "Book details", body = Book),
        (status = 404, description = "Book not found")
    )
)]
pub async fn get_book(
    State(state): State<crate::AppState>,
    Path(id): Path<i32>,
) -> AppResult<Json<Book>> {
    let book = state.services.catalog.get_book(id).await?;
    Ok(Json(book))
}

/// Create a new book (admin). Multipart form: text fields plus optional
/// `photo`, `pdf` and `audio` file parts persisted to object storage.
#[utoipa::path(
    post,
    path = "/books",
    tag = "books",
    security(("bearer_auth" = [])),
    responses(
        (status = 201, description = "Book created", body = Book),
        (status = 403, description = "Not an administrator"),
        (status = 404, description = "Category not found"),
        (status = 422, description = "Invalid input")
    )
)]
pub async fn create_book(
    State(state): State<crate::AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
    multipart: Multipart,
) -> AppResult<(StatusCode, Json<Book>)> {
    claims.require_admin()?;

    let book = parse_book_form(&state, multipart).await?;
    let created = state.services.catalog.create_book(book).await?;
    Ok((StatusCode::CREATED, Json(created)))
}

/// Collect the multipart fields into a CreateBook, uploading any file
/// parts to object storage along the way.
async fn parse_book_form(
    state: &crate::AppState,
    mut multipart: Multipart,
) -> AppResult<CreateBook> {
    let mut book = CreateBook::default();
    let mut has_category = false;

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| AppError::BadRequest(format!("Invalid multipart payload: {}", e)))?
    {
        let name = field.name().unwrap_or_default().to_string();
        match name.as_str() {
            "title" => book.title = read_text(field).await?,
            "author" => book.author = read_text(field).await?,
            "category_id" => {
                book.category_id = read_text(field).await?.parse().map_err(|_| {
                    AppError::Validation("category_id must be an integer".to_string())
                })?;
                has_category = true;
            }
            "details" => book.details = Some(read_text(field).await?),
            "copies" => {
                book.copies = Some(read_text(field).await?.parse().map_err(|_| {
                    AppError::Validation("copies must be an integer".to_string())
                })?)
            }
            "featured" => {
                book.featured = Some(read_text(field).await?.parse().map_err(|_| {
                    AppError::Validation("featured must be a boolean".to_string())
                })?)
            }
            "photo" | "pdf" | "audio" => {
                let filename = field.file_name().unwrap_or("asset").to_string();
                let content_type = field
                    .content_type()
                    .unwrap_or("application/octet-stream")
                    .to_string();
                let data = field
                    .bytes()
                    .await
                    .map_err(|e| AppError::BadRequest(format!("Failed to read file: {}", e)))?;

                let url = state
                    .services
                    .storage
                    .put_object("books", &filename, &content_type, data.to_vec())
                    .await?;

                match name.as_str() {
                    "photo" => book.photo_url = Some(url),
                    "pdf" => book.pdf_url = Some(url),
                    _ => book.audio_url = Some(url),
                }
            }
            other => {
                return Err(AppError::Validation(format!(
                    "Unknown form field '{}'",
                    other
                )))
            }
        }
    }

    if !has_category {
        return Err(AppError::Validation(
            "Field 'category_id' is required".to_string(),
        ));
    }

    Ok(book)
}

async fn read_text(field: axum::extract::multipart::Field<'_>) -> AppResult<String> {
    field
        .text()
        .await
        .map_err(|e| AppError::BadRequest(format!("Invalid form field: {}", e)))
}

/// Partially update a book (admin)
#[utoipa::path(
    patch,
    path = "/books/{id}",
    tag = "books",
    security(("bearer_auth" = [])),
    params(
        ("id" = i32, Path, description = "Book ID")
    ),
    request_body = UpdateBook,
    responses(
        (status = 200, description = "Book updated", body = Book),
        (status = 404, description = "Book not found"),
        (status = 422, description = "Immutable field supplied")
    )
)]
pub async fn update_book(
    State(state): State<crate::AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
    Path(id): Path<i32>,
    Json(update): Json<UpdateBook>,
) -> AppResult<Json<Book>> {
    claims.require_admin()?;

    let book = state.services.catalog.update_book(id, update).await?;
    Ok(Json(book))
}

/// Delete a book (admin); blocked while a borrow is in progress
#[utoipa::path(
    delete,
    path = "/books/{id}",
    tag = "books",
    security(("bearer_auth" = [])),
    params(
        ("id" = i32, Path, description = "Book ID")
    ),
    responses(
        (status = 204, description = "Book deleted"),
        (status = 404, description = "Book not found"),
        (status = 409, description = "Book is currently borrowed")
    )
)]
pub async fn delete_book(
    State(state): State<crate::AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
    Path(id): Path<i32>,
) -> AppResult<StatusCode> {
    claims.require_admin()?;

    state.services.catalog.delete_book(id).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// Rate a book (one rating per user per book)
#[utoipa::path(
    patch,
    path = "/books/{id}/rate",
    tag = "books",
    security(("bearer_auth" = [])),
    params(
        ("id" = i32, Path, description = "Book ID")
    ),
    request_body = RateBook,
    responses(
        (status = 200, description = "Rating recorded", body = UserRating),
        (status = 404, description = "Book not found"),
        (status = 409, description = "User has already rated this book"),
        (status = 422, description = "Rating out of range")
    )
)]
pub async fn rate_book(
    State(state): State<crate::AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
    Path(id): Path<i32>,
    Json(request): Json<RateBook>,
) -> AppResult<Json<UserRating>> {
    let rating = state
        .services
        .ratings
        .rate_book(claims.user_id, id, request)
        .await?;
    Ok(Json(rating))
}

/// Post a review for a book
#[utoipa::path(
    post,
    path = "/books/{id}/review",
    tag = "books",
    security(("bearer_auth" = [])),
    params(
        ("id" = i32, Path, description = "Book ID")
    ),
    request_body = CreateReview,
    responses(
        (status = 201, description = "Review created", body = Review),
        (status = 404, description = "Book not found")
    )
)]
pub async fn review_book(
    State(state): State<crate::AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
    Path(id): Path<i32>,
    Json(request): Json<CreateReview>,
) -> AppResult<(StatusCode, Json<Review>)> {
    let review = state
        .services
        .ratings
        .review_book(claims.user_id, id, request)
        .await?;
    Ok((StatusCode::CREATED, Json(review)))
}

/// List reviews for a book (public)
#[utoipa::path(
    get,
    path = "/books/{id}/reviews",
    tag = "books",
    params(
        ("id" = i32, Path, description = "Book ID")
    ),
    responses(
        (status = 200, description = "Reviews for the book", body = Vec<Review>)
    )
)]
pub async fn list_reviews(
    State(state): State<crate::AppState>,
    Path(id): Path<i32>,
) -> AppResult<Json<Vec<Review>>> {
    let reviews = state.services.ratings.list_reviews(id).await?;
    Ok(Json(reviews))
}
