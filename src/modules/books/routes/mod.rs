//! HTTP handlers for the books module.

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::Json;
use serde::Serialize;
use serde_json::Value;
use sqlx::PgPool;

use shelf_http::error::AppError;

use super::models::{Book, BookData, BookFilter};
use super::validate;

#[derive(Debug, Serialize)]
pub struct BooksResponse {
    pub books: Vec<Book>,
}

#[derive(Debug, Serialize)]
pub struct BookResponse {
    pub book: Book,
}

#[derive(Debug, Serialize)]
pub struct MessageResponse {
    pub message: String,
}

/// GET / => {books: [book, ...]}
pub async fn list_books(
    State(pool): State<PgPool>,
    Query(filter): Query<BookFilter>,
) -> Result<Json<BooksResponse>, AppError> {
    let books = Book::find_all(&filter, &pool).await?;
    Ok(Json(BooksResponse { books }))
}

/// GET /{isbn} => {book: book}
pub async fn get_book(
    State(pool): State<PgPool>,
    Path(isbn): Path<String>,
) -> Result<Json<BookResponse>, AppError> {
    let book = Book::find_one(&isbn, &pool).await?;
    Ok(Json(BookResponse { book }))
}

/// POST / bookData => 201 {book: newBook}
pub async fn create_book(
    State(pool): State<PgPool>,
    Json(payload): Json<Value>,
) -> Result<(StatusCode, Json<BookResponse>), AppError> {
    let data = validate_payload(&payload)?;
    let book = Book::create(&data, &pool).await?;
    Ok((StatusCode::CREATED, Json(BookResponse { book })))
}

/// PUT /{isbn} bookData => {book: updatedBook}
pub async fn update_book(
    State(pool): State<PgPool>,
    Path(isbn): Path<String>,
    Json(payload): Json<Value>,
) -> Result<Json<BookResponse>, AppError> {
    let data = validate_payload(&payload)?;
    let book = Book::update(&isbn, &data, &pool).await?;
    Ok(Json(BookResponse { book }))
}

/// DELETE /{isbn} => {message: "Book deleted"}
pub async fn delete_book(
    State(pool): State<PgPool>,
    Path(isbn): Path<String>,
) -> Result<Json<MessageResponse>, AppError> {
    Book::remove(&isbn, &pool).await?;
    Ok(Json(MessageResponse {
        message: "Book deleted".to_string(),
    }))
}

/// Reject invalid payloads before any store access.
fn validate_payload(payload: &Value) -> Result<BookData, AppError> {
    validate::validate_book(payload).map_err(|errors| {
        AppError::validation(
            errors.into_iter().map(Value::String).collect(),
            "book payload failed validation",
        )
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::{to_bytes, Body};
    use axum::http::{header, Request, StatusCode};
    use serde_json::json;
    use shelf_kernel::Module;
    use tower::ServiceExt;

    /// A lazy pool never connects unless a handler reaches the store, so
    /// validation rejections can be exercised without a database.
    fn test_router() -> axum::Router {
        let pool = sqlx::postgres::PgPoolOptions::new()
            .connect_lazy("postgres://localhost:5432/shelf_test")
            .unwrap();
        super::super::BooksModule::new().routes(&pool)
    }

    #[tokio::test]
    async fn create_rejects_empty_payload_before_touching_the_store() {
        let response = test_router()
            .oneshot(
                Request::post("/")
                    .header(header::CONTENT_TYPE, "application/json")
                    .body(Body::from("{}"))
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);

        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let body: serde_json::Value = serde_json::from_slice(&bytes).unwrap();
        let details = body["error"]["details"].as_array().unwrap();
        assert_eq!(details.len(), 8);
        assert_eq!(details[0], "missing required field \"isbn\"");
        assert_eq!(body["error"]["code"], "validation_error");
    }

    #[tokio::test]
    async fn update_rejects_partial_payload() {
        let payload = json!({
            "isbn": "0691161518",
            "title": "Power-Up"
        });

        let response = test_router()
            .oneshot(
                Request::put("/0691161518")
                    .header(header::CONTENT_TYPE, "application/json")
                    .body(Body::from(payload.to_string()))
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);

        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let body: serde_json::Value = serde_json::from_slice(&bytes).unwrap();
        assert!(!body["error"]["details"].as_array().unwrap().is_empty());
    }

    #[test]
    fn delete_confirmation_has_the_expected_shape() {
        let message = MessageResponse {
            message: "Book deleted".to_string(),
        };
        assert_eq!(
            serde_json::to_value(&message).unwrap(),
            json!({ "message": "Book deleted" })
        );
    }

    #[test]
    fn response_envelopes_match_the_boundary_contract() {
        let book = Book {
            isbn: "0691161518".to_string(),
            amazon_url: "http://a.co/eobPtX2".to_string(),
            author: "Matthew Lane".to_string(),
            language: "english".to_string(),
            pages: 264,
            publisher: "Princeton University Press".to_string(),
            title: "Power-Up".to_string(),
            year: 2017,
        };

        let single = serde_json::to_value(BookResponse { book: book.clone() }).unwrap();
        assert_eq!(single["book"]["isbn"], "0691161518");

        let list = serde_json::to_value(BooksResponse { books: vec![book] }).unwrap();
        assert_eq!(list["books"].as_array().unwrap().len(), 1);
    }
}
