use serde::{Deserialize, Serialize};
use sqlx::PgPool;

use shelf_http::error::AppError;

/// A catalog record, keyed by ISBN.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, sqlx::FromRow)]
pub struct Book {
    pub isbn: String,
    pub amazon_url: String,
    pub author: String,
    pub language: String,
    pub pages: i32,
    pub publisher: String,
    pub title: String,
    pub year: i32,
}

/// A fully-populated, pre-validated book payload.
///
/// Produced by [`super::validate::validate_book`]; never constructed from an
/// unchecked request body.
#[derive(Debug, Clone, Deserialize)]
pub struct BookData {
    pub isbn: String,
    pub amazon_url: String,
    pub author: String,
    pub language: String,
    pub pages: i32,
    pub publisher: String,
    pub title: String,
    pub year: i32,
}

/// Optional per-attribute filters for listing, combined with AND.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct BookFilter {
    pub isbn: Option<String>,
    pub amazon_url: Option<String>,
    pub author: Option<String>,
    pub language: Option<String>,
    pub pages: Option<i32>,
    pub publisher: Option<String>,
    pub title: Option<String>,
    pub year: Option<i32>,
}

impl Book {
    /// Find all books matching every supplied filter entry.
    ///
    /// Textual fields match partially and case-insensitively; isbn, pages,
    /// and year match exactly. Ordered by isbn for deterministic output.
    pub async fn find_all(filter: &BookFilter, pool: &PgPool) -> Result<Vec<Self>, AppError> {
        let books = sqlx::query_as::<_, Self>(
            r#"
            SELECT * FROM books
            WHERE ($1::text IS NULL OR isbn = $1)
              AND ($2::text IS NULL OR amazon_url ILIKE '%' || $2 || '%')
              AND ($3::text IS NULL OR author ILIKE '%' || $3 || '%')
              AND ($4::text IS NULL OR language ILIKE '%' || $4 || '%')
              AND ($5::int4 IS NULL OR pages = $5)
              AND ($6::text IS NULL OR publisher ILIKE '%' || $6 || '%')
              AND ($7::text IS NULL OR title ILIKE '%' || $7 || '%')
              AND ($8::int4 IS NULL OR year = $8)
            ORDER BY isbn
            "#,
        )
        .bind(&filter.isbn)
        .bind(&filter.amazon_url)
        .bind(&filter.author)
        .bind(&filter.language)
        .bind(filter.pages)
        .bind(&filter.publisher)
        .bind(&filter.title)
        .bind(filter.year)
        .fetch_all(pool)
        .await?;

        Ok(books)
    }

    pub async fn find_one(isbn: &str, pool: &PgPool) -> Result<Self, AppError> {
        sqlx::query_as::<_, Self>("SELECT * FROM books WHERE isbn = $1")
            .bind(isbn)
            .fetch_optional(pool)
            .await?
            .ok_or_else(|| AppError::not_found(format!("no book found with isbn '{isbn}'")))
    }

    /// Insert a new book. A duplicate isbn surfaces as a conflict via the
    /// table's primary-key constraint.
    pub async fn create(data: &BookData, pool: &PgPool) -> Result<Self, AppError> {
        let book = sqlx::query_as::<_, Self>(
            r#"
            INSERT INTO books (
                isbn, amazon_url, author, language, pages, publisher, title, year
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
            RETURNING *
            "#,
        )
        .bind(&data.isbn)
        .bind(&data.amazon_url)
        .bind(&data.author)
        .bind(&data.language)
        .bind(data.pages)
        .bind(&data.publisher)
        .bind(&data.title)
        .bind(data.year)
        .fetch_one(pool)
        .await?;

        Ok(book)
    }

    /// Replace all mutable fields of the book identified by `isbn`.
    ///
    /// The path isbn is authoritative: the isbn column is never written, so a
    /// differing isbn in the payload cannot retarget or rename the row.
    pub async fn update(isbn: &str, data: &BookData, pool: &PgPool) -> Result<Self, AppError> {
        sqlx::query_as::<_, Self>(
            r#"
            UPDATE books SET
                amazon_url = $2,
                author = $3,
                language = $4,
                pages = $5,
                publisher = $6,
                title = $7,
                year = $8
            WHERE isbn = $1
            RETURNING *
            "#,
        )
        .bind(isbn)
        .bind(&data.amazon_url)
        .bind(&data.author)
        .bind(&data.language)
        .bind(data.pages)
        .bind(&data.publisher)
        .bind(&data.title)
        .bind(data.year)
        .fetch_optional(pool)
        .await?
        .ok_or_else(|| AppError::not_found(format!("no book found with isbn '{isbn}'")))
    }

    pub async fn remove(isbn: &str, pool: &PgPool) -> Result<(), AppError> {
        let deleted = sqlx::query("DELETE FROM books WHERE isbn = $1 RETURNING isbn")
            .bind(isbn)
            .fetch_optional(pool)
            .await?;

        match deleted {
            Some(_) => Ok(()),
            None => Err(AppError::not_found(format!(
                "no book found with isbn '{isbn}'"
            ))),
        }
    }
}
