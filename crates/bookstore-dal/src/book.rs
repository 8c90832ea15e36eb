use crate::{Error, TOP_LIMIT, error::Result};
use futures::TryStreamExt as _;
use serde::{Deserialize, Serialize};
use sqlx::Pool;
use time::OffsetDateTime;
use tracing::debug;

/// Writable part of a book, as accepted on create and update.
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct CreateBook {
    pub title: String,
    pub author: String,
    pub isbn: String,
    pub year: i64,
    pub price: f64,
}

/// Book as returned on create and by the newest listing.
#[derive(Debug, Serialize, Deserialize, Clone, sqlx::FromRow)]
pub struct Book {
    pub id: i64,
    pub title: String,
    pub author: String,
    pub isbn: String,
    pub year: i64,
    pub price: f64,
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
    #[serde(with = "time::serde::rfc3339")]
    pub updated_at: OffsetDateTime,
}

#[derive(Debug, Serialize, Deserialize, Clone, sqlx::FromRow)]
pub struct BookShort {
    pub id: i64,
    pub title: String,
    pub author: String,
}

#[derive(Debug, Serialize, Deserialize, Clone, sqlx::FromRow)]
pub struct UpdatedBook {
    pub id: i64,
    pub title: String,
    pub author: String,
    pub isbn: String,
    pub year: i64,
    pub price: f64,
    #[serde(with = "time::serde::rfc3339")]
    pub updated_at: OffsetDateTime,
}

/// Shape of the plain listing, category filter and search results.
#[derive(Debug, Serialize, Deserialize, Clone, sqlx::FromRow)]
pub struct BookListing {
    pub id: i64,
    pub title: String,
    pub author: String,
    pub category: Option<String>,
    pub isbn: String,
    pub year: i64,
    pub price: f64,
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
    #[serde(with = "time::serde::rfc3339")]
    pub updated_at: OffsetDateTime,
}

#[derive(Debug, Serialize, Deserialize, Clone, sqlx::FromRow)]
pub struct FeaturedBook {
    pub id: i64,
    pub title: String,
    pub author: String,
    pub category: Option<String>,
    pub isbn: String,
    pub year: i64,
    pub price: f64,
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
    #[serde(with = "time::serde::rfc3339")]
    pub updated_at: OffsetDateTime,
    pub rating: f64,
}

#[derive(Debug, Serialize, Deserialize, Clone, sqlx::FromRow)]
pub struct DiscountedBook {
    pub id: i64,
    pub title: String,
    pub author: String,
    pub category: Option<String>,
    pub isbn: String,
    pub year: i64,
    pub price: f64,
    pub discount: i64,
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
    #[serde(with = "time::serde::rfc3339")]
    pub updated_at: OffsetDateTime,
    pub rating: f64,
}

/// Turns a search keyword into a regex matching it as a literal substring, ignoring case.
/// Case folding covers non-ASCII letters too, which SQLite `LIKE` does not.
fn search_pattern(keyword: &str) -> String {
    format!("(?i){}", regex::escape(keyword))
}

pub type BookRepository = BookRepositoryImpl<Pool<crate::ChosenDB>>;

pub struct BookRepositoryImpl<E> {
    executor: E,
}

impl<'c, E> BookRepositoryImpl<E>
where
    for<'a> &'a E: sqlx::Executor<'c, Database = crate::ChosenDB>,
{
    pub fn new(executor: E) -> Self {
        Self { executor }
    }

    pub async fn list(&self, category: Option<&str>) -> Result<Vec<BookListing>> {
        let query = match category.filter(|c| !c.is_empty()) {
            Some(category) => sqlx::query_as::<_, BookListing>(
                "SELECT id, title, author, category, isbn, year, price, created_at, updated_at
                FROM books WHERE category = ? ORDER BY id",
            )
            .bind(category),
            None => sqlx::query_as::<_, BookListing>(
                "SELECT id, title, author, category, isbn, year, price, created_at, updated_at
                FROM books ORDER BY id",
            ),
        };
        let records = query.fetch(&self.executor).try_collect::<Vec<_>>().await?;
        Ok(records)
    }

    pub async fn list_newest(&self) -> Result<Vec<Book>> {
        let records = sqlx::query_as::<_, Book>(
            "SELECT id, title, author, isbn, year, price, created_at, updated_at
            FROM books ORDER BY created_at DESC LIMIT ?",
        )
        .bind(TOP_LIMIT)
        .fetch(&self.executor)
        .try_collect::<Vec<_>>()
        .await?;
        Ok(records)
    }

    pub async fn get(&self, id: i64) -> Result<BookShort> {
        sqlx::query_as::<_, BookShort>("SELECT id, title, author FROM books WHERE id = ?")
            .bind(id)
            .fetch_optional(&self.executor)
            .await?
            .ok_or_else(|| Error::RecordNotFound("book".to_string()))
    }

    pub async fn create(&self, payload: CreateBook) -> Result<Book> {
        let record = sqlx::query_as::<_, Book>(
            "INSERT INTO books (title, author, isbn, year, price) VALUES (?, ?, ?, ?, ?)
            RETURNING id, title, author, isbn, year, price, created_at, updated_at",
        )
        .bind(&payload.title)
        .bind(&payload.author)
        .bind(&payload.isbn)
        .bind(payload.year)
        .bind(payload.price)
        .fetch_one(&self.executor)
        .await?;
        debug!("Created book {}", record.id);
        Ok(record)
    }

    pub async fn update(&self, id: i64, payload: CreateBook) -> Result<UpdatedBook> {
        // same expression as the column defaults, CURRENT_TIMESTAMP has only second resolution
        sqlx::query_as::<_, UpdatedBook>(
            "UPDATE books
            SET title = ?, author = ?, isbn = ?, year = ?, price = ?,
            updated_at = strftime('%Y-%m-%d %H:%M:%f', 'now')
            WHERE id = ?
            RETURNING id, title, author, isbn, year, price, updated_at",
        )
        .bind(&payload.title)
        .bind(&payload.author)
        .bind(&payload.isbn)
        .bind(payload.year)
        .bind(payload.price)
        .bind(id)
        .fetch_optional(&self.executor)
        .await?
        .ok_or_else(|| {
            debug!("No book with id {id} to update");
            Error::RecordNotFound("book".to_string())
        })
    }

    /// Returns number of deleted rows, zero when there is no such book.
    pub async fn delete(&self, id: i64) -> Result<u64> {
        let res = sqlx::query("DELETE FROM books WHERE id = ?")
            .bind(id)
            .execute(&self.executor)
            .await?;
        Ok(res.rows_affected())
    }

    pub async fn list_categories(&self) -> Result<Vec<String>> {
        let records = sqlx::query_scalar::<_, String>(
            "SELECT DISTINCT category FROM books WHERE category IS NOT NULL ORDER BY category",
        )
        .fetch(&self.executor)
        .try_collect::<Vec<_>>()
        .await?;
        Ok(records)
    }

    pub async fn search(&self, keyword: &str) -> Result<Vec<BookListing>> {
        let records = sqlx::query_as::<_, BookListing>(
            "SELECT id, title, author, category, isbn, year, price, created_at, updated_at
            FROM books
            WHERE title REGEXP ?1 OR author REGEXP ?1 OR category REGEXP ?1 OR isbn REGEXP ?1
            ORDER BY id",
        )
        .bind(search_pattern(keyword))
        .fetch(&self.executor)
        .try_collect::<Vec<_>>()
        .await?;
        Ok(records)
    }

    pub async fn list_featured(&self) -> Result<Vec<FeaturedBook>> {
        let records = sqlx::query_as::<_, FeaturedBook>(
            "SELECT id, title, author, category, isbn, year, price, created_at, updated_at, rating
            FROM books ORDER BY rating DESC LIMIT ?",
        )
        .bind(TOP_LIMIT)
        .fetch(&self.executor)
        .try_collect::<Vec<_>>()
        .await?;
        Ok(records)
    }

    pub async fn list_discounted(&self) -> Result<Vec<DiscountedBook>> {
        let records = sqlx::query_as::<_, DiscountedBook>(
            "SELECT id, title, author, category, isbn, year, price, discount, created_at, updated_at, rating
            FROM books ORDER BY discount DESC LIMIT ?",
        )
        .bind(TOP_LIMIT)
        .fetch(&self.executor)
        .try_collect::<Vec<_>>()
        .await?;
        Ok(records)
    }
}
