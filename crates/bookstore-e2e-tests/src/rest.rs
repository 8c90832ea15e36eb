use anyhow::Result;
use bookstore_dal::book::Book;
use reqwest::Url;
use serde_json::json;
use tracing::info;

pub async fn create_book(
    client: &reqwest::Client,
    api_url: &Url,
    title: &str,
    author: &str,
) -> Result<Book> {
    let payload = json!({
        "title": title,
        "author": author,
        "isbn": "9781617291784",
        "year": 2015,
        "price": 39.99
    });
    let books_url = api_url.join("books")?;

    let response = client.post(books_url).json(&payload).send().await?;
    info!("Response: {:#?}", response);
    assert_eq!(response.status().as_u16(), 201);

    let new_book: Book = response.json().await?;
    Ok(new_book)
}

/// Inserts book directly to store, to set fields not writable through the API.
pub async fn insert_book(
    pool: &bookstore_dal::Pool,
    title: &str,
    category: Option<&str>,
    rating: f64,
    discount: i64,
) -> Result<i64> {
    let id: i64 = sqlx::query_scalar(
        "INSERT INTO books (title, author, isbn, year, price, category, rating, discount)
        VALUES (?, 'Some Author', '9780000000000', 2000, 10.0, ?, ?, ?) RETURNING id",
    )
    .bind(title)
    .bind(category)
    .bind(rating)
    .bind(discount)
    .fetch_one(pool)
    .await?;
    Ok(id)
}

/// Sorted field names of JSON object.
pub fn keys(value: &serde_json::Value) -> Vec<&str> {
    let mut keys: Vec<&str> = value
        .as_object()
        .map(|o| o.keys().map(|k| k.as_str()).collect())
        .unwrap_or_default();
    keys.sort();
    keys
}
