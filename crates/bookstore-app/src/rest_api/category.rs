use bookstore_dal::book::BookRepository;

use crate::{error::ApiResult, state::AppState};
use axum::{response::IntoResponse, routing::get, Json};
use http::StatusCode;

pub async fn list(repository: BookRepository) -> ApiResult<impl IntoResponse> {
    let categories = repository.list_categories().await?;
    Ok((StatusCode::OK, Json(categories)))
}

pub fn router() -> axum::Router<AppState> {
    axum::Router::new().route("/", get(list))
}
