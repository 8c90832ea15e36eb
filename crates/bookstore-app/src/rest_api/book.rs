use bookstore_dal::book::BookRepository;
use garde::Validate;
use serde::Deserialize;

use crate::state::AppState;
use axum::routing::get;

crate::repository_from_request!(BookRepository);

#[derive(Debug, Deserialize)]
pub struct ListQuery {
    category: Option<String>,
}

#[derive(Debug, Deserialize, Validate)]
pub struct SearchQuery {
    #[serde(default)]
    #[garde(length(min = 1))]
    keyword: String,
}

mod crud_api {
    use super::*;
    use crate::error::{ApiError, ApiResult};
    use axum::{
        extract::{Path, Query},
        response::IntoResponse,
        Json,
    };
    use axum_extra::extract::WithRejection;
    use bookstore_dal::book::CreateBook;
    use http::StatusCode;
    use serde_json::json;
    use tracing::debug;

    pub async fn list(
        repository: BookRepository,
        WithRejection(Query(query), _): WithRejection<Query<ListQuery>, ApiError>,
    ) -> ApiResult<impl IntoResponse> {
        let books = repository.list(query.category.as_deref()).await?;
        Ok((StatusCode::OK, Json(books)))
    }

    pub async fn list_newest(repository: BookRepository) -> ApiResult<impl IntoResponse> {
        let books = repository.list_newest().await?;
        Ok((StatusCode::OK, Json(books)))
    }

    pub async fn list_featured(repository: BookRepository) -> ApiResult<impl IntoResponse> {
        let books = repository.list_featured().await?;
        Ok((StatusCode::OK, Json(books)))
    }

    pub async fn list_discounted(repository: BookRepository) -> ApiResult<impl IntoResponse> {
        let books = repository.list_discounted().await?;
        Ok((StatusCode::OK, Json(books)))
    }

    pub async fn search(
        repository: BookRepository,
        WithRejection(Query(query), _): WithRejection<Query<SearchQuery>, ApiError>,
    ) -> ApiResult<impl IntoResponse> {
        if let Err(report) = query.validate() {
            debug!("Invalid search query: {report}");
            return Err(ApiError::InvalidQuery("keyword is required".to_string()));
        }
        let books = repository.search(&query.keyword).await?;
        Ok((StatusCode::OK, Json(books)))
    }

    pub async fn get(
        WithRejection(Path(id), _): WithRejection<Path<i64>, ApiError>,
        repository: BookRepository,
    ) -> ApiResult<impl IntoResponse> {
        let record = repository.get(id).await?;

        Ok((StatusCode::OK, Json(record)))
    }

    pub async fn create(
        repository: BookRepository,
        WithRejection(Json(payload), _): WithRejection<Json<CreateBook>, ApiError>,
    ) -> ApiResult<impl IntoResponse> {
        let record = repository.create(payload).await?;

        Ok((StatusCode::CREATED, Json(record)))
    }

    pub async fn update(
        WithRejection(Path(id), _): WithRejection<Path<i64>, ApiError>,
        repository: BookRepository,
        WithRejection(Json(payload), _): WithRejection<Json<CreateBook>, ApiError>,
    ) -> ApiResult<impl IntoResponse> {
        let record = repository.update(id, payload).await?;

        Ok((StatusCode::OK, Json(record)))
    }

    pub async fn delete(
        WithRejection(Path(id), _): WithRejection<Path<i64>, ApiError>,
        repository: BookRepository,
    ) -> ApiResult<impl IntoResponse> {
        if repository.delete(id).await? == 0 {
            return Err(ApiError::ResourceNotFound("book not found".to_string()));
        }

        Ok((
            StatusCode::OK,
            Json(json!({"message": "book deleted successfully"})),
        ))
    }
}

pub fn router() -> axum::Router<AppState> {
    axum::Router::new()
        .route("/", get(crud_api::list).post(crud_api::create))
        .route("/new", get(crud_api::list_newest))
        .route("/search", get(crud_api::search))
        .route("/featured", get(crud_api::list_featured))
        .route("/discounted", get(crud_api::list_discounted))
        .route(
            "/{id}",
            get(crud_api::get)
                .put(crud_api::update)
                .delete(crud_api::delete),
        )
}
