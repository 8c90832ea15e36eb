pub mod book;
pub mod category;

use crate::state::AppState;

/// Catalog endpoints, to be nested under the API base path.
pub fn api_router() -> axum::Router<AppState> {
    axum::Router::new()
        .nest("/books", book::router())
        .nest("/categories", category::router())
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::{body::Body, Router};
    use http::{Request, StatusCode};
    use tower::ServiceExt as _;
    use tracing_test::traced_test;

    async fn test_app() -> Router {
        let pool = sqlx::sqlite::SqlitePoolOptions::new()
            .max_connections(1)
            .min_connections(1)
            .connect_with(bookstore_dal::connect_options("sqlite::memory:").unwrap())
            .await
            .unwrap();
        bookstore_dal::migrate(&pool).await.unwrap();
        api_router()
            .merge(crate::health::router())
            .with_state(AppState::new(pool))
    }

    async fn call(app: Router, request: Request<Body>) -> (StatusCode, serde_json::Value) {
        let response = app.oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        (status, serde_json::from_slice(&bytes).unwrap())
    }

    fn get(uri: &str) -> Request<Body> {
        Request::get(uri).body(Body::empty()).unwrap()
    }

    fn post_json(uri: &str, body: &str) -> Request<Body> {
        Request::post(uri)
            .header("content-type", "application/json")
            .body(Body::from(body.to_string()))
            .unwrap()
    }

    #[tokio::test]
    #[traced_test]
    async fn test_empty_lists() {
        let app = test_app().await;
        for uri in [
            "/books",
            "/books/new",
            "/books/featured",
            "/books/discounted",
            "/categories",
        ] {
            let (status, body) = call(app.clone(), get(uri)).await;
            assert_eq!(status, StatusCode::OK, "{uri}");
            assert_eq!(body, serde_json::json!([]), "{uri}");
        }
    }

    #[tokio::test]
    #[traced_test]
    async fn test_malformed_body() {
        let app = test_app().await;
        let (status, body) = call(app.clone(), post_json("/books", "{\"title\": ")).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert!(body["error"].is_string());

        let (status, body) = call(app, post_json("/books", "{\"title\": \"No author\"}")).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert!(body["error"].as_str().unwrap().contains("author"));
    }

    #[tokio::test]
    #[traced_test]
    async fn test_invalid_id() {
        let app = test_app().await;
        let (status, body) = call(app, get("/books/abc")).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert!(body["error"].is_string());
    }

    #[tokio::test]
    #[traced_test]
    async fn test_search_requires_keyword() {
        let app = test_app().await;
        for uri in ["/books/search", "/books/search?keyword="] {
            let (status, body) = call(app.clone(), get(uri)).await;
            assert_eq!(status, StatusCode::BAD_REQUEST);
            assert_eq!(body, serde_json::json!({"error": "keyword is required"}));
        }
    }

    #[tokio::test]
    #[traced_test]
    async fn test_search_folds_accented_case() {
        let app = test_app().await;
        let book = r#"{"title": "École du Louvre", "author": "Ünal Özgür",
            "isbn": "9782000000001", "year": 2003, "price": 21.0}"#;
        let (status, _) = call(app.clone(), post_json("/books", book)).await;
        assert_eq!(status, StatusCode::CREATED);

        let (status, body) = call(app, get("/books/search?keyword=%C3%A9cole")).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body[0]["title"], "École du Louvre");
    }

    #[tokio::test]
    #[traced_test]
    async fn test_health() {
        let app = test_app().await;
        let (status, body) = call(app, get("/health")).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, serde_json::json!({"message": "healthy"}));
    }
}
