use crate::config::ServerConfig;
use crate::error::Result;
use axum::Router;
use bookstore_app::state::AppState;
use futures::FutureExt;
use tower_http::trace::TraceLayer;
use tracing::info;

pub const API_BASE_PATH: &str = "/api/v1";

pub async fn run(args: ServerConfig) -> Result<()> {
    let state = build_state(&args).await?;
    run_with_state(args, state).await
}

pub async fn run_with_state(args: ServerConfig, state: AppState) -> Result<()> {
    let shutdown = tokio::signal::ctrl_c().map(|_| ());
    run_graceful_with_state(args, state, shutdown).await
}

pub async fn run_graceful_with_state<S>(
    args: ServerConfig,
    state: AppState,
    shutdown_signal: S,
) -> Result<()>
where
    S: std::future::Future<Output = ()> + Send + 'static,
{
    let mut app = main_router(state);

    if !args.no_cors {
        app = app.layer(tower_http::cors::CorsLayer::very_permissive());
    }

    let ip: std::net::IpAddr = args.listen_address.parse()?;
    let addr = std::net::SocketAddr::from((ip, args.port));
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    info!("Listening on {}", listener.local_addr()?);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal)
        .await?;

    Ok(())
}

pub fn main_router(state: AppState) -> Router<()> {
    Router::new()
        .nest(API_BASE_PATH, bookstore_app::rest_api::api_router())
        .merge(bookstore_app::health::router())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

pub async fn build_state(config: &ServerConfig) -> Result<AppState> {
    let pool = bookstore_dal::new_pool(&config.database_url, &config.pool_settings()).await?;
    bookstore_dal::migrate(&pool).await?;
    Ok(AppState::new(pool))
}
