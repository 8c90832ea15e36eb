pub mod rest;

use anyhow::{Result, anyhow};
use bookstore_app::state::AppState;
use bookstore_server::{
    config::{Parser, ServerConfig},
    run::{API_BASE_PATH, build_state, run_graceful_with_state},
};
use rand::Rng as _;
use reqwest::Url;
use tempfile::TempDir;
use tracing::info;

fn random_port() -> Result<u16> {
    let mut rng = rand::rng();

    let mut retries = 3;
    while retries > 0 {
        let port: u16 = rng.random_range(3030..4030);
        let addr: std::net::SocketAddr = format!("127.0.0.1:{}", port).parse()?;
        match std::net::TcpStream::connect_timeout(&addr, std::time::Duration::from_millis(100)) {
            Err(e) if e.kind() == std::io::ErrorKind::ConnectionRefused => return Ok(port),
            Err(_) => retries -= 1,
            Ok(_) => retries -= 1,
        }
    }

    Err(anyhow!("Could not find a free port"))
}

pub struct ConfigGuard {
    #[allow(dead_code)]
    data_dir: TempDir,
}

pub fn test_config(test_name: &str) -> Result<(ServerConfig, ConfigGuard)> {
    let tmp_data_dir = TempDir::with_prefix(format!("{}_", test_name))?;
    let database_url = format!("sqlite://{}/bookstore.db", tmp_data_dir.path().display());
    let port = random_port()?.to_string();
    let args = &[
        "bookstore-e2e-tests",
        "--port",
        &port,
        "--database-url",
        &database_url,
    ];
    let config = ServerConfig::try_parse_from(args)?;
    Ok((
        config,
        ConfigGuard {
            data_dir: tmp_data_dir,
        },
    ))
}

/// Running server with its state, database lives as long as this value.
pub struct TestEnv {
    pub base_url: Url,
    pub api_url: Url,
    pub state: AppState,
    pub client: reqwest::Client,
    _config_guard: ConfigGuard,
}

pub async fn launch_env(test_name: &str) -> Result<TestEnv> {
    let (args, config_guard) = test_config(test_name)?;
    let base_url = Url::parse(&format!("http://127.0.0.1:{}/", args.port))?;
    let api_url = base_url.join(&format!("{}/", API_BASE_PATH.trim_start_matches('/')))?;
    let port = args.port;

    let state = build_state(&args).await?;
    let server_state = state.clone();
    tokio::spawn(async move {
        if let Err(e) = run_graceful_with_state(args, server_state, std::future::pending()).await {
            tracing::error!("Test server failed: {e}");
        }
    });
    wait_for_port(port).await?;
    info!("Test server {test_name} running at {base_url}");

    Ok(TestEnv {
        base_url,
        api_url,
        state,
        client: reqwest::Client::new(),
        _config_guard: config_guard,
    })
}

async fn wait_for_port(port: u16) -> Result<()> {
    for _ in 0..50 {
        if tokio::net::TcpStream::connect(("127.0.0.1", port)).await.is_ok() {
            return Ok(());
        }
        tokio::time::sleep(std::time::Duration::from_millis(50)).await;
    }
    Err(anyhow!("Server did not start on port {port}"))
}

pub fn extend_url(url: &Url, segment: impl ToString) -> Url {
    let mut url = url.clone();
    url.path_segments_mut()
        .expect("base url")
        .pop_if_empty()
        .push(&segment.to_string());
    url
}
