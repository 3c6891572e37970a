use std::net::SocketAddr;
use tracing_subscriber::{EnvFilter, FmtSubscriber};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    FmtSubscriber::builder()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("mock_service=debug,tower_http=info")),
        )
        .init();

    let addr: SocketAddr = std::env::var("MOCK_SERVICE_ADDR")
        .unwrap_or_else(|_| "127.0.0.1:8000".to_string())
        .parse()?;

    tracing::info!("Mock tender API listening on {addr}");
    mock_service::run(addr).await
}
