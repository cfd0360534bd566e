//! CNAE Relay Server
//!
//! Accepts lookup requests, validates them locally and forwards one
//! consolidated query to the Casa dos Dados company search.
//!
//! Usage:
//!   # Default port 3000
//!   cargo run --package cnae-server
//!
//!   # Custom port and upstream override (tests, staging)
//!   PORT=8080 CASA_DOS_DADOS_URL=http://localhost:9000 cargo run --package cnae-server

use cnae_http::CasaDosDadosClient;
use cnae_server::{router, AppState};
use std::net::SocketAddr;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "cnae_server=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // Check for an upstream override
    let client = match std::env::var("CASA_DOS_DADOS_URL") {
        Ok(url) => CasaDosDadosClient::with_base_url(url),
        Err(_) => CasaDosDadosClient::new(),
    };
    tracing::info!("Forwarding lookups to {}", client.base_url());

    let port = std::env::var("PORT")
        .ok()
        .and_then(|value| value.parse::<u16>().ok())
        .unwrap_or(3000);

    let app = router(AppState { client });

    // Start server
    let addr = SocketAddr::from(([0, 0, 0, 0], port));
    tracing::info!("CNAE relay listening on http://{}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await.unwrap();
    axum::serve(listener, app).await.unwrap();
}
