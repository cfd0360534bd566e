//! # CNAE Relay Server
//!
//! HTTP relay for CNAE company lookups. Callers post an API key plus one
//! or more CNAE codes; the relay validates everything locally, forwards a
//! single consolidated query to the Casa dos Dados company search and
//! reshapes the answer before returning it.
//!
//! The router is built separately from the binary so tests can run the
//! whole service in-process against a stub upstream.

mod handlers;

use axum::routing::{get, post};
use axum::Router;
use cnae_http::CasaDosDadosClient;
use tower_http::catch_panic::CatchPanicLayer;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

/// Shared state: the one outbound dependency of the relay.
#[derive(Clone)]
pub struct AppState {
    pub client: CasaDosDadosClient,
}

/// Build the relay router with its middleware stack.
pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/", get(handlers::status))
        .route(
            "/consultar-empresa",
            post(handlers::consultar_empresa).get(handlers::usage),
        )
        .fallback(handlers::not_found)
        // Middleware
        .layer(TraceLayer::new_for_http())
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any),
        )
        .layer(CatchPanicLayer::custom(handlers::panic_response))
        .with_state(state)
}
