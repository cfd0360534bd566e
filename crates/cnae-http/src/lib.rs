//! # CNAE HTTP Transport
//!
//! HTTP transport layer for the CNAE company lookup relay.
//!
//! This crate provides:
//! - A reqwest-based client for the Casa dos Dados company search
//! - An axum extractor for parsing lookup request bodies
//! - The caller-facing error taxonomy with its published JSON bodies
//! - Helpers for shaping pass-through success responses
//!
//! ## Client Example
//!
//! ```ignore
//! use cnae_http::CasaDosDadosClient;
//!
//! let client = CasaDosDadosClient::new();
//! let codes = vec!["7112000".to_string()];
//! let success = client.lookup("minha-chave", &codes, None, 100).await?;
//! ```
//!
//! ## Server Example
//!
//! ```ignore
//! use axum::{routing::post, Router};
//! use cnae_http::{ApiError, ConsultaBody};
//!
//! async fn handler(ConsultaBody(request): ConsultaBody) -> Result<(), ApiError> {
//!     // validate and dispatch...
//!     Ok(())
//! }
//!
//! let app = Router::new().route("/consultar-empresa", post(handler));
//! ```

mod client;
mod error;
mod extractors;
mod response;

pub use client::{
    upstream_error_message, CasaDosDadosClient, UpstreamErrorKind, UpstreamFailure,
    UpstreamSuccess, DEFAULT_BASE_URL, UPSTREAM_TIMEOUT,
};
pub use error::ApiError;
pub use extractors::ConsultaBody;
pub use response::with_meta;
