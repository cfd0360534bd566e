//! Axum extractors for lookup requests

use async_trait::async_trait;
use axum::extract::{FromRequest, Request};
use axum::Json;
use cnae_core::ConsultaRequest;

use crate::error::ApiError;

/// Axum extractor for the inbound lookup body.
///
/// Parses the body as JSON into a [`ConsultaRequest`], turning malformed
/// JSON into the structured 400 body instead of axum's plain-text
/// rejection. Field-level gates (missing key, bad codes, ...) run later in
/// the handler; this only guards "the body is not JSON at all".
///
/// # Example
///
/// ```ignore
/// use axum::{routing::post, Router};
/// use cnae_http::ConsultaBody;
///
/// async fn handler(ConsultaBody(request): ConsultaBody) {
///     // request is a parsed ConsultaRequest
/// }
///
/// let app = Router::new().route("/consultar-empresa", post(handler));
/// ```
pub struct ConsultaBody(pub ConsultaRequest);

#[async_trait]
impl<S> FromRequest<S> for ConsultaBody
where
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let Json(request) = Json::<ConsultaRequest>::from_request(req, state)
            .await
            .map_err(|e| ApiError::ParseBody {
                detalhes: e.to_string(),
            })?;

        Ok(ConsultaBody(request))
    }
}
