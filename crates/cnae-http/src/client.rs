//! Reqwest-based client for the Casa dos Dados company search

use cnae_core::ResultMode;
use reqwest::Client;
use serde_json::{json, Value};
use std::time::Duration;

/// Production endpoint of the Casa dos Dados CNPJ search.
pub const DEFAULT_BASE_URL: &str = "https://api.casadosdados.com.br/v5/cnpj/pesquisa";

/// Outbound call timeout. Multi-code queries are slow upstream, so this is
/// generous; past it the call surfaces as a connection failure.
pub const UPSTREAM_TIMEOUT: Duration = Duration::from_secs(60);

/// Category of an upstream failure.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UpstreamErrorKind {
    /// The upstream answered with an HTTP error status.
    Api,
    /// The upstream was never usefully reached (DNS, refused, timeout).
    Connection,
    /// A local fault while talking to the upstream, such as a success
    /// response whose body is not JSON.
    Internal,
}

/// A failed outbound lookup: the status to relay, the mapped message and
/// whatever detail the upstream supplied.
#[derive(Debug, Clone, PartialEq)]
pub struct UpstreamFailure {
    pub kind: UpstreamErrorKind,
    pub status: u16,
    pub erro: String,
    pub detalhes: Value,
}

/// A successful outbound lookup.
#[derive(Debug, Clone, PartialEq)]
pub struct UpstreamSuccess {
    pub payload: Value,
    pub status: u16,
    pub total_cnaes_consultados: usize,
}

/// Maps an upstream HTTP status to the caller-facing message.
pub fn upstream_error_message(status: u16) -> &'static str {
    match status {
        400 => "Dados inválidos enviados para a API",
        401 => "API Key inválida ou não fornecida",
        403 => "Acesso negado - verifique sua API Key e saldo",
        404 => "Endpoint não encontrado",
        429 => "Limite de requisições excedido",
        500 => "Erro interno da API da Casa dos Dados",
        _ => "Erro na API da Casa dos Dados",
    }
}

/// HTTP client for the Casa dos Dados company search
///
/// # Example
///
/// ```ignore
/// use cnae_http::CasaDosDadosClient;
///
/// let client = CasaDosDadosClient::new();
/// let success = client.lookup("minha-chave", &codes, None, 100).await?;
/// ```
#[derive(Clone)]
pub struct CasaDosDadosClient {
    client: Client,
    base_url: String,
}

impl CasaDosDadosClient {
    /// Create a client against the production endpoint.
    pub fn new() -> Self {
        Self::with_base_url(DEFAULT_BASE_URL)
    }

    /// Create a client against a custom endpoint (tests, staging).
    pub fn with_base_url(base_url: impl Into<String>) -> Self {
        Self {
            client: Client::builder()
                .timeout(UPSTREAM_TIMEOUT)
                .build()
                .unwrap(),
            base_url: base_url.into(),
        }
    }

    /// Create a client with custom reqwest settings.
    pub fn with_client(client: Client, base_url: impl Into<String>) -> Self {
        Self {
            client,
            base_url: base_url.into(),
        }
    }

    /// Get the endpoint URL
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Perform the single consolidated lookup.
    ///
    /// Every queried code travels in one request body. `tipo_resultado` and
    /// `limite` become query parameters only when meaningful: the mode when
    /// the caller picked one, the limit when it is positive. One attempt,
    /// no retries.
    ///
    /// # Errors
    ///
    /// Returns an [`UpstreamFailure`] with the status and message to relay.
    pub async fn lookup(
        &self,
        api_key: &str,
        codes: &[String],
        mode: Option<ResultMode>,
        limit: u32,
    ) -> Result<UpstreamSuccess, UpstreamFailure> {
        let mut request = self
            .client
            .post(&self.base_url)
            .header("api-key", api_key)
            .json(&json!({ "codigo_atividade_principal": codes }));

        if let Some(mode) = mode {
            request = request.query(&[("tipo_resultado", mode.as_upstream())]);
        }
        if limit > 0 {
            request = request.query(&[("limite", limit.to_string())]);
        }

        tracing::debug!(total_cnaes = codes.len(), "forwarding lookup to Casa dos Dados");

        let response = request.send().await.map_err(classify_send_error)?;
        let status = response.status().as_u16();

        if response.status().is_success() {
            let payload = response
                .json::<Value>()
                .await
                .map_err(|e| UpstreamFailure {
                    kind: UpstreamErrorKind::Internal,
                    status: 500,
                    erro: "Erro interno do serviço".to_string(),
                    detalhes: json!(e.to_string()),
                })?;

            Ok(UpstreamSuccess {
                payload,
                status,
                total_cnaes_consultados: codes.len(),
            })
        } else {
            // Upstream error bodies are not reliably JSON; keep the raw
            // text when parsing fails instead of dropping it.
            let text = response.text().await.unwrap_or_default();
            let detalhes = serde_json::from_str(&text).unwrap_or_else(|_| json!(text));
            tracing::warn!(status, "Casa dos Dados returned an error status");

            Err(UpstreamFailure {
                kind: UpstreamErrorKind::Api,
                status,
                erro: upstream_error_message(status).to_string(),
                detalhes,
            })
        }
    }
}

impl Default for CasaDosDadosClient {
    fn default() -> Self {
        Self::new()
    }
}

/// Discriminates transport failures. Timeouts and connection faults mean
/// the upstream was never usefully reached and map to a synthetic 503;
/// anything else counts as a local fault.
fn classify_send_error(error: reqwest::Error) -> UpstreamFailure {
    if error.is_timeout() || error.is_connect() {
        UpstreamFailure {
            kind: UpstreamErrorKind::Connection,
            status: 503,
            erro: "Erro de conexão com a API da Casa dos Dados".to_string(),
            detalhes: json!("Verifique sua conexão com a internet"),
        }
    } else {
        UpstreamFailure {
            kind: UpstreamErrorKind::Internal,
            status: 500,
            erro: "Erro interno do serviço".to_string(),
            detalhes: json!(error.to_string()),
        }
    }
}
