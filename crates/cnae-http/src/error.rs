//! HTTP error types and response bodies for the relay

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use chrono::Utc;
use cnae_core::{ValidationError, TIPOS_ACEITOS};
use serde_json::{json, Value};
use thiserror::Error;

use crate::client::UpstreamFailure;

/// Everything that can end a lookup without a 200.
///
/// Each variant renders the exact JSON body the service publishes;
/// callers match on those fields, so the shapes are part of the contract.
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("Corpo da requisição inválido")]
    ParseBody { detalhes: String },

    #[error("{0}")]
    Validation(#[from] ValidationError),

    #[error("{}", .failure.erro)]
    Upstream {
        failure: UpstreamFailure,
        cnaes_tentados: Vec<String>,
    },

    #[error("Erro interno do servidor")]
    Internal { detalhes: String },
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, body) = match self {
            ApiError::ParseBody { detalhes } => (
                StatusCode::BAD_REQUEST,
                json!({
                    "erro": "Corpo da requisição inválido",
                    "detalhes": detalhes,
                }),
            ),
            ApiError::Validation(err) => validation_body(&err),
            ApiError::Upstream {
                failure,
                cnaes_tentados,
            } => (
                StatusCode::from_u16(failure.status)
                    .unwrap_or(StatusCode::INTERNAL_SERVER_ERROR),
                json!({
                    "erro": failure.erro,
                    "detalhes": failure.detalhes,
                    "origem": "Casa dos Dados API",
                    "cnaes_tentados": cnaes_tentados,
                }),
            ),
            ApiError::Internal { detalhes } => (
                StatusCode::INTERNAL_SERVER_ERROR,
                json!({
                    "erro": "Erro interno do servidor",
                    "detalhes": detalhes,
                    "timestamp": Utc::now(),
                }),
            ),
        };

        (status, Json(body)).into_response()
    }
}

/// Example payloads quoted by the missing-field bodies.
fn exemplo_cnae_unico() -> Value {
    json!({
        "apiKey": "sua_chave_aqui",
        "cnae": "7112000",
        "tipo_resultado": "simples",
    })
}

fn exemplo_multiplos_cnaes() -> Value {
    json!({
        "apiKey": "sua_chave_aqui",
        "cnaes": ["7112000", "6201500", "6204000"],
        "tipo_resultado": "simples",
    })
}

/// Renders each validation failure as its published 400 body.
fn validation_body(err: &ValidationError) -> (StatusCode, Value) {
    let body = match err {
        ValidationError::MissingApiKey => json!({
            "erro": err.to_string(),
            "campo": "apiKey",
            "exemplo_cnae_unico": exemplo_cnae_unico(),
            "exemplo_multiplos_cnaes": exemplo_multiplos_cnaes(),
        }),
        ValidationError::InvalidApiKey => json!({
            "erro": err.to_string(),
            "campo": "apiKey",
        }),
        ValidationError::MissingCnae => json!({
            "erro": err.to_string(),
            "campos_aceitos": ["cnae", "cnaes"],
            "exemplo_cnae_unico": exemplo_cnae_unico(),
            "exemplo_multiplos_cnaes": exemplo_multiplos_cnaes(),
        }),
        ValidationError::InvalidCnaes { validos, invalidos } => json!({
            "erro": err.to_string(),
            "cnaes_invalidos": invalidos,
            "cnaes_validos": validos,
            "total_invalidos": invalidos.len(),
            "total_validos": validos.len(),
            "regra": "CNAE deve ter 7 dígitos numéricos",
            "exemplo": "CNAE válido: 7112000",
        }),
        ValidationError::InvalidLimit | ValidationError::LimitTooHigh => json!({
            "erro": err.to_string(),
            "campo": "limite_por_cnae",
        }),
        ValidationError::InvalidResultMode => json!({
            "erro": err.to_string(),
            "campo": "tipo_resultado",
            "valores_aceitos": TIPOS_ACEITOS,
        }),
    };

    (StatusCode::BAD_REQUEST, body)
}
