//! Relay request handlers

use std::any::Any;

use axum::extract::State;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use chrono::Utc;
use cnae_core::{consolidate, plan_lookup, MetaInformacoes};
use cnae_http::{with_meta, ApiError, ConsultaBody};
use serde_json::{json, Value};

use crate::AppState;

/// Main lookup endpoint: validate, relay upstream, reshape the answer.
///
/// The multi-code (`cnaes`) form gets the consolidated report; the single
/// `cnae` form passes the upstream payload through with metadata stamped
/// on top.
pub async fn consultar_empresa(
    State(state): State<AppState>,
    ConsultaBody(request): ConsultaBody,
) -> Result<Json<Value>, ApiError> {
    let plan = plan_lookup(&request)?;

    tracing::info!(
        total_cnaes = plan.codes.len(),
        multi = plan.multi,
        limite = plan.limit,
        "Processing lookup request"
    );

    let success = state
        .client
        .lookup(&plan.api_key, &plan.codes, plan.mode, plan.limit)
        .await
        .map_err(|failure| {
            tracing::warn!(
                status = failure.status,
                erro = %failure.erro,
                "Upstream lookup failed"
            );
            ApiError::Upstream {
                failure,
                cnaes_tentados: plan.codes.clone(),
            }
        })?;

    let body = if plan.multi {
        let report = consolidate(&success.payload, &plan.codes, plan.limit);
        tracing::info!(
            total_empresas = report.estatisticas.total_empresas,
            "Consolidated lookup completed"
        );
        serde_json::to_value(report).map_err(|e| ApiError::Internal {
            detalhes: e.to_string(),
        })?
    } else {
        let meta = MetaInformacoes::new(plan.codes, plan.mode);
        with_meta(success.payload, meta)
    };

    Ok(Json(body))
}

/// Root endpoint: a small health document.
pub async fn status() -> Json<Value> {
    Json(json!({
        "message": "API CNAE Empresas - Casa dos Dados",
        "status": "ativo",
        "endpoints": {
            "consulta": "POST /consultar-empresa",
        },
    }))
}

/// GET on the lookup route: usage documentation for callers.
pub async fn usage() -> Json<Value> {
    Json(json!({
        "endpoint": "POST /consultar-empresa",
        "descrição": "Consulta empresas por CNAE usando a API da Casa dos Dados",
        "suporte": "CNAE único ou múltiplos CNAEs em uma única requisição",
        "parametros_obrigatórios": {
            "apiKey": "Sua chave da API da Casa dos Dados",
            "cnae": "Código CNAE de 7 dígitos (para consulta única)",
            "cnaes": "Array de códigos CNAE (para múltiplas consultas)",
        },
        "parametros_opcionais": {
            "tipo_resultado": "Tipo do resultado: \"simples\", \"completo\" ou \"simple\"",
            "limite_por_cnae": "Máximo de empresas por CNAE (0 a 1000, padrão 100, 0 = sem limite)",
        },
        "exemplos": {
            "cnae_unico": {
                "método": "POST",
                "url": "/consultar-empresa",
                "body": {
                    "apiKey": "sua_chave_aqui",
                    "cnae": "7112000",
                    "tipo_resultado": "simples",
                },
            },
            "multiplos_cnaes": {
                "método": "POST",
                "url": "/consultar-empresa",
                "body": {
                    "apiKey": "sua_chave_aqui",
                    "cnaes": ["7112000", "6201500", "6204000"],
                    "tipo_resultado": "simples",
                },
            },
        },
        "exemplos_curl": {
            "cnae_unico": "curl -X POST http://localhost:3000/consultar-empresa -H \"Content-Type: application/json\" -d '{\"apiKey\": \"sua_chave_aqui\", \"cnae\": \"7112000\", \"tipo_resultado\": \"simples\"}'",
            "multiplos_cnaes": "curl -X POST http://localhost:3000/consultar-empresa -H \"Content-Type: application/json\" -d '{\"apiKey\": \"sua_chave_aqui\", \"cnaes\": [\"7112000\", \"6201500\", \"6204000\"], \"tipo_resultado\": \"simples\"}'",
        },
        "vantagens_multiplos": [
            "Todos os resultados em uma única resposta",
            "Menor uso de requests da API",
            "Mais eficiente para automações",
            "Ideal para uso no n8n",
        ],
    }))
}

/// Fallback for unknown routes.
pub async fn not_found() -> (StatusCode, Json<Value>) {
    (
        StatusCode::NOT_FOUND,
        Json(json!({
            "erro": "Rota não encontrada",
            "endpoints_disponíveis": [
                "GET /",
                "GET /consultar-empresa",
                "POST /consultar-empresa",
            ],
        })),
    )
}

/// Renders a handler panic as the generic 500 body, so even a fault leaves
/// the caller with JSON instead of a dropped connection.
pub(crate) fn panic_response(err: Box<dyn Any + Send + 'static>) -> Response {
    let detalhes = if let Some(message) = err.downcast_ref::<String>() {
        message.clone()
    } else if let Some(message) = err.downcast_ref::<&str>() {
        (*message).to_string()
    } else {
        "panic".to_string()
    };

    tracing::error!(%detalhes, "Handler panicked");

    (
        StatusCode::INTERNAL_SERVER_ERROR,
        Json(json!({
            "erro": "Erro interno do servidor",
            "detalhes": detalhes,
            "timestamp": Utc::now(),
        })),
    )
        .into_response()
}
