//! Result Consolidation
//!
//! Merges the upstream answer for a multi-code query into one flat company
//! list plus per-code and aggregate summaries. Consolidation is total:
//! a payload with no recognizable container shape degrades to a fallback
//! report instead of failing the request.

use crate::types::{
    ConsolidatedReport, Estatisticas, ReportMeta, ResumoCnae, ResumoPorCnae, FORMATO_COM_ERRO,
    FORMATO_CONSOLIDADO,
};
use serde_json::{json, Value};

/// Locates the sub-result for one queried code inside the raw payload.
///
/// Upstream responses have been observed in two layouts: positional (one
/// entry per queried code, in query order) and keyed (an object keyed by
/// the code itself). Each strategy answers "where is code `i`" for one
/// layout; they are tried in order and the first hit wins.
trait ExtractStrategy {
    fn extract<'a>(&self, payload: &'a Value, code: &str, index: usize) -> Option<&'a Value>;
}

/// Positional layout: `payload.data[index]`, or `payload[index]` when the
/// payload itself is the array.
struct Positional;

impl ExtractStrategy for Positional {
    fn extract<'a>(&self, payload: &'a Value, _code: &str, index: usize) -> Option<&'a Value> {
        payload
            .get("data")
            .and_then(|data| data.get(index))
            .or_else(|| payload.get(index))
    }
}

/// Keyed layout: `payload.data[code]`, or `payload[code]` at the root.
struct Keyed;

impl ExtractStrategy for Keyed {
    fn extract<'a>(&self, payload: &'a Value, code: &str, _index: usize) -> Option<&'a Value> {
        payload
            .get("data")
            .and_then(|data| data.get(code))
            .or_else(|| payload.get(code))
    }
}

const STRATEGIES: [&dyn ExtractStrategy; 2] = [&Positional, &Keyed];

/// Normalizes a located sub-result into company records: a bare array is
/// taken as-is, an object contributes its `empresas` array, anything else
/// yields no records.
fn company_list(blob: &Value) -> Vec<Value> {
    match blob {
        Value::Array(items) => items.clone(),
        Value::Object(map) => map
            .get("empresas")
            .and_then(Value::as_array)
            .cloned()
            .unwrap_or_default(),
        _ => Vec::new(),
    }
}

/// Tags one company record with the code it came from and the code's
/// 1-based position in the query. Records that are not JSON objects are
/// wrapped under `empresa` so the tags still apply.
fn tag_record(record: &mut Value, code: &str, index: usize) {
    match record {
        Value::Object(map) => {
            map.insert("cnae_consultado".to_string(), json!(code));
            map.insert("indice_cnae".to_string(), json!(index + 1));
        }
        other => {
            *other = json!({
                "empresa": other.clone(),
                "cnae_consultado": code,
                "indice_cnae": index + 1,
            });
        }
    }
}

/// Merge the upstream payload for `codes` into a single report.
///
/// `limit` is the per-code cap; zero disables truncation. Companies keep
/// their query order: all of code one, then all of code two, and so on.
pub fn consolidate(payload: &Value, codes: &[String], limit: u32) -> ConsolidatedReport {
    if !payload.is_object() && !payload.is_array() {
        return fallback_report(payload, codes, limit);
    }

    let mut empresas = Vec::new();
    let mut resumo = ResumoPorCnae::new();

    for (index, code) in codes.iter().enumerate() {
        // A located null counts as a miss so the next strategy still runs.
        let found = STRATEGIES
            .iter()
            .find_map(|strategy| {
                strategy
                    .extract(payload, code, index)
                    .filter(|value| !value.is_null())
            })
            .map(company_list)
            .unwrap_or_default();

        let total_encontradas = found.len();
        let kept: Vec<Value> = if limit > 0 {
            found.into_iter().take(limit as usize).collect()
        } else {
            found
        };
        let total_retornadas = kept.len();

        for mut record in kept {
            tag_record(&mut record, code, index);
            empresas.push(record);
        }

        resumo.insert(
            code.clone(),
            ResumoCnae {
                total_encontradas,
                total_retornadas,
                limitado: limit > 0 && total_encontradas > limit as usize,
                empresas_omitidas: if limit > 0 {
                    total_encontradas.saturating_sub(limit as usize)
                } else {
                    0
                },
            },
        );
    }

    let total_empresas = empresas.len();
    ConsolidatedReport {
        empresas,
        estatisticas: Estatisticas {
            total_empresas,
            total_cnaes_consultados: codes.len(),
            limite_por_cnae: limit,
            cnaes_consultados: codes.to_vec(),
        },
        resumo_por_cnae: resumo,
        erro_consolidacao: None,
        dados_originais: None,
        meta: ReportMeta::new(FORMATO_CONSOLIDADO),
    }
}

/// Report produced when the payload has no container shape at all. The
/// company list is empty, every summary row is zeroed and the raw payload
/// rides along in `dados_originais` for debugging.
fn fallback_report(payload: &Value, codes: &[String], limit: u32) -> ConsolidatedReport {
    let mut resumo = ResumoPorCnae::new();
    for code in codes {
        resumo.insert(code.clone(), ResumoCnae::default());
    }

    ConsolidatedReport {
        empresas: Vec::new(),
        estatisticas: Estatisticas {
            total_empresas: 0,
            total_cnaes_consultados: codes.len(),
            limite_por_cnae: limit,
            cnaes_consultados: codes.to_vec(),
        },
        resumo_por_cnae: resumo,
        erro_consolidacao: Some(format!(
            "Estrutura inesperada da resposta da API: {}",
            value_kind(payload)
        )),
        dados_originais: Some(payload.clone()),
        meta: ReportMeta::new(FORMATO_COM_ERRO),
    }
}

fn value_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}
