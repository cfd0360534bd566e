//! Core Types
//!
//! Type definitions shared by the CNAE lookup relay: the inbound request
//! body, the consolidated report and its summary blocks.
//!
//! Field names follow the published wire contract, so the Portuguese
//! spellings (`cnaes_consultados`, `resumo_por_cnae`, ...) appear directly
//! on the structs instead of hiding behind serde renames.

use std::fmt;

use chrono::{DateTime, Utc};
use serde::de::{MapAccess, Visitor};
use serde::ser::SerializeMap;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use serde_json::Value;

/// Companies returned per code when the caller does not set `limite_por_cnae`.
pub const DEFAULT_LIMIT: u32 = 100;

/// Largest accepted value for `limite_por_cnae`.
pub const MAX_LIMIT: u32 = 1000;

/// Digits a CNAE code must have once everything else is stripped.
pub const CNAE_DIGITS: usize = 7;

/// `meta.formato` marker of a fully consolidated report.
pub const FORMATO_CONSOLIDADO: &str = "consolidado_unico";

/// `meta.formato` marker of the degraded fallback report.
pub const FORMATO_COM_ERRO: &str = "consolidado_com_erro";

/// Version stamped into `meta.versao_api`.
pub const VERSAO_API: &str = "1.0.0";

/// Inbound body of `POST /consultar-empresa`.
///
/// Every field is optional at the serde level so that a missing field
/// reaches the validation gates and produces its documented 400 body
/// instead of a parse failure.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct ConsultaRequest {
    #[serde(rename = "apiKey", skip_serializing_if = "Option::is_none")]
    pub api_key: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub cnae: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub cnaes: Option<Vec<String>>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub tipo_resultado: Option<String>,

    /// Kept as raw JSON: the limit gate must tell "not an integer" apart
    /// from "absent" to report the right reason.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub limite_por_cnae: Option<Value>,
}

impl ConsultaRequest {
    /// The code input actually read. The `cnaes` array form wins when both
    /// fields are present; an empty array counts as absent.
    pub fn codigo_input(&self) -> Option<CnaeInput> {
        match &self.cnaes {
            Some(list) if !list.is_empty() => Some(CnaeInput::Multiple(list.clone())),
            _ => self.cnae.clone().map(CnaeInput::Single),
        }
    }

    /// Whether the caller used the multi-code form, which selects the
    /// consolidated response shape.
    pub fn is_multi(&self) -> bool {
        self.cnaes.as_ref().is_some_and(|list| !list.is_empty())
    }
}

/// Single-or-many code input accepted by the validator.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CnaeInput {
    Single(String),
    Multiple(Vec<String>),
}

/// Result detail level forwarded upstream as `tipo_resultado`.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum ResultMode {
    /// Abbreviated records. Accepted caller spellings: `simples`, `simple`.
    Simple,
    /// Detailed records.
    Completo,
}

impl ResultMode {
    /// Wire literal sent upstream in the query string.
    pub fn as_upstream(&self) -> &'static str {
        match self {
            Self::Simple => "simple",
            Self::Completo => "completo",
        }
    }
}

/// Metadata block injected into pass-through (single code) responses.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct MetaInformacoes {
    pub total_cnaes_consultados: usize,
    pub cnaes_consultados: Vec<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub tipo_resultado: Option<ResultMode>,

    pub timestamp: DateTime<Utc>,
}

impl MetaInformacoes {
    /// Stamps metadata for a query over the given canonical codes.
    pub fn new(cnaes_consultados: Vec<String>, tipo_resultado: Option<ResultMode>) -> Self {
        Self {
            total_cnaes_consultados: cnaes_consultados.len(),
            cnaes_consultados,
            tipo_resultado,
            timestamp: Utc::now(),
        }
    }
}

/// Per-code totals inside `resumo_por_cnae`.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct ResumoCnae {
    pub total_encontradas: usize,
    pub total_retornadas: usize,
    pub limitado: bool,
    pub empresas_omitidas: usize,
}

/// Insertion-ordered `code -> ResumoCnae` map.
///
/// Serializes as a JSON object whose keys appear in query order; a plain
/// `HashMap` or `BTreeMap` would lose that order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ResumoPorCnae(Vec<(String, ResumoCnae)>);

impl ResumoPorCnae {
    pub fn new() -> Self {
        Self::default()
    }

    /// Inserts one code's summary. A repeated code keeps its original
    /// position and takes the latest value, exactly as assigning the same
    /// key twice on a JSON object would.
    pub fn insert(&mut self, code: impl Into<String>, resumo: ResumoCnae) {
        let code = code.into();
        match self.0.iter().position(|(existing, _)| *existing == code) {
            Some(index) => self.0[index].1 = resumo,
            None => self.0.push((code, resumo)),
        }
    }

    pub fn get(&self, code: &str) -> Option<&ResumoCnae> {
        self.0.iter().find(|(c, _)| c == code).map(|(_, r)| r)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Entries in query order.
    pub fn iter(&self) -> impl Iterator<Item = &(String, ResumoCnae)> {
        self.0.iter()
    }
}

impl Serialize for ResumoPorCnae {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        let mut map = serializer.serialize_map(Some(self.0.len()))?;
        for (code, resumo) in &self.0 {
            map.serialize_entry(code, resumo)?;
        }
        map.end()
    }
}

impl<'de> Deserialize<'de> for ResumoPorCnae {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        struct ResumoVisitor;

        impl<'de> Visitor<'de> for ResumoVisitor {
            type Value = ResumoPorCnae;

            fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str("a map of CNAE code to per-code summary")
            }

            fn visit_map<A>(self, mut access: A) -> Result<Self::Value, A::Error>
            where
                A: MapAccess<'de>,
            {
                let mut resumo = ResumoPorCnae::default();
                while let Some((code, entry)) = access.next_entry::<String, ResumoCnae>()? {
                    resumo.insert(code, entry);
                }
                Ok(resumo)
            }
        }

        deserializer.deserialize_map(ResumoVisitor)
    }
}

/// Aggregate statistics of one consolidated query.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Estatisticas {
    pub total_empresas: usize,
    pub total_cnaes_consultados: usize,
    pub limite_por_cnae: u32,
    pub cnaes_consultados: Vec<String>,
}

/// Meta block stamped on every consolidated report.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ReportMeta {
    pub timestamp: DateTime<Utc>,
    pub formato: String,
    pub versao_api: String,
}

impl ReportMeta {
    pub fn new(formato: &str) -> Self {
        Self {
            timestamp: Utc::now(),
            formato: formato.to_string(),
            versao_api: VERSAO_API.to_string(),
        }
    }
}

/// Consolidated multi-code lookup result: one flat company list plus
/// per-code and aggregate summaries.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ConsolidatedReport {
    pub empresas: Vec<Value>,
    pub estatisticas: Estatisticas,

    /// Keyed by queried code, in query order.
    pub resumo_por_cnae: ResumoPorCnae,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub erro_consolidacao: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub dados_originais: Option<Value>,

    pub meta: ReportMeta,
}
