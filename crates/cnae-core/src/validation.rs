//! Request Validation
//!
//! Gates applied to a lookup request before anything leaves the relay.
//! Order is fixed: API key, then codes, then limit, then result mode; the
//! first failing gate wins. Error messages are the Portuguese texts the
//! original callers already match on.

use crate::types::{
    CnaeInput, ConsultaRequest, ResultMode, CNAE_DIGITS, DEFAULT_LIMIT, MAX_LIMIT,
};
use serde_json::Value;
use thiserror::Error;

/// `tipo_resultado` spellings accepted from callers.
pub const TIPOS_ACEITOS: [&str; 3] = ["simples", "completo", "simple"];

/// Errors produced by the request gates.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ValidationError {
    #[error("API Key é obrigatória")]
    MissingApiKey,

    #[error("API Key deve ser uma string não vazia")]
    InvalidApiKey,

    #[error("CNAE é obrigatório. Use \"cnae\" para um único código ou \"cnaes\" para múltiplos")]
    MissingCnae,

    #[error("Um ou mais CNAEs são inválidos")]
    InvalidCnaes {
        validos: Vec<String>,
        invalidos: Vec<String>,
    },

    #[error("Limite deve ser um número inteiro maior ou igual a 0")]
    InvalidLimit,

    #[error("Limite máximo é 1000 empresas por CNAE")]
    LimitTooHigh,

    #[error("tipo_resultado deve ser \"simples\", \"completo\" ou \"simple\"")]
    InvalidResultMode,
}

/// A validated lookup, every argument normalized and ready for dispatch.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LookupPlan {
    pub api_key: String,
    /// Canonical (digit-only) codes, in query order.
    pub codes: Vec<String>,
    /// True when the caller used the `cnaes` array form.
    pub multi: bool,
    pub mode: Option<ResultMode>,
    pub limit: u32,
}

/// Run all gates over an inbound request.
///
/// # Errors
///
/// Returns the first failing gate's `ValidationError`.
pub fn plan_lookup(request: &ConsultaRequest) -> Result<LookupPlan, ValidationError> {
    let api_key = match &request.api_key {
        None => return Err(ValidationError::MissingApiKey),
        Some(key) if !is_valid_api_key(key) => return Err(ValidationError::InvalidApiKey),
        // Forwarded as given; trimming is only for the emptiness check.
        Some(key) => key.clone(),
    };

    let input = request.codigo_input().ok_or(ValidationError::MissingCnae)?;
    let outcome = validate_codes(&input);
    if !outcome.todos_validos() {
        return Err(ValidationError::InvalidCnaes {
            validos: outcome.validos,
            invalidos: outcome.invalidos,
        });
    }

    let limit = validate_limit(request.limite_por_cnae.as_ref())?;
    let mode = parse_result_mode(request.tipo_resultado.as_deref())?;

    Ok(LookupPlan {
        api_key,
        codes: outcome.validos,
        multi: request.is_multi(),
        mode,
        limit,
    })
}

/// True when the key is a non-empty string after trimming whitespace.
pub fn is_valid_api_key(key: &str) -> bool {
    !key.trim().is_empty()
}

/// Strip every non-digit character from a candidate code.
///
/// Formatted codes like `7112-0/00` normalize to `7112000`.
pub fn normalize_code(code: &str) -> String {
    code.chars().filter(char::is_ascii_digit).collect()
}

/// True when exactly seven digits remain after stripping.
pub fn is_valid_code(code: &str) -> bool {
    normalize_code(code).len() == CNAE_DIGITS
}

/// Outcome of partitioning the caller's codes.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CodeValidation {
    /// Codes that passed, digit-stripped to canonical form.
    pub validos: Vec<String>,
    /// Codes that failed, in their original spelling.
    pub invalidos: Vec<String>,
}

impl CodeValidation {
    pub fn todos_validos(&self) -> bool {
        self.invalidos.is_empty()
    }

    pub fn total_validos(&self) -> usize {
        self.validos.len()
    }

    pub fn total_invalidos(&self) -> usize {
        self.invalidos.len()
    }
}

/// Partition single- or multi-code input into valid and invalid sets.
///
/// Never fails: bad codes land in `invalidos` while good ones are
/// canonicalized, so the caller can report both lists at once.
pub fn validate_codes(input: &CnaeInput) -> CodeValidation {
    let codes: &[String] = match input {
        CnaeInput::Single(code) => std::slice::from_ref(code),
        CnaeInput::Multiple(codes) => codes,
    };

    let mut outcome = CodeValidation::default();
    for code in codes {
        if is_valid_code(code) {
            outcome.validos.push(normalize_code(code));
        } else {
            outcome.invalidos.push(code.clone());
        }
    }
    outcome
}

/// Check the per-code company limit.
///
/// Absent (or JSON null) falls back to [`DEFAULT_LIMIT`]. Zero is accepted
/// and means unbounded. Anything that is not a JSON integer in
/// `0..=MAX_LIMIT` is rejected.
///
/// # Errors
///
/// Returns `InvalidLimit` for floats, strings and negatives, and
/// `LimitTooHigh` above [`MAX_LIMIT`].
pub fn validate_limit(limite: Option<&Value>) -> Result<u32, ValidationError> {
    let Some(value) = limite else {
        return Ok(DEFAULT_LIMIT);
    };
    if value.is_null() {
        return Ok(DEFAULT_LIMIT);
    }

    match value.as_u64() {
        Some(n) if n > u64::from(MAX_LIMIT) => Err(ValidationError::LimitTooHigh),
        Some(n) => Ok(n as u32),
        None => Err(ValidationError::InvalidLimit),
    }
}

/// Parse the caller's `tipo_resultado`.
///
/// `simples` and `simple` both select abbreviated records, `completo`
/// detailed ones. `None` leaves the upstream default in place.
///
/// # Errors
///
/// Returns `InvalidResultMode` for any other spelling.
pub fn parse_result_mode(tipo: Option<&str>) -> Result<Option<ResultMode>, ValidationError> {
    match tipo {
        None => Ok(None),
        Some("simples") | Some("simple") => Ok(Some(ResultMode::Simple)),
        Some("completo") => Ok(Some(ResultMode::Completo)),
        Some(_) => Err(ValidationError::InvalidResultMode),
    }
}
