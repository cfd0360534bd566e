//! Response helpers for the relay

use cnae_core::MetaInformacoes;
use serde_json::{json, Value};

/// Builds the pass-through success body: the upstream payload with
/// `meta_informacoes` stamped on top.
///
/// Object payloads gain the key in place; anything else cannot carry an
/// extra key, so it is wrapped under `dados`.
pub fn with_meta(payload: Value, meta: MetaInformacoes) -> Value {
    let meta_value = serde_json::to_value(meta).unwrap_or(Value::Null);

    match payload {
        Value::Object(mut map) => {
            map.insert("meta_informacoes".to_string(), meta_value);
            Value::Object(map)
        }
        other => json!({
            "dados": other,
            "meta_informacoes": meta_value,
        }),
    }
}
