//! Argument decoding helpers

use crate::models::{NamedArgs, V1Params};
use hranad_commons::value::decode_any;
use hranad_core::executor::StmtArgs;

/// Decode positional wire arguments into native values.
pub fn decode_positional(raw: &[serde_json::Value]) -> Result<Vec<hranad_commons::Value>, String> {
    let mut values = Vec::with_capacity(raw.len());
    for (idx, wire) in raw.iter().enumerate() {
        let value = decode_any(wire).map_err(|err| format!("Parameter {} invalid: {}", idx + 1, err))?;
        values.push(value);
    }
    Ok(values)
}

/// Decode named wire arguments (either accepted shape) into (name, value) pairs.
pub fn decode_named(named: &NamedArgs) -> Result<Vec<(String, hranad_commons::Value)>, String> {
    match named {
        NamedArgs::Pairs(pairs) => pairs
            .iter()
            .map(|pair| {
                let value = decode_any(&pair.value)
                    .map_err(|err| format!("Parameter '{}' invalid: {}", pair.name, err))?;
                Ok((pair.name.clone(), value))
            })
            .collect(),
        NamedArgs::Map(map) => map
            .iter()
            .map(|(name, wire)| {
                let value =
                    decode_any(wire).map_err(|err| format!("Parameter '{}' invalid: {}", name, err))?;
                Ok((name.clone(), value))
            })
            .collect(),
    }
}

/// Convert v1 `params` (positional array or named map) into statement args.
pub fn v1_params_to_args(params: Option<&V1Params>) -> Result<StmtArgs, String> {
    match params {
        None => Ok(StmtArgs::default()),
        Some(V1Params::Positional(raw)) => {
            Ok(StmtArgs { positional: decode_positional(raw)?, ..Default::default() })
        },
        Some(V1Params::Named(map)) => {
            let mut named = Vec::with_capacity(map.len());
            for (name, wire) in map {
                let value =
                    decode_any(wire).map_err(|err| format!("Parameter '{}' invalid: {}", name, err))?;
                named.push((name.clone(), value));
            }
            Ok(StmtArgs { named, ..Default::default() })
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use hranad_commons::Value;
    use serde_json::json;

    #[test]
    fn test_decode_positional_mixed_encodings() {
        let raw = vec![json!(1), json!({"type": "text", "value": "x"}), json!(null)];
        let values = decode_positional(&raw).expect("decode");
        assert_eq!(values, vec![Value::Integer(1), Value::Text("x".into()), Value::Null]);
    }

    #[test]
    fn test_decode_positional_reports_one_based_index() {
        let raw = vec![json!(1), json!(true)];
        let err = decode_positional(&raw).unwrap_err();
        assert!(err.starts_with("Parameter 2 invalid:"), "got: {}", err);
    }

    #[test]
    fn test_v1_named_params() {
        let params = V1Params::Named([(":v".to_string(), json!("hi"))].into_iter().collect());
        let args = v1_params_to_args(Some(&params)).expect("convert");
        assert_eq!(args.named, vec![(":v".to_string(), Value::Text("hi".into()))]);
        assert!(args.positional.is_empty());
    }
}
