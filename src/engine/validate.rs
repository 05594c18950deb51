//! Request validation: loosely-typed JSON arguments in, typed values out.
//!
//! Parameters are checked in catalog order and the first failure aborts the
//! whole request. Numbers are accepted leniently: callers that transmit every
//! number as a float (`5.0`) are common, so fractional values are truncated
//! toward zero rather than rejected.

use std::collections::BTreeMap;

use serde_json::{Map, Value};
use tracing::debug;

use super::catalog::{OperationSpec, ParamKind, ParameterSpec};
use super::error::ValidationError;

/// A strongly-typed argument value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ParamValue {
    Text(String),
    Integer(u64),
    Flag(bool),
    TextList(Vec<String>),
    IntegerList(Vec<u64>),
}

impl ParamValue {
    /// Empty strings, empty lists, zero integers and `false` count as unset
    /// for optional parameters.
    pub fn is_empty(&self) -> bool {
        match self {
            ParamValue::Text(s) => s.is_empty(),
            ParamValue::Integer(n) => *n == 0,
            ParamValue::Flag(b) => !b,
            ParamValue::TextList(v) => v.is_empty(),
            ParamValue::IntegerList(v) => v.is_empty(),
        }
    }

    /// Tokens for list values, or the single token of a scalar.
    pub fn tokens(&self) -> Vec<String> {
        match self {
            ParamValue::Text(s) => vec![s.clone()],
            ParamValue::Integer(n) => vec![n.to_string()],
            ParamValue::Flag(b) => vec![b.to_string()],
            ParamValue::TextList(v) => v.clone(),
            ParamValue::IntegerList(v) => v.iter().map(u64::to_string).collect(),
        }
    }
}

/// Output of `validate`: every required parameter present and typed.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ValidatedArguments {
    values: BTreeMap<&'static str, ParamValue>,
}

impl ValidatedArguments {
    pub fn get(&self, name: &str) -> Option<&ParamValue> {
        self.values.get(name)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&'static str, &ParamValue)> {
        self.values.iter().map(|(k, v)| (*k, v))
    }

    pub(crate) fn insert(&mut self, name: &'static str, value: ParamValue) {
        self.values.insert(name, value);
    }
}

/// Validate `args` against `op`'s parameter list.
pub fn validate(
    op: &OperationSpec,
    args: &Map<String, Value>,
) -> Result<ValidatedArguments, ValidationError> {
    let mut out = ValidatedArguments::default();

    for spec in op.params {
        match args.get(spec.name).filter(|v| !v.is_null()) {
            Some(raw) => {
                let value = coerce(spec, raw)?;
                if spec.required && is_blank(&value) {
                    return Err(ValidationError::missing(spec.name));
                }
                match spec.default {
                    // an empty value means "unset", so the default still applies
                    Some(default) if value.is_empty() => {
                        out.insert(spec.name, ParamValue::Text(default.to_string()))
                    }
                    _ => out.insert(spec.name, value),
                }
            }
            None if spec.required => return Err(ValidationError::missing(spec.name)),
            None => {
                if let Some(default) = spec.default {
                    out.insert(spec.name, ParamValue::Text(default.to_string()));
                }
            }
        }
    }

    for key in args.keys() {
        if op.param(key).is_none() {
            debug!(operation = op.name, parameter = %key, "ignoring unknown parameter");
        }
    }

    Ok(out)
}

/// A required string or list with nothing in it is treated as not supplied.
fn is_blank(value: &ParamValue) -> bool {
    match value {
        ParamValue::Text(s) => s.is_empty(),
        ParamValue::TextList(v) => v.is_empty(),
        ParamValue::IntegerList(v) => v.is_empty(),
        ParamValue::Integer(_) | ParamValue::Flag(_) => false,
    }
}

fn coerce(spec: &ParameterSpec, raw: &Value) -> Result<ParamValue, ValidationError> {
    let mismatch = || ValidationError::mismatch(spec.name, spec.kind);
    match spec.kind {
        ParamKind::String => raw
            .as_str()
            .map(|s| ParamValue::Text(s.to_string()))
            .ok_or_else(mismatch),
        ParamKind::Integer => to_unsigned(raw)
            .map(ParamValue::Integer)
            .ok_or_else(mismatch),
        ParamKind::Boolean => raw.as_bool().map(ParamValue::Flag).ok_or_else(mismatch),
        ParamKind::StringList => {
            let items = raw.as_array().ok_or_else(mismatch)?;
            items
                .iter()
                .map(|v| v.as_str().filter(|s| !s.is_empty()).map(str::to_string))
                .collect::<Option<Vec<_>>>()
                .map(ParamValue::TextList)
                .ok_or_else(mismatch)
        }
        ParamKind::IntegerList => {
            let items = raw.as_array().ok_or_else(mismatch)?;
            items
                .iter()
                .map(to_unsigned)
                .collect::<Option<Vec<_>>>()
                .map(ParamValue::IntegerList)
                .ok_or_else(mismatch)
        }
    }
}

/// Convert any numeric representation to `u64`, truncating fractions.
///
/// Accepts JSON numbers and strings holding a numeric literal. Negative,
/// non-finite and out-of-range values yield `None`.
pub fn to_unsigned(value: &Value) -> Option<u64> {
    match value {
        Value::Number(n) => n.as_u64().or_else(|| n.as_f64().and_then(truncate)),
        Value::String(s) => {
            let s = s.trim();
            s.parse::<u64>()
                .ok()
                .or_else(|| s.parse::<f64>().ok().and_then(truncate))
        }
        _ => None,
    }
}

fn truncate(f: f64) -> Option<u64> {
    if !f.is_finite() || f < 0.0 {
        return None;
    }
    let t = f.trunc();
    if t >= u64::MAX as f64 {
        return None;
    }
    Some(t as u64)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::catalog::lookup;
    use crate::engine::error::ValidationReason;
    use serde_json::json;

    fn obj(v: Value) -> Map<String, Value> {
        v.as_object().cloned().unwrap()
    }

    #[test]
    fn float_is_truncated() {
        assert_eq!(to_unsigned(&json!(5.0)), Some(5));
        assert_eq!(to_unsigned(&json!(5.9)), Some(5));
        assert_eq!(to_unsigned(&json!(0.2)), Some(0));
        assert_eq!(to_unsigned(&json!(42)), Some(42));
        assert_eq!(to_unsigned(&json!(u64::MAX)), Some(u64::MAX));
    }

    #[test]
    fn numeric_strings_accepted() {
        assert_eq!(to_unsigned(&json!("1000")), Some(1000));
        assert_eq!(to_unsigned(&json!(" 7.5 ")), Some(7));
        assert_eq!(to_unsigned(&json!("abc")), None);
        assert_eq!(to_unsigned(&json!("inf")), None);
    }

    #[test]
    fn negatives_and_non_numbers_rejected() {
        assert_eq!(to_unsigned(&json!(-1)), None);
        assert_eq!(to_unsigned(&json!(-0.5)), None);
        assert_eq!(to_unsigned(&json!(1e30)), None);
        assert_eq!(to_unsigned(&json!(true)), None);
        assert_eq!(to_unsigned(&json!([1])), None);
    }

    #[test]
    fn missing_required_names_parameter() {
        let op = lookup("sui_split_coin").unwrap();
        let err = validate(op, &obj(json!({"amounts":[1,2]}))).unwrap_err();
        assert_eq!(err.parameter, "coin_id");
        assert_eq!(err.reason, ValidationReason::MissingRequired);
    }

    #[test]
    fn first_failure_wins() {
        let op = lookup("sui_split_coin").unwrap();
        // both coin_id and amounts are bad; coin_id is declared first
        let err = validate(op, &obj(json!({"coin_id": 5, "amounts": "x"}))).unwrap_err();
        assert_eq!(err.parameter, "coin_id");
    }

    #[test]
    fn empty_required_string_is_missing() {
        let op = lookup("sui_object").unwrap();
        let err = validate(op, &obj(json!({"object_id": ""}))).unwrap_err();
        assert_eq!(err.reason, ValidationReason::MissingRequired);
    }

    #[test]
    fn empty_required_list_is_missing() {
        let op = lookup("sui_pay").unwrap();
        let err = validate(
            op,
            &obj(json!({"input_coins": [], "recipients": ["0x2"], "amounts": [1]})),
        )
        .unwrap_err();
        assert_eq!(err.parameter, "input_coins");
        assert_eq!(err.reason, ValidationReason::MissingRequired);
    }

    #[test]
    fn scalar_for_list_is_mismatch() {
        let op = lookup("sui_split_coin").unwrap();
        let err = validate(op, &obj(json!({"coin_id":"0x1","amounts": 100}))).unwrap_err();
        assert_eq!(err.parameter, "amounts");
        assert_eq!(
            err.reason,
            ValidationReason::TypeMismatch {
                expected: ParamKind::IntegerList
            }
        );
    }

    #[test]
    fn one_bad_element_fails_list() {
        let op = lookup("sui_split_coin").unwrap();
        let err = validate(
            op,
            &obj(json!({"coin_id":"0x1","amounts":[100, "lots", 300]})),
        )
        .unwrap_err();
        assert_eq!(err.parameter, "amounts");

        let op = lookup("sui_pay_all_sui").unwrap();
        let err = validate(
            op,
            &obj(json!({"input_coins":["0x1", 2], "recipient":"0x9"})),
        )
        .unwrap_err();
        assert_eq!(err.parameter, "input_coins");
    }

    #[test]
    fn empty_list_element_is_mismatch() {
        let op = lookup("sui_pay").unwrap();
        let err = validate(
            op,
            &obj(json!({"input_coins":["", "0xC"], "recipients":["0xA"], "amounts":[1]})),
        )
        .unwrap_err();
        assert_eq!(err.parameter, "input_coins");
        assert_eq!(
            err.reason,
            ValidationReason::TypeMismatch {
                expected: ParamKind::StringList
            }
        );

        let op = lookup("sui_call").unwrap();
        let err = validate(
            op,
            &obj(json!({"package":"0x2","module":"m","function":"f","args":[""]})),
        )
        .unwrap_err();
        assert_eq!(err.parameter, "args");
    }

    #[test]
    fn boolean_must_be_bool() {
        let op = lookup("sui_publish").unwrap();
        let err = validate(
            op,
            &obj(json!({"package_path":"./pkg","skip_dependency_verification":"yes"})),
        )
        .unwrap_err();
        assert_eq!(err.parameter, "skip_dependency_verification");
    }

    #[test]
    fn optional_absent_is_unbound_and_null_is_absent() {
        let op = lookup("sui_transfer").unwrap();
        let args = validate(
            op,
            &obj(json!({"to":"0xA","object_id":"0xB","gas_budget": null})),
        )
        .unwrap();
        assert_eq!(args.iter().count(), 2);
        assert!(args.get("gas_budget").is_none());
    }

    #[test]
    fn default_is_bound() {
        let op = lookup("sui_keytool_generate").unwrap();
        let args = validate(op, &Map::new()).unwrap();
        assert_eq!(
            args.get("key_scheme"),
            Some(&ParamValue::Text("ed25519".into()))
        );
    }

    #[test]
    fn empty_value_falls_back_to_default() {
        let op = lookup("sui_keytool_generate").unwrap();
        let args = validate(op, &obj(json!({"key_scheme": ""}))).unwrap();
        assert_eq!(
            args.get("key_scheme"),
            Some(&ParamValue::Text("ed25519".into()))
        );
        let args = validate(op, &obj(json!({"key_scheme": "secp256k1"}))).unwrap();
        assert_eq!(
            args.get("key_scheme"),
            Some(&ParamValue::Text("secp256k1".into()))
        );
    }

    #[test]
    fn typed_values_produced() {
        let op = lookup("sui_split_coin").unwrap();
        let args = validate(
            op,
            &obj(json!({"coin_id":"0x1","amounts":[100.0, 200],"gas_budget":"5000","extra":1})),
        )
        .unwrap();
        assert_eq!(args.get("coin_id"), Some(&ParamValue::Text("0x1".into())));
        assert_eq!(
            args.get("amounts"),
            Some(&ParamValue::IntegerList(vec![100, 200]))
        );
        assert_eq!(args.get("gas_budget"), Some(&ParamValue::Integer(5000)));
        assert!(args.get("extra").is_none());
    }

    #[test]
    fn emptiness() {
        assert!(ParamValue::Text(String::new()).is_empty());
        assert!(ParamValue::Integer(0).is_empty());
        assert!(ParamValue::Flag(false).is_empty());
        assert!(!ParamValue::IntegerList(vec![0]).is_empty());
        assert_eq!(
            ParamValue::IntegerList(vec![1, 20]).tokens(),
            vec!["1".to_string(), "20".to_string()]
        );
    }
}
