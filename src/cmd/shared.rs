/*!
shared.rs - shared helpers for subcommands.

Focus:
  - runtime(): one Tokio runtime per command invocation (main stays sync)
  - find_operation: case-insensitive catalog lookup with a helpful error
  - KEY=VALUE collection + param file loading (JSON / YAML)
  - build_arguments: raw CLI strings -> JSON argument object, coerced by
    the operation's declared parameter kinds
  - param_rows: parameter table rows shared by `list` / `get`
*/

use anyhow::{Context, Result};
use serde_json::{Map, Value};

use crate::engine::catalog::{self, Encoding, OperationSpec, ParamKind};

/* ---- Runtime ---- */

pub fn runtime() -> Result<tokio::runtime::Runtime> {
    tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()
        .context("Failed to create Tokio runtime")
}

/* ---- Catalog Lookup ---- */

pub fn find_operation(name: &str) -> Result<&'static OperationSpec> {
    let name = name.trim();
    if name.is_empty() {
        anyhow::bail!("tool name cannot be empty");
    }
    catalog::lookup_ci(name).ok_or_else(|| {
        anyhow::anyhow!("unknown tool '{name}' (run `sui-mcp list` to see all tools)")
    })
}

/* ---- Parameter Collection ---- */

/// Parse repeated `--param KEY=VALUE` entries. Later entries win.
pub fn collect_params(raw: &[String]) -> Result<Vec<(String, String)>> {
    let mut out: Vec<(String, String)> = Vec::with_capacity(raw.len());
    for kv in raw {
        let Some((k, v)) = kv.split_once('=') else {
            anyhow::bail!("invalid --param (expected KEY=VALUE): {kv}");
        };
        let key = k.trim();
        if key.is_empty() {
            anyhow::bail!("invalid --param (empty key): {kv}");
        }
        out.retain(|(existing, _)| existing != key);
        out.push((key.to_string(), v.trim().to_string()));
    }
    Ok(out)
}

/// Load a JSON or YAML object of parameters. Values keep their JSON types.
pub fn load_param_file(path: &str) -> Result<Map<String, Value>> {
    let raw = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read param file: {path}"))?;
    let lower = path.to_ascii_lowercase();

    let value: Value = if lower.ends_with(".yaml") || lower.ends_with(".yml") {
        let yaml_v: serde_yaml::Value =
            serde_yaml::from_str(&raw).context("failed to parse YAML param file")?;
        serde_json::to_value(yaml_v).context("failed to convert YAML to JSON")?
    } else {
        serde_json::from_str(&raw).context("failed to parse JSON param file")?
    };

    match value {
        Value::Object(map) => Ok(map),
        _ => anyhow::bail!("param file root must be an object"),
    }
}

/// Merge file values and CLI pairs into one argument object.
///
/// - File values are used as-is.
/// - CLI values override file values and are coerced by the declared kind.
/// - Keys the operation does not declare are passed through as strings;
///   the validator ignores them.
pub fn build_arguments(
    op: &OperationSpec,
    file: Map<String, Value>,
    cli: &[(String, String)],
) -> Map<String, Value> {
    let mut args = file;
    for (k, v) in cli {
        let value = match op.param(k) {
            Some(spec) => coerce_value(v, spec.kind),
            None => Value::String(v.clone()),
        };
        args.insert(k.clone(), value);
    }
    args
}

/// Attempt to coerce a raw string into JSON according to a parameter kind.
///
/// Values that do not fit are left as strings so the validator reports the
/// mismatch with the parameter name attached.
pub fn coerce_value(raw: &str, kind: ParamKind) -> Value {
    match kind {
        ParamKind::String => Value::String(raw.to_string()),
        ParamKind::Integer => coerce_integer(raw),
        ParamKind::Boolean => match raw.to_ascii_lowercase().as_str() {
            "true" | "1" | "yes" | "y" => Value::Bool(true),
            "false" | "0" | "no" | "n" => Value::Bool(false),
            _ => Value::String(raw.to_string()),
        },
        ParamKind::StringList => Value::Array(
            split_list(raw)
                .map(|s| Value::String(s.to_string()))
                .collect(),
        ),
        ParamKind::IntegerList => Value::Array(split_list(raw).map(coerce_integer).collect()),
    }
}

fn coerce_integer(raw: &str) -> Value {
    let raw = raw.trim();
    raw.parse::<u64>()
        .map(|n| Value::Number(n.into()))
        .ok()
        .or_else(|| {
            raw.parse::<f64>()
                .ok()
                .and_then(serde_json::Number::from_f64)
                .map(Value::Number)
        })
        .unwrap_or_else(|| Value::String(raw.to_string()))
}

fn split_list(raw: &str) -> impl Iterator<Item = &str> {
    raw.split(',').map(str::trim).filter(|s| !s.is_empty())
}

/* ---- Display Helpers ---- */

/// (name, type, required, cli form, default, description)
pub type ParamRow = (String, String, bool, String, String, String);

pub fn param_rows(op: &OperationSpec) -> Vec<ParamRow> {
    op.params
        .iter()
        .map(|p| {
            let form = match p.encoding {
                Encoding::Positional => "<positional>".to_string(),
                Encoding::Flag(f) => format!("--{f}"),
                Encoding::RepeatedFlag(f) => format!("--{f} (repeated)"),
                Encoding::JoinedFlag(f) => format!("--{f} (a,b,...)"),
                Encoding::Switch(f) => format!("--{f} (switch)"),
            };
            let default = p.default.unwrap_or_default().to_string();
            (
                p.name.to_string(),
                p.kind.to_string(),
                p.required,
                form,
                default,
                p.description.to_string(),
            )
        })
        .collect()
}

/* ---- Tests (basic) ---- */
#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn coerce_integer_kinds() {
        assert_eq!(coerce_value("42", ParamKind::Integer), json!(42));
        assert_eq!(coerce_value("5.0", ParamKind::Integer), json!(5.0));
        assert_eq!(
            coerce_value("x42", ParamKind::Integer),
            json!("x42"),
            "invalid integer remains string"
        );
    }

    #[test]
    fn coerce_boolean() {
        assert_eq!(coerce_value("true", ParamKind::Boolean), json!(true));
        assert_eq!(coerce_value("No", ParamKind::Boolean), json!(false));
        assert_eq!(coerce_value("maybe", ParamKind::Boolean), json!("maybe"));
    }

    #[test]
    fn coerce_lists() {
        assert_eq!(
            coerce_value("a,b, c", ParamKind::StringList),
            json!(["a", "b", "c"]),
            "comma splitting with trimming"
        );
        assert_eq!(
            coerce_value("100, 200", ParamKind::IntegerList),
            json!([100, 200])
        );
        assert_eq!(coerce_value("", ParamKind::StringList), json!([]));
    }

    #[test]
    fn collect_params_last_wins() {
        let raw = vec!["a=1".to_string(), "b = x ".to_string(), "a=2".to_string()];
        let got = collect_params(&raw).unwrap();
        assert_eq!(
            got,
            vec![("b".to_string(), "x".to_string()), ("a".to_string(), "2".to_string())]
        );
    }

    #[test]
    fn collect_params_rejects_malformed() {
        assert!(collect_params(&["novalue".to_string()]).is_err());
        assert!(collect_params(&["=v".to_string()]).is_err());
    }

    #[test]
    fn build_arguments_cli_overrides_file() {
        let op = catalog::lookup("sui_split_coin").unwrap();
        let file = json!({"coin_id": "0xfile", "amounts": [1]})
            .as_object()
            .cloned()
            .unwrap();
        let cli = vec![
            ("amounts".to_string(), "10,20".to_string()),
            ("note".to_string(), "hi".to_string()),
        ];
        let args = build_arguments(op, file, &cli);
        assert_eq!(args["coin_id"], json!("0xfile"));
        assert_eq!(args["amounts"], json!([10, 20]));
        assert_eq!(args["note"], json!("hi"));
    }

    #[test]
    fn param_file_yaml() {
        let path = std::env::temp_dir().join("sui_mcp_param_test.yaml");
        std::fs::write(&path, "coin_id: \"0x1\"\namounts: [100, 200]\n").unwrap();
        let map = load_param_file(path.to_str().unwrap()).unwrap();
        assert_eq!(map["coin_id"], json!("0x1"));
        assert_eq!(map["amounts"], json!([100, 200]));
    }

    #[test]
    fn param_file_root_must_be_object() {
        let path = std::env::temp_dir().join("sui_mcp_param_test_array.json");
        std::fs::write(&path, "[1, 2]").unwrap();
        assert!(load_param_file(path.to_str().unwrap()).is_err());
    }

    #[test]
    fn find_operation_errors() {
        assert_eq!(find_operation("Sui_Gas").unwrap().name, "sui_gas");
        assert!(find_operation("  ").is_err());
        let err = find_operation("sui_nope").unwrap_err();
        assert!(err.to_string().contains("unknown tool"));
    }

    #[test]
    fn param_rows_describe_encoding() {
        let op = catalog::lookup("sui_keytool_generate").unwrap();
        let rows = param_rows(op);
        assert_eq!(rows[0].0, "key_scheme");
        assert_eq!(rows[0].3, "<positional>");
        assert_eq!(rows[0].4, "ed25519");
        assert_eq!(rows[1].3, "--derivation-path");
    }
}
