/*!
`exec.rs`

Implements the `exec` subcommand: run one catalog tool directly, through the
same validate -> build -> spawn -> format pipeline the MCP server uses.

Parameter injection:
  --param KEY=VALUE               (repeatable; coerced by the declared kind,
                                   lists are comma separated)
  --param-file params.(json|yaml) (typed values; CLI --param overrides)
  --dry-run                       (validate + print the command, spawn nothing)

JSON Success Output:
{
  "status": "ok",
  "tool": "sui_gas",
  "elapsed_ms": 42,
  "arguments": { ... },
  "command": "sui client gas 0x1",
  "output": "<stdout>",
  "structured": { ... }          (json-mode tools only)
}

JSON Error Output:
{
  "status": "error",
  "error": "message",
  "stderr": "..."                (when the program wrote any)
}
*/

use std::time::Instant;

use anyhow::Result;
use clap::Args;
use serde_json::{Map, Value, json};

use crate::cmd::format::{Role, StyleOptions, TableOpts, box_header, color, emoji, table};
use crate::cmd::shared::{
    build_arguments, collect_params, find_operation, load_param_file, runtime,
};
use crate::config::Config;
use crate::engine::{DispatchError, Dispatcher, OperationSpec, ToolResult};

#[derive(Args, Debug)]
pub struct ExecArgs {
    /// Tool name to invoke (case-insensitive)
    #[arg(value_name = "TOOL")]
    pub tool: String,

    /// Provide parameter (KEY=VALUE), repeatable
    #[arg(long = "param", value_name = "KEY=VALUE")]
    pub params: Vec<String>,

    /// Load parameters from file (JSON or YAML). CLI --param overrides file entries
    #[arg(long = "param-file", value_name = "PATH")]
    pub param_file: Option<String>,

    /// Output JSON
    #[arg(long)]
    pub json: bool,

    /// Validate and print the command line without running it
    #[arg(long)]
    pub dry_run: bool,
}

pub fn execute_exec(args: ExecArgs, config: &Config) -> Result<()> {
    let (op, arguments) = match prepare(&args) {
        Ok(v) => v,
        Err(e) => return output_error(args.json, &e.to_string(), None),
    };
    let dispatcher = Dispatcher::new(config);

    if args.dry_run {
        return match dispatcher.plan(op.name, &arguments) {
            Ok((_, invocation)) => {
                let command = dispatcher.executor().command_line(&invocation);
                print_dry_run(args.json, op, &arguments, &command);
                Ok(())
            }
            Err(e) => {
                print_hint(args.json, op, &e);
                output_error(args.json, &e.to_string(), None)
            }
        };
    }

    let command = dispatcher
        .plan(op.name, &arguments)
        .map(|(_, inv)| dispatcher.executor().command_line(&inv))
        .ok();

    let started = Instant::now();
    let rt = runtime()?;
    let result = rt.block_on(dispatcher.dispatch(op.name, &arguments));
    let elapsed_ms = started.elapsed().as_millis();

    match result {
        Ok(out) => {
            if args.json {
                let report = success_json(op, elapsed_ms, &arguments, command.as_deref(), &out);
                println!("{}", serde_json::to_string_pretty(&report)?);
            } else {
                print_success(op, elapsed_ms, &arguments, &out);
            }
            Ok(())
        }
        Err(e) => {
            print_hint(args.json, op, &e);
            output_error(args.json, &e.to_string(), e.stderr())
        }
    }
}

/// Resolve the tool and merge parameters from file and command line.
fn prepare(args: &ExecArgs) -> Result<(&'static OperationSpec, Map<String, Value>)> {
    let op = find_operation(&args.tool)?;
    let cli = collect_params(&args.params)?;
    let file = match &args.param_file {
        Some(path) => load_param_file(path)?,
        None => Map::new(),
    };
    Ok((op, build_arguments(op, file, &cli)))
}

/* ---- Output Helpers ---- */

fn success_json(
    op: &OperationSpec,
    elapsed_ms: u128,
    arguments: &Map<String, Value>,
    command: Option<&str>,
    out: &ToolResult,
) -> Value {
    let mut report = json!({
        "status": "ok",
        "tool": op.name,
        "elapsed_ms": elapsed_ms,
        "arguments": arguments,
        "command": command,
        "output": out.text(),
    });
    if let (Some(structured), Value::Object(map)) = (out.structured(), &mut report) {
        map.insert("structured".into(), structured.clone());
    }
    report
}

fn print_success(
    op: &OperationSpec,
    elapsed_ms: u128,
    arguments: &Map<String, Value>,
    out: &ToolResult,
) {
    let style = StyleOptions::detect();
    println!(
        "{}",
        box_header(
            format!("{} Exec Success ({})", emoji("success", &style), op.name),
            Some(format!("{elapsed_ms} ms")),
            &style,
        )
    );
    if !arguments.is_empty() {
        println!("{}", color(Role::Accent, "Arguments:", &style));
        println!("{}", arguments_table(arguments, &style));
        println!();
    }
    let text = out.text();
    if text.ends_with('\n') {
        print!("{text}");
    } else {
        println!("{text}");
    }
}

fn print_dry_run(json: bool, op: &OperationSpec, arguments: &Map<String, Value>, command: &str) {
    if json {
        let v = json!({
            "status": "ok",
            "tool": op.name,
            "dry_run": true,
            "arguments": arguments,
            "command": command,
        });
        println!(
            "{}",
            serde_json::to_string_pretty(&v).unwrap_or_else(|_| v.to_string())
        );
        return;
    }
    let style = StyleOptions::detect();
    println!(
        "{}",
        box_header(
            format!("{} Dry Run ({})", emoji("dry", &style), op.name),
            Some("nothing was executed"),
            &style,
        )
    );
    println!("{command}");
}

fn arguments_table(arguments: &Map<String, Value>, style: &StyleOptions) -> String {
    let mut rows: Vec<Vec<String>> = arguments
        .iter()
        .map(|(k, v)| {
            let v_str = match v {
                Value::String(s) => s.clone(),
                other => other.to_string(),
            };
            vec![k.clone(), v_str]
        })
        .collect();
    rows.sort_by(|a, b| a[0].cmp(&b[0]));
    table(&["NAME", "VALUE"], &rows, TableOpts::default(), style)
}

/// Point the user at the parameter list when the request itself was wrong.
fn print_hint(json: bool, op: &OperationSpec, err: &DispatchError) {
    if json || !err.is_caller_error() {
        return;
    }
    let style = StyleOptions::detect();
    println!(
        "{} {}",
        emoji("info", &style),
        color(
            Role::Dim,
            format!("Run `sui-mcp get {}` to see its parameters", op.name),
            &style
        )
    );
}

fn output_error(json: bool, msg: &str, stderr: Option<&str>) -> Result<()> {
    if json {
        let mut err = json!({"status": "error", "error": msg});
        if let (Some(s), Value::Object(map)) = (stderr, &mut err) {
            map.insert("stderr".into(), Value::from(s));
        }
        println!(
            "{}",
            serde_json::to_string_pretty(&err).unwrap_or_else(|_| err.to_string())
        );
    } else {
        let style = StyleOptions::detect();
        let title = format!("{} Exec Error", emoji("error", &style));
        let first_line = msg.lines().next().unwrap_or(msg);
        println!(
            "{}",
            box_header(title, Some(color(Role::Error, first_line, &style)), &style)
        );
        if let Some(s) = stderr {
            println!("{}", color(Role::Dim, s.trim_end(), &style));
        }
    }
    anyhow::bail!(msg.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn exec_args(tool: &str, params: &[&str]) -> ExecArgs {
        ExecArgs {
            tool: tool.to_string(),
            params: params.iter().map(|s| s.to_string()).collect(),
            param_file: None,
            json: true,
            dry_run: false,
        }
    }

    #[test]
    fn prepare_coerces_cli_values() {
        let (op, args) = prepare(&exec_args(
            "SUI_SPLIT_COIN",
            &["coin_id=0x1", "amounts=100,200", "gas_budget=5000"],
        ))
        .unwrap();
        assert_eq!(op.name, "sui_split_coin");
        assert_eq!(args["amounts"], json!([100, 200]));
        assert_eq!(args["gas_budget"], json!(5000));
    }

    #[test]
    fn prepare_merges_param_file() {
        let path = std::env::temp_dir().join("sui_mcp_exec_params.json");
        std::fs::write(&path, r#"{ "to": "0xfile", "object_id": "0x9" }"#).unwrap();
        let mut a = exec_args("sui_transfer", &["to=0xcli"]);
        a.param_file = Some(path.to_string_lossy().into_owned());
        let (_, args) = prepare(&a).unwrap();
        assert_eq!(args["to"], json!("0xcli"));
        assert_eq!(args["object_id"], json!("0x9"));
    }

    #[test]
    fn prepare_unknown_tool() {
        assert!(prepare(&exec_args("sui_nope", &[])).is_err());
    }

    #[test]
    fn success_report_carries_structured_value() {
        let op = crate::engine::catalog::lookup("sui_objects").unwrap();
        let out = ToolResult::Structured {
            text: "[]".into(),
            value: json!([]),
        };
        let v = success_json(op, 3, &Map::new(), Some("sui client objects --json"), &out);
        assert_eq!(v["status"], "ok");
        assert_eq!(v["output"], "[]");
        assert_eq!(v["structured"], json!([]));

        let v = success_json(op, 3, &Map::new(), None, &ToolResult::Text("x".into()));
        assert!(v.get("structured").is_none());
        assert!(v["command"].is_null());
    }

    #[test]
    fn output_error_returns_err() {
        let r = output_error(true, "boom", Some("detail"));
        assert_eq!(r.unwrap_err().to_string(), "boom");
    }

    #[cfg(unix)]
    #[test]
    fn exec_runs_through_dispatcher() {
        let config = Config {
            executable_path: "echo".into(),
            ..Config::default()
        };
        assert!(execute_exec(exec_args("sui_gas", &["address=0x1"]), &config).is_ok());
    }

    #[test]
    fn dry_run_never_spawns() {
        let config = Config {
            executable_path: "sui-mcp-test-no-such-binary".into(),
            ..Config::default()
        };
        let mut a = exec_args("sui_object", &["object_id=0x5"]);
        a.dry_run = true;
        assert!(execute_exec(a, &config).is_ok());

        let mut a = exec_args("sui_object", &[]);
        a.dry_run = true;
        assert!(execute_exec(a, &config).is_err(), "validation still applies");
    }
}
