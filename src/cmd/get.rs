/*!
`get.rs`

Implements the `get` subcommand: detailed view of a single tool.

Human output:
  - boxed header with the tool name and output mode
  - synopsis of the generated `sui` command line
  - parameter table: NAME | TYPE | REQ | FLAG | DEFAULT | DESCRIPTION

JSON Output Shape:
{
  "status": "ok",
  "name": "sui_split_coin",
  "description": "...",
  "synopsis": "sui client split-coin --coin-id <coin_id> ...",
  "output": "raw",
  "input_schema": { ...same schema the MCP server advertises... },
  "parameters": [
    {"name":"coin_id","type":"string","required":true,"flag":"--coin-id",
     "default":null,"description":"..."}
  ]
}
*/

use anyhow::Result;
use clap::Args;
use serde_json::{Value, json};

use crate::cmd::format::{Role, StyleOptions, TableOpts, box_header, color, emoji, table};
use crate::cmd::shared::{find_operation, param_rows};
use crate::config::Config;
use crate::engine::Executor;
use crate::engine::catalog::OperationSpec;
use crate::mcp;

/// CLI arguments for `sui-mcp get <TOOL>`
#[derive(Args, Debug)]
pub struct GetArgs {
    /// Tool name (case-insensitive)
    #[arg(value_name = "TOOL")]
    pub name: String,

    /// Output JSON instead of human-readable text
    #[arg(long)]
    pub json: bool,
}

pub fn execute_get(args: GetArgs, config: &Config) -> Result<()> {
    let op = find_operation(&args.name)?;
    let synopsis = Executor::new(config).synopsis(op);

    if args.json {
        println!("{}", serde_json::to_string_pretty(&tool_json(op, &synopsis))?);
        return Ok(());
    }

    let style = StyleOptions::detect();
    println!("{}", render(op, &synopsis, &style));
    Ok(())
}

fn tool_json(op: &'static OperationSpec, synopsis: &str) -> Value {
    let parameters: Vec<Value> = op
        .params
        .iter()
        .map(|p| {
            json!({
                "name": p.name,
                "type": p.kind.as_str(),
                "required": p.required,
                "flag": p.encoding.flag_name().map(|f| format!("--{f}")),
                "default": p.default,
                "description": p.description,
            })
        })
        .collect();
    json!({
        "status": "ok",
        "name": op.name,
        "description": op.description,
        "synopsis": synopsis,
        "output": op.output.as_str(),
        "input_schema": Value::Object(mcp::input_schema(op)),
        "parameters": parameters,
    })
}

fn render(op: &OperationSpec, synopsis: &str, style: &StyleOptions) -> String {
    let mut out = Vec::new();
    out.push(box_header(
        format!("{} {}", emoji("tool", style), op.name),
        Some(format!("output={}", op.output.as_str())),
        style,
    ));
    out.push(op.description.to_string());
    out.push(String::new());
    out.push(format!(
        "{} {}",
        color(Role::Accent, "Command:", style),
        synopsis
    ));
    out.push(String::new());

    if op.params.is_empty() {
        out.push(color(
            Role::Dim,
            format!("{} No parameters", emoji("info", style)),
            style,
        ));
        return out.join("\n");
    }

    let rows: Vec<Vec<String>> = param_rows(op)
        .into_iter()
        .map(|(name, kind, required, form, default, desc)| {
            let req = if required {
                color(Role::Success, "yes", style)
            } else {
                "no".to_string()
            };
            let default = if default.is_empty() { "-".to_string() } else { default };
            vec![name, kind, req, form, default, desc]
        })
        .collect();
    out.push(color(Role::Accent, "Parameters:", style));
    out.push(table(
        &["NAME", "TYPE", "REQ", "FLAG", "DEFAULT", "DESCRIPTION"],
        &rows,
        TableOpts::default(),
        style,
    ));
    out.join("\n")
}
