/*!
`list.rs`

Implements the `list` subcommand: print every tool in the catalog.

Nothing is spawned; the catalog is static.

JSON Output Shape:
{
  "status": "ok",
  "count": 30,
  "tools": [
    { "name": "sui_gas", "description": "...", "output": "raw",
      "parameters": ["address"], "required": [] }
  ]
}
*/

use anyhow::Result;
use clap::Args;
use serde_json::{Value, json};

use crate::cmd::format::{Role, StyleOptions, TableOpts, box_header, color, emoji, table};
use crate::engine::catalog::{CATALOG, OperationSpec};

/// CLI arguments for `sui-mcp list`
#[derive(Args, Debug)]
pub struct ListArgs {
    /// Output JSON instead of human-readable text
    #[arg(long)]
    pub json: bool,
}

pub fn execute_list(args: ListArgs) -> Result<()> {
    if args.json {
        println!("{}", serde_json::to_string_pretty(&list_json())?);
        return Ok(());
    }

    let style = StyleOptions::detect();
    println!(
        "{}",
        box_header(
            format!("{} Tools ({})", emoji("list", &style), CATALOG.len()),
            Some("wrapping the sui CLI"),
            &style,
        )
    );
    println!("{}", render_table(&style));
    println!(
        "\n{} {}",
        emoji("info", &style),
        color(
            Role::Dim,
            "Use `sui-mcp get <tool>` for parameters and the generated command line",
            &style
        )
    );
    Ok(())
}

fn list_json() -> Value {
    let tools: Vec<Value> = CATALOG
        .iter()
        .map(|op| {
            json!({
                "name": op.name,
                "description": op.description,
                "output": op.output.as_str(),
                "parameters": op.params.iter().map(|p| p.name).collect::<Vec<_>>(),
                "required": op.required_params().map(|p| p.name).collect::<Vec<_>>(),
            })
        })
        .collect();
    json!({
        "status": "ok",
        "count": tools.len(),
        "tools": tools,
    })
}

fn render_table(style: &StyleOptions) -> String {
    let rows: Vec<Vec<String>> = CATALOG
        .iter()
        .map(|op| {
            vec![
                op.name.to_string(),
                param_summary(op),
                op.output.as_str().to_string(),
                op.description.to_string(),
            ]
        })
        .collect();
    table(
        &["NAME", "PARAMS", "OUTPUT", "DESCRIPTION"],
        &rows,
        TableOpts::default(),
        style,
    )
}

/// `coin_id*:string, gas_budget:integer` (required marked with `*`)
fn param_summary(op: &OperationSpec) -> String {
    if op.params.is_empty() {
        return "-".to_string();
    }
    op.params
        .iter()
        .map(|p| {
            let mark = if p.required { "*" } else { "" };
            format!("{}{mark}:{}", p.name, p.kind)
        })
        .collect::<Vec<_>>()
        .join(", ")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::catalog::lookup;
    use clap::Parser;

    #[derive(Parser, Debug)]
    struct TestCli {
        #[command(subcommand)]
        cmd: TestSub,
    }

    #[derive(clap::Subcommand, Debug)]
    enum TestSub {
        List(ListArgs),
    }

    #[test]
    fn clap_parses_list_json() {
        let cli = TestCli::try_parse_from(["t", "list", "--json"]).unwrap();
        let TestSub::List(a) = cli.cmd;
        assert!(a.json);
    }

    #[test]
    fn json_lists_whole_catalog() {
        let v = list_json();
        assert_eq!(v["status"], "ok");
        assert_eq!(v["count"], CATALOG.len());
        let split = v["tools"]
            .as_array()
            .unwrap()
            .iter()
            .find(|t| t["name"] == "sui_split_coin")
            .unwrap();
        assert_eq!(split["required"], json!(["coin_id", "amounts"]));
    }

    #[test]
    fn summary_marks_required() {
        assert_eq!(param_summary(lookup("sui_version").unwrap()), "-");
        let s = param_summary(lookup("sui_object").unwrap());
        assert!(s.starts_with("object_id*:string"));
    }

    #[test]
    fn table_has_a_row_per_tool() {
        let t = render_table(&StyleOptions::plain(200));
        assert_eq!(t.lines().count(), CATALOG.len() + 2);
    }
}
