/*!
Subcommand modules. Each exposes one `execute_*` entry point returning
`anyhow::Result<()>` and a `clap::Args` struct.

  serve.rs   MCP server on stdio
  list.rs    catalog overview
  get.rs     single tool detail
  exec.rs    direct tool invocation
  shared.rs  runtime, lookup, parameter helpers
  format.rs  colour / box / table rendering for human output
*/

pub mod exec;
pub mod format;
pub mod get;
pub mod list;
pub mod serve;
pub mod shared;

pub use exec::{ExecArgs, execute_exec};
pub use get::{GetArgs, execute_get};
pub use list::{ListArgs, execute_list};
pub use serve::{ServeArgs, execute_serve};
