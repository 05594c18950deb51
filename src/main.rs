use std::path::PathBuf;

use anyhow::Result;
use clap::{Parser, Subcommand};

mod cmd;
mod config;
mod engine;
mod mcp;
mod utils;

use cmd::{ExecArgs, GetArgs, ListArgs, ServeArgs};
use config::{Config, Overrides};

/// sui-mcp - MCP server exposing the Sui CLI as tools
///
/// Command layout:
///   sui-mcp serve                                  Run the MCP server on stdio
///   sui-mcp list [--json]                          List every tool
///   sui-mcp get <tool> [--json]                    Show one tool in detail
///   sui-mcp exec <tool> [--param k=v ...] [--param-file f] [--json] [--dry-run]
///
/// Global flags / env:
///   -v / -vv              Increase verbosity (logs go to stderr)
///   -q / --quiet          Errors only
///   --config PATH         YAML config (or SUI_MCP_CONFIG)
///   --sui-path PATH       Sui executable (or SUI_EXECUTABLE_PATH)
///   --max-concurrency N   Concurrent sui processes
///   --timeout-secs N      Per-call limit, 0 = none
///   RUST_LOG              Overrides the -v / -q level
///
/// Examples:
///   sui-mcp serve --sui-path ~/.cargo/bin/sui
///   sui-mcp exec sui_balance --param address=0x2
///   sui-mcp exec sui_split_coin --param coin_id=0x1 --param amounts=100,200 --dry-run
#[derive(Parser, Debug)]
#[command(
    name = "sui-mcp",
    version,
    author,
    about = "sui-mcp - Model Context Protocol server for the Sui CLI",
    propagate_version = true,
    disable_help_subcommand = true
)]
pub struct Cli {
    /// Increase verbosity (-v, -vv)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    /// Silence all non-error output
    #[arg(short, long, global = true)]
    quiet: bool,

    /// YAML configuration file
    #[arg(long, global = true, value_name = "PATH")]
    config: Option<PathBuf>,

    /// Path to the sui executable
    #[arg(long = "sui-path", global = true, value_name = "PATH")]
    sui_path: Option<String>,

    /// Maximum number of concurrently running sui processes
    #[arg(long, global = true, value_name = "N")]
    max_concurrency: Option<usize>,

    /// Per-call timeout in seconds (0 disables)
    #[arg(long, global = true, value_name = "SECS")]
    timeout_secs: Option<u64>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Serve MCP over stdin/stdout
    Serve(ServeArgs),

    /// List all tools
    List(ListArgs),

    /// Show detailed information for one tool
    Get(GetArgs),

    /// Execute (invoke) a tool directly
    Exec(ExecArgs),
}

impl Cli {
    fn overrides(&self) -> Overrides {
        Overrides {
            config_file: self.config.clone(),
            executable_path: self.sui_path.clone(),
            max_concurrency: self.max_concurrency,
            timeout_secs: self.timeout_secs,
        }
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let level = utils::derive_level(cli.verbose, cli.quiet);
    utils::init_logging(level);

    let overrides = cli.overrides();
    match cli.command {
        Commands::Serve(args) => cmd::execute_serve(args, &Config::load(&overrides)?),
        Commands::List(args) => cmd::execute_list(args),
        Commands::Get(args) => cmd::execute_get(args, &Config::load(&overrides)?),
        Commands::Exec(args) => cmd::execute_exec(args, &Config::load(&overrides)?),
    }
}
