/*!
`serve.rs`

Implements the `serve` subcommand: run the MCP server on stdin/stdout.

stdout carries protocol frames only; every log line goes to stderr.
*/

use std::sync::Arc;

use anyhow::Result;
use clap::Args;
use tracing::info;

use crate::cmd::shared::runtime;
use crate::config::Config;
use crate::engine::Dispatcher;
use crate::mcp;

#[derive(Args, Debug, Default)]
pub struct ServeArgs {}

pub fn execute_serve(_args: ServeArgs, config: &Config) -> Result<()> {
    info!(
        executable = %config.executable_path,
        max_concurrency = config.max_concurrency,
        timeout_secs = config.timeout.map(|t| t.as_secs()),
        "starting sui-mcp"
    );
    let dispatcher = Arc::new(Dispatcher::new(config));
    runtime()?.block_on(mcp::serve_stdio(dispatcher))
}
