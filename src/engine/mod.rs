//! Translation and dispatch engine.
//!
//! catalog lookup -> validate -> build -> executor -> output
//!
//! Everything except `executor` is a pure function over immutable data, so a
//! single `Dispatcher` is shared by every concurrent request.

pub mod build;
pub mod catalog;
pub mod error;
pub mod executor;
pub mod output;
pub mod validate;

use serde_json::{Map, Value};
use tracing::{debug, info, warn};

pub use build::CommandInvocation;
pub use catalog::OperationSpec;
pub use error::DispatchError;
pub use executor::Executor;
pub use output::ToolResult;

use crate::config::Config;

#[derive(Debug, Clone)]
pub struct Dispatcher {
    executor: Executor,
}

impl Dispatcher {
    pub fn new(config: &Config) -> Self {
        Self {
            executor: Executor::new(config),
        }
    }

    pub fn executor(&self) -> &Executor {
        &self.executor
    }

    /// Validate and build without running anything.
    pub fn plan(
        &self,
        name: &str,
        args: &Map<String, Value>,
    ) -> Result<(&'static OperationSpec, CommandInvocation), DispatchError> {
        let op = catalog::lookup(name)
            .ok_or_else(|| DispatchError::UnknownOperation(name.to_string()))?;
        let validated = validate::validate(op, args)?;
        debug!(
            tool = op.name,
            bound = ?validated.iter().map(|(k, _)| k).collect::<Vec<_>>(),
            "arguments validated"
        );
        Ok((op, build::build(op, &validated)))
    }

    pub async fn dispatch(
        &self,
        name: &str,
        args: &Map<String, Value>,
    ) -> Result<ToolResult, DispatchError> {
        let (op, invocation) = self.plan(name, args).inspect_err(|e| {
            debug!(tool = name, error = %e, "rejected before execution");
        })?;

        info!(tool = op.name, "dispatching");
        let outcome = self.executor.run(&invocation).await;
        let result = output::format(op, outcome);
        if let Err(e) = &result {
            warn!(tool = op.name, error = %e, "tool failed");
        }
        result
    }
}
