//! Error taxonomy for the dispatch pipeline.

use std::fmt;

use thiserror::Error;

use super::catalog::ParamKind;

/// Why a single parameter was rejected.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValidationReason {
    MissingRequired,
    TypeMismatch { expected: ParamKind },
}

impl fmt::Display for ValidationReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ValidationReason::MissingRequired => f.write_str("missing required parameter"),
            ValidationReason::TypeMismatch { expected } => {
                write!(f, "type mismatch (expected {expected})")
            }
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("invalid parameter '{parameter}': {reason}")]
pub struct ValidationError {
    pub parameter: &'static str,
    pub reason: ValidationReason,
}

impl ValidationError {
    pub fn missing(parameter: &'static str) -> Self {
        Self {
            parameter,
            reason: ValidationReason::MissingRequired,
        }
    }

    pub fn mismatch(parameter: &'static str, expected: ParamKind) -> Self {
        Self {
            parameter,
            reason: ValidationReason::TypeMismatch { expected },
        }
    }
}

/// Every way a tool invocation can fail. None of these are retried.
#[derive(Debug, Error)]
pub enum DispatchError {
    #[error("unknown operation: {0}")]
    UnknownOperation(String),

    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error("failed to start '{program}': {reason}")]
    Spawn { program: String, reason: String },

    /// The program ran and exited unsuccessfully. `stderr` is kept verbatim.
    #[error("command failed ({status}){}", stderr_suffix(.stderr))]
    Execution { status: String, stderr: String },

    #[error("command timed out after {secs}s")]
    Timeout { secs: u64 },

    #[error("output is not valid JSON: {source}")]
    OutputParse {
        #[source]
        source: serde_json::Error,
    },
}

impl DispatchError {
    /// Caller-correctable errors: the command never ran.
    pub fn is_caller_error(&self) -> bool {
        matches!(
            self,
            DispatchError::UnknownOperation(_) | DispatchError::Validation(_)
        )
    }

    /// Captured stderr, when the failure carries any.
    pub fn stderr(&self) -> Option<&str> {
        match self {
            DispatchError::Execution { stderr, .. } if !stderr.is_empty() => Some(stderr),
            _ => None,
        }
    }
}

fn stderr_suffix(stderr: &str) -> String {
    let trimmed = stderr.trim_end();
    if trimmed.is_empty() {
        String::new()
    } else {
        format!(": {trimmed}")
    }
}
