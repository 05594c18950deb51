//! Result formatting: picks the trimming policy per operation and turns
//! failures into `DispatchError`s. Captured text is never rewritten.

use serde_json::Value;

use super::catalog::{OperationSpec, OutputPolicy};
use super::error::DispatchError;
use super::executor::{ExecutionOutcome, Failure, FailureCause};

/// Payload returned to the caller.
#[derive(Debug, Clone, PartialEq)]
pub enum ToolResult {
    Text(String),
    /// The program's own JSON, verbatim, plus its parsed form.
    Structured { text: String, value: Value },
}

impl ToolResult {
    pub fn text(&self) -> &str {
        match self {
            ToolResult::Text(t) => t,
            ToolResult::Structured { text, .. } => text,
        }
    }

    pub fn structured(&self) -> Option<&Value> {
        match self {
            ToolResult::Text(_) => None,
            ToolResult::Structured { value, .. } => Some(value),
        }
    }
}

pub fn format(op: &OperationSpec, outcome: ExecutionOutcome) -> Result<ToolResult, DispatchError> {
    let stdout = match outcome {
        ExecutionOutcome::Success { stdout } => stdout,
        ExecutionOutcome::Failure(f) => return Err(f.into()),
    };

    match op.output {
        OutputPolicy::Trimmed => Ok(ToolResult::Text(stdout.trim().to_string())),
        OutputPolicy::Verbatim => Ok(ToolResult::Text(stdout)),
        OutputPolicy::Json => {
            let value: Value = serde_json::from_str(&stdout)
                .map_err(|source| DispatchError::OutputParse { source })?;
            Ok(ToolResult::Structured {
                text: stdout,
                value,
            })
        }
    }
}

impl From<Failure> for DispatchError {
    fn from(f: Failure) -> Self {
        match f.cause {
            FailureCause::Spawn { program, reason } => DispatchError::Spawn { program, reason },
            cause @ FailureCause::Exit { .. } => DispatchError::Execution {
                status: cause.describe(),
                stderr: f.stderr,
            },
            FailureCause::TimedOut { after } => DispatchError::Timeout {
                secs: after.as_secs(),
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::catalog::lookup;

    fn ok(s: &str) -> ExecutionOutcome {
        ExecutionOutcome::Success { stdout: s.into() }
    }

    #[test]
    fn trimmed_policy() {
        let op = lookup("sui_version").unwrap();
        let r = format(op, ok("  sui 1.40.1-abc\n")).unwrap();
        assert_eq!(r, ToolResult::Text("sui 1.40.1-abc".into()));
    }

    #[test]
    fn verbatim_policy_keeps_layout() {
        let op = lookup("sui_gas").unwrap();
        let table = "\n ╭────╮\n │ id │\n ╰────╯\n";
        let r = format(op, ok(table)).unwrap();
        assert_eq!(r.text(), table);
        assert!(r.structured().is_none());
    }

    #[test]
    fn json_policy_returns_raw_text_and_value() {
        let op = lookup("sui_object").unwrap();
        let raw = "{\n  \"objectId\": \"0x5\",\n  \"version\": \"7\"\n}\n";
        let r = format(op, ok(raw)).unwrap();
        assert_eq!(r.text(), raw);
        assert_eq!(r.structured().unwrap()["objectId"], "0x5");
    }

    #[test]
    fn json_policy_rejects_malformed() {
        let op = lookup("sui_objects").unwrap();
        let err = format(op, ok("client objects --json\n")).unwrap_err();
        assert!(matches!(err, DispatchError::OutputParse { .. }));
        assert!(err.to_string().starts_with("output is not valid JSON"));
    }

    #[test]
    fn exit_failure_becomes_execution_error() {
        let op = lookup("sui_split_coin").unwrap();
        let outcome = ExecutionOutcome::Failure(Failure {
            cause: FailureCause::Exit { code: Some(1) },
            stderr: "insufficient gas".into(),
        });
        let err = format(op, outcome).unwrap_err();
        match &err {
            DispatchError::Execution { stderr, .. } => assert_eq!(stderr, "insufficient gas"),
            other => panic!("unexpected {other:?}"),
        }
        assert!(err.to_string().contains("insufficient gas"));
    }

    #[test]
    fn spawn_failure_maps() {
        let op = lookup("sui_version").unwrap();
        let outcome = ExecutionOutcome::Failure(Failure {
            cause: FailureCause::Spawn {
                program: "sui".into(),
                reason: "No such file or directory (os error 2)".into(),
            },
            stderr: String::new(),
        });
        let err = format(op, outcome).unwrap_err();
        assert!(matches!(err, DispatchError::Spawn { .. }));
        assert!(err.to_string().contains("failed to start 'sui'"));
    }
}
