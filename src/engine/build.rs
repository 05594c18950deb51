//! Command builder: validated arguments to an external argv.
//!
//! Token order is fixed by the catalog row, never by map iteration:
//!
//!   <command tokens> <positionals in declared order> <flags in declared order> <trailing tokens>
//!
//! Optional values that are empty (empty string, empty list, zero, false)
//! produce no tokens at all, so an empty value never reaches the program.

use super::catalog::{Encoding, OperationSpec, Program};
use super::validate::{ParamValue, ValidatedArguments};

/// Full argument vector for one run of the external program. The program
/// path itself is resolved by the executor from configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandInvocation {
    pub program: Program,
    pub args: Vec<String>,
}

impl CommandInvocation {
    pub fn new(program: Program) -> Self {
        Self {
            program,
            args: Vec::new(),
        }
    }

    pub fn arg(&mut self, token: impl Into<String>) -> &mut Self {
        self.args.push(token.into());
        self
    }

    /// `--name value`
    pub fn flag(&mut self, name: &str, value: impl Into<String>) -> &mut Self {
        self.args.push(format!("--{name}"));
        self.args.push(value.into());
        self
    }

    /// Bare `--name`.
    pub fn switch(&mut self, name: &str) -> &mut Self {
        self.args.push(format!("--{name}"));
        self
    }
}

pub fn build(op: &OperationSpec, args: &ValidatedArguments) -> CommandInvocation {
    let mut inv = CommandInvocation::new(op.program);
    for token in op.command {
        inv.arg(*token);
    }

    for spec in op.params.iter().filter(|p| p.encoding == Encoding::Positional) {
        if let Some(token) = present(args, spec.name).and_then(scalar_token) {
            inv.arg(token);
        }
    }

    for spec in op.params {
        let Some(value) = present(args, spec.name) else {
            continue;
        };
        match spec.encoding {
            Encoding::Positional => {}
            Encoding::Flag(name) => {
                if let Some(token) = scalar_token(value) {
                    inv.flag(name, token);
                }
            }
            Encoding::RepeatedFlag(name) => {
                for token in value.tokens() {
                    inv.flag(name, token);
                }
            }
            Encoding::JoinedFlag(name) => {
                inv.flag(name, value.tokens().join(","));
            }
            Encoding::Switch(name) => {
                if *value == ParamValue::Flag(true) {
                    inv.switch(name);
                }
            }
        }
    }

    for token in op.trailing {
        inv.arg(*token);
    }
    inv
}

/// A bound value that produces tokens; empty values are dropped here.
fn present<'a>(args: &'a ValidatedArguments, name: &str) -> Option<&'a ParamValue> {
    args.get(name).filter(|v| !v.is_empty())
}

fn scalar_token(value: &ParamValue) -> Option<String> {
    match value {
        ParamValue::Text(s) => Some(s.clone()),
        ParamValue::Integer(n) => Some(n.to_string()),
        _ => None,
    }
}
