//! Static operation catalog.
//!
//! Every tool the server exposes is one `OperationSpec` row in `CATALOG`.
//! The row drives three things at once: the JSON schema advertised to
//! callers, argument validation, and the argv encoding used when the
//! external program is spawned. Nothing here is mutated after startup.

use std::fmt;

/* ---- Parameter Model ---- */

/// Declared kind of a parameter. Closed set; validation dispatches on it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ParamKind {
    String,
    Integer,
    Boolean,
    StringList,
    IntegerList,
}

impl ParamKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ParamKind::String => "string",
            ParamKind::Integer => "integer",
            ParamKind::Boolean => "boolean",
            ParamKind::StringList => "string[]",
            ParamKind::IntegerList => "integer[]",
        }
    }

    #[cfg(test)]
    pub fn is_list(&self) -> bool {
        matches!(self, ParamKind::StringList | ParamKind::IntegerList)
    }
}

impl fmt::Display for ParamKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// How a validated value is laid out on the external command line.
///
/// Flag names are stored without the leading `--`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Encoding {
    /// Bare value, placed after the subcommand and before any flag.
    Positional,
    /// `--name value`, omitted when the value is empty.
    Flag(&'static str),
    /// `--name v1 --name v2 ...`, one occurrence per list element.
    RepeatedFlag(&'static str),
    /// `--name v1,v2,...`, a single occurrence.
    JoinedFlag(&'static str),
    /// Bare `--name` when true, nothing otherwise.
    Switch(&'static str),
}

impl Encoding {
    pub fn flag_name(&self) -> Option<&'static str> {
        match self {
            Encoding::Positional => None,
            Encoding::Flag(n)
            | Encoding::RepeatedFlag(n)
            | Encoding::JoinedFlag(n)
            | Encoding::Switch(n) => Some(n),
        }
    }

    /// Whether this encoding can render a value of `kind`.
    #[cfg(test)]
    pub fn accepts(&self, kind: ParamKind) -> bool {
        match self {
            Encoding::Positional | Encoding::Flag(_) => {
                matches!(kind, ParamKind::String | ParamKind::Integer)
            }
            Encoding::RepeatedFlag(_) | Encoding::JoinedFlag(_) => kind.is_list(),
            Encoding::Switch(_) => kind == ParamKind::Boolean,
        }
    }
}

#[derive(Debug, Clone, Copy)]
pub struct ParameterSpec {
    pub name: &'static str,
    pub kind: ParamKind,
    pub required: bool,
    /// Text bound when the parameter is absent or empty. Only string
    /// parameters carry one.
    pub default: Option<&'static str>,
    pub encoding: Encoding,
    pub description: &'static str,
}

const fn required(
    name: &'static str,
    kind: ParamKind,
    encoding: Encoding,
    description: &'static str,
) -> ParameterSpec {
    ParameterSpec {
        name,
        kind,
        required: true,
        default: None,
        encoding,
        description,
    }
}

const fn optional(
    name: &'static str,
    kind: ParamKind,
    encoding: Encoding,
    description: &'static str,
) -> ParameterSpec {
    ParameterSpec {
        name,
        kind,
        required: false,
        default: None,
        encoding,
        description,
    }
}

const fn with_default(spec: ParameterSpec, default: &'static str) -> ParameterSpec {
    ParameterSpec {
        default: Some(default),
        ..spec
    }
}

/* ---- Operation Model ---- */

/// Which executable an operation runs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Program {
    /// The configured external program.
    Sui,
    /// The platform lookup tool (`which` / `where`), given the configured
    /// program name as its first argument.
    Locator,
}

/// Post-processing applied to captured stdout.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputPolicy {
    Trimmed,
    Verbatim,
    /// The program was asked for JSON; text is kept as-is but must parse.
    Json,
}

impl OutputPolicy {
    pub fn as_str(&self) -> &'static str {
        match self {
            OutputPolicy::Trimmed => "text",
            OutputPolicy::Verbatim => "raw",
            OutputPolicy::Json => "json",
        }
    }
}

#[derive(Debug)]
pub struct OperationSpec {
    pub name: &'static str,
    pub description: &'static str,
    pub program: Program,
    /// Leading subcommand tokens, e.g. `["client", "balance"]`.
    pub command: &'static [&'static str],
    pub params: &'static [ParameterSpec],
    /// Fixed tokens appended after every parameter, e.g. `["--json"]`.
    pub trailing: &'static [&'static str],
    pub output: OutputPolicy,
}

impl OperationSpec {
    pub fn param(&self, name: &str) -> Option<&ParameterSpec> {
        self.params.iter().find(|p| p.name == name)
    }

    pub fn required_params(&self) -> impl Iterator<Item = &ParameterSpec> {
        self.params.iter().filter(|p| p.required)
    }

    /// Human-readable synopsis of the generated command line, for the
    /// given executable and platform locator.
    pub fn synopsis(&self, executable: &str, locator: &str) -> String {
        let mut parts: Vec<String> = Vec::new();
        match self.program {
            Program::Sui => parts.push(executable.to_string()),
            Program::Locator => parts.push(format!("{locator} {executable}")),
        }
        parts.extend(self.command.iter().map(|t| t.to_string()));

        let positional = self
            .params
            .iter()
            .filter(|p| p.encoding == Encoding::Positional);
        let flagged = self
            .params
            .iter()
            .filter(|p| p.encoding != Encoding::Positional);
        for p in positional.chain(flagged) {
            let body = match p.encoding {
                Encoding::Positional => format!("<{}>", p.name),
                Encoding::Flag(f) => format!("--{f} <{}>", p.name),
                Encoding::RepeatedFlag(f) => format!("(--{f} <{}>)...", p.name),
                Encoding::JoinedFlag(f) => format!("--{f} <{},...>", p.name),
                Encoding::Switch(f) => format!("--{f}"),
            };
            if p.required || p.default.is_some() {
                parts.push(body);
            } else {
                parts.push(format!("[{body}]"));
            }
        }
        parts.extend(self.trailing.iter().map(|t| t.to_string()));
        parts.join(" ")
    }
}

/* ---- Shared Parameters ---- */

const GAS_BUDGET: ParameterSpec = optional(
    "gas_budget",
    ParamKind::Integer,
    Encoding::Flag("gas-budget"),
    "Gas budget for the transaction, in MIST",
);

const OPT_ADDRESS: ParameterSpec = optional(
    "address",
    ParamKind::String,
    Encoding::Positional,
    "Sui address; defaults to the active address",
);

/* ---- Catalog ---- */

pub static CATALOG: &[OperationSpec] = &[
    OperationSpec {
        name: "sui_version",
        description: "Get the version of the Sui client",
        program: Program::Sui,
        command: &["--version"],
        params: &[],
        trailing: &[],
        output: OutputPolicy::Trimmed,
    },
    OperationSpec {
        name: "sui_path",
        description: "Locate the Sui executable on the search path",
        program: Program::Locator,
        command: &[],
        params: &[],
        trailing: &[],
        output: OutputPolicy::Trimmed,
    },
    OperationSpec {
        name: "sui_balance",
        description: "Get the coin balances owned by an address",
        program: Program::Sui,
        command: &["client", "balance"],
        params: &[OPT_ADDRESS],
        trailing: &[],
        output: OutputPolicy::Verbatim,
    },
    OperationSpec {
        name: "sui_objects",
        description: "List the objects owned by an address (JSON)",
        program: Program::Sui,
        command: &["client", "objects"],
        params: &[OPT_ADDRESS],
        trailing: &["--json"],
        output: OutputPolicy::Json,
    },
    OperationSpec {
        name: "sui_object",
        description: "Get a single object by ID (JSON)",
        program: Program::Sui,
        command: &["client", "object"],
        params: &[required(
            "object_id",
            ParamKind::String,
            Encoding::Positional,
            "Object ID to fetch",
        )],
        trailing: &["--json"],
        output: OutputPolicy::Json,
    },
    OperationSpec {
        name: "sui_tx_block",
        description: "Get a transaction block by digest",
        program: Program::Sui,
        command: &["client", "tx-block"],
        params: &[required(
            "digest",
            ParamKind::String,
            Encoding::Positional,
            "Transaction digest",
        )],
        trailing: &[],
        output: OutputPolicy::Verbatim,
    },
    OperationSpec {
        name: "sui_active_address",
        description: "Get the active address",
        program: Program::Sui,
        command: &["client", "active-address"],
        params: &[],
        trailing: &[],
        output: OutputPolicy::Trimmed,
    },
    OperationSpec {
        name: "sui_addresses",
        description: "List all addresses managed by the client",
        program: Program::Sui,
        command: &["client", "addresses"],
        params: &[],
        trailing: &[],
        output: OutputPolicy::Verbatim,
    },
    OperationSpec {
        name: "sui_active_env",
        description: "Get the active environment",
        program: Program::Sui,
        command: &["client", "active-env"],
        params: &[],
        trailing: &[],
        output: OutputPolicy::Trimmed,
    },
    OperationSpec {
        name: "sui_envs",
        description: "List all configured environments",
        program: Program::Sui,
        command: &["client", "envs"],
        params: &[],
        trailing: &[],
        output: OutputPolicy::Verbatim,
    },
    OperationSpec {
        name: "sui_chain_identifier",
        description: "Query the chain identifier from the RPC endpoint",
        program: Program::Sui,
        command: &["client", "chain-identifier"],
        params: &[],
        trailing: &[],
        output: OutputPolicy::Trimmed,
    },
    OperationSpec {
        name: "sui_active_validators",
        description: "List the active validators",
        program: Program::Sui,
        command: &["client", "active-validators"],
        params: &[],
        trailing: &[],
        output: OutputPolicy::Verbatim,
    },
    OperationSpec {
        name: "sui_gas",
        description: "List the gas coins owned by an address",
        program: Program::Sui,
        command: &["client", "gas"],
        params: &[OPT_ADDRESS],
        trailing: &[],
        output: OutputPolicy::Verbatim,
    },
    OperationSpec {
        name: "sui_faucet",
        description: "Request gas coins from the faucet",
        program: Program::Sui,
        command: &["client", "faucet"],
        params: &[optional(
            "address",
            ParamKind::String,
            Encoding::Flag("address"),
            "Recipient address; defaults to the active address",
        )],
        trailing: &[],
        output: OutputPolicy::Verbatim,
    },
    OperationSpec {
        name: "sui_transfer",
        description: "Transfer an object to another address",
        program: Program::Sui,
        command: &["client", "transfer"],
        params: &[
            required(
                "to",
                ParamKind::String,
                Encoding::Flag("to"),
                "Recipient address",
            ),
            required(
                "object_id",
                ParamKind::String,
                Encoding::Flag("object-id"),
                "Object ID to transfer",
            ),
            GAS_BUDGET,
        ],
        trailing: &[],
        output: OutputPolicy::Verbatim,
    },
    OperationSpec {
        name: "sui_transfer_sui",
        description: "Transfer SUI from a coin object to another address",
        program: Program::Sui,
        command: &["client", "transfer-sui"],
        params: &[
            required(
                "to",
                ParamKind::String,
                Encoding::Flag("to"),
                "Recipient address",
            ),
            required(
                "sui_coin_object_id",
                ParamKind::String,
                Encoding::Flag("sui-coin-object-id"),
                "SUI coin object ID to send from",
            ),
            optional(
                "amount",
                ParamKind::Integer,
                Encoding::Flag("amount"),
                "Amount in MIST; the whole coin is sent when omitted",
            ),
            GAS_BUDGET,
        ],
        trailing: &[],
        output: OutputPolicy::Verbatim,
    },
    OperationSpec {
        name: "sui_split_coin",
        description: "Split a coin into several coins of the given amounts",
        program: Program::Sui,
        command: &["client", "split-coin"],
        params: &[
            required(
                "coin_id",
                ParamKind::String,
                Encoding::Flag("coin-id"),
                "Coin object ID to split",
            ),
            required(
                "amounts",
                ParamKind::IntegerList,
                Encoding::JoinedFlag("amounts"),
                "Amounts of the new coins, in MIST",
            ),
            GAS_BUDGET,
        ],
        trailing: &[],
        output: OutputPolicy::Verbatim,
    },
    OperationSpec {
        name: "sui_merge_coin",
        description: "Merge one coin into another",
        program: Program::Sui,
        command: &["client", "merge-coin"],
        params: &[
            required(
                "primary_coin",
                ParamKind::String,
                Encoding::Flag("primary-coin"),
                "Coin that receives the merged balance",
            ),
            required(
                "coin_to_merge",
                ParamKind::String,
                Encoding::Flag("coin-to-merge"),
                "Coin that is merged and destroyed",
            ),
            GAS_BUDGET,
        ],
        trailing: &[],
        output: OutputPolicy::Verbatim,
    },
    OperationSpec {
        name: "sui_pay",
        description: "Pay coins to recipients following the specified amounts",
        program: Program::Sui,
        command: &["client", "pay"],
        params: &[
            required(
                "input_coins",
                ParamKind::StringList,
                Encoding::RepeatedFlag("input-coins"),
                "Coin object IDs to pay from",
            ),
            required(
                "recipients",
                ParamKind::StringList,
                Encoding::RepeatedFlag("recipients"),
                "Recipient addresses",
            ),
            required(
                "amounts",
                ParamKind::IntegerList,
                Encoding::RepeatedFlag("amounts"),
                "Amount for each recipient, in MIST",
            ),
            GAS_BUDGET,
        ],
        trailing: &[],
        output: OutputPolicy::Verbatim,
    },
    OperationSpec {
        name: "sui_pay_all_sui",
        description: "Pay all residual SUI in the input coins to one recipient",
        program: Program::Sui,
        command: &["client", "pay-all-sui"],
        params: &[
            required(
                "input_coins",
                ParamKind::StringList,
                Encoding::RepeatedFlag("input-coins"),
                "SUI coin object IDs to drain",
            ),
            required(
                "recipient",
                ParamKind::String,
                Encoding::Flag("recipient"),
                "Recipient address",
            ),
            GAS_BUDGET,
        ],
        trailing: &[],
        output: OutputPolicy::Verbatim,
    },
    OperationSpec {
        name: "sui_pay_sui",
        description: "Pay SUI to recipients, using the first input coin for gas",
        program: Program::Sui,
        command: &["client", "pay-sui"],
        params: &[
            required(
                "input_coins",
                ParamKind::StringList,
                Encoding::RepeatedFlag("input-coins"),
                "SUI coin object IDs to pay from",
            ),
            required(
                "recipients",
                ParamKind::StringList,
                Encoding::RepeatedFlag("recipients"),
                "Recipient addresses",
            ),
            required(
                "amounts",
                ParamKind::IntegerList,
                Encoding::RepeatedFlag("amounts"),
                "Amount for each recipient, in MIST",
            ),
            GAS_BUDGET,
        ],
        trailing: &[],
        output: OutputPolicy::Verbatim,
    },
    OperationSpec {
        name: "sui_call",
        description: "Call a Move function",
        program: Program::Sui,
        command: &["client", "call"],
        params: &[
            required(
                "package",
                ParamKind::String,
                Encoding::Flag("package"),
                "Package ID",
            ),
            required(
                "module",
                ParamKind::String,
                Encoding::Flag("module"),
                "Module name",
            ),
            required(
                "function",
                ParamKind::String,
                Encoding::Flag("function"),
                "Function name",
            ),
            optional(
                "type_args",
                ParamKind::StringList,
                Encoding::RepeatedFlag("type-args"),
                "Type arguments, in order",
            ),
            optional(
                "args",
                ParamKind::StringList,
                Encoding::RepeatedFlag("args"),
                "Function arguments, in order",
            ),
            GAS_BUDGET,
        ],
        trailing: &[],
        output: OutputPolicy::Verbatim,
    },
    OperationSpec {
        name: "sui_publish",
        description: "Publish a Move package",
        program: Program::Sui,
        command: &["client", "publish"],
        params: &[
            required(
                "package_path",
                ParamKind::String,
                Encoding::Positional,
                "Path to the Move package",
            ),
            GAS_BUDGET,
            optional(
                "skip_dependency_verification",
                ParamKind::Boolean,
                Encoding::Switch("skip-dependency-verification"),
                "Skip verifying dependency bytecode",
            ),
        ],
        trailing: &[],
        output: OutputPolicy::Verbatim,
    },
    OperationSpec {
        name: "sui_dynamic_field",
        description: "Query the dynamic fields of an object",
        program: Program::Sui,
        command: &["client", "dynamic-field"],
        params: &[
            required(
                "parent_object_id",
                ParamKind::String,
                Encoding::Positional,
                "Parent object ID",
            ),
            optional(
                "name",
                ParamKind::String,
                Encoding::Flag("name"),
                "Dynamic field name",
            ),
        ],
        trailing: &[],
        output: OutputPolicy::Verbatim,
    },
    OperationSpec {
        name: "sui_move_build",
        description: "Build a Move package",
        program: Program::Sui,
        command: &["move", "build"],
        params: &[optional(
            "path",
            ParamKind::String,
            Encoding::Flag("path"),
            "Package directory; defaults to the working directory",
        )],
        trailing: &[],
        output: OutputPolicy::Verbatim,
    },
    OperationSpec {
        name: "sui_move_test",
        description: "Run Move unit tests",
        program: Program::Sui,
        command: &["move", "test"],
        params: &[
            optional(
                "path",
                ParamKind::String,
                Encoding::Flag("path"),
                "Package directory; defaults to the working directory",
            ),
            optional(
                "filter",
                ParamKind::String,
                Encoding::Flag("filter"),
                "Only run tests whose name contains this string",
            ),
        ],
        trailing: &[],
        output: OutputPolicy::Verbatim,
    },
    OperationSpec {
        name: "sui_move_new",
        description: "Create a new Move package",
        program: Program::Sui,
        command: &["move", "new"],
        params: &[
            required(
                "name",
                ParamKind::String,
                Encoding::Positional,
                "Package name",
            ),
            optional(
                "path",
                ParamKind::String,
                Encoding::Positional,
                "Directory to create the package in",
            ),
        ],
        trailing: &[],
        output: OutputPolicy::Verbatim,
    },
    OperationSpec {
        name: "sui_keytool_list",
        description: "List all keys in the keystore",
        program: Program::Sui,
        command: &["keytool", "list"],
        params: &[],
        trailing: &[],
        output: OutputPolicy::Verbatim,
    },
    OperationSpec {
        name: "sui_keytool_generate",
        description: "Generate a new keypair",
        program: Program::Sui,
        command: &["keytool", "generate"],
        params: &[
            with_default(
                optional(
                    "key_scheme",
                    ParamKind::String,
                    Encoding::Positional,
                    "Key scheme: ed25519, secp256k1 or secp256r1",
                ),
                "ed25519",
            ),
            optional(
                "derivation_path",
                ParamKind::String,
                Encoding::Flag("derivation-path"),
                "BIP-32 derivation path",
            ),
            optional(
                "word_length",
                ParamKind::String,
                Encoding::Flag("word-length"),
                "Mnemonic length, e.g. word12 or word24",
            ),
        ],
        trailing: &[],
        output: OutputPolicy::Verbatim,
    },
    OperationSpec {
        name: "sui_keytool_export",
        description: "Export the private key of an address",
        program: Program::Sui,
        command: &["keytool", "export"],
        params: &[required(
            "address",
            ParamKind::String,
            Encoding::Positional,
            "Address whose key is exported",
        )],
        trailing: &[],
        output: OutputPolicy::Verbatim,
    },
];

/// Exact-name lookup.
pub fn lookup(name: &str) -> Option<&'static OperationSpec> {
    CATALOG.iter().find(|op| op.name == name)
}

/// Case-insensitive lookup, for human-typed names on the CLI.
pub fn lookup_ci(name: &str) -> Option<&'static OperationSpec> {
    let name = name.trim();
    CATALOG.iter().find(|op| op.name.eq_ignore_ascii_case(name))
}
