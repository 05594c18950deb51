//! Process-wide configuration.
//!
//! Built once in `main`, then only read. Precedence, lowest first:
//! defaults, YAML file (`--config` / `SUI_MCP_CONFIG`), `SUI_EXECUTABLE_PATH`,
//! command-line flags.
//!
//! File shape:
//!
//! ```yaml
//! sui:
//!   executable_path: /usr/local/bin/sui
//! server:
//!   max_concurrency: 8
//!   timeout_secs: 120
//! ```

use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::{Context, Result, bail};
use serde::Deserialize;

pub const DEFAULT_EXECUTABLE: &str = "sui";
pub const DEFAULT_MAX_CONCURRENCY: usize = 8;

pub const ENV_CONFIG: &str = "SUI_MCP_CONFIG";
pub const ENV_EXECUTABLE: &str = "SUI_EXECUTABLE_PATH";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    /// Program to spawn; a bare name is resolved through `PATH`.
    pub executable_path: String,
    /// Upper bound on concurrently running child processes.
    pub max_concurrency: usize,
    /// Per-call wall clock limit. `None` waits indefinitely.
    pub timeout: Option<Duration>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            executable_path: DEFAULT_EXECUTABLE.to_string(),
            max_concurrency: DEFAULT_MAX_CONCURRENCY,
            timeout: None,
        }
    }
}

/// On-disk representation; every field optional.
#[derive(Debug, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct FileConfig {
    pub sui: SuiSection,
    pub server: ServerSection,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SuiSection {
    pub executable_path: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ServerSection {
    pub max_concurrency: Option<usize>,
    pub timeout_secs: Option<u64>,
}

/// Values supplied on the command line.
#[derive(Debug, Clone, Default)]
pub struct Overrides {
    pub config_file: Option<PathBuf>,
    pub executable_path: Option<String>,
    pub max_concurrency: Option<usize>,
    pub timeout_secs: Option<u64>,
}

impl FileConfig {
    pub fn from_path(path: &Path) -> Result<Self> {
        let raw = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read config file: {}", path.display()))?;
        Self::from_yaml(&raw)
            .with_context(|| format!("failed to parse config file: {}", path.display()))
    }

    pub fn from_yaml(raw: &str) -> Result<Self> {
        if raw.trim().is_empty() {
            return Ok(Self::default());
        }
        Ok(serde_yaml::from_str(raw)?)
    }
}

impl Config {
    /// Resolve configuration from every source, reading the environment.
    pub fn load(overrides: &Overrides) -> Result<Self> {
        let file_path = overrides.config_file.clone().or_else(|| {
            std::env::var(ENV_CONFIG)
                .ok()
                .filter(|s| !s.trim().is_empty())
                .map(PathBuf::from)
        });
        let file = match file_path {
            Some(p) => Some(FileConfig::from_path(&p)?),
            None => None,
        };
        let env_exe = std::env::var(ENV_EXECUTABLE)
            .ok()
            .filter(|s| !s.trim().is_empty());
        Self::merge(file, env_exe, overrides)
    }

    /// Pure precedence merge; `load` supplies the environment.
    pub fn merge(
        file: Option<FileConfig>,
        env_exe: Option<String>,
        overrides: &Overrides,
    ) -> Result<Self> {
        let file = file.unwrap_or_default();
        let defaults = Config::default();

        let executable_path = overrides
            .executable_path
            .clone()
            .filter(|s| !s.trim().is_empty())
            .or(env_exe)
            .or(file.sui.executable_path.filter(|s| !s.trim().is_empty()))
            .unwrap_or(defaults.executable_path);

        let max_concurrency = overrides
            .max_concurrency
            .or(file.server.max_concurrency)
            .unwrap_or(defaults.max_concurrency);
        if max_concurrency == 0 {
            bail!("max_concurrency must be at least 1");
        }

        let timeout = overrides
            .timeout_secs
            .or(file.server.timeout_secs)
            .filter(|s| *s > 0)
            .map(Duration::from_secs);

        Ok(Self {
            executable_path,
            max_concurrency,
            timeout,
        })
    }
}
