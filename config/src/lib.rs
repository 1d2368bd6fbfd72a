//! Configuration for the buildlens command-line front end.
//!
//! Read from `~/.buildlens/config.toml`:
//!
//! ```toml
//! [output]
//! format = "json"
//! summary = true
//! fail_on_error = false
//!
//! [workspace]
//! root = "${HOME}/src/app"
//!
//! [log]
//! filter = "info"
//! ```
//!
//! Every section and key is optional. Command-line flags take precedence.

use std::path::{Path, PathBuf};
use std::str::FromStr;
use std::{env, fs, io};

use serde::Deserialize;
use thiserror::Error;

// Default value function for serde (bool::default() is false, so only true needs a fn)
const fn default_true() -> bool {
    true
}

#[derive(Debug, Default, Deserialize)]
pub struct BuildlensConfig {
    pub output: Option<OutputConfig>,
    pub workspace: Option<WorkspaceConfig>,
    pub log: Option<LogConfig>,
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config at {}: {source}", path.display())]
    Read { path: PathBuf, source: io::Error },
    #[error("failed to parse config at {}: {source}", path.display())]
    Parse {
        path: PathBuf,
        source: toml::de::Error,
    },
}

impl ConfigError {
    #[must_use]
    pub fn path(&self) -> &Path {
        match self {
            ConfigError::Read { path, .. } | ConfigError::Parse { path, .. } => path,
        }
    }
}

/// How diagnostics are printed.
#[derive(Debug, Clone, Copy, Default, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    /// One `path:line:col: severity:message` line per diagnostic.
    #[default]
    Text,
    /// The diagnostics mapping as a JSON object keyed by location.
    Json,
}

impl OutputFormat {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Text => "text",
            Self::Json => "json",
        }
    }
}

#[derive(Debug, Clone, Error)]
#[error("unknown output format `{0}` (expected `text` or `json`)")]
pub struct UnknownFormat(String);

impl FromStr for OutputFormat {
    type Err = UnknownFormat;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "text" => Ok(Self::Text),
            "json" => Ok(Self::Json),
            _ => Err(UnknownFormat(s.to_string())),
        }
    }
}

#[derive(Debug, Clone, Copy, Deserialize)]
pub struct OutputConfig {
    #[serde(default)]
    pub format: OutputFormat,
    /// Print an "E:n W:n" summary to stderr. Default: true.
    #[serde(default = "default_true")]
    pub summary: bool,
    /// Exit with status 1 when any error diagnostic is present.
    #[serde(default)]
    pub fail_on_error: bool,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            format: OutputFormat::default(),
            summary: true,
            fail_on_error: false,
        }
    }
}

#[derive(Debug, Default, Deserialize)]
pub struct WorkspaceConfig {
    /// Base directory for relative diagnostic locations. `${VAR}` references
    /// are expanded.
    pub root: Option<String>,
}

impl WorkspaceConfig {
    #[must_use]
    pub fn root(&self) -> Option<PathBuf> {
        self.root
            .as_deref()
            .map(expand_env_vars)
            .filter(|root| !root.trim().is_empty())
            .map(PathBuf::from)
    }
}

#[derive(Debug, Default, Deserialize)]
pub struct LogConfig {
    /// `tracing` filter directive used when `RUST_LOG` is unset.
    pub filter: Option<String>,
}

/// Replace `${VAR}` with the variable's value (empty when unset).
///
/// An unclosed `${` is kept literally.
#[must_use]
pub fn expand_env_vars(value: &str) -> String {
    let mut out = String::with_capacity(value.len());
    let mut rest = value;

    while let Some(start) = rest.find("${") {
        let name_start = start + 2;
        let Some(name_len) = rest[name_start..].find('}') else {
            break;
        };
        out.push_str(&rest[..start]);
        let var = &rest[name_start..name_start + name_len];
        if !var.is_empty() {
            out.push_str(&env::var(var).unwrap_or_default());
        }
        rest = &rest[name_start + name_len + 1..];
    }

    out.push_str(rest);
    out
}

impl BuildlensConfig {
    /// Load the config from its default location.
    ///
    /// Returns `Ok(None)` when there is no home directory or no config file.
    pub fn load() -> Result<Option<Self>, ConfigError> {
        match config_path() {
            Some(path) => Self::load_from(&path),
            None => Ok(None),
        }
    }

    /// Load the config from `path`. A missing file is `Ok(None)`.
    pub fn load_from(path: &Path) -> Result<Option<Self>, ConfigError> {
        if !path.exists() {
            return Ok(None);
        }

        let content = fs::read_to_string(path).map_err(|source| {
            tracing::warn!("Failed to read config at {}: {source}", path.display());
            ConfigError::Read {
                path: path.to_path_buf(),
                source,
            }
        })?;

        match toml::from_str(&content) {
            Ok(config) => Ok(Some(config)),
            Err(source) => {
                tracing::warn!("Failed to parse config at {}: {source}", path.display());
                Err(ConfigError::Parse {
                    path: path.to_path_buf(),
                    source,
                })
            }
        }
    }

    #[must_use]
    pub fn path() -> Option<PathBuf> {
        config_path()
    }

    /// The `[output]` section, or its defaults.
    #[must_use]
    pub fn output(&self) -> OutputConfig {
        self.output.unwrap_or_default()
    }

    #[must_use]
    pub fn workspace_root(&self) -> Option<PathBuf> {
        self.workspace.as_ref().and_then(WorkspaceConfig::root)
    }

    #[must_use]
    pub fn log_filter(&self) -> Option<&str> {
        self.log.as_ref().and_then(|log| log.filter.as_deref())
    }
}

#[must_use]
pub fn config_path() -> Option<PathBuf> {
    dirs::home_dir().map(|home| home.join(".buildlens").join("config.toml"))
}
