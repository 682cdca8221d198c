//! Configuration loading and setting resolution
//!
//! Every setting is resolved in the same priority order:
//! 1. Command-line argument (highest priority)
//! 2. Environment variable
//! 3. TOML config file
//! 4. Compiled default (fallback)
//!
//! A missing TOML file is not fatal: a warning is logged and the compiled
//! defaults apply. A TOML file that exists but does not parse is a
//! configuration error.

use crate::{Error, Result};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;
use tracing::{debug, warn};

/// Economic Index release the published CSV files are fetched from
pub const DEFAULT_BASE_URL: &str =
    "https://huggingface.co/datasets/Anthropic/EconomicIndex/resolve/main/release_2025_03_27";

/// `[source]` section
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SourceConfig {
    /// Base URL the dataset files are fetched from
    pub base_url: Option<String>,
    /// Local directory holding the dataset files; takes precedence over `base_url`
    pub data_dir: Option<PathBuf>,
    /// HTTP request timeout in seconds
    pub timeout_secs: Option<u64>,
}

/// `[cache]` section
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CacheConfig {
    /// Raw-source cache lifetime in seconds; absent or 0 keeps entries until cleared
    pub ttl_secs: Option<u64>,
}

/// `[logging]` section
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Default tracing filter directive (e.g. "info", "eidx_ra=debug")
    pub level: Option<String>,
}

/// `[server]` section
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    /// Socket address the HTTP API binds to
    pub bind_address: Option<String>,
}

/// Contents of a module's TOML config file
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TomlConfig {
    pub source: SourceConfig,
    pub cache: CacheConfig,
    pub logging: LoggingConfig,
    pub server: ServerConfig,
}

impl TomlConfig {
    /// Parse TOML text
    pub fn from_toml_str(content: &str) -> Result<Self> {
        toml::from_str(content).map_err(|e| Error::Config(format!("Parse TOML failed: {}", e)))
    }
}

/// Compiled defaults used when no other tier supplies a value
#[derive(Debug, Clone, PartialEq)]
pub struct CompiledDefaults {
    pub base_url: String,
    pub timeout_secs: u64,
    pub cache_ttl_secs: u64,
    pub log_level: String,
    pub bind_address: String,
}

impl Default for CompiledDefaults {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            timeout_secs: 30,
            cache_ttl_secs: 0,
            log_level: "info".to_string(),
            bind_address: "127.0.0.1:5731".to_string(),
        }
    }
}

/// Which tier a resolved setting came from
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SettingSource {
    CommandLine,
    Environment,
    TomlFile,
    Default,
}

impl fmt::Display for SettingSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            SettingSource::CommandLine => "command line",
            SettingSource::Environment => "environment",
            SettingSource::TomlFile => "TOML config",
            SettingSource::Default => "compiled default",
        };
        f.write_str(name)
    }
}

/// A setting value together with the tier that supplied it
#[derive(Debug, Clone, PartialEq)]
pub struct Resolved<T> {
    pub value: T,
    pub source: SettingSource,
}

/// Resolve one setting through CLI → ENV → TOML → default
///
/// An environment variable that is set but does not parse is a
/// configuration error rather than a silent fallthrough.
pub fn resolve_setting<T>(
    name: &str,
    cli_value: Option<T>,
    env_var_name: &str,
    toml_value: Option<T>,
    default: T,
) -> Result<Resolved<T>>
where
    T: FromStr,
    T::Err: fmt::Display,
{
    let resolved = resolve_optional_setting(name, cli_value, env_var_name, toml_value)?
        .unwrap_or(Resolved {
            value: default,
            source: SettingSource::Default,
        });

    debug!(setting = %name, source = %resolved.source, "Resolved setting");
    Ok(resolved)
}

/// Resolve a setting that has no compiled default
///
/// Returns `None` when no tier supplies a value.
pub fn resolve_optional_setting<T>(
    name: &str,
    cli_value: Option<T>,
    env_var_name: &str,
    toml_value: Option<T>,
) -> Result<Option<Resolved<T>>>
where
    T: FromStr,
    T::Err: fmt::Display,
{
    if let Some(value) = cli_value {
        return Ok(Some(Resolved {
            value,
            source: SettingSource::CommandLine,
        }));
    }

    if let Some(raw) = read_env(env_var_name) {
        let value = raw.parse::<T>().map_err(|e| {
            Error::Config(format!("{}={:?} is not a valid {}: {}", env_var_name, raw, name, e))
        })?;
        return Ok(Some(Resolved {
            value,
            source: SettingSource::Environment,
        }));
    }

    Ok(toml_value.map(|value| Resolved {
        value,
        source: SettingSource::TomlFile,
    }))
}

/// Non-empty value of an environment variable
fn read_env(name: &str) -> Option<String> {
    std::env::var(name).ok().filter(|v| !v.trim().is_empty())
}

/// Platform config file location: `<config_dir>/eidx/<module>.toml`
pub fn default_config_path(module_name: &str) -> Option<PathBuf> {
    dirs::config_dir().map(|d| d.join("eidx").join(format!("{}.toml", module_name)))
}

/// Load a module's TOML config
///
/// Uses `explicit_path` when given, otherwise the platform default location.
/// Returns the parsed config and the path it was read from, if any.
pub fn load_toml_config(
    explicit_path: Option<&Path>,
    module_name: &str,
) -> Result<(TomlConfig, Option<PathBuf>)> {
    let path = match explicit_path {
        Some(p) => p.to_path_buf(),
        None => match default_config_path(module_name) {
            Some(p) => p,
            None => {
                warn!("Could not determine config directory, using compiled defaults");
                return Ok((TomlConfig::default(), None));
            }
        },
    };

    if !path.exists() {
        warn!(path = %path.display(), "Config file not found, using compiled defaults");
        return Ok((TomlConfig::default(), None));
    }

    let content = std::fs::read_to_string(&path)
        .map_err(|e| Error::Config(format!("Read TOML failed ({}): {}", path.display(), e)))?;
    let config = TomlConfig::from_toml_str(&content)?;

    debug!(path = %path.display(), "Loaded TOML config");
    Ok((config, Some(path)))
}
