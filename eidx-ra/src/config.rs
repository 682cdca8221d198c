//! Configuration resolution for eidx-ra
//!
//! Every setting resolves CLI → ENV → TOML → compiled default. Only the data
//! directory has no default: without one the service reads over HTTP.

use crate::sources::{DirectorySource, HttpSource, TabularSource};
use clap::Parser;
use eidx_common::config::{
    resolve_optional_setting, resolve_setting, CompiledDefaults, TomlConfig,
};
use eidx_common::Result;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;
use tracing::info;

pub const MODULE_NAME: &str = "eidx-ra";

pub const ENV_BASE_URL: &str = "EIDX_BASE_URL";
pub const ENV_DATA_DIR: &str = "EIDX_DATA_DIR";
pub const ENV_TIMEOUT_SECS: &str = "EIDX_TIMEOUT_SECS";
pub const ENV_CACHE_TTL_SECS: &str = "EIDX_CACHE_TTL_SECS";
pub const ENV_LOG_LEVEL: &str = "EIDX_LOG_LEVEL";
pub const ENV_BIND_ADDRESS: &str = "EIDX_BIND_ADDRESS";

/// Command-line arguments for eidx-ra
///
/// Setting flags carry no clap `env`; environment lookup happens in
/// [`ServiceConfig::resolve`] so the TOML tier sits between them.
#[derive(Parser, Debug, Default, Clone)]
#[command(name = "eidx-ra")]
#[command(about = "Economic Index risk analysis service")]
#[command(version)]
pub struct Cli {
    /// TOML config file (default: <config_dir>/eidx/eidx-ra.toml)
    #[arg(short, long, env = "EIDX_CONFIG")]
    pub config: Option<PathBuf>,

    /// Base URL of the published dataset release
    #[arg(long)]
    pub base_url: Option<String>,

    /// Read tables from this directory instead of over HTTP
    #[arg(long)]
    pub data_dir: Option<PathBuf>,

    /// HTTP request timeout in seconds
    #[arg(long)]
    pub timeout_secs: Option<u64>,

    /// Raw-source cache TTL in seconds (0 = never expire)
    #[arg(long)]
    pub cache_ttl_secs: Option<u64>,

    /// Default log filter directive (RUST_LOG still takes precedence)
    #[arg(long)]
    pub log_level: Option<String>,

    /// Address to listen on
    #[arg(short, long)]
    pub bind: Option<String>,
}

/// Where raw tables come from
#[derive(Debug, Clone, PartialEq)]
pub enum SourceSelection {
    Directory(PathBuf),
    Http { base_url: String, timeout: Duration },
}

/// Fully resolved service configuration
#[derive(Debug, Clone, PartialEq)]
pub struct ServiceConfig {
    pub source: SourceSelection,
    /// `None` means cached tables never expire
    pub cache_ttl: Option<Duration>,
    pub log_level: String,
    pub bind_address: String,
}

impl ServiceConfig {
    /// Resolve every setting from its four tiers
    pub fn resolve(cli: &Cli, toml: &TomlConfig) -> Result<Self> {
        let defaults = CompiledDefaults::default();

        let data_dir = resolve_optional_setting(
            "data directory",
            cli.data_dir.clone(),
            ENV_DATA_DIR,
            toml.source.data_dir.clone(),
        )?;

        let source = match data_dir {
            Some(dir) => {
                info!(path = %dir.value.display(), source = %dir.source, "Reading tables from directory");
                SourceSelection::Directory(dir.value)
            }
            None => {
                let base_url = resolve_setting(
                    "base URL",
                    cli.base_url.clone(),
                    ENV_BASE_URL,
                    toml.source.base_url.clone(),
                    defaults.base_url,
                )?;
                let timeout_secs = resolve_setting(
                    "timeout",
                    cli.timeout_secs,
                    ENV_TIMEOUT_SECS,
                    toml.source.timeout_secs,
                    defaults.timeout_secs,
                )?;
                info!(
                    base_url = %base_url.value,
                    source = %base_url.source,
                    timeout_secs = timeout_secs.value,
                    "Reading tables over HTTP"
                );
                SourceSelection::Http {
                    base_url: base_url.value,
                    timeout: Duration::from_secs(timeout_secs.value),
                }
            }
        };

        let cache_ttl_secs = resolve_setting(
            "cache TTL",
            cli.cache_ttl_secs,
            ENV_CACHE_TTL_SECS,
            toml.cache.ttl_secs,
            defaults.cache_ttl_secs,
        )?
        .value;

        let log_level = resolve_setting(
            "log level",
            cli.log_level.clone(),
            ENV_LOG_LEVEL,
            toml.logging.level.clone(),
            defaults.log_level,
        )?
        .value;

        let bind_address = resolve_setting(
            "bind address",
            cli.bind.clone(),
            ENV_BIND_ADDRESS,
            toml.server.bind_address.clone(),
            defaults.bind_address,
        )?
        .value;

        Ok(Self {
            source,
            cache_ttl: (cache_ttl_secs > 0).then(|| Duration::from_secs(cache_ttl_secs)),
            log_level,
            bind_address,
        })
    }

    /// Instantiate the configured tabular source
    pub fn build_source(&self) -> Result<Arc<dyn TabularSource>> {
        let source: Arc<dyn TabularSource> = match &self.source {
            SourceSelection::Directory(dir) => Arc::new(DirectorySource::new(dir.clone())),
            SourceSelection::Http { base_url, timeout } => {
                Arc::new(HttpSource::new(base_url.clone(), *timeout)?)
            }
        };
        Ok(source)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;

    fn clear_env() {
        for name in [
            ENV_BASE_URL,
            ENV_DATA_DIR,
            ENV_TIMEOUT_SECS,
            ENV_CACHE_TTL_SECS,
            ENV_LOG_LEVEL,
            ENV_BIND_ADDRESS,
        ] {
            std::env::remove_var(name);
        }
    }

    #[test]
    #[serial]
    fn test_defaults_select_http_source() {
        clear_env();

        let config = ServiceConfig::resolve(&Cli::default(), &TomlConfig::default()).unwrap();
        let defaults = CompiledDefaults::default();

        assert_eq!(
            config.source,
            SourceSelection::Http {
                base_url: defaults.base_url,
                timeout: Duration::from_secs(defaults.timeout_secs),
            }
        );
        assert_eq!(config.cache_ttl, None);
        assert_eq!(config.log_level, "info");
        assert_eq!(config.bind_address, "127.0.0.1:5731");
    }

    #[test]
    #[serial]
    fn test_data_dir_selects_directory_source() {
        clear_env();

        let toml = TomlConfig::from_toml_str(
            r#"
            [source]
            data_dir = "/srv/eidx"
            base_url = "http://ignored.example"
            "#,
        )
        .unwrap();

        let config = ServiceConfig::resolve(&Cli::default(), &toml).unwrap();
        assert_eq!(config.source, SourceSelection::Directory(PathBuf::from("/srv/eidx")));
    }

    #[test]
    #[serial]
    fn test_cli_overrides_env_and_toml() {
        clear_env();
        std::env::set_var(ENV_BIND_ADDRESS, "0.0.0.0:9000");
        std::env::set_var(ENV_CACHE_TTL_SECS, "60");

        let toml = TomlConfig::from_toml_str(
            r#"
            [server]
            bind_address = "127.0.0.1:7000"
            [cache]
            ttl_secs = 5
            [logging]
            level = "warn"
            "#,
        )
        .unwrap();
        let cli = Cli {
            bind: Some("127.0.0.1:8000".to_string()),
            ..Cli::default()
        };

        let config = ServiceConfig::resolve(&cli, &toml).unwrap();
        clear_env();

        assert_eq!(config.bind_address, "127.0.0.1:8000");
        assert_eq!(config.cache_ttl, Some(Duration::from_secs(60)));
        assert_eq!(config.log_level, "warn");
    }

    #[test]
    #[serial]
    fn test_unparsable_env_is_config_error() {
        clear_env();
        std::env::set_var(ENV_TIMEOUT_SECS, "soon");

        let result = ServiceConfig::resolve(&Cli::default(), &TomlConfig::default());
        clear_env();

        assert!(matches!(result, Err(eidx_common::Error::Config(_))));
    }

    #[test]
    #[serial]
    fn test_build_source_for_directory() {
        clear_env();
        let config = ServiceConfig {
            source: SourceSelection::Directory(PathBuf::from("/tmp/eidx")),
            cache_ttl: None,
            log_level: "info".to_string(),
            bind_address: "127.0.0.1:0".to_string(),
        };

        let source = config.build_source().unwrap();
        assert_eq!(source.name(), "directory");
    }
}
