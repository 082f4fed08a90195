//! Configuration management for the gridserve CLI.
//!
//! Configuration is loaded from (in order of precedence):
//! 1. Command-line arguments
//! 2. Environment variables (GRIDSERVE_*)
//! 3. Config file (~/.config/gridserve/config.toml, or `--config`)
//! 4. Default values

use std::net::{SocketAddr, ToSocketAddrs};
use std::path::{Path, PathBuf};

use figment::{
    providers::{Env, Format, Serialized, Toml},
    Figment,
};
use serde::{Deserialize, Serialize};

use gridserve_core::layout::{
    DEFAULT_EXTENT, DEFAULT_MAX_DIMENSION, DEFAULT_MULTIPLIER, DEFAULT_SIZE,
};
use gridserve_core::{Error, LayoutDefaults};
use gridserve_server::server::{DEFAULT_PORT, DEFAULT_TEMPLATE_PATH};
use gridserve_server::ServerConfig;

/// Prefix for environment overrides.
pub const ENV_PREFIX: &str = "GRIDSERVE_";

/// CLI configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Config {
    /// Server host.
    #[serde(default = "default_host")]
    pub host: String,

    /// Server port.
    #[serde(default = "default_port")]
    pub port: u16,

    /// Page template, relative to the working directory.
    #[serde(default = "default_template_path")]
    pub template_path: PathBuf,

    /// Block side length for `?size=`.
    #[serde(default = "default_multiplier")]
    pub multiplier: u32,

    /// Fallback `size`.
    #[serde(default = "default_size")]
    pub default_size: u32,

    /// Fallback row count for `?n=`.
    #[serde(default = "default_extent")]
    pub default_rows: u32,

    /// Fallback column count for `?m=`.
    #[serde(default = "default_extent")]
    pub default_cols: u32,

    /// Cap on rows and columns.
    #[serde(default = "default_max_dimension")]
    pub max_dimension: u32,

    /// Parse the template once at startup.
    #[serde(default)]
    pub preload_template: bool,
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    DEFAULT_PORT
}

fn default_template_path() -> PathBuf {
    PathBuf::from(DEFAULT_TEMPLATE_PATH)
}

fn default_multiplier() -> u32 {
    DEFAULT_MULTIPLIER
}

fn default_size() -> u32 {
    DEFAULT_SIZE
}

fn default_extent() -> u32 {
    DEFAULT_EXTENT
}

fn default_max_dimension() -> u32 {
    DEFAULT_MAX_DIMENSION
}

impl Default for Config {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            template_path: default_template_path(),
            multiplier: default_multiplier(),
            default_size: default_size(),
            default_rows: default_extent(),
            default_cols: default_extent(),
            max_dimension: default_max_dimension(),
            preload_template: false,
        }
    }
}

impl Config {
    /// Loads configuration from all sources.
    ///
    /// Reports warnings for configuration errors but falls back to defaults.
    pub fn load(config_path: &Path) -> Self {
        match Self::extract(config_path) {
            Ok(config) => config,
            Err(e) => {
                tracing::warn!(
                    path = %config_path.display(),
                    error = %e,
                    "Configuration error, using defaults"
                );
                eprintln!("\x1b[33mWarning:\x1b[0m Configuration error, using defaults");
                eprintln!("  Config file: {}", config_path.display());
                eprintln!("  Error: {}", e);
                eprintln!();
                Config::default()
            }
        }
    }

    /// Layers defaults, the TOML file at `config_path` (if present) and
    /// `GRIDSERVE_*` environment variables.
    ///
    /// # Errors
    ///
    /// Returns an error if a source holds a value of the wrong type.
    pub fn extract(config_path: &Path) -> Result<Self, figment::Error> {
        Figment::new()
            .merge(Serialized::defaults(Config::default()))
            .merge(Toml::file(config_path))
            .merge(Env::prefixed(ENV_PREFIX))
            .extract()
    }

    /// Returns the path to the default config file.
    pub fn config_path() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("gridserve")
            .join("config.toml")
    }

    /// Grid defaults derived from this configuration.
    pub fn layout(&self) -> LayoutDefaults {
        LayoutDefaults {
            multiplier: self.multiplier,
            default_size: self.default_size,
            default_rows: self.default_rows,
            default_cols: self.default_cols,
            max_dimension: self.max_dimension,
        }
    }

    /// Resolves the listen address.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidConfig`] if `host` does not resolve.
    pub fn socket_addr(&self) -> Result<SocketAddr, Error> {
        (self.host.as_str(), self.port)
            .to_socket_addrs()
            .map_err(|e| Error::invalid_config(format!("invalid host {}: {e}", self.host)))?
            .next()
            .ok_or_else(|| Error::invalid_config(format!("host {} has no address", self.host)))
    }

    /// Builds the server configuration.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidConfig`] if the address or layout values are
    /// invalid.
    pub fn server_config(&self) -> Result<ServerConfig, Error> {
        ServerConfig::builder()
            .addr(self.socket_addr()?)
            .template_path(self.template_path.clone())
            .layout(self.layout())
            .preload_template(self.preload_template)
            .build()
    }
}

/// Prints the effective configuration and its sources.
pub fn show_config(config: &Config, config_path: &Path) {
    println!("Gridserve Configuration");
    println!("=======================\n");

    println!("Config file: {}", config_path.display());
    if config_path.exists() {
        println!("Status: Found\n");
    } else {
        println!("Status: Not found (using defaults)\n");
    }

    println!("Current settings:");
    match toml::to_string_pretty(config) {
        Ok(rendered) => {
            for line in rendered.lines() {
                println!("  {line}");
            }
        }
        Err(e) => println!("  (failed to render: {e})"),
    }

    println!("\nEnvironment variables:");
    for key in [
        "HOST",
        "PORT",
        "TEMPLATE_PATH",
        "MULTIPLIER",
        "DEFAULT_SIZE",
        "DEFAULT_ROWS",
        "DEFAULT_COLS",
        "MAX_DIMENSION",
        "PRELOAD_TEMPLATE",
    ] {
        println!("  {ENV_PREFIX}{key}");
    }
}
