//! Configuration loading
//!
//! TOML file plus environment overrides, merged with the `config` crate and
//! deserialized into [`DrawstreamConfig`]. Every field has a default, so an
//! absent file or an empty section is valid.

use anyhow::{Context, Result};
use config_crate::{Config, Environment, File};
use network::UnixSocketConfig;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::{debug, info};

/// File read when no explicit path is given; optional
pub const DEFAULT_CONFIG_FILE: &str = "drawstream.toml";

/// Prefix of environment variable overrides
pub const ENV_PREFIX: &str = "DRAWSTREAM";

/// Top-level configuration
#[derive(Debug, Deserialize, Serialize, Clone, Default, PartialEq)]
#[serde(default)]
pub struct DrawstreamConfig {
    pub socket: SocketSettings,
    pub collector: CollectorSettings,
}

/// Collector socket shared by writers and the listener
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
#[serde(default)]
pub struct SocketSettings {
    pub path: PathBuf,
    /// Largest frame body the listener accepts
    pub max_frame_size: usize,
    /// Remove the socket file when the listener shuts down
    pub cleanup_on_drop: bool,
}

/// Fit collector service settings
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
#[serde(default)]
pub struct CollectorSettings {
    /// Fit file received frames are appended to
    pub output: PathBuf,
    pub log_level: String,
}

impl Default for SocketSettings {
    fn default() -> Self {
        let defaults = UnixSocketConfig::default();
        Self {
            path: defaults.path,
            max_frame_size: defaults.max_frame_size,
            cleanup_on_drop: defaults.cleanup_on_drop,
        }
    }
}

impl Default for CollectorSettings {
    fn default() -> Self {
        Self {
            output: PathBuf::from("./fit_output.bin"),
            log_level: "info".to_string(),
        }
    }
}

impl SocketSettings {
    /// Listener configuration for these settings
    pub fn to_socket_config(&self) -> UnixSocketConfig {
        UnixSocketConfig {
            path: self.path.clone(),
            max_frame_size: self.max_frame_size,
            cleanup_on_drop: self.cleanup_on_drop,
        }
    }
}

impl DrawstreamConfig {
    /// Load configuration from a file with `DRAWSTREAM_` environment overrides
    ///
    /// An explicit `path` must exist; the default file is optional.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        Self::load_with_env(path, environment())
    }

    fn load_with_env(path: Option<&Path>, env: Environment) -> Result<Self> {
        let file = match path {
            Some(path) => {
                info!("Loading config: {:?}", path);
                File::from(path).required(true)
            }
            None => File::with_name(DEFAULT_CONFIG_FILE).required(false),
        };

        let config = Config::builder()
            .add_source(file)
            .add_source(env)
            .build()
            .context("Failed to build configuration")?;

        let config: Self = config
            .try_deserialize()
            .context("Failed to deserialize configuration")?;

        if config.socket.max_frame_size == 0 {
            anyhow::bail!("socket.max_frame_size must be greater than zero");
        }
        Ok(config)
    }

    /// Expand `~` and `$VAR` in the socket and output paths
    pub fn expand_paths(&mut self) -> Result<()> {
        self.socket.path = expand(&self.socket.path).context("Failed to expand socket path")?;
        self.collector.output =
            expand(&self.collector.output).context("Failed to expand output path")?;
        Ok(())
    }

    /// Render as TOML, as it would be written to a config file
    pub fn to_toml(&self) -> Result<String> {
        toml::to_string_pretty(self).context("Failed to serialize configuration")
    }
}

fn environment() -> Environment {
    Environment::with_prefix(ENV_PREFIX)
        .prefix_separator("_")
        .separator("__")
        .try_parsing(true)
}

fn expand(path: &Path) -> Result<PathBuf> {
    let raw = path.to_string_lossy();
    let expanded = shellexpand::full(&raw)?;
    Ok(PathBuf::from(expanded.as_ref()))
}

/// Load configuration and expand paths
pub fn load_config(path: Option<&Path>) -> Result<DrawstreamConfig> {
    let mut config = DrawstreamConfig::load(path)?;
    config.expand_paths()?;
    debug!(socket = ?config.socket.path, output = ?config.collector.output, "configuration loaded");
    Ok(config)
}
