//! Configuration management for the kvwatch server.
//!
//! Provides hierarchical configuration loading and validation with:
//! - Default values as code base
//! - Environment variable overrides
//! - Configuration file support
//! - Component-wise validation
mod monitoring;
mod server;
mod watch;
pub use monitoring::*;
pub use server::*;
pub use watch::*;


use std::env;
use std::fmt::Debug;

use config::Config;
use config::Environment;
use config::File;
use serde::Deserialize;
use serde::Serialize;

use crate::Result;

/// Prefix of environment variables overriding configuration, e.g.
/// `KVWATCH__WATCH__TIMEOUT_IN_MS=500`
pub(crate) const ENV_PREFIX: &str = "KVWATCH";

/// Main configuration container
///
/// Sources merge in priority order:
/// 1. Default values from code implementation
/// 2. Configuration file specified by `CONFIG_PATH`
/// 3. Environment variables (highest priority)
#[derive(Serialize, Deserialize, Clone, Default)]
pub struct KvWatchConfig {
    /// gRPC listener and logging parameters
    #[serde(default)]
    pub server: ServerConfig,
    /// Watcher queue and timeout parameters
    #[serde(default)]
    pub watch: WatchConfig,
    /// Metrics endpoint settings
    #[serde(default)]
    pub monitoring: MonitoringConfig,
}

impl Debug for KvWatchConfig {
    fn fmt(
        &self,
        f: &mut std::fmt::Formatter<'_>,
    ) -> std::fmt::Result {
        f.debug_struct("KvWatchConfig")
            .field("server", &self.server)
            .field("watch", &self.watch)
            .field("monitoring", &self.monitoring)
            .finish()
    }
}

impl KvWatchConfig {
    /// Loads configuration from hierarchical sources without validation.
    ///
    /// Callers MUST call `validate()` before using the configuration.
    ///
    /// # Examples
    /// ```no_run
    /// use kvwatch::KvWatchConfig;
    ///
    /// fn main() -> kvwatch::Result<()> {
    ///     std::env::set_var("CONFIG_PATH", "config/kvwatch.toml");
    ///     std::env::set_var("KVWATCH__SERVER__LISTEN_ADDRESS", "0.0.0.0:1234");
    ///     let cfg = KvWatchConfig::new()?.validate()?;
    ///     println!("{:?}", cfg);
    ///     Ok(())
    /// }
    /// ```
    pub fn new() -> Result<Self> {
        let mut builder = Config::builder().add_source(Config::try_from(&Self::default())?);

        if let Ok(config_path) = env::var("CONFIG_PATH") {
            builder = builder.add_source(File::with_name(&config_path).required(true));
        }

        builder = builder.add_source(environment_source());

        let config: Self = builder.build()?.try_deserialize()?;
        Ok(config)
    }

    /// Applies additional configuration overrides from file without validation.
    ///
    /// Merging order (later sources override earlier):
    /// 1. Current configuration values
    /// 2. New configuration file
    /// 3. Latest environment variables (highest priority)
    pub fn with_override_config(
        &self,
        path: &str,
    ) -> Result<Self> {
        let config: Self = Config::builder()
            .add_source(Config::try_from(self)?)
            .add_source(File::with_name(path))
            .add_source(environment_source())
            .build()?
            .try_deserialize()?;
        Ok(config)
    }

    /// Validates every section and returns the validated instance.
    pub fn validate(self) -> Result<Self> {
        self.server.validate()?;
        self.watch.validate()?;
        self.monitoring.validate()?;
        Ok(self)
    }
}

fn environment_source() -> Environment {
    Environment::with_prefix(ENV_PREFIX)
        .separator("__")
        .ignore_empty(true)
        .try_parsing(true)
}
