//! Layered application configuration.
//!
//! Settings are resolved from, lowest priority first:
//!
//! 1. Built-in defaults
//! 2. A TOML config file (`--config`, or `config.toml` in the platform config dir)
//! 3. `DUPSCAN_*` environment variables (e.g. `DUPSCAN_DIGEST=blake3`)
//! 4. Command-line flags
//!
//! # Example file
//!
//! ```toml
//! digest = "command"
//! hash_command = "sha256sum"
//! buckets = 1049
//! output = "text"
//! ```

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use directories::ProjectDirs;
use figment::providers::{Env, Format, Serialized, Toml};
use figment::Figment;
use serde::{Deserialize, Serialize};

use crate::cli::Cli;
use crate::duplicates::{DEFAULT_BUCKETS, MAX_BUCKETS};
use crate::output::OutputFormat;
use crate::scanner::DigestAlgorithm;

/// Prefix for configuration environment variables.
pub const ENV_PREFIX: &str = "DUPSCAN_";

/// Resolved scan settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Settings {
    /// Digest algorithm used to confirm same-size files.
    #[serde(default)]
    pub digest: DigestAlgorithm,
    /// Command line for the external digest, e.g. `"sha256sum"`.
    #[serde(default)]
    pub hash_command: Option<String>,
    /// Number of index buckets.
    #[serde(default = "default_buckets")]
    pub buckets: usize,
    /// Report output format.
    #[serde(default)]
    pub output: OutputFormat,
}

fn default_buckets() -> usize {
    DEFAULT_BUCKETS
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            digest: DigestAlgorithm::default(),
            hash_command: None,
            buckets: DEFAULT_BUCKETS,
            output: OutputFormat::default(),
        }
    }
}

impl Settings {
    /// Build the layered figment: defaults < file < environment.
    ///
    /// A missing default config file is silently skipped.
    #[must_use]
    pub fn figment(config_file: Option<&Path>) -> Figment {
        let mut figment = Figment::from(Serialized::defaults(Settings::default()));
        if let Some(path) = config_file.map(Path::to_path_buf).or_else(Self::default_path) {
            figment = figment.merge(Toml::file(path));
        }
        figment.merge(Env::prefixed(ENV_PREFIX))
    }

    /// Extract and validate settings from a figment.
    ///
    /// # Errors
    ///
    /// Returns an error if a layer is malformed or `buckets` is outside
    /// `1..=MAX_BUCKETS`.
    pub fn from_figment(figment: &Figment) -> Result<Self> {
        let settings: Settings = figment
            .extract()
            .context("Failed to load configuration")?;
        settings.validate()?;
        Ok(settings)
    }

    /// Resolve settings for a CLI invocation, applying every layer.
    ///
    /// # Errors
    ///
    /// Returns an error if an explicitly named config file does not exist
    /// or the resolved settings are invalid.
    pub fn load(cli: &Cli) -> Result<Self> {
        if let Some(path) = &cli.config {
            if !path.is_file() {
                anyhow::bail!("Config file not found: {}", path.display());
            }
        }

        let mut settings = Self::from_figment(&Self::figment(cli.config.as_deref()))?;
        settings.apply_cli(cli);
        settings.validate()?;
        log::debug!("Resolved settings: {:?}", settings);
        Ok(settings)
    }

    /// Overlay flags given on the command line.
    pub fn apply_cli(&mut self, cli: &Cli) {
        if let Some(digest) = cli.digest {
            self.digest = digest;
        }
        if let Some(command) = &cli.hash_command {
            self.hash_command = Some(command.clone());
        }
        if let Some(buckets) = cli.buckets {
            self.buckets = usize::try_from(buckets).unwrap_or(usize::MAX);
        }
        if let Some(output) = cli.output {
            self.output = output;
        }
    }

    fn validate(&self) -> Result<()> {
        if !(1..=MAX_BUCKETS).contains(&self.buckets) {
            anyhow::bail!(
                "buckets must be between 1 and {}, got {}",
                MAX_BUCKETS,
                self.buckets
            );
        }
        Ok(())
    }

    /// Platform-specific default config file location.
    fn default_path() -> Option<PathBuf> {
        ProjectDirs::from("", "", "dupscan").map(|dirs| dirs.config_dir().join("config.toml"))
    }
}
