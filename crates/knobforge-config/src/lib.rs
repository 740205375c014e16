//! Configuration for knobforge.
//!
//! Load sampling and continuous-knob settings from TOML or YAML so that
//! searches can be tuned without code changes.
//!
//! # Examples
//!
//! Load configuration from a TOML string:
//!
//! ```
//! use knobforge_config::KnobforgeConfig;
//!
//! let config = KnobforgeConfig::from_toml_str(r#"
//!     random_seed = 7
//!
//!     [sampling]
//!     estimate_trust_factor = 3
//!
//!     [contin]
//!     start_value = 0.5
//! "#).unwrap();
//!
//! assert_eq!(config.random_seed, Some(7));
//! assert_eq!(config.sampling.estimate_trust_factor, 3);
//! assert_eq!(config.contin.depth, 5);
//! ```
//!
//! Use the default config when the file is missing:
//!
//! ```
//! use knobforge_config::KnobforgeConfig;
//!
//! let config = KnobforgeConfig::load("knobforge.toml").unwrap_or_default();
//! assert_eq!(config.sampling.estimate_trust_factor, 2);
//! ```

use std::path::Path;

use knobforge_core::{Contin, ContinSpec, Spec};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Configuration error
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("TOML parse error: {0}")]
    Toml(#[from] toml::de::Error),

    #[error("YAML parse error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("Invalid configuration: {0}")]
    Invalid(String),
}

/// Result type for configuration operations.
pub type Result<T> = std::result::Result<T, ConfigError>;

/// Top-level configuration.
#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
#[serde(rename_all = "snake_case")]
pub struct KnobforgeConfig {
    /// Seed for the sampler's generator. `None` seeds from the OS.
    #[serde(default)]
    pub random_seed: Option<u64>,

    /// Neighborhood sampling settings.
    #[serde(default)]
    pub sampling: SamplingConfig,

    /// Defaults for newly built continuous knobs.
    #[serde(default)]
    pub contin: ContinConfig,
}

impl KnobforgeConfig {
    /// Creates a new default configuration.
    pub fn new() -> Self {
        Self::default()
    }

    /// Loads and validates configuration from a TOML file.
    ///
    /// # Errors
    ///
    /// Returns error if the file doesn't exist, contains invalid TOML, or
    /// fails [`validate`](Self::validate).
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let config = Self::from_toml_file(path)?;
        config.validate()?;
        Ok(config)
    }

    /// Loads configuration from a TOML file.
    pub fn from_toml_file(path: impl AsRef<Path>) -> Result<Self> {
        let contents = std::fs::read_to_string(path)?;
        Self::from_toml_str(&contents)
    }

    /// Parses configuration from a TOML string.
    pub fn from_toml_str(s: &str) -> Result<Self> {
        Ok(toml::from_str(s)?)
    }

    /// Loads configuration from a YAML file.
    pub fn from_yaml_file(path: impl AsRef<Path>) -> Result<Self> {
        let contents = std::fs::read_to_string(path)?;
        Self::from_yaml_str(&contents)
    }

    /// Parses configuration from a YAML string.
    pub fn from_yaml_str(s: &str) -> Result<Self> {
        Ok(serde_yaml::from_str(s)?)
    }

    /// Checks value ranges that serde cannot express.
    pub fn validate(&self) -> Result<()> {
        if self.sampling.estimate_trust_factor < SamplingConfig::MIN_TRUST_FACTOR {
            return Err(ConfigError::Invalid(format!(
                "sampling.estimate_trust_factor must be at least {}, got {}",
                SamplingConfig::MIN_TRUST_FACTOR,
                self.sampling.estimate_trust_factor
            )));
        }
        if !(self.contin.start_value.is_finite() && self.contin.start_value > 0.0) {
            return Err(ConfigError::Invalid(format!(
                "contin.start_value must be positive and finite, got {}",
                self.contin.start_value
            )));
        }
        if self.contin.depth > ContinConfig::MAX_DEPTH {
            return Err(ConfigError::Invalid(format!(
                "contin.depth must be at most {}, got {}",
                ContinConfig::MAX_DEPTH,
                self.contin.depth
            )));
        }
        Ok(())
    }

    /// Sets the random seed.
    pub fn with_random_seed(mut self, seed: u64) -> Self {
        self.random_seed = Some(seed);
        self
    }

    /// Sets the estimate trust factor.
    pub fn with_trust_factor(mut self, factor: usize) -> Self {
        self.sampling.estimate_trust_factor = factor;
        self
    }

    /// Sets the continuous knob defaults.
    pub fn with_contin(mut self, start_value: Contin, depth: u32) -> Self {
        self.contin = ContinConfig { start_value, depth };
        self
    }
}

/// Neighborhood sampling configuration.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "snake_case")]
pub struct SamplingConfig {
    /// A caller's size estimate is only trusted when it is at least this
    /// many times the requested sample count; otherwise the neighborhood
    /// is recounted.
    #[serde(default = "default_trust_factor")]
    pub estimate_trust_factor: usize,
}

impl SamplingConfig {
    /// Smallest accepted trust factor.
    pub const MIN_TRUST_FACTOR: usize = 2;
}

impl Default for SamplingConfig {
    fn default() -> Self {
        Self {
            estimate_trust_factor: default_trust_factor(),
        }
    }
}

fn default_trust_factor() -> usize {
    2
}

/// Defaults for continuous knob specs.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(rename_all = "snake_case")]
pub struct ContinConfig {
    /// Initial search radius.
    #[serde(default = "default_start_value")]
    pub start_value: Contin,

    /// The total search space is `2^depth`.
    #[serde(default = "default_depth")]
    pub depth: u32,
}

impl ContinConfig {
    /// Largest depth whose total space is still a finite `f64`.
    pub const MAX_DEPTH: u32 = 1023;

    /// Builds a continuous spec from these defaults.
    pub fn contin_spec(&self) -> ContinSpec {
        ContinSpec::new(self.start_value, self.depth)
    }

    /// Builds a continuous [`Spec`] from these defaults.
    pub fn spec(&self) -> Spec {
        Spec::Contin(self.contin_spec())
    }
}

impl Default for ContinConfig {
    fn default() -> Self {
        Self {
            start_value: default_start_value(),
            depth: default_depth(),
        }
    }
}

fn default_start_value() -> Contin {
    1.0
}

fn default_depth() -> u32 {
    5
}
