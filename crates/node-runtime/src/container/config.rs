//! # Node Configuration
//!
//! Unified configuration for the subsystems and runtime parameters.
//!
//! Sources, later ones winning:
//!
//! 1. Built-in defaults
//! 2. TOML file (every section and key optional)
//! 3. `LC_*` environment variables
//!
//! `validate()` runs after the last source is applied.

use lc_01_endorsement::EndorsementConfig;
use lc_02_commit::CommitConfig;
use lc_03_ordering::OrdererConfig;
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::str::FromStr;
use thiserror::Error;

/// Complete node configuration.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct NodeConfig {
    pub endorsement: EndorsementSection,
    pub commit: CommitSection,
    pub ordering: OrderingSection,
    pub network: NetworkSection,
    pub logging: LoggingSection,
}

/// Configuration errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file {path}")]
    Read {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse config file")]
    Parse(#[from] toml::de::Error),

    #[error("Invalid value [{value}] for environment variable {key}")]
    InvalidEnv { key: &'static str, value: String },

    #[error("Invalid configuration: {field} {reason}")]
    Invalid {
        field: &'static str,
        reason: &'static str,
    },
}

impl NodeConfig {
    /// Parse a TOML document. Missing keys keep their defaults.
    pub fn from_toml_str(source: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(source)?)
    }

    /// Defaults, then the file at `path` if given, then the environment.
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        let mut config = match path {
            Some(path) => {
                let source = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
                    path: path.display().to_string(),
                    source,
                })?;
                Self::from_toml_str(&source)?
            }
            None => Self::default(),
        };
        config.apply_overrides(|key| std::env::var(key).ok())?;
        config.validate()?;
        Ok(config)
    }

    /// Apply `LC_*` overrides resolved through `lookup`.
    pub fn apply_overrides(
        &mut self,
        lookup: impl Fn(&str) -> Option<String>,
    ) -> Result<(), ConfigError> {
        override_parsed(&lookup, "LC_RESPONSE_TIMEOUT_SECS", &mut self.endorsement.response_timeout_secs)?;
        override_parsed(&lookup, "LC_DELETE_TRANSIENT", &mut self.endorsement.delete_transient)?;
        override_parsed(&lookup, "LC_LISTENER_CAPACITY", &mut self.commit.listener_capacity)?;
        override_parsed(
            &lookup,
            "LC_WAIT_FOR_EVENT_TIMEOUT_SECS",
            &mut self.commit.wait_for_event_timeout_secs,
        )?;
        override_parsed(&lookup, "LC_QUIET_NOTIFIER", &mut self.commit.quiet_notifier)?;
        override_parsed(&lookup, "LC_MAX_MESSAGE_COUNT", &mut self.ordering.max_message_count)?;
        override_parsed(&lookup, "LC_NETWORK_NAME", &mut self.network.name)?;
        override_parsed(&lookup, "LC_NETWORK_DRIVER", &mut self.network.driver)?;
        override_parsed(&lookup, "LC_NETWORK_CHANNEL", &mut self.network.channel)?;
        override_parsed(&lookup, "LC_LOG_LEVEL", &mut self.logging.level)?;
        override_parsed(&lookup, "LC_LOG_JSON", &mut self.logging.json)?;
        Ok(())
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        let checks = [
            (self.endorsement.response_timeout_secs == 0, "endorsement.response_timeout_secs", "must be positive"),
            (self.commit.listener_capacity == 0, "commit.listener_capacity", "must be positive"),
            (
                self.commit.wait_for_event_timeout_secs == 0,
                "commit.wait_for_event_timeout_secs",
                "must be positive",
            ),
            (self.ordering.max_message_count == 0, "ordering.max_message_count", "must be positive"),
            (self.ordering.delivery_capacity == 0, "ordering.delivery_capacity", "must be positive"),
            (self.network.name.is_empty(), "network.name", "must not be empty"),
            (self.network.driver.is_empty(), "network.driver", "must not be empty"),
            (self.network.channel.is_empty(), "network.channel", "must not be empty"),
        ];
        match checks.into_iter().find(|(failed, _, _)| *failed) {
            Some((_, field, reason)) => Err(ConfigError::Invalid { field, reason }),
            None => Ok(()),
        }
    }

    pub fn endorsement_config(&self) -> EndorsementConfig {
        EndorsementConfig {
            response_timeout_secs: self.endorsement.response_timeout_secs,
            delete_transient: self.endorsement.delete_transient,
        }
    }

    pub fn commit_config(&self) -> CommitConfig {
        CommitConfig {
            listener_capacity: self.commit.listener_capacity,
            wait_for_event_timeout_secs: self.commit.wait_for_event_timeout_secs,
            quiet_notifier: self.commit.quiet_notifier,
        }
    }

    pub fn orderer_config(&self) -> OrdererConfig {
        OrdererConfig {
            max_message_count: self.ordering.max_message_count,
            delivery_capacity: self.ordering.delivery_capacity,
        }
    }
}

fn override_parsed<T: FromStr>(
    lookup: &impl Fn(&str) -> Option<String>,
    key: &'static str,
    target: &mut T,
) -> Result<(), ConfigError> {
    if let Some(value) = lookup(key) {
        *target = value
            .trim()
            .parse()
            .map_err(|_| ConfigError::InvalidEnv { key, value })?;
    }
    Ok(())
}

/// Endorsement configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct EndorsementSection {
    /// Wait for each remote party's reply, in seconds.
    pub response_timeout_secs: u64,
    /// Strip transient fields before sending transactions.
    pub delete_transient: bool,
}

impl Default for EndorsementSection {
    fn default() -> Self {
        let defaults = EndorsementConfig::default();
        Self {
            response_timeout_secs: defaults.response_timeout_secs,
            delete_transient: defaults.delete_transient,
        }
    }
}

/// Commit and finality configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CommitSection {
    /// Buffered events per finality listener.
    pub listener_capacity: usize,
    /// Wait for a finality event before re-querying, in seconds.
    pub wait_for_event_timeout_secs: u64,
    /// Do not log invalid transactions at warn level.
    pub quiet_notifier: bool,
}

impl Default for CommitSection {
    fn default() -> Self {
        let defaults = CommitConfig::default();
        Self {
            listener_capacity: defaults.listener_capacity,
            wait_for_event_timeout_secs: defaults.wait_for_event_timeout_secs,
            quiet_notifier: defaults.quiet_notifier,
        }
    }
}

/// In-memory orderer batching.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct OrderingSection {
    pub max_message_count: usize,
    pub delivery_capacity: usize,
}

impl Default for OrderingSection {
    fn default() -> Self {
        let defaults = OrdererConfig::default();
        Self {
            max_message_count: defaults.max_message_count,
            delivery_capacity: defaults.delivery_capacity,
        }
    }
}

/// Network opened at startup.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct NetworkSection {
    pub name: String,
    /// Name of a registered network driver.
    pub driver: String,
    /// Default channel.
    pub channel: String,
}

impl Default for NetworkSection {
    fn default() -> Self {
        Self {
            name: "default".to_string(),
            driver: "memory".to_string(),
            channel: "mychannel".to_string(),
        }
    }
}

/// Logging configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingSection {
    /// Filter used when `RUST_LOG` is unset.
    pub level: String,
    /// Emit JSON lines instead of text.
    pub json: bool,
}

impl Default for LoggingSection {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            json: false,
        }
    }
}
