//! Configuration for graph and ledger operations
//!
//! Controls the reaction exclusivity policy and storage retry behavior.

use crate::GraphError;
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;

/// How likes and dislikes interact on the same content item
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ReactionPolicy {
    /// A like removes an earlier dislike by the same account, and vice versa
    #[default]
    Strict,

    /// Likes and dislikes are independent; an account may hold both
    Legacy,
}

/// Configuration for the relationship graph and engagement ledger
///
/// # Examples
///
/// ```
/// use rapport_graph::{GraphConfig, ReactionPolicy};
///
/// let config = GraphConfig::default();
/// assert_eq!(config.reaction_policy, ReactionPolicy::Strict);
/// assert_eq!(config.storage_attempts, 3);
///
/// let config = GraphConfig::legacy();
/// assert_eq!(config.reaction_policy, ReactionPolicy::Legacy);
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GraphConfig {
    /// Like/dislike exclusivity policy
    /// Default: strict
    #[serde(default)]
    pub reaction_policy: ReactionPolicy,

    /// How many times a store write is attempted before giving up
    /// Default: 3
    #[serde(default = "default_storage_attempts")]
    pub storage_attempts: u32,

    /// Pause between write attempts (in milliseconds)
    /// Default: 25
    #[serde(default = "default_retry_backoff_ms")]
    pub retry_backoff_ms: u64,
}

fn default_storage_attempts() -> u32 {
    3
}

fn default_retry_backoff_ms() -> u64 {
    25
}

impl Default for GraphConfig {
    fn default() -> Self {
        Self {
            reaction_policy: ReactionPolicy::Strict,
            storage_attempts: default_storage_attempts(),
            retry_backoff_ms: default_retry_backoff_ms(),
        }
    }
}

impl GraphConfig {
    /// Permissive reactions, matching systems that never enforced exclusivity
    pub fn legacy() -> Self {
        Self {
            reaction_policy: ReactionPolicy::Legacy,
            ..Self::default()
        }
    }

    /// Parse configuration from TOML text
    pub fn from_toml_str(contents: &str) -> Result<Self, GraphError> {
        let config: GraphConfig =
            toml::from_str(contents).map_err(|e| GraphError::Config(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Load configuration from a TOML file
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, GraphError> {
        let contents = std::fs::read_to_string(path.as_ref()).map_err(|e| {
            GraphError::Config(format!("Failed to read {}: {}", path.as_ref().display(), e))
        })?;
        Self::from_toml_str(&contents)
    }

    /// Reject settings the engine cannot run with
    pub fn validate(&self) -> Result<(), GraphError> {
        if self.storage_attempts == 0 {
            return Err(GraphError::Config(
                "storage_attempts must be at least 1".to_string(),
            ));
        }
        Ok(())
    }

    /// Get retry backoff as Duration
    pub fn retry_backoff(&self) -> Duration {
        Duration::from_millis(self.retry_backoff_ms)
    }
}
