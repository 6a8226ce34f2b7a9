//! Graph handle configuration.

use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::storage::MissingNeighbors;
use crate::{Error, Result};

/// Worker count used when none is given.
pub const DEFAULT_WORKERS: usize = 4;

/// Construction-time settings of a [`Graph`](crate::Graph).
///
/// ```rust
/// use std::time::Duration;
/// use rwgraph::GraphConfig;
///
/// let config = GraphConfig::default()
///     .with_workers(8)
///     .with_seed(7)
///     .with_timeout(Duration::from_secs(2));
/// assert!(config.validate().is_ok());
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct GraphConfig {
    /// Size of the worker pool, and number of batches per walk call.
    pub workers: usize,
    /// Fixed seed for reproducible walks. `None` seeds from entropy per call.
    pub seed: Option<u64>,
    /// Upper bound on a single walk call.
    pub timeout: Option<Duration>,
    /// Handling of neighbor ids without a row.
    pub missing_neighbors: MissingNeighbors,
}

impl Default for GraphConfig {
    fn default() -> Self {
        Self {
            workers: DEFAULT_WORKERS,
            seed: None,
            timeout: None,
            missing_neighbors: MissingNeighbors::default(),
        }
    }
}

impl GraphConfig {
    pub fn with_workers(mut self, workers: usize) -> Self {
        self.workers = workers;
        self
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    pub fn with_missing_neighbors(mut self, missing: MissingNeighbors) -> Self {
        self.missing_neighbors = missing;
        self
    }

    /// Parse from JSON; absent fields take their defaults.
    pub fn from_json(json: &str) -> Result<Self> {
        let config: GraphConfig = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        if self.workers == 0 {
            return Err(Error::InvalidConfig("workers must be at least 1".into()));
        }
        if self.timeout == Some(Duration::ZERO) {
            return Err(Error::InvalidConfig("timeout must be non-zero".into()));
        }
        Ok(())
    }
}
