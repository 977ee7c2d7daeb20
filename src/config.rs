//
//  config.rs
//  Traffic
//
//  Created by hak (tharun)
//

use serde::{Deserialize, Serialize};
use std::path::Path;
use tracing::warn;

use crate::error::{Result, TrafficError};

/// Top-level configuration.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TrafficConfig {
    #[serde(default)]
    pub traversal: TraversalConfig,
}

/// Traversal engine settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TraversalConfig {
    /// How the relaxation pass treats vertices that were already enqueued.
    #[serde(default)]
    pub relaxation: RelaxationMode,
    /// Depth used by `edges_within_default`. Negative means unlimited.
    #[serde(default = "default_depth")]
    pub default_depth: i64,
}

/// Worklist policy for the shortest-path relaxation pass.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum RelaxationMode {
    /// A vertex enters the worklist at most once per pass. Always terminates,
    /// including on graphs with negative cycles.
    #[default]
    SinglePass,
    /// A popped vertex may be enqueued again after its distance improves.
    /// Exact under negative weights; never terminates on a reachable negative cycle.
    Requeue,
}

fn default_depth() -> i64 {
    -1
}

impl Default for TraversalConfig {
    fn default() -> Self {
        Self {
            relaxation: RelaxationMode::default(),
            default_depth: default_depth(),
        }
    }
}

impl TrafficConfig {
    /// Load config from a TOML file, falling back to defaults.
    pub fn load(path: &Path) -> Self {
        match std::fs::read_to_string(path) {
            Ok(contents) => Self::from_toml_str(&contents).unwrap_or_else(|e| {
                warn!(path = %path.display(), error = %e, "invalid config, using defaults");
                Self::default()
            }),
            Err(_) => Self::default(),
        }
    }

    /// Parse config from TOML text.
    pub fn from_toml_str(contents: &str) -> Result<Self> {
        toml::from_str(contents).map_err(|e| TrafficError::Config(e.to_string()))
    }
}
