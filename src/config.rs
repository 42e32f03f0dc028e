use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{GraphError, Result};

/// Buffer size used by the edge file reader.
pub const READ_BUFFER_SIZE: usize = 1 << 20;

/// Initial capacity of the transient edge list, roughly one million edges.
pub const DEFAULT_EDGE_CAPACITY: usize = 1_000_000;

/// Maximum number of raw identifiers a bounded traversal emits (2000 edges).
pub const DEFAULT_EMIT_LIMIT: usize = 4000;

/// How the traversal enforces the emission limit.
///
/// `Soft` is the per-vertex check the engine historically used. `Strict` is
/// the default since it is the only policy under which `emit_limit` is a hard
/// upper bound. Set `cap_policy: soft` to reproduce historical traversals.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CapPolicy {
    /// Check the limit once per dequeued vertex. The last expanded vertex may
    /// push the result past the limit. Historical behavior.
    Soft,
    /// Also check the limit before every emitted edge. The result never
    /// exceeds it and is always a prefix of the soft result.
    #[default]
    Strict,
}

/// Runtime settings of the graph engine.
///
/// Every field has a default, so a YAML file only needs the keys it overrides:
///
/// ```yaml
/// emit_limit: 10000
/// cap_policy: soft
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Capacity hint for the transient edge list during load.
    pub edge_capacity: usize,

    /// Maximum number of raw identifiers emitted by a bounded traversal.
    pub emit_limit: usize,

    /// Soft (per vertex) or strict (per edge) enforcement of `emit_limit`.
    pub cap_policy: CapPolicy,

    /// Draw a spinner on stderr while the edge file is scanned.
    pub show_progress: bool,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            edge_capacity: DEFAULT_EDGE_CAPACITY,
            emit_limit: DEFAULT_EMIT_LIMIT,
            cap_policy: CapPolicy::Strict,
            show_progress: false,
        }
    }
}

impl EngineConfig {
    /// Reads an engine configuration from a YAML file.
    pub fn from_yaml_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let content = fs::read_to_string(path).map_err(|source| GraphError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        serde_yaml::from_str(&content).map_err(|source| GraphError::Config {
            path: path.to_path_buf(),
            source,
        })
    }
}
