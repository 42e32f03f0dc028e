use std::path::PathBuf;

use thiserror::Error;

/// Errors surfaced by the graph engine.
///
/// Only building a graph can fail. Queries against unknown vertices or an empty graph
/// return empty results instead.
#[derive(Debug, Error)]
pub enum GraphError {
    #[error("cannot read {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid configuration in {}: {source}", path.display())]
    Config {
        path: PathBuf,
        #[source]
        source: serde_yaml::Error,
    },

    #[error("more than {limit} distinct vertices")]
    TooManyVertices { limit: usize },
}

pub type Result<T> = std::result::Result<T, GraphError>;
