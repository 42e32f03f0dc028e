//! Compact CSR graph engine.
//!
//! Raw 64-bit vertex identifiers from an edge list are remapped to dense
//! indices, the edges are compacted into compressed sparse row arrays, and two
//! read-only queries are served on top: a bounded breadth-first traversal and
//! the highest out-degree ("critical") vertex.

pub mod algorithms;
pub mod config;
pub mod engine;
pub mod error;
pub mod graph_io;
pub mod types;

pub use config::{CapPolicy, EngineConfig};
pub use engine::{GraphEngine, SparseGraphEngine};
pub use error::{GraphError, Result};
pub use types::{CSRGraph, InternalIndex, RawEdge, RawVertexId};
