use std::path::Path;

use crate::algorithms::bfs::{BFSConfig, BoundedBFS};
use crate::algorithms::degree::{critical_vertex, graph_stats, GraphStats};
use crate::config::EngineConfig;
use crate::error::Result;
use crate::types::{CSRGraph, RawEdge, RawVertexId};

/// Capability interface of a graph backend.
///
/// Callers only depend on this trait, so an alternative representation can be
/// swapped in without touching them.
pub trait GraphEngine {
    /// Loads an edge list file, replacing any previously loaded graph.
    ///
    /// On failure the previous graph, if any, stays in place.
    fn load_graph(&mut self, path: &Path) -> Result<()>;

    /// Depth- and size-bounded BFS from a raw vertex, as raw edge pairs in
    /// discovery order. Empty before the first load or for unknown vertices.
    fn bounded_traversal(&self, start_vertex_id: RawVertexId, max_depth: i32) -> Vec<RawEdge>;

    /// Raw identifier of the vertex with the highest out-degree, `None` when
    /// nothing is loaded or the graph is empty.
    fn critical_vertex(&self) -> Option<RawVertexId>;
}

/// CSR backed implementation of `GraphEngine`.
#[derive(Debug, Default)]
pub struct SparseGraphEngine {
    config: EngineConfig,
    graph: Option<CSRGraph>,
}

impl SparseGraphEngine {
    pub fn new(config: EngineConfig) -> Self {
        Self { config, graph: None }
    }

    /// Wraps an already built graph.
    pub fn with_graph(config: EngineConfig, graph: CSRGraph) -> Self {
        Self {
            config,
            graph: Some(graph),
        }
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// The most recently loaded graph.
    pub fn graph(&self) -> Option<&CSRGraph> {
        self.graph.as_ref()
    }

    pub fn is_loaded(&self) -> bool {
        self.graph.is_some()
    }

    pub fn stats(&self) -> Option<GraphStats> {
        self.graph.as_ref().map(graph_stats)
    }
}

impl GraphEngine for SparseGraphEngine {
    fn load_graph(&mut self, path: &Path) -> Result<()> {
        let graph = CSRGraph::from_edge_file(path, &self.config)?;
        self.graph = Some(graph);
        Ok(())
    }

    fn bounded_traversal(&self, start_vertex_id: RawVertexId, max_depth: i32) -> Vec<RawEdge> {
        match &self.graph {
            None => Vec::new(),
            Some(graph) => graph.bounded_bfs(
                start_vertex_id,
                &BFSConfig::from_engine_config(max_depth, &self.config),
            ),
        }
    }

    fn critical_vertex(&self) -> Option<RawVertexId> {
        self.graph.as_ref().and_then(critical_vertex)
    }
}
