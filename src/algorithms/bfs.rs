use std::collections::VecDeque;

use tracing::debug;

use crate::config::{CapPolicy, EngineConfig};
use crate::types::graph_query::GraphQuery;
use crate::types::{CSRGraph, InternalIndex, RawEdge, RawVertexId};

/// Configuration for the bounded BFS.
///
/// # Fields
/// * `max_depth` - Edges are emitted only for vertices strictly closer than
///   `max_depth` hops to the start. `max_depth <= 0` yields nothing.
/// * `emit_limit` - Cap on the number of raw identifiers emitted (2 per edge)
/// * `cap_policy` - Whether `emit_limit` is checked per vertex or per edge
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BFSConfig {
    pub max_depth: i32,
    pub emit_limit: usize,
    pub cap_policy: CapPolicy,
}

impl BFSConfig {
    /// Traversal settings for `max_depth` taken from the engine configuration.
    pub fn from_engine_config(max_depth: i32, engine_config: &EngineConfig) -> Self {
        Self {
            max_depth,
            emit_limit: engine_config.emit_limit,
            cap_policy: engine_config.cap_policy,
        }
    }
}

/// Trait for depth- and size-bounded breadth-first traversal.
///
/// The result is an edge-visitation trace, not a spanning tree: every edge
/// out of an expanded vertex is reported, including edges to vertices that
/// were already visited.
pub trait BoundedBFS {
    /// Traverses from the raw vertex `start_vertex_id` and returns the visited
    /// edges as raw `(source, target)` pairs in discovery order.
    ///
    /// An unknown start vertex yields an empty result.
    fn bounded_bfs(&self, start_vertex_id: RawVertexId, bfs_config: &BFSConfig) -> Vec<RawEdge>;
}

impl BoundedBFS for CSRGraph {
    fn bounded_bfs(&self, start_vertex_id: RawVertexId, bfs_config: &BFSConfig) -> Vec<RawEdge> {
        let mut result = Vec::new();

        let start_index = match self.internal_index(start_vertex_id) {
            Some(index) => index,
            None => return result,
        };
        if bfs_config.max_depth <= 0 {
            return result;
        }

        let inverse = self.vertex_mapper().inverse();
        let edge_limit = bfs_config.emit_limit / 2;

        let mut visited = vec![false; self.vertex_count()];
        let mut queue = VecDeque::<(InternalIndex, i32)>::new();

        // Visitation is marked on enqueue, so each vertex is expanded at most once.
        queue.push_back((start_index, 0));
        visited[start_index as usize] = true;

        'traversal: while let Some((current, depth)) = queue.pop_front() {
            if depth >= bfs_config.max_depth {
                continue;
            }
            if result.len() * 2 >= bfs_config.emit_limit {
                break;
            }

            let current_raw = inverse[current as usize];
            for &neighbor in self.read_neighbor(current) {
                if bfs_config.cap_policy == CapPolicy::Strict && result.len() >= edge_limit {
                    break 'traversal;
                }
                result.push((current_raw, inverse[neighbor as usize]));

                if !visited[neighbor as usize] {
                    visited[neighbor as usize] = true;
                    queue.push_back((neighbor, depth + 1));
                }
            }
        }

        debug!(
            start_vertex_id,
            max_depth = bfs_config.max_depth,
            edges = result.len(),
            "bounded bfs finished"
        );
        result
    }
}

/// Flattens traversal edges into `[src0, dst0, src1, dst1, ...]`.
pub fn flatten_edges(edges: &[RawEdge]) -> Vec<RawVertexId> {
    edges.iter().flat_map(|&(src, dst)| [src, dst]).collect()
}
