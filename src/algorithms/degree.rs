use serde::Serialize;

use crate::types::graph_query::GraphQuery;
use crate::types::{CSRGraph, InternalIndex, RawVertexId};

/// Finds the vertex with the highest out-degree.
///
/// Vertices are scanned in internal index order and only a strictly greater
/// degree replaces the current best, so the first vertex to reach the maximum
/// wins ties.
///
/// # Returns
///
/// * `Option<RawVertexId>` - The raw identifier of the critical vertex, or
///   `None` when the graph has no vertices
pub fn critical_vertex(graph: &CSRGraph) -> Option<RawVertexId> {
    critical_index(graph).and_then(|(index, _)| graph.raw_id(index))
}

fn critical_index(graph: &CSRGraph) -> Option<(InternalIndex, usize)> {
    let mut best: Option<(InternalIndex, usize)> = None;
    for (index, bounds) in graph.row_offsets().windows(2).enumerate() {
        let degree = bounds[1] - bounds[0];
        if best.map_or(true, |(_, max_degree)| degree > max_degree) {
            best = Some((index as InternalIndex, degree));
        }
    }
    best
}

/// Summary of a loaded graph.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct GraphStats {
    pub vertex_count: usize,
    pub edge_count: usize,
    pub max_out_degree: usize,
    pub critical_vertex: Option<RawVertexId>,
    pub self_loops: usize,
}

/// Computes `GraphStats` from the CSR arrays: one scan of the row offsets for
/// the maximum degree, one scan of the adjacency lists for self-loops.
pub fn graph_stats(graph: &CSRGraph) -> GraphStats {
    let (critical_vertex, max_out_degree) = match critical_index(graph) {
        Some((index, degree)) => (graph.raw_id(index), degree),
        None => (None, 0),
    };

    let self_loops: usize = (0..graph.vertex_count() as InternalIndex)
        .map(|vertex| {
            graph
                .read_neighbor(vertex)
                .iter()
                .filter(|&&neighbor| neighbor == vertex)
                .count()
        })
        .sum();

    GraphStats {
        vertex_count: graph.vertex_count(),
        edge_count: graph.edge_count(),
        max_out_degree,
        critical_vertex,
        self_loops,
    }
}
