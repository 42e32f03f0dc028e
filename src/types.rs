use crate::types::graph_query::GraphQuery;
use crate::types::vertex_mapper::VertexMapper;

pub mod graph_query;
pub mod vertex_mapper;

/// Vertex identifier as it appears in the input edge list.
pub type RawVertexId = i64;

/// Dense vertex index assigned at load time, in `[0, vertex_count)`.
pub type InternalIndex = u32;

/// A directed edge expressed in raw identifiers.
pub type RawEdge = (RawVertexId, RawVertexId);

/// A CSR (Compressed Sparse Row) graph over dense internal indices, together
/// with the mapping back to raw identifiers.
///
/// For each vertex `i`, its out-neighbors are
/// `column_indices[row_offsets[i]..row_offsets[i + 1]]`, grouped by ascending
/// source and ordered by target within a source.
///
/// The structure is immutable once built. All three tables are created by a
/// single load and dropped together.
#[derive(Debug, Clone, PartialEq)]
pub struct CSRGraph {
    /// Offset array of length `vertex_count + 1`.
    pub(crate) row_offsets: Vec<usize>,

    /// Flattened adjacency list, segmented according to `row_offsets`.
    pub(crate) column_indices: Vec<InternalIndex>,

    /// Raw identifier <-> internal index mapping.
    pub(crate) vertex_mapper: VertexMapper,
}

impl Default for CSRGraph {
    fn default() -> Self {
        Self {
            row_offsets: vec![0],
            column_indices: Vec::new(),
            vertex_mapper: VertexMapper::new(),
        }
    }
}

impl CSRGraph {
    pub fn row_offsets(&self) -> &[usize] {
        &self.row_offsets
    }

    pub fn column_indices(&self) -> &[InternalIndex] {
        &self.column_indices
    }

    pub fn vertex_mapper(&self) -> &VertexMapper {
        &self.vertex_mapper
    }

    /// Internal index of a raw identifier, if it was seen during load.
    pub fn internal_index(&self, raw_id: RawVertexId) -> Option<InternalIndex> {
        self.vertex_mapper.get(&raw_id)
    }

    /// Raw identifier of an internal index.
    pub fn raw_id(&self, index: InternalIndex) -> Option<RawVertexId> {
        self.vertex_mapper.raw_id(index)
    }

    /// Out-neighbors of a raw vertex, translated back to raw identifiers.
    pub fn raw_neighbors(&self, raw_id: RawVertexId) -> Vec<RawVertexId> {
        let inverse = self.vertex_mapper.inverse();
        match self.internal_index(raw_id) {
            None => vec![],
            Some(index) => self
                .read_neighbor(index)
                .iter()
                .map(|&target| inverse[target as usize])
                .collect(),
        }
    }
}

impl GraphQuery for CSRGraph {
    fn vertex_count(&self) -> usize {
        self.vertex_mapper.len()
    }

    fn edge_count(&self) -> usize {
        self.column_indices.len()
    }

    fn read_neighbor(&self, vertex_id: InternalIndex) -> &[InternalIndex] {
        let vertex = vertex_id as usize;
        if vertex >= self.vertex_count() {
            return &[];
        }
        &self.column_indices[self.row_offsets[vertex]..self.row_offsets[vertex + 1]]
    }

    fn out_degree(&self, vertex_id: InternalIndex) -> usize {
        let vertex = vertex_id as usize;
        if vertex >= self.vertex_count() {
            return 0;
        }
        self.row_offsets[vertex + 1] - self.row_offsets[vertex]
    }
}

#[cfg(test)]
pub mod test_type {
    use super::*;

    /// Graph used by most tests below:
    ///
    /// raw:      10 -> 20, 10 -> 30, 20 -> 30, 30 -> 10, 30 -> 30
    /// internal:  0 ->  1,  0 ->  2,  1 ->  2,  2 ->  0,  2 ->  2
    fn create_test_graph() -> CSRGraph {
        CSRGraph::from_edges(vec![(10, 20), (20, 30), (10, 30), (30, 30), (30, 10)], 0).unwrap()
    }

    #[test]
    fn test_read_neighbor() {
        let graph = create_test_graph();
        assert_eq!(graph.read_neighbor(0), &[1, 2]);
        assert_eq!(graph.read_neighbor(1), &[2]);
        assert_eq!(graph.read_neighbor(2), &[0, 2]);

        // Out-of-range vertex
        assert!(graph.read_neighbor(3).is_empty());
    }

    #[test]
    fn test_vertex_and_edge_exist() {
        let graph = create_test_graph();
        for vertex in 0..3 {
            assert!(graph.has_vertex(vertex));
        }
        assert!(!graph.has_vertex(3));

        for (src, dst) in [(0, 1), (0, 2), (1, 2), (2, 0), (2, 2)] {
            assert!(graph.has_edge(src, dst), "missing edge {} -> {}", src, dst);
        }
        for (src, dst) in [(1, 0), (2, 1), (5, 0)] {
            assert!(!graph.has_edge(src, dst), "unexpected edge {} -> {}", src, dst);
        }
    }

    #[test]
    fn test_out_degree() {
        let graph = create_test_graph();
        assert_eq!(graph.out_degree(0), 2);
        assert_eq!(graph.out_degree(1), 1);
        assert_eq!(graph.out_degree(2), 2);
        assert_eq!(graph.out_degree(9), 0);
        assert_eq!(graph.vertex_count(), 3);
        assert_eq!(graph.edge_count(), 5);
    }

    #[test]
    fn test_raw_translation() {
        let graph = create_test_graph();
        assert_eq!(graph.internal_index(30), Some(2));
        assert_eq!(graph.internal_index(40), None);
        assert_eq!(graph.raw_id(1), Some(20));
        assert_eq!(graph.raw_neighbors(30), vec![10, 30]);
        assert!(graph.raw_neighbors(40).is_empty());
    }

    #[test]
    fn test_empty_graph() {
        let graph = CSRGraph::default();
        assert_eq!(graph.vertex_count(), 0);
        assert_eq!(graph.edge_count(), 0);
        assert_eq!(graph.row_offsets(), &[0]);
        assert!(graph.read_neighbor(0).is_empty());
    }
}
