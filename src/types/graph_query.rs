use crate::types::InternalIndex;

/// A trait that defines read-only adjacency queries over internal indices.
///
/// Implementors expose their neighbor lists as borrowed slices, so traversal
/// code can walk the structure without copying it.
pub trait GraphQuery {
    /// Number of vertices, internal indices are `0..vertex_count()`.
    fn vertex_count(&self) -> usize;

    /// Number of directed edges.
    fn edge_count(&self) -> usize;

    /// Retrieves the out-neighbors of a vertex.
    ///
    /// # Returns
    ///
    /// The targets of every outgoing edge in storage order, or an empty slice
    /// when the vertex does not exist.
    fn read_neighbor(&self, vertex_id: InternalIndex) -> &[InternalIndex];

    /// Checks if a specific vertex exists.
    fn has_vertex(&self, vertex_id: InternalIndex) -> bool {
        (vertex_id as usize) < self.vertex_count()
    }

    /// Determines if an edge exists from `src_id` to `dst_id`.
    fn has_edge(&self, src_id: InternalIndex, dst_id: InternalIndex) -> bool {
        self.read_neighbor(src_id).contains(&dst_id)
    }

    /// Out-degree of a vertex, zero for unknown vertices.
    fn out_degree(&self, vertex_id: InternalIndex) -> usize {
        self.read_neighbor(vertex_id).len()
    }
}
