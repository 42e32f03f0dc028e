use rustc_hash::FxHashMap;

use crate::types::{InternalIndex, RawVertexId};

/// Bijective mapping between sparse raw identifiers and dense internal indices.
///
/// Indices are handed out in first-seen order starting at 0, so the inverse
/// table is always gap free: `inverse[forward[id]] == id` for every id that
/// has been resolved.
#[derive(Debug, Clone, PartialEq)]
pub struct VertexMapper {
    /// Raw identifier -> internal index.
    forward: FxHashMap<RawVertexId, InternalIndex>,
    /// Internal index -> raw identifier, position is the index.
    inverse: Vec<RawVertexId>,
    /// Maximum number of distinct identifiers.
    index_limit: usize,
}

impl Default for VertexMapper {
    fn default() -> Self {
        Self::with_index_limit(InternalIndex::MAX as usize)
    }
}

impl VertexMapper {
    pub fn new() -> Self {
        Self::default()
    }

    /// A mapper that accepts at most `index_limit` distinct identifiers. The
    /// limit is clamped to what `InternalIndex` can address.
    pub fn with_index_limit(index_limit: usize) -> Self {
        Self {
            forward: FxHashMap::default(),
            inverse: Vec::new(),
            index_limit: index_limit.min(InternalIndex::MAX as usize),
        }
    }

    pub fn index_limit(&self) -> usize {
        self.index_limit
    }

    /// Returns the internal index of `raw_id`, assigning the next free index
    /// if the identifier has not been seen yet.
    ///
    /// Returns `None` only when `raw_id` is new and the index space is full.
    pub fn resolve(&mut self, raw_id: RawVertexId) -> Option<InternalIndex> {
        if let Some(&index) = self.forward.get(&raw_id) {
            return Some(index);
        }
        if self.inverse.len() >= self.index_limit {
            return None;
        }
        let index = InternalIndex::try_from(self.inverse.len()).ok()?;
        self.forward.insert(raw_id, index);
        self.inverse.push(raw_id);
        Some(index)
    }

    /// Looks up the internal index of `raw_id` without inserting it.
    pub fn get(&self, raw_id: &RawVertexId) -> Option<InternalIndex> {
        self.forward.get(raw_id).copied()
    }

    /// Translates an internal index back to the raw identifier.
    pub fn raw_id(&self, index: InternalIndex) -> Option<RawVertexId> {
        self.inverse.get(index as usize).copied()
    }

    /// Inverse table, indexed by internal index.
    pub fn inverse(&self) -> &[RawVertexId] {
        &self.inverse
    }

    pub fn len(&self) -> usize {
        self.inverse.len()
    }

    pub fn is_empty(&self) -> bool {
        self.inverse.is_empty()
    }
}
