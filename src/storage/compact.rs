//! Compact (CSR) adjacency store.
//!
//! Built once from an `ExternalId → Vec<ExternalId>` mapping, then frozen.
//! The store is shared read-only by every walk worker, so nothing here is
//! behind a lock.
//!
//! ## Layout
//!
//! ```text
//! row_offsets: [0, 1, 2, 4]          len = node_count + 1 (last = sentinel)
//! neighbors:   [2, 2, 0, 1]          row i = neighbors[row_offsets[i]..row_offsets[i+1]]
//! ```
//!
//! Row index = rank of the external id in ascending key order, so two builds
//! from the same mapping produce identical arrays.

use hashbrown::HashMap;
use tracing::debug;

use crate::model::{ExternalId, NodeIndex};
use crate::{Error, Result};
use super::{Adjacency, MissingNeighbors, NeighborAccess};

// ============================================================================
// CompactGraph
// ============================================================================

/// Immutable CSR adjacency over a dense node index space.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompactGraph {
    /// Start offset of each row in `neighbors`, plus the trailing sentinel.
    row_offsets: Vec<usize>,
    /// Flattened neighbor lists, grouped by ascending row index.
    neighbors: Vec<NodeIndex>,
    /// External id → row index.
    id_to_index: HashMap<ExternalId, NodeIndex>,
    /// Row index → external id (sorted ascending).
    index_to_id: Vec<ExternalId>,
}

impl CompactGraph {
    /// Build the store from an adjacency mapping.
    ///
    /// Neighbor ids must already live in the same id space as the keys. Under
    /// [`MissingNeighbors::Strict`] a neighbor without its own row is an
    /// error; under [`MissingNeighbors::Lenient`] it becomes a row with no
    /// out-edges.
    pub fn build(adjacency: &Adjacency, missing: MissingNeighbors) -> Result<Self> {
        let mut keys: Vec<ExternalId> = adjacency.keys().copied().collect();

        if missing == MissingNeighbors::Lenient {
            let mut extra: Vec<ExternalId> = adjacency
                .values()
                .flatten()
                .copied()
                .filter(|id| !adjacency.contains_key(id))
                .collect();
            extra.sort_unstable();
            extra.dedup();
            if !extra.is_empty() {
                debug!(count = extra.len(), "Adding empty rows for dangling neighbor ids");
            }
            keys.extend(extra);
        }
        keys.sort_unstable();

        if keys.len() > u32::MAX as usize {
            return Err(Error::CapacityExceeded(keys.len()));
        }

        let id_to_index: HashMap<ExternalId, NodeIndex> = keys
            .iter()
            .enumerate()
            .map(|(idx, &id)| (id, NodeIndex(idx as u32)))
            .collect();

        let edge_count: usize = adjacency.values().map(Vec::len).sum();
        let mut row_offsets = Vec::with_capacity(keys.len() + 1);
        let mut neighbors = Vec::with_capacity(edge_count);

        for &id in &keys {
            row_offsets.push(neighbors.len());
            let Some(list) = adjacency.get(&id) else {
                continue;
            };
            for &nbr in list {
                let idx = id_to_index.get(&nbr).copied().ok_or(Error::MissingNode {
                    missing: nbr,
                    referenced_by: id,
                })?;
                neighbors.push(idx);
            }
        }
        row_offsets.push(neighbors.len());

        let graph = Self {
            row_offsets,
            neighbors,
            id_to_index,
            index_to_id: keys,
        };
        debug_assert!(graph.verify().is_ok());

        debug!(
            nodes = graph.node_count(),
            edges = graph.edge_count(),
            "Built compact graph"
        );
        Ok(graph)
    }

    /// Number of rows.
    pub fn node_count(&self) -> usize {
        self.row_offsets.len() - 1
    }

    /// Length of the flattened neighbor array.
    pub fn edge_count(&self) -> usize {
        self.neighbors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.node_count() == 0
    }

    /// Row offsets including the trailing sentinel.
    pub fn row_offsets(&self) -> &[usize] {
        &self.row_offsets
    }

    /// The flattened neighbor array.
    pub fn neighbor_array(&self) -> &[NodeIndex] {
        &self.neighbors
    }

    /// Row index of an external id.
    pub fn index_of(&self, id: ExternalId) -> Option<NodeIndex> {
        self.id_to_index.get(&id).copied()
    }

    /// External id of a row index.
    pub fn external_id(&self, index: NodeIndex) -> Option<ExternalId> {
        self.index_to_id.get(index.as_usize()).copied()
    }

    pub fn contains(&self, index: NodeIndex) -> bool {
        index.as_usize() < self.node_count()
    }

    /// Check the layout invariants.
    ///
    /// A violation means the store was corrupted, not that the input was bad.
    pub fn verify(&self) -> Result<()> {
        let n = self.index_to_id.len();
        if self.row_offsets.len() != n + 1 {
            return Err(Error::InvariantViolation(format!(
                "row_offsets has {} entries for {n} nodes",
                self.row_offsets.len()
            )));
        }
        if self.row_offsets[0] != 0 {
            return Err(Error::InvariantViolation("row_offsets[0] != 0".into()));
        }
        if self.row_offsets[n] != self.neighbors.len() {
            return Err(Error::InvariantViolation(format!(
                "sentinel {} != neighbor count {}",
                self.row_offsets[n],
                self.neighbors.len()
            )));
        }
        if let Some(pos) = self.row_offsets.windows(2).position(|w| w[0] > w[1]) {
            return Err(Error::InvariantViolation(format!(
                "row_offsets decreases at row {pos}"
            )));
        }
        if let Some(bad) = self.neighbors.iter().find(|idx| idx.as_usize() >= n) {
            return Err(Error::InvariantViolation(format!(
                "neighbor index {bad} out of range for {n} nodes"
            )));
        }
        if self.id_to_index.len() != n {
            return Err(Error::InvariantViolation(format!(
                "id table has {} entries for {n} nodes",
                self.id_to_index.len()
            )));
        }
        Ok(())
    }
}

impl NeighborAccess for CompactGraph {
    #[inline]
    fn node_count(&self) -> usize {
        CompactGraph::node_count(self)
    }

    /// Panics when `node` is not a row of this graph.
    #[inline]
    fn neighbors(&self, node: NodeIndex) -> &[NodeIndex] {
        let i = node.as_usize();
        let start = self.row_offsets[i];
        let end = self.row_offsets[i + 1];
        &self.neighbors[start..end]
    }
}
