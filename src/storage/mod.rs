//! # Graph Storage
//!
//! The contract between the walk sampler and whatever holds the adjacency.
//! The sampler only ever needs "how many nodes" and "neighbors of node i as
//! a borrowed slice", so that is all [`NeighborAccess`] asks for.
//!
//! ## Implementations
//!
//! | Store | Module | Description |
//! |-------|--------|-------------|
//! | `CompactGraph` | `compact` | Immutable CSR arrays, shared read-only |

pub mod compact;

use hashbrown::HashMap;
use serde::{Deserialize, Serialize};

use crate::model::{ExternalId, NodeIndex};

pub use compact::CompactGraph;

/// Raw adjacency handed to [`CompactGraph::build`]: node id → neighbor ids,
/// with both directions of every edge already present.
pub type Adjacency = HashMap<ExternalId, Vec<ExternalId>>;

// ============================================================================
// Build discipline
// ============================================================================

/// What to do with a neighbor id that has no row of its own.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MissingNeighbors {
    /// Fail the build with [`Error::MissingNode`](crate::Error::MissingNode).
    #[default]
    Strict,
    /// Give the id an empty row (a node with no out-edges).
    Lenient,
}

// ============================================================================
// NeighborAccess trait
// ============================================================================

/// Read-only, borrowed adjacency view.
///
/// Implementors must return slices whose entries are all `< node_count()`.
pub trait NeighborAccess: Send + Sync {
    fn node_count(&self) -> usize;

    /// Neighbor slice of `node`. May panic if `node` is out of range.
    fn neighbors(&self, node: NodeIndex) -> &[NodeIndex];

    fn degree(&self, node: NodeIndex) -> usize {
        self.neighbors(node).len()
    }
}
