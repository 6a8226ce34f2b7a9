//! Node identifiers and node classes of the bipartite graph.

use serde::{Deserialize, Serialize};

/// Identifier a node carries in the caller's adjacency mapping.
///
/// Class-V identifiers are expected to be shifted above every class-U
/// identifier before they reach the store.
pub type ExternalId = i64;

/// Dense row index of a node inside a [`CompactGraph`](crate::storage::CompactGraph).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
#[repr(transparent)]
pub struct NodeIndex(pub u32);

impl NodeIndex {
    #[inline]
    pub fn as_usize(self) -> usize {
        self.0 as usize
    }
}

impl std::fmt::Display for NodeIndex {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Which side of the bipartition a node sits on.
///
/// `U` occupies the low contiguous index range, `V` the remaining high range.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum NodeClass {
    U,
    V,
}

impl NodeClass {
    pub fn as_str(&self) -> &'static str {
        match self {
            NodeClass::U => "U",
            NodeClass::V => "V",
        }
    }
}

impl std::fmt::Display for NodeClass {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}
