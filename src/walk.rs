//! Alternating random-walk sampler.
//!
//! A walk starts at a fixed node and takes up to `2 * num_steps` uniform
//! random hops. In a bipartite graph every hop switches sides, so hop index
//! 0, 2, 4, … lands on the side opposite the start node and hop index
//! 1, 3, 5, … lands back on the start node's side. Which of the two is
//! counted is set by [`RecordParity`].
//!
//! ```text
//! start(U) --h0--> V --h1--> U --h2--> V --h3--> U
//!                  ^ counted           ^ counted      (CrossClass)
//! ```
//!
//! The sampler is a pure function of the store, the parameters and the
//! random source. It owns no state and never locks anything.

use std::sync::atomic::{AtomicBool, Ordering};

use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::model::{NodeIndex, VisitHistogram};
use crate::storage::NeighborAccess;

/// Hops between two reads of the stop flag inside a single walk.
const STOP_CHECK_HOPS: usize = 1024;

// ============================================================================
// Parameters
// ============================================================================

/// When a walk gives up at a node.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StopRule {
    /// Stop at a node with at most one neighbor (`end - start - 1 <= 0`).
    #[default]
    SingleNeighbor,
    /// Stop only at a node with no neighbors.
    NoNeighbors,
}

impl StopRule {
    /// Smallest degree a node needs for the walk to hop out of it.
    #[inline]
    pub fn min_degree(self) -> usize {
        match self {
            StopRule::SingleNeighbor => 2,
            StopRule::NoNeighbors => 1,
        }
    }
}

/// Which hops are recorded into the histogram.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RecordParity {
    /// Hop index 0, 2, 4, …: nodes on the opposite side of the start node.
    #[default]
    CrossClass,
    /// Hop index 1, 3, 5, …: nodes on the start node's own side.
    SameClass,
}

impl RecordParity {
    #[inline]
    fn records(self, hop: usize) -> bool {
        match self {
            RecordParity::CrossClass => hop % 2 == 0,
            RecordParity::SameClass => hop % 2 == 1,
        }
    }
}

/// Per-call walk parameters.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct WalkParams {
    /// Walks requested for the whole call (split across workers).
    pub num_walks: usize,
    /// Alternating steps per walk; each step is two hops.
    pub num_steps: usize,
    pub stop_rule: StopRule,
    pub parity: RecordParity,
}

impl Default for WalkParams {
    fn default() -> Self {
        Self {
            num_walks: 100,
            num_steps: 3,
            stop_rule: StopRule::default(),
            parity: RecordParity::default(),
        }
    }
}

impl WalkParams {
    pub fn new(num_walks: usize, num_steps: usize) -> Self {
        Self { num_walks, num_steps, ..Self::default() }
    }

    pub fn with_stop_rule(mut self, stop_rule: StopRule) -> Self {
        self.stop_rule = stop_rule;
        self
    }

    pub fn with_parity(mut self, parity: RecordParity) -> Self {
        self.parity = parity;
        self
    }

    /// Hops per walk.
    pub fn hops(&self) -> usize {
        self.num_steps.saturating_mul(2)
    }
}

// ============================================================================
// Sampling
// ============================================================================

/// Run `num_walks` walks from `start` and count the recorded landings.
///
/// `params.num_walks` is ignored here; the orchestrator passes each worker's
/// share explicitly.
///
/// # Panics
///
/// If `start` is not a node of `graph`.
pub fn sample_walks<G, R>(
    graph: &G,
    start: NodeIndex,
    num_walks: usize,
    params: &WalkParams,
    rng: &mut R,
) -> VisitHistogram
where
    G: NeighborAccess + ?Sized,
    R: Rng,
{
    sample_walks_until(graph, start, num_walks, params, rng, &AtomicBool::new(false))
}

/// Same as [`sample_walks`], but returns early once `stop` is set.
///
/// The flag is checked before every walk and every 1024 hops inside one, so a stopped batch returns a truncated histogram.
pub fn sample_walks_until<G, R>(
    graph: &G,
    start: NodeIndex,
    num_walks: usize,
    params: &WalkParams,
    rng: &mut R,
    stop: &AtomicBool,
) -> VisitHistogram
where
    G: NeighborAccess + ?Sized,
    R: Rng,
{
    assert!(
        start.as_usize() < graph.node_count(),
        "start node {start} out of range for {} nodes",
        graph.node_count()
    );

    let mut visits = VisitHistogram::new();
    for _ in 0..num_walks {
        if stop.load(Ordering::Relaxed) {
            break;
        }
        walk_once(graph, start, params, rng, stop, &mut visits);
    }
    visits
}

fn walk_once<G, R>(
    graph: &G,
    start: NodeIndex,
    params: &WalkParams,
    rng: &mut R,
    stop: &AtomicBool,
    visits: &mut VisitHistogram,
) where
    G: NeighborAccess + ?Sized,
    R: Rng,
{
    let min_degree = params.stop_rule.min_degree();
    let mut current = start;

    for hop in 0..params.hops() {
        if hop % STOP_CHECK_HOPS == STOP_CHECK_HOPS - 1 && stop.load(Ordering::Relaxed) {
            break;
        }
        let neighbors = graph.neighbors(current);
        if neighbors.len() < min_degree {
            break;
        }
        current = neighbors[rng.random_range(0..neighbors.len())];
        if params.parity.records(hop) {
            visits.record(current);
        }
    }
}
