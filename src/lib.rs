//! # rwgraph: Bipartite Random-Walk Co-visitation
//!
//! Estimates which nodes of a bipartite graph are close to a query node by
//! running many short alternating random walks and counting where they land.
//!
//! ## Design Principles
//!
//! 1. **Build once, read forever**: the CSR store is frozen after
//!    construction and shared by every worker without locks
//! 2. **Pure sampler**: a batch of walks is a function of store, parameters
//!    and its own random stream
//! 3. **Owned pool**: the worker pool belongs to the `Graph` handle and is
//!    reused across calls
//! 4. **One error at the boundary**: worker panics, timeouts and bad input
//!    all surface as a single `Error`
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use rwgraph::{Graph, GraphConfig, NodeClass};
//! use rwgraph::ingest::read_adjacency_file;
//!
//! # fn example() -> rwgraph::Result<()> {
//! let input = read_adjacency_file("data/random_data.txt")?;
//! let graph = Graph::from_adjacency(&input.adjacency, GraphConfig::default())?;
//!
//! let start = input.lookup.find(NodeClass::V, "_25").expect("label present");
//! let visits = graph.walk(start, 100, 3)?;
//!
//! for row in rwgraph::export::ranked(&visits, &input.lookup, Some(10))? {
//!     println!("{} {}", row.label, row.count);
//! }
//! # Ok(())
//! # }
//! ```

// ============================================================================
// Modules
// ============================================================================

pub mod model;
pub mod storage;
pub mod walk;
pub mod execution;
pub mod index;
pub mod config;
pub mod ingest;
pub mod export;

use std::sync::Arc;
use std::time::Duration;

use tracing::{debug, info};

// ============================================================================
// Re-exports
// ============================================================================

pub use model::{ExternalId, NodeClass, NodeIndex, VisitHistogram};
pub use storage::{Adjacency, CompactGraph, MissingNeighbors, NeighborAccess};
pub use walk::{RecordParity, StopRule, WalkParams};
pub use execution::{CancelToken, WalkPool};
pub use index::NodeLookup;
pub use config::GraphConfig;

// ============================================================================
// Top-level Graph handle
// ============================================================================

/// The primary entry point. A `Graph` owns the compact store and the worker
/// pool that walks it.
///
/// The pool is created here and torn down when the handle drops.
#[derive(Debug)]
pub struct Graph {
    store: Arc<CompactGraph>,
    pool: WalkPool,
    config: GraphConfig,
}

impl Graph {
    /// Wrap an already built store.
    pub fn new(store: CompactGraph, config: GraphConfig) -> Result<Self> {
        config.validate()?;
        let pool = WalkPool::new(config.workers)?;
        info!(
            nodes = store.node_count(),
            edges = store.edge_count(),
            workers = config.workers,
            "Graph ready"
        );
        Ok(Self { store: Arc::new(store), pool, config })
    }

    /// Build the store from an adjacency mapping using the configured
    /// missing-neighbor discipline, then wrap it.
    pub fn from_adjacency(adjacency: &Adjacency, config: GraphConfig) -> Result<Self> {
        config.validate()?;
        let store = CompactGraph::build(adjacency, config.missing_neighbors)?;
        Self::new(store, config)
    }

    pub fn store(&self) -> &CompactGraph {
        &self.store
    }

    pub fn config(&self) -> &GraphConfig {
        &self.config
    }

    pub fn workers(&self) -> usize {
        self.pool.workers()
    }

    /// Run `num_walks` walks of `num_steps` alternating steps from `start`
    /// across the worker pool, with default [`WalkParams`] otherwise.
    pub fn walk(&self, start: NodeIndex, num_walks: usize, num_steps: usize) -> Result<VisitHistogram> {
        self.walk_with(start, &WalkParams::new(num_walks, num_steps))
    }

    /// Parallel walk with explicit parameters.
    pub fn walk_with(&self, start: NodeIndex, params: &WalkParams) -> Result<VisitHistogram> {
        self.walk_with_cancel(start, params, &CancelToken::new())
    }

    /// Parallel walk that stops early once `cancel` is triggered.
    ///
    /// Each of the `workers` batches runs `max(num_walks / workers, 1)`
    /// walks, so the executed total may differ from `params.num_walks`.
    pub fn walk_with_cancel(
        &self,
        start: NodeIndex,
        params: &WalkParams,
        cancel: &CancelToken,
    ) -> Result<VisitHistogram> {
        self.check_start(start)?;

        let per_worker = self.pool.per_worker(params.num_walks);
        let seed = self.config.seed.unwrap_or_else(rand::random);
        debug!(
            %start,
            per_worker,
            workers = self.pool.workers(),
            steps = params.num_steps,
            "Dispatching walk batches"
        );

        let store = Arc::clone(&self.store);
        let params = *params;
        self.pool.fan_out(
            move |task, stop| {
                let mut rng = execution::task_rng(seed, task);
                walk::sample_walks_until(&*store, start, per_worker, &params, &mut rng, stop)
            },
            self.config.timeout,
            cancel,
        )
    }

    /// Resolve an external id and run a parallel walk from it.
    pub fn walk_from(&self, id: ExternalId, params: &WalkParams) -> Result<VisitHistogram> {
        let start = self
            .store
            .index_of(id)
            .ok_or_else(|| Error::NotFound(format!("Node {id}")))?;
        self.walk_with(start, params)
    }

    /// Run all `params.num_walks` walks on the calling thread.
    pub fn walk_single_thread(&self, start: NodeIndex, params: &WalkParams) -> Result<VisitHistogram> {
        self.check_start(start)?;
        let seed = self.config.seed.unwrap_or_else(rand::random);
        let mut rng = execution::task_rng(seed, 0);
        Ok(walk::sample_walks(&*self.store, start, params.num_walks, params, &mut rng))
    }

    fn check_start(&self, start: NodeIndex) -> Result<()> {
        if self.store.contains(start) {
            Ok(())
        } else {
            Err(Error::IndexOutOfRange {
                index: start,
                node_count: self.store.node_count(),
            })
        }
    }
}

// ============================================================================
// Error Types
// ============================================================================

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Node {missing} is referenced by {referenced_by} but has no adjacency row")]
    MissingNode { missing: ExternalId, referenced_by: ExternalId },

    #[error("Node index {index} out of range for graph with {node_count} nodes")]
    IndexOutOfRange { index: NodeIndex, node_count: usize },

    #[error("Graph too large: {0} nodes exceed the u32 index space")]
    CapacityExceeded(usize),

    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("{failed} of {total} walk workers panicked (first: {message})")]
    WorkerPanic { failed: usize, total: usize, message: String },

    #[error("Worker pool error: {0}")]
    PoolError(String),

    #[error("Walk timed out after {0:?}")]
    Timeout(Duration),

    #[error("Walk cancelled")]
    Cancelled,

    #[error("Invariant violated: {0}")]
    InvariantViolation(String),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, Error>;
