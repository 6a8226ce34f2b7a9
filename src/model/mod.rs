//! # Graph Model
//!
//! Plain data shared by every layer: node identifiers, node classes and the
//! visitation histogram. No I/O, no state, no threads.

pub mod node;
pub mod histogram;

pub use node::{ExternalId, NodeClass, NodeIndex};
pub use histogram::VisitHistogram;
