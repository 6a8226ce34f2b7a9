//! End-to-end tests for compact store construction.
//!
//! Property tests over random adjacency mappings: row layout round-trips,
//! the sentinel offset, deterministic index assignment, and the
//! strict/lenient handling of dangling neighbor ids.

use proptest::prelude::*;
use rwgraph::{Adjacency, CompactGraph, Error, ExternalId, MissingNeighbors, NeighborAccess, NodeIndex};

// ============================================================================
// Strategy: adjacency whose neighbor ids all have rows
// ============================================================================

fn closed_adjacency() -> impl Strategy<Value = Adjacency> {
    prop::collection::hash_map(
        -500i64..500,
        prop::collection::vec(any::<prop::sample::Index>(), 0..8),
        1..40,
    )
    .prop_map(|raw| {
        let keys: Vec<ExternalId> = raw.keys().copied().collect();
        raw.into_iter()
            .map(|(k, picks)| (k, picks.iter().map(|p| keys[p.index(keys.len())]).collect()))
            .collect::<Adjacency>()
    })
}

// ============================================================================
// 1. Properties
// ============================================================================

proptest! {
    #[test]
    fn prop_rows_round_trip(adj in closed_adjacency()) {
        let g = CompactGraph::build(&adj, MissingNeighbors::Strict).unwrap();
        prop_assert_eq!(g.node_count(), adj.len());
        for i in 0..g.node_count() {
            let idx = NodeIndex(i as u32);
            let id = g.external_id(idx).unwrap();
            let expected: Vec<NodeIndex> = adj[&id].iter().map(|n| g.index_of(*n).unwrap()).collect();
            prop_assert_eq!(g.neighbors(idx), expected.as_slice());
        }
    }

    #[test]
    fn prop_sentinel_and_monotone_offsets(adj in closed_adjacency()) {
        let g = CompactGraph::build(&adj, MissingNeighbors::Strict).unwrap();
        let offsets = g.row_offsets();
        prop_assert_eq!(offsets.len(), g.node_count() + 1);
        prop_assert_eq!(offsets[0], 0);
        prop_assert_eq!(offsets[g.node_count()], g.edge_count());
        prop_assert!(offsets.windows(2).all(|w| w[0] <= w[1]));
        prop_assert!(g.neighbor_array().iter().all(|n| n.as_usize() < g.node_count()));
        prop_assert!(g.verify().is_ok());
    }

    #[test]
    fn prop_build_is_deterministic(adj in closed_adjacency()) {
        let a = CompactGraph::build(&adj, MissingNeighbors::Strict).unwrap();
        let b = CompactGraph::build(&adj.clone(), MissingNeighbors::Strict).unwrap();
        prop_assert_eq!(a.row_offsets(), b.row_offsets());
        prop_assert_eq!(a.neighbor_array(), b.neighbor_array());
        for id in adj.keys() {
            prop_assert_eq!(a.index_of(*id), b.index_of(*id));
        }
        prop_assert_eq!(a, b);
    }

    #[test]
    fn prop_index_is_sorted_rank(adj in closed_adjacency()) {
        let g = CompactGraph::build(&adj, MissingNeighbors::Strict).unwrap();
        let mut keys: Vec<ExternalId> = adj.keys().copied().collect();
        keys.sort_unstable();
        for (rank, id) in keys.iter().enumerate() {
            prop_assert_eq!(g.index_of(*id), Some(NodeIndex(rank as u32)));
        }
    }

    #[test]
    fn prop_lenient_accepts_any_neighbors(
        raw in prop::collection::hash_map(0i64..50, prop::collection::vec(0i64..100, 0..6), 1..20)
    ) {
        let adj: Adjacency = raw.into_iter().collect();
        let g = CompactGraph::build(&adj, MissingNeighbors::Lenient).unwrap();
        prop_assert!(g.verify().is_ok());
        for (id, nbrs) in &adj {
            let idx = g.index_of(*id).unwrap();
            prop_assert_eq!(g.degree(idx), nbrs.len());
            for n in nbrs {
                prop_assert!(g.index_of(*n).is_some());
            }
        }
    }
}

// ============================================================================
// 2. Fixed cases
// ============================================================================

#[test]
fn test_strict_reports_offending_ids() {
    let adj: Adjacency = [(1, vec![2]), (2, vec![1, 9])].into_iter().collect();
    match CompactGraph::build(&adj, MissingNeighbors::Strict) {
        Err(Error::MissingNode { missing, referenced_by }) => {
            assert_eq!(missing, 9);
            assert_eq!(referenced_by, 2);
        }
        other => panic!("expected MissingNode, got {other:?}"),
    }
}

#[test]
fn test_lenient_dangling_row_is_empty() {
    let adj: Adjacency = [(1, vec![2]), (2, vec![1, 9])].into_iter().collect();
    let g = CompactGraph::build(&adj, MissingNeighbors::Lenient).unwrap();
    let nine = g.index_of(9).unwrap();
    assert_eq!(g.degree(nine), 0);
    assert_eq!(*g.row_offsets().last().unwrap(), 3);
}
