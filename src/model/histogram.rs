//! Visitation histogram produced by the walk sampler.

use hashbrown::HashMap;
use serde::{Deserialize, Serialize};

use super::NodeIndex;

/// Node index → number of times a walk was recorded landing on it.
///
/// Partial histograms from different workers combine by per-key summation,
/// so merge order never affects the result.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct VisitHistogram {
    counts: HashMap<NodeIndex, u64>,
}

impl VisitHistogram {
    pub fn new() -> Self {
        Self::default()
    }

    /// Count one visit to `node`.
    #[inline]
    pub fn record(&mut self, node: NodeIndex) {
        *self.counts.entry(node).or_insert(0) += 1;
    }

    /// Add `count` visits to `node`.
    pub fn add(&mut self, node: NodeIndex, count: u64) {
        if count > 0 {
            *self.counts.entry(node).or_insert(0) += count;
        }
    }

    /// Sum another histogram into this one.
    pub fn merge(&mut self, other: VisitHistogram) {
        if self.counts.is_empty() {
            self.counts = other.counts;
            return;
        }
        for (node, count) in other.counts {
            *self.counts.entry(node).or_insert(0) += count;
        }
    }

    pub fn get(&self, node: NodeIndex) -> u64 {
        self.counts.get(&node).copied().unwrap_or(0)
    }

    /// Number of distinct nodes visited.
    pub fn len(&self) -> usize {
        self.counts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.counts.is_empty()
    }

    /// Total number of recorded visits across all nodes.
    pub fn total(&self) -> u64 {
        self.counts.values().sum()
    }

    pub fn iter(&self) -> impl Iterator<Item = (NodeIndex, u64)> + '_ {
        self.counts.iter().map(|(&node, &count)| (node, count))
    }

    /// Entries sorted by count descending, ties broken by ascending index.
    pub fn ranked(&self) -> Vec<(NodeIndex, u64)> {
        let mut entries: Vec<_> = self.iter().collect();
        entries.sort_unstable_by(|a, b| b.1.cmp(&a.1).then(a.0.cmp(&b.0)));
        entries
    }
}

impl FromIterator<(NodeIndex, u64)> for VisitHistogram {
    fn from_iter<I: IntoIterator<Item = (NodeIndex, u64)>>(iter: I) -> Self {
        let mut hist = VisitHistogram::new();
        for (node, count) in iter {
            hist.add(node, count);
        }
        hist
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn hist(entries: &[(u32, u64)]) -> VisitHistogram {
        entries.iter().map(|&(n, c)| (NodeIndex(n), c)).collect()
    }

    #[test]
    fn test_record_and_total() {
        let mut h = VisitHistogram::new();
        h.record(NodeIndex(3));
        h.record(NodeIndex(3));
        h.record(NodeIndex(7));
        assert_eq!(h.get(NodeIndex(3)), 2);
        assert_eq!(h.get(NodeIndex(7)), 1);
        assert_eq!(h.get(NodeIndex(9)), 0);
        assert_eq!(h.len(), 2);
        assert_eq!(h.total(), 3);
    }

    #[test]
    fn test_merge_sums_per_key() {
        let mut a = hist(&[(1, 2), (2, 5)]);
        a.merge(hist(&[(2, 1), (4, 4)]));
        assert_eq!(a, hist(&[(1, 2), (2, 6), (4, 4)]));
    }

    #[test]
    fn test_merge_order_irrelevant() {
        let parts = [hist(&[(1, 1), (2, 2)]), hist(&[(2, 3)]), hist(&[(5, 1), (1, 4)])];

        let mut forward = VisitHistogram::new();
        for p in parts.iter().cloned() {
            forward.merge(p);
        }
        let mut backward = VisitHistogram::new();
        for p in parts.iter().rev().cloned() {
            backward.merge(p);
        }
        assert_eq!(forward, backward);
    }

    #[test]
    fn test_zero_count_not_inserted() {
        let h = hist(&[(1, 0)]);
        assert!(h.is_empty());
    }

    #[test]
    fn test_ranked_order() {
        let h = hist(&[(4, 2), (1, 5), (3, 2), (9, 1)]);
        assert_eq!(
            h.ranked(),
            vec![(NodeIndex(1), 5), (NodeIndex(3), 2), (NodeIndex(4), 2), (NodeIndex(9), 1)]
        );
    }

    #[test]
    fn test_serializes_as_map() {
        let h = hist(&[(2, 1)]);
        let json = serde_json::to_string(&h).unwrap();
        assert_eq!(json, r#"{"2":1}"#);
    }
}
