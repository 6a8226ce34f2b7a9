//! Node identity resolution.
//!
//! Walk results are keyed by compact index. `NodeLookup` turns an index back
//! into the label it was read from, and says which side of the bipartition
//! it belongs to. Class is decided by range alone: indices below the
//! boundary are U nodes, the rest are V nodes.

use hashbrown::HashMap;

use crate::model::{NodeClass, NodeIndex};
use crate::{Error, Result};

/// Label tables for both node classes.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NodeLookup {
    /// Labels of indices `0..boundary`.
    u_labels: Vec<String>,
    /// Labels of indices `boundary..boundary + v_labels.len()`.
    v_labels: Vec<String>,
    u_by_label: HashMap<String, NodeIndex>,
    v_by_label: HashMap<String, NodeIndex>,
}

impl NodeLookup {
    /// `u_labels[i]` names index `i`; `v_labels[j]` names index
    /// `u_labels.len() + j`.
    pub fn new(u_labels: Vec<String>, v_labels: Vec<String>) -> Result<Self> {
        let total = u_labels.len() + v_labels.len();
        if total > u32::MAX as usize {
            return Err(Error::CapacityExceeded(total));
        }
        let boundary = u_labels.len() as u32;
        let u_by_label = u_labels
            .iter()
            .enumerate()
            .map(|(i, l)| (l.clone(), NodeIndex(i as u32)))
            .collect();
        let v_by_label = v_labels
            .iter()
            .enumerate()
            .map(|(j, l)| (l.clone(), NodeIndex(boundary + j as u32)))
            .collect();
        Ok(Self { u_labels, v_labels, u_by_label, v_by_label })
    }

    /// First V index; every smaller index is a U node.
    pub fn boundary(&self) -> NodeIndex {
        NodeIndex(self.u_labels.len() as u32)
    }

    pub fn num_u(&self) -> usize {
        self.u_labels.len()
    }

    pub fn num_v(&self) -> usize {
        self.v_labels.len()
    }

    pub fn len(&self) -> usize {
        self.u_labels.len() + self.v_labels.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Class of `index` by range.
    pub fn class_of(&self, index: NodeIndex) -> NodeClass {
        if index < self.boundary() { NodeClass::U } else { NodeClass::V }
    }

    /// Class and label of `index`.
    pub fn resolve(&self, index: NodeIndex) -> Result<(NodeClass, &str)> {
        let class = self.class_of(index);
        let label = match class {
            NodeClass::U => self.u_labels.get(index.as_usize()),
            NodeClass::V => self.v_labels.get(index.as_usize() - self.u_labels.len()),
        };
        label
            .map(|l| (class, l.as_str()))
            .ok_or_else(|| Error::NotFound(format!("Node index {index}")))
    }

    /// Index of a label within one class.
    pub fn find(&self, class: NodeClass, label: &str) -> Option<NodeIndex> {
        match class {
            NodeClass::U => self.u_by_label.get(label).copied(),
            NodeClass::V => self.v_by_label.get(label).copied(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn lookup() -> NodeLookup {
        NodeLookup::new(
            vec!["vid-a".into(), "vid-b".into()],
            vec!["#rust".into(), "#graphs".into(), "#rust-lang".into()],
        )
        .unwrap()
    }

    #[test]
    fn test_class_by_range() {
        let l = lookup();
        assert_eq!(l.boundary(), NodeIndex(2));
        assert_eq!(l.class_of(NodeIndex(0)), NodeClass::U);
        assert_eq!(l.class_of(NodeIndex(1)), NodeClass::U);
        assert_eq!(l.class_of(NodeIndex(2)), NodeClass::V);
        assert_eq!(l.class_of(NodeIndex(4)), NodeClass::V);
    }

    #[test]
    fn test_resolve() {
        let l = lookup();
        assert_eq!(l.resolve(NodeIndex(1)).unwrap(), (NodeClass::U, "vid-b"));
        assert_eq!(l.resolve(NodeIndex(3)).unwrap(), (NodeClass::V, "#graphs"));
    }

    #[test]
    fn test_resolve_past_end() {
        let l = lookup();
        assert!(matches!(l.resolve(NodeIndex(5)), Err(Error::NotFound(_))));
    }

    #[test]
    fn test_find_is_class_scoped() {
        let l = NodeLookup::new(vec!["x".into()], vec!["x".into()]).unwrap();
        assert_eq!(l.find(NodeClass::U, "x"), Some(NodeIndex(0)));
        assert_eq!(l.find(NodeClass::V, "x"), Some(NodeIndex(1)));
        assert_eq!(l.find(NodeClass::V, "y"), None);
    }

    #[test]
    fn test_empty() {
        let l = NodeLookup::default();
        assert!(l.is_empty());
        assert_eq!(l.class_of(NodeIndex(0)), NodeClass::V);
        assert!(l.resolve(NodeIndex(0)).is_err());
    }
}
