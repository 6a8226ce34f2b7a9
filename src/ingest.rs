//! Adjacency ingestion from the whitespace text format.
//!
//! One U node per line, followed by the V nodes it links to:
//!
//! ```text
//! video_1 #rust #graphs
//! video_2 #graphs
//! ```
//!
//! U labels are numbered `0..num_u` in first-seen order, V labels
//! `num_u..num_u + num_v` in first-seen order. Every edge is written in both
//! directions and every node gets a row, so the ids are contiguous and equal
//! the compact indices [`CompactGraph::build`](crate::storage::CompactGraph::build)
//! assigns.

use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

use hashbrown::HashMap;
use tracing::info;

use crate::index::NodeLookup;
use crate::model::ExternalId;
use crate::storage::Adjacency;
use crate::Result;

/// Adjacency plus the labels needed to report on it.
#[derive(Debug, Clone)]
pub struct BipartiteInput {
    pub adjacency: Adjacency,
    pub lookup: NodeLookup,
}

/// Read the text format from any buffered reader.
pub fn read_adjacency<R: BufRead>(reader: R) -> Result<BipartiteInput> {
    let mut u_labels: Vec<String> = Vec::new();
    let mut v_labels: Vec<String> = Vec::new();
    let mut u_ids: HashMap<String, usize> = HashMap::new();
    let mut v_ids: HashMap<String, usize> = HashMap::new();
    // (u, v) pairs in local numbering; V ids are shifted once num_u is known.
    let mut edges: Vec<(usize, usize)> = Vec::new();

    for line in reader.lines() {
        let line = line?;
        let mut tokens = line.split_whitespace();
        let Some(u_label) = tokens.next() else {
            continue;
        };

        let u = *u_ids.entry(u_label.to_string()).or_insert_with(|| {
            u_labels.push(u_label.to_string());
            u_labels.len() - 1
        });
        for v_label in tokens {
            let v = *v_ids.entry(v_label.to_string()).or_insert_with(|| {
                v_labels.push(v_label.to_string());
                v_labels.len() - 1
            });
            edges.push((u, v));
        }
    }

    let num_u = u_labels.len();
    let num_nodes = num_u + v_labels.len();
    let mut adjacency: Adjacency = (0..num_nodes)
        .map(|id| (id as ExternalId, Vec::new()))
        .collect();

    for &(u, v) in &edges {
        let u_id = u as ExternalId;
        let v_id = (num_u + v) as ExternalId;
        if let Some(row) = adjacency.get_mut(&u_id) {
            row.push(v_id);
        }
        if let Some(row) = adjacency.get_mut(&v_id) {
            row.push(u_id);
        }
    }

    info!(
        u_nodes = num_u,
        v_nodes = v_labels.len(),
        edges = edges.len(),
        "Read bipartite adjacency"
    );

    let lookup = NodeLookup::new(u_labels, v_labels)?;
    Ok(BipartiteInput { adjacency, lookup })
}

/// Read the text format from a file.
pub fn read_adjacency_file(path: impl AsRef<Path>) -> Result<BipartiteInput> {
    let file = File::open(path.as_ref())?;
    read_adjacency(BufReader::new(file))
}
