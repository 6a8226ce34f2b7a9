//! Ranked reporting of walk results.
//!
//! Resolves a [`VisitHistogram`] through a [`NodeLookup`] and renders it,
//! most-visited first.
//!
//! ```text
//! VisitHistogram → ranked() → Vec<RankedVisit> → write_ranked() / to_json()
//! ```

use std::io::Write;

use serde::{Deserialize, Serialize};

use crate::index::NodeLookup;
use crate::model::{NodeClass, NodeIndex, VisitHistogram};
use crate::Result;

/// One resolved histogram entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RankedVisit {
    pub index: NodeIndex,
    pub class: NodeClass,
    pub label: String,
    pub count: u64,
}

/// Resolve and rank, keeping at most `limit` entries (`None` keeps all).
///
/// Order: count descending, then index ascending. Fails if an index has no
/// label in `lookup`.
pub fn ranked(
    histogram: &VisitHistogram,
    lookup: &NodeLookup,
    limit: Option<usize>,
) -> Result<Vec<RankedVisit>> {
    let entries = histogram.ranked();
    let take = limit.unwrap_or(entries.len());
    entries
        .into_iter()
        .take(take)
        .map(|(index, count)| -> Result<RankedVisit> {
            let (class, label) = lookup.resolve(index)?;
            Ok(RankedVisit { index, class, label: label.to_string(), count })
        })
        .collect()
}

/// Write one tab-separated line per entry: `index class label count`.
pub fn write_ranked(
    histogram: &VisitHistogram,
    lookup: &NodeLookup,
    limit: Option<usize>,
    writer: &mut dyn Write,
) -> Result<()> {
    for visit in ranked(histogram, lookup, limit)? {
        writeln!(
            writer,
            "{}\t{}\t{}\t{}",
            visit.index, visit.class, visit.label, visit.count
        )?;
    }
    Ok(())
}

/// Render the ranked entries as a JSON array.
pub fn to_json(
    histogram: &VisitHistogram,
    lookup: &NodeLookup,
    limit: Option<usize>,
) -> Result<String> {
    Ok(serde_json::to_string(&ranked(histogram, lookup, limit)?)?)
}
