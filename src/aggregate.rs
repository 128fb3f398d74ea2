// src/aggregate.rs
//! Event aggregation: concatenate labeled events from all sources.
//!
//! No cross-source dedup: the same action reported by two feeds stays two
//! events and raises that day's `agency_diversity`.

use crate::ingest::types::LabeledEvent;

pub fn aggregate<I>(parts: I) -> Vec<LabeledEvent>
where
    I: IntoIterator<Item = Vec<LabeledEvent>>,
{
    parts.into_iter().flatten().collect()
}
