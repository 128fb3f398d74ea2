// src/pipeline.rs
//! # Pipeline
//! Lexicon -> adapters -> labeler -> aggregator -> feature builder -> scorer.
//!
//! Every stage is anchored to an explicit `as_of` date; nothing below the
//! binary reads the wall clock, so a run is a pure function of the lexicon,
//! the adapter outputs and `(as_of, days)`.

use chrono::NaiveDate;
use metrics::gauge;
use tracing::{info, warn};

use crate::aggregate::aggregate;
use crate::features::{build_daily_features, DailyFeatureRow};
use crate::ingest::types::{FetchWindow, LabeledEvent, RawEvent, SourceAdapter};
use crate::ingest::{collect_batches, ensure_metrics_described};
use crate::labeler::Labeler;
use crate::lexicon::Lexicon;
use crate::scoring::score_features;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PipelineOptions {
    pub as_of: NaiveDate,
    pub days: u32,
}

impl PipelineOptions {
    pub fn window(&self) -> FetchWindow {
        FetchWindow::new(self.as_of, self.days)
    }
}

/// Everything a run produced, kept for the optional dumps.
#[derive(Debug, Clone, Default)]
pub struct PipelineRun {
    pub raw: Vec<RawEvent>,
    pub labeled: Vec<LabeledEvent>,
    /// Scored, sorted by `(topic, date)`.
    pub features: Vec<DailyFeatureRow>,
}

impl PipelineRun {
    pub fn is_empty(&self) -> bool {
        self.features.is_empty()
    }
}

/// Pure tail of the pipeline: dense features, then scores.
pub fn score_events(labeled: &[LabeledEvent], window: FetchWindow) -> Vec<DailyFeatureRow> {
    score_features(build_daily_features(labeled, window))
}

/// Fetch, label and score. Adapters run one after another; a failing one
/// contributes nothing. An empty result is a warning, not an error.
pub async fn run(lexicon: &Lexicon, adapters: &[Box<dyn SourceAdapter>], opts: PipelineOptions) -> PipelineRun {
    ensure_metrics_described();
    let window = opts.window();
    let keywords = lexicon.all_keywords();
    info!(
        as_of = %opts.as_of,
        days = opts.days,
        topics = lexicon.len(),
        keywords = keywords.len(),
        adapters = adapters.len(),
        "pipeline start"
    );

    let batches = collect_batches(adapters, &keywords, window).await;

    let labeler = Labeler::default();
    let mut raw = Vec::new();
    let mut parts = Vec::with_capacity(batches.len());
    for batch in batches {
        let labeled = labeler.label_events(&batch.events, lexicon);
        info!(source = %batch.source, events = batch.events.len(), labeled = labeled.len(), "batch labeled");
        parts.push(labeled);
        raw.extend(batch.events);
    }
    let labeled = aggregate(parts);

    let features = score_events(&labeled, window);
    gauge!("pipeline_feature_rows").set(features.len() as f64);

    if features.is_empty() {
        warn!(raw = raw.len(), "no labeled events in window; writing an empty table");
    } else {
        info!(rows = features.len(), labeled = labeled.len(), "pipeline done");
    }

    PipelineRun { raw, labeled, features }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ingest::types::Source;

    #[test]
    fn score_events_is_deterministic() {
        let d0 = NaiveDate::from_ymd_opt(2025, 2, 1).unwrap();
        let ev = |topic: &str, source| LabeledEvent {
            date: d0,
            topic: topic.to_string(),
            source,
        };
        let labeled = vec![ev("grid", Source::FederalRegister), ev("grid", Source::WhiteHouse)];
        let w = FetchWindow::new(d0, 0);
        let a = score_events(&labeled, w);
        let b = score_events(&labeled, w);
        assert_eq!(a, b);
        assert_eq!(a.len(), 1);
        // zero variance on a single day: 15·eo_hits + 5·diversity
        assert_eq!(a[0].score, 25.0);
    }
}
