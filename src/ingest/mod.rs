// src/ingest/mod.rs
pub mod http;
pub mod providers;
pub mod types;

use std::collections::HashSet;

use metrics::{counter, describe_counter, describe_gauge, describe_histogram, histogram};
use once_cell::sync::OnceCell;
use tracing::{info, warn};

use crate::ingest::types::{FetchWindow, RawEvent, Source, SourceAdapter};

/// One-time metrics registration (so series show up in the textfile dump).
pub(crate) fn ensure_metrics_described() {
    static ONCE: OnceCell<()> = OnceCell::new();
    ONCE.get_or_init(|| {
        describe_counter!("ingest_events_total", "Raw events kept per source after dedup.");
        describe_counter!(
            "ingest_dedup_total",
            "Records dropped as repeats of an upstream id within one adapter."
        );
        describe_counter!(
            "ingest_provider_errors_total",
            "Adapter fetch/parse failures (calls contributing zero events)."
        );
        describe_counter!("ingest_untitled_total", "Raw events without a usable title.");
        describe_histogram!("ingest_fetch_ms", "Adapter fetch time in milliseconds.");
        describe_gauge!("pipeline_feature_rows", "Rows in the last scored feature table.");
    });
}

/// Normalize a title: decode entities, strip tags, ASCII quotes, collapse whitespace.
pub fn normalize_title(s: &str) -> String {
    // 1) HTML entity decode
    let mut out = html_escape::decode_html_entities(s).to_string();

    // 2) Strip HTML tags
    static RE_TAGS: OnceCell<regex::Regex> = OnceCell::new();
    let re_tags = RE_TAGS.get_or_init(|| regex::Regex::new(r"(?is)</?[^>]+>").unwrap());
    out = re_tags.replace_all(&out, "").to_string();

    // 3) Normalize “ ” ‘ ’ « » to ASCII quotes
    out = out
        .replace(['\u{201C}', '\u{201D}', '\u{00AB}', '\u{00BB}'], "\"")
        .replace(['\u{2018}', '\u{2019}'], "'");

    // 4) Collapse whitespace
    static RE_WS: OnceCell<regex::Regex> = OnceCell::new();
    let re_ws = RE_WS.get_or_init(|| regex::Regex::new(r"\s+").unwrap());
    out = re_ws.replace_all(&out, " ").trim().to_string();

    // 5) Length cap: 1500 chars
    if out.chars().count() > 1500 {
        out = out.chars().take(1500).collect();
    }

    out
}

/// Keep the first occurrence of every upstream id; records without an id are kept.
/// Returns (kept, dropped_count).
pub fn dedup_by_id(events: Vec<RawEvent>) -> (Vec<RawEvent>, usize) {
    let mut seen: HashSet<String> = HashSet::new();
    let mut keep = Vec::with_capacity(events.len());
    let mut dropped = 0usize;
    for ev in events {
        if let Some(id) = ev.id.as_deref().map(str::trim).filter(|s| !s.is_empty()) {
            if !seen.insert(id.to_string()) {
                dropped += 1;
                continue;
            }
        }
        keep.push(ev);
    }
    (keep, dropped)
}

/// Output of one adapter call after dedup and title normalization.
#[derive(Debug, Clone, PartialEq)]
pub struct SourceBatch {
    pub source: Source,
    pub events: Vec<RawEvent>,
}

/// Fetch from every adapter in turn. A failing adapter is logged and
/// contributes no batch; the others still count. Titles are normalized and
/// repeats within one adapter are merged (first occurrence wins).
pub async fn collect_batches(
    adapters: &[Box<dyn SourceAdapter>],
    keywords: &[String],
    window: FetchWindow,
) -> Vec<SourceBatch> {
    ensure_metrics_described();

    let mut batches = Vec::with_capacity(adapters.len());
    for adapter in adapters {
        let name = adapter.name();
        let t0 = std::time::Instant::now();
        let res = adapter.fetch(keywords, window).await;
        histogram!("ingest_fetch_ms", "source" => name).record(t0.elapsed().as_secs_f64() * 1_000.0);

        let raw = match res {
            Ok(v) => v,
            Err(e) => {
                warn!(error = %e, source = name, "adapter fetch failed; treating as zero events");
                counter!("ingest_provider_errors_total", "source" => name).increment(1);
                continue;
            }
        };

        let (mut kept, dropped) = dedup_by_id(raw);
        let mut untitled = 0u64;
        for ev in kept.iter_mut() {
            ev.title = ev.title.as_deref().map(normalize_title).filter(|t| !t.is_empty());
            if ev.title.is_none() {
                untitled += 1;
            }
        }

        counter!("ingest_events_total", "source" => name).increment(kept.len() as u64);
        counter!("ingest_dedup_total", "source" => name).increment(dropped as u64);
        counter!("ingest_untitled_total").increment(untitled);
        info!(source = name, kept = kept.len(), dedup = dropped, untitled, "adapter done");

        batches.push(SourceBatch {
            source: adapter.source(),
            events: kept,
        });
    }
    batches
}

/// `collect_batches` flattened into one event list.
pub async fn collect_events(
    adapters: &[Box<dyn SourceAdapter>],
    keywords: &[String],
    window: FetchWindow,
) -> Vec<RawEvent> {
    collect_batches(adapters, keywords, window)
        .await
        .into_iter()
        .flat_map(|b| b.events)
        .collect()
}
