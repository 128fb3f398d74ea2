// tests/telemetry_textfile.rs
// Own test binary: installs the global metrics recorder.
use async_trait::async_trait;
use chrono::NaiveDate;
use paper_momentum::pipeline::{run, PipelineOptions};
use paper_momentum::telemetry::Metrics;
use paper_momentum::{FetchWindow, Lexicon, RawEvent, Source, SourceAdapter, SourceFetchError};

struct One;

#[async_trait]
impl SourceAdapter for One {
    async fn fetch(&self, _k: &[String], _w: FetchWindow) -> Result<Vec<RawEvent>, SourceFetchError> {
        let d = NaiveDate::from_ymd_opt(2025, 2, 2).unwrap();
        Ok(vec![RawEvent::new(Source::WhiteHouse, d, "Grid Policy Announcement")])
    }
    fn source(&self) -> Source {
        Source::WhiteHouse
    }
}

#[tokio::test]
async fn run_metrics_land_in_textfile() {
    let metrics = Metrics::install().expect("recorder");

    let lex = Lexicon::from_pairs([("grid", vec!["grid"])]);
    let adapters: Vec<Box<dyn SourceAdapter>> = vec![Box::new(One)];
    let opts = PipelineOptions {
        as_of: NaiveDate::from_ymd_opt(2025, 2, 2).unwrap(),
        days: 3,
    };
    let out = run(&lex, &adapters, opts).await;
    assert_eq!(out.features.len(), 4);

    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("metrics").join("paper_momentum.prom");
    metrics.write_textfile(&path).unwrap();
    let text = std::fs::read_to_string(&path).unwrap();
    assert!(text.contains("ingest_events_total"), "{text}");
    assert!(text.contains("pipeline_feature_rows 4"), "{text}");
}
