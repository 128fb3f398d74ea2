// tests/ingest_adapters.rs
use async_trait::async_trait;
use chrono::NaiveDate;
use paper_momentum::ingest::{collect_batches, collect_events};
use paper_momentum::{FetchWindow, RawEvent, Source, SourceAdapter, SourceFetchError};
use std::sync::atomic::{AtomicUsize, Ordering};

struct Failing {
    calls: AtomicUsize,
}

#[async_trait]
impl SourceAdapter for Failing {
    async fn fetch(&self, _k: &[String], _w: FetchWindow) -> Result<Vec<RawEvent>, SourceFetchError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Err(SourceFetchError::Parse("timed out".into()))
    }
    fn source(&self) -> Source {
        Source::Oira
    }
}

struct Fixed(Vec<RawEvent>);

#[async_trait]
impl SourceAdapter for Fixed {
    async fn fetch(&self, _k: &[String], _w: FetchWindow) -> Result<Vec<RawEvent>, SourceFetchError> {
        Ok(self.0.clone())
    }
    fn source(&self) -> Source {
        Source::FederalRegister
    }
}

fn d() -> NaiveDate {
    NaiveDate::from_ymd_opt(2025, 7, 4).unwrap()
}

fn window() -> FetchWindow {
    FetchWindow::new(d(), 30)
}

#[tokio::test]
async fn failing_adapter_does_not_abort_the_run() {
    let adapters: Vec<Box<dyn SourceAdapter>> = vec![
        Box::new(Failing {
            calls: AtomicUsize::new(0),
        }),
        Box::new(Fixed(vec![RawEvent::new(Source::FederalRegister, d(), "Grid order")])),
    ];
    let batches = collect_batches(&adapters, &["grid".to_string()], window()).await;
    assert_eq!(batches.len(), 1);
    assert_eq!(batches[0].source, Source::FederalRegister);
    assert_eq!(batches[0].events.len(), 1);
}

#[tokio::test]
async fn repeats_merge_and_titles_are_normalized() {
    let adapters: Vec<Box<dyn SourceAdapter>> = vec![Box::new(Fixed(vec![
        RawEvent::new(Source::FederalRegister, d(), "  Grid&amp;Transmission\n  <i>Order</i> ").with_id("A"),
        RawEvent::new(Source::FederalRegister, d(), "Grid & Transmission Order (corrected)").with_id("A"),
        RawEvent::new(Source::FederalRegister, d(), "   ").with_id("B"),
    ]))];
    let events = collect_events(&adapters, &[], window()).await;
    assert_eq!(events.len(), 2);
    assert_eq!(events[0].title.as_deref(), Some("Grid&Transmission Order"));
    // blank titles survive ingest as untitled; the labeler drops them
    assert_eq!(events[1].title, None);
}

#[tokio::test]
async fn no_adapters_no_events() {
    assert!(collect_events(&[], &[], window()).await.is_empty());
}
