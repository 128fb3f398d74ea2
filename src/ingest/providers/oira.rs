// src/ingest/providers/oira.rs
use async_trait::async_trait;
use scraper::Html;

use super::{element_text, parse_loose_date, selector};
use crate::error::SourceFetchError;
use crate::ingest::http::HttpFetcher;
use crate::ingest::types::{FetchWindow, RawEvent, Source, SourceAdapter};

pub const OIRA_REVIEW_URL: &str = "https://www.reginfo.gov/public/do/eoReviewSearch";

/// OIRA "under review" tables scraped from the EO review search page.
pub struct OiraProvider {
    mode: Mode,
}

enum Mode {
    Fixture(String),
    Http(HttpFetcher),
}

/// Column positions of one review table.
#[derive(Debug, Default)]
struct Columns {
    agency: usize,
    received: usize,
    title: Option<usize>,
    rin: Option<usize>,
    stage: Option<usize>,
}

impl Columns {
    fn from_headers(headers: &[String]) -> Option<Self> {
        let exact = |name: &str| headers.iter().position(|h| h == name);
        let containing = |needle: &str| {
            exact(needle).or_else(|| headers.iter().position(|h| h.contains(needle)))
        };
        Some(Self {
            agency: containing("agency")?,
            received: containing("received")?,
            title: exact("title").or_else(|| exact("subject")),
            rin: exact("rin"),
            stage: exact("stage"),
        })
    }
}

impl OiraProvider {
    pub fn from_fixture_str(s: &str) -> Self {
        Self {
            mode: Mode::Fixture(s.to_string()),
        }
    }

    pub fn from_http(fetcher: HttpFetcher) -> Self {
        Self {
            mode: Mode::Http(fetcher),
        }
    }

    /// Read every table whose header mentions both "agency" and "received".
    fn parse_review_tables(html: &str, window: FetchWindow) -> Result<Vec<RawEvent>, SourceFetchError> {
        let doc = Html::parse_document(html);
        let (sel_table, sel_tr, sel_th, sel_td) = (
            selector("table"),
            selector("tr"),
            selector("th"),
            selector("td"),
        );

        let cutoff = window.start();
        let mut matched_tables = 0usize;
        let mut out = Vec::new();

        for table in doc.select(&sel_table) {
            let mut rows = table.select(&sel_tr);
            let Some(headers) = rows.by_ref().find_map(|tr| {
                let hs: Vec<String> = tr
                    .select(&sel_th)
                    .map(|th| element_text(&th).to_lowercase())
                    .collect();
                (!hs.is_empty()).then_some(hs)
            }) else {
                continue;
            };
            let Some(cols) = Columns::from_headers(&headers) else {
                continue;
            };
            matched_tables += 1;

            for tr in rows {
                let cells: Vec<String> = tr.select(&sel_td).map(|td| element_text(&td)).collect();
                if cells.is_empty() {
                    continue;
                }
                let cell = |i: Option<usize>| {
                    i.and_then(|i| cells.get(i))
                        .map(|s| s.trim().to_string())
                        .filter(|s| !s.is_empty())
                };
                let Some(received) = cell(Some(cols.received)).and_then(|s| parse_loose_date(&s))
                else {
                    continue;
                };
                if received < cutoff {
                    continue;
                }
                out.push(RawEvent {
                    source: Source::Oira,
                    id: cell(cols.rin),
                    title: cell(cols.title),
                    date: received,
                    agency: cell(Some(cols.agency)),
                    kind: cell(cols.stage),
                    url: None,
                });
            }
        }

        if matched_tables == 0 {
            return Err(SourceFetchError::Parse(
                "no table with agency/received columns".to_string(),
            ));
        }
        Ok(out)
    }
}

#[async_trait]
impl SourceAdapter for OiraProvider {
    async fn fetch(
        &self,
        _keywords: &[String],
        window: FetchWindow,
    ) -> Result<Vec<RawEvent>, SourceFetchError> {
        match &self.mode {
            Mode::Fixture(s) => Self::parse_review_tables(s, window),
            Mode::Http(http) => {
                let body = http.get_text(OIRA_REVIEW_URL).await?;
                Self::parse_review_tables(&body, window)
            }
        }
    }

    fn source(&self) -> Source {
        Source::Oira
    }
}
