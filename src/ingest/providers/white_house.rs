// src/ingest/providers/white_house.rs
use async_trait::async_trait;
use once_cell::sync::OnceCell;
use regex::Regex;
use scraper::Html;
use tracing::warn;

use super::{element_text, parse_loose_date, selector};
use crate::error::SourceFetchError;
use crate::ingest::http::HttpFetcher;
use crate::ingest::types::{FetchWindow, RawEvent, Source, SourceAdapter};

pub const WHITE_HOUSE_PAGES: [&str; 3] = [
    "https://www.whitehouse.gov/presidential-actions/executive-orders/",
    "https://www.whitehouse.gov/briefings-statements/",
    "https://www.whitehouse.gov/presidential-actions/",
];

const MIN_TEXT_CHARS: usize = 20;
const MAX_TITLE_CHARS: usize = 200;
const WH_AGENCY: &str = "White House";

/// Listing pages of presidential actions and statements.
pub struct WhiteHouseProvider {
    mode: Mode,
}

enum Mode {
    /// `(page_url, html)` pairs.
    Fixture(Vec<(String, String)>),
    Http(HttpFetcher),
}

impl WhiteHouseProvider {
    pub fn from_fixture_pages<I, U, S>(pages: I) -> Self
    where
        I: IntoIterator<Item = (U, S)>,
        U: Into<String>,
        S: Into<String>,
    {
        Self {
            mode: Mode::Fixture(
                pages
                    .into_iter()
                    .map(|(u, s)| (u.into(), s.into()))
                    .collect(),
            ),
        }
    }

    pub fn from_http(fetcher: HttpFetcher) -> Self {
        Self {
            mode: Mode::Http(fetcher),
        }
    }

    /// Every article/li/div/a whose text carries a "Month D, YYYY" date inside
    /// the window becomes a record. Nested elements repeating the same text
    /// share an id and collapse in the driver's dedup.
    pub(crate) fn parse_listing(html: &str, page_url: &str, window: FetchWindow) -> Vec<RawEvent> {
        static RE_DATE: OnceCell<Regex> = OnceCell::new();
        let re_date = RE_DATE.get_or_init(|| {
            Regex::new(
                r"(January|February|March|April|May|June|July|August|September|October|November|December)\s+\d{1,2},\s+\d{4}",
            )
            .unwrap()
        });

        let doc = Html::parse_document(html);
        let sel = selector("article, li, div, a");
        let cutoff = window.start();
        let mut out = Vec::new();

        for el in doc.select(&sel) {
            let text = element_text(&el);
            if text.chars().count() < MIN_TEXT_CHARS {
                continue;
            }
            let Some(date) = re_date
                .find(&text)
                .and_then(|m| parse_loose_date(m.as_str()))
            else {
                continue;
            };
            if date < cutoff {
                continue;
            }
            let title: String = text.chars().take(MAX_TITLE_CHARS).collect();
            let url = el
                .value()
                .attr("href")
                .filter(|h| h.starts_with("http"))
                .unwrap_or(page_url)
                .to_string();
            out.push(RawEvent {
                source: Source::WhiteHouse,
                id: Some(format!("{date}|{title}")),
                title: Some(title),
                date,
                agency: Some(WH_AGENCY.to_string()),
                kind: None,
                url: Some(url),
            });
        }
        out
    }
}

#[async_trait]
impl SourceAdapter for WhiteHouseProvider {
    async fn fetch(
        &self,
        _keywords: &[String],
        window: FetchWindow,
    ) -> Result<Vec<RawEvent>, SourceFetchError> {
        let mut out = Vec::new();
        match &self.mode {
            Mode::Fixture(pages) => {
                for (url, html) in pages {
                    out.extend(Self::parse_listing(html, url, window));
                }
            }
            Mode::Http(http) => {
                for url in WHITE_HOUSE_PAGES {
                    match http.get_text(url).await {
                        Ok(html) => out.extend(Self::parse_listing(&html, url, window)),
                        Err(e) => {
                            warn!(error = %e, source = "WH", url, "WhiteHouse scrape failed");
                            metrics::counter!("ingest_provider_errors_total", "source" => "WH")
                                .increment(1);
                        }
                    }
                    http.pace().await;
                }
            }
        }
        Ok(out)
    }

    fn source(&self) -> Source {
        Source::WhiteHouse
    }
}
