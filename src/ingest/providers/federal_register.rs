// src/ingest/providers/federal_register.rs
use async_trait::async_trait;
use chrono::NaiveDate;
use serde::Deserialize;
use tracing::{debug, warn};

use crate::error::SourceFetchError;
use crate::ingest::http::HttpFetcher;
use crate::ingest::types::{FetchWindow, RawEvent, Source, SourceAdapter};

pub const FEDERAL_REGISTER_API: &str = "https://www.federalregister.gov/api/v1/documents.json";
const PER_PAGE: u32 = 250;

#[derive(Debug, Deserialize)]
struct DocumentsPage {
    #[serde(default)]
    results: Vec<Document>,
}

#[derive(Debug, Deserialize)]
struct Document {
    document_number: Option<String>,
    title: Option<String>,
    #[serde(default)]
    agencies: Option<Vec<Agency>>,
    publication_date: Option<String>,
    #[serde(rename = "type")]
    doc_type: Option<String>,
    html_url: Option<String>,
}

#[derive(Debug, Deserialize)]
struct Agency {
    name: Option<String>,
}

/// Federal Register documents API, queried once per lexicon keyword.
pub struct FederalRegisterProvider {
    mode: Mode,
}

enum Mode {
    /// Pre-captured response body, replayed for every keyword.
    Fixture(String),
    Http(HttpFetcher),
}

impl FederalRegisterProvider {
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

    /// Multi-word keywords are sent as exact phrases.
    fn term_for(keyword: &str) -> String {
        if keyword.contains(' ') {
            format!("\"{keyword}\"")
        } else {
            keyword.to_string()
        }
    }

    fn query_for(keyword: &str, window: FetchWindow) -> Vec<(&'static str, String)> {
        vec![
            ("per_page", PER_PAGE.to_string()),
            ("order", "newest".to_string()),
            (
                "conditions[publication_date][gte]",
                window.start().format("%Y-%m-%d").to_string(),
            ),
            ("conditions[term]", Self::term_for(keyword)),
        ]
    }

    fn parse_page_str(s: &str) -> Result<Vec<RawEvent>, SourceFetchError> {
        let page: DocumentsPage = serde_json::from_str(s)?;
        Ok(Self::events_from_page(page))
    }

    fn events_from_page(page: DocumentsPage) -> Vec<RawEvent> {
        let mut out = Vec::with_capacity(page.results.len());
        for d in page.results {
            let Some(date) = d
                .publication_date
                .as_deref()
                .and_then(|s| NaiveDate::parse_from_str(s.trim(), "%Y-%m-%d").ok())
            else {
                debug!(id = ?d.document_number, "FR document without usable publication_date");
                continue;
            };
            let agencies = d
                .agencies
                .unwrap_or_default()
                .into_iter()
                .filter_map(|a| a.name)
                .filter(|n| !n.trim().is_empty())
                .collect::<Vec<_>>()
                .join(", ");
            out.push(RawEvent {
                source: Source::FederalRegister,
                id: d.document_number,
                title: d.title,
                date,
                agency: (!agencies.is_empty()).then_some(agencies),
                kind: d.doc_type,
                url: d.html_url,
            });
        }
        out
    }
}

#[async_trait]
impl SourceAdapter for FederalRegisterProvider {
    async fn fetch(
        &self,
        keywords: &[String],
        window: FetchWindow,
    ) -> Result<Vec<RawEvent>, SourceFetchError> {
        let mut out = Vec::new();
        for kw in keywords {
            let res = match &self.mode {
                Mode::Fixture(s) => Self::parse_page_str(s),
                Mode::Http(http) => {
                    let r = http
                        .get_json::<DocumentsPage>(FEDERAL_REGISTER_API, &Self::query_for(kw, window))
                        .await
                        .map(Self::events_from_page);
                    http.pace().await;
                    r
                }
            };
            match res {
                Ok(mut v) => out.append(&mut v),
                Err(e) => {
                    warn!(error = %e, source = "FR", keyword = %kw, "FR fetch failed for keyword");
                    metrics::counter!("ingest_provider_errors_total", "source" => "FR").increment(1);
                }
            }
        }
        Ok(out)
    }

    fn source(&self) -> Source {
        Source::FederalRegister
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn phrases_are_quoted() {
        assert_eq!(FederalRegisterProvider::term_for("grid"), "grid");
        assert_eq!(
            FederalRegisterProvider::term_for("data center"),
            "\"data center\""
        );
    }

    #[test]
    fn query_uses_window_start() {
        let w = FetchWindow::new(NaiveDate::from_ymd_opt(2025, 1, 31).unwrap(), 30);
        let q = FederalRegisterProvider::query_for("grid", w);
        assert!(q.contains(&("conditions[publication_date][gte]", "2025-01-01".to_string())));
        assert!(q.contains(&("per_page", "250".to_string())));
    }

    #[test]
    fn null_agencies_and_bad_dates() {
        let body = r#"{"results": [
            {"document_number": "A", "title": "T1", "agencies": null, "publication_date": "2025-02-01"},
            {"document_number": "B", "title": "T2", "publication_date": "not a date"}
        ]}"#;
        let ev = FederalRegisterProvider::parse_page_str(body).unwrap();
        assert_eq!(ev.len(), 1);
        assert_eq!(ev[0].agency, None);
        assert_eq!(ev[0].id.as_deref(), Some("A"));
    }
}
