// src/ingest/providers/unified_agenda.rs
use async_trait::async_trait;
use quick_xml::events::Event;
use quick_xml::Reader;
use scraper::Html;
use tracing::warn;

use super::selector;
use crate::error::SourceFetchError;
use crate::ingest::http::HttpFetcher;
use crate::ingest::types::{FetchWindow, RawEvent, Source, SourceAdapter};

pub const UA_INDEX_URL: &str = "https://www.reginfo.gov/public/do/eAgendaXmlReport";
pub const REGINFO_BASE: &str = "https://www.reginfo.gov";

/// Unified Agenda XML reports. Records carry no date and are stamped with the
/// window's `as_of` day.
pub struct UnifiedAgendaProvider {
    mode: Mode,
}

enum Mode {
    /// Pre-captured XML documents.
    Fixture(Vec<String>),
    Http {
        fetcher: HttpFetcher,
        max_documents: usize,
    },
}

#[derive(Debug, Default)]
struct Record {
    rin: Option<String>,
    title: Option<String>,
    agency: Option<String>,
    stage: Option<String>,
}

impl UnifiedAgendaProvider {
    pub fn from_fixture_docs<I, S>(docs: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            mode: Mode::Fixture(docs.into_iter().map(Into::into).collect()),
        }
    }

    pub fn from_http(fetcher: HttpFetcher, max_documents: usize) -> Self {
        Self {
            mode: Mode::Http {
                fetcher,
                max_documents,
            },
        }
    }

    /// First `limit` links ending in `.xml`, made absolute.
    pub(crate) fn xml_links(index_html: &str, limit: usize) -> Vec<String> {
        let doc = Html::parse_document(index_html);
        let sel_a = selector("a[href]");
        doc.select(&sel_a)
            .filter_map(|a| a.value().attr("href"))
            .map(str::trim)
            .filter(|h| h.to_ascii_lowercase().ends_with(".xml"))
            .take(limit)
            .map(|h| {
                if h.starts_with("http") {
                    h.to_string()
                } else if h.starts_with('/') {
                    format!("{REGINFO_BASE}{h}")
                } else {
                    format!("{REGINFO_BASE}/{h}")
                }
            })
            .collect()
    }

    /// Stream `RIN_INFO` records out of one agenda document.
    pub(crate) fn parse_agenda_xml(xml: &str, window: FetchWindow) -> Result<Vec<RawEvent>, SourceFetchError> {
        let mut reader = Reader::from_str(xml);
        reader.config_mut().trim_text(true);

        let mut path: Vec<String> = Vec::new();
        let mut current: Option<Record> = None;
        let mut out = Vec::new();

        loop {
            match reader.read_event()? {
                Event::Start(e) => {
                    let name = String::from_utf8_lossy(e.name().as_ref()).to_ascii_uppercase();
                    if name == "RIN_INFO" {
                        current = Some(Record::default());
                    }
                    path.push(name);
                }
                Event::End(_) => {
                    if path.pop().as_deref() == Some("RIN_INFO") {
                        if let Some(rec) = current.take() {
                            if let Some(ev) = rec.into_event(window) {
                                out.push(ev);
                            }
                        }
                    }
                }
                Event::Text(t) => {
                    let text = t.unescape()?.into_owned();
                    Self::assign(&mut current, &path, text);
                }
                Event::CData(c) => {
                    let text = String::from_utf8_lossy(&c.into_inner()).into_owned();
                    Self::assign(&mut current, &path, text);
                }
                Event::Eof => break,
                _ => {}
            }
        }
        Ok(out)
    }

    fn assign(current: &mut Option<Record>, path: &[String], text: String) {
        let Some(rec) = current.as_mut() else {
            return;
        };
        let text = text.trim().to_string();
        if text.is_empty() {
            return;
        }
        let leaf = path.last().map(String::as_str).unwrap_or_default();
        let parent = path
            .len()
            .checked_sub(2)
            .and_then(|i| path.get(i))
            .map(String::as_str)
            .unwrap_or_default();

        match (parent, leaf) {
            ("RIN_INFO", "RIN") => rec.rin = Some(text),
            ("RIN_INFO", "RULE_TITLE" | "TITLE") => rec.title = Some(text),
            ("AGENCY", "NAME") | ("RIN_INFO", "AGENCY") if rec.agency.is_none() => {
                rec.agency = Some(text)
            }
            ("RIN_INFO", "RULE_STAGE" | "STAGE") => rec.stage = Some(text),
            _ => {}
        }
    }
}

impl Record {
    fn into_event(self, window: FetchWindow) -> Option<RawEvent> {
        if self.title.is_none() && self.rin.is_none() {
            return None;
        }
        Some(RawEvent {
            source: Source::UnifiedAgenda,
            id: self.rin,
            title: self.title,
            date: window.as_of,
            agency: self.agency,
            kind: self.stage,
            url: None,
        })
    }
}

#[async_trait]
impl SourceAdapter for UnifiedAgendaProvider {
    async fn fetch(
        &self,
        _keywords: &[String],
        window: FetchWindow,
    ) -> Result<Vec<RawEvent>, SourceFetchError> {
        match &self.mode {
            Mode::Fixture(docs) => {
                let mut out = Vec::new();
                for (i, xml) in docs.iter().enumerate() {
                    match Self::parse_agenda_xml(xml, window) {
                        Ok(mut v) => out.append(&mut v),
                        Err(e) => warn!(error = %e, source = "UA", document = i, "UA document skipped"),
                    }
                }
                Ok(out)
            }
            Mode::Http {
                fetcher,
                max_documents,
            } => {
                let index = fetcher.get_text(UA_INDEX_URL).await?;
                let links = Self::xml_links(&index, *max_documents);
                let mut out = Vec::new();
                for link in links {
                    fetcher.pace().await;
                    let res = match fetcher.get_text(&link).await {
                        Ok(xml) => Self::parse_agenda_xml(&xml, window),
                        Err(e) => Err(e),
                    };
                    match res {
                        Ok(mut v) => out.append(&mut v),
                        Err(e) => {
                            warn!(error = %e, source = "UA", url = %link, "UA subfetch failed");
                            metrics::counter!("ingest_provider_errors_total", "source" => "UA")
                                .increment(1);
                        }
                    }
                }
                Ok(out)
            }
        }
    }

    fn source(&self) -> Source {
        Source::UnifiedAgenda
    }
}
