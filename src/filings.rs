// src/filings.rs
//! Flat regulatory-filings export.
//!
//! Runs next to the momentum table over the same raw events, but filters by
//! agency and counts keyword hits with boundary-aware matching instead of
//! the labeler's loose substring test.

use std::collections::{BTreeSet, HashSet};
use std::io::{self, Write};

use chrono::{Datelike, NaiveDate};
use once_cell::sync::OnceCell;
use regex::Regex;
use tracing::info;

use crate::ingest::types::{RawEvent, Source};
use crate::matching::BoundaryKeywordSet;
use crate::table::write_row;

pub const DEFAULT_AGENCY_PATTERN: &str = "Department of Energy|Energy Department|DOE|ARPA-E|Loan Programs Office|Office of Electricity|Fossil Energy and Carbon Management|EERE";

/// Cap on the unmatched-agency sample kept for `--debug`.
pub const UNMATCHED_SAMPLE: usize = 15;

fn normalize_agency(s: &str) -> String {
    static RE_WS: OnceCell<Regex> = OnceCell::new();
    let re_ws = RE_WS.get_or_init(|| Regex::new(r"\s+").unwrap());
    let lowered: String = s
        .to_lowercase()
        .chars()
        .map(|c| if c.is_ascii_punctuation() { ' ' } else { c })
        .collect();
    re_ws.replace_all(&lowered, " ").trim().to_string()
}

/// Pipe-separated agency terms, matched as normalized substrings.
#[derive(Debug, Clone, Default)]
pub struct AgencyMatcher {
    terms: Vec<String>,
}

impl AgencyMatcher {
    /// An empty pattern (or one made only of separators) matches everything.
    pub fn parse(pattern: &str) -> Self {
        let terms = pattern
            .split('|')
            .filter(|t| !t.trim().is_empty())
            .map(normalize_agency)
            .filter(|t| !t.is_empty())
            .collect();
        Self { terms }
    }

    pub fn matches(&self, agency: &str) -> bool {
        if self.terms.is_empty() {
            return true;
        }
        let a = normalize_agency(agency);
        self.terms.iter().any(|t| a.contains(t.as_str()))
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct FilingRow {
    pub date: NaiveDate,
    pub agency: String,
    pub filing_title: String,
    pub keyword_count: usize,
}

#[derive(Debug, Clone, Default)]
pub struct FilingsExport {
    pub rows: Vec<FilingRow>,
    /// Sorted, distinct, non-empty agency strings that failed the matcher.
    pub unmatched: Vec<String>,
}

/// Filter, count, dedup and sort raw events into filing rows.
pub fn build_filings(events: &[RawEvent], keywords: &[String], matcher: &AgencyMatcher) -> FilingsExport {
    let kw = BoundaryKeywordSet::new(keywords);
    let mut unmatched: BTreeSet<String> = BTreeSet::new();
    let mut seen: HashSet<FilingRow> = HashSet::new();
    let mut rows = Vec::new();

    for ev in events {
        let full = ev.agency.as_deref().unwrap_or_default().trim();
        let agency = match ev.source {
            Source::FederalRegister => {
                let primary = full.split(',').next().unwrap_or_default().trim();
                if !matcher.matches(primary) && !matcher.matches(full) {
                    if !full.is_empty() {
                        unmatched.insert(full.to_string());
                    }
                    continue;
                }
                if primary.is_empty() { full } else { primary }
            }
            _ => {
                if !matcher.matches(full) {
                    if !full.is_empty() {
                        unmatched.insert(full.to_string());
                    }
                    continue;
                }
                full
            }
        };

        let title = ev.title_str().trim();
        if title.is_empty() {
            continue;
        }
        let agency = if agency.is_empty() {
            ev.source.fallback_agency()
        } else {
            agency
        };

        let row = FilingRow {
            date: ev.date,
            agency: agency.to_string(),
            filing_title: title.to_string(),
            keyword_count: kw.count_unique_hits(title),
        };
        if seen.insert(row.clone()) {
            rows.push(row);
        }
    }

    rows.sort_by(|a, b| a.date.cmp(&b.date).then_with(|| a.agency.cmp(&b.agency)));
    info!(rows = rows.len(), unmatched = unmatched.len(), "filings assembled");

    FilingsExport {
        rows,
        unmatched: unmatched.into_iter().take(UNMATCHED_SAMPLE).collect(),
    }
}

/// `M/D/YYYY`, no zero padding.
pub fn us_date(d: NaiveDate) -> String {
    format!("{}/{}/{}", d.month(), d.day(), d.year())
}

pub fn write_filings<W: Write>(w: &mut W, rows: &[FilingRow]) -> io::Result<()> {
    write_row(w, &["date", "agency", "filing_title", "keyword_count"])?;
    for r in rows {
        write_row(
            w,
            &[us_date(r.date), r.agency.clone(), r.filing_title.clone(), r.keyword_count.to_string()],
        )?;
    }
    Ok(())
}
