// src/ingest/types.rs
use std::fmt;

use chrono::{Days, NaiveDate};

use crate::error::SourceFetchError;

/// Upstream feed a record came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, serde::Serialize, serde::Deserialize)]
pub enum Source {
    /// Federal Register documents.
    #[serde(rename = "FR")]
    FederalRegister,
    /// OIRA regulatory review queue.
    #[serde(rename = "OIRA")]
    Oira,
    /// Unified Agenda of regulatory actions.
    #[serde(rename = "UA")]
    UnifiedAgenda,
    /// White House presidential actions and statements.
    #[serde(rename = "WH")]
    WhiteHouse,
}

impl Source {
    pub const ALL: [Source; 4] = [
        Source::FederalRegister,
        Source::Oira,
        Source::UnifiedAgenda,
        Source::WhiteHouse,
    ];

    /// Short tag used in tables and metrics labels.
    pub fn code(self) -> &'static str {
        match self {
            Source::FederalRegister => "FR",
            Source::Oira => "OIRA",
            Source::UnifiedAgenda => "UA",
            Source::WhiteHouse => "WH",
        }
    }

    pub fn from_code(s: &str) -> Option<Self> {
        Self::ALL
            .into_iter()
            .find(|src| src.code().eq_ignore_ascii_case(s.trim()))
    }

    /// Agency label used when a record carries none.
    pub fn fallback_agency(self) -> &'static str {
        match self {
            Source::FederalRegister => "Federal Register",
            Source::Oira => "OIRA",
            Source::UnifiedAgenda => "Unified Agenda",
            Source::WhiteHouse => "White House",
        }
    }

    /// Bit used for per-day distinct-source counting.
    pub(crate) fn bit(self) -> u8 {
        match self {
            Source::FederalRegister => 1,
            Source::Oira => 1 << 1,
            Source::UnifiedAgenda => 1 << 2,
            Source::WhiteHouse => 1 << 3,
        }
    }
}

impl fmt::Display for Source {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

/// One dated, titled record from an adapter, in the common shape.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct RawEvent {
    pub source: Source,
    /// Upstream identifier (document number, RIN, ...) used for dedup.
    pub id: Option<String>,
    pub title: Option<String>,
    pub date: NaiveDate,
    pub agency: Option<String>,
    /// Document type or regulatory stage, when the feed has one.
    pub kind: Option<String>,
    pub url: Option<String>,
}

impl RawEvent {
    pub fn new(source: Source, date: NaiveDate, title: impl Into<String>) -> Self {
        Self {
            source,
            id: None,
            title: Some(title.into()),
            date,
            agency: None,
            kind: None,
            url: None,
        }
    }

    pub fn with_id(mut self, id: impl Into<String>) -> Self {
        self.id = Some(id.into());
        self
    }

    pub fn with_agency(mut self, agency: impl Into<String>) -> Self {
        self.agency = Some(agency.into());
        self
    }

    pub fn title_str(&self) -> &str {
        self.title.as_deref().unwrap_or_default()
    }
}

/// `(date, topic, source)`: one raw event flattened per matched topic.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, serde::Serialize)]
pub struct LabeledEvent {
    pub date: NaiveDate,
    pub topic: String,
    pub source: Source,
}

/// The trailing day window `[as_of - days, as_of]`, inclusive on both ends.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FetchWindow {
    pub as_of: NaiveDate,
    pub days: u32,
}

impl FetchWindow {
    pub fn new(as_of: NaiveDate, days: u32) -> Self {
        Self { as_of, days }
    }

    pub fn start(&self) -> NaiveDate {
        self.as_of
            .checked_sub_days(Days::new(u64::from(self.days)))
            .unwrap_or(NaiveDate::MIN)
    }

    pub fn contains(&self, d: NaiveDate) -> bool {
        d >= self.start() && d <= self.as_of
    }

    /// Every calendar day of the window, oldest first.
    pub fn dates(&self) -> impl Iterator<Item = NaiveDate> {
        let n = (self.as_of - self.start()).num_days().max(0) as usize + 1;
        self.start().iter_days().take(n)
    }
}

/// Capability every source adapter provides.
///
/// A failure of one keyword/page inside `fetch` should be logged and skipped
/// by the adapter itself; returning `Err` means the whole call produced
/// nothing. Either way the caller carries on.
#[async_trait::async_trait]
pub trait SourceAdapter: Send + Sync {
    async fn fetch(
        &self,
        keywords: &[String],
        window: FetchWindow,
    ) -> Result<Vec<RawEvent>, SourceFetchError>;

    fn source(&self) -> Source;

    fn name(&self) -> &'static str {
        self.source().code()
    }
}
