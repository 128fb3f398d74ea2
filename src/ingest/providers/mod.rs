// src/ingest/providers/mod.rs
pub mod federal_register;
pub mod oira;
pub mod unified_agenda;
pub mod white_house;

use chrono::NaiveDate;
use scraper::{ElementRef, Selector};

pub use federal_register::FederalRegisterProvider;
pub use oira::OiraProvider;
pub use unified_agenda::UnifiedAgendaProvider;
pub use white_house::WhiteHouseProvider;

/// Compile a CSS selector known at compile time.
pub(crate) fn selector(css: &'static str) -> Selector {
    Selector::parse(css).expect("static selector")
}

/// Visible text of an element: text nodes trimmed and joined by single spaces.
pub(crate) fn element_text(el: &ElementRef<'_>) -> String {
    el.text()
        .flat_map(str::split_whitespace)
        .collect::<Vec<_>>()
        .join(" ")
}

/// Dates as they appear on reginfo.gov and whitehouse.gov pages.
pub(crate) fn parse_loose_date(s: &str) -> Option<NaiveDate> {
    let s = s.split_whitespace().collect::<Vec<_>>().join(" ");
    // "10/03/2025 12:00:00 AM" -> keep the date part
    let head = s.split(' ').next().unwrap_or_default();
    for (input, fmt) in [
        (head, "%m/%d/%Y"),
        (head, "%Y-%m-%d"),
        (s.as_str(), "%B %d, %Y"),
        (s.as_str(), "%b %d, %Y"),
    ] {
        if let Ok(d) = NaiveDate::parse_from_str(input, fmt) {
            return Some(d);
        }
    }
    None
}
