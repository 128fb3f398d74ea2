// src/features.rs
//! Daily feature builder.
//!
//! Produces a dense `(topic, date)` table: every topic observed in the
//! labeled events gets exactly one row per day of the window, zero-filled on
//! quiet days. Topics defined in the lexicon but never matched get no rows.

use std::collections::{BTreeSet, HashMap};

use chrono::NaiveDate;

use crate::ingest::types::{FetchWindow, LabeledEvent, Source};
use crate::rolling::RollingSum;

pub const COMMENT_RATE_WINDOW_DAYS: usize = 14;
pub const EO_HITS_WINDOW_DAYS: usize = 45;
pub const UNDER_REVIEW_MAX: u32 = 1;
pub const AGENCY_DIVERSITY_MAX: u32 = 4;

/// One `(topic, date)` cell of the feature table.
#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct DailyFeatureRow {
    pub topic: String,
    pub date: NaiveDate,
    /// FR-sourced events that day.
    pub fr_notice_count: u32,
    /// Trailing 14-day sum of `fr_notice_count`.
    pub comment_rate_14d: u32,
    /// OIRA activity that day, saturated to {0, 1}.
    pub under_review_count: u32,
    /// Reserved; always 0.
    pub econ_significant_flag: u32,
    /// WH-sourced events that day.
    pub wh_hits: u32,
    /// Trailing 45-day sum of `wh_hits`.
    pub eo_hits_45d: u32,
    /// Distinct sources with an event that day, saturated to [0, 4].
    pub agency_diversity: u32,
    /// Filled in by the scorer; 0 until then.
    pub score: f64,
}

#[derive(Debug, Default, Clone, Copy)]
struct DayCounts {
    fr: u32,
    oira: u32,
    wh: u32,
    sources: u8,
}

/// Build the dense, unscored feature table, sorted by `(topic, date)`.
pub fn build_daily_features(events: &[LabeledEvent], window: FetchWindow) -> Vec<DailyFeatureRow> {
    let topics: BTreeSet<&str> = events.iter().map(|e| e.topic.as_str()).collect();
    if topics.is_empty() {
        return Vec::new();
    }

    let mut cells: HashMap<(&str, NaiveDate), DayCounts> = HashMap::new();
    for ev in events {
        if !window.contains(ev.date) {
            continue;
        }
        let c = cells.entry((ev.topic.as_str(), ev.date)).or_default();
        match ev.source {
            Source::FederalRegister => c.fr += 1,
            Source::Oira => c.oira += 1,
            Source::WhiteHouse => c.wh += 1,
            Source::UnifiedAgenda => {}
        }
        c.sources |= ev.source.bit();
    }

    let dates: Vec<NaiveDate> = window.dates().collect();
    let mut out = Vec::with_capacity(topics.len() * dates.len());

    for topic in topics {
        let mut comment_rate = RollingSum::with_window(COMMENT_RATE_WINDOW_DAYS);
        let mut eo_hits = RollingSum::with_window(EO_HITS_WINDOW_DAYS);

        for &date in &dates {
            let c = cells.get(&(topic, date)).copied().unwrap_or_default();
            out.push(DailyFeatureRow {
                topic: topic.to_string(),
                date,
                fr_notice_count: c.fr,
                comment_rate_14d: saturate(comment_rate.push(c.fr)),
                under_review_count: c.oira.min(UNDER_REVIEW_MAX),
                econ_significant_flag: 0,
                wh_hits: c.wh,
                eo_hits_45d: saturate(eo_hits.push(c.wh)),
                agency_diversity: c.sources.count_ones().min(AGENCY_DIVERSITY_MAX),
                score: 0.0,
            });
        }
    }
    out
}

fn saturate(v: u64) -> u32 {
    u32::try_from(v).unwrap_or(u32::MAX)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn d(day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 3, day).unwrap()
    }

    fn ev(day: u32, topic: &str, source: Source) -> LabeledEvent {
        LabeledEvent {
            date: d(day),
            topic: topic.to_string(),
            source,
        }
    }

    #[test]
    fn dense_index_covers_every_topic_and_day() {
        let w = FetchWindow::new(d(10), 4);
        let rows = build_daily_features(
            &[ev(7, "b", Source::FederalRegister), ev(9, "a", Source::WhiteHouse)],
            w,
        );
        assert_eq!(rows.len(), 2 * 5);
        assert_eq!(rows[0].topic, "a");
        assert_eq!(rows[0].date, d(6));
        assert_eq!(rows[9].topic, "b");
        assert_eq!(rows[9].date, d(10));
    }

    #[test]
    fn clipping_and_diversity() {
        let w = FetchWindow::new(d(10), 0);
        let events = vec![
            ev(10, "grid", Source::Oira),
            ev(10, "grid", Source::Oira),
            ev(10, "grid", Source::Oira),
            ev(10, "grid", Source::FederalRegister),
            ev(10, "grid", Source::UnifiedAgenda),
            ev(10, "grid", Source::WhiteHouse),
        ];
        let rows = build_daily_features(&events, w);
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].under_review_count, 1);
        assert_eq!(rows[0].agency_diversity, 4);
        assert_eq!(rows[0].fr_notice_count, 1);
        assert_eq!(rows[0].wh_hits, 1);
        assert_eq!(rows[0].econ_significant_flag, 0);
    }

    #[test]
    fn rolling_sums_follow_the_dense_series() {
        let w = FetchWindow::new(d(20), 19);
        let events = vec![
            ev(1, "grid", Source::FederalRegister),
            ev(2, "grid", Source::FederalRegister),
            ev(2, "grid", Source::WhiteHouse),
        ];
        let rows = build_daily_features(&events, w);
        let on = |day: u32| rows.iter().find(|r| r.date == d(day)).unwrap();
        assert_eq!(on(1).comment_rate_14d, 1);
        assert_eq!(on(2).comment_rate_14d, 2);
        assert_eq!(on(14).comment_rate_14d, 2);
        // day 1 leaves the 14-day window on day 15
        assert_eq!(on(15).comment_rate_14d, 1);
        assert_eq!(on(16).comment_rate_14d, 0);
        assert_eq!(on(20).eo_hits_45d, 1);
    }

    #[test]
    fn events_outside_window_still_define_topics() {
        let w = FetchWindow::new(d(10), 1);
        let rows = build_daily_features(&[ev(1, "old", Source::FederalRegister)], w);
        assert_eq!(rows.len(), 2);
        assert!(rows.iter().all(|r| r.fr_notice_count == 0));
    }
}
