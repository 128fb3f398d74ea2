// tests/features_dense.rs
use chrono::{Days, NaiveDate};
use paper_momentum::features::{build_daily_features, AGENCY_DIVERSITY_MAX};
use paper_momentum::{FetchWindow, LabeledEvent, Source};

fn day(n: u64) -> NaiveDate {
    NaiveDate::from_ymd_opt(2025, 1, 1).unwrap() + Days::new(n)
}

fn ev(n: u64, topic: &str, source: Source) -> LabeledEvent {
    LabeledEvent {
        date: day(n),
        topic: topic.to_string(),
        source,
    }
}

#[test]
fn quiet_days_are_zero_filled() {
    let window = FetchWindow::new(day(60), 60);
    let rows = build_daily_features(&[ev(10, "grid", Source::FederalRegister)], window);

    assert_eq!(rows.len(), 61);
    let dates: Vec<NaiveDate> = rows.iter().map(|r| r.date).collect();
    assert_eq!(dates, window.dates().collect::<Vec<_>>());
    let busy: Vec<_> = rows.iter().filter(|r| r.fr_notice_count > 0).collect();
    assert_eq!(busy.len(), 1);
    assert_eq!(busy[0].date, day(10));
    assert!(rows.iter().all(|r| r.score == 0.0));
}

#[test]
fn comment_rate_never_below_daily_count() {
    let window = FetchWindow::new(day(30), 30);
    let mut events = Vec::new();
    for n in [1, 1, 3, 9, 9, 9, 20, 29] {
        events.push(ev(n, "grid", Source::FederalRegister));
    }
    let rows = build_daily_features(&events, window);
    for r in &rows {
        assert!(r.comment_rate_14d >= r.fr_notice_count);
    }
    let on = |n: u64| rows.iter().find(|r| r.date == day(n)).unwrap();
    assert_eq!(on(9).fr_notice_count, 3);
    assert_eq!(on(9).comment_rate_14d, 6);
    // days 1 and 3 have left the window by day 17
    assert_eq!(on(17).comment_rate_14d, 3);
}

#[test]
fn eo_hits_trail_45_days() {
    let window = FetchWindow::new(day(100), 100);
    let rows = build_daily_features(&[ev(0, "grid", Source::WhiteHouse)], window);
    let on = |n: u64| rows.iter().find(|r| r.date == day(n)).unwrap();
    assert_eq!(on(0).wh_hits, 1);
    assert_eq!(on(44).eo_hits_45d, 1);
    assert_eq!(on(45).eo_hits_45d, 0);
}

#[test]
fn same_day_sources_raise_diversity_up_to_cap() {
    let window = FetchWindow::new(day(5), 5);
    let events: Vec<_> = Source::ALL.iter().map(|&s| ev(5, "grid", s)).collect();
    let rows = build_daily_features(&events, window);
    let last = rows.last().unwrap();
    assert_eq!(last.agency_diversity, AGENCY_DIVERSITY_MAX);
    assert_eq!(last.under_review_count, 1);

    // the same source twice counts once
    let rows = build_daily_features(
        &[ev(5, "grid", Source::Oira), ev(5, "grid", Source::Oira)],
        window,
    );
    assert_eq!(rows.last().unwrap().agency_diversity, 1);
}

#[test]
fn topics_are_independent_and_sorted() {
    let window = FetchWindow::new(day(2), 2);
    let rows = build_daily_features(
        &[
            ev(2, "zeta", Source::FederalRegister),
            ev(1, "alpha", Source::FederalRegister),
        ],
        window,
    );
    let keys: Vec<(&str, NaiveDate)> = rows.iter().map(|r| (r.topic.as_str(), r.date)).collect();
    assert_eq!(
        keys,
        vec![
            ("alpha", day(0)),
            ("alpha", day(1)),
            ("alpha", day(2)),
            ("zeta", day(0)),
            ("zeta", day(1)),
            ("zeta", day(2)),
        ]
    );
    assert_eq!(rows[2].comment_rate_14d, 1);
    assert_eq!(rows[5].comment_rate_14d, 1);
    assert_eq!(rows[3].comment_rate_14d, 0);
}

#[test]
fn no_events_no_rows() {
    assert!(build_daily_features(&[], FetchWindow::new(day(0), 365)).is_empty());
}
