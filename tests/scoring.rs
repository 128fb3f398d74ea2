// tests/scoring.rs
use chrono::{Days, NaiveDate};
use paper_momentum::features::build_daily_features;
use paper_momentum::scoring::{score_features, score_features_with, zscore, ScoreWeights};
use paper_momentum::{DailyFeatureRow, FetchWindow, LabeledEvent, Source};

fn day(n: u64) -> NaiveDate {
    NaiveDate::from_ymd_opt(2025, 5, 1).unwrap() + Days::new(n)
}

fn row(topic: &str, n: u64, fr: u32, cr: u32) -> DailyFeatureRow {
    DailyFeatureRow {
        topic: topic.to_string(),
        date: day(n),
        fr_notice_count: fr,
        comment_rate_14d: cr,
        under_review_count: 0,
        econ_significant_flag: 0,
        wh_hits: 0,
        eo_hits_45d: 0,
        agency_diversity: 0,
        score: 0.0,
    }
}

#[test]
fn constant_topic_scores_only_raw_terms() {
    // zero variance -> both z terms vanish
    let mut rows = vec![row("flat", 0, 2, 2), row("flat", 1, 2, 2)];
    rows[0].eo_hits_45d = 1;
    rows[0].agency_diversity = 2;
    rows[1].under_review_count = 1;
    let scored = score_features(rows);
    assert_eq!(scored[0].score, 25.0);
    assert_eq!(scored[1].score, 15.0);
}

#[test]
fn standardization_is_per_topic() {
    // "big" has huge counts but the same shape as "small": identical z-scores
    let rows = vec![
        row("small", 0, 0, 0),
        row("big", 0, 100, 100),
        row("small", 1, 2, 2),
        row("big", 1, 300, 300),
    ];
    let scored = score_features(rows);
    assert_eq!(scored[0].score, scored[1].score);
    assert_eq!(scored[2].score, scored[3].score);
    // z = +1 on both terms: 20 + 25
    assert!((scored[2].score - 45.0).abs() < 1e-9);
    assert_eq!(scored[0].score, 0.0);
    // input order preserved
    assert_eq!(scored[1].topic, "big");
}

#[test]
fn custom_weights_are_honored() {
    let mut rows = vec![row("t", 0, 0, 0)];
    rows[0].econ_significant_flag = 1;
    let w = ScoreWeights {
        econ_significant: 50.0,
        ..ScoreWeights::default()
    };
    assert_eq!(score_features_with(rows, &w)[0].score, 50.0);
}

#[test]
fn zscore_matches_population_formula() {
    let z = zscore(&[1.0, 2.0, 3.0, 4.0]);
    let sd = (1.25f64).sqrt();
    assert!((z[0] - (-1.5 / sd)).abs() < 1e-12);
    assert!((z.iter().sum::<f64>()).abs() < 1e-12);
}

#[test]
fn scores_stay_in_bounds_on_built_features() {
    let mut events = Vec::new();
    for n in 0..40u64 {
        if n % 3 == 0 {
            events.push(LabeledEvent {
                date: day(n),
                topic: "grid".into(),
                source: Source::FederalRegister,
            });
        }
        if n % 7 == 0 {
            events.push(LabeledEvent {
                date: day(n),
                topic: "grid".into(),
                source: Source::WhiteHouse,
            });
        }
    }
    let scored = score_features(build_daily_features(&events, FetchWindow::new(day(40), 40)));
    assert_eq!(scored.len(), 41);
    assert!(scored.iter().all(|r| r.score.is_finite() && (0.0..=100.0).contains(&r.score)));
    assert!(scored.iter().any(|r| r.score == 100.0));
}
