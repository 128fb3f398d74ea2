// tests/labeler.rs
use chrono::NaiveDate;
use paper_momentum::labeler::{label, label_events, Labeler};
use paper_momentum::matching::{boundary_aware_match, loose_substring_match, MatchStrategy};
use paper_momentum::{Lexicon, RawEvent, Source};

fn lex() -> Lexicon {
    Lexicon::from_pairs([
        ("grid", vec!["transmission", "grid"]),
        ("ai", vec!["ai", "data center"]),
        ("nuclear", vec!["small modular reactor"]),
    ])
}

#[test]
fn loose_matching_is_case_insensitive_substring() {
    let topics = label("New TRANSMISSION corridors", &lex());
    assert_eq!(topics.into_iter().collect::<Vec<_>>(), vec!["grid"]);

    // "ai" hides inside "maintenance": the loose strategy accepts it
    assert!(label("Maintenance of Way", &lex()).contains("ai"));
    assert!(loose_substring_match("maintenance", "ai"));
    assert!(!boundary_aware_match("maintenance", "ai"));
}

#[test]
fn boundary_strategy_is_opt_in() {
    let strict = Labeler::with_strategy(MatchStrategy::BoundaryAware);
    assert_eq!(strict.strategy(), MatchStrategy::BoundaryAware);
    assert!(!strict.label("Maintenance of Way", &lex()).contains("ai"));
    assert!(strict.label("Data-Center Load Growth", &lex()).contains("ai"));
    assert!(strict.label("Licensing Small Modular Reactors", &lex()).contains("nuclear"));
    // loose needs the literal phrase
    assert!(!label("Data-Center Load Growth", &lex()).contains("ai"));
}

#[test]
fn events_explode_per_topic_and_drop_untitled() {
    let d = NaiveDate::from_ymd_opt(2025, 4, 1).unwrap();
    let mut untitled = RawEvent::new(Source::Oira, d, "");
    untitled.title = None;
    let events = vec![
        RawEvent::new(Source::FederalRegister, d, "Grid upgrades for data center campuses"),
        RawEvent::new(Source::WhiteHouse, d, "Unrelated proclamation"),
        RawEvent::new(Source::Oira, d, "   "),
        untitled,
    ];
    let labeled = label_events(&events, &lex());
    let topics: Vec<&str> = labeled.iter().map(|e| e.topic.as_str()).collect();
    assert_eq!(topics, vec!["ai", "grid"]);
    assert!(labeled.iter().all(|e| e.source == Source::FederalRegister && e.date == d));
}
