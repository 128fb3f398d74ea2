// src/labeler.rs
//! Topic labeling: which lexicon topics does a title belong to?
//!
//! The labeler uses `MatchStrategy::LooseSubstring` by default. A title that
//! matches several topics yields one labeled event per topic.

use std::collections::BTreeSet;

use crate::ingest::types::{LabeledEvent, RawEvent};
use crate::lexicon::Lexicon;
use crate::matching::MatchStrategy;

/// Topics whose keywords appear in `title` (loose substring, case-insensitive).
pub fn label(title: &str, lexicon: &Lexicon) -> BTreeSet<String> {
    Labeler::default().label(title, lexicon)
}

#[derive(Debug, Clone, Copy, Default)]
pub struct Labeler {
    strategy: MatchStrategy,
}

impl Labeler {
    pub fn with_strategy(strategy: MatchStrategy) -> Self {
        Self { strategy }
    }

    pub fn strategy(&self) -> MatchStrategy {
        self.strategy
    }

    pub fn label(&self, title: &str, lexicon: &Lexicon) -> BTreeSet<String> {
        let t = title.trim().to_lowercase();
        if t.is_empty() {
            return BTreeSet::new();
        }
        lexicon
            .iter()
            .filter(|(_, kws)| kws.iter().any(|kw| self.strategy.matches(&t, kw)))
            .map(|(topic, _)| topic.to_string())
            .collect()
    }

    /// Flatten raw events into `(date, topic, source)` tuples. Events with a
    /// missing/empty title or no matching topic are dropped.
    pub fn label_events(&self, events: &[RawEvent], lexicon: &Lexicon) -> Vec<LabeledEvent> {
        let mut out = Vec::new();
        for ev in events {
            let Some(title) = ev.title.as_deref().filter(|t| !t.trim().is_empty()) else {
                continue;
            };
            for topic in self.label(title, lexicon) {
                out.push(LabeledEvent {
                    date: ev.date,
                    topic,
                    source: ev.source,
                });
            }
        }
        out
    }
}

/// `Labeler::default().label_events(..)`.
pub fn label_events(events: &[RawEvent], lexicon: &Lexicon) -> Vec<LabeledEvent> {
    Labeler::default().label_events(events, lexicon)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ingest::types::Source;
    use chrono::NaiveDate;

    fn lex() -> Lexicon {
        Lexicon::from_pairs([
            ("grid", vec!["transmission", "grid"]),
            ("nuclear", vec!["reactor", "nuclear"]),
        ])
    }

    #[test]
    fn multi_topic_title_yields_one_event_per_topic() {
        let d = NaiveDate::from_ymd_opt(2025, 6, 1).unwrap();
        let events = vec![
            RawEvent::new(Source::FederalRegister, d, "Nuclear Reactor Grid Interconnection"),
            RawEvent::new(Source::WhiteHouse, d, "Unrelated proclamation"),
            RawEvent {
                title: None,
                ..RawEvent::new(Source::Oira, d, "")
            },
        ];
        let labeled = label_events(&events, &lex());
        let topics: Vec<&str> = labeled.iter().map(|e| e.topic.as_str()).collect();
        assert_eq!(topics, vec!["grid", "nuclear"]);
        assert!(labeled.iter().all(|e| e.source == Source::FederalRegister));
    }

    #[test]
    fn empty_title_and_empty_lexicon() {
        assert!(label("", &lex()).is_empty());
        assert!(label("   ", &lex()).is_empty());
        assert!(label("Transmission Grid Order", &Lexicon::default()).is_empty());
    }

    #[test]
    fn strategy_changes_compound_matches() {
        let loose = Labeler::default();
        let strict = Labeler::with_strategy(MatchStrategy::BoundaryAware);
        assert_eq!(loose.strategy(), MatchStrategy::LooseSubstring);
        assert!(loose.label("Microgrid pilot", &lex()).contains("grid"));
        assert!(strict.label("Microgrid pilot", &lex()).is_empty());
    }
}
