// src/matching.rs
//! Keyword matching strategies.
//!
//! Two strategies coexist and are NOT interchangeable:
//! - `LooseSubstring`: lowercase substring test. Used by the topic labeler so
//!   compound and hyphenated terms still match ("microgrid" hits "grid").
//! - `BoundaryAware`: word-boundary regex that treats space and hyphen as
//!   equivalent and accepts a simple `s`/`es` plural on the last word. Used by
//!   the flat filings export to count distinct keyword hits.
//!
//! Each stage declares the strategy it uses.

use once_cell::sync::OnceCell;
use regex::Regex;
use std::collections::BTreeSet;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum MatchStrategy {
    #[default]
    LooseSubstring,
    BoundaryAware,
}

impl MatchStrategy {
    pub fn matches(self, text: &str, keyword: &str) -> bool {
        match self {
            MatchStrategy::LooseSubstring => loose_substring_match(text, keyword),
            MatchStrategy::BoundaryAware => boundary_aware_match(text, keyword),
        }
    }
}

/// Case-insensitive substring match. Empty keywords never match.
pub fn loose_substring_match(text: &str, keyword: &str) -> bool {
    let k = keyword.trim().to_lowercase();
    !k.is_empty() && text.to_lowercase().contains(&k)
}

/// Word-boundary match with hyphen/space equivalence and simple plurals.
pub fn boundary_aware_match(text: &str, keyword: &str) -> bool {
    match BoundaryPattern::compile(keyword) {
        Some(p) => p.is_match_normalized(&normalize_for_boundary(text)),
        None => false,
    }
}

/// Lowercase, turn punctuation (except `-` and `_`) into spaces, collapse whitespace.
pub fn normalize_for_boundary(text: &str) -> String {
    static RE_PUNCT: OnceCell<Regex> = OnceCell::new();
    static RE_WS: OnceCell<Regex> = OnceCell::new();
    let re_punct = RE_PUNCT.get_or_init(|| Regex::new(r"[^\w\s\-]").unwrap());
    let re_ws = RE_WS.get_or_init(|| Regex::new(r"\s+").unwrap());

    let lower = text.to_lowercase();
    let spaced = re_punct.replace_all(&lower, " ");
    re_ws.replace_all(&spaced, " ").trim().to_string()
}

/// A keyword compiled into its boundary-aware regex.
#[derive(Debug, Clone)]
pub struct BoundaryPattern {
    keyword: String,
    re: Regex,
}

impl BoundaryPattern {
    /// `None` for blank keywords.
    pub fn compile(keyword: &str) -> Option<Self> {
        let k = keyword.trim().to_lowercase();
        let parts: Vec<String> = k
            .split(|c: char| c.is_whitespace() || c == '-')
            .filter(|p| !p.is_empty())
            .map(regex::escape)
            .collect();
        if parts.is_empty() {
            return None;
        }
        // "data center" -> data[\s\-]?center(?:s|es)?
        let body = parts.join(r"[\s\-]?");
        let pattern = format!(r"(?i)\b{body}(?:s|es)?\b");
        let re = Regex::new(&pattern).ok()?;
        Some(Self {
            keyword: keyword.to_string(),
            re,
        })
    }

    pub fn keyword(&self) -> &str {
        &self.keyword
    }

    /// Expects text already passed through `normalize_for_boundary`.
    pub fn is_match_normalized(&self, normalized: &str) -> bool {
        self.re.is_match(normalized)
    }
}

/// Precompiled keyword set for counting distinct boundary-aware hits.
#[derive(Debug, Clone, Default)]
pub struct BoundaryKeywordSet {
    patterns: Vec<BoundaryPattern>,
}

impl BoundaryKeywordSet {
    pub fn new<I, S>(keywords: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let patterns = keywords
            .into_iter()
            .filter_map(|k| BoundaryPattern::compile(k.as_ref()))
            .collect();
        Self { patterns }
    }

    /// Number of UNIQUE keywords present in `title`.
    pub fn count_unique_hits(&self, title: &str) -> usize {
        if title.trim().is_empty() {
            return 0;
        }
        let text = normalize_for_boundary(title);
        let hits: BTreeSet<&str> = self
            .patterns
            .iter()
            .filter(|p| p.is_match_normalized(&text))
            .map(|p| p.keyword())
            .collect();
        hits.len()
    }
}
