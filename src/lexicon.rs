// src/lexicon.rs
//! Topic lexicon: topic name → set of lowercased inclusion keywords.
//!
//! Loaded once per run from TOML, YAML or JSON. Each topic is either the
//! `{ include = [...] }` table shape or a bare keyword list. There is no
//! built-in default: a missing or malformed lexicon aborts the run.

use std::collections::{BTreeMap, BTreeSet};
use std::fs;
use std::path::{Path, PathBuf};

use serde::Deserialize;
use tracing::{debug, warn};

use crate::config::{DEFAULT_LEXICON_CANDIDATES, ENV_LEXICON_PATH};
use crate::error::ConfigError;

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Lexicon {
    topics: BTreeMap<String, BTreeSet<String>>,
}

impl Lexicon {
    /// Build from `(topic, keywords)` pairs. Keywords are trimmed, lowercased
    /// and deduplicated; blank keywords and blank topic names are dropped.
    pub fn from_pairs<I, T, K, S>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (T, K)>,
        T: Into<String>,
        K: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut topics: BTreeMap<String, BTreeSet<String>> = BTreeMap::new();
        for (topic, kws) in pairs {
            let topic: String = topic.into();
            let topic = topic.trim().to_string();
            if topic.is_empty() {
                continue;
            }
            let set = topics.entry(topic).or_default();
            set.extend(clean_keywords(kws));
        }
        Self { topics }
    }

    pub fn len(&self) -> usize {
        self.topics.len()
    }

    pub fn is_empty(&self) -> bool {
        self.topics.is_empty()
    }

    pub fn topics(&self) -> impl Iterator<Item = &str> {
        self.topics.keys().map(String::as_str)
    }

    pub fn keywords(&self, topic: &str) -> Option<&BTreeSet<String>> {
        self.topics.get(topic)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &BTreeSet<String>)> {
        self.topics.iter().map(|(t, k)| (t.as_str(), k))
    }

    /// Sorted union of every topic's keywords (the adapters' query terms).
    pub fn all_keywords(&self) -> Vec<String> {
        let set: BTreeSet<&String> = self.topics.values().flatten().collect();
        set.into_iter().cloned().collect()
    }
}

fn clean_keywords<K, S>(kws: K) -> impl Iterator<Item = String>
where
    K: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    kws.into_iter()
        .map(|k| k.as_ref().trim().to_lowercase())
        .filter(|k| !k.is_empty())
}

/* ----------------------------
Loading
---------------------------- */

/// Load a lexicon from an explicit path. Format follows the extension,
/// with content sniffing when the extension is unknown.
pub fn load_lexicon_from(path: &Path) -> Result<Lexicon, ConfigError> {
    if !path.exists() {
        return Err(ConfigError::NotFound {
            path: path.to_path_buf(),
        });
    }
    let content = fs::read_to_string(path).map_err(|source| ConfigError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    let ext = path
        .extension()
        .and_then(|s| s.to_str())
        .unwrap_or_default()
        .to_ascii_lowercase();

    let lex = parse_lexicon(&content, &ext, path)?;
    if lex.is_empty() {
        return Err(ConfigError::Empty {
            path: path.to_path_buf(),
        });
    }
    for (topic, kws) in lex.iter() {
        if kws.is_empty() {
            warn!(topic, path = %path.display(), "lexicon topic has no keywords; it can never match");
        }
    }
    debug!(topics = lex.len(), path = %path.display(), "lexicon loaded");
    Ok(lex)
}

/// Resolve the lexicon path and load it:
/// 1) explicit path (CLI flag)
/// 2) $PAPER_LEXICON_PATH
/// 3) config/lexicon.{toml,yaml,yml,json}
pub fn load_lexicon_default(explicit: Option<&Path>) -> Result<Lexicon, ConfigError> {
    if let Some(p) = explicit {
        return load_lexicon_from(p);
    }
    if let Ok(p) = std::env::var(ENV_LEXICON_PATH) {
        let pb = PathBuf::from(p);
        if pb.exists() {
            return load_lexicon_from(&pb);
        }
        return Err(ConfigError::EnvPathMissing {
            var: ENV_LEXICON_PATH,
            path: pb,
        });
    }
    for candidate in DEFAULT_LEXICON_CANDIDATES {
        let pb = PathBuf::from(candidate);
        if pb.exists() {
            return load_lexicon_from(&pb);
        }
    }
    Err(ConfigError::NoLexicon {
        var: ENV_LEXICON_PATH,
        candidates: DEFAULT_LEXICON_CANDIDATES
            .iter()
            .map(|s| s.to_string())
            .collect(),
    })
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum TopicEntry {
    Detailed {
        #[serde(default)]
        include: Vec<String>,
    },
    List(Vec<String>),
}

impl TopicEntry {
    fn into_keywords(self) -> Vec<String> {
        match self {
            TopicEntry::Detailed { include } => include,
            TopicEntry::List(v) => v,
        }
    }
}

type RawLexicon = BTreeMap<String, TopicEntry>;

/// Parse lexicon text; `hint_ext` picks the first format to try.
pub fn parse_lexicon(content: &str, hint_ext: &str, origin: &Path) -> Result<Lexicon, ConfigError> {
    let parse_err = |format: &'static str, message: String| ConfigError::Parse {
        path: origin.to_path_buf(),
        format,
        message,
    };

    let raw: RawLexicon = match hint_ext {
        "toml" => toml::from_str(content).map_err(|e| parse_err("toml", e.to_string()))?,
        "yaml" | "yml" => {
            serde_yaml::from_str(content).map_err(|e| parse_err("yaml", e.to_string()))?
        }
        "json" => serde_json::from_str(content).map_err(|e| parse_err("json", e.to_string()))?,
        _ => sniff(content).ok_or_else(|| ConfigError::UnsupportedFormat {
            path: origin.to_path_buf(),
        })?,
    };

    Ok(Lexicon::from_pairs(
        raw.into_iter().map(|(topic, entry)| (topic, entry.into_keywords())),
    ))
}

fn sniff(content: &str) -> Option<RawLexicon> {
    if content.trim_start().starts_with('{') {
        if let Ok(v) = serde_json::from_str(content) {
            return Some(v);
        }
    }
    if let Ok(v) = toml::from_str(content) {
        return Some(v);
    }
    serde_yaml::from_str(content).ok()
}
