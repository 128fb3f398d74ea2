// src/config.rs
//! Runtime settings resolved from the environment (`.env` is loaded by the binary).

use std::time::Duration;

pub const ENV_LEXICON_PATH: &str = "PAPER_LEXICON_PATH";
pub const ENV_HTTP_TIMEOUT_SECS: &str = "PAPER_HTTP_TIMEOUT_SECS";
pub const ENV_REQUEST_DELAY_MS: &str = "PAPER_REQUEST_DELAY_MS";
pub const ENV_USER_AGENT: &str = "PAPER_USER_AGENT";
pub const ENV_UA_MAX_DOCUMENTS: &str = "PAPER_UA_MAX_DOCUMENTS";
pub const ENV_LOG_JSON: &str = "PAPER_LOG_JSON";

/// Lexicon fallbacks, tried in order when neither a flag nor the env var is set.
pub const DEFAULT_LEXICON_CANDIDATES: [&str; 4] = [
    "config/lexicon.toml",
    "config/lexicon.yaml",
    "config/lexicon.yml",
    "config/lexicon.json",
];

pub const DEFAULT_DAYS: u32 = 365;
pub const DEFAULT_TOP_N: usize = 5;
pub const DEFAULT_HTTP_TIMEOUT_SECS: u64 = 30;
pub const DEFAULT_REQUEST_DELAY_MS: u64 = 250;
pub const DEFAULT_UA_MAX_DOCUMENTS: usize = 5;
pub const DEFAULT_USER_AGENT: &str = concat!("paper-momentum/", env!("CARGO_PKG_VERSION"));

/// Knobs for the network adapters.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpSettings {
    /// Fixed per-request timeout; a timed-out call contributes zero events.
    pub timeout: Duration,
    /// Courtesy pause between successive upstream requests.
    pub request_delay: Duration,
    pub user_agent: String,
    /// Unified Agenda XML documents fetched per run.
    pub ua_max_documents: usize,
}

impl Default for HttpSettings {
    fn default() -> Self {
        Self {
            timeout: Duration::from_secs(DEFAULT_HTTP_TIMEOUT_SECS),
            request_delay: Duration::from_millis(DEFAULT_REQUEST_DELAY_MS),
            user_agent: DEFAULT_USER_AGENT.to_string(),
            ua_max_documents: DEFAULT_UA_MAX_DOCUMENTS,
        }
    }
}

impl HttpSettings {
    /// Read overrides from env; unparsable values fall back to defaults.
    pub fn from_env() -> Self {
        Self::from_lookup(|k| std::env::var(k).ok())
    }

    fn from_lookup<F: Fn(&str) -> Option<String>>(get: F) -> Self {
        let d = Self::default();
        Self {
            timeout: parse_u64(get(ENV_HTTP_TIMEOUT_SECS))
                .map(Duration::from_secs)
                .unwrap_or(d.timeout),
            request_delay: parse_u64(get(ENV_REQUEST_DELAY_MS))
                .map(Duration::from_millis)
                .unwrap_or(d.request_delay),
            user_agent: get(ENV_USER_AGENT)
                .map(|s| s.trim().to_string())
                .filter(|s| !s.is_empty())
                .unwrap_or(d.user_agent),
            ua_max_documents: parse_u64(get(ENV_UA_MAX_DOCUMENTS))
                .map(|n| n as usize)
                .unwrap_or(d.ua_max_documents),
        }
    }
}

fn parse_u64(raw: Option<String>) -> Option<u64> {
    raw.and_then(|s| s.trim().parse::<u64>().ok())
}

/// JSON log lines when `PAPER_LOG_JSON=1`.
pub fn json_logs_enabled() -> bool {
    std::env::var(ENV_LOG_JSON).ok().as_deref() == Some("1")
}
