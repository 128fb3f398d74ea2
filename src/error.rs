// src/error.rs
//! Error taxonomy shared across the pipeline.
//!
//! Only `ConfigError` is ever surfaced to the caller as a hard failure.
//! `SourceFetchError` is caught at the adapter boundary, logged, and turned
//! into "zero events from this call".

use std::path::PathBuf;

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("lexicon file not found at {}", path.display())]
    NotFound { path: PathBuf },

    #[error("{var} points to non-existent path {}", path.display())]
    EnvPathMissing { var: &'static str, path: PathBuf },

    #[error("no lexicon found (set {var} or create one of: {})", candidates.join(", "))]
    NoLexicon {
        var: &'static str,
        candidates: Vec<String>,
    },

    #[error("reading lexicon from {}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("parsing lexicon {} as {format}: {message}", path.display())]
    Parse {
        path: PathBuf,
        format: &'static str,
        message: String,
    },

    #[error("unsupported lexicon format for {}", path.display())]
    UnsupportedFormat { path: PathBuf },

    #[error("lexicon {} defines no topics", path.display())]
    Empty { path: PathBuf },
}

#[derive(Debug, thiserror::Error)]
pub enum SourceFetchError {
    #[error("http request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("invalid json payload: {0}")]
    Json(#[from] serde_json::Error),

    #[error("invalid xml payload: {0}")]
    Xml(#[from] quick_xml::Error),

    #[error("unexpected upstream layout: {0}")]
    Parse(String),
}
