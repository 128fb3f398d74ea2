// src/lib.rs
// Public library surface for the binary and integration tests.

pub mod config;
pub mod error;
pub mod lexicon;
pub mod matching;

// Source adapters and the fetch driver
pub mod ingest;

// Momentum pipeline stages
pub mod aggregate;
pub mod features;
pub mod labeler;
pub mod rolling;
pub mod scoring;

// Outputs
pub mod filings;
pub mod summary;
pub mod table;

pub mod telemetry;
pub mod pipeline;

// ---- Re-exports for stable public API ----
pub use crate::error::{ConfigError, SourceFetchError};
pub use crate::features::DailyFeatureRow;
pub use crate::ingest::types::{FetchWindow, LabeledEvent, RawEvent, Source, SourceAdapter};
pub use crate::lexicon::Lexicon;
pub use crate::matching::MatchStrategy;
pub use crate::pipeline::{run, PipelineOptions, PipelineRun};
pub use crate::summary::{summarize, PaperVectorSummary};
