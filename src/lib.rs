//! Typesense - Deterministic keystroke-timing analyzer
//!
//! Typesense turns a finished typing session into behavioral signals through a pure
//! pipeline: payload validation → metric derivation → mood classification →
//! scoring → suggestion.
//!
//! ## Modules
//!
//! - **Engine**: `features`, `mood`, `scoring`, `suggestion`, orchestrated by `pipeline`
//! - **Shell boundary**: `adapter` (wire payloads), `encoder` (wire results),
//!   `store` (injected persistence), `ffi` (C ABI)

pub mod adapter;
pub mod config;
pub mod encoder;
pub mod error;
pub mod features;
pub mod mood;
pub mod pipeline;
pub mod scoring;
pub mod store;
pub mod suggestion;
pub mod types;

// FFI bindings for C interop (always available for cdylib/staticlib builds)
pub mod ffi;

pub use config::AnalyzerConfig;
pub use error::{ComputeError, ValidationError};
pub use features::compute_metrics;
pub use mood::classify_mood;
pub use pipeline::{analyze, analyze_json, assess, SessionAnalyzer};
pub use scoring::{confidence_score, focus_score};
pub use store::{JsonlSessionStore, MemorySessionStore, SessionRecord, SessionStore};
pub use suggestion::suggest;
pub use types::{
    KeystrokeEvent, Mood, SessionAnalysis, SessionAssessment, SessionInput, SessionMetrics,
};

/// Analyzer version embedded in every result payload
pub const ANALYZER_VERSION: &str = env!("CARGO_PKG_VERSION");

/// Producer name for result payloads
pub const PRODUCER_NAME: &str = "typesense";
