//! Core data types for engine invocations and fetch results.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// A parsed engine fetch.
///
/// `url` is the URL echoed by the engine, which may differ from the
/// requested one after redirects. `metadata` carries the engine's header
/// object verbatim.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FetchResult {
    pub url: String,
    pub content: String,
    pub status: u16,
    pub size: u64,
    pub time_ms: f64,
    #[serde(default)]
    pub metadata: Map<String, Value>,
}

impl FetchResult {
    /// Zero-value record for a URL whose fetch failed.
    pub fn empty(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            content: String::new(),
            status: 0,
            size: 0,
            time_ms: 0.0,
            metadata: Map::new(),
        }
    }

    /// Whether this record came from a failed fetch.
    pub fn is_empty(&self) -> bool {
        self.status == 0 && self.size == 0 && self.content.is_empty()
    }
}

/// Errors that can occur while driving the engine.
#[derive(thiserror::Error, Debug)]
pub enum EngineError {
    #[error("microfetch binary not found at {path}")]
    NotFound { path: String },

    #[error("fetch failed for {url}: {reason}")]
    Failed { url: String, reason: String },

    #[error("could not parse engine output for {url}: {reason}")]
    Parse { url: String, reason: String },
}

/// Convenience result type.
pub type EngineResult<T> = Result<T, EngineError>;
