//! Decoder for the engine's `--format json` output: one JSON header line,
//! then the raw body.

use serde_json::{Map, Value};

use crate::types::{EngineError, EngineResult, FetchResult};

/// Split stdout at the first newline into (header, body).
///
/// Without a newline the whole output is the header and the body is empty.
pub fn split_output(stdout: &str) -> (&str, &str) {
    match stdout.split_once('\n') {
        Some((header, body)) => (header, body),
        None => (stdout, ""),
    }
}

/// Parse engine stdout into a [`FetchResult`].
///
/// Fails only when the header line is not a JSON object. Missing header keys
/// fall back: `url` to `requested_url`, `size` to the body's byte length,
/// `status` and `time_ms` to zero.
pub fn parse(stdout: &str, requested_url: &str) -> EngineResult<FetchResult> {
    let (header, body) = split_output(stdout);

    let meta: Map<String, Value> = match serde_json::from_str(header.trim()) {
        Ok(Value::Object(map)) => map,
        Ok(other) => {
            return Err(EngineError::Parse {
                url: requested_url.to_string(),
                reason: format!("header is not a JSON object: {other}"),
            });
        }
        Err(e) => {
            return Err(EngineError::Parse {
                url: requested_url.to_string(),
                reason: e.to_string(),
            });
        }
    };

    let url = meta
        .get("url")
        .and_then(Value::as_str)
        .unwrap_or(requested_url)
        .to_string();
    let status = meta
        .get("status")
        .and_then(Value::as_u64)
        .and_then(|s| u16::try_from(s).ok())
        .unwrap_or(0);
    let size = meta
        .get("size")
        .and_then(Value::as_u64)
        .unwrap_or(body.len() as u64);
    let time_ms = meta.get("time_ms").and_then(Value::as_f64).unwrap_or(0.0);

    Ok(FetchResult {
        url,
        content: body.to_string(),
        status,
        size,
        time_ms,
        metadata: meta,
    })
}
