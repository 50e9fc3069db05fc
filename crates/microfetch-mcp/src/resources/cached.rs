//! `microfetch://{id}` resource. Content stored by `fetch` with `cache=true`.

use microfetch_core::{parse_resource_uri, CacheEntry, ResultCache};

use crate::types::{McpError, McpResult, ReadResourceResult, ResourceContent, ResourceDefinition};

pub fn definition(entry: &CacheEntry) -> ResourceDefinition {
    ResourceDefinition {
        uri: entry.uri(),
        name: format!("Fetched: {}", entry.url),
        description: Some(format!("Cached content from {}", entry.url)),
        mime_type: Some("text/plain".to_string()),
    }
}

pub fn list(cache: &ResultCache) -> Vec<ResourceDefinition> {
    cache.list().iter().map(definition).collect()
}

/// Raw cached content for `uri`, or `ResourceNotFound`.
pub fn read(uri: &str, cache: &ResultCache) -> McpResult<ReadResourceResult> {
    let entry = parse_resource_uri(uri)
        .and_then(|id| cache.get(id))
        .ok_or_else(|| McpError::ResourceNotFound(uri.to_string()))?;

    Ok(ReadResourceResult {
        contents: vec![ResourceContent::text(uri, "text/plain", entry.content)],
    })
}
