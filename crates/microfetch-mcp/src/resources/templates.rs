//! Resource URI templates and static resource definitions.

use microfetch_core::RESOURCE_SCHEME;

use crate::types::{ResourceDefinition, ResourceTemplateDefinition};

use super::stats::STATS_URI;

pub fn list_templates() -> Vec<ResourceTemplateDefinition> {
    vec![ResourceTemplateDefinition {
        uri_template: format!("{RESOURCE_SCHEME}{{id}}"),
        name: "Cached Fetch".to_string(),
        description: Some("Content of a fetch stored with cache=true".to_string()),
        mime_type: Some("text/plain".to_string()),
    }]
}

pub fn static_resources() -> Vec<ResourceDefinition> {
    vec![ResourceDefinition {
        uri: STATS_URI.to_string(),
        name: "MicroFetch Statistics".to_string(),
        description: Some("Engine binary status and cache size".to_string()),
        mime_type: Some("application/json".to_string()),
    }]
}
