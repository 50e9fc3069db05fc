//! Resource registration and dispatch.

use crate::context::ServerContext;
use crate::types::{McpResult, ReadResourceResult, ResourceDefinition, ResourceTemplateDefinition};

use super::{cached, stats, templates};

pub struct ResourceRegistry;

impl ResourceRegistry {
    pub fn list_templates() -> Vec<ResourceTemplateDefinition> {
        templates::list_templates()
    }

    /// Static resources first, then every cache entry.
    pub fn list_resources(ctx: &ServerContext) -> Vec<ResourceDefinition> {
        let mut resources = templates::static_resources();
        resources.extend(cached::list(ctx.cache()));
        resources
    }

    pub fn read(uri: &str, ctx: &ServerContext) -> McpResult<ReadResourceResult> {
        if uri == stats::STATS_URI {
            stats::read_stats(ctx)
        } else {
            cached::read(uri, ctx.cache())
        }
    }
}
