//! Prompt registration and dispatch.

use serde_json::Value;

use crate::types::{McpError, McpResult, PromptArgument, PromptDefinition, PromptGetResult};

use super::{auth_workflow, compare_sites, scrape_and_analyze};

pub struct PromptRegistry;

impl PromptRegistry {
    pub fn list_prompts() -> Vec<PromptDefinition> {
        vec![
            PromptDefinition {
                name: "scrape_and_analyze".to_string(),
                description: Some("Fetch a webpage and analyze its content".to_string()),
                arguments: Some(vec![
                    PromptArgument {
                        name: "url".to_string(),
                        description: Some("URL to scrape and analyze".to_string()),
                        required: true,
                    },
                    PromptArgument {
                        name: "focus".to_string(),
                        description: Some(
                            "What to focus on (e.g., 'prices', 'links', 'text')".to_string(),
                        ),
                        required: false,
                    },
                ]),
            },
            PromptDefinition {
                name: "compare_sites".to_string(),
                description: Some("Fetch and compare content from multiple sites".to_string()),
                arguments: Some(vec![PromptArgument {
                    name: "urls".to_string(),
                    description: Some("Comma-separated URLs to compare".to_string()),
                    required: true,
                }]),
            },
            PromptDefinition {
                name: "auth_workflow".to_string(),
                description: Some("Authenticate and fetch protected content".to_string()),
                arguments: Some(vec![PromptArgument {
                    name: "url".to_string(),
                    description: Some("URL requiring authentication".to_string()),
                    required: true,
                }]),
            },
        ]
    }

    pub fn get(name: &str, arguments: Option<Value>) -> McpResult<PromptGetResult> {
        let args = arguments.unwrap_or(Value::Object(serde_json::Map::new()));

        match name {
            "scrape_and_analyze" => scrape_and_analyze::expand(args),
            "compare_sites" => compare_sites::expand(args),
            "auth_workflow" => auth_workflow::expand(args),
            _ => Err(McpError::PromptNotFound(name.to_string())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::ToolContent;
    use serde_json::json;

    fn text_of(result: &PromptGetResult) -> &str {
        match &result.messages[0].content {
            ToolContent::Text { text } => text,
            ToolContent::Resource { .. } => panic!("expected text"),
        }
    }

    #[test]
    fn test_scrape_default_focus() {
        let result =
            PromptRegistry::get("scrape_and_analyze", Some(json!({ "url": "https://a.test" })))
                .unwrap();
        let text = text_of(&result);
        assert!(text.contains("URL: https://a.test"));
        assert!(text.contains("focusing on: main content"));
    }

    #[test]
    fn test_compare_sites_normalizes_list() {
        let result = PromptRegistry::get(
            "compare_sites",
            Some(json!({ "urls": " https://a.test ,, https://b.test" })),
        )
        .unwrap();
        assert!(text_of(&result).contains("URLs: https://a.test, https://b.test"));
    }

    #[test]
    fn test_missing_required_argument() {
        let err = PromptRegistry::get("auth_workflow", None).unwrap_err();
        assert!(matches!(err, McpError::InvalidParams(_)));
    }

    #[test]
    fn test_unknown_prompt() {
        let err = PromptRegistry::get("observe", None).unwrap_err();
        assert_eq!(err.code(), -32804);
    }
}
