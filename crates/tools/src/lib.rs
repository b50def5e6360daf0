//! # Webdesk Tools
//!
//! Deterministic tools the pipeline can dispatch to: the quote calculator
//! over the agency's fixed price catalog and a date/time helper for
//! delivery-date questions.

pub mod datetime;
pub mod pricing;

pub use datetime::DateTimeTool;
pub use pricing::{calculate, AddonLine, Quote, QuoteRequest};

use async_trait::async_trait;
use webdesk_core::error::ToolError;
use webdesk_core::tool::{Tool, ToolResult};

/// `Tool` wrapper around [`pricing::calculate`] for registry dispatch and
/// function-calling schema export.
pub struct PriceCalculatorTool;

#[async_trait]
impl Tool for PriceCalculatorTool {
    fn name(&self) -> &str {
        "price_calculator"
    }

    fn description(&self) -> &str {
        "Calculate the price of a Web Shop service from its type, addons and modifiers"
    }

    fn parameters_schema(&self) -> serde_json::Value {
        serde_json::json!({
            "type": "object",
            "properties": {
                "service_type": {
                    "type": "string",
                    "description": "Type of service (vitrine, ecommerce, surmesure)"
                },
                "addons": {
                    "type": "array",
                    "items": {"type": "string"},
                    "description": "Addon identifiers (seo, blog, multilangue, ...)"
                },
                "is_urgent": {"type": "boolean", "description": "Delivery under 2 weeks"},
                "is_complex": {"type": "boolean", "description": "More than 10 pages"},
                "is_redesign": {"type": "boolean", "description": "Redesign for an existing client"}
            },
            "required": ["service_type"]
        })
    }

    async fn execute(&self, arguments: serde_json::Value) -> Result<ToolResult, ToolError> {
        let request: QuoteRequest = serde_json::from_value(arguments)
            .map_err(|e| ToolError::InvalidArguments(e.to_string()))?;

        let quote = pricing::calculate(&request)?;
        let data = serde_json::to_value(&quote)
            .map_err(|e| ToolError::ExecutionFailed {
                tool_name: "price_calculator".to_string(),
                reason: e.to_string(),
            })?;

        Ok(ToolResult {
            success: true,
            output: format!("{}€ pour {}", quote.total, quote.service_type),
            data: Some(data),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use webdesk_core::tool::ToolRegistry;

    #[tokio::test]
    async fn registered_tool_computes_quote() {
        let mut registry = ToolRegistry::new();
        registry.register(Box::new(PriceCalculatorTool));

        let result = registry
            .execute(
                "price_calculator",
                serde_json::json!({"service_type": "vitrine", "addons": ["seo"]}),
            )
            .await
            .unwrap();
        assert!(result.success);
        let data = result.data.unwrap();
        assert_eq!(data["subtotal"], 449);
    }

    #[tokio::test]
    async fn missing_service_type_is_invalid_arguments() {
        let tool = PriceCalculatorTool;
        let err = tool
            .execute(serde_json::json!({"addons": ["seo"]}))
            .await
            .unwrap_err();
        assert!(matches!(err, ToolError::InvalidArguments(_)));
    }

    #[test]
    fn registry_lists_both_tools() {
        let mut registry = ToolRegistry::new();
        registry.register(Box::new(PriceCalculatorTool));
        registry.register(Box::new(DateTimeTool));

        let mut names = registry.names();
        names.sort_unstable();
        assert_eq!(names, vec!["datetime", "price_calculator"]);
        assert_eq!(registry.definitions().len(), 2);
    }

    #[test]
    fn schema_lists_service_type_as_required() {
        let tool = PriceCalculatorTool;
        let schema = tool.parameters_schema();
        assert_eq!(schema["required"][0], "service_type");
    }
}
