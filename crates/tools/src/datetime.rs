//! Date/time tool: current time and future-date calculation.
//!
//! Lets the agent answer delivery-date questions ("ready in 4 weeks"
//! relative to today) without hallucinating the calendar.

use async_trait::async_trait;
use chrono::{Duration, Local};
use serde::Deserialize;
use webdesk_core::error::ToolError;
use webdesk_core::tool::{Tool, ToolResult};

#[derive(Debug, Deserialize)]
struct DateTimeRequest {
    /// "now" for the current time, "future" for a calculated date
    #[serde(default = "default_action")]
    action: String,

    /// Days added to the current date when action is "future"
    #[serde(default)]
    days_offset: i64,
}

fn default_action() -> String {
    "now".to_string()
}

/// Deterministic calendar lookups for the support agent.
pub struct DateTimeTool;

#[async_trait]
impl Tool for DateTimeTool {
    fn name(&self) -> &str {
        "datetime"
    }

    fn description(&self) -> &str {
        "Get current date/time or calculate future dates"
    }

    fn parameters_schema(&self) -> serde_json::Value {
        serde_json::json!({
            "type": "object",
            "properties": {
                "action": {
                    "type": "string",
                    "enum": ["now", "future"],
                    "description": "\"now\" for the current time, \"future\" for a calculated date"
                },
                "days_offset": {
                    "type": "integer",
                    "description": "Days to add to the current date",
                    "default": 0
                }
            }
        })
    }

    async fn execute(&self, arguments: serde_json::Value) -> Result<ToolResult, ToolError> {
        let request: DateTimeRequest = serde_json::from_value(arguments)
            .map_err(|e| ToolError::InvalidArguments(e.to_string()))?;

        let now = Local::now();

        match request.action.as_str() {
            "now" => {
                let formatted_fr = now.format("%d/%m/%Y à %H:%M").to_string();
                Ok(ToolResult {
                    success: true,
                    output: formatted_fr.clone(),
                    data: Some(serde_json::json!({
                        "date": now.format("%Y-%m-%d").to_string(),
                        "time": now.format("%H:%M:%S").to_string(),
                        "day": now.format("%A").to_string(),
                        "formatted_fr": formatted_fr,
                    })),
                })
            }
            "future" => {
                let future = now + Duration::days(request.days_offset);
                let formatted_fr = future.format("%d/%m/%Y").to_string();
                Ok(ToolResult {
                    success: true,
                    output: formatted_fr.clone(),
                    data: Some(serde_json::json!({
                        "date": future.format("%Y-%m-%d").to_string(),
                        "day": future.format("%A").to_string(),
                        "days_from_now": request.days_offset,
                        "formatted_fr": formatted_fr,
                    })),
                })
            }
            other => Err(ToolError::InvalidArguments(format!(
                "unknown action: {other}"
            ))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn now_reports_todays_date() {
        let tool = DateTimeTool;
        let result = tool.execute(serde_json::json!({})).await.unwrap();
        assert!(result.success);

        let data = result.data.unwrap();
        let today = Local::now().format("%Y-%m-%d").to_string();
        assert_eq!(data["date"], serde_json::json!(today));
        assert!(data["formatted_fr"].as_str().unwrap().contains(" à "));
    }

    #[tokio::test]
    async fn future_offsets_by_days() {
        let tool = DateTimeTool;
        let result = tool
            .execute(serde_json::json!({"action": "future", "days_offset": 28}))
            .await
            .unwrap();

        let data = result.data.unwrap();
        assert_eq!(data["days_from_now"], 28);
        let expected = (Local::now() + Duration::days(28))
            .format("%Y-%m-%d")
            .to_string();
        assert_eq!(data["date"], serde_json::json!(expected));
    }

    #[tokio::test]
    async fn unknown_action_is_invalid_arguments() {
        let tool = DateTimeTool;
        let err = tool
            .execute(serde_json::json!({"action": "yesterday"}))
            .await
            .unwrap_err();
        assert!(matches!(err, ToolError::InvalidArguments(_)));
    }
}
