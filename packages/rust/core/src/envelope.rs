//! The uniform result envelope returned by every operation.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use sourcebridge_shared::SourceBridgeError;

/// One block of text content.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TextContent {
    #[serde(rename = "type")]
    pub kind: String,
    pub text: String,
}

impl TextContent {
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            kind: "text".into(),
            text: text.into(),
        }
    }
}

/// Success payload or error message, never both.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ToolResult {
    pub content: Vec<TextContent>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub structured_content: Option<Value>,
    #[serde(default)]
    pub is_error: bool,
}

impl ToolResult {
    /// Wrap a success payload. The text block is the payload pretty-printed;
    /// objects are also attached as structured content.
    pub fn success(payload: Value) -> Self {
        let text = serde_json::to_string_pretty(&payload).unwrap_or_else(|_| payload.to_string());
        Self {
            content: vec![TextContent::new(text)],
            structured_content: payload.is_object().then_some(payload),
            is_error: false,
        }
    }

    /// An error envelope with a human-readable message.
    pub fn error(message: impl Into<String>) -> Self {
        let message = message.into();
        let message = if message.trim().is_empty() {
            "operation failed".to_string()
        } else {
            message
        };
        Self {
            content: vec![TextContent::new(message)],
            structured_content: None,
            is_error: true,
        }
    }

    /// The first text block, if any.
    pub fn text(&self) -> Option<&str> {
        self.content.first().map(|c| c.text.as_str())
    }
}

impl From<SourceBridgeError> for ToolResult {
    fn from(err: SourceBridgeError) -> Self {
        Self::error(err.to_string())
    }
}

impl From<sourcebridge_shared::Result<Value>> for ToolResult {
    fn from(result: sourcebridge_shared::Result<Value>) -> Self {
        match result {
            Ok(payload) => Self::success(payload),
            Err(err) => err.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn success_carries_payload_twice() {
        let result = ToolResult::success(json!({ "id": "feed-1" }));
        assert!(!result.is_error);
        assert_eq!(result.structured_content, Some(json!({ "id": "feed-1" })));
        assert!(result.text().unwrap().contains("\"feed-1\""));

        let wire = serde_json::to_value(&result).unwrap();
        assert_eq!(wire["isError"], false);
        assert_eq!(wire["content"][0]["type"], "text");
        assert_eq!(wire["structuredContent"]["id"], "feed-1");
    }

    #[test]
    fn arrays_travel_as_text_only() {
        let result = ToolResult::success(json!([{ "name": "a" }]));
        assert!(result.structured_content.is_none());
        assert!(result.text().unwrap().contains("\"a\""));
    }

    #[test]
    fn error_is_flagged_and_never_empty() {
        let result = ToolResult::error("");
        assert!(result.is_error);
        assert!(!result.text().unwrap().is_empty());
        assert!(serde_json::to_value(&result).unwrap().get("structuredContent").is_none());
    }

    #[test]
    fn remote_errors_pass_through_verbatim() {
        let result: ToolResult = SourceBridgeError::Remote("Feed not found.".into()).into();
        assert!(result.is_error);
        assert!(result.text().unwrap().contains("Feed not found."));
    }
}
