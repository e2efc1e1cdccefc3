use serde_json::{json, Value};

use crate::error::ToolError;

// Tool-response envelope: exactly one text content item; isError only on
// failure paths so success payloads stay small.

pub fn success(result: &Value) -> Value {
    let text = serde_json::to_string_pretty(result).unwrap_or_else(|_| "{}".to_string());
    json!({
        "content": [{ "type": "text", "text": text }]
    })
}

pub fn failure(err: &ToolError) -> Value {
    error_text(&err.to_string())
}

pub fn error_text(message: &str) -> Value {
    json!({
        "content": [{ "type": "text", "text": format!("Error: {}", message) }],
        "isError": true
    })
}
