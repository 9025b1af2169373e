use serde_json::Value;

/// Pretty-prints JSON response bodies, leaving anything else untouched
pub fn format_response_body(body: &str) -> String {
    match serde_json::from_str::<Value>(body) {
        Ok(json) => serde_json::to_string_pretty(&json).unwrap_or_else(|_| body.to_string()),
        Err(_) => body.to_string(),
    }
}
