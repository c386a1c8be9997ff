//! Status and body classification: error messages, binary sniffing, JSON fallbacks.

use super::RequestError;
use serde_json::Value;

const HTML_SNIPPET: usize = 100;
const UNKNOWN_SNIPPET: usize = 200;

/// Content types whose bodies are returned as raw bytes.
pub fn is_binary_content_type(content_type: &str) -> bool {
    let ct = content_type.trim().to_ascii_lowercase();
    ct.starts_with("audio/")
        || ct.starts_with("video/")
        || ct.starts_with("image/")
        || ct.starts_with("application/octet-stream")
        || ct.contains("binary")
}

fn is_html(content_type: Option<&str>) -> bool {
    content_type
        .map(|ct| ct.to_ascii_lowercase().contains("text/html"))
        .unwrap_or(false)
}

fn is_plain_text(content_type: Option<&str>) -> bool {
    content_type
        .map(|ct| ct.to_ascii_lowercase().contains("text/plain"))
        .unwrap_or(false)
}

/// First `max` characters of `text`, never splitting a code point.
pub(crate) fn snippet(text: &str, max: usize) -> &str {
    match text.char_indices().nth(max) {
        Some((idx, _)) => &text[..idx],
        None => text,
    }
}

fn non_empty_str(v: Option<&Value>) -> Option<String> {
    v.and_then(|v| v.as_str())
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
}

fn message_from_json(json: &Value) -> Option<String> {
    if let Some(msg) = non_empty_str(json.get("message")) {
        return Some(msg);
    }
    match json.get("error") {
        Some(Value::String(s)) if !s.trim().is_empty() => return Some(s.trim().to_string()),
        Some(obj @ Value::Object(_)) => {
            if let Some(msg) = non_empty_str(obj.get("message")) {
                return Some(msg);
            }
        }
        _ => {}
    }
    match json.get("detail") {
        Some(Value::String(s)) if !s.trim().is_empty() => Some(s.trim().to_string()),
        Some(Value::Null) | None => None,
        Some(Value::String(_)) => None,
        Some(other) => Some(other.to_string()),
    }
}

/// Human-readable message for a response with status >= 400.
pub fn error_message_from_body(status: u16, content_type: Option<&str>, body: &str) -> String {
    let text = body.trim();
    if is_html(content_type) && !text.is_empty() {
        return format!("HTML Error: {}", snippet(text, HTML_SNIPPET));
    }
    if let Ok(json) = serde_json::from_str::<Value>(text) {
        if let Some(msg) = message_from_json(&json) {
            return msg;
        }
    }
    if !text.is_empty() {
        return text.to_string();
    }
    let reason = reqwest::StatusCode::from_u16(status)
        .ok()
        .and_then(|s| s.canonical_reason())
        .unwrap_or("Unknown Status");
    format!("HTTP {} {}", status, reason)
}

/// Decode a fully-read success body into JSON, falling back to a diagnostic error.
pub(crate) fn decode_success_body(
    status: u16,
    content_type: Option<&str>,
    body: &[u8],
) -> Result<Value, RequestError> {
    let text = String::from_utf8_lossy(body);
    let trimmed = text.trim();
    if trimmed.is_empty() {
        return Ok(Value::Object(serde_json::Map::new()));
    }
    match serde_json::from_str::<Value>(trimmed) {
        Ok(v) => Ok(v),
        Err(_) if is_html(content_type) => Err(RequestError::decode(
            status,
            format!("HTML Response: {}", snippet(trimmed, HTML_SNIPPET)),
        )),
        Err(_) if is_plain_text(content_type) => {
            Err(RequestError::decode(status, trimmed.to_string()))
        }
        Err(_) => Err(RequestError::decode(
            status,
            format!(
                "Failed to parse JSON response: {}",
                snippet(trimmed, UNKNOWN_SNIPPET)
            ),
        )),
    }
}
