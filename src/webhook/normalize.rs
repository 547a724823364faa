//! Conversion of successful webhook bodies into a response string.

use serde_json::Value;

use super::{DispatchError, HttpResponse};

/// The fields a caller needs from a successful webhook body.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NormalizedResponse {
    /// Answer text.
    pub response: String,
    /// Tokens consumed, when the workflow reports them.
    pub tokens: Option<u64>,
}

/// Interprets a 2xx response.
///
/// Non-JSON bodies are passed through as text. JSON bodies accept a bare
/// string, an object with a `response` field, or a list (bare or wrapped
/// as `{ "data": [...] }`) whose first element is normalized.
///
/// # Errors
///
/// Returns [`DispatchError::Parse`] if the body claims to be JSON but is not.
pub fn normalize(response: &HttpResponse) -> Result<NormalizedResponse, DispatchError> {
    if !response.is_json() {
        return Ok(NormalizedResponse {
            response: String::from_utf8_lossy(&response.body).into_owned(),
            tokens: None,
        });
    }

    if response.body.iter().all(u8::is_ascii_whitespace) {
        return Ok(NormalizedResponse::default());
    }

    let value: Value = serde_json::from_slice(&response.body)
        .map_err(|e| DispatchError::Parse(e.to_string()))?;

    Ok(from_value(value))
}

/// Normalizes an already-decoded JSON value.
#[must_use]
pub fn from_value(value: Value) -> NormalizedResponse {
    match value {
        Value::Null => NormalizedResponse::default(),
        Value::String(text) => NormalizedResponse {
            response: text,
            tokens: None,
        },
        Value::Array(items) => first_item(items),
        Value::Object(mut map) => {
            let wrapped = !map.contains_key("response")
                && matches!(map.get("data"), Some(Value::Array(_)));
            if wrapped {
                if let Some(Value::Array(items)) = map.remove("data") {
                    return first_item(items);
                }
            }

            let tokens = map.get("tokens").and_then(Value::as_u64);
            let response = match map.remove("response") {
                Some(Value::String(text)) => text,
                Some(Value::Null) => String::new(),
                Some(other) => other.to_string(),
                None => Value::Object(map).to_string(),
            };

            NormalizedResponse { response, tokens }
        }
        other => NormalizedResponse {
            response: other.to_string(),
            tokens: None,
        },
    }
}

fn first_item(items: Vec<Value>) -> NormalizedResponse {
    items
        .into_iter()
        .next()
        .map(from_value)
        .unwrap_or_default()
}

/// Extracts a human-readable message from a non-2xx response.
///
/// Prefers a JSON `message` or `error` string, then the trimmed body, then
/// the canonical status reason.
#[must_use]
pub fn error_message(response: &HttpResponse) -> String {
    const MAX_LEN: usize = 500;

    if response.is_json() {
        if let Ok(Value::Object(map)) = serde_json::from_slice::<Value>(&response.body) {
            let field = ["message", "error"]
                .iter()
                .find_map(|key| map.get(*key).and_then(Value::as_str));
            if let Some(message) = field {
                return message.to_string();
            }
        }
    }

    let body = String::from_utf8_lossy(&response.body);
    let body = body.trim();
    if !body.is_empty() {
        return body.chars().take(MAX_LEN).collect();
    }

    response
        .status
        .canonical_reason()
        .map_or_else(|| response.status.as_str().to_string(), str::to_string)
}
