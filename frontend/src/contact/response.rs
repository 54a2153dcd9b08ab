//! Interpretation of the contact endpoint's reply body.
//!
//! Two contracts are accepted: a JSON object carrying `"success": true`, and
//! the older plain-text `OK`. Everything else is a rejection whose message
//! is picked from `message`, then `error`, then the raw body.

use serde_json::Value;

const REJECTED_FALLBACK: &str = "Form submission failed";

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Verdict {
    Accepted,
    Rejected(String),
}

pub fn interpret(body: &str) -> Verdict {
    let json = serde_json::from_str::<Value>(body).ok();

    match &json {
        Some(reply) if reply.get("success") == Some(&Value::Bool(true)) => Verdict::Accepted,
        None if body.trim() == "OK" => Verdict::Accepted,
        _ => {
            let message = json
                .as_ref()
                .and_then(|reply| {
                    field_text(reply, "message").or_else(|| field_text(reply, "error"))
                })
                .or_else(|| (!body.is_empty()).then(|| body.to_string()))
                .unwrap_or_else(|| REJECTED_FALLBACK.to_string());
            Verdict::Rejected(message)
        }
    }
}

/// Text of `key` when present and non-empty; absent, null, false and zero
/// count as missing.
pub(crate) fn field_text(reply: &Value, key: &str) -> Option<String> {
    match reply.get(key)? {
        Value::Null | Value::Bool(false) => None,
        Value::String(text) if text.is_empty() => None,
        Value::String(text) => Some(text.clone()),
        Value::Number(n) if n.as_f64() == Some(0.0) => None,
        other => Some(other.to_string()),
    }
}
