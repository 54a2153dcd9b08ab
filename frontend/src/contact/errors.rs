use serde_json::Value;
use thiserror::Error;

use super::response::field_text;

/// Shown instead of anything that still looks like a raw server payload.
pub const RAW_PAYLOAD_FALLBACK: &str =
    "There was an issue processing your request. Please try again.";

/// Every way a single submission can end in the error state.
///
/// `Display` is the text meant for the visitor; it still goes through
/// [`sanitize`] before it reaches the page.
#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum FormError {
    #[error("The form action property is not set!")]
    MissingAction,

    #[error("The reCaptcha javascript API url is not loaded!")]
    ChallengeUnavailable,

    #[error("{0}")]
    Challenge(String),

    #[error("{status} {status_text} {url}")]
    Status {
        status: u16,
        status_text: String,
        url: String,
    },

    #[error("{message} (from: {action})")]
    Rejected { message: String, action: String },

    #[error("{0}")]
    Network(String),

    /// The browser refused to read the form's fields.
    #[error("{0}")]
    Payload(String),
}

impl FormError {
    pub fn user_message(&self) -> String {
        sanitize(&self.to_string())
    }
}

/// Unwraps JSON error bodies and hides raw payloads from visitors.
pub fn sanitize(message: &str) -> String {
    let message = serde_json::from_str::<Value>(message)
        .ok()
        .and_then(|json| field_text(&json, "message").or_else(|| field_text(&json, "error")))
        .unwrap_or_else(|| message.to_string());

    if message.contains("{\"success\"") && message.contains("\"data\"") {
        RAW_PAYLOAD_FALLBACK.to_string()
    } else {
        message
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn plain_text_passes_through() {
        assert_eq!(sanitize("Invalid email (from: /send)"), "Invalid email (from: /send)");
    }

    #[test]
    fn unwraps_structured_message_then_error() {
        assert_eq!(sanitize(r#"{"message":"Mailbox full"}"#), "Mailbox full");
        assert_eq!(sanitize(r#"{"error":"Too many requests"}"#), "Too many requests");
        assert_eq!(
            sanitize(r#"{"message":"","error":"Second choice"}"#),
            "Second choice"
        );
    }

    #[test]
    fn structured_without_text_fields_is_kept() {
        assert_eq!(sanitize(r#"{"code":7}"#), r#"{"code":7}"#);
    }

    #[test]
    fn raw_payload_is_replaced() {
        let leaked = r#"{"success":false,"data":{"id":3}} (from: forms/contact.php)"#;
        assert_eq!(sanitize(leaked), RAW_PAYLOAD_FALLBACK);
    }

    #[test]
    fn status_error_reads_like_fetch_failure() {
        let err = FormError::Status {
            status: 500,
            status_text: "Internal Server Error".to_string(),
            url: "https://example.com/forms/contact.php".to_string(),
        };
        assert_eq!(
            err.user_message(),
            "500 Internal Server Error https://example.com/forms/contact.php"
        );
    }
}
