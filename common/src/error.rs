//! Error taxonomy shared by every client operation.
//!
//! Three families exist: validation failures caught before any request is
//! issued, API/transport failures reported by the HTTP layer, and local
//! processing failures (rendering markup, reading PDF bytes). All of them end
//! up as a user-visible message through `Display`.

use serde_json::Value;
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum ClientError {
    /// Input rejected locally; no network call was made.
    #[error("{0}")]
    Validation(String),

    /// The backend rejected the bearer token (or none was present).
    #[error("Your session has expired. Please sign in again.")]
    Unauthorized,

    /// The backend answered with a non-success status.
    #[error("{message}")]
    Api { status: u16, message: String },

    /// The request never produced a response.
    #[error("Network error: {0}")]
    Transport(String),

    /// The response body did not match the expected shape.
    #[error("Unexpected response from server: {0}")]
    Decode(String),

    #[error("PDF error: {0}")]
    Pdf(String),

    #[error("Could not render document: {0}")]
    Render(String),
}

impl ClientError {
    /// Builds the error for a failed HTTP response from its status and raw body.
    ///
    /// The structured message is preferred when the body carries one; otherwise
    /// a generic message naming the status is used. 401 always maps to
    /// [`ClientError::Unauthorized`].
    pub fn from_response(status: u16, body: &str) -> Self {
        if status == 401 {
            return ClientError::Unauthorized;
        }
        let message = extract_api_message(body)
            .unwrap_or_else(|| format!("Request failed with status {}", status));
        ClientError::Api { status, message }
    }

    pub fn is_validation(&self) -> bool {
        matches!(self, ClientError::Validation(_))
    }
}

/// Extracts the human-readable message from a JSON error body.
///
/// Looks at `message`, then `error`, then `msg`. A nested `{ "error": { "message": .. } }`
/// is also understood. Returns `None` for non-JSON bodies or blank messages.
pub fn extract_api_message(body: &str) -> Option<String> {
    let value: Value = serde_json::from_str(body).ok()?;
    ["message", "error", "msg"]
        .iter()
        .find_map(|key| match value.get(*key)? {
            Value::String(s) => Some(s.trim().to_string()),
            Value::Object(inner) => inner
                .get("message")
                .and_then(Value::as_str)
                .map(|s| s.trim().to_string()),
            _ => None,
        })
        .filter(|s| !s.is_empty())
}

impl From<serde_json::Error> for ClientError {
    fn from(err: serde_json::Error) -> Self {
        ClientError::Decode(err.to_string())
    }
}

impl From<lopdf::Error> for ClientError {
    fn from(err: lopdf::Error) -> Self {
        ClientError::Pdf(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn structured_message_is_preferred() {
        let err = ClientError::from_response(400, r#"{"message":"Case number already exists"}"#);
        assert_eq!(
            err,
            ClientError::Api {
                status: 400,
                message: "Case number already exists".to_string()
            }
        );
    }

    #[test]
    fn error_key_and_nested_shapes_are_understood() {
        assert_eq!(
            extract_api_message(r#"{"error":"Forbidden"}"#).as_deref(),
            Some("Forbidden")
        );
        assert_eq!(
            extract_api_message(r#"{"error":{"message":"Not found"}}"#).as_deref(),
            Some("Not found")
        );
    }

    #[test]
    fn plain_text_body_falls_back_to_generic_message() {
        let err = ClientError::from_response(502, "<html>Bad gateway</html>");
        assert_eq!(err.to_string(), "Request failed with status 502");
    }

    #[test]
    fn unauthorized_status_maps_to_session_error() {
        assert_eq!(
            ClientError::from_response(401, r#"{"message":"jwt expired"}"#),
            ClientError::Unauthorized
        );
    }
}
