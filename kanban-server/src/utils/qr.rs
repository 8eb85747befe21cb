//! QR payload generation
//!
//! The server does not render QR images; it produces an opaque
//! payload (base64 of the confirmation URL) that kanban card
//! printers and the frontend turn into an actual code. Failure here
//! aborts the enclosing request — there is no retry policy.

use base64::Engine;
use base64::engine::general_purpose::STANDARD;

use super::{AppError, AppResult};

/// Build the scan-to-confirm URL for a kanban token
pub fn confirm_url(request_host: &str, kanban_id: &str) -> String {
    format!("{}/confirm-kanban/{}", request_host.trim_end_matches('/'), kanban_id)
}

/// Encode QR content into the opaque payload stored on the card
pub fn generate(content: &str) -> AppResult<String> {
    if content.is_empty() {
        return Err(AppError::internal("QR content must not be empty"));
    }
    Ok(STANDARD.encode(content.as_bytes()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn url_normalizes_trailing_slash() {
        assert_eq!(
            confirm_url("http://edge.local/", "abc-123"),
            "http://edge.local/confirm-kanban/abc-123"
        );
    }

    #[test]
    fn payload_round_trips() {
        let payload = generate("http://edge.local/confirm-kanban/abc-123").unwrap();
        let decoded = STANDARD.decode(payload).unwrap();
        assert_eq!(decoded, b"http://edge.local/confirm-kanban/abc-123");
    }

    #[test]
    fn empty_content_is_fatal() {
        assert!(generate("").is_err());
    }
}
