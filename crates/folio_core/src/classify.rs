use std::fmt;

/// Payloads shorter than this are treated as error pages served with status 200.
pub const DEFAULT_MIN_PAYLOAD_BYTES: u64 = 5000;

/// What the engine learned about one HTTP response.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResponseSummary {
    pub status: u16,
    pub content_type: Option<String>,
    pub byte_len: u64,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Classification {
    Success,
    Failed(FailureReason),
}

impl Classification {
    pub fn is_success(&self) -> bool {
        matches!(self, Classification::Success)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FailureReason {
    /// Connection, DNS or timeout failure before a status was received.
    Transport(String),
    /// No request was made: the filename does not form a valid url.
    InvalidUrl(String),
    HttpStatus(u16),
    /// Status 200, but HTML or an undersized body: usually an expired session.
    SuspectPayload {
        content_type: Option<String>,
        byte_len: u64,
    },
    /// The payload was valid but could not be written to disk.
    Persist(String),
}

impl FailureReason {
    /// Suspect payloads are kept on disk for inspection.
    pub fn keeps_debug_payload(&self) -> bool {
        matches!(self, FailureReason::SuspectPayload { .. })
    }
}

impl fmt::Display for FailureReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FailureReason::Transport(message) => write!(f, "transport error: {message}"),
            FailureReason::InvalidUrl(message) => write!(f, "invalid url: {message}"),
            FailureReason::HttpStatus(code) => write!(f, "http status {code}"),
            FailureReason::SuspectPayload {
                content_type,
                byte_len,
            } => write!(
                f,
                "possible error page ({byte_len} bytes, type: {})",
                content_type.as_deref().unwrap_or("unknown")
            ),
            FailureReason::Persist(message) => write!(f, "could not save payload: {message}"),
        }
    }
}

pub fn classify(response: &ResponseSummary, min_payload_bytes: u64) -> Classification {
    if response.status != 200 {
        return Classification::Failed(FailureReason::HttpStatus(response.status));
    }

    let is_html = response
        .content_type
        .as_deref()
        .is_some_and(|ct| ct.to_ascii_lowercase().contains("text/html"));
    if is_html || response.byte_len < min_payload_bytes {
        return Classification::Failed(FailureReason::SuspectPayload {
            content_type: response.content_type.clone(),
            byte_len: response.byte_len,
        });
    }

    Classification::Success
}

#[cfg(test)]
mod tests {
    use super::*;

    fn summary(status: u16, content_type: Option<&str>, byte_len: u64) -> ResponseSummary {
        ResponseSummary {
            status,
            content_type: content_type.map(str::to_string),
            byte_len,
        }
    }

    #[test]
    fn threshold_is_inclusive() {
        let at = summary(200, Some("image/jpeg"), DEFAULT_MIN_PAYLOAD_BYTES);
        let below = summary(200, Some("image/jpeg"), DEFAULT_MIN_PAYLOAD_BYTES - 1);
        assert!(classify(&at, DEFAULT_MIN_PAYLOAD_BYTES).is_success());
        assert!(!classify(&below, DEFAULT_MIN_PAYLOAD_BYTES).is_success());
    }

    #[test]
    fn html_is_suspect_regardless_of_size() {
        let page = summary(200, Some("Text/HTML; charset=utf-8"), 1_000_000);
        let result = classify(&page, DEFAULT_MIN_PAYLOAD_BYTES);
        assert!(matches!(
            result,
            Classification::Failed(FailureReason::SuspectPayload { byte_len: 1_000_000, .. })
        ));
    }

    #[test]
    fn non_200_is_http_failure() {
        let redirect = summary(302, Some("image/jpeg"), 90_000);
        assert_eq!(
            classify(&redirect, DEFAULT_MIN_PAYLOAD_BYTES),
            Classification::Failed(FailureReason::HttpStatus(302))
        );
        assert!(!FailureReason::HttpStatus(302).keeps_debug_payload());
    }

    #[test]
    fn missing_content_type_falls_back_to_size() {
        let page = summary(200, None, 12_000);
        assert!(classify(&page, DEFAULT_MIN_PAYLOAD_BYTES).is_success());
    }
}
