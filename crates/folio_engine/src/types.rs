use std::fmt;
use std::path::PathBuf;
use std::time::Duration;

use folio_core::FailureReason;
use url::Url;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchOutput {
    pub status: u16,
    pub content_type: Option<String>,
    /// Body bytes; left empty for non-200 responses.
    pub bytes: Vec<u8>,
    /// Url the response came from after redirects.
    pub final_url: String,
}

impl FetchOutput {
    pub fn summary(&self) -> folio_core::ResponseSummary {
        folio_core::ResponseSummary {
            status: self.status,
            content_type: self.content_type.clone(),
            byte_len: self.bytes.len() as u64,
        }
    }

    /// The url a redirect ended on, when it differs from `requested`.
    /// Expired sessions are usually bounced to a login page this way.
    pub fn redirect_target(&self, requested: &Url) -> Option<&str> {
        (self.final_url != requested.as_str()).then_some(self.final_url.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{kind}: {message}")]
pub struct FetchError {
    pub kind: FailureKind,
    pub message: String,
}

impl FetchError {
    pub(crate) fn new(kind: FailureKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FailureKind {
    InvalidUrl,
    /// Credentials that are not valid cookie values.
    InvalidCredentials,
    Timeout,
    TooLarge { max_bytes: u64, actual: Option<u64> },
    Network,
}

impl fmt::Display for FailureKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FailureKind::InvalidUrl => write!(f, "invalid url"),
            FailureKind::InvalidCredentials => write!(f, "invalid credentials"),
            FailureKind::Timeout => write!(f, "timeout"),
            FailureKind::TooLarge { max_bytes, actual } => {
                write!(f, "response too large (max {max_bytes}, actual {actual:?})")
            }
            FailureKind::Network => write!(f, "network error"),
        }
    }
}

/// Result of one (page, suffix) attempt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum VariantOutcome {
    Saved { path: PathBuf, byte_len: u64 },
    Failed {
        reason: FailureReason,
        /// Where the suspect payload was kept, if it was.
        debug_path: Option<PathBuf>,
    },
}

impl VariantOutcome {
    pub fn is_success(&self) -> bool {
        matches!(self, VariantOutcome::Saved { .. })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StopReason {
    /// Every page in the range was attempted.
    RangeExhausted,
    /// Too many pages in a row failed for every suffix.
    FailureThreshold,
}

#[derive(Debug, Clone, PartialEq)]
pub enum EngineEvent {
    VariantCompleted {
        page: u32,
        suffix: String,
        filename: String,
        outcome: VariantOutcome,
    },
    PageExhausted {
        page: u32,
        consecutive_failures: u32,
    },
    Progress {
        pages_processed: u32,
        elapsed: Duration,
        pages_per_minute: f64,
    },
    Stopped {
        reason: StopReason,
    },
}

/// Totals for one finished batch.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BatchReport {
    pub success_count: u64,
    pub failure_count: u64,
    pub consecutive_page_failures: u32,
    pub pages_processed: u32,
    pub elapsed: Duration,
    pub stop_reason: StopReason,
    pub output_dir: PathBuf,
}

impl BatchReport {
    /// Nothing downloaded at all usually means the session cookies expired.
    pub fn credentials_likely_expired(&self) -> bool {
        self.success_count == 0
    }
}
