//! Folio core: filename templates, response classification and run state.
//!
//! Nothing in this crate performs I/O.
mod classify;
mod config;
mod pattern;
mod state;

pub use classify::{
    classify, Classification, FailureReason, ResponseSummary, DEFAULT_MIN_PAYLOAD_BYTES,
};
pub use config::{
    resolve_end_page, ConfigError, Credentials, DownloadConfig, ACCESS_TOKEN_COOKIE,
    END_PAGE_SENTINEL, SESSION_COOKIE, UNBOUNDED_END_PAGE,
};
pub use pattern::{pad_number, FilenamePattern, PatternError, Segment, DEFAULT_NUMBER_WIDTH};
pub use state::{PageTally, PageVerdict, RunState, DEFAULT_FAILURE_THRESHOLD};
