use std::fmt;
use std::ops::RangeInclusive;
use std::path::{Path, PathBuf};

use thiserror::Error;
use url::Url;

use crate::{pad_number, FilenamePattern};

/// Stand-in upper bound used when the caller asks to download "until failures".
pub const UNBOUNDED_END_PAGE: u32 = 9999;
/// End-page value that callers use to mean "until failures".
pub const END_PAGE_SENTINEL: i64 = -1;

// Captured from a browser session against the archive. They expire.
const DEFAULT_SESSION_ID: &str = "D810FC33786200A9C5444EA15BB6DC83";
const DEFAULT_ACCESS_TOKEN: &str = "U1VMOlVMMDQ1NzM3OlNVTFJEUgAAAABnw-b6.Seux4wOrbJ35AfjgtP1a6g";

pub const SESSION_COOKIE: &str = "JSESSIONID";
pub const ACCESS_TOKEN_COOKIE: &str = "dspacc";

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigError {
    #[error("invalid base url `{url}`: {reason}")]
    InvalidBaseUrl { url: String, reason: String },
    #[error("end page {0} is negative (use -1 to download until failures)")]
    NegativeEndPage(i64),
    #[error("page number {0} is out of range")]
    PageOutOfRange(i64),
    #[error("cannot resolve `{filename}` against the base url: {reason}")]
    Resolve { filename: String, reason: String },
}

/// Session cookies sent with every request.
#[derive(Clone, PartialEq, Eq)]
pub struct Credentials {
    pub session_id: String,
    pub access_token: String,
}

impl Credentials {
    pub fn new(session_id: impl Into<String>, access_token: impl Into<String>) -> Self {
        Self {
            session_id: session_id.into(),
            access_token: access_token.into(),
        }
    }

    /// Fills in the built-in value for each credential the caller left out.
    pub fn or_defaults(session_id: Option<String>, access_token: Option<String>) -> Self {
        let defaults = Self::default();
        Self {
            session_id: session_id
                .filter(|value| !value.trim().is_empty())
                .unwrap_or(defaults.session_id),
            access_token: access_token
                .filter(|value| !value.trim().is_empty())
                .unwrap_or(defaults.access_token),
        }
    }

    pub fn is_default(&self) -> bool {
        *self == Self::default()
    }

    /// Cookie name/value pairs in the order they are seeded into a session.
    pub fn cookies(&self) -> [(&'static str, &str); 2] {
        [
            (SESSION_COOKIE, &self.session_id),
            (ACCESS_TOKEN_COOKIE, &self.access_token),
        ]
    }
}

impl Default for Credentials {
    fn default() -> Self {
        Self::new(DEFAULT_SESSION_ID, DEFAULT_ACCESS_TOKEN)
    }
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("session_id", &redact(&self.session_id))
            .field("access_token", &redact(&self.access_token))
            .finish()
    }
}

fn redact(value: &str) -> String {
    let shown: String = value.chars().take(4).collect();
    format!("{shown}…")
}

/// Fully resolved input for one batch run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DownloadConfig {
    base_url: Url,
    pattern: FilenamePattern,
    prefix: String,
    suffixes: Vec<String>,
    start_page: u32,
    end_page: u32,
    output_dir: PathBuf,
    credentials: Credentials,
}

impl DownloadConfig {
    /// A trailing `/` is appended to `base_url` when missing so filenames
    /// resolve inside the directory rather than replacing its last segment.
    pub fn new(
        base_url: &str,
        pattern: FilenamePattern,
        prefix: impl Into<String>,
        output_dir: impl Into<PathBuf>,
    ) -> Result<Self, ConfigError> {
        Ok(Self {
            base_url: parse_base_url(base_url)?,
            pattern,
            prefix: prefix.into(),
            suffixes: vec![String::new()],
            start_page: 1,
            end_page: 1,
            output_dir: output_dir.into(),
            credentials: Credentials::default(),
        })
    }

    /// An empty list means a single empty suffix.
    pub fn with_suffixes<I, S>(mut self, suffixes: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.suffixes = suffixes.into_iter().map(Into::into).collect();
        if self.suffixes.is_empty() {
            self.suffixes.push(String::new());
        }
        self
    }

    pub fn with_pages(mut self, start_page: u32, end_page: u32) -> Self {
        self.start_page = start_page;
        self.end_page = end_page;
        self
    }

    pub fn with_credentials(mut self, credentials: Credentials) -> Self {
        self.credentials = credentials;
        self
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    pub fn pattern(&self) -> &FilenamePattern {
        &self.pattern
    }

    pub fn prefix(&self) -> &str {
        &self.prefix
    }

    pub fn suffixes(&self) -> &[String] {
        &self.suffixes
    }

    pub fn start_page(&self) -> u32 {
        self.start_page
    }

    pub fn end_page(&self) -> u32 {
        self.end_page
    }

    pub fn output_dir(&self) -> &Path {
        &self.output_dir
    }

    pub fn credentials(&self) -> &Credentials {
        &self.credentials
    }

    /// Inclusive page range; empty when `start_page > end_page`.
    pub fn pages(&self) -> RangeInclusive<u32> {
        self.start_page..=self.end_page
    }

    pub fn filename(&self, page: u32, suffix: &str) -> String {
        self.pattern.render(&self.prefix, page, suffix)
    }

    /// Filename requested by the pre-flight probe.
    pub fn probe_filename(&self) -> String {
        let suffix = self.suffixes.first().map(String::as_str).unwrap_or("");
        self.filename(self.start_page, suffix)
    }

    /// Name under which a suspect payload for `(page, suffix)` is kept.
    pub fn debug_filename(&self, page: u32, suffix: &str) -> String {
        let number = pad_number(page, self.pattern.number_width());
        format!("debug_{number}{suffix}.html")
    }

    /// Filenames of the first page, one per suffix.
    pub fn example_filenames(&self) -> Vec<String> {
        self.suffixes
            .iter()
            .map(|suffix| self.filename(self.start_page, suffix))
            .collect()
    }

    pub fn resolve(&self, filename: &str) -> Result<Url, ConfigError> {
        self.base_url
            .join(filename)
            .map_err(|err| ConfigError::Resolve {
                filename: filename.to_string(),
                reason: err.to_string(),
            })
    }

    /// True when the end page is the "until failures" stand-in.
    pub fn is_open_ended(&self) -> bool {
        self.end_page == UNBOUNDED_END_PAGE
    }
}

/// Maps the user-facing end page to the engine's bound; `-1` means "until failures".
pub fn resolve_end_page(end_page: i64) -> Result<u32, ConfigError> {
    match end_page {
        END_PAGE_SENTINEL => Ok(UNBOUNDED_END_PAGE),
        value if value < 0 => Err(ConfigError::NegativeEndPage(value)),
        value => u32::try_from(value).map_err(|_| ConfigError::PageOutOfRange(value)),
    }
}

fn parse_base_url(raw: &str) -> Result<Url, ConfigError> {
    let invalid = |reason: String| ConfigError::InvalidBaseUrl {
        url: raw.to_string(),
        reason,
    };
    let trimmed = raw.trim();
    let with_slash = if trimmed.ends_with('/') {
        trimmed.to_string()
    } else {
        format!("{trimmed}/")
    };
    let url = Url::parse(&with_slash).map_err(|err| invalid(err.to_string()))?;
    match url.scheme() {
        "http" | "https" => Ok(url),
        other => Err(invalid(format!("unsupported scheme `{other}`"))),
    }
}
