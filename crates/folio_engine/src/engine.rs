use std::path::PathBuf;
use std::sync::Arc;
use std::time::{Duration, Instant};

use folio_core::{
    classify, Classification, DownloadConfig, FailureReason, PageTally, PageVerdict, RunState,
    DEFAULT_FAILURE_THRESHOLD, DEFAULT_MIN_PAYLOAD_BYTES,
};
use folio_logging::{folio_debug, folio_error, folio_info, folio_warn};
use thiserror::Error;
use url::Url;

use crate::fetch::{FetchSettings, PageFetcher, ReqwestFetcher};
use crate::persist::PageWriter;
use crate::{
    BatchReport, EngineEvent, FetchError, FetchOutput, ProgressSink, StopReason, VariantOutcome,
};

/// Where a failed pre-flight probe keeps the payload it received.
pub const PROBE_DEBUG_FILENAME: &str = "debug_test.html";

#[derive(Debug, Clone)]
pub struct EngineSettings {
    pub fetch: FetchSettings,
    /// Pause after every successful download.
    pub success_delay: Duration,
    pub min_payload_bytes: u64,
    pub failure_threshold: u32,
    /// Pages between progress reports; 0 disables them.
    pub progress_interval: u32,
}

impl Default for EngineSettings {
    fn default() -> Self {
        Self {
            fetch: FetchSettings::default(),
            success_delay: Duration::from_millis(500),
            min_payload_bytes: DEFAULT_MIN_PAYLOAD_BYTES,
            failure_threshold: DEFAULT_FAILURE_THRESHOLD,
            progress_interval: 10,
        }
    }
}

#[derive(Debug, Error)]
pub enum EngineError {
    #[error("output directory {0:?} does not exist")]
    MissingOutputDir(PathBuf),
    #[error("could not open http session: {0}")]
    Session(#[from] FetchError),
}

/// Why the pre-flight probe did not see a valid page.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProbeFailure {
    pub filename: String,
    pub url: String,
    pub reason: FailureReason,
    pub debug_path: Option<PathBuf>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProbeOutcome {
    Passed {
        filename: String,
        path: PathBuf,
        byte_len: u64,
        content_type: Option<String>,
    },
    /// The caller decides whether to run the batch anyway.
    NeedsConfirmation(ProbeFailure),
}

impl ProbeOutcome {
    pub fn needs_confirmation(&self) -> bool {
        matches!(self, ProbeOutcome::NeedsConfirmation(_))
    }
}

/// Downloads one configured page range, strictly one request at a time.
///
/// The HTTP session lives as long as the engine. `run` consumes it, and an
/// aborted batch releases it by dropping the engine.
pub struct BatchEngine {
    config: DownloadConfig,
    settings: EngineSettings,
    fetcher: Arc<dyn PageFetcher>,
    writer: PageWriter,
}

impl BatchEngine {
    pub fn new(config: DownloadConfig, settings: EngineSettings) -> Result<Self, EngineError> {
        let fetcher = ReqwestFetcher::new(
            settings.fetch.clone(),
            config.credentials(),
            config.base_url(),
        )?;
        Self::with_fetcher(config, settings, Arc::new(fetcher))
    }

    pub fn with_fetcher(
        config: DownloadConfig,
        settings: EngineSettings,
        fetcher: Arc<dyn PageFetcher>,
    ) -> Result<Self, EngineError> {
        if !config.output_dir().is_dir() {
            return Err(EngineError::MissingOutputDir(
                config.output_dir().to_path_buf(),
            ));
        }
        let writer = PageWriter::new(config.output_dir().to_path_buf());
        Ok(Self {
            config,
            settings,
            fetcher,
            writer,
        })
    }

    pub fn config(&self) -> &DownloadConfig {
        &self.config
    }

    pub fn log_configuration(&self) {
        let config = &self.config;
        folio_info!("Base URL: {}", config.base_url());
        if config.is_open_ended() {
            folio_info!("Page range: {} until failures", config.start_page());
        } else {
            folio_info!(
                "Page range: {} to {}",
                config.start_page(),
                config.end_page()
            );
        }
        folio_info!("Filename pattern: {}", config.pattern());
        folio_info!("Prefix: {}", config.prefix());
        folio_info!("Suffixes: {}", describe_suffixes(config.suffixes()));
        folio_info!(
            "Using {} authentication cookies",
            if config.credentials().is_default() {
                "default"
            } else {
                "custom"
            }
        );
        folio_info!(
            "Example filenames: {}",
            config.example_filenames().join(", ")
        );
    }

    /// Requests the first page once to check that the session works.
    ///
    /// Never touches batch counters. A passing probe saves the page under
    /// its normal filename.
    pub async fn probe(&self) -> ProbeOutcome {
        let filename = self.config.probe_filename();
        let url = match self.config.resolve(&filename) {
            Ok(url) => url,
            Err(err) => {
                return ProbeOutcome::NeedsConfirmation(ProbeFailure {
                    url: filename.clone(),
                    filename,
                    reason: FailureReason::InvalidUrl(err.to_string()),
                    debug_path: None,
                })
            }
        };
        folio_info!("Testing download of: {}", url);

        let output = match self.fetcher.fetch(&url).await {
            Ok(output) => output,
            Err(err) => {
                folio_error!("Test connection failed with error: {}", err);
                return ProbeOutcome::NeedsConfirmation(ProbeFailure {
                    filename,
                    url: url.to_string(),
                    reason: FailureReason::Transport(err.to_string()),
                    debug_path: None,
                });
            }
        };

        let summary = output.summary();
        let reason = match classify(&summary, self.settings.min_payload_bytes) {
            Classification::Success => match self.writer.write(&filename, &output.bytes) {
                Ok(path) => {
                    folio_info!(
                        "Test successful, authentication is working ({} bytes, type: {})",
                        summary.byte_len,
                        summary.content_type.as_deref().unwrap_or("unknown")
                    );
                    return ProbeOutcome::Passed {
                        filename,
                        path,
                        byte_len: summary.byte_len,
                        content_type: summary.content_type,
                    };
                }
                Err(err) => FailureReason::Persist(err.to_string()),
            },
            Classification::Failed(reason) => reason,
        };

        folio_error!("Test failed: {}", reason);
        log_redirect(&output, &url);
        let debug_path = if reason.keeps_debug_payload() {
            self.keep_debug_payload(PROBE_DEBUG_FILENAME, &output.bytes)
        } else {
            None
        };
        ProbeOutcome::NeedsConfirmation(ProbeFailure {
            filename,
            url: url.to_string(),
            reason,
            debug_path,
        })
    }

    /// Runs the page loop to the end of the range or until the consecutive
    /// failure threshold trips. Per-request failures never abort the batch.
    pub async fn run(self, sink: &dyn ProgressSink) -> BatchReport {
        let started = Instant::now();
        let mut state = RunState::new();
        let mut stop_reason = StopReason::RangeExhausted;
        folio_info!("Starting batch download");

        for page in self.config.pages() {
            let mut tally = PageTally::default();
            for suffix in self.config.suffixes() {
                let filename = self.config.filename(page, suffix);
                let outcome = self.download_variant(page, suffix, &filename).await;
                let succeeded = outcome.is_success();
                state.record_variant(&mut tally, succeeded);
                sink.emit(EngineEvent::VariantCompleted {
                    page,
                    suffix: suffix.clone(),
                    filename,
                    outcome,
                });

                if succeeded && !self.settings.success_delay.is_zero() {
                    tokio::time::sleep(self.settings.success_delay).await;
                }
            }

            let verdict = state.finish_page(tally, self.settings.failure_threshold);
            if let PageVerdict::AllVariantsFailed { consecutive }
            | PageVerdict::ThresholdExceeded { consecutive } = verdict
            {
                folio_warn!(
                    "All variations of page {} failed. Consecutive page failures: {}",
                    page,
                    consecutive
                );
                sink.emit(EngineEvent::PageExhausted {
                    page,
                    consecutive_failures: consecutive,
                });
            }
            if verdict.should_stop() {
                folio_warn!("Multiple consecutive page failures, stopping download");
                stop_reason = StopReason::FailureThreshold;
                break;
            }

            if state.progress_due(self.settings.progress_interval) {
                let elapsed = started.elapsed();
                let pages_per_minute = pages_per_minute(state.pages_processed(), elapsed);
                folio_info!(
                    "Progress: processed {} pages ({:.1} pages/min)",
                    state.pages_processed(),
                    pages_per_minute
                );
                sink.emit(EngineEvent::Progress {
                    pages_processed: state.pages_processed(),
                    elapsed,
                    pages_per_minute,
                });
            }
        }

        let report = BatchReport {
            success_count: state.success_count(),
            failure_count: state.failure_count(),
            consecutive_page_failures: state.consecutive_page_failures(),
            pages_processed: state.pages_processed(),
            elapsed: started.elapsed(),
            stop_reason,
            output_dir: self.config.output_dir().to_path_buf(),
        };
        log_summary(&report);
        sink.emit(EngineEvent::Stopped {
            reason: stop_reason,
        });
        report
    }

    async fn download_variant(&self, page: u32, suffix: &str, filename: &str) -> VariantOutcome {
        let url = match self.config.resolve(filename) {
            Ok(url) => url,
            Err(err) => {
                folio_error!("Cannot build url for {}: {}", filename, err);
                return VariantOutcome::Failed {
                    reason: FailureReason::InvalidUrl(err.to_string()),
                    debug_path: None,
                };
            }
        };
        folio_debug!("Downloading: {}", url);

        let output = match self.fetcher.fetch(&url).await {
            Ok(output) => output,
            Err(err) => {
                folio_error!("Error downloading {}: {}", filename, err);
                return VariantOutcome::Failed {
                    reason: FailureReason::Transport(err.to_string()),
                    debug_path: None,
                };
            }
        };

        let reason = match classify(&output.summary(), self.settings.min_payload_bytes) {
            Classification::Success => match self.writer.write(filename, &output.bytes) {
                Ok(path) => {
                    folio_info!("Downloaded: {} ({} bytes)", filename, output.bytes.len());
                    return VariantOutcome::Saved {
                        path,
                        byte_len: output.bytes.len() as u64,
                    };
                }
                Err(err) => FailureReason::Persist(err.to_string()),
            },
            Classification::Failed(reason) => reason,
        };

        log_redirect(&output, &url);
        let debug_path = if reason.keeps_debug_payload() {
            folio_warn!("Received {} for {}", reason, filename);
            let debug_name = self.config.debug_filename(page, suffix);
            self.keep_debug_payload(&debug_name, &output.bytes)
        } else {
            folio_error!("Failed to download {}: {}", filename, reason);
            None
        };
        VariantOutcome::Failed { reason, debug_path }
    }

    fn keep_debug_payload(&self, debug_name: &str, bytes: &[u8]) -> Option<PathBuf> {
        match self.writer.write(debug_name, bytes) {
            Ok(path) => {
                folio_info!("Saved error content to: {:?}", path);
                Some(path)
            }
            Err(err) => {
                folio_error!("Could not save error content to {}: {}", debug_name, err);
                None
            }
        }
    }
}

fn log_redirect(output: &FetchOutput, requested: &Url) {
    if let Some(target) = output.redirect_target(requested) {
        folio_warn!("Request for {} was redirected to {}", requested, target);
    }
}

fn describe_suffixes(suffixes: &[String]) -> String {
    if suffixes.iter().all(String::is_empty) {
        "[none]".to_string()
    } else {
        suffixes.join(", ")
    }
}

fn pages_per_minute(pages: u32, elapsed: Duration) -> f64 {
    let secs = elapsed.as_secs_f64();
    if secs <= f64::EPSILON {
        return 0.0;
    }
    f64::from(pages) / secs * 60.0
}

fn log_summary(report: &BatchReport) {
    let secs = report.elapsed.as_secs();
    folio_info!("Download complete");
    folio_info!("Successfully downloaded: {} files", report.success_count);
    folio_info!("Failed downloads: {}", report.failure_count);
    folio_info!("Time taken: {} minutes, {} seconds", secs / 60, secs % 60);
    folio_info!("Files saved to: {:?}", report.output_dir);
    if report.credentials_likely_expired() {
        folio_warn!("No pages were downloaded; the authentication cookies have probably expired");
    }
}
