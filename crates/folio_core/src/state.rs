/// Early-stop threshold: the batch stops once more than this many pages in a
/// row failed for every suffix.
pub const DEFAULT_FAILURE_THRESHOLD: u32 = 5;

/// Counters for one batch run. A new run always starts from `RunState::new()`.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct RunState {
    success_count: u64,
    failure_count: u64,
    consecutive_page_failures: u32,
    pages_processed: u32,
}

/// Attempts and failures for the suffix variants of a single page.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct PageTally {
    attempted: usize,
    failed: usize,
}

impl PageTally {
    pub fn attempted(&self) -> usize {
        self.attempted
    }

    pub fn failed(&self) -> usize {
        self.failed
    }

    pub fn all_failed(&self) -> bool {
        self.failed == self.attempted
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PageVerdict {
    /// At least one variant succeeded.
    Downloaded,
    /// Every variant failed but the threshold still holds.
    AllVariantsFailed { consecutive: u32 },
    /// Every variant failed and the consecutive count exceeded the threshold.
    ThresholdExceeded { consecutive: u32 },
}

impl PageVerdict {
    pub fn should_stop(&self) -> bool {
        matches!(self, PageVerdict::ThresholdExceeded { .. })
    }
}

impl RunState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn success_count(&self) -> u64 {
        self.success_count
    }

    pub fn failure_count(&self) -> u64 {
        self.failure_count
    }

    pub fn consecutive_page_failures(&self) -> u32 {
        self.consecutive_page_failures
    }

    pub fn pages_processed(&self) -> u32 {
        self.pages_processed
    }

    /// Records the outcome of one (page, suffix) attempt.
    pub fn record_variant(&mut self, tally: &mut PageTally, succeeded: bool) {
        tally.attempted += 1;
        if succeeded {
            self.success_count += 1;
            self.consecutive_page_failures = 0;
        } else {
            self.failure_count += 1;
            tally.failed += 1;
        }
    }

    /// Closes a page once all of its variants were attempted.
    pub fn finish_page(&mut self, tally: PageTally, threshold: u32) -> PageVerdict {
        self.pages_processed += 1;
        if !tally.all_failed() {
            self.consecutive_page_failures = 0;
            return PageVerdict::Downloaded;
        }

        self.consecutive_page_failures += 1;
        let consecutive = self.consecutive_page_failures;
        if consecutive > threshold {
            PageVerdict::ThresholdExceeded { consecutive }
        } else {
            PageVerdict::AllVariantsFailed { consecutive }
        }
    }

    /// True when `pages_processed` just reached a multiple of `interval`.
    pub fn progress_due(&self, interval: u32) -> bool {
        interval > 0 && self.pages_processed > 0 && self.pages_processed % interval == 0
    }
}
