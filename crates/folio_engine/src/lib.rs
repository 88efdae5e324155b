//! Folio engine: authenticated page fetching, persistence and the batch loop.
mod engine;
mod fetch;
mod persist;
mod sink;
mod types;

pub use engine::{
    BatchEngine, EngineError, EngineSettings, ProbeFailure, ProbeOutcome, PROBE_DEBUG_FILENAME,
};
pub use fetch::{FetchSettings, PageFetcher, ReqwestFetcher};
pub use persist::{ensure_output_dir, PageWriter, PersistError};
pub use sink::{ChannelProgressSink, NullSink, ProgressSink};
pub use types::{
    BatchReport, EngineEvent, FailureKind, FetchError, FetchOutput, StopReason, VariantOutcome,
};
