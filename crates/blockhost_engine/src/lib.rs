//! BlockHost engine: downloads, temp files and the fetch-merge job.
mod engine;
mod fetch;
mod merge;
mod persist;
mod progress;
mod types;

pub use engine::EngineHandle;
pub use fetch::{FetchSettings, Fetcher, ReqwestFetcher, Transfer};
pub use merge::{FetchMergeJob, MergeError};
pub use persist::{ensure_output_dir, AtomicFileWriter, PersistError};
pub use progress::{ChannelProgressSink, ProgressAccumulator, ProgressSink};
pub use types::{EngineEvent, FailureKind, FetchError};
