use std::path::PathBuf;
use std::sync::Arc;
use std::thread::{self, JoinHandle};

use blockhost_logging::{bh_error, bh_info};

use crate::fetch::{FetchSettings, Fetcher, ReqwestFetcher};
use crate::merge::{FetchMergeJob, MergeError};
use crate::progress::ProgressSink;
use crate::EngineEvent;

/// Starts fetch-merge jobs on a dedicated worker thread each.
///
/// The handle does not serialise jobs itself: callers start at most one at
/// a time and wait for its `Completed`/`Failed` event.
#[derive(Clone)]
pub struct EngineHandle {
    fetcher: Arc<dyn Fetcher>,
    sink: Arc<dyn ProgressSink>,
    temp_dir: Option<PathBuf>,
}

impl EngineHandle {
    pub fn new(settings: FetchSettings, sink: Arc<dyn ProgressSink>) -> Self {
        Self::with_fetcher(Arc::new(ReqwestFetcher::new(settings)), sink)
    }

    pub fn with_fetcher(fetcher: Arc<dyn Fetcher>, sink: Arc<dyn ProgressSink>) -> Self {
        Self {
            fetcher,
            sink,
            temp_dir: None,
        }
    }

    pub fn with_temp_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.temp_dir = Some(dir.into());
        self
    }

    /// Validates `urls` and spawns the worker. An empty list fails here,
    /// without spawning a thread or emitting any event.
    pub fn start(
        &self,
        urls: Vec<String>,
        destination: PathBuf,
    ) -> Result<JoinHandle<()>, MergeError> {
        let mut job = FetchMergeJob::new(urls, destination)?;
        if let Some(dir) = &self.temp_dir {
            job = job.with_temp_dir(dir.clone());
        }

        let fetcher = self.fetcher.clone();
        let sink = self.sink.clone();
        let handle = thread::Builder::new()
            .name("blockhost-fetch".to_string())
            .spawn(move || run_job(job, fetcher.as_ref(), sink.as_ref()))
            .map_err(MergeError::Worker)?;
        Ok(handle)
    }
}

fn run_job(job: FetchMergeJob, fetcher: &dyn Fetcher, sink: &dyn ProgressSink) {
    let runtime = match tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
    {
        Ok(runtime) => runtime,
        Err(err) => {
            bh_error!("Failed to start job runtime: {}", err);
            sink.emit(EngineEvent::Failed {
                message: format!("could not start download runtime: {err}"),
            });
            return;
        }
    };

    match runtime.block_on(job.run(fetcher, sink)) {
        Ok(destination) => {
            bh_info!("Job completed: {:?}", destination);
            sink.emit(EngineEvent::Completed { destination });
        }
        Err(err) => {
            bh_error!("Job failed: {}", err);
            sink.emit(EngineEvent::Failed {
                message: err.to_string(),
            });
        }
    }
}
