use std::io::{self, Seek, SeekFrom, Write};
use std::path::PathBuf;

use blockhost_logging::{bh_debug, bh_info, bh_warn};
use tempfile::NamedTempFile;
use thiserror::Error;

use crate::fetch::Fetcher;
use crate::persist::{AtomicFileWriter, PersistError};
use crate::progress::{ProgressAccumulator, ProgressSink};
use crate::{EngineEvent, FetchError};

const SOURCE_SEPARATOR: &[u8] = b"\n";
const TEMP_PREFIX: &str = "blockhost-";

#[derive(Debug, Error)]
pub enum MergeError {
    #[error("no sources selected")]
    Validation,
    #[error("transfer failed for source {index} ({url}): {source}")]
    Transfer {
        /// 1-based position in the job's source list.
        index: usize,
        url: String,
        source: FetchError,
    },
    #[error("temporary file error for source {index}: {source}")]
    TempFile { index: usize, source: io::Error },
    #[error("filesystem error writing destination {}: {source}", path.display())]
    Destination { path: PathBuf, source: PersistError },
    #[error("could not start worker thread: {0}")]
    Worker(#[source] io::Error),
}

/// One fetch-merge run over a snapshot of source URLs.
#[derive(Debug, Clone)]
pub struct FetchMergeJob {
    urls: Vec<String>,
    destination: PathBuf,
    temp_dir: Option<PathBuf>,
}

impl FetchMergeJob {
    /// Rejects an empty source list before any I/O happens.
    pub fn new(urls: Vec<String>, destination: impl Into<PathBuf>) -> Result<Self, MergeError> {
        if urls.is_empty() {
            return Err(MergeError::Validation);
        }
        Ok(Self {
            urls,
            destination: destination.into(),
            temp_dir: None,
        })
    }

    /// Directory for per-source temp files; the platform temp dir otherwise.
    pub fn with_temp_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.temp_dir = Some(dir.into());
        self
    }

    /// Downloads every source in order, then replaces the destination with
    /// their concatenation, each source followed by one newline.
    ///
    /// Temp files are removed on every exit path. On error the destination
    /// is left exactly as it was.
    pub async fn run(
        &self,
        fetcher: &dyn Fetcher,
        sink: &dyn ProgressSink,
    ) -> Result<PathBuf, MergeError> {
        bh_info!(
            "Fetch-merge started: {} source(s) -> {:?}",
            self.urls.len(),
            self.destination
        );
        let mut progress = ProgressAccumulator::new(self.urls.len());
        let mut downloads: Vec<NamedTempFile> = Vec::with_capacity(self.urls.len());

        for (position, url) in self.urls.iter().enumerate() {
            let index = position + 1;
            let mut temp = self.create_temp_file(index)?;
            let received =
                download_source(fetcher, index, url, &mut temp, &mut progress, sink).await?;
            downloads.push(temp);
            sink.emit(EngineEvent::Progress(progress.finish_source()));
            bh_debug!("Source {} done: {} bytes from {}", index, received, url);
        }

        let writer = AtomicFileWriter::new(self.destination.clone());
        let destination = writer
            .write_with(|out| concatenate(&mut downloads, out))
            .map_err(|source| MergeError::Destination {
                path: self.destination.clone(),
                source,
            })?;

        bh_info!("Fetch-merge finished: {:?}", destination);
        Ok(destination)
    }

    fn create_temp_file(&self, index: usize) -> Result<NamedTempFile, MergeError> {
        let mut builder = tempfile::Builder::new();
        builder.prefix(TEMP_PREFIX).suffix(".part");
        let created = match &self.temp_dir {
            Some(dir) => builder.tempfile_in(dir),
            None => builder.tempfile(),
        };
        created.map_err(|source| MergeError::TempFile { index, source })
    }
}

async fn download_source(
    fetcher: &dyn Fetcher,
    index: usize,
    url: &str,
    temp: &mut NamedTempFile,
    progress: &mut ProgressAccumulator,
    sink: &dyn ProgressSink,
) -> Result<u64, MergeError> {
    let transfer_error = |source: FetchError| {
        bh_warn!("Source {} ({}) failed: {}", index, url, source);
        MergeError::Transfer {
            index,
            url: url.to_string(),
            source,
        }
    };

    let mut transfer = fetcher.open(url).await.map_err(transfer_error)?;
    let total = transfer.total_bytes();
    let mut received: u64 = 0;

    while let Some(chunk) = transfer.next_chunk().await.map_err(transfer_error)? {
        temp.write_all(&chunk)
            .map_err(|source| MergeError::TempFile { index, source })?;
        received += chunk.len() as u64;
        if let Some(value) = progress.within_source(received, total) {
            sink.emit(EngineEvent::Progress(value));
        }
    }

    temp.flush()
        .map_err(|source| MergeError::TempFile { index, source })?;
    Ok(received)
}

fn concatenate(downloads: &mut [NamedTempFile], out: &mut dyn Write) -> io::Result<()> {
    for temp in downloads.iter_mut() {
        temp.seek(SeekFrom::Start(0))?;
        io::copy(temp, &mut *out)?;
        out.write_all(SOURCE_SEPARATOR)?;
    }
    Ok(())
}
