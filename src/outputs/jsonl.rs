//! JSON Lines record sink.
//!
//! Every accepted [`Record`] becomes one line of compact JSON. The sink is
//! owned by a single task; concurrent workers hand their results back to
//! that task instead of writing themselves.

use crate::errors::PipelineError;
use crate::models::Record;
use std::path::{Path, PathBuf};
use tokio::fs::File;
use tokio::io::{AsyncWrite, AsyncWriteExt, BufWriter};
use tracing::{info, instrument};

/// Serializes records to a JSONL stream and counts them.
#[derive(Debug)]
pub struct JsonlSink<W> {
    writer: W,
    path: PathBuf,
    written: usize,
}

impl JsonlSink<BufWriter<File>> {
    /// Create (or truncate) the output file at `path`.
    #[instrument(level = "info", skip_all, fields(path = %path.display()))]
    pub async fn create(path: &Path) -> Result<Self, PipelineError> {
        let file = File::create(path).await.map_err(|source| PipelineError::Sink {
            path: path.to_path_buf(),
            source,
        })?;
        info!("Opened output file");
        Ok(Self::new(BufWriter::new(file), path))
    }
}

impl<W: AsyncWrite + Unpin> JsonlSink<W> {
    /// Wrap any async writer; `path` is only used in error reports.
    pub fn new(writer: W, path: impl Into<PathBuf>) -> Self {
        Self {
            writer,
            path: path.into(),
            written: 0,
        }
    }

    /// Append one record as a JSON line.
    pub async fn write(&mut self, record: &Record) -> Result<(), PipelineError> {
        let mut line = serde_json::to_vec(record)?;
        line.push(b'\n');
        self.writer
            .write_all(&line)
            .await
            .map_err(|source| self.sink_error(source))?;
        self.written += 1;
        Ok(())
    }

    /// Records written so far.
    pub fn written(&self) -> usize {
        self.written
    }

    /// Flush buffered output and hand back the writer.
    pub async fn finish(mut self) -> Result<W, PipelineError> {
        self.writer
            .flush()
            .await
            .map_err(|source| self.sink_error(source))?;
        Ok(self.writer)
    }

    fn sink_error(&self, source: std::io::Error) -> PipelineError {
        PipelineError::Sink {
            path: self.path.clone(),
            source,
        }
    }
}
