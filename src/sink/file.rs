use super::{ChunkSink, SinkError};
use std::fs::{File, OpenOptions};
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use tracing::error;

/// Something that can be cut back to an earlier length.
pub(crate) trait Truncate {
    fn truncate_to(&mut self, len: u64) -> io::Result<()>;
}

impl Truncate for File {
    fn truncate_to(&mut self, len: u64) -> io::Result<()> {
        self.set_len(len)
    }
}

/// Writes the whole chunk or, on failure, cuts `out` back to `start_len` so a
/// retry cannot duplicate a partially written prefix.
pub(crate) fn append_or_rollback<W>(out: &mut W, start_len: u64, chunk: &[u8]) -> io::Result<()>
where
    W: Write + Truncate,
{
    let Err(e) = out.write_all(chunk) else {
        return Ok(());
    };
    if let Err(rollback) = out.truncate_to(start_len) {
        error!(error = %rollback, start_len, "unable to roll back partial chunk");
    }
    Err(e)
}

/// Appends every chunk to a file, opening and closing it per chunk.
///
/// No delimiter is written between chunks.
pub struct FileSink {
    path: PathBuf,
    name: String,
}

impl FileSink {
    /// Appends to whatever the file already holds.
    pub fn append_to<P: AsRef<Path>>(path: P) -> Self {
        let path = path.as_ref().to_path_buf();
        let name = path.display().to_string();
        Self { path, name }
    }

    /// Truncates (or creates) the file before use.
    pub fn create<P: AsRef<Path>>(path: P) -> io::Result<Self> {
        File::create(path.as_ref())?;
        Ok(Self::append_to(path))
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl ChunkSink for FileSink {
    fn persist(&mut self, chunk: &[u8]) -> Result<(), SinkError> {
        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)
            .map_err(|source| SinkError::Open {
                path: self.path.clone(),
                source,
            })?;

        let start_len = file
            .metadata()
            .map_err(|source| SinkError::Write {
                sink: self.name.clone(),
                source,
            })?
            .len();

        append_or_rollback(&mut file, start_len, chunk).map_err(|source| SinkError::Write {
            sink: self.name.clone(),
            source,
        })
    }

    /// Each chunk is written through its own handle; flushing syncs the file
    /// to disk once at shutdown.
    fn flush(&mut self) -> Result<(), SinkError> {
        let file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)
            .map_err(|source| SinkError::Open {
                path: self.path.clone(),
                source,
            })?;

        file.sync_data().map_err(|source| SinkError::Write {
            sink: self.name.clone(),
            source,
        })
    }

    fn name(&self) -> &str {
        &self.name
    }
}
