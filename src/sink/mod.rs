pub mod file;
pub mod memory;
pub mod verify;

pub use file::FileSink;
pub use memory::MemorySink;
pub use verify::{SinkComparison, compare_sinks};

use std::io;
use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum SinkError {
    #[error("unable to open sink {}: {source}", .path.display())]
    Open {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("unable to write to sink {sink}: {source}")]
    Write {
        sink: String,
        #[source]
        source: io::Error,
    },
}

/// Append-only destination for chunks leaving one side of the ring.
pub trait ChunkSink: Send {
    fn persist(&mut self, chunk: &[u8]) -> Result<(), SinkError>;

    fn flush(&mut self) -> Result<(), SinkError> {
        Ok(())
    }

    fn name(&self) -> &str;
}

impl<S: ChunkSink + ?Sized> ChunkSink for Box<S> {
    fn persist(&mut self, chunk: &[u8]) -> Result<(), SinkError> {
        (**self).persist(chunk)
    }

    fn flush(&mut self) -> Result<(), SinkError> {
        (**self).flush()
    }

    fn name(&self) -> &str {
        (**self).name()
    }
}
