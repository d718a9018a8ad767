use super::{ChunkSink, SinkError};
use std::sync::{Arc, Mutex, PoisonError};

/// In-memory sink. Clones share the same byte stream.
#[derive(Debug, Clone, Default)]
pub struct MemorySink {
    bytes: Arc<Mutex<Vec<u8>>>,
    chunks: Arc<Mutex<usize>>,
}

impl MemorySink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn contents(&self) -> Vec<u8> {
        self.bytes
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    pub fn chunk_count(&self) -> usize {
        *self.chunks.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl ChunkSink for MemorySink {
    fn persist(&mut self, chunk: &[u8]) -> Result<(), SinkError> {
        self.bytes
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .extend_from_slice(chunk);
        *self.chunks.lock().unwrap_or_else(PoisonError::into_inner) += 1;
        Ok(())
    }

    fn name(&self) -> &str {
        "memory"
    }
}
