use super::generator::ChunkGenerator;
use crate::ring::{RingError, SharedRing};
use crate::sink::ChunkSink;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, error, info, warn};

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct ProducerStats {
    pub chunks: u64,
    pub bytes: u64,
    pub sink_failures: u64,
}

pub struct Producer<S> {
    ring: Arc<SharedRing>,
    sink: S,
    generator: ChunkGenerator,
    interval: Duration,
    retry_delay: Duration,
    max_cycles: Option<u64>,
}

impl<S: ChunkSink> Producer<S> {
    pub fn new(ring: Arc<SharedRing>, sink: S, generator: ChunkGenerator) -> Self {
        Self {
            ring,
            sink,
            generator,
            interval: Duration::ZERO,
            retry_delay: Duration::ZERO,
            max_cycles: None,
        }
    }

    pub fn with_interval(mut self, interval: Duration) -> Self {
        self.interval = interval;
        self
    }

    pub fn with_retry_delay(mut self, retry_delay: Duration) -> Self {
        self.retry_delay = retry_delay;
        self
    }

    pub fn with_max_cycles(mut self, max_cycles: Option<u64>) -> Self {
        self.max_cycles = max_cycles;
        self
    }

    pub fn run(mut self) -> ProducerStats {
        info!(sink = self.sink.name(), "producer started");
        let mut stats = ProducerStats::default();

        while self.max_cycles.is_none_or(|max| stats.chunks < max) {
            let chunk = self.generator.next_chunk();

            match self.ring.wait_for_space(chunk.len()) {
                Ok(()) => {}
                Err(RingError::Closed) => break,
                Err(e) => {
                    error!(error = %e, "chunk can never be admitted");
                    break;
                }
            }

            if !self.persist(&chunk, &mut stats) {
                break;
            }

            match self.ring.append(&chunk) {
                Ok(occupied) => {
                    stats.chunks += 1;
                    stats.bytes += chunk.len() as u64;
                    debug!(len = chunk.len(), occupied, "appended");
                }
                Err(e) => {
                    error!(error = %e, len = chunk.len(), "append failed after admission");
                    break;
                }
            }

            if !self.ring.pause(self.interval) {
                break;
            }
        }

        self.ring.seal();
        if let Err(e) = self.sink.flush() {
            warn!(error = %e, "generated sink flush failed");
        }
        info!(chunks = stats.chunks, bytes = stats.bytes, "producer stopped");
        stats
    }

    /// Retries until the sink accepts the chunk. Returns `false` if the ring
    /// closes first, in which case the chunk is not appended either.
    fn persist(&mut self, chunk: &[u8], stats: &mut ProducerStats) -> bool {
        loop {
            match self.sink.persist(chunk) {
                Ok(()) => return true,
                Err(e) => {
                    stats.sink_failures += 1;
                    warn!(error = %e, "generated sink unavailable, retrying");
                    if !self.ring.pause(self.retry_delay) {
                        return false;
                    }
                }
            }
        }
    }
}
