use super::generator::ChunkGenerator;
use crate::ring::{RingError, SharedRing};
use crate::sink::ChunkSink;
use std::sync::Arc;
use std::thread;
use std::time::Duration;
use tracing::{debug, error, info, warn};

/// Sink attempts allowed per chunk once the ring is closed.
const CLOSED_RETRIES: u32 = 3;

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct ConsumerStats {
    pub chunks: u64,
    pub bytes: u64,
    /// Picks discarded because they exceeded the occupied length.
    pub redraws: u64,
    pub sink_failures: u64,
    /// Chunks lost because the sink was still failing after close.
    pub dropped: u64,
}

pub struct Consumer<S> {
    ring: Arc<SharedRing>,
    sink: S,
    generator: ChunkGenerator,
    interval: Duration,
    retry_delay: Duration,
}

impl<S: ChunkSink> Consumer<S> {
    pub fn new(ring: Arc<SharedRing>, sink: S, generator: ChunkGenerator) -> Self {
        Self {
            ring,
            sink,
            generator,
            interval: Duration::ZERO,
            retry_delay: Duration::ZERO,
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

    /// Runs until the ring is sealed and fully drained.
    pub fn run(mut self) -> ConsumerStats {
        info!(sink = self.sink.name(), "consumer started");
        let mut stats = ConsumerStats::default();

        loop {
            let mut picks = 0u64;
            let generator = &mut self.generator;
            let removed = self.ring.remove_with(|| {
                picks += 1;
                generator.next_len()
            });
            stats.redraws += picks.saturating_sub(1);

            let bytes = match removed {
                Ok(bytes) => bytes,
                Err(RingError::Closed) => break,
                Err(e) => {
                    error!(error = %e, "remove failed");
                    break;
                }
            };

            stats.chunks += 1;
            stats.bytes += bytes.len() as u64;
            debug!(len = bytes.len(), "removed");

            self.persist(&bytes, &mut stats);

            // Once closed, pause returns at once and the loop drains.
            self.ring.pause(self.interval);
        }

        if let Err(e) = self.sink.flush() {
            warn!(error = %e, "removed sink flush failed");
        }
        info!(
            chunks = stats.chunks,
            bytes = stats.bytes,
            redraws = stats.redraws,
            "consumer stopped"
        );
        stats
    }

    fn persist(&mut self, bytes: &[u8], stats: &mut ConsumerStats) {
        let mut retries_after_close = 0;
        loop {
            match self.sink.persist(bytes) {
                Ok(()) => return,
                Err(e) => {
                    stats.sink_failures += 1;
                    if self.ring.pause(self.retry_delay) {
                        warn!(error = %e, "removed sink unavailable, retrying");
                        continue;
                    }

                    retries_after_close += 1;
                    if retries_after_close > CLOSED_RETRIES {
                        error!(error = %e, len = bytes.len(), "removed sink unavailable after close, dropping chunk");
                        stats.dropped += 1;
                        return;
                    }
                    thread::sleep(self.retry_delay);
                }
            }
        }
    }
}
