//! Wires one producer and one consumer to a shared ring.

pub mod config;
pub mod consumer;
pub mod generator;
pub mod producer;

pub use config::PipelineConfig;
pub use consumer::{Consumer, ConsumerStats};
pub use generator::ChunkGenerator;
pub use producer::{Producer, ProducerStats};

use crate::ring::{RingError, SharedRing};
use crate::sink::ChunkSink;
use std::io;
use std::sync::Arc;
use std::thread;
use thiserror::Error;
use tracing::info;

#[derive(Debug, Error)]
pub enum PipelineError {
    #[error("invalid config field {field}: {reason}")]
    InvalidConfig {
        field: &'static str,
        reason: &'static str,
    },

    #[error(transparent)]
    Ring(#[from] RingError),

    #[error("unable to spawn {task} task: {source}")]
    Spawn {
        task: &'static str,
        #[source]
        source: io::Error,
    },

    #[error("{task} task panicked")]
    TaskPanicked { task: &'static str },
}

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct PipelineReport {
    pub producer: ProducerStats,
    pub consumer: ConsumerStats,
    /// Bytes still in the ring after both tasks stopped.
    pub leftover: usize,
}

impl PipelineReport {
    #[inline]
    pub fn is_balanced(&self) -> bool {
        self.leftover == 0
            && self.consumer.dropped == 0
            && self.producer.bytes == self.consumer.bytes
    }
}

pub struct Pipeline<G, R> {
    config: PipelineConfig,
    ring: Arc<SharedRing>,
    generated: G,
    removed: R,
}

impl<G, R> Pipeline<G, R>
where
    G: ChunkSink + 'static,
    R: ChunkSink + 'static,
{
    pub fn new(config: PipelineConfig, generated: G, removed: R) -> Result<Self, PipelineError> {
        config.validate()?;
        let ring = Arc::new(SharedRing::new(config.capacity)?);
        Ok(Self {
            config,
            ring,
            generated,
            removed,
        })
    }

    /// Handle for closing the ring from outside, e.g. a signal handler.
    pub fn ring(&self) -> Arc<SharedRing> {
        Arc::clone(&self.ring)
    }

    /// Runs both tasks to completion.
    ///
    /// The producer stops when the ring is closed or after `max_cycles`
    /// chunks, then seals the ring so the consumer drains it and stops.
    pub fn run(self) -> Result<PipelineReport, PipelineError> {
        let Self {
            config,
            ring,
            generated,
            removed,
        } = self;

        info!(
            capacity = config.capacity,
            max_chunk = config.max_chunk,
            interval_ms = config.interval.as_millis() as u64,
            "pipeline starting"
        );

        let producer = Producer::new(
            Arc::clone(&ring),
            generated,
            ChunkGenerator::new(config.seed, config.max_chunk),
        )
        .with_interval(config.interval)
        .with_retry_delay(config.retry_delay)
        .with_max_cycles(config.max_cycles);

        let consumer = Consumer::new(
            Arc::clone(&ring),
            removed,
            ChunkGenerator::new(config.consumer_seed(), config.max_chunk),
        )
        .with_interval(config.interval)
        .with_retry_delay(config.retry_delay);

        let producer = thread::Builder::new()
            .name("producer".into())
            .spawn(move || producer.run())
            .map_err(|source| PipelineError::Spawn {
                task: "producer",
                source,
            })?;

        let consumer = match thread::Builder::new()
            .name("consumer".into())
            .spawn(move || consumer.run())
        {
            Ok(handle) => handle,
            Err(source) => {
                ring.close();
                let _ = producer.join();
                return Err(PipelineError::Spawn {
                    task: "consumer",
                    source,
                });
            }
        };

        let producer_stats = producer.join();
        // The producer seals on exit; repeated here for a panicked producer.
        ring.seal();
        let consumer_stats = consumer.join();

        let report = PipelineReport {
            producer: producer_stats.map_err(|_| PipelineError::TaskPanicked { task: "producer" })?,
            consumer: consumer_stats.map_err(|_| PipelineError::TaskPanicked { task: "consumer" })?,
            leftover: ring.len(),
        };

        info!(
            produced = report.producer.bytes,
            consumed = report.consumer.bytes,
            leftover = report.leftover,
            "pipeline stopped"
        );
        Ok(report)
    }
}
