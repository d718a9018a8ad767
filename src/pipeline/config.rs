use super::PipelineError;
use std::path::PathBuf;
use std::time::Duration;

pub const BUFFER_CAPACITY: usize = 64;
pub const MAX_CHUNK: usize = 50;
pub const INTERVAL: Duration = Duration::from_secs(2);
pub const RETRY_DELAY: Duration = Duration::from_millis(100);
pub const GENERATED_PATH: &str = "/tmp/EmbedGenerateTest";
pub const REMOVED_PATH: &str = "/tmp/EmbedTest";

#[derive(Debug, Clone)]
pub struct PipelineConfig {
    pub capacity: usize,
    /// Exclusive upper bound for chunk lengths.
    pub max_chunk: usize,
    pub interval: Duration,
    pub retry_delay: Duration,
    pub generated_path: PathBuf,
    pub removed_path: PathBuf,
    /// Producer seed; the consumer uses `seed + 1`. `None` seeds from entropy.
    pub seed: Option<u64>,
    /// Stop the producer after this many appended chunks.
    pub max_cycles: Option<u64>,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            capacity: BUFFER_CAPACITY,
            max_chunk: MAX_CHUNK,
            interval: INTERVAL,
            retry_delay: RETRY_DELAY,
            generated_path: PathBuf::from(GENERATED_PATH),
            removed_path: PathBuf::from(REMOVED_PATH),
            seed: None,
            max_cycles: None,
        }
    }
}

impl PipelineConfig {
    pub fn validate(&self) -> Result<(), PipelineError> {
        if self.capacity == 0 {
            return Err(PipelineError::InvalidConfig {
                field: "capacity",
                reason: "must be greater than zero",
            });
        }
        if self.max_chunk < 2 {
            return Err(PipelineError::InvalidConfig {
                field: "max_chunk",
                reason: "must be at least 2 so a non-empty length can be drawn",
            });
        }
        // A producer waiting for space must imply the consumer has data.
        if self.max_chunk - 1 > self.capacity {
            return Err(PipelineError::InvalidConfig {
                field: "max_chunk",
                reason: "largest chunk must fit in the ring",
            });
        }
        Ok(())
    }

    pub fn consumer_seed(&self) -> Option<u64> {
        self.seed.map(|s| s.wrapping_add(1))
    }
}
