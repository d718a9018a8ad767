use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum RingError {
    #[error("not enough space in ring buffer: required {required} bytes, available {available} bytes")]
    InsufficientSpace { required: usize, available: usize },

    #[error("not enough data in ring buffer: requested {requested} bytes, occupied {occupied} bytes")]
    InsufficientData { requested: usize, occupied: usize },

    #[error("invalid capacity {capacity}: {reason}")]
    InvalidCapacity {
        capacity: usize,
        reason: &'static str,
    },

    #[error("ring buffer is closed")]
    Closed,
}
