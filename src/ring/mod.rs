pub mod buffer;
pub mod chunk;
pub mod ring_error;
pub mod shared;

pub use buffer::RingBuffer;
pub use ring_error::*;
pub use shared::*;
