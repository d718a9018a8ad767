pub mod pipeline;
pub mod ring;
pub mod sink;
