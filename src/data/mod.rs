//! Data module: padded per-rank buffers

/// Per-rank padded buffers over a topology.
pub mod distributed_array;
/// Row-major layout of a padded buffer.
pub mod layout;

pub use distributed_array::{DistributedArray, LocalBlock};
pub use layout::PaddedLayout;
