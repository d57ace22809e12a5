//! Domain decomposition: the validated partition, its periodic geometry and
//! the transfer descriptors derived from it.

pub mod decomposition;
pub mod periodic;
pub mod transfer;
pub mod validation;

pub use decomposition::{BoxRankPair, Topology};
pub use periodic::{periodic_shifts, wrap_index};
pub use transfer::{BoxId, TransferInfo};
