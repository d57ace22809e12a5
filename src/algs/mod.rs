//! Re-export public algorithms.

pub mod channel;
pub mod exchange;
pub mod gather;
#[cfg(feature = "mpi-support")]
pub mod mpi_channel;
pub mod wire;

pub use channel::{Channel, LocalChannel, SharedChannel};
pub use exchange::{exchange_all, receive_phase, send_phase, send_receive};
pub use gather::{gather_global, scatter_global};
#[cfg(feature = "mpi-support")]
pub use mpi_channel::MpiChannel;
