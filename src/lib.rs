#![cfg_attr(docsrs, feature(doc_cfg))]
//! # halo-grid
//!
//! halo-grid decomposes a structured N-dimensional index domain into boxes
//! owned by ranks and keeps a ghost layer ("halo") around every box in sync
//! with the neighbouring boxes. It targets stencil codes and other PDE solvers
//! that split a grid across threads or MPI processes.
//!
//! ## Features
//! - `GridBox` geometry with half-open bounds, intersections and adjacency
//! - Star and full (face/edge/corner) neighbour stencils
//! - Validated `Topology` with per-axis periodic wrap and asymmetric padding
//! - Two-phase halo exchange over pluggable channels (in-process, thread-shared, MPI)
//! - Serde-loadable decomposition configs
//!
//! ## Determinism
//!
//! Neighbour and transfer lists follow the fixed box order of the topology, and
//! every channel hands out blocks sorted by `TransferInfo`. Ranks that build the
//! same topology therefore agree on the order of every message.
//!
//! ## Usage
//! ```toml
//! [dependencies]
//! halo-grid = "0.3"
//! # Optional features:
//! # features = ["mpi-support", "rayon"]
//! ```
//!
//! ```rust
//! use halo_grid::prelude::*;
//!
//! let domain = GridBox::new([0, 0], [4, 3]).unwrap();
//! let topo = Topology::with_halo(domain, vec![BoxRankPair::new(domain, 0)], [true, true], 1).unwrap();
//! let mut arrays = DistributedArray::<f64, 2>::for_all_ranks(&topo);
//! arrays[0].fill_interior(|[x, y]| (3 * x + y) as f64);
//! exchange_all(&mut arrays, &topo).unwrap();
//! // the corner halo cell (-1, -1) wraps to (3, 2)
//! assert_eq!(arrays[0].blocks()[0].get(&[0, 0]).unwrap(), 11.0);
//! ```

pub mod algs;
pub mod config;
pub mod data;
pub mod debug_invariants;
pub mod geometry;
pub mod halo_error;
pub mod topology;

pub use debug_invariants::DebugInvariants;

/// A convenient prelude to import the most-used traits & types:
pub mod prelude {
    pub use crate::algs::channel::{Channel, LocalChannel, SharedChannel};
    pub use crate::algs::exchange::{exchange_all, receive_phase, send_phase, send_receive};
    #[cfg(feature = "rayon")]
    pub use crate::algs::exchange::par_exchange_all;
    #[cfg(feature = "mpi-support")]
    pub use crate::algs::exchange::mpi_send_receive;
    pub use crate::algs::gather::{gather_global, scatter_global};
    #[cfg(feature = "mpi-support")]
    pub use crate::algs::mpi_channel::MpiChannel;
    pub use crate::algs::wire::Wire;
    pub use crate::config::{BoxSpec, DecompositionConfig};
    pub use crate::data::distributed_array::{DistributedArray, LocalBlock};
    pub use crate::debug_invariants::DebugInvariants;
    pub use crate::geometry::{Full, GridBox, Index, Neighbours, Star};
    pub use crate::halo_error::HaloGridError;
    pub use crate::topology::{BoxId, BoxRankPair, Topology, TransferInfo};
}
