//! HaloGridError: Unified error type for halo-grid public APIs
//!
//! Three families of failure exist: invalid geometry (rejected when a box or
//! topology is built), out-of-bounds coordinates (conversions and buffer
//! access), and transport failures (a network channel receiving something
//! other than what the topology predicts). None of them is retryable.

use thiserror::Error;

/// Unified error type for halo-grid operations.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum HaloGridError {
    /// A box with `begin[i] > end[i]` on some axis.
    #[error("invalid box: begin {begin:?} exceeds end {end:?}")]
    InvalidBox { begin: Vec<i64>, end: Vec<i64> },
    /// A box whose extent or volume does not fit in an `i64`.
    #[error("box {begin:?}..{end:?} is too large: its volume overflows i64")]
    BoxTooLarge { begin: Vec<i64>, end: Vec<i64> },
    /// Padded or periodically shifted coordinates leave the `i64` range.
    #[error("padded or periodic coordinates on axis {axis} overflow i64")]
    CoordinateOverflow { axis: usize },
    /// The summed box volumes do not fit in an `i64`.
    #[error("partition volume overflows i64")]
    VolumeOverflow,
    /// A partition box reaches outside the global domain.
    #[error("box #{index} {begin:?}..{end:?} lies outside the domain")]
    BoxOutsideDomain {
        index: usize,
        begin: Vec<i64>,
        end: Vec<i64>,
    },
    /// Two partition boxes share a positive volume.
    #[error("boxes #{first} and #{second} overlap")]
    OverlappingBoxes { first: usize, second: usize },
    /// The same (box, rank) pair was listed twice.
    #[error("boxes #{first} and #{second} are identical")]
    DuplicateBox { first: usize, second: usize },
    /// Partition volumes do not add up to the domain volume.
    #[error("partition covers {covered} cells but the domain has {expected}")]
    IncompleteCoverage { covered: i64, expected: i64 },
    /// Halo padding must be non-negative.
    #[error("negative padding {value} on axis {axis}")]
    NegativePadding { axis: usize, value: i64 },
    /// A periodic axis needs a halo no wider than the domain itself.
    #[error("padding {padding} on periodic axis {axis} exceeds the domain extent {extent}")]
    PaddingExceedsPeriod {
        axis: usize,
        padding: i64,
        extent: i64,
    },
    /// A runtime-sized description does not match the compile-time dimension.
    #[error("{what}: expected {expected} dimensions, found {found}")]
    DimensionMismatch {
        what: &'static str,
        expected: usize,
        found: usize,
    },
    /// A coordinate fell outside the valid index range.
    #[error("index {index:?} outside {begin:?}..{end:?}")]
    IndexOutOfBounds {
        index: Vec<i64>,
        begin: Vec<i64>,
        end: Vec<i64>,
    },
    /// A sub-region does not fit inside a padded buffer.
    #[error("region at {begin:?} with extent {extent:?} exceeds buffer shape {shape:?}")]
    RegionOutOfBounds {
        begin: Vec<i64>,
        extent: Vec<i64>,
        shape: Vec<usize>,
    },
    /// A (box, rank) pair or box id that is not part of the topology.
    #[error("box {0} is not part of the topology")]
    UnknownBox(String),
    /// A global index outside every box the rank owns.
    #[error("rank {rank} owns no box containing {index:?}")]
    IndexNotOwned { rank: usize, index: Vec<i64> },
    /// A block lookup for a box this rank does not own.
    #[error("rank {rank} does not own box #{box_id}")]
    BoxNotOwned { rank: usize, box_id: usize },
    /// A data block whose length does not match its transfer descriptor.
    #[error("block length mismatch: expected {expected} elements, found {found}")]
    BlockLengthMismatch { expected: usize, found: usize },
    /// The transport delivered fewer (or more) bytes than announced.
    #[error("transfer from rank {sender} delivered {found} bytes, expected {expected}")]
    TransportTruncated {
        sender: usize,
        expected: usize,
        found: usize,
    },
    /// A staged or received transfer not addressed to the calling rank.
    #[error("transfer addressed to rank {receiver} reached rank {rank}")]
    UnexpectedTransfer { rank: usize, receiver: usize },
}
