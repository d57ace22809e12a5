//! Transport façade for halo blocks: in-process staging or real messages.
//!
//! A channel moves one packed block per [`TransferInfo`]. The sender calls
//! [`Channel::put`]; the receiving rank later calls [`Channel::get`] and gets
//! every block addressed to it, sorted by `TransferInfo`.
//!
//! - [`LocalChannel`] stages blocks in an ordered map. One thread drives all
//!   simulated ranks through it; it has no internal locking.
//! - [`SharedChannel`] stages blocks in a concurrent map so simulated ranks
//!   may run on separate threads (sharing `&SharedChannel`).
//! - `MpiChannel` (feature `mpi-support`) sends real point-to-point messages.

use std::collections::BTreeMap;

use bytes::Bytes;
use dashmap::DashMap;

use crate::algs::wire::{Wire, decode, encode, expect_exact_len};
use crate::halo_error::HaloGridError;
use crate::topology::TransferInfo;

/// Block transport keyed by transfer descriptors.
pub trait Channel<const N: usize> {
    /// Stage or send `block`, which must hold `info.flat_size()` elements.
    fn put<T: Wire>(&mut self, block: &[T], info: TransferInfo<N>) -> Result<(), HaloGridError>;

    /// Every block addressed to `receiver_rank`, in `TransferInfo` order.
    fn get<T: Wire>(&mut self, receiver_rank: usize) -> Result<Vec<(TransferInfo<N>, Vec<T>)>, HaloGridError>;

    /// Announce a transfer the calling rank will receive.
    ///
    /// Staging channels already know their inbound blocks; a message-passing
    /// channel needs the list to post its receives.
    fn expect(&mut self, _info: TransferInfo<N>) -> Result<(), HaloGridError> {
        Ok(())
    }
}

/// Single-threaded staging channel; the reference semantics.
#[derive(Clone, Debug, Default)]
pub struct LocalChannel<const N: usize> {
    staged: BTreeMap<TransferInfo<N>, Bytes>,
}

impl<const N: usize> LocalChannel<N> {
    pub fn new() -> Self {
        Self {
            staged: BTreeMap::new(),
        }
    }

    pub fn len(&self) -> usize {
        self.staged.len()
    }

    pub fn is_empty(&self) -> bool {
        self.staged.is_empty()
    }

    /// Drop every staged block.
    pub fn clear(&mut self) {
        self.staged.clear();
    }
}

impl<const N: usize> Channel<N> for LocalChannel<N> {
    fn put<T: Wire>(&mut self, block: &[T], info: TransferInfo<N>) -> Result<(), HaloGridError> {
        expect_exact_len(block.len(), info.flat_size())?;
        log::trace!("stage {:?}", info);
        self.staged.insert(info, encode(block));
        Ok(())
    }

    fn get<T: Wire>(&mut self, receiver_rank: usize) -> Result<Vec<(TransferInfo<N>, Vec<T>)>, HaloGridError> {
        self.staged
            .iter()
            .filter(|(info, _)| info.receiver_rank == receiver_rank)
            .map(|(info, raw)| Ok((*info, decode(raw, info.flat_size())?)))
            .collect()
    }
}

/// Thread-safe staging channel for ranks simulated on several threads.
///
/// All `put`s of an exchange must complete before any `get` of the same
/// exchange; callers separate the two phases with a join or barrier.
#[derive(Debug, Default)]
pub struct SharedChannel<const N: usize> {
    staged: DashMap<TransferInfo<N>, Bytes>,
}

impl<const N: usize> SharedChannel<N> {
    pub fn new() -> Self {
        Self {
            staged: DashMap::new(),
        }
    }

    pub fn len(&self) -> usize {
        self.staged.len()
    }

    pub fn is_empty(&self) -> bool {
        self.staged.is_empty()
    }

    pub fn clear(&self) {
        self.staged.clear();
    }
}

impl<const N: usize> Channel<N> for &SharedChannel<N> {
    fn put<T: Wire>(&mut self, block: &[T], info: TransferInfo<N>) -> Result<(), HaloGridError> {
        expect_exact_len(block.len(), info.flat_size())?;
        log::trace!("stage (shared) {:?}", info);
        self.staged.insert(info, encode(block));
        Ok(())
    }

    fn get<T: Wire>(&mut self, receiver_rank: usize) -> Result<Vec<(TransferInfo<N>, Vec<T>)>, HaloGridError> {
        let mut hits: Vec<(TransferInfo<N>, Bytes)> = self
            .staged
            .iter()
            .filter(|entry| entry.key().receiver_rank == receiver_rank)
            .map(|entry| (*entry.key(), entry.value().clone()))
            .collect();
        hits.sort_unstable_by(|a, b| a.0.cmp(&b.0));
        hits.into_iter()
            .map(|(info, raw)| Ok((info, decode(&raw, info.flat_size())?)))
            .collect()
    }
}

static_assertions::assert_impl_all!(SharedChannel<3>: Send, Sync);
