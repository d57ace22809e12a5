//! MPI-backed channel: one point-to-point message per transfer.
//!
//! Both sides of a rank pair walk that pair's transfers in `TransferInfo`
//! order, so with MPI's non-overtaking guarantee on a single tag the n-th
//! send from rank `s` to rank `r` meets the n-th receive `r` posts for `s`.
//! Sends are standard-mode and blocking; they complete before the matching
//! receive only when the transport buffers them eagerly, which holds for the
//! halo sizes this crate is aimed at.

use std::collections::BTreeSet;

use mpi::topology::SimpleCommunicator;
use mpi::traits::*;

use crate::algs::channel::{Channel, LocalChannel};
use crate::algs::wire::{Wire, decode, encode, expect_exact_len};
use crate::halo_error::HaloGridError;
use crate::topology::TransferInfo;

/// Tag carried by every halo message.
pub const HALO_TAG: mpi::Tag = 0x4a10;

/// Channel over an MPI communicator owned by the caller.
pub struct MpiChannel<'a, const N: usize> {
    comm: &'a SimpleCommunicator,
    rank: usize,
    /// Transfers this rank will receive, announced through `expect`.
    inbound: BTreeSet<TransferInfo<N>>,
    /// Self-addressed transfers never touch the network.
    loopback: LocalChannel<N>,
}

impl<'a, const N: usize> MpiChannel<'a, N> {
    pub fn new(comm: &'a SimpleCommunicator) -> Self {
        Self {
            rank: comm.rank() as usize,
            comm,
            inbound: BTreeSet::new(),
            loopback: LocalChannel::new(),
        }
    }

    pub fn rank(&self) -> usize {
        self.rank
    }

    /// Announced transfers not yet received.
    pub fn pending(&self) -> usize {
        self.inbound.len()
    }
}

impl<const N: usize> Channel<N> for MpiChannel<'_, N> {
    fn put<T: Wire>(&mut self, block: &[T], info: TransferInfo<N>) -> Result<(), HaloGridError> {
        expect_exact_len(block.len(), info.flat_size())?;
        if info.receiver_rank == self.rank {
            return self.loopback.put(block, info);
        }
        log::trace!("rank {}: send {:?}", self.rank, info);
        let raw = encode(block);
        self.comm
            .process_at_rank(info.receiver_rank as i32)
            .send_with_tag(&raw[..], HALO_TAG);
        Ok(())
    }

    fn get<T: Wire>(&mut self, receiver_rank: usize) -> Result<Vec<(TransferInfo<N>, Vec<T>)>, HaloGridError> {
        if receiver_rank != self.rank {
            return Err(HaloGridError::UnexpectedTransfer {
                rank: self.rank,
                receiver: receiver_rank,
            });
        }
        let mut staged: Vec<(TransferInfo<N>, Vec<T>)> = self.loopback.get(receiver_rank)?;
        self.loopback.clear();

        let log = std::mem::take(&mut self.inbound);
        for info in log {
            if info.sender_rank == self.rank {
                continue;
            }
            let expected = info.flat_size() * size_of::<T>();
            let mut raw = vec![0u8; expected];
            let status = self
                .comm
                .process_at_rank(info.sender_rank as i32)
                .receive_into_with_tag(&mut raw[..], HALO_TAG);
            let found = status.count(u8::equivalent_datatype()) as usize;
            if found != expected {
                return Err(HaloGridError::TransportTruncated {
                    sender: info.sender_rank,
                    expected,
                    found,
                });
            }
            log::trace!("rank {}: received {:?}", self.rank, info);
            staged.push((info, decode(&raw, info.flat_size())?));
        }
        staged.sort_unstable_by(|a, b| a.0.cmp(&b.0));
        Ok(staged)
    }

    fn expect(&mut self, info: TransferInfo<N>) -> Result<(), HaloGridError> {
        if info.receiver_rank != self.rank {
            return Err(HaloGridError::UnexpectedTransfer {
                rank: self.rank,
                receiver: info.receiver_rank,
            });
        }
        self.inbound.insert(info);
        Ok(())
    }
}
