//! Two-phase halo exchange over a [`Channel`].
//!
//! 1. **Send phase**: every owned box packs the overlap of its interior with
//!    each receiver's padded box and puts it on the channel. Outbound blocks
//!    are collected first and posted in `TransferInfo` order, and every
//!    inbound transfer is announced through [`Channel::expect`].
//! 2. **Receive phase**: the rank takes everything addressed to it and
//!    unpacks each block into the halo of the box named by `receiver_box`.
//!
//! Only halo cells are written; interiors are read-only during an exchange.
//! Running the exchange twice without touching the interiors is a no-op.

use std::collections::BTreeMap;

use crate::algs::channel::{Channel, LocalChannel};
use crate::algs::wire::Wire;
use crate::data::distributed_array::DistributedArray;
use crate::halo_error::HaloGridError;
use crate::topology::{Topology, TransferInfo};

/// Pack and post every block this rank sends; announce every block it will
/// receive. Returns the number of blocks posted.
pub fn send_phase<T, C, const N: usize>(
    data: &DistributedArray<T, N>,
    topology: &Topology<N>,
    channel: &mut C,
) -> Result<usize, HaloGridError>
where
    T: Wire,
    C: Channel<N>,
{
    let mut outbound: BTreeMap<TransferInfo<N>, Vec<T>> = BTreeMap::new();
    for block in data.blocks() {
        for receiver in topology.get_receivers(block.pair())? {
            for info in topology.get_transfers(block.pair(), receiver)? {
                outbound.insert(info, block.pack(&info.sender_begin, &info.extent)?);
            }
        }
    }
    let posted = outbound.len();
    for (info, payload) in outbound {
        channel.put(&payload, info)?;
    }

    let mut announced = 0;
    for block in data.blocks() {
        for sender in topology.get_neighbours(block.pair())? {
            for info in topology.get_transfers(sender, block.pair())? {
                channel.expect(info)?;
                announced += 1;
            }
        }
    }
    log::debug!(
        "rank {}: posted {} halo blocks, expecting {}",
        data.rank(),
        posted,
        announced
    );
    Ok(posted)
}

/// Unpack every block addressed to this rank into its halos. Returns the
/// number of blocks applied.
pub fn receive_phase<T, C, const N: usize>(
    data: &mut DistributedArray<T, N>,
    topology: &Topology<N>,
    channel: &mut C,
) -> Result<usize, HaloGridError>
where
    T: Wire,
    C: Channel<N>,
{
    let rank = data.rank();
    let received = channel.get::<T>(rank)?;
    let count = received.len();
    for (info, payload) in received {
        if info.receiver_rank != rank || topology.pair(info.receiver_box)?.rank != rank {
            return Err(HaloGridError::UnexpectedTransfer {
                rank,
                receiver: info.receiver_rank,
            });
        }
        data.block_mut(info.receiver_box)?
            .unpack(&info.receiver_begin, &info.extent, &payload)?;
    }
    log::debug!("rank {rank}: applied {count} halo blocks");
    Ok(count)
}

/// Both phases for a single rank.
///
/// Every rank sharing the channel must finish its send phase before any rank
/// reads; with a network channel this holds because each rank sends before it
/// receives.
pub fn send_receive<T, C, const N: usize>(
    data: &mut DistributedArray<T, N>,
    topology: &Topology<N>,
    channel: &mut C,
) -> Result<(), HaloGridError>
where
    T: Wire,
    C: Channel<N>,
{
    send_phase(data, topology, channel)?;
    receive_phase(data, topology, channel)?;
    Ok(())
}

/// Exchange halos for every rank in-process, one array per rank.
///
/// All send phases run before any receive phase, over a fresh
/// [`LocalChannel`].
pub fn exchange_all<T, const N: usize>(
    arrays: &mut [DistributedArray<T, N>],
    topology: &Topology<N>,
) -> Result<(), HaloGridError>
where
    T: Wire,
{
    let mut channel = LocalChannel::new();
    for array in arrays.iter() {
        send_phase(array, topology, &mut channel)?;
    }
    for array in arrays.iter_mut() {
        receive_phase(array, topology, &mut channel)?;
    }
    Ok(())
}

/// [`exchange_all`] with ranks running in parallel over a shared channel.
#[cfg(feature = "rayon")]
pub fn par_exchange_all<T, const N: usize>(
    arrays: &mut [DistributedArray<T, N>],
    topology: &Topology<N>,
) -> Result<(), HaloGridError>
where
    T: Wire,
{
    use crate::algs::channel::SharedChannel;
    use rayon::prelude::*;

    let channel = SharedChannel::new();
    arrays.par_iter().try_for_each(|array| {
        let mut handle = &channel;
        send_phase(array, topology, &mut handle).map(|_| ())
    })?;
    arrays.par_iter_mut().try_for_each(|array| {
        let mut handle = &channel;
        receive_phase(array, topology, &mut handle).map(|_| ())
    })
}

/// Exchange halos of this process's array over MPI.
///
/// Collective in the sense that every rank of `comm` must call it with the
/// same topology.
#[cfg(feature = "mpi-support")]
pub fn mpi_send_receive<T, const N: usize>(
    data: &mut DistributedArray<T, N>,
    topology: &Topology<N>,
    comm: &mpi::topology::SimpleCommunicator,
) -> Result<(), HaloGridError>
where
    T: Wire,
{
    let mut channel = crate::algs::mpi_channel::MpiChannel::new(comm);
    send_receive(data, topology, &mut channel)
}
