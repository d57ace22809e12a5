//! Descriptor of one contiguous halo block copy.

use crate::geometry::grid_box::{Index, flat_size};

/// Index of a box in a topology's fixed box list.
pub type BoxId = usize;

/// One block copy between two padded local buffers.
///
/// `extent` elements are read starting at `sender_begin` in the sender box's
/// padded local coordinates and written starting at `receiver_begin` in the
/// receiver box's padded local coordinates. The derived total order is the
/// post order used on both sides of every rank pair.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TransferInfo<const N: usize> {
    pub sender_rank: usize,
    pub receiver_rank: usize,
    pub sender_box: BoxId,
    pub receiver_box: BoxId,
    pub sender_begin: [Index; N],
    pub receiver_begin: [Index; N],
    pub extent: [Index; N],
}

impl<const N: usize> TransferInfo<N> {
    /// Number of elements carried by this transfer.
    pub fn flat_size(&self) -> usize {
        flat_size(&self.extent).max(0) as usize
    }

    /// Sender and receiver live on the same rank.
    pub fn is_rank_local(&self) -> bool {
        self.sender_rank == self.receiver_rank
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::BTreeSet;

    fn info(sr: usize, rr: usize, sb: BoxId, ext: [i64; 2]) -> TransferInfo<2> {
        TransferInfo {
            sender_rank: sr,
            receiver_rank: rr,
            sender_box: sb,
            receiver_box: 0,
            sender_begin: [0, 0],
            receiver_begin: [0, 0],
            extent: ext,
        }
    }

    #[test]
    fn ordered_by_rank_pair_first() {
        let set: BTreeSet<_> = [info(1, 0, 0, [1, 1]), info(0, 1, 3, [1, 1]), info(0, 1, 2, [2, 1])]
            .into_iter()
            .collect();
        let order: Vec<_> = set.iter().map(|t| (t.sender_rank, t.sender_box)).collect();
        assert_eq!(order, vec![(0, 2), (0, 3), (1, 0)]);
    }

    #[test]
    fn flat_size_is_extent_product() {
        assert_eq!(info(0, 0, 0, [3, 4]).flat_size(), 12);
        assert!(info(2, 2, 0, [1, 1]).is_rank_local());
    }
}
