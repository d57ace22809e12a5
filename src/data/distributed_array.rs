//! DistributedArray: one rank's padded buffers over a [`Topology`].
//!
//! For every box the rank owns there is one [`LocalBlock`]: a zero-filled,
//! row-major buffer covering the box plus its halo padding. Interior cells
//! are written by the user; halo cells are filled by an exchange
//! ([`crate::algs::exchange`]). Buffers are never touched by other ranks
//! except through a channel.

use crate::algs::wire::{Wire, expect_exact_len};
use crate::data::layout::PaddedLayout;
use crate::debug_invariants::DebugInvariants;
use crate::geometry::grid_box::{GridBox, Index, add, sub};
use crate::halo_error::HaloGridError;
use crate::topology::{BoxId, BoxRankPair, Topology};

/// Padded buffer of a single owned box.
#[derive(Clone, Debug)]
pub struct LocalBlock<T, const N: usize> {
    id: BoxId,
    pair: BoxRankPair<N>,
    begin_padding: [Index; N],
    layout: PaddedLayout<N>,
    data: Vec<T>,
}

impl<T: Wire, const N: usize> LocalBlock<T, N> {
    fn zeroed(id: BoxId, pair: BoxRankPair<N>, topology: &Topology<N>) -> Self {
        let layout = PaddedLayout::new(topology.padded_extent(&pair.bbox));
        Self {
            id,
            pair,
            begin_padding: topology.begin_padding(),
            layout,
            data: vec![T::zeroed(); layout.len()],
        }
    }

    /// Position of the owned box in the topology list.
    pub fn id(&self) -> BoxId {
        self.id
    }

    pub fn pair(&self) -> &BoxRankPair<N> {
        &self.pair
    }

    pub fn layout(&self) -> &PaddedLayout<N> {
        &self.layout
    }

    /// Whole padded buffer, row-major.
    pub fn as_slice(&self) -> &[T] {
        &self.data
    }

    pub fn as_mut_slice(&mut self) -> &mut [T] {
        &mut self.data
    }

    /// Interior of the box in padded local coordinates.
    pub fn interior_bounds(&self) -> GridBox<N> {
        GridBox::from_ordered(self.begin_padding, add(self.begin_padding, self.pair.bbox.extent()))
    }

    /// Value at a padded local index.
    pub fn get(&self, local: &[Index; N]) -> Result<T, HaloGridError> {
        Ok(self.data[self.layout.offset(local)?])
    }

    pub fn set(&mut self, local: &[Index; N], value: T) -> Result<(), HaloGridError> {
        let at = self.layout.offset(local)?;
        self.data[at] = value;
        Ok(())
    }

    /// Global index to this block's padded local index (no bounds check).
    pub fn to_local(&self, global: &[Index; N]) -> [Index; N] {
        add(sub(*global, self.pair.bbox.begin()), self.begin_padding)
    }

    /// Copy the region `[begin, begin + extent)` out in row-major order.
    pub fn pack(&self, begin: &[Index; N], extent: &[Index; N]) -> Result<Vec<T>, HaloGridError> {
        let rows = self.layout.row_ranges(begin, extent)?;
        let mut out = Vec::with_capacity(rows.iter().map(|r| r.len()).sum());
        for row in rows {
            out.extend_from_slice(&self.data[row]);
        }
        Ok(out)
    }

    /// Write a row-major block into the region `[begin, begin + extent)`.
    pub fn unpack(&mut self, begin: &[Index; N], extent: &[Index; N], block: &[T]) -> Result<(), HaloGridError> {
        let rows = self.layout.row_ranges(begin, extent)?;
        expect_exact_len(block.len(), rows.iter().map(|r| r.len()).sum())?;
        let mut src = 0;
        for row in rows {
            let len = row.len();
            self.data[row].copy_from_slice(&block[src..src + len]);
            src += len;
        }
        Ok(())
    }

    /// Interior values in row-major order.
    pub fn interior(&self) -> Result<Vec<T>, HaloGridError> {
        let inner = self.interior_bounds();
        self.pack(&inner.begin(), &inner.extent())
    }
}

/// All padded buffers of one rank.
#[derive(Clone, Debug)]
pub struct DistributedArray<T, const N: usize> {
    rank: usize,
    blocks: Vec<LocalBlock<T, N>>,
}

impl<T: Wire, const N: usize> DistributedArray<T, N> {
    /// Allocate a zeroed padded buffer for every box owned by `rank`.
    pub fn new(topology: &Topology<N>, rank: usize) -> Self {
        let blocks: Vec<_> = topology
            .boxes()
            .iter()
            .enumerate()
            .filter(|(_, p)| p.rank == rank)
            .map(|(id, p)| LocalBlock::zeroed(id, *p, topology))
            .collect();
        if blocks.is_empty() {
            log::warn!("rank {rank} owns no boxes; its distributed array is empty");
        }
        let array = Self { rank, blocks };
        crate::debug_invariants!(array.validate_invariants(), "DistributedArray::new");
        array
    }

    /// One array per rank of `topology`, indexed by rank.
    pub fn for_all_ranks(topology: &Topology<N>) -> Vec<Self> {
        (0..topology.num_ranks()).map(|r| Self::new(topology, r)).collect()
    }

    pub fn rank(&self) -> usize {
        self.rank
    }

    /// Owned blocks in topology order.
    pub fn blocks(&self) -> &[LocalBlock<T, N>] {
        &self.blocks
    }

    pub fn blocks_mut(&mut self) -> &mut [LocalBlock<T, N>] {
        &mut self.blocks
    }

    pub fn block(&self, id: BoxId) -> Result<&LocalBlock<T, N>, HaloGridError> {
        let rank = self.rank;
        self.blocks
            .iter()
            .find(|b| b.id == id)
            .ok_or(HaloGridError::BoxNotOwned { rank, box_id: id })
    }

    pub fn block_mut(&mut self, id: BoxId) -> Result<&mut LocalBlock<T, N>, HaloGridError> {
        let rank = self.rank;
        self.blocks
            .iter_mut()
            .find(|b| b.id == id)
            .ok_or(HaloGridError::BoxNotOwned { rank, box_id: id })
    }

    /// Interior value at a global index owned by this rank.
    pub fn get(&self, global: &[Index; N]) -> Result<T, HaloGridError> {
        let block = self.owner_of(global)?;
        block.get(&block.to_local(global))
    }

    pub fn set(&mut self, global: &[Index; N], value: T) -> Result<(), HaloGridError> {
        let id = self.owner_of(global)?.id;
        let block = self.block_mut(id)?;
        let local = block.to_local(global);
        block.set(&local, value)
    }

    /// Write `f(global_index)` into every owned interior cell.
    pub fn fill_interior<F>(&mut self, mut f: F)
    where
        F: FnMut([Index; N]) -> T,
    {
        for block in &mut self.blocks {
            for global in block.pair.bbox.points() {
                let at = block.layout.offset_unchecked(&block.to_local(&global));
                block.data[at] = f(global);
            }
        }
    }

    fn owner_of(&self, global: &[Index; N]) -> Result<&LocalBlock<T, N>, HaloGridError> {
        self.blocks
            .iter()
            .find(|b| b.pair.bbox.contains_point(global))
            .ok_or_else(|| HaloGridError::IndexNotOwned {
                rank: self.rank,
                index: global.to_vec(),
            })
    }
}

impl<T: Wire, const N: usize> DebugInvariants for DistributedArray<T, N> {
    fn debug_assert_invariants(&self) {
        crate::debug_invariants!(self.validate_invariants(), "DistributedArray");
    }

    fn validate_invariants(&self) -> Result<(), HaloGridError> {
        for block in &self.blocks {
            if block.pair.rank != self.rank {
                return Err(HaloGridError::BoxNotOwned {
                    rank: self.rank,
                    box_id: block.id,
                });
            }
            expect_exact_len(block.data.len(), block.layout.len())?;
        }
        Ok(())
    }
}
