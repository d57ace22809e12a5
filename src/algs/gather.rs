//! Gather/scatter between per-rank arrays and one domain-sized buffer.
//!
//! The global buffer is row-major over the domain (last axis fastest), with
//! the domain's `begin` at offset 0. Halo cells never travel; only interiors
//! are copied.

use crate::algs::wire::{Wire, expect_exact_len};
use crate::data::distributed_array::DistributedArray;
use crate::data::layout::PaddedLayout;
use crate::geometry::grid_box::sub;
use crate::halo_error::HaloGridError;
use crate::topology::Topology;

/// Assemble the interiors of every rank's array into one domain buffer.
///
/// Cells not owned by any array in `arrays` stay zeroed.
pub fn gather_global<T: Wire, const N: usize>(
    arrays: &[DistributedArray<T, N>],
    topology: &Topology<N>,
) -> Result<Vec<T>, HaloGridError> {
    let domain = topology.domain();
    let layout = PaddedLayout::new(domain.extent());
    let mut out = vec![T::zeroed(); layout.len()];
    for block in arrays.iter().flat_map(|a| a.blocks()) {
        let bbox = block.pair().bbox;
        let values = block.interior()?;
        let mut src = 0;
        for row in layout.row_ranges(&sub(bbox.begin(), domain.begin()), &bbox.extent())? {
            let len = row.len();
            out[row].copy_from_slice(&values[src..src + len]);
            src += len;
        }
    }
    Ok(out)
}

/// Build `rank`'s array from a domain buffer; halos start zeroed.
pub fn scatter_global<T: Wire, const N: usize>(
    global: &[T],
    topology: &Topology<N>,
    rank: usize,
) -> Result<DistributedArray<T, N>, HaloGridError> {
    let domain = topology.domain();
    let layout = PaddedLayout::new(domain.extent());
    expect_exact_len(global.len(), layout.len())?;

    let mut array = DistributedArray::new(topology, rank);
    for block in array.blocks_mut() {
        let bbox = block.pair().bbox;
        let mut values = Vec::with_capacity(bbox.volume().max(0) as usize);
        for row in layout.row_ranges(&sub(bbox.begin(), domain.begin()), &bbox.extent())? {
            values.extend_from_slice(&global[row]);
        }
        let inner = block.interior_bounds();
        block.unpack(&inner.begin(), &inner.extent(), &values)?;
    }
    Ok(array)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::GridBox;
    use crate::topology::BoxRankPair;

    fn quad() -> Topology<2> {
        let d = GridBox::new([1, 1], [4, 5]).unwrap();
        let boxes = vec![
            BoxRankPair::new(GridBox::new([1, 1], [2, 5]).unwrap(), 0),
            BoxRankPair::new(GridBox::new([2, 1], [4, 3]).unwrap(), 1),
            BoxRankPair::new(GridBox::new([2, 3], [4, 5]).unwrap(), 1),
        ];
        Topology::with_halo(d, boxes, [true, false], 1).unwrap()
    }

    #[test]
    fn scatter_then_gather_is_identity() {
        let t = quad();
        let global: Vec<u32> = (0..12).collect();
        let arrays: Vec<_> = (0..t.num_ranks())
            .map(|r| scatter_global(&global, &t, r).unwrap())
            .collect();
        assert_eq!(arrays[1].blocks().len(), 2);
        // domain row x=2 starts at offset 4
        assert_eq!(arrays[1].get(&[2, 3]).unwrap(), 6);
        assert_eq!(gather_global(&arrays, &t).unwrap(), global);
    }

    #[test]
    fn scatter_rejects_wrong_length() {
        let t = quad();
        assert!(matches!(
            scatter_global(&[0u8; 11], &t, 0),
            Err(HaloGridError::BlockLengthMismatch { expected: 12, found: 11 })
        ));
    }

    #[test]
    fn missing_ranks_leave_zeros() {
        let t = quad();
        let mut only0 = DistributedArray::<i32, 2>::new(&t, 0);
        only0.fill_interior(|[_, y]| y as i32);
        let g = gather_global(&[only0], &t).unwrap();
        assert_eq!(&g[..4], &[1, 2, 3, 4]);
        assert!(g[4..].iter().all(|&v| v == 0));
    }
}
