#![allow(dead_code)]

use halo_grid::prelude::*;
use rand::{Rng, rngs::SmallRng};

/// Split `domain` by random axis-aligned cuts into (at most) `pieces` boxes,
/// each owned by a random rank below `ranks`.
pub fn guillotine<const N: usize>(
    rng: &mut SmallRng,
    domain: GridBox<N>,
    pieces: usize,
    ranks: usize,
) -> Vec<BoxRankPair<N>> {
    let mut boxes = vec![domain];
    while boxes.len() < pieces {
        let splittable: Vec<usize> = (0..boxes.len())
            .filter(|&i| boxes[i].extent().iter().any(|&e| e >= 2))
            .collect();
        if splittable.is_empty() {
            break;
        }
        let b = boxes.swap_remove(splittable[rng.gen_range(0..splittable.len())]);
        let axes: Vec<usize> = (0..N).filter(|&a| b.extent()[a] >= 2).collect();
        let axis = axes[rng.gen_range(0..axes.len())];
        let cut = rng.gen_range(b.begin()[axis] + 1..b.end()[axis]);
        let mut lo_end = b.end();
        lo_end[axis] = cut;
        let mut hi_begin = b.begin();
        hi_begin[axis] = cut;
        boxes.push(GridBox::new(b.begin(), lo_end).unwrap());
        boxes.push(GridBox::new(hi_begin, b.end()).unwrap());
    }
    boxes
        .into_iter()
        .map(|b| BoxRankPair::new(b, rng.gen_range(0..ranks)))
        .collect()
}

/// Distinct value per global cell.
pub fn tag<const N: usize>(idx: [Index; N]) -> i64 {
    idx.iter().fold(1, |acc, &x| acc * 100 + x)
}

/// Check every padded cell of every block: wrapped-in-domain cells carry the
/// tag of the cell they wrap to, cells past an open boundary stay zero.
pub fn assert_halos_match_global<const N: usize>(topo: &Topology<N>, arrays: &[DistributedArray<i64, N>]) {
    for array in arrays {
        for block in array.blocks() {
            let shape = block.layout().shape();
            let local_box = GridBox::new([0; N], shape.map(|s| s as Index)).unwrap();
            for local in local_box.points() {
                let global = topo.local_to_global(block.pair(), &local).unwrap();
                let expected = topo.wrap(&global).map(tag).unwrap_or(0);
                assert_eq!(
                    block.get(&local).unwrap(),
                    expected,
                    "box {:?} local {:?} (global {:?})",
                    block.pair().bbox,
                    local,
                    global
                );
            }
        }
    }
}
