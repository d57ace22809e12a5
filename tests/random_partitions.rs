//! Random guillotine partitions with random periodicity and padding: every
//! halo cell must end up holding the value of the global cell it wraps to.

mod common;
use common::*;

use halo_grid::prelude::*;
use rand::{Rng, SeedableRng, rngs::SmallRng};

fn random_case<const N: usize>(rng: &mut SmallRng, domain: GridBox<N>) -> Topology<N> {
    let pieces = rng.gen_range(1..10);
    let ranks = rng.gen_range(1..5);
    let boxes = guillotine(rng, domain, pieces, ranks);
    let periodic: [bool; N] = std::array::from_fn(|_| rng.gen_bool(0.5));
    let bp: [Index; N] = std::array::from_fn(|_| rng.gen_range(0..3));
    let ep: [Index; N] = std::array::from_fn(|_| rng.gen_range(0..3));
    Topology::new(domain, boxes, periodic, bp, ep).unwrap()
}

fn run<const N: usize>(seed: u64, domain: GridBox<N>, rounds: usize) {
    let mut rng = SmallRng::seed_from_u64(seed);
    for _ in 0..rounds {
        let topo = random_case(&mut rng, domain);
        let mut arrays = DistributedArray::<i64, N>::for_all_ranks(&topo);
        for a in &mut arrays {
            a.fill_interior(tag);
        }
        exchange_all(&mut arrays, &topo).unwrap();
        assert_halos_match_global(&topo, &arrays);

        let expected: Vec<i64> = domain.points().map(tag).collect();
        assert_eq!(gather_global(&arrays, &topo).unwrap(), expected);
    }
}

#[test]
fn random_1d() {
    run(1, GridBox::new([0], [9]).unwrap(), 40);
}

#[test]
fn random_2d() {
    run(2, GridBox::new([0, -2], [7, 5]).unwrap(), 40);
}

#[test]
fn random_3d() {
    run(3, GridBox::new([0, 0, 0], [5, 4, 6]).unwrap(), 20);
}

#[test]
fn multi_rank_matches_single_box() {
    let mut rng = SmallRng::seed_from_u64(4);
    let domain = GridBox::new([0, 0], [6, 5]).unwrap();
    for _ in 0..20 {
        let split = random_case(&mut rng, domain);
        let whole = Topology::new(
            domain,
            vec![BoxRankPair::new(domain, 0)],
            split.periodic(),
            split.begin_padding(),
            split.end_padding(),
        )
        .unwrap();

        let mut reference = DistributedArray::<i64, 2>::for_all_ranks(&whole);
        reference[0].fill_interior(tag);
        exchange_all(&mut reference, &whole).unwrap();

        let mut arrays = DistributedArray::<i64, 2>::for_all_ranks(&split);
        for a in &mut arrays {
            a.fill_interior(tag);
        }
        exchange_all(&mut arrays, &split).unwrap();

        let big = &reference[0].blocks()[0];
        for block in arrays.iter().flat_map(|a| a.blocks()) {
            let shape = block.layout().shape();
            for local in GridBox::new([0; 2], shape.map(|s| s as Index)).unwrap().points() {
                let global = split.local_to_global(block.pair(), &local).unwrap();
                let in_big = whole.global_to_local(&whole.boxes()[0], &global).unwrap();
                assert_eq!(block.get(&local).unwrap(), big.get(&in_big).unwrap());
            }
        }
    }
}
