mod common;
use common::*;

use halo_grid::prelude::*;
use rand::{SeedableRng, rngs::SmallRng};

fn strips() -> Vec<BoxRankPair<2>> {
    vec![
        BoxRankPair::new(GridBox::new([0, 0], [3, 4]).unwrap(), 0),
        BoxRankPair::new(GridBox::new([3, 0], [5, 4]).unwrap(), 1),
        BoxRankPair::new(GridBox::new([5, 0], [8, 4]).unwrap(), 0),
    ]
}

#[test]
fn disjoint_cover_is_accepted() {
    let domain = GridBox::new([0, 0], [8, 4]).unwrap();
    let topo = Topology::with_halo(domain, strips(), [false, true], 1).unwrap();
    assert_eq!(topo.num_ranks(), 2);
    assert_eq!(topo.get_boxes(0).len(), 2);
    assert!(topo.is_valid());
}

#[test]
fn growing_a_box_into_its_neighbour_fails() {
    let domain = GridBox::new([0, 0], [8, 4]).unwrap();
    let mut boxes = strips();
    boxes[0].bbox = GridBox::new([0, 0], [4, 4]).unwrap();
    let err = Topology::with_halo(domain, boxes, [false, false], 1).unwrap_err();
    assert_eq!(err, HaloGridError::OverlappingBoxes { first: 0, second: 1 });
}

#[test]
fn shrinking_a_box_leaves_a_gap() {
    let domain = GridBox::new([0, 0], [8, 4]).unwrap();
    let mut boxes = strips();
    boxes[2].bbox = GridBox::new([5, 0], [8, 3]).unwrap();
    assert!(matches!(
        Topology::with_halo(domain, boxes, [false, false], 1),
        Err(HaloGridError::IncompleteCoverage { covered: 29, expected: 32 })
    ));
}

#[test]
fn halo_wider_than_a_periodic_axis_fails() {
    let domain = GridBox::new([0, 0], [8, 4]).unwrap();
    assert!(matches!(
        Topology::new(domain, strips(), [false, true], [1, 5], [1, 1]),
        Err(HaloGridError::PaddingExceedsPeriod { axis: 1, padding: 5, extent: 4 })
    ));
    // the same halo is fine on an open axis
    Topology::new(domain, strips(), [false, false], [1, 5], [1, 1]).unwrap();
}

#[test]
fn random_guillotine_partitions_validate() {
    let mut rng = SmallRng::seed_from_u64(0x5eed);
    let domain = GridBox::new([-3, 0, 2], [5, 6, 7]).unwrap();
    for _ in 0..50 {
        let boxes = guillotine(&mut rng, domain, 12, 4);
        let topo = Topology::with_halo(domain, boxes, [true, false, true], 1).unwrap();
        let covered: i64 = topo.boxes().iter().map(|p| p.bbox.volume()).sum();
        assert_eq!(covered, domain.volume());

        // every neighbour relation is mirrored by a receiver relation
        for pair in topo.boxes() {
            for n in topo.get_neighbours(pair).unwrap() {
                assert!(topo.get_receivers(n).unwrap().contains(&pair));
            }
        }
    }
}

#[test]
fn domains_beyond_index_range_fail_at_construction() {
    assert!(matches!(
        GridBox::new([0, 0], [1i64 << 32, 1i64 << 32]),
        Err(HaloGridError::BoxTooLarge { .. })
    ));
    assert!(matches!(
        GridBox::new([-(1i64 << 62)], [1i64 << 62]),
        Err(HaloGridError::BoxTooLarge { .. })
    ));

    let domain = GridBox::new([i64::MAX - 8], [i64::MAX]).unwrap();
    let whole = vec![BoxRankPair::new(domain, 0)];
    assert_eq!(
        Topology::with_halo(domain, whole.clone(), [true], 1).unwrap_err(),
        HaloGridError::CoordinateOverflow { axis: 0 }
    );
    // no periodic reach and no end padding: the topology fits
    let topo = Topology::new(domain, whole, [false], [2], [0]).unwrap();
    assert_eq!(topo.padded_extent(&domain), [10]);
}
