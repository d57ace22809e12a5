use halo_grid::prelude::*;
use halo_grid::topology::wrap_index;
use proptest::prelude::*;

fn grid_box3() -> impl Strategy<Value = GridBox<3>> {
    (prop::array::uniform3(-5i64..5), prop::array::uniform3(0i64..6))
        .prop_map(|(begin, extent)| GridBox::from_extent(begin, extent).unwrap())
}

fn split_topology(cut: i64, bp: [i64; 2], ep: [i64; 2], periodic: [bool; 2]) -> Topology<2> {
    let domain = GridBox::new([0, 0], [8, 6]).unwrap();
    let boxes = vec![
        BoxRankPair::new(GridBox::new([0, 0], [cut, 6]).unwrap(), 0),
        BoxRankPair::new(GridBox::new([cut, 0], [8, 6]).unwrap(), 1),
    ];
    Topology::new(domain, boxes, periodic, bp, ep).unwrap()
}

proptest! {
    #[test]
    fn intersection_is_symmetric(a in grid_box3(), b in grid_box3()) {
        prop_assert_eq!(a.intersection(&b), b.intersection(&a));
        prop_assert_eq!(a.overlap(&b), b.overlap(&a));
    }

    #[test]
    fn intersection_with_self_is_identity(a in grid_box3()) {
        prop_assert_eq!(a.intersection(&a), Some(a));
    }

    #[test]
    fn overlap_lies_in_both(a in grid_box3(), b in grid_box3()) {
        if let Some(o) = a.overlap(&b) {
            prop_assert!(o.volume() > 0);
            prop_assert!(a.contains_box(&o) && b.contains_box(&o));
        } else if let Some(i) = a.intersection(&b) {
            prop_assert_eq!(i.volume(), 0);
        }
    }

    #[test]
    fn merge_is_an_exact_union(a in grid_box3(), b in grid_box3()) {
        if let Some(m) = a.merge_adjacent(&b) {
            prop_assert_eq!(m.volume(), a.volume() + b.volume());
            prop_assert!(m.contains_box(&a) && m.contains_box(&b));
            prop_assert_eq!(m, a.bounding_box(&b));
        }
    }

    #[test]
    fn local_global_round_trip(
        cut in 1i64..8,
        bp in prop::array::uniform2(0i64..3),
        ep in prop::array::uniform2(0i64..3),
        periodic in prop::array::uniform2(any::<bool>()),
    ) {
        let topo = split_topology(cut, bp, ep, periodic);
        for pair in topo.boxes() {
            let shape = topo.padded_extent(&pair.bbox);
            for local in GridBox::new([0, 0], shape).unwrap().points() {
                let global = topo.local_to_global(pair, &local).unwrap();
                prop_assert_eq!(topo.global_to_local(pair, &global).unwrap(), local);
            }
            let outside = [shape[0], 0];
            prop_assert!(topo.local_to_global(pair, &outside).is_err());
        }
    }

    #[test]
    fn wrapped_index_lands_in_domain(idx in prop::array::uniform3(-20i64..20)) {
        let domain = GridBox::new([1, -2, 0], [4, 3, 7]).unwrap();
        let wrapped = wrap_index(&domain, &[true, true, true], &idx).unwrap();
        prop_assert!(domain.contains_point(&wrapped));
        for axis in 0..3 {
            prop_assert_eq!((wrapped[axis] - idx[axis]) % domain.extent()[axis], 0);
        }
    }
}

#[test]
fn stencil_sizes() {
    assert_eq!(Neighbours::<3, Star>::new().len(), 6);
    assert_eq!(Neighbours::<3, Full>::new().len(), 26);
    assert_eq!(Neighbours::<4, Full>::new().len(), 80);
    let full = Neighbours::<2, Full>::new();
    assert_eq!(full.idx(&[0, 0]), None);
    assert!(full.idx(&[-1, 1]).is_some());
}
