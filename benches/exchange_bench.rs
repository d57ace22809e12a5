use criterion::{BenchmarkId, Criterion, criterion_group, criterion_main};

use halo_grid::prelude::*;

/// `tiles x tiles` square boxes of side `side`, one rank per box, fully periodic.
fn tiled(tiles: i64, side: i64, halo: i64) -> Topology<2> {
    let domain = GridBox::new([0, 0], [tiles * side, tiles * side]).unwrap();
    let mut boxes = Vec::new();
    for i in 0..tiles {
        for j in 0..tiles {
            let begin = [i * side, j * side];
            let bbox = GridBox::from_extent(begin, [side, side]).unwrap();
            boxes.push(BoxRankPair::new(bbox, (i * tiles + j) as usize));
        }
    }
    Topology::with_halo(domain, boxes, [true, true], halo).unwrap()
}

fn bench_exchange(c: &mut Criterion) {
    let mut group = c.benchmark_group("exchange_all");

    for &(tiles, side, halo) in &[(2, 64, 1), (4, 64, 2), (8, 32, 1)] {
        let topo = tiled(tiles, side, halo);
        let mut arrays = DistributedArray::<f64, 2>::for_all_ranks(&topo);
        for a in &mut arrays {
            a.fill_interior(|[x, y]| (x * 31 + y) as f64);
        }

        group.bench_with_input(
            BenchmarkId::new(format!("{tiles}x{tiles}_side{side}_halo{halo}"), ""),
            &topo,
            |b, topo| {
                b.iter(|| exchange_all(&mut arrays, topo).unwrap());
            },
        );
    }

    group.finish();
}

fn bench_transfers(c: &mut Criterion) {
    let topo = tiled(8, 16, 1);
    c.bench_function("get_transfers_8x8", |b| {
        b.iter(|| {
            let mut n = 0;
            for sender in topo.boxes() {
                for receiver in topo.get_receivers(sender).unwrap() {
                    n += topo.get_transfers(sender, receiver).unwrap().len();
                }
            }
            n
        });
    });
}

criterion_group!(benches, bench_exchange, bench_transfers);
criterion_main!(benches);
