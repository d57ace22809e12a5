// Halo exchange across MPI ranks.
//
// Splits a 12x8 fully periodic domain into one vertical strip per rank,
// fills each interior with a value derived from its global index, runs one
// exchange and checks every halo cell against the value it should mirror.
//
//     cargo mpirun -n 3 --example mpi_halo_exchange --features mpi-support
fn main() {
    use halo_grid::prelude::*;
    use mpi::traits::*;

    let universe = match mpi::initialize() {
        Some(u) => u,
        None => {
            eprintln!("MPI is already initialized");
            return;
        }
    };
    let world = universe.world();
    let rank = world.rank() as usize;
    let size = world.size() as i64;

    let width = 12;
    if width % size != 0 {
        if rank == 0 {
            eprintln!("run with a rank count dividing {width}");
        }
        return;
    }
    let strip = width / size;
    let domain = GridBox::new([0, 0], [width, 8]).unwrap();
    let boxes = (0..size)
        .map(|r| BoxRankPair::new(GridBox::new([r * strip, 0], [(r + 1) * strip, 8]).unwrap(), r as usize))
        .collect();
    let topo = Topology::with_halo(domain, boxes, [true, true], 1).unwrap();

    let value = |[x, y]: [Index; 2]| (x * 100 + y) as f64;
    let mut data = DistributedArray::<f64, 2>::new(&topo, rank);
    data.fill_interior(value);

    mpi_send_receive(&mut data, &topo, &world).unwrap();

    let mut wrong = 0;
    for block in data.blocks() {
        let shape = block.layout().shape();
        for local in GridBox::new([0, 0], shape.map(|s| s as Index)).unwrap().points() {
            let global = topo.local_to_global(block.pair(), &local).unwrap();
            let Some(wrapped) = topo.wrap(&global) else { continue };
            if block.get(&local).unwrap() != value(wrapped) {
                wrong += 1;
            }
        }
    }
    println!("rank {rank}: {wrong} mismatched halo cells");
    world.barrier();
    assert_eq!(wrong, 0, "rank {rank} holds stale halo cells");
}
