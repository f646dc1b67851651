use criterion::{Criterion, black_box, criterion_group, criterion_main};
use icosa_geo::{TileAdjacency, TileRegistry};
use icosa_path::*;

fn bench_registry_depth(c: &mut Criterion) {
    for depth in [3_u8, 5] {
        c.bench_function(&format!("registry_depth_{depth}"), |bencher| {
            bencher.iter(|| {
                let registry = TileRegistry::default();
                black_box(registry.ensure_depth(black_box(depth)).unwrap().len())
            })
        });
    }
}

fn bench_cached_depth(c: &mut Criterion) {
    let registry = TileRegistry::default();
    registry.ensure_depth(4).unwrap();
    c.bench_function("registry_cached_depth_4", |bencher| {
        bencher.iter(|| black_box(registry.ensure_depth(black_box(4)).unwrap()))
    });
}

fn bench_sphere_path(c: &mut Criterion) {
    let registry = TileRegistry::default();
    let tiles = registry.ensure_depth(4).unwrap();
    let adjacency = TileAdjacency::from_tiles(registry.geometry(), &tiles).unwrap();
    let topology =
        build_topology(&tile_topology_config(&tiles, &adjacency), &mut SparseIndex::new())
            .unwrap();
    let goal = topology.node_count() - 1;

    let mut finder = Pathfinder::with_node_capacity(topology.node_count());
    let mut buf = PathBuffer::with_capacity(topology.node_count());
    c.bench_function("sphere_path_depth_4", |bencher| {
        bencher.iter(|| black_box(finder.try_find_path(&topology, 0, black_box(goal), &mut buf)))
    });
}

criterion_group!(
    benches,
    bench_registry_depth,
    bench_cached_depth,
    bench_sphere_path
);
criterion_main!(benches);
