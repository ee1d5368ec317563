use criterion::{black_box, criterion_group, criterion_main, Criterion};
use evosim_core::spatial_hash::{EntityKind, GridEntity, SpatialHash};
use evosim_data::PlantId;

fn plants(n: usize) -> Vec<GridEntity> {
    (0..n)
        .map(|i| GridEntity::Plant {
            id: PlantId(i as u64),
            x: (i % 100) as f64 * 12.0,
            y: (i / 100) as f64 * 8.0,
        })
        .collect()
}

fn bench_spatial_hash_build(c: &mut Criterion) {
    let entities = plants(1000);

    c.bench_function("spatial_hash_build_1000", |b| {
        b.iter(|| {
            let mut grid = SpatialHash::new(150.0, 1200.0, 800.0);
            for e in &entities {
                grid.insert(*e);
            }
            black_box(grid)
        })
    });
}

fn bench_spatial_hash_neighborhood(c: &mut Criterion) {
    let mut grid = SpatialHash::new(150.0, 1200.0, 800.0);
    for e in plants(1000) {
        grid.insert(e);
    }
    let mut buffer = Vec::new();

    c.bench_function("spatial_hash_neighborhood", |b| {
        b.iter(|| {
            buffer.clear();
            grid.query_neighborhood_into(
                black_box(600.0),
                black_box(400.0),
                EntityKind::Plant,
                &mut buffer,
            );
            black_box(buffer.len())
        })
    });
}

fn bench_spatial_hash_local_cell(c: &mut Criterion) {
    let mut grid = SpatialHash::new(150.0, 1200.0, 800.0);
    for e in plants(1000) {
        grid.insert(e);
    }

    c.bench_function("spatial_hash_local_cell", |b| {
        b.iter(|| {
            let hits = grid.query_local_cell(black_box(10.0), black_box(790.0), EntityKind::Plant);
            black_box(hits.len())
        })
    });
}

criterion_group!(
    benches,
    bench_spatial_hash_build,
    bench_spatial_hash_neighborhood,
    bench_spatial_hash_local_cell
);
criterion_main!(benches);
