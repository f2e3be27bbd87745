//! Benchmarks for probing and face enumeration.

use criterion::{criterion_group, criterion_main, Criterion};
use nalgebra::Point3;
use plexus::prelude::*;

fn create_jittered_grid(n: usize) -> Vec<Point3<f64>> {
    let mut points = Vec::with_capacity(n * n);
    for j in 0..n {
        for i in 0..n {
            // Cheap deterministic jitter in [-0.2, 0.2]
            let h = ((i * 73_856_093) ^ (j * 19_349_663)) % 1000;
            let dx = (h as f64 / 1000.0 - 0.5) * 0.4;
            let dy = ((h * 7 % 1000) as f64 / 1000.0 - 0.5) * 0.4;
            points.push(Point3::new(i as f64 + dx, j as f64 + dy, 0.0));
        }
    }
    points
}

fn bench_probes(c: &mut Criterion) {
    let points = create_jittered_grid(60);
    let grid = HashGrid::from_points(&points, 1.5).unwrap();
    let ctx = ProbeContext::new(&points, &grid);

    c.bench_function("density_60x60", |b| {
        b.iter(|| {
            let mut orchestrator = ProbeOrchestrator::new().with_probe(DensityProbe::new(1.5));
            orchestrator.run(&ctx).edges.len()
        });
    });

    c.bench_function("yao_60x60", |b| {
        b.iter(|| {
            let mut orchestrator = ProbeOrchestrator::new().with_probe(ConeProbe::new(1.5));
            orchestrator.run(&ctx).edges.len()
        });
    });

    c.bench_function("spanner_60x60", |b| {
        b.iter(|| {
            let mut orchestrator = ProbeOrchestrator::new().with_probe(SpannerProbe::new(1.5));
            orchestrator.run(&ctx).edges.len()
        });
    });

    let sequential = ProbeContext::new(&points, &grid).with_parallel(false);
    c.bench_function("density_60x60_sequential", |b| {
        b.iter(|| {
            let mut orchestrator = ProbeOrchestrator::new().with_probe(DensityProbe::new(1.5));
            orchestrator.run(&sequential).edges.len()
        });
    });
}

fn bench_faces(c: &mut Criterion) {
    let points = create_jittered_grid(60);
    let grid = HashGrid::from_points(&points, 1.5).unwrap();
    let ctx = ProbeContext::new(&points, &grid);
    let mut orchestrator = ProbeOrchestrator::new().with_probe(ConeProbe::new(1.5));
    let edges = orchestrator.run(&ctx).edges;
    let flat = Projection::default().project_all(&points);

    c.bench_function("halfedge_build", |b| {
        b.iter(|| HalfEdgeGraph::from_edge_set(&edges, flat.clone()).unwrap());
    });

    c.bench_function("enumerate_all_faces", |b| {
        b.iter(|| {
            let graph = HalfEdgeGraph::from_edge_set(&edges, flat.clone()).unwrap();
            let mut faces = FaceEnumerator::new(graph);
            faces
                .enumerate_all_faces(&CellConstraints::default(), false)
                .cells
                .len()
        });
    });
}

criterion_group!(benches, bench_probes, bench_faces);
criterion_main!(benches);
