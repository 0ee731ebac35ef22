use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};

use voronoi_sweep::{
    calculate,
    generators::{circle, grid, hexagonal, jittered_grid, spiral},
    Options,
};

fn options() -> Options {
    Options::default().with_check_vertices(false)
}

fn just_the_sweep(c: &mut Criterion) {
    let mut group = c.benchmark_group("sweep");
    for n in [10, 30, 100] {
        let sites = jittered_grid(n, 10.0);
        group.bench_with_input(BenchmarkId::new("jittered grid", n * n), &sites, |b, sites| {
            b.iter(|| black_box(calculate(sites, &options())))
        });
    }
    for n in [100, 1_000, 10_000] {
        let sites = spiral(n, 100.0);
        group.bench_with_input(BenchmarkId::new("spiral", n), &sites, |b, sites| {
            b.iter(|| black_box(calculate(sites, &options())))
        });
    }
    group.finish();
}

fn degenerate(c: &mut Criterion) {
    let grid = grid(30, 10.0);
    c.bench_function("square grid", |b| {
        b.iter(|| black_box(calculate(&grid, &options())))
    });

    let hex = hexagonal(30, 30, 10.0);
    c.bench_function("hexagonal", |b| {
        b.iter(|| black_box(calculate(&hex, &options())))
    });

    let circle = circle(256, 100.0);
    c.bench_function("circle", |b| {
        b.iter(|| black_box(calculate(&circle, &options())))
    });
}

fn optimize(c: &mut Criterion) {
    let sites = spiral(10_000, 100.0);
    let diagram = calculate(&sites, &options()).unwrap();
    c.bench_function("optimize", |b| {
        b.iter(|| {
            let mut d = diagram.clone();
            d.optimize();
            black_box(d)
        })
    });
}

criterion_group!(benches, just_the_sweep, degenerate, optimize);
criterion_main!(benches);
