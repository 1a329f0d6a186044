// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2025 Polyframe Inc.

//! Performance benchmarks

use bottess::bottess::{CsgTree, Soup, DEFAULT_BBOX_FLUFF};
use bottess::geometry::{Primitive, Tolerance};
use bottess::trimesh::{generate_edge_list, solid_report, SolidErrors};
use bottess::{evaluate, EngineConfig};
use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use nalgebra::Point3;

fn bench_trimesh(c: &mut Criterion) {
    let mut group = c.benchmark_group("trimesh");

    for segments in [32u32, 128] {
        let mesh = Primitive::sphere(Point3::origin(), 10.0, segments).to_mesh(0);

        group.bench_with_input(BenchmarkId::new("edge_list", segments), &mesh, |b, mesh| {
            b.iter(|| generate_edge_list(black_box(&mesh.faces)))
        });

        group.bench_with_input(BenchmarkId::new("solid_fast", segments), &mesh, |b, mesh| {
            b.iter(|| solid_report(black_box(&mesh.vertices), black_box(&mesh.faces), None))
        });

        group.bench_with_input(BenchmarkId::new("solid_report", segments), &mesh, |b, mesh| {
            let mut errors = SolidErrors::new();
            b.iter(|| solid_report(black_box(&mesh.vertices), black_box(&mesh.faces), Some(&mut errors)))
        });
    }

    group.finish();
}

fn bench_soup(c: &mut Criterion) {
    let mut group = c.benchmark_group("soup");
    let tol = Tolerance::default();

    let mesh = Primitive::sphere(Point3::origin(), 10.0, 64).to_mesh(0);
    group.bench_function("from_bot_sphere_64", |b| {
        b.iter(|| Soup::from_bot(black_box(&mesh), "sphere", &tol, DEFAULT_BBOX_FLUFF).unwrap())
    });

    group.finish();
}

fn bench_boolean(c: &mut Criterion) {
    let mut group = c.benchmark_group("boolean");
    group.sample_size(20);

    let config = EngineConfig::default();
    let sphere = |x: f64, segments: u32| {
        CsgTree::leaf("s", Primitive::sphere(Point3::new(x, 0.0, 0.0), 5.0, segments))
    };

    for segments in [16u32, 32] {
        let tree = CsgTree::union(sphere(0.0, segments), sphere(20.0, segments));
        group.bench_with_input(BenchmarkId::new("disjoint_union", segments), &tree, |b, tree| {
            b.iter(|| evaluate(black_box(tree), &config).unwrap())
        });
    }

    let nested = CsgTree::subtract(
        CsgTree::leaf("outer", Primitive::cuboid(Point3::origin(), Point3::new(30.0, 30.0, 30.0))),
        CsgTree::leaf("inner", Primitive::sphere(Point3::new(15.0, 15.0, 15.0), 5.0, 32)),
    );
    group.bench_function("nested_subtract", |b| {
        b.iter(|| evaluate(black_box(&nested), &config).unwrap())
    });

    group.finish();
}

criterion_group!(benches, bench_trimesh, bench_soup, bench_boolean);
criterion_main!(benches);
