//! Benchmarks for WKT parsing and writing.

use criterion::{Criterion, black_box, criterion_group, criterion_main};
use std::fmt::Write;
use wktmap::geometry::{Delimiter, WktWriter, parse_lenient, parse_strict};
use wktmap::sync::SAMPLE_WKT;

fn large_polygon(vertices: usize) -> String {
    let mut wkt = String::from("POLYGON ((");
    for i in 0..vertices {
        let angle = i as f64 / vertices as f64 * std::f64::consts::TAU;
        let _ = write!(wkt, "{:.5} {:.5}, ", angle.cos() * 40.0, angle.sin() * 20.0);
    }
    wkt.push_str("40 0))");
    wkt
}

fn bench_parse_sample(c: &mut Criterion) {
    c.bench_function("parse_strict_sample", |b| {
        b.iter(|| parse_strict(black_box(SAMPLE_WKT)).unwrap())
    });
}

fn bench_parse_lenient(c: &mut Criterion) {
    let wrapped = SAMPLE_WKT.replace(", ", ",\n\t");
    c.bench_function("parse_lenient_wrapped", |b| {
        b.iter(|| parse_lenient(black_box(&wrapped)).unwrap())
    });
}

fn bench_large_polygon(c: &mut Criterion) {
    let wkt = large_polygon(5_000);
    let geometry = parse_strict(&wkt).unwrap();
    let writer = WktWriter::new(Delimiter::UrlSafe);
    c.bench_function("parse_large_polygon", |b| {
        b.iter(|| parse_strict(black_box(&wkt)).unwrap())
    });
    c.bench_function("write_large_polygon", |b| {
        b.iter(|| writer.write(black_box(&geometry)))
    });
}

criterion_group!(
    benches,
    bench_parse_sample,
    bench_parse_lenient,
    bench_large_polygon
);
criterion_main!(benches);
