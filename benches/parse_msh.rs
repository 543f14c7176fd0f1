use criterion::{black_box, criterion_group, criterion_main, Criterion};
use ndarray::Array2;
use ndarray_rand::rand_distr::Uniform;
use ndarray_rand::RandomExt;

use msh::prelude::*;

/// `n` random nodes, a strip of triangles and one scalar field, already encoded
fn encoded(n: usize, options: &WriteOptions) -> Vec<u8> {
    let coordinates: Array2<f64> = ndarray::Array::random((n, 3), Uniform::new(0., 10.));

    let mut nodes = NodeBlock::new(2, 1);
    nodes.tags = (1..=n as u64).collect();
    nodes.coordinates = Rows::from_array2(coordinates);

    let mut triangles = ElementBlock::new(2, 1, ElementType::Triangle3);
    for i in 1..n as u64 - 1 {
        triangles.push(i, &[i, i + 1, i + 2]).unwrap();
    }

    let mut pressure = DataSection::new(DataKind::Node, "pressure", 0.0, 0, 1);
    for tag in 1..=n as u64 {
        pressure.push_entry(tag, &[tag as f64 * 1e-3]).unwrap();
    }

    let mut doc = Document::default();
    doc.node_blocks.push(nodes);
    doc.element_blocks.push(triangles);
    doc.data_sections.push(pressure);

    let mut bytes = Vec::new();
    msh::write_msh_with(&mut bytes, &doc, options).unwrap();
    bytes
}

fn parse(bytes: &[u8]) -> Document {
    msh::parse_msh(bytes).unwrap()
}

fn parse_msh_bench(c: &mut Criterion) {
    let binary = encoded(100_000, &WriteOptions::default().encoding(Encoding::Binary));
    c.bench_function("parse binary 100000", |b| b.iter(|| parse(black_box(&binary))));

    let narrow = encoded(
        100_000,
        &WriteOptions::default()
            .encoding(Encoding::Binary)
            .int_size(IntSize::Four),
    );
    c.bench_function("parse binary 4 byte sizes 100000", |b| {
        b.iter(|| parse(black_box(&narrow)))
    });

    let ascii = encoded(100_000, &WriteOptions::default());
    c.bench_function("parse ascii 100000", |b| b.iter(|| parse(black_box(&ascii))));

    let legacy = encoded(100_000, &WriteOptions::default().version(Version::V2_2));
    c.bench_function("parse legacy ascii 100000", |b| {
        b.iter(|| parse(black_box(&legacy)))
    });
}

criterion_group!(benches, parse_msh_bench);
criterion_main!(benches);
