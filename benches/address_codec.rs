use criterion::{black_box, criterion_group, criterion_main, Criterion};
use omron_fins::address::{encode_address, parse_address, PlcFamily};

fn bench_parse_address(c: &mut Criterion) {
    c.bench_function("parse_address D100", |b| {
        b.iter(|| parse_address(black_box("D100")).unwrap())
    });
    c.bench_function("parse_address CIO50.3", |b| {
        b.iter(|| parse_address(black_box("CIO50.3")).unwrap())
    });
}

fn bench_encode_address(c: &mut Criterion) {
    let addr = parse_address("D100").unwrap();
    c.bench_function("encode_address CS word", |b| {
        b.iter(|| encode_address(black_box(PlcFamily::Cs), black_box(addr)).unwrap())
    });

    let bit_addr = parse_address("CIO50.3").unwrap();
    c.bench_function("encode_address CS bit", |b| {
        b.iter(|| encode_address(black_box(PlcFamily::Cs), black_box(bit_addr)).unwrap())
    });

    let cv_addr = parse_address("C5").unwrap();
    c.bench_function("encode_address CV counter", |b| {
        b.iter(|| encode_address(black_box(PlcFamily::Cv), black_box(cv_addr)).unwrap())
    });
}

criterion_group!(benches, bench_parse_address, bench_encode_address);
criterion_main!(benches);
