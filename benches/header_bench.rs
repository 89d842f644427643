//! 头部解析性能基准测试.

use criterion::{Criterion, black_box, criterion_group, criterion_main};
use m4vh::core::BitWriter;
use m4vh::parse::HeaderParser;

/// 前置 `padding` 字节的 CIF VOL
fn make_vol(padding: usize) -> Vec<u8> {
    let mut bw = BitWriter::new();
    bw.write_bytes(&vec![0xA5; padding]);
    bw.write_bytes(&[0x00, 0x00, 0x01, 0x20]);
    bw.write_bit(0);
    bw.write_bits(0x03, 8);
    bw.write_bit(0);
    bw.write_bits(1, 4);
    bw.write_bit(0);
    bw.write_bits(0, 2);
    bw.write_bit(1);
    bw.write_bits(30000, 16);
    bw.write_bit(1);
    bw.write_bit(0);
    bw.write_bit(1);
    bw.write_bits(352, 13);
    bw.write_bit(1);
    bw.write_bits(288, 13);
    bw.write_bits(0b101, 3);
    bw.write_bit(0);
    bw.write_bit(0);
    bw.write_bit(0);
    bw.write_bits(0b110, 3);
    bw.write_bytes(&[0u8; 8]);
    bw.finish()
}

fn bench_parse_vol(c: &mut Criterion) {
    let parser = HeaderParser::default();
    let data = make_vol(0);
    c.bench_function("parse_vol_cif", |b| {
        b.iter(|| parser.parse_header(black_box(&data)).unwrap());
    });
}

fn bench_scan(c: &mut Criterion) {
    let parser = HeaderParser::default();
    let mut data = make_vol(64 * 1024);
    data.extend_from_slice(&[0x00, 0x00, 0x01, 0xB6]);
    c.bench_function("parse_vol_after_64k", |b| {
        b.iter(|| parser.parse_header(black_box(&data)).unwrap());
    });
    c.bench_function("has_frame_64k", |b| {
        b.iter(|| parser.has_frame(black_box(&data)));
    });
}

criterion_group!(benches, bench_parse_vol, bench_scan);
criterion_main!(benches);
