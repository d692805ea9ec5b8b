#![allow(missing_docs)]
use criterion::{black_box, criterion_group, criterion_main, Criterion};
use riffnav::Navigator;

/// Builds a flat RIFF file with `n` sibling 16-byte data chunks.
fn flat_wave(n: u32) -> Vec<u8> {
    let mut body = Vec::new();
    body.extend_from_slice(b"WAVE");
    for _ in 0..n {
        body.extend_from_slice(b"data");
        body.extend_from_slice(&16u32.to_le_bytes());
        body.extend_from_slice(&[0u8; 16]);
    }
    let mut out = Vec::new();
    out.extend_from_slice(b"RIFF");
    out.extend_from_slice(&(body.len() as u32).to_le_bytes());
    out.extend_from_slice(&body);
    out
}

/// Builds a RIFF file nesting `depth` single-child LIST chunks, the
/// innermost holding one 16-byte data chunk.
fn nested_wave(depth: u32) -> Vec<u8> {
    fn inner(depth: u32) -> Vec<u8> {
        if depth == 0 {
            let mut data = Vec::new();
            data.extend_from_slice(b"data");
            data.extend_from_slice(&16u32.to_le_bytes());
            data.extend_from_slice(&[0u8; 16]);
            return data;
        }
        let child = inner(depth - 1);
        let mut list_body = Vec::new();
        list_body.extend_from_slice(b"leaf");
        list_body.extend_from_slice(&child);
        let mut list = Vec::new();
        list.extend_from_slice(b"LIST");
        list.extend_from_slice(&(list_body.len() as u32).to_le_bytes());
        list.extend_from_slice(&list_body);
        list
    }

    let body = inner(depth);
    let mut wave_body = Vec::new();
    wave_body.extend_from_slice(b"WAVE");
    wave_body.extend_from_slice(&body);

    let mut out = Vec::new();
    out.extend_from_slice(b"RIFF");
    out.extend_from_slice(&(wave_body.len() as u32).to_le_bytes());
    out.extend_from_slice(&wave_body);
    out
}

fn walk_flat_level(c: &mut Criterion) {
    let data = flat_wave(256);
    c.bench_function("walk_flat_level_256", |b| {
        b.iter(|| {
            let mut nav = Navigator::open_mem(black_box(data.clone())).unwrap();
            let mut count = 0;
            loop {
                count += 1;
                if nav.seek_next_chunk().is_err() {
                    break;
                }
            }
            black_box(count)
        });
    });
}

fn descend_nested_levels(c: &mut Criterion) {
    let data = nested_wave(32);
    c.bench_function("descend_nested_levels_32", |b| {
        b.iter(|| {
            let mut nav = Navigator::open_mem(black_box(data.clone())).unwrap();
            let mut depth = 0;
            while nav.seek_level_sub().is_ok() {
                depth += 1;
            }
            black_box(depth)
        });
    });
}

criterion_group!(benches, walk_flat_level, descend_nested_levels);
criterion_main!(benches);
