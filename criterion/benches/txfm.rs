use criterion::{black_box, criterion_group, criterion_main, Criterion};

use std::time::Duration;
use vp9_transform::{
    fdct32x32, fdct32x32_wide, fht16x16, fht16x16_wide, fht8x8, fht8x8_wide, idct32x32_add,
    idct32x32_add_wide, iht8x8_add, BitDepth, TxType,
};

fn bench_residual(len: usize, amplitude: i32) -> Vec<i16> {
    let mut state = 0x2545_f491u32;
    (0..len)
        .map(|_| {
            state = state.wrapping_mul(1_664_525).wrapping_add(1_013_904_223);
            ((state >> 16) as i32 % (2 * amplitude + 1) - amplitude) as i16
        })
        .collect()
}

fn criterion_benchmark(c: &mut Criterion) {
    let input = bench_residual(32 * 32, 255);

    let mut group = c.benchmark_group("forward");
    group.measurement_time(Duration::from_secs(20));

    group.bench_function("fht8x8 scalar", |b| {
        let mut coeffs = [0i32; 64];
        b.iter(|| {
            fht8x8(
                black_box(&input),
                8,
                &mut coeffs,
                TxType::DctDct,
                BitDepth::Eight,
            );
            black_box(&coeffs);
        })
    });

    group.bench_function("fht8x8 wide", |b| {
        let mut coeffs = [0i32; 64];
        b.iter(|| {
            fht8x8_wide(black_box(&input), 8, &mut coeffs, TxType::DctDct);
            black_box(&coeffs);
        })
    });

    group.bench_function("fht16x16 scalar", |b| {
        let mut coeffs = [0i32; 256];
        b.iter(|| {
            fht16x16(
                black_box(&input),
                16,
                &mut coeffs,
                TxType::AdstAdst,
                BitDepth::Eight,
            );
            black_box(&coeffs);
        })
    });

    group.bench_function("fht16x16 wide", |b| {
        let mut coeffs = [0i32; 256];
        b.iter(|| {
            fht16x16_wide(black_box(&input), 16, &mut coeffs, TxType::AdstAdst);
            black_box(&coeffs);
        })
    });

    group.bench_function("fdct32x32 scalar", |b| {
        let mut coeffs = [0i32; 1024];
        b.iter(|| {
            fdct32x32(black_box(&input), 32, &mut coeffs, BitDepth::Eight);
            black_box(&coeffs);
        })
    });

    group.bench_function("fdct32x32 wide", |b| {
        let mut coeffs = [0i32; 1024];
        b.iter(|| {
            fdct32x32_wide(black_box(&input), 32, &mut coeffs);
            black_box(&coeffs);
        })
    });

    group.finish();

    let mut coeffs8 = [0i32; 64];
    fht8x8(&input, 8, &mut coeffs8, TxType::DctDct, BitDepth::Eight);
    let mut coeffs32 = [0i32; 1024];
    fdct32x32(&input, 32, &mut coeffs32, BitDepth::Eight);

    let mut group = c.benchmark_group("inverse");
    group.measurement_time(Duration::from_secs(20));

    group.bench_function("iht8x8_add scalar", |b| {
        let mut dest = vec![128u8; 64];
        b.iter(|| {
            iht8x8_add(black_box(&coeffs8), &mut dest, 8, TxType::DctDct);
            black_box(&dest);
        })
    });

    group.bench_function("idct32x32_add scalar", |b| {
        let mut dest = vec![128u8; 1024];
        b.iter(|| {
            idct32x32_add(black_box(&coeffs32), &mut dest, 32);
            black_box(&dest);
        })
    });

    group.bench_function("idct32x32_add wide", |b| {
        let mut dest = vec![128u8; 1024];
        b.iter(|| {
            idct32x32_add_wide(black_box(&coeffs32), &mut dest, 32);
            black_box(&dest);
        })
    });

    group.finish();
}

criterion_group!(benches, criterion_benchmark);
criterion_main!(benches);
