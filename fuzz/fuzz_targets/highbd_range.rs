#![no_main]

use libfuzzer_sys::fuzz_target;

use vp9_transform::*;

// 12-bit extremes: arbitrary residuals at the widest legal magnitudes
// must run the high-precision path without tripping range assertions,
// and must round-trip within the documented bound

fuzz_target!(|data: &[u8]| {
    if data.len() < 1 + 32 * 32 * 2 {
        return;
    }

    let size = match data[0] % 4 {
        0 => TxSize::Tx4x4,
        1 => TxSize::Tx8x8,
        2 => TxSize::Tx16x16,
        _ => TxSize::Tx32x32,
    };
    let n = size.dim();

    let input: Vec<i16> = data[1..]
        .chunks_exact(2)
        .take(n * n)
        .map(|c| {
            let raw = i32::from(i16::from_le_bytes([c[0], c[1]]));
            // fold into the legal 12-bit residual range
            (raw % 4096) as i16
        })
        .collect();

    let mut coeffs = vec![0i32; n * n];
    forward_transform_2d(&input, n, &mut coeffs, size, TxType::DctDct, BitDepth::Twelve);

    let mut dest = vec![2048u16; n * n];
    inverse_transform_2d_add_highbd(
        &coeffs,
        &mut dest,
        n,
        size,
        TxType::DctDct,
        BitDepth::Twelve,
    );

    for i in 0..n * n {
        let got = i32::from(dest[i]) - 2048;
        let want = i32::from(input[i]).clamp(-2048, 2047);
        assert!(
            (got - want).abs() <= 2,
            "idx {}: reconstructed {} vs residual {}",
            i,
            got,
            want
        );
    }
});
