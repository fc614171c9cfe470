#![no_main]

use libfuzzer_sys::fuzz_target;

use vp9_transform::*;

// forward + inverse over arbitrary legal 8-bit residuals must reproduce
// the residual within one step per sample

fuzz_target!(|data: &[u8]| {
    if data.len() < 2 {
        return;
    }

    let (size, tx_type) = match (data[0] % 4, data[1] % 4) {
        (0, t) => (TxSize::Tx4x4, t),
        (1, t) => (TxSize::Tx8x8, t),
        (2, t) => (TxSize::Tx16x16, t),
        // 32x32 is DCT-only
        _ => (TxSize::Tx32x32, 0),
    };
    let tx_type = match tx_type {
        0 => TxType::DctDct,
        1 => TxType::AdstDct,
        2 => TxType::DctAdst,
        _ => TxType::AdstAdst,
    };

    let n = size.dim();
    let payload = &data[2..];
    if payload.len() < n * n {
        return;
    }

    // map bytes into the legal 8-bit residual range [-255, 255]
    let input: Vec<i16> = payload[..n * n]
        .iter()
        .map(|&b| i16::from(b) * 2 - 255)
        .collect();

    let mut coeffs = vec![0i32; n * n];
    forward_transform_2d(&input, n, &mut coeffs, size, tx_type, BitDepth::Eight);

    let mut dest = vec![128u8; n * n];
    inverse_transform_2d_add(&coeffs, &mut dest, n, size, tx_type);

    for i in 0..n * n {
        let got = i32::from(dest[i]) - 128;
        let want = i32::from(input[i]).clamp(-128, 127);
        assert!(
            (got - want).abs() <= 2,
            "idx {}: reconstructed {} vs residual {}",
            i,
            got,
            want
        );
    }
});
