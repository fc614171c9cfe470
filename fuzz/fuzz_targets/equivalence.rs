#![no_main]

use libfuzzer_sys::fuzz_target;

use vp9_transform::*;

// scalar and wide paths must agree bit-for-bit on every legal input

fuzz_target!(|data: &[u8]| {
    if data.len() < 2 {
        return;
    }

    let tx_type = match data[0] % 4 {
        0 => TxType::DctDct,
        1 => TxType::AdstDct,
        2 => TxType::DctAdst,
        _ => TxType::AdstAdst,
    };

    let payload = &data[1..];
    if payload.len() < 16 * 16 {
        return;
    }

    let input: Vec<i16> = payload[..16 * 16]
        .iter()
        .map(|&b| i16::from(b) * 2 - 255)
        .collect();

    let mut scalar8 = [0i32; 64];
    let mut wide8 = [0i32; 64];
    fht8x8(&input, 8, &mut scalar8, tx_type, BitDepth::Eight);
    fht8x8_wide(&input, 8, &mut wide8, tx_type);
    assert_eq!(scalar8, wide8);

    let mut scalar16 = [0i32; 256];
    let mut wide16 = [0i32; 256];
    fht16x16(&input, 16, &mut scalar16, tx_type, BitDepth::Eight);
    fht16x16_wide(&input, 16, &mut wide16, tx_type);
    assert_eq!(scalar16[..], wide16[..]);

    let mut dest_scalar = vec![128u8; 256];
    let mut dest_wide = vec![128u8; 256];
    iht16x16_add(&scalar16, &mut dest_scalar, 16, tx_type);
    iht16x16_add_wide(&wide16, &mut dest_wide, 16, tx_type);
    assert_eq!(dest_scalar, dest_wide);
});
