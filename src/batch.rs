//! Vectorized 2-D transform variants built on `wide` integer vectors.
//!
//! The 1-D kernels in `forward.rs`/`inverse.rs` are lane-generic, so the
//! batched path is only a different composition: each kernel invocation
//! transforms 4 or 8 independent columns at once, one column per SIMD
//! lane, with a lane-array transpose at the pass boundary. Only the 8-bit
//! profile is vectorized; the high-bit-depth profile needs 64-bit
//! products the 32-bit lanes cannot carry and stays scalar.
//!
//! Contract: bit-identical output to the scalar path for every legal
//! input. The tests at the bottom and the `equivalence` fuzz target
//! enforce this.

use wide::{i32x4, i32x8};

use crate::block::{PixelBlock, PixelBlockMut};
use crate::forward::{fadst16, fadst4, fadst8, fdct16, fdct32, fdct4, fdct8};
use crate::inverse::{iadst16, iadst4, iadst8, idct16, idct32, idct4, idct8};
use crate::lanes::TxLane;
use crate::txfm2d::{
    add_clamped, FwdScaling, Tx1d, TxType, FWD_SCALING_16, FWD_SCALING_32, FWD_SCALING_4,
    FWD_SCALING_8,
};

/// Lane types that can gather from and scatter to `i32` buffers.
trait WideLane: TxLane {
    const LANES: usize;
    fn load(src: &[i32]) -> Self;
    fn store(self, dst: &mut [i32]);
}

impl WideLane for i32x4 {
    const LANES: usize = 4;

    #[inline(always)]
    fn load(src: &[i32]) -> Self {
        let arr: [i32; 4] = src[..4].try_into().unwrap();
        i32x4::from(arr)
    }

    #[inline(always)]
    fn store(self, dst: &mut [i32]) {
        dst[..4].copy_from_slice(&self.to_array());
    }
}

impl WideLane for i32x8 {
    const LANES: usize = 8;

    #[inline(always)]
    fn load(src: &[i32]) -> Self {
        let arr: [i32; 8] = src[..8].try_into().unwrap();
        i32x8::from(arr)
    }

    #[inline(always)]
    fn store(self, dst: &mut [i32]) {
        dst[..8].copy_from_slice(&self.to_array());
    }
}

fn transpose<const N: usize>(m: &[[i32; N]; N]) -> [[i32; N]; N] {
    let mut t = [[0i32; N]; N];
    for r in 0..N {
        for c in 0..N {
            t[c][r] = m[r][c];
        }
    }
    t
}

fn forward_2d_wide<L: WideLane, const N: usize>(
    input: &[i16],
    stride: usize,
    col_kernel: fn([L; N]) -> [L; N],
    row_kernel: fn([L; N]) -> [L; N],
    scaling: &FwdScaling,
    output: &mut [i32],
) {
    debug_assert!(output.len() >= N * N);
    debug_assert!(N % L::LANES == 0);
    let view = PixelBlock::new(input, stride, N, N);

    let mut pre = [[0i32; N]; N];
    for j in 0..N {
        let row = view.row(j);
        for i in 0..N {
            pre[j][i] = i32::from(row[i]) << scaling.pre_shift;
        }
    }
    if scaling.dc_bias && pre[0][0] != 0 {
        pre[0][0] += 1;
    }

    // column pass, one column per lane
    let mut mid = [[0i32; N]; N];
    let mut c = 0;
    while c < N {
        let mut v = [L::splat(0); N];
        for j in 0..N {
            v[j] = L::load(&pre[j][c..]);
        }
        let r = col_kernel(v);
        for j in 0..N {
            scaling.mid.apply(r[j]).store(&mut mid[j][c..]);
        }
        c += L::LANES;
    }

    // row pass: transpose so rows line up as lanes
    let t = transpose(&mid);
    let mut outbuf = [[0i32; N]; N];
    let mut c = 0;
    while c < N {
        let mut v = [L::splat(0); N];
        for j in 0..N {
            v[j] = L::load(&t[j][c..]);
        }
        let r = row_kernel(v);
        let mut lanebuf = [0i32; 8];
        for j in 0..N {
            scaling.post.apply(r[j]).store(&mut lanebuf[..L::LANES]);
            for (k, &val) in lanebuf[..L::LANES].iter().enumerate() {
                outbuf[c + k][j] = val;
            }
        }
        c += L::LANES;
    }

    for (r, row) in outbuf.iter().enumerate() {
        output[r * N..(r + 1) * N].copy_from_slice(row);
    }
}

fn inverse_2d_wide<L: WideLane, const N: usize>(
    coeffs: &[i32],
    row_kernel: fn([L; N]) -> [L; N],
    col_kernel: fn([L; N]) -> [L; N],
) -> [[i32; N]; N] {
    debug_assert!(coeffs.len() >= N * N);
    debug_assert!(N % L::LANES == 0);

    let mut cm = [[0i32; N]; N];
    for r in 0..N {
        cm[r].copy_from_slice(&coeffs[r * N..(r + 1) * N]);
    }

    // row pass, one row per lane
    let t = transpose(&cm);
    let mut mid = [[0i32; N]; N];
    let mut c = 0;
    while c < N {
        let mut v = [L::splat(0); N];
        for j in 0..N {
            v[j] = L::load(&t[j][c..]).wrap();
        }
        let r = row_kernel(v);
        let mut lanebuf = [0i32; 8];
        for j in 0..N {
            r[j].store(&mut lanebuf[..L::LANES]);
            for (k, &val) in lanebuf[..L::LANES].iter().enumerate() {
                mid[c + k][j] = val;
            }
        }
        c += L::LANES;
    }

    // column pass, one column per lane
    let mut out = [[0i32; N]; N];
    let mut c = 0;
    while c < N {
        let mut v = [L::splat(0); N];
        for j in 0..N {
            v[j] = L::load(&mid[j][c..]);
        }
        let r = col_kernel(v);
        for j in 0..N {
            r[j].store(&mut out[j][c..]);
        }
        c += L::LANES;
    }
    out
}

macro_rules! pick_kernel {
    ($tx:expr, $dct:path, $adst:path) => {
        match $tx {
            Tx1d::Dct => $dct,
            Tx1d::Adst => $adst,
        }
    };
}

/// Vectorized forward 4x4 hybrid transform, bit-exact with
/// [`crate::fht4x4`] at 8-bit depth.
pub fn fht4x4_wide(input: &[i16], stride: usize, output: &mut [i32; 16], tx_type: TxType) {
    let (col, row) = tx_type.split();
    forward_2d_wide::<i32x4, 4>(
        input,
        stride,
        pick_kernel!(col, fdct4::<i32x4>, fadst4::<i32x4>),
        pick_kernel!(row, fdct4::<i32x4>, fadst4::<i32x4>),
        &FWD_SCALING_4,
        output,
    );
}

/// Vectorized forward 8x8 hybrid transform.
pub fn fht8x8_wide(input: &[i16], stride: usize, output: &mut [i32; 64], tx_type: TxType) {
    let (col, row) = tx_type.split();
    forward_2d_wide::<i32x8, 8>(
        input,
        stride,
        pick_kernel!(col, fdct8::<i32x8>, fadst8::<i32x8>),
        pick_kernel!(row, fdct8::<i32x8>, fadst8::<i32x8>),
        &FWD_SCALING_8,
        output,
    );
}

/// Vectorized forward 16x16 hybrid transform.
pub fn fht16x16_wide(input: &[i16], stride: usize, output: &mut [i32; 256], tx_type: TxType) {
    let (col, row) = tx_type.split();
    forward_2d_wide::<i32x8, 16>(
        input,
        stride,
        pick_kernel!(col, fdct16::<i32x8>, fadst16::<i32x8>),
        pick_kernel!(row, fdct16::<i32x8>, fadst16::<i32x8>),
        &FWD_SCALING_16,
        output,
    );
}

/// Vectorized forward 32x32 transform (DCT-only).
pub fn fdct32x32_wide(input: &[i16], stride: usize, output: &mut [i32; 1024]) {
    forward_2d_wide::<i32x8, 32>(
        input,
        stride,
        fdct32::<i32x8>,
        fdct32::<i32x8>,
        &FWD_SCALING_32,
        output,
    );
}

/// Vectorized inverse 4x4 hybrid transform with reconstruction add.
pub fn iht4x4_add_wide(coeffs: &[i32; 16], dest: &mut [u8], stride: usize, tx_type: TxType) {
    let (col, row) = tx_type.split();
    let residual = inverse_2d_wide::<i32x4, 4>(
        coeffs,
        pick_kernel!(row, idct4::<i32x4>, iadst4::<i32x4>),
        pick_kernel!(col, idct4::<i32x4>, iadst4::<i32x4>),
    );
    let mut view = PixelBlockMut::new(dest, stride, 4, 4);
    add_clamped(&residual, &mut view, 4);
}

/// Vectorized inverse 8x8 hybrid transform with reconstruction add.
pub fn iht8x8_add_wide(coeffs: &[i32; 64], dest: &mut [u8], stride: usize, tx_type: TxType) {
    let (col, row) = tx_type.split();
    let residual = inverse_2d_wide::<i32x8, 8>(
        coeffs,
        pick_kernel!(row, idct8::<i32x8>, iadst8::<i32x8>),
        pick_kernel!(col, idct8::<i32x8>, iadst8::<i32x8>),
    );
    let mut view = PixelBlockMut::new(dest, stride, 8, 8);
    add_clamped(&residual, &mut view, 5);
}

/// Vectorized inverse 16x16 hybrid transform with reconstruction add.
pub fn iht16x16_add_wide(coeffs: &[i32; 256], dest: &mut [u8], stride: usize, tx_type: TxType) {
    let (col, row) = tx_type.split();
    let residual = inverse_2d_wide::<i32x8, 16>(
        coeffs,
        pick_kernel!(row, idct16::<i32x8>, iadst16::<i32x8>),
        pick_kernel!(col, idct16::<i32x8>, iadst16::<i32x8>),
    );
    let mut view = PixelBlockMut::new(dest, stride, 16, 16);
    add_clamped(&residual, &mut view, 6);
}

/// Vectorized inverse 32x32 transform (DCT-only) with reconstruction add.
pub fn idct32x32_add_wide(coeffs: &[i32; 1024], dest: &mut [u8], stride: usize) {
    let residual = inverse_2d_wide::<i32x8, 32>(coeffs, idct32::<i32x8>, idct32::<i32x8>);
    let mut view = PixelBlockMut::new(dest, stride, 32, 32);
    add_clamped(&residual, &mut view, 6);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::txfm2d::{fdct32x32, fht16x16, fht4x4, fht8x8, BitDepth};
    use crate::txfm2d::{idct32x32_add, iht16x16_add, iht4x4_add, iht8x8_add};

    fn residual(seed: u32, len: usize, amplitude: i32) -> Vec<i16> {
        let mut state = seed;
        (0..len)
            .map(|_| {
                state = state.wrapping_mul(1_664_525).wrapping_add(1_013_904_223);
                ((state >> 16) as i32 % (2 * amplitude + 1) - amplitude) as i16
            })
            .collect()
    }

    const TX_TYPES: [TxType; 4] = [
        TxType::DctDct,
        TxType::AdstDct,
        TxType::DctAdst,
        TxType::AdstAdst,
    ];

    #[test]
    fn forward_wide_matches_scalar_bit_exactly() {
        for seed in 0..8u32 {
            let input = residual(seed, 32 * 32, 255);
            for &tx in &TX_TYPES {
                let mut a4 = [0i32; 16];
                let mut b4 = [0i32; 16];
                fht4x4(&input, 4, &mut a4, tx, BitDepth::Eight);
                fht4x4_wide(&input, 4, &mut b4, tx);
                assert_eq!(a4, b4, "4x4 {:?} seed {}", tx, seed);

                let mut a8 = [0i32; 64];
                let mut b8 = [0i32; 64];
                fht8x8(&input, 8, &mut a8, tx, BitDepth::Eight);
                fht8x8_wide(&input, 8, &mut b8, tx);
                assert_eq!(a8, b8, "8x8 {:?} seed {}", tx, seed);

                let mut a16 = [0i32; 256];
                let mut b16 = [0i32; 256];
                fht16x16(&input, 16, &mut a16, tx, BitDepth::Eight);
                fht16x16_wide(&input, 16, &mut b16, tx);
                assert_eq!(a16[..], b16[..], "16x16 {:?} seed {}", tx, seed);
            }

            let mut a32 = [0i32; 1024];
            let mut b32 = [0i32; 1024];
            fdct32x32(&input, 32, &mut a32, BitDepth::Eight);
            fdct32x32_wide(&input, 32, &mut b32);
            assert_eq!(a32[..], b32[..], "32x32 seed {}", seed);
        }
    }

    #[test]
    fn inverse_wide_matches_scalar_bit_exactly() {
        for seed in 100..106u32 {
            let input = residual(seed, 32 * 32, 255);
            for &tx in &TX_TYPES {
                let mut c4 = [0i32; 16];
                fht4x4(&input, 4, &mut c4, tx, BitDepth::Eight);
                let mut d_scalar = vec![128u8; 16];
                let mut d_wide = vec![128u8; 16];
                iht4x4_add(&c4, &mut d_scalar, 4, tx);
                iht4x4_add_wide(&c4, &mut d_wide, 4, tx);
                assert_eq!(d_scalar, d_wide, "4x4 {:?} seed {}", tx, seed);

                let mut c8 = [0i32; 64];
                fht8x8(&input, 8, &mut c8, tx, BitDepth::Eight);
                let mut d_scalar = vec![90u8; 64];
                let mut d_wide = vec![90u8; 64];
                iht8x8_add(&c8, &mut d_scalar, 8, tx);
                iht8x8_add_wide(&c8, &mut d_wide, 8, tx);
                assert_eq!(d_scalar, d_wide, "8x8 {:?} seed {}", tx, seed);

                let mut c16 = [0i32; 256];
                fht16x16(&input, 16, &mut c16, tx, BitDepth::Eight);
                let mut d_scalar = vec![200u8; 256];
                let mut d_wide = vec![200u8; 256];
                iht16x16_add(&c16, &mut d_scalar, 16, tx);
                iht16x16_add_wide(&c16, &mut d_wide, 16, tx);
                assert_eq!(d_scalar, d_wide, "16x16 {:?} seed {}", tx, seed);
            }

            let mut c32 = [0i32; 1024];
            fdct32x32(&input, 32, &mut c32, BitDepth::Eight);
            let mut d_scalar = vec![128u8; 1024];
            let mut d_wide = vec![128u8; 1024];
            idct32x32_add(&c32, &mut d_scalar, 32);
            idct32x32_add_wide(&c32, &mut d_wide, 32);
            assert_eq!(d_scalar, d_wide, "32x32 seed {}", seed);
        }
    }

    #[test]
    fn boundary_inputs_match_scalar() {
        // all-max-magnitude residuals exercise the widest intermediates
        for &value in &[255i16, -255] {
            let input = vec![value; 1024];
            let mut a = [0i32; 1024];
            let mut b = [0i32; 1024];
            fdct32x32(&input, 32, &mut a, BitDepth::Eight);
            fdct32x32_wide(&input, 32, &mut b);
            assert_eq!(a[..], b[..], "flat {}", value);
        }
    }
}
