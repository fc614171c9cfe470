//! 2-D transform composition and the public dispatch surface.
//!
//! A 2-D transform is two 1-D passes with size-specific scaling glue:
//! the forward path runs the column kernel over the pre-scaled input,
//! applies the pass-boundary rounding, runs the row kernel and applies
//! the output rounding; the inverse path runs rows then columns and
//! defers all scaling to a single round-and-clamp in the reconstruction
//! add. The per-size pre-shifts and the asymmetric roundings below are
//! bitstream contract values. Do not unify them.

use crate::block::{PixelBlock, PixelBlockMut};
use crate::forward::{fadst16, fadst4, fadst8, fdct16, fdct32, fdct4, fdct8, fwht4};
use crate::inverse::{iadst16, iadst4, iadst8, idct16, idct32, idct4, idct8, iwht4};
use crate::lanes::{HighLane, ScalarLane, TxLane};
use crate::tables::{COSPI_16_64, UNIT_QUANT_SHIFT};

/// Row/column transform pair. The first named axis is the column
/// (vertical) kernel, matching the codec convention: `AdstDct` runs ADST
/// down the columns and DCT along the rows.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum TxType {
    DctDct,
    AdstDct,
    DctAdst,
    AdstAdst,
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub(crate) enum Tx1d {
    Dct,
    Adst,
}

impl TxType {
    #[inline]
    pub(crate) fn split(self) -> (Tx1d, Tx1d) {
        match self {
            TxType::DctDct => (Tx1d::Dct, Tx1d::Dct),
            TxType::AdstDct => (Tx1d::Adst, Tx1d::Dct),
            TxType::DctAdst => (Tx1d::Dct, Tx1d::Adst),
            TxType::AdstAdst => (Tx1d::Adst, Tx1d::Adst),
        }
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum TxSize {
    Tx4x4,
    Tx8x8,
    Tx16x16,
    Tx32x32,
}

impl TxSize {
    #[inline]
    pub fn dim(self) -> usize {
        match self {
            TxSize::Tx4x4 => 4,
            TxSize::Tx8x8 => 8,
            TxSize::Tx16x16 => 16,
            TxSize::Tx32x32 => 32,
        }
    }

    /// Right shift applied once by inverse reconstruction.
    #[inline]
    fn recon_shift(self) -> u32 {
        match self {
            TxSize::Tx4x4 => 4,
            TxSize::Tx8x8 => 5,
            TxSize::Tx16x16 | TxSize::Tx32x32 => 6,
        }
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum BitDepth {
    Eight,
    Ten,
    Twelve,
}

impl BitDepth {
    #[inline]
    pub fn bits(self) -> u32 {
        match self {
            BitDepth::Eight => 8,
            BitDepth::Ten => 10,
            BitDepth::Twelve => 12,
        }
    }

    #[inline]
    pub fn max_pixel(self) -> i32 {
        (1 << self.bits()) - 1
    }
}

/// Rounding applied at a pass boundary. Each size uses a fixed pair; the
/// asymmetric forms reproduce the reference bit-exactly and are not
/// interchangeable with the symmetric one.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub(crate) enum PassRound {
    None,
    /// `(x + 1) >> 2`
    PlusOneQuarter,
    /// `x / 2` rounding toward zero
    HalfToZero,
    /// `(x + 1 + (x < 0)) >> 2`
    QuarterBiased,
}

impl PassRound {
    #[inline(always)]
    pub(crate) fn apply<L: TxLane>(self, v: L) -> L {
        match self {
            PassRound::None => v,
            PassRound::PlusOneQuarter => (v + L::splat(1)).sar(2),
            PassRound::HalfToZero => v.half_to_zero(),
            PassRound::QuarterBiased => v.quarter_biased(),
        }
    }
}

/// Per-size forward scaling policy: input pre-shift, whether the 4x4 DC
/// input bias applies, and the two pass roundings.
pub(crate) struct FwdScaling {
    pub pre_shift: u32,
    pub dc_bias: bool,
    pub mid: PassRound,
    pub post: PassRound,
}

pub(crate) const FWD_SCALING_4: FwdScaling = FwdScaling {
    pre_shift: 4,
    dc_bias: true,
    mid: PassRound::None,
    post: PassRound::PlusOneQuarter,
};

pub(crate) const FWD_SCALING_8: FwdScaling = FwdScaling {
    pre_shift: 2,
    dc_bias: false,
    mid: PassRound::None,
    post: PassRound::HalfToZero,
};

pub(crate) const FWD_SCALING_16: FwdScaling = FwdScaling {
    pre_shift: 2,
    dc_bias: false,
    mid: PassRound::QuarterBiased,
    post: PassRound::None,
};

pub(crate) const FWD_SCALING_32: FwdScaling = FwdScaling {
    pre_shift: 2,
    dc_bias: false,
    mid: PassRound::QuarterBiased,
    post: PassRound::QuarterBiased,
};

fn forward_2d<L: ScalarLane, const N: usize>(
    input: &[i16],
    stride: usize,
    col_kernel: fn([L; N]) -> [L; N],
    row_kernel: fn([L; N]) -> [L; N],
    scaling: &FwdScaling,
    output: &mut [i32],
) {
    debug_assert!(output.len() >= N * N);
    let view = PixelBlock::new(input, stride, N, N);

    let mut tmp = [[L::splat(0); N]; N];
    for i in 0..N {
        let mut v = [L::splat(0); N];
        for j in 0..N {
            let mut p = i32::from(view.row(j)[i]) << scaling.pre_shift;
            if scaling.dc_bias && i == 0 && j == 0 && p != 0 {
                p += 1;
            }
            v[j] = L::from_i32(p);
        }
        let r = col_kernel(v);
        for j in 0..N {
            tmp[j][i] = scaling.mid.apply(r[j]);
        }
    }
    for i in 0..N {
        let r = row_kernel(tmp[i]);
        for j in 0..N {
            output[i * N + j] = scaling.post.apply(r[j]).to_i32();
        }
    }
}

fn inverse_2d_partial<L: ScalarLane, const N: usize>(
    coeffs: &[i32],
    row_kernel: fn([L; N]) -> [L; N],
    col_kernel: fn([L; N]) -> [L; N],
    coeff_rows: usize,
) -> [[L; N]; N] {
    debug_assert!(coeffs.len() >= N * N);
    debug_assert!(coeff_rows <= N);
    // rows past coeff_rows must be zero: a zero row transforms to a zero
    // row, so skipping it is bit-exact, not approximate
    debug_assert!(coeffs[coeff_rows * N..N * N].iter().all(|&c| c == 0));

    let mut tmp = [[L::splat(0); N]; N];
    for i in 0..coeff_rows {
        let mut v = [L::splat(0); N];
        for j in 0..N {
            v[j] = L::from_i32(coeffs[i * N + j]).wrap();
        }
        tmp[i] = row_kernel(v);
    }
    let mut out = tmp;
    for i in 0..N {
        let mut v = [L::splat(0); N];
        for j in 0..N {
            v[j] = tmp[j][i];
        }
        let r = col_kernel(v);
        for j in 0..N {
            out[j][i] = r[j];
        }
    }
    out
}

fn inverse_2d<L: ScalarLane, const N: usize>(
    coeffs: &[i32],
    row_kernel: fn([L; N]) -> [L; N],
    col_kernel: fn([L; N]) -> [L; N],
) -> [[L; N]; N] {
    inverse_2d_partial(coeffs, row_kernel, col_kernel, N)
}

#[inline(always)]
fn final_round<L: ScalarLane>(v: L, shift: u32) -> i32 {
    // the lossless path (shift 0) adds raw values
    if shift == 0 {
        v.to_i32()
    } else {
        v.round2(shift).to_i32()
    }
}

pub(crate) fn add_clamped<L: ScalarLane, const N: usize>(
    residual: &[[L; N]; N],
    dest: &mut PixelBlockMut<'_, u8>,
    shift: u32,
) {
    for j in 0..N {
        let row = dest.row_mut(j);
        for i in 0..N {
            let r = final_round(residual[j][i], shift);
            row[i] = (i32::from(row[i]) + r).clamp(0, 255) as u8;
        }
    }
}

pub(crate) fn add_clamped_highbd<L: ScalarLane, const N: usize>(
    residual: &[[L; N]; N],
    dest: &mut PixelBlockMut<'_, u16>,
    shift: u32,
    max_pixel: i32,
) {
    for j in 0..N {
        let row = dest.row_mut(j);
        for i in 0..N {
            let r = final_round(residual[j][i], shift);
            row[i] = (i32::from(row[i]) + r).clamp(0, max_pixel) as u16;
        }
    }
}

macro_rules! pick_kernel {
    ($tx:expr, $dct:path, $adst:path) => {
        match $tx {
            Tx1d::Dct => $dct,
            Tx1d::Adst => $adst,
        }
    };
}

fn fht4x4_with<L: ScalarLane>(
    input: &[i16],
    stride: usize,
    output: &mut [i32; 16],
    tx_type: TxType,
) {
    let (col, row) = tx_type.split();
    forward_2d::<L, 4>(
        input,
        stride,
        pick_kernel!(col, fdct4::<L>, fadst4::<L>),
        pick_kernel!(row, fdct4::<L>, fadst4::<L>),
        &FWD_SCALING_4,
        output,
    );
}

fn fht8x8_with<L: ScalarLane>(
    input: &[i16],
    stride: usize,
    output: &mut [i32; 64],
    tx_type: TxType,
) {
    let (col, row) = tx_type.split();
    forward_2d::<L, 8>(
        input,
        stride,
        pick_kernel!(col, fdct8::<L>, fadst8::<L>),
        pick_kernel!(row, fdct8::<L>, fadst8::<L>),
        &FWD_SCALING_8,
        output,
    );
}

fn fht16x16_with<L: ScalarLane>(
    input: &[i16],
    stride: usize,
    output: &mut [i32; 256],
    tx_type: TxType,
) {
    let (col, row) = tx_type.split();
    forward_2d::<L, 16>(
        input,
        stride,
        pick_kernel!(col, fdct16::<L>, fadst16::<L>),
        pick_kernel!(row, fdct16::<L>, fadst16::<L>),
        &FWD_SCALING_16,
        output,
    );
}

fn fdct32x32_with<L: ScalarLane>(input: &[i16], stride: usize, output: &mut [i32; 1024]) {
    forward_2d::<L, 32>(
        input,
        stride,
        fdct32::<L>,
        fdct32::<L>,
        &FWD_SCALING_32,
        output,
    );
}

/// Forward 4x4 hybrid transform. Residual in, coefficients out; the
/// destination holds raw coefficients row-major.
pub fn fht4x4(
    input: &[i16],
    stride: usize,
    output: &mut [i32; 16],
    tx_type: TxType,
    bit_depth: BitDepth,
) {
    match bit_depth {
        BitDepth::Eight => fht4x4_with::<i32>(input, stride, output, tx_type),
        BitDepth::Ten => fht4x4_with::<HighLane<10>>(input, stride, output, tx_type),
        BitDepth::Twelve => fht4x4_with::<HighLane<12>>(input, stride, output, tx_type),
    }
}

/// Forward 8x8 hybrid transform.
pub fn fht8x8(
    input: &[i16],
    stride: usize,
    output: &mut [i32; 64],
    tx_type: TxType,
    bit_depth: BitDepth,
) {
    match bit_depth {
        BitDepth::Eight => fht8x8_with::<i32>(input, stride, output, tx_type),
        BitDepth::Ten => fht8x8_with::<HighLane<10>>(input, stride, output, tx_type),
        BitDepth::Twelve => fht8x8_with::<HighLane<12>>(input, stride, output, tx_type),
    }
}

/// Forward 16x16 hybrid transform.
pub fn fht16x16(
    input: &[i16],
    stride: usize,
    output: &mut [i32; 256],
    tx_type: TxType,
    bit_depth: BitDepth,
) {
    match bit_depth {
        BitDepth::Eight => fht16x16_with::<i32>(input, stride, output, tx_type),
        BitDepth::Ten => fht16x16_with::<HighLane<10>>(input, stride, output, tx_type),
        BitDepth::Twelve => fht16x16_with::<HighLane<12>>(input, stride, output, tx_type),
    }
}

/// Forward 32x32 transform. 32x32 is DCT-only.
pub fn fdct32x32(input: &[i16], stride: usize, output: &mut [i32; 1024], bit_depth: BitDepth) {
    match bit_depth {
        BitDepth::Eight => fdct32x32_with::<i32>(input, stride, output),
        BitDepth::Ten => fdct32x32_with::<HighLane<10>>(input, stride, output),
        BitDepth::Twelve => fdct32x32_with::<HighLane<12>>(input, stride, output),
    }
}

fn iht_residual_4<L: ScalarLane>(coeffs: &[i32; 16], tx_type: TxType) -> [[L; 4]; 4] {
    let (col, row) = tx_type.split();
    inverse_2d::<L, 4>(
        coeffs,
        pick_kernel!(row, idct4::<L>, iadst4::<L>),
        pick_kernel!(col, idct4::<L>, iadst4::<L>),
    )
}

fn iht_residual_8<L: ScalarLane>(coeffs: &[i32; 64], tx_type: TxType) -> [[L; 8]; 8] {
    let (col, row) = tx_type.split();
    inverse_2d::<L, 8>(
        coeffs,
        pick_kernel!(row, idct8::<L>, iadst8::<L>),
        pick_kernel!(col, idct8::<L>, iadst8::<L>),
    )
}

fn iht_residual_16<L: ScalarLane>(coeffs: &[i32; 256], tx_type: TxType) -> [[L; 16]; 16] {
    let (col, row) = tx_type.split();
    inverse_2d::<L, 16>(
        coeffs,
        pick_kernel!(row, idct16::<L>, iadst16::<L>),
        pick_kernel!(col, idct16::<L>, iadst16::<L>),
    )
}

/// Inverse 4x4 hybrid transform, added to the 8-bit prediction in `dest`.
pub fn iht4x4_add(coeffs: &[i32; 16], dest: &mut [u8], stride: usize, tx_type: TxType) {
    let residual = iht_residual_4::<i32>(coeffs, tx_type);
    let mut view = PixelBlockMut::new(dest, stride, 4, 4);
    add_clamped(&residual, &mut view, 4);
}

/// Inverse 8x8 hybrid transform, added to the 8-bit prediction in `dest`.
pub fn iht8x8_add(coeffs: &[i32; 64], dest: &mut [u8], stride: usize, tx_type: TxType) {
    let residual = iht_residual_8::<i32>(coeffs, tx_type);
    let mut view = PixelBlockMut::new(dest, stride, 8, 8);
    add_clamped(&residual, &mut view, 5);
}

/// Inverse 16x16 hybrid transform, added to the 8-bit prediction in `dest`.
pub fn iht16x16_add(coeffs: &[i32; 256], dest: &mut [u8], stride: usize, tx_type: TxType) {
    let residual = iht_residual_16::<i32>(coeffs, tx_type);
    let mut view = PixelBlockMut::new(dest, stride, 16, 16);
    add_clamped(&residual, &mut view, 6);
}

/// Inverse 32x32 transform (DCT-only), added to the 8-bit prediction.
pub fn idct32x32_add(coeffs: &[i32; 1024], dest: &mut [u8], stride: usize) {
    let residual = inverse_2d::<i32, 32>(coeffs, idct32::<i32>, idct32::<i32>);
    let mut view = PixelBlockMut::new(dest, stride, 32, 32);
    add_clamped(&residual, &mut view, 6);
}

macro_rules! iht_add_highbd {
    ($name:ident, $residual:ident, $coeffs_len:expr, $n:expr, $shift:expr, $doc:expr) => {
        #[doc = $doc]
        pub fn $name(
            coeffs: &[i32; $coeffs_len],
            dest: &mut [u16],
            stride: usize,
            tx_type: TxType,
            bit_depth: BitDepth,
        ) {
            debug_assert!(bit_depth != BitDepth::Eight);
            let mut view = PixelBlockMut::new(dest, stride, $n, $n);
            match bit_depth {
                BitDepth::Ten => {
                    let residual = $residual::<HighLane<10>>(coeffs, tx_type);
                    add_clamped_highbd(&residual, &mut view, $shift, bit_depth.max_pixel());
                }
                _ => {
                    let residual = $residual::<HighLane<12>>(coeffs, tx_type);
                    add_clamped_highbd(&residual, &mut view, $shift, bit_depth.max_pixel());
                }
            }
        }
    };
}

iht_add_highbd!(
    iht4x4_add_highbd,
    iht_residual_4,
    16,
    4,
    4,
    "Inverse 4x4 hybrid transform for extended bit depths."
);
iht_add_highbd!(
    iht8x8_add_highbd,
    iht_residual_8,
    64,
    8,
    5,
    "Inverse 8x8 hybrid transform for extended bit depths."
);
iht_add_highbd!(
    iht16x16_add_highbd,
    iht_residual_16,
    256,
    16,
    6,
    "Inverse 16x16 hybrid transform for extended bit depths."
);

/// Inverse 32x32 transform for extended bit depths.
pub fn idct32x32_add_highbd(
    coeffs: &[i32; 1024],
    dest: &mut [u16],
    stride: usize,
    bit_depth: BitDepth,
) {
    debug_assert!(bit_depth != BitDepth::Eight);
    let mut view = PixelBlockMut::new(dest, stride, 32, 32);
    match bit_depth {
        BitDepth::Ten => {
            let residual =
                inverse_2d::<HighLane<10>, 32>(coeffs, idct32::<HighLane<10>>, idct32::<HighLane<10>>);
            add_clamped_highbd(&residual, &mut view, 6, bit_depth.max_pixel());
        }
        _ => {
            let residual =
                inverse_2d::<HighLane<12>, 32>(coeffs, idct32::<HighLane<12>>, idct32::<HighLane<12>>);
            add_clamped_highbd(&residual, &mut view, 6, bit_depth.max_pixel());
        }
    }
}

/// Forward 4x4 Walsh-Hadamard transform for lossless coding. No pre-scale
/// and no rounding anywhere; the output carries a fixed x4 factor so the
/// coefficients pass through the shared quantizer unscathed.
pub fn fwht4x4(input: &[i16], stride: usize, output: &mut [i32; 16]) {
    let view = PixelBlock::new(input, stride, 4, 4);

    let mut tmp = [[0i32; 4]; 4];
    for i in 0..4 {
        let col = [
            i32::from(view.row(0)[i]),
            i32::from(view.row(1)[i]),
            i32::from(view.row(2)[i]),
            i32::from(view.row(3)[i]),
        ];
        let r = fwht4(col);
        for j in 0..4 {
            tmp[j][i] = r[j];
        }
    }
    for i in 0..4 {
        let r = fwht4(tmp[i]);
        for j in 0..4 {
            output[i * 4 + j] = r[j] << UNIT_QUANT_SHIFT;
        }
    }
}

fn iwht_residual<L: ScalarLane>(coeffs: &[i32; 16]) -> [[L; 4]; 4] {
    let mut tmp = [[L::splat(0); 4]; 4];
    for i in 0..4 {
        let row = [
            L::from_i32(coeffs[i * 4]).sar(UNIT_QUANT_SHIFT),
            L::from_i32(coeffs[i * 4 + 1]).sar(UNIT_QUANT_SHIFT),
            L::from_i32(coeffs[i * 4 + 2]).sar(UNIT_QUANT_SHIFT),
            L::from_i32(coeffs[i * 4 + 3]).sar(UNIT_QUANT_SHIFT),
        ];
        let r = iwht4(row);
        for j in 0..4 {
            tmp[i][j] = r[j].wrap();
        }
    }
    let mut out = tmp;
    for i in 0..4 {
        let col = [tmp[0][i], tmp[1][i], tmp[2][i], tmp[3][i]];
        let r = iwht4(col);
        for j in 0..4 {
            out[j][i] = r[j].wrap();
        }
    }
    out
}

/// Inverse 4x4 Walsh-Hadamard transform added to the 8-bit prediction.
/// Exactly reverses [`fwht4x4`].
pub fn iwht4x4_add(coeffs: &[i32; 16], dest: &mut [u8], stride: usize) {
    let residual = iwht_residual::<i32>(coeffs);
    let mut view = PixelBlockMut::new(dest, stride, 4, 4);
    add_clamped(&residual, &mut view, 0);
}

/// Inverse 4x4 Walsh-Hadamard transform for extended bit depths.
pub fn iwht4x4_add_highbd(coeffs: &[i32; 16], dest: &mut [u16], stride: usize, bit_depth: BitDepth) {
    debug_assert!(bit_depth != BitDepth::Eight);
    let mut view = PixelBlockMut::new(dest, stride, 4, 4);
    match bit_depth {
        BitDepth::Ten => {
            let residual = iwht_residual::<HighLane<10>>(coeffs);
            add_clamped_highbd(&residual, &mut view, 0, bit_depth.max_pixel());
        }
        _ => {
            let residual = iwht_residual::<HighLane<12>>(coeffs);
            add_clamped_highbd(&residual, &mut view, 0, bit_depth.max_pixel());
        }
    }
}

/// Forward DC-only fast path: the DC coefficient of a flat approximation
/// of `input`, computed without running the butterflies. Tracks the full
/// transform's DC within one step of fixed-point rounding; used when
/// only the DC coefficient will be coded. The inverse DC path
/// ([`inverse_dc_only_add`]) is exact, this one is an estimate.
pub fn forward_dc_only(input: &[i16], stride: usize, size: TxSize) -> i32 {
    let n = size.dim();
    let view = PixelBlock::new(input, stride, n, n);

    let mut sum = 0i32;
    for j in 0..n {
        for &p in view.row(j) {
            sum += i32::from(p);
        }
    }
    match size {
        TxSize::Tx4x4 => sum * 2,
        TxSize::Tx8x8 => sum,
        TxSize::Tx16x16 => sum >> 1,
        TxSize::Tx32x32 => sum >> 3,
    }
}

fn dc_flat_value<L: ScalarLane>(dc: i32, shift: u32) -> i32 {
    let out = L::from_i32(dc).wrap().mul_rs(COSPI_16_64).wrap();
    let out = out.mul_rs(COSPI_16_64).wrap();
    out.round2(shift).to_i32()
}

/// Inverse DC-only fast path for 8-bit pixels: adds the flat value a
/// DC-only coefficient block reconstructs to. Bit-identical to running
/// the full inverse with all AC coefficients zero.
pub fn inverse_dc_only_add(dc: i32, dest: &mut [u8], stride: usize, size: TxSize) {
    let n = size.dim();
    let a1 = dc_flat_value::<i32>(dc, size.recon_shift());
    let mut view = PixelBlockMut::new(dest, stride, n, n);
    for j in 0..n {
        for p in view.row_mut(j) {
            *p = (i32::from(*p) + a1).clamp(0, 255) as u8;
        }
    }
}

/// Inverse DC-only fast path for extended bit depths.
pub fn inverse_dc_only_add_highbd(
    dc: i32,
    dest: &mut [u16],
    stride: usize,
    size: TxSize,
    bit_depth: BitDepth,
) {
    debug_assert!(bit_depth != BitDepth::Eight);
    let n = size.dim();
    let a1 = match bit_depth {
        BitDepth::Ten => dc_flat_value::<HighLane<10>>(dc, size.recon_shift()),
        _ => dc_flat_value::<HighLane<12>>(dc, size.recon_shift()),
    };
    let max = bit_depth.max_pixel();
    let mut view = PixelBlockMut::new(dest, stride, n, n);
    for j in 0..n {
        for p in view.row_mut(j) {
            *p = (i32::from(*p) + a1).clamp(0, max) as u16;
        }
    }
}

/// Size-generic forward dispatch. `output` must hold at least N*N
/// coefficients; ADST types are only defined up to 16x16. With the
/// `use_wide` feature the 8-bit path runs the vectorized variants;
/// the output is bit-identical either way.
pub fn forward_transform_2d(
    input: &[i16],
    stride: usize,
    output: &mut [i32],
    size: TxSize,
    tx_type: TxType,
    bit_depth: BitDepth,
) {
    assert!(output.len() >= size.dim() * size.dim());
    debug_assert!(
        size != TxSize::Tx32x32 || tx_type == TxType::DctDct,
        "32x32 is DCT-only"
    );
    match size {
        TxSize::Tx4x4 => {
            let out: &mut [i32; 16] = (&mut output[..16]).try_into().unwrap();
            #[cfg(feature = "use_wide")]
            if bit_depth == BitDepth::Eight {
                crate::batch::fht4x4_wide(input, stride, out, tx_type);
                return;
            }
            fht4x4(input, stride, out, tx_type, bit_depth);
        }
        TxSize::Tx8x8 => {
            let out: &mut [i32; 64] = (&mut output[..64]).try_into().unwrap();
            #[cfg(feature = "use_wide")]
            if bit_depth == BitDepth::Eight {
                crate::batch::fht8x8_wide(input, stride, out, tx_type);
                return;
            }
            fht8x8(input, stride, out, tx_type, bit_depth);
        }
        TxSize::Tx16x16 => {
            let out: &mut [i32; 256] = (&mut output[..256]).try_into().unwrap();
            #[cfg(feature = "use_wide")]
            if bit_depth == BitDepth::Eight {
                crate::batch::fht16x16_wide(input, stride, out, tx_type);
                return;
            }
            fht16x16(input, stride, out, tx_type, bit_depth);
        }
        TxSize::Tx32x32 => {
            let out: &mut [i32; 1024] = (&mut output[..1024]).try_into().unwrap();
            #[cfg(feature = "use_wide")]
            if bit_depth == BitDepth::Eight {
                crate::batch::fdct32x32_wide(input, stride, out);
                return;
            }
            fdct32x32(input, stride, out, bit_depth);
        }
    }
}

/// Size-generic inverse dispatch for 8-bit pixels: reconstructs the
/// residual and adds it to the prediction already in `dest`. With the
/// `use_wide` feature this runs the vectorized variants; the output is
/// bit-identical either way.
pub fn inverse_transform_2d_add(
    coeffs: &[i32],
    dest: &mut [u8],
    stride: usize,
    size: TxSize,
    tx_type: TxType,
) {
    assert!(coeffs.len() >= size.dim() * size.dim());
    debug_assert!(
        size != TxSize::Tx32x32 || tx_type == TxType::DctDct,
        "32x32 is DCT-only"
    );
    match size {
        TxSize::Tx4x4 => {
            let c: &[i32; 16] = coeffs[..16].try_into().unwrap();
            #[cfg(feature = "use_wide")]
            crate::batch::iht4x4_add_wide(c, dest, stride, tx_type);
            #[cfg(not(feature = "use_wide"))]
            iht4x4_add(c, dest, stride, tx_type);
        }
        TxSize::Tx8x8 => {
            let c: &[i32; 64] = coeffs[..64].try_into().unwrap();
            #[cfg(feature = "use_wide")]
            crate::batch::iht8x8_add_wide(c, dest, stride, tx_type);
            #[cfg(not(feature = "use_wide"))]
            iht8x8_add(c, dest, stride, tx_type);
        }
        TxSize::Tx16x16 => {
            let c: &[i32; 256] = coeffs[..256].try_into().unwrap();
            #[cfg(feature = "use_wide")]
            crate::batch::iht16x16_add_wide(c, dest, stride, tx_type);
            #[cfg(not(feature = "use_wide"))]
            iht16x16_add(c, dest, stride, tx_type);
        }
        TxSize::Tx32x32 => {
            let c: &[i32; 1024] = coeffs[..1024].try_into().unwrap();
            #[cfg(feature = "use_wide")]
            crate::batch::idct32x32_add_wide(c, dest, stride);
            #[cfg(not(feature = "use_wide"))]
            idct32x32_add(c, dest, stride);
        }
    }
}

/// Inverse dispatch for sparse coefficient blocks: `coeff_rows` is the
/// number of leading coefficient rows that may be non-zero, as derived by
/// the caller from the entropy decoder's end-of-block position. Rows at
/// or past `coeff_rows` must be zero (debug-asserted). A zero row
/// transforms to a zero row, so skipping its pass is bit-identical to
/// [`inverse_transform_2d_add`], just cheaper for the sparse blocks that
/// dominate real streams.
pub fn inverse_transform_2d_add_partial(
    coeffs: &[i32],
    dest: &mut [u8],
    stride: usize,
    size: TxSize,
    tx_type: TxType,
    coeff_rows: usize,
) {
    assert!(coeffs.len() >= size.dim() * size.dim());
    debug_assert!(
        size != TxSize::Tx32x32 || tx_type == TxType::DctDct,
        "32x32 is DCT-only"
    );
    let (col, row) = tx_type.split();
    match size {
        TxSize::Tx4x4 => {
            let residual = inverse_2d_partial::<i32, 4>(
                coeffs,
                pick_kernel!(row, idct4::<i32>, iadst4::<i32>),
                pick_kernel!(col, idct4::<i32>, iadst4::<i32>),
                coeff_rows,
            );
            let mut view = PixelBlockMut::new(dest, stride, 4, 4);
            add_clamped(&residual, &mut view, 4);
        }
        TxSize::Tx8x8 => {
            let residual = inverse_2d_partial::<i32, 8>(
                coeffs,
                pick_kernel!(row, idct8::<i32>, iadst8::<i32>),
                pick_kernel!(col, idct8::<i32>, iadst8::<i32>),
                coeff_rows,
            );
            let mut view = PixelBlockMut::new(dest, stride, 8, 8);
            add_clamped(&residual, &mut view, 5);
        }
        TxSize::Tx16x16 => {
            let residual = inverse_2d_partial::<i32, 16>(
                coeffs,
                pick_kernel!(row, idct16::<i32>, iadst16::<i32>),
                pick_kernel!(col, idct16::<i32>, iadst16::<i32>),
                coeff_rows,
            );
            let mut view = PixelBlockMut::new(dest, stride, 16, 16);
            add_clamped(&residual, &mut view, 6);
        }
        TxSize::Tx32x32 => {
            let residual =
                inverse_2d_partial::<i32, 32>(coeffs, idct32::<i32>, idct32::<i32>, coeff_rows);
            let mut view = PixelBlockMut::new(dest, stride, 32, 32);
            add_clamped(&residual, &mut view, 6);
        }
    }
}

/// Size-generic inverse dispatch for 10/12-bit pixels.
pub fn inverse_transform_2d_add_highbd(
    coeffs: &[i32],
    dest: &mut [u16],
    stride: usize,
    size: TxSize,
    tx_type: TxType,
    bit_depth: BitDepth,
) {
    assert!(coeffs.len() >= size.dim() * size.dim());
    debug_assert!(
        size != TxSize::Tx32x32 || tx_type == TxType::DctDct,
        "32x32 is DCT-only"
    );
    match size {
        TxSize::Tx4x4 => {
            let c: &[i32; 16] = coeffs[..16].try_into().unwrap();
            iht4x4_add_highbd(c, dest, stride, tx_type, bit_depth);
        }
        TxSize::Tx8x8 => {
            let c: &[i32; 64] = coeffs[..64].try_into().unwrap();
            iht8x8_add_highbd(c, dest, stride, tx_type, bit_depth);
        }
        TxSize::Tx16x16 => {
            let c: &[i32; 256] = coeffs[..256].try_into().unwrap();
            iht16x16_add_highbd(c, dest, stride, tx_type, bit_depth);
        }
        TxSize::Tx32x32 => {
            let c: &[i32; 1024] = coeffs[..1024].try_into().unwrap();
            idct32x32_add_highbd(c, dest, stride, bit_depth);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn residual(seed: i32, len: usize, amplitude: i32) -> Vec<i16> {
        let mut state = seed as u32;
        (0..len)
            .map(|_| {
                // small LCG, deterministic across platforms
                state = state.wrapping_mul(1_664_525).wrapping_add(1_013_904_223);
                ((state >> 16) as i32 % (2 * amplitude + 1) - amplitude) as i16
            })
            .collect()
    }

    fn roundtrip_case(size: TxSize, tx_type: TxType, amplitude: i32, tol: i32) {
        let n = size.dim();
        let input = residual(n as i32 * 7 + amplitude, n * n, amplitude);
        let mut coeffs = vec![0i32; n * n];
        forward_transform_2d(&input, n, &mut coeffs, size, tx_type, BitDepth::Eight);

        // reconstruct against a mid-gray prediction so negative residuals
        // survive the clamp
        let mut dest = vec![128u8; n * n];
        inverse_transform_2d_add(&coeffs, &mut dest, n, size, tx_type);

        for i in 0..n * n {
            let got = i32::from(dest[i]) - 128;
            let want = i32::from(input[i]);
            assert!(
                (got - want).abs() <= tol,
                "{:?} {:?} idx {}: reconstructed {} vs residual {}",
                size,
                tx_type,
                i,
                got,
                want
            );
        }
    }

    #[test]
    fn roundtrip_all_sizes_dct() {
        roundtrip_case(TxSize::Tx4x4, TxType::DctDct, 100, 1);
        roundtrip_case(TxSize::Tx8x8, TxType::DctDct, 100, 1);
        roundtrip_case(TxSize::Tx16x16, TxType::DctDct, 100, 2);
        roundtrip_case(TxSize::Tx32x32, TxType::DctDct, 100, 2);
    }

    #[test]
    fn roundtrip_adst_combinations() {
        for &size in &[TxSize::Tx4x4, TxSize::Tx8x8, TxSize::Tx16x16] {
            for &tx in &[TxType::AdstDct, TxType::DctAdst, TxType::AdstAdst] {
                let tol = if size == TxSize::Tx16x16 { 2 } else { 1 };
                roundtrip_case(size, tx, 80, tol);
            }
        }
    }

    #[test]
    fn zero_block_forward_is_zero_and_inverse_leaves_prediction() {
        let input = [0i16; 64];
        let mut coeffs = [0i32; 64];
        fht8x8(&input, 8, &mut coeffs, TxType::DctDct, BitDepth::Eight);
        assert_eq!(coeffs, [0i32; 64]);

        let mut dest: Vec<u8> = (0..64).map(|i| (i * 3) as u8).collect();
        let before = dest.clone();
        iht8x8_add(&coeffs, &mut dest, 8, TxType::DctDct);
        assert_eq!(dest, before);
    }

    #[test]
    fn forward_dc_only_tracks_full_transform_on_flat_blocks() {
        for &(size, value) in &[
            (TxSize::Tx4x4, 37i16),
            (TxSize::Tx8x8, -25),
            (TxSize::Tx16x16, 63),
            (TxSize::Tx32x32, -90),
        ] {
            let n = size.dim();
            let input = vec![value; n * n];
            let mut coeffs = vec![0i32; n * n];
            forward_transform_2d(
                &input,
                n,
                &mut coeffs,
                size,
                TxType::DctDct,
                BitDepth::Eight,
            );
            let fast = forward_dc_only(&input, n, size);
            // the fast path skips the butterflies, so it may differ from
            // the full DC by a rounding step but never more
            assert!(
                (coeffs[0] - fast).abs() <= 2,
                "{:?} flat {}: full {} fast {}",
                size,
                value,
                coeffs[0],
                fast
            );
            assert!(coeffs[1..].iter().all(|&c| c == 0));
        }
    }

    #[test]
    fn inverse_dc_only_matches_full_inverse() {
        for &size in &[
            TxSize::Tx4x4,
            TxSize::Tx8x8,
            TxSize::Tx16x16,
            TxSize::Tx32x32,
        ] {
            let n = size.dim();
            for &dc in &[1i32, -1, 100, -321, 1000] {
                let mut coeffs = vec![0i32; n * n];
                coeffs[0] = dc;

                let mut full = vec![100u8; n * n];
                inverse_transform_2d_add(&coeffs, &mut full, n, size, TxType::DctDct);

                let mut fast = vec![100u8; n * n];
                inverse_dc_only_add(dc, &mut fast, n, size);

                assert_eq!(full, fast, "{:?} dc {}", size, dc);
                // a DC-only block reconstructs flat
                assert!(full.iter().all(|&p| p == full[0]));
            }
        }
    }

    #[test]
    fn high_bit_depth_matches_low_on_8bit_legal_input() {
        let input = residual(99, 256, 255);
        for &tx in &[TxType::DctDct, TxType::AdstAdst] {
            let mut low = [0i32; 256];
            let mut high = [0i32; 256];
            fht16x16(&input, 16, &mut low, tx, BitDepth::Eight);
            fht16x16(&input, 16, &mut high, tx, BitDepth::Twelve);
            assert_eq!(low[..], high[..], "{:?}", tx);
        }
    }

    #[test]
    fn highbd_roundtrip_12bit() {
        let n = 16;
        let input = residual(5, n * n, 2000);
        let mut coeffs = vec![0i32; n * n];
        fht16x16(
            &input,
            n,
            (&mut coeffs[..]).try_into().unwrap(),
            TxType::DctDct,
            BitDepth::Twelve,
        );

        let mut dest = vec![2048u16; n * n];
        inverse_transform_2d_add_highbd(
            &coeffs,
            &mut dest,
            n,
            TxSize::Tx16x16,
            TxType::DctDct,
            BitDepth::Twelve,
        );
        for i in 0..n * n {
            let got = i32::from(dest[i]) - 2048;
            assert!(
                (got - i32::from(input[i])).abs() <= 2,
                "idx {}: {} vs {}",
                i,
                got,
                input[i]
            );
        }
    }

    #[test]
    fn partial_inverse_matches_full_on_sparse_blocks() {
        // only the top-left corner of the coefficient block is occupied,
        // as after quantization of a smooth block
        for &(size, occupied) in &[
            (TxSize::Tx8x8, 4usize),
            (TxSize::Tx16x16, 4),
            (TxSize::Tx32x32, 8),
            (TxSize::Tx32x32, 16),
        ] {
            let n = size.dim();
            let mut coeffs = vec![0i32; n * n];
            for r in 0..occupied {
                for c in 0..occupied {
                    coeffs[r * n + c] = ((r * 31 + c * 17) as i32 % 61) - 30;
                }
            }

            let mut full = vec![128u8; n * n];
            inverse_transform_2d_add(&coeffs, &mut full, n, size, TxType::DctDct);

            let mut partial = vec![128u8; n * n];
            inverse_transform_2d_add_partial(
                &coeffs,
                &mut partial,
                n,
                size,
                TxType::DctDct,
                occupied,
            );

            assert_eq!(full, partial, "{:?} rows {}", size, occupied);
        }
    }

    #[test]
    fn wht_roundtrip_is_lossless() {
        let input: [i16; 16] = [1, 2, 3, 4, 5, 6, 7, 8, 9, 10, 11, 12, 13, 14, 15, 16];
        let mut coeffs = [0i32; 16];
        fwht4x4(&input, 4, &mut coeffs);

        let mut dest = [0u8; 16];
        iwht4x4_add(&coeffs, &mut dest, 4);
        for i in 0..16 {
            assert_eq!(i32::from(dest[i]), i32::from(input[i]));
        }
    }

    #[test]
    fn wht_roundtrip_is_lossless_highbd() {
        let input: [i16; 16] = [
            512, -300, 77, 1023, 0, -1023, 400, 3, -8, 900, -512, 256, 128, -128, 64, -64,
        ];
        let mut coeffs = [0i32; 16];
        fwht4x4(&input, 4, &mut coeffs);

        let mut dest = [512u16; 16];
        iwht4x4_add_highbd(&coeffs, &mut dest, 4, BitDepth::Ten);
        for i in 0..16 {
            assert_eq!(
                i32::from(dest[i]),
                (512 + i32::from(input[i])).clamp(0, 1023)
            );
        }
    }

    #[test]
    fn strided_io_reads_and_writes_only_the_block() {
        // residual block embedded in a wider frame
        let stride = 12;
        let mut frame_in = vec![0i16; stride * 8];
        for j in 0..8 {
            for i in 0..8 {
                frame_in[j * stride + i] = ((i + j) as i16) * 5 - 20;
            }
        }
        let mut coeffs = [0i32; 64];
        fht8x8(&frame_in, stride, &mut coeffs, TxType::DctDct, BitDepth::Eight);

        let mut frame_out = vec![128u8; stride * 8];
        iht8x8_add(&coeffs, &mut frame_out, stride, TxType::DctDct);

        for j in 0..8 {
            for i in 0..stride {
                if i < 8 {
                    let got = i32::from(frame_out[j * stride + i]) - 128;
                    let want = i32::from(frame_in[j * stride + i]);
                    assert!((got - want).abs() <= 1);
                } else {
                    // bytes past the block width stay untouched
                    assert_eq!(frame_out[j * stride + i], 128);
                }
            }
        }
    }
}
