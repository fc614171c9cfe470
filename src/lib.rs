//! Bit-exact integer block transforms for VP9-style video coding.
//!
//! Forward and inverse DCT/ADST transforms for square blocks of 4, 8, 16
//! and 32 samples, plus the lossless 4x4 Walsh-Hadamard pair, at 8-, 10-
//! and 12-bit pixel depths. Every implementation variant in this crate
//! (scalar reference, wider-accumulator high-bit-depth path, `wide`
//! vectorized path) produces identical integer output for identical
//! input: decoders must reconstruct the exact pixels the encoder saw, so
//! "close enough" is wrong here.
//!
//! The forward entry points take a pixel residual and produce raw
//! coefficients for the quantizer; the inverse entry points take
//! coefficients and add the reconstructed residual onto a prediction
//! block, clamping to the pixel range. All functions are pure over their
//! caller-supplied buffers and safe to call from any number of threads
//! on disjoint blocks.

#![cfg_attr(not(feature = "std"), no_std)]

mod block;
mod forward;
mod inverse;
mod lanes;
mod tables;
mod txfm2d;

#[cfg(feature = "use_wide")]
mod batch;

pub use block::{PixelBlock, PixelBlockMut};
pub use txfm2d::{
    fdct32x32, fht16x16, fht4x4, fht8x8, forward_dc_only, forward_transform_2d, fwht4x4,
    idct32x32_add, idct32x32_add_highbd, iht16x16_add, iht16x16_add_highbd, iht4x4_add,
    iht4x4_add_highbd, iht8x8_add, iht8x8_add_highbd, inverse_dc_only_add,
    inverse_dc_only_add_highbd, inverse_transform_2d_add, inverse_transform_2d_add_highbd,
    inverse_transform_2d_add_partial, iwht4x4_add, iwht4x4_add_highbd, BitDepth, TxSize, TxType,
};

#[cfg(feature = "use_wide")]
pub use batch::{
    fdct32x32_wide, fht16x16_wide, fht4x4_wide, fht8x8_wide, idct32x32_add_wide,
    iht16x16_add_wide, iht4x4_add_wide, iht8x8_add_wide,
};

#[cfg(any(feature = "benchmark", test))]
pub use tables::{COSPI_16_64, SINPI_1_9};
