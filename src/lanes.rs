//! Arithmetic backends for the transform kernels.
//!
//! Every 1-D kernel in this crate is written once, generic over [`TxLane`].
//! A lane is one column's worth of butterfly state: `i32` for the 8-bit
//! scalar path, [`HighLane`] (64-bit accumulators) for 10/12-bit pixels,
//! and `wide` integer vectors for the batched path where each SIMD lane
//! carries an independent column. All implementations must produce
//! bit-identical results for inputs that are legal in the narrowest
//! profile; the equivalence tests in `batch.rs` and `lib.rs` hold them to
//! that.

use core::ops::{Add, Sub};

use crate::tables::{DCT_CONST_BITS, DCT_CONST_ROUNDING};

pub trait TxLane: Copy + Add<Output = Self> + Sub<Output = Self> {
    /// Broadcast a small constant into every element of the lane.
    fn splat(v: i32) -> Self;

    fn neg(self) -> Self;

    /// Wrap to the residue width the reference decoder stores between
    /// butterfly stages. A no-op for any value a legal input can produce.
    fn wrap(self) -> Self;

    /// Raw product with a Q14 table constant, kept at full accumulator
    /// width. Rounded back down by [`TxLane::rs`].
    fn mul(self, c: i32) -> Self;

    /// The round-shift: `(x + 2^13) >> 14`.
    fn rs(self) -> Self;

    fn shl(self, n: u32) -> Self;

    /// Plain arithmetic right shift, no rounding. The Walsh-Hadamard
    /// lifting steps depend on the truncation.
    fn sar(self, n: u32) -> Self;

    /// `(x + 2^(bits - 1)) >> bits`, the symmetric pass rounding.
    fn round2(self, bits: u32) -> Self;

    /// `x / 2` rounding toward zero: the 8x8 forward output scaling.
    fn half_to_zero(self) -> Self;

    /// `(x + 1 + (x < 0)) >> 2`: the asymmetric 16x16/32x32 pass rounding.
    fn quarter_biased(self) -> Self;

    #[inline(always)]
    fn wadd(self, rhs: Self) -> Self {
        (self + rhs).wrap()
    }

    #[inline(always)]
    fn wsub(self, rhs: Self) -> Self {
        (self - rhs).wrap()
    }

    /// `round_shift(x * c)`, the single-constant rotation arm.
    #[inline(always)]
    fn mul_rs(self, c: i32) -> Self {
        self.mul(c).rs()
    }

    /// `round_shift(x * c0 + y * c1)`. The sum is rounded once; rounding
    /// each product separately diverges from the reference by one.
    #[inline(always)]
    fn rot_rs(self, c0: i32, rhs: Self, c1: i32) -> Self {
        (self.mul(c0) + rhs.mul(c1)).rs()
    }
}

/// Lanes that hold a single value and can move through plain coefficient
/// buffers. The vector lanes load and store through their own gather and
/// scatter paths in `batch.rs` instead.
pub trait ScalarLane: TxLane {
    fn from_i32(v: i32) -> Self;
    fn to_i32(self) -> i32;
}

impl TxLane for i32 {
    #[inline(always)]
    fn splat(v: i32) -> Self {
        v
    }

    #[inline(always)]
    fn neg(self) -> Self {
        -self
    }

    #[inline(always)]
    fn wrap(self) -> Self {
        self as i16 as i32
    }

    #[inline(always)]
    fn mul(self, c: i32) -> Self {
        self * c
    }

    #[inline(always)]
    fn rs(self) -> Self {
        (self + DCT_CONST_ROUNDING as i32) >> DCT_CONST_BITS
    }

    #[inline(always)]
    fn shl(self, n: u32) -> Self {
        self << n
    }

    #[inline(always)]
    fn sar(self, n: u32) -> Self {
        self >> n
    }

    #[inline(always)]
    fn round2(self, bits: u32) -> Self {
        (self + (1 << (bits - 1))) >> bits
    }

    #[inline(always)]
    fn half_to_zero(self) -> Self {
        (self + i32::from(self < 0)) >> 1
    }

    #[inline(always)]
    fn quarter_biased(self) -> Self {
        (self + 1 + i32::from(self < 0)) >> 2
    }
}

impl ScalarLane for i32 {
    #[inline(always)]
    fn from_i32(v: i32) -> Self {
        v
    }

    #[inline(always)]
    fn to_i32(self) -> i32 {
        self
    }
}

/// High-precision lane for extended bit depths. Same butterfly wiring and
/// rounding points as `i32`, only the accumulator is 64-bit so 10/12-bit
/// inputs cannot overflow, and the residue wrap keeps the reference
/// `24 - bd` headroom bits.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct HighLane<const BD: u32>(pub i64);

impl<const BD: u32> Add for HighLane<BD> {
    type Output = Self;

    #[inline(always)]
    fn add(self, rhs: Self) -> Self {
        HighLane(self.0 + rhs.0)
    }
}

impl<const BD: u32> Sub for HighLane<BD> {
    type Output = Self;

    #[inline(always)]
    fn sub(self, rhs: Self) -> Self {
        HighLane(self.0 - rhs.0)
    }
}

impl<const BD: u32> TxLane for HighLane<BD> {
    #[inline(always)]
    fn splat(v: i32) -> Self {
        HighLane(i64::from(v))
    }

    #[inline(always)]
    fn neg(self) -> Self {
        HighLane(-self.0)
    }

    #[inline(always)]
    fn wrap(self) -> Self {
        HighLane((self.0 << (24 - BD)) >> (24 - BD))
    }

    #[inline(always)]
    fn mul(self, c: i32) -> Self {
        HighLane(self.0 * c as i64)
    }

    #[inline(always)]
    fn rs(self) -> Self {
        HighLane((self.0 + DCT_CONST_ROUNDING) >> DCT_CONST_BITS)
    }

    #[inline(always)]
    fn shl(self, n: u32) -> Self {
        HighLane(self.0 << n)
    }

    #[inline(always)]
    fn sar(self, n: u32) -> Self {
        HighLane(self.0 >> n)
    }

    #[inline(always)]
    fn round2(self, bits: u32) -> Self {
        HighLane((self.0 + (1 << (bits - 1))) >> bits)
    }

    #[inline(always)]
    fn half_to_zero(self) -> Self {
        HighLane((self.0 + i64::from(self.0 < 0)) >> 1)
    }

    #[inline(always)]
    fn quarter_biased(self) -> Self {
        HighLane((self.0 + 1 + i64::from(self.0 < 0)) >> 2)
    }
}

impl<const BD: u32> ScalarLane for HighLane<BD> {
    #[inline(always)]
    fn from_i32(v: i32) -> Self {
        HighLane(i64::from(v))
    }

    #[inline(always)]
    fn to_i32(self) -> i32 {
        debug_assert!(
            i64::from(self.0 as i32) == self.0,
            "coefficient {} exceeds 32-bit storage",
            self.0
        );
        self.0 as i32
    }
}

#[cfg(feature = "use_wide")]
mod wide_lanes {
    use super::TxLane;
    use crate::tables::{DCT_CONST_BITS, DCT_CONST_ROUNDING};
    use wide::{i32x4, i32x8, CmpLt};

    macro_rules! wide_lane {
        ($ty:ident) => {
            impl TxLane for $ty {
                #[inline(always)]
                fn splat(v: i32) -> Self {
                    $ty::splat(v)
                }

                #[inline(always)]
                fn neg(self) -> Self {
                    $ty::splat(0) - self
                }

                #[inline(always)]
                fn wrap(self) -> Self {
                    (self << 16) >> 16
                }

                #[inline(always)]
                fn mul(self, c: i32) -> Self {
                    self * $ty::splat(c)
                }

                #[inline(always)]
                fn rs(self) -> Self {
                    (self + $ty::splat(DCT_CONST_ROUNDING as i32)) >> (DCT_CONST_BITS as i32)
                }

                #[inline(always)]
                fn shl(self, n: u32) -> Self {
                    self << (n as i32)
                }

                #[inline(always)]
                fn sar(self, n: u32) -> Self {
                    self >> (n as i32)
                }

                #[inline(always)]
                fn round2(self, bits: u32) -> Self {
                    (self + $ty::splat(1 << (bits - 1))) >> (bits as i32)
                }

                #[inline(always)]
                fn half_to_zero(self) -> Self {
                    let negative = self.cmp_lt($ty::splat(0)) & $ty::splat(1);
                    (self + negative) >> 1
                }

                #[inline(always)]
                fn quarter_biased(self) -> Self {
                    let negative = self.cmp_lt($ty::splat(0)) & $ty::splat(1);
                    (self + $ty::splat(1) + negative) >> 2
                }
            }
        };
    }

    wide_lane!(i32x4);
    wide_lane!(i32x8);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tables::COSPI_16_64;

    #[test]
    fn low_lane_round_shift() {
        assert_eq!(100i32.mul_rs(COSPI_16_64), (100 * COSPI_16_64 + 8192) >> 14);
        assert_eq!(
            (-100i32).mul_rs(COSPI_16_64),
            (-100 * COSPI_16_64 + 8192) >> 14
        );
    }

    #[test]
    fn low_and_high_lanes_agree_on_legal_values() {
        for &v in &[-32768, -255, -1, 0, 1, 255, 4096, 32767] {
            for &w in &[-9, 0, 1234] {
                let low = v.rot_rs(COSPI_16_64, w, -COSPI_16_64);
                let high = HighLane::<10>::from_i32(v)
                    .rot_rs(COSPI_16_64, HighLane::from_i32(w), -COSPI_16_64)
                    .to_i32();
                assert_eq!(low, high, "rot_rs({}, {})", v, w);
            }
        }
    }

    #[test]
    fn asymmetric_roundings_match_reference_forms() {
        assert_eq!(7i32.half_to_zero(), 3);
        assert_eq!((-7i32).half_to_zero(), -3);
        assert_eq!(7i32.quarter_biased(), 2);
        assert_eq!(8i32.quarter_biased(), 2);
        assert_eq!((-7i32).quarter_biased(), -2);
        assert_eq!((-8i32).quarter_biased(), -2);
        assert_eq!((-2i32).quarter_biased(), 0);
    }

    #[test]
    fn wrap_is_identity_in_range_and_wraps_outside() {
        assert_eq!(32767i32.wrap(), 32767);
        assert_eq!((-32768i32).wrap(), -32768);
        assert_eq!(32768i32.wrap(), -32768);
        let h = HighLane::<12>(1 << 30).wrap();
        assert_eq!(h.0, 1 << 30);
    }

    #[cfg(feature = "use_wide")]
    #[test]
    fn wide_lane_matches_scalar_ops() {
        use wide::i32x8;
        let values = [-32768, -8193, -1, 0, 1, 255, 8192, 32767];
        let v = i32x8::from(values);
        let rs = v.mul_rs(COSPI_16_64).to_array();
        let half = v.half_to_zero().to_array();
        let quarter = v.quarter_biased().to_array();
        let wrapped = (v + i32x8::splat(40000)).wrap().to_array();
        for (i, &s) in values.iter().enumerate() {
            assert_eq!(rs[i], s.mul_rs(COSPI_16_64));
            assert_eq!(half[i], s.half_to_zero());
            assert_eq!(quarter[i], s.quarter_biased());
            assert_eq!(wrapped[i], (s + 40000).wrap());
        }
    }
}
