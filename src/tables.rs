//! Fixed-point constants shared by every transform kernel.
//!
//! The cosine constants are `round(cos(k * pi / 64) * 2^14)` and drive all
//! DCT butterflies as well as the 8- and 16-point ADST rotations. The sine
//! constants are `round(sqrt(2) * sin(k * pi / 9) * 2/3 * 2^14)` and are
//! only used by the 4-point ADST. Both tables are process-wide, immutable
//! and must not be "improved": the exact integer values are part of the
//! bitstream contract.

pub const DCT_CONST_BITS: u32 = 14;
pub const DCT_CONST_ROUNDING: i64 = 1 << (DCT_CONST_BITS - 1);

pub const COSPI_1_64: i32 = 16364;
pub const COSPI_2_64: i32 = 16305;
pub const COSPI_3_64: i32 = 16207;
pub const COSPI_4_64: i32 = 16069;
pub const COSPI_5_64: i32 = 15893;
pub const COSPI_6_64: i32 = 15679;
pub const COSPI_7_64: i32 = 15426;
pub const COSPI_8_64: i32 = 15137;
pub const COSPI_9_64: i32 = 14811;
pub const COSPI_10_64: i32 = 14449;
pub const COSPI_11_64: i32 = 14053;
pub const COSPI_12_64: i32 = 13623;
pub const COSPI_13_64: i32 = 13160;
pub const COSPI_14_64: i32 = 12665;
pub const COSPI_15_64: i32 = 12140;
pub const COSPI_16_64: i32 = 11585;
pub const COSPI_17_64: i32 = 11003;
pub const COSPI_18_64: i32 = 10394;
pub const COSPI_19_64: i32 = 9760;
pub const COSPI_20_64: i32 = 9102;
pub const COSPI_21_64: i32 = 8423;
pub const COSPI_22_64: i32 = 7723;
pub const COSPI_23_64: i32 = 7005;
pub const COSPI_24_64: i32 = 6270;
pub const COSPI_25_64: i32 = 5520;
pub const COSPI_26_64: i32 = 4756;
pub const COSPI_27_64: i32 = 3981;
pub const COSPI_28_64: i32 = 3196;
pub const COSPI_29_64: i32 = 2404;
pub const COSPI_30_64: i32 = 1606;
pub const COSPI_31_64: i32 = 804;

pub const SINPI_1_9: i32 = 5283;
pub const SINPI_2_9: i32 = 9929;
pub const SINPI_3_9: i32 = 13377;
pub const SINPI_4_9: i32 = 15212;

/// Scale applied to the lossless 4x4 Walsh-Hadamard output so its
/// coefficients survive the shared quantizer path unchanged.
pub const UNIT_QUANT_SHIFT: u32 = 2;
pub const UNIT_QUANT_FACTOR: i32 = 1 << UNIT_QUANT_SHIFT;

/// Right shift with rounding, the scalar reference form.
#[inline(always)]
pub fn round_power_of_two(x: i64, n: u32) -> i64 {
    (x + (1 << (n - 1))) >> n
}
