//! 1-D inverse transform kernels.
//!
//! Mirrors of the forward networks in `forward.rs`: every rotation reuses
//! the same table constants with the transposed wiring, and the larger
//! inverse DCTs reconstruct their even half with the next size down
//! applied to the even-indexed coefficients. Unlike the forward path, the
//! reference decoder wraps every butterfly output back to the residue
//! width, so each add, subtract and rotation result goes through
//! [`TxLane::wrap`]. For legal bitstreams the wrap never fires; keeping it
//! in place pins the out-of-range behavior to the reference.

use crate::lanes::TxLane;
use crate::tables::*;

pub(crate) fn idct4<L: TxLane>(input: [L; 4]) -> [L; 4] {
    let s0 = (input[0] + input[2]).mul_rs(COSPI_16_64).wrap();
    let s1 = (input[0] - input[2]).mul_rs(COSPI_16_64).wrap();
    let s2 = input[1].rot_rs(COSPI_24_64, input[3], -COSPI_8_64).wrap();
    let s3 = input[1].rot_rs(COSPI_8_64, input[3], COSPI_24_64).wrap();

    [s0.wadd(s3), s1.wadd(s2), s1.wsub(s2), s0.wsub(s3)]
}

pub(crate) fn idct8<L: TxLane>(input: [L; 8]) -> [L; 8] {
    let even = idct4([input[0], input[2], input[4], input[6]]);

    // stage 1
    let s4 = input[1].rot_rs(COSPI_28_64, input[7], -COSPI_4_64).wrap();
    let s7 = input[1].rot_rs(COSPI_4_64, input[7], COSPI_28_64).wrap();
    let s5 = input[5].rot_rs(COSPI_12_64, input[3], -COSPI_20_64).wrap();
    let s6 = input[5].rot_rs(COSPI_20_64, input[3], COSPI_12_64).wrap();

    // stage 2
    let t4 = s4.wadd(s5);
    let t5 = s4.wsub(s5);
    let t6 = s7.wsub(s6);
    let t7 = s6.wadd(s7);

    // stage 3
    let u5 = (t6 - t5).mul_rs(COSPI_16_64).wrap();
    let u6 = (t5 + t6).mul_rs(COSPI_16_64).wrap();

    [
        even[0].wadd(t7),
        even[1].wadd(u6),
        even[2].wadd(u5),
        even[3].wadd(t4),
        even[3].wsub(t4),
        even[2].wsub(u5),
        even[1].wsub(u6),
        even[0].wsub(t7),
    ]
}

pub(crate) fn idct16<L: TxLane>(input: [L; 16]) -> [L; 16] {
    let even = idct8([
        input[0], input[2], input[4], input[6], input[8], input[10], input[12], input[14],
    ]);

    // stage 2
    let s8 = input[1].rot_rs(COSPI_30_64, input[15], -COSPI_2_64).wrap();
    let s15 = input[1].rot_rs(COSPI_2_64, input[15], COSPI_30_64).wrap();
    let s9 = input[9].rot_rs(COSPI_14_64, input[7], -COSPI_18_64).wrap();
    let s14 = input[9].rot_rs(COSPI_18_64, input[7], COSPI_14_64).wrap();
    let s10 = input[5].rot_rs(COSPI_22_64, input[11], -COSPI_10_64).wrap();
    let s13 = input[5].rot_rs(COSPI_10_64, input[11], COSPI_22_64).wrap();
    let s11 = input[13].rot_rs(COSPI_6_64, input[3], -COSPI_26_64).wrap();
    let s12 = input[13].rot_rs(COSPI_26_64, input[3], COSPI_6_64).wrap();

    // stage 3
    let t8 = s8.wadd(s9);
    let t9 = s8.wsub(s9);
    let t10 = s11.wsub(s10);
    let t11 = s10.wadd(s11);
    let t12 = s12.wadd(s13);
    let t13 = s12.wsub(s13);
    let t14 = s15.wsub(s14);
    let t15 = s14.wadd(s15);

    // stage 4
    let u9 = t9.rot_rs(-COSPI_8_64, t14, COSPI_24_64).wrap();
    let u14 = t9.rot_rs(COSPI_24_64, t14, COSPI_8_64).wrap();
    let u10 = t10.rot_rs(-COSPI_24_64, t13, -COSPI_8_64).wrap();
    let u13 = t10.rot_rs(-COSPI_8_64, t13, COSPI_24_64).wrap();

    // stage 5
    let v8 = t8.wadd(t11);
    let v9 = u9.wadd(u10);
    let v10 = u9.wsub(u10);
    let v11 = t8.wsub(t11);
    let v12 = t15.wsub(t12);
    let v13 = u14.wsub(u13);
    let v14 = u13.wadd(u14);
    let v15 = t12.wadd(t15);

    // stage 6
    let w10 = (v13 - v10).mul_rs(COSPI_16_64).wrap();
    let w13 = (v10 + v13).mul_rs(COSPI_16_64).wrap();
    let w11 = (v12 - v11).mul_rs(COSPI_16_64).wrap();
    let w12 = (v11 + v12).mul_rs(COSPI_16_64).wrap();

    [
        even[0].wadd(v15),
        even[1].wadd(v14),
        even[2].wadd(w13),
        even[3].wadd(w12),
        even[4].wadd(w11),
        even[5].wadd(w10),
        even[6].wadd(v9),
        even[7].wadd(v8),
        even[7].wsub(v8),
        even[6].wsub(v9),
        even[5].wsub(w10),
        even[4].wsub(w11),
        even[3].wsub(w12),
        even[2].wsub(w13),
        even[1].wsub(v14),
        even[0].wsub(v15),
    ]
}

pub(crate) fn idct32<L: TxLane>(input: [L; 32]) -> [L; 32] {
    let mut even_in = [input[0]; 16];
    for i in 0..16 {
        even_in[i] = input[2 * i];
    }
    let even = idct16(even_in);

    // stage 1
    let g16 = input[1].rot_rs(COSPI_31_64, input[31], -COSPI_1_64).wrap();
    let g31 = input[1].rot_rs(COSPI_1_64, input[31], COSPI_31_64).wrap();
    let g17 = input[17].rot_rs(COSPI_15_64, input[15], -COSPI_17_64).wrap();
    let g30 = input[17].rot_rs(COSPI_17_64, input[15], COSPI_15_64).wrap();
    let g18 = input[9].rot_rs(COSPI_23_64, input[23], -COSPI_9_64).wrap();
    let g29 = input[9].rot_rs(COSPI_9_64, input[23], COSPI_23_64).wrap();
    let g19 = input[25].rot_rs(COSPI_7_64, input[7], -COSPI_25_64).wrap();
    let g28 = input[25].rot_rs(COSPI_25_64, input[7], COSPI_7_64).wrap();
    let g20 = input[5].rot_rs(COSPI_27_64, input[27], -COSPI_5_64).wrap();
    let g27 = input[5].rot_rs(COSPI_5_64, input[27], COSPI_27_64).wrap();
    let g21 = input[21].rot_rs(COSPI_11_64, input[11], -COSPI_21_64).wrap();
    let g26 = input[21].rot_rs(COSPI_21_64, input[11], COSPI_11_64).wrap();
    let g22 = input[13].rot_rs(COSPI_19_64, input[19], -COSPI_13_64).wrap();
    let g25 = input[13].rot_rs(COSPI_13_64, input[19], COSPI_19_64).wrap();
    let g23 = input[29].rot_rs(COSPI_3_64, input[3], -COSPI_29_64).wrap();
    let g24 = input[29].rot_rs(COSPI_29_64, input[3], COSPI_3_64).wrap();

    // stage 2
    let h16 = g16.wadd(g17);
    let h17 = g16.wsub(g17);
    let h18 = g19.wsub(g18);
    let h19 = g18.wadd(g19);
    let h20 = g20.wadd(g21);
    let h21 = g20.wsub(g21);
    let h22 = g23.wsub(g22);
    let h23 = g22.wadd(g23);
    let h24 = g24.wadd(g25);
    let h25 = g24.wsub(g25);
    let h26 = g27.wsub(g26);
    let h27 = g26.wadd(g27);
    let h28 = g28.wadd(g29);
    let h29 = g28.wsub(g29);
    let h30 = g31.wsub(g30);
    let h31 = g30.wadd(g31);

    // stage 3
    let k17 = h17.rot_rs(-COSPI_4_64, h30, COSPI_28_64).wrap();
    let k30 = h17.rot_rs(COSPI_28_64, h30, COSPI_4_64).wrap();
    let k18 = h18.rot_rs(-COSPI_28_64, h29, -COSPI_4_64).wrap();
    let k29 = h18.rot_rs(-COSPI_4_64, h29, COSPI_28_64).wrap();
    let k21 = h21.rot_rs(-COSPI_20_64, h26, COSPI_12_64).wrap();
    let k26 = h21.rot_rs(COSPI_12_64, h26, COSPI_20_64).wrap();
    let k22 = h22.rot_rs(-COSPI_12_64, h25, -COSPI_20_64).wrap();
    let k25 = h22.rot_rs(-COSPI_20_64, h25, COSPI_12_64).wrap();

    // stage 4
    let m16 = h16.wadd(h19);
    let m17 = k17.wadd(k18);
    let m18 = k17.wsub(k18);
    let m19 = h16.wsub(h19);
    let m20 = h23.wsub(h20);
    let m21 = k22.wsub(k21);
    let m22 = k21.wadd(k22);
    let m23 = h20.wadd(h23);
    let m24 = h24.wadd(h27);
    let m25 = k25.wadd(k26);
    let m26 = k25.wsub(k26);
    let m27 = h24.wsub(h27);
    let m28 = h31.wsub(h28);
    let m29 = k30.wsub(k29);
    let m30 = k29.wadd(k30);
    let m31 = h28.wadd(h31);

    // stage 5
    let n18 = m18.rot_rs(-COSPI_8_64, m29, COSPI_24_64).wrap();
    let n29 = m18.rot_rs(COSPI_24_64, m29, COSPI_8_64).wrap();
    let n19 = m19.rot_rs(-COSPI_8_64, m28, COSPI_24_64).wrap();
    let n28 = m19.rot_rs(COSPI_24_64, m28, COSPI_8_64).wrap();
    let n20 = m20.rot_rs(-COSPI_24_64, m27, -COSPI_8_64).wrap();
    let n27 = m20.rot_rs(-COSPI_8_64, m27, COSPI_24_64).wrap();
    let n21 = m21.rot_rs(-COSPI_24_64, m26, -COSPI_8_64).wrap();
    let n26 = m21.rot_rs(-COSPI_8_64, m26, COSPI_24_64).wrap();

    // stage 6
    let p16 = m16.wadd(m23);
    let p17 = m17.wadd(m22);
    let p18 = n18.wadd(n21);
    let p19 = n19.wadd(n20);
    let p20 = n19.wsub(n20);
    let p21 = n18.wsub(n21);
    let p22 = m17.wsub(m22);
    let p23 = m16.wsub(m23);
    let p24 = m31.wsub(m24);
    let p25 = m30.wsub(m25);
    let p26 = n29.wsub(n26);
    let p27 = n28.wsub(n27);
    let p28 = n27.wadd(n28);
    let p29 = n26.wadd(n29);
    let p30 = m25.wadd(m30);
    let p31 = m24.wadd(m31);

    // stage 7
    let q20 = (p27 - p20).mul_rs(COSPI_16_64).wrap();
    let q27 = (p20 + p27).mul_rs(COSPI_16_64).wrap();
    let q21 = (p26 - p21).mul_rs(COSPI_16_64).wrap();
    let q26 = (p21 + p26).mul_rs(COSPI_16_64).wrap();
    let q22 = (p25 - p22).mul_rs(COSPI_16_64).wrap();
    let q25 = (p22 + p25).mul_rs(COSPI_16_64).wrap();
    let q23 = (p24 - p23).mul_rs(COSPI_16_64).wrap();
    let q24 = (p23 + p24).mul_rs(COSPI_16_64).wrap();

    let odd = [
        p16, p17, p18, p19, q20, q21, q22, q23, q24, q25, q26, q27, p28, p29, p30, p31,
    ];

    let mut out = [input[0]; 32];
    for i in 0..16 {
        out[i] = even[i].wadd(odd[15 - i]);
        out[16 + i] = even[15 - i].wsub(odd[i]);
    }
    out
}

pub(crate) fn iadst4<L: TxLane>(input: [L; 4]) -> [L; 4] {
    let [x0, x1, x2, x3] = input;

    let s0 = x0.mul(SINPI_1_9);
    let s1 = x0.mul(SINPI_2_9);
    let s2 = x1.mul(SINPI_3_9);
    let s3 = x2.mul(SINPI_4_9);
    let s4 = x2.mul(SINPI_1_9);
    let s5 = x3.mul(SINPI_2_9);
    let s6 = x3.mul(SINPI_4_9);
    let s7 = (x0 - x2 + x3).wrap();

    let t0 = s0 + s3 + s5;
    let t1 = s1 - s4 - s6;
    let t3 = s2;
    let t2 = s7.mul(SINPI_3_9);

    // 1-D transform scaling factor is sqrt(2)
    [
        (t0 + t3).rs().wrap(),
        (t1 + t3).rs().wrap(),
        t2.rs().wrap(),
        (t0 + t1 - t3).rs().wrap(),
    ]
}

pub(crate) fn iadst8<L: TxLane>(input: [L; 8]) -> [L; 8] {
    let x0 = input[7];
    let x1 = input[0];
    let x2 = input[5];
    let x3 = input[2];
    let x4 = input[3];
    let x5 = input[4];
    let x6 = input[1];
    let x7 = input[6];

    // stage 1
    let s0 = x0.mul(COSPI_2_64) + x1.mul(COSPI_30_64);
    let s1 = x0.mul(COSPI_30_64) - x1.mul(COSPI_2_64);
    let s2 = x2.mul(COSPI_10_64) + x3.mul(COSPI_22_64);
    let s3 = x2.mul(COSPI_22_64) - x3.mul(COSPI_10_64);
    let s4 = x4.mul(COSPI_18_64) + x5.mul(COSPI_14_64);
    let s5 = x4.mul(COSPI_14_64) - x5.mul(COSPI_18_64);
    let s6 = x6.mul(COSPI_26_64) + x7.mul(COSPI_6_64);
    let s7 = x6.mul(COSPI_6_64) - x7.mul(COSPI_26_64);

    let x0 = (s0 + s4).rs().wrap();
    let x1 = (s1 + s5).rs().wrap();
    let x2 = (s2 + s6).rs().wrap();
    let x3 = (s3 + s7).rs().wrap();
    let x4 = (s0 - s4).rs().wrap();
    let x5 = (s1 - s5).rs().wrap();
    let x6 = (s2 - s6).rs().wrap();
    let x7 = (s3 - s7).rs().wrap();

    // stage 2
    let s4 = x4.mul(COSPI_8_64) + x5.mul(COSPI_24_64);
    let s5 = x4.mul(COSPI_24_64) - x5.mul(COSPI_8_64);
    let s6 = x7.mul(COSPI_8_64) - x6.mul(COSPI_24_64);
    let s7 = x6.mul(COSPI_8_64) + x7.mul(COSPI_24_64);

    let t0 = x0.wadd(x2);
    let t1 = x1.wadd(x3);
    let t2 = x0.wsub(x2);
    let t3 = x1.wsub(x3);
    let t4 = (s4 + s6).rs().wrap();
    let t5 = (s5 + s7).rs().wrap();
    let t6 = (s4 - s6).rs().wrap();
    let t7 = (s5 - s7).rs().wrap();

    // stage 3
    let u2 = (t2 + t3).mul(COSPI_16_64).rs().wrap();
    let u3 = (t2 - t3).mul(COSPI_16_64).rs().wrap();
    let u6 = (t6 + t7).mul(COSPI_16_64).rs().wrap();
    let u7 = (t6 - t7).mul(COSPI_16_64).rs().wrap();

    [
        t0,
        t4.neg().wrap(),
        u6,
        u2.neg().wrap(),
        u3,
        u7.neg().wrap(),
        t5,
        t1.neg().wrap(),
    ]
}

pub(crate) fn iadst16<L: TxLane>(input: [L; 16]) -> [L; 16] {
    let x0 = input[15];
    let x1 = input[0];
    let x2 = input[13];
    let x3 = input[2];
    let x4 = input[11];
    let x5 = input[4];
    let x6 = input[9];
    let x7 = input[6];
    let x8 = input[7];
    let x9 = input[8];
    let x10 = input[5];
    let x11 = input[10];
    let x12 = input[3];
    let x13 = input[12];
    let x14 = input[1];
    let x15 = input[14];

    // stage 1
    let s0 = x0.mul(COSPI_1_64) + x1.mul(COSPI_31_64);
    let s1 = x0.mul(COSPI_31_64) - x1.mul(COSPI_1_64);
    let s2 = x2.mul(COSPI_5_64) + x3.mul(COSPI_27_64);
    let s3 = x2.mul(COSPI_27_64) - x3.mul(COSPI_5_64);
    let s4 = x4.mul(COSPI_9_64) + x5.mul(COSPI_23_64);
    let s5 = x4.mul(COSPI_23_64) - x5.mul(COSPI_9_64);
    let s6 = x6.mul(COSPI_13_64) + x7.mul(COSPI_19_64);
    let s7 = x6.mul(COSPI_19_64) - x7.mul(COSPI_13_64);
    let s8 = x8.mul(COSPI_17_64) + x9.mul(COSPI_15_64);
    let s9 = x8.mul(COSPI_15_64) - x9.mul(COSPI_17_64);
    let s10 = x10.mul(COSPI_21_64) + x11.mul(COSPI_11_64);
    let s11 = x10.mul(COSPI_11_64) - x11.mul(COSPI_21_64);
    let s12 = x12.mul(COSPI_25_64) + x13.mul(COSPI_7_64);
    let s13 = x12.mul(COSPI_7_64) - x13.mul(COSPI_25_64);
    let s14 = x14.mul(COSPI_29_64) + x15.mul(COSPI_3_64);
    let s15 = x14.mul(COSPI_3_64) - x15.mul(COSPI_29_64);

    let x0 = (s0 + s8).rs().wrap();
    let x1 = (s1 + s9).rs().wrap();
    let x2 = (s2 + s10).rs().wrap();
    let x3 = (s3 + s11).rs().wrap();
    let x4 = (s4 + s12).rs().wrap();
    let x5 = (s5 + s13).rs().wrap();
    let x6 = (s6 + s14).rs().wrap();
    let x7 = (s7 + s15).rs().wrap();
    let x8 = (s0 - s8).rs().wrap();
    let x9 = (s1 - s9).rs().wrap();
    let x10 = (s2 - s10).rs().wrap();
    let x11 = (s3 - s11).rs().wrap();
    let x12 = (s4 - s12).rs().wrap();
    let x13 = (s5 - s13).rs().wrap();
    let x14 = (s6 - s14).rs().wrap();
    let x15 = (s7 - s15).rs().wrap();

    // stage 2
    let s8 = x8.mul(COSPI_4_64) + x9.mul(COSPI_28_64);
    let s9 = x8.mul(COSPI_28_64) - x9.mul(COSPI_4_64);
    let s10 = x10.mul(COSPI_20_64) + x11.mul(COSPI_12_64);
    let s11 = x10.mul(COSPI_12_64) - x11.mul(COSPI_20_64);
    let s12 = x13.mul(COSPI_4_64) - x12.mul(COSPI_28_64);
    let s13 = x12.mul(COSPI_4_64) + x13.mul(COSPI_28_64);
    let s14 = x15.mul(COSPI_20_64) - x14.mul(COSPI_12_64);
    let s15 = x14.mul(COSPI_20_64) + x15.mul(COSPI_12_64);

    let t0 = x0.wadd(x4);
    let t1 = x1.wadd(x5);
    let t2 = x2.wadd(x6);
    let t3 = x3.wadd(x7);
    let t4 = x0.wsub(x4);
    let t5 = x1.wsub(x5);
    let t6 = x2.wsub(x6);
    let t7 = x3.wsub(x7);
    let t8 = (s8 + s12).rs().wrap();
    let t9 = (s9 + s13).rs().wrap();
    let t10 = (s10 + s14).rs().wrap();
    let t11 = (s11 + s15).rs().wrap();
    let t12 = (s8 - s12).rs().wrap();
    let t13 = (s9 - s13).rs().wrap();
    let t14 = (s10 - s14).rs().wrap();
    let t15 = (s11 - s15).rs().wrap();

    // stage 3
    let s4 = t4.mul(COSPI_8_64) + t5.mul(COSPI_24_64);
    let s5 = t4.mul(COSPI_24_64) - t5.mul(COSPI_8_64);
    let s6 = t7.mul(COSPI_8_64) - t6.mul(COSPI_24_64);
    let s7 = t6.mul(COSPI_8_64) + t7.mul(COSPI_24_64);
    let s12 = t12.mul(COSPI_8_64) + t13.mul(COSPI_24_64);
    let s13 = t12.mul(COSPI_24_64) - t13.mul(COSPI_8_64);
    let s14 = t15.mul(COSPI_8_64) - t14.mul(COSPI_24_64);
    let s15 = t14.mul(COSPI_8_64) + t15.mul(COSPI_24_64);

    let u0 = t0.wadd(t2);
    let u1 = t1.wadd(t3);
    let u2 = t0.wsub(t2);
    let u3 = t1.wsub(t3);
    let u4 = (s4 + s6).rs().wrap();
    let u5 = (s5 + s7).rs().wrap();
    let u6 = (s4 - s6).rs().wrap();
    let u7 = (s5 - s7).rs().wrap();
    let u8 = t8.wadd(t10);
    let u9 = t9.wadd(t11);
    let u10 = t8.wsub(t10);
    let u11 = t9.wsub(t11);
    let u12 = (s12 + s14).rs().wrap();
    let u13 = (s13 + s15).rs().wrap();
    let u14 = (s12 - s14).rs().wrap();
    let u15 = (s13 - s15).rs().wrap();

    // stage 4
    let v2 = (u2 + u3).mul(-COSPI_16_64).rs().wrap();
    let v3 = (u2 - u3).mul(COSPI_16_64).rs().wrap();
    let v6 = (u6 + u7).mul(COSPI_16_64).rs().wrap();
    let v7 = (u7 - u6).mul(COSPI_16_64).rs().wrap();
    let v10 = (u10 + u11).mul(COSPI_16_64).rs().wrap();
    let v11 = (u11 - u10).mul(COSPI_16_64).rs().wrap();
    let v14 = (u14 + u15).mul(-COSPI_16_64).rs().wrap();
    let v15 = (u14 - u15).mul(COSPI_16_64).rs().wrap();

    [
        u0,
        u8.neg().wrap(),
        u12,
        u4.neg().wrap(),
        v6,
        v14,
        v10,
        v2,
        v3,
        v11,
        v15,
        v7,
        u5,
        u13.neg().wrap(),
        u9,
        u1.neg().wrap(),
    ]
}

/// Inverse Walsh-Hadamard lifting step over four lanes, the exact reverse
/// of [`crate::forward::fwht4`]. Input order matches the forward output
/// order (a, c, d, b).
pub(crate) fn iwht4<L: TxLane>(input: [L; 4]) -> [L; 4] {
    let a0 = input[0];
    let c0 = input[1];
    let d0 = input[2];
    let b0 = input[3];

    let a = a0 + c0;
    let d = d0 - b0;
    let e = (a - d).sar(1);
    let b = e - b0;
    let c = e - c0;
    let a = a - b;
    let d = d + c;

    [a, b, c, d]
}
