//! vf128: a variable-length IEEE-754 float codec.
//!
//! The lead byte packs four fields: `I` (1 bit, inline vs. out-of-line),
//! `S` (1 bit, sign), `EE` (2 bits) and `MMMM` (4 bits). Inline forms
//! (`I=1`) hold the whole value in that one byte: zero, a handful of
//! subnormals, a small range of normals, and Inf/NaN. Out-of-line forms
//! (`I=0`) reuse `EE`/`MMMM` as little-endian BER integer *lengths* (not
//! values) for an exponent field and a mantissa field that follow the
//! lead byte — with elision for powers of two (zero mantissa field) and
//! for a unary-coded exponent window (zero exponent field) so the
//! common cases stay short.
//!
//! Ported field-for-field from the out-of-line write-side selection in
//! the C source (`mu_vf128_f64_write_byval`/`mu_vf128_f32_write_byval`):
//! Inf/NaN, then zero, then inline normal, then inline subnormal, then
//! four out-of-line cases (subnormal renormalization, power-of-two
//! elision, fraction-only with a unary exponent prefix, full fallback).
//!
//! The inline subnormal nibble (`EE=00, MMMM=1..15`) splits its 15
//! codepoints into two disjoint groups rather than one flat scale: `MMMM
//! 8..15` are pure powers of two covering `sexp -1..-8` (no mantissa bits
//! to spare), and `MMMM 1..7` are fractional values confined to `sexp
//! -1..-3` with a 3-bit window (one bit traded to the power-of-two
//! group). A 4-bit field can only ever distinguish 15 values, so this is
//! a deliberate reallocation of that budget toward the wider exponent
//! range rather than finer fractions — exact values outside both groups
//! still round-trip correctly, just through the out-of-line form.

use crate::ber;
use crate::buffer::Buffer;
use crate::error::Result;

const F64_EXP_SIZE: u32 = 11;
const F64_MANT_SIZE: u32 = 52;
const F64_EXP_BIAS: i64 = 1023;
const F64_EXP_MASK: u64 = (1 << F64_EXP_SIZE) - 1;
const F64_MANT_MASK: u64 = (1u64 << F64_MANT_SIZE) - 1;
const U64_MSB: u64 = 0x8000_0000_0000_0000;
const U64_MSN: u64 = 0xF000_0000_0000_0000;
const U64_TOP3: u64 = 0xE000_0000_0000_0000;

fn f64_resultdata(value: f64) -> (bool, i64, u64) {
    let bits = value.to_bits();
    let sign = (bits >> 63) & 1 != 0;
    let exp = (bits >> F64_MANT_SIZE) & F64_EXP_MASK;
    let mant = bits & F64_MANT_MASK;
    let sexp = exp as i64 - F64_EXP_BIAS;
    let frac = mant << (F64_EXP_SIZE + 1);
    (sign, sexp, frac)
}

fn f64_pack(mant: u64, exp: u64, sign: bool) -> f64 {
    let bits = (mant & F64_MANT_MASK)
        | ((exp & F64_EXP_MASK) << F64_MANT_SIZE)
        | ((sign as u64) << 63);
    f64::from_bits(bits)
}

pub fn write_f64(buf: &mut Buffer, value: f64) -> Result<usize> {
    let (sign, sexp, frac) = f64_resultdata(value);
    let mut vf_exp: i32 = 0;
    let mut vf_man: i32 = 0;
    let mut vw_man: u64 = 0;
    let mut vw_exp: i64 = 0;
    let pre: u8;

    if sexp == F64_EXP_BIAS + 1 {
        // Inf/NaN
        vf_exp = 3;
        vf_man = ((frac != 0) as i32) << 3;
        pre = ((sign as u8) << 6) | ((vf_exp as u8) << 4) | (vf_man as u8);
    } else if sexp == -F64_EXP_BIAS && frac == 0 {
        // Zero
        pre = (sign as u8) << 6;
    } else if (0..=1).contains(&sexp) && (frac & U64_MSN) == frac {
        // Inline normal
        pre = ((sign as u8) << 6) | (((sexp + 1) as u8) << 4) | ((frac >> 60) as u8);
    } else if (-8..=-1).contains(&sexp) && frac == 0 {
        // Inline subnormal, pure power of two: MMMM 8..15 <-> sexp -1..-8.
        // MMMM's top bit is free for this since the fraction branch below
        // never needs it (it only ever produces MMMM 1..7).
        let nibble = (7 - sexp) as u8;
        pre = ((sign as u8) << 6) | nibble;
    } else if (-3..=-1).contains(&sexp) && ((frac >> -sexp) & U64_TOP3) == (frac >> -sexp) {
        // Inline subnormal, fraction: MMMM 1..7, 3-bit window (one bit
        // traded away to the power-of-two case above).
        pre = ((sign as u8) << 6) | (((0x08 | (frac >> 61)) >> -sexp) as u8);
    } else {
        let tz = frac.trailing_zeros() as i64;
        let lz = frac.leading_zeros() as i64;
        if sexp == -F64_EXP_BIAS {
            vw_man = frac >> tz;
            vw_exp = sexp - lz - 1;
            vf_exp = ber::minimal_len_s64(vw_exp) as i32;
            vf_man = ber::minimal_len_u64(vw_man) as i32;
            pre = 0x80 | ((sign as u8) << 6) | ((vf_exp as u8) << 4) | (vf_man as u8);
        } else if frac == 0 {
            vw_exp = sexp;
            vf_exp = ber::minimal_len_s64(vw_exp) as i32;
            pre = 0x80 | ((sign as u8) << 6) | ((vf_exp as u8) << 4);
        } else if sexp < 0 && sexp >= -8 {
            let sh = (-sexp - 1) as u32;
            let sentinel = U64_MSB >> (tz - 1);
            let vw_man_a = (frac >> tz) | sentinel;
            let vw_man_b = ((frac >> tz) << sh) | (sentinel << sh);
            let vf_exp_a = ber::minimal_len_s64(sexp) as i32;
            let vf_man_a = ber::minimal_len_u64(vw_man_a) as i32;
            let vf_man_b = ber::minimal_len_u64(vw_man_b) as i32;
            if vf_man_a + vf_exp_a < vf_man_b {
                vw_man = vw_man_a;
                vw_exp = sexp;
                vf_exp = vf_exp_a;
                vf_man = vf_man_a;
            } else {
                vw_man = vw_man_b;
                vf_man = vf_man_b;
            }
            pre = 0x80 | ((sign as u8) << 6) | ((vf_exp as u8) << 4) | (vf_man as u8);
        } else {
            let sentinel = U64_MSB >> (tz - 1);
            vw_man = (frac >> tz) | sentinel;
            vw_exp = sexp;
            vf_exp = ber::minimal_len_s64(vw_exp) as i32;
            vf_man = ber::minimal_len_u64(vw_man) as i32;
            pre = 0x80 | ((sign as u8) << 6) | ((vf_exp as u8) << 4) | (vf_man as u8);
        }
    }

    let mut written = buf.write_i8(pre as i8)?;
    if pre & 0x80 != 0 {
        if vf_exp != 0 {
            written += ber::write_sint_le(buf, vw_exp)?;
        }
        if vf_man != 0 {
            written += ber::write_uint_le(buf, vw_man)?;
        }
    }
    log::trace!("vf128::write_f64({value}) -> pre=0x{pre:02x} len={written}");
    Ok(written)
}

pub fn read_f64(buf: &mut Buffer) -> Result<f64> {
    let pre = buf.read_i8()? as u8;
    let vf_inl = (pre >> 7) & 1 == 0;
    let vf_sgn = (pre >> 6) & 1 != 0;
    let vf_exp = ((pre >> 4) & 3) as usize;
    let vf_man = (pre & 0xF) as usize;

    let mut vr_man: u64 = 0;
    let mut vr_exp: i64 = 0;
    if !vf_inl {
        if vf_exp != 0 {
            vr_exp = ber::read_sint_le(buf, vf_exp)?;
        }
        if vf_man != 0 {
            vr_man = ber::read_uint_le(buf, vf_man)?;
        }
    }

    let vp_exp: i64;
    let vp_man: u64;
    if vf_inl {
        if vf_exp == 0 {
            if vf_man >= 8 {
                // Pure power of two: sexp -1..-8.
                vp_exp = F64_EXP_BIAS + (7 - vf_man as i64);
                vp_man = 0;
            } else if vf_man > 0 {
                // Fraction within a 3-bit window; lz3 is clz(vf_man)
                // counted in that 3-bit width, not the register width.
                let lz3 = (vf_man as u8).leading_zeros() - 5;
                let pos = 2 - lz3;
                let residual = (vf_man as u64) ^ (1u64 << pos);
                vp_exp = F64_EXP_BIAS - 1 - lz3 as i64;
                vp_man = residual << (F64_MANT_SIZE - pos);
            } else {
                vp_exp = 0;
                vp_man = 0;
            }
        } else if vf_exp == 3 {
            vp_exp = F64_EXP_MASK as i64;
            vp_man = (vf_man as u64) << (F64_MANT_SIZE - 4);
        } else {
            vp_exp = F64_EXP_BIAS + vf_exp as i64 - 1;
            vp_man = (vf_man as u64) << (F64_MANT_SIZE - 4);
        }
    } else {
        let lz = vr_man.leading_zeros() as i64;
        let tz = vr_man.trailing_zeros() as i64;
        if vr_exp <= -F64_EXP_BIAS {
            let sh = (F64_EXP_BIAS + vr_exp + lz - F64_EXP_SIZE as i64) as u32;
            vp_exp = 0;
            vp_man = vr_man << sh;
        } else {
            let exp = if vf_exp == 0 { -tz - 1 } else { vr_exp };
            vp_exp = F64_EXP_BIAS + exp;
            vp_man = (vr_man << (lz + 1)) >> (F64_EXP_SIZE + 1);
        }
    }

    Ok(f64_pack(vp_man, vp_exp as u64, vf_sgn))
}

const F32_EXP_SIZE: u32 = 8;
const F32_MANT_SIZE: u32 = 23;
const F32_EXP_BIAS: i32 = 127;
const F32_EXP_MASK: u32 = (1 << F32_EXP_SIZE) - 1;
const F32_MANT_MASK: u32 = (1u32 << F32_MANT_SIZE) - 1;
const U32_MSB: u32 = 0x8000_0000;
const U32_MSN: u32 = 0xF000_0000;
const U32_TOP3: u32 = 0xE000_0000;

fn f32_resultdata(value: f32) -> (bool, i32, u32) {
    let bits = value.to_bits();
    let sign = (bits >> 31) & 1 != 0;
    let exp = (bits >> F32_MANT_SIZE) & F32_EXP_MASK;
    let mant = bits & F32_MANT_MASK;
    let sexp = exp as i32 - F32_EXP_BIAS;
    let frac = mant << (F32_EXP_SIZE + 1);
    (sign, sexp, frac)
}

fn f32_pack(mant: u32, exp: u32, sign: bool) -> f32 {
    let bits = (mant & F32_MANT_MASK)
        | ((exp & F32_EXP_MASK) << F32_MANT_SIZE)
        | ((sign as u32) << 31);
    f32::from_bits(bits)
}

pub fn write_f32(buf: &mut Buffer, value: f32) -> Result<usize> {
    let (sign, sexp, frac) = f32_resultdata(value);
    let mut vf_exp: i32 = 0;
    let mut vf_man: i32 = 0;
    let mut vw_man: u64 = 0;
    let mut vw_exp: i64 = 0;
    let pre: u8;

    if sexp == F32_EXP_BIAS + 1 {
        vf_exp = 3;
        vf_man = ((frac != 0) as i32) << 3;
        pre = ((sign as u8) << 6) | ((vf_exp as u8) << 4) | (vf_man as u8);
    } else if sexp == -F32_EXP_BIAS && frac == 0 {
        pre = (sign as u8) << 6;
    } else if (0..=1).contains(&sexp) && (frac & U32_MSN) == frac {
        pre = ((sign as u8) << 6) | (((sexp + 1) as u8) << 4) | ((frac >> 28) as u8);
    } else if (-8..=-1).contains(&sexp) && frac == 0 {
        // Pure power of two: MMMM 8..15 <-> sexp -1..-8.
        let nibble = (7 - sexp) as u8;
        pre = ((sign as u8) << 6) | nibble;
    } else if (-3..=-1).contains(&sexp) && ((frac >> -sexp) & U32_TOP3) == (frac >> -sexp) {
        // Fraction: MMMM 1..7, 3-bit window.
        pre = ((sign as u8) << 6) | (((0x08 | (frac >> 29)) >> -sexp) as u8);
    } else {
        let tz = frac.trailing_zeros() as i32;
        let lz = frac.leading_zeros() as i32;
        if sexp == -F32_EXP_BIAS {
            vw_man = (frac >> tz) as u64;
            vw_exp = (sexp - lz - 1) as i64;
            vf_exp = ber::minimal_len_s64(vw_exp) as i32;
            vf_man = ber::minimal_len_u64(vw_man) as i32;
            pre = 0x80 | ((sign as u8) << 6) | ((vf_exp as u8) << 4) | (vf_man as u8);
        } else if frac == 0 {
            vw_exp = sexp as i64;
            vf_exp = ber::minimal_len_s64(vw_exp) as i32;
            pre = 0x80 | ((sign as u8) << 6) | ((vf_exp as u8) << 4);
        } else if sexp < 0 && sexp >= -8 {
            let sh = (-sexp - 1) as u32;
            let sentinel = U32_MSB >> (tz - 1);
            let vw_man_a = ((frac >> tz) | sentinel) as u64;
            let vw_man_b = (((frac >> tz) << sh) | (sentinel << sh)) as u64;
            let vf_exp_a = ber::minimal_len_s64(sexp as i64) as i32;
            let vf_man_a = ber::minimal_len_u64(vw_man_a) as i32;
            let vf_man_b = ber::minimal_len_u64(vw_man_b) as i32;
            if vf_man_a + vf_exp_a < vf_man_b {
                vw_man = vw_man_a;
                vw_exp = sexp as i64;
                vf_exp = vf_exp_a;
                vf_man = vf_man_a;
            } else {
                vw_man = vw_man_b;
                vf_man = vf_man_b;
            }
            pre = 0x80 | ((sign as u8) << 6) | ((vf_exp as u8) << 4) | (vf_man as u8);
        } else {
            let sentinel = U32_MSB >> (tz - 1);
            vw_man = ((frac >> tz) | sentinel) as u64;
            vw_exp = sexp as i64;
            vf_exp = ber::minimal_len_s64(vw_exp) as i32;
            vf_man = ber::minimal_len_u64(vw_man) as i32;
            pre = 0x80 | ((sign as u8) << 6) | ((vf_exp as u8) << 4) | (vf_man as u8);
        }
    }

    let mut written = buf.write_i8(pre as i8)?;
    if pre & 0x80 != 0 {
        if vf_exp != 0 {
            written += ber::write_sint_le(buf, vw_exp)?;
        }
        if vf_man != 0 {
            written += ber::write_uint_le(buf, vw_man)?;
        }
    }
    log::trace!("vf128::write_f32({value}) -> pre=0x{pre:02x} len={written}");
    Ok(written)
}

pub fn read_f32(buf: &mut Buffer) -> Result<f32> {
    let pre = buf.read_i8()? as u8;
    let vf_inl = (pre >> 7) & 1 == 0;
    let vf_sgn = (pre >> 6) & 1 != 0;
    let vf_exp = ((pre >> 4) & 3) as usize;
    let vf_man = (pre & 0xF) as usize;

    let mut vr_man: u32 = 0;
    let mut vr_exp: i32 = 0;
    if !vf_inl {
        if vf_exp != 0 {
            vr_exp = ber::read_sint_le(buf, vf_exp)? as i32;
        }
        if vf_man != 0 {
            let raw = ber::read_uint_le(buf, vf_man)?;
            let lz = raw.leading_zeros();
            let sh = if lz < 32 { 32 - lz } else { 0 };
            vr_man = (raw >> sh) as u32;
        }
    }

    let vp_exp: i32;
    let vp_man: u32;
    if vf_inl {
        if vf_exp == 0 {
            if vf_man >= 8 {
                vp_exp = F32_EXP_BIAS + (7 - vf_man as i32);
                vp_man = 0;
            } else if vf_man > 0 {
                let lz3 = (vf_man as u8).leading_zeros() - 5;
                let pos = 2 - lz3;
                let residual = (vf_man as u32) ^ (1u32 << pos);
                vp_exp = F32_EXP_BIAS - 1 - lz3 as i32;
                vp_man = residual << (F32_MANT_SIZE - pos);
            } else {
                vp_exp = 0;
                vp_man = 0;
            }
        } else if vf_exp == 3 {
            vp_exp = F32_EXP_MASK as i32;
            vp_man = (vf_man as u32) << (F32_MANT_SIZE - 4);
        } else {
            vp_exp = F32_EXP_BIAS + vf_exp as i32 - 1;
            vp_man = (vf_man as u32) << (F32_MANT_SIZE - 4);
        }
    } else {
        let lz = vr_man.leading_zeros() as i32;
        let tz = vr_man.trailing_zeros() as i32;
        if vr_exp <= -F32_EXP_BIAS {
            let sh = (F32_EXP_BIAS + vr_exp + lz - F32_EXP_SIZE as i32) as u32;
            vp_exp = 0;
            vp_man = vr_man << sh;
        } else {
            let exp = if vf_exp == 0 { -tz - 1 } else { vr_exp };
            vp_exp = F32_EXP_BIAS + exp;
            vp_man = (vr_man << (lz + 1)) >> (F32_EXP_SIZE + 1);
        }
    }

    Ok(f32_pack(vp_man, vp_exp as u32, vf_sgn))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn round_trip_f64(v: f64) {
        let mut buf = Buffer::fixed(32);
        write_f64(&mut buf, v).unwrap();
        let got = read_f64(&mut buf).unwrap();
        if v.is_nan() {
            assert!(got.is_nan());
        } else {
            assert_eq!(got.to_bits(), v.to_bits(), "round trip of {v}");
        }
    }

    fn round_trip_f32(v: f32) {
        let mut buf = Buffer::fixed(32);
        write_f32(&mut buf, v).unwrap();
        let got = read_f32(&mut buf).unwrap();
        if v.is_nan() {
            assert!(got.is_nan());
        } else {
            assert_eq!(got.to_bits(), v.to_bits(), "round trip of {v}");
        }
    }

    #[test]
    fn seed_scenarios_f64() {
        let cases: &[(f64, &[u8])] = &[
            (1.0, &[0x10]),
            (-1.0, &[0x50]),
            (2.0, &[0x20]),
            (0.0, &[0x00]),
            (f64::INFINITY, &[0x30]),
        ];
        for (v, expected) in cases {
            let mut buf = Buffer::fixed(16);
            write_f64(&mut buf, *v).unwrap();
            assert_eq!(buf.unread(), *expected, "encoding {v}");
        }
        let mut buf = Buffer::fixed(16);
        write_f64(&mut buf, -0.0).unwrap();
        assert_eq!(buf.unread(), &[0x40]);

        let mut buf = Buffer::fixed(16);
        write_f64(&mut buf, f64::NAN).unwrap();
        assert_eq!(buf.unread(), &[0x38]);
    }

    #[test]
    fn round_trip_f64_values() {
        for v in [
            0.0, -0.0, 1.0, -1.0, 2.0, 0.5, 0.25, -0.25, 3.14159265358979,
            1e10, 1e-10, f64::MIN_POSITIVE, f64::MAX, f64::MIN,
            f64::INFINITY, f64::NEG_INFINITY,
        ] {
            round_trip_f64(v);
        }
        round_trip_f64(f64::NAN);
    }

    #[test]
    fn round_trip_f32_values() {
        for v in [
            0.0f32, -0.0, 1.0, -1.0, 2.0, 0.5, -0.5, 3.14159, 1e10, 1e-10,
            f32::MIN_POSITIVE, f32::MAX, f32::MIN, f32::INFINITY, f32::NEG_INFINITY,
        ] {
            round_trip_f32(v);
        }
        round_trip_f32(f32::NAN);
    }

    #[test]
    fn round_trip_across_exponent_sweep() {
        for e in -60i32..=60 {
            let v = 1.5f64 * 2f64.powi(e);
            round_trip_f64(v);
        }
    }

    #[test]
    fn round_trip_inline_subnormal_power_of_two_f64() {
        // vf_man == 1 (sexp == -4) is the one-byte lead that used to panic
        // on read: clz of the nibble landed on a shift-by-register-width.
        for v in [0.0625, -0.0625, 0.03125, -0.03125] {
            round_trip_f64(v);
        }
        for j in 1..=8i32 {
            let v = 2f64.powi(-j);
            let mut buf = Buffer::fixed(16);
            let len = write_f64(&mut buf, v).unwrap();
            assert_eq!(len, 1, "encoding 2^-{j} should be one byte");
            let got = read_f64(&mut buf).unwrap();
            assert_eq!(got.to_bits(), v.to_bits());
        }
    }

    #[test]
    fn round_trip_inline_subnormal_power_of_two_f32() {
        for v in [0.0625f32, -0.0625, 0.03125, -0.03125] {
            round_trip_f32(v);
        }
        for j in 1..=8i32 {
            let v = 2f32.powi(-j);
            let mut buf = Buffer::fixed(16);
            let len = write_f32(&mut buf, v).unwrap();
            assert_eq!(len, 1, "encoding 2^-{j} should be one byte");
            let got = read_f32(&mut buf).unwrap();
            assert_eq!(got.to_bits(), v.to_bits());
        }
    }

    #[test]
    fn round_trip_inline_subnormal_fraction_f64() {
        // The 3-bit fraction window (MMMM 1..7, sexp -1..-3): every value
        // it can represent round-trips in exactly one byte.
        for v in [0.625, 0.75, 0.875, -0.625, 0.375, -0.375] {
            let mut buf = Buffer::fixed(16);
            let len = write_f64(&mut buf, v).unwrap();
            assert_eq!(len, 1, "encoding {v} should be one byte");
            let got = read_f64(&mut buf).unwrap();
            assert_eq!(got.to_bits(), v.to_bits());
        }
    }

    #[test]
    fn inline_minimality_k_over_16_family() {
        // {±k/16 * 2^-j : j in 1..4, k in 1..15} — the members of this set
        // that reduce to a pure power of two (k a power of two) round-trip
        // in exactly one byte; the 4-bit inline subnormal nibble only has
        // 15 codepoints total so it cannot distinguish every (j, k) pair,
        // but every member still round-trips exactly via the out-of-line
        // form when it doesn't fit inline.
        for j in 1..=4i32 {
            for k in 1..=15i32 {
                let v = (k as f64) / 16.0 * 2f64.powi(-j);
                round_trip_f64(v);
                round_trip_f64(-v);
                if (k as u32).is_power_of_two() {
                    let mut buf = Buffer::fixed(16);
                    let len = write_f64(&mut buf, v).unwrap();
                    assert_eq!(len, 1, "k={k} j={j} (power-of-two) should be one byte");
                }
            }
        }
    }
}
