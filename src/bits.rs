//! Endian and bit-counting primitives shared by every codec.
//!
//! `clz`/`ctz` mirror the C source's `clz`/`ctz` macros: every codec in
//! this crate uses them to derive minimal encoded lengths, so they live
//! in one place instead of being re-derived per call site.

/// Count leading zero bits of a nonzero `u64`. Mirrors the C source's
/// `clz`, which is only ever called on nonzero inputs by its callers.
#[inline]
pub fn clz_u64(x: u64) -> u32 {
    x.leading_zeros()
}

/// Count trailing zero bits of a nonzero `u64`.
#[inline]
pub fn ctz_u64(x: u64) -> u32 {
    x.trailing_zeros()
}

/// Smallest power of two `>= x`, for `x >= 1`.
#[inline]
pub fn pow2_ge(x: u64) -> u64 {
    debug_assert!(x >= 1);
    1u64 << (64 - clz_u64(x - 1))
}

/// Swaps `x` to little-endian byte order regardless of host endianness.
/// Every on-disk integer in this crate is little-endian; this is the
/// single place that assumption is expressed.
#[inline]
pub fn to_le_u16(x: u16) -> u16 {
    x.to_le()
}

#[inline]
pub fn to_le_u32(x: u32) -> u32 {
    x.to_le()
}

#[inline]
pub fn to_le_u64(x: u64) -> u64 {
    x.to_le()
}

#[inline]
pub fn from_le_u16(x: u16) -> u16 {
    u16::from_le(x)
}

#[inline]
pub fn from_le_u32(x: u32) -> u32 {
    u32::from_le(x)
}

#[inline]
pub fn from_le_u64(x: u64) -> u64 {
    u64::from_le(x)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn clz_known_values() {
        assert_eq!(clz_u64(1), 63);
        assert_eq!(clz_u64(u64::MAX), 0);
        assert_eq!(clz_u64(0x80), 56);
    }

    #[test]
    fn ctz_known_values() {
        assert_eq!(ctz_u64(1), 0);
        assert_eq!(ctz_u64(0x80), 7);
        assert_eq!(ctz_u64(1u64 << 63), 63);
    }

    #[test]
    fn pow2_ge_rounds_up() {
        assert_eq!(pow2_ge(1), 1);
        assert_eq!(pow2_ge(5), 8);
        assert_eq!(pow2_ge(4096), 4096);
        assert_eq!(pow2_ge(4097), 8192);
    }
}
