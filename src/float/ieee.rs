//! Raw IEEE-754 passthrough, for the `-o svgb --ieee` binary flavor that
//! skips vf128 compression entirely and stores floats at their native
//! width. Built on the same little-endian primitive writes the integer
//! codecs use.

use crate::buffer::Buffer;
use crate::error::Result;

pub fn write_f32(buf: &mut Buffer, value: f32) -> Result<usize> {
    buf.write_u32(value.to_bits())
}

pub fn read_f32(buf: &mut Buffer) -> Result<f32> {
    Ok(f32::from_bits(buf.read_u32()?))
}

pub fn write_f64(buf: &mut Buffer, value: f64) -> Result<usize> {
    buf.write_u64(value.to_bits())
}

pub fn read_f64(buf: &mut Buffer) -> Result<f64> {
    Ok(f64::from_bits(buf.read_u64()?))
}

pub fn write_vec_f32(buf: &mut Buffer, values: &[f32]) -> Result<usize> {
    let mut written = 0;
    for v in values {
        written += write_f32(buf, *v)?;
    }
    Ok(written)
}

pub fn read_vec_f32(buf: &mut Buffer, count: usize) -> Result<Vec<f32>> {
    (0..count).map(|_| read_f32(buf)).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn round_trip_f32_and_f64() {
        let mut buf = Buffer::fixed(64);
        write_f32(&mut buf, 1.5).unwrap();
        write_f64(&mut buf, -2.25).unwrap();
        assert_eq!(read_f32(&mut buf).unwrap(), 1.5);
        assert_eq!(read_f64(&mut buf).unwrap(), -2.25);
    }

    #[test]
    fn vector_round_trip() {
        let values = vec![1.0f32, -2.0, 3.5, 0.0];
        let mut buf = Buffer::fixed(64);
        write_vec_f32(&mut buf, &values).unwrap();
        assert_eq!(read_vec_f32(&mut buf, values.len()).unwrap(), values);
    }
}
