//! IEEE-754 binary16 -> f32 conversion.
//!
//! Decoding is total: every 16-bit pattern maps to a value, including the
//! infinities and NaN. Scoring code decides what to do with non-finite input.

/// 2^-24, the value of the smallest positive subnormal half.
const SUBNORMAL_UNIT: f32 = 1.0 / 16_777_216.0;

pub fn decode_half(bits: u16) -> f32 {
    let sign = if bits & 0x8000 != 0 { -1.0 } else { 1.0 };
    let exponent = i32::from((bits & 0x7C00) >> 10);
    let mantissa = f32::from(bits & 0x03FF);
    match exponent {
        0 => sign * SUBNORMAL_UNIT * mantissa,
        0x1F if mantissa == 0.0 => sign * f32::INFINITY,
        0x1F => f32::NAN,
        _ => sign * 2f32.powi(exponent - 15) * (1.0 + mantissa / 1024.0),
    }
}

/// Decode a little-endian buffer of half floats. A trailing odd byte is ignored.
pub fn decode_half_slice(bytes: &[u8]) -> Vec<f32> {
    bytes
        .chunks_exact(2)
        .map(|w| decode_half(u16::from_le_bytes([w[0], w[1]])))
        .collect()
}
