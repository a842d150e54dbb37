//! Signal-processing primitives for the capture pipeline.

pub mod demod;
pub mod fft;
pub mod filter;

use num_complex::Complex64;

/// Convert raw 8-bit IQ bytes from the device into complex samples.
///
/// Byte pairs map to (I, Q) in [-1, 1) via `(byte - 127) / 127`; a trailing
/// unpaired byte is ignored.
pub fn bytes_to_iq(data: &[u8]) -> Vec<Complex64> {
    data.chunks_exact(2)
        .map(|pair| {
            let i = (pair[0] as f64 - 127.0) / 127.0;
            let q = (pair[1] as f64 - 127.0) / 127.0;
            Complex64::new(i, q)
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn midpoint_byte_is_zero() {
        let iq = bytes_to_iq(&[127, 127]);
        assert_eq!(iq.len(), 1);
        assert_eq!(iq[0], Complex64::new(0.0, 0.0));
    }

    #[test]
    fn full_scale_maps_to_unit_range() {
        let iq = bytes_to_iq(&[254, 0]);
        assert!((iq[0].re - 1.0).abs() < 1e-12);
        assert!((iq[0].im + 1.0).abs() < 1e-12);
    }

    #[test]
    fn odd_trailing_byte_is_dropped() {
        assert_eq!(bytes_to_iq(&[127, 127, 200]).len(), 1);
    }
}
