//! Radix-2 discrete Fourier transform.
//!
//! The transform is kept as the straightforward recursive Cooley-Tukey
//! decomposition; inputs whose length is not a power of two are zero-padded
//! up to the next power of two before transforming, so `fft` is total for
//! any input length. Callers that care about exact bin frequencies should
//! pass power-of-two chunks.

use num_complex::Complex64;
use std::f64::consts::PI;

/// Forward DFT. Returns `next_power_of_two(len)` bins; empty input gives an
/// empty spectrum.
pub fn fft(x: &[Complex64]) -> Vec<Complex64> {
    if x.is_empty() {
        return Vec::new();
    }
    let n = x.len().next_power_of_two();
    if n == x.len() {
        radix2(x.to_vec())
    } else {
        let mut padded = x.to_vec();
        padded.resize(n, Complex64::new(0.0, 0.0));
        radix2(padded)
    }
}

fn radix2(x: Vec<Complex64>) -> Vec<Complex64> {
    let n = x.len();
    if n == 1 {
        return x;
    }

    let even: Vec<Complex64> = x.iter().step_by(2).copied().collect();
    let odd: Vec<Complex64> = x.iter().skip(1).step_by(2).copied().collect();
    let even = radix2(even);
    let odd = radix2(odd);

    let mut result = vec![Complex64::new(0.0, 0.0); n];
    for k in 0..n / 2 {
        let twiddle = Complex64::from_polar(1.0, -2.0 * PI * k as f64 / n as f64);
        let t = twiddle * odd[k];
        result[k] = even[k] + t;
        result[k + n / 2] = even[k] - t;
    }
    result
}

/// Inverse DFT via the conjugate trick: conjugate, forward transform,
/// conjugate again and scale by 1/N.
pub fn ifft(x: &[Complex64]) -> Vec<Complex64> {
    if x.is_empty() {
        return Vec::new();
    }
    let conjugated: Vec<Complex64> = x.iter().map(|c| c.conj()).collect();
    let transformed = fft(&conjugated);
    let n = transformed.len() as f64;
    transformed.into_iter().map(|c| c.conj() / n).collect()
}

/// Rotate the spectrum so DC lands in the center. Pure reordering; applying
/// it twice on an even-length spectrum restores the original.
pub fn fftshift(x: &[Complex64]) -> Vec<Complex64> {
    let k = x.len().div_ceil(2);
    let mut shifted = Vec::with_capacity(x.len());
    shifted.extend_from_slice(&x[k..]);
    shifted.extend_from_slice(&x[..k]);
    shifted
}
