//! FIR design and time/frequency-domain filtering.

use num_complex::Complex64;
use std::f64::consts::PI;

/// Full linear convolution of two complex sequences.
///
/// Output length is `x.len() + y.len() - 1`; either operand being empty
/// yields an empty output. Direct O(n*m) double summation, which is plenty
/// for the tap counts this pipeline uses.
pub fn convolve(x: &[Complex64], y: &[Complex64]) -> Vec<Complex64> {
    if x.is_empty() || y.is_empty() {
        return Vec::new();
    }
    let mut result = vec![Complex64::new(0.0, 0.0); x.len() + y.len() - 1];
    for (n, &xn) in x.iter().enumerate() {
        for (m, &ym) in y.iter().enumerate() {
            result[n + m] += xn * ym;
        }
    }
    result
}

/// Real-valued counterpart of [`convolve`], used for envelope smoothing.
pub fn convolve_real(x: &[f64], y: &[f64]) -> Vec<f64> {
    if x.is_empty() || y.is_empty() {
        return Vec::new();
    }
    let mut result = vec![0.0; x.len() + y.len() - 1];
    for (n, &xn) in x.iter().enumerate() {
        for (m, &ym) in y.iter().enumerate() {
            result[n + m] += xn * ym;
        }
    }
    result
}

/// Uniform moving-average kernel of `taps` points.
pub fn boxcar(taps: usize) -> Vec<f64> {
    vec![1.0 / taps as f64; taps]
}

/// Windowed-sinc low-pass kernel.
///
/// Center tap is `wc/pi`; the others are `sin(wc*d)/(pi*d)` for tap offset
/// `d` from center, each weighted by a Hamming window.
pub fn firwin(num_taps: usize, cutoff_hz: f64, sample_rate_hz: f64) -> Vec<f64> {
    let wc = 2.0 * PI * cutoff_hz / sample_rate_hz;
    // A single tap has no window span to divide by; it is just the center
    // value.
    if num_taps <= 1 {
        return vec![wc / PI; num_taps];
    }
    let center = if num_taps % 2 == 1 {
        (num_taps - 1) / 2
    } else {
        num_taps / 2
    };

    (0..num_taps)
        .map(|n| {
            let diff = n as f64 - center as f64;
            let sinc = if diff == 0.0 {
                wc / PI
            } else {
                (wc * diff).sin() / (PI * diff)
            };
            let window = 0.54 - 0.46 * (2.0 * PI * n as f64 / (num_taps - 1) as f64).cos();
            sinc * window
        })
        .collect()
}

/// Frequency-domain band mask: bins whose frequency `(n - N/2) * fs / N`
/// exceeds the cutoff in magnitude are zeroed, the rest pass unchanged.
/// Expects a centered (shifted) spectrum.
pub fn bandpass(spectrum: &[Complex64], sample_rate_hz: f64, cutoff_hz: f64) -> Vec<Complex64> {
    let n = spectrum.len();
    spectrum
        .iter()
        .enumerate()
        .map(|(i, &bin)| {
            let freq = (i as f64 - n as f64 / 2.0) * sample_rate_hz / n as f64;
            if freq.abs() <= cutoff_hz {
                bin
            } else {
                Complex64::new(0.0, 0.0)
            }
        })
        .collect()
}
