//! Narrowband detectors: magnitude-derivative discriminator and Goertzel.

use num_complex::Complex64;
use std::f64::consts::PI;

/// Frequency discriminator driven by the *magnitude* derivative between
/// consecutive samples.
///
/// This is not a textbook quadrature FM demodulator: instead of
/// differentiating the phase it integrates the envelope derivative against
/// carrier/deviation constants. It is preserved in that form because the
/// wideband-FM listening path was built and tuned around it; treat its
/// output as a relative amplitude track, not calibrated frequency.
#[derive(Clone, Debug)]
pub struct MagnitudeDiscriminator {
    /// Carrier constant [Hz].
    pub carrier_hz: f64,
    /// Deviation constant [Hz].
    pub deviation_hz: f64,
    /// Integration step [s].
    pub sample_time: f64,
}

impl Default for MagnitudeDiscriminator {
    fn default() -> Self {
        Self {
            carrier_hz: 200e3,
            deviation_hz: 75e3,
            sample_time: 1.0 / 256.0 / 256.0 / 16.0,
        }
    }
}

impl MagnitudeDiscriminator {
    /// Demodulate a sample block. Output is one sample shorter than the
    /// input; fewer than two input samples yield an empty block.
    pub fn demodulate(&self, samples: &[Complex64]) -> Vec<f64> {
        if samples.len() < 2 {
            return Vec::new();
        }

        let mut phase = 0.0;
        let mut freq = 0.0;
        let mut prev = samples[0].norm();
        let mut demodulated = Vec::with_capacity(samples.len() - 1);

        for sample in &samples[1..] {
            let magnitude = sample.norm();
            let delta = magnitude - prev;
            prev = magnitude;

            freq += self.deviation_hz * delta - 2.0 * PI * self.carrier_hz * phase;
            phase += freq * self.sample_time;

            demodulated.push(freq);
        }

        demodulated
    }
}

/// Single-bin tone detector.
///
/// Runs the two-stage Goertzel recursion `q0 = x + 2cos(w)*q1 - q2` over
/// the block and emits a running amplitude estimate per input sample,
/// letting the caller watch a narrowband carrier grow without a full
/// transform.
pub fn goertzel(samples: &[Complex64], target_freq: f64, sample_rate: f64) -> Vec<f64> {
    let n = samples.len();
    if n == 0 {
        return Vec::new();
    }

    let k = (n as f64 * target_freq / sample_rate).round();
    let omega = 2.0 * PI * k / n as f64;
    let cosine = omega.cos();
    let sine = omega.sin();

    let mut q1 = Complex64::new(0.0, 0.0);
    let mut q2 = Complex64::new(0.0, 0.0);
    let mut amplitudes = Vec::with_capacity(n);

    for &sample in samples {
        let q0 = sample + 2.0 * cosine * q1 - q2;
        q2 = q1;
        q1 = q0;

        let real = q1 - q2 * cosine;
        let imag = q2 * sine;
        amplitudes.push((real.re * real.re + imag.re * imag.re).sqrt());
    }

    amplitudes
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tone(freq: f64, sample_rate: f64, n: usize) -> Vec<Complex64> {
        (0..n)
            .map(|i| Complex64::new((2.0 * PI * freq * i as f64 / sample_rate).sin(), 0.0))
            .collect()
    }

    #[test]
    fn goertzel_grows_on_target_tone() {
        let sr = 8000.0;
        let n = 256;
        let amps = goertzel(&tone(1000.0, sr, n), 1000.0, sr);
        assert_eq!(amps.len(), n);
        assert!(amps[n - 1] > amps[n / 8], "amplitude should accumulate");
        assert!(amps[n - 1] > 10.0);
    }

    #[test]
    fn goertzel_prefers_target_over_offset_tone() {
        let sr = 8000.0;
        let n = 256;
        let on_target = goertzel(&tone(1000.0, sr, n), 1000.0, sr);
        let off_target = goertzel(&tone(2500.0, sr, n), 1000.0, sr);
        assert!(on_target[n - 1] > off_target[n - 1] * 5.0);
    }

    #[test]
    fn goertzel_resonates_at_its_own_bin() {
        // 1540 Hz lands between bins for this block size; it must score far
        // below a tone sitting on the target bin.
        let sr = 8000.0;
        let n = 256;
        let on_target = goertzel(&tone(1000.0, sr, n), 1000.0, sr);
        let detuned = goertzel(&tone(1540.0, sr, n), 1000.0, sr);
        assert!(on_target[n - 1] > detuned[n - 1] * 5.0);
    }

    #[test]
    fn goertzel_silence_stays_flat() {
        let silence = vec![Complex64::new(0.0, 0.0); 128];
        let amps = goertzel(&silence, 1000.0, 8000.0);
        for &a in &amps {
            assert!(a < 1e-9);
        }
    }

    #[test]
    fn goertzel_empty_input() {
        assert!(goertzel(&[], 1000.0, 8000.0).is_empty());
    }

    #[test]
    fn discriminator_output_is_one_shorter() {
        let demod = MagnitudeDiscriminator::default();
        let samples = tone(500.0, 8000.0, 64);
        assert_eq!(demod.demodulate(&samples).len(), 63);
        assert!(demod.demodulate(&samples[..1]).is_empty());
        assert!(demod.demodulate(&[]).is_empty());
    }

    #[test]
    fn discriminator_constant_envelope_is_silent() {
        let demod = MagnitudeDiscriminator::default();
        // Axis-aligned unit samples keep the magnitude exactly 1.0, with no
        // rounding noise for the integrator to amplify.
        let samples: Vec<Complex64> = (0..64)
            .map(|i| match i % 4 {
                0 => Complex64::new(1.0, 0.0),
                1 => Complex64::new(0.0, 1.0),
                2 => Complex64::new(-1.0, 0.0),
                _ => Complex64::new(0.0, -1.0),
            })
            .collect();
        // Constant magnitude means zero derivative, so the integrator never
        // leaves zero.
        for v in demod.demodulate(&samples) {
            assert!(v.abs() < 1e-12);
        }
    }

    #[test]
    fn discriminator_tracks_envelope_changes() {
        let demod = MagnitudeDiscriminator::default();
        let samples: Vec<Complex64> = (0..64)
            .map(|i| Complex64::new(1.0 + i as f64 * 0.01, 0.0))
            .collect();
        let out = demod.demodulate(&samples);
        assert!(out[0] > 0.0, "rising envelope should push frequency up");
    }
}
