//! Carrier gating and bit synchronization.
//!
//! The detector is the only stateful stage of the receive path. It owns the
//! burst accumulation buffer, the bounded symbol history and the quiet-chunk
//! counter; chunks must be fed strictly in arrival order.

use crate::config::PipelineConfig;
use crate::dsp::bytes_to_iq;
use crate::dsp::fft::{fft, fftshift};
use crate::dsp::filter::{boxcar, convolve_real};
use crate::framer::{Bit, PacketFramer};
use crate::render::Renderer;
use num_complex::Complex64;
use tracing::{debug, info};

/// Quiet-chunk bookkeeping. After a burst is drained no further processing
/// happens until signal returns and restarts the count.
enum QuietState {
    Counting(u32),
    Drained,
}

pub struct EnvelopeDetector {
    config: PipelineConfig,
    framer: PacketFramer,
    /// Samples accumulated across the current active-carrier window.
    buffer: Vec<Complex64>,
    /// Bounded demodulated symbol history, oldest first.
    history: Vec<Bit>,
    quiet: QuietState,
    renderer: Option<Box<dyn Renderer>>,
}

impl EnvelopeDetector {
    pub fn new(config: PipelineConfig) -> Self {
        let framer = PacketFramer::new(config.symbol_width as u32);
        Self {
            config,
            framer,
            buffer: Vec::new(),
            history: Vec::new(),
            quiet: QuietState::Counting(0),
            renderer: None,
        }
    }

    pub fn with_renderer(mut self, renderer: Box<dyn Renderer>) -> Self {
        self.renderer = Some(renderer);
        self
    }

    /// Feed one raw byte chunk from the device.
    ///
    /// Returns decoded hex packets when a completed burst pushes the symbol
    /// history over the detection minimum, `None` otherwise.
    pub fn process_chunk(&mut self, data: &[u8]) -> Option<Vec<String>> {
        let samples = bytes_to_iq(data);
        let spectrum = fft(&samples);

        if let Some(renderer) = &self.renderer {
            let magnitudes: Vec<f64> = fftshift(&spectrum).iter().map(|c| c.norm()).collect();
            renderer.render_spectrum(&magnitudes);
        }

        // The leading bins carry the DC offset artifact of the capture
        // hardware; the gate looks at the rest.
        let guard = self.config.dc_guard_bins.min(spectrum.len());
        let peak = spectrum[guard..]
            .iter()
            .map(|c| c.norm())
            .fold(0.0f64, f64::max);

        if peak < self.config.noise_floor {
            match self.quiet {
                QuietState::Drained => None,
                QuietState::Counting(n) => {
                    let n = n + 1;
                    if n >= self.config.quiet_chunk_limit {
                        self.quiet = QuietState::Drained;
                        self.drain_burst()
                    } else {
                        self.quiet = QuietState::Counting(n);
                        None
                    }
                }
            }
        } else {
            self.quiet = QuietState::Counting(0);
            self.buffer.extend_from_slice(&samples);
            None
        }
    }

    /// Smooth and threshold the accumulated burst into symbols, then try to
    /// frame the history.
    fn drain_burst(&mut self) -> Option<Vec<String>> {
        let samples = std::mem::take(&mut self.buffer);
        if !samples.is_empty() {
            let magnitudes: Vec<f64> = samples.iter().map(|c| c.norm()).collect();
            let smoothed = convolve_real(&magnitudes, &boxcar(self.config.smoothing_taps));
            let mean = smoothed.iter().sum::<f64>() / smoothed.len() as f64;
            let threshold = mean * self.config.threshold_ratio;
            debug!(
                burst_samples = samples.len(),
                mean, threshold, "draining burst"
            );

            self.history
                .extend(smoothed.iter().map(|&v| Bit::from_level(v > threshold)));
            let cap = self.config.history_cap();
            if self.history.len() > cap {
                self.history.drain(..self.history.len() - cap);
            }
        }

        if let Some(renderer) = &self.renderer {
            renderer.render_symbols(&self.history);
        }

        let marks = self.history.iter().filter(|&&b| b == Bit::One).count();
        if marks > self.config.min_active_symbols {
            let packets = self.framer.frame(&self.history);
            info!(marks, packets = packets.len(), "burst decoded");
            Some(packets)
        } else {
            None
        }
    }

    /// Discard any buffered partial burst and history without emitting.
    pub fn reset(&mut self) {
        self.buffer.clear();
        self.history.clear();
        self.quiet = QuietState::Counting(0);
    }

    /// Current symbol history, oldest first.
    pub fn history(&self) -> &[Bit] {
        &self.history
    }
}
