//! Display sinks for computed spectra and symbol streams.
//!
//! The pipeline pushes data here at chunk cadence; implementations must be
//! cheap and may not block. Errors are not part of the contract: a sink
//! that cannot draw simply drops the frame.

use crate::framer::Bit;
use tracing::debug;

pub trait Renderer {
    /// A centered spectrum's magnitudes for one chunk.
    fn render_spectrum(&self, magnitudes: &[f64]);

    /// The current demodulated symbol history after a burst.
    fn render_symbols(&self, symbols: &[Bit]);
}

/// Discards everything.
pub struct NullRenderer;

impl Renderer for NullRenderer {
    fn render_spectrum(&self, _magnitudes: &[f64]) {}
    fn render_symbols(&self, _symbols: &[Bit]) {}
}

/// Logs one-line summaries at debug level; the CLI's stand-in for the
/// waveform canvas.
pub struct TraceRenderer;

impl Renderer for TraceRenderer {
    fn render_spectrum(&self, magnitudes: &[f64]) {
        let peak = magnitudes.iter().copied().fold(0.0f64, f64::max);
        debug!(bins = magnitudes.len(), peak, "spectrum frame");
    }

    fn render_symbols(&self, symbols: &[Bit]) {
        let marks = symbols.iter().filter(|&&b| b == Bit::One).count();
        debug!(symbols = symbols.len(), marks, "symbol frame");
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn null_renderer_accepts_anything() {
        let r = NullRenderer;
        r.render_spectrum(&[]);
        r.render_spectrum(&[1.0, 2.0]);
        r.render_symbols(&[Bit::One, Bit::Zero]);
    }
}
