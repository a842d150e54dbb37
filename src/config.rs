use serde::{Deserialize, Serialize};

/// Tuning parameters for the receive/transmit pipeline.
///
/// The defaults are the Security+ reference parameters: 310 MHz carrier,
/// 2.4 MHz sample rate, 2.5 kHz symbol rate. Everything that was a magic
/// number in the capture path lives here so tests can run scaled-down
/// instances.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct PipelineConfig {
    /// Device sample rate [Hz].
    pub sample_rate: f64,
    /// Carrier frequency [Hz].
    pub frequency: f64,
    /// Symbol rate [Hz], used for transmit timing.
    pub symbol_rate: f64,
    /// Samples per received symbol. Kept independent of `symbol_rate`: the
    /// reference receiver measured 620 samples per symbol off the air even
    /// though the nominal rate implies 960.
    pub symbol_width: usize,
    /// Receive gain [dB].
    pub rx_vga_gain: u32,
    /// LNA gain [dB].
    pub rx_lna_gain: u32,
    /// Transmit gain [dB].
    pub tx_gain: u32,

    /// Spectral peak below this is treated as silence.
    pub noise_floor: f64,
    /// Consecutive quiet chunks before the accumulated burst is processed.
    pub quiet_chunk_limit: u32,
    /// Leading spectrum bins discarded before the peak search (DC and
    /// near-DC artifacts from the capture hardware).
    pub dc_guard_bins: usize,
    /// Boxcar length for envelope smoothing.
    pub smoothing_taps: usize,
    /// A smoothed sample counts as a mark when above `threshold_ratio`
    /// times the burst mean.
    pub threshold_ratio: f64,
    /// Symbol history cap, in units of symbol width.
    pub history_symbols: usize,
    /// Minimum mark symbols in the history before framing is attempted.
    pub min_active_symbols: usize,

    /// Full-pattern repetitions per transmission.
    pub tx_repeats: usize,
    /// On-level for OOK synthesis (signed 8-bit full scale).
    pub tx_amplitude: i8,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            sample_rate: 2.4e6,
            frequency: 310e6,
            symbol_rate: 2500.0,
            symbol_width: 620,
            rx_vga_gain: 40,
            rx_lna_gain: 14,
            tx_gain: 40,
            noise_floor: 1000.0,
            quiet_chunk_limit: 15,
            dc_guard_bins: 1000,
            smoothing_taps: 100,
            threshold_ratio: 1.01,
            history_symbols: 300,
            min_active_symbols: 100,
            tx_repeats: 5,
            tx_amplitude: 127,
        }
    }
}

impl PipelineConfig {
    /// Samples per transmitted symbol, from the nominal symbol rate.
    pub fn samples_per_bit(&self) -> usize {
        (self.sample_rate / self.symbol_rate) as usize
    }

    /// Receive chunk size in raw bytes (two bytes per IQ sample), sized for
    /// ~100 chunks per second at the configured rate.
    pub fn chunk_size(&self) -> usize {
        (self.sample_rate / 100.0) as usize
    }

    /// History cap in raw symbols.
    pub fn history_cap(&self) -> usize {
        self.history_symbols * self.symbol_width
    }

    /// A zero run longer than this closes the current packet.
    pub fn packet_gap(&self) -> u32 {
        (self.symbol_width * 10) as u32
    }

    /// Runs shorter than this are treated as glitches.
    pub fn glitch_floor(&self) -> u32 {
        (self.symbol_width / 2) as u32
    }
}
