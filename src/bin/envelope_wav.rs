//! Render a raw IQ capture's smoothed magnitude envelope to a WAV file so
//! the burst shape can be eyeballed in an audio editor while tuning the
//! gate thresholds.

use clap::Parser;
use secplus_sdr::PipelineConfig;
use secplus_sdr::dsp::bytes_to_iq;
use secplus_sdr::dsp::filter::{boxcar, convolve_real};
use secplus_sdr::logging::init_logging;
use std::fs;
use std::io;
use tracing::info;

#[derive(Parser)]
#[command(about = "Dump a capture's smoothed envelope as WAV")]
struct Args {
    /// Raw IQ capture file.
    input: String,
    /// Output WAV path.
    output: String,
    /// WAV sample rate; keep it low so the burst is audible/zoomable.
    #[arg(long, default_value_t = 48_000)]
    wav_rate: u32,
}

fn main() -> io::Result<()> {
    init_logging();
    let args = Args::parse();
    let config = PipelineConfig::default();

    let capture = fs::read(&args.input)?;
    let samples = bytes_to_iq(&capture);
    let magnitudes: Vec<f64> = samples.iter().map(|c| c.norm()).collect();
    let envelope = convolve_real(&magnitudes, &boxcar(config.smoothing_taps));

    let peak = envelope.iter().copied().fold(f64::MIN_POSITIVE, f64::max);
    let spec = hound::WavSpec {
        channels: 1,
        sample_rate: args.wav_rate,
        bits_per_sample: 16,
        sample_format: hound::SampleFormat::Int,
    };
    let mut writer = hound::WavWriter::create(&args.output, spec).map_err(io::Error::other)?;
    let amplitude = i16::MAX as f64;
    for &value in &envelope {
        let scaled = (value / peak * amplitude) as i16;
        writer.write_sample(scaled).map_err(io::Error::other)?;
    }
    writer.finalize().map_err(io::Error::other)?;

    info!(
        samples = envelope.len(),
        peak,
        output = %args.output,
        "envelope written"
    );
    Ok(())
}
