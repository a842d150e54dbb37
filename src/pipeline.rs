//! Receive and transmit sessions over a [`RadioDevice`].
//!
//! Reception is strictly serialized: the device thread pushes chunks into a
//! bounded channel and a single consumer (the calling thread) feeds the
//! detector in arrival order, preserving the gate's threshold-state
//! invariants. Transmit is a one-shot blocking operation.

use crate::config::PipelineConfig;
use crate::detector::EnvelopeDetector;
use crate::device::{ChunkResult, RadioDevice};
use crate::error::Result;
use crate::secplus::{self, TxWaveform};
use crossbeam_channel::{Receiver, bounded, never, select};
use tracing::{debug, info, warn};

/// Chunks buffered between the device callback and the detector.
const CHUNK_QUEUE_DEPTH: usize = 16;

fn configure_rx(device: &mut dyn RadioDevice, config: &PipelineConfig) -> Result<()> {
    device.set_frequency(config.frequency)?;
    device.set_sample_rate(config.sample_rate)?;
    device.set_vga_gain(config.rx_vga_gain)?;
    device.set_lna_gain(config.rx_lna_gain)?;
    Ok(())
}

/// Run a receive session until the capture stream ends or `stop` fires.
///
/// Returns every hex packet decoded during the session. A stop request
/// discards any partially accumulated burst without emitting a partial
/// decode; a device error mid-capture does the same and then surfaces the
/// error.
pub fn run_receive(
    device: &mut dyn RadioDevice,
    config: &PipelineConfig,
    mut detector: EnvelopeDetector,
    stop: Option<Receiver<()>>,
) -> Result<Vec<String>> {
    configure_rx(device, config)?;

    let (chunk_tx, chunk_rx) = bounded::<ChunkResult>(CHUNK_QUEUE_DEPTH);
    device.start_receive(config.chunk_size(), chunk_tx)?;
    info!(
        frequency = config.frequency,
        sample_rate = config.sample_rate,
        chunk_size = config.chunk_size(),
        "listening"
    );

    let stop = stop.unwrap_or_else(never);
    let mut decoded = Vec::new();

    loop {
        select! {
            recv(chunk_rx) -> chunk => match chunk {
                Ok(Ok(chunk)) => {
                    if let Some(packets) = detector.process_chunk(&chunk) {
                        for packet in &packets {
                            info!(%packet, "decoded");
                        }
                        decoded.extend(packets);
                    }
                }
                Ok(Err(err)) => {
                    detector.reset();
                    if let Err(stop_err) = device.stop_receive() {
                        warn!(%stop_err, "failed to stop receive cleanly");
                    }
                    return Err(err.into());
                }
                Err(_) => {
                    debug!("capture stream ended");
                    break;
                }
            },
            recv(stop) -> _ => {
                info!("stop requested, discarding partial burst");
                detector.reset();
                break;
            }
        }
    }

    if let Err(err) = device.stop_receive() {
        // Reception failures stop listening quietly; what was decoded
        // before the failure stays visible.
        warn!(%err, "failed to stop receive cleanly");
    }
    Ok(decoded)
}

/// Encode one (rolling, fixed) pair and transmit it as OOK.
///
/// Blocking from the caller's perspective; the device pulls waveform bytes
/// until the repeated pattern is exhausted.
pub fn run_transmit(
    device: &mut dyn RadioDevice,
    config: &PipelineConfig,
    rolling: u64,
    fixed: u64,
    amplify: bool,
) -> Result<()> {
    let digits = secplus::encode(rolling, fixed)?;

    device.set_amp_enabled(amplify)?;
    device.set_antenna_power_enabled(false)?;
    device.set_frequency(config.frequency)?;
    device.set_sample_rate(config.sample_rate)?;
    device.set_tx_gain(config.tx_gain)?;

    let mut waveform = TxWaveform::new(
        &digits,
        config.samples_per_bit(),
        config.tx_repeats,
        config.tx_amplitude,
    );
    info!(
        rolling,
        fixed,
        samples = waveform.total_samples(),
        "transmitting"
    );
    device.start_transmit(&mut |len| waveform.fill(len))?;
    Ok(())
}
