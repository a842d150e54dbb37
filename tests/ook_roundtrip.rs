//! End-to-end loopback: encode a rolling code, synthesize its OOK waveform,
//! replay it as an RX capture and check the framed hex output.

use secplus_sdr::device::FileDevice;
use secplus_sdr::framer::{Bit, bits_to_hex};
use secplus_sdr::secplus::{self, TxWaveform};
use secplus_sdr::{EnvelopeDetector, PipelineConfig, pipeline};

/// Scaled-down radio parameters. The sample rate is chosen so one device
/// chunk (sample_rate / 100 bytes) holds an entire two-copy burst and the
/// quiet gate only ever sees clean silence afterwards.
fn test_config() -> PipelineConfig {
    PipelineConfig {
        sample_rate: 1_000_000.0,
        symbol_rate: 50_000.0,
        symbol_width: 20,
        noise_floor: 5.0,
        quiet_chunk_limit: 3,
        dc_guard_bins: 0,
        smoothing_taps: 1,
        ..PipelineConfig::default()
    }
}

/// Feed transmit samples back as receive bytes: the off level lands on the
/// IQ midpoint 127 and full amplitude on 254, matching a hard-keyed OOK
/// capture.
fn loopback_bytes(wave: &mut TxWaveform) -> Vec<u8> {
    let mut bytes = Vec::new();
    while let Some(buf) = wave.fill(4096) {
        for pair in buf.chunks_exact(2) {
            bytes.push((127 + pair[0] as i16) as u8);
            bytes.push(127);
        }
    }
    bytes
}

fn gap_bytes(symbols: usize, width: usize) -> Vec<u8> {
    vec![127; symbols * width * 2]
}

#[test]
fn encoded_waveform_survives_the_receive_path() {
    let config = test_config();
    let width = config.symbol_width;

    // Chosen so the digit pattern starts and ends on a non-zero digit and
    // contains no zero run long enough to look like an inter-packet gap.
    let rolling = 1_234_566u64;
    let fixed = 2_345u64;
    let digits = secplus::encode(rolling, fixed).unwrap();
    assert_ne!(digits[0], 0);
    assert_ne!(digits[39], 0);

    // Two copies of the transmission separated by a >10-symbol gap, padded
    // with silence to a chunk boundary so the burst drains cleanly.
    let mut capture = Vec::new();
    capture.extend(gap_bytes(12, width));
    for _ in 0..2 {
        let mut wave = TxWaveform::new(&digits, config.samples_per_bit(), 1, 127);
        capture.extend(loopback_bytes(&mut wave));
        capture.extend(gap_bytes(12, width));
    }
    assert!(capture.len() < config.chunk_size());
    capture.resize(config.chunk_size(), 127);
    let silence_chunks = config.quiet_chunk_limit as usize + 1;
    capture.extend(vec![127; silence_chunks * config.chunk_size()]);

    let mut device = FileDevice::from_capture(capture);
    let detector = EnvelopeDetector::new(config.clone());
    let packets = pipeline::run_receive(&mut device, &config, detector, None).unwrap();

    // Hex for the on/off keying of the digit pattern, one bit per digit.
    let keyed: Vec<Bit> = digits.iter().map(|&d| Bit::from_level(d != 0)).collect();
    let expected = bits_to_hex(&keyed);
    assert_eq!(expected, "f3fcf0fde5");
    assert_eq!(packets, vec![expected.clone(), expected]);
}

#[test]
fn copies_with_short_gaps_merge_into_one_packet() {
    let config = test_config();
    let width = config.symbol_width;

    let digits = secplus::encode(1_234_566, 2_345).unwrap();

    // A 5-symbol pause is payload-sized, not a packet delimiter, so the two
    // copies frame as a single long packet.
    let mut capture = Vec::new();
    capture.extend(gap_bytes(12, width));
    let mut wave = TxWaveform::new(&digits, config.samples_per_bit(), 1, 127);
    capture.extend(loopback_bytes(&mut wave));
    capture.extend(gap_bytes(5, width));
    let mut wave = TxWaveform::new(&digits, config.samples_per_bit(), 1, 127);
    capture.extend(loopback_bytes(&mut wave));
    capture.extend(gap_bytes(12, width));
    assert!(capture.len() < config.chunk_size());
    capture.resize(config.chunk_size(), 127);
    let silence_chunks = config.quiet_chunk_limit as usize + 1;
    capture.extend(vec![127; silence_chunks * config.chunk_size()]);

    let mut device = FileDevice::from_capture(capture);
    let detector = EnvelopeDetector::new(config.clone());
    let packets = pipeline::run_receive(&mut device, &config, detector, None).unwrap();

    let mut keyed: Vec<Bit> = digits.iter().map(|&d| Bit::from_level(d != 0)).collect();
    keyed.extend(std::iter::repeat_n(Bit::Zero, 5));
    keyed.extend(digits.iter().map(|&d| Bit::from_level(d != 0)));
    assert_eq!(packets, vec![bits_to_hex(&keyed)]);
}
