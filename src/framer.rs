//! Run-length packet framing.
//!
//! Turns the detector's raw binary symbol history into discrete packets of
//! symbol-aligned bits and serializes them to hex. The stages mirror the
//! receive path: run-length encode, reject glitch runs, split on the long
//! inter-transmission gap, re-quantize onto the symbol grid, pack nibbles.

use tracing::debug;

/// One demodulated symbol level.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Bit {
    Zero,
    One,
}

impl Bit {
    pub fn from_level(high: bool) -> Self {
        if high { Bit::One } else { Bit::Zero }
    }

    pub fn value(self) -> u8 {
        match self {
            Bit::Zero => 0,
            Bit::One => 1,
        }
    }
}

/// A maximal stretch of identical symbols.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Run {
    pub bit: Bit,
    pub count: u32,
}

/// One framed transmission, still in run form.
pub type Packet = Vec<Run>;

/// Collapse consecutive equal symbols into runs.
pub fn run_length_encode(bits: &[Bit]) -> Vec<Run> {
    let mut runs: Vec<Run> = Vec::new();
    for &bit in bits {
        match runs.last_mut() {
            Some(run) if run.bit == bit => run.count += 1,
            _ => runs.push(Run { bit, count: 1 }),
        }
    }
    runs
}

/// Drop runs shorter than `min_count`, then merge newly-adjacent runs of
/// the same value. Applying the filter to its own output changes nothing.
pub fn reject_glitches(runs: &[Run], min_count: u32) -> Vec<Run> {
    let mut filtered: Vec<Run> = Vec::new();
    for &run in runs {
        if run.count < min_count {
            continue;
        }
        match filtered.last_mut() {
            Some(prev) if prev.bit == run.bit => prev.count += run.count,
            _ => filtered.push(run),
        }
    }
    filtered
}

/// Split a run sequence into packets at long low gaps.
///
/// A zero run longer than `gap` terminates the current packet. The gap run
/// itself is framing, not payload, and is excluded; packets that end up
/// empty (leading or back-to-back gaps) are dropped.
pub fn split_packets(runs: &[Run], gap: u32) -> Vec<Packet> {
    let mut packets = Vec::new();
    let mut current: Packet = Vec::new();

    for &run in runs {
        if run.bit == Bit::Zero && run.count > gap {
            if !current.is_empty() {
                packets.push(std::mem::take(&mut current));
            }
            continue;
        }
        current.push(run);
    }
    if !current.is_empty() {
        packets.push(current);
    }
    packets
}

/// Re-quantize a packet onto the symbol grid: each run contributes
/// `count / symbol_width` (integer division) symbols.
pub fn expand(packet: &[Run], symbol_width: u32) -> Vec<Bit> {
    let mut bits = Vec::new();
    for run in packet {
        for _ in 0..run.count / symbol_width {
            bits.push(run.bit);
        }
    }
    bits
}

/// Pack bits four at a time, MSB first, into lowercase hex. A partial
/// trailing nibble is still emitted, left-padded with zeros.
pub fn bits_to_hex(bits: &[Bit]) -> String {
    bits.chunks(4)
        .map(|nibble| {
            let value = nibble.iter().fold(0u8, |acc, &b| (acc << 1) | b.value());
            char::from_digit(value as u32, 16).unwrap_or('0')
        })
        .collect()
}

/// Frame a symbol history into hex packets.
pub struct PacketFramer {
    symbol_width: u32,
    glitch_floor: u32,
    packet_gap: u32,
}

impl PacketFramer {
    pub fn new(symbol_width: u32) -> Self {
        Self {
            symbol_width,
            glitch_floor: symbol_width / 2,
            packet_gap: symbol_width * 10,
        }
    }

    /// Run the full framing chain. Silent or all-equal histories come back
    /// as an empty list, never an error: a packet without a single mark run
    /// is residual silence, not a transmission, and is dropped.
    pub fn frame(&self, bits: &[Bit]) -> Vec<String> {
        let runs = run_length_encode(bits);
        let runs = reject_glitches(&runs, self.glitch_floor);
        let packets = split_packets(&runs, self.packet_gap);
        debug!(
            runs = runs.len(),
            packets = packets.len(),
            "framed symbol history"
        );

        packets
            .iter()
            .filter(|packet| packet.iter().any(|run| run.bit == Bit::One))
            .map(|packet| bits_to_hex(&expand(packet, self.symbol_width)))
            .filter(|hex| !hex.is_empty())
            .collect()
    }

    /// Space-separated display form.
    pub fn frame_joined(&self, bits: &[Bit]) -> String {
        self.frame(bits).join(" ")
    }
}
