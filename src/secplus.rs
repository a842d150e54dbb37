//! Security+ rolling-code codec and OOK waveform synthesis.
//!
//! A transmission carries two values interleaved as 40 ternary digits: a
//! 32-bit rolling counter (low bit forced clear, bit order reversed before
//! base-3 conversion so the LSB goes over the air first) and a 20-digit
//! base-3 fixed identifier. Digit pairs are (rolling_digit, checksum_digit) with
//! `checksum = (rolling_digit + fixed_digit) mod 3`, so the fixed digit is
//! recoverable from the other two.

use crate::error::{Error, Result};

/// Number of ternary digits in one packet.
pub const PACKET_DIGITS: usize = 40;

/// Exclusive upper bound for fixed codes: 3^20.
pub const FIXED_LIMIT: u64 = 3u64.pow(20);

/// Exclusive upper bound for rolling codes: 2^32.
pub const ROLLING_LIMIT: u64 = 1 << 32;

fn to_base3_digits(mut value: u64) -> [u8; 20] {
    let mut digits = [0u8; 20];
    for slot in digits.iter_mut().rev() {
        *slot = (value % 3) as u8;
        value /= 3;
    }
    digits
}

/// Encode a (rolling, fixed) pair into 40 ternary digits.
///
/// The low bit of the rolling code is cleared before encoding; with bit 0
/// forced to zero the reversed value stays below 2^31 < 3^20, so 20 base-3
/// digits always suffice.
pub fn encode(rolling: u64, fixed: u64) -> Result<[u8; PACKET_DIGITS]> {
    if rolling >= ROLLING_LIMIT {
        return Err(Error::InvalidInput(format!(
            "rolling code {rolling} must be below 2^32"
        )));
    }
    if fixed >= FIXED_LIMIT {
        return Err(Error::InvalidInput(format!(
            "fixed code {fixed} must be below 3^20"
        )));
    }

    let reversed = ((rolling as u32) & 0xffff_fffe).reverse_bits();
    let rolling_digits = to_base3_digits(reversed as u64);
    let fixed_digits = to_base3_digits(fixed);

    let mut packet = [0u8; PACKET_DIGITS];
    for i in 0..20 {
        packet[2 * i] = rolling_digits[i];
        packet[2 * i + 1] = (rolling_digits[i] + fixed_digits[i]) % 3;
    }
    Ok(packet)
}

/// Decode 40 ternary digits back into (rolling, fixed).
///
/// Exactly 40 digits, each below 3, are required; anything else is
/// `InvalidInput` with no partial result. The returned rolling value has
/// its low bit clear, matching what [`encode`] transmitted.
pub fn decode(digits: &[u8]) -> Result<(u32, u32)> {
    if digits.len() != PACKET_DIGITS {
        return Err(Error::InvalidInput(format!(
            "expected {PACKET_DIGITS} ternary digits, got {}",
            digits.len()
        )));
    }
    if let Some(&bad) = digits.iter().find(|&&d| d > 2) {
        return Err(Error::InvalidInput(format!("{bad} is not a ternary digit")));
    }

    let mut reversed: u64 = 0;
    let mut fixed: u64 = 0;
    for pair in digits.chunks_exact(2) {
        let rolling_digit = pair[0];
        reversed = reversed * 3 + rolling_digit as u64;
        let fixed_digit = (3 + pair[1] - rolling_digit) % 3;
        fixed = fixed * 3 + fixed_digit as u64;
    }

    let rolling = (reversed as u32).reverse_bits();
    Ok((rolling, fixed as u32))
}

/// Pull-style OOK sample source for the device transmit callback.
///
/// Zero digits key the carrier off, non-zero digits key it on at
/// `amplitude`; samples are interleaved (I, Q=0) signed bytes. The whole
/// digit pattern repeats `repeats` times, then the source reports
/// end-of-stream.
pub struct TxWaveform {
    digits: Vec<u8>,
    samples_per_bit: usize,
    repeats: usize,
    amplitude: i8,
    offset: usize,
}

impl TxWaveform {
    pub fn new(digits: &[u8], samples_per_bit: usize, repeats: usize, amplitude: i8) -> Self {
        Self {
            digits: digits.to_vec(),
            samples_per_bit: samples_per_bit.max(1),
            repeats,
            amplitude,
            offset: 0,
        }
    }

    /// Total samples this source will emit.
    pub fn total_samples(&self) -> usize {
        self.digits.len() * self.samples_per_bit * self.repeats
    }

    /// Produce up to `length` bytes of waveform (the final buffer may be
    /// shorter), or `None` once the repeated pattern is exhausted.
    pub fn fill(&mut self, length: usize) -> Option<Vec<i8>> {
        if self.digits.is_empty() || self.offset >= self.total_samples() {
            return None;
        }

        let remaining = (self.total_samples() - self.offset) * 2;
        let mut buf = vec![0i8; length.min(remaining)];
        for pair in buf.chunks_exact_mut(2) {
            let index = (self.offset / self.samples_per_bit) % self.digits.len();
            pair[0] = if self.digits[index] == 0 {
                0
            } else {
                self.amplitude
            };
            pair[1] = 0;
            self.offset += 1;
        }
        Some(buf)
    }
}
