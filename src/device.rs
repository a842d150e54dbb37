//! Radio device capability.
//!
//! The pipeline consumes this interface; it never implements hardware
//! access itself. Configuration setters are assumed idempotent. Receive
//! delivers raw IQ byte chunks into a channel sink; transmit pulls waveform
//! bytes from a callback until it reports end-of-stream.

use crate::error::DeviceError;
use crossbeam_channel::Sender;

/// Pull source for transmit: given a requested byte count, return the next
/// waveform bytes or `None` at end-of-stream.
pub type TxSource<'a> = &'a mut dyn FnMut(usize) -> Option<Vec<i8>>;

/// One receive-sink message: a raw IQ byte chunk, or the error that killed
/// the stream.
pub type ChunkResult = Result<Vec<u8>, DeviceError>;

pub trait RadioDevice {
    fn set_frequency(&mut self, hz: f64) -> Result<(), DeviceError>;
    fn set_sample_rate(&mut self, hz: f64) -> Result<(), DeviceError>;
    fn set_lna_gain(&mut self, db: u32) -> Result<(), DeviceError>;
    fn set_vga_gain(&mut self, db: u32) -> Result<(), DeviceError>;
    fn set_tx_gain(&mut self, db: u32) -> Result<(), DeviceError>;
    fn set_amp_enabled(&mut self, enabled: bool) -> Result<(), DeviceError>;
    fn set_antenna_power_enabled(&mut self, enabled: bool) -> Result<(), DeviceError>;

    /// Begin streaming `chunk_size`-byte chunks into `sink`. A stream that
    /// dies mid-capture sends one final `Err` before closing; a clean end
    /// just drops the sender.
    fn start_receive(
        &mut self,
        chunk_size: usize,
        sink: Sender<ChunkResult>,
    ) -> Result<(), DeviceError>;

    fn stop_receive(&mut self) -> Result<(), DeviceError>;

    /// Blocking transmit: repeatedly pulls from `source` and writes to the
    /// air until the source returns `None`.
    fn start_transmit(&mut self, source: TxSource<'_>) -> Result<(), DeviceError>;
}

/// File-backed device for offline work: replays a raw IQ capture on
/// receive and collects transmitted waveform bytes. Used by the CLI and by
/// tests; configuration setters are accepted and ignored.
pub struct FileDevice {
    capture: Vec<u8>,
    transmitted: Vec<i8>,
}

impl FileDevice {
    pub fn from_capture(capture: Vec<u8>) -> Self {
        Self {
            capture,
            transmitted: Vec::new(),
        }
    }

    /// Everything written by `start_transmit` so far.
    pub fn transmitted(&self) -> &[i8] {
        &self.transmitted
    }
}

impl RadioDevice for FileDevice {
    fn set_frequency(&mut self, _hz: f64) -> Result<(), DeviceError> {
        Ok(())
    }
    fn set_sample_rate(&mut self, _hz: f64) -> Result<(), DeviceError> {
        Ok(())
    }
    fn set_lna_gain(&mut self, _db: u32) -> Result<(), DeviceError> {
        Ok(())
    }
    fn set_vga_gain(&mut self, _db: u32) -> Result<(), DeviceError> {
        Ok(())
    }
    fn set_tx_gain(&mut self, _db: u32) -> Result<(), DeviceError> {
        Ok(())
    }
    fn set_amp_enabled(&mut self, _enabled: bool) -> Result<(), DeviceError> {
        Ok(())
    }
    fn set_antenna_power_enabled(&mut self, _enabled: bool) -> Result<(), DeviceError> {
        Ok(())
    }

    fn start_receive(
        &mut self,
        chunk_size: usize,
        sink: Sender<ChunkResult>,
    ) -> Result<(), DeviceError> {
        if chunk_size == 0 {
            return Err(DeviceError::new("chunk size must be non-zero"));
        }
        let capture = std::mem::take(&mut self.capture);
        std::thread::spawn(move || {
            for chunk in capture.chunks(chunk_size) {
                if sink.send(Ok(chunk.to_vec())).is_err() {
                    break;
                }
            }
            // sink drops here, ending the stream
        });
        Ok(())
    }

    fn stop_receive(&mut self) -> Result<(), DeviceError> {
        Ok(())
    }

    fn start_transmit(&mut self, source: TxSource<'_>) -> Result<(), DeviceError> {
        const TX_CHUNK_BYTES: usize = 4096;
        while let Some(buf) = source(TX_CHUNK_BYTES) {
            self.transmitted.extend_from_slice(&buf);
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crossbeam_channel::bounded;

    #[test]
    fn file_device_replays_capture_in_chunks() {
        let capture: Vec<u8> = (0..=255).collect();
        let mut device = FileDevice::from_capture(capture.clone());
        let (tx, rx) = bounded(8);
        device.start_receive(64, tx).unwrap();

        let mut received = Vec::new();
        while let Ok(chunk) = rx.recv() {
            let chunk = chunk.unwrap();
            assert!(chunk.len() <= 64);
            received.extend(chunk);
        }
        assert_eq!(received, capture);
    }

    #[test]
    fn zero_chunk_size_is_a_device_error() {
        let mut device = FileDevice::from_capture(vec![1, 2, 3]);
        let (tx, _rx) = bounded(1);
        assert!(device.start_receive(0, tx).is_err());
    }

    #[test]
    fn transmit_collects_until_end_of_stream() {
        let mut device = FileDevice::from_capture(Vec::new());
        let mut remaining = 3usize;
        device
            .start_transmit(&mut |len| {
                if remaining == 0 {
                    return None;
                }
                remaining -= 1;
                Some(vec![remaining as i8; len.min(4)])
            })
            .unwrap();
        assert_eq!(device.transmitted().len(), 12);
    }
}
