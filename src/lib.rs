//! SDR receive/transmit pipeline for Security+-style rolling-code remotes.
//!
//! Raw IQ chunks from a radio device pass through carrier gating and bit
//! synchronization ([`detector`]), run-length packet framing ([`framer`])
//! and the ternary rolling-code codec ([`secplus`]). The DSP building
//! blocks live under [`dsp`]; [`pipeline`] ties a [`device::RadioDevice`]
//! to the stages with strictly serialized chunk handling.

pub mod config;
pub mod detector;
pub mod device;
pub mod dsp;
pub mod error;
pub mod framer;
pub mod logging;
pub mod pipeline;
pub mod render;
pub mod secplus;

pub use config::PipelineConfig;
pub use detector::EnvelopeDetector;
pub use error::{DeviceError, Error, Result};
