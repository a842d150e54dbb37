use thiserror::Error;

/// Errors surfaced by the codec and the device-driven pipeline.
///
/// A decode that finds no packets is *not* an error: the framer returns an
/// empty list for silent or noise-only histories.
#[derive(Debug, Error)]
pub enum Error {
    /// Out-of-range code values or malformed digit sequences, rejected at
    /// the codec boundary before any partial output is produced.
    #[error("invalid input: {0}")]
    InvalidInput(String),

    /// Propagated from the radio device capability (disconnect, unsupported
    /// setting, failed stream).
    #[error(transparent)]
    Device(#[from] DeviceError),
}

/// Failure reported by a `RadioDevice` implementation.
#[derive(Debug, Error)]
#[error("device error: {0}")]
pub struct DeviceError(pub String);

impl DeviceError {
    pub fn new(msg: impl Into<String>) -> Self {
        Self(msg.into())
    }
}

pub type Result<T> = std::result::Result<T, Error>;
