use thiserror::Error;

/// Posting into a full event queue. The event is dropped; timer and sensor
/// callers must tolerate the drop (the next periodic expiry self-heals).
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
#[error("event queue full, event dropped")]
pub struct QueueFull;

#[derive(Debug, Error, Clone)]
pub enum BuildError {
    #[error("missing radar sensor")]
    MissingSensor,
    #[error("missing transport")]
    MissingTransport,
    #[error("missing access token")]
    MissingAccessToken,
    #[error("invalid config: {0}")]
    InvalidConfig(&'static str),
}

pub type Result<T> = eyre::Result<T>;
