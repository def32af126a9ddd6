use thiserror::Error;

/// Why a single sensor strategy produced no value.
///
/// These never leave the fallback chains; they are logged and the chain
/// moves on to the next strategy.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SensorError {
    #[error("sensor source unavailable: {0}")]
    Unavailable(String),

    #[error("no matching sensor")]
    NotFound,

    #[error("sensor backend failed: {0}")]
    Backend(String),
}

impl SensorError {
    pub fn unavailable(message: impl Into<String>) -> Self {
        Self::Unavailable(message.into())
    }

    pub fn backend(message: impl Into<String>) -> Self {
        Self::Backend(message.into())
    }
}

pub type SensorResult<T> = std::result::Result<T, SensorError>;

/// A whole tick could not be assembled into a sample.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CollectionError {
    #[error("memory totals unavailable")]
    MemoryUnavailable,

    #[error("collection panicked: {0}")]
    Panicked(String),
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SamplerError {
    #[error("sampler is already running")]
    AlreadyStarted,

    #[error("sampler was stopped; create a new one to sample again")]
    Stopped,

    #[error("failed to spawn sampler thread: {0}")]
    Spawn(String),
}
