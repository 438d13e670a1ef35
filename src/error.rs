//! Error taxonomy for map construction.

/// Represents errors that can occur when creating a `BucketHashMap`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Error {
    /// Capacity hint was negative or above [`crate::MAX_CAPACITY`]
    InvalidCapacity(i64),
}

impl std::fmt::Display for Error {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::InvalidCapacity(cap) => write!(
                f,
                "invalid capacity hint {cap}: must be within 0..={}",
                crate::MAX_CAPACITY
            ),
        }
    }
}

impl std::error::Error for Error {}

/// Map result
pub type Result<T> = std::result::Result<T, Error>;
