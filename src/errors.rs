//! Errors specific to seekable sequential key generators
use thiserror::Error;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
/// Enum of errors associated with a key sequence
pub enum Error {
    /// This error occurs when an advance would run past the last key the tree can address,
    /// or when any operation is attempted on a sequence that has already been exhausted.
    #[error("keyspace exhausted")]
    KeyspaceExhausted,
    /// Error occurs when a sequence is declared with room for zero keys.
    #[error("invalid maximum key count: {0}")]
    InvalidMaxKeys(u64),
    /// Error occurs when a PRF is configured with an output size the underlying primitive
    /// cannot produce.
    #[error("invalid PRF output size: {0}")]
    InvalidOutputSize(usize),
}
