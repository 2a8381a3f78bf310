//! Error types returned by [`PackedBitSet`](crate::PackedBitSet) and
//! [`MembershipFilter`](crate::MembershipFilter) operations.

/// Contract violations reported by this crate.
///
/// All errors are raised synchronously by the call that broke the contract,
/// and a failing call never leaves its operands partially modified.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
#[non_exhaustive]
pub enum Error {
    /// A construction parameter is out of its valid domain.
    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    /// A bit index outside `[0, len)` was accessed.
    #[error("index {index} out of range for bitset of length {len}")]
    IndexOutOfRange { index: usize, len: usize },

    /// A bitwise combine was attempted against something that is not a
    /// [`PackedBitSet`](crate::PackedBitSet).
    #[error("bitwise combine requires another PackedBitSet")]
    TypeMismatch,

    /// A bitwise combine was attempted between sets of different lengths.
    #[error("bitset length mismatch: expected {expected}, got {actual}")]
    LengthMismatch { expected: usize, actual: usize },

    /// A merge was attempted between filters that do not share `k` and `m`,
    /// or between a filter and itself.
    #[error("incompatible filter: {0}")]
    IncompatibleFilter(String),
}

/// Shorthand for results carrying an [`Error`].
pub type Result<T, E = Error> = std::result::Result<T, E>;
