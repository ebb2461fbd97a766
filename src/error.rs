use thiserror::Error;

/// Everything that can go wrong at the library boundary.
///
/// The fatal kinds come back as `Err` from the operation that hit them.
/// `InvalidSize` and `DuplicateKey` are soft: the operation logs a warning
/// through the `log` facade and returns with the container untouched.
/// Allocator exhaustion does not travel through this enum at all: the
/// allocation paths abort via [`std::alloc::handle_alloc_error`], which is
/// the contract the containers are written against.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum Error {
    /// A raw adoption was handed a null base pointer.
    #[error("required pointer argument is null")]
    NullArgument,

    /// An index-keyed operation addressed a slot at or past the live length.
    #[error("index {index} lies outside a container of size {size}")]
    IndexOutOfBounds { index: usize, size: usize },

    /// A cursor stepped before the first element or past the end sentinel.
    #[error("cursor stepped outside its container")]
    OutOfRange,

    /// Two cursors handed to a range operation address different containers.
    #[error("cursor pair does not address a single container")]
    InconsistentCursorPair,

    /// The requested byte count cannot be represented as an allocation.
    #[error("allocation of {0} bytes failed")]
    AllocationFailure(usize),

    /// A capacity request that the operation rejects (reserve below the
    /// current capacity, or a zero size where one is meaningless).
    #[error("size {0} is not usable here")]
    InvalidSize(usize),

    /// `insert_unique` found the key already present.
    #[error("element already present, unique insertion skipped")]
    DuplicateKey,
}

pub type Result<T> = std::result::Result<T, Error>;
