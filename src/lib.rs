//! Policy-driven in-process containers: a contiguous growable sequence, a
//! left-leaning red-black ordered tree, and a stable external mergesort, all
//! parameterised over the same per-element operation bundle.
//!
//! The containers own their backing storage outright. Elements are copied,
//! destroyed, exchanged, ordered and rendered through the [`Element`] bundle
//! (`Clone + Ord + Display`), so a resource-owning type and a plain scalar
//! move through the same code paths.
//!
//! ```rust
//! use holdall::Sequence;
//!
//! let mut seq: Sequence<i32> = Sequence::new();
//! seq.push(3);
//! seq.push(1);
//! seq.push(4);
//! seq.sort();
//!
//! assert_eq!(seq.as_slice(), &[1, 3, 4]);
//! ```
//!
//! None of this is thread safe. Containers must be externally serialised if
//! they're ever shared, and cursors do not survive mutation of the container
//! they point into.

pub mod error;
pub mod policy;
pub mod seq;
pub mod sort;
pub mod tree;

pub use error::{Error, Result};
pub use policy::{Element, Opaque};
pub use seq::{Cursor, IntoIter, RawCursor, Sequence};
pub use sort::{merge_sort, merge_sort_by};
pub use tree::{OrderedTree, Traversal, TreeIter};

/// Capacity a [`Sequence`] starts with when none is requested.
pub const DEFAULT_CAPACITY: usize = 16;

/// Upper bound, in bytes, on the rendering of a single element inside the
/// boxed diagnostics. Anything longer is clipped.
pub const MAX_PRINT_BUFFER: usize = 16_384;
