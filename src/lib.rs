//! Errors that remember where they happened.
//!
//! [`TracedError`] augments error values with three things that survive wrapping:
//! a stack trace captured where the error was created or wrapped, a queryable type tag,
//! and a key-value [`Metadata`] bag. Each submodule re-exports its public surface from
//! here, so consumers can simply depend on `error_trace::*` or pick focused pieces.
//!
//! # Examples
//!
//! ## Wrapping and Type Propagation
//!
//! ```
//! use error_trace::{chain, TracedError};
//!
//! let e1 = TracedError::new("disk full");
//! let e2 = TracedError::wrap_with_type(e1.clone(), "save failed", "IOError");
//! let e3 = TracedError::wrap(e2, "request failed");
//!
//! assert_eq!(e3.error_type(), "IOError");
//! assert!(chain::is(&e3, &e1));
//!
//! let rendered = e3.to_string();
//! let save = rendered.find("[save failed]").unwrap();
//! let disk = rendered.find("[disk full]").unwrap();
//! assert!(save < disk);
//! ```
//!
//! ## Sentinels
//!
//! ```
//! use std::sync::LazyLock;
//! use error_trace::{chain, metadata, TracedError};
//!
//! static LIBRARY_ERROR: LazyLock<TracedError> =
//!     LazyLock::new(|| TracedError::sentinel("LibraryError", ""));
//! static INVALID: LazyLock<TracedError> = LazyLock::new(|| {
//!     TracedError::wrap_as_sentinel(LIBRARY_ERROR.clone(), "InvalidError", "something went wrong")
//! });
//!
//! fn do_library_stuff() -> Result<(), TracedError> {
//!     Err(INVALID.with_stack().with_metadata(metadata! { "user" => "something" }))
//! }
//!
//! let err = do_library_stuff().unwrap_err();
//! assert!(chain::is(&err, &*INVALID));
//! assert!(chain::is(&err, &*LIBRARY_ERROR));
//! assert_eq!(err.error_type(), "InvalidError");
//! ```
//!
//! ## Panic Boundaries
//!
//! ```
//! use error_trace::panic::catch_panic;
//!
//! let result = catch_panic(|| {
//!     let empty: Vec<u8> = Vec::new();
//!     empty[3]
//! });
//! assert!(result.unwrap_err().message().starts_with("caught panic: index out of bounds"));
//! ```

/// Cause-chain traversal: identity matching, downcasting and metadata lookup
pub mod chain;
/// Error construction macros
pub mod macros;
/// Conversion of caught panics into errors
pub mod panic;
/// Convenience re-exports for quick starts
pub mod prelude;
/// Extension traits for `Result`
pub mod traits;
/// TracedError, stack traces and metadata
pub mod types;

pub use traits::*;
pub use types::{
    BoxError, FingerprintConfig, Frame, Metadata, StackTrace, TracedError, TracedResult, Value,
    MAX_FRAMES,
};
