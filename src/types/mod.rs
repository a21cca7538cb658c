//! Error value types.
//!
//! - [`TracedError`]: the composite error (cause, message, type tag, stack trace, metadata)
//! - [`StackTrace`] and [`Frame`]: the captured call stack
//! - [`Metadata`] and [`Value`]: the key-value bag carried by errors
//!
//! # Examples
//!
//! ```
//! use error_trace::{metadata, TracedError};
//!
//! let err = TracedError::new_with_type("connection refused", "NetworkError")
//!     .with_metadata(metadata! { "host" => "db-primary-01", "port" => 5432 });
//!
//! println!("{err}");
//! // Output: NetworkError@my_app::connect [connection refused]
//! ```

pub mod frame;
pub mod metadata;
pub mod stack_trace;
pub mod traced_error;

pub use frame::Frame;
pub use metadata::{Metadata, Value};
pub use stack_trace::{StackTrace, MAX_FRAMES};
pub use traced_error::*;

/// Result alias whose failures are [`TracedError`]s.
///
/// # Type Parameters
///
/// * `T` - The success value type
pub type TracedResult<T> = Result<T, TracedError>;
