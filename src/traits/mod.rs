//! Extension traits for producing [`TracedError`](crate::TracedError)s.
//!
//! - [`ResultExt`]: wraps the error of any `Result` with a message, a type tag or just a
//!   stack trace.
//! - [`ResultReportExt`] / [`ResultSpanExt`] (feature `tracing`): report errors as tracing
//!   events and tag them with the current span.
//!
//! # Examples
//!
//! ```
//! use error_trace::traits::ResultExt;
//!
//! let parsed: Result<u16, _> = "70000".parse::<u16>();
//! let err = parsed.wrap_err_with_type("reading port", "ConfigError").unwrap_err();
//! assert_eq!(err.error_type(), "ConfigError");
//! ```

pub mod result_ext;
#[cfg(feature = "tracing")]
pub mod tracing_ext;

pub use result_ext::ResultExt;
#[cfg(feature = "tracing")]
pub use tracing_ext::{ResultReportExt, ResultSpanExt};
