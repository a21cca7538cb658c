//! Ergonomic macros for building [`TracedError`](crate::TracedError)s and
//! [`Metadata`](crate::Metadata).
//!
//! - [`macro@crate::traced`] - Creates a leaf error from `format!` arguments.
//! - [`macro@crate::wrap`] - Wraps an error with a `format!`-built message.
//! - [`macro@crate::bail`] - Returns early with a new leaf error.
//! - [`macro@crate::metadata`] - Builds a [`Metadata`](crate::Metadata) map from
//!   `key => value` pairs.
//!
//! All of them expand in place, so the captured stack trace starts at the function that
//! uses the macro.
//!
//! # Examples
//!
//! ```
//! use error_trace::{metadata, traced, wrap, TracedError};
//!
//! let shard = 3;
//! let root = traced!("shard {} unreachable", shard)
//!     .with_metadata(metadata! { "shard" => shard, "region" => "eu-west-1" });
//! let err = wrap!(root, "replicating batch {}", 17);
//!
//! assert_eq!(err.message(), "replicating batch 17");
//! assert_eq!(err.metadata().len(), 2);
//! ```

/// Creates a [`TracedError`](crate::TracedError) with a formatted message.
///
/// # Examples
///
/// ```
/// use error_trace::traced;
///
/// let user_id = 42;
/// let err = traced!("user {} not found", user_id);
/// assert_eq!(err.message(), "user 42 not found");
/// ```
#[macro_export]
macro_rules! traced {
    ($($arg:tt)*) => {
        $crate::TracedError::new(format!($($arg)*))
    };
}

/// Wraps an error with a formatted message, like [`TracedError::wrap`](crate::TracedError::wrap).
///
/// # Examples
///
/// ```
/// use error_trace::wrap;
///
/// let io = std::io::Error::other("connection reset");
/// let err = wrap!(io, "sending frame {}", 9);
/// assert!(err.cause().is_some());
/// ```
#[macro_export]
macro_rules! wrap {
    ($err:expr, $($arg:tt)*) => {
        $crate::TracedError::wrap($err, format!($($arg)*))
    };
}

/// Returns early with `Err(traced!(...))`.
///
/// # Examples
///
/// ```
/// use error_trace::{bail, TracedError};
///
/// fn check(port: u32) -> Result<u32, TracedError> {
///     if port > 65535 {
///         bail!("port {} out of range", port);
///     }
///     Ok(port)
/// }
///
/// assert!(check(70000).is_err());
/// assert_eq!(check(8080).ok(), Some(8080));
/// ```
#[macro_export]
macro_rules! bail {
    ($($arg:tt)*) => {
        return ::core::result::Result::Err($crate::traced!($($arg)*))
    };
}

/// Builds a [`Metadata`](crate::Metadata) map.
///
/// Values go through [`Value::from`](crate::Value), so strings, integers, floats, booleans,
/// vectors and nested `metadata!` maps are all accepted.
///
/// # Examples
///
/// ```
/// use error_trace::{metadata, Value};
///
/// let meta = metadata! {
///     "user" => "something",
///     "attempts" => 3,
///     "nested" => metadata! { "depth" => 1 },
/// };
/// assert_eq!(meta.get("attempts"), Some(&Value::Int(3)));
/// assert!(meta.get("nested").and_then(Value::as_map).is_some());
/// ```
#[macro_export]
macro_rules! metadata {
    () => {
        $crate::Metadata::new()
    };
    ($($key:expr => $value:expr),+ $(,)?) => {{
        let mut meta = $crate::Metadata::new();
        $(
            meta.insert($key, $value);
        )+
        meta
    }};
}
