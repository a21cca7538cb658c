//! Extension trait for wrapping `Result` errors without `.map_err()` chains.
//!
//! Every method captures the stack trace at the call site of the method itself, exactly as
//! calling the matching [`TracedError`] constructor there would.
//!
//! # Examples
//!
//! ```
//! use error_trace::traits::ResultExt;
//! use error_trace::TracedError;
//!
//! fn load_config() -> Result<String, TracedError> {
//!     std::fs::read_to_string("definitely-missing.toml")
//!         .wrap_err("loading configuration file")
//! }
//!
//! let err = load_config().unwrap_err();
//! assert_eq!(err.message(), "loading configuration file");
//! assert!(err.to_string().contains("load_config"));
//! ```

use crate::types::{BoxError, StackTrace, TracedError};

/// Extension trait turning any `Result` whose error converts into a [`BoxError`] into a
/// `Result<T, TracedError>`.
pub trait ResultExt<T> {
    /// Wraps the error with a message, like [`TracedError::wrap`].
    fn wrap_err(self, message: impl Into<String>) -> Result<T, TracedError>;

    /// Wraps the error with a lazily built message; `f` only runs on `Err`.
    ///
    /// ```
    /// use error_trace::traits::ResultExt;
    ///
    /// let user_id = 42;
    /// let result: Result<(), &str> = Err("not found");
    /// let err = result.wrap_err_with(|| format!("loading user {user_id}")).unwrap_err();
    /// assert_eq!(err.message(), "loading user 42");
    /// ```
    fn wrap_err_with<F>(self, f: F) -> Result<T, TracedError>
    where
        F: FnOnce() -> String;

    /// Wraps the error with a message and an explicit type tag, like
    /// [`TracedError::wrap_with_type`].
    fn wrap_err_with_type(
        self,
        message: impl Into<String>,
        type_tag: impl Into<String>,
    ) -> Result<T, TracedError>;

    /// Wraps the error with a stack trace only, like [`TracedError::bare`].
    fn traced(self) -> Result<T, TracedError>;
}

impl<T, E> ResultExt<T> for Result<T, E>
where
    E: Into<BoxError>,
{
    #[track_caller]
    #[inline(never)]
    fn wrap_err(self, message: impl Into<String>) -> Result<T, TracedError> {
        match self {
            Ok(value) => Ok(value),
            Err(err) => {
                let stack_trace = StackTrace::capture(0);
                Err(TracedError::wrapping(err.into(), message.into(), None, stack_trace))
            },
        }
    }

    #[track_caller]
    #[inline(never)]
    fn wrap_err_with<F>(self, f: F) -> Result<T, TracedError>
    where
        F: FnOnce() -> String,
    {
        match self {
            Ok(value) => Ok(value),
            Err(err) => {
                let stack_trace = StackTrace::capture(0);
                Err(TracedError::wrapping(err.into(), f(), None, stack_trace))
            },
        }
    }

    #[track_caller]
    #[inline(never)]
    fn wrap_err_with_type(
        self,
        message: impl Into<String>,
        type_tag: impl Into<String>,
    ) -> Result<T, TracedError> {
        match self {
            Ok(value) => Ok(value),
            Err(err) => {
                let stack_trace = StackTrace::capture(0);
                Err(TracedError::wrapping(
                    err.into(),
                    message.into(),
                    Some(type_tag.into()),
                    stack_trace,
                ))
            },
        }
    }

    #[track_caller]
    #[inline(never)]
    fn traced(self) -> Result<T, TracedError> {
        match self {
            Ok(value) => Ok(value),
            Err(err) => {
                let stack_trace = StackTrace::capture(0);
                Err(TracedError::wrapping(err.into(), String::new(), None, stack_trace))
            },
        }
    }
}
