//! Tracing integration for error-trace.
//!
//! This module lets a [`TracedError`] be reported as a `tracing` event and tags errors with
//! the span they were raised in.
//!
//! # Feature Flag
//!
//! Requires the `tracing` feature:
//!
//! ```toml
//! [dependencies]
//! error-trace = { version = "0.3", features = ["tracing"] }
//! ```

use tracing::Span;

use crate::types::{BoxError, StackTrace, TracedError};

/// Metadata key under which [`ResultSpanExt`] stores the span name.
pub const SPAN_METADATA_KEY: &str = "span";

impl TracedError {
    /// Emits this error as an `ERROR` level event.
    ///
    /// The event carries the type, the `package::function` the error was raised in, the
    /// metadata and the fingerprint as fields; the message is the error's display string.
    pub fn record(&self) {
        let location = self.location().map(|frame| frame.context()).unwrap_or_default();
        tracing::error!(
            error_type = self.error_type(),
            location = %location,
            metadata = %self.metadata(),
            fingerprint = %self.fingerprint_hex(),
            "{}",
            self
        );
    }
}

/// Extension trait that reports errors while passing the result through.
pub trait ResultReportExt<T> {
    /// Calls [`TracedError::record`] on `Err` and returns `self` unchanged.
    ///
    /// ```rust,ignore
    /// use error_trace::traits::{ResultExt, ResultReportExt};
    ///
    /// fn handle() -> Result<(), TracedError> {
    ///     load().wrap_err("handling request").report_err()
    /// }
    /// ```
    fn report_err(self) -> Self;
}

impl<T> ResultReportExt<T> for Result<T, TracedError> {
    fn report_err(self) -> Self {
        if let Err(err) = &self {
            err.record();
        }
        self
    }
}

/// Extension trait for `Result` types to tag errors with a span name.
pub trait ResultSpanExt<T> {
    /// Stores the current span's name under [`SPAN_METADATA_KEY`].
    ///
    /// A [`TracedError`] keeps its identity and trace; any other error is wrapped with a
    /// trace captured at the caller.
    fn with_current_span(self) -> Result<T, TracedError>;

    /// Stores the given span's name under [`SPAN_METADATA_KEY`].
    fn with_span(self, span: &Span) -> Result<T, TracedError>;
}

impl<T, E> ResultSpanExt<T> for Result<T, E>
where
    E: Into<BoxError>,
{
    #[track_caller]
    #[inline(never)]
    fn with_current_span(self) -> Result<T, TracedError> {
        let err: BoxError = match self {
            Ok(value) => return Ok(value),
            Err(err) => err.into(),
        };
        let traced = match err.downcast::<TracedError>() {
            Ok(traced) => *traced,
            Err(foreign) => TracedError::wrapping(foreign, String::new(), None, StackTrace::capture(0)),
        };
        Err(tagged(traced, &Span::current()))
    }

    #[track_caller]
    #[inline(never)]
    fn with_span(self, span: &Span) -> Result<T, TracedError> {
        let err: BoxError = match self {
            Ok(value) => return Ok(value),
            Err(err) => err.into(),
        };
        let traced = match err.downcast::<TracedError>() {
            Ok(traced) => *traced,
            Err(foreign) => TracedError::wrapping(foreign, String::new(), None, StackTrace::capture(0)),
        };
        Err(tagged(traced, span))
    }
}

fn tagged(err: TracedError, span: &Span) -> TracedError {
    err.with_meta(SPAN_METADATA_KEY, span_name(span))
}

/// Name of `span`, or `"unknown"` for a disabled span.
fn span_name(span: &Span) -> &'static str {
    span.metadata().map(|m| m.name()).unwrap_or("unknown")
}
