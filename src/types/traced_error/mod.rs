//! Error value with a captured stack trace, a type tag and a metadata bag.
//!
//! This module provides [`TracedError`], the single composite error of the crate. It can be:
//! - a *leaf* error created with [`TracedError::new`] / [`TracedError::new_with_type`]
//! - a *wrapped* error adding context to a cause ([`TracedError::wrap`] and friends)
//! - a *sentinel*, a long-lived comparison target created without a stack trace
//!   ([`TracedError::sentinel`]) and re-exposed per occurrence with [`TracedError::with_stack`]
//!
//! Wrapping keeps the full cause chain. Unless a wrapping call supplies its own type tag, the
//! type tag and metadata of the nearest `TracedError` in the wrapped chain carry over.

use core::error::Error;
use std::sync::Arc;

use crate::types::frame::Frame;
use crate::types::metadata::{Metadata, Value};
use crate::types::stack_trace::StackTrace;

mod fingerprint;
mod traits;

pub use fingerprint::FingerprintConfig;

/// Boxed, thread-safe error accepted as a cause.
pub type BoxError = Box<dyn Error + Send + Sync + 'static>;

type SharedError = Arc<dyn Error + Send + Sync + 'static>;

/// Identity-bearing part of an error: shared between an error and the copies that must
/// compare equal to it.
struct Head {
    cause: Option<SharedError>,
    message: String,
    type_tag: String,
}

/// Error carrying a stack trace, an optional type tag and metadata.
///
/// Cloning is cheap and yields a value that compares equal to the original. Equality is
/// identity: two independently constructed errors with the same message are not equal.
///
/// # Examples
///
/// ```
/// use error_trace::{chain, TracedError};
///
/// let disk = TracedError::new("disk full");
/// let save = TracedError::wrap_with_type(disk.clone(), "save failed", "IOError");
/// let request = TracedError::wrap(save, "request failed");
///
/// assert_eq!(request.error_type(), "IOError");
/// assert!(chain::is(&request, &disk));
/// assert!(!request.stack_trace().is_empty());
/// ```
#[must_use]
#[derive(Clone)]
pub struct TracedError {
    head: Arc<Head>,
    stack_trace: StackTrace,
    metadata: Arc<Metadata>,
}

impl TracedError {
    /// Creates a leaf error with a stack trace starting at the caller.
    #[track_caller]
    #[inline(never)]
    pub fn new(message: impl Into<String>) -> Self {
        Self::from_parts(None, message.into(), String::new(), StackTrace::capture(0))
    }

    /// Creates a leaf error with an explicit type tag.
    #[track_caller]
    #[inline(never)]
    pub fn new_with_type(message: impl Into<String>, type_tag: impl Into<String>) -> Self {
        Self::from_parts(None, message.into(), type_tag.into(), StackTrace::capture(0))
    }

    /// Creates a sentinel: a reusable comparison target without a stack trace.
    ///
    /// Sentinels are typically stored in a `static` and handed out through
    /// [`with_stack`](Self::with_stack), which attaches the trace of the actual occurrence.
    ///
    /// ```
    /// use std::sync::LazyLock;
    /// use error_trace::{chain, TracedError};
    ///
    /// static NOT_FOUND: LazyLock<TracedError> =
    ///     LazyLock::new(|| TracedError::sentinel("NotFound", "record not found"));
    ///
    /// fn lookup() -> Result<(), TracedError> {
    ///     Err(NOT_FOUND.with_stack())
    /// }
    ///
    /// let err = lookup().unwrap_err();
    /// assert!(chain::is(&err, &*NOT_FOUND));
    /// assert!(NOT_FOUND.stack_trace().is_empty());
    /// ```
    pub fn sentinel(type_tag: impl Into<String>, message: impl Into<String>) -> Self {
        Self::from_parts(None, message.into(), type_tag.into(), StackTrace::empty())
    }

    /// Creates a sentinel that wraps another error (usually another sentinel).
    pub fn wrap_as_sentinel<E>(err: E, type_tag: impl Into<String>, message: impl Into<String>) -> Self
    where
        E: Into<BoxError>,
    {
        Self::wrapping(err.into(), message.into(), Some(type_tag.into()), StackTrace::empty())
    }

    /// Wraps `err` with a message, inheriting type tag and metadata from the wrapped chain.
    ///
    /// The metadata is shared with the wrapped error until this error's metadata is
    /// modified, at which point it is copied.
    #[track_caller]
    #[inline(never)]
    pub fn wrap<E>(err: E, message: impl Into<String>) -> Self
    where
        E: Into<BoxError>,
    {
        Self::wrapping(err.into(), message.into(), None, StackTrace::capture(0))
    }

    /// Wraps `err` without adding a message, only a stack trace.
    #[track_caller]
    #[inline(never)]
    pub fn bare<E>(err: E) -> Self
    where
        E: Into<BoxError>,
    {
        Self::wrapping(err.into(), String::new(), None, StackTrace::capture(0))
    }

    /// Wraps `err` and sets `type_tag`, starting from a copy of the wrapped metadata.
    #[track_caller]
    #[inline(never)]
    pub fn wrap_with_type<E>(err: E, message: impl Into<String>, type_tag: impl Into<String>) -> Self
    where
        E: Into<BoxError>,
    {
        Self::wrapping(err.into(), message.into(), Some(type_tag.into()), StackTrace::capture(0))
    }

    /// Re-exposes a sentinel with a stack trace captured at the caller.
    ///
    /// If `err` is a `TracedError` the result keeps its message, type tag, cause, metadata
    /// and identity, but not its old trace. Any other error is wrapped with an empty message
    /// and type tag.
    #[track_caller]
    #[inline(never)]
    pub fn sentinel_with_stack<E>(err: E) -> Self
    where
        E: Into<BoxError>,
    {
        let stack_trace = StackTrace::capture(0);
        match err.into().downcast::<TracedError>() {
            Ok(sentinel) => (*sentinel).restacked(stack_trace),
            Err(foreign) => {
                Self::from_parts(Some(Arc::from(foreign)), String::new(), String::new(), stack_trace)
            },
        }
    }

    /// Borrowing form of [`sentinel_with_stack`](Self::sentinel_with_stack) for sentinels
    /// held in statics.
    #[track_caller]
    #[inline(never)]
    pub fn with_stack(&self) -> Self {
        let stack_trace = StackTrace::capture(0);
        self.clone().restacked(stack_trace)
    }

    /// Drops the stack trace.
    pub fn without_stack_trace(mut self) -> Self {
        self.stack_trace.clear();
        self
    }

    /// Shallow-merges `update` into this error's metadata.
    pub fn with_metadata(mut self, update: Metadata) -> Self {
        Arc::make_mut(&mut self.metadata).merge(update);
        self
    }

    /// Sets a single metadata entry.
    pub fn with_meta(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        Arc::make_mut(&mut self.metadata).insert(key, value);
        self
    }

    #[inline]
    pub fn message(&self) -> &str {
        &self.head.message
    }

    /// The explicit type tag, if one was set or inherited.
    #[inline]
    pub fn type_tag(&self) -> Option<&str> {
        Some(self.head.type_tag.as_str()).filter(|tag| !tag.is_empty())
    }

    /// The type tag, or the Rust type name when the error is untagged.
    pub fn error_type(&self) -> &str {
        self.type_tag().unwrap_or(core::any::type_name::<Self>())
    }

    /// Frames captured when this error was created, nearest first.
    #[inline]
    pub fn stack_trace(&self) -> &StackTrace {
        &self.stack_trace
    }

    /// The frame the error was created in.
    #[inline]
    pub fn location(&self) -> Option<&Frame> {
        self.stack_trace.origin()
    }

    #[inline]
    pub fn metadata(&self) -> &Metadata {
        &self.metadata
    }

    /// The wrapped error, if any.
    #[inline]
    pub fn cause(&self) -> Option<&(dyn Error + Send + Sync + 'static)> {
        self.head.cause.as_deref()
    }

    /// Iterates this error and its causes, outermost first.
    #[inline]
    pub fn chain(&self) -> crate::chain::Chain<'_> {
        crate::chain::chain(self)
    }

    /// Whether this error or any of its causes equals `target`.
    #[inline]
    pub fn is<T>(&self, target: &T) -> bool
    where
        T: Error + PartialEq + 'static,
    {
        crate::chain::is(self, target)
    }

    /// Generates a fingerprint suitable for grouping occurrences of the same failure.
    #[must_use]
    pub fn fingerprint(&self) -> u64 {
        self.fingerprint_config().compute()
    }

    /// Hex form of [`fingerprint`](Self::fingerprint).
    #[must_use]
    pub fn fingerprint_hex(&self) -> String {
        self.fingerprint_config().compute_hex()
    }

    /// Creates a fingerprint configuration for customizing fingerprint generation.
    #[must_use]
    pub fn fingerprint_config(&self) -> FingerprintConfig<'_> {
        FingerprintConfig::new(self)
    }

    pub(crate) fn from_parts(
        cause: Option<SharedError>,
        message: String,
        type_tag: String,
        stack_trace: StackTrace,
    ) -> Self {
        Self {
            head: Arc::new(Head { cause, message, type_tag }),
            stack_trace,
            metadata: Arc::default(),
        }
    }

    /// Assembles a wrapper around `cause` using an already captured trace.
    ///
    /// An explicit `type_tag` copies the inherited metadata; otherwise tag and metadata are
    /// shared with the nearest `TracedError` in the cause chain.
    pub(crate) fn wrapping(
        cause: BoxError,
        message: String,
        type_tag: Option<String>,
        stack_trace: StackTrace,
    ) -> Self {
        let cause: SharedError = Arc::from(cause);
        let inherited = crate::chain::find::<TracedError>(&*cause);

        let (type_tag, metadata) = match (type_tag, inherited) {
            (Some(tag), Some(inner)) => (tag, Arc::new(Metadata::clone(&inner.metadata))),
            (Some(tag), None) => (tag, Arc::default()),
            (None, Some(inner)) => (inner.head.type_tag.clone(), Arc::clone(&inner.metadata)),
            (None, None) => (String::new(), Arc::default()),
        };

        Self { head: Arc::new(Head { cause: Some(cause), message, type_tag }), stack_trace, metadata }
    }

    fn restacked(mut self, stack_trace: StackTrace) -> Self {
        self.stack_trace = stack_trace;
        self
    }
}
