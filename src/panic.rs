//! Conversion of caught panics into [`TracedError`]s.
//!
//! [`catch_panic`] runs a closure under [`std::panic::catch_unwind`] and turns a panic into
//! an `Err`. [`recover_panic`] does the conversion alone, for boundaries that already call
//! `catch_unwind` themselves (request handlers, worker loops).
//!
//! Payloads are normalized as follows:
//! - a [`TracedError`] passed to [`std::panic::panic_any`] is returned unchanged
//! - a [`BoxError`] is wrapped with the message `caught panic`
//! - `&str` and `String` payloads (from `panic!`) become `caught panic: <text>`
//! - anything else becomes `caught panic: Box<dyn Any>`
//!
//! The adapter's own frames are trimmed from the traces it captures. The stack has already
//! unwound when the boundary regains control, so those traces start at the boundary.
//!
//! # Examples
//!
//! ```
//! use error_trace::panic::catch_panic;
//!
//! let err = catch_panic(|| -> u32 { panic!("index {} out of range", 7) }).unwrap_err();
//! assert_eq!(err.message(), "caught panic: index 7 out of range");
//! assert!(!err.stack_trace().is_empty());
//! ```

use std::any::Any;
use std::panic::{self, UnwindSafe};

use crate::types::{BoxError, StackTrace, TracedError};

/// Message of errors produced from panic payloads.
pub const PANIC_MESSAGE: &str = "caught panic";

/// A payload recovered from an unwinding panic.
pub type PanicPayload = Box<dyn Any + Send + 'static>;

/// Normalizes `recovered` into a [`TracedError`] and stores it in `slot`.
///
/// `None` means nothing was recovered and leaves `slot` untouched.
///
/// ```
/// use error_trace::panic::recover_panic;
///
/// let mut slot = None;
/// let outcome = std::panic::catch_unwind(|| panic!("boom"));
/// recover_panic(outcome.err(), &mut slot);
///
/// assert_eq!(slot.map(|err| err.message().to_owned()).as_deref(), Some("caught panic: boom"));
/// ```
#[track_caller]
#[inline(never)]
pub fn recover_panic(recovered: Option<PanicPayload>, slot: &mut Option<TracedError>) {
    if let Some(payload) = recovered {
        *slot = Some(from_payload(payload, 1));
    }
}

/// Runs `f`, converting a panic into an error.
#[track_caller]
#[inline(never)]
pub fn catch_panic<F, T>(f: F) -> Result<T, TracedError>
where
    F: FnOnce() -> T + UnwindSafe,
{
    match panic::catch_unwind(f) {
        Ok(value) => Ok(value),
        Err(payload) => Err(from_payload(payload, 1)),
    }
}

/// `skip` counts the adapter frames between this function and the boundary's caller.
#[track_caller]
#[inline(never)]
fn from_payload(payload: PanicPayload, skip: usize) -> TracedError {
    let payload = match payload.downcast::<TracedError>() {
        Ok(traced) => return *traced,
        Err(payload) => payload,
    };

    let err = match payload.downcast::<BoxError>() {
        Ok(err) => TracedError::wrapping(*err, PANIC_MESSAGE.to_owned(), None, StackTrace::capture(skip)),
        Err(payload) => {
            let message = match payload.downcast_ref::<&'static str>() {
                Some(text) => format!("{PANIC_MESSAGE}: {text}"),
                None => match payload.downcast_ref::<String>() {
                    Some(text) => format!("{PANIC_MESSAGE}: {text}"),
                    None => format!("{PANIC_MESSAGE}: Box<dyn Any>"),
                },
            };
            TracedError::from_parts(None, message, String::new(), StackTrace::capture(skip))
        },
    };

    #[cfg(feature = "tracing")]
    tracing::warn!(error_type = err.error_type(), "{}", err);

    err
}
