//! Traversal of cause chains.
//!
//! Every function here walks `err`, then `err.source()`, then its source and so on, so
//! chains that mix [`TracedError`]s with foreign errors are handled uniformly.
//!
//! - [`is`] reports whether any error in the chain equals a target. Equality is the target
//!   type's [`PartialEq`]; for [`TracedError`] that is identity, which is what makes
//!   sentinels work as comparison targets.
//! - [`find`] returns the first error in the chain of a given concrete type.
//! - [`metadata_of`], [`type_of`] and [`stack_trace_of`] read from the nearest
//!   [`TracedError`] in the chain.
//!
//! # Examples
//!
//! ```
//! use error_trace::{chain, TracedError};
//! use std::io;
//!
//! let io_err = io::Error::new(io::ErrorKind::NotFound, "config.toml");
//! let err = TracedError::wrap(io_err, "loading configuration").with_meta("path", "config.toml");
//!
//! let found = chain::find::<io::Error>(&err).expect("io error in chain");
//! assert_eq!(found.kind(), io::ErrorKind::NotFound);
//! assert!(chain::metadata_of(&err).is_some_and(|meta| meta.contains_key("path")));
//! assert_eq!(chain::chain(&err).count(), 2);
//! ```

use core::error::Error;

use crate::types::{Metadata, StackTrace, TracedError};

/// Iterator over an error and its sources, outermost first.
#[derive(Clone)]
pub struct Chain<'a> {
    next: Option<&'a (dyn Error + 'static)>,
}

impl<'a> Iterator for Chain<'a> {
    type Item = &'a (dyn Error + 'static);

    fn next(&mut self) -> Option<Self::Item> {
        let current = self.next?;
        self.next = current.source();
        Some(current)
    }
}

impl core::iter::FusedIterator for Chain<'_> {}

/// Starts a traversal at `err`.
#[inline]
pub fn chain<'a>(err: &'a (dyn Error + 'static)) -> Chain<'a> {
    Chain { next: Some(err) }
}

/// Whether `err` or any of its causes equals `target`.
pub fn is<T>(err: &(dyn Error + 'static), target: &T) -> bool
where
    T: Error + PartialEq + 'static,
{
    chain(err).any(|candidate| candidate.downcast_ref::<T>().is_some_and(|c| c == target))
}

/// The first error in the chain whose concrete type is `T`.
pub fn find<'a, T>(err: &'a (dyn Error + 'static)) -> Option<&'a T>
where
    T: Error + 'static,
{
    chain(err).find_map(|candidate| candidate.downcast_ref::<T>())
}

/// The innermost error of the chain.
pub fn root_cause<'a>(err: &'a (dyn Error + 'static)) -> &'a (dyn Error + 'static) {
    chain(err).last().unwrap_or(err)
}

/// Metadata of the nearest [`TracedError`], or `None` if the chain has none.
#[inline]
pub fn metadata_of<'a>(err: &'a (dyn Error + 'static)) -> Option<&'a Metadata> {
    find::<TracedError>(err).map(TracedError::metadata)
}

/// Type of the nearest [`TracedError`] (see [`TracedError::error_type`]).
#[inline]
pub fn type_of<'a>(err: &'a (dyn Error + 'static)) -> Option<&'a str> {
    find::<TracedError>(err).map(TracedError::error_type)
}

/// Stack trace of the nearest [`TracedError`].
#[inline]
pub fn stack_trace_of<'a>(err: &'a (dyn Error + 'static)) -> Option<&'a StackTrace> {
    find::<TracedError>(err).map(TracedError::stack_trace)
}
