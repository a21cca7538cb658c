use error_trace::{chain, TracedError};
use std::fmt;
use std::io;

#[derive(Debug, Clone, PartialEq)]
enum StorageError {
    Corrupt(u32),
    Full,
}

impl fmt::Display for StorageError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Corrupt(block) => write!(f, "block {block} is corrupt"),
            Self::Full => f.write_str("storage full"),
        }
    }
}

impl std::error::Error for StorageError {}

#[test]
fn is_walks_the_whole_chain() {
    let c = TracedError::new("c");
    let b = TracedError::wrap(c.clone(), "b");
    let a = TracedError::wrap(b.clone(), "a");
    let d = TracedError::new("d");

    assert!(chain::is(&a, &a));
    assert!(chain::is(&a, &b));
    assert!(chain::is(&a, &c));
    assert!(!chain::is(&a, &d));
    assert!(!chain::is(&c, &a));
}

#[test]
fn is_uses_the_target_types_equality() {
    let err = TracedError::wrap(StorageError::Corrupt(7), "reading index");

    assert!(chain::is(&err, &StorageError::Corrupt(7)));
    assert!(!chain::is(&err, &StorageError::Corrupt(8)));
    assert!(!chain::is(&err, &StorageError::Full));
    assert!(err.is(&StorageError::Corrupt(7)));
}

#[test]
fn find_returns_the_first_match() {
    let io_err = io::Error::new(io::ErrorKind::TimedOut, "read timed out");
    let inner = TracedError::wrap(io_err, "inner");
    let outer = TracedError::wrap(inner.clone(), "outer");

    let found = chain::find::<io::Error>(&outer).expect("io error in chain");
    assert_eq!(found.kind(), io::ErrorKind::TimedOut);

    let nearest = chain::find::<TracedError>(&outer).expect("traced error");
    assert_eq!(nearest.message(), "outer");

    assert!(chain::find::<StorageError>(&outer).is_none());
}

#[test]
fn chain_iterates_outermost_first() {
    let err = TracedError::wrap(TracedError::wrap(io::Error::other("eof"), "middle"), "outer");

    let rendered: Vec<String> = chain::chain(&err)
        .map(|e| match e.downcast_ref::<TracedError>() {
            Some(traced) => traced.message().to_owned(),
            None => e.to_string(),
        })
        .collect();
    assert_eq!(rendered, ["outer", "middle", "eof"]);
    assert_eq!(err.chain().count(), 3);
}

#[test]
fn root_cause_is_the_innermost_error() {
    let err = TracedError::wrap(StorageError::Full, "flushing");
    let root = chain::root_cause(&err);
    assert_eq!(root.downcast_ref::<StorageError>(), Some(&StorageError::Full));

    let leaf = StorageError::Full;
    assert_eq!(chain::root_cause(&leaf).to_string(), "storage full");
}

#[test]
fn accessors_read_the_nearest_traced_error() {
    let err = TracedError::new_with_type("denied", "AuthError").with_meta("user", "alice");

    assert_eq!(chain::type_of(&err), Some("AuthError"));
    assert!(chain::metadata_of(&err).is_some_and(|meta| meta.contains_key("user")));
    assert!(chain::stack_trace_of(&err).is_some_and(|trace| !trace.is_empty()));
}

#[test]
fn accessors_on_foreign_errors_return_none() {
    let io_err = io::Error::other("plain");

    assert!(chain::metadata_of(&io_err).is_none());
    assert!(chain::type_of(&io_err).is_none());
    assert!(chain::stack_trace_of(&io_err).is_none());
}

#[test]
fn sentinels_match_fresh_occurrences_through_wrappers() {
    let not_found = TracedError::sentinel("NotFound", "user not found");

    let lookup = || -> Result<(), TracedError> { Err(not_found.with_stack()) };
    let err = TracedError::wrap(lookup().unwrap_err(), "loading profile");

    assert!(chain::is(&err, &not_found));
    assert!(!chain::is(&err, &TracedError::sentinel("NotFound", "user not found")));
}
