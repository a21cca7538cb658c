use error_trace::TracedError;
use std::hint::black_box;
use std::io;

#[inline(never)]
fn raise(message: &str) -> TracedError {
    black_box(TracedError::new_with_type(message.to_owned(), "QuotaError"))
}

#[test]
fn same_failure_site_has_the_same_fingerprint() {
    let a = raise("quota exceeded").with_meta("user", "alice");
    let b = raise("quota exceeded").with_meta("user", "bob");

    assert_eq!(a.fingerprint(), b.fingerprint());
    assert_eq!(a.fingerprint_hex(), b.fingerprint_hex());
    assert_eq!(a.fingerprint_hex().len(), 16);
}

#[test]
fn message_and_type_change_the_fingerprint() {
    let base = raise("quota exceeded");
    let other_message = raise("quota reset");
    let other_type = TracedError::new_with_type("quota exceeded", "LimitError");

    assert_ne!(base.fingerprint(), other_message.fingerprint());
    assert_ne!(base.fingerprint(), other_type.fingerprint());

    let ignore_message = |e: &TracedError| e.fingerprint_config().include_message(false).compute();
    assert_eq!(ignore_message(&base), ignore_message(&other_message));
}

#[test]
fn raising_function_is_part_of_the_fingerprint() {
    #[inline(never)]
    fn elsewhere() -> TracedError {
        black_box(TracedError::new_with_type("quota exceeded", "QuotaError"))
    }

    let here = raise("quota exceeded");
    let there = elsewhere();
    assert_ne!(here.fingerprint(), there.fingerprint());

    let no_frames = |e: &TracedError| e.fingerprint_config().frame_depth(0).compute();
    assert_eq!(no_frames(&here), no_frames(&there));
}

#[test]
fn causes_are_included_by_default() {
    let wrap = |text: &str| TracedError::wrap(io::Error::other(text.to_owned()), "writing");

    let a = wrap("disk full");
    let b = wrap("read only");
    assert_ne!(a.fingerprint(), b.fingerprint());

    let shallow = |e: &TracedError| e.fingerprint_config().include_causes(false).compute();
    assert_eq!(shallow(&a), shallow(&b));
}

#[test]
fn metadata_can_be_filtered_by_key() {
    let a = raise("quota exceeded").with_meta("user", "alice").with_meta("tenant", "t1");
    let b = raise("quota exceeded").with_meta("user", "bob").with_meta("tenant", "t1");

    let all = |e: &TracedError| e.fingerprint_config().include_metadata(true).compute();
    assert_ne!(all(&a), all(&b));

    let without_user = |e: &TracedError| e.fingerprint_config().exclude_metadata_keys(&["user"]).compute();
    assert_eq!(without_user(&a), without_user(&b));

    let only_tenant = |e: &TracedError| e.fingerprint_config().include_metadata_keys(&["tenant"]).compute();
    assert_eq!(only_tenant(&a), only_tenant(&b));
}

#[test]
fn stackless_sentinels_fingerprint_on_type_and_message() {
    let a = TracedError::sentinel("NotFound", "missing");
    let b = TracedError::sentinel("NotFound", "missing");
    assert_eq!(a.fingerprint(), b.fingerprint());
}
