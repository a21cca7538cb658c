use error_trace::prelude::*;
use std::io;

fn parse_port(raw: &str) -> TracedResult<u16> {
    match raw.parse::<u32>() {
        Ok(port) if port <= u32::from(u16::MAX) => Ok(port as u16),
        Ok(port) => bail!("port {} out of range", port),
        Err(err) => Err(wrap!(err, "parsing port {:?}", raw)),
    }
}

#[test]
fn traced_formats_the_message() {
    let err = traced!("user {} not found", 42);
    assert_eq!(err.message(), "user 42 not found");
    assert_eq!(err.location().map(|f| f.function_name()), Some("traced_formats_the_message"));
}

#[test]
fn bail_returns_a_leaf_error() {
    let err = parse_port("70000").unwrap_err();
    assert_eq!(err.message(), "port 70000 out of range");
    assert!(err.cause().is_none());
    assert_eq!(err.location().map(|f| f.function_name()), Some("parse_port"));
}

#[test]
fn wrap_keeps_the_source() {
    let err = parse_port("http").unwrap_err();
    assert_eq!(err.message(), "parsing port \"http\"");
    assert!(err.cause().is_some_and(|c| c.is::<std::num::ParseIntError>()));
    assert_eq!(parse_port("8080").ok(), Some(8080));
}

#[test]
fn wrap_accepts_foreign_errors() {
    let err = wrap!(io::Error::other("reset"), "sending frame {}", 3);
    assert!(err.to_string().ends_with("[sending frame 3] => reset"));
}

#[test]
fn metadata_builds_nested_maps() {
    let meta = metadata! {
        "user" => "alice",
        "attempts" => 3,
        "ratio" => 0.5,
        "tags" => vec!["a", "b"],
        "nested" => metadata! { "depth" => 1 },
    };

    assert_eq!(meta.len(), 5);
    assert_eq!(meta.get("user").and_then(Value::as_str), Some("alice"));
    assert_eq!(meta.get("attempts").and_then(Value::as_i64), Some(3));
    assert_eq!(
        meta.get("nested").and_then(Value::as_map).and_then(|m| m.get("depth")),
        Some(&Value::Int(1))
    );
    assert!(metadata!().is_empty());
}
