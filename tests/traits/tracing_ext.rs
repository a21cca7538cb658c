use error_trace::traits::{ResultReportExt, ResultSpanExt};
use error_trace::TracedError;
use std::fmt;
use std::io;
use std::sync::{Arc, Mutex};
use tracing::field::{Field, Visit};
use tracing::span::{Attributes, Id, Record};
use tracing::{Event, Metadata, Subscriber};

type Fields = Vec<(String, String)>;

/// Subscriber that keeps the fields of every event it sees.
#[derive(Clone, Default)]
struct Recorder {
    events: Arc<Mutex<Vec<Fields>>>,
}

impl Recorder {
    fn events(&self) -> Vec<Fields> {
        self.events.lock().unwrap().clone()
    }
}

struct FieldCollector(Fields);

impl Visit for FieldCollector {
    fn record_str(&mut self, field: &Field, value: &str) {
        self.0.push((field.name().to_owned(), value.to_owned()));
    }

    fn record_debug(&mut self, field: &Field, value: &dyn fmt::Debug) {
        self.0.push((field.name().to_owned(), format!("{value:?}")));
    }
}

impl Subscriber for Recorder {
    fn enabled(&self, _: &Metadata<'_>) -> bool {
        true
    }

    fn new_span(&self, _: &Attributes<'_>) -> Id {
        Id::from_u64(1)
    }

    fn record(&self, _: &Id, _: &Record<'_>) {}

    fn record_follows_from(&self, _: &Id, _: &Id) {}

    fn event(&self, event: &Event<'_>) {
        let mut collector = FieldCollector(Vec::new());
        event.record(&mut collector);
        self.events.lock().unwrap().push(collector.0);
    }

    fn enter(&self, _: &Id) {}

    fn exit(&self, _: &Id) {}
}

fn field<'a>(fields: &'a Fields, name: &str) -> Option<&'a str> {
    fields.iter().find(|(key, _)| key == name).map(|(_, value)| value.as_str())
}

#[test]
fn disabled_spans_are_recorded_as_unknown() {
    let result: Result<(), io::Error> = Err(io::Error::other("eof"));
    let err = result.with_current_span().unwrap_err();

    assert_eq!(err.metadata().get("span").and_then(|v| v.as_str()), Some("unknown"));
    assert!(err.cause().is_some());
}

#[test]
fn enabled_span_names_are_stored() {
    let recorder = Recorder::default();
    let err = tracing::subscriber::with_default(recorder, || {
        let span = tracing::info_span!("checkout");
        let result: Result<(), io::Error> = Err(io::Error::other("card declined"));
        result.with_span(&span).unwrap_err()
    });

    assert_eq!(err.metadata().get("span").and_then(|v| v.as_str()), Some("checkout"));
}

#[test]
fn traced_errors_keep_their_identity_in_a_span() {
    let original = TracedError::new("boom");
    let result: Result<(), TracedError> = Err(original.clone());

    let err = result.with_span(&tracing::Span::none()).unwrap_err();
    assert_eq!(err, original);
    assert!(err.metadata().contains_key("span"));
    assert_eq!(err.stack_trace(), original.stack_trace());
}

#[test]
fn record_emits_an_event_with_structured_fields() {
    let recorder = Recorder::default();
    let err = TracedError::new_with_type("card declined", "PaymentError").with_meta("order", 7);

    tracing::subscriber::with_default(recorder.clone(), || err.record());

    let events = recorder.events();
    assert_eq!(events.len(), 1);
    let fields = &events[0];

    assert_eq!(field(fields, "error_type"), Some("PaymentError"));
    let fingerprint = err.fingerprint_hex();
    assert_eq!(field(fields, "fingerprint"), Some(fingerprint.as_str()));
    assert!(field(fields, "location")
        .is_some_and(|location| location.ends_with("record_emits_an_event_with_structured_fields")));
    assert_eq!(field(fields, "metadata"), Some("{order: 7}"));
    assert!(field(fields, "message").is_some_and(|message| message.contains("[card declined]")));
}

#[test]
fn report_err_records_only_failures() {
    let recorder = Recorder::default();

    tracing::subscriber::with_default(recorder.clone(), || {
        let ok: Result<u8, TracedError> = Ok(3);
        assert_eq!(ok.report_err().ok(), Some(3));

        let failed: Result<u8, TracedError> = Err(TracedError::new("boom"));
        assert!(failed.report_err().is_err());
    });

    assert_eq!(recorder.events().len(), 1);
}
