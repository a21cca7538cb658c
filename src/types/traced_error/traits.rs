use super::TracedError;
use core::fmt::{self, Display};
use std::sync::Arc;

/// `[type@]package::function [[message]] [=> cause]`.
///
/// The alternate form (`{:#}`) appends this error's stack trace, one frame per line.
impl Display for TracedError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut started = false;

        if let Some(tag) = self.type_tag() {
            f.write_str(tag)?;
            started = true;
        }
        if let Some(frame) = self.location() {
            if started {
                f.write_str("@")?;
            }
            f.write_str(&frame.context())?;
            started = true;
        }
        if !self.message().is_empty() {
            if started {
                f.write_str(" ")?;
            }
            write!(f, "[{}]", self.message())?;
            started = true;
        }
        if let Some(cause) = self.cause() {
            if started {
                f.write_str(" => ")?;
            }
            write!(f, "{cause}")?;
        }

        if f.alternate() && !self.stack_trace().is_empty() {
            write!(f, "\n{}", self.stack_trace())?;
        }
        Ok(())
    }
}

impl fmt::Debug for TracedError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut d = f.debug_struct("TracedError");
        if let Some(tag) = self.type_tag() {
            d.field("type", &tag);
        }
        d.field("message", &self.message());
        if let Some(frame) = self.location() {
            d.field("location", &format_args!("{frame}"));
        }
        if !self.metadata().is_empty() {
            d.field("metadata", self.metadata());
        }
        if let Some(cause) = self.cause() {
            d.field("cause", &cause);
        }
        d.finish()
    }
}

impl core::error::Error for TracedError {
    fn source(&self) -> Option<&(dyn core::error::Error + 'static)> {
        self.cause().map(|cause| cause as &(dyn core::error::Error + 'static))
    }
}

/// Identity comparison: equal when one value was derived from the other by cloning or by
/// re-exposing a sentinel with a fresh stack trace.
impl PartialEq for TracedError {
    fn eq(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.head, &other.head)
    }
}

impl Eq for TracedError {}
