//! A single resolved call-stack entry.
//!
//! [`Frame`] stores the demangled symbol of a stack entry together with its source
//! location, and derives a *package* (the innermost module the function lives in) and a
//! *function name* from that symbol.
//!
//! # Examples
//!
//! ```
//! use error_trace::Frame;
//!
//! let frame = Frame::new("billing::invoice::Handler::finalize");
//! assert_eq!(frame.package(), "invoice");
//! assert_eq!(frame.function_name(), "finalize");
//! assert_eq!(frame.context(), "invoice::finalize");
//!
//! let frame = Frame::new("__rust_begin_short_backtrace");
//! assert_eq!(frame.package(), "");
//! ```
use core::fmt;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};
use smallvec::SmallVec;

/// Symbol prefixes emitted by the compiler or the runtime rather than by user code.
///
/// Frames whose symbol starts with one of these report an empty [`Frame::package`].
pub const RESERVED_SYMBOL_PREFIXES: &[&str] =
    &["__rust_", "__rustc", "rust_begin_unwind", "_start", "__libc_", "<unknown>"];

const SEPARATOR: &str = "::";

/// Top-level path segments of a symbol; most symbols have fewer than eight.
type Segments<'a> = SmallVec<[&'a str; 8]>;

/// One captured call-stack entry.
///
/// Frames produced by a capture carry the instruction pointer they were resolved from, so
/// two frames of the same function taken at different call sites never compare equal, even
/// when no debug info is available to tell their lines apart.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Frame {
    symbol: String,
    file: Option<String>,
    line: Option<u32>,
    column: Option<u32>,
    #[cfg_attr(feature = "serde", serde(default, skip_serializing_if = "Option::is_none"))]
    ip: Option<usize>,
}

impl Frame {
    /// Creates a frame from a demangled symbol, without location information.
    ///
    /// A trailing legacy mangling hash (`::h0123456789abcdef`) is stripped.
    pub fn new(symbol: impl Into<String>) -> Self {
        let mut symbol = symbol.into();
        let trimmed = strip_hash(&symbol).len();
        symbol.truncate(trimmed);
        Self { symbol, file: None, line: None, column: None, ip: None }
    }

    /// Attaches a source location.
    #[must_use]
    pub fn with_location(mut self, file: impl Into<String>, line: u32, column: Option<u32>) -> Self {
        self.file = Some(file.into());
        self.line = Some(line);
        self.column = column;
        self
    }

    pub(crate) fn located(mut self, file: &str, line: Option<u32>, column: Option<u32>) -> Self {
        self.file = Some(file.to_owned());
        self.line = line;
        self.column = column;
        self
    }

    pub(crate) fn at_ip(mut self, ip: usize) -> Self {
        self.ip = Some(ip);
        self
    }

    /// The full demangled symbol, e.g. `my_app::db::connect`.
    #[inline]
    pub fn symbol(&self) -> &str {
        &self.symbol
    }

    #[inline]
    pub fn file(&self) -> Option<&str> {
        self.file.as_deref()
    }

    #[inline]
    pub fn line(&self) -> Option<u32> {
        self.line
    }

    #[inline]
    pub fn column(&self) -> Option<u32> {
        self.column
    }

    /// The program counter this frame was resolved from; `None` for frames built by hand.
    #[inline]
    pub fn ip(&self) -> Option<usize> {
        self.ip
    }

    /// Returns `true` for symbols synthesized by the compiler or runtime.
    pub fn is_synthesized(&self) -> bool {
        RESERVED_SYMBOL_PREFIXES.iter().any(|prefix| self.symbol.starts_with(prefix))
    }

    /// The innermost module segment the function belongs to.
    ///
    /// Type, trait-impl and closure segments are not modules, so for
    /// `app::handlers::Server::run::{{closure}}` the package is `handlers`. A closure or shim
    /// segment (`{{closure}}`, `{closure#0}`, `{shim:vtable#0}`) also hides the function
    /// enclosing it, so `app::handlers::run::{closure#0}` has package `handlers` too. For a qualified
    /// impl path such as `<app::Config as core::fmt::Display>::fmt` the self type's path is
    /// used. Returns an empty string for synthesized symbols and for symbols without any
    /// module segment.
    pub fn package(&self) -> &str {
        if self.is_synthesized() {
            return "";
        }

        let segments = split_top_level(&self.symbol);
        let path: Segments<'_> = match segments.first() {
            Some(&first) if first.starts_with('<') => split_top_level(qualified_self_type(first)),
            _ => {
                let mut path = segments.clone();
                if path.pop().is_some_and(is_synthetic_segment) {
                    while path.last().is_some_and(|segment| is_synthetic_segment(segment)) {
                        path.pop();
                    }
                    // the enclosing function
                    path.pop();
                }
                path
            },
        };

        path.iter().take_while(|segment| is_module_segment(segment)).last().copied().unwrap_or("")
    }

    /// The last path segment of the symbol, or the whole symbol if it has no path.
    pub fn function_name(&self) -> &str {
        split_top_level(&self.symbol).last().copied().unwrap_or(&self.symbol)
    }

    /// `package::function`, or only the function name when the package is empty.
    pub fn context(&self) -> String {
        let package = self.package();
        if package.is_empty() {
            self.function_name().to_owned()
        } else {
            format!("{package}{SEPARATOR}{}", self.function_name())
        }
    }
}

impl fmt::Display for Frame {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.symbol)?;
        if let Some(file) = &self.file {
            write!(f, " ({file}")?;
            if let Some(line) = self.line {
                write!(f, ":{line}")?;
            }
            if let Some(column) = self.column {
                write!(f, ":{column}")?;
            }
            f.write_str(")")?;
        } else if let Some(ip) = self.ip {
            write!(f, " ({ip:#x})")?;
        }
        Ok(())
    }
}

fn strip_hash(symbol: &str) -> &str {
    match symbol.rfind("::h") {
        Some(idx) => {
            let hash = &symbol[idx + 3..];
            if hash.len() == 16 && hash.bytes().all(|b| b.is_ascii_hexdigit()) {
                &symbol[..idx]
            } else {
                symbol
            }
        },
        None => symbol,
    }
}

/// Splits on `::` at angle-bracket depth zero, so `<a::B as c::D>::f` yields two segments.
fn split_top_level(symbol: &str) -> Segments<'_> {
    let bytes = symbol.as_bytes();
    let mut segments = Segments::new();
    let mut depth = 0usize;
    let mut start = 0;
    let mut idx = 0;

    while idx < bytes.len() {
        match bytes[idx] {
            b'<' => depth += 1,
            b'>' => depth = depth.saturating_sub(1),
            b':' if depth == 0 && bytes.get(idx + 1) == Some(&b':') => {
                segments.push(&symbol[start..idx]);
                idx += 2;
                start = idx;
                continue;
            },
            _ => {},
        }
        idx += 1;
    }
    segments.push(&symbol[start..]);
    segments
}

/// For `<path::Type as Trait>` returns `path::Type`; for `<path::Type>` returns `path::Type`.
fn qualified_self_type(segment: &str) -> &str {
    let inner = segment.strip_prefix('<').unwrap_or(segment);
    let inner = inner.strip_suffix('>').unwrap_or(inner);

    let mut depth = 0usize;
    for (idx, ch) in inner.char_indices() {
        match ch {
            '<' => depth += 1,
            '>' => depth = depth.saturating_sub(1),
            ' ' if depth == 0 && inner[idx..].starts_with(" as ") => return &inner[..idx],
            _ => {},
        }
    }
    inner
}

/// Closure and shim segments, which rustc renders in braces.
fn is_synthetic_segment(segment: &str) -> bool {
    segment.starts_with('{')
}

fn is_module_segment(segment: &str) -> bool {
    segment
        .chars()
        .next()
        .is_some_and(|first| first.is_ascii_lowercase() || (first == '_' && segment.len() > 1))
}
