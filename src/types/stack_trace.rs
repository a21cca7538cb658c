//! Call-stack capture with deferred symbol resolution.
//!
//! [`StackTrace::capture`] walks the call stack with [`backtrace::trace`] and keeps only raw
//! instruction pointers. The walk stops as soon as [`MAX_FRAMES`] frames past the library's
//! own frames are recorded, so its cost does not depend on how deep the stack is.
//! Symbolication of the retained frames happens the first time the trace is inspected, and
//! the result is cached. Cloning a trace is a reference-count bump.
//!
//! The frames of the capture routine itself, and of the library function that requested
//! the capture, are never part of the trace: the nearest frame is the caller of that
//! library function. Its location is the `#[track_caller]` location of the request, so it
//! stays exact when the calling function was inlined.
use core::ffi::c_void;
use core::fmt;
use core::panic::Location;
use std::sync::{Arc, OnceLock};

use crate::types::frame::Frame;

/// Maximum number of frames retained per trace. Deeper stacks lose their outermost frames.
pub const MAX_FRAMES: usize = 32;

/// [`StackTrace::capture`] and the library entry point that called it.
const INTERNAL_FRAMES: usize = 2;

/// Frames the unwinder may contribute before the walk reaches [`walk`].
const UNWINDER_FRAMES: usize = 16;

/// Symbol suffix of [`walk`], for unwinders that cannot report symbol addresses.
const WALK_SYMBOL: &str = "stack_trace::walk";

/// An ordered sequence of [`Frame`]s, nearest caller first.
#[derive(Clone, Default)]
pub struct StackTrace {
    inner: Option<Arc<Captured>>,
}

struct Captured {
    walk: Walk,
    caller: Option<&'static Location<'static>>,
    frames: OnceLock<Vec<Frame>>,
}

#[derive(Default)]
struct Walk {
    ips: Vec<usize>,
    /// `false` when the walk never recognized its own frame; `ips` then starts inside the
    /// unwinder and still includes the internal frames.
    anchored: bool,
    skip: usize,
    visited: usize,
}

impl StackTrace {
    /// A trace without frames.
    #[inline]
    pub const fn empty() -> Self {
        Self { inner: None }
    }

    /// Captures the current call stack.
    ///
    /// The function that calls `capture` is treated as library-internal and dropped along
    /// with the capture machinery, so the first frame is *its* caller. `skip` drops that many
    /// additional frames from the front. The calling function should be `#[track_caller]`
    /// so the first frame is located at its call site.
    #[track_caller]
    #[inline(never)]
    pub fn capture(skip: usize) -> Self {
        let caller = Location::caller();
        let captured = Captured { walk: walk(skip), caller: Some(caller), frames: OnceLock::new() };
        Self { inner: Some(Arc::new(captured)) }
    }

    /// Builds a trace from already-resolved frames.
    pub fn from_frames(frames: Vec<Frame>) -> Self {
        let captured =
            Captured { walk: Walk::default(), caller: None, frames: OnceLock::from(frames) };
        Self { inner: Some(Arc::new(captured)) }
    }

    /// The resolved frames, nearest caller first.
    pub fn frames(&self) -> &[Frame] {
        match &self.inner {
            Some(captured) => captured.frames.get_or_init(|| captured.resolve()),
            None => &[],
        }
    }

    /// The frame the trace originates from, i.e. the nearest caller.
    #[inline]
    pub fn origin(&self) -> Option<&Frame> {
        self.frames().first()
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.frames().len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.frames().is_empty()
    }

    #[inline]
    pub fn iter(&self) -> core::slice::Iter<'_, Frame> {
        self.frames().iter()
    }

    /// Discards all frames.
    #[inline]
    pub fn clear(&mut self) {
        self.inner = None;
    }
}

/// Upper bound on the frames a capture with `skip` visits.
const fn walk_limit(skip: usize) -> usize {
    UNWINDER_FRAMES + 1 + INTERNAL_FRAMES + skip + MAX_FRAMES
}

/// Records the instruction pointers of the frames above [`StackTrace::capture`]'s caller.
#[inline(never)]
fn walk(skip: usize) -> Walk {
    let anchor = walk as usize;
    let limit = walk_limit(skip);
    let mut unanchored = Vec::new();
    let mut ips = Vec::with_capacity(MAX_FRAMES);
    let mut anchored = false;
    let mut to_drop = INTERNAL_FRAMES + skip;
    let mut visited = 0;

    backtrace::trace(|frame| {
        visited += 1;
        let ip = frame.ip() as usize;

        if !anchored {
            if frame.symbol_address() as usize == anchor {
                anchored = true;
            } else {
                unanchored.push(ip);
            }
        } else if to_drop > 0 {
            to_drop -= 1;
        } else {
            ips.push(ip);
        }

        ips.len() < MAX_FRAMES && visited < limit
    });

    if anchored {
        Walk { ips, anchored, skip, visited }
    } else {
        Walk { ips: unanchored, anchored, skip, visited }
    }
}

impl Captured {
    fn resolve(&self) -> Vec<Frame> {
        let mut frames = Vec::with_capacity(self.walk.ips.len());
        let mut physical = self.walk.ips.iter().copied();

        if !self.walk.anchored {
            let mut symbols = Vec::new();
            loop {
                let Some(ip) = physical.next() else {
                    return Vec::new();
                };
                symbols.clear();
                resolve_ip(ip, &mut symbols);
                if symbols.iter().any(|frame| frame.symbol().ends_with(WALK_SYMBOL)) {
                    break;
                }
            }
            physical.by_ref().take(INTERNAL_FRAMES + self.walk.skip).for_each(drop);
        }

        for ip in physical {
            if frames.len() >= MAX_FRAMES {
                break;
            }
            resolve_ip(ip, &mut frames);
        }
        frames.truncate(MAX_FRAMES);

        if let (Some(origin), Some(caller)) = (frames.first_mut(), self.caller) {
            *origin = origin.clone().located(caller.file(), Some(caller.line()), Some(caller.column()));
        }
        frames
    }
}

/// Appends the symbols at `ip`, innermost inlined function first.
fn resolve_ip(ip: usize, out: &mut Vec<Frame>) {
    let before = out.len();
    backtrace::resolve(ip as *mut c_void, |symbol| {
        let name = match symbol.name() {
            Some(name) => format!("{name:#}"),
            None => "<unknown>".to_owned(),
        };
        let mut frame = Frame::new(name).at_ip(ip);
        if let Some(file) = symbol.filename() {
            frame = frame.located(&file.display().to_string(), symbol.lineno(), symbol.colno());
        }
        out.push(frame);
    });
    if out.len() == before {
        out.push(Frame::new("<unknown>").at_ip(ip));
    }
}

impl PartialEq for StackTrace {
    fn eq(&self, other: &Self) -> bool {
        self.frames() == other.frames()
    }
}

impl Eq for StackTrace {}

impl fmt::Debug for StackTrace {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.frames()).finish()
    }
}

impl fmt::Display for StackTrace {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (idx, frame) in self.frames().iter().enumerate() {
            if idx > 0 {
                f.write_str("\n")?;
            }
            write!(f, "{idx:>4}: {frame}")?;
        }
        Ok(())
    }
}

impl<'a> IntoIterator for &'a StackTrace {
    type Item = &'a Frame;
    type IntoIter = core::slice::Iter<'a, Frame>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

impl FromIterator<Frame> for StackTrace {
    fn from_iter<I: IntoIterator<Item = Frame>>(iter: I) -> Self {
        Self::from_frames(iter.into_iter().collect())
    }
}

#[cfg(feature = "serde")]
impl serde::Serialize for StackTrace {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_seq(self.frames())
    }
}

#[cfg(feature = "serde")]
impl<'de> serde::Deserialize<'de> for StackTrace {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        <Vec<Frame> as serde::Deserialize>::deserialize(deserializer).map(Self::from_frames)
    }
}
