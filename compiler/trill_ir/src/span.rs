//! Byte ranges into the file an AST was parsed from.
//!
//! The checker never reads source text. Spans only travel from nodes to
//! diagnostics.

use std::fmt;
use std::ops::Range;

/// A byte offset that does not fit in 32 bits.
#[derive(Copy, Clone, Eq, PartialEq, Debug)]
pub struct SpanError {
    pub offset: usize,
}

impl fmt::Display for SpanError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "byte offset {} is past the 4 GiB source limit",
            self.offset
        )
    }
}

impl std::error::Error for SpanError {}

/// Half-open byte range `start..end`, 8 bytes.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Default)]
#[cfg_attr(feature = "cache", derive(serde::Serialize, serde::Deserialize))]
pub struct Span {
    pub start: u32,
    pub end: u32,
}

crate::static_assert_size!(Span, 8);

impl Span {
    #[inline]
    pub const fn new(start: u32, end: u32) -> Self {
        Span { start, end }
    }

    /// Span of a `usize` range, as handed out by a lexer.
    pub fn try_from_range(range: Range<usize>) -> Result<Self, SpanError> {
        let offset = |at: usize| u32::try_from(at).map_err(|_| SpanError { offset: at });
        Ok(Span::new(offset(range.start)?, offset(range.end)?))
    }

    #[inline]
    pub const fn len(self) -> u32 {
        self.end.saturating_sub(self.start)
    }

    #[inline]
    pub const fn is_empty(self) -> bool {
        self.len() == 0
    }

    /// Smallest span covering both.
    #[must_use]
    pub fn cover(self, other: Span) -> Span {
        Span::new(self.start.min(other.start), self.end.max(other.end))
    }
}

impl fmt::Debug for Span {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}..{}", self.start, self.end)
    }
}

impl fmt::Display for Span {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(self, f)
    }
}
