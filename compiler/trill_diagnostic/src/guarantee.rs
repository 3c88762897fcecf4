//! Proof that an error was emitted.

use std::fmt;

/// Zero-sized proof that at least one error diagnostic was emitted.
///
/// Only the diagnostic machinery can construct one, so holding an
/// `ErrorGuaranteed` means the user has been told why compilation stops.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
pub struct ErrorGuaranteed(());

impl ErrorGuaranteed {
    pub(crate) const fn new() -> Self {
        ErrorGuaranteed(())
    }

    /// Proof from a count of already-emitted errors, `None` for zero.
    pub fn from_error_count(count: usize) -> Option<Self> {
        (count > 0).then(Self::new)
    }
}

impl fmt::Display for ErrorGuaranteed {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "error(s) emitted")
    }
}

impl std::error::Error for ErrorGuaranteed {}
