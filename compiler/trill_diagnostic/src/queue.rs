//! Where diagnostics go before rendering.
//!
//! The queue caps the number of errors, drops an error reported twice at
//! the same place, and hands diagnostics back in source order.

use rustc_hash::FxHashSet;
use trill_ir::Span;

use crate::{Diagnostic, ErrorCode, ErrorGuaranteed};

/// Queue behaviour.
#[derive(Clone, Debug, Eq, PartialEq, Hash)]
pub struct DiagnosticConfig {
    /// Errors kept before the rest are dropped; `0` keeps all.
    pub error_limit: usize,
    /// Drop an error whose code and primary span were already reported.
    pub deduplicate: bool,
}

impl Default for DiagnosticConfig {
    fn default() -> Self {
        DiagnosticConfig {
            error_limit: 10,
            deduplicate: true,
        }
    }
}

impl DiagnosticConfig {
    /// No cap, no deduplication.
    pub fn unlimited() -> Self {
        DiagnosticConfig {
            error_limit: 0,
            deduplicate: false,
        }
    }
}

/// Append-only sink for diagnostics.
///
/// ```text
/// let mut queue = DiagnosticQueue::new();
/// queue.emit(diagnostic);
/// let sorted = queue.flush();
/// ```
#[derive(Clone, Debug, Default)]
pub struct DiagnosticQueue {
    diagnostics: Vec<Diagnostic>,
    error_count: usize,
    /// (code, primary span) of every error accepted so far.
    seen: FxHashSet<(ErrorCode, Option<Span>)>,
    config: DiagnosticConfig,
}

impl DiagnosticQueue {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_config(config: DiagnosticConfig) -> Self {
        DiagnosticQueue {
            config,
            ..Self::default()
        }
    }

    /// Queue `diag`. Warnings always pass; errors are dropped past the limit
    /// or when deduplicated. Returns whether it was kept.
    pub fn emit(&mut self, diag: Diagnostic) -> bool {
        if diag.is_error() {
            if !self.accept_error(&diag) {
                return false;
            }
            self.error_count += 1;
        }
        self.diagnostics.push(diag);
        true
    }

    fn accept_error(&mut self, diag: &Diagnostic) -> bool {
        if self.limit_reached() {
            return false;
        }
        !self.config.deduplicate || self.seen.insert((diag.code, diag.primary_span()))
    }

    /// Queue an error and hand back the proof.
    ///
    /// A filtered error still yields the proof: some error of that kind was
    /// already reported.
    pub fn emit_error(&mut self, diag: Diagnostic) -> ErrorGuaranteed {
        self.emit(diag);
        ErrorGuaranteed::new()
    }

    pub fn limit_reached(&self) -> bool {
        self.config.error_limit != 0 && self.error_count >= self.config.error_limit
    }

    /// Errors kept since the last flush.
    pub fn error_count(&self) -> usize {
        self.error_count
    }

    pub fn has_errors(&self) -> Option<ErrorGuaranteed> {
        ErrorGuaranteed::from_error_count(self.error_count)
    }

    /// Drain the queue in source order.
    ///
    /// Span-less diagnostics come first; ties keep emission order.
    pub fn flush(&mut self) -> Vec<Diagnostic> {
        let mut out = std::mem::take(&mut self.diagnostics);
        out.sort_by_key(sort_key);
        self.error_count = 0;
        self.seen.clear();
        out
    }

    pub fn peek(&self) -> impl Iterator<Item = &Diagnostic> {
        self.diagnostics.iter()
    }
}

fn sort_key(diag: &Diagnostic) -> Option<(u32, u32)> {
    diag.primary_span().map(|s| (s.start, s.end))
}

#[cfg(test)]
mod tests;
