//! Diagnostics for the Trill front-end.
//!
//! - Error codes for searchability
//! - Clear messages (what went wrong)
//! - Primary span (where it went wrong)
//! - Context labels and notes
//! - Suggestions (how to fix)
//!
//! # Error Guarantees
//!
//! `ErrorGuaranteed` is type-level proof that at least one error was
//! emitted. Later stages take it (or its absence) as the signal to stop.
//!
//! ```text
//! let guarantee = queue.emit_error(diagnostic);
//! fn type_check() -> Result<TypedAst, ErrorGuaranteed> { ... }
//! ```

mod diagnostic;
mod error_code;
mod guarantee;
pub mod queue;

pub use diagnostic::{Diagnostic, Label, LabelStyle, Severity};
pub use error_code::ErrorCode;
pub use guarantee::ErrorGuaranteed;
pub use queue::{DiagnosticConfig, DiagnosticQueue};
