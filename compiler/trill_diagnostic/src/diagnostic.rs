//! The diagnostic record handed to renderers.

use std::fmt;

use trill_ir::Span;

use crate::ErrorCode;

#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
pub enum Severity {
    Error,
    Warning,
}

impl Severity {
    pub const fn as_str(self) -> &'static str {
        match self {
            Severity::Error => "error",
            Severity::Warning => "warning",
        }
    }
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// How a renderer should draw a label.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
pub enum LabelStyle {
    /// Where the error is. A diagnostic has at most one.
    Primary,
    /// Related code worth pointing at.
    Secondary,
}

/// A span with an optional caption.
#[derive(Clone, Eq, PartialEq, Hash, Debug)]
pub struct Label {
    pub span: Span,
    pub style: LabelStyle,
    /// May be empty for pure highlights.
    pub message: String,
}

#[derive(Clone, Eq, PartialEq, Hash, Debug)]
#[must_use = "a diagnostic does nothing until it is emitted"]
pub struct Diagnostic {
    pub code: ErrorCode,
    pub severity: Severity,
    pub message: String,
    pub labels: Vec<Label>,
    pub notes: Vec<String>,
    /// Fixes phrased for the user ("add explicit cast (as Int) to fix").
    pub suggestions: Vec<String>,
}

impl Diagnostic {
    #[cold]
    pub fn error(code: ErrorCode) -> Self {
        Self::with_severity(code, Severity::Error)
    }

    #[cold]
    pub fn warning(code: ErrorCode) -> Self {
        Self::with_severity(code, Severity::Warning)
    }

    fn with_severity(code: ErrorCode, severity: Severity) -> Self {
        Diagnostic {
            code,
            severity,
            message: String::new(),
            labels: Vec::new(),
            notes: Vec::new(),
            suggestions: Vec::new(),
        }
    }

    pub fn with_message(mut self, message: impl Into<String>) -> Self {
        self.message = message.into();
        self
    }

    /// Set the primary label, replacing an earlier one.
    pub fn with_label(mut self, span: Span, message: impl Into<String>) -> Self {
        self.labels.retain(|l| l.style != LabelStyle::Primary);
        self.labels.insert(
            0,
            Label {
                span,
                style: LabelStyle::Primary,
                message: message.into(),
            },
        );
        self
    }

    pub fn with_secondary_label(mut self, span: Span, message: impl Into<String>) -> Self {
        self.labels.push(Label {
            span,
            style: LabelStyle::Secondary,
            message: message.into(),
        });
        self
    }

    pub fn with_note(mut self, note: impl Into<String>) -> Self {
        self.notes.push(note.into());
        self
    }

    pub fn with_suggestion(mut self, suggestion: impl Into<String>) -> Self {
        self.suggestions.push(suggestion.into());
        self
    }

    pub fn primary_span(&self) -> Option<Span> {
        self.labels
            .iter()
            .find(|l| l.style == LabelStyle::Primary)
            .map(|l| l.span)
    }

    pub fn is_error(&self) -> bool {
        self.severity == Severity::Error
    }
}

/// Plain-text form, one fact per line. Used in logs and test output.
impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}[{}]: {}", self.severity, self.code, self.message)?;
        for label in &self.labels {
            let at = match label.style {
                LabelStyle::Primary => "at",
                LabelStyle::Secondary => "see",
            };
            write!(f, "\n  {at} {}", label.span)?;
            if !label.message.is_empty() {
                write!(f, ": {}", label.message)?;
            }
        }
        for note in &self.notes {
            write!(f, "\n  note: {note}")?;
        }
        for suggestion in &self.suggestions {
            write!(f, "\n  help: {suggestion}")?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests;
