//! Type checking errors.
//!
//! [`TypeCheckError`] is a user error: it is recorded, the affected node is
//! typed `Error`, and checking goes on. [`InternalError`] means an earlier
//! pass broke its contract and ends the pass.
//!
//! Types inside errors are rendered eagerly into [`TypeName`]s so errors can
//! outlive the context and be compared in tests.

use std::fmt;

use thiserror::Error;
use trill_diagnostic::{Diagnostic, ErrorCode};
use trill_ir::{DataType, Span, StringInterner};

/// A type rendered for display.
#[derive(Clone, Eq, PartialEq, Hash, Debug)]
pub struct TypeName(String);

impl TypeName {
    pub fn of(ty: &DataType, interner: &StringInterner) -> Self {
        TypeName(ty.display(interner).to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<&str> for TypeName {
    fn from(s: &str) -> Self {
        TypeName(s.to_owned())
    }
}

impl fmt::Display for TypeName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// What went wrong.
#[derive(Clone, Eq, PartialEq, Hash, Debug, Error)]
pub enum TypeErrorKind {
    // Labels and arity
    #[error("incorrect argument label (expected '{expected}', got '{got}')")]
    IncorrectArgLabel { got: String, expected: String },
    #[error("missing argument label (expected '{expected}')")]
    MissingArgLabel { expected: String },
    #[error("extra argument label (got '{got}')")]
    ExtraArgLabel { got: String },
    #[error("expected {expected} arguments to function {name} (got {got})")]
    ArityMismatch {
        name: String,
        expected: usize,
        got: usize,
    },

    // Mismatches
    #[error("type mismatch (expected value of type '{expected}', got '{found}')")]
    TypeMismatch { expected: TypeName, found: TypeName },
    #[error("cannot apply binary operator '{op}' to operands of type '{lhs}' and '{rhs}'")]
    InvalidBinOpArgs {
        op: &'static str,
        lhs: TypeName,
        rhs: TypeName,
    },
    #[error("cannot apply unary operator '{op}' to operand of type '{ty}'")]
    InvalidPrefixOperand { op: &'static str, ty: TypeName },
    #[error("cannot downcast from Any to type '{ty}'")]
    CannotDowncastFromAny { ty: TypeName },
    #[error("ternary condition must be a Bool (got '{got}')")]
    NonBoolTernary { got: TypeName },
    #[error("if condition must be a Bool (got '{got}')")]
    NonBoolCondition { got: TypeName },
    #[error("cannot subscript with argument of type {ty}")]
    SubscriptWithInvalidType { ty: TypeName },
    #[error("cannot subscript with no arguments")]
    SubscriptWithNoArgs,
    #[error("value of type '{ty}' has no field {index}")]
    NoTupleField { ty: TypeName, index: usize },

    // Literal ranges
    #[error("value '{raw}' overflows when stored into '{ty}'")]
    Overflow { raw: String, ty: TypeName },
    #[error("value '{raw}' underflows when stored into '{ty}'")]
    Underflow { raw: String, ty: TypeName },
    #[error("shift amount {amount} is greater than or equal to {ty}'s size in bits")]
    ShiftPastBitWidth { ty: TypeName, amount: i128 },

    // Ambiguity
    #[error("type of expression is ambiguous without more context")]
    AmbiguousExpressionType,
    #[error("ambiguous use of overloaded function '{name}' ({candidates} candidates)")]
    AmbiguousOverload { name: String, candidates: usize },
    #[error("no overload of '{name}' accepts arguments of type ({args})")]
    NoMatchingOverload { name: String, args: String },

    // Structural solver failures
    #[error("infinite type: '{var}' occurs in '{ty}'")]
    InfiniteType { var: TypeName, ty: TypeName },
    #[error("cannot check conformance of '{ty}' to '{protocol}'")]
    MissingConformanceDecl { ty: TypeName, protocol: TypeName },
    #[error("type '{ty}' does not conform to protocol '{protocol}'")]
    DoesNotConform { ty: TypeName, protocol: TypeName },
}

impl TypeErrorKind {
    pub fn code(&self) -> ErrorCode {
        match self {
            Self::TypeMismatch { .. } => ErrorCode::E2001,
            Self::ArityMismatch { .. } => ErrorCode::E2002,
            Self::MissingArgLabel { .. } => ErrorCode::E2003,
            Self::ExtraArgLabel { .. } => ErrorCode::E2004,
            Self::IncorrectArgLabel { .. } => ErrorCode::E2005,
            Self::InvalidBinOpArgs { .. } => ErrorCode::E2006,
            Self::InvalidPrefixOperand { .. } => ErrorCode::E2007,
            Self::NonBoolTernary { .. } | Self::NonBoolCondition { .. } => ErrorCode::E2008,
            Self::CannotDowncastFromAny { .. } => ErrorCode::E2009,
            Self::SubscriptWithInvalidType { .. }
            | Self::SubscriptWithNoArgs
            | Self::NoTupleField { .. } => ErrorCode::E2010,
            Self::Overflow { .. } | Self::Underflow { .. } => ErrorCode::E2011,
            Self::ShiftPastBitWidth { .. } => ErrorCode::E2012,
            Self::AmbiguousExpressionType => ErrorCode::E2013,
            Self::AmbiguousOverload { .. } | Self::NoMatchingOverload { .. } => ErrorCode::E2014,
            Self::InfiniteType { .. } => ErrorCode::E2015,
            Self::MissingConformanceDecl { .. } | Self::DoesNotConform { .. } => {
                ErrorCode::E2016
            }
        }
    }

    /// Short text for the primary label.
    fn label(&self) -> String {
        match self {
            Self::TypeMismatch { expected, .. } => format!("expected '{expected}'"),
            Self::ArityMismatch { expected, .. } => {
                let plural = if *expected == 1 { "" } else { "s" };
                format!("expected {expected} argument{plural}")
            }
            Self::MissingArgLabel { expected } => format!("add label '{expected}:'"),
            Self::ExtraArgLabel { .. } => "this parameter has no label".to_owned(),
            Self::IncorrectArgLabel { expected, .. } => format!("expected label '{expected}'"),
            Self::InvalidBinOpArgs { .. } | Self::InvalidPrefixOperand { .. } => {
                "no matching operator".to_owned()
            }
            Self::CannotDowncastFromAny { .. } => "value of type 'Any'".to_owned(),
            Self::NonBoolTernary { .. } | Self::NonBoolCondition { .. } => {
                "expected 'Bool'".to_owned()
            }
            Self::Overflow { ty, .. } | Self::Underflow { ty, .. } => {
                format!("out of range for '{ty}'")
            }
            Self::ShiftPastBitWidth { .. } => "shift amount too large".to_owned(),
            Self::AmbiguousExpressionType => "type annotation needed".to_owned(),
            Self::InfiniteType { .. } => "this creates a self-referential type".to_owned(),
            _ => String::new(),
        }
    }
}

/// A user-facing type error.
#[derive(Clone, Eq, PartialEq, Debug)]
pub struct TypeCheckError {
    pub kind: TypeErrorKind,
    pub span: Span,
    /// Additional ranges to highlight.
    pub highlights: Vec<Span>,
    pub notes: Vec<String>,
}

impl TypeCheckError {
    pub fn new(kind: TypeErrorKind, span: Span) -> Self {
        TypeCheckError {
            kind,
            span,
            highlights: Vec::new(),
            notes: Vec::new(),
        }
    }

    #[must_use]
    pub fn with_highlight(mut self, span: Span) -> Self {
        self.highlights.push(span);
        self
    }

    #[must_use]
    pub fn with_note(mut self, note: impl Into<String>) -> Self {
        self.notes.push(note.into());
        self
    }

    pub fn to_diagnostic(&self) -> Diagnostic {
        let mut diag = Diagnostic::error(self.kind.code())
            .with_message(self.kind.to_string())
            .with_label(self.span, self.kind.label());
        for &span in &self.highlights {
            diag = diag.with_secondary_label(span, "");
        }
        for note in &self.notes {
            diag = diag.with_note(note.clone());
        }
        match &self.kind {
            TypeErrorKind::CannotDowncastFromAny { ty } => {
                diag.with_suggestion(format!("add explicit cast (as {ty}) to fix"))
            }
            TypeErrorKind::AmbiguousExpressionType => {
                diag.with_suggestion("add an explicit type annotation")
            }
            TypeErrorKind::InfiniteType { .. } => {
                diag.with_suggestion("break the cycle by introducing an intermediate type")
            }
            _ => diag,
        }
    }
}

impl fmt::Display for TypeCheckError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} at {:?}", self.kind, self.span)
    }
}

/// An invariant an earlier pass should have upheld does not hold.
#[derive(Clone, Eq, PartialEq, Debug, Error)]
pub enum InternalError {
    #[error("identifier '{name}' has no binding, global, overload or declaration")]
    UnresolvedIdentifier { name: String, span: Span },
    #[error("declaration referenced at {span:?} is unknown to the context")]
    UnknownDeclaration { span: Span },
    #[error("property reference without a resolved declaration")]
    MissingPropertyDecl { span: Span },
    #[error("'self' reference without a known type")]
    MissingSelfType { span: Span },
    #[error("{kind} node used as an expression")]
    UnexpectedNode { kind: &'static str, span: Span },
}

impl InternalError {
    pub fn span(&self) -> Span {
        match self {
            Self::UnresolvedIdentifier { span, .. }
            | Self::UnknownDeclaration { span }
            | Self::MissingPropertyDecl { span }
            | Self::MissingSelfType { span }
            | Self::UnexpectedNode { span, .. } => *span,
        }
    }

    pub fn to_diagnostic(&self) -> Diagnostic {
        Diagnostic::error(ErrorCode::E9001)
            .with_message(format!("internal compiler error: {self}"))
            .with_label(self.span(), "")
            .with_note("this is a bug in an earlier compiler pass")
    }
}
