//! Output of a checking pass.

use rustc_hash::FxHashMap;
use trill_diagnostic::{Diagnostic, DiagnosticQueue, ErrorGuaranteed};
use trill_ir::{DeclId, NodeId};

use super::TypeTable;
use crate::{TypeCheckError, TypeErrorKind};

/// Typed tree plus every user error found.
#[derive(Clone, Debug)]
pub struct TypeCheckResult {
    pub types: TypeTable,
    /// Call declarations chosen during checking (overloads, plain function
    /// references). Calls the resolver bound keep their own `decl`.
    pub callees: FxHashMap<NodeId, DeclId>,
    pub errors: Vec<TypeCheckError>,
}

impl TypeCheckResult {
    pub fn has_errors(&self) -> bool {
        !self.errors.is_empty()
    }

    pub fn error_kinds(&self) -> Vec<&TypeErrorKind> {
        self.errors.iter().map(|e| &e.kind).collect()
    }

    pub fn diagnostics(&self) -> Vec<Diagnostic> {
        self.errors.iter().map(TypeCheckError::to_diagnostic).collect()
    }

    /// Emit every error into `queue`.
    pub fn report(&self, queue: &mut DiagnosticQueue) -> Result<(), ErrorGuaranteed> {
        let mut guarantee = None;
        for error in &self.errors {
            guarantee = Some(queue.emit_error(error.to_diagnostic()));
        }
        guarantee.map_or(Ok(()), Err)
    }

    /// Code generation must not run on a tree with type errors.
    pub fn ensure_codegen_allowed(&self) -> Result<(), ErrorGuaranteed> {
        ErrorGuaranteed::from_error_count(self.errors.len()).map_or(Ok(()), Err)
    }
}
