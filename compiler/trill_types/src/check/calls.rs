//! Call-site arity, labels and argument types.

use rustc_hash::FxHashMap;
use trill_ir::{Arg, DataType, DeclId, Name, NodeId, NodeKind};

use super::TypeChecker;
use crate::{match_rank, FunctionSignature, SemaContext, TypeCheckError, TypeErrorKind};

impl<C: SemaContext + ?Sized> TypeChecker<'_, C> {
    /// Arity and labels of every call in `nodes` with a known declaration.
    ///
    /// Subscripts of pointers and arrays are checked against the synthesized
    /// `(Int64) -> Element` signature, taking the base from its unsolved goal.
    ///
    /// Runs before solving; returns `false` if an arity check failed, in
    /// which case solving would only repeat the error as a mismatch.
    pub(super) fn check_call_shapes(
        &mut self,
        nodes: &[NodeId],
        goals: &FxHashMap<NodeId, DataType>,
        callees: &FxHashMap<NodeId, DeclId>,
    ) -> bool {
        let ast = self.ast;
        let ctx = self.ctx;
        let mut arity_ok = true;
        for &id in nodes {
            let (args, decl) = match ast.kind(id) {
                NodeKind::Call { args, decl, .. } => (args, decl.or_else(|| callees.get(&id).copied())),
                NodeKind::Subscript { base, args, decl } => {
                    if decl.is_none() {
                        let element = match goals.get(base).map(|ty| ctx.canonical_type(ty)) {
                            Some(DataType::Pointer(element) | DataType::Array { element, .. }) => *element,
                            _ => continue,
                        };
                        let sig = ctx.synthesized_decl(vec![DataType::INT64], element);
                        arity_ok &= self.check_arity_and_labels(id, &sig, args);
                        continue;
                    }
                    (args, *decl)
                }
                _ => continue,
            };
            let Some(sig) = decl.and_then(|decl| ctx.function_signature(decl)) else {
                continue;
            };
            arity_ok &= self.check_arity_and_labels(id, sig, args);
        }
        arity_ok
    }

    fn check_arity_and_labels(&mut self, call: NodeId, sig: &FunctionSignature, args: &[Arg]) -> bool {
        let params = sig.explicit_params();
        let arity_ok = if sig.variadic {
            params.len() <= args.len()
        } else {
            params.len() == args.len()
        };
        if !arity_ok {
            let name = if sig.name == Name::EMPTY {
                "subscript".to_owned()
            } else {
                self.name(sig.name)
            };
            self.error(
                TypeErrorKind::ArityMismatch {
                    name,
                    expected: params.len(),
                    got: args.len(),
                },
                self.ast.span(call),
            );
            return false;
        }

        for (param, arg) in params.iter().zip(args) {
            let span = self.ast.span(arg.value);
            let kind = match (param.label, arg.label) {
                (Some(expected), None) => TypeErrorKind::MissingArgLabel {
                    expected: self.name(expected),
                },
                (Some(expected), Some(got)) if expected != got => TypeErrorKind::IncorrectArgLabel {
                    got: self.name(got),
                    expected: self.name(expected),
                },
                (None, Some(got)) => TypeErrorKind::ExtraArgLabel {
                    got: self.name(got),
                },
                _ => continue,
            };
            self.errors
                .push(TypeCheckError::new(kind, span).with_highlight(span));
        }
        true
    }

    /// Argument types against the parameters of a solved call.
    pub(super) fn check_call_args(&mut self, id: NodeId) {
        if self.type_of(id).is_error() {
            return;
        }
        let ast = self.ast;
        let ctx = self.ctx;
        let (args, sig) = match ast.kind(id) {
            NodeKind::Call { args, decl, .. } => {
                let decl = decl.or_else(|| self.callees.get(&id).copied());
                match decl.and_then(|decl| ctx.function_signature(decl)) {
                    Some(sig) => (args, sig.clone()),
                    None => return,
                }
            }
            NodeKind::Subscript { base, args, decl } => {
                if let Some(sig) = decl.and_then(|decl| ctx.function_signature(decl)) {
                    (args, sig.clone())
                } else {
                    match ctx.canonical_type(&self.type_of(*base)) {
                        DataType::Pointer(element) | DataType::Array { element, .. } => {
                            (args, ctx.synthesized_decl(vec![DataType::INT64], *element))
                        }
                        _ => return,
                    }
                }
            }
            _ => return,
        };

        for (param, arg) in sig.explicit_params().iter().zip(args) {
            let found = self.type_of(arg.value);
            if match_rank(ctx, &param.ty, &found).is_none() {
                let kind = self.mismatch(&param.ty, &found);
                let span = ast.span(arg.value);
                self.errors
                    .push(TypeCheckError::new(kind, span).with_highlight(span));
            }
        }
    }

    fn name(&self, name: Name) -> String {
        self.ctx.interner().lookup(name).to_owned()
    }
}
