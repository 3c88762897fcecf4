//! Overload resolution at call sites.
//!
//! A reference to an overloaded name yields a placeholder. Its call ranks
//! every candidate against the argument types known so far and keeps the
//! unique best one; the rank of a candidate is the sum of its parameters'
//! [`MatchRank`]s.

use tracing::debug;
use trill_ir::{Arg, DataType, DeclId, Span};

use super::{ConstraintGenerator, Overloaded};
use crate::{match_rank, FunctionSignature, SemaContext, TypeErrorKind};

impl<C: SemaContext + ?Sized> ConstraintGenerator<'_, C> {
    /// Pick the candidate for a call; records an error and returns `None`
    /// when there is no unique best one.
    pub(super) fn choose_overload(
        &mut self,
        overloaded: &Overloaded,
        args: &[Arg],
        arg_tys: &[DataType],
        span: Span,
    ) -> Option<(DeclId, DataType)> {
        let ctx = self.ctx;
        let solution = self.eager_solution();
        let arg_tys: Vec<DataType> = arg_tys.iter().map(|ty| solution.apply(ty)).collect();

        let ranked: Vec<(u32, DeclId, &FunctionSignature)> = overloaded
            .candidates
            .iter()
            .filter_map(|&decl| {
                let sig = ctx.function_signature(decl)?;
                rank_candidate(ctx, sig, args, &arg_tys).map(|rank| (rank, decl, sig))
            })
            .collect();

        let name = ctx.interner().lookup(overloaded.name).to_owned();
        let Some(best) = ranked.iter().map(|(rank, ..)| *rank).min() else {
            let args = arg_tys
                .iter()
                .map(|ty| self.type_name(ty).to_string())
                .collect::<Vec<_>>()
                .join(", ");
            self.error(TypeErrorKind::NoMatchingOverload { name, args }, span);
            return None;
        };

        let mut winners = ranked.iter().filter(|(rank, ..)| *rank == best);
        let (_, decl, sig) = winners.next()?;
        let others = winners.count();
        if others > 0 {
            self.error(
                TypeErrorKind::AmbiguousOverload {
                    name,
                    candidates: others + 1,
                },
                span,
            );
            return None;
        }
        debug!(%name, ?decl, rank = best, "chose overload");
        Some((*decl, sig.ty()))
    }
}

/// Rank of `sig` for a call, or `None` if it cannot be called that way.
///
/// Arity and labels must match exactly; arguments past the declared
/// parameters of a variadic function are not ranked.
fn rank_candidate<C: SemaContext + ?Sized>(
    ctx: &C,
    sig: &FunctionSignature,
    args: &[Arg],
    arg_tys: &[DataType],
) -> Option<u32> {
    let params = sig.explicit_params();
    let arity_ok = if sig.variadic {
        params.len() <= args.len()
    } else {
        params.len() == args.len()
    };
    if !arity_ok {
        return None;
    }
    let mut total = 0u32;
    for ((param, arg), ty) in params.iter().zip(args).zip(arg_tys) {
        if param.label != arg.label {
            return None;
        }
        total += u32::from(match_rank(ctx, &param.ty, ty)?.raw());
    }
    Some(total)
}
