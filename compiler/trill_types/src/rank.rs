//! Match ranks for argument and return compatibility.
//!
//! Unification alone is too permissive for call sites: `Any` unifies with
//! everything. The checker therefore re-checks argument and return types with
//! a rank, lower being better:
//!
//! - **0 (EXACT)**: same canonical type
//! - **1 (CONVERSION)**: an unresolved side, or pointer to pointer
//! - **2 (EXISTENTIAL)**: widening into `Any`
//!
//! `None` means incompatible. Ranks of compound types are the worst rank of
//! their components.

use trill_ir::DataType;

use crate::SemaContext;

#[derive(Copy, Clone, Eq, PartialEq, Ord, PartialOrd, Hash, Debug, Default)]
#[repr(transparent)]
pub struct MatchRank(u8);

impl MatchRank {
    pub const EXACT: Self = Self(0);
    pub const CONVERSION: Self = Self(1);
    pub const EXISTENTIAL: Self = Self(2);

    #[inline]
    pub const fn raw(self) -> u8 {
        self.0
    }
}

/// Rank passing a `found` value where `expected` is required.
pub fn match_rank<C: SemaContext + ?Sized>(
    ctx: &C,
    expected: &DataType,
    found: &DataType,
) -> Option<MatchRank> {
    let expected = ctx.canonical_type(expected);
    let found = ctx.canonical_type(found);
    rank_canonical(&expected, &found)
}

fn rank_canonical(expected: &DataType, found: &DataType) -> Option<MatchRank> {
    if expected == found || expected.is_error() || found.is_error() {
        return Some(MatchRank::EXACT);
    }
    if expected.is_unresolved() || found.is_unresolved() {
        return Some(MatchRank::CONVERSION);
    }
    match (expected, found) {
        (DataType::Any, _) => Some(MatchRank::EXISTENTIAL),
        (DataType::Pointer(_), DataType::Pointer(_)) => Some(MatchRank::CONVERSION),
        (
            DataType::Array {
                element: e1,
                length: l1,
            },
            DataType::Array {
                element: e2,
                length: l2,
            },
        ) => {
            if let (Some(l1), Some(l2)) = (l1, l2) {
                if l1 != l2 {
                    return None;
                }
            }
            rank_canonical(e1, e2)
        }
        (DataType::Tuple(f1), DataType::Tuple(f2)) if f1.len() == f2.len() => {
            worst(f1.iter().zip(f2).map(|(a, b)| rank_canonical(a, b)))
        }
        (
            DataType::Function {
                args: a1,
                ret: r1,
                variadic: v1,
            },
            DataType::Function {
                args: a2,
                ret: r2,
                variadic: v2,
            },
        ) if a1.len() == a2.len() && v1 == v2 => worst(
            std::iter::once(rank_canonical(r1, r2))
                .chain(a1.iter().zip(a2).map(|(a, b)| rank_canonical(a, b))),
        ),
        _ => None,
    }
}

fn worst(ranks: impl Iterator<Item = Option<MatchRank>>) -> Option<MatchRank> {
    ranks.fold(Some(MatchRank::EXACT), |acc, r| Some(acc?.max(r?)))
}

#[cfg(test)]
mod tests;
