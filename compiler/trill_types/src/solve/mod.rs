//! Constraint solver.
//!
//! Constraints are solved strictly in order. Before a constraint is looked
//! at, everything solved so far is applied to both of its sides (forward
//! substitution), so earlier constraints narrow the types later ones see.
//!
//! # Dispatch
//!
//! After canonicalization, for `Equal(a, b)`:
//! 1. either side is `Error`: success, nothing bound
//! 2. `a == b`: success
//! 3. both sides are variables: ambiguous
//! 4. one side is a variable: occurs check, then bind it
//! 5. functions: equal arity or a variadic side; returns first, then
//!    arguments pairwise, as a sub-system
//! 6. pointers: success whatever the pointees (a known relaxation)
//! 7. either side `Any`: success
//! 8. arrays and tuples: element-wise
//! 9. anything else: mismatch
//!
//! `Conforms(t, p)` checks the declarations through the context and then
//! reduces to `Equal(t, Any)`.

use std::fmt;

use tracing::{debug, trace};
use trill_ir::{DataType, NodeId, VarKey};

use crate::{Constraint, ConstraintKind, ConstraintSite, SemaContext, Substitution};

/// Why a constraint could not be solved. Types are canonical.
#[derive(Clone, Eq, PartialEq, Hash, Debug)]
pub enum SolveErrorKind {
    Mismatch {
        expected: DataType,
        found: DataType,
    },
    /// `var` occurs inside `ty`.
    InfiniteType { var: DataType, ty: DataType },
    /// Two unresolved variables with nothing to pin either down.
    Ambiguous { expected: DataType, found: DataType },
    /// No type or protocol declaration to check conformance against.
    MissingConformanceDecl { ty: DataType, protocol: DataType },
    DoesNotConform { ty: DataType, protocol: DataType },
}

/// A failed constraint.
#[derive(Clone, Eq, PartialEq, Hash, Debug)]
pub struct SolveError {
    pub kind: SolveErrorKind,
    pub site: ConstraintSite,
    pub node: Option<NodeId>,
    /// Position of the failing constraint in the system passed to
    /// [`Solver::solve`].
    pub index: usize,
}

impl fmt::Display for SolveError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let what = match &self.kind {
            SolveErrorKind::Mismatch { .. } => "type mismatch",
            SolveErrorKind::InfiniteType { .. } => "infinite type",
            SolveErrorKind::Ambiguous { .. } => "ambiguous types",
            SolveErrorKind::MissingConformanceDecl { .. } => "missing conformance declaration",
            SolveErrorKind::DoesNotConform { .. } => "does not conform",
        };
        write!(f, "{what} at {} (constraint {})", self.site, self.index)
    }
}

/// Unification-based solver over a [`SemaContext`].
pub struct Solver<'a, C: SemaContext + ?Sized> {
    ctx: &'a C,
}

impl<'a, C: SemaContext + ?Sized> Solver<'a, C> {
    pub fn new(ctx: &'a C) -> Self {
        Solver { ctx }
    }

    /// Solve a whole system from scratch.
    pub fn solve(&self, system: &[Constraint]) -> Result<Substitution, SolveError> {
        self.solve_from(system, Substitution::new())
    }

    /// Solve a system on top of `prior`, returning the extended substitution.
    pub fn solve_from(
        &self,
        system: &[Constraint],
        mut prior: Substitution,
    ) -> Result<Substitution, SolveError> {
        debug!(constraints = system.len(), "solving constraint system");
        for (index, constraint) in system.iter().enumerate() {
            let delta = self.solve_one(constraint, &prior).map_err(|mut err| {
                err.index = index;
                err
            })?;
            prior.merge(delta);
        }
        Ok(prior)
    }

    /// Solve one constraint under `prior`; returns only the new bindings.
    pub fn solve_one(
        &self,
        constraint: &Constraint,
        prior: &Substitution,
    ) -> Result<Substitution, SolveError> {
        let constraint = constraint.substituted(prior);
        trace!(kind = ?constraint.kind, site = %constraint.site, "solve");
        match &constraint.kind {
            ConstraintKind::Equal(a, b) => self.unify(a, b, &constraint),
            ConstraintKind::Conforms(ty, protocol) => self.conforms(ty, protocol, &constraint),
        }
    }

    fn unify(
        &self,
        a: &DataType,
        b: &DataType,
        origin: &Constraint,
    ) -> Result<Substitution, SolveError> {
        let ca = self.ctx.canonical_type(a);
        let cb = self.ctx.canonical_type(b);

        if ca.is_error() || cb.is_error() || ca == cb {
            return Ok(Substitution::new());
        }

        match (ca.as_var(), cb.as_var()) {
            (Some(_), Some(_)) => {
                return Err(fail(
                    SolveErrorKind::Ambiguous {
                        expected: ca,
                        found: cb,
                    },
                    origin,
                ))
            }
            (Some(var), None) => return bind(var, &ca, b, &cb, origin),
            (None, Some(var)) => return bind(var, &cb, a, &ca, origin),
            (None, None) => {}
        }

        match (&ca, &cb) {
            (
                DataType::Function {
                    args: args1,
                    ret: ret1,
                    variadic: var1,
                },
                DataType::Function {
                    args: args2,
                    ret: ret2,
                    variadic: var2,
                },
            ) => {
                if args1.len() != args2.len() && !var1 && !var2 {
                    return Err(mismatch(ca.clone(), cb.clone(), origin));
                }
                let sub: Vec<Constraint> = std::iter::once((ret1.as_ref(), ret2.as_ref()))
                    .chain(args1.iter().zip(args2))
                    .map(|(x, y)| Constraint::equal(x.clone(), y.clone(), origin.site, origin.node))
                    .collect();
                self.solve(&sub)
            }
            // Pointee types are not compared.
            (DataType::Pointer(_), DataType::Pointer(_)) => Ok(Substitution::new()),
            (DataType::Any, _) | (_, DataType::Any) => Ok(Substitution::new()),
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
                        return Err(mismatch(ca.clone(), cb.clone(), origin));
                    }
                }
                let sub = [Constraint::equal(
                    (**e1).clone(),
                    (**e2).clone(),
                    origin.site,
                    origin.node,
                )];
                self.solve(&sub)
            }
            (DataType::Tuple(f1), DataType::Tuple(f2)) if f1.len() == f2.len() => {
                let sub: Vec<Constraint> = f1
                    .iter()
                    .zip(f2)
                    .map(|(x, y)| Constraint::equal(x.clone(), y.clone(), origin.site, origin.node))
                    .collect();
                self.solve(&sub)
            }
            _ => Err(mismatch(ca.clone(), cb.clone(), origin)),
        }
    }

    fn conforms(
        &self,
        ty: &DataType,
        protocol: &DataType,
        origin: &Constraint,
    ) -> Result<Substitution, SolveError> {
        let ty = self.ctx.canonical_type(ty);
        let protocol = self.ctx.canonical_type(protocol);

        let decls = (
            self.ctx.declaration(&ty),
            self.ctx.protocol_declaration(&protocol),
        );
        let (Some(ty_decl), Some(protocol_decl)) = decls else {
            return Err(fail(
                SolveErrorKind::MissingConformanceDecl { ty, protocol },
                origin,
            ));
        };
        if !self.ctx.conforms_to_protocol(ty_decl, protocol_decl) {
            return Err(fail(
                SolveErrorKind::DoesNotConform { ty, protocol },
                origin,
            ));
        }
        self.unify(&ty, &DataType::Any, origin)
    }
}

/// Bind `var` to `other`, after the occurs check on its canonical form.
///
/// The binding keeps the non-canonical spelling so aliases survive into
/// later diagnostics.
fn bind(
    var: VarKey,
    var_ty: &DataType,
    other: &DataType,
    other_canonical: &DataType,
    origin: &Constraint,
) -> Result<Substitution, SolveError> {
    if other_canonical.contains_var(var) || other.contains_var(var) {
        return Err(fail(
            SolveErrorKind::InfiniteType {
                var: var_ty.clone(),
                ty: other_canonical.clone(),
            },
            origin,
        ));
    }
    trace!(?var, ?other, "bind");
    let mut subst = Substitution::new();
    subst.insert(var, other.clone());
    Ok(subst)
}

fn mismatch(expected: DataType, found: DataType, origin: &Constraint) -> SolveError {
    fail(SolveErrorKind::Mismatch { expected, found }, origin)
}

fn fail(kind: SolveErrorKind, origin: &Constraint) -> SolveError {
    SolveError {
        kind,
        site: origin.site,
        node: origin.node,
        index: 0,
    }
}

#[cfg(test)]
mod prop_tests;
#[cfg(test)]
mod tests;
