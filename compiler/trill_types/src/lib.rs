//! Type inference and checking for Trill.
//!
//! A Hindley-Milner style generator/solver pair assigns a type to every
//! expression and declaration of an [`Ast`](trill_ir::Ast); the checker then
//! enforces the rules unification cannot express (argument labels, literal
//! bounds, Bool conditions, shift widths, return reconciliation).
//!
//! # Pipeline
//!
//! For every inference root the checker:
//! 1. resets the [`ConstraintGenerator`] with the current [`TypeEnv`]
//! 2. generates a goal type and an ordered [`ConstraintSystem`]
//! 3. solves it with the [`Solver`] into a [`Substitution`]
//! 4. writes the substituted goals into the [`TypeTable`]
//!
//! Errors never abort the pass: the affected node gets [`DataType::Error`]
//! and checking continues. Only [`InternalError`]s, which mean an earlier pass
//! broke its contract, end the pass early.
//!
//! [`DataType::Error`]: trill_ir::DataType::Error

mod check;
mod constraint;
mod context;
mod env;
mod error;
mod generate;
mod rank;
mod solve;
mod stack;
mod subst;

pub use check::{check_ast, TypeCheckResult, TypeChecker, TypeTable};
pub use constraint::{Constraint, ConstraintKind, ConstraintSite, ConstraintSystem};
pub use context::{FunctionSignature, ParamSig, SemaContext, SymbolTable};
pub use env::TypeEnv;
pub use error::{InternalError, TypeCheckError, TypeErrorKind, TypeName};
pub use generate::{ConstraintGenerator, Generated};
pub use rank::{match_rank, MatchRank};
pub use solve::{SolveError, SolveErrorKind, Solver};
pub use stack::ensure_sufficient_stack;
pub use subst::Substitution;

use std::sync::Once;

static TRACING_INIT: Once = Once::new();

/// Initialize tracing for debug output.
///
/// Safe to call multiple times. Enable with `RUST_LOG=trill_types=debug`
/// or `RUST_LOG=trill_types=trace`.
pub fn init_tracing() {
    TRACING_INIT.call_once(|| {
        use tracing_subscriber::{fmt, prelude::*, EnvFilter};

        // Only initialize if RUST_LOG is set
        if std::env::var("RUST_LOG").is_ok() {
            let filter = EnvFilter::from_default_env();
            tracing_subscriber::registry()
                .with(fmt::layer().with_target(true).with_level(true))
                .with(filter)
                .init();
        }
    });
}
