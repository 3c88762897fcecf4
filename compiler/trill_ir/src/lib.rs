//! Trill IR - syntax tree and type model shared by the front-end passes.
//!
//! This crate contains the data the type checker consumes and produces:
//! - Spans for source locations
//! - Interned identifiers (`Name`) and the `StringInterner`
//! - Stable ids for AST nodes, declarations and type variables
//! - The closed `DataType` model
//! - The flat, immutable AST (`Ast` arena of `Node`s)
//!
//! # Design Philosophy
//!
//! - **Intern Everything**: identifiers are `Name(u32)`
//! - **Flatten Everything**: no `Box<Node>`, children are `NodeId(u32)` indices
//! - **Immutable Trees**: passes never write into nodes; inferred types live in
//!   side tables keyed by `NodeId`

/// Compile-time assertion that a type has a specific size.
///
/// Used to prevent accidental size regressions in frequently-allocated types.
#[macro_export]
macro_rules! static_assert_size {
    ($ty:ty, $size:expr) => {
        const _: [(); $size] = [(); ::std::mem::size_of::<$ty>()];
    };
}

pub mod ast;
mod data_type;
mod flags;
mod ids;
mod interner;
mod name;
mod span;

pub use ast::{
    Arg, Ast, AstBuilder, Closure, FuncDecl, IfBranch, InfixOp, Literal, LiteralKind, Node,
    NodeKind, ParamDecl, PrefixOp, SwitchCase, VarDecl, VarRef,
};
pub use data_type::{DataType, TypeDisplay, VarKey};
pub use flags::TypeFlags;
pub use ids::{DeclId, NodeId, TypeVar};
pub use interner::{InternError, StringInterner};
pub use name::Name;
pub use span::{Span, SpanError};
