//! Flat AST.
//!
//! - No `Box<Node>`: children are `NodeId(u32)` indices into one arena
//! - The tree is immutable once built; passes keep their results in side
//!   tables keyed by `NodeId`
//!
//! # Module Structure
//!
//! - `node`: `NodeKind` and its payload structs
//! - `operators`: infix and prefix operators
//! - `builder`: `AstBuilder` for constructing trees

mod builder;
mod node;
mod operators;

use std::fmt;

use crate::{NodeId, Span};

pub use builder::AstBuilder;
pub use node::{
    Arg, Closure, FuncDecl, IfBranch, Literal, LiteralKind, NodeKind, ParamDecl, SwitchCase,
    VarDecl, VarRef,
};
pub use operators::{InfixOp, PrefixOp};

/// A node with its source span.
#[derive(Clone, Eq, PartialEq, Hash)]
#[cfg_attr(feature = "cache", derive(serde::Serialize, serde::Deserialize))]
pub struct Node {
    pub kind: NodeKind,
    pub span: Span,
}

impl Node {
    pub fn new(kind: NodeKind, span: Span) -> Self {
        Node { kind, span }
    }
}

impl fmt::Debug for Node {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:?} @ {:?}", self.kind, self.span)
    }
}

/// Node arena for one source file.
#[derive(Clone, Eq, PartialEq, Debug, Default)]
#[cfg_attr(feature = "cache", derive(serde::Serialize, serde::Deserialize))]
pub struct Ast {
    nodes: Vec<Node>,
    /// Top-level declarations and statements, in source order.
    roots: Vec<NodeId>,
}

impl Ast {
    /// Get a node by id.
    ///
    /// # Panics
    /// Panics if `id` was not allocated in this arena.
    #[inline]
    #[track_caller]
    pub fn node(&self, id: NodeId) -> &Node {
        &self.nodes[id.index()]
    }

    /// Get a node by id, or `None` for a foreign id.
    #[inline]
    pub fn get(&self, id: NodeId) -> Option<&Node> {
        self.nodes.get(id.index())
    }

    #[inline]
    #[track_caller]
    pub fn kind(&self, id: NodeId) -> &NodeKind {
        &self.node(id).kind
    }

    #[inline]
    #[track_caller]
    pub fn span(&self, id: NodeId) -> Span {
        self.node(id).span
    }

    pub fn roots(&self) -> &[NodeId] {
        &self.roots
    }

    /// Number of nodes in the arena.
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Strip any number of parentheses.
    pub fn unparen(&self, mut id: NodeId) -> NodeId {
        while let NodeKind::Paren(inner) = self.kind(id) {
            id = *inner;
        }
        id
    }

    /// Pre-order walk of the subtree rooted at `id`, including `id`.
    pub fn walk(&self, id: NodeId, f: &mut impl FnMut(NodeId)) {
        f(id);
        self.kind(id)
            .for_each_child(|child| self.walk(child, &mut *f));
    }
}

#[cfg(test)]
mod tests;
