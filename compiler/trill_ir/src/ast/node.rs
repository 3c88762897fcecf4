//! Node kinds.
//!
//! One closed enum covers expressions, declarations and statements. Fields
//! named `decl` hold what the name resolver bound the node to; the type
//! checker only reads them.

use crate::{DataType, DeclId, Name, NodeId, Span};

use super::operators::{InfixOp, PrefixOp};

/// Reference to a variable, function or `self`.
#[derive(Clone, Eq, PartialEq, Hash, Debug)]
#[cfg_attr(feature = "cache", derive(serde::Serialize, serde::Deserialize))]
pub struct VarRef {
    pub name: Name,
    /// `self` inside a method; its type is `self_ty`.
    pub is_self: bool,
    pub self_ty: Option<DataType>,
    /// Function declaration the resolver picked, if any.
    pub decl: Option<DeclId>,
}

/// Literal value.
///
/// Integers are `i128` so that `18446744073709551615` and `-1` stay distinct.
/// Floats keep their bit pattern so the node stays `Eq + Hash`.
#[derive(Clone, Eq, PartialEq, Hash, Debug)]
#[cfg_attr(feature = "cache", derive(serde::Serialize, serde::Deserialize))]
pub enum LiteralKind {
    Int(i128),
    Float(u64),
    Bool(bool),
    Char(char),
    String(Name),
    Void,
    Nil,
}

/// A literal together with the type an earlier pass assigned to it.
#[derive(Clone, Eq, PartialEq, Hash, Debug)]
#[cfg_attr(feature = "cache", derive(serde::Serialize, serde::Deserialize))]
pub struct Literal {
    pub kind: LiteralKind,
    pub ty: DataType,
}

/// Call or subscript argument, optionally labelled (`f(x: 1)`).
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
#[cfg_attr(feature = "cache", derive(serde::Serialize, serde::Deserialize))]
pub struct Arg {
    pub label: Option<Name>,
    pub value: NodeId,
}

impl Arg {
    pub const fn positional(value: NodeId) -> Self {
        Arg { label: None, value }
    }

    pub const fn labelled(label: Name, value: NodeId) -> Self {
        Arg {
            label: Some(label),
            value,
        }
    }
}

#[derive(Clone, Eq, PartialEq, Hash, Debug)]
#[cfg_attr(feature = "cache", derive(serde::Serialize, serde::Deserialize))]
pub struct Closure {
    /// `Param` nodes.
    pub params: Vec<NodeId>,
    /// Declared return type; a type variable when omitted.
    pub ret: DataType,
    /// A `Block` node.
    pub body: NodeId,
}

#[derive(Clone, Eq, PartialEq, Hash, Debug)]
#[cfg_attr(feature = "cache", derive(serde::Serialize, serde::Deserialize))]
pub struct VarDecl {
    pub name: Name,
    pub annotation: Option<DataType>,
    pub init: Option<NodeId>,
    pub mutable: bool,
}

#[derive(Clone, Eq, PartialEq, Hash, Debug)]
#[cfg_attr(feature = "cache", derive(serde::Serialize, serde::Deserialize))]
pub struct ParamDecl {
    pub name: Name,
    /// External label callers must spell out, if any.
    pub label: Option<Name>,
    pub ty: DataType,
    /// The receiver of a method. Never written at call sites.
    pub implicit_self: bool,
    pub default: Option<NodeId>,
}

#[derive(Clone, Eq, PartialEq, Hash, Debug)]
#[cfg_attr(feature = "cache", derive(serde::Serialize, serde::Deserialize))]
pub struct FuncDecl {
    pub name: Name,
    /// `Param` nodes.
    pub params: Vec<NodeId>,
    pub ret: DataType,
    pub variadic: bool,
    /// `None` for foreign declarations.
    pub body: Option<NodeId>,
}

#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
#[cfg_attr(feature = "cache", derive(serde::Serialize, serde::Deserialize))]
pub struct IfBranch {
    pub condition: NodeId,
    pub block: NodeId,
}

#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
#[cfg_attr(feature = "cache", derive(serde::Serialize, serde::Deserialize))]
pub struct SwitchCase {
    pub constant: NodeId,
    pub body: NodeId,
}

/// Node variants.
#[derive(Clone, Eq, PartialEq, Hash, Debug)]
#[cfg_attr(feature = "cache", derive(serde::Serialize, serde::Deserialize))]
pub enum NodeKind {
    // Expressions
    Var(VarRef),
    Literal(Literal),
    Call {
        callee: NodeId,
        args: Vec<Arg>,
        decl: Option<DeclId>,
    },
    Infix {
        op: InfixOp,
        lhs: NodeId,
        rhs: NodeId,
        decl: Option<DeclId>,
        op_span: Span,
    },
    Prefix {
        op: PrefixOp,
        operand: NodeId,
    },
    Subscript {
        base: NodeId,
        args: Vec<Arg>,
        decl: Option<DeclId>,
    },
    Array(Vec<NodeId>),
    Tuple(Vec<NodeId>),
    Ternary {
        condition: NodeId,
        then_branch: NodeId,
        else_branch: NodeId,
    },
    PropertyRef {
        base: NodeId,
        name: Name,
        decl: Option<DeclId>,
        /// The type declaration that owns the property.
        owner: Option<DeclId>,
    },
    TupleField {
        base: NodeId,
        index: usize,
    },
    Is {
        operand: NodeId,
        ty: DataType,
    },
    Coerce {
        operand: NodeId,
        ty: DataType,
    },
    Paren(NodeId),
    TypeRef(DataType),
    Closure(Closure),

    // Declarations
    VarDecl(VarDecl),
    Param(ParamDecl),
    Func(FuncDecl),

    // Statements
    Block(Vec<NodeId>),
    If {
        branches: Vec<IfBranch>,
        else_block: Option<NodeId>,
    },
    Return(Option<NodeId>),
    Switch {
        value: NodeId,
        cases: Vec<SwitchCase>,
        default: Option<NodeId>,
    },
}

impl NodeKind {
    /// Whether this node produces a value.
    pub fn is_expr(&self) -> bool {
        !matches!(
            self,
            NodeKind::VarDecl(_)
                | NodeKind::Param(_)
                | NodeKind::Func(_)
                | NodeKind::Block(_)
                | NodeKind::If { .. }
                | NodeKind::Return(_)
                | NodeKind::Switch { .. }
        )
    }

    /// Visit direct children in source order.
    pub fn for_each_child(&self, mut f: impl FnMut(NodeId)) {
        match self {
            NodeKind::Var(_) | NodeKind::Literal(_) | NodeKind::TypeRef(_) => {}
            NodeKind::Call { callee, args, .. } => {
                f(*callee);
                args.iter().for_each(|a| f(a.value));
            }
            NodeKind::Infix { lhs, rhs, .. } => {
                f(*lhs);
                f(*rhs);
            }
            NodeKind::Prefix { operand, .. }
            | NodeKind::Is { operand, .. }
            | NodeKind::Coerce { operand, .. }
            | NodeKind::Paren(operand) => f(*operand),
            NodeKind::Subscript { base, args, .. } => {
                f(*base);
                args.iter().for_each(|a| f(a.value));
            }
            NodeKind::Array(items) | NodeKind::Tuple(items) | NodeKind::Block(items) => {
                items.iter().copied().for_each(f);
            }
            NodeKind::Ternary {
                condition,
                then_branch,
                else_branch,
            } => {
                f(*condition);
                f(*then_branch);
                f(*else_branch);
            }
            NodeKind::PropertyRef { base, .. } | NodeKind::TupleField { base, .. } => f(*base),
            NodeKind::Closure(closure) => {
                closure.params.iter().copied().for_each(&mut f);
                f(closure.body);
            }
            NodeKind::VarDecl(decl) => decl.init.iter().copied().for_each(f),
            NodeKind::Param(param) => param.default.iter().copied().for_each(f),
            NodeKind::Func(func) => {
                func.params.iter().copied().for_each(&mut f);
                func.body.iter().copied().for_each(f);
            }
            NodeKind::If {
                branches,
                else_block,
            } => {
                for branch in branches {
                    f(branch.condition);
                    f(branch.block);
                }
                else_block.iter().copied().for_each(f);
            }
            NodeKind::Return(value) => value.iter().copied().for_each(f),
            NodeKind::Switch {
                value,
                cases,
                default,
            } => {
                f(*value);
                for case in cases {
                    f(case.constant);
                    f(case.body);
                }
                default.iter().copied().for_each(f);
            }
        }
    }
}
