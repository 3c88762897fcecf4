//! Arena builder.
//!
//! The parser allocates through `push_at` with real spans. The shorthand
//! constructors give each node a distinct one-byte span derived from its
//! index, which keeps diagnostics ordered and distinct for synthesized trees.

use crate::{DataType, DeclId, Name, NodeId, Span};

use super::node::{
    Arg, Closure, FuncDecl, IfBranch, Literal, LiteralKind, NodeKind, ParamDecl, SwitchCase,
    VarDecl, VarRef,
};
use super::operators::{InfixOp, PrefixOp};
use super::{Ast, Node};

/// Builds an [`Ast`].
#[derive(Default)]
pub struct AstBuilder {
    nodes: Vec<Node>,
    roots: Vec<NodeId>,
}

impl AstBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Allocate a node with an explicit span.
    ///
    /// # Panics
    /// Panics if the arena exceeds `u32::MAX` nodes.
    pub fn push_at(&mut self, kind: NodeKind, span: Span) -> NodeId {
        let index = u32::try_from(self.nodes.len())
            .unwrap_or_else(|_| panic!("AST arena exceeded u32::MAX nodes"));
        self.nodes.push(Node::new(kind, span));
        NodeId::new(index)
    }

    /// Allocate a node with a synthetic span.
    pub fn push(&mut self, kind: NodeKind) -> NodeId {
        let start = u32::try_from(self.nodes.len()).unwrap_or(u32::MAX - 1);
        self.push_at(kind, Span::new(start, start + 1))
    }

    /// Mark `id` as a top-level node.
    pub fn root(&mut self, id: NodeId) -> NodeId {
        self.roots.push(id);
        id
    }

    pub fn finish(self) -> Ast {
        Ast {
            nodes: self.nodes,
            roots: self.roots,
        }
    }

    // Literals

    pub fn literal(&mut self, kind: LiteralKind, ty: DataType) -> NodeId {
        self.push(NodeKind::Literal(Literal { kind, ty }))
    }

    pub fn int(&mut self, value: i128, ty: DataType) -> NodeId {
        self.literal(LiteralKind::Int(value), ty)
    }

    pub fn float(&mut self, value: f64, ty: DataType) -> NodeId {
        self.literal(LiteralKind::Float(value.to_bits()), ty)
    }

    pub fn bool(&mut self, value: bool) -> NodeId {
        self.literal(LiteralKind::Bool(value), DataType::Bool)
    }

    pub fn string(&mut self, value: Name, ty: DataType) -> NodeId {
        self.literal(LiteralKind::String(value), ty)
    }

    pub fn void(&mut self) -> NodeId {
        self.literal(LiteralKind::Void, DataType::Void)
    }

    // Expressions

    pub fn var(&mut self, name: Name) -> NodeId {
        self.push(NodeKind::Var(VarRef {
            name,
            is_self: false,
            self_ty: None,
            decl: None,
        }))
    }

    /// Reference to a function the resolver already bound.
    pub fn func_ref(&mut self, name: Name, decl: DeclId) -> NodeId {
        self.push(NodeKind::Var(VarRef {
            name,
            is_self: false,
            self_ty: None,
            decl: Some(decl),
        }))
    }

    pub fn self_ref(&mut self, name: Name, ty: DataType) -> NodeId {
        self.push(NodeKind::Var(VarRef {
            name,
            is_self: true,
            self_ty: Some(ty),
            decl: None,
        }))
    }

    pub fn call(&mut self, callee: NodeId, args: Vec<Arg>, decl: Option<DeclId>) -> NodeId {
        self.push(NodeKind::Call { callee, args, decl })
    }

    pub fn infix(
        &mut self,
        op: InfixOp,
        lhs: NodeId,
        rhs: NodeId,
        decl: Option<DeclId>,
    ) -> NodeId {
        let start = u32::try_from(self.nodes.len()).unwrap_or(u32::MAX - 1);
        self.push(NodeKind::Infix {
            op,
            lhs,
            rhs,
            decl,
            op_span: Span::new(start, start + 1),
        })
    }

    pub fn prefix(&mut self, op: PrefixOp, operand: NodeId) -> NodeId {
        self.push(NodeKind::Prefix { op, operand })
    }

    pub fn subscript(&mut self, base: NodeId, args: Vec<Arg>, decl: Option<DeclId>) -> NodeId {
        self.push(NodeKind::Subscript { base, args, decl })
    }

    pub fn array(&mut self, items: Vec<NodeId>) -> NodeId {
        self.push(NodeKind::Array(items))
    }

    pub fn tuple(&mut self, items: Vec<NodeId>) -> NodeId {
        self.push(NodeKind::Tuple(items))
    }

    pub fn ternary(&mut self, condition: NodeId, then_branch: NodeId, else_branch: NodeId) -> NodeId {
        self.push(NodeKind::Ternary {
            condition,
            then_branch,
            else_branch,
        })
    }

    pub fn property(
        &mut self,
        base: NodeId,
        name: Name,
        decl: Option<DeclId>,
        owner: Option<DeclId>,
    ) -> NodeId {
        self.push(NodeKind::PropertyRef {
            base,
            name,
            decl,
            owner,
        })
    }

    pub fn tuple_field(&mut self, base: NodeId, index: usize) -> NodeId {
        self.push(NodeKind::TupleField { base, index })
    }

    pub fn is(&mut self, operand: NodeId, ty: DataType) -> NodeId {
        self.push(NodeKind::Is { operand, ty })
    }

    pub fn coerce(&mut self, operand: NodeId, ty: DataType) -> NodeId {
        self.push(NodeKind::Coerce { operand, ty })
    }

    pub fn paren(&mut self, inner: NodeId) -> NodeId {
        self.push(NodeKind::Paren(inner))
    }

    pub fn type_ref(&mut self, ty: DataType) -> NodeId {
        self.push(NodeKind::TypeRef(ty))
    }

    pub fn closure(&mut self, params: Vec<NodeId>, ret: DataType, body: NodeId) -> NodeId {
        self.push(NodeKind::Closure(Closure { params, ret, body }))
    }

    // Declarations

    pub fn var_decl(
        &mut self,
        name: Name,
        annotation: Option<DataType>,
        init: Option<NodeId>,
    ) -> NodeId {
        self.push(NodeKind::VarDecl(VarDecl {
            name,
            annotation,
            init,
            mutable: true,
        }))
    }

    pub fn param(&mut self, name: Name, label: Option<Name>, ty: DataType) -> NodeId {
        self.push(NodeKind::Param(ParamDecl {
            name,
            label,
            ty,
            implicit_self: false,
            default: None,
        }))
    }

    pub fn func(
        &mut self,
        name: Name,
        params: Vec<NodeId>,
        ret: DataType,
        body: Option<NodeId>,
    ) -> NodeId {
        self.push(NodeKind::Func(FuncDecl {
            name,
            params,
            ret,
            variadic: false,
            body,
        }))
    }

    // Statements

    pub fn block(&mut self, stmts: Vec<NodeId>) -> NodeId {
        self.push(NodeKind::Block(stmts))
    }

    pub fn if_stmt(&mut self, branches: Vec<IfBranch>, else_block: Option<NodeId>) -> NodeId {
        self.push(NodeKind::If {
            branches,
            else_block,
        })
    }

    pub fn ret(&mut self, value: Option<NodeId>) -> NodeId {
        self.push(NodeKind::Return(value))
    }

    pub fn switch(
        &mut self,
        value: NodeId,
        cases: Vec<SwitchCase>,
        default: Option<NodeId>,
    ) -> NodeId {
        self.push(NodeKind::Switch {
            value,
            cases,
            default,
        })
    }
}
