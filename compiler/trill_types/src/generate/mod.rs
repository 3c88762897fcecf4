//! Constraint generation.
//!
//! The generator walks one inference root (an expression, or a variable
//! declaration) and produces its goal type together with an ordered
//! [`ConstraintSystem`]. Nothing is written back to the AST: the goal of
//! every visited node is recorded in [`Generated::goals`] and the checker
//! substitutes the solution into them.
//!
//! Two constructs solve eagerly while generating, over the constraints
//! gathered so far:
//! - an untyped declaration, to learn its type from the initializer
//! - a call to an overloaded name, to rank the candidates
//!
//! The eager solution is best effort. A constraint that fails to solve is
//! skipped there and reported by the checker's full solve.

mod overload;

use std::mem;

use rustc_hash::FxHashMap;
use tracing::{debug, trace};
use trill_ir::{
    Arg, Ast, Closure, DataType, DeclId, InfixOp, Name, NodeId, NodeKind, PrefixOp, Span,
    TypeVar, VarDecl, VarRef,
};

use crate::{
    ensure_sufficient_stack, Constraint, ConstraintSite, ConstraintSystem, FunctionSignature,
    InternalError, SemaContext, Solver, Substitution, TypeCheckError, TypeEnv, TypeErrorKind,
    TypeName,
};

/// Everything one generation run produced.
#[derive(Clone, Debug)]
pub struct Generated {
    /// Unsolved type of the root.
    pub goal: DataType,
    pub constraints: ConstraintSystem,
    /// Unsolved type of every visited node, root included.
    pub goals: FxHashMap<NodeId, DataType>,
    /// Call declarations resolved here rather than by the name resolver:
    /// overload choices and plain references to a single function.
    pub callees: FxHashMap<NodeId, DeclId>,
    /// Errors found while generating. The nodes involved have goal `Error`.
    pub errors: Vec<TypeCheckError>,
}

/// Overload set behind a placeholder reference.
#[derive(Clone, Debug)]
struct Overloaded {
    name: Name,
    candidates: Vec<DeclId>,
}

pub struct ConstraintGenerator<'a, C: SemaContext + ?Sized> {
    ctx: &'a C,
    env: TypeEnv,
    constraints: ConstraintSystem,
    goals: FxHashMap<NodeId, DataType>,
    callees: FxHashMap<NodeId, DeclId>,
    errors: Vec<TypeCheckError>,
    /// References that resolved to exactly one function declaration.
    functions: FxHashMap<NodeId, DeclId>,
    /// References to overloaded names still waiting for their call.
    overloaded: FxHashMap<NodeId, Overloaded>,
    /// Closure signatures refined by the checker. Kept across resets.
    closures: FxHashMap<NodeId, DataType>,
    /// Kept across resets so meta ids never repeat within a pass.
    next_meta: u32,
}

impl<'a, C: SemaContext + ?Sized> ConstraintGenerator<'a, C> {
    pub fn new(ctx: &'a C) -> Self {
        ConstraintGenerator {
            ctx,
            env: TypeEnv::new(),
            constraints: ConstraintSystem::new(),
            goals: FxHashMap::default(),
            callees: FxHashMap::default(),
            errors: Vec::new(),
            functions: FxHashMap::default(),
            overloaded: FxHashMap::default(),
            closures: FxHashMap::default(),
            next_meta: 0,
        }
    }

    /// Start a new root under `env`.
    pub fn reset(&mut self, env: TypeEnv) {
        self.env = env;
        self.constraints.clear();
        self.goals.clear();
        self.callees.clear();
        self.errors.clear();
        self.functions.clear();
        self.overloaded.clear();
    }

    /// Use `ty` as the type of closure `node` from now on.
    pub fn record_closure(&mut self, node: NodeId, ty: DataType) {
        self.closures.insert(node, ty);
    }

    /// A meta variable no other root has seen.
    pub fn fresh(&mut self) -> DataType {
        let id = self.next_meta;
        self.next_meta += 1;
        DataType::MetaVariable(TypeVar::new(id))
    }

    /// Generate constraints for `root`, handing back everything gathered
    /// since the last [`reset`](Self::reset).
    #[tracing::instrument(level = "trace", skip_all, fields(root = ?root))]
    pub fn generate(&mut self, ast: &Ast, root: NodeId) -> Result<Generated, InternalError> {
        let goal = self.visit(ast, root)?;
        trace!(constraints = self.constraints.len(), "generated");
        Ok(Generated {
            goal,
            constraints: mem::take(&mut self.constraints),
            goals: mem::take(&mut self.goals),
            callees: mem::take(&mut self.callees),
            errors: mem::take(&mut self.errors),
        })
    }

    fn visit(&mut self, ast: &Ast, id: NodeId) -> Result<DataType, InternalError> {
        let goal = ensure_sufficient_stack(|| self.visit_kind(ast, id))?;
        self.goals.insert(id, goal.clone());
        Ok(goal)
    }

    fn visit_kind(&mut self, ast: &Ast, id: NodeId) -> Result<DataType, InternalError> {
        let span = ast.span(id);
        match ast.kind(id) {
            NodeKind::Var(var) => self.visit_var(id, var, span),
            NodeKind::Literal(literal) => Ok(literal.ty.clone()),
            NodeKind::Call { callee, args, .. } => self.visit_call(ast, id, *callee, args),
            NodeKind::Infix {
                op, lhs, rhs, decl, ..
            } => self.visit_infix(ast, id, *op, *lhs, *rhs, *decl),
            NodeKind::Prefix { op, operand } => self.visit_prefix(ast, id, *op, *operand),
            NodeKind::Subscript { base, args, decl } => {
                self.visit_subscript(ast, id, *base, args, *decl)
            }
            NodeKind::Array(items) => {
                let element = self.fresh();
                let length = items.len();
                for &item in items {
                    let ty = self.visit(ast, item)?;
                    self.equal(element.clone(), ty, ConstraintSite::ArrayElement, item);
                }
                Ok(DataType::array(element, Some(length)))
            }
            NodeKind::Tuple(items) => {
                let fields = items
                    .iter()
                    .map(|&item| self.visit(ast, item))
                    .collect::<Result<Vec<_>, _>>()?;
                Ok(DataType::Tuple(fields))
            }
            NodeKind::Ternary {
                condition,
                then_branch,
                else_branch,
            } => {
                let cond = self.visit(ast, *condition)?;
                let then_ty = self.visit(ast, *then_branch)?;
                let else_ty = self.visit(ast, *else_branch)?;
                self.equal(DataType::Bool, cond, ConstraintSite::TernaryCondition, *condition);
                let ty = self.fresh();
                self.equal(ty.clone(), then_ty, ConstraintSite::TernaryBranch, *then_branch);
                self.equal(ty.clone(), else_ty, ConstraintSite::TernaryBranch, *else_branch);
                Ok(ty)
            }
            NodeKind::PropertyRef {
                base, decl, owner, ..
            } => self.visit_property(ast, id, *base, *decl, *owner),
            NodeKind::TupleField { base, index } => {
                let base_ty = self.visit(ast, *base)?;
                let resolved = self.ctx.canonical_type(&self.resolve(&base_ty));
                match resolved {
                    DataType::Tuple(fields) if *index < fields.len() => Ok(fields[*index].clone()),
                    DataType::Error => Ok(DataType::Error),
                    // No constraint can name a field of a type not yet known.
                    resolved if resolved.is_unresolved() => {
                        self.error(TypeErrorKind::AmbiguousExpressionType, span);
                        Ok(DataType::Error)
                    }
                    _ => {
                        let ty = self.type_name(&base_ty);
                        self.error(TypeErrorKind::NoTupleField { ty, index: *index }, span);
                        Ok(DataType::Error)
                    }
                }
            }
            NodeKind::Is { operand, .. } => {
                self.visit(ast, *operand)?;
                Ok(DataType::Bool)
            }
            NodeKind::Coerce { operand, ty } => {
                let operand_ty = self.visit(ast, *operand)?;
                let result = self.fresh();
                self.equal(result.clone(), ty.clone(), ConstraintSite::Coercion, id);
                if self.ctx.protocol_declaration(ty).is_some() {
                    let resolved = self.resolve(&operand_ty);
                    if !resolved.is_unresolved() && !resolved.is_error() {
                        self.constrain(Constraint::conforms(
                            resolved,
                            ty.clone(),
                            ConstraintSite::Conformance,
                            Some(*operand),
                        ));
                    }
                }
                Ok(result)
            }
            NodeKind::Paren(inner) => self.visit(ast, *inner),
            NodeKind::TypeRef(ty) => Ok(ty.clone()),
            NodeKind::Closure(closure) => self.visit_closure(ast, id, closure),
            NodeKind::VarDecl(decl) => self.visit_var_decl(ast, id, decl, span),
            kind => Err(InternalError::UnexpectedNode {
                kind: statement_name(kind),
                span,
            }),
        }
    }

    fn visit_var(&mut self, id: NodeId, var: &VarRef, span: Span) -> Result<DataType, InternalError> {
        if var.is_self {
            return var
                .self_ty
                .clone()
                .ok_or(InternalError::MissingSelfType { span });
        }
        if let Some(ty) = self.env.lookup(var.name) {
            return Ok(ty.clone());
        }
        let ctx = self.ctx;
        if let Some(global) = ctx.global(var.name) {
            return self.decl_type(global, span);
        }
        let decl = match (var.decl, ctx.overloads(var.name)) {
            // Several visible overloads are pinned down at the call site,
            // even when an earlier pass already picked one.
            (_, candidates @ [_, _, ..]) => {
                let placeholder = DataType::variadic_function(Vec::new(), self.fresh());
                self.overloaded.insert(
                    id,
                    Overloaded {
                        name: var.name,
                        candidates: candidates.to_vec(),
                    },
                );
                return Ok(placeholder);
            }
            (Some(decl), _) | (None, &[decl]) => decl,
            (None, []) => {
                return Err(InternalError::UnresolvedIdentifier {
                    name: ctx.interner().lookup(var.name).to_owned(),
                    span,
                })
            }
        };
        if ctx.function_signature(decl).is_some() {
            self.functions.insert(id, decl);
        }
        self.decl_type(decl, span)
    }

    fn visit_call(
        &mut self,
        ast: &Ast,
        id: NodeId,
        callee: NodeId,
        args: &[Arg],
    ) -> Result<DataType, InternalError> {
        let callee_ty = self.visit(ast, callee)?;
        let target = ast.unparen(callee);

        let mut arg_tys = Vec::with_capacity(args.len() + 1);
        if let NodeKind::PropertyRef { base, .. } = ast.kind(target) {
            // Method call: the receiver is the implicit first argument.
            let base_ty = self.goal(*base);
            arg_tys.push(self.resolve(&base_ty).root_type().clone());
        }
        for arg in args {
            arg_tys.push(self.visit(ast, arg.value)?);
        }

        let callee_ty = if let Some(overloaded) = self.overloaded.remove(&target) {
            let Some((decl, chosen)) = self.choose_overload(&overloaded, args, &arg_tys, ast.span(id))
            else {
                return Ok(DataType::Error);
            };
            self.equal(callee_ty, chosen.clone(), ConstraintSite::OverloadChoice, target);
            self.goals.insert(target, chosen.clone());
            self.callees.insert(id, decl);
            chosen
        } else {
            if let Some(&decl) = self.functions.get(&target) {
                self.callees.insert(id, decl);
            }
            callee_ty
        };

        let ret = self.fresh();
        self.equal(
            callee_ty,
            DataType::function(arg_tys, ret.clone()),
            ConstraintSite::CallCallee,
            id,
        );
        Ok(ret)
    }

    fn visit_infix(
        &mut self,
        ast: &Ast,
        id: NodeId,
        op: InfixOp,
        lhs: NodeId,
        rhs: NodeId,
        decl: Option<DeclId>,
    ) -> Result<DataType, InternalError> {
        let lhs_ty = self.visit(ast, lhs)?;
        let rhs_ty = self.visit(ast, rhs)?;

        if op == InfixOp::Assign {
            self.equal(lhs_ty, rhs_ty, ConstraintSite::Assignment, id);
            return Ok(DataType::Void);
        }

        let Some(decl) = decl else {
            let lhs_ty = self.resolve(&lhs_ty);
            let rhs_ty = self.resolve(&rhs_ty);
            if !lhs_ty.is_error() && !rhs_ty.is_error() {
                let kind = TypeErrorKind::InvalidBinOpArgs {
                    op: op.as_symbol(),
                    lhs: self.type_name(&lhs_ty),
                    rhs: self.type_name(&rhs_ty),
                };
                self.errors
                    .push(TypeCheckError::new(kind, ast.span(id)).with_highlight(ast.span(lhs)));
            }
            return Ok(DataType::Error);
        };

        let sig = self.signature(decl, ast.span(id))?;
        let ret = self.fresh();
        self.equal(
            sig.ty(),
            DataType::function(vec![lhs_ty.clone(), rhs_ty], ret.clone()),
            ConstraintSite::InfixOperator,
            id,
        );
        if op.is_assign() {
            self.equal(lhs_ty, ret, ConstraintSite::CompoundAssignment, id);
            return Ok(DataType::Void);
        }
        Ok(ret)
    }

    fn visit_prefix(
        &mut self,
        ast: &Ast,
        id: NodeId,
        op: PrefixOp,
        operand: NodeId,
    ) -> Result<DataType, InternalError> {
        let operand_ty = self.visit(ast, operand)?;
        match op {
            PrefixOp::AddressOf => Ok(DataType::pointer(operand_ty)),
            PrefixOp::Neg | PrefixOp::BitNot => Ok(operand_ty),
            PrefixOp::Not => {
                self.equal(DataType::Bool, operand_ty, ConstraintSite::LogicalNot, operand);
                Ok(DataType::Bool)
            }
            PrefixOp::Deref => {
                let resolved = self.resolve(&operand_ty);
                match self.ctx.canonical_type(&resolved) {
                    DataType::Pointer(pointee) => Ok(*pointee),
                    DataType::Error => Ok(DataType::Error),
                    canonical if canonical.is_unresolved() => {
                        let pointee = self.fresh();
                        self.equal(
                            DataType::pointer(pointee.clone()),
                            resolved,
                            ConstraintSite::Deref,
                            operand,
                        );
                        Ok(pointee)
                    }
                    _ => {
                        let ty = self.type_name(&resolved);
                        self.error(
                            TypeErrorKind::InvalidPrefixOperand {
                                op: op.as_symbol(),
                                ty,
                            },
                            ast.span(id),
                        );
                        Ok(DataType::Error)
                    }
                }
            }
        }
    }

    fn visit_subscript(
        &mut self,
        ast: &Ast,
        id: NodeId,
        base: NodeId,
        args: &[Arg],
        decl: Option<DeclId>,
    ) -> Result<DataType, InternalError> {
        let base_ty = self.visit(ast, base)?;
        let mut arg_tys = Vec::with_capacity(args.len() + 1);
        for arg in args {
            arg_tys.push(self.visit(ast, arg.value)?);
        }
        let span = ast.span(id);
        if args.is_empty() {
            self.error(TypeErrorKind::SubscriptWithNoArgs, span);
            return Ok(DataType::Error);
        }

        let resolved = self.resolve(&base_ty);
        let sig_ty = if let Some(decl) = decl {
            // Declared subscripts take the receiver first, like methods.
            arg_tys.insert(0, resolved.root_type().clone());
            self.signature(decl, span)?.ty()
        } else {
            match self.ctx.canonical_type(&resolved) {
                DataType::Pointer(element) | DataType::Array { element, .. } => self
                    .ctx
                    .synthesized_decl(vec![DataType::INT64], *element)
                    .ty(),
                DataType::Error => return Ok(DataType::Error),
                _ => {
                    let ty = self.type_name(&resolved);
                    self.error(TypeErrorKind::SubscriptWithInvalidType { ty }, span);
                    return Ok(DataType::Error);
                }
            }
        };

        let ret = self.fresh();
        self.equal(
            sig_ty,
            DataType::function(arg_tys, ret.clone()),
            ConstraintSite::Subscript,
            id,
        );
        Ok(ret)
    }

    fn visit_property(
        &mut self,
        ast: &Ast,
        id: NodeId,
        base: NodeId,
        decl: Option<DeclId>,
        owner: Option<DeclId>,
    ) -> Result<DataType, InternalError> {
        let base_ty = self.visit(ast, base)?;
        let span = ast.span(id);
        let (Some(decl), Some(owner)) = (decl, owner) else {
            return Err(InternalError::MissingPropertyDecl { span });
        };
        let owner_ty = self.decl_type(owner, span)?;
        let decl_ty = self.decl_type(decl, span)?;

        // Access through pointers reaches the pointee.
        let receiver = self.resolve(&base_ty).root_type().clone();
        self.equal(owner_ty, receiver, ConstraintSite::PropertyOwner, base);
        let result = self.fresh();
        self.equal(decl_ty, result.clone(), ConstraintSite::PropertyResult, id);
        Ok(result)
    }

    fn visit_closure(
        &mut self,
        ast: &Ast,
        id: NodeId,
        closure: &Closure,
    ) -> Result<DataType, InternalError> {
        if let Some(ty) = self.closures.get(&id) {
            return Ok(ty.clone());
        }
        let params = closure
            .params
            .iter()
            .map(|&param| match ast.kind(param) {
                NodeKind::Param(decl) => Ok(decl.ty.clone()),
                kind => Err(InternalError::UnexpectedNode {
                    kind: statement_name(kind),
                    span: ast.span(param),
                }),
            })
            .collect::<Result<Vec<_>, _>>()?;
        Ok(DataType::function(params, closure.ret.clone()))
    }

    fn visit_var_decl(
        &mut self,
        ast: &Ast,
        id: NodeId,
        decl: &VarDecl,
        span: Span,
    ) -> Result<DataType, InternalError> {
        match (&decl.annotation, decl.init) {
            (Some(annotation), Some(init)) => {
                self.env.bind(decl.name, annotation.clone());
                let init_ty = self.visit(ast, init)?;
                self.equal(annotation.clone(), init_ty, ConstraintSite::DeclAnnotation, init);
                Ok(annotation.clone())
            }
            (None, Some(init)) => {
                let binding = self.fresh();
                self.env.bind(decl.name, binding.clone());
                let init_ty = self.visit(ast, init)?;
                self.equal(binding.clone(), init_ty, ConstraintSite::DeclInitializer, init);
                let inferred = self.eager_solution().apply(&binding);
                debug!(node = ?id, ty = ?inferred, "eagerly solved declaration");
                Ok(inferred)
            }
            (Some(annotation), None) => Ok(annotation.clone()),
            (None, None) => {
                self.error(TypeErrorKind::AmbiguousExpressionType, span);
                Ok(DataType::Error)
            }
        }
    }

    // Helpers

    fn equal(&mut self, expected: DataType, found: DataType, site: ConstraintSite, node: NodeId) {
        self.constrain(Constraint::equal(expected, found, site, Some(node)));
    }

    fn constrain(&mut self, constraint: Constraint) {
        trace!(kind = ?constraint.kind, site = %constraint.site, "constrain");
        self.constraints.push(constraint);
    }

    /// Solve what has been gathered so far, skipping failures.
    fn eager_solution(&self) -> Substitution {
        let solver = Solver::new(self.ctx);
        let mut solution = Substitution::new();
        for constraint in &self.constraints {
            if let Ok(delta) = solver.solve_one(constraint, &solution) {
                solution.merge(delta);
            }
        }
        solution
    }

    /// `ty` under the eager solution.
    fn resolve(&self, ty: &DataType) -> DataType {
        if ty.flags().has_var() {
            self.eager_solution().apply(ty)
        } else {
            ty.clone()
        }
    }

    fn goal(&self, id: NodeId) -> DataType {
        self.goals.get(&id).cloned().unwrap_or(DataType::Error)
    }

    fn decl_type(&self, decl: DeclId, span: Span) -> Result<DataType, InternalError> {
        self.ctx
            .decl_type(decl)
            .ok_or(InternalError::UnknownDeclaration { span })
    }

    fn signature(&self, decl: DeclId, span: Span) -> Result<&'a FunctionSignature, InternalError> {
        let ctx = self.ctx;
        ctx.function_signature(decl)
            .ok_or(InternalError::UnknownDeclaration { span })
    }

    fn type_name(&self, ty: &DataType) -> TypeName {
        TypeName::of(ty, self.ctx.interner())
    }

    fn error(&mut self, kind: TypeErrorKind, span: Span) {
        self.errors.push(TypeCheckError::new(kind, span));
    }
}

fn statement_name(kind: &NodeKind) -> &'static str {
    match kind {
        NodeKind::Param(_) => "parameter",
        NodeKind::Func(_) => "function",
        NodeKind::Block(_) => "block",
        NodeKind::If { .. } => "if",
        NodeKind::Return(_) => "return",
        NodeKind::Switch { .. } => "switch",
        _ => "expression",
    }
}
