//! The type checker.
//!
//! `TypeChecker` walks the AST top-down. Statements and declarations are
//! handled directly; every *inference root* (an expression statement, a
//! variable declaration, a returned value, an `if` condition, a `switch`
//! scrutinee or case constant, a parameter default) goes through
//! generate → solve → write back, followed by the rules unification does not
//! express.
//!
//! # Inference root
//!
//! ```text
//! closures nested in the root      checked first, signatures recorded
//! generate                         goal + constraints + generator errors
//! call shapes                      arity (blocks solving) and labels
//! solve                            Substitution or SolveError
//! write back                       every goal, metas become Error
//! rules                            argument ranks, literal bounds, shifts,
//!                                  downcasts from Any
//! ```
//!
//! User errors never stop the walk; the node involved is typed `Error`.

mod calls;
mod result;
mod rules;
mod table;

use rustc_hash::FxHashMap;
use tracing::debug;
use trill_ir::{
    Ast, Closure, DataType, DeclId, FuncDecl, IfBranch, NodeId, NodeKind, ParamDecl, Span,
    SwitchCase, TypeFlags,
};

use crate::{
    ensure_sufficient_stack, match_rank, Constraint, ConstraintGenerator, ConstraintSite,
    InternalError, SemaContext, SolveError, SolveErrorKind, Solver, Substitution, TypeCheckError,
    TypeEnv, TypeErrorKind, TypeName,
};

pub use result::TypeCheckResult;
pub use table::TypeTable;

/// Type check every root of `ast`.
///
/// User errors are collected in the result; `Err` means an earlier pass
/// handed over a malformed tree.
#[tracing::instrument(level = "debug", skip_all, fields(nodes = ast.len()))]
pub fn check_ast<C: SemaContext + ?Sized>(
    ast: &Ast,
    ctx: &C,
) -> Result<TypeCheckResult, InternalError> {
    let mut checker = TypeChecker::new(ctx, ast);
    for &root in ast.roots() {
        checker.check_node(root)?;
    }
    let result = checker.finish();
    debug!(errors = result.errors.len(), "type checking finished");
    Ok(result)
}

/// Innermost function or closure being checked.
struct FnScope {
    /// Declared return type, refined by the first concrete `return` when it
    /// starts out unresolved.
    ret: DataType,
    params: Vec<DataType>,
}

pub struct TypeChecker<'a, C: SemaContext + ?Sized> {
    ctx: &'a C,
    ast: &'a Ast,
    env: TypeEnv,
    generator: ConstraintGenerator<'a, C>,
    types: TypeTable,
    callees: FxHashMap<NodeId, DeclId>,
    errors: Vec<TypeCheckError>,
    scopes: Vec<FnScope>,
}

impl<'a, C: SemaContext + ?Sized> TypeChecker<'a, C> {
    pub fn new(ctx: &'a C, ast: &'a Ast) -> Self {
        TypeChecker {
            ctx,
            ast,
            env: TypeEnv::new(),
            generator: ConstraintGenerator::new(ctx),
            types: TypeTable::with_capacity(ast.len()),
            callees: FxHashMap::default(),
            errors: Vec::new(),
            scopes: Vec::new(),
        }
    }

    pub fn finish(self) -> TypeCheckResult {
        TypeCheckResult {
            types: self.types,
            callees: self.callees,
            errors: self.errors,
        }
    }

    /// Check one declaration or statement, or an expression statement.
    pub fn check_node(&mut self, id: NodeId) -> Result<(), InternalError> {
        let ast = self.ast;
        match ast.kind(id) {
            NodeKind::Func(func) => self.check_func(id, func),
            NodeKind::Param(param) => self.check_param(id, param),
            NodeKind::VarDecl(decl) => {
                let ty = self.infer_root(id, None)?;
                if let (Some(annotation), Some(init)) = (&decl.annotation, decl.init) {
                    self.check_downcast(annotation, init, ast.span(init), &[]);
                }
                self.env.bind(decl.name, ty);
                Ok(())
            }
            NodeKind::Block(stmts) => {
                let child = self.env.child();
                let outer = std::mem::replace(&mut self.env, child);
                let result = stmts.iter().try_for_each(|&stmt| self.check_node(stmt));
                self.env = outer;
                result
            }
            NodeKind::If {
                branches,
                else_block,
            } => self.check_if(branches, *else_block),
            NodeKind::Return(value) => self.check_return(id, *value),
            NodeKind::Switch {
                value,
                cases,
                default,
            } => self.check_switch(*value, cases, *default),
            _ => self.infer_root(id, None).map(drop),
        }
    }

    fn check_func(&mut self, id: NodeId, func: &FuncDecl) -> Result<(), InternalError> {
        let child = self.env.child();
        let outer = std::mem::replace(&mut self.env, child);
        let params = self.bind_params(&func.params)?;
        self.scopes.push(FnScope {
            ret: func.ret.clone(),
            params,
        });
        let body = func.body.map_or(Ok(()), |body| self.check_node(body));
        let scope = self.pop_scope();
        self.env = outer;
        body?;

        let ty = DataType::Function {
            args: scope.params,
            ret: Box::new(scope.ret),
            variadic: func.variadic,
        };
        self.types.set(id, ty);
        Ok(())
    }

    fn check_closure(&mut self, id: NodeId, closure: &Closure) -> Result<(), InternalError> {
        let child = self.env.child();
        let outer = std::mem::replace(&mut self.env, child);
        let params = self.bind_params(&closure.params)?;
        self.scopes.push(FnScope {
            ret: closure.ret.clone(),
            params,
        });
        let body = self.check_node(closure.body);
        let scope = self.pop_scope();
        self.env = outer;
        body?;

        let sig = DataType::function(scope.params, scope.ret);
        debug!(closure = ?id, ?sig, "closure signature");
        self.types.set(id, sig.clone());
        self.generator.record_closure(id, sig);
        Ok(())
    }

    fn bind_params(&mut self, params: &[NodeId]) -> Result<Vec<DataType>, InternalError> {
        let ast = self.ast;
        params
            .iter()
            .map(|&param| match ast.kind(param) {
                NodeKind::Param(decl) => {
                    self.check_param(param, decl)?;
                    Ok(decl.ty.clone())
                }
                kind => Err(InternalError::UnexpectedNode {
                    kind: if kind.is_expr() { "expression" } else { "statement" },
                    span: ast.span(param),
                }),
            })
            .collect()
    }

    fn check_param(&mut self, id: NodeId, param: &ParamDecl) -> Result<(), InternalError> {
        self.types.set(id, param.ty.clone());
        if let Some(default) = param.default {
            let found = self.infer_root(default, Some(&param.ty))?;
            if match_rank(self.ctx, &param.ty, &found).is_none() {
                let kind = self.mismatch(&param.ty, &found);
                self.error(kind, self.ast.span(default));
            }
        }
        self.env.bind(param.name, param.ty.clone());
        Ok(())
    }

    fn check_if(
        &mut self,
        branches: &[IfBranch],
        else_block: Option<NodeId>,
    ) -> Result<(), InternalError> {
        for branch in branches {
            let ty = self.infer_root(branch.condition, None)?;
            if ty.is_error() {
                return Ok(());
            }
            if self.ctx.canonical_type(&ty) != DataType::Bool {
                let got = self.type_name(&ty);
                let span = self.ast.span(branch.condition);
                self.errors.push(
                    TypeCheckError::new(TypeErrorKind::NonBoolCondition { got }, span)
                        .with_highlight(span),
                );
                return Ok(());
            }
        }
        for branch in branches {
            self.check_node(branch.block)?;
        }
        else_block.map_or(Ok(()), |block| self.check_node(block))
    }

    fn check_switch(
        &mut self,
        value: NodeId,
        cases: &[SwitchCase],
        default: Option<NodeId>,
    ) -> Result<(), InternalError> {
        let scrutinee = self.infer_root(value, None)?;
        for case in cases {
            let constant = self.infer_root(case.constant, None)?;
            if match_rank(self.ctx, &scrutinee, &constant).is_none() {
                let kind = self.mismatch(&scrutinee, &constant);
                let span = self.ast.span(case.constant);
                self.errors
                    .push(TypeCheckError::new(kind, span).with_highlight(span));
            }
            self.check_node(case.body)?;
        }
        default.map_or(Ok(()), |block| self.check_node(block))
    }

    fn check_return(&mut self, id: NodeId, value: Option<NodeId>) -> Result<(), InternalError> {
        let span = self.ast.span(id);
        let Some(expected) = self.scopes.last().map(|scope| scope.ret.clone()) else {
            // Top-level return: nothing to reconcile against.
            return value.map_or(Ok(()), |value| self.infer_root(value, None).map(drop));
        };

        let Some(value) = value else {
            if !expected.is_error() && self.ctx.canonical_type(&expected) != DataType::Void {
                let kind = self.mismatch(&expected, &DataType::Void);
                self.error(kind, span);
            }
            return Ok(());
        };

        if expected.is_unresolved() {
            // Learn the return type from this statement.
            let found = self.infer_root(value, None)?;
            if found.is_error() {
                return Ok(());
            }
            let params_resolved = self
                .scopes
                .last()
                .is_some_and(|scope| scope.params.iter().all(|p| !p.flags().has_var()));
            if found.flags().has_var() || !params_resolved {
                self.errors.push(
                    TypeCheckError::new(TypeErrorKind::AmbiguousExpressionType, span)
                        .with_highlight(span),
                );
                return Ok(());
            }
            if let Some(scope) = self.scopes.last_mut() {
                scope.ret = found;
            }
            return Ok(());
        }

        let mut found = self.infer_root(value, Some(&expected))?;
        if found.flags().contains(TypeFlags::HAS_TYPE_VAR) && !expected.flags().has_var() {
            self.types.propagate(self.ast, value, &expected);
            found = expected.clone();
        }
        if match_rank(self.ctx, &expected, &found).is_none() {
            let kind = self.mismatch(&expected, &found);
            self.errors
                .push(TypeCheckError::new(kind, span).with_highlight(self.ast.span(value)));
        }
        Ok(())
    }

    /// Infer, solve and record the types of the tree rooted at `root`.
    ///
    /// `context` is the type the surrounding construct expects. It is only
    /// used when the root's own constraints leave its type open.
    fn infer_root(
        &mut self,
        root: NodeId,
        context: Option<&DataType>,
    ) -> Result<DataType, InternalError> {
        let ast = self.ast;
        let nodes = self.root_nodes(root);
        for &id in &nodes {
            if let NodeKind::Closure(closure) = ast.kind(id) {
                self.check_closure(id, closure)?;
            }
        }

        self.generator.reset(self.env.clone());
        let generated = self.generator.generate(ast, root)?;
        let generator_failed = !generated.errors.is_empty();
        self.errors.extend(generated.errors);

        let shapes_ok = self.check_call_shapes(&nodes, &generated.goals, &generated.callees);
        self.callees.extend(generated.callees);
        if !shapes_ok {
            self.poison(generated.goals.keys().copied());
            self.check_rules(&nodes);
            return Ok(DataType::Error);
        }

        let mut constraints = generated.constraints;
        let solver = Solver::new(self.ctx);
        let mut solution = solver.solve(&constraints);
        if let Some(context) = context {
            let open = solution.as_ref().is_ok_and(|partial| {
                partial
                    .apply(&generated.goal)
                    .flags()
                    .contains(TypeFlags::HAS_META_VAR)
            });
            if open {
                // Push the expected type down onto the root.
                constraints.push(Constraint::equal(
                    context.clone(),
                    generated.goal.clone(),
                    ConstraintSite::FunctionReturn,
                    Some(root),
                ));
                let push_down = &constraints[constraints.len() - 1..];
                solution = solution.and_then(|partial| solver.solve_from(push_down, partial));
            }
        }

        let solution = match solution {
            Ok(solution) => solution,
            Err(err) => {
                debug!(%err, "constraint system failed");
                self.report_solve_error(root, &err);
                self.poison(generated.goals.keys().copied());
                self.check_rules(&nodes);
                return Ok(DataType::Error);
            }
        };

        self.write_back(&generated.goals, &solution);
        if !self.check_bool_operands(&nodes) {
            self.poison(generated.goals.keys().copied());
            self.check_rules(&nodes);
            return Ok(DataType::Error);
        }
        let mut goal = solution.apply(&generated.goal);
        if goal.flags().contains(TypeFlags::HAS_META_VAR) {
            if !generator_failed {
                let span = ast.span(root);
                self.errors.push(
                    TypeCheckError::new(TypeErrorKind::AmbiguousExpressionType, span)
                        .with_highlight(span),
                );
            }
            goal = DataType::Error;
        }
        self.types.set(root, goal.clone());

        self.check_rules(&nodes);
        Ok(goal)
    }

    /// Nodes of the tree rooted at `root` in pre-order. Closures are
    /// included but their bodies belong to their own roots.
    fn root_nodes(&self, root: NodeId) -> Vec<NodeId> {
        fn collect(ast: &Ast, id: NodeId, out: &mut Vec<NodeId>) {
            out.push(id);
            let kind = ast.kind(id);
            if !matches!(kind, NodeKind::Closure(_)) {
                ensure_sufficient_stack(|| kind.for_each_child(|child| collect(ast, child, out)));
            }
        }
        let mut out = Vec::new();
        collect(self.ast, root, &mut out);
        out
    }

    fn write_back(&mut self, goals: &FxHashMap<NodeId, DataType>, solution: &Substitution) {
        for (&id, goal) in goals {
            self.types.set(id, solution.apply(goal));
        }
    }

    fn poison(&mut self, nodes: impl Iterator<Item = NodeId>) {
        for id in nodes {
            self.types.set(id, DataType::Error);
        }
    }

    fn report_solve_error(&mut self, root: NodeId, err: &SolveError) {
        let span = err.node.map_or_else(|| self.ast.span(root), |node| self.ast.span(node));
        let kind = match &err.kind {
            SolveErrorKind::Mismatch { found, .. } if err.site == ConstraintSite::TernaryCondition => {
                TypeErrorKind::NonBoolTernary {
                    got: self.type_name(found),
                }
            }
            SolveErrorKind::Mismatch { found, .. } if err.site == ConstraintSite::LogicalNot => {
                TypeErrorKind::InvalidPrefixOperand {
                    op: "!",
                    ty: self.type_name(found),
                }
            }
            SolveErrorKind::Mismatch { expected, found } => self.mismatch(expected, found),
            SolveErrorKind::InfiniteType { var, ty } => TypeErrorKind::InfiniteType {
                var: self.type_name(var),
                ty: self.type_name(ty),
            },
            SolveErrorKind::Ambiguous { .. } => TypeErrorKind::AmbiguousExpressionType,
            SolveErrorKind::MissingConformanceDecl { ty, protocol } => {
                TypeErrorKind::MissingConformanceDecl {
                    ty: self.type_name(ty),
                    protocol: self.type_name(protocol),
                }
            }
            SolveErrorKind::DoesNotConform { ty, protocol } => TypeErrorKind::DoesNotConform {
                ty: self.type_name(ty),
                protocol: self.type_name(protocol),
            },
        };
        self.errors.push(
            TypeCheckError::new(kind, span)
                .with_highlight(span)
                .with_note(format!("while solving the {} constraint", err.site)),
        );
    }

    fn pop_scope(&mut self) -> FnScope {
        self.scopes.pop().unwrap_or(FnScope {
            ret: DataType::Error,
            params: Vec::new(),
        })
    }

    fn mismatch(&self, expected: &DataType, found: &DataType) -> TypeErrorKind {
        TypeErrorKind::TypeMismatch {
            expected: self.type_name(expected),
            found: self.type_name(found),
        }
    }

    fn type_name(&self, ty: &DataType) -> TypeName {
        TypeName::of(ty, self.ctx.interner())
    }

    fn error(&mut self, kind: TypeErrorKind, span: Span) {
        self.errors.push(TypeCheckError::new(kind, span));
    }

    /// Recorded type of `id`, `Error` if it has none.
    fn type_of(&self, id: NodeId) -> DataType {
        self.types.get(id).cloned().unwrap_or(DataType::Error)
    }
}

#[cfg(test)]
mod tests;
