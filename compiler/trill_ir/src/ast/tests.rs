use super::*;
use crate::{DataType, DeclId, Name, StringInterner};
use pretty_assertions::assert_eq;

#[test]
fn builder_assigns_distinct_spans() {
    let mut b = AstBuilder::new();
    let one = b.int(1, DataType::INT64);
    let two = b.int(2, DataType::INT64);
    let ast = b.finish();

    assert_ne!(ast.span(one), ast.span(two));
    assert_eq!(ast.len(), 2);
    assert!(ast.roots().is_empty());
}

#[test]
fn push_at_keeps_explicit_span() {
    let mut b = AstBuilder::new();
    let id = b.push_at(NodeKind::TypeRef(DataType::Bool), Span::new(10, 14));
    b.root(id);
    let ast = b.finish();

    assert_eq!(ast.span(id), Span::new(10, 14));
    assert_eq!(ast.roots(), &[id]);
}

#[test]
fn unparen_strips_nested_parens() {
    let mut b = AstBuilder::new();
    let inner = b.bool(true);
    let p1 = b.paren(inner);
    let p2 = b.paren(p1);
    let ast = b.finish();

    assert_eq!(ast.unparen(p2), inner);
    assert_eq!(ast.unparen(inner), inner);
}

#[test]
fn walk_visits_in_preorder() {
    let interner = StringInterner::new();
    let f = interner.intern("f");
    let mut b = AstBuilder::new();
    let callee = b.func_ref(f, DeclId::new(0));
    let a = b.int(1, DataType::INT64);
    let c = b.int(2, DataType::INT64);
    let call = b.call(callee, vec![Arg::positional(a), Arg::positional(c)], None);
    let stmt = b.ret(Some(call));
    let ast = b.finish();

    let mut seen = Vec::new();
    ast.walk(stmt, &mut |id| seen.push(id));
    assert_eq!(seen, vec![stmt, call, callee, a, c]);
}

#[test]
fn optional_children_are_visited() {
    let mut b = AstBuilder::new();
    let cond = b.bool(true);
    let then = b.block(vec![]);
    let otherwise = b.block(vec![]);
    let if_stmt = b.if_stmt(
        vec![IfBranch {
            condition: cond,
            block: then,
        }],
        Some(otherwise),
    );
    let value = b.int(1, DataType::INT64);
    let ret = b.ret(Some(value));
    let subject = b.int(2, DataType::INT64);
    let constant = b.int(3, DataType::INT64);
    let body = b.block(vec![]);
    let default = b.block(vec![]);
    let switch = b.switch(subject, vec![SwitchCase { constant, body }], Some(default));
    let ast = b.finish();

    let children = |id| {
        let mut seen = Vec::new();
        ast.kind(id).for_each_child(|child| seen.push(child));
        seen
    };
    assert_eq!(children(if_stmt), vec![cond, then, otherwise]);
    assert_eq!(children(ret), vec![value]);
    assert_eq!(children(switch), vec![subject, constant, body, default]);
}

#[test]
fn statements_are_not_expressions() {
    let mut b = AstBuilder::new();
    let lit = b.void();
    let block = b.block(vec![lit]);
    let ast = b.finish();

    assert!(ast.kind(lit).is_expr());
    assert!(!ast.kind(block).is_expr());
}

#[test]
fn foreign_ids_are_rejected_by_get() {
    let ast = AstBuilder::new().finish();
    assert!(ast.get(crate::NodeId::new(3)).is_none());
    assert!(ast.is_empty());
}

#[test]
fn infix_op_classification() {
    assert!(InfixOp::Assign.is_assign());
    assert!(InfixOp::ShlAssign.is_assign());
    assert!(InfixOp::ShlAssign.is_shift());
    assert!(InfixOp::Shr.is_shift());
    assert!(!InfixOp::Shr.is_assign());
    assert!(!InfixOp::Add.is_shift());
    assert_eq!(InfixOp::ShrAssign.as_symbol(), ">>=");
    assert_eq!(PrefixOp::AddressOf.as_symbol(), "&");
}

#[test]
fn labelled_args() {
    let label = Name::from_raw(4);
    let mut b = AstBuilder::new();
    let v = b.bool(false);
    assert_eq!(Arg::labelled(label, v).label, Some(label));
    assert_eq!(Arg::positional(v).label, None);
}
