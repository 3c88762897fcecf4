use super::*;
use pretty_assertions::assert_eq;
use trill_diagnostic::DiagnosticQueue;
use trill_ir::{AstBuilder, TypeVar};

fn meta(id: u32) -> DataType {
    DataType::MetaVariable(TypeVar::new(id))
}

#[test]
fn table_stores_error_for_open_types() {
    let mut table = TypeTable::new();
    table.set(NodeId::new(0), DataType::INT32);
    table.set(NodeId::new(3), DataType::pointer(meta(0)));

    assert_eq!(table.get(NodeId::new(0)), Some(&DataType::INT32));
    assert_eq!(table.get(NodeId::new(3)), Some(&DataType::Error));
    assert_eq!(table.get(NodeId::new(1)), None);
    assert_eq!(table.get(NodeId::new(40)), None);
    assert_eq!(table.len(), 2);
}

#[test]
fn table_keeps_type_variables() {
    let mut table = TypeTable::new();
    let t = DataType::TypeVariable(TypeVar::new(7));
    table.set(NodeId::new(0), t.clone());
    assert_eq!(table.get(NodeId::new(0)), Some(&t));
}

#[test]
fn table_iterates_typed_nodes_in_order() {
    let mut table = TypeTable::new();
    assert!(table.is_empty());
    table.set(NodeId::new(2), DataType::Bool);
    table.set(NodeId::new(0), DataType::Void);

    let typed: Vec<_> = table.iter().map(|(id, ty)| (id.index(), ty.clone())).collect();
    assert_eq!(typed, vec![(0, DataType::Void), (2, DataType::Bool)]);
}

#[test]
fn propagate_reaches_through_parentheses() {
    let mut b = AstBuilder::new();
    let inner = b.int(1, DataType::INT16);
    let once = b.paren(inner);
    let twice = b.paren(once);
    let ast = b.finish();

    let mut table = TypeTable::new();
    table.propagate(&ast, twice, &DataType::INT16);
    for id in [inner, once, twice] {
        assert_eq!(table.get(id), Some(&DataType::INT16));
    }
}

fn result_with(errors: Vec<TypeCheckError>) -> TypeCheckResult {
    TypeCheckResult {
        types: TypeTable::new(),
        callees: FxHashMap::default(),
        errors,
    }
}

#[test]
fn clean_result_allows_codegen() {
    let result = result_with(Vec::new());
    assert!(!result.has_errors());
    assert!(result.ensure_codegen_allowed().is_ok());

    let mut queue = DiagnosticQueue::new();
    assert!(result.report(&mut queue).is_ok());
    assert_eq!(queue.error_count(), 0);
}

#[test]
fn errors_block_codegen_and_reach_the_queue() {
    let result = result_with(vec![
        TypeCheckError::new(TypeErrorKind::SubscriptWithNoArgs, Span::new(0, 2)),
        TypeCheckError::new(TypeErrorKind::AmbiguousExpressionType, Span::new(4, 9)),
    ]);
    assert!(result.has_errors());
    assert!(result.ensure_codegen_allowed().is_err());
    assert_eq!(
        result.error_kinds(),
        vec![
            &TypeErrorKind::SubscriptWithNoArgs,
            &TypeErrorKind::AmbiguousExpressionType,
        ]
    );

    let diagnostics = result.diagnostics();
    assert_eq!(diagnostics.len(), 2);
    assert_eq!(diagnostics[1].message, "type of expression is ambiguous without more context");

    let mut queue = DiagnosticQueue::new();
    assert!(result.report(&mut queue).is_err());
    assert_eq!(queue.error_count(), 2);
}
