#![expect(clippy::unwrap_used, reason = "Tests use unwrap for brevity")]

use super::*;
use crate::SymbolTable;
use pretty_assertions::assert_eq;
use trill_ir::TypeVar;

fn meta(id: u32) -> DataType {
    DataType::MetaVariable(TypeVar::new(id))
}

fn tv(id: u32) -> DataType {
    DataType::TypeVariable(TypeVar::new(id))
}

fn eq(a: DataType, b: DataType) -> Constraint {
    Constraint::equal(a, b, ConstraintSite::DeclAnnotation, Some(NodeId::new(0)))
}

fn solve(table: &SymbolTable, system: &[Constraint]) -> Result<Substitution, SolveError> {
    Solver::new(table).solve(system)
}

#[test]
fn equal_types_bind_nothing() {
    let table = SymbolTable::new();
    let s = solve(&table, &[eq(DataType::INT64, DataType::INT64)]).unwrap();
    assert!(s.is_empty());
}

#[test]
fn aliases_are_equal_to_their_targets() {
    let mut table = SymbolTable::new();
    table.add_alias("Word", DataType::UINT32);
    let word = DataType::Nominal(table.intern("Word"));
    assert!(solve(&table, &[eq(word, DataType::UINT32)]).unwrap().is_empty());
}

#[test]
fn variable_binds_to_concrete_side() {
    let table = SymbolTable::new();
    let s = solve(&table, &[eq(DataType::Bool, meta(0))]).unwrap();
    assert_eq!(s.apply(&meta(0)), DataType::Bool);

    let s = solve(&table, &[eq(tv(4), DataType::DOUBLE)]).unwrap();
    assert_eq!(s.apply(&tv(4)), DataType::DOUBLE);
}

#[test]
fn binding_keeps_alias_spelling() {
    let mut table = SymbolTable::new();
    table.add_alias("Word", DataType::UINT32);
    let word = DataType::Nominal(table.intern("Word"));
    let s = solve(&table, &[eq(meta(0), word.clone())]).unwrap();
    assert_eq!(s.apply(&meta(0)), word);
}

#[test]
fn forward_substitution_narrows_later_constraints() {
    let table = SymbolTable::new();
    let system = [
        eq(meta(0), DataType::INT64),
        eq(meta(1), DataType::pointer(meta(0))),
    ];
    let s = solve(&table, &system).unwrap();
    assert_eq!(s.apply(&meta(1)), DataType::pointer(DataType::INT64));
}

#[test]
fn forward_substitution_exposes_conflicts() {
    let table = SymbolTable::new();
    let system = [eq(meta(0), DataType::INT64), eq(meta(0), DataType::Bool)];
    let err = solve(&table, &system).unwrap_err();
    assert_eq!(
        err.kind,
        SolveErrorKind::Mismatch {
            expected: DataType::INT64,
            found: DataType::Bool
        }
    );
    assert_eq!(err.index, 1);
    assert_eq!(err.node, Some(NodeId::new(0)));
}

#[test]
fn two_unresolved_variables_are_ambiguous() {
    let table = SymbolTable::new();
    let err = solve(&table, &[eq(meta(0), tv(1))]).unwrap_err();
    assert!(matches!(err.kind, SolveErrorKind::Ambiguous { .. }));
}

#[test]
fn infinite_type_is_a_diagnostic_not_a_panic() {
    let table = SymbolTable::new();
    let err = solve(&table, &[eq(meta(0), DataType::pointer(meta(0)))]).unwrap_err();
    assert_eq!(
        err.kind,
        SolveErrorKind::InfiniteType {
            var: meta(0),
            ty: DataType::pointer(meta(0))
        }
    );
}

#[test]
fn infinite_type_through_forward_substitution() {
    let table = SymbolTable::new();
    let system = [
        eq(meta(1), DataType::Tuple(vec![meta(0), DataType::Bool])),
        eq(meta(0), meta(1)),
    ];
    let err = solve(&table, &system).unwrap_err();
    assert!(matches!(err.kind, SolveErrorKind::InfiniteType { .. }));
    assert_eq!(err.index, 1);
}

#[test]
fn function_arity_must_match() {
    let table = SymbolTable::new();
    let f = DataType::function(vec![DataType::INT64, DataType::INT64], DataType::Bool);
    let call = DataType::function(vec![DataType::INT64], meta(0));
    let err = solve(&table, &[eq(f, call)]).unwrap_err();
    assert!(matches!(err.kind, SolveErrorKind::Mismatch { .. }));
}

#[test]
fn variadic_function_accepts_extra_arguments() {
    let table = SymbolTable::new();
    let printf = DataType::variadic_function(vec![DataType::pointer(DataType::INT8)], DataType::INT32);
    let call = DataType::function(
        vec![DataType::pointer(DataType::INT8), DataType::INT64, DataType::DOUBLE],
        meta(0),
    );
    let s = solve(&table, &[eq(printf, call)]).unwrap();
    assert_eq!(s.apply(&meta(0)), DataType::INT32);
}

#[test]
fn function_returns_unify_before_arguments() {
    let table = SymbolTable::new();
    // Both the return and the argument disagree; the return is reported.
    let f = DataType::function(vec![DataType::INT64], DataType::Bool);
    let g = DataType::function(vec![DataType::Bool], DataType::Void);
    let err = solve(&table, &[eq(f, g)]).unwrap_err();
    assert_eq!(
        err.kind,
        SolveErrorKind::Mismatch {
            expected: DataType::Bool,
            found: DataType::Void
        }
    );
}

#[test]
fn function_arguments_bind_pairwise() {
    let table = SymbolTable::new();
    let f = DataType::function(vec![DataType::INT64, DataType::Bool], DataType::Void);
    let call = DataType::function(vec![meta(0), meta(1)], meta(2));
    let s = solve(&table, &[eq(f, call)]).unwrap();
    assert_eq!(s.apply(&meta(0)), DataType::INT64);
    assert_eq!(s.apply(&meta(1)), DataType::Bool);
    assert_eq!(s.apply(&meta(2)), DataType::Void);
}

#[test]
fn known_relaxation_pointers_unify_with_any_pointee() {
    let table = SymbolTable::new();
    let s = solve(
        &table,
        &[eq(DataType::pointer(DataType::INT8), DataType::pointer(DataType::DOUBLE))],
    )
    .unwrap();
    assert!(s.is_empty());

    // Nothing is learned about a pointee variable either.
    let s = solve(
        &table,
        &[eq(DataType::pointer(meta(0)), DataType::pointer(DataType::Bool))],
    )
    .unwrap();
    assert_eq!(s.apply(&meta(0)), meta(0));
}

#[test]
fn any_is_compatible_with_everything() {
    let table = SymbolTable::new();
    assert!(solve(&table, &[eq(DataType::Any, DataType::INT64)]).is_ok());
    assert!(solve(&table, &[eq(DataType::Tuple(vec![]), DataType::Any)]).is_ok());
}

#[test]
fn error_suppresses_mismatches() {
    let table = SymbolTable::new();
    let s = solve(&table, &[eq(DataType::Error, DataType::INT64)]).unwrap();
    assert!(s.is_empty());
    let s = solve(&table, &[eq(meta(0), DataType::Error)]).unwrap();
    assert!(s.is_empty());
}

#[test]
fn arrays_unify_elements_and_lengths() {
    let table = SymbolTable::new();
    let s = solve(
        &table,
        &[eq(
            DataType::array(DataType::INT8, None),
            DataType::array(meta(0), Some(4)),
        )],
    )
    .unwrap();
    assert_eq!(s.apply(&meta(0)), DataType::INT8);

    let err = solve(
        &table,
        &[eq(
            DataType::array(DataType::INT8, Some(3)),
            DataType::array(DataType::INT8, Some(4)),
        )],
    )
    .unwrap_err();
    assert!(matches!(err.kind, SolveErrorKind::Mismatch { .. }));
}

#[test]
fn tuples_unify_pairwise() {
    let table = SymbolTable::new();
    let s = solve(
        &table,
        &[eq(
            DataType::Tuple(vec![meta(0), DataType::Bool]),
            DataType::Tuple(vec![DataType::INT16, meta(1)]),
        )],
    )
    .unwrap();
    assert_eq!(s.apply(&meta(0)), DataType::INT16);
    assert_eq!(s.apply(&meta(1)), DataType::Bool);

    let err = solve(
        &table,
        &[eq(
            DataType::Tuple(vec![DataType::Bool]),
            DataType::Tuple(vec![DataType::Bool, DataType::Bool]),
        )],
    )
    .unwrap_err();
    assert!(matches!(err.kind, SolveErrorKind::Mismatch { .. }));
}

#[test]
fn scalar_mismatch_names_canonical_types() {
    let mut table = SymbolTable::new();
    table.add_alias("Flag", DataType::Bool);
    let flag = DataType::Nominal(table.intern("Flag"));
    let err = solve(&table, &[eq(flag, DataType::INT64)]).unwrap_err();
    assert_eq!(
        err.kind,
        SolveErrorKind::Mismatch {
            expected: DataType::Bool,
            found: DataType::INT64
        }
    );
    assert_eq!(err.site, ConstraintSite::DeclAnnotation);
}

fn conformance_table() -> (SymbolTable, DataType, DataType, DataType) {
    let mut table = SymbolTable::new();
    let point = table.add_type("Point");
    table.add_type("Line");
    let shape = table.add_protocol("Shape");
    table.add_conformance(point, shape);
    let point = DataType::Nominal(table.intern("Point"));
    let line = DataType::Nominal(table.intern("Line"));
    let shape = DataType::Nominal(table.intern("Shape"));
    (table, point, line, shape)
}

#[test]
fn conformance_reduces_to_existential() {
    let (table, point, _, shape) = conformance_table();
    let c = Constraint::conforms(point, shape, ConstraintSite::Conformance, None);
    assert!(solve(&table, &[c]).unwrap().is_empty());
}

#[test]
fn conformance_fails_without_witness() {
    let (table, _, line, shape) = conformance_table();
    let c = Constraint::conforms(line.clone(), shape.clone(), ConstraintSite::Conformance, None);
    let err = solve(&table, &[c]).unwrap_err();
    assert_eq!(
        err.kind,
        SolveErrorKind::DoesNotConform {
            ty: line,
            protocol: shape
        }
    );
}

#[test]
fn conformance_needs_both_declarations() {
    let (table, point, _, shape) = conformance_table();
    let no_type = Constraint::conforms(DataType::INT64, shape, ConstraintSite::Conformance, None);
    let err = solve(&table, &[no_type]).unwrap_err();
    assert!(matches!(err.kind, SolveErrorKind::MissingConformanceDecl { .. }));

    let no_protocol = Constraint::conforms(point.clone(), point, ConstraintSite::Conformance, None);
    let err = solve(&table, &[no_protocol]).unwrap_err();
    assert!(matches!(err.kind, SolveErrorKind::MissingConformanceDecl { .. }));
}

#[test]
fn solve_one_returns_only_new_bindings() {
    let table = SymbolTable::new();
    let solver = Solver::new(&table);
    let mut prior = Substitution::new();
    prior.insert(VarKey::Meta(TypeVar::new(0)), DataType::INT64);

    let delta = solver
        .solve_one(&eq(meta(1), DataType::pointer(meta(0))), &prior)
        .unwrap();
    assert_eq!(delta.len(), 1);
    assert_eq!(delta.apply(&meta(1)), DataType::pointer(DataType::INT64));
}

#[test]
fn solve_from_extends_prior() {
    let table = SymbolTable::new();
    let mut prior = Substitution::new();
    prior.insert(VarKey::Meta(TypeVar::new(0)), DataType::Bool);
    let s = Solver::new(&table)
        .solve_from(&[eq(meta(1), meta(0))], prior)
        .unwrap();
    assert_eq!(s.len(), 2);
    assert_eq!(s.apply(&meta(1)), DataType::Bool);
}

#[test]
fn error_display_names_site() {
    let table = SymbolTable::new();
    let err = solve(&table, &[eq(DataType::Bool, DataType::Void)]).unwrap_err();
    assert_eq!(
        err.to_string(),
        "type mismatch at declaration annotation (constraint 0)"
    );
}
