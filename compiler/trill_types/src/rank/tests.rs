use super::*;
use crate::SymbolTable;
use trill_ir::TypeVar;

#[test]
fn identical_types_are_exact() {
    let table = SymbolTable::new();
    assert_eq!(
        match_rank(&table, &DataType::INT64, &DataType::INT64),
        Some(MatchRank::EXACT)
    );
}

#[test]
fn aliases_match_exactly() {
    let mut table = SymbolTable::new();
    table.add_alias("Size", DataType::UINT64);
    let size = DataType::Nominal(table.intern("Size"));
    assert_eq!(
        match_rank(&table, &size, &DataType::UINT64),
        Some(MatchRank::EXACT)
    );
}

#[test]
fn error_matches_anything() {
    let table = SymbolTable::new();
    assert_eq!(
        match_rank(&table, &DataType::Error, &DataType::Bool),
        Some(MatchRank::EXACT)
    );
}

#[test]
fn widening_into_any_is_existential() {
    let table = SymbolTable::new();
    assert_eq!(
        match_rank(&table, &DataType::Any, &DataType::INT8),
        Some(MatchRank::EXISTENTIAL)
    );
}

#[test]
fn narrowing_out_of_any_is_rejected() {
    let table = SymbolTable::new();
    assert_eq!(match_rank(&table, &DataType::INT8, &DataType::Any), None);
}

#[test]
fn pointers_convert_regardless_of_pointee() {
    let table = SymbolTable::new();
    let rank = match_rank(
        &table,
        &DataType::pointer(DataType::INT8),
        &DataType::pointer(DataType::DOUBLE),
    );
    assert_eq!(rank, Some(MatchRank::CONVERSION));
}

#[test]
fn unresolved_sides_convert() {
    let table = SymbolTable::new();
    let var = DataType::TypeVariable(TypeVar::new(0));
    assert_eq!(
        match_rank(&table, &var, &DataType::Bool),
        Some(MatchRank::CONVERSION)
    );
}

#[test]
fn compound_rank_is_worst_component() {
    let table = SymbolTable::new();
    let expected = DataType::Tuple(vec![DataType::INT64, DataType::Any]);
    let found = DataType::Tuple(vec![DataType::INT64, DataType::Bool]);
    assert_eq!(
        match_rank(&table, &expected, &found),
        Some(MatchRank::EXISTENTIAL)
    );

    let bad = DataType::Tuple(vec![DataType::Bool, DataType::Bool]);
    assert_eq!(match_rank(&table, &expected, &bad), None);
}

#[test]
fn fixed_array_lengths_must_agree() {
    let table = SymbolTable::new();
    let a = DataType::array(DataType::INT8, Some(2));
    let b = DataType::array(DataType::INT8, Some(3));
    let open = DataType::array(DataType::INT8, None);
    assert_eq!(match_rank(&table, &a, &b), None);
    assert_eq!(match_rank(&table, &open, &b), Some(MatchRank::EXACT));
}

#[test]
fn mismatched_scalars_are_incompatible() {
    let table = SymbolTable::new();
    assert_eq!(match_rank(&table, &DataType::INT64, &DataType::INT32), None);
    assert!(MatchRank::EXACT < MatchRank::EXISTENTIAL);
    assert_eq!(MatchRank::CONVERSION.raw(), 1);
}
