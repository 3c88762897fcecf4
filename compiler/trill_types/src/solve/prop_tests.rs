//! Property tests for the solver.
//!
//! 1. Symmetry: `Equal(a, b)` and `Equal(b, a)` agree
//! 2. Fixed point: re-solving a solved system adds nothing
//! 3. Idempotence: a solution resolves every variable it binds in one pass
//! 4. Occurs check: a variable never unifies with a type containing it
//! 5. Consistency: away from pointers and `Any`, both sides agree after
//!    solving

use proptest::prelude::*;
use trill_ir::{Name, TypeVar};

use super::*;
use crate::SymbolTable;

fn arb_var() -> impl Strategy<Value = DataType> {
    prop_oneof![
        3 => (0u32..4).prop_map(|id| DataType::MetaVariable(TypeVar::new(id))),
        1 => (0u32..2).prop_map(|id| DataType::TypeVariable(TypeVar::new(id))),
    ]
}

fn arb_scalar() -> impl Strategy<Value = DataType> {
    prop_oneof![
        Just(DataType::Void),
        Just(DataType::Bool),
        Just(DataType::INT8),
        Just(DataType::INT64),
        Just(DataType::UINT32),
        Just(DataType::DOUBLE),
        Just(DataType::Any),
        (1u32..3).prop_map(|raw| DataType::Nominal(Name::from_raw(raw))),
    ]
}

/// Types of bounded depth. Depth 0 = leaves only.
fn arb_type(depth: u32) -> BoxedStrategy<DataType> {
    if depth == 0 {
        return prop_oneof![
            3 => arb_scalar(),
            2 => arb_var(),
        ]
        .boxed();
    }
    let inner = arb_type(depth - 1);
    prop_oneof![
        4 => arb_scalar(),
        3 => arb_var(),
        1 => inner.clone().prop_map(DataType::pointer),
        1 => (inner.clone(), prop::option::of(0usize..3))
            .prop_map(|(element, length)| DataType::array(element, length)),
        1 => prop::collection::vec(inner.clone(), 0..3).prop_map(DataType::Tuple),
        1 => (prop::collection::vec(inner.clone(), 0..3), inner, any::<bool>())
            .prop_map(|(args, ret, variadic)| DataType::Function {
                args,
                ret: Box::new(ret),
                variadic,
            }),
    ]
    .boxed()
}

fn arb_system() -> impl Strategy<Value = Vec<Constraint>> {
    prop::collection::vec((arb_type(2), arb_type(2)), 1..6).prop_map(|pairs| {
        pairs
            .into_iter()
            .map(|(a, b)| Constraint::equal(a, b, ConstraintSite::DeclAnnotation, None))
            .collect()
    })
}

/// No pointers, no `Any` and no variadic functions anywhere.
fn is_strict(ty: &DataType) -> bool {
    match ty {
        DataType::Any | DataType::Pointer(_) => false,
        DataType::Array { element, .. } => is_strict(element),
        DataType::Tuple(fields) => fields.iter().all(is_strict),
        DataType::Function {
            args,
            ret,
            variadic,
        } => !variadic && is_strict(ret) && args.iter().all(is_strict),
        _ => true,
    }
}

fn equal(a: &DataType, b: &DataType) -> Constraint {
    Constraint::equal(a.clone(), b.clone(), ConstraintSite::DeclAnnotation, None)
}

proptest! {
    #[test]
    fn unification_is_symmetric(a in arb_type(3), b in arb_type(3)) {
        let table = SymbolTable::new();
        let solver = Solver::new(&table);
        let forward = solver.solve(&[equal(&a, &b)]);
        let backward = solver.solve(&[equal(&b, &a)]);
        prop_assert_eq!(forward.is_ok(), backward.is_ok());
        if let (Ok(forward), Ok(backward)) = (forward, backward) {
            prop_assert_eq!(forward, backward);
        }
    }

    #[test]
    fn unification_is_reflexive(a in arb_type(3)) {
        let table = SymbolTable::new();
        let s = Solver::new(&table).solve(&[equal(&a, &a)]);
        prop_assert_eq!(s, Ok(Substitution::new()));
    }

    #[test]
    fn solution_is_a_fixed_point(system in arb_system()) {
        let table = SymbolTable::new();
        let solver = Solver::new(&table);
        if let Ok(s) = solver.solve(&system) {
            prop_assert_eq!(solver.solve_from(&system, s.clone()), Ok(s));
        }
    }

    #[test]
    fn solution_apply_is_idempotent(system in arb_system(), probe in arb_type(3)) {
        let table = SymbolTable::new();
        if let Ok(s) = Solver::new(&table).solve(&system) {
            let once = s.apply(&probe);
            prop_assert_eq!(s.apply(&once), once);
        }
    }

    #[test]
    fn occurs_check_rejects_self_reference(
        id in 0u32..4,
        other in arb_type(2),
        shape in 0u8..4,
    ) {
        let var = DataType::MetaVariable(TypeVar::new(id));
        let wrapped = match shape {
            0 => DataType::pointer(var.clone()),
            1 => DataType::array(var.clone(), None),
            2 => DataType::Tuple(vec![other, var.clone()]),
            _ => DataType::function(vec![other], var.clone()),
        };
        let table = SymbolTable::new();
        let err = Solver::new(&table).solve(&[equal(&var, &wrapped)]);
        let is_infinite = matches!(
            err,
            Err(SolveError { kind: SolveErrorKind::InfiniteType { .. }, .. })
        );
        prop_assert!(is_infinite);
    }

    #[test]
    fn strict_types_agree_after_solving(a in arb_type(3), b in arb_type(3)) {
        prop_assume!(is_strict(&a) && is_strict(&b));
        let table = SymbolTable::new();
        if let Ok(s) = Solver::new(&table).solve(&[equal(&a, &b)]) {
            prop_assert_eq!(s.apply(&a), s.apply(&b));
        }
    }
}
