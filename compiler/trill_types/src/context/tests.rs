use super::*;
use pretty_assertions::assert_eq;

#[test]
fn explicit_params_drop_implicit_self() {
    let mut table = SymbolTable::new();
    let point = table.add_type("Point");
    let self_name = table.intern("self");
    let x = table.intern("x");
    let point_ty = table.decl_type(point);
    assert_eq!(point_ty, Some(DataType::Nominal(table.intern("Point"))));

    let sig = FunctionSignature::new(
        table.intern("move"),
        vec![
            ParamSig::receiver(self_name, DataType::Nominal(table.intern("Point"))),
            ParamSig::labelled(x, DataType::INT64),
        ],
        DataType::Void,
    );
    assert_eq!(sig.explicit_params().len(), 1);
    assert_eq!(sig.explicit_params()[0].name, x);
    // The function type keeps the receiver.
    assert_eq!(
        sig.ty(),
        DataType::function(
            vec![DataType::Nominal(table.intern("Point")), DataType::INT64],
            DataType::Void
        )
    );
}

#[test]
fn aliases_canonicalize_through_structure() {
    let mut table = SymbolTable::new();
    table.add_alias("Byte", DataType::UINT8);
    table.add_alias("Bytes", DataType::pointer(DataType::Nominal(table.intern("Byte"))));
    let bytes = DataType::Nominal(table.intern("Bytes"));

    assert_eq!(
        table.canonical_type(&DataType::Tuple(vec![bytes.clone(), DataType::Bool])),
        DataType::Tuple(vec![DataType::pointer(DataType::UINT8), DataType::Bool])
    );
    assert!(table.types_match(&bytes, &DataType::pointer(DataType::UINT8)));
}

#[test]
fn alias_cycles_terminate() {
    let mut table = SymbolTable::new();
    table.add_alias("A", DataType::Nominal(table.intern("B")));
    table.add_alias("B", DataType::Nominal(table.intern("A")));
    let a = DataType::Nominal(table.intern("A"));
    assert!(matches!(table.canonical_type(&a), DataType::Nominal(_)));
}

#[test]
fn overload_sets_collect_by_name() {
    let mut table = SymbolTable::new();
    let f = table.intern("f");
    let first = table.add_function(FunctionSignature::new(
        f,
        vec![ParamSig::new(Name::EMPTY, DataType::INT64)],
        DataType::Bool,
    ));
    let second = table.add_function(FunctionSignature::new(
        f,
        vec![ParamSig::new(Name::EMPTY, DataType::Bool)],
        DataType::Bool,
    ));
    let plus = table.add_operator(FunctionSignature::new(
        table.intern("+"),
        vec![],
        DataType::INT64,
    ));

    assert_eq!(table.overloads(f), &[first, second]);
    assert!(table.overloads(table.intern("+")).is_empty());
    assert!(table.function_signature(plus).is_some());
}

#[test]
fn declarations_and_conformance() {
    let mut table = SymbolTable::new();
    let point = table.add_type("Point");
    let shape = table.add_protocol("Shape");
    table.add_alias("P", DataType::Nominal(table.intern("Point")));
    table.add_conformance(point, shape);

    let alias = DataType::Nominal(table.intern("P"));
    assert_eq!(table.declaration(&alias), Some(point));
    assert_eq!(table.declaration(&DataType::INT64), None);
    assert_eq!(
        table.protocol_declaration(&DataType::Nominal(table.intern("Shape"))),
        Some(shape)
    );
    assert!(table.conforms_to_protocol(point, shape));
    assert!(!table.conforms_to_protocol(shape, point));
}

#[test]
fn globals_and_synthesized_decls() {
    let mut table = SymbolTable::new();
    let g = table.add_global("limit", DataType::UINT32);
    assert_eq!(table.global(table.intern("limit")), Some(g));
    assert_eq!(table.decl_type(g), Some(DataType::UINT32));
    assert_eq!(table.decl_type(DeclId::new(99)), None);

    let sig = table.synthesized_decl(vec![DataType::INT64], DataType::INT8);
    assert_eq!(sig.ty(), DataType::function(vec![DataType::INT64], DataType::INT8));
    assert!(sig.explicit_params()[0].label.is_none());
}
