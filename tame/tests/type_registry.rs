use std::sync::Arc;

use tame::{
    id::IdGenerator,
    types::{Capabilities, TypeDecl, TypeRef, TypeRegistry},
    Error,
};

struct Builtins {
    number: TypeRef,
    natural: TypeRef,
    decimal: TypeRef,
    array: TypeRef,
}

fn builtins(types: &TypeRegistry) -> Builtins {
    let number = types
        .create_type(TypeDecl::new("Number").capabilities(Capabilities::NUMERIC))
        .expect("failed to create Number");
    let natural = types
        .create_type(
            TypeDecl::new("NaturalNumber")
                .capabilities(Capabilities::NUMERIC)
                .capabilities(Capabilities::NATURAL),
        )
        .expect("failed to create NaturalNumber");
    let decimal = types
        .create_type(
            TypeDecl::new("DecimalNumber").capabilities(Capabilities::NUMERIC | Capabilities::DECIMAL),
        )
        .expect("failed to create DecimalNumber");
    types.link_supertype(natural, number).unwrap();
    types.link_supertype(decimal, number).unwrap();

    let array = types
        .create_type(TypeDecl::new("Array").generic("T").capabilities(Capabilities::SEQUENCE))
        .expect("failed to create Array");

    Builtins {
        number,
        natural,
        decimal,
        array,
    }
}

#[test]
fn derivation_is_idempotent() {
    let types = TypeRegistry::new();
    let b = builtins(&types);

    for item in [b.number, b.natural, b.decimal] {
        let first = types.apply(b.array, [item], []).unwrap();
        let second = types.apply(b.array, [], [("T", item)]).unwrap();
        assert_eq!(first, second, "Array[{}] should be memoized", types.fmt(item));
        assert_ne!(first, b.array);
    }

    let before = types.len();
    types.apply(b.array, [b.natural], []).unwrap();
    assert_eq!(types.len(), before, "a memoized derivation must not create nodes");
}

#[test]
fn nested_derivations_have_nested_keys() {
    let types = TypeRegistry::new();
    let b = builtins(&types);

    let naturals = types.apply(b.array, [b.natural], []).unwrap();
    let matrix = types.apply(b.array, [naturals], []).unwrap();
    assert_eq!(
        types.derivation_key(matrix).as_deref(),
        Some("Array[T=Array[T=NaturalNumber]]")
    );
    assert_eq!(types.lookup("Array[T=Array[T=NaturalNumber]]"), Some(matrix));
    assert_eq!(types.parameter(matrix, "T"), Some(naturals));
}

#[test]
fn capability_gating_matches_declaration() {
    let types = TypeRegistry::new();
    let declared = Capabilities::INDEX | Capabilities::INVOKE | Capabilities::LOGIC;
    let ty = types
        .create_type(TypeDecl::new("Callable").capabilities(declared))
        .unwrap();

    for flag in Capabilities::all().iter() {
        assert_eq!(
            types.supports(ty, flag),
            declared.contains(flag),
            "unexpected answer for {:?}",
            flag
        );
    }
    assert!(types.supports(ty, Capabilities::INDEX | Capabilities::LOGIC));
    assert!(!types.supports(ty, Capabilities::INDEX | Capabilities::SLICE));
}

#[test]
fn intersection_properties() {
    let types = TypeRegistry::new();
    let b = builtins(&types);
    let naturals = types.apply(b.array, [b.natural], []).unwrap();

    for ty in [b.number, b.natural, b.decimal, b.array, naturals] {
        assert_eq!(types.intersect(ty, ty), Some(ty));
    }

    let decimals = types.apply(b.array, [b.decimal], []).unwrap();
    assert_eq!(types.intersect(naturals, decimals), Some(b.array));
    assert_eq!(types.intersect(decimals, naturals), Some(b.array));
    assert_eq!(types.intersect(naturals, b.number), None);
}

#[test]
fn intersection_prefers_nearest_ancestor() {
    let types = TypeRegistry::new();
    let b = builtins(&types);
    let small = types.create_type(TypeDecl::new("SmallNatural")).unwrap();
    let tiny = types.create_type(TypeDecl::new("TinyNatural")).unwrap();
    types.link_supertype(small, b.natural).unwrap();
    types.link_supertype(tiny, b.natural).unwrap();

    assert_eq!(types.intersect(small, tiny), Some(b.natural));
    assert_eq!(types.intersect(small, b.decimal), Some(b.number));
    assert!(types.isa(tiny, b.number).unwrap());
}

#[test]
fn isa_reports_unknown_relations() {
    let types = TypeRegistry::new();
    let b = builtins(&types);

    let err = types.isa(b.number, b.natural).unwrap_err();
    assert_eq!(
        err,
        Error::TypeRelationUnknown {
            ty: "Number".to_string(),
            other: "NaturalNumber".to_string(),
            reason: "the second type is not an ancestor of the first",
        }
    );
}

#[test]
fn supertype_links_are_deduplicated() {
    let types = TypeRegistry::new();
    let b = builtins(&types);
    types.link_supertype(b.natural, b.number).unwrap();
    types.link_supertype(b.natural, b.number).unwrap();
    assert_eq!(types.graph().inputs(&b.natural), &[b.number]);
}

#[test]
fn shared_ids_across_registries() {
    let ids = Arc::new(IdGenerator::new());
    let left = TypeRegistry::with_ids(ids.clone());
    let right = TypeRegistry::with_ids(ids.clone());

    let a = left.create_type(TypeDecl::new("A")).unwrap();
    let b = right.create_type(TypeDecl::new("B")).unwrap();
    assert_ne!(a, b, "registries sharing a generator never reuse ids");
    assert_eq!(ids.peek(), 2);
}

#[test]
fn concurrent_derivations_converge() {
    let types = Arc::new(TypeRegistry::new());
    let b = builtins(&types);

    let derived: Vec<TypeRef> = std::thread::scope(|scope| {
        let handles: Vec<_> = (0..8)
            .map(|_| {
                let types = Arc::clone(&types);
                scope.spawn(move || types.apply(b.array, [b.natural], []).unwrap())
            })
            .collect();
        handles.into_iter().map(|handle| handle.join().unwrap()).collect()
    });

    assert!(derived.windows(2).all(|pair| pair[0] == pair[1]));
}

#[test]
fn derivation_order_does_not_change_ancestry() {
    // Each registry derives the same two arrays, in opposite orders.
    let direct = TypeRegistry::new();
    let d = builtins(&direct);
    let direct_decimals = direct.apply(d.array, [d.decimal], []).unwrap();
    let direct_naturals = direct.apply(d.array, [d.natural], []).unwrap();
    assert_eq!(direct.apply(direct_naturals, [d.decimal], []).unwrap(), direct_decimals);

    let rebound = TypeRegistry::new();
    let r = builtins(&rebound);
    let rebound_naturals = rebound.apply(r.array, [r.natural], []).unwrap();
    let rebound_decimals = rebound.apply(rebound_naturals, [r.decimal], []).unwrap();
    assert_eq!(rebound.apply(r.array, [r.decimal], []).unwrap(), rebound_decimals);

    for (types, array, decimals, naturals) in [
        (&direct, d.array, direct_decimals, direct_naturals),
        (&rebound, r.array, rebound_decimals, rebound_naturals),
    ] {
        assert_eq!(types.graph().inputs(&decimals), &[array]);
        assert!(types.isa(decimals, array).unwrap());
        assert!(
            types.isa(decimals, naturals).unwrap_err().is_type_relation_unknown(),
            "Array[T=DecimalNumber] must not be an Array[T=NaturalNumber]"
        );
        assert_eq!(types.intersect(decimals, naturals), Some(array));
    }
}

#[test]
fn linking_a_type_to_itself_fails() {
    let types = TypeRegistry::new();
    let b = builtins(&types);
    let err = types.link_supertype(b.natural, b.natural).unwrap_err();
    assert!(err.is_type_relation_unknown());

    let count = types.len();
    assert!(types.graph().ranks().values().all(|rank| *rank < count));
}
