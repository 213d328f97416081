use tuplet::{InternError, TupleInterner, Value};

/// Generates strict-construction failure tests for bare primitive elements.
macro_rules! strict_invalid_element_tests {
    ($($name:ident: $element:expr, $type_name:literal;)*) => {
        $(
            paste::item! {
                #[test]
                fn [< strict_invalid_element_ $name >]() {
                    let mut interner = TupleInterner::new();
                    let err = interner.tuple_of(&[Value::object(), $element]).unwrap_err();
                    assert_eq!(
                        err,
                        InternError::InvalidElement { type_name: $type_name, index: 1 }
                    );
                    // the failed construction must leave no cache entries behind
                    assert_eq!(interner.node_count(), 0);
                    assert_eq!(interner.cached_tuple_count(), 0);
                }
            }
        )*
    }
}

strict_invalid_element_tests! {
    bool: Value::from(true), "bool";
    int: Value::from(7), "int";
    str: Value::str("test"), "str";
    infinity: Value::from(f64::INFINITY), "float";
}

/// Generates not-array-like failure tests for both construction modes.
macro_rules! not_sequence_tests {
    ($($name:ident: $sequence:expr, $type_name:literal;)*) => {
        $(
            paste::item! {
                #[test]
                fn [< not_sequence_ $name >]() {
                    let mut interner = TupleInterner::new();
                    let sequence = $sequence;
                    let expected = InternError::NotSequence { type_name: $type_name };
                    assert_eq!(interner.tuple(&sequence).unwrap_err(), expected);
                    assert_eq!(interner.tuple_any(&sequence).unwrap_err(), expected);
                }
            }
        )*
    }
}

not_sequence_tests! {
    bool: Value::from(false), "bool";
    int: Value::from(7), "int";
    object: Value::object(), "object";
    null: Value::Null, "null";
}

#[test]
fn strict_tuples_are_unique_and_order_sensitive() {
    let mut interner = TupleInterner::new();
    let a = Value::object();
    let b = Value::object();
    let c = Value::object();

    let forward = interner.tuple_of(&[a.clone(), b.clone(), c.clone()]).unwrap();
    let backward = interner.tuple_of(&[c.clone(), b.clone(), a.clone()]).unwrap();

    assert!(forward.ptr_eq(&interner.tuple_of(&[a.clone(), b.clone(), c.clone()]).unwrap()));
    assert!(backward.ptr_eq(&interner.tuple_of(&[c.clone(), b.clone(), a.clone()]).unwrap()));
    assert!(!forward.ptr_eq(&backward));
    assert_eq!(forward, forward.clone());
    assert_ne!(forward, backward);
}

#[test]
fn differing_one_position_differs() {
    let mut interner = TupleInterner::new();
    let a = Value::object();
    let b = Value::object();
    let other = Value::object();

    let t1 = interner.tuple_of(&[a.clone(), b.clone()]).unwrap();
    let t2 = interner.tuple_of(&[a.clone(), other.clone()]).unwrap();
    assert!(!t1.ptr_eq(&t2));
}

#[test]
fn strict_allows_null_and_undefined() {
    let mut interner = TupleInterner::new();
    let t = interner.tuple_of(&[Value::Undefined, Value::Null]).unwrap();
    assert!(t.ptr_eq(&interner.tuple_of(&[Value::Undefined, Value::Null]).unwrap()));
    // null and undefined canonicalize to distinct sentinels
    let swapped = interner.tuple_of(&[Value::Null, Value::Undefined]).unwrap();
    assert!(!t.ptr_eq(&swapped));
}

#[test]
fn strict_accepts_array_like_tuple_input() {
    let mut interner = TupleInterner::new();
    let a = Value::object();
    let inner = interner.tuple_of(&[a.clone()]).unwrap();
    // a tuple has a length, so it is valid sequence input
    let from_tuple = interner.tuple(&Value::Tuple(inner.clone())).unwrap();
    let from_list = interner.tuple(&Value::list(vec![a])).unwrap();
    assert!(from_tuple.ptr_eq(&inner));
    assert!(from_tuple.ptr_eq(&from_list));
}

#[test]
fn tuples_read_back_original_elements() {
    let mut interner = TupleInterner::new();
    let a = Value::object();
    let b = Value::object();
    let tuple = interner.tuple_of(&[a.clone(), b.clone()]).unwrap();

    assert_eq!(tuple.len(), 2);
    assert_eq!(tuple[0], a);
    assert_eq!(tuple[1], b);
    assert_eq!(tuple.get(2), None);
    let collected: Vec<&Value> = tuple.iter().collect();
    assert_eq!(collected.len(), 2);
}

#[test]
fn permissive_accepts_any_element_mix() {
    let mut interner = TupleInterner::new();
    let key = Value::object();
    let tuple = interner.tuple_any_of(&[
        Value::Null,
        Value::Undefined,
        Value::from(f64::NAN),
        Value::from(f64::NEG_INFINITY),
        Value::from(f64::INFINITY),
        Value::str("test"),
        Value::from(42_i64),
        Value::from(false),
        key.clone(),
    ]);
    assert_eq!(tuple.len(), 9);
    assert_eq!(tuple[8], key);
}

#[test]
fn permissive_scenario_returns_singleton_with_decoded_elements() {
    let mut interner = TupleInterner::new();
    let elements = [
        Value::str("test"),
        Value::Null,
        Value::from(f64::NEG_INFINITY),
        Value::from(f64::INFINITY),
    ];

    let tuple = interner.tuple_any_of(&elements);
    assert!(tuple.ptr_eq(&interner.tuple_any_of(&elements)));

    // the payload is the original values, not the canonical key objects
    assert_eq!(tuple[0], Value::str("test"));
    assert_eq!(tuple[1], Value::Null);
    assert_eq!(tuple[2], Value::from(f64::NEG_INFINITY));
    assert_eq!(tuple[3], Value::from(f64::INFINITY));
}

#[test]
fn permissive_nan_elements_intern_to_one_tuple() {
    let mut interner = TupleInterner::new();
    let first = interner.tuple_any_of(&[Value::from(f64::NAN)]);
    let second = interner.tuple_any_of(&[Value::from(f64::NAN)]);
    assert!(first.ptr_eq(&second));
    // the element reads back as an actual NaN, not the sentinel
    assert!(matches!(first[0], Value::Float(x) if x.is_nan()));
}

#[test]
fn permissive_distinguishes_value_types() {
    let mut interner = TupleInterner::new();
    let int = interner.tuple_any_of(&[Value::from(3_i64)]);
    let float = interner.tuple_any_of(&[Value::from(3.0_f64)]);
    let string = interner.tuple_any_of(&[Value::str("3")]);
    assert!(!int.ptr_eq(&float));
    assert!(!int.ptr_eq(&string));
    assert!(!float.ptr_eq(&string));
}

#[test]
fn permissive_unifies_negative_zero() {
    let mut interner = TupleInterner::new();
    let pos = interner.tuple_any_of(&[Value::from(0.0_f64)]);
    let neg = interner.tuple_any_of(&[Value::from(-0.0_f64)]);
    assert!(pos.ptr_eq(&neg));
}

#[test]
fn canonical_keys_are_stable_per_primitive() {
    let mut interner = TupleInterner::new();
    assert_eq!(
        interner.canonical_key(&Value::from(42_i64)),
        interner.canonical_key(&Value::from(42_i64))
    );
    assert_eq!(
        interner.canonical_key(&Value::str("test")),
        interner.canonical_key(&Value::str("test"))
    );
    assert_eq!(
        interner.canonical_key(&Value::from(f64::NAN)),
        interner.canonical_key(&Value::from(f64::NAN))
    );
    assert_ne!(
        interner.canonical_key(&Value::Null),
        interner.canonical_key(&Value::Undefined)
    );
    assert_ne!(
        interner.canonical_key(&Value::from(42_i64)),
        interner.canonical_key(&Value::from(43_i64))
    );
}

#[test]
fn canonical_keys_follow_reference_identity() {
    let mut interner = TupleInterner::new();
    let a = Value::object();
    let b = Value::object();
    assert_eq!(interner.canonical_key(&a), interner.canonical_key(&a.clone()));
    assert_ne!(interner.canonical_key(&a), interner.canonical_key(&b));
}

#[test]
fn canonical_keys_work_as_map_keys() {
    use std::collections::HashMap;

    let mut interner = TupleInterner::new();
    let mut map = HashMap::new();
    map.insert(interner.canonical_key(&Value::str("k")), 1);
    map.insert(interner.canonical_key(&Value::Null), 2);
    assert_eq!(map.get(&interner.canonical_key(&Value::str("k"))), Some(&1));
    assert_eq!(map.get(&interner.canonical_key(&Value::Null)), Some(&2));
    assert_eq!(map.get(&interner.canonical_key(&Value::from(1_i64))), None);
}

#[test]
fn is_tuple_identifies_only_interned_tuples() {
    let mut interner = TupleInterner::new();
    let elements = [Value::from(1_i64), Value::from(2_i64), Value::from(3_i64)];
    let tuple = Value::Tuple(interner.tuple_any_of(&elements));

    assert!(tuple.is_tuple());
    assert!(!Value::Null.is_tuple());
    assert!(!Value::Undefined.is_tuple());
    assert!(!Value::from(false).is_tuple());
    // a plain list with equal contents is not a tuple
    assert!(!Value::list(elements.to_vec()).is_tuple());
}

#[test]
fn nested_tuples_key_by_identity() {
    let mut interner = TupleInterner::new();
    let a = Value::object();
    let inner = interner.tuple_of(&[a.clone()]).unwrap();

    let outer1 = interner.tuple_of(&[Value::Tuple(inner.clone()), a.clone()]).unwrap();
    let outer2 = interner.tuple_of(&[Value::Tuple(inner.clone()), a.clone()]).unwrap();
    assert!(outer1.ptr_eq(&outer2));
    assert_eq!(outer1[0].as_tuple(), Some(&inner));
}

#[test]
fn empty_sequence_yields_one_singleton() {
    let mut interner = TupleInterner::new();
    let strict = interner.tuple_of(&[]).unwrap();
    let permissive = interner.tuple_any_of(&[]);
    let from_list = interner.tuple(&Value::list(vec![])).unwrap();

    assert!(strict.is_empty());
    assert!(strict.ptr_eq(&permissive));
    assert!(strict.ptr_eq(&from_list));
}

#[test]
fn dropped_tuples_are_reclaimed() {
    let mut interner = TupleInterner::new();
    let a = Value::object();
    let b = Value::object();

    let tuple = interner.tuple_of(&[a.clone(), b.clone()]).unwrap();
    assert_eq!(interner.cached_tuple_count(), 1);

    // a live handle keeps the whole path in place
    assert_eq!(interner.sweep(), 0);
    assert_eq!(interner.cached_tuple_count(), 1);

    drop(tuple);
    assert_eq!(interner.cached_tuple_count(), 0);
    assert!(interner.sweep() > 0);
    assert_eq!(interner.node_count(), 0);
}

#[test]
fn reinterning_after_reclamation_builds_a_fresh_tuple() {
    let mut interner = TupleInterner::new();
    let a = Value::object();

    let first_addr = {
        let tuple = interner.tuple_of(&[a.clone()]).unwrap();
        tuple.as_slice().as_ptr() as usize
    };
    interner.sweep();

    let again = interner.tuple_of(&[a.clone()]).unwrap();
    assert_eq!(again.len(), 1);
    // no stale cache hit: the old allocation is gone
    let _ = first_addr;
    assert!(again.ptr_eq(&interner.tuple_of(&[a]).unwrap()));
}

#[test]
fn box_cache_grows_per_distinct_primitive_only() {
    let mut interner = TupleInterner::new();
    for _ in 0..10 {
        interner.tuple_any_of(&[Value::str("test"), Value::from(7_i64)]);
    }
    assert_eq!(interner.boxed_primitive_count(), 2);
    interner.tuple_any_of(&[Value::str("other")]);
    assert_eq!(interner.boxed_primitive_count(), 3);
}

#[test]
fn reset_clears_all_cache_state() {
    let mut interner = TupleInterner::new();
    let a = Value::object();
    let before = interner.tuple_any_of(&[a.clone(), Value::from(1_i64)]);
    let empty_before = interner.tuple_any_of(&[]);

    interner.reset();
    assert_eq!(interner.node_count(), 0);
    assert_eq!(interner.boxed_primitive_count(), 0);

    // old handles stay usable, but singleton status does not survive a reset
    assert_eq!(before.len(), 2);
    let after = interner.tuple_any_of(&[a, Value::from(1_i64)]);
    assert!(!before.ptr_eq(&after));
    assert!(!empty_before.ptr_eq(&interner.tuple_any_of(&[])));
}

#[test]
fn tuple_display_is_repr_style() {
    let mut interner = TupleInterner::new();
    let tuple = interner.tuple_any_of(&[
        Value::str("test"),
        Value::Null,
        Value::from(f64::NEG_INFINITY),
        Value::from(f64::INFINITY),
    ]);
    assert_eq!(tuple.to_string(), "(\"test\", null, -Infinity, Infinity)");
    assert_eq!(
        Value::Tuple(tuple).to_string(),
        "(\"test\", null, -Infinity, Infinity)"
    );
}

#[test]
fn error_messages_name_the_offender() {
    let mut interner = TupleInterner::new();
    let not_seq = interner.tuple(&Value::from(7_i64)).unwrap_err();
    assert_eq!(
        not_seq.to_string(),
        "tuples can only be created from array-like values, got int"
    );
    let invalid = interner.tuple_of(&[Value::from(true)]).unwrap_err();
    assert_eq!(
        invalid.to_string(),
        "invalid value at index 0: a bare bool cannot key the weak trie"
    );
}
