//! Property-based tests for weft-expr using proptest.

use std::cell::RefCell;

use proptest::prelude::*;
use weft_core::{Object, Value};
use weft_expr::{Expression, Getter, Setter};

fn identifier() -> impl Strategy<Value = String> {
    "[a-z_][a-z0-9_]{0,8}"
}

/// Builds `{k0: {k1: {... {kn: leaf}}}}`.
fn nest(keys: &[String], leaf: Value) -> Value {
    keys.iter().rev().fold(leaf, |inner, key| {
        let mut obj = Object::new();
        obj.insert(key.clone(), inner);
        Value::Object(obj)
    })
}

proptest! {
    /// A dotted path of identifiers parses into exactly one segment per identifier.
    #[test]
    fn dotted_path_segment_count(keys in prop::collection::vec(identifier(), 1..6)) {
        let source = keys.join(".");
        let expr = Expression::parse(&source).unwrap();
        prop_assert_eq!(expr.path().len(), keys.len());
        prop_assert!(!expr.is_call());
    }

    /// Reading a dotted path yields the leaf placed at that path.
    #[test]
    fn getter_reads_nested_leaf(keys in prop::collection::vec(identifier(), 1..6), leaf in any::<i32>()) {
        let scope = RefCell::new(nest(&keys, Value::from(leaf)));
        let getter = Getter::compile(&keys.join(".")).unwrap();
        prop_assert_eq!(getter.get(&scope).unwrap(), Value::from(leaf));
    }

    /// A write through a setter is observed by a subsequent read of the same path.
    #[test]
    fn setter_then_getter(keys in prop::collection::vec(identifier(), 1..6), text in "[A-Za-z ]{0,12}") {
        let scope = RefCell::new(nest(&keys, Value::Null));
        let source = keys.join(".");
        Setter::compile(&source).unwrap().set(&scope, Value::from(text.as_str())).unwrap();
        prop_assert_eq!(Getter::compile(&source).unwrap().get(&scope).unwrap(), Value::from(text.as_str()));
    }

    /// Reading below a missing name never fails.
    #[test]
    fn getter_absent_is_null(keys in prop::collection::vec(identifier(), 1..6)) {
        let scope = RefCell::new(Value::Object(Object::new()));
        let getter = Getter::compile(&keys.join(".")).unwrap();
        prop_assert_eq!(getter.get(&scope).unwrap(), Value::Null);
    }
}
