//! Property-based tests for Traversal laws and pipeline composition.
//!
//! - **Identity Law**: `traversal.modify(&source, |x| x) == source`
//! - **Composition Law**: modifying with `f` then `g` equals modifying once with `g . f`
//! - **Call Count**: `modify` calls its function exactly `collect(&source).len()` times, in
//!   `collect` order
//! - **Associativity**: `(a . b) . c` and `a . (b . c)` read and write identically

use lensing::optics::Pipeline;
use lensing::optics::standard_optics::{each, index, instance_of, recur, values};
use lensing::{TypeKey, Value};
use proptest::prelude::*;

// =============================================================================
// Strategies
// =============================================================================

fn leaf() -> impl Strategy<Value = Value> {
    prop_oneof![
        any::<i64>().prop_map(|number| Value::from(number % 1000)),
        "[a-z]{0,3}".prop_map(Value::from),
    ]
}

fn tree() -> impl Strategy<Value = Value> {
    leaf().prop_recursive(3, 32, 4, |inner| {
        prop_oneof![
            prop::collection::vec(inner.clone(), 0..4).prop_map(Value::list),
            prop::collection::btree_map("[a-z]{1,2}", inner, 0..3).prop_map(Value::map),
        ]
    })
}

/// A list of lists of leaves.
fn grid() -> impl Strategy<Value = Value> {
    prop::collection::vec(prop::collection::vec(leaf(), 0..4).prop_map(Value::list), 0..4)
        .prop_map(Value::list)
}

fn increment(focus: Value) -> Value {
    focus.as_int().map_or(focus, |number| Value::from(number + 1))
}

fn double(focus: Value) -> Value {
    focus.as_int().map_or(focus, |number| Value::from(number * 2))
}

fn traversals() -> Vec<Pipeline> {
    vec![
        each().compose(&each()).unwrap(),
        recur(TypeKey::Int),
        each()
            .compose(&each())
            .and_then(|optic| optic.compose(&instance_of(TypeKey::Int)))
            .unwrap(),
    ]
}

// =============================================================================
// Traversal Laws
// =============================================================================

proptest! {
    /// Modifying with the identity function returns an equal state.
    #[test]
    fn prop_identity_law(source in grid()) {
        for optic in traversals() {
            prop_assert_eq!(optic.modify(&source, |focus| focus).unwrap(), source.clone());
        }
    }

    /// Two modifications equal one modification with the composed function.
    #[test]
    fn prop_composition_law(source in grid()) {
        for optic in traversals() {
            let twice = optic
                .modify(&optic.modify(&source, increment).unwrap(), double)
                .unwrap();
            let once = optic.modify(&source, |focus| double(increment(focus))).unwrap();
            prop_assert_eq!(twice, once);
        }
    }

    /// The modifier sees exactly the collected foci, in order.
    #[test]
    fn prop_modify_visits_collect_order(source in grid()) {
        for optic in traversals() {
            let mut seen = Vec::new();
            optic
                .modify(&source, |focus| {
                    seen.push(focus.clone());
                    focus
                })
                .unwrap();
            prop_assert_eq!(seen, optic.collect(&source).unwrap());
        }
    }

    /// Recursion into nested lists and maps finds every integer exactly once.
    #[test]
    fn prop_recur_modify_matches_collect(source in tree()) {
        let ints = recur(TypeKey::Int);
        let mut calls = 0_usize;
        let result = ints
            .modify(&source, |focus| {
                calls += 1;
                increment(focus)
            })
            .unwrap();
        let before = ints.collect(&source).unwrap();
        prop_assert_eq!(calls, before.len());
        let expected: Vec<Value> = before.into_iter().map(increment).collect();
        prop_assert_eq!(ints.collect(&result).unwrap(), expected);
    }

    /// Setting map values keeps every key.
    #[test]
    fn prop_values_set_keeps_keys(
        source in prop::collection::btree_map("[a-z]{1,3}", any::<i64>(), 0..5).prop_map(Value::map),
    ) {
        let written = values().set(&source, Value::Null).unwrap();
        let keys = |value: &Value| value.as_map().map(|entries| entries.keys().cloned().collect::<Vec<_>>());
        prop_assert_eq!(keys(&written), keys(&source));
    }
}

// =============================================================================
// Associativity
// =============================================================================

proptest! {
    /// Grouping of composition does not change reads or writes.
    #[test]
    fn prop_composition_is_associative(source in grid(), replacement in leaf()) {
        let (first, second, third) = (each(), each(), instance_of(TypeKey::Int));
        let left = first.compose(&second).and_then(|optic| optic.compose(&third)).unwrap();
        let right = second.compose(&third).and_then(|optic| first.compose(&optic)).unwrap();

        prop_assert_eq!(left.kind(), right.kind());
        prop_assert_eq!(left.collect(&source).unwrap(), right.collect(&source).unwrap());
        prop_assert_eq!(
            left.set(&source, replacement.clone()).unwrap(),
            right.set(&source, replacement).unwrap()
        );
    }

    /// Grouping does not change single-focus reads either.
    #[test]
    fn prop_lens_composition_is_associative(
        source in prop::collection::vec(grid(), 2..4).prop_map(Value::list),
    ) {
        let cell = |outer: i64| index(outer);
        let left = cell(0).compose(&cell(0)).and_then(|optic| optic.compose(&each()));
        let right = cell(0).compose(&cell(0).compose(&each()).unwrap());
        let (left, right) = (left.unwrap(), right.unwrap());

        prop_assert_eq!(left.collect(&source), right.collect(&source));
    }
}
