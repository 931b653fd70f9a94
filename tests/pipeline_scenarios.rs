//! End-to-end scenarios for composed optics.
//!
//! Tests cover:
//! - Index reads and writes on lists, leaving the input untouched
//! - Nested index writes and structural sharing of untouched rows
//! - Reading the first match of a filtered traversal
//! - Traversal collect and modify
//! - Filtering a traversal by runtime type
//! - Fork writes through several lenses
//! - Build-time rejection of compositions with no shared capability

#![forbid(unsafe_code)]

use lensing::optics::Kind;
use lensing::optics::standard_optics::{
    attribute, each, fold, fork, index, instance_of, item, lens, recur,
};
use lensing::{Object, OpticError, Record, TypeKey, Value, list, map, tuple};
use rstest::rstest;

// =============================================================================
// Indexing
// =============================================================================

#[rstest]
fn index_reads_and_writes_without_touching_state() {
    let state = list![1, 2, 3];

    assert_eq!(index(1).get(&state), Ok(Value::from(2)));
    assert_eq!(index(1).set(&state, Value::from(4)), Ok(list![1, 4, 3]));
    assert_eq!(state, list![1, 2, 3]);
}

#[rstest]
fn nested_index_write_shares_untouched_rows() {
    let state = list![list![1, 2, 3], list![4, 5, 6], list![7, 8, 9]];
    let cell = index(2).compose(&index(1)).unwrap();

    let result = cell.set(&state, Value::from(10)).unwrap();

    assert_eq!(result, list![list![1, 2, 3], list![4, 5, 6], list![7, 10, 9]]);
    let before = state.as_list().unwrap();
    let after = result.as_list().unwrap();
    assert!(after[0].is_same(&before[0]));
    assert!(after[1].is_same(&before[1]));
    assert!(!after[2].is_same(&before[2]));
}

#[rstest]
fn filtered_write_shares_rows_without_matches() {
    let state = list![list![1, 2], list!["a"]];
    let strings = each()
        .compose(&each())
        .and_then(|optic| optic.compose(&instance_of(TypeKey::Str)))
        .unwrap();

    let result = strings.set(&state, Value::from("z")).unwrap();

    assert_eq!(result, list![list![1, 2], list!["z"]]);
    let before = state.as_list().unwrap();
    let after = result.as_list().unwrap();
    assert!(after[0].is_same(&before[0]));
    assert!(!after[1].is_same(&before[1]));
}

#[rstest]
fn filtered_get_reads_first_match_past_misses() {
    let strings = each().compose(&instance_of(TypeKey::Str)).unwrap();

    assert_eq!(strings.get(&list![1, "a", 2, "b"]), Ok(Value::from("a")));
    assert_eq!(strings.get(&list![1, 2]), Err(OpticError::NoFocus));
}

#[rstest]
#[case(-1, 3)]
#[case(-3, 1)]
#[case(0, 1)]
fn negative_indices_count_from_the_end(#[case] position: i64, #[case] expected: i64) {
    assert_eq!(index(position).get(&list![1, 2, 3]), Ok(Value::from(expected)));
}

#[rstest]
fn missing_index_is_an_error() {
    assert!(matches!(
        index(5).get(&list![1, 2, 3]),
        Err(OpticError::MissingKey { .. })
    ));
}

// =============================================================================
// Traversals
// =============================================================================

#[rstest]
fn each_collects_and_modifies() {
    let state = list![1, 2, 3];

    assert_eq!(
        each().collect(&state),
        Ok(vec![Value::from(1), Value::from(2), Value::from(3)])
    );
    assert_eq!(
        each().modify(&state, |focus| Value::from(focus.as_int().unwrap_or_default() + 10)),
        Ok(list![11, 12, 13])
    );
}

#[rstest]
fn each_filtered_by_type() {
    let state = list![1, "a", 2, "b"];
    let strings = each().compose(&instance_of(TypeKey::Str)).unwrap();

    assert_eq!(strings.kind(), Kind::Traversal);
    assert_eq!(strings.collect(&state), Ok(vec![Value::from("a"), Value::from("b")]));
    assert_eq!(strings.set(&state, Value::from("z")), Ok(list![1, "z", 2, "z"]));
}

#[rstest]
fn fork_writes_both_ends() {
    let ends = fork(vec![index(0), index(-1)]).unwrap();

    assert_eq!(ends.kind(), Kind::Setter);
    assert_eq!(ends.set(&list![1, 2, 3], Value::from(0)), Ok(list![0, 2, 0]));
}

#[rstest]
fn fold_then_setter_is_rejected_when_built() {
    let everything = fold(|state: &Value| Ok(state.as_list().unwrap_or_default().to_vec()));
    let ends = fork(vec![index(0)]).unwrap();

    assert_eq!(
        everything.compose(&ends).map(|_| ()),
        Err(OpticError::NoComposition {
            left: Kind::Fold,
            right: Kind::Setter,
        })
    );
}

// =============================================================================
// Records, objects and mappings
// =============================================================================

fn board() -> Value {
    let robot = |name: &str, x: i64, y: i64| {
        Value::from(
            Object::new("Robot")
                .with_attribute("name", name)
                .with_attribute("position", Record::new("Point", [("x", x), ("y", y)])),
        )
    };
    map! {
        "robots" => list![robot("r2", 0, 0), robot("c3", 4, 2)],
        "size" => tuple![8, 8],
    }
}

#[rstest]
fn move_every_robot_right() {
    let state = board();
    let xs = index("robots")
        .compose(&each())
        .and_then(|optic| optic.compose(&attribute("position")))
        .and_then(|optic| optic.compose(&attribute("x")))
        .unwrap();

    let moved = xs
        .modify(&state, |x| Value::from(x.as_int().unwrap_or_default() + 1))
        .unwrap();

    assert_eq!(xs.collect(&moved), Ok(vec![Value::from(1), Value::from(5)]));
    assert!(moved.as_map().unwrap()[&Value::from("size")]
        .is_same(&state.as_map().unwrap()[&Value::from("size")]));
}

#[rstest]
fn recur_finds_every_point() {
    let points = recur(TypeKey::record("Point"));
    let ys = points.compose(&attribute("y")).unwrap();

    assert_eq!(ys.collect(&board()), Ok(vec![Value::from(0), Value::from(2)]));
}

#[rstest]
fn item_removes_entries() {
    let state = board();

    assert_eq!(
        item("size").set(&state, Value::Null).map(|map| map.as_map().map(|entries| entries.len())),
        Ok(Some(1))
    );
}

#[rstest]
fn custom_lens_in_a_pipeline() {
    let swapped = lens(
        |state: &Value| {
            let (first, second) = state.as_pair().ok_or(OpticError::NoFocus)?;
            Ok(tuple![second.clone(), first.clone()])
        },
        |_: &Value, focus: Value| {
            let (first, second) = focus.as_pair().ok_or(OpticError::NoFocus)?;
            Ok(tuple![second.clone(), first.clone()])
        },
    );
    let optic = swapped.compose(&index(0)).unwrap();

    assert_eq!(optic.get(&tuple![1, 2]), Ok(Value::from(2)));
    assert_eq!(optic.set(&tuple![1, 2], Value::from(9)), Ok(tuple![1, 9]));
}
