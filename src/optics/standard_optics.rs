//! Standard optics that are commonly used.
//!
//! Every constructor returns a ready-to-compose [`Pipeline`]. Primitive
//! constructors take the functions that define the optic; the rest close
//! over the hook registry, so they work on any value whose type provides the
//! matching strategies.
//!
//! # Example
//!
//! ```
//! use lensing::optics::standard_optics::{each, instance_of};
//! use lensing::{TypeKey, Value, list};
//!
//! let strings = each().compose(&instance_of(TypeKey::Str)).unwrap();
//! let state = list![1, "a", 2, "b"];
//!
//! assert_eq!(strings.collect(&state), Ok(vec![Value::from("a"), Value::from("b")]));
//! assert_eq!(strings.set(&state, Value::from("z")), Ok(list![1, "z", 2, "z"]));
//! ```

use std::sync::Arc;

use super::{
    AttributeLens, ContainsLens, EachTraversal, ErrorIso, FilteringPrism, ForkSetter,
    FunctionFold, FunctionGetter, FunctionIso, FunctionLens, FunctionPrism, FunctionReview,
    FunctionTraversal, IndexLens, IndexOrElseLens, InstancePrism, ItemByValueLens, ItemLens,
    ItemsTraversal, IterableFold, Kind, Optic, PartsLens, Pipeline, RecurTraversal,
    RegexTraversal, TupleLens,
};
use crate::error::{OpticError, Result};
use crate::value::{TypeKey, Value};

// =============================================================================
// Primitive constructors
// =============================================================================

/// Creates a Lens from a getter and a setter.
///
/// # Example
///
/// ```
/// use lensing::optics::standard_optics::lens;
/// use lensing::{Value, list};
///
/// let length = lens(
///     |state: &Value| Ok(Value::from(state.as_list().map_or(0, <[Value]>::len) as i64)),
///     |state: &Value, focus: Value| {
///         let mut items = state.as_list().unwrap_or_default().to_vec();
///         items.resize(usize::try_from(focus.as_int().unwrap_or_default()).unwrap_or_default(), Value::Null);
///         Ok(Value::list(items))
///     },
/// );
///
/// assert_eq!(length.get(&list![1, 2, 3]), Ok(Value::from(3)));
/// assert_eq!(length.set(&list![1, 2, 3], Value::from(1)), Ok(list![1]));
/// ```
#[must_use]
pub fn lens<G, S>(getter: G, setter: S) -> Pipeline
where
    G: Fn(&Value) -> Result<Value> + Send + Sync + 'static,
    S: Fn(&Value, Value) -> Result<Value> + Send + Sync + 'static,
{
    Pipeline::new(FunctionLens::new(getter, setter))
}

/// Creates an Iso from two mutually inverse functions.
///
/// The functions are trusted to be inverses; this is not checked.
#[must_use]
pub fn iso<F, B>(forward: F, backward: B) -> Pipeline
where
    F: Fn(&Value) -> Result<Value> + Send + Sync + 'static,
    B: Fn(&Value) -> Result<Value> + Send + Sync + 'static,
{
    Pipeline::new(FunctionIso::new(forward, backward))
}

/// Creates a Prism from a partial unwrap and a wrap.
///
/// Use [`FunctionPrism::with_null_is_absent`] or
/// [`FunctionPrism::with_ignore_errors`] through [`Pipeline::new`] to treat
/// null foci or unwrap errors as missing.
#[must_use]
pub fn prism<U, W>(unwrap: U, wrap: W) -> Pipeline
where
    U: Fn(&Value) -> Result<Option<Value>> + Send + Sync + 'static,
    W: Fn(&Value) -> Result<Value> + Send + Sync + 'static,
{
    Pipeline::new(FunctionPrism::new(unwrap, wrap))
}

/// Creates a Traversal from a folder and a builder.
///
/// The builder receives exactly one new focus per focus the folder listed.
#[must_use]
pub fn traversal<F, B>(folder: F, builder: B) -> Pipeline
where
    F: Fn(&Value) -> Result<Vec<Value>> + Send + Sync + 'static,
    B: Fn(&Value, Vec<Value>) -> Result<Value> + Send + Sync + 'static,
{
    Pipeline::new(FunctionTraversal::new(folder, builder))
}

/// Creates a Getter from a function computing the single focus.
#[must_use]
pub fn getter<G>(getter: G) -> Pipeline
where
    G: Fn(&Value) -> Result<Value> + Send + Sync + 'static,
{
    Pipeline::new(FunctionGetter::new(getter))
}

/// Creates a Fold from a function listing every focus.
///
/// The function runs afresh on every read.
#[must_use]
pub fn fold<F, I>(folder: F) -> Pipeline
where
    F: Fn(&Value) -> Result<I> + Send + Sync + 'static,
    I: IntoIterator<Item = Value>,
{
    Pipeline::new(FunctionFold::new(folder))
}

/// Creates a Review from a construction function.
#[must_use]
pub fn review<C>(construct: C) -> Pipeline
where
    C: Fn(&Value) -> Result<Value> + Send + Sync + 'static,
{
    Pipeline::new(FunctionReview::new(construct))
}

/// Creates a Setter writing through each of `optics` in order.
///
/// # Errors
///
/// Fails with `Capability` if any optic cannot write.
pub fn fork(optics: Vec<Pipeline>) -> Result<Pipeline> {
    ForkSetter::new(optics).map(Pipeline::new)
}

// =============================================================================
// Composition
// =============================================================================

/// Returns `first` followed by `second`.
///
/// # Errors
///
/// Fails with `NoComposition` when the kinds share no capability.
pub fn compose(first: &Pipeline, second: &Pipeline) -> Result<Pipeline> {
    first.compose(second)
}

/// Returns the Iso focusing the whole state.
#[must_use]
pub fn identity() -> Pipeline {
    Pipeline::identity()
}

/// Creates an Iso that reads unchanged and applies `setter` on every write.
///
/// # Example
///
/// ```
/// use lensing::Value;
/// use lensing::optics::standard_optics::normalise;
///
/// let rounded = normalise(|focus: &Value| Ok(Value::from(focus.as_float().unwrap_or_default().round())));
/// assert_eq!(rounded.set(&Value::from(1.0), Value::from(2.6)), Ok(Value::from(3.0)));
/// ```
#[must_use]
pub fn normalise<S>(setter: S) -> Pipeline
where
    S: Fn(&Value) -> Result<Value> + Send + Sync + 'static,
{
    Pipeline::new(FunctionIso::normalising(setter))
}

/// Creates an Iso that fails with `raised` whenever it is applied.
///
/// Use [`ErrorIso::with_message`] through [`Pipeline::new`] for a message
/// that names the offending value.
#[must_use]
pub fn error(raised: OpticError) -> Pipeline {
    Pipeline::new(ErrorIso::new(raised))
}

// =============================================================================
// Hook-backed lenses
// =============================================================================

/// Focuses the item at `key` using the `get_item` and `set_item` hooks.
///
/// Sequences accept negative indices counted from the end.
#[must_use]
pub fn index(key: impl Into<Value>) -> Pipeline {
    Pipeline::new(IndexLens::new(key.into()))
}

/// Focuses the attribute `name` using the `get_attr` and `set_attr` hooks.
#[must_use]
pub fn attribute(name: &str) -> Pipeline {
    Pipeline::new(AttributeLens::new(name))
}

/// Like [`index`], but reads `default` when `key` is missing.
///
/// ```
/// use lensing::optics::standard_optics::index_or;
/// use lensing::{Value, map};
///
/// let count = index_or("count", 0);
/// assert_eq!(count.get(&map! {}), Ok(Value::from(0)));
/// assert_eq!(count.set(&map! {}, Value::from(1)), Ok(map! { "count" => 1 }));
/// ```
#[must_use]
pub fn index_or(key: impl Into<Value>, default: impl Into<Value>) -> Pipeline {
    Pipeline::new(IndexOrElseLens::new(key.into(), default.into()))
}

/// Focuses the `(key, value)` pair of a mapping, or null when absent.
///
/// Writing null removes the entry; writing a pair with another key renames
/// it.
#[must_use]
pub fn item(key: impl Into<Value>) -> Pipeline {
    Pipeline::new(ItemLens::new(key.into()))
}

/// Focuses the first `(key, value)` pair whose value equals `value`.
#[must_use]
pub fn item_by_value(value: impl Into<Value>) -> Pipeline {
    Pipeline::new(ItemByValueLens::new(value.into()))
}

/// Focuses a boolean: whether the state contains `item`.
#[must_use]
pub fn contains(item: impl Into<Value>) -> Pipeline {
    Pipeline::new(ContainsLens::new(item.into()))
}

// =============================================================================
// Traversals
// =============================================================================

/// Focuses every element of a container.
#[must_use]
pub fn each() -> Pipeline {
    Pipeline::new(EachTraversal)
}

/// Focuses the `(key, value)` pairs of a mapping.
#[must_use]
pub fn items() -> Pipeline {
    Pipeline::new(ItemsTraversal)
}

/// Focuses the keys of a mapping.
#[must_use]
pub fn keys() -> Pipeline {
    items_then_index(0)
}

/// Focuses the values of a mapping.
///
/// ```
/// use lensing::map;
/// use lensing::optics::standard_optics::values;
///
/// let doubled = values().modify(&map! { "a" => 1, "b" => 2 }, |focus| {
///     (focus.as_int().unwrap_or_default() * 2).into()
/// });
/// assert_eq!(doubled, Ok(map! { "a" => 2, "b" => 4 }));
/// ```
#[must_use]
pub fn values() -> Pipeline {
    items_then_index(1)
}

/// Focuses one slot of every `(key, value)` pair of a mapping.
fn items_then_index(position: i64) -> Pipeline {
    let steps: [Arc<dyn Optic>; 2] = [
        Arc::new(ItemsTraversal),
        Arc::new(IndexLens::new(Value::from(position))),
    ];
    Pipeline::from_known_steps(steps, Kind::Traversal)
}

/// Focuses every match of `pattern` in a string.
///
/// # Errors
///
/// Fails with `InvalidPattern` if `pattern` does not compile.
pub fn regex(pattern: &str) -> Result<Pipeline> {
    RegexTraversal::new(pattern).map(Pipeline::new)
}

/// Reads every element of an iterable value without being able to write.
#[must_use]
pub fn iter() -> Pipeline {
    Pipeline::new(IterableFold)
}

/// Focuses every sub-value of type `type_key`, searching recursively.
#[must_use]
pub fn recur(type_key: TypeKey) -> Pipeline {
    Pipeline::new(RecurTraversal::new(type_key))
}

// =============================================================================
// Prisms
// =============================================================================

/// Focuses the state only when it has type `type_key`.
#[must_use]
pub fn instance_of(type_key: TypeKey) -> Pipeline {
    Pipeline::new(InstancePrism::new(type_key))
}

/// Focuses the state only when `predicate` holds for it.
///
/// ```
/// use lensing::optics::standard_optics::{each, filter};
/// use lensing::{Value, list};
///
/// let odd = each()
///     .compose(&filter(|focus: &Value| focus.as_int().is_some_and(|number| number % 2 == 1)))
///     .unwrap();
/// assert_eq!(odd.set(&list![1, 2, 3], Value::from(0)), Ok(list![0, 2, 0]));
/// ```
#[must_use]
pub fn filter<P>(predicate: P) -> Pipeline
where
    P: Fn(&Value) -> bool + Send + Sync + 'static,
{
    Pipeline::new(FilteringPrism::new(predicate))
}

/// Focuses the state unless it is null.
#[must_use]
pub fn just() -> Pipeline {
    Pipeline::new(
        FunctionPrism::new(|state: &Value| Ok(Some(state.clone())), |focus: &Value| Ok(focus.clone()))
            .with_null_is_absent(true),
    )
}

// =============================================================================
// Combinators
// =============================================================================

/// Combines several Lens-kind optics into one Lens focusing a tuple.
///
/// # Errors
///
/// Fails with `Capability` if any optic is not at least a Lens.
///
/// # Example
///
/// ```
/// use lensing::optics::standard_optics::{index, tuple_of};
/// use lensing::{list, tuple};
///
/// let ends = tuple_of(vec![index(0), index(-1)]).unwrap();
/// assert_eq!(ends.get(&list![1, 2, 3]), Ok(tuple![1, 3]));
/// assert_eq!(ends.set(&list![1, 2, 3], tuple![3, 1]), Ok(list![3, 2, 1]));
/// ```
pub fn tuple_of(optics: Vec<Pipeline>) -> Result<Pipeline> {
    TupleLens::new(optics).map(Pipeline::new)
}

/// Focuses the list of every focus of `optic`.
///
/// The result is a Lens over a Traversal and a Getter over a Fold.
///
/// # Errors
///
/// Fails with `Capability` if `optic` cannot read.
pub fn parts(optic: Pipeline) -> Result<Pipeline> {
    PartsLens::new(optic).map(Pipeline::new)
}
