//! Hook entries for the builtin value shapes.
//!
//! Each constructor returns a fully populated [`HookEntry`]. Strategies
//! never mutate the value they receive: writes clone the outer container
//! (which clones only `Arc` handles to the children) and replace one slot.

use std::collections::{BTreeMap, BTreeSet};
use std::sync::Arc;

use super::entry::HookEntry;
use super::methods;
use crate::error::{OpticError, Result};
use crate::value::Value;

// =============================================================================
// Shared helpers
// =============================================================================

pub(super) fn missing_key(key: &Value, state: &Value) -> OpticError {
    OpticError::MissingKey {
        key: format!("{key:?}"),
        type_name: state.type_key().to_string(),
    }
}

/// Resolves a possibly negative integer key against a sequence of `length`.
pub(super) fn resolve_index(key: &Value, length: usize, state: &Value) -> Result<usize> {
    let index = key
        .as_int()
        .ok_or_else(|| OpticError::type_mismatch("int index", key.type_key()))?;
    let signed_length = i64::try_from(length).unwrap_or(i64::MAX);
    let adjusted = if index < 0 { index + signed_length } else { index };
    usize::try_from(adjusted)
        .ok()
        .filter(|&position| position < length)
        .ok_or_else(|| missing_key(key, state))
}

fn require_same_length(expected: usize, elements: &[Value]) -> Result<()> {
    if elements.len() == expected {
        Ok(())
    } else {
        tracing::trace!(expected, actual = elements.len(), "rebuild count mismatch");
        Err(OpticError::FocusCountMismatch {
            expected,
            actual: elements.len(),
        })
    }
}

fn elements_of(state: &Value) -> Result<&Vec<Value>> {
    match state {
        Value::List(items) | Value::Tuple(items) => Ok(items),
        other => Err(OpticError::type_mismatch("list or tuple", other.type_key())),
    }
}

fn entries_of(state: &Value) -> Result<&BTreeMap<Value, Value>> {
    state
        .as_map()
        .ok_or_else(|| OpticError::type_mismatch("map", state.type_key()))
}

fn members_of(state: &Value) -> Result<&BTreeSet<Value>> {
    state
        .as_set()
        .ok_or_else(|| OpticError::type_mismatch("set", state.type_key()))
}

fn text_of(state: &Value) -> Result<&str> {
    state
        .as_str()
        .ok_or_else(|| OpticError::type_mismatch("str", state.type_key()))
}

/// Rebuilds a list or tuple in the same shape as `state`.
fn same_sequence(state: &Value, items: Vec<Value>) -> Value {
    if state.is_tuple() {
        Value::Tuple(Arc::new(items))
    } else {
        Value::List(Arc::new(items))
    }
}

fn pair(key: &Value, value: &Value) -> Value {
    Value::Tuple(Arc::new(vec![key.clone(), value.clone()]))
}

fn unpair(item: &Value) -> Result<(Value, Value)> {
    item.as_pair()
        .map(|(key, value)| (key.clone(), value.clone()))
        .ok_or_else(|| OpticError::type_mismatch("(key, value) tuple", item.type_key()))
}

// =============================================================================
// Sequences
// =============================================================================

fn sequence_get_item(state: &Value, key: &Value) -> Result<Value> {
    let items = elements_of(state)?;
    let position = resolve_index(key, items.len(), state)?;
    Ok(items[position].clone())
}

fn sequence_set_item(state: &Value, key: &Value, value: Value) -> Result<Value> {
    let items = elements_of(state)?;
    let position = resolve_index(key, items.len(), state)?;
    let mut rebuilt = items.to_vec();
    rebuilt[position] = value;
    Ok(same_sequence(state, rebuilt))
}

fn sequence_del_item(state: &Value, key: &Value) -> Result<Value> {
    let items = elements_of(state)?;
    let position = resolve_index(key, items.len(), state)?;
    let mut rebuilt = items.to_vec();
    rebuilt.remove(position);
    Ok(same_sequence(state, rebuilt))
}

fn sequence_to_iter(state: &Value) -> Result<Vec<Value>> {
    Ok(elements_of(state)?.to_vec())
}

fn sequence_from_iter(state: &Value, elements: Vec<Value>) -> Result<Value> {
    require_same_length(elements_of(state)?.len(), &elements)?;
    Ok(same_sequence(state, elements))
}

fn sequence_contains_add(state: &Value, item: &Value) -> Result<Value> {
    let mut rebuilt = elements_of(state)?.to_vec();
    rebuilt.push(item.clone());
    Ok(same_sequence(state, rebuilt))
}

fn sequence_contains_remove(state: &Value, item: &Value) -> Result<Value> {
    let rebuilt = elements_of(state)?
        .iter()
        .filter(|element| *element != item)
        .cloned()
        .collect();
    Ok(same_sequence(state, rebuilt))
}

fn copy_value(state: &Value) -> Result<Value> {
    Ok(state.shallow_copy())
}

/// Strategies for [`Value::List`]: integer indices, fixed-length rebuilds.
#[must_use]
pub fn sequence() -> HookEntry {
    methods::list(
        HookEntry::new()
            .with_get_item(sequence_get_item)
            .with_set_item(sequence_set_item)
            .with_del_item(sequence_del_item)
            .with_to_iter(sequence_to_iter)
            .with_from_iter(sequence_from_iter)
            .with_copy(copy_value)
            .with_contains_add(sequence_contains_add)
            .with_contains_remove(sequence_contains_remove),
    )
}

/// Strategies for [`Value::Tuple`].
#[must_use]
pub fn tuple() -> HookEntry {
    HookEntry::new()
        .with_get_item(sequence_get_item)
        .with_set_item(sequence_set_item)
        .with_to_iter(sequence_to_iter)
        .with_from_iter(sequence_from_iter)
        .with_copy(copy_value)
        .with_contains_add(sequence_contains_add)
        .with_contains_remove(sequence_contains_remove)
        .with_method("len", methods::len)
}

// =============================================================================
// Mappings
// =============================================================================

fn mapping_get_item(state: &Value, key: &Value) -> Result<Value> {
    entries_of(state)?
        .get(key)
        .cloned()
        .ok_or_else(|| missing_key(key, state))
}

fn mapping_set_item(state: &Value, key: &Value, value: Value) -> Result<Value> {
    let mut rebuilt = entries_of(state)?.clone();
    rebuilt.insert(key.clone(), value);
    Ok(Value::Map(Arc::new(rebuilt)))
}

fn mapping_del_item(state: &Value, key: &Value) -> Result<Value> {
    let mut rebuilt = entries_of(state)?.clone();
    rebuilt.remove(key).ok_or_else(|| missing_key(key, state))?;
    Ok(Value::Map(Arc::new(rebuilt)))
}

fn mapping_to_iter(state: &Value) -> Result<Vec<Value>> {
    Ok(entries_of(state)?
        .iter()
        .map(|(key, value)| pair(key, value))
        .collect())
}

fn mapping_from_iter(state: &Value, elements: Vec<Value>) -> Result<Value> {
    entries_of(state)?;
    let rebuilt = elements
        .iter()
        .map(unpair)
        .collect::<Result<BTreeMap<_, _>>>()?;
    Ok(Value::Map(Arc::new(rebuilt)))
}

fn mapping_contains_add(state: &Value, item: &Value) -> Result<Value> {
    let mut rebuilt = entries_of(state)?.clone();
    rebuilt.entry(item.clone()).or_insert(Value::Null);
    Ok(Value::Map(Arc::new(rebuilt)))
}

fn mapping_contains_remove(state: &Value, item: &Value) -> Result<Value> {
    let mut rebuilt = entries_of(state)?.clone();
    rebuilt.remove(item);
    Ok(Value::Map(Arc::new(rebuilt)))
}

/// Strategies for [`Value::Map`]: arbitrary keys, iteration by `(key, value)`
/// pairs.
#[must_use]
pub fn mapping() -> HookEntry {
    methods::map(
        HookEntry::new()
            .with_get_item(mapping_get_item)
            .with_set_item(mapping_set_item)
            .with_del_item(mapping_del_item)
            .with_to_iter(mapping_to_iter)
            .with_from_iter(mapping_from_iter)
            .with_copy(copy_value)
            .with_contains_add(mapping_contains_add)
            .with_contains_remove(mapping_contains_remove),
    )
}

// =============================================================================
// Sets
// =============================================================================

fn set_to_iter(state: &Value) -> Result<Vec<Value>> {
    Ok(members_of(state)?.iter().cloned().collect())
}

fn set_from_iter(state: &Value, elements: Vec<Value>) -> Result<Value> {
    members_of(state)?;
    Ok(Value::Set(Arc::new(elements.into_iter().collect())))
}

fn set_contains_add(state: &Value, item: &Value) -> Result<Value> {
    let mut rebuilt = members_of(state)?.clone();
    rebuilt.insert(item.clone());
    Ok(Value::Set(Arc::new(rebuilt)))
}

fn set_contains_remove(state: &Value, item: &Value) -> Result<Value> {
    let mut rebuilt = members_of(state)?.clone();
    rebuilt.remove(item);
    Ok(Value::Set(Arc::new(rebuilt)))
}

/// Strategies for [`Value::Set`]. Rebuilds may merge equal members.
#[must_use]
pub fn set() -> HookEntry {
    methods::set(
        HookEntry::new()
            .with_to_iter(set_to_iter)
            .with_from_iter(set_from_iter)
            .with_copy(copy_value)
            .with_contains_add(set_contains_add)
            .with_contains_remove(set_contains_remove),
    )
}

// =============================================================================
// Strings
// =============================================================================

fn characters(text: &str) -> Vec<Value> {
    text.chars().map(|character| Value::from(character.to_string())).collect()
}

fn string_get_item(state: &Value, key: &Value) -> Result<Value> {
    let characters = characters(text_of(state)?);
    let position = resolve_index(key, characters.len(), state)?;
    Ok(characters[position].clone())
}

fn string_set_item(state: &Value, key: &Value, value: Value) -> Result<Value> {
    let mut characters = characters(text_of(state)?);
    let position = resolve_index(key, characters.len(), state)?;
    characters[position] = value;
    string_from_iter(state, characters)
}

fn string_to_iter(state: &Value) -> Result<Vec<Value>> {
    Ok(characters(text_of(state)?))
}

fn string_from_iter(state: &Value, elements: Vec<Value>) -> Result<Value> {
    text_of(state)?;
    let mut rebuilt = String::new();
    for element in &elements {
        rebuilt.push_str(text_of(element)?);
    }
    Ok(Value::from(rebuilt))
}

/// Strategies for [`Value::Str`]: items are one-character strings.
#[must_use]
pub fn string() -> HookEntry {
    methods::string(
        HookEntry::new()
            .with_get_item(string_get_item)
            .with_set_item(string_set_item)
            .with_to_iter(string_to_iter)
            .with_from_iter(string_from_iter)
            .with_copy(copy_value),
    )
}

// =============================================================================
// Records
// =============================================================================

fn record_of(state: &Value) -> Result<&crate::value::Record> {
    state
        .as_record()
        .ok_or_else(|| OpticError::type_mismatch("record", state.type_key()))
}

fn record_get_item(state: &Value, key: &Value) -> Result<Value> {
    let record = record_of(state)?;
    let position = resolve_index(key, record.values().len(), state)?;
    Ok(record.values()[position].clone())
}

fn record_set_item(state: &Value, key: &Value, value: Value) -> Result<Value> {
    let record = record_of(state)?;
    let position = resolve_index(key, record.values().len(), state)?;
    Ok(Value::from(record.with_value(position, value)?))
}

fn record_get_attr(state: &Value, name: &str) -> Result<Value> {
    let record = record_of(state)?;
    record
        .get(name)
        .cloned()
        .ok_or_else(|| missing_key(&Value::from(name), state))
}

fn record_set_attr(state: &Value, name: &str, value: Value) -> Result<Value> {
    let record = record_of(state)?;
    let position = record
        .position(name)
        .ok_or_else(|| missing_key(&Value::from(name), state))?;
    Ok(Value::from(record.with_value(position, value)?))
}

fn record_to_iter(state: &Value) -> Result<Vec<Value>> {
    Ok(record_of(state)?.values().to_vec())
}

fn record_from_iter(state: &Value, elements: Vec<Value>) -> Result<Value> {
    let record = record_of(state)?;
    if elements.len() != record.values().len() {
        tracing::trace!(
            expected = record.values().len(),
            actual = elements.len(),
            "rebuild count mismatch"
        );
    }
    Ok(Value::from(record.with_values(elements)?))
}

/// Strategies for [`Value::Record`]: fields by position or by name, rebuilt
/// by reconstruction with one field replaced.
#[must_use]
pub fn record() -> HookEntry {
    HookEntry::new()
        .with_get_item(record_get_item)
        .with_set_item(record_set_item)
        .with_get_attr(record_get_attr)
        .with_set_attr(record_set_attr)
        .with_to_iter(record_to_iter)
        .with_from_iter(record_from_iter)
        .with_copy(copy_value)
        .with_method("len", methods::len)
}

// =============================================================================
// Objects and scalars
// =============================================================================

fn object_get_attr(state: &Value, name: &str) -> Result<Value> {
    let object = state
        .as_object()
        .ok_or_else(|| OpticError::type_mismatch("object", state.type_key()))?;
    object
        .attribute(name)
        .cloned()
        .ok_or_else(|| missing_key(&Value::from(name), state))
}

/// Strategies for objects of a class with no registered entry.
///
/// Attributes are read directly and written by the copy-then-replace
/// fallback of [`HookEntry::set_attr`].
#[must_use]
pub fn generic_object() -> HookEntry {
    HookEntry::new()
        .with_get_attr(object_get_attr)
        .with_copy(copy_value)
}

/// Strategies for null, booleans and numbers: copyable, with `abs` on numbers.
#[must_use]
pub fn scalar() -> HookEntry {
    methods::number(HookEntry::new().with_copy(copy_value))
}
