//! Named methods of the builtin shapes, invoked by `call` and `call_mut`.
//!
//! Mutating methods (`append`, `sort`, `insert`, ...) change the receiver in
//! place and return null; the receiver is always a private copy by the time
//! they run, since its container is shared through [`Arc::make_mut`].

use std::sync::Arc;

use super::entry::HookEntry;
use crate::error::{OpticError, Result};
use crate::value::{TypeKey, Value};

fn argument<'a>(arguments: &'a [Value], position: usize, method: &str) -> Result<&'a Value> {
    arguments.get(position).ok_or_else(|| {
        OpticError::type_mismatch(
            format!("at least {} argument(s) for {method}", position + 1),
            format!("{} argument(s)", arguments.len()),
        )
    })
}

fn count(length: usize) -> Value {
    Value::Int(i64::try_from(length).unwrap_or(i64::MAX))
}

fn list_mut(receiver: &mut Value) -> Result<&mut Vec<Value>> {
    match receiver {
        Value::List(items) => Ok(Arc::make_mut(items)),
        other => Err(OpticError::type_mismatch("list", other.type_key())),
    }
}

fn text_of(receiver: &Value) -> Result<&str> {
    receiver
        .as_str()
        .ok_or_else(|| OpticError::type_mismatch("str", receiver.type_key()))
}

/// `len()`: the number of elements, entries, members or characters.
pub(super) fn len(receiver: &mut Value, _: &[Value]) -> Result<Value> {
    match receiver {
        Value::List(items) | Value::Tuple(items) => Ok(count(items.len())),
        Value::Map(entries) => Ok(count(entries.len())),
        Value::Set(members) => Ok(count(members.len())),
        Value::Str(text) => Ok(count(text.chars().count())),
        Value::Record(record) => Ok(count(record.values().len())),
        other => Err(OpticError::unsupported("method len", other.type_key())),
    }
}

// =============================================================================
// Lists
// =============================================================================

pub(super) fn list(entry: HookEntry) -> HookEntry {
    entry
        .with_method("append", |receiver, arguments| {
            let item = argument(arguments, 0, "append")?.clone();
            list_mut(receiver)?.push(item);
            Ok(Value::Null)
        })
        .with_method("extend", |receiver, arguments| {
            let extra = match argument(arguments, 0, "extend")? {
                Value::List(items) | Value::Tuple(items) => items.to_vec(),
                other => return Err(OpticError::type_mismatch("list or tuple", other.type_key())),
            };
            list_mut(receiver)?.extend(extra);
            Ok(Value::Null)
        })
        .with_method("pop", |receiver, _| {
            let items = list_mut(receiver)?;
            items.pop().ok_or_else(|| OpticError::MissingKey {
                key: "-1".to_string(),
                type_name: TypeKey::List.to_string(),
            })
        })
        .with_method("sort", |receiver, _| {
            list_mut(receiver)?.sort();
            Ok(Value::Null)
        })
        .with_method("reverse", |receiver, _| {
            list_mut(receiver)?.reverse();
            Ok(Value::Null)
        })
        .with_method("len", len)
}

// =============================================================================
// Maps
// =============================================================================

pub(super) fn map(entry: HookEntry) -> HookEntry {
    fn entries_mut(receiver: &mut Value) -> Result<&mut std::collections::BTreeMap<Value, Value>> {
        match receiver {
            Value::Map(entries) => Ok(Arc::make_mut(entries)),
            other => Err(OpticError::type_mismatch("map", other.type_key())),
        }
    }

    entry
        .with_method("get", |receiver, arguments| {
            let key = argument(arguments, 0, "get")?;
            let default = arguments.get(1).cloned().unwrap_or_default();
            let entries = receiver
                .as_map()
                .ok_or_else(|| OpticError::type_mismatch("map", receiver.type_key()))?;
            Ok(entries.get(key).cloned().unwrap_or(default))
        })
        .with_method("insert", |receiver, arguments| {
            let key = argument(arguments, 0, "insert")?.clone();
            let value = argument(arguments, 1, "insert")?.clone();
            entries_mut(receiver)?.insert(key, value);
            Ok(Value::Null)
        })
        .with_method("remove", |receiver, arguments| {
            let key = argument(arguments, 0, "remove")?;
            Ok(entries_mut(receiver)?.remove(key).unwrap_or_default())
        })
        .with_method("len", len)
}

// =============================================================================
// Sets
// =============================================================================

pub(super) fn set(entry: HookEntry) -> HookEntry {
    fn members_mut(receiver: &mut Value) -> Result<&mut std::collections::BTreeSet<Value>> {
        match receiver {
            Value::Set(members) => Ok(Arc::make_mut(members)),
            other => Err(OpticError::type_mismatch("set", other.type_key())),
        }
    }

    entry
        .with_method("add", |receiver, arguments| {
            let member = argument(arguments, 0, "add")?.clone();
            members_mut(receiver)?.insert(member);
            Ok(Value::Null)
        })
        .with_method("discard", |receiver, arguments| {
            let member = argument(arguments, 0, "discard")?;
            members_mut(receiver)?.remove(member);
            Ok(Value::Null)
        })
        .with_method("len", len)
}

// =============================================================================
// Strings
// =============================================================================

pub(super) fn string(entry: HookEntry) -> HookEntry {
    entry
        .with_method("upper", |receiver, _| {
            Ok(Value::from(text_of(receiver)?.to_uppercase()))
        })
        .with_method("lower", |receiver, _| {
            Ok(Value::from(text_of(receiver)?.to_lowercase()))
        })
        .with_method("strip", |receiver, _| Ok(Value::from(text_of(receiver)?.trim())))
        .with_method("replace", |receiver, arguments| {
            let from = text_of(argument(arguments, 0, "replace")?)?;
            let to = text_of(argument(arguments, 1, "replace")?)?;
            Ok(Value::from(text_of(receiver)?.replace(from, to)))
        })
        .with_method("len", len)
}

// =============================================================================
// Numbers
// =============================================================================

pub(super) fn number(entry: HookEntry) -> HookEntry {
    entry.with_method("abs", |receiver, _| match receiver {
        Value::Int(value) => Ok(Value::Int(value.saturating_abs())),
        Value::Float(value) => Ok(Value::Float(value.abs())),
        other => Err(OpticError::unsupported("method abs", other.type_key())),
    })
}

#[cfg(test)]
mod tests {
    use crate::hooks::builtin;
    use crate::value::Value;
    use crate::{list, map};
    use rstest::rstest;

    #[rstest]
    fn test_list_append_mutates_receiver() {
        let mut receiver = list![1, 2];
        let result = builtin::sequence().call_method(&mut receiver, "append", &[Value::from(3)]);

        assert_eq!(result, Ok(Value::Null));
        assert_eq!(receiver, list![1, 2, 3]);
    }

    #[rstest]
    fn test_list_sort_leaves_shared_original_untouched() {
        let original = list![3, 1, 2];
        let mut receiver = original.clone();
        builtin::sequence()
            .call_method(&mut receiver, "sort", &[])
            .unwrap();

        assert_eq!(receiver, list![1, 2, 3]);
        assert_eq!(original, list![3, 1, 2]);
    }

    #[rstest]
    fn test_list_pop() {
        let mut receiver = list![1, 2];
        let entry = builtin::sequence();

        assert_eq!(entry.call_method(&mut receiver, "pop", &[]), Ok(Value::from(2)));
        assert_eq!(entry.call_method(&mut receiver, "pop", &[]), Ok(Value::from(1)));
        assert!(entry.call_method(&mut receiver, "pop", &[]).is_err());
    }

    #[rstest]
    fn test_missing_argument() {
        let mut receiver = list![];
        assert!(builtin::sequence()
            .call_method(&mut receiver, "append", &[])
            .is_err());
    }

    #[rstest]
    #[case("upper", vec![], "HELLO, WORLD ")]
    #[case("lower", vec![], "hello, world ")]
    #[case("strip", vec![], "Hello, World")]
    #[case("replace", vec![Value::from("World"), Value::from("Rust")], "Hello, Rust ")]
    fn test_string_methods(
        #[case] method: &str,
        #[case] arguments: Vec<Value>,
        #[case] expected: &str,
    ) {
        let mut receiver = Value::from("Hello, World ");
        assert_eq!(
            builtin::string().call_method(&mut receiver, method, &arguments),
            Ok(Value::from(expected))
        );
    }

    #[rstest]
    fn test_map_methods() {
        let entry = builtin::mapping();
        let mut receiver = map! { "a" => 1 };

        assert_eq!(
            entry.call_method(&mut receiver, "get", &[Value::from("b"), Value::from(0)]),
            Ok(Value::from(0))
        );
        entry
            .call_method(&mut receiver, "insert", &[Value::from("b"), Value::from(2)])
            .unwrap();
        assert_eq!(entry.call_method(&mut receiver, "len", &[]), Ok(Value::from(2)));
        assert_eq!(
            entry.call_method(&mut receiver, "remove", &[Value::from("a")]),
            Ok(Value::from(1))
        );
        assert_eq!(receiver, map! { "b" => 2 });
    }

    #[rstest]
    fn test_set_methods() {
        let entry = builtin::set();
        let mut receiver = Value::set([1]);

        entry.call_method(&mut receiver, "add", &[Value::from(2)]).unwrap();
        entry.call_method(&mut receiver, "discard", &[Value::from(1)]).unwrap();
        assert_eq!(receiver, Value::set([2]));
    }

    #[rstest]
    #[case(Value::from(-4), Value::from(4))]
    #[case(Value::from(-1.5), Value::from(1.5))]
    fn test_abs(#[case] mut receiver: Value, #[case] expected: Value) {
        assert_eq!(builtin::scalar().call_method(&mut receiver, "abs", &[]), Ok(expected));
    }
}
