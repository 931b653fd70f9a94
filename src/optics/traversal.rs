//! Traversal optics: any number of foci, readable and writable.
//!
//! A Traversal lists the foci of a state and rebuilds the state from a
//! replacement for each one. Generic traversals delegate both directions to
//! the hook registry.
//!
//! # Laws
//!
//! 1. **Identity Law**: `traversal.modify(&source, |x| x) == source`
//! 2. **Composition Law**:
//!    `traversal.modify(&traversal.modify(&source, f), g) == traversal.modify(&source, |x| g(f(x)))`
//!
//! # Examples
//!
//! ```
//! use lensing::list;
//! use lensing::optics::standard_optics::each;
//!
//! let state = list![1, 2, 3];
//! assert_eq!(each().collect(&state), Ok(vec![1.into(), 2.into(), 3.into()]));
//! assert_eq!(
//!     each().modify(&state, |focus| (focus.as_int().unwrap_or_default() + 10).into()),
//!     Ok(list![11, 12, 13])
//! );
//! ```

use std::fmt;
use std::sync::Arc;

use regex::Regex;

use super::{Kind, Modifier, Optic};
use crate::error::{OpticError, Result};
use crate::hooks::{self, Iterate, Rebuild};
use crate::value::{TypeKey, Value};

/// Applies `function` to every focus in order.
///
/// Returns `None` when every replacement is the very same value as its
/// focus, so callers can hand back the untouched state.
fn replace_each(foci: Vec<Value>, function: &mut Modifier<'_>) -> Result<Option<Vec<Value>>> {
    let mut changed = false;
    let mut replacements = Vec::with_capacity(foci.len());
    for focus in foci {
        let replacement = function(focus.clone())?;
        changed |= !replacement.is_same(&focus);
        replacements.push(replacement);
    }
    Ok(changed.then_some(replacements))
}

/// A traversal implemented using a folder and a builder function.
///
/// The builder receives the old state and exactly one replacement per focus
/// the folder produced, in the same order.
#[derive(Clone)]
pub struct FunctionTraversal {
    folder: Iterate,
    builder: Rebuild,
}

impl FunctionTraversal {
    /// Creates a new `FunctionTraversal`.
    ///
    /// # Arguments
    ///
    /// * `folder` - Lists every focus of a state, in order
    /// * `builder` - Rebuilds a state from the old one and the new foci
    #[must_use]
    pub fn new<F, B>(folder: F, builder: B) -> Self
    where
        F: Fn(&Value) -> Result<Vec<Value>> + Send + Sync + 'static,
        B: Fn(&Value, Vec<Value>) -> Result<Value> + Send + Sync + 'static,
    {
        Self {
            folder: Arc::new(folder),
            builder: Arc::new(builder),
        }
    }
}

impl fmt::Debug for FunctionTraversal {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter.debug_struct("FunctionTraversal").finish_non_exhaustive()
    }
}

impl Optic for FunctionTraversal {
    fn kind(&self) -> Kind {
        Kind::Traversal
    }

    fn get_all(&self, state: &Value) -> Result<Vec<Value>> {
        (self.folder)(state)
    }

    fn modify_all(&self, state: &Value, function: &mut Modifier<'_>) -> Result<Value> {
        match replace_each((self.folder)(state)?, function)? {
            Some(foci) => (self.builder)(state, foci),
            None => Ok(state.clone()),
        }
    }
}

/// Focuses every element of a container.
///
/// Iteration and rebuilding use the `to_iter` and `from_iter` strategies of
/// the state's hook entry. Mappings are traversed by `(key, value)` pairs.
#[derive(Debug, Clone, Copy, Default)]
pub struct EachTraversal;

impl Optic for EachTraversal {
    fn kind(&self) -> Kind {
        Kind::Traversal
    }

    fn get_all(&self, state: &Value) -> Result<Vec<Value>> {
        hooks::resolve(state).to_iter(state)
    }

    fn modify_all(&self, state: &Value, function: &mut Modifier<'_>) -> Result<Value> {
        let entry = hooks::resolve(state);
        match replace_each(entry.to_iter(state)?, function)? {
            Some(foci) => entry.from_iter(state, foci),
            None => Ok(state.clone()),
        }
    }
}

/// Focuses the `(key, value)` pairs of a mapping.
///
/// Replacing a pair with null drops that entry from the rebuilt mapping.
#[derive(Debug, Clone, Copy, Default)]
pub struct ItemsTraversal;

impl ItemsTraversal {
    fn require_map(state: &Value) -> Result<()> {
        if state.is_map() {
            Ok(())
        } else {
            Err(OpticError::type_mismatch("map", state.type_key()))
        }
    }
}

impl Optic for ItemsTraversal {
    fn kind(&self) -> Kind {
        Kind::Traversal
    }

    fn get_all(&self, state: &Value) -> Result<Vec<Value>> {
        Self::require_map(state)?;
        hooks::resolve(state).to_iter(state)
    }

    fn modify_all(&self, state: &Value, function: &mut Modifier<'_>) -> Result<Value> {
        Self::require_map(state)?;
        let entry = hooks::resolve(state);
        let Some(replacements) = replace_each(entry.to_iter(state)?, function)? else {
            return Ok(state.clone());
        };
        let items = replacements
            .into_iter()
            .filter(|replacement| !replacement.is_null())
            .collect();
        entry.from_iter(state, items)
    }
}

/// Focuses every sub-value of one type, found by recursing through the state.
///
/// Containers are entered through their hook entries and objects through
/// their attributes, in name order. Strings are leaves. Once a value of the
/// target type is found, recursion stops there. Branches holding no focus
/// are kept as the very same values in the rebuilt state.
///
/// # Example
///
/// ```
/// use lensing::optics::standard_optics::recur;
/// use lensing::{TypeKey, Value, list, map};
///
/// let state = list![1, "a", list![2, map! { "k" => 3 }]];
/// let ints = recur(TypeKey::Int);
///
/// assert_eq!(ints.collect(&state), Ok(vec![1.into(), 2.into(), 3.into()]));
/// assert_eq!(
///     ints.modify(&state, |focus| (focus.as_int().unwrap_or_default() * 2).into()),
///     Ok(list![2, "a", list![4, map! { "k" => 6 }]])
/// );
/// ```
#[derive(Debug, Clone)]
pub struct RecurTraversal {
    type_key: TypeKey,
}

impl RecurTraversal {
    /// Creates a traversal over every sub-value of type `type_key`.
    #[must_use]
    pub const fn new(type_key: TypeKey) -> Self {
        Self { type_key }
    }

    fn gather(&self, state: &Value, foci: &mut Vec<Value>) -> Result<()> {
        if state.type_key() == self.type_key {
            foci.push(state.clone());
            return Ok(());
        }
        if state.is_str() {
            return Ok(());
        }
        let entry = hooks::resolve(state);
        if entry.is_iterable() {
            for child in entry.to_iter(state)? {
                self.gather(&child, foci)?;
            }
        } else if let Value::Object(object) = state {
            for (_, attribute) in object.attributes() {
                self.gather(attribute, foci)?;
            }
        }
        Ok(())
    }

    /// Rebuilds `state`, returning `None` when it holds no focus.
    fn rebuild(&self, state: &Value, function: &mut Modifier<'_>) -> Result<Option<Value>> {
        if state.type_key() == self.type_key {
            return function(state.clone()).map(Some);
        }
        if state.is_str() {
            return Ok(None);
        }
        let entry = hooks::resolve(state);
        if entry.is_iterable() {
            let mut touched = false;
            let mut children = Vec::new();
            for child in entry.to_iter(state)? {
                match self.rebuild(&child, function)? {
                    Some(replacement) => {
                        touched = true;
                        children.push(replacement);
                    }
                    None => children.push(child),
                }
            }
            return if touched {
                entry.from_iter(state, children).map(Some)
            } else {
                Ok(None)
            };
        }
        let Value::Object(object) = state else {
            return Ok(None);
        };
        let mut rebuilt: Option<Value> = None;
        for (name, attribute) in object.attributes() {
            if let Some(replacement) = self.rebuild(attribute, function)? {
                let base = rebuilt.as_ref().unwrap_or(state);
                rebuilt = Some(entry.set_attr(base, name, replacement)?);
            }
        }
        Ok(rebuilt)
    }
}

impl Optic for RecurTraversal {
    fn kind(&self) -> Kind {
        Kind::Traversal
    }

    fn get_all(&self, state: &Value) -> Result<Vec<Value>> {
        let mut foci = Vec::new();
        self.gather(state, &mut foci)?;
        Ok(foci)
    }

    fn modify_all(&self, state: &Value, function: &mut Modifier<'_>) -> Result<Value> {
        Ok(self
            .rebuild(state, function)?
            .unwrap_or_else(|| state.clone()))
    }
}

// =============================================================================
// Regex traversal
// =============================================================================

/// Focuses every non-overlapping match of a regular expression in a string.
///
/// Writing replaces each match, left to right, with its new focus, which
/// must itself be a string. Text between matches is kept as is.
///
/// # Example
///
/// ```
/// use lensing::optics::standard_optics::regex;
/// use lensing::Value;
///
/// let digits = regex(r"\d+").unwrap();
/// let state = Value::from("a1b22c333");
///
/// assert_eq!(digits.collect(&state), Ok(vec!["1".into(), "22".into(), "333".into()]));
/// assert_eq!(
///     digits.modify(&state, |focus| format!("<{}>", focus.as_str().unwrap_or_default()).into()),
///     Ok(Value::from("a<1>b<22>c<333>"))
/// );
/// ```
#[derive(Debug, Clone)]
pub struct RegexTraversal {
    pattern: Regex,
}

impl RegexTraversal {
    /// Compiles `pattern` into a traversal.
    ///
    /// Flags are given inline, for example `(?i)` for case-insensitive
    /// matching.
    ///
    /// # Errors
    ///
    /// Fails with [`OpticError::InvalidPattern`] if `pattern` does not
    /// compile.
    pub fn new(pattern: &str) -> Result<Self> {
        Regex::new(pattern)
            .map(Self::from_regex)
            .map_err(|error| OpticError::InvalidPattern {
                pattern: pattern.to_string(),
                message: error.to_string(),
            })
    }

    /// Wraps an already compiled regular expression.
    #[must_use]
    pub const fn from_regex(pattern: Regex) -> Self {
        Self { pattern }
    }

    /// Returns the pattern this traversal matches.
    #[must_use]
    pub fn as_str(&self) -> &str {
        self.pattern.as_str()
    }

    fn text_of(state: &Value) -> Result<&str> {
        state
            .as_str()
            .ok_or_else(|| OpticError::type_mismatch("str", state.type_key()))
    }

    fn rebuild(&self, text: &str, replacements: Vec<Value>) -> Result<Value> {
        let matches: Vec<_> = self.pattern.find_iter(text).collect();
        if matches.len() != replacements.len() {
            return Err(OpticError::FocusCountMismatch {
                expected: matches.len(),
                actual: replacements.len(),
            });
        }
        let mut rebuilt = String::with_capacity(text.len());
        let mut cursor = 0;
        for (found, replacement) in matches.iter().zip(&replacements) {
            let replacement = replacement
                .as_str()
                .ok_or_else(|| OpticError::type_mismatch("str", replacement.type_key()))?;
            rebuilt.push_str(&text[cursor..found.start()]);
            rebuilt.push_str(replacement);
            cursor = found.end();
        }
        rebuilt.push_str(&text[cursor..]);
        Ok(Value::from(rebuilt))
    }
}

impl Optic for RegexTraversal {
    fn kind(&self) -> Kind {
        Kind::Traversal
    }

    fn get_all(&self, state: &Value) -> Result<Vec<Value>> {
        let text = Self::text_of(state)?;
        Ok(self
            .pattern
            .find_iter(text)
            .map(|found| Value::from(found.as_str()))
            .collect())
    }

    fn modify_all(&self, state: &Value, function: &mut Modifier<'_>) -> Result<Value> {
        let foci = self.get_all(state)?;
        match replace_each(foci, function)? {
            Some(replacements) => self.rebuild(Self::text_of(state)?, replacements),
            None => Ok(state.clone()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::value::{Object, Record};
    use crate::{list, map, tuple};
    use rstest::rstest;

    fn increment(focus: Value) -> Result<Value> {
        Ok(Value::from(focus.as_int().unwrap_or_default() + 1))
    }

    fn unchanged(focus: Value) -> Result<Value> {
        Ok(focus)
    }

    #[rstest]
    fn test_function_traversal() {
        let pairs = FunctionTraversal::new(
            |state: &Value| Ok(state.as_pair().map(|(first, second)| vec![first.clone(), second.clone()]).unwrap_or_default()),
            |_: &Value, foci: Vec<Value>| Ok(Value::tuple(foci)),
        );

        assert_eq!(pairs.get_all(&tuple![1, 2]), Ok(vec![Value::from(1), Value::from(2)]));
        assert_eq!(pairs.modify_all(&tuple![1, 2], &mut increment), Ok(tuple![2, 3]));
    }

    #[rstest]
    #[case(list![1, 2, 3], list![2, 3, 4])]
    #[case(tuple![1, 2], tuple![2, 3])]
    #[case(Value::set([1, 2]), Value::set([2, 3]))]
    fn test_each_over_builtins(#[case] state: Value, #[case] expected: Value) {
        assert_eq!(EachTraversal.modify_all(&state, &mut increment), Ok(expected));
    }

    #[rstest]
    fn test_each_over_map_yields_pairs() {
        let state = map! { "one" => 1 };
        assert_eq!(EachTraversal.get_all(&state), Ok(vec![tuple!["one", 1]]));
    }

    #[rstest]
    fn test_each_over_record() {
        let state = Value::from(Record::new("Point", [("x", 1), ("y", 2)]));
        assert_eq!(
            EachTraversal.modify_all(&state, &mut increment),
            Ok(Value::from(Record::new("Point", [("x", 2), ("y", 3)])))
        );
    }

    #[rstest]
    fn test_each_over_scalar_is_unsupported() {
        assert!(matches!(
            EachTraversal.get_all(&Value::from(1)),
            Err(OpticError::UnsupportedOperation { .. })
        ));
    }

    #[rstest]
    fn test_items_drops_null_replacements() {
        let state = map! { 1 => 10, 2 => 20 };
        let result = ItemsTraversal.modify_all(&state, &mut |item: Value| {
            Ok(if item == tuple![1, 10] { Value::Null } else { item })
        });

        assert_eq!(result, Ok(map! { 2 => 20 }));
    }

    #[rstest]
    fn test_items_untouched_returns_same_state() {
        let state = map! { 1 => list![10], 2 => list![20] };
        let result = ItemsTraversal.modify_all(&state, &mut unchanged).unwrap();

        assert!(result.is_same(&state));
    }

    #[rstest]
    #[case(list![list![1], list![2]])]
    #[case(Value::from(Record::new("Point", [("x", list![1]), ("y", list![2])])))]
    fn test_each_untouched_returns_same_state(#[case] state: Value) {
        let mut calls = 0;
        let result = EachTraversal
            .modify_all(&state, &mut |focus: Value| {
                calls += 1;
                Ok(focus)
            })
            .unwrap();

        assert!(result.is_same(&state));
        assert_eq!(calls, 2);
    }

    #[rstest]
    fn test_function_traversal_untouched_skips_builder() {
        let traversal = FunctionTraversal::new(
            |state: &Value| Ok(state.as_list().map(<[Value]>::to_vec).unwrap_or_default()),
            |_: &Value, _: Vec<Value>| Err(OpticError::NoFocus),
        );
        let state = list![1, "a"];

        assert!(traversal.modify_all(&state, &mut unchanged).unwrap().is_same(&state));
        assert_eq!(traversal.modify_all(&state, &mut increment), Err(OpticError::NoFocus));
    }

    #[rstest]
    fn test_items_requires_map() {
        assert!(ItemsTraversal.get_all(&list![1]).is_err());
    }

    #[rstest]
    fn test_recur_into_objects() {
        let state = list![
            Value::from(Object::new("Box").with_attribute("inner", 1)),
            list![2, "3"],
        ];
        let recur = RecurTraversal::new(TypeKey::Int);

        assert_eq!(recur.get_all(&state), Ok(vec![Value::from(1), Value::from(2)]));
        assert_eq!(
            recur.modify_all(&state, &mut increment),
            Ok(list![
                Value::from(Object::new("Box").with_attribute("inner", 2)),
                list![3, "3"],
            ])
        );
    }

    #[rstest]
    fn test_recur_keeps_untouched_branches() {
        let state = list![list!["a"], list![1]];
        let result = RecurTraversal::new(TypeKey::Int)
            .modify_all(&state, &mut increment)
            .unwrap();

        assert!(result.as_list().unwrap()[0].is_same(&state.as_list().unwrap()[0]));
        assert_eq!(result, list![list!["a"], list![2]]);
    }

    #[rstest]
    fn test_recur_without_foci_returns_same_state() {
        let state = list!["a", "b"];
        let result = RecurTraversal::new(TypeKey::Int)
            .modify_all(&state, &mut increment)
            .unwrap();

        assert!(result.is_same(&state));
    }

    fn shout(focus: Value) -> Result<Value> {
        Ok(Value::from(focus.as_str().unwrap_or_default().to_uppercase()))
    }

    #[rstest]
    #[case(r"[a-z]+", "ab 12 cd", vec!["ab", "cd"], "AB 12 CD")]
    #[case(r"(?i)x", "xAXb", vec!["x", "X"], "XAXb")]
    #[case(r"\d", "none", vec![], "none")]
    fn test_regex_traversal(
        #[case] pattern: &str,
        #[case] state: &str,
        #[case] foci: Vec<&str>,
        #[case] expected: &str,
    ) {
        let traversal = RegexTraversal::new(pattern).unwrap();
        let state = Value::from(state);

        assert_eq!(
            traversal.get_all(&state),
            Ok(foci.into_iter().map(Value::from).collect())
        );
        assert_eq!(traversal.modify_all(&state, &mut shout), Ok(Value::from(expected)));
    }

    #[rstest]
    fn test_regex_untouched_returns_same_state() {
        let state = Value::from("abc");
        let traversal = RegexTraversal::new("b").unwrap();

        assert!(traversal.modify_all(&state, &mut unchanged).unwrap().is_same(&state));
    }

    #[rstest]
    fn test_regex_rejects_bad_pattern_and_non_strings() {
        assert!(matches!(
            RegexTraversal::new("("),
            Err(OpticError::InvalidPattern { .. })
        ));

        let traversal = RegexTraversal::new("a").unwrap();
        assert!(matches!(
            traversal.get_all(&Value::from(1)),
            Err(OpticError::TypeMismatch { .. })
        ));
        assert!(matches!(
            traversal.modify_all(&Value::from("a"), &mut increment),
            Err(OpticError::TypeMismatch { .. })
        ));
    }

    #[rstest]
    fn test_recur_stops_at_match() {
        let state = list![list![1], list![list![2]]];
        let recur = RecurTraversal::new(TypeKey::List);

        assert_eq!(recur.get_all(&state), Ok(vec![state.clone()]));
    }
}
