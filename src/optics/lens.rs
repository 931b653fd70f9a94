//! Lens optics: exactly one focus, readable and writable.
//!
//! A Lens pairs a getter with a setter. Index and attribute lenses close over
//! the hook registry, so they work on any value whose type provides the
//! matching strategies.
//!
//! # Laws
//!
//! Every Lens must satisfy three laws:
//!
//! 1. **GetPut Law**: Getting and setting back yields the original.
//!    ```text
//!    lens.set(&source, lens.get(&source)?) == source
//!    ```
//!
//! 2. **PutGet Law**: Setting then getting yields the set value.
//!    ```text
//!    lens.get(&lens.set(&source, value)?) == value
//!    ```
//!
//! 3. **PutPut Law**: Two consecutive sets is equivalent to the last set.
//!    ```text
//!    lens.set(&lens.set(&source, v1)?, v2) == lens.set(&source, v2)
//!    ```

use std::fmt;
use std::sync::Arc;

use super::{Kind, Modifier, Optic, Pipeline, Transform, Update};
use crate::error::{OpticError, Result};
use crate::hooks;
use crate::value::Value;

/// Implements [`Optic`] for a type with inherent `get` and `set` methods.
macro_rules! impl_lens_optic {
    ($lens:ty) => {
        impl Optic for $lens {
            fn kind(&self) -> Kind {
                Kind::Lens
            }

            fn get_all(&self, state: &Value) -> Result<Vec<Value>> {
                Ok(vec![self.get(state)?])
            }

            fn modify_all(&self, state: &Value, function: &mut Modifier<'_>) -> Result<Value> {
                let focus = self.get(state)?;
                self.set(state, function(focus)?)
            }
        }
    };
}

// =============================================================================
// FunctionLens
// =============================================================================

/// A lens implemented using getter and setter functions.
///
/// # Example
///
/// ```
/// use lensing::optics::FunctionLens;
/// use lensing::{Value, tuple};
///
/// // Focus the first element of a pair.
/// let first = FunctionLens::new(
///     |state: &Value| Ok(state.as_pair().map(|(first, _)| first.clone()).unwrap_or_default()),
///     |state: &Value, focus: Value| {
///         let second = state.as_pair().map(|(_, second)| second.clone()).unwrap_or_default();
///         Ok(Value::from((focus, second)))
///     },
/// );
///
/// let pair = tuple![1, 2];
/// assert_eq!(first.get(&pair), Ok(Value::from(1)));
/// assert_eq!(first.set(&pair, Value::from(9)), Ok(tuple![9, 2]));
/// ```
#[derive(Clone)]
pub struct FunctionLens {
    getter: Transform,
    setter: Update,
}

impl FunctionLens {
    /// Creates a new `FunctionLens` from a getter and setter.
    ///
    /// # Arguments
    ///
    /// * `getter` - Extracts the focus from the state
    /// * `setter` - Builds a new state from the old state and a new focus
    #[must_use]
    pub fn new<G, S>(getter: G, setter: S) -> Self
    where
        G: Fn(&Value) -> Result<Value> + Send + Sync + 'static,
        S: Fn(&Value, Value) -> Result<Value> + Send + Sync + 'static,
    {
        Self {
            getter: Arc::new(getter),
            setter: Arc::new(setter),
        }
    }

    /// Returns the focus of `state`.
    ///
    /// # Errors
    ///
    /// Returns whatever error the getter raises.
    pub fn get(&self, state: &Value) -> Result<Value> {
        (self.getter)(state)
    }

    /// Returns a new state with the focus replaced by `focus`.
    ///
    /// # Errors
    ///
    /// Returns whatever error the setter raises.
    pub fn set(&self, state: &Value, focus: Value) -> Result<Value> {
        (self.setter)(state, focus)
    }
}

impl fmt::Debug for FunctionLens {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter.debug_struct("FunctionLens").finish_non_exhaustive()
    }
}

impl_lens_optic!(FunctionLens);

// =============================================================================
// Hook-backed lenses
// =============================================================================

/// Focuses the item stored under one fixed key or index.
///
/// Reads use the `get_item` strategy of the state's hook entry and writes use
/// `set_item`. Sequences accept negative indices counted from the end.
#[derive(Debug, Clone)]
pub struct IndexLens {
    key: Value,
}

impl IndexLens {
    /// Creates a lens focusing the item under `key`.
    #[must_use]
    pub const fn new(key: Value) -> Self {
        Self { key }
    }

    /// Returns the item under the key.
    ///
    /// # Errors
    ///
    /// Fails with `MissingKey` for an absent key and `UnsupportedOperation`
    /// when the state's type cannot be indexed.
    pub fn get(&self, state: &Value) -> Result<Value> {
        hooks::resolve(state).get_item(state, &self.key)
    }

    /// Returns a new state with the item under the key replaced.
    ///
    /// # Errors
    ///
    /// Fails when the state's type cannot rebuild by key.
    pub fn set(&self, state: &Value, focus: Value) -> Result<Value> {
        hooks::resolve(state).set_item(state, &self.key, focus)
    }
}

impl_lens_optic!(IndexLens);

/// Focuses one named attribute of a record or object.
#[derive(Debug, Clone)]
pub struct AttributeLens {
    name: Arc<str>,
}

impl AttributeLens {
    /// Creates a lens focusing attribute `name`.
    #[must_use]
    pub fn new(name: impl Into<Arc<str>>) -> Self {
        Self { name: name.into() }
    }

    /// Returns the attribute's value.
    ///
    /// # Errors
    ///
    /// Fails when the attribute is missing or cannot be read.
    pub fn get(&self, state: &Value) -> Result<Value> {
        hooks::resolve(state).get_attr(state, &self.name)
    }

    /// Returns a new state with the attribute replaced.
    ///
    /// # Errors
    ///
    /// Fails with `UnsupportedOperation` when the type has neither an
    /// attribute setter nor a copy strategy.
    pub fn set(&self, state: &Value, focus: Value) -> Result<Value> {
        hooks::resolve(state).set_attr(state, &self.name, focus)
    }
}

impl_lens_optic!(AttributeLens);

/// Like [`IndexLens`], but reads a default when the key is missing.
///
/// Writes always store under the key, adding it if needed.
#[derive(Debug, Clone)]
pub struct IndexOrElseLens {
    key: Value,
    default: Value,
}

impl IndexOrElseLens {
    /// Creates a lens focusing `key`, reading `default` when it is absent.
    #[must_use]
    pub const fn new(key: Value, default: Value) -> Self {
        Self { key, default }
    }

    /// Returns the item under the key, or the default.
    ///
    /// # Errors
    ///
    /// Fails when the state's type cannot be indexed.
    pub fn get(&self, state: &Value) -> Result<Value> {
        match hooks::resolve(state).get_item(state, &self.key) {
            Err(OpticError::MissingKey { .. }) => Ok(self.default.clone()),
            other => other,
        }
    }

    /// Returns a new state with the item under the key replaced.
    ///
    /// # Errors
    ///
    /// Fails when the state's type cannot rebuild by key.
    pub fn set(&self, state: &Value, focus: Value) -> Result<Value> {
        hooks::resolve(state).set_item(state, &self.key, focus)
    }
}

impl_lens_optic!(IndexOrElseLens);

fn lookup(state: &Value, key: &Value) -> Result<Option<Value>> {
    match hooks::resolve(state).get_item(state, key) {
        Ok(value) => Ok(Some(value)),
        Err(OpticError::MissingKey { .. }) => Ok(None),
        Err(error) => Err(error),
    }
}

fn split_pair(focus: &Value) -> Result<(Value, Value)> {
    focus
        .as_pair()
        .map(|(key, value)| (key.clone(), value.clone()))
        .ok_or_else(|| OpticError::type_mismatch("(key, value) tuple or null", focus.type_key()))
}

/// Focuses the `(key, value)` pair of a mapping entry, or null when absent.
///
/// Setting null removes the entry. Setting a pair with a different key
/// removes the old entry and stores the new one.
///
/// # Example
///
/// ```
/// use lensing::optics::ItemLens;
/// use lensing::{Value, map, tuple};
///
/// let item = ItemLens::new(Value::from(1));
/// let state = map! { 1 => 10, 2 => 20 };
///
/// assert_eq!(item.get(&state), Ok(tuple![1, 10]));
/// assert_eq!(item.set(&state, tuple![1, 11]), Ok(map! { 1 => 11, 2 => 20 }));
/// assert_eq!(item.set(&state, Value::Null), Ok(map! { 2 => 20 }));
/// ```
#[derive(Debug, Clone)]
pub struct ItemLens {
    key: Value,
}

impl ItemLens {
    /// Creates a lens focusing the entry under `key`.
    #[must_use]
    pub const fn new(key: Value) -> Self {
        Self { key }
    }

    /// Returns the entry as a pair, or null.
    ///
    /// # Errors
    ///
    /// Fails when the state's type cannot be indexed.
    pub fn get(&self, state: &Value) -> Result<Value> {
        Ok(lookup(state, &self.key)?
            .map(|value| Value::from((self.key.clone(), value)))
            .unwrap_or_default())
    }

    /// Returns a new state with the entry replaced, renamed or removed.
    ///
    /// # Errors
    ///
    /// Fails with `TypeMismatch` when `focus` is neither null nor a pair.
    pub fn set(&self, state: &Value, focus: Value) -> Result<Value> {
        let entry = hooks::resolve(state);
        let present = lookup(state, &self.key)?.is_some();
        if focus.is_null() {
            return if present {
                entry.del_item(state, &self.key)
            } else {
                Ok(state.clone())
            };
        }
        let (key, value) = split_pair(&focus)?;
        let base = if present && key != self.key {
            entry.del_item(state, &self.key)?
        } else {
            state.clone()
        };
        entry.set_item(&base, &key, value)
    }
}

impl_lens_optic!(ItemLens);

/// Focuses the first `(key, value)` entry whose value equals a fixed value.
///
/// Setting removes every entry holding that value, then stores the new pair
/// unless it is null.
#[derive(Debug, Clone)]
pub struct ItemByValueLens {
    value: Value,
}

impl ItemByValueLens {
    /// Creates a lens focusing the entry holding `value`.
    #[must_use]
    pub const fn new(value: Value) -> Self {
        Self { value }
    }

    /// Returns the matching entry as a pair, or null.
    ///
    /// # Errors
    ///
    /// Fails when the state cannot be iterated as pairs.
    pub fn get(&self, state: &Value) -> Result<Value> {
        for item in hooks::resolve(state).to_iter(state)? {
            let (_, value) = split_pair(&item)?;
            if value == self.value {
                return Ok(item);
            }
        }
        Ok(Value::Null)
    }

    /// Returns a new state with the matching entries replaced by `focus`.
    ///
    /// # Errors
    ///
    /// Fails when the state cannot be iterated or rebuilt by key.
    pub fn set(&self, state: &Value, focus: Value) -> Result<Value> {
        let entry = hooks::resolve(state);
        let mut rebuilt = state.clone();
        for item in entry.to_iter(state)? {
            let (key, value) = split_pair(&item)?;
            if value == self.value {
                rebuilt = entry.del_item(&rebuilt, &key)?;
            }
        }
        if focus.is_null() {
            return Ok(rebuilt);
        }
        let (key, value) = split_pair(&focus)?;
        entry.set_item(&rebuilt, &key, value)
    }
}

impl_lens_optic!(ItemByValueLens);

/// Focuses a boolean: whether the state contains a fixed item.
///
/// Setting `true` adds the item and setting `false` removes it, through the
/// `contains_add` and `contains_remove` strategies. Setting the value the
/// state already has returns the state unchanged.
#[derive(Debug, Clone)]
pub struct ContainsLens {
    item: Value,
}

impl ContainsLens {
    /// Creates a lens focusing membership of `item`.
    #[must_use]
    pub const fn new(item: Value) -> Self {
        Self { item }
    }

    /// Returns whether the state contains the item.
    ///
    /// # Errors
    ///
    /// Fails for values that do not support membership tests.
    pub fn get(&self, state: &Value) -> Result<Value> {
        state.contains(&self.item).map(Value::Bool)
    }

    /// Adds or removes the item so that membership equals `focus`.
    ///
    /// # Errors
    ///
    /// Fails with `TypeMismatch` when `focus` is not a boolean.
    pub fn set(&self, state: &Value, focus: Value) -> Result<Value> {
        let wanted = focus
            .as_bool()
            .ok_or_else(|| OpticError::type_mismatch("bool", focus.type_key()))?;
        match (wanted, state.contains(&self.item)?) {
            (true, false) => hooks::resolve(state).contains_add(state, &self.item),
            (false, true) => hooks::resolve(state).contains_remove(state, &self.item),
            _ => Ok(state.clone()),
        }
    }
}

impl_lens_optic!(ContainsLens);

// =============================================================================
// Lenses over other optics
// =============================================================================

/// Combines several single-focus optics into one tuple focus.
///
/// Setting a tuple writes each element through its optic in order, each
/// write seeing the result of the previous one.
#[derive(Debug, Clone)]
pub struct TupleLens {
    optics: Vec<Pipeline>,
}

impl TupleLens {
    /// Creates a lens from optics that are each at least a Lens.
    ///
    /// # Errors
    ///
    /// Fails with [`OpticError::Capability`] if any optic is not a Lens.
    pub fn new(optics: Vec<Pipeline>) -> Result<Self> {
        if let Some(optic) = optics.iter().find(|optic| !optic.kind().is_a(Kind::Lens)) {
            return Err(OpticError::capability("tuple_of", optic.kind()));
        }
        Ok(Self { optics })
    }

    /// Returns the tuple of every optic's focus.
    ///
    /// # Errors
    ///
    /// Returns the first error raised by a component optic.
    pub fn get(&self, state: &Value) -> Result<Value> {
        let foci = self
            .optics
            .iter()
            .map(|optic| optic.get(state))
            .collect::<Result<Vec<_>>>()?;
        Ok(Value::tuple(foci))
    }

    /// Writes each element of the tuple `focus` through its optic.
    ///
    /// # Errors
    ///
    /// Fails with `FocusCountMismatch` when the tuple has the wrong length.
    pub fn set(&self, state: &Value, focus: Value) -> Result<Value> {
        let elements = focus
            .as_tuple()
            .ok_or_else(|| OpticError::type_mismatch("tuple", focus.type_key()))?;
        if elements.len() != self.optics.len() {
            return Err(OpticError::FocusCountMismatch {
                expected: self.optics.len(),
                actual: elements.len(),
            });
        }
        self.optics
            .iter()
            .zip(elements)
            .try_fold(state.clone(), |current, (optic, element)| {
                optic.set(&current, element.clone())
            })
    }
}

impl_lens_optic!(TupleLens);

/// Focuses the list of every focus of another optic.
///
/// Over a writable optic this is a Lens whose writes replace the foci in
/// order; over a read-only optic it is a Getter.
#[derive(Debug, Clone)]
pub struct PartsLens {
    optic: Pipeline,
    kind: Kind,
}

impl PartsLens {
    /// Creates a lens over the foci of `optic`.
    ///
    /// # Errors
    ///
    /// Fails with [`OpticError::Capability`] when `optic` cannot read.
    pub fn new(optic: Pipeline) -> Result<Self> {
        let kind = if optic.kind().is_a(Kind::Traversal) {
            Kind::Lens
        } else if optic.kind().is_a(Kind::Fold) {
            Kind::Getter
        } else {
            return Err(OpticError::capability("parts", optic.kind()));
        };
        Ok(Self { optic, kind })
    }

    /// Returns every focus of the inner optic as a list.
    ///
    /// # Errors
    ///
    /// Returns any error raised by the inner optic.
    pub fn get(&self, state: &Value) -> Result<Value> {
        Ok(Value::list(self.optic.collect(state)?))
    }

    /// Replaces the inner optic's foci with the elements of the list `focus`.
    ///
    /// # Errors
    ///
    /// Fails with `Capability` over a read-only optic and with
    /// `FocusCountMismatch` when the list has the wrong length.
    pub fn set(&self, state: &Value, focus: Value) -> Result<Value> {
        let elements = focus
            .as_list()
            .ok_or_else(|| OpticError::type_mismatch("list", focus.type_key()))?;
        self.optic.set_many(state, elements.to_vec())
    }
}

impl Optic for PartsLens {
    fn kind(&self) -> Kind {
        self.kind
    }

    fn get_all(&self, state: &Value) -> Result<Vec<Value>> {
        Ok(vec![self.get(state)?])
    }

    fn modify_all(&self, state: &Value, function: &mut Modifier<'_>) -> Result<Value> {
        if !self.kind.can_write() {
            return Err(OpticError::capability("modify", self.kind));
        }
        let focus = self.get(state)?;
        self.set(state, function(focus)?)
    }
}
