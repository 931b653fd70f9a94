//! Per-type hook strategies.

use std::fmt;
use std::sync::Arc;

use crate::error::{OpticError, Result};
use crate::value::Value;

#[cfg(feature = "fxhash")]
pub(crate) type HashMap<K, V> = rustc_hash::FxHashMap<K, V>;
#[cfg(not(feature = "fxhash"))]
pub(crate) type HashMap<K, V> = std::collections::HashMap<K, V>;

/// Reads the item stored under a key.
pub type ItemGetter = Arc<dyn Fn(&Value, &Value) -> Result<Value> + Send + Sync>;
/// Returns a copy of the container with the item under a key replaced.
pub type ItemSetter = Arc<dyn Fn(&Value, &Value, Value) -> Result<Value> + Send + Sync>;
/// Returns a copy of the container with the item under a key removed.
pub type ItemDeleter = Arc<dyn Fn(&Value, &Value) -> Result<Value> + Send + Sync>;
/// Reads a named attribute.
pub type AttributeGetter = Arc<dyn Fn(&Value, &str) -> Result<Value> + Send + Sync>;
/// Returns a copy of the value with a named attribute replaced.
pub type AttributeSetter = Arc<dyn Fn(&Value, &str, Value) -> Result<Value> + Send + Sync>;
/// Produces the elements of a container, in order.
pub type Iterate = Arc<dyn Fn(&Value) -> Result<Vec<Value>> + Send + Sync>;
/// Rebuilds a container from the elements [`Iterate`] produced.
pub type Rebuild = Arc<dyn Fn(&Value, Vec<Value>) -> Result<Value> + Send + Sync>;
/// Produces a shallow copy of a value.
pub type Copier = Arc<dyn Fn(&Value) -> Result<Value> + Send + Sync>;
/// Returns a copy of a collection with a member added or removed.
pub type MembershipUpdate = Arc<dyn Fn(&Value, &Value) -> Result<Value> + Send + Sync>;
/// A named operation invoked on a receiver by `call` and `call_mut`.
///
/// The receiver may be mutated in place; the return value is the
/// operation's result.
pub type Method = Arc<dyn Fn(&mut Value, &[Value]) -> Result<Value> + Send + Sync>;

/// The strategies a type provides for generic optics.
///
/// Every strategy is optional. Invoking one that is absent fails with
/// [`OpticError::UnsupportedOperation`] naming the operation and the type.
///
/// # Examples
///
/// ```rust
/// use lensing::hooks::HookEntry;
/// use lensing::{Object, Value};
///
/// // A class whose instances cannot be copied, and so cannot be rebuilt.
/// let entry = HookEntry::new().with_get_attr(|state, name| {
///     Ok(state.as_object().and_then(|object| object.attribute(name)).cloned().unwrap_or_default())
/// });
///
/// let socket = Value::from(Object::new("Socket").with_attribute("port", 80));
/// assert_eq!(entry.get_attr(&socket, "port"), Ok(Value::from(80)));
/// assert!(entry.set_attr(&socket, "port", Value::from(81)).is_err());
/// ```
#[derive(Clone, Default)]
pub struct HookEntry {
    get_item: Option<ItemGetter>,
    set_item: Option<ItemSetter>,
    del_item: Option<ItemDeleter>,
    get_attr: Option<AttributeGetter>,
    set_attr: Option<AttributeSetter>,
    to_iter: Option<Iterate>,
    from_iter: Option<Rebuild>,
    copy: Option<Copier>,
    contains_add: Option<MembershipUpdate>,
    contains_remove: Option<MembershipUpdate>,
    methods: HashMap<Arc<str>, Method>,
}

impl HookEntry {
    /// Creates an entry with no strategies.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the strategy for reading items by key.
    #[must_use]
    pub fn with_get_item<F>(mut self, function: F) -> Self
    where
        F: Fn(&Value, &Value) -> Result<Value> + Send + Sync + 'static,
    {
        self.get_item = Some(Arc::new(function));
        self
    }

    /// Sets the strategy for replacing items by key.
    #[must_use]
    pub fn with_set_item<F>(mut self, function: F) -> Self
    where
        F: Fn(&Value, &Value, Value) -> Result<Value> + Send + Sync + 'static,
    {
        self.set_item = Some(Arc::new(function));
        self
    }

    /// Sets the strategy for removing items by key.
    #[must_use]
    pub fn with_del_item<F>(mut self, function: F) -> Self
    where
        F: Fn(&Value, &Value) -> Result<Value> + Send + Sync + 'static,
    {
        self.del_item = Some(Arc::new(function));
        self
    }

    /// Sets the strategy for reading attributes.
    #[must_use]
    pub fn with_get_attr<F>(mut self, function: F) -> Self
    where
        F: Fn(&Value, &str) -> Result<Value> + Send + Sync + 'static,
    {
        self.get_attr = Some(Arc::new(function));
        self
    }

    /// Sets the strategy for replacing attributes.
    ///
    /// Without one, attribute writes on objects copy the object with the
    /// copy strategy and replace the attribute on the copy.
    #[must_use]
    pub fn with_set_attr<F>(mut self, function: F) -> Self
    where
        F: Fn(&Value, &str, Value) -> Result<Value> + Send + Sync + 'static,
    {
        self.set_attr = Some(Arc::new(function));
        self
    }

    /// Sets the strategy for iterating the elements of a container.
    #[must_use]
    pub fn with_to_iter<F>(mut self, function: F) -> Self
    where
        F: Fn(&Value) -> Result<Vec<Value>> + Send + Sync + 'static,
    {
        self.to_iter = Some(Arc::new(function));
        self
    }

    /// Sets the strategy for rebuilding a container from its elements.
    #[must_use]
    pub fn with_from_iter<F>(mut self, function: F) -> Self
    where
        F: Fn(&Value, Vec<Value>) -> Result<Value> + Send + Sync + 'static,
    {
        self.from_iter = Some(Arc::new(function));
        self
    }

    /// Sets the shallow copy strategy.
    #[must_use]
    pub fn with_copy<F>(mut self, function: F) -> Self
    where
        F: Fn(&Value) -> Result<Value> + Send + Sync + 'static,
    {
        self.copy = Some(Arc::new(function));
        self
    }

    /// Sets the strategy for adding a member to a collection.
    #[must_use]
    pub fn with_contains_add<F>(mut self, function: F) -> Self
    where
        F: Fn(&Value, &Value) -> Result<Value> + Send + Sync + 'static,
    {
        self.contains_add = Some(Arc::new(function));
        self
    }

    /// Sets the strategy for removing a member from a collection.
    #[must_use]
    pub fn with_contains_remove<F>(mut self, function: F) -> Self
    where
        F: Fn(&Value, &Value) -> Result<Value> + Send + Sync + 'static,
    {
        self.contains_remove = Some(Arc::new(function));
        self
    }

    /// Adds a named method callable through `call` and `call_mut`.
    #[must_use]
    pub fn with_method<F>(mut self, name: impl Into<Arc<str>>, function: F) -> Self
    where
        F: Fn(&mut Value, &[Value]) -> Result<Value> + Send + Sync + 'static,
    {
        self.methods.insert(name.into(), Arc::new(function));
        self
    }

    /// Returns `true` if the entry provides a copy strategy.
    #[must_use]
    pub const fn is_copyable(&self) -> bool {
        self.copy.is_some()
    }

    /// Returns `true` if the entry can iterate and rebuild containers.
    #[must_use]
    pub const fn is_iterable(&self) -> bool {
        self.to_iter.is_some() && self.from_iter.is_some()
    }

    /// Returns `true` if the entry has a method called `name`.
    #[must_use]
    pub fn has_method(&self, name: &str) -> bool {
        self.methods.contains_key(name)
    }

    /// Reads the item under `key`.
    ///
    /// # Errors
    ///
    /// Fails when the entry has no item getter or the strategy fails.
    pub fn get_item(&self, state: &Value, key: &Value) -> Result<Value> {
        let getter = self
            .get_item
            .as_ref()
            .ok_or_else(|| OpticError::unsupported("get_item", state.type_key()))?;
        getter(state, key)
    }

    /// Returns a copy of `state` with the item under `key` replaced.
    ///
    /// # Errors
    ///
    /// Fails when the entry has no item setter or the strategy fails.
    pub fn set_item(&self, state: &Value, key: &Value, value: Value) -> Result<Value> {
        let setter = self
            .set_item
            .as_ref()
            .ok_or_else(|| OpticError::unsupported("set_item", state.type_key()))?;
        setter(state, key, value)
    }

    /// Returns a copy of `state` with the item under `key` removed.
    ///
    /// # Errors
    ///
    /// Fails when the entry has no item deleter or the strategy fails.
    pub fn del_item(&self, state: &Value, key: &Value) -> Result<Value> {
        let deleter = self
            .del_item
            .as_ref()
            .ok_or_else(|| OpticError::unsupported("del_item", state.type_key()))?;
        deleter(state, key)
    }

    /// Reads attribute `name`.
    ///
    /// # Errors
    ///
    /// Fails when the entry has no attribute getter or the strategy fails.
    pub fn get_attr(&self, state: &Value, name: &str) -> Result<Value> {
        let getter = self
            .get_attr
            .as_ref()
            .ok_or_else(|| OpticError::unsupported("get_attr", state.type_key()))?;
        getter(state, name)
    }

    /// Returns a copy of `state` with attribute `name` replaced.
    ///
    /// Uses the attribute setter when present. Otherwise objects are copied
    /// with the copy strategy and the attribute is replaced on the copy.
    ///
    /// # Errors
    ///
    /// Fails with [`OpticError::UnsupportedOperation`] when neither an
    /// attribute setter nor (for objects) a copy strategy exists.
    pub fn set_attr(&self, state: &Value, name: &str, value: Value) -> Result<Value> {
        if let Some(setter) = &self.set_attr {
            return setter(state, name, value);
        }
        match (state, &self.copy) {
            (Value::Object(_), Some(copy)) => {
                let mut copied = copy(state)?;
                match &mut copied {
                    Value::Object(object) => {
                        Arc::make_mut(object).set_attribute(name, value);
                        Ok(copied)
                    }
                    other => Err(OpticError::type_mismatch("object", other.type_key())),
                }
            }
            _ => Err(OpticError::unsupported("set_attr", state.type_key())),
        }
    }

    /// Produces the elements of `state`, in order.
    ///
    /// # Errors
    ///
    /// Fails when the entry has no iteration strategy or the strategy fails.
    pub fn to_iter(&self, state: &Value) -> Result<Vec<Value>> {
        let iterate = self
            .to_iter
            .as_ref()
            .ok_or_else(|| OpticError::unsupported("to_iter", state.type_key()))?;
        iterate(state)
    }

    /// Rebuilds `state` from `elements`.
    ///
    /// # Errors
    ///
    /// Fails when the entry has no rebuild strategy or the strategy rejects
    /// the elements (for fixed-length shapes, a different element count).
    pub fn from_iter(&self, state: &Value, elements: Vec<Value>) -> Result<Value> {
        let rebuild = self
            .from_iter
            .as_ref()
            .ok_or_else(|| OpticError::unsupported("from_iter", state.type_key()))?;
        rebuild(state, elements)
    }

    /// Produces a shallow copy of `state`.
    ///
    /// # Errors
    ///
    /// Fails when the entry has no copy strategy.
    pub fn shallow_copy(&self, state: &Value) -> Result<Value> {
        let copy = self
            .copy
            .as_ref()
            .ok_or_else(|| OpticError::unsupported("copy", state.type_key()))?;
        copy(state)
    }

    /// Produces a deep copy of `state`.
    ///
    /// # Errors
    ///
    /// Fails when the entry has no copy strategy.
    pub fn deep_copy(&self, state: &Value) -> Result<Value> {
        if self.copy.is_none() {
            return Err(OpticError::unsupported("deepcopy", state.type_key()));
        }
        Ok(state.deep_copy())
    }

    /// Returns a copy of `state` that contains `item`.
    ///
    /// # Errors
    ///
    /// Fails when the entry has no strategy for adding members.
    pub fn contains_add(&self, state: &Value, item: &Value) -> Result<Value> {
        let add = self
            .contains_add
            .as_ref()
            .ok_or_else(|| OpticError::unsupported("contains_add", state.type_key()))?;
        add(state, item)
    }

    /// Returns a copy of `state` that does not contain `item`.
    ///
    /// # Errors
    ///
    /// Fails when the entry has no strategy for removing members.
    pub fn contains_remove(&self, state: &Value, item: &Value) -> Result<Value> {
        let remove = self
            .contains_remove
            .as_ref()
            .ok_or_else(|| OpticError::unsupported("contains_remove", state.type_key()))?;
        remove(state, item)
    }

    /// Invokes method `name` on `receiver` and returns its result.
    ///
    /// # Errors
    ///
    /// Fails when the entry has no such method or the method fails.
    pub fn call_method(&self, receiver: &mut Value, name: &str, arguments: &[Value]) -> Result<Value> {
        let method = self
            .methods
            .get(name)
            .ok_or_else(|| OpticError::unsupported(format!("method {name}"), receiver.type_key()))?;
        method(receiver, arguments)
    }
}

impl fmt::Debug for HookEntry {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut methods: Vec<&str> = self.methods.keys().map(|name| &**name).collect();
        methods.sort_unstable();
        formatter
            .debug_struct("HookEntry")
            .field("get_item", &self.get_item.is_some())
            .field("set_item", &self.set_item.is_some())
            .field("del_item", &self.del_item.is_some())
            .field("get_attr", &self.get_attr.is_some())
            .field("set_attr", &self.set_attr.is_some())
            .field("to_iter", &self.to_iter.is_some())
            .field("from_iter", &self.from_iter.is_some())
            .field("copy", &self.copy.is_some())
            .field("contains_add", &self.contains_add.is_some())
            .field("contains_remove", &self.contains_remove.is_some())
            .field("methods", &methods)
            .finish()
    }
}
