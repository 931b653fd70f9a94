use std::sync::Arc;

use super::builtin;
use super::entry::{HashMap, HookEntry};
use crate::value::{TypeKey, Value};

/// A type-keyed table of [`HookEntry`] values with builtin fallbacks.
///
/// Registered entries take precedence. A value whose type has no registered
/// entry resolves to the builtin entry for its shape: sequences, tuples,
/// mappings, sets, strings, records, generic objects or scalars.
///
/// # Examples
///
/// ```rust
/// use lensing::hooks::{HookEntry, HookRegistry};
/// use lensing::{Object, TypeKey, Value};
///
/// let mut registry = HookRegistry::new();
/// registry.register(TypeKey::object("Socket"), HookEntry::new());
///
/// let socket = Value::from(Object::new("Socket"));
/// assert!(!registry.resolve(&socket).is_copyable());
///
/// let robot = Value::from(Object::new("Robot"));
/// assert!(registry.resolve(&robot).is_copyable());
/// ```
#[derive(Debug, Clone)]
pub struct HookRegistry {
    entries: HashMap<TypeKey, Arc<HookEntry>>,
    fallbacks: Fallbacks,
}

#[derive(Debug, Clone)]
struct Fallbacks {
    sequence: Arc<HookEntry>,
    tuple: Arc<HookEntry>,
    mapping: Arc<HookEntry>,
    set: Arc<HookEntry>,
    string: Arc<HookEntry>,
    record: Arc<HookEntry>,
    object: Arc<HookEntry>,
    scalar: Arc<HookEntry>,
}

impl Fallbacks {
    fn builtin() -> Self {
        Self {
            sequence: Arc::new(builtin::sequence()),
            tuple: Arc::new(builtin::tuple()),
            mapping: Arc::new(builtin::mapping()),
            set: Arc::new(builtin::set()),
            string: Arc::new(builtin::string()),
            record: Arc::new(builtin::record()),
            object: Arc::new(builtin::generic_object()),
            scalar: Arc::new(builtin::scalar()),
        }
    }

    fn for_type(&self, key: &TypeKey) -> &Arc<HookEntry> {
        match key {
            TypeKey::List => &self.sequence,
            TypeKey::Tuple => &self.tuple,
            TypeKey::Map => &self.mapping,
            TypeKey::Set => &self.set,
            TypeKey::Str => &self.string,
            TypeKey::Record(_) => &self.record,
            TypeKey::Object(_) => &self.object,
            TypeKey::Null | TypeKey::Bool | TypeKey::Int | TypeKey::Float => &self.scalar,
        }
    }
}

impl HookRegistry {
    /// Creates a registry holding only the builtin fallbacks.
    #[must_use]
    pub fn new() -> Self {
        Self {
            entries: HashMap::default(),
            fallbacks: Fallbacks::builtin(),
        }
    }

    /// Stores `entry` as the strategy for values of type `key`.
    ///
    /// Returns the entry previously registered for `key`, if any.
    pub fn register(&mut self, key: TypeKey, entry: HookEntry) -> Option<Arc<HookEntry>> {
        tracing::debug!(type_key = %key, ?entry, "registering hook entry");
        self.entries.insert(key, Arc::new(entry))
    }

    /// Returns `true` if an entry was registered for `key`.
    #[must_use]
    pub fn is_registered(&self, key: &TypeKey) -> bool {
        self.entries.contains_key(key)
    }

    /// Returns the strategy for values of type `key`.
    #[must_use]
    pub fn resolve_type(&self, key: &TypeKey) -> Arc<HookEntry> {
        if let Some(entry) = self.entries.get(key) {
            return Arc::clone(entry);
        }
        tracing::trace!(type_key = %key, "no registered hook entry, using builtin");
        Arc::clone(self.fallbacks.for_type(key))
    }

    /// Returns the strategy for `value`'s runtime type.
    #[must_use]
    pub fn resolve(&self, value: &Value) -> Arc<HookEntry> {
        self.resolve_type(&value.type_key())
    }
}

impl Default for HookRegistry {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::value::Object;
    use crate::list;
    use rstest::rstest;

    #[rstest]
    fn test_builtin_fallback_by_shape() {
        let registry = HookRegistry::new();

        assert!(registry.resolve(&list![1]).is_iterable());
        assert!(registry.resolve(&Value::from(1)).has_method("abs"));
        assert!(registry.resolve(&Value::from("a")).has_method("upper"));
    }

    #[rstest]
    fn test_registered_entry_wins() {
        let mut registry = HookRegistry::new();
        let key = TypeKey::object("Socket");

        assert!(registry.register(key.clone(), HookEntry::new()).is_none());
        assert!(registry.is_registered(&key));

        let socket = Value::from(Object::new("Socket"));
        assert!(!registry.resolve(&socket).is_copyable());
    }

    #[rstest]
    fn test_register_replaces_previous() {
        let mut registry = HookRegistry::new();
        let key = TypeKey::object("Robot");

        registry.register(key.clone(), HookEntry::new());
        let previous = registry.register(key, HookEntry::new().with_copy(|state| Ok(state.clone())));

        assert!(previous.is_some_and(|entry| !entry.is_copyable()));
    }

    #[rstest]
    fn test_registration_is_per_class() {
        let mut registry = HookRegistry::new();
        registry.register(TypeKey::object("Socket"), HookEntry::new());

        let robot = Value::from(Object::new("Robot"));
        assert!(registry.resolve(&robot).is_copyable());
    }
}
