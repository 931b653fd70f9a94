//! Structural update hooks.
//!
//! Generic optics (indexing, attributes, `each`, `recur`, ...) never inspect
//! a container's concrete shape themselves. They resolve a [`HookEntry`] for
//! the value's [`TypeKey`] and call its strategies, so any user type can take
//! part in copy-on-write rebuilding by registering an entry.
//!
//! The process-wide table is populated during setup with [`register`] and
//! read afterwards with [`resolve`]. Registration after optics are in use
//! from several threads is safe, but which entry a concurrent read observes
//! is unspecified.
//!
//! # Examples
//!
//! ```rust
//! use lensing::hooks::{self, HookEntry};
//! use lensing::optics::standard_optics::attribute;
//! use lensing::{Object, OpticError, TypeKey, Value};
//!
//! // Sockets cannot be copied, so their attributes cannot be rebuilt.
//! hooks::register(
//!     TypeKey::object("Socket"),
//!     HookEntry::new().with_get_attr(|state, name| {
//!         Ok(state.as_object().and_then(|socket| socket.attribute(name)).cloned().unwrap_or_default())
//!     }),
//! );
//!
//! let socket = Value::from(Object::new("Socket").with_attribute("port", 80));
//! let port = attribute("port");
//! assert_eq!(port.get(&socket), Ok(Value::from(80)));
//! assert!(matches!(
//!     port.set(&socket, Value::from(81)),
//!     Err(OpticError::UnsupportedOperation { .. })
//! ));
//! ```

pub mod builtin;
mod entry;
mod methods;
mod registry;

use std::sync::{Arc, LazyLock};

use parking_lot::RwLock;

pub use entry::{
    AttributeGetter, AttributeSetter, Copier, HookEntry, ItemDeleter, ItemGetter, ItemSetter,
    Iterate, MembershipUpdate, Method, Rebuild,
};
pub use registry::HookRegistry;

use crate::value::{TypeKey, Value};

static REGISTRY: LazyLock<RwLock<HookRegistry>> =
    LazyLock::new(|| RwLock::new(HookRegistry::new()));

/// Stores `entry` in the process-wide registry as the strategy for `key`.
///
/// Returns the entry previously registered for `key`, if any.
pub fn register(key: TypeKey, entry: HookEntry) -> Option<Arc<HookEntry>> {
    REGISTRY.write().register(key, entry)
}

/// Returns the process-wide strategy for `value`'s runtime type.
#[must_use]
pub fn resolve(value: &Value) -> Arc<HookEntry> {
    REGISTRY.read().resolve(value)
}

/// Returns the process-wide strategy for values of type `key`.
#[must_use]
pub fn resolve_type(key: &TypeKey) -> Arc<HookEntry> {
    REGISTRY.read().resolve_type(key)
}

/// Returns `true` if the process-wide registry holds an entry for `key`.
#[must_use]
pub fn is_registered(key: &TypeKey) -> bool {
    REGISTRY.read().is_registered(key)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::value::Object;
    use rstest::rstest;

    #[rstest]
    fn test_global_register_and_resolve() {
        let key = TypeKey::object("GlobalRegistryProbe");
        register(key.clone(), HookEntry::new().with_method("ping", |_, _| Ok(Value::from("pong"))));

        let probe = Value::from(Object::new("GlobalRegistryProbe"));
        assert!(is_registered(&key));
        assert!(resolve(&probe).has_method("ping"));
        assert!(resolve_type(&key).has_method("ping"));
    }

    #[rstest]
    fn test_global_fallback() {
        assert!(resolve(&Value::from(1.5)).has_method("abs"));
    }
}
