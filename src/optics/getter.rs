//! Getter optics: exactly one focus, read only.
//!
//! A Getter turns a state into its focus and supports no other operation.

use std::fmt;
use std::sync::Arc;

use super::{Kind, Optic, Transform};
use crate::error::Result;
use crate::value::Value;

/// A read-only optic with exactly one focus.
///
/// # Example
///
/// ```
/// use lensing::optics::FunctionGetter;
/// use lensing::{Value, list};
///
/// let head = FunctionGetter::new(|state: &Value| {
///     Ok(state.as_list().and_then(<[Value]>::first).cloned().unwrap_or_default())
/// });
/// assert_eq!(head.get(&list![1, 2, 3]), Ok(Value::from(1)));
/// ```
#[derive(Clone)]
pub struct FunctionGetter {
    getter: Transform,
}

impl FunctionGetter {
    /// Creates a getter from a function computing the focus.
    #[must_use]
    pub fn new<G>(getter: G) -> Self
    where
        G: Fn(&Value) -> Result<Value> + Send + Sync + 'static,
    {
        Self {
            getter: Arc::new(getter),
        }
    }

    pub(crate) fn from_transform(getter: Transform) -> Self {
        Self { getter }
    }

    /// Returns the focus of `state`.
    ///
    /// # Errors
    ///
    /// Returns whatever error the function raises.
    pub fn get(&self, state: &Value) -> Result<Value> {
        (self.getter)(state)
    }
}

impl fmt::Debug for FunctionGetter {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter.debug_struct("FunctionGetter").finish_non_exhaustive()
    }
}

impl Optic for FunctionGetter {
    fn kind(&self) -> Kind {
        Kind::Getter
    }

    fn get_all(&self, state: &Value) -> Result<Vec<Value>> {
        Ok(vec![self.get(state)?])
    }
}
