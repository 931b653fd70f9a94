//! Prism optics: zero or one focus, with construction.
//!
//! A Prism tries to unwrap a focus from a state and can always wrap a focus
//! into a fresh state. Writing through a prism whose focus is absent returns
//! the state unchanged.
//!
//! # Laws
//!
//! 1. **`PreviewReview` Law**: `unwrap(wrap(focus)) == Some(focus)`
//! 2. **`ReviewPreview` Law**: if `unwrap(state) == Some(focus)` then
//!    `wrap(focus) == state`

use std::fmt;
use std::sync::Arc;

use super::{Extract, FunctionGetter, Kind, Modifier, Optic, Transform};
use crate::error::{OpticError, Result};
use crate::value::{TypeKey, Value};

type ErrorFilter = Arc<dyn Fn(&OpticError) -> bool + Send + Sync>;

/// A prism implemented using an unwrap function and a wrap function.
///
/// When `null_is_absent` is set, an unwrapped null counts as no focus. The
/// flag is off by default so that null stays a legitimate focus value.
/// Likewise, [`FunctionPrism::with_ignore_errors`] turns selected unwrap
/// errors into an absent focus.
///
/// # Example
///
/// ```
/// use lensing::optics::FunctionPrism;
/// use lensing::{Value, tuple};
///
/// // Focus the payload of ("ok", payload) tuples.
/// let ok = FunctionPrism::new(
///     |state: &Value| {
///         Ok(state
///             .as_pair()
///             .filter(|(tag, _)| tag.as_str() == Some("ok"))
///             .map(|(_, payload)| payload.clone()))
///     },
///     |focus: &Value| Ok(Value::from(("ok", focus.clone()))),
/// );
///
/// assert_eq!(ok.preview(&tuple!["ok", 1]), Ok(Some(Value::from(1))));
/// assert_eq!(ok.preview(&tuple!["error", 1]), Ok(None));
/// assert_eq!(ok.wrap(&Value::from(2)), Ok(tuple!["ok", 2]));
/// ```
#[derive(Clone)]
pub struct FunctionPrism {
    unwrap: Extract,
    wrap: Transform,
    null_is_absent: bool,
    ignore_errors: Option<ErrorFilter>,
}

impl FunctionPrism {
    /// Creates a new `FunctionPrism`.
    ///
    /// # Arguments
    ///
    /// * `unwrap` - Extracts the focus, or `None` when there is none
    /// * `wrap` - Builds a state from a focus
    #[must_use]
    pub fn new<U, W>(unwrap: U, wrap: W) -> Self
    where
        U: Fn(&Value) -> Result<Option<Value>> + Send + Sync + 'static,
        W: Fn(&Value) -> Result<Value> + Send + Sync + 'static,
    {
        Self {
            unwrap: Arc::new(unwrap),
            wrap: Arc::new(wrap),
            null_is_absent: false,
            ignore_errors: None,
        }
    }

    /// Returns this prism with null unwrapped foci treated as absent.
    #[must_use]
    pub const fn with_null_is_absent(mut self, null_is_absent: bool) -> Self {
        self.null_is_absent = null_is_absent;
        self
    }

    /// Returns `true` if an unwrapped null counts as no focus.
    #[must_use]
    pub const fn null_is_absent(&self) -> bool {
        self.null_is_absent
    }

    /// Returns this prism with unwrap errors accepted by `filter` treated
    /// as absent foci. Other errors still propagate.
    ///
    /// # Example
    ///
    /// ```
    /// use lensing::optics::{FunctionPrism, Optic};
    /// use lensing::{OpticError, Value};
    ///
    /// let number = FunctionPrism::new(
    ///     |state: &Value| {
    ///         let text = state
    ///             .as_str()
    ///             .ok_or_else(|| OpticError::type_mismatch("str", state.type_key()))?;
    ///         text.parse::<i64>()
    ///             .map(|parsed| Some(Value::from(parsed)))
    ///             .map_err(|error| OpticError::Raised { message: error.to_string() })
    ///     },
    ///     |focus: &Value| Ok(Value::from(format!("{}", focus.as_int().unwrap_or_default()))),
    /// )
    /// .with_ignore_errors(|error| matches!(error, OpticError::Raised { .. }));
    ///
    /// assert_eq!(number.get_all(&Value::from("42")), Ok(vec![Value::from(42)]));
    /// assert_eq!(number.get_all(&Value::from("forty two")), Ok(vec![]));
    /// assert!(number.get_all(&Value::from(42)).is_err());
    /// ```
    #[must_use]
    pub fn with_ignore_errors<F>(mut self, filter: F) -> Self
    where
        F: Fn(&OpticError) -> bool + Send + Sync + 'static,
    {
        self.ignore_errors = Some(Arc::new(filter));
        self
    }

    /// Returns `true` if `error` raised by the unwrap counts as no focus.
    #[must_use]
    pub fn ignores(&self, error: &OpticError) -> bool {
        self.ignore_errors.as_ref().is_some_and(|filter| filter(error))
    }

    /// Returns the focus of `state`, if present.
    ///
    /// # Errors
    ///
    /// Returns the unwrap function's error unless it is ignored.
    pub fn preview(&self, state: &Value) -> Result<Option<Value>> {
        let focus = match (self.unwrap)(state) {
            Ok(focus) => focus,
            Err(error) if self.ignores(&error) => {
                tracing::trace!(%error, "prism unwrap error treated as absent");
                None
            }
            Err(error) => return Err(error),
        };
        Ok(focus.filter(|focus| !(self.null_is_absent && focus.is_null())))
    }

    /// Builds a state from `focus`.
    ///
    /// # Errors
    ///
    /// Returns whatever error the wrap function raises.
    pub fn wrap(&self, focus: &Value) -> Result<Value> {
        (self.wrap)(focus)
    }
}

impl fmt::Debug for FunctionPrism {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter
            .debug_struct("FunctionPrism")
            .field("null_is_absent", &self.null_is_absent)
            .field("ignores_errors", &self.ignore_errors.is_some())
            .finish_non_exhaustive()
    }
}

impl Optic for FunctionPrism {
    fn kind(&self) -> Kind {
        Kind::Prism
    }

    fn get_all(&self, state: &Value) -> Result<Vec<Value>> {
        Ok(self.preview(state)?.into_iter().collect())
    }

    fn modify_all(&self, state: &Value, function: &mut Modifier<'_>) -> Result<Value> {
        match self.preview(state)? {
            Some(focus) => self.wrap(&function(focus)?),
            None => Ok(state.clone()),
        }
    }

    fn review(&self, focus: Value) -> Result<Value> {
        self.wrap(&focus)
    }

    fn reverse(&self) -> Result<Arc<dyn Optic>> {
        Ok(Arc::new(FunctionGetter::from_transform(Arc::clone(&self.wrap))))
    }
}

// =============================================================================
// Filtering prisms
// =============================================================================

type Predicate = Arc<dyn Fn(&Value) -> bool + Send + Sync>;

/// Focuses the state itself, but only when a predicate holds.
///
/// Wrapping is the identity. Composed after a traversal, it stops the
/// traversal from visiting foci that fail the predicate; it does not remove
/// them from the state.
#[derive(Clone)]
pub struct FilteringPrism {
    predicate: Predicate,
}

impl FilteringPrism {
    /// Creates a prism that focuses states satisfying `predicate`.
    #[must_use]
    pub fn new<P>(predicate: P) -> Self
    where
        P: Fn(&Value) -> bool + Send + Sync + 'static,
    {
        Self {
            predicate: Arc::new(predicate),
        }
    }

    /// Returns `true` if `state` passes the filter.
    #[must_use]
    pub fn matches(&self, state: &Value) -> bool {
        (self.predicate)(state)
    }
}

impl fmt::Debug for FilteringPrism {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter.debug_struct("FilteringPrism").finish_non_exhaustive()
    }
}

impl Optic for FilteringPrism {
    fn kind(&self) -> Kind {
        Kind::Prism
    }

    fn get_all(&self, state: &Value) -> Result<Vec<Value>> {
        Ok(if self.matches(state) {
            vec![state.clone()]
        } else {
            Vec::new()
        })
    }

    fn modify_all(&self, state: &Value, function: &mut Modifier<'_>) -> Result<Value> {
        if self.matches(state) {
            function(state.clone())
        } else {
            Ok(state.clone())
        }
    }

    fn review(&self, focus: Value) -> Result<Value> {
        Ok(focus)
    }

    fn reverse(&self) -> Result<Arc<dyn Optic>> {
        Ok(Arc::new(FunctionGetter::new(|focus: &Value| Ok(focus.clone()))))
    }
}

/// Focuses the state only when its runtime type is a given [`TypeKey`].
#[derive(Debug, Clone)]
pub struct InstancePrism {
    type_key: TypeKey,
}

impl InstancePrism {
    /// Creates a prism that focuses values of type `type_key`.
    #[must_use]
    pub const fn new(type_key: TypeKey) -> Self {
        Self { type_key }
    }

    fn matches(&self, state: &Value) -> bool {
        state.type_key() == self.type_key
    }
}

impl Optic for InstancePrism {
    fn kind(&self) -> Kind {
        Kind::Prism
    }

    fn get_all(&self, state: &Value) -> Result<Vec<Value>> {
        Ok(if self.matches(state) {
            vec![state.clone()]
        } else {
            Vec::new()
        })
    }

    fn modify_all(&self, state: &Value, function: &mut Modifier<'_>) -> Result<Value> {
        if self.matches(state) {
            function(state.clone())
        } else {
            Ok(state.clone())
        }
    }

    fn review(&self, focus: Value) -> Result<Value> {
        Ok(focus)
    }

    fn reverse(&self) -> Result<Arc<dyn Optic>> {
        Ok(Arc::new(FunctionGetter::new(|focus: &Value| Ok(focus.clone()))))
    }
}
