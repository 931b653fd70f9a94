//! Iso optics for lossless two-way conversions.
//!
//! An Iso converts a state into a focus and back. It can do everything every
//! other optic can: read, write, construct and flip.
//!
//! # Laws
//!
//! 1. **`RoundTrip` Law**: `backward(forward(state)) == state`
//! 2. **`ReverseRoundTrip` Law**: `forward(backward(focus)) == focus`
//!
//! The laws are the caller's responsibility; nothing checks them.

use std::fmt;
use std::sync::Arc;

use super::{Kind, Modifier, Optic, Transform};
use crate::error::{OpticError, Result};
use crate::value::Value;

/// An isomorphism implemented using a pair of conversion functions.
///
/// # Example
///
/// ```
/// use lensing::optics::FunctionIso;
/// use lensing::Value;
///
/// let celsius = FunctionIso::new(
///     |kelvin: &Value| Ok(Value::from(kelvin.as_float().unwrap_or_default() - 273.15)),
///     |celsius: &Value| Ok(Value::from(celsius.as_float().unwrap_or_default() + 273.15)),
/// );
///
/// let kelvin = celsius.reverse_get(&Value::from(0.0)).unwrap();
/// assert_eq!(kelvin, Value::from(273.15));
/// ```
#[derive(Clone)]
pub struct FunctionIso {
    forward: Transform,
    backward: Transform,
}

impl FunctionIso {
    /// Creates a new `FunctionIso` from a pair of inverse functions.
    ///
    /// # Arguments
    ///
    /// * `forward` - Converts a state into its focus
    /// * `backward` - Converts a focus back into a state
    #[must_use]
    pub fn new<F, B>(forward: F, backward: B) -> Self
    where
        F: Fn(&Value) -> Result<Value> + Send + Sync + 'static,
        B: Fn(&Value) -> Result<Value> + Send + Sync + 'static,
    {
        Self {
            forward: Arc::new(forward),
            backward: Arc::new(backward),
        }
    }

    /// Creates an iso that reads foci unchanged and applies `setter` to
    /// every focus it writes or constructs.
    ///
    /// The setter should be idempotent.
    #[must_use]
    pub fn normalising<S>(setter: S) -> Self
    where
        S: Fn(&Value) -> Result<Value> + Send + Sync + 'static,
    {
        Self::new(|state: &Value| Ok(state.clone()), setter)
    }

    /// Converts a state into its focus.
    ///
    /// # Errors
    ///
    /// Returns whatever error the forward function raises.
    pub fn get(&self, state: &Value) -> Result<Value> {
        (self.forward)(state)
    }

    /// Converts a focus back into a state.
    ///
    /// # Errors
    ///
    /// Returns whatever error the backward function raises.
    pub fn reverse_get(&self, focus: &Value) -> Result<Value> {
        (self.backward)(focus)
    }

    /// Returns the inverse iso, with the two functions swapped.
    #[must_use]
    pub fn flipped(&self) -> Self {
        Self {
            forward: Arc::clone(&self.backward),
            backward: Arc::clone(&self.forward),
        }
    }
}

impl fmt::Debug for FunctionIso {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter.debug_struct("FunctionIso").finish_non_exhaustive()
    }
}

impl Optic for FunctionIso {
    fn kind(&self) -> Kind {
        Kind::Iso
    }

    fn get_all(&self, state: &Value) -> Result<Vec<Value>> {
        Ok(vec![self.get(state)?])
    }

    fn modify_all(&self, state: &Value, function: &mut Modifier<'_>) -> Result<Value> {
        let focus = function(self.get(state)?)?;
        self.reverse_get(&focus)
    }

    fn review(&self, focus: Value) -> Result<Value> {
        self.reverse_get(&focus)
    }

    fn reverse(&self) -> Result<Arc<dyn Optic>> {
        Ok(Arc::new(self.flipped()))
    }
}

// =============================================================================
// Error iso
// =============================================================================

#[derive(Debug, Clone, PartialEq, Eq)]
enum Failure {
    Fixed(OpticError),
    Template(Arc<str>),
}

/// An iso that fails whenever it is asked to focus or construct anything.
///
/// Composing it into a pipeline marks a path that should never be taken.
/// With a message template, every `{}` in it is replaced by the debug
/// rendering of the value the iso was applied to.
///
/// # Example
///
/// ```
/// use lensing::optics::{ErrorIso, Optic};
/// use lensing::{OpticError, Value};
///
/// let fail = ErrorIso::with_message("applied to {}");
/// assert_eq!(
///     fail.get_all(&Value::from(true)),
///     Err(OpticError::Raised { message: "applied to Bool(true)".to_string() })
/// );
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ErrorIso {
    failure: Failure,
}

impl ErrorIso {
    /// Creates an iso that raises `error` unchanged.
    #[must_use]
    pub const fn new(error: OpticError) -> Self {
        Self {
            failure: Failure::Fixed(error),
        }
    }

    /// Creates an iso that raises [`OpticError::Raised`] with `template`
    /// formatted against the value it was applied to.
    #[must_use]
    pub fn with_message(template: impl Into<Arc<str>>) -> Self {
        Self {
            failure: Failure::Template(template.into()),
        }
    }

    /// Returns the error raised when applied to `value`.
    #[must_use]
    pub fn error_for(&self, value: &Value) -> OpticError {
        match &self.failure {
            Failure::Fixed(error) => error.clone(),
            Failure::Template(template) => OpticError::Raised {
                message: template.replace("{}", &format!("{value:?}")),
            },
        }
    }
}

impl Optic for ErrorIso {
    fn kind(&self) -> Kind {
        Kind::Iso
    }

    fn get_all(&self, state: &Value) -> Result<Vec<Value>> {
        Err(self.error_for(state))
    }

    fn modify_all(&self, state: &Value, _function: &mut Modifier<'_>) -> Result<Value> {
        Err(self.error_for(state))
    }

    fn review(&self, focus: Value) -> Result<Value> {
        Err(self.error_for(&focus))
    }

    fn reverse(&self) -> Result<Arc<dyn Optic>> {
        Ok(Arc::new(self.clone()))
    }
}
