//! Optics: composable access paths into immutable values.
//!
//! An optic focuses zero, one or many parts (*foci*) of a larger value (the
//! *state*). Depending on its [`Kind`] it can read the foci, build a new
//! state with the foci replaced, or build a whole state from a single focus.
//!
//! # Building blocks
//!
//! - [`Optic`]: one primitive step, object safe so steps of different kinds
//!   can be chained at runtime
//! - [`Pipeline`]: an ordered chain of steps with its composite [`Kind`]
//! - [`BoundPipeline`]: a pipeline paired with a captured state
//! - [`standard_optics`]: constructors for every primitive and derived optic
//!
//! # Optics Hierarchy
//!
//! ```text
//! Iso <: Lens <: Getter <: Fold
//! Iso <: Prism <: Traversal <: Fold
//! Lens <: Traversal <: Setter
//! Prism <: Review
//! ```
//!
//! # Example
//!
//! ```
//! use lensing::{Value, list};
//! use lensing::optics::standard_optics::index;
//!
//! let state = list![list![1, 2, 3], list![4, 5, 6], list![7, 8, 9]];
//! let cell = index(2).compose(&index(1)).unwrap();
//!
//! assert_eq!(cell.get(&state), Ok(Value::from(8)));
//!
//! let updated = cell.set(&state, Value::from(10)).unwrap();
//! assert_eq!(updated, list![list![1, 2, 3], list![4, 5, 6], list![7, 10, 9]]);
//! assert!(updated.as_list().unwrap()[0].is_same(&state.as_list().unwrap()[0]));
//! ```

mod bound;
mod fold;
mod getter;
mod iso;
mod kind;
mod lens;
mod pipeline;
mod prism;
mod review;
mod setter;
pub mod standard_optics;
mod traversal;

use std::fmt;
use std::sync::Arc;

pub use bound::BoundPipeline;
pub use fold::{FunctionFold, IterableFold};
pub use getter::FunctionGetter;
pub use iso::{ErrorIso, FunctionIso};
pub use kind::{Capabilities, Kind};
pub use lens::{
    AttributeLens, ContainsLens, FunctionLens, IndexLens, IndexOrElseLens, ItemByValueLens,
    ItemLens, PartsLens, TupleLens,
};
pub use pipeline::{CopyDepth, Pipeline};
pub use prism::{FilteringPrism, FunctionPrism, InstancePrism};
pub use review::FunctionReview;
pub use setter::ForkSetter;
pub use traversal::{
    EachTraversal, FunctionTraversal, ItemsTraversal, RecurTraversal, RegexTraversal,
};

use crate::error::{OpticError, Result};
use crate::value::Value;

/// A function from a state (or focus) to a derived value.
pub type Transform = Arc<dyn Fn(&Value) -> Result<Value> + Send + Sync>;

/// A function that builds a new state from an old state and a new focus.
pub type Update = Arc<dyn Fn(&Value, Value) -> Result<Value> + Send + Sync>;

/// A function that extracts a focus which may be absent.
pub type Extract = Arc<dyn Fn(&Value) -> Result<Option<Value>> + Send + Sync>;

/// The replacement function threaded through writes.
///
/// It is invoked exactly once per focus, in read order.
pub type Modifier<'a> = dyn FnMut(Value) -> Result<Value> + 'a;

/// One step of an optic pipeline.
///
/// Each method corresponds to one capability of the step's [`Kind`]. The
/// default implementations fail with [`OpticError::Capability`], so a step
/// only implements what its kind supports.
pub trait Optic: fmt::Debug + Send + Sync {
    /// Returns the kind of this step.
    fn kind(&self) -> Kind;

    /// Returns every focus of `state`, in order.
    ///
    /// # Errors
    ///
    /// Fails with [`OpticError::Capability`] for steps that cannot read,
    /// or with any error raised while reading.
    fn get_all(&self, state: &Value) -> Result<Vec<Value>> {
        let _ = state;
        Err(OpticError::capability("collect", self.kind()))
    }

    /// Returns a new state with every focus replaced by `function(focus)`.
    ///
    /// `function` is called exactly once per focus, in the order
    /// [`Optic::get_all`] returns them.
    ///
    /// # Errors
    ///
    /// Fails with [`OpticError::Capability`] for steps that cannot write,
    /// or with the first error raised by `function` or a rebuild.
    fn modify_all(&self, state: &Value, function: &mut Modifier<'_>) -> Result<Value> {
        let _ = (state, function);
        Err(OpticError::capability("modify", self.kind()))
    }

    /// Builds a whole state from `focus` alone.
    ///
    /// # Errors
    ///
    /// Fails with [`OpticError::Capability`] for steps that cannot construct.
    fn review(&self, focus: Value) -> Result<Value> {
        let _ = focus;
        Err(OpticError::capability("construct", self.kind()))
    }

    /// Returns the step that runs this one backwards.
    ///
    /// # Errors
    ///
    /// Fails with [`OpticError::Capability`] for steps that cannot be
    /// flipped. Only isos, prisms and reviews can.
    fn reverse(&self) -> Result<Arc<dyn Optic>> {
        Err(OpticError::capability("flip", self.kind()))
    }
}
