//! # lensing
//!
//! Composable optics for reading and rebuilding immutable, shared values.
//!
//! ## Overview
//!
//! An optic describes where some parts (*foci*) live inside a larger value
//! (the *state*) and how to build a new state with those parts replaced.
//! Writes never mutate: each one returns a new value that shares every
//! untouched sub-value with the original.
//!
//! - **Values**: a dynamic [`Value`] model with reference-counted containers
//! - **Hooks**: per-type strategies that tell generic optics how to read and
//!   rebuild a container ([`hooks`])
//! - **Optics**: Lens, Iso, Prism, Traversal, Getter, Fold, Setter and
//!   Review, composed into [`optics::Pipeline`]s whose [`optics::Kind`] is
//!   checked when they are built
//! - **Binding**: [`optics::BoundPipeline`] pairs a pipeline with a state
//!
//! ## Feature Flags
//!
//! - `serde`: `Serialize` and `Deserialize` for [`Value`]
//! - `fxhash`: use `rustc-hash` for the hook registry table
//!
//! ## Example
//!
//! ```rust
//! use lensing::prelude::*;
//!
//! let state = list![1, 2, 3];
//! let second = index(1);
//!
//! assert_eq!(second.get(&state), Ok(Value::from(2)));
//! assert_eq!(second.set(&state, Value::from(4)), Ok(list![1, 4, 3]));
//! assert_eq!(state, list![1, 2, 3]);
//!
//! let bumped = each().modify(&state, |focus| (focus.as_int().unwrap_or_default() + 10).into());
//! assert_eq!(bumped, Ok(list![11, 12, 13]));
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![warn(clippy::nursery)]
#![allow(clippy::redundant_closure_for_method_calls)]

/// Prelude module for convenient imports.
///
/// Re-exports the value model, the optic types and every standard optic
/// constructor.
///
/// # Usage
///
/// ```rust
/// use lensing::prelude::*;
/// ```
pub mod prelude {
    pub use crate::error::{OpticError, Result};
    pub use crate::optics::standard_optics::*;
    pub use crate::optics::{BoundPipeline, CopyDepth, Kind, Optic, Pipeline};
    pub use crate::value::{Object, Record, TypeKey, Value};
    pub use crate::{list, map, tuple};
}

pub mod error;
pub mod hooks;
pub mod optics;
pub mod value;

pub use error::{OpticError, Result};
pub use value::{Object, Record, TypeKey, Value};

static_assertions::assert_impl_all!(Value: Send, Sync);
static_assertions::assert_impl_all!(optics::Pipeline: Send, Sync);
static_assertions::assert_impl_all!(optics::BoundPipeline: Send, Sync);
static_assertions::assert_impl_all!(hooks::HookRegistry: Send, Sync);
