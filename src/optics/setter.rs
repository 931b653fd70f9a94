//! Setter optics: write-only, built by forking writes through several
//! optics.

use super::{Kind, Modifier, Optic, Pipeline};
use crate::error::{OpticError, Result};
use crate::value::Value;

/// A write-only optic that writes through several optics in turn.
///
/// Each sub-optic's write runs in the order given, starting from the
/// original state, and each one sees the result of the previous write. The
/// modifying function runs once per focus of every sub-optic, so foci
/// shared by two sub-optics are modified twice.
///
/// # Example
///
/// ```
/// use lensing::list;
/// use lensing::optics::standard_optics::{fork, index};
///
/// let ends = fork(vec![index(0), index(-1)]).unwrap();
/// assert_eq!(ends.set(&list![1, 2, 3], 0.into()), Ok(list![0, 2, 0]));
/// ```
#[derive(Debug, Clone)]
pub struct ForkSetter {
    optics: Vec<Pipeline>,
}

impl ForkSetter {
    /// Creates a fork over write-capable optics.
    ///
    /// # Errors
    ///
    /// Fails with [`OpticError::Capability`] if any optic cannot write.
    pub fn new(optics: Vec<Pipeline>) -> Result<Self> {
        if let Some(optic) = optics.iter().find(|optic| !optic.kind().can_write()) {
            return Err(OpticError::capability("fork", optic.kind()));
        }
        Ok(Self { optics })
    }

    /// Returns the sub-optics in write order.
    #[must_use]
    pub fn optics(&self) -> &[Pipeline] {
        &self.optics
    }
}

impl Optic for ForkSetter {
    fn kind(&self) -> Kind {
        Kind::Setter
    }

    fn modify_all(&self, state: &Value, function: &mut Modifier<'_>) -> Result<Value> {
        self.optics
            .iter()
            .try_fold(state.clone(), |current, optic| {
                optic.modify_all(&current, &mut *function)
            })
    }
}
