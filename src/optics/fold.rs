//! Fold optics: read-only access to any number of foci.
//!
//! A Fold wraps a function that lists every focus of a state. The function
//! is invoked afresh on every read, so a fold holds no iteration state and
//! can be used any number of times, from any number of threads.

use std::fmt;
use std::sync::Arc;

use super::{Kind, Optic};
use crate::error::Result;
use crate::hooks::{self, Iterate};
use crate::value::Value;

/// A fold implemented using a function that enumerates foci.
///
/// The function may return any finite [`IntoIterator`] of values; it is
/// drained once per read.
///
/// # Example
///
/// ```
/// use lensing::optics::FunctionFold;
/// use lensing::{Value, list};
///
/// // Every element of a list, twice.
/// let twice = FunctionFold::new(|state: &Value| {
///     let items = state.as_list().unwrap_or_default().to_vec();
///     Ok(items.clone().into_iter().chain(items))
/// });
///
/// assert_eq!(twice.get_all(&list![1, 2]), Ok(vec![1.into(), 2.into(), 1.into(), 2.into()]));
/// ```
#[derive(Clone)]
pub struct FunctionFold {
    folder: Iterate,
}

impl FunctionFold {
    /// Creates a fold from a function enumerating the foci of a state.
    #[must_use]
    pub fn new<F, I>(folder: F) -> Self
    where
        F: Fn(&Value) -> Result<I> + Send + Sync + 'static,
        I: IntoIterator<Item = Value>,
    {
        Self {
            folder: Arc::new(move |state: &Value| -> Result<Vec<Value>> {
                Ok(folder(state)?.into_iter().collect())
            }),
        }
    }

    /// Returns every focus of `state`, in order.
    ///
    /// # Errors
    ///
    /// Returns whatever error the folder function raises.
    pub fn get_all(&self, state: &Value) -> Result<Vec<Value>> {
        (self.folder)(state)
    }
}

impl fmt::Debug for FunctionFold {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter.debug_struct("FunctionFold").finish_non_exhaustive()
    }
}

impl Optic for FunctionFold {
    fn kind(&self) -> Kind {
        Kind::Fold
    }

    fn get_all(&self, state: &Value) -> Result<Vec<Value>> {
        (self.folder)(state)
    }
}

/// Reads every element of any iterable value through its `to_iter` hook.
///
/// Unlike [`EachTraversal`](super::EachTraversal) it never writes, so it
/// also works on types registered with iteration but no rebuild.
#[derive(Debug, Clone, Copy, Default)]
pub struct IterableFold;

impl Optic for IterableFold {
    fn kind(&self) -> Kind {
        Kind::Fold
    }

    fn get_all(&self, state: &Value) -> Result<Vec<Value>> {
        hooks::resolve(state).to_iter(state)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::OpticError;
    use crate::list;
    use rstest::rstest;
    use std::sync::atomic::{AtomicUsize, Ordering};

    #[rstest]
    fn test_fold_is_restartable() {
        let invocations = Arc::new(AtomicUsize::new(0));
        let counter = Arc::clone(&invocations);
        let fold = FunctionFold::new(move |state: &Value| {
            counter.fetch_add(1, Ordering::SeqCst);
            Ok(state.as_list().unwrap_or_default().to_vec())
        });
        let state = list![1, 2, 3];

        let first = fold.get_all(&state).unwrap();
        let second = fold.get_all(&state).unwrap();

        assert_eq!(first, second);
        assert_eq!(first.len(), 3);
        assert_eq!(invocations.load(Ordering::SeqCst), 2);
    }

    #[rstest]
    fn test_fold_may_be_empty() {
        let fold = FunctionFold::new(|_: &Value| Ok(std::iter::empty()));
        assert_eq!(Optic::get_all(&fold, &list![1]), Ok(vec![]));
    }

    #[rstest]
    fn test_fold_cannot_write() {
        let fold = FunctionFold::new(|state: &Value| Ok([state.clone()]));

        assert_eq!(
            fold.modify_all(&Value::from(1), &mut |focus: Value| Ok(focus)),
            Err(OpticError::capability("modify", Kind::Fold))
        );
    }

    #[rstest]
    #[case(list![2, 1, 3], vec![Value::from(2), Value::from(1), Value::from(3)])]
    #[case(Value::set([2, 1]), vec![Value::from(1), Value::from(2)])]
    #[case(Value::from("ab"), vec![Value::from("a"), Value::from("b")])]
    #[case(list![], vec![])]
    fn test_iterable_fold(#[case] state: Value, #[case] expected: Vec<Value>) {
        assert_eq!(IterableFold.get_all(&state), Ok(expected));
    }

    #[rstest]
    fn test_iterable_fold_is_read_only() {
        assert_eq!(IterableFold.kind(), Kind::Fold);
        assert!(matches!(
            IterableFold.get_all(&Value::from(1)),
            Err(OpticError::UnsupportedOperation { .. })
        ));
        assert_eq!(
            IterableFold.review(Value::from(1)),
            Err(OpticError::capability("construct", Kind::Fold))
        );
    }
}
