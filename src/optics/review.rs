//! Review optics: construct-only.

use std::fmt;
use std::sync::Arc;

use super::{FunctionGetter, Kind, Optic, Transform};
use crate::error::Result;
use crate::value::Value;

/// A construct-only optic: builds a whole state from a focus.
///
/// Flipping a review yields a [`FunctionGetter`] whose read is the
/// construction function.
///
/// # Example
///
/// ```
/// use lensing::optics::{FunctionReview, Optic};
/// use lensing::{Value, list};
///
/// let singleton = FunctionReview::new(|focus: &Value| Ok(Value::list([focus.clone()])));
/// assert_eq!(singleton.review(Value::from(1)), Ok(list![1]));
/// ```
#[derive(Clone)]
pub struct FunctionReview {
    construct: Transform,
}

impl FunctionReview {
    /// Creates a review from a construction function.
    #[must_use]
    pub fn new<C>(construct: C) -> Self
    where
        C: Fn(&Value) -> Result<Value> + Send + Sync + 'static,
    {
        Self {
            construct: Arc::new(construct),
        }
    }
}

impl fmt::Debug for FunctionReview {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter.debug_struct("FunctionReview").finish_non_exhaustive()
    }
}

impl Optic for FunctionReview {
    fn kind(&self) -> Kind {
        Kind::Review
    }

    fn review(&self, focus: Value) -> Result<Value> {
        (self.construct)(&focus)
    }

    fn reverse(&self) -> Result<Arc<dyn Optic>> {
        Ok(Arc::new(FunctionGetter::from_transform(Arc::clone(&self.construct))))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::OpticError;
    use crate::tuple;
    use rstest::rstest;

    fn boxed() -> FunctionReview {
        FunctionReview::new(|focus: &Value| Ok(Value::from(("box", focus.clone()))))
    }

    #[rstest]
    fn test_review_constructs() {
        assert_eq!(boxed().review(Value::from(1)), Ok(tuple!["box", 1]));
    }

    #[rstest]
    fn test_review_cannot_read() {
        assert_eq!(
            boxed().get_all(&Value::from(1)),
            Err(OpticError::capability("collect", Kind::Review))
        );
    }

    #[rstest]
    fn test_flip_yields_getter() {
        let getter = boxed().reverse().unwrap();

        assert_eq!(getter.kind(), Kind::Getter);
        assert_eq!(getter.get_all(&Value::from(2)), Ok(vec![tuple!["box", 2]]));
    }
}
