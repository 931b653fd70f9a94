use super::{CopyDepth, Kind, Pipeline};
use crate::error::Result;
use crate::value::Value;

/// A [`Pipeline`] paired with a captured state.
///
/// Every state-taking pipeline operation is available without the state
/// argument. Operations return new values; the captured state is never
/// changed, and the binding keeps pointing at the state it was built with.
///
/// # Examples
///
/// ```
/// use lensing::optics::standard_optics::{each, index};
/// use lensing::{Value, list};
///
/// let state = list![list![1, 2], list![3, 4]];
/// let bound = index(1).bind(state.clone());
///
/// assert_eq!(bound.get(), Ok(list![3, 4]));
///
/// let deeper = bound.compose(&each()).unwrap();
/// assert_eq!(deeper.set(Value::from(0)), Ok(list![list![1, 2], list![0, 0]]));
/// assert_eq!(deeper.state(), &state);
/// ```
#[derive(Debug, Clone)]
pub struct BoundPipeline {
    pipeline: Pipeline,
    state: Value,
}

impl BoundPipeline {
    /// Binds `pipeline` to `state`.
    #[must_use]
    pub const fn new(pipeline: Pipeline, state: Value) -> Self {
        Self { pipeline, state }
    }

    /// Returns the captured state.
    #[must_use]
    pub const fn state(&self) -> &Value {
        &self.state
    }

    /// Returns the unbound pipeline.
    #[must_use]
    pub const fn pipeline(&self) -> &Pipeline {
        &self.pipeline
    }

    /// Returns the composite kind of the pipeline.
    #[must_use]
    pub const fn kind(&self) -> Kind {
        self.pipeline.kind()
    }

    /// Splits the binding into its pipeline and state.
    #[must_use]
    pub fn unbind(self) -> (Pipeline, Value) {
        (self.pipeline, self.state)
    }

    /// Appends an unbound pipeline, keeping the captured state.
    ///
    /// Only unbound pipelines can be appended; the argument type rules out
    /// composing two bindings.
    ///
    /// # Errors
    ///
    /// Fails with `NoComposition` as [`Pipeline::compose`] does.
    pub fn compose(&self, other: &Pipeline) -> Result<Self> {
        Ok(Self {
            pipeline: self.pipeline.compose(other)?,
            state: self.state.clone(),
        })
    }

    /// See [`Pipeline::get`].
    ///
    /// # Errors
    ///
    /// As [`Pipeline::get`].
    pub fn get(&self) -> Result<Value> {
        self.pipeline.get(&self.state)
    }

    /// See [`Pipeline::collect`].
    ///
    /// # Errors
    ///
    /// As [`Pipeline::collect`].
    pub fn collect(&self) -> Result<Vec<Value>> {
        self.pipeline.collect(&self.state)
    }

    /// See [`Pipeline::has`].
    ///
    /// # Errors
    ///
    /// As [`Pipeline::has`].
    pub fn has(&self) -> Result<bool> {
        self.pipeline.has(&self.state)
    }

    /// See [`Pipeline::set`].
    ///
    /// # Errors
    ///
    /// As [`Pipeline::set`].
    pub fn set(&self, value: Value) -> Result<Value> {
        self.pipeline.set(&self.state, value)
    }

    /// See [`Pipeline::set_many`].
    ///
    /// # Errors
    ///
    /// As [`Pipeline::set_many`].
    pub fn set_many(&self, values: impl IntoIterator<Item = Value>) -> Result<Value> {
        self.pipeline.set_many(&self.state, values)
    }

    /// See [`Pipeline::modify`].
    ///
    /// # Errors
    ///
    /// As [`Pipeline::modify`].
    pub fn modify<F>(&self, function: F) -> Result<Value>
    where
        F: FnMut(Value) -> Value,
    {
        self.pipeline.modify(&self.state, function)
    }

    /// See [`Pipeline::try_modify`].
    ///
    /// # Errors
    ///
    /// As [`Pipeline::try_modify`].
    pub fn try_modify<F>(&self, function: F) -> Result<Value>
    where
        F: FnMut(Value) -> Result<Value>,
    {
        self.pipeline.try_modify(&self.state, function)
    }

    /// See [`Pipeline::call`].
    ///
    /// # Errors
    ///
    /// As [`Pipeline::call`].
    pub fn call(&self, method: &str, arguments: &[Value]) -> Result<Value> {
        self.pipeline.call(&self.state, method, arguments)
    }

    /// See [`Pipeline::call_mut`].
    ///
    /// # Errors
    ///
    /// As [`Pipeline::call_mut`].
    pub fn call_mut(&self, method: &str, arguments: &[Value], depth: CopyDepth) -> Result<Value> {
        self.pipeline.call_mut(&self.state, method, arguments, depth)
    }

    /// Builds a state from `focus`; the captured state plays no part.
    ///
    /// # Errors
    ///
    /// As [`Pipeline::construct`].
    pub fn construct(&self, focus: Value) -> Result<Value> {
        self.pipeline.construct(focus)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::OpticError;
    use crate::list;
    use crate::optics::standard_optics::{each, getter, index};
    use rstest::rstest;

    #[rstest]
    fn test_bound_operations_use_captured_state() {
        let bound = each().bind(list![1, 2]);

        assert_eq!(bound.collect(), Ok(vec![Value::from(1), Value::from(2)]));
        assert_eq!(bound.has(), Ok(true));
        assert_eq!(bound.set(Value::from(0)), Ok(list![0, 0]));
        assert_eq!(bound.set_many([Value::from(3), Value::from(4)]), Ok(list![3, 4]));
        assert_eq!(
            bound.modify(|focus| Value::from(focus.as_int().unwrap_or_default() * 3)),
            Ok(list![3, 6])
        );
        assert_eq!(bound.state(), &list![1, 2]);
    }

    #[rstest]
    fn test_bound_call_and_call_mut() {
        let bound = index(0).bind(list!["ab", list![2, 1]]);
        let second = index(1).bind(bound.state().clone());

        assert_eq!(bound.call("upper", &[]), Ok(list!["AB", list![2, 1]]));
        assert_eq!(
            second.call_mut("sort", &[], CopyDepth::Shallow),
            Ok(list!["ab", list![1, 2]])
        );
    }

    #[rstest]
    fn test_bound_compose_keeps_state() {
        let bound = index(0).bind(list![list![7]]);
        let composed = bound.compose(&index(0)).unwrap();

        assert_eq!(composed.get(), Ok(Value::from(7)));
        assert!(composed.state().is_same(bound.state()));
    }

    #[rstest]
    fn test_bound_kind_errors_surface() {
        let bound = getter(|state: &Value| Ok(state.clone())).bind(Value::from(1));

        assert_eq!(bound.kind(), Kind::Getter);
        assert_eq!(
            bound.set(Value::from(2)),
            Err(OpticError::capability("set", Kind::Getter))
        );
    }

    #[rstest]
    fn test_unbind() {
        let (pipeline, state) = index(0).bind(list![1]).unbind();

        assert_eq!(pipeline.get(&state), Ok(Value::from(1)));
    }
}
