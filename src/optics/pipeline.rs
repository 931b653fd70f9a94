//! Composite optics.
//!
//! A [`Pipeline`] is an ordered chain of [`Optic`] steps together with the
//! [`Kind`] of the whole chain. The kind is computed once, when the chain is
//! built, by intersecting the capabilities of every step; chains whose
//! capabilities would be empty are rejected immediately with
//! [`OpticError::NoComposition`].
//!
//! Every operation checks the composite kind before touching the state, so
//! asking a Fold to write or a Setter to read fails with
//! [`OpticError::Capability`] instead of silently doing nothing.

use std::sync::Arc;

use super::{BoundPipeline, Kind, Modifier, Optic};
use crate::error::{OpticError, Result};
use crate::hooks;
use crate::value::Value;

/// How deeply [`Pipeline::call_mut`] copies each focus before mutating it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum CopyDepth {
    /// Copy the outer container only; children stay shared.
    Shallow,
    /// Copy the focus and everything reachable from it.
    #[default]
    Deep,
}

/// An immutable chain of optic steps with its composite [`Kind`].
///
/// Pipelines are cheap to clone and can be shared between threads; the
/// steps themselves are never copied.
///
/// # Examples
///
/// ```
/// use lensing::optics::Kind;
/// use lensing::optics::standard_optics::{each, index};
/// use lensing::{Value, list};
///
/// let firsts = each().compose(&index(0)).unwrap();
/// let state = list![list![1, 2], list![3, 4]];
///
/// assert_eq!(firsts.kind(), Kind::Traversal);
/// assert_eq!(firsts.collect(&state), Ok(vec![Value::from(1), Value::from(3)]));
/// assert_eq!(firsts.set(&state, Value::from(0)), Ok(list![list![0, 2], list![0, 4]]));
/// ```
#[derive(Debug, Clone)]
pub struct Pipeline {
    steps: Arc<[Arc<dyn Optic>]>,
    kind: Kind,
}

impl Pipeline {
    /// Returns the pipeline with no steps: an Iso focusing the whole state.
    #[must_use]
    pub fn identity() -> Self {
        Self {
            steps: Arc::from([]),
            kind: Kind::Iso,
        }
    }

    /// Creates a single-step pipeline.
    #[must_use]
    pub fn new(optic: impl Optic + 'static) -> Self {
        let kind = optic.kind();
        Self {
            steps: Arc::from([Arc::new(optic) as Arc<dyn Optic>]),
            kind,
        }
    }

    /// Creates a pipeline running `steps` from left to right.
    ///
    /// # Errors
    ///
    /// Fails with [`OpticError::NoComposition`] when two adjacent steps
    /// share no capability.
    pub fn from_steps(steps: impl IntoIterator<Item = Arc<dyn Optic>>) -> Result<Self> {
        let steps: Arc<[Arc<dyn Optic>]> = steps.into_iter().collect();
        let kind = steps
            .iter()
            .try_fold(Kind::Iso, |kind, step| compose_kinds(kind, step.kind()))?;
        Ok(Self { steps, kind })
    }

    /// Creates a pipeline from steps whose composite kind is known up front.
    ///
    /// `kind` must be the fold of [`Kind::compose`] over the step kinds.
    pub(super) fn from_known_steps(
        steps: impl IntoIterator<Item = Arc<dyn Optic>>,
        kind: Kind,
    ) -> Self {
        let steps: Arc<[Arc<dyn Optic>]> = steps.into_iter().collect();
        debug_assert_eq!(
            steps.iter().try_fold(Kind::Iso, |kind, step| kind.compose(step.kind())),
            Some(kind)
        );
        Self { steps, kind }
    }

    /// Returns the composite kind of this pipeline.
    #[must_use]
    pub const fn kind(&self) -> Kind {
        self.kind
    }

    /// Returns the number of primitive steps.
    #[must_use]
    pub fn len(&self) -> usize {
        self.steps.len()
    }

    /// Returns `true` for the identity pipeline.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.steps.is_empty()
    }

    /// Returns a pipeline running `self` and then `other`.
    ///
    /// # Errors
    ///
    /// Fails with [`OpticError::NoComposition`] when the two kinds share
    /// no capability, for example a Fold followed by a Setter.
    pub fn compose(&self, other: &Self) -> Result<Self> {
        let kind = compose_kinds(self.kind, other.kind)?;
        let steps = self.steps.iter().chain(other.steps.iter()).cloned().collect();
        Ok(Self { steps, kind })
    }

    // =========================================================================
    // Reading
    // =========================================================================

    /// Returns the first focus of `state`, the head of [`Pipeline::collect`].
    ///
    /// An empty branch early in the walk does not hide foci found through
    /// later branches.
    ///
    /// # Errors
    ///
    /// Fails with [`OpticError::Capability`] if the pipeline cannot read and
    /// with [`OpticError::NoFocus`] if the pipeline has no focus at all.
    pub fn get(&self, state: &Value) -> Result<Value> {
        self.require(self.kind.can_read(), "get")?;
        self.collect(state)?
            .into_iter()
            .next()
            .ok_or(OpticError::NoFocus)
    }

    /// Returns every focus of `state` as one flat list.
    ///
    /// For steps `a` then `b` the result is the concatenation, in the order
    /// of `a`'s foci, of `b`'s foci of each of them.
    ///
    /// # Errors
    ///
    /// Fails with [`OpticError::Capability`] if the pipeline cannot read, or
    /// with the first error raised by a step.
    pub fn collect(&self, state: &Value) -> Result<Vec<Value>> {
        self.require(self.kind.can_read(), "collect")?;
        self.steps
            .iter()
            .try_fold(vec![state.clone()], |foci, step| {
                let mut next = Vec::with_capacity(foci.len());
                for focus in &foci {
                    next.extend(step.get_all(focus)?);
                }
                Ok(next)
            })
    }

    /// Returns `true` if `state` has at least one focus.
    ///
    /// # Errors
    ///
    /// Fails with [`OpticError::Capability`] if the pipeline cannot read.
    pub fn has(&self, state: &Value) -> Result<bool> {
        self.require(self.kind.can_read(), "has")?;
        Ok(!self.collect(state)?.is_empty())
    }

    // =========================================================================
    // Writing
    // =========================================================================

    /// Returns a new state with every focus replaced by `function(focus)`.
    ///
    /// `function` runs exactly once per focus, in [`Pipeline::collect`]
    /// order. Untouched parts of the state are shared with the result.
    ///
    /// # Errors
    ///
    /// Fails with [`OpticError::Capability`] if the pipeline cannot write,
    /// or with the first error raised while rebuilding.
    pub fn modify<F>(&self, state: &Value, mut function: F) -> Result<Value>
    where
        F: FnMut(Value) -> Value,
    {
        self.try_modify(state, |focus| Ok(function(focus)))
    }

    /// Like [`Pipeline::modify`] with a fallible function.
    ///
    /// # Errors
    ///
    /// The first error returned by `function` aborts the write and is
    /// returned unchanged.
    pub fn try_modify<F>(&self, state: &Value, mut function: F) -> Result<Value>
    where
        F: FnMut(Value) -> Result<Value>,
    {
        self.require(self.kind.can_write(), "modify")?;
        modify_steps(&self.steps, state, &mut function)
    }

    /// Returns a new state with every focus replaced by `value`.
    ///
    /// # Errors
    ///
    /// Fails with [`OpticError::Capability`] if the pipeline cannot write.
    pub fn set(&self, state: &Value, value: Value) -> Result<Value> {
        self.require(self.kind.can_write(), "set")?;
        modify_steps(&self.steps, state, &mut |_: Value| Ok(value.clone()))
    }

    /// Replaces the foci of `state`, in collect order, with `values`.
    ///
    /// # Errors
    ///
    /// Fails with [`OpticError::FocusCountMismatch`] unless there are
    /// exactly as many values as foci.
    pub fn set_many(&self, state: &Value, values: impl IntoIterator<Item = Value>) -> Result<Value> {
        self.require(self.kind.can_write(), "set")?;
        let values: Vec<Value> = values.into_iter().collect();
        let actual = values.len();
        let mut replacements = values.into_iter();
        let mut expected = 0_usize;
        let result = modify_steps(&self.steps, state, &mut |focus: Value| {
            expected += 1;
            Ok(replacements.next().unwrap_or(focus))
        })?;
        if expected != actual {
            tracing::trace!(expected, actual, "set_many count mismatch");
            return Err(OpticError::FocusCountMismatch { expected, actual });
        }
        Ok(result)
    }

    /// Replaces every focus with the result of calling `method` on it.
    ///
    /// The method is looked up in the focus's hook entry. Methods that
    /// mutate their receiver act on a private copy, so `state` is never
    /// affected.
    ///
    /// # Errors
    ///
    /// Fails with [`OpticError::UnsupportedOperation`] when a focus has no
    /// such method, or with the method's own error.
    pub fn call(&self, state: &Value, method: &str, arguments: &[Value]) -> Result<Value> {
        self.require(self.kind.can_write(), "call")?;
        modify_steps(&self.steps, state, &mut |focus: Value| {
            let mut receiver = focus;
            hooks::resolve(&receiver).call_method(&mut receiver, method, arguments)
        })
    }

    /// Replaces every focus with a copy mutated in place by `method`.
    ///
    /// Each focus is copied to `depth` first; the method's return value is
    /// ignored and the mutated copy becomes the new focus.
    ///
    /// # Errors
    ///
    /// Fails with [`OpticError::UnsupportedOperation`] when a focus cannot
    /// be copied or has no such method.
    ///
    /// # Examples
    ///
    /// ```
    /// use lensing::list;
    /// use lensing::optics::CopyDepth;
    /// use lensing::optics::standard_optics::index;
    ///
    /// let state = list![list![3, 1, 2], list![5, 4]];
    /// let sorted = index(0).call_mut(&state, "sort", &[], CopyDepth::Deep).unwrap();
    ///
    /// assert_eq!(sorted, list![list![1, 2, 3], list![5, 4]]);
    /// assert_eq!(state, list![list![3, 1, 2], list![5, 4]]);
    /// ```
    pub fn call_mut(
        &self,
        state: &Value,
        method: &str,
        arguments: &[Value],
        depth: CopyDepth,
    ) -> Result<Value> {
        self.require(self.kind.can_write(), "call")?;
        modify_steps(&self.steps, state, &mut |focus: Value| {
            let entry = hooks::resolve(&focus);
            let mut receiver = match depth {
                CopyDepth::Shallow => entry.shallow_copy(&focus)?,
                CopyDepth::Deep => entry.deep_copy(&focus)?,
            };
            entry.call_method(&mut receiver, method, arguments)?;
            Ok(receiver)
        })
    }

    // =========================================================================
    // Constructing and flipping
    // =========================================================================

    /// Builds a whole state from `focus` alone.
    ///
    /// # Errors
    ///
    /// Fails with [`OpticError::Capability`] unless every step can
    /// construct.
    pub fn construct(&self, focus: Value) -> Result<Value> {
        self.require(self.kind.can_construct(), "construct")?;
        self.steps
            .iter()
            .rev()
            .try_fold(focus, |current, step| step.review(current))
    }

    /// Returns the pipeline running this one backwards.
    ///
    /// Steps run in reverse order and each one is flipped: isos swap their
    /// directions, prisms and reviews become getters of their constructor.
    ///
    /// # Errors
    ///
    /// Fails with [`OpticError::Capability`] unless every step can be
    /// flipped.
    pub fn flip(&self) -> Result<Self> {
        self.require(self.kind.can_construct(), "flip")?;
        let steps = self
            .steps
            .iter()
            .rev()
            .map(|step| step.reverse())
            .collect::<Result<Vec<_>>>()?;
        Self::from_steps(steps)
    }

    /// Pairs this pipeline with `state`.
    #[must_use]
    pub fn bind(&self, state: Value) -> BoundPipeline {
        BoundPipeline::new(self.clone(), state)
    }

    const fn require(&self, capable: bool, operation: &'static str) -> Result<()> {
        if capable {
            Ok(())
        } else {
            Err(OpticError::capability(operation, self.kind))
        }
    }
}

impl Default for Pipeline {
    fn default() -> Self {
        Self::identity()
    }
}

impl Optic for Pipeline {
    fn kind(&self) -> Kind {
        self.kind
    }

    fn get_all(&self, state: &Value) -> Result<Vec<Value>> {
        self.collect(state)
    }

    fn modify_all(&self, state: &Value, function: &mut Modifier<'_>) -> Result<Value> {
        self.require(self.kind.can_write(), "modify")?;
        modify_steps(&self.steps, state, function)
    }

    fn review(&self, focus: Value) -> Result<Value> {
        self.construct(focus)
    }

    fn reverse(&self) -> Result<Arc<dyn Optic>> {
        Ok(Arc::new(self.flip()?))
    }
}

fn compose_kinds(left: Kind, right: Kind) -> Result<Kind> {
    left.compose(right).ok_or_else(|| {
        tracing::debug!(%left, %right, "rejected optic composition");
        OpticError::NoComposition { left, right }
    })
}

/// Descends through `steps`, applying `function` at the innermost foci and
/// rebuilding outward.
fn modify_steps(
    steps: &[Arc<dyn Optic>],
    state: &Value,
    function: &mut Modifier<'_>,
) -> Result<Value> {
    match steps.split_first() {
        None => function(state.clone()),
        Some((first, rest)) => first.modify_all(state, &mut |focus: Value| {
            modify_steps(rest, &focus, &mut *function)
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::optics::standard_optics::{each, filter, fold, getter, identity, index, iso, review};
    use crate::{list, tuple};
    use rstest::rstest;

    fn add(amount: i64) -> impl FnMut(Value) -> Value {
        move |focus| Value::from(focus.as_int().unwrap_or_default() + amount)
    }

    #[rstest]
    fn test_identity_focuses_whole_state() {
        let state = list![1, 2];

        assert_eq!(identity().get(&state), Ok(state.clone()));
        assert_eq!(identity().collect(&state), Ok(vec![state.clone()]));
        assert_eq!(identity().set(&state, Value::from(3)), Ok(Value::from(3)));
        assert_eq!(identity().construct(Value::from(4)), Ok(Value::from(4)));
    }

    #[rstest]
    fn test_get_threads_first_focus() {
        let optic = each().compose(&each()).unwrap();
        let state = list![list![1, 2], list![3]];

        assert_eq!(optic.get(&state), Ok(Value::from(1)));
    }

    #[rstest]
    fn test_get_skips_empty_branches() {
        let optic = each().compose(&each()).unwrap();
        let state = list![list![], list![3, 4]];

        assert_eq!(optic.get(&state), Ok(Value::from(3)));
        assert_eq!(optic.collect(&state), Ok(vec![Value::from(3), Value::from(4)]));
    }

    #[rstest]
    #[case(list![1, 2, 3, 4], Ok(Value::from(2)))]
    #[case(list![1, 3], Err(OpticError::NoFocus))]
    #[case(list![], Err(OpticError::NoFocus))]
    fn test_get_is_first_collected_focus(
        #[case] state: Value,
        #[case] expected: Result<Value>,
    ) {
        let even = each()
            .compose(&filter(|focus: &Value| focus.as_int().is_some_and(|number| number % 2 == 0)))
            .unwrap();

        assert_eq!(even.get(&state), expected);
    }

    #[rstest]
    fn test_collect_flattens_in_order() {
        let optic = each().compose(&each()).unwrap();
        let state = list![list![1, 2], list![], list![3]];

        assert_eq!(
            optic.collect(&state),
            Ok(vec![Value::from(1), Value::from(2), Value::from(3)])
        );
        assert_eq!(optic.has(&state), Ok(true));
        assert_eq!(optic.has(&list![]), Ok(false));
    }

    #[rstest]
    fn test_modify_calls_function_once_per_focus() {
        let optic = each().compose(&each()).unwrap();
        let state = list![list![1, 2], list![3]];
        let mut seen = Vec::new();

        let result = optic.modify(&state, |focus| {
            seen.push(focus.clone());
            focus
        });

        assert_eq!(result, Ok(state.clone()));
        assert_eq!(seen, vec![Value::from(1), Value::from(2), Value::from(3)]);
    }

    #[rstest]
    fn test_try_modify_propagates_first_error() {
        let result = each().try_modify(&list![1, 2], |_| Err(OpticError::NoFocus));

        assert_eq!(result, Err(OpticError::NoFocus));
    }

    #[rstest]
    fn test_set_many() {
        let state = list![1, 2, 3];

        assert_eq!(
            each().set_many(&state, [Value::from(4), Value::from(5), Value::from(6)]),
            Ok(list![4, 5, 6])
        );
        assert_eq!(
            each().set_many(&state, [Value::from(4)]),
            Err(OpticError::FocusCountMismatch { expected: 3, actual: 1 })
        );
    }

    #[rstest]
    fn test_kind_mismatch_is_capability_error() {
        let read_only = getter(|state: &Value| Ok(state.clone()));

        assert_eq!(
            read_only.set(&Value::from(1), Value::from(2)),
            Err(OpticError::capability("set", Kind::Getter))
        );
        assert_eq!(
            read_only.modify(&Value::from(1), add(1)),
            Err(OpticError::capability("modify", Kind::Getter))
        );
        assert_eq!(
            index(0).construct(Value::from(1)),
            Err(OpticError::capability("construct", Kind::Lens))
        );
    }

    #[rstest]
    fn test_fold_then_lens_is_a_fold() {
        let optic = fold(|state: &Value| Ok(state.as_list().unwrap_or_default().to_vec()))
            .compose(&index(0))
            .unwrap();

        assert_eq!(optic.kind(), Kind::Fold);
        assert_eq!(optic.collect(&list![list![1], list![2]]), Ok(vec![Value::from(1), Value::from(2)]));
    }

    #[rstest]
    fn test_construct_runs_steps_backwards() {
        let wrap = review(|focus: &Value| Ok(list![focus.clone()]));
        let pair = review(|focus: &Value| Ok(tuple![focus.clone(), 0]));
        let optic = wrap.compose(&pair).unwrap();

        assert_eq!(optic.construct(Value::from(1)), Ok(list![tuple![1, 0]]));
    }

    #[rstest]
    fn test_flip_reverses_isos() {
        let double = iso(
            |state: &Value| Ok(Value::from(state.as_int().unwrap_or_default() * 2)),
            |focus: &Value| Ok(Value::from(focus.as_int().unwrap_or_default() / 2)),
        );
        let increment = iso(
            |state: &Value| Ok(Value::from(state.as_int().unwrap_or_default() + 1)),
            |focus: &Value| Ok(Value::from(focus.as_int().unwrap_or_default() - 1)),
        );
        let optic = double.compose(&increment).unwrap();
        let flipped = optic.flip().unwrap();

        assert_eq!(optic.get(&Value::from(3)), Ok(Value::from(7)));
        assert_eq!(flipped.get(&Value::from(7)), Ok(Value::from(3)));
        assert_eq!(flipped.kind(), Kind::Iso);
    }

    #[rstest]
    fn test_flip_requires_construct() {
        assert_eq!(
            index(0).flip().map(|_| ()),
            Err(OpticError::capability("flip", Kind::Lens))
        );
    }

    #[rstest]
    fn test_call_uses_return_value() {
        let state = list!["a", "b"];

        assert_eq!(each().call(&state, "upper", &[]), Ok(list!["A", "B"]));
    }

    #[rstest]
    #[case(CopyDepth::Shallow)]
    #[case(CopyDepth::Deep)]
    fn test_call_mut_isolates_original(#[case] depth: CopyDepth) {
        let state = list![list![3, 1, 2]];
        let result = index(0).call_mut(&state, "append", &[Value::from(0)], depth);

        assert_eq!(result, Ok(list![list![3, 1, 2, 0]]));
        assert_eq!(state, list![list![3, 1, 2]]);
    }

    #[rstest]
    fn test_pipeline_as_step_of_another() {
        let inner = index(1).compose(&index(0)).unwrap();
        let outer = Pipeline::new(inner);
        let state = list![0, list![5]];

        assert_eq!(outer.kind(), Kind::Lens);
        assert_eq!(outer.modify(&state, add(1)), Ok(list![0, list![6]]));
    }

    #[rstest]
    fn test_from_steps_rejects_disjoint_kinds() {
        let steps: Vec<Arc<dyn Optic>> = vec![
            Arc::new(fold(|state: &Value| Ok([state.clone()]))),
            Arc::new(review(|focus: &Value| Ok(focus.clone()))),
        ];

        assert_eq!(
            Pipeline::from_steps(steps).map(|_| ()),
            Err(OpticError::NoComposition { left: Kind::Fold, right: Kind::Review })
        );
    }
}
