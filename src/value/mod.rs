//! Shared immutable values that optics read from and rebuild.
//!
//! A [`Value`] is the state (and every focus) an optic operates on. All
//! containers live behind [`Arc`], so cloning a value is cheap and rebuilding
//! one container keeps every untouched child as the very same allocation.
//!
//! # Structural sharing
//!
//! ```rust
//! use lensing::{Value, list};
//!
//! let state = list![list![1, 2], list![3, 4]];
//! let copy = state.clone();
//! assert!(copy.is_same(&state));
//!
//! let shallow = state.shallow_copy();
//! assert!(!shallow.is_same(&state));
//! assert!(shallow.as_list().unwrap()[0].is_same(&state.as_list().unwrap()[0]));
//! ```

mod ordering;
#[cfg(feature = "serde")]
mod serialization;

use std::collections::{BTreeMap, BTreeSet};
use std::fmt;
use std::sync::Arc;

use crate::error::{OpticError, Result};

/// The runtime type tag of a [`Value`].
///
/// Builtin shapes have one tag each; records and objects are tagged by their
/// type name so that the hook registry can hold per-class strategies.
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum TypeKey {
    /// The null value.
    Null,
    /// Booleans.
    Bool,
    /// Signed integers.
    Int,
    /// Floating point numbers.
    Float,
    /// Strings.
    Str,
    /// Ordered, fixed-length sequences.
    List,
    /// Tuples.
    Tuple,
    /// Key-value mappings.
    Map,
    /// Sets.
    Set,
    /// Records with the given type name.
    Record(Arc<str>),
    /// Objects of the given class.
    Object(Arc<str>),
}

impl TypeKey {
    /// Creates the tag for records named `name`.
    #[must_use]
    pub fn record(name: impl Into<Arc<str>>) -> Self {
        Self::Record(name.into())
    }

    /// Creates the tag for objects of class `class`.
    #[must_use]
    pub fn object(class: impl Into<Arc<str>>) -> Self {
        Self::Object(class.into())
    }
}

impl fmt::Display for TypeKey {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Null => formatter.write_str("null"),
            Self::Bool => formatter.write_str("bool"),
            Self::Int => formatter.write_str("int"),
            Self::Float => formatter.write_str("float"),
            Self::Str => formatter.write_str("str"),
            Self::List => formatter.write_str("list"),
            Self::Tuple => formatter.write_str("tuple"),
            Self::Map => formatter.write_str("map"),
            Self::Set => formatter.write_str("set"),
            Self::Record(name) => write!(formatter, "record {name}"),
            Self::Object(class) => write!(formatter, "object {class}"),
        }
    }
}

/// A fixed-shape named tuple.
///
/// Fields are positional and named; the shape never changes once built.
/// Writes go through [`Record::with_value`], which reconstructs the record
/// with one field replaced.
#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Record {
    name: Arc<str>,
    fields: Arc<[Arc<str>]>,
    values: Vec<Value>,
}

impl Record {
    /// Creates a record named `name` from `(field, value)` pairs.
    ///
    /// # Example
    ///
    /// ```rust
    /// use lensing::Record;
    ///
    /// let point = Record::new("Point", [("x", 1), ("y", 2)]);
    /// assert_eq!(point.get("y").and_then(|value| value.as_int()), Some(2));
    /// ```
    #[must_use]
    pub fn new<F, V>(name: impl Into<Arc<str>>, fields: impl IntoIterator<Item = (F, V)>) -> Self
    where
        F: Into<Arc<str>>,
        V: Into<Value>,
    {
        let (names, values): (Vec<Arc<str>>, Vec<Value>) = fields
            .into_iter()
            .map(|(field, value)| (field.into(), value.into()))
            .unzip();
        Self {
            name: name.into(),
            fields: names.into(),
            values,
        }
    }

    /// Returns the record's type name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns the field names in positional order.
    #[must_use]
    pub fn fields(&self) -> &[Arc<str>] {
        &self.fields
    }

    /// Returns the field values in positional order.
    #[must_use]
    pub fn values(&self) -> &[Value] {
        &self.values
    }

    /// Returns the position of `field`, if the record has it.
    #[must_use]
    pub fn position(&self, field: &str) -> Option<usize> {
        self.fields.iter().position(|name| &**name == field)
    }

    /// Returns the value of `field`, if the record has it.
    #[must_use]
    pub fn get(&self, field: &str) -> Option<&Value> {
        self.position(field).map(|index| &self.values[index])
    }

    /// Returns a new record with the field at `index` replaced.
    ///
    /// # Errors
    ///
    /// Returns [`OpticError::MissingKey`] when `index` is out of range.
    pub fn with_value(&self, index: usize, value: Value) -> Result<Self> {
        if index >= self.values.len() {
            return Err(OpticError::MissingKey {
                key: index.to_string(),
                type_name: TypeKey::Record(self.name.clone()).to_string(),
            });
        }
        let mut values = self.values.clone();
        values[index] = value;
        Ok(Self {
            name: self.name.clone(),
            fields: self.fields.clone(),
            values,
        })
    }

    /// Returns a new record with every field replaced, in positional order.
    ///
    /// # Errors
    ///
    /// Returns [`OpticError::FocusCountMismatch`] when `values` does not have
    /// exactly one entry per field.
    pub fn with_values(&self, values: Vec<Value>) -> Result<Self> {
        if values.len() != self.values.len() {
            return Err(OpticError::FocusCountMismatch {
                expected: self.values.len(),
                actual: values.len(),
            });
        }
        Ok(Self {
            name: self.name.clone(),
            fields: self.fields.clone(),
            values,
        })
    }
}

/// A generic object: a class name and a bag of named attributes.
///
/// Objects are rebuilt by copying and replacing one attribute, provided the
/// class's hook entry has a copy strategy.
#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Object {
    class: Arc<str>,
    attributes: BTreeMap<Arc<str>, Value>,
}

impl Object {
    /// Creates an object of class `class` with no attributes.
    #[must_use]
    pub fn new(class: impl Into<Arc<str>>) -> Self {
        Self {
            class: class.into(),
            attributes: BTreeMap::new(),
        }
    }

    /// Returns this object with `name` bound to `value`.
    ///
    /// # Example
    ///
    /// ```rust
    /// use lensing::Object;
    ///
    /// let robot = Object::new("Robot").with_attribute("x", 3).with_attribute("y", 4);
    /// assert_eq!(robot.attribute("x").and_then(|value| value.as_int()), Some(3));
    /// ```
    #[must_use]
    pub fn with_attribute(mut self, name: impl Into<Arc<str>>, value: impl Into<Value>) -> Self {
        self.attributes.insert(name.into(), value.into());
        self
    }

    /// Returns the object's class name.
    #[must_use]
    pub fn class(&self) -> &str {
        &self.class
    }

    /// Returns the value of attribute `name`, if set.
    #[must_use]
    pub fn attribute(&self, name: &str) -> Option<&Value> {
        self.attributes.get(name)
    }

    /// Iterates over attributes in name order.
    pub fn attributes(&self) -> impl Iterator<Item = (&str, &Value)> {
        self.attributes
            .iter()
            .map(|(name, value)| (&**name, value))
    }

    /// Binds attribute `name` to `value` in place.
    pub fn set_attribute(&mut self, name: impl Into<Arc<str>>, value: Value) {
        self.attributes.insert(name.into(), value);
    }
}

/// A dynamically typed, immutable-by-convention value.
///
/// Containers are reference counted; writes never mutate an existing
/// allocation but build a new one that shares every unchanged child.
#[derive(Clone, Debug, Default)]
pub enum Value {
    /// The absence of a value.
    #[default]
    Null,
    /// A boolean.
    Bool(bool),
    /// A signed integer.
    Int(i64),
    /// A floating point number.
    Float(f64),
    /// A string.
    Str(Arc<str>),
    /// An ordered sequence.
    List(Arc<Vec<Value>>),
    /// A tuple.
    Tuple(Arc<Vec<Value>>),
    /// A key-value mapping ordered by key.
    Map(Arc<BTreeMap<Value, Value>>),
    /// A set ordered by member.
    Set(Arc<BTreeSet<Value>>),
    /// A fixed-shape named tuple.
    Record(Arc<Record>),
    /// A generic attribute bag.
    Object(Arc<Object>),
}

macro_rules! variant_predicates {
    ($($variant:ident),* $(,)?) => {
        paste::paste! {
            $(
                #[doc = "Returns `true` if this is a `" $variant "` value."]
                #[must_use]
                pub const fn [<is_ $variant:snake>](&self) -> bool {
                    matches!(self, Self::$variant(..))
                }
            )*
        }
    };
}

impl Value {
    variant_predicates!(Bool, Int, Float, Str, List, Tuple, Map, Set, Record, Object);

    /// Returns `true` if this is [`Value::Null`].
    #[must_use]
    pub const fn is_null(&self) -> bool {
        matches!(self, Self::Null)
    }

    /// Creates a list from anything convertible into values.
    pub fn list<T: Into<Self>>(items: impl IntoIterator<Item = T>) -> Self {
        Self::List(Arc::new(items.into_iter().map(Into::into).collect()))
    }

    /// Creates a tuple from anything convertible into values.
    pub fn tuple<T: Into<Self>>(items: impl IntoIterator<Item = T>) -> Self {
        Self::Tuple(Arc::new(items.into_iter().map(Into::into).collect()))
    }

    /// Creates a map from key-value pairs.
    pub fn map<K: Into<Self>, V: Into<Self>>(entries: impl IntoIterator<Item = (K, V)>) -> Self {
        Self::Map(Arc::new(
            entries
                .into_iter()
                .map(|(key, value)| (key.into(), value.into()))
                .collect(),
        ))
    }

    /// Creates a set from anything convertible into values.
    pub fn set<T: Into<Self>>(items: impl IntoIterator<Item = T>) -> Self {
        Self::Set(Arc::new(items.into_iter().map(Into::into).collect()))
    }

    /// Returns the runtime type tag of this value.
    #[must_use]
    pub fn type_key(&self) -> TypeKey {
        match self {
            Self::Null => TypeKey::Null,
            Self::Bool(_) => TypeKey::Bool,
            Self::Int(_) => TypeKey::Int,
            Self::Float(_) => TypeKey::Float,
            Self::Str(_) => TypeKey::Str,
            Self::List(_) => TypeKey::List,
            Self::Tuple(_) => TypeKey::Tuple,
            Self::Map(_) => TypeKey::Map,
            Self::Set(_) => TypeKey::Set,
            Self::Record(record) => TypeKey::Record(record.name.clone()),
            Self::Object(object) => TypeKey::Object(object.class.clone()),
        }
    }

    /// Returns the boolean, if this is one.
    #[must_use]
    pub const fn as_bool(&self) -> Option<bool> {
        match self {
            Self::Bool(value) => Some(*value),
            _ => None,
        }
    }

    /// Returns the integer, if this is one.
    #[must_use]
    pub const fn as_int(&self) -> Option<i64> {
        match self {
            Self::Int(value) => Some(*value),
            _ => None,
        }
    }

    /// Returns the float, if this is one.
    #[must_use]
    pub const fn as_float(&self) -> Option<f64> {
        match self {
            Self::Float(value) => Some(*value),
            _ => None,
        }
    }

    /// Returns the string slice, if this is a string.
    #[must_use]
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::Str(value) => Some(value),
            _ => None,
        }
    }

    /// Returns the elements, if this is a list.
    #[must_use]
    pub fn as_list(&self) -> Option<&[Self]> {
        match self {
            Self::List(items) => Some(items),
            _ => None,
        }
    }

    /// Returns the elements, if this is a tuple.
    #[must_use]
    pub fn as_tuple(&self) -> Option<&[Self]> {
        match self {
            Self::Tuple(items) => Some(items),
            _ => None,
        }
    }

    /// Returns both elements, if this is a tuple of exactly two.
    #[must_use]
    pub fn as_pair(&self) -> Option<(&Self, &Self)> {
        match self.as_tuple() {
            Some([first, second]) => Some((first, second)),
            _ => None,
        }
    }

    /// Returns the entries, if this is a map.
    #[must_use]
    pub fn as_map(&self) -> Option<&BTreeMap<Self, Self>> {
        match self {
            Self::Map(entries) => Some(entries),
            _ => None,
        }
    }

    /// Returns the members, if this is a set.
    #[must_use]
    pub fn as_set(&self) -> Option<&BTreeSet<Self>> {
        match self {
            Self::Set(members) => Some(members),
            _ => None,
        }
    }

    /// Returns the record, if this is one.
    #[must_use]
    pub fn as_record(&self) -> Option<&Record> {
        match self {
            Self::Record(record) => Some(record),
            _ => None,
        }
    }

    /// Returns the object, if this is one.
    #[must_use]
    pub fn as_object(&self) -> Option<&Object> {
        match self {
            Self::Object(object) => Some(object),
            _ => None,
        }
    }

    /// Returns `true` if both values are the same allocation.
    ///
    /// Containers and strings compare by pointer; scalars, which have no
    /// allocation, compare by value.
    #[must_use]
    pub fn is_same(&self, other: &Self) -> bool {
        match (self, other) {
            (Self::Str(left), Self::Str(right)) => Arc::ptr_eq(left, right),
            (Self::List(left), Self::List(right)) | (Self::Tuple(left), Self::Tuple(right)) => {
                Arc::ptr_eq(left, right)
            }
            (Self::Map(left), Self::Map(right)) => Arc::ptr_eq(left, right),
            (Self::Set(left), Self::Set(right)) => Arc::ptr_eq(left, right),
            (Self::Record(left), Self::Record(right)) => Arc::ptr_eq(left, right),
            (Self::Object(left), Self::Object(right)) => Arc::ptr_eq(left, right),
            (Self::Null, Self::Null) => true,
            (Self::Bool(left), Self::Bool(right)) => left == right,
            (Self::Int(left), Self::Int(right)) => left == right,
            (Self::Float(left), Self::Float(right)) => left.to_bits() == right.to_bits(),
            _ => false,
        }
    }

    /// Copies the outermost container into a fresh allocation.
    ///
    /// Children stay shared with the original.
    #[must_use]
    pub fn shallow_copy(&self) -> Self {
        match self {
            Self::Str(value) => Self::Str(Arc::from(&**value)),
            Self::List(items) => Self::List(Arc::new((**items).clone())),
            Self::Tuple(items) => Self::Tuple(Arc::new((**items).clone())),
            Self::Map(entries) => Self::Map(Arc::new((**entries).clone())),
            Self::Set(members) => Self::Set(Arc::new((**members).clone())),
            Self::Record(record) => Self::Record(Arc::new((**record).clone())),
            Self::Object(object) => Self::Object(Arc::new((**object).clone())),
            scalar => scalar.clone(),
        }
    }

    /// Copies this value and every nested container into fresh allocations.
    #[must_use]
    pub fn deep_copy(&self) -> Self {
        match self {
            Self::Str(value) => Self::Str(Arc::from(&**value)),
            Self::List(items) => Self::List(Arc::new(items.iter().map(Self::deep_copy).collect())),
            Self::Tuple(items) => {
                Self::Tuple(Arc::new(items.iter().map(Self::deep_copy).collect()))
            }
            Self::Map(entries) => Self::Map(Arc::new(
                entries
                    .iter()
                    .map(|(key, value)| (key.deep_copy(), value.deep_copy()))
                    .collect(),
            )),
            Self::Set(members) => {
                Self::Set(Arc::new(members.iter().map(Self::deep_copy).collect()))
            }
            Self::Record(record) => Self::Record(Arc::new(Record {
                name: record.name.clone(),
                fields: record.fields.clone(),
                values: record.values.iter().map(Self::deep_copy).collect(),
            })),
            Self::Object(object) => Self::Object(Arc::new(Object {
                class: object.class.clone(),
                attributes: object
                    .attributes
                    .iter()
                    .map(|(name, value)| (name.clone(), value.deep_copy()))
                    .collect(),
            })),
            scalar => scalar.clone(),
        }
    }

    /// Tests whether `item` is a member of this value.
    ///
    /// Lists, tuples and records test their elements, maps their keys, sets
    /// their members and strings their substrings.
    ///
    /// # Errors
    ///
    /// Returns [`OpticError::UnsupportedOperation`] for scalars and objects,
    /// and [`OpticError::TypeMismatch`] when a string is searched for a
    /// non-string.
    pub fn contains(&self, item: &Self) -> Result<bool> {
        match self {
            Self::List(items) | Self::Tuple(items) => Ok(items.contains(item)),
            Self::Record(record) => Ok(record.values.contains(item)),
            Self::Map(entries) => Ok(entries.contains_key(item)),
            Self::Set(members) => Ok(members.contains(item)),
            Self::Str(haystack) => item
                .as_str()
                .map(|needle| haystack.contains(needle))
                .ok_or_else(|| OpticError::type_mismatch("str", item.type_key())),
            other => Err(OpticError::unsupported("contains", other.type_key())),
        }
    }
}

impl From<bool> for Value {
    fn from(value: bool) -> Self {
        Self::Bool(value)
    }
}

impl From<i64> for Value {
    fn from(value: i64) -> Self {
        Self::Int(value)
    }
}

impl From<i32> for Value {
    fn from(value: i32) -> Self {
        Self::Int(i64::from(value))
    }
}

impl From<u32> for Value {
    fn from(value: u32) -> Self {
        Self::Int(i64::from(value))
    }
}

impl From<f64> for Value {
    fn from(value: f64) -> Self {
        Self::Float(value)
    }
}

impl From<&str> for Value {
    fn from(value: &str) -> Self {
        Self::Str(Arc::from(value))
    }
}

impl From<String> for Value {
    fn from(value: String) -> Self {
        Self::Str(Arc::from(value))
    }
}

impl From<Arc<str>> for Value {
    fn from(value: Arc<str>) -> Self {
        Self::Str(value)
    }
}

impl From<Record> for Value {
    fn from(value: Record) -> Self {
        Self::Record(Arc::new(value))
    }
}

impl From<Object> for Value {
    fn from(value: Object) -> Self {
        Self::Object(Arc::new(value))
    }
}

impl<T: Into<Self>> From<Vec<T>> for Value {
    fn from(items: Vec<T>) -> Self {
        Self::list(items)
    }
}

impl<T: Into<Self>> From<Option<T>> for Value {
    fn from(value: Option<T>) -> Self {
        value.map_or(Self::Null, Into::into)
    }
}

impl<A: Into<Self>, B: Into<Self>> From<(A, B)> for Value {
    fn from((first, second): (A, B)) -> Self {
        Self::Tuple(Arc::new(vec![first.into(), second.into()]))
    }
}

impl FromIterator<Self> for Value {
    fn from_iter<I: IntoIterator<Item = Self>>(iter: I) -> Self {
        Self::List(Arc::new(iter.into_iter().collect()))
    }
}

/// Builds a [`Value::List`] from expressions convertible into values.
///
/// ```rust
/// use lensing::{Value, list};
///
/// let mixed = list![1, "a", 2.5];
/// assert_eq!(mixed.as_list().map(<[Value]>::len), Some(3));
/// ```
#[macro_export]
macro_rules! list {
    () => {
        $crate::Value::list(::std::vec::Vec::<$crate::Value>::new())
    };
    ($($element:expr),+ $(,)?) => {
        $crate::Value::list(::std::vec![$($crate::Value::from($element)),+])
    };
}

/// Builds a [`Value::Tuple`] from expressions convertible into values.
#[macro_export]
macro_rules! tuple {
    () => {
        $crate::Value::tuple(::std::vec::Vec::<$crate::Value>::new())
    };
    ($($element:expr),+ $(,)?) => {
        $crate::Value::tuple(::std::vec![$($crate::Value::from($element)),+])
    };
}

/// Builds a [`Value::Map`] from `key => value` pairs.
///
/// ```rust
/// use lensing::{Value, map};
///
/// let scores = map! { "alice" => 3, "bob" => 5 };
/// assert_eq!(scores.as_map().map(|entries| entries.len()), Some(2));
/// ```
#[macro_export]
macro_rules! map {
    () => {
        $crate::Value::map(::std::vec::Vec::<($crate::Value, $crate::Value)>::new())
    };
    ($($key:expr => $value:expr),+ $(,)?) => {
        $crate::Value::map(::std::vec![$(($crate::Value::from($key), $crate::Value::from($value))),+])
    };
}
