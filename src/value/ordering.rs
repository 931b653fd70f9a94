//! Total ordering, equality and hashing for [`Value`].
//!
//! Values of different variants order by variant rank. Floats use
//! [`f64::total_cmp`], which makes `NaN` equal to itself and lets any value
//! serve as a map key or set member.

use std::cmp::Ordering;
use std::hash::{Hash, Hasher};
use std::sync::Arc;

use super::Value;

impl Value {
    const fn rank(&self) -> u8 {
        match self {
            Self::Null => 0,
            Self::Bool(_) => 1,
            Self::Int(_) => 2,
            Self::Float(_) => 3,
            Self::Str(_) => 4,
            Self::List(_) => 5,
            Self::Tuple(_) => 6,
            Self::Map(_) => 7,
            Self::Set(_) => 8,
            Self::Record(_) => 9,
            Self::Object(_) => 10,
        }
    }
}

impl Ord for Value {
    fn cmp(&self, other: &Self) -> Ordering {
        match (self, other) {
            (Self::Null, Self::Null) => Ordering::Equal,
            (Self::Bool(left), Self::Bool(right)) => left.cmp(right),
            (Self::Int(left), Self::Int(right)) => left.cmp(right),
            (Self::Float(left), Self::Float(right)) => left.total_cmp(right),
            (Self::Str(left), Self::Str(right)) => left.cmp(right),
            (Self::List(left), Self::List(right)) | (Self::Tuple(left), Self::Tuple(right)) => {
                if Arc::ptr_eq(left, right) {
                    Ordering::Equal
                } else {
                    left.cmp(right)
                }
            }
            (Self::Map(left), Self::Map(right)) => left.cmp(right),
            (Self::Set(left), Self::Set(right)) => left.cmp(right),
            (Self::Record(left), Self::Record(right)) => left.cmp(right),
            (Self::Object(left), Self::Object(right)) => left.cmp(right),
            _ => self.rank().cmp(&other.rank()),
        }
    }
}

impl PartialOrd for Value {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl PartialEq for Value {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for Value {}

impl Hash for Value {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.rank().hash(state);
        match self {
            Self::Null => {}
            Self::Bool(value) => value.hash(state),
            Self::Int(value) => value.hash(state),
            Self::Float(value) => value.to_bits().hash(state),
            Self::Str(value) => value.hash(state),
            Self::List(items) | Self::Tuple(items) => items.hash(state),
            Self::Map(entries) => entries.hash(state),
            Self::Set(members) => members.hash(state),
            Self::Record(record) => record.hash(state),
            Self::Object(object) => object.hash(state),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::list;
    use rstest::rstest;
    use std::collections::hash_map::DefaultHasher;

    fn hash_of(value: &Value) -> u64 {
        let mut hasher = DefaultHasher::new();
        value.hash(&mut hasher);
        hasher.finish()
    }

    #[rstest]
    fn test_nan_equals_itself() {
        let nan = Value::from(f64::NAN);
        assert_eq!(nan, nan.clone());
    }

    #[rstest]
    fn test_int_and_float_differ() {
        assert_ne!(Value::from(1), Value::from(1.0));
    }

    #[rstest]
    fn test_list_and_tuple_differ() {
        assert_ne!(list![1, 2], Value::tuple([1, 2]));
    }

    #[rstest]
    fn test_variant_rank_order() {
        assert!(Value::Null < Value::from(false));
        assert!(Value::from(100) < Value::from("a"));
    }

    #[rstest]
    fn test_equal_values_hash_equal() {
        let left = list![1, "a", list![2.5]];
        let right = list![1, "a", list![2.5]];
        assert_eq!(hash_of(&left), hash_of(&right));
    }
}
