//! Strictly typed numeric vectors built from loosely typed host values.
//!
//! Element types are checked eagerly: a [`ValueVector`] either holds only
//! values of its element type or is never constructed. Integers promote to
//! reals; reals never demote to integers, not even integral ones like `4.0`.

use std::fmt;
use std::ops::Index;

use crate::error::ContainerError;

/// A dynamically typed value as handed over by a host environment.
#[derive(Debug, Clone, PartialEq)]
pub enum RawValue {
    Int(i64),
    Real(f64),
    Bool(bool),
    Text(String),
    None,
}

impl RawValue {
    /// Returns the name of the value's type, as used in error messages.
    #[must_use]
    pub fn type_name(&self) -> &'static str {
        match self {
            Self::Int(_) => "integer",
            Self::Real(_) => "real",
            Self::Bool(_) => "bool",
            Self::Text(_) => "text",
            Self::None => "none",
        }
    }
}

impl From<i64> for RawValue {
    fn from(value: i64) -> Self {
        Self::Int(value)
    }
}

impl From<f64> for RawValue {
    fn from(value: f64) -> Self {
        Self::Real(value)
    }
}

impl From<bool> for RawValue {
    fn from(value: bool) -> Self {
        Self::Bool(value)
    }
}

impl From<&str> for RawValue {
    fn from(value: &str) -> Self {
        Self::Text(value.to_owned())
    }
}

impl From<String> for RawValue {
    fn from(value: String) -> Self {
        Self::Text(value)
    }
}

impl<T: Into<RawValue>> From<Option<T>> for RawValue {
    fn from(value: Option<T>) -> Self {
        value.map_or(Self::None, Into::into)
    }
}

/// An element type a [`ValueVector`] can hold.
pub trait Element: Copy + fmt::Debug + PartialEq + Send + Sync + 'static {
    /// Name of the element type, as used in error messages.
    const NAME: &'static str;

    /// Converts a raw value, or returns `None` if its type is not accepted.
    fn from_raw(value: &RawValue) -> Option<Self>;
}

impl Element for i64 {
    const NAME: &'static str = "integer";

    fn from_raw(value: &RawValue) -> Option<Self> {
        match value {
            RawValue::Int(i) => Some(*i),
            _ => None,
        }
    }
}

impl Element for f64 {
    const NAME: &'static str = "real";

    #[allow(clippy::cast_precision_loss)]
    fn from_raw(value: &RawValue) -> Option<Self> {
        match value {
            RawValue::Int(i) => Some(*i as f64),
            RawValue::Real(r) => Some(*r),
            _ => None,
        }
    }
}

/// An ordered vector whose elements were all validated as `T`.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct ValueVector<T: Element> {
    values: Vec<T>,
}

/// A vector of integers.
pub type IntVector = ValueVector<i64>;

/// A vector of reals.
pub type DoubleVector = ValueVector<f64>;

impl<T: Element> ValueVector<T> {
    /// Creates an empty vector.
    #[must_use]
    pub fn new() -> Self {
        Self { values: Vec::new() }
    }

    /// Builds a vector from host values, checking every element.
    ///
    /// # Errors
    ///
    /// Returns [`ContainerError::TypeMismatch`] naming the first element
    /// whose type is not accepted.
    pub fn from_raw<'a, I>(raw: I) -> Result<Self, ContainerError>
    where
        I: IntoIterator<Item = &'a RawValue>,
    {
        let values = raw
            .into_iter()
            .enumerate()
            .map(|(index, value)| {
                T::from_raw(value).ok_or(ContainerError::TypeMismatch {
                    index,
                    expected: T::NAME,
                    found: value.type_name(),
                })
            })
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Self { values })
    }

    #[must_use]
    pub fn get(&self, index: usize) -> Option<T> {
        self.values.get(index).copied()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.values.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = T> + '_ {
        self.values.iter().copied()
    }

    #[must_use]
    pub fn as_slice(&self) -> &[T] {
        &self.values
    }
}

impl<T: Element> From<Vec<T>> for ValueVector<T> {
    fn from(values: Vec<T>) -> Self {
        Self { values }
    }
}

impl<T: Element> FromIterator<T> for ValueVector<T> {
    fn from_iter<I: IntoIterator<Item = T>>(iter: I) -> Self {
        Self {
            values: iter.into_iter().collect(),
        }
    }
}

impl<T: Element> IntoIterator for ValueVector<T> {
    type Item = T;
    type IntoIter = std::vec::IntoIter<T>;

    fn into_iter(self) -> Self::IntoIter {
        self.values.into_iter()
    }
}

impl<'a, T: Element> IntoIterator for &'a ValueVector<T> {
    type Item = &'a T;
    type IntoIter = std::slice::Iter<'a, T>;

    fn into_iter(self) -> Self::IntoIter {
        self.values.iter()
    }
}

impl<T: Element> Index<usize> for ValueVector<T> {
    type Output = T;

    fn index(&self, index: usize) -> &T {
        &self.values[index]
    }
}
