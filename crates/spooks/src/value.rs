//! Value - dynamic values passed to and returned from spies
//!
//! Provides [`Value`], the single type a spy accepts as an argument, records
//! as a receiver and hands back as a result.

use crate::function::Spy;
use crate::object::SpyObject;
use serde::ser::{SerializeMap, Serializer};
use serde::Serialize;

/// A value seen by a spy
///
/// Plain data is carried as JSON and compares structurally. Spy objects and
/// spies compare by identity, so a chained call can be checked to return the
/// very object it was invoked on.
#[derive(Debug, Clone, Default)]
pub enum Value {
    /// No value (the default result, and the receiver of a free call)
    #[default]
    Undefined,

    /// Plain data
    Data(serde_json::Value),

    /// NaN or an infinity, which JSON data cannot hold
    NonFinite(f64),

    /// Handle to a spy object
    Object(SpyObject),

    /// Handle to a spy function
    Function(Spy),
}

impl Value {
    /// Returns true for [`Value::Undefined`]
    #[inline]
    #[must_use]
    pub fn is_undefined(&self) -> bool {
        matches!(self, Self::Undefined)
    }

    /// Plain data, if any
    #[inline]
    #[must_use]
    pub fn as_data(&self) -> Option<&serde_json::Value> {
        match self {
            Self::Data(data) => Some(data),
            _ => None,
        }
    }

    /// String data, if any
    #[inline]
    #[must_use]
    pub fn as_str(&self) -> Option<&str> {
        self.as_data().and_then(serde_json::Value::as_str)
    }

    /// Integer data, if any
    #[inline]
    #[must_use]
    pub fn as_i64(&self) -> Option<i64> {
        self.as_data().and_then(serde_json::Value::as_i64)
    }

    /// Numeric value, finite or not
    #[inline]
    #[must_use]
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Self::Data(data) => data.as_f64(),
            Self::NonFinite(n) => Some(*n),
            _ => None,
        }
    }

    /// Spy object handle, if any
    #[inline]
    #[must_use]
    pub fn as_object(&self) -> Option<&SpyObject> {
        match self {
            Self::Object(object) => Some(object),
            _ => None,
        }
    }

    /// Spy handle, if any
    #[inline]
    #[must_use]
    pub fn as_spy(&self) -> Option<&Spy> {
        match self {
            Self::Function(spy) => Some(spy),
            _ => None,
        }
    }

    /// Returns true if this value can be invoked
    #[inline]
    #[must_use]
    pub fn is_callable(&self) -> bool {
        matches!(self, Self::Function(_))
    }
}

impl PartialEq for Value {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Self::Undefined, Self::Undefined) => true,
            (Self::Data(a), Self::Data(b)) => a == b,
            (Self::NonFinite(a), Self::NonFinite(b)) => a == b || (a.is_nan() && b.is_nan()),
            (Self::Object(a), Self::Object(b)) => a.ptr_eq(b),
            (Self::Function(a), Self::Function(b)) => a.ptr_eq(b),
            _ => false,
        }
    }
}

impl PartialEq<str> for Value {
    fn eq(&self, other: &str) -> bool {
        self.as_str() == Some(other)
    }
}

impl PartialEq<&str> for Value {
    fn eq(&self, other: &&str) -> bool {
        self.as_str() == Some(*other)
    }
}

impl Serialize for Value {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Self::Undefined => serializer.serialize_unit(),
            Self::Data(data) => data.serialize(serializer),
            Self::NonFinite(n) if n.is_nan() => serializer.serialize_str("NaN"),
            Self::NonFinite(n) if n.is_sign_positive() => serializer.serialize_str("Infinity"),
            Self::NonFinite(_) => serializer.serialize_str("-Infinity"),
            Self::Object(object) => {
                let mut map = serializer.serialize_map(Some(1))?;
                map.serialize_entry("$object", &object.member_names())?;
                map.end()
            }
            Self::Function(spy) => {
                let mut map = serializer.serialize_map(Some(1))?;
                map.serialize_entry("$spy", spy.name())?;
                map.end()
            }
        }
    }
}

impl From<serde_json::Value> for Value {
    fn from(data: serde_json::Value) -> Self {
        Self::Data(data)
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Self::Data(serde_json::Value::from(s))
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Self::Data(serde_json::Value::from(s))
    }
}

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Self::Data(serde_json::Value::from(b))
    }
}

impl From<f64> for Value {
    fn from(n: f64) -> Self {
        if n.is_finite() {
            Self::Data(serde_json::Value::from(n))
        } else {
            Self::NonFinite(n)
        }
    }
}

macro_rules! impl_from_integer {
    ($($ty:ty),*) => {
        $(
            impl From<$ty> for Value {
                fn from(n: $ty) -> Self {
                    Self::Data(serde_json::Value::from(n))
                }
            }
        )*
    };
}

impl_from_integer!(i32, i64, u32, u64, usize);

impl From<SpyObject> for Value {
    fn from(object: SpyObject) -> Self {
        Self::Object(object)
    }
}

impl From<Spy> for Value {
    fn from(spy: Spy) -> Self {
        Self::Function(spy)
    }
}

impl<T: Into<Value>> From<Option<T>> for Value {
    fn from(value: Option<T>) -> Self {
        value.map_or(Self::Undefined, Into::into)
    }
}

/// Build an argument list for a spy call
///
/// ```
/// use spooks::{args, Value};
///
/// let list = args!["a", 1, true];
/// assert_eq!(list.len(), 3);
/// assert_eq!(list[0], "a");
///
/// let none: Vec<Value> = args![];
/// assert!(none.is_empty());
/// ```
#[macro_export]
macro_rules! args {
    () => {
        ::std::vec::Vec::<$crate::Value>::new()
    };
    ($($arg:expr),+ $(,)?) => {
        ::std::vec![$($crate::Value::from($arg)),+]
    };
}
