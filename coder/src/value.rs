//! Dynamically-typed values used to assemble records field by field.
//!
//! A [Record] is built incrementally while it is decoded, so its fields cannot be described by a
//! single Rust type until decoding finishes. Each field is therefore stored as a [Value], and
//! [FieldValue] converts between a coder's own value type and [Value].

use crate::Error;
use bytes::Bytes;

/// A decoded (or to-be-encoded) field value.
#[derive(Clone, Debug, PartialEq)]
pub enum Value {
    Unit,
    Bytes(Bytes),
    U8(u8),
    U16(u16),
    U32(u32),
    U64(u64),
    I8(i8),
    I16(i16),
    I32(i32),
    I64(i64),
    F32(f32),
    F64(f64),
    Bool(bool),
    Str(String),
    List(Vec<Value>),
    Record(Record),
}

impl Value {
    /// Returns a short name for the kind of value held.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Unit => "unit",
            Self::Bytes(_) => "bytes",
            Self::U8(_) => "u8",
            Self::U16(_) => "u16",
            Self::U32(_) => "u32",
            Self::U64(_) => "u64",
            Self::I8(_) => "i8",
            Self::I16(_) => "i16",
            Self::I32(_) => "i32",
            Self::I64(_) => "i64",
            Self::F32(_) => "f32",
            Self::F64(_) => "f64",
            Self::Bool(_) => "bool",
            Self::Str(_) => "string",
            Self::List(_) => "list",
            Self::Record(_) => "record",
        }
    }
}

/// Types that can be stored in a [Record].
pub trait FieldValue: Sized {
    /// Name of the [Value] variant this type converts to.
    const KIND: &'static str;

    /// Wraps `self` in a [Value].
    fn into_value(self) -> Value;

    /// Extracts `Self` from `value`, or `None` if `value` holds a different kind.
    fn from_value(value: &Value) -> Option<Self>;

    /// The value to encode when a type carries no information, regardless of what (if anything)
    /// a record holds for it.
    fn implicit() -> Option<Self> {
        None
    }
}

macro_rules! impl_field_value {
    ($type:ty, $variant:ident, $kind:literal) => {
        impl FieldValue for $type {
            const KIND: &'static str = $kind;

            #[inline]
            fn into_value(self) -> Value {
                Value::$variant(self)
            }

            #[inline]
            fn from_value(value: &Value) -> Option<Self> {
                match value {
                    Value::$variant(inner) => Some(Clone::clone(inner)),
                    _ => None,
                }
            }
        }
    };
}

impl_field_value!(Bytes, Bytes, "bytes");
impl_field_value!(u8, U8, "u8");
impl_field_value!(u16, U16, "u16");
impl_field_value!(u32, U32, "u32");
impl_field_value!(u64, U64, "u64");
impl_field_value!(i8, I8, "i8");
impl_field_value!(i16, I16, "i16");
impl_field_value!(i32, I32, "i32");
impl_field_value!(i64, I64, "i64");
impl_field_value!(f32, F32, "f32");
impl_field_value!(f64, F64, "f64");
impl_field_value!(bool, Bool, "bool");
impl_field_value!(String, Str, "string");
impl_field_value!(Record, Record, "record");

impl FieldValue for () {
    const KIND: &'static str = "unit";

    fn into_value(self) -> Value {
        Value::Unit
    }

    fn from_value(value: &Value) -> Option<Self> {
        match value {
            Value::Unit => Some(()),
            _ => None,
        }
    }

    fn implicit() -> Option<Self> {
        Some(())
    }
}

impl<T: FieldValue> FieldValue for Vec<T> {
    const KIND: &'static str = "list";

    fn into_value(self) -> Value {
        Value::List(self.into_iter().map(FieldValue::into_value).collect())
    }

    fn from_value(value: &Value) -> Option<Self> {
        match value {
            Value::List(items) => items.iter().map(T::from_value).collect(),
            _ => None,
        }
    }
}

impl FieldValue for Value {
    const KIND: &'static str = "value";

    fn into_value(self) -> Value {
        self
    }

    fn from_value(value: &Value) -> Option<Self> {
        Some(value.clone())
    }
}

/// An ordered set of named field values.
///
/// Fields keep the order in which they were first inserted (for a decoded record, the order in
/// which they appear on the wire). Equality ignores order.
#[derive(Clone, Debug, Default)]
pub struct Record {
    fields: Vec<(String, Value)>,
}

impl Record {
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets `name` to `value`, returning the previous value (which is replaced in place).
    pub fn insert(&mut self, name: impl Into<String>, value: impl FieldValue) -> Option<Value> {
        let name = name.into();
        let value = value.into_value();
        match self.fields.iter_mut().find(|(existing, _)| *existing == name) {
            Some((_, slot)) => Some(std::mem::replace(slot, value)),
            None => {
                self.fields.push((name, value));
                None
            }
        }
    }

    /// Builder-style [Record::insert].
    pub fn with(mut self, name: impl Into<String>, value: impl FieldValue) -> Self {
        self.insert(name, value);
        self
    }

    /// Returns the raw value of `name`.
    pub fn value(&self, name: &str) -> Option<&Value> {
        self.fields
            .iter()
            .find(|(existing, _)| existing == name)
            .map(|(_, value)| value)
    }

    /// Returns the value of `name` if it is present and holds a `T`.
    pub fn get<T: FieldValue>(&self, name: &str) -> Option<T> {
        self.value(name).and_then(T::from_value)
    }

    /// Returns the value of `name`, failing if it is absent or holds something other than a `T`.
    pub fn field<T: FieldValue>(&self, name: &str) -> Result<T, Error> {
        let value = self
            .value(name)
            .ok_or_else(|| Error::MissingField(name.to_string()))?;
        T::from_value(value).ok_or(Error::TypeMismatch {
            expected: T::KIND,
            found: value.kind(),
        })
    }

    pub fn remove(&mut self, name: &str) -> Option<Value> {
        let index = self.fields.iter().position(|(existing, _)| existing == name)?;
        Some(self.fields.remove(index).1)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.value(name).is_some()
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// Iterates over fields in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &Value)> {
        self.fields
            .iter()
            .map(|(name, value)| (name.as_str(), value))
    }
}

impl PartialEq for Record {
    fn eq(&self, other: &Self) -> bool {
        self.len() == other.len()
            && self
                .iter()
                .all(|(name, value)| other.value(name) == Some(value))
    }
}
