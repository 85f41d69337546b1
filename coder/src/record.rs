//! Assemble coders for whole records from an ordered list of fields.
//!
//! # Overview
//!
//! A [Format] lists the fields of a record in wire order. Each field either names a fixed coder,
//! computes its coder from the fields that precede it (a generator), or runs a side effect on the
//! record under construction. [RecordCoder] turns a [Format] into a [Coder] whose value is a
//! [Record]; [TypedCoder] additionally converts that record to and from a Rust type.
//!
//! # Conditional layouts
//!
//! A generator is called with the record decoded so far, so the layout of a field may depend on
//! the values of earlier fields (for example, choosing a string encoding from a version number).
//! When encoding, generators are called with the complete input record (plus whatever the effects
//! registered before them derive from it). To keep both directions in agreement, generators must
//! only depend on fields registered before them.
//!
//! # Example
//!
//! ```
//! use commonware_coder::{
//!     shared, Coder, Endian, Format, NulStr, Pad, Record, RecordCoder, U16LenStr, U16, U32,
//! };
//!
//! let coder = RecordCoder::new(Format::register(|r| {
//!     r.field("version", U16::new(Endian::Big));
//!     r.field("id", U32::new(Endian::Big));
//!     r.unnamed(Pad::new(2));
//!     r.generated("name", |partial: &Record| match partial.get::<u16>("version")? {
//!         0..=3 => Some(shared(U16LenStr::new(Endian::Big))),
//!         _ => Some(shared(NulStr)),
//!     });
//! }));
//!
//! let record = Record::new()
//!     .with("version", 4u16)
//!     .with("id", 7u32)
//!     .with("name", "hello".to_string());
//! let encoded = coder.encode(&record).unwrap();
//! assert_eq!(encoded.len(), 2 + 4 + 2 + 5 + 1);
//! assert_eq!(coder.decode(&encoded).unwrap(), record);
//! ```

use crate::{
    util::merge,
    value::{FieldValue, Record, Value},
    Coder, Cursor, Error,
};
use bytes::Bytes;
use std::{borrow::Cow, fmt, marker::PhantomData, sync::Arc};
use tracing::{debug, trace};

/// Object-safe view of a [Coder] whose values are stored in a [Record].
///
/// Implemented for every [Coder] whose value implements [FieldValue].
pub trait DynCoder: Send + Sync {
    /// Reads a value and wraps it in a [Value].
    fn read_value(&self, buf: &[u8], cursor: &mut Cursor) -> Result<Value, Error>;

    /// Encodes a [Value], failing if it does not hold the coder's value type.
    fn encode_value(&self, value: &Value) -> Result<Bytes, Error>;

    /// Encodes without any input, for coders whose values carry no information (e.g. padding).
    ///
    /// Returns `None` if the coder needs a value.
    fn encode_implicit(&self) -> Option<Result<Bytes, Error>>;
}

impl<C> DynCoder for C
where
    C: Coder + Send + Sync,
    C::Value: FieldValue,
{
    fn read_value(&self, buf: &[u8], cursor: &mut Cursor) -> Result<Value, Error> {
        self.read(buf, cursor).map(FieldValue::into_value)
    }

    fn encode_value(&self, value: &Value) -> Result<Bytes, Error> {
        let value = C::Value::from_value(value).ok_or(Error::TypeMismatch {
            expected: C::Value::KIND,
            found: value.kind(),
        })?;
        self.encode(&value)
    }

    fn encode_implicit(&self) -> Option<Result<Bytes, Error>> {
        C::Value::implicit().map(|value| self.encode(&value))
    }
}

/// A reference-counted, type-erased coder.
pub type SharedCoder = Arc<dyn DynCoder>;

/// Erases the value type of `coder` so it can be used as a record field.
pub fn shared<C>(coder: C) -> SharedCoder
where
    C: Coder + Send + Sync + 'static,
    C::Value: FieldValue,
{
    Arc::new(coder)
}

type Generator = dyn Fn(&Record) -> Option<SharedCoder> + Send + Sync;
type Effect = dyn Fn(&mut Record) + Send + Sync;

#[derive(Clone)]
enum Slot {
    Fixed(SharedCoder),
    Generated(Arc<Generator>),
    Effect(Arc<Effect>),
}

/// A single entry of a [Format].
#[derive(Clone)]
pub struct Field {
    name: Option<String>,
    slot: Slot,
}

impl Field {
    /// A field that always uses `coder`.
    pub fn fixed<C>(coder: C) -> Self
    where
        C: Coder + Send + Sync + 'static,
        C::Value: FieldValue,
    {
        Self {
            name: None,
            slot: Slot::Fixed(shared(coder)),
        }
    }

    /// A field whose coder is computed from the record decoded so far.
    ///
    /// Returning `None` skips the field: no bytes are consumed or produced and nothing is
    /// assigned.
    pub fn generated<F>(generate: F) -> Self
    where
        F: Fn(&Record) -> Option<SharedCoder> + Send + Sync + 'static,
    {
        Self {
            name: None,
            slot: Slot::Generated(Arc::new(generate)),
        }
    }

    /// A side effect applied to the record under construction while decoding.
    ///
    /// Effects contribute no bytes. When encoding, they are applied (in order) to a copy of the
    /// input record, so later generators see the same derived fields in both directions.
    pub fn effect<F>(effect: F) -> Self
    where
        F: Fn(&mut Record) + Send + Sync + 'static,
    {
        Self {
            name: None,
            slot: Slot::Effect(Arc::new(effect)),
        }
    }

    /// Stores the field's value under `name`.
    ///
    /// Unnamed fields still occupy bytes on the wire but do not appear in the record.
    pub fn named(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }
}

impl fmt::Debug for Field {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let kind = match self.slot {
            Slot::Fixed(_) => "fixed",
            Slot::Generated(_) => "generated",
            Slot::Effect(_) => "effect",
        };
        f.debug_struct("Field")
            .field("name", &self.name)
            .field("kind", &kind)
            .finish()
    }
}

/// The ordered list of fields describing a record's binary layout.
#[derive(Clone, Debug, Default)]
pub struct Format {
    fields: Vec<Field>,
}

impl Format {
    /// Creates a format from fields listed in wire order.
    pub fn from_fields(fields: Vec<Field>) -> Self {
        Self { fields }
    }

    /// Creates a format by calling `layout` with a [Registrar] that records each field in the
    /// order it is registered.
    pub fn register(layout: impl FnOnce(&mut Registrar)) -> Self {
        let mut registrar = Registrar::default();
        layout(&mut registrar);
        Self {
            fields: registrar.fields,
        }
    }

    pub fn fields(&self) -> &[Field] {
        &self.fields
    }
}

impl From<Vec<Field>> for Format {
    fn from(fields: Vec<Field>) -> Self {
        Self::from_fields(fields)
    }
}

/// Collects fields for [Format::register].
#[derive(Default)]
pub struct Registrar {
    fields: Vec<Field>,
}

impl Registrar {
    pub fn register(&mut self, field: Field) -> &mut Self {
        self.fields.push(field);
        self
    }

    /// Registers a named field with a fixed coder.
    pub fn field<C>(&mut self, name: impl Into<String>, coder: C) -> &mut Self
    where
        C: Coder + Send + Sync + 'static,
        C::Value: FieldValue,
    {
        self.register(Field::fixed(coder).named(name))
    }

    /// Registers an unnamed field (e.g. padding).
    pub fn unnamed<C>(&mut self, coder: C) -> &mut Self
    where
        C: Coder + Send + Sync + 'static,
        C::Value: FieldValue,
    {
        self.register(Field::fixed(coder))
    }

    /// Registers a named field whose coder depends on earlier fields.
    pub fn generated<F>(&mut self, name: impl Into<String>, generate: F) -> &mut Self
    where
        F: Fn(&Record) -> Option<SharedCoder> + Send + Sync + 'static,
    {
        self.register(Field::generated(generate).named(name))
    }

    /// Registers a side effect on the record under construction.
    pub fn effect<F>(&mut self, effect: F) -> &mut Self
    where
        F: Fn(&mut Record) + Send + Sync + 'static,
    {
        self.register(Field::effect(effect))
    }
}

/// A [Coder] for records described by a [Format].
#[derive(Clone, Debug)]
pub struct RecordCoder {
    format: Format,
}

impl RecordCoder {
    pub fn new(format: impl Into<Format>) -> Self {
        Self {
            format: format.into(),
        }
    }

    pub fn format(&self) -> &Format {
        &self.format
    }

    /// Converts into a coder that produces and consumes `T` instead of [Record].
    pub fn typed<T: Structured>(self) -> TypedCoder<T> {
        TypedCoder {
            inner: self,
            _phantom: PhantomData,
        }
    }
}

impl Coder for RecordCoder {
    type Value = Record;

    fn read(&self, buf: &[u8], cursor: &mut Cursor) -> Result<Record, Error> {
        let mut record = Record::new();
        for field in &self.format.fields {
            let generated;
            let coder: &dyn DynCoder = match &field.slot {
                Slot::Fixed(coder) => coder.as_ref(),
                Slot::Generated(generate) => match generate(&record) {
                    Some(coder) => {
                        generated = coder;
                        generated.as_ref()
                    }
                    None => {
                        trace!(name = ?field.name, "skipped field");
                        continue;
                    }
                },
                Slot::Effect(effect) => {
                    effect(&mut record);
                    trace!(fields = record.len(), "applied effect");
                    continue;
                }
            };

            let index = cursor.index();
            let value = coder.read_value(buf, cursor).map_err(|err| {
                debug!(name = ?field.name, index, ?err, "failed to decode field");
                err
            })?;
            if let Some(name) = &field.name {
                record.insert(name.as_str(), value);
            }
        }
        Ok(record)
    }

    fn encode(&self, record: &Record) -> Result<Bytes, Error> {
        // Only copied if an effect modifies it
        let mut record = Cow::Borrowed(record);
        let mut chunks = Vec::with_capacity(self.format.fields.len());
        for field in &self.format.fields {
            let generated;
            let coder: &dyn DynCoder = match &field.slot {
                Slot::Fixed(coder) => coder.as_ref(),
                Slot::Generated(generate) => match generate(record.as_ref()) {
                    Some(coder) => {
                        generated = coder;
                        generated.as_ref()
                    }
                    None => {
                        trace!(name = ?field.name, "skipped field");
                        continue;
                    }
                },
                Slot::Effect(effect) => {
                    effect(record.to_mut());
                    trace!(fields = record.len(), "applied effect");
                    continue;
                }
            };

            let chunk = match (coder.encode_implicit(), &field.name) {
                (Some(chunk), _) => chunk?,
                (None, Some(name)) => {
                    let value = record
                        .value(name)
                        .ok_or_else(|| Error::MissingField(name.clone()))?;
                    coder.encode_value(value)?
                }
                (None, None) => coder.encode_value(&Value::Unit)?,
            };
            chunks.push(chunk);
        }
        Ok(merge(chunks))
    }
}

/// Rust types that are assembled from (and flattened into) a [Record].
pub trait Structured: Sized {
    /// Constructs `Self` from a fully decoded record.
    fn from_record(record: Record) -> Result<Self, Error>;

    /// Flattens `self` into a record whose fields match the format's field names.
    fn to_record(&self) -> Record;
}

/// A [RecordCoder] that converts decoded records into `T`.
///
/// Field assembly is delegated entirely to the inner [RecordCoder]; only the final conversion
/// step differs.
pub struct TypedCoder<T> {
    inner: RecordCoder,
    _phantom: PhantomData<fn() -> T>,
}

impl<T> Clone for TypedCoder<T> {
    fn clone(&self) -> Self {
        Self {
            inner: self.inner.clone(),
            _phantom: PhantomData,
        }
    }
}

impl<T: Structured> Coder for TypedCoder<T> {
    type Value = T;

    fn read(&self, buf: &[u8], cursor: &mut Cursor) -> Result<T, Error> {
        T::from_record(self.inner.read(buf, cursor)?)
    }

    fn encode(&self, value: &T) -> Result<Bytes, Error> {
        self.inner.encode(&value.to_record())
    }
}
