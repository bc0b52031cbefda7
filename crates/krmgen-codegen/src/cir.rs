//! Canonical intermediate representation of typed values
//!
//! Every `k8s-openapi` type already knows how to walk itself through its
//! `Serialize` impl. [`CirSerializer`] records that walk as a [`Cir`] tree,
//! keeping the struct and newtype names the impls report, so the emitter can
//! reconstruct struct literals without any per-type code.

use serde::ser::{self, Serialize};
use serde_json::Value as JsonValue;
use thiserror::Error;

/// Canonical intermediate representation
#[derive(Debug, Clone, PartialEq)]
pub enum Cir {
    Null,
    Bool(bool),
    Int(i64),
    UInt(u64),
    Float(f64),
    String(String),
    Bytes(Vec<u8>),
    Seq(Vec<Cir>),
    /// String-keyed map in serialization order
    Map(Vec<(String, Cir)>),
    /// Struct with its fields in declared order
    Record {
        type_name: &'static str,
        fields: Vec<(&'static str, Cir)>,
    },
    /// Named wrapper around a single value
    Newtype {
        type_name: &'static str,
        value: Box<Cir>,
    },
}

impl Cir {
    /// Re-encode into the wire form the host type serializes to
    ///
    /// Non-finite floats have no JSON form and become null.
    pub fn to_json(&self) -> JsonValue {
        match self {
            Cir::Null => JsonValue::Null,
            Cir::Bool(b) => JsonValue::Bool(*b),
            Cir::Int(i) => JsonValue::from(*i),
            Cir::UInt(u) => JsonValue::from(*u),
            Cir::Float(f) => serde_json::Number::from_f64(*f)
                .map(JsonValue::Number)
                .unwrap_or(JsonValue::Null),
            Cir::String(s) => JsonValue::String(s.clone()),
            Cir::Bytes(bytes) => JsonValue::Array(bytes.iter().map(|b| JsonValue::from(*b)).collect()),
            Cir::Seq(items) => JsonValue::Array(items.iter().map(Cir::to_json).collect()),
            Cir::Map(entries) => JsonValue::Object(
                entries
                    .iter()
                    .map(|(k, v)| (k.clone(), v.to_json()))
                    .collect(),
            ),
            Cir::Record { fields, .. } => JsonValue::Object(
                fields
                    .iter()
                    .map(|(k, v)| (k.to_string(), v.to_json()))
                    .collect(),
            ),
            Cir::Newtype { value, .. } => value.to_json(),
        }
    }

    /// Null, empty string, empty sequence or empty map
    pub fn is_zero(&self) -> bool {
        match self {
            Cir::Null => true,
            Cir::String(s) => s.is_empty(),
            Cir::Bytes(b) => b.is_empty(),
            Cir::Seq(items) => items.is_empty(),
            Cir::Map(entries) => entries.is_empty(),
            _ => false,
        }
    }
}

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum CirError {
    #[error("{0}")]
    Custom(String),

    #[error("map key must be a string or scalar, found {0}")]
    KeyNotScalar(&'static str),

    #[error("map value serialized without a key")]
    MissingKey,
}

impl ser::Error for CirError {
    fn custom<T: std::fmt::Display>(msg: T) -> Self {
        CirError::Custom(msg.to_string())
    }
}

/// Serialize any value into its [`Cir`]
pub fn to_cir<T: Serialize + ?Sized>(value: &T) -> Result<Cir, CirError> {
    value.serialize(CirSerializer)
}

/// Serializer producing [`Cir`]
#[derive(Debug, Clone, Copy, Default)]
pub struct CirSerializer;

impl ser::Serializer for CirSerializer {
    type Ok = Cir;
    type Error = CirError;

    type SerializeSeq = SeqBuilder;
    type SerializeTuple = SeqBuilder;
    type SerializeTupleStruct = SeqBuilder;
    type SerializeTupleVariant = VariantBuilder<SeqBuilder>;
    type SerializeMap = MapBuilder;
    type SerializeStruct = RecordBuilder;
    type SerializeStructVariant = VariantBuilder<RecordBuilder>;

    fn serialize_bool(self, v: bool) -> Result<Cir, CirError> {
        Ok(Cir::Bool(v))
    }

    fn serialize_i8(self, v: i8) -> Result<Cir, CirError> {
        Ok(Cir::Int(v.into()))
    }

    fn serialize_i16(self, v: i16) -> Result<Cir, CirError> {
        Ok(Cir::Int(v.into()))
    }

    fn serialize_i32(self, v: i32) -> Result<Cir, CirError> {
        Ok(Cir::Int(v.into()))
    }

    fn serialize_i64(self, v: i64) -> Result<Cir, CirError> {
        Ok(Cir::Int(v))
    }

    fn serialize_u8(self, v: u8) -> Result<Cir, CirError> {
        Ok(Cir::Int(v.into()))
    }

    fn serialize_u16(self, v: u16) -> Result<Cir, CirError> {
        Ok(Cir::Int(v.into()))
    }

    fn serialize_u32(self, v: u32) -> Result<Cir, CirError> {
        Ok(Cir::Int(v.into()))
    }

    fn serialize_u64(self, v: u64) -> Result<Cir, CirError> {
        Ok(i64::try_from(v).map_or(Cir::UInt(v), Cir::Int))
    }

    fn serialize_f32(self, v: f32) -> Result<Cir, CirError> {
        Ok(Cir::Float(v.into()))
    }

    fn serialize_f64(self, v: f64) -> Result<Cir, CirError> {
        Ok(Cir::Float(v))
    }

    fn serialize_char(self, v: char) -> Result<Cir, CirError> {
        Ok(Cir::String(v.to_string()))
    }

    fn serialize_str(self, v: &str) -> Result<Cir, CirError> {
        Ok(Cir::String(v.to_string()))
    }

    fn serialize_bytes(self, v: &[u8]) -> Result<Cir, CirError> {
        Ok(Cir::Bytes(v.to_vec()))
    }

    fn serialize_none(self) -> Result<Cir, CirError> {
        Ok(Cir::Null)
    }

    fn serialize_some<T: Serialize + ?Sized>(self, value: &T) -> Result<Cir, CirError> {
        value.serialize(self)
    }

    fn serialize_unit(self) -> Result<Cir, CirError> {
        Ok(Cir::Null)
    }

    fn serialize_unit_struct(self, _name: &'static str) -> Result<Cir, CirError> {
        Ok(Cir::Null)
    }

    fn serialize_unit_variant(
        self,
        _name: &'static str,
        _index: u32,
        variant: &'static str,
    ) -> Result<Cir, CirError> {
        Ok(Cir::String(variant.to_string()))
    }

    fn serialize_newtype_struct<T: Serialize + ?Sized>(
        self,
        name: &'static str,
        value: &T,
    ) -> Result<Cir, CirError> {
        Ok(Cir::Newtype {
            type_name: name,
            value: Box::new(value.serialize(self)?),
        })
    }

    fn serialize_newtype_variant<T: Serialize + ?Sized>(
        self,
        _name: &'static str,
        _index: u32,
        variant: &'static str,
        value: &T,
    ) -> Result<Cir, CirError> {
        Ok(Cir::Map(vec![(variant.to_string(), value.serialize(self)?)]))
    }

    fn serialize_seq(self, len: Option<usize>) -> Result<SeqBuilder, CirError> {
        Ok(SeqBuilder {
            items: Vec::with_capacity(len.unwrap_or(0)),
        })
    }

    fn serialize_tuple(self, len: usize) -> Result<SeqBuilder, CirError> {
        self.serialize_seq(Some(len))
    }

    fn serialize_tuple_struct(self, _name: &'static str, len: usize) -> Result<SeqBuilder, CirError> {
        self.serialize_seq(Some(len))
    }

    fn serialize_tuple_variant(
        self,
        _name: &'static str,
        _index: u32,
        variant: &'static str,
        len: usize,
    ) -> Result<VariantBuilder<SeqBuilder>, CirError> {
        Ok(VariantBuilder {
            variant,
            inner: self.serialize_seq(Some(len))?,
        })
    }

    fn serialize_map(self, len: Option<usize>) -> Result<MapBuilder, CirError> {
        Ok(MapBuilder {
            entries: Vec::with_capacity(len.unwrap_or(0)),
            key: None,
        })
    }

    fn serialize_struct(self, name: &'static str, len: usize) -> Result<RecordBuilder, CirError> {
        Ok(RecordBuilder {
            type_name: name,
            fields: Vec::with_capacity(len),
        })
    }

    fn serialize_struct_variant(
        self,
        name: &'static str,
        _index: u32,
        variant: &'static str,
        len: usize,
    ) -> Result<VariantBuilder<RecordBuilder>, CirError> {
        Ok(VariantBuilder {
            variant,
            inner: self.serialize_struct(name, len)?,
        })
    }
}

pub struct SeqBuilder {
    items: Vec<Cir>,
}

impl ser::SerializeSeq for SeqBuilder {
    type Ok = Cir;
    type Error = CirError;

    fn serialize_element<T: Serialize + ?Sized>(&mut self, value: &T) -> Result<(), CirError> {
        self.items.push(to_cir(value)?);
        Ok(())
    }

    fn end(self) -> Result<Cir, CirError> {
        Ok(Cir::Seq(self.items))
    }
}

impl ser::SerializeTuple for SeqBuilder {
    type Ok = Cir;
    type Error = CirError;

    fn serialize_element<T: Serialize + ?Sized>(&mut self, value: &T) -> Result<(), CirError> {
        ser::SerializeSeq::serialize_element(self, value)
    }

    fn end(self) -> Result<Cir, CirError> {
        ser::SerializeSeq::end(self)
    }
}

impl ser::SerializeTupleStruct for SeqBuilder {
    type Ok = Cir;
    type Error = CirError;

    fn serialize_field<T: Serialize + ?Sized>(&mut self, value: &T) -> Result<(), CirError> {
        ser::SerializeSeq::serialize_element(self, value)
    }

    fn end(self) -> Result<Cir, CirError> {
        ser::SerializeSeq::end(self)
    }
}

pub struct MapBuilder {
    entries: Vec<(String, Cir)>,
    key: Option<String>,
}

impl ser::SerializeMap for MapBuilder {
    type Ok = Cir;
    type Error = CirError;

    fn serialize_key<T: Serialize + ?Sized>(&mut self, key: &T) -> Result<(), CirError> {
        self.key = Some(map_key(to_cir(key)?)?);
        Ok(())
    }

    fn serialize_value<T: Serialize + ?Sized>(&mut self, value: &T) -> Result<(), CirError> {
        let key = self.key.take().ok_or(CirError::MissingKey)?;
        self.entries.push((key, to_cir(value)?));
        Ok(())
    }

    fn end(self) -> Result<Cir, CirError> {
        Ok(Cir::Map(self.entries))
    }
}

/// Map keys end up as strings on the wire, as serde_json does it
fn map_key(key: Cir) -> Result<String, CirError> {
    match key {
        Cir::String(s) => Ok(s),
        Cir::Bool(b) => Ok(b.to_string()),
        Cir::Int(i) => Ok(i.to_string()),
        Cir::UInt(u) => Ok(u.to_string()),
        Cir::Newtype { value, .. } => map_key(*value),
        Cir::Null => Err(CirError::KeyNotScalar("null")),
        Cir::Float(_) => Err(CirError::KeyNotScalar("float")),
        Cir::Bytes(_) => Err(CirError::KeyNotScalar("bytes")),
        Cir::Seq(_) => Err(CirError::KeyNotScalar("sequence")),
        Cir::Map(_) => Err(CirError::KeyNotScalar("map")),
        Cir::Record { .. } => Err(CirError::KeyNotScalar("struct")),
    }
}

pub struct RecordBuilder {
    type_name: &'static str,
    fields: Vec<(&'static str, Cir)>,
}

impl ser::SerializeStruct for RecordBuilder {
    type Ok = Cir;
    type Error = CirError;

    fn serialize_field<T: Serialize + ?Sized>(
        &mut self,
        key: &'static str,
        value: &T,
    ) -> Result<(), CirError> {
        self.fields.push((key, to_cir(value)?));
        Ok(())
    }

    fn skip_field(&mut self, _key: &'static str) -> Result<(), CirError> {
        Ok(())
    }

    fn end(self) -> Result<Cir, CirError> {
        Ok(Cir::Record {
            type_name: self.type_name,
            fields: self.fields,
        })
    }
}

/// Enum variants are externally tagged, as serde_json does it
pub struct VariantBuilder<B> {
    variant: &'static str,
    inner: B,
}

impl ser::SerializeTupleVariant for VariantBuilder<SeqBuilder> {
    type Ok = Cir;
    type Error = CirError;

    fn serialize_field<T: Serialize + ?Sized>(&mut self, value: &T) -> Result<(), CirError> {
        ser::SerializeSeq::serialize_element(&mut self.inner, value)
    }

    fn end(self) -> Result<Cir, CirError> {
        let inner = ser::SerializeSeq::end(self.inner)?;
        Ok(Cir::Map(vec![(self.variant.to_string(), inner)]))
    }
}

impl ser::SerializeStructVariant for VariantBuilder<RecordBuilder> {
    type Ok = Cir;
    type Error = CirError;

    fn serialize_field<T: Serialize + ?Sized>(
        &mut self,
        key: &'static str,
        value: &T,
    ) -> Result<(), CirError> {
        ser::SerializeStruct::serialize_field(&mut self.inner, key, value)
    }

    fn end(self) -> Result<Cir, CirError> {
        let inner = ser::SerializeStruct::end(self.inner)?;
        Ok(Cir::Map(vec![(self.variant.to_string(), inner)]))
    }
}
