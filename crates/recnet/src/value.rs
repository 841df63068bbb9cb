// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Runtime values and records.
//!
//! A [`Record`] is a schema plus one [`Value`] per field, in declaration
//! order. Nullable field classifications hold an `Option`, so the `-1` and
//! presence-flag sentinels never leave the codec layer.

use crate::error::{Error, Result};
use crate::schema::{FieldType, ScalarKind, Schema};
use std::sync::Arc;
use uuid::Uuid;

/// Array of fixed-width scalars.
#[derive(Debug, Clone, PartialEq)]
pub enum ScalarArray {
    Bool(Vec<bool>),
    I8(Vec<i8>),
    I16(Vec<i16>),
    I32(Vec<i32>),
    I64(Vec<i64>),
    F32(Vec<f32>),
    F64(Vec<f64>),
}

impl ScalarArray {
    /// Empty array of the given element kind.
    pub fn empty(kind: ScalarKind) -> Self {
        match kind {
            ScalarKind::Bool => Self::Bool(Vec::new()),
            ScalarKind::I8 => Self::I8(Vec::new()),
            ScalarKind::I16 => Self::I16(Vec::new()),
            ScalarKind::I32 => Self::I32(Vec::new()),
            ScalarKind::I64 => Self::I64(Vec::new()),
            ScalarKind::F32 => Self::F32(Vec::new()),
            ScalarKind::F64 => Self::F64(Vec::new()),
        }
    }

    pub fn kind(&self) -> ScalarKind {
        match self {
            Self::Bool(_) => ScalarKind::Bool,
            Self::I8(_) => ScalarKind::I8,
            Self::I16(_) => ScalarKind::I16,
            Self::I32(_) => ScalarKind::I32,
            Self::I64(_) => ScalarKind::I64,
            Self::F32(_) => ScalarKind::F32,
            Self::F64(_) => ScalarKind::F64,
        }
    }

    pub fn len(&self) -> usize {
        match self {
            Self::Bool(v) => v.len(),
            Self::I8(v) => v.len(),
            Self::I16(v) => v.len(),
            Self::I32(v) => v.len(),
            Self::I64(v) => v.len(),
            Self::F32(v) => v.len(),
            Self::F64(v) => v.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

macro_rules! impl_array_from {
    ($($ty:ty => $variant:ident),* $(,)?) => {
        $(
            impl From<Vec<$ty>> for ScalarArray {
                fn from(v: Vec<$ty>) -> Self {
                    Self::$variant(v)
                }
            }
        )*
    };
}

impl_array_from!(
    bool => Bool,
    i8 => I8,
    i16 => I16,
    i32 => I32,
    i64 => I64,
    f32 => F32,
    f64 => F64,
);

/// A field value.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    Bool(bool),
    I8(i8),
    I16(i16),
    I32(i32),
    I64(i64),
    F32(f32),
    F64(f64),
    String(Option<String>),
    Uuid(Option<Uuid>),
    /// Ordinal into the field's enumeration.
    Enum(Option<u32>),
    Bytes(Option<Vec<u8>>),
    Array(Option<ScalarArray>),
    Message(Option<Box<Record>>),
    /// Elements carry their own presence flag on the wire, hence `Option<Record>`.
    Messages(Option<Vec<Option<Record>>>),
}

impl Value {
    /// Default value for a field: zero for scalars, null otherwise.
    pub fn default_for(field_type: &FieldType) -> Self {
        match field_type {
            FieldType::Scalar(kind) => match kind {
                ScalarKind::Bool => Self::Bool(false),
                ScalarKind::I8 => Self::I8(0),
                ScalarKind::I16 => Self::I16(0),
                ScalarKind::I32 => Self::I32(0),
                ScalarKind::I64 => Self::I64(0),
                ScalarKind::F32 => Self::F32(0.0),
                ScalarKind::F64 => Self::F64(0.0),
            },
            FieldType::String => Self::String(None),
            FieldType::Uuid => Self::Uuid(None),
            FieldType::Enum(_) => Self::Enum(None),
            FieldType::Bytes => Self::Bytes(None),
            FieldType::Array(_) => Self::Array(None),
            FieldType::Message(_) => Self::Message(None),
            FieldType::Messages(_) => Self::Messages(None),
        }
    }

    /// Scalar kind of a scalar value.
    pub fn scalar_kind(&self) -> Option<ScalarKind> {
        match self {
            Self::Bool(_) => Some(ScalarKind::Bool),
            Self::I8(_) => Some(ScalarKind::I8),
            Self::I16(_) => Some(ScalarKind::I16),
            Self::I32(_) => Some(ScalarKind::I32),
            Self::I64(_) => Some(ScalarKind::I64),
            Self::F32(_) => Some(ScalarKind::F32),
            Self::F64(_) => Some(ScalarKind::F64),
            _ => None,
        }
    }

    /// Short description of the value's shape, for error messages.
    pub fn describe(&self) -> String {
        match self {
            Self::Bool(_)
            | Self::I8(_)
            | Self::I16(_)
            | Self::I32(_)
            | Self::I64(_)
            | Self::F32(_)
            | Self::F64(_) => self
                .scalar_kind()
                .map_or_else(String::new, |kind| kind.name().to_string()),
            Self::String(_) => "string".to_string(),
            Self::Uuid(_) => "uuid".to_string(),
            Self::Enum(_) => "enum".to_string(),
            Self::Bytes(_) => "bytes".to_string(),
            Self::Array(Some(a)) => format!("[{}]", a.kind().name()),
            Self::Array(None) => "array".to_string(),
            Self::Message(Some(r)) => format!("message {}", r.type_name()),
            Self::Message(None) => "message".to_string(),
            Self::Messages(_) => "[message]".to_string(),
        }
    }

    /// Whether the value is a null of a nullable classification.
    pub fn is_null(&self) -> bool {
        matches!(
            self,
            Self::String(None)
                | Self::Uuid(None)
                | Self::Enum(None)
                | Self::Bytes(None)
                | Self::Array(None)
                | Self::Message(None)
                | Self::Messages(None)
        )
    }

    /// Shallow compatibility check against a field type. Nested records are
    /// checked by schema identity only; their own fields are checked on encode.
    pub fn matches(&self, field_type: &FieldType) -> bool {
        match (field_type, self) {
            (FieldType::Scalar(kind), v) => v.scalar_kind() == Some(*kind),
            (FieldType::String, Self::String(_))
            | (FieldType::Uuid, Self::Uuid(_))
            | (FieldType::Enum(_), Self::Enum(_))
            | (FieldType::Bytes, Self::Bytes(_))
            | (FieldType::Array(_), Self::Array(None))
            | (FieldType::Message(_), Self::Message(None))
            | (FieldType::Messages(_), Self::Messages(None)) => true,
            (FieldType::Array(kind), Self::Array(Some(a))) => a.kind() == *kind,
            (FieldType::Message(r), Self::Message(Some(record))) => r.refers_to(record.schema()),
            (FieldType::Messages(r), Self::Messages(Some(items))) => items
                .iter()
                .flatten()
                .all(|record| r.refers_to(record.schema())),
            _ => false,
        }
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Self::Bool(v) => Some(*v),
            _ => None,
        }
    }

    pub fn as_i32(&self) -> Option<i32> {
        match self {
            Self::I32(v) => Some(*v),
            _ => None,
        }
    }

    pub fn as_i64(&self) -> Option<i64> {
        match self {
            Self::I64(v) => Some(*v),
            _ => None,
        }
    }

    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Self::F64(v) => Some(*v),
            _ => None,
        }
    }

    /// Non-null string content.
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::String(Some(s)) => Some(s),
            _ => None,
        }
    }

    pub fn as_uuid(&self) -> Option<Uuid> {
        match self {
            Self::Uuid(v) => *v,
            _ => None,
        }
    }

    pub fn as_record(&self) -> Option<&Record> {
        match self {
            Self::Message(Some(r)) => Some(r),
            _ => None,
        }
    }

    pub fn into_string(self) -> Result<Option<String>> {
        match self {
            Self::String(v) => Ok(v),
            other => Err(Error::mismatch("string", other.describe())),
        }
    }

    pub fn into_uuid(self) -> Result<Option<Uuid>> {
        match self {
            Self::Uuid(v) => Ok(v),
            other => Err(Error::mismatch("uuid", other.describe())),
        }
    }

    pub fn into_enum(self) -> Result<Option<u32>> {
        match self {
            Self::Enum(v) => Ok(v),
            other => Err(Error::mismatch("enum", other.describe())),
        }
    }

    pub fn into_bytes(self) -> Result<Option<Vec<u8>>> {
        match self {
            Self::Bytes(v) => Ok(v),
            other => Err(Error::mismatch("bytes", other.describe())),
        }
    }

    pub fn into_array(self) -> Result<Option<ScalarArray>> {
        match self {
            Self::Array(v) => Ok(v),
            other => Err(Error::mismatch("array", other.describe())),
        }
    }

    pub fn into_message(self) -> Result<Option<Record>> {
        match self {
            Self::Message(v) => Ok(v.map(|r| *r)),
            other => Err(Error::mismatch("message", other.describe())),
        }
    }

    pub fn into_messages(self) -> Result<Option<Vec<Option<Record>>>> {
        match self {
            Self::Messages(v) => Ok(v),
            other => Err(Error::mismatch("[message]", other.describe())),
        }
    }
}

macro_rules! impl_value_from {
    ($($ty:ty => $variant:ident),* $(,)?) => {
        $(
            impl From<$ty> for Value {
                fn from(v: $ty) -> Self {
                    Self::$variant(v)
                }
            }
        )*
    };
}

impl_value_from!(
    bool => Bool,
    i8 => I8,
    i16 => I16,
    i32 => I32,
    i64 => I64,
    f32 => F32,
    f64 => F64,
    Option<String> => String,
    Option<Uuid> => Uuid,
    Option<Vec<u8>> => Bytes,
    Option<ScalarArray> => Array,
);

impl From<&str> for Value {
    fn from(v: &str) -> Self {
        Self::String(Some(v.to_string()))
    }
}

impl From<String> for Value {
    fn from(v: String) -> Self {
        Self::String(Some(v))
    }
}

impl From<Uuid> for Value {
    fn from(v: Uuid) -> Self {
        Self::Uuid(Some(v))
    }
}

impl From<Vec<u8>> for Value {
    fn from(v: Vec<u8>) -> Self {
        Self::Bytes(Some(v))
    }
}

impl From<ScalarArray> for Value {
    fn from(v: ScalarArray) -> Self {
        Self::Array(Some(v))
    }
}

impl From<Record> for Value {
    fn from(v: Record) -> Self {
        Self::Message(Some(Box::new(v)))
    }
}

impl From<Vec<Record>> for Value {
    fn from(v: Vec<Record>) -> Self {
        Self::Messages(Some(v.into_iter().map(Some).collect()))
    }
}

/// A value of some schema: one [`Value`] per field, in declaration order.
#[derive(Debug, Clone)]
pub struct Record {
    schema: Arc<Schema>,
    values: Vec<Value>,
}

impl Record {
    /// Record with default values (zero scalars, null everything else).
    pub fn new(schema: &Arc<Schema>) -> Self {
        let values = schema
            .fields()
            .iter()
            .map(|f| Value::default_for(&f.field_type))
            .collect();
        Self {
            schema: schema.clone(),
            values,
        }
    }

    /// Record from positional values, checked against the schema.
    pub fn from_values(schema: &Arc<Schema>, values: Vec<Value>) -> Result<Self> {
        if values.len() != schema.fields().len() {
            return Err(Error::FieldCount {
                schema: schema.name().to_string(),
                expected: schema.fields().len(),
                found: values.len(),
            });
        }
        for (field, value) in schema.fields().iter().zip(&values) {
            if !value.matches(&field.field_type) {
                return Err(Error::mismatch(
                    format!("{} for field `{}`", field.field_type.describe(), field.name),
                    value.describe(),
                ));
            }
        }
        Ok(Self::from_parts(schema.clone(), values))
    }

    /// Record from positional values without checks. Encoding still
    /// validates every value.
    #[doc(hidden)]
    pub fn from_parts(schema: Arc<Schema>, values: Vec<Value>) -> Self {
        Self { schema, values }
    }

    pub fn schema(&self) -> &Arc<Schema> {
        &self.schema
    }

    pub fn type_name(&self) -> &str {
        self.schema.name()
    }

    pub fn values(&self) -> &[Value] {
        &self.values
    }

    pub fn into_values(self) -> Vec<Value> {
        self.values
    }

    /// Field value by name.
    pub fn get(&self, name: &str) -> Option<&Value> {
        self.schema.field_index(name).map(|i| &self.values[i])
    }

    /// Set a field by name; the value must match the field's type.
    pub fn set(&mut self, name: &str, value: impl Into<Value>) -> Result<()> {
        let index = self
            .schema
            .field_index(name)
            .ok_or_else(|| Error::FieldNotFound {
                schema: self.schema.name().to_string(),
                field: name.to_string(),
            })?;
        let value = value.into();
        let field_type = &self.schema.fields()[index].field_type;
        if !value.matches(field_type) {
            return Err(Error::mismatch(
                format!("{} for field `{}`", field_type.describe(), name),
                value.describe(),
            ));
        }
        self.values[index] = value;
        Ok(())
    }

    /// Chaining form of [`Record::set`].
    pub fn with(mut self, name: &str, value: impl Into<Value>) -> Result<Self> {
        self.set(name, value)?;
        Ok(self)
    }
}

impl PartialEq for Record {
    fn eq(&self, other: &Self) -> bool {
        self.schema.key() == other.schema.key() && self.values == other.values
    }
}
