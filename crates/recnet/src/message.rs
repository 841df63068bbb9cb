// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Typed messages.
//!
//! [`Message`] connects an application struct to its [`Schema`] and converts
//! it to and from a [`Record`]. Implementations are normally derived:
//!
//! ```rust
//! use recnet::{Message, MessageEnum, Registry};
//!
//! #[derive(Debug, Clone, Copy, PartialEq, MessageEnum)]
//! enum Mood {
//!     Calm,
//!     Excited,
//! }
//!
//! #[derive(Debug, PartialEq, Message)]
//! struct ChatMessage {
//!     username: String,
//!     timestamp: i64,
//!     message: Option<String>,
//!     #[recnet(enumeration)]
//!     mood: Option<Mood>,
//! }
//!
//! let registry = Registry::new();
//! registry.register_message::<ChatMessage>(1)?;
//!
//! let msg = ChatMessage {
//!     username: "andrew".into(),
//!     timestamp: 123,
//!     message: Some("Hello world!".into()),
//!     mood: Some(Mood::Excited),
//! };
//! let bytes = registry.message_to_bytes(&msg)?;
//! assert_eq!(registry.message_from_bytes::<ChatMessage>(&bytes)?, msg);
//! # Ok::<(), recnet::Error>(())
//! ```
//!
//! The free functions and [`FieldValues`] in this module are what derived
//! code calls; they are public so hand-written implementations can use them.

use crate::error::{Error, Result};
use crate::schema::{EnumType, ScalarKind, Schema};
use crate::value::{Record, ScalarArray, Value};
use std::sync::Arc;

/// A Rust type with a fixed schema.
pub trait Message: Sized {
    /// The type's schema. Must return the same `Arc` on every call.
    fn schema() -> Arc<Schema>;

    fn to_record(&self) -> Record;

    fn from_record(record: Record) -> Result<Self>;
}

/// A fieldless Rust enum carried as an ordinal.
pub trait MessageEnum: Sized {
    fn enum_type() -> Arc<EnumType>;

    fn ordinal(&self) -> u32;

    fn from_ordinal(ordinal: u32) -> Option<Self>;
}

/// Fixed-width scalar Rust types.
pub trait Scalar: Copy {
    const KIND: ScalarKind;

    fn into_value(self) -> Value;

    fn from_value(value: Value) -> Result<Self>;

    fn wrap_array(items: Vec<Self>) -> ScalarArray;

    fn unwrap_array(array: ScalarArray) -> Result<Vec<Self>>;
}

macro_rules! impl_scalar {
    ($($ty:ty => $variant:ident),* $(,)?) => {
        $(
            impl Scalar for $ty {
                const KIND: ScalarKind = ScalarKind::$variant;

                fn into_value(self) -> Value {
                    Value::$variant(self)
                }

                fn from_value(value: Value) -> Result<Self> {
                    match value {
                        Value::$variant(v) => Ok(v),
                        other => Err(Error::mismatch(Self::KIND.name(), other.describe())),
                    }
                }

                fn wrap_array(items: Vec<Self>) -> ScalarArray {
                    ScalarArray::$variant(items)
                }

                fn unwrap_array(array: ScalarArray) -> Result<Vec<Self>> {
                    match array {
                        ScalarArray::$variant(v) => Ok(v),
                        other => Err(Error::mismatch(
                            format!("[{}]", Self::KIND.name()),
                            format!("[{}]", other.kind().name()),
                        )),
                    }
                }
            }
        )*
    };
}

impl_scalar!(
    bool => Bool,
    i8 => I8,
    i16 => I16,
    i32 => I32,
    i64 => I64,
    f32 => F32,
    f64 => F64,
);

/// Unwrap a decoded nullable value for a field that cannot be null.
pub fn required<T>(value: Option<T>, field: &str) -> Result<T> {
    value.ok_or_else(|| Error::MissingValue(field.to_string()))
}

pub fn enum_from_ordinal<T: MessageEnum>(ordinal: u32) -> Result<T> {
    T::from_ordinal(ordinal).ok_or_else(|| {
        let enum_type = T::enum_type();
        Error::OrdinalOutOfRange {
            name: enum_type.name().to_string(),
            ordinal: i64::from(ordinal),
            count: enum_type.len(),
        }
    })
}

/// Convert message-array elements; a null element fails with `MissingValue`.
pub fn records_into<T: Message>(items: Vec<Option<Record>>, field: &str) -> Result<Vec<T>> {
    items
        .into_iter()
        .map(|item| T::from_record(required(item, field)?))
        .collect()
}

fn expect_schema(record: &Record, expected: &Schema) -> Result<()> {
    if record.schema().key() != expected.key() {
        return Err(Error::UnexpectedMessage {
            expected: expected.name().to_string(),
            found: record.type_name().to_string(),
        });
    }
    Ok(())
}

/// Positional field values of a record being converted into `T`.
#[derive(Debug)]
pub struct FieldValues {
    values: std::vec::IntoIter<Value>,
}

impl FieldValues {
    /// Fails with `UnexpectedMessage` unless `record` was built from `T::schema()`.
    pub fn new<T: Message>(record: Record) -> Result<Self> {
        expect_schema(&record, &T::schema())?;
        Ok(Self {
            values: record.into_values().into_iter(),
        })
    }

    /// Next value in declaration order.
    pub fn take(&mut self, field: &str) -> Result<Value> {
        self.values
            .next()
            .ok_or_else(|| Error::MissingValue(field.to_string()))
    }
}

impl Record {
    /// Convert into a typed message, checking that the schemas agree.
    pub fn into_message<T: Message>(self) -> Result<T> {
        expect_schema(&self, &T::schema())?;
        T::from_record(self)
    }
}
