// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Resolved, per-schema codecs.
//!
//! A [`Descriptor`] is built once per schema by the generator and then shared
//! by every encode and decode of that schema. Nested message fields point at
//! the descriptor of the nested schema, so the codec never looks anything up
//! while it runs.

use crate::codec;
use crate::config::RegistryConfig;
use crate::error::{Error, Result};
use crate::schema::{EnumType, ScalarKind, Schema};
use crate::value::Record;
use std::fmt;
use std::io::{Read, Write};
use std::sync::Arc;

/// Codec for one field, resolved from its [`FieldType`](crate::FieldType).
pub(crate) enum FieldCodec {
    Scalar(ScalarKind),
    String,
    Uuid,
    Enum(Arc<EnumType>),
    Bytes,
    Array(ScalarKind),
    Message(Arc<Descriptor>),
    Messages(Arc<Descriptor>),
}

impl FieldCodec {
    pub(crate) fn describe(&self) -> String {
        match self {
            Self::Scalar(kind) => kind.name().to_string(),
            Self::String => "string".to_string(),
            Self::Uuid => "uuid".to_string(),
            Self::Enum(e) => format!("enum {}", e.name()),
            Self::Bytes => "bytes".to_string(),
            Self::Array(kind) => format!("[{}]", kind.name()),
            Self::Message(d) => format!("message {}", d.schema.name()),
            Self::Messages(d) => format!("[message {}]", d.schema.name()),
        }
    }
}

/// Encoder/decoder for the payload of one schema (everything after the id byte).
pub struct Descriptor {
    schema: Arc<Schema>,
    fields: Vec<FieldCodec>,
    config: RegistryConfig,
}

impl Descriptor {
    pub(crate) fn new(schema: Arc<Schema>, fields: Vec<FieldCodec>, config: RegistryConfig) -> Self {
        Self {
            schema,
            fields,
            config,
        }
    }

    pub fn schema(&self) -> &Arc<Schema> {
        &self.schema
    }

    fn check(&self, record: &Record) -> Result<()> {
        if record.schema().key() != self.schema.key() {
            return Err(Error::mismatch(
                format!("message {}", self.schema.name()),
                format!("message {}", record.type_name()),
            ));
        }
        if record.values().len() != self.fields.len() {
            return Err(Error::FieldCount {
                schema: self.schema.name().to_string(),
                expected: self.fields.len(),
                found: record.values().len(),
            });
        }
        Ok(())
    }

    /// Encoded payload size of `record`, excluding the type id byte.
    pub fn size_of(&self, record: &Record) -> Result<usize> {
        self.check(record)?;
        let mut size = 0usize;
        for (field, value) in self.fields.iter().zip(record.values()) {
            size += codec::field_size(field, value)?;
        }
        Ok(size)
    }

    /// Encode the fields of `record` in declaration order.
    pub fn encode<W: Write + ?Sized>(&self, record: &Record, w: &mut W) -> Result<()> {
        self.check(record)?;
        for (field, value) in self.fields.iter().zip(record.values()) {
            codec::encode_field(field, value, w)?;
        }
        Ok(())
    }

    /// Decode a record's fields in declaration order.
    pub fn decode<R: Read + ?Sized>(&self, r: &mut R) -> Result<Record> {
        let mut values = Vec::with_capacity(self.fields.len());
        for field in &self.fields {
            values.push(codec::decode_field(field, r, &self.config)?);
        }
        Ok(Record::from_parts(self.schema.clone(), values))
    }
}

impl fmt::Debug for Descriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let fields: Vec<_> = self
            .schema
            .fields()
            .iter()
            .zip(&self.fields)
            .map(|(field, codec)| format!("{}: {}", field.name, codec.describe()))
            .collect();
        f.debug_struct("Descriptor")
            .field("schema", &self.schema.name())
            .field("fields", &fields)
            .finish()
    }
}
