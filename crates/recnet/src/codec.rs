// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Per-field encode, decode and size computation.
//!
//! Every function here matches [`FieldCodec`] exhaustively. Nested messages
//! recurse through their [`Descriptor`](crate::Descriptor).

use crate::config::RegistryConfig;
use crate::descriptor::FieldCodec;
use crate::error::{Error, Result};
use crate::schema::{EnumType, ScalarKind};
use crate::value::{Record, Value};
use crate::wire::{WireRead, WireWrite, NULL_LENGTH};
use std::io::{Read, Write};

/// Length prefix width.
const LENGTH_SIZE: usize = 4;
/// Presence flag width.
const PRESENCE_SIZE: usize = 1;
const UUID_SIZE: usize = 16;

fn mismatch(codec: &FieldCodec, value: &Value) -> Error {
    Error::mismatch(codec.describe(), value.describe())
}

fn check_ordinal(enum_type: &EnumType, ordinal: i64) -> Result<u32> {
    if ordinal < 0 || ordinal >= enum_type.len() as i64 {
        return Err(Error::OrdinalOutOfRange {
            name: enum_type.name().to_string(),
            ordinal,
            count: enum_type.len(),
        });
    }
    Ok(ordinal as u32)
}

pub(crate) fn field_size(codec: &FieldCodec, value: &Value) -> Result<usize> {
    let size = match (codec, value) {
        (FieldCodec::Scalar(kind), v) if v.scalar_kind() == Some(*kind) => kind.width(),
        (FieldCodec::String, Value::String(s)) => {
            LENGTH_SIZE + s.as_ref().map_or(0, String::len)
        }
        (FieldCodec::Uuid, Value::Uuid(_)) => UUID_SIZE,
        (FieldCodec::Enum(_), Value::Enum(_)) => LENGTH_SIZE,
        (FieldCodec::Bytes, Value::Bytes(b)) => LENGTH_SIZE + b.as_ref().map_or(0, Vec::len),
        (FieldCodec::Array(kind), Value::Array(a)) => match a {
            None => LENGTH_SIZE,
            Some(a) if a.kind() == *kind => LENGTH_SIZE + a.len() * kind.width(),
            Some(_) => return Err(mismatch(codec, value)),
        },
        (FieldCodec::Message(desc), Value::Message(m)) => match m {
            None => PRESENCE_SIZE,
            Some(record) => PRESENCE_SIZE + desc.size_of(record)?,
        },
        (FieldCodec::Messages(desc), Value::Messages(items)) => {
            let mut size = LENGTH_SIZE;
            for item in items.iter().flatten() {
                size += PRESENCE_SIZE;
                if let Some(record) = item {
                    size += desc.size_of(record)?;
                }
            }
            size
        }
        _ => return Err(mismatch(codec, value)),
    };
    Ok(size)
}

pub(crate) fn encode_field<W: Write + ?Sized>(
    codec: &FieldCodec,
    value: &Value,
    w: &mut W,
) -> Result<()> {
    match (codec, value) {
        (FieldCodec::Scalar(kind), v) if v.scalar_kind() == Some(*kind) => w.write_scalar(v),
        (FieldCodec::String, Value::String(s)) => w.write_string(s.as_deref()),
        (FieldCodec::Uuid, Value::Uuid(id)) => w.write_uuid(id.as_ref()),
        (FieldCodec::Enum(enum_type), Value::Enum(ordinal)) => {
            if let Some(o) = ordinal {
                check_ordinal(enum_type, i64::from(*o))?;
            }
            w.write_ordinal(*ordinal)
        }
        (FieldCodec::Bytes, Value::Bytes(b)) => w.write_bytes(b.as_deref()),
        (FieldCodec::Array(kind), Value::Array(a)) => match a {
            Some(array) if array.kind() != *kind => Err(mismatch(codec, value)),
            _ => w.write_scalar_array(a.as_ref()),
        },
        (FieldCodec::Message(desc), Value::Message(m)) => {
            w.write_presence(m.is_some())?;
            match m {
                Some(record) => desc.encode(record, w),
                None => Ok(()),
            }
        }
        (FieldCodec::Messages(desc), Value::Messages(items)) => {
            w.write_length(items.as_ref().map(Vec::len))?;
            for item in items.iter().flatten() {
                w.write_presence(item.is_some())?;
                if let Some(record) = item {
                    desc.encode(record, w)?;
                }
            }
            Ok(())
        }
        _ => Err(mismatch(codec, value)),
    }
}

pub(crate) fn decode_field<R: Read + ?Sized>(
    codec: &FieldCodec,
    r: &mut R,
    config: &RegistryConfig,
) -> Result<Value> {
    let value = match codec {
        FieldCodec::Scalar(kind) => r.read_scalar(*kind)?,
        FieldCodec::String => Value::String(r.read_string(config.max_string_len)?),
        FieldCodec::Uuid => Value::Uuid(r.read_uuid()?),
        FieldCodec::Enum(enum_type) => {
            let raw = r.read_ordinal()?;
            if raw == NULL_LENGTH {
                Value::Enum(None)
            } else {
                Value::Enum(Some(check_ordinal(enum_type, i64::from(raw))?))
            }
        }
        FieldCodec::Bytes => Value::Bytes(r.read_bytes(config.max_collection_len)?),
        FieldCodec::Array(kind) => {
            Value::Array(r.read_scalar_array(*kind, config.max_collection_len)?)
        }
        FieldCodec::Message(desc) => {
            if r.read_presence()? {
                Value::Message(Some(Box::new(desc.decode(r)?)))
            } else {
                Value::Message(None)
            }
        }
        FieldCodec::Messages(desc) => match r.read_length(config.max_collection_len)? {
            None => Value::Messages(None),
            Some(len) => {
                let mut items: Vec<Option<Record>> = Vec::with_capacity(len.min(1024));
                for _ in 0..len {
                    let item = if r.read_presence()? {
                        Some(desc.decode(r)?)
                    } else {
                        None
                    };
                    items.push(item);
                }
                Value::Messages(Some(items))
            }
        },
    };
    Ok(value)
}
