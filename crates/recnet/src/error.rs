// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Error type shared by every recnet operation.

use std::io;
use thiserror::Error;

/// Errors raised while registering schemas or encoding/decoding messages.
#[derive(Debug, Error)]
pub enum Error {
    /// Registration id outside `0..=127`.
    #[error("invalid type id {0}: ids must be in 0..=127")]
    InvalidId(i64),

    /// A field type could not be resolved to a supported classification.
    #[error("field `{field}` of schema `{schema}` has an unsupported type: {reason}")]
    UnsupportedFieldType {
        schema: String,
        field: String,
        reason: String,
    },

    /// The schema graph leads back to a schema that is still being resolved.
    #[error("schema `{schema}` is cyclic: {path}")]
    CyclicSchema { schema: String, path: String },

    /// `write` was called with a record whose schema was never registered.
    #[error("schema `{0}` is not registered")]
    UnregisteredType(String),

    /// `read` found a leading id with no registered schema.
    #[error("unknown type id {0}")]
    UnknownTypeId(u8),

    /// The stream ended before the value was complete.
    #[error("stream ended before the value was complete")]
    Truncated,

    #[error("ordinal {ordinal} is out of range for enum `{name}` ({count} variants)")]
    OrdinalOutOfRange {
        name: String,
        ordinal: i64,
        count: usize,
    },

    /// A length prefix that is negative but not the `-1` null sentinel.
    #[error("invalid length prefix {0}")]
    InvalidLength(i32),

    #[error("length {len} exceeds the configured limit of {limit}")]
    LengthLimitExceeded { len: usize, limit: usize },

    /// A string or collection too large for a signed 32-bit length prefix.
    #[error("length {0} does not fit in a 32-bit length prefix")]
    LengthOverflow(usize),

    #[error("invalid presence flag {0:#04x}")]
    InvalidPresenceFlag(u8),

    #[error("invalid UTF-8 in string: {0}")]
    Utf8(#[from] std::string::FromUtf8Error),

    #[error("schema `{schema}` has no field `{field}`")]
    FieldNotFound { schema: String, field: String },

    /// A value does not have the shape its field declares.
    #[error("type mismatch: expected {expected}, found {found}")]
    TypeMismatch { expected: String, found: String },

    #[error("record of schema `{schema}` has {found} values, expected {expected}")]
    FieldCount {
        schema: String,
        expected: usize,
        found: usize,
    },

    /// A null was decoded into a typed field that cannot hold one.
    #[error("field `{0}` is null but its type cannot represent absence")]
    MissingValue(String),

    #[error("expected a `{expected}` message, found `{found}`")]
    UnexpectedMessage { expected: String, found: String },

    #[error("I/O error: {0}")]
    Io(io::Error),
}

impl From<io::Error> for Error {
    fn from(e: io::Error) -> Self {
        if e.kind() == io::ErrorKind::UnexpectedEof {
            Self::Truncated
        } else {
            Self::Io(e)
        }
    }
}

impl Error {
    pub(crate) fn mismatch(expected: impl Into<String>, found: impl Into<String>) -> Self {
        Self::TypeMismatch {
            expected: expected.into(),
            found: found.into(),
        }
    }
}

/// Result alias for recnet operations.
pub type Result<T> = std::result::Result<T, Error>;
