// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Message schemas: ordered, named fields with a closed set of field types.
//!
//! A [`Schema`] is immutable once built and is always handled through an
//! `Arc`. Each schema carries a [`SchemaKey`] assigned at build time, so two
//! schemas with identical names and fields are still distinct types.
//!
//! ```rust
//! use recnet::{ScalarKind, SchemaBuilder};
//!
//! let chat = SchemaBuilder::new("ChatMessage")
//!     .string("username")
//!     .scalar("timestamp", ScalarKind::I64)
//!     .string("message")
//!     .build();
//!
//! assert_eq!(chat.fields().len(), 3);
//! assert_eq!(chat.field_index("message"), Some(2));
//! ```

mod builder;

pub use builder::SchemaBuilder;

use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

/// Fixed-width, never-null field kinds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ScalarKind {
    Bool,
    I8,
    I16,
    I32,
    I64,
    F32,
    F64,
}

impl ScalarKind {
    /// Encoded width in bytes.
    pub const fn width(self) -> usize {
        match self {
            Self::Bool | Self::I8 => 1,
            Self::I16 => 2,
            Self::I32 | Self::F32 => 4,
            Self::I64 | Self::F64 => 8,
        }
    }

    pub const fn name(self) -> &'static str {
        match self {
            Self::Bool => "bool",
            Self::I8 => "i8",
            Self::I16 => "i16",
            Self::I32 => "i32",
            Self::I64 => "i64",
            Self::F32 => "f32",
            Self::F64 => "f64",
        }
    }
}

/// An enumeration: a name plus variant names in ordinal order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EnumType {
    name: String,
    variants: Vec<String>,
}

impl EnumType {
    pub fn new<I, S>(name: impl Into<String>, variants: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            name: name.into(),
            variants: variants.into_iter().map(Into::into).collect(),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn variants(&self) -> &[String] {
        &self.variants
    }

    /// Variant name at `ordinal`.
    pub fn variant(&self, ordinal: u32) -> Option<&str> {
        self.variants.get(ordinal as usize).map(String::as_str)
    }

    pub fn ordinal_of(&self, variant: &str) -> Option<u32> {
        self.variants
            .iter()
            .position(|v| v == variant)
            .map(|i| i as u32)
    }

    pub fn len(&self) -> usize {
        self.variants.len()
    }

    pub fn is_empty(&self) -> bool {
        self.variants.is_empty()
    }
}

/// How a nested message field refers to its schema.
#[derive(Clone)]
pub enum SchemaRef {
    /// A schema known when the field is declared.
    Direct(Arc<Schema>),
    /// A schema looked up by name in the registry's catalog at resolution time.
    Named(String),
    /// A schema produced on demand. Derived types use this so a type can
    /// mention itself without recursing while its schema is built.
    Lazy(fn() -> Arc<Schema>),
}

impl SchemaRef {
    /// Name of the referenced schema.
    pub fn name(&self) -> String {
        match self {
            Self::Direct(schema) => schema.name().to_string(),
            Self::Named(name) => name.clone(),
            Self::Lazy(f) => f().name().to_string(),
        }
    }

    /// Whether `schema` is (or, for `Named`, is named like) the referenced schema.
    pub fn refers_to(&self, schema: &Schema) -> bool {
        match self {
            Self::Direct(s) => s.key() == schema.key(),
            Self::Named(name) => name == schema.name(),
            Self::Lazy(f) => f().key() == schema.key(),
        }
    }
}

impl fmt::Debug for SchemaRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Direct(schema) => write!(f, "Direct({})", schema.name()),
            Self::Named(name) => write!(f, "Named({})", name),
            Self::Lazy(_) => f.write_str("Lazy(..)"),
        }
    }
}

/// Field type classification. Every codec path matches on this exhaustively.
#[derive(Debug, Clone)]
pub enum FieldType {
    Scalar(ScalarKind),
    /// Length-prefixed UTF-8, nullable.
    String,
    /// 128-bit identifier, nullable.
    Uuid,
    /// Ordinal into an enumeration, nullable.
    Enum(Arc<EnumType>),
    /// Length-prefixed byte blob, nullable.
    Bytes,
    /// Length-prefixed array of fixed-width scalars, nullable.
    Array(ScalarKind),
    /// A single nested message behind a presence flag.
    Message(SchemaRef),
    /// Length-prefixed array of nested messages, nullable.
    Messages(SchemaRef),
}

impl FieldType {
    /// Short human-readable description, used in error messages.
    pub fn describe(&self) -> String {
        match self {
            Self::Scalar(kind) => kind.name().to_string(),
            Self::String => "string".to_string(),
            Self::Uuid => "uuid".to_string(),
            Self::Enum(e) => format!("enum {}", e.name()),
            Self::Bytes => "bytes".to_string(),
            Self::Array(kind) => format!("[{}]", kind.name()),
            Self::Message(r) => format!("message {}", r.name()),
            Self::Messages(r) => format!("[message {}]", r.name()),
        }
    }
}

/// A named field of a schema.
#[derive(Debug, Clone)]
pub struct Field {
    pub name: String,
    pub field_type: FieldType,
}

impl Field {
    pub fn new(name: impl Into<String>, field_type: FieldType) -> Self {
        Self {
            name: name.into(),
            field_type,
        }
    }
}

/// Process-unique schema identity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SchemaKey(u64);

impl SchemaKey {
    fn next() -> Self {
        static NEXT: AtomicU64 = AtomicU64::new(1);
        Self(NEXT.fetch_add(1, Ordering::Relaxed))
    }
}

/// An immutable message schema.
#[derive(Debug)]
pub struct Schema {
    key: SchemaKey,
    name: String,
    fields: Vec<Field>,
}

impl Schema {
    pub fn new(name: impl Into<String>, fields: Vec<Field>) -> Arc<Self> {
        Arc::new(Self {
            key: SchemaKey::next(),
            name: name.into(),
            fields,
        })
    }

    pub fn key(&self) -> SchemaKey {
        self.key
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Fields in declaration order.
    pub fn fields(&self) -> &[Field] {
        &self.fields
    }

    pub fn field(&self, name: &str) -> Option<&Field> {
        self.fields.iter().find(|f| f.name == name)
    }

    pub fn field_index(&self, name: &str) -> Option<usize> {
        self.fields.iter().position(|f| f.name == name)
    }
}

impl PartialEq for Schema {
    fn eq(&self, other: &Self) -> bool {
        self.key == other.key
    }
}

impl Eq for Schema {}
