// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! # recnet - schema registry and binary record codec
//!
//! Messages are described by a [`Schema`]: an ordered list of named fields
//! drawn from a closed set of field types. A [`Registry`] assigns each schema
//! a one-byte type id, generates its codec once, and then reads and writes
//! id-prefixed messages on any `std::io` stream.
//!
//! ## Wire format
//!
//! ```text
//! message   := id:u8 payload
//! payload   := field*                      (declaration order, big-endian)
//! scalar    := bool:u8 | i8 | i16 | i32 | i64 | f32 | f64
//! string    := len:i32 utf8[len]           (len = -1 for null)
//! uuid      := hi:i64 lo:i64               (-1, -1 for null)
//! enum      := ordinal:i32                 (-1 for null)
//! bytes     := len:i32 u8[len]             (len = -1 for null)
//! array     := len:i32 scalar[len]         (len = -1 for null)
//! nested    := present:u8 payload?         (no id byte)
//! messages  := len:i32 nested[len]         (len = -1 for null)
//! ```
//!
//! ## Quick start
//!
//! ```rust
//! use recnet::{Message, Registry};
//!
//! #[derive(Debug, PartialEq, Message)]
//! struct ChatMessage {
//!     username: String,
//!     timestamp: i64,
//!     message: String,
//! }
//!
//! let registry = Registry::new();
//! registry.register_message::<ChatMessage>(1)?;
//!
//! let msg = ChatMessage {
//!     username: "andrew".into(),
//!     timestamp: 123,
//!     message: "Hello world!".into(),
//! };
//!
//! let mut stream = Vec::new();
//! registry.write_message(&msg, &mut stream)?;
//! assert_eq!(stream.len(), 35);
//!
//! let decoded: ChatMessage = registry.read_message(&mut stream.as_slice())?;
//! assert_eq!(decoded, msg);
//! # Ok::<(), recnet::Error>(())
//! ```
//!
//! Schemas can also be built at runtime with [`SchemaBuilder`] and used
//! through [`Record`] values without any Rust type behind them.

extern crate self as recnet;

mod codec;
pub mod config;
mod descriptor;
pub mod error;
mod generator;
pub mod message;
pub mod registry;
pub mod schema;
pub mod value;
mod wire;

pub use config::RegistryConfig;
pub use descriptor::Descriptor;
pub use error::{Error, Result};
pub use message::{Message, MessageEnum};
pub use recnet_codegen::{Message, MessageEnum};
pub use registry::{Registry, MAX_TYPE_ID};
pub use schema::{EnumType, Field, FieldType, ScalarKind, Schema, SchemaBuilder, SchemaKey, SchemaRef};
pub use uuid::Uuid;
pub use value::{Record, ScalarArray, Value};
