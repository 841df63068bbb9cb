// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Schema registry: type id dispatch plus the per-registry descriptor cache.
//!
//! Every message on the wire starts with a one-byte type id in `0..=127`
//! followed by the schema's fields. The registry maps ids to schemas in both
//! directions and owns the descriptors generated for them.
//!
//! ```rust
//! use recnet::{Record, Registry, ScalarKind, SchemaBuilder};
//!
//! let chat = SchemaBuilder::new("ChatMessage")
//!     .string("username")
//!     .scalar("timestamp", ScalarKind::I64)
//!     .string("message")
//!     .build();
//!
//! let registry = Registry::new();
//! registry.register(1, &chat)?;
//!
//! let record = Record::new(&chat)
//!     .with("username", "andrew")?
//!     .with("timestamp", 123i64)?
//!     .with("message", "Hello world!")?;
//!
//! let bytes = registry.to_bytes(&record)?;
//! assert_eq!(bytes.len(), 35);
//! assert_eq!(registry.from_bytes(&bytes)?, record);
//! # Ok::<(), recnet::Error>(())
//! ```

use crate::config::RegistryConfig;
use crate::descriptor::Descriptor;
use crate::error::{Error, Result};
use crate::generator::Generator;
use crate::message::Message;
use crate::schema::{Schema, SchemaKey};
use crate::value::Record;
use byteorder::ReadBytesExt;
use parking_lot::RwLock;
use std::collections::HashMap;
use std::io::{Read, Write};
use std::sync::Arc;

/// Highest assignable type id.
pub const MAX_TYPE_ID: u8 = 127;

/// Width of the leading type id.
const ID_SIZE: usize = 1;

#[derive(Debug, Default)]
struct RegistryInner {
    by_id: HashMap<u8, Arc<Descriptor>>,
    ids: HashMap<SchemaKey, u8>,
    /// Schemas reachable through `SchemaRef::Named`.
    catalog: HashMap<String, Arc<Schema>>,
    /// Every descriptor generated by this registry, registered or nested.
    descriptors: HashMap<SchemaKey, Arc<Descriptor>>,
}

/// Maps type ids to schemas and encodes/decodes id-prefixed messages.
///
/// Registration takes a write lock; encoding and decoding only take a read
/// lock long enough to clone the descriptor, so a shared `Registry` can serve
/// many threads.
#[derive(Debug, Default)]
pub struct Registry {
    inner: RwLock<RegistryInner>,
    config: RegistryConfig,
}

impl Registry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_config(config: RegistryConfig) -> Self {
        Self {
            inner: RwLock::new(RegistryInner::default()),
            config,
        }
    }

    /// Registry pre-populated with `(id, schema)` pairs, registered in order.
    pub fn with_types<I>(types: I) -> Result<Self>
    where
        I: IntoIterator<Item = (i32, Arc<Schema>)>,
    {
        let registry = Self::new();
        for (id, schema) in types {
            registry.register(id, &schema)?;
        }
        Ok(registry)
    }

    pub fn config(&self) -> &RegistryConfig {
        &self.config
    }

    /// Make `schema` resolvable by name from `SchemaRef::Named` fields.
    /// A later declaration under the same name replaces the earlier one.
    pub fn declare(&self, schema: &Arc<Schema>) {
        let mut inner = self.inner.write();
        inner
            .catalog
            .insert(schema.name().to_string(), schema.clone());
    }

    /// Assign `id` to `schema`, generating its descriptor and those of every
    /// schema it references.
    ///
    /// The schema is also declared by name. Re-registering an id or a schema
    /// replaces the previous mapping in both directions.
    pub fn register(&self, id: i32, schema: &Arc<Schema>) -> Result<()> {
        let id = u8::try_from(id)
            .ok()
            .filter(|id| *id <= MAX_TYPE_ID)
            .ok_or(Error::InvalidId(i64::from(id)))?;

        let mut guard = self.inner.write();
        let inner = &mut *guard;
        let key = schema.key();

        let previous = inner
            .catalog
            .insert(schema.name().to_string(), schema.clone());
        let mut generator = Generator::new(&inner.descriptors, &inner.catalog, self.config);
        let generated = generator.generate(schema);
        let created = generator.into_created();
        let desc = match generated {
            Ok(desc) => desc,
            Err(e) => {
                match previous {
                    Some(previous) => {
                        inner.catalog.insert(schema.name().to_string(), previous);
                    }
                    None => {
                        inner.catalog.remove(schema.name());
                    }
                }
                return Err(e);
            }
        };
        inner.descriptors.extend(created);

        if let Some(old) = inner.by_id.insert(id, desc) {
            let old_key = old.schema().key();
            if old_key != key {
                log::warn!(
                    "[registry] id {} reassigned from '{}' to '{}'",
                    id,
                    old.schema().name(),
                    schema.name()
                );
                inner.ids.remove(&old_key);
            }
        }
        if let Some(old_id) = inner.ids.insert(key, id) {
            if old_id != id {
                log::warn!(
                    "[registry] schema '{}' moved from id {} to id {}",
                    schema.name(),
                    old_id,
                    id
                );
                inner.by_id.remove(&old_id);
            }
        }

        log::debug!("[registry] registered '{}' as id {}", schema.name(), id);
        Ok(())
    }

    pub fn is_registered(&self, schema: &Schema) -> bool {
        self.inner.read().ids.contains_key(&schema.key())
    }

    pub fn id_of(&self, schema: &Schema) -> Option<u8> {
        self.inner.read().ids.get(&schema.key()).copied()
    }

    pub fn schema_for(&self, id: u8) -> Option<Arc<Schema>> {
        self.descriptor_for(id).map(|desc| desc.schema().clone())
    }

    /// Payload codec registered under `id`. It encodes and decodes the fields
    /// only, without the id byte.
    pub fn descriptor_for(&self, id: u8) -> Option<Arc<Descriptor>> {
        self.inner.read().by_id.get(&id).cloned()
    }

    /// Number of registered ids.
    pub fn len(&self) -> usize {
        self.inner.read().by_id.len()
    }

    pub fn is_empty(&self) -> bool {
        self.inner.read().by_id.is_empty()
    }

    fn lookup(&self, schema: &Schema) -> Result<(u8, Arc<Descriptor>)> {
        let inner = self.inner.read();
        inner
            .ids
            .get(&schema.key())
            .and_then(|id| inner.by_id.get(id).map(|desc| (*id, desc.clone())))
            .ok_or_else(|| Error::UnregisteredType(schema.name().to_string()))
    }

    /// Encoded size of `record` as one message, id byte included.
    pub fn byte_size(&self, record: &Record) -> Result<usize> {
        let (_, desc) = self.lookup(record.schema())?;
        Ok(ID_SIZE + desc.size_of(record)?)
    }

    /// Encode `record` with its id byte into a buffer sized up front.
    pub fn to_bytes(&self, record: &Record) -> Result<Vec<u8>> {
        let (id, desc) = self.lookup(record.schema())?;
        let mut buf = Vec::with_capacity(ID_SIZE + desc.size_of(record)?);
        buf.push(id);
        desc.encode(record, &mut buf)?;
        log::trace!(
            "[registry] encoded '{}' as id {} ({} bytes)",
            record.type_name(),
            id,
            buf.len()
        );
        Ok(buf)
    }

    /// Write `record` as one id-prefixed message. Nothing reaches `w` if
    /// encoding fails.
    pub fn write<W: Write + ?Sized>(&self, record: &Record, w: &mut W) -> Result<()> {
        let buf = self.to_bytes(record)?;
        w.write_all(&buf)?;
        Ok(())
    }

    /// Read one id-prefixed message.
    pub fn read<R: Read + ?Sized>(&self, r: &mut R) -> Result<Record> {
        let id = r.read_u8()?;
        let desc = self.descriptor_for(id).ok_or(Error::UnknownTypeId(id))?;
        desc.decode(r)
    }

    /// Decode one message from the front of `bytes`; trailing bytes are ignored.
    pub fn from_bytes(&self, bytes: &[u8]) -> Result<Record> {
        let mut cursor = bytes;
        self.read(&mut cursor)
    }

    pub fn register_message<T: Message>(&self, id: i32) -> Result<()> {
        self.register(id, &T::schema())
    }

    pub fn write_message<T: Message, W: Write + ?Sized>(&self, message: &T, w: &mut W) -> Result<()> {
        self.write(&message.to_record(), w)
    }

    /// Read one message that must be a `T`.
    pub fn read_message<T: Message, R: Read + ?Sized>(&self, r: &mut R) -> Result<T> {
        self.read(r)?.into_message()
    }

    pub fn message_to_bytes<T: Message>(&self, message: &T) -> Result<Vec<u8>> {
        self.to_bytes(&message.to_record())
    }

    pub fn message_from_bytes<T: Message>(&self, bytes: &[u8]) -> Result<T> {
        self.from_bytes(bytes)?.into_message()
    }
}
