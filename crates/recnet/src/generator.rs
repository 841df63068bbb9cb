// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Descriptor generation.
//!
//! Walks a schema's fields in declaration order and resolves every nested
//! message reference through the registry's descriptor cache, producing the
//! shared [`Descriptor`] graph. New descriptors are collected separately and
//! handed back to the registry only when the whole resolution succeeds.

use crate::config::RegistryConfig;
use crate::descriptor::{Descriptor, FieldCodec};
use crate::error::{Error, Result};
use crate::schema::{Field, FieldType, Schema, SchemaKey, SchemaRef};
use std::collections::HashMap;
use std::sync::Arc;

pub(crate) struct Generator<'a> {
    cache: &'a HashMap<SchemaKey, Arc<Descriptor>>,
    catalog: &'a HashMap<String, Arc<Schema>>,
    config: RegistryConfig,
    created: HashMap<SchemaKey, Arc<Descriptor>>,
    /// Schemas whose resolution has started but not finished, outermost first.
    in_progress: Vec<(SchemaKey, String)>,
}

impl<'a> Generator<'a> {
    pub(crate) fn new(
        cache: &'a HashMap<SchemaKey, Arc<Descriptor>>,
        catalog: &'a HashMap<String, Arc<Schema>>,
        config: RegistryConfig,
    ) -> Self {
        Self {
            cache,
            catalog,
            config,
            created: HashMap::new(),
            in_progress: Vec::new(),
        }
    }

    /// Resolve `schema` and everything it references.
    pub(crate) fn generate(&mut self, schema: &Arc<Schema>) -> Result<Arc<Descriptor>> {
        let key = schema.key();
        if let Some(desc) = self.cache.get(&key).or_else(|| self.created.get(&key)) {
            return Ok(desc.clone());
        }

        if self.in_progress.iter().any(|(k, _)| *k == key) {
            let mut path: Vec<&str> = self
                .in_progress
                .iter()
                .skip_while(|(k, _)| *k != key)
                .map(|(_, name)| name.as_str())
                .collect();
            path.push(schema.name());
            return Err(Error::CyclicSchema {
                schema: schema.name().to_string(),
                path: path.join(" -> "),
            });
        }

        self.in_progress.push((key, schema.name().to_string()));
        let fields = schema
            .fields()
            .iter()
            .map(|field| self.resolve_field(schema, field))
            .collect::<Result<Vec<_>>>();
        self.in_progress.pop();
        let fields = fields?;

        log::trace!(
            "[generator] resolved schema '{}' ({} fields)",
            schema.name(),
            fields.len()
        );
        let desc = Arc::new(Descriptor::new(schema.clone(), fields, self.config));
        self.created.insert(key, desc.clone());
        Ok(desc)
    }

    fn resolve_field(&mut self, owner: &Schema, field: &Field) -> Result<FieldCodec> {
        let codec = match &field.field_type {
            FieldType::Scalar(kind) => FieldCodec::Scalar(*kind),
            FieldType::String => FieldCodec::String,
            FieldType::Uuid => FieldCodec::Uuid,
            FieldType::Enum(enum_type) => FieldCodec::Enum(enum_type.clone()),
            FieldType::Bytes => FieldCodec::Bytes,
            FieldType::Array(kind) => FieldCodec::Array(*kind),
            FieldType::Message(r) => {
                let nested = self.resolve_ref(owner, field, r)?;
                FieldCodec::Message(self.generate(&nested)?)
            }
            FieldType::Messages(r) => {
                let nested = self.resolve_ref(owner, field, r)?;
                FieldCodec::Messages(self.generate(&nested)?)
            }
        };
        Ok(codec)
    }

    fn resolve_ref(&self, owner: &Schema, field: &Field, r: &SchemaRef) -> Result<Arc<Schema>> {
        match r {
            SchemaRef::Direct(schema) => Ok(schema.clone()),
            SchemaRef::Lazy(f) => Ok(f()),
            SchemaRef::Named(name) => {
                self.catalog
                    .get(name)
                    .cloned()
                    .ok_or_else(|| Error::UnsupportedFieldType {
                        schema: owner.name().to_string(),
                        field: field.name.clone(),
                        reason: format!("no schema named `{}` has been declared", name),
                    })
            }
        }
    }

    /// Descriptors built by this generator, including the requested root.
    pub(crate) fn into_created(self) -> HashMap<SchemaKey, Arc<Descriptor>> {
        self.created
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::{ScalarKind, SchemaBuilder};

    fn generate(
        cache: &HashMap<SchemaKey, Arc<Descriptor>>,
        catalog: &HashMap<String, Arc<Schema>>,
        schema: &Arc<Schema>,
    ) -> Result<(Arc<Descriptor>, HashMap<SchemaKey, Arc<Descriptor>>)> {
        let mut generator = Generator::new(cache, catalog, RegistryConfig::default());
        let desc = generator.generate(schema)?;
        Ok((desc, generator.into_created()))
    }

    #[test]
    fn test_nested_schemas_resolved_once() {
        let point = SchemaBuilder::new("Point")
            .scalar("x", ScalarKind::I32)
            .build();
        let line = SchemaBuilder::new("Line")
            .message("from", &point)
            .message("to", &point)
            .messages("via", &point)
            .build();

        let (desc, created) = generate(&HashMap::new(), &HashMap::new(), &line).unwrap();
        assert_eq!(created.len(), 2);
        assert!(Arc::ptr_eq(&created[&line.key()], &desc));
        assert!(created.contains_key(&point.key()));
    }

    #[test]
    fn test_cache_hit_reuses_descriptor() {
        let point = SchemaBuilder::new("Point").build();
        let (point_desc, cache) = generate(&HashMap::new(), &HashMap::new(), &point).unwrap();

        let wrapper = SchemaBuilder::new("Wrapper").message("p", &point).build();
        let (_, created) = generate(&cache, &HashMap::new(), &wrapper).unwrap();
        assert_eq!(created.len(), 1);

        let (again, created) = generate(&cache, &HashMap::new(), &point).unwrap();
        assert!(created.is_empty());
        assert!(Arc::ptr_eq(&again, &point_desc));
    }

    #[test]
    fn test_self_reference_is_cyclic() {
        let node = SchemaBuilder::new("Node")
            .scalar("value", ScalarKind::I32)
            .messages_named("children", "Node")
            .build();
        let catalog = HashMap::from([("Node".to_string(), node.clone())]);

        let err = generate(&HashMap::new(), &catalog, &node).unwrap_err();
        match err {
            Error::CyclicSchema { schema, path } => {
                assert_eq!(schema, "Node");
                assert_eq!(path, "Node -> Node");
            }
            other => panic!("expected CyclicSchema, got {:?}", other),
        }
    }

    #[test]
    fn test_indirect_cycle_reports_path() {
        let b = SchemaBuilder::new("B").message_named("a", "A").build();
        let a = SchemaBuilder::new("A").message("b", &b).build();
        let root = SchemaBuilder::new("Root").message("a", &a).build();
        let catalog = HashMap::from([("A".to_string(), a.clone())]);

        match generate(&HashMap::new(), &catalog, &root).unwrap_err() {
            Error::CyclicSchema { path, .. } => assert_eq!(path, "A -> B -> A"),
            other => panic!("expected CyclicSchema, got {:?}", other),
        }
    }

    #[test]
    fn test_unknown_named_reference() {
        let schema = SchemaBuilder::new("Holder")
            .message_named("missing", "Ghost")
            .build();
        match generate(&HashMap::new(), &HashMap::new(), &schema).unwrap_err() {
            Error::UnsupportedFieldType { schema, field, .. } => {
                assert_eq!(schema, "Holder");
                assert_eq!(field, "missing");
            }
            other => panic!("expected UnsupportedFieldType, got {:?}", other),
        }
    }
}
