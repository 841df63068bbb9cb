// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Fluent builder API for [`Schema`].

use crate::schema::{EnumType, Field, FieldType, ScalarKind, Schema, SchemaRef};
use std::sync::Arc;

/// Builder for message schemas. Fields are kept in the order they are added,
/// which is also their wire order.
#[derive(Debug)]
pub struct SchemaBuilder {
    name: String,
    fields: Vec<Field>,
}

impl SchemaBuilder {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            fields: Vec::new(),
        }
    }

    /// Add a field of any type.
    pub fn field(mut self, name: impl Into<String>, field_type: FieldType) -> Self {
        self.fields.push(Field::new(name, field_type));
        self
    }

    pub fn scalar(self, name: impl Into<String>, kind: ScalarKind) -> Self {
        self.field(name, FieldType::Scalar(kind))
    }

    pub fn string(self, name: impl Into<String>) -> Self {
        self.field(name, FieldType::String)
    }

    pub fn uuid(self, name: impl Into<String>) -> Self {
        self.field(name, FieldType::Uuid)
    }

    pub fn enumeration(self, name: impl Into<String>, enum_type: Arc<EnumType>) -> Self {
        self.field(name, FieldType::Enum(enum_type))
    }

    pub fn bytes(self, name: impl Into<String>) -> Self {
        self.field(name, FieldType::Bytes)
    }

    /// Add an array of fixed-width scalars.
    pub fn array(self, name: impl Into<String>, element: ScalarKind) -> Self {
        self.field(name, FieldType::Array(element))
    }

    /// Add a nested message field.
    pub fn message(self, name: impl Into<String>, schema: &Arc<Schema>) -> Self {
        self.field(name, FieldType::Message(SchemaRef::Direct(schema.clone())))
    }

    /// Add a nested message field resolved by schema name at registration.
    pub fn message_named(self, name: impl Into<String>, schema_name: impl Into<String>) -> Self {
        self.field(name, FieldType::Message(SchemaRef::Named(schema_name.into())))
    }

    /// Add an array-of-messages field.
    pub fn messages(self, name: impl Into<String>, schema: &Arc<Schema>) -> Self {
        self.field(name, FieldType::Messages(SchemaRef::Direct(schema.clone())))
    }

    pub fn messages_named(self, name: impl Into<String>, schema_name: impl Into<String>) -> Self {
        self.field(name, FieldType::Messages(SchemaRef::Named(schema_name.into())))
    }

    pub fn build(self) -> Arc<Schema> {
        Schema::new(self.name, self.fields)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builder_keeps_declaration_order() {
        let schema = SchemaBuilder::new("Telemetry")
            .uuid("id")
            .scalar("seq", ScalarKind::I64)
            .array("samples", ScalarKind::F32)
            .bytes("blob")
            .string("label")
            .build();

        let names: Vec<_> = schema.fields().iter().map(|f| f.name.as_str()).collect();
        assert_eq!(names, ["id", "seq", "samples", "blob", "label"]);
        assert!(matches!(
            schema.field("samples").map(|f| &f.field_type),
            Some(FieldType::Array(ScalarKind::F32))
        ));
    }

    #[test]
    fn test_nested_fields() {
        let point = SchemaBuilder::new("Point")
            .scalar("x", ScalarKind::F64)
            .scalar("y", ScalarKind::F64)
            .build();

        let path = SchemaBuilder::new("Path")
            .message("origin", &point)
            .messages("waypoints", &point)
            .message_named("parent", "Path")
            .build();

        match &path.fields()[0].field_type {
            FieldType::Message(r) => assert!(r.refers_to(&point)),
            other => panic!("expected message field, got {:?}", other),
        }
        match &path.fields()[2].field_type {
            FieldType::Message(SchemaRef::Named(name)) => assert_eq!(name, "Path"),
            other => panic!("expected named reference, got {:?}", other),
        }
    }

    #[test]
    fn test_enumeration_field() {
        let status = Arc::new(EnumType::new("Status", ["UNKNOWN", "ACTIVE"]));
        let schema = SchemaBuilder::new("StatusMessage")
            .scalar("id", ScalarKind::I32)
            .enumeration("status", status)
            .build();

        match &schema.fields()[1].field_type {
            FieldType::Enum(e) => assert_eq!(e.variant(1), Some("ACTIVE")),
            other => panic!("expected enum field, got {:?}", other),
        }
    }
}
