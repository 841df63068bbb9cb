// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! `#[derive(Message)]` and `#[derive(MessageEnum)]` end to end.

#![allow(clippy::missing_panics_doc)]

use recnet::{Error, FieldType, Message, MessageEnum, Registry, ScalarKind, Schema, Uuid, Value};

#[derive(Debug, Clone, PartialEq, Message)]
struct ChatMessage {
    username: String,
    timestamp: i64,
    message: String,
}

#[derive(Debug, Clone, Copy, PartialEq, MessageEnum)]
enum Priority {
    Low,
    Normal,
    Urgent,
}

#[derive(Debug, Clone, PartialEq, Message)]
struct Point {
    x: f64,
    y: f64,
}

#[derive(Debug, Clone, PartialEq, Message)]
#[recnet(name = "telemetry.Frame")]
struct Frame {
    id: Uuid,
    source: Option<Uuid>,
    seq: i32,
    ok: bool,
    small: i8,
    medium: i16,
    ratio: f32,
    label: Option<String>,
    #[recnet(enumeration)]
    priority: Priority,
    #[recnet(enumeration)]
    fallback: Option<Priority>,
    payload: Vec<u8>,
    extra: Option<Vec<u8>>,
    samples: Vec<f32>,
    counters: Option<Vec<i64>>,
    origin: Point,
    target: Option<Point>,
    boxed: Box<Point>,
    maybe_boxed: Option<Box<Point>>,
    path: Vec<Point>,
    alternates: Option<Vec<Point>>,
}

#[derive(Debug, PartialEq, Message)]
struct Tree {
    value: i32,
    children: Vec<Tree>,
}

fn field_type<'a>(schema: &'a Schema, name: &str) -> &'a FieldType {
    &schema.field(name).unwrap().field_type
}

fn frame() -> Frame {
    Frame {
        id: Uuid::from_u64_pair(1, 2),
        source: None,
        seq: -7,
        ok: true,
        small: -3,
        medium: 300,
        ratio: 0.5,
        label: Some("frame".into()),
        priority: Priority::Urgent,
        fallback: None,
        payload: vec![1, 2, 3],
        extra: None,
        samples: vec![1.0, -2.5],
        counters: Some(Vec::new()),
        origin: Point { x: 0.0, y: 1.0 },
        target: Some(Point { x: 2.0, y: 3.0 }),
        boxed: Box::new(Point { x: 4.0, y: 5.0 }),
        maybe_boxed: None,
        path: vec![Point { x: 6.0, y: 7.0 }, Point { x: 8.0, y: 9.0 }],
        alternates: None,
    }
}

#[test]
fn test_derived_chat_message_wire_bytes() {
    let registry = Registry::new();
    registry.register_message::<ChatMessage>(1).unwrap();

    let msg = ChatMessage {
        username: "andrew".into(),
        timestamp: 123,
        message: "Hello world!".into(),
    };
    let bytes = registry.message_to_bytes(&msg).unwrap();
    assert_eq!(bytes.len(), 35);
    assert_eq!(bytes[0], 1);
    assert_eq!(&bytes[1..5], [0, 0, 0, 6]);
    assert_eq!(&bytes[5..11], b"andrew");
    assert_eq!(registry.byte_size(&msg.to_record()).unwrap(), 35);

    let decoded: ChatMessage = registry.message_from_bytes(&bytes).unwrap();
    assert_eq!(decoded, msg);
}

#[test]
fn test_schema_is_built_once() {
    let a = ChatMessage::schema();
    let b = ChatMessage::schema();
    assert_eq!(a.key(), b.key());
    assert_eq!(a.name(), "ChatMessage");
    let names: Vec<_> = a.fields().iter().map(|f| f.name.as_str()).collect();
    assert_eq!(names, ["username", "timestamp", "message"]);
}

#[test]
fn test_derived_field_types() {
    let schema = Frame::schema();
    assert_eq!(schema.name(), "telemetry.Frame");

    let field = |name: &str| field_type(&schema, name);
    assert!(matches!(field("id"), FieldType::Uuid));
    assert!(matches!(field("seq"), FieldType::Scalar(ScalarKind::I32)));
    assert!(matches!(field("label"), FieldType::String));
    assert!(matches!(field("payload"), FieldType::Bytes));
    assert!(matches!(field("samples"), FieldType::Array(ScalarKind::F32)));
    assert!(matches!(field("counters"), FieldType::Array(ScalarKind::I64)));
    assert!(matches!(field("origin"), FieldType::Message(r) if r.refers_to(&Point::schema())));
    assert!(matches!(field("boxed"), FieldType::Message(_)));
    assert!(matches!(field("path"), FieldType::Messages(r) if r.refers_to(&Point::schema())));
    match field("priority") {
        FieldType::Enum(e) => {
            assert_eq!(e.name(), "Priority");
            assert_eq!(e.variants(), ["Low", "Normal", "Urgent"]);
        }
        other => panic!("expected enum, got {:?}", other),
    }
}

#[test]
fn test_message_enum_ordinals() {
    assert_eq!(Priority::Low.ordinal(), 0);
    assert_eq!(Priority::Urgent.ordinal(), 2);
    assert_eq!(Priority::from_ordinal(1), Some(Priority::Normal));
    assert_eq!(Priority::from_ordinal(3), None);
    assert_eq!(Priority::enum_type().len(), 3);
}

#[test]
fn test_every_shape_round_trips() {
    let registry = Registry::new();
    registry.register_message::<Frame>(10).unwrap();

    let original = frame();
    let mut stream: Vec<u8> = Vec::new();
    registry.write_message(&original, &mut stream).unwrap();
    let decoded: Frame = registry.read_message(&mut stream.as_slice()).unwrap();
    assert_eq!(decoded, original);

    let mut full = frame();
    full.source = Some(Uuid::from_u64_pair(3, 4));
    full.fallback = Some(Priority::Low);
    full.extra = Some(vec![]);
    full.counters = None;
    full.target = None;
    full.maybe_boxed = Some(Box::new(Point { x: -1.0, y: -1.0 }));
    full.alternates = Some(vec![Point { x: 0.0, y: 0.0 }]);
    full.label = None;
    let bytes = registry.message_to_bytes(&full).unwrap();
    assert_eq!(registry.message_from_bytes::<Frame>(&bytes).unwrap(), full);
}

#[test]
fn test_nested_types_need_no_registration() {
    let registry = Registry::new();
    registry.register_message::<Frame>(10).unwrap();
    assert!(registry.is_registered(&Frame::schema()));
    assert!(!registry.is_registered(&Point::schema()));
}

#[test]
fn test_read_message_of_wrong_type() {
    let registry = Registry::new();
    registry.register_message::<ChatMessage>(1).unwrap();
    registry.register_message::<Point>(2).unwrap();

    let bytes = registry
        .message_to_bytes(&Point { x: 1.0, y: 2.0 })
        .unwrap();
    assert!(matches!(
        registry.message_from_bytes::<ChatMessage>(&bytes),
        Err(Error::UnexpectedMessage { expected, found }) if expected == "ChatMessage" && found == "Point"
    ));
}

#[test]
fn test_null_into_non_optional_field() {
    let registry = Registry::new();
    registry.register_message::<ChatMessage>(1).unwrap();

    // username null, timestamp 0, message ""
    let bytes = [1, 0xFF, 0xFF, 0xFF, 0xFF, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0];
    assert!(matches!(
        registry.message_from_bytes::<ChatMessage>(&bytes),
        Err(Error::MissingValue(field)) if field == "username"
    ));
    // The dynamic view still decodes it.
    let record = registry.from_bytes(&bytes).unwrap();
    assert_eq!(record.get("username"), Some(&Value::String(None)));
}

#[test]
fn test_recursive_type_is_rejected_at_registration() {
    let registry = Registry::new();
    assert!(matches!(
        registry.register_message::<Tree>(1),
        Err(Error::CyclicSchema { schema, .. }) if schema == "Tree"
    ));
    assert!(registry.is_empty());
}

#[test]
fn test_derived_and_dynamic_views_agree() {
    let registry = Registry::new();
    registry.register_message::<ChatMessage>(3).unwrap();

    let msg = ChatMessage {
        username: "a".into(),
        timestamp: 9,
        message: "b".into(),
    };
    let record = msg.to_record();
    assert_eq!(record.get("timestamp"), Some(&Value::I64(9)));
    assert_eq!(
        registry.to_bytes(&record).unwrap(),
        registry.message_to_bytes(&msg).unwrap()
    );
    assert_eq!(record.into_message::<ChatMessage>().unwrap(), msg);
}
