// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Randomized round-trips over every field classification.
//!
//! Values are drawn with a seeded `fastrand::Rng` so failures reproduce.
//! Every case checks decode(encode(r)) == r and that `byte_size` matches the
//! encoded length.

#![allow(clippy::missing_panics_doc)]
#![allow(clippy::cast_possible_truncation)]

use recnet::{
    EnumType, Record, Registry, ScalarArray, ScalarKind, Schema, SchemaBuilder, Uuid, Value,
};
use std::sync::Arc;

const SEED: u64 = 0x5EED_0F_5EED;
const ITERATIONS: usize = 200;

struct Schemas {
    leaf: Arc<Schema>,
    everything: Arc<Schema>,
    color: Arc<EnumType>,
}

fn schemas() -> Schemas {
    let color = Arc::new(EnumType::new("Color", ["RED", "GREEN", "BLUE", "ALPHA"]));
    let leaf = SchemaBuilder::new("Leaf")
        .scalar("id", ScalarKind::I32)
        .string("label")
        .build();
    let mut builder = SchemaBuilder::new("Everything")
        .scalar("b", ScalarKind::Bool)
        .scalar("i8", ScalarKind::I8)
        .scalar("i16", ScalarKind::I16)
        .scalar("i32", ScalarKind::I32)
        .scalar("i64", ScalarKind::I64)
        .scalar("f32", ScalarKind::F32)
        .scalar("f64", ScalarKind::F64)
        .string("text")
        .uuid("id")
        .enumeration("color", color.clone())
        .bytes("blob");
    for kind in KINDS {
        builder = builder.array(format!("array_{}", kind.name()), kind);
    }
    let everything = builder
        .message("leaf", &leaf)
        .messages("leaves", &leaf)
        .build();
    Schemas {
        leaf,
        everything,
        color,
    }
}

const KINDS: [ScalarKind; 7] = [
    ScalarKind::Bool,
    ScalarKind::I8,
    ScalarKind::I16,
    ScalarKind::I32,
    ScalarKind::I64,
    ScalarKind::F32,
    ScalarKind::F64,
];

/// Finite floats only, so equality holds after the round-trip.
fn random_f32(rng: &mut fastrand::Rng) -> f32 {
    (rng.f32() - 0.5) * 1.0e6
}

fn random_f64(rng: &mut fastrand::Rng) -> f64 {
    (rng.f64() - 0.5) * 1.0e12
}

fn random_string(rng: &mut fastrand::Rng) -> Option<String> {
    match rng.u8(0..10) {
        0 => None,
        1 => Some(String::new()),
        // Multi-byte characters make byte length differ from char count.
        2 => Some("héllo wörld ✓".to_string()),
        _ => {
            let len = rng.usize(1..40);
            Some((0..len).map(|_| rng.alphanumeric()).collect())
        }
    }
}

fn random_len(rng: &mut fastrand::Rng) -> Option<usize> {
    match rng.u8(0..8) {
        0 => None,
        1 => Some(0),
        _ => Some(rng.usize(1..20)),
    }
}

fn random_array(rng: &mut fastrand::Rng, kind: ScalarKind) -> Option<ScalarArray> {
    let len = random_len(rng)?;
    let array = match kind {
        ScalarKind::Bool => ScalarArray::Bool((0..len).map(|_| rng.bool()).collect()),
        ScalarKind::I8 => ScalarArray::I8((0..len).map(|_| rng.i8(..)).collect()),
        ScalarKind::I16 => ScalarArray::I16((0..len).map(|_| rng.i16(..)).collect()),
        ScalarKind::I32 => ScalarArray::I32((0..len).map(|_| rng.i32(..)).collect()),
        ScalarKind::I64 => ScalarArray::I64((0..len).map(|_| rng.i64(..)).collect()),
        ScalarKind::F32 => ScalarArray::F32((0..len).map(|_| random_f32(rng)).collect()),
        ScalarKind::F64 => ScalarArray::F64((0..len).map(|_| random_f64(rng)).collect()),
    };
    Some(array)
}

fn random_leaf(rng: &mut fastrand::Rng, leaf: &Arc<Schema>) -> Record {
    Record::from_values(
        leaf,
        vec![Value::I32(rng.i32(..)), Value::String(random_string(rng))],
    )
    .unwrap()
}

fn random_record(rng: &mut fastrand::Rng, s: &Schemas) -> Record {
    let mut values = vec![
        Value::Bool(rng.bool()),
        Value::I8(rng.i8(..)),
        Value::I16(rng.i16(..)),
        Value::I32(rng.i32(..)),
        Value::I64(rng.i64(..)),
        Value::F32(random_f32(rng)),
        Value::F64(random_f64(rng)),
        Value::String(random_string(rng)),
        Value::Uuid(rng.bool().then(|| Uuid::from_u64_pair(rng.u64(..), rng.u64(..)))),
        Value::Enum(rng.bool().then(|| rng.u32(0..s.color.len() as u32))),
        Value::Bytes(random_len(rng).map(|len| (0..len).map(|_| rng.u8(..)).collect())),
    ];
    for kind in KINDS {
        values.push(Value::Array(random_array(rng, kind)));
    }
    values.push(Value::Message(
        rng.bool().then(|| Box::new(random_leaf(rng, &s.leaf))),
    ));
    values.push(Value::Messages(random_len(rng).map(|len| {
        (0..len)
            .map(|_| rng.bool().then(|| random_leaf(rng, &s.leaf)))
            .collect()
    })));
    Record::from_values(&s.everything, values).unwrap()
}

#[test]
fn test_random_round_trips() {
    let s = schemas();
    let registry = Registry::new();
    registry.register(42, &s.everything).unwrap();

    let mut rng = fastrand::Rng::with_seed(SEED);
    for i in 0..ITERATIONS {
        let record = random_record(&mut rng, &s);
        let bytes = registry.to_bytes(&record).unwrap();
        assert_eq!(bytes[0], 42);
        assert_eq!(
            registry.byte_size(&record).unwrap(),
            bytes.len(),
            "iteration {}: size",
            i
        );
        assert_eq!(registry.from_bytes(&bytes).unwrap(), record, "iteration {}", i);
    }
}

#[test]
fn test_random_stream_of_mixed_messages() {
    let s = schemas();
    let registry = Registry::with_types([(1, s.everything.clone()), (2, s.leaf.clone())]).unwrap();

    let mut rng = fastrand::Rng::with_seed(SEED ^ 0xFFFF);
    let records: Vec<Record> = (0..50)
        .map(|_| {
            if rng.bool() {
                random_record(&mut rng, &s)
            } else {
                random_leaf(&mut rng, &s.leaf)
            }
        })
        .collect();

    let mut stream: Vec<u8> = Vec::new();
    for record in &records {
        registry.write(record, &mut stream).unwrap();
    }
    let mut input = stream.as_slice();
    for record in &records {
        assert_eq!(&registry.read(&mut input).unwrap(), record);
    }
    assert!(input.is_empty());
}

#[test]
fn test_all_defaults_round_trip() {
    let s = schemas();
    let registry = Registry::new();
    registry.register(0, &s.everything).unwrap();

    let record = Record::new(&s.everything);
    let bytes = registry.to_bytes(&record).unwrap();
    assert_eq!(registry.from_bytes(&bytes).unwrap(), record);
}
