// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

#![no_main]

use std::sync::{Arc, OnceLock};

use libfuzzer_sys::fuzz_target;
use recnet::{EnumType, Registry, RegistryConfig, ScalarKind, SchemaBuilder};

fn registry() -> &'static Registry {
    static REGISTRY: OnceLock<Registry> = OnceLock::new();
    REGISTRY.get_or_init(|| {
        // Small limits keep hostile length prefixes cheap.
        let config = RegistryConfig::default()
            .with_max_string_len(4096)
            .with_max_collection_len(4096);
        let registry = Registry::with_config(config);

        let chat = SchemaBuilder::new("ChatMessage")
            .string("username")
            .scalar("timestamp", ScalarKind::I64)
            .string("message")
            .build();
        let point = SchemaBuilder::new("Point")
            .scalar("x", ScalarKind::F32)
            .scalar("y", ScalarKind::F32)
            .build();
        let level = Arc::new(EnumType::new("Level", ["LOW", "MID", "HIGH"]));
        let frame = SchemaBuilder::new("Frame")
            .uuid("id")
            .enumeration("level", level)
            .bytes("payload")
            .array("samples", ScalarKind::I16)
            .array("flags", ScalarKind::Bool)
            .message("origin", &point)
            .messages("path", &point)
            .build();

        for (id, schema) in [(0, &chat), (1, &point), (2, &frame)] {
            if let Err(e) = registry.register(id, schema) {
                panic!("fuzz registry setup failed: {}", e);
            }
        }
        registry
    })
}

fuzz_target!(|data: &[u8]| {
    let registry = registry();
    if let Ok(record) = registry.from_bytes(data) {
        // Anything that decodes must encode again at the size it reports.
        let bytes = registry.to_bytes(&record).expect("decoded record re-encodes");
        let size = registry.byte_size(&record).expect("decoded record is sized");
        assert_eq!(bytes.len(), size);
    }
});
