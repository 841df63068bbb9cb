// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Registry configuration.

/// Largest length a signed 32-bit prefix can carry.
pub const MAX_WIRE_LENGTH: usize = i32::MAX as usize;

/// Decode-time limits for a [`Registry`](crate::Registry).
///
/// Length prefixes above a limit are rejected with
/// [`Error::LengthLimitExceeded`](crate::Error::LengthLimitExceeded) before
/// any element is read. The defaults accept every length the wire can express.
///
/// ```rust
/// use recnet::{Registry, RegistryConfig};
///
/// let config = RegistryConfig::default()
///     .with_max_string_len(64 * 1024)
///     .with_max_collection_len(10_000);
/// let registry = Registry::with_config(config);
/// assert_eq!(registry.config().max_string_len, 64 * 1024);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RegistryConfig {
    /// Maximum decoded string length in bytes.
    pub max_string_len: usize,
    /// Maximum element count of byte blobs, scalar arrays and message arrays.
    pub max_collection_len: usize,
}

impl Default for RegistryConfig {
    fn default() -> Self {
        Self {
            max_string_len: MAX_WIRE_LENGTH,
            max_collection_len: MAX_WIRE_LENGTH,
        }
    }
}

impl RegistryConfig {
    pub fn with_max_string_len(mut self, len: usize) -> Self {
        self.max_string_len = len;
        self
    }

    pub fn with_max_collection_len(mut self, len: usize) -> Self {
        self.max_collection_len = len;
        self
    }
}
