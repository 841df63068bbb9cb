// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Primitive big-endian wire encodings.
//!
//! Sentinels: a length or ordinal of `-1` is null, a UUID of two `-1` words
//! is null, a nested message is preceded by a `0`/`1` presence byte.

use crate::error::{Error, Result};
use crate::value::{ScalarArray, Value};
use crate::ScalarKind;
use byteorder::{BigEndian, ReadBytesExt, WriteBytesExt};
use std::io::{Read, Write};
use uuid::Uuid;

/// Length / ordinal sentinel for null.
pub(crate) const NULL_LENGTH: i32 = -1;

/// Each UUID word of the null sentinel.
const NULL_UUID_WORD: i64 = -1;

/// Upper bound on speculative preallocation from an untrusted length prefix.
const PREALLOC_LIMIT: usize = 64 * 1024;

/// Convert an in-memory length to a wire length prefix.
pub(crate) fn length_prefix(len: usize) -> Result<i32> {
    i32::try_from(len).map_err(|_| Error::LengthOverflow(len))
}

pub(crate) trait WireRead: Read {
    /// Read a length prefix. `-1` is null, other negatives are invalid.
    fn read_length(&mut self, limit: usize) -> Result<Option<usize>> {
        let len = self.read_i32::<BigEndian>()?;
        if len == NULL_LENGTH {
            return Ok(None);
        }
        if len < 0 {
            return Err(Error::InvalidLength(len));
        }
        let len = len as usize;
        if len > limit {
            return Err(Error::LengthLimitExceeded { len, limit });
        }
        Ok(Some(len))
    }

    /// Read exactly `len` bytes without trusting `len` for allocation.
    fn read_blob(&mut self, len: usize) -> Result<Vec<u8>> {
        let mut buf = Vec::with_capacity(len.min(PREALLOC_LIMIT));
        let read = Read::take(&mut *self, len as u64).read_to_end(&mut buf)?;
        if read < len {
            return Err(Error::Truncated);
        }
        Ok(buf)
    }

    fn read_string(&mut self, limit: usize) -> Result<Option<String>> {
        match self.read_length(limit)? {
            None => Ok(None),
            Some(len) => {
                let bytes = self.read_blob(len)?;
                Ok(Some(String::from_utf8(bytes)?))
            }
        }
    }

    fn read_bytes(&mut self, limit: usize) -> Result<Option<Vec<u8>>> {
        match self.read_length(limit)? {
            None => Ok(None),
            Some(len) => Ok(Some(self.read_blob(len)?)),
        }
    }

    fn read_uuid(&mut self) -> Result<Option<Uuid>> {
        let high = self.read_i64::<BigEndian>()?;
        let low = self.read_i64::<BigEndian>()?;
        if high == NULL_UUID_WORD && low == NULL_UUID_WORD {
            return Ok(None);
        }
        Ok(Some(Uuid::from_u64_pair(high as u64, low as u64)))
    }

    /// Raw ordinal; `-1` is null, range checks belong to the caller.
    fn read_ordinal(&mut self) -> Result<i32> {
        Ok(self.read_i32::<BigEndian>()?)
    }

    fn read_presence(&mut self) -> Result<bool> {
        match self.read_u8()? {
            0 => Ok(false),
            1 => Ok(true),
            other => Err(Error::InvalidPresenceFlag(other)),
        }
    }

    fn read_scalar(&mut self, kind: ScalarKind) -> Result<Value> {
        let value = match kind {
            ScalarKind::Bool => Value::Bool(self.read_u8()? != 0),
            ScalarKind::I8 => Value::I8(self.read_i8()?),
            ScalarKind::I16 => Value::I16(self.read_i16::<BigEndian>()?),
            ScalarKind::I32 => Value::I32(self.read_i32::<BigEndian>()?),
            ScalarKind::I64 => Value::I64(self.read_i64::<BigEndian>()?),
            ScalarKind::F32 => Value::F32(self.read_f32::<BigEndian>()?),
            ScalarKind::F64 => Value::F64(self.read_f64::<BigEndian>()?),
        };
        Ok(value)
    }

    fn read_scalar_array(
        &mut self,
        kind: ScalarKind,
        limit: usize,
    ) -> Result<Option<ScalarArray>> {
        let len = match self.read_length(limit)? {
            None => return Ok(None),
            Some(len) => len,
        };
        let cap = len.min(PREALLOC_LIMIT / kind.width());
        macro_rules! read_elems {
            ($variant:ident, $read:expr) => {{
                let mut items = Vec::with_capacity(cap);
                for _ in 0..len {
                    items.push($read);
                }
                ScalarArray::$variant(items)
            }};
        }
        let array = match kind {
            ScalarKind::Bool => read_elems!(Bool, self.read_u8()? != 0),
            ScalarKind::I8 => read_elems!(I8, self.read_i8()?),
            ScalarKind::I16 => read_elems!(I16, self.read_i16::<BigEndian>()?),
            ScalarKind::I32 => read_elems!(I32, self.read_i32::<BigEndian>()?),
            ScalarKind::I64 => read_elems!(I64, self.read_i64::<BigEndian>()?),
            ScalarKind::F32 => read_elems!(F32, self.read_f32::<BigEndian>()?),
            ScalarKind::F64 => read_elems!(F64, self.read_f64::<BigEndian>()?),
        };
        Ok(Some(array))
    }
}

impl<R: Read + ?Sized> WireRead for R {}

pub(crate) trait WireWrite: Write {
    fn write_length(&mut self, len: Option<usize>) -> Result<()> {
        let prefix = match len {
            None => NULL_LENGTH,
            Some(len) => length_prefix(len)?,
        };
        self.write_i32::<BigEndian>(prefix)?;
        Ok(())
    }

    fn write_string(&mut self, value: Option<&str>) -> Result<()> {
        self.write_length(value.map(str::len))?;
        if let Some(s) = value {
            self.write_all(s.as_bytes())?;
        }
        Ok(())
    }

    fn write_bytes(&mut self, value: Option<&[u8]>) -> Result<()> {
        self.write_length(value.map(<[u8]>::len))?;
        if let Some(b) = value {
            self.write_all(b)?;
        }
        Ok(())
    }

    fn write_uuid(&mut self, value: Option<&Uuid>) -> Result<()> {
        let (high, low) = match value {
            None => (NULL_UUID_WORD, NULL_UUID_WORD),
            Some(id) => {
                let (high, low) = id.as_u64_pair();
                (high as i64, low as i64)
            }
        };
        self.write_i64::<BigEndian>(high)?;
        self.write_i64::<BigEndian>(low)?;
        Ok(())
    }

    fn write_ordinal(&mut self, ordinal: Option<u32>) -> Result<()> {
        let raw = match ordinal {
            None => NULL_LENGTH,
            Some(o) => i32::try_from(o).map_err(|_| Error::LengthOverflow(o as usize))?,
        };
        self.write_i32::<BigEndian>(raw)?;
        Ok(())
    }

    fn write_presence(&mut self, present: bool) -> Result<()> {
        self.write_u8(u8::from(present))?;
        Ok(())
    }

    fn write_scalar(&mut self, value: &Value) -> Result<()> {
        match value {
            Value::Bool(v) => self.write_u8(u8::from(*v))?,
            Value::I8(v) => self.write_i8(*v)?,
            Value::I16(v) => self.write_i16::<BigEndian>(*v)?,
            Value::I32(v) => self.write_i32::<BigEndian>(*v)?,
            Value::I64(v) => self.write_i64::<BigEndian>(*v)?,
            Value::F32(v) => self.write_f32::<BigEndian>(*v)?,
            Value::F64(v) => self.write_f64::<BigEndian>(*v)?,
            other => return Err(Error::mismatch("scalar", other.describe())),
        }
        Ok(())
    }

    fn write_scalar_array(&mut self, value: Option<&ScalarArray>) -> Result<()> {
        self.write_length(value.map(ScalarArray::len))?;
        let Some(array) = value else {
            return Ok(());
        };
        match array {
            ScalarArray::Bool(v) => {
                for b in v {
                    self.write_u8(u8::from(*b))?;
                }
            }
            ScalarArray::I8(v) => {
                for x in v {
                    self.write_i8(*x)?;
                }
            }
            ScalarArray::I16(v) => {
                for x in v {
                    self.write_i16::<BigEndian>(*x)?;
                }
            }
            ScalarArray::I32(v) => {
                for x in v {
                    self.write_i32::<BigEndian>(*x)?;
                }
            }
            ScalarArray::I64(v) => {
                for x in v {
                    self.write_i64::<BigEndian>(*x)?;
                }
            }
            ScalarArray::F32(v) => {
                for x in v {
                    self.write_f32::<BigEndian>(*x)?;
                }
            }
            ScalarArray::F64(v) => {
                for x in v {
                    self.write_f64::<BigEndian>(*x)?;
                }
            }
        }
        Ok(())
    }
}

impl<W: Write + ?Sized> WireWrite for W {}
