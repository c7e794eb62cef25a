//! Read operations.

use super::PackstreamBuf;
use crate::error::{ReaderError, ReaderResult};
use crate::map::OrderedMap;
use crate::marker::{LengthPrefix, Type, TypeMarker};
use crate::struct_registry::StructHeader;
use crate::value::{StructValue, Value};
use bytes::{Buf, Bytes};
use tracing::debug;

/// Largest field count a struct header can declare.
const MAX_STRUCT_FIELDS: u64 = 0x0F;

impl PackstreamBuf {
    /// Consumes and returns the next marker byte.
    pub fn read_marker_byte(&mut self) -> ReaderResult<u8> {
        self.ensure(1)?;
        Ok(self.inner.get_u8())
    }

    /// Consumes the next marker and checks it against an exact marker.
    ///
    /// Returns the low nibble for nibble markers, otherwise the marker byte.
    pub fn read_expected_marker(&mut self, expected: TypeMarker) -> ReaderResult<u64> {
        let mb = self.peek_marker_byte()?;
        let actual = TypeMarker::from_byte(mb);
        if actual != expected {
            return Err(ReaderError::UnexpectedTypeMarker { expected, actual });
        }
        self.inner.advance(1);
        if expected.is_nibble_marker() {
            return Ok((mb & 0x0F) as u64);
        }
        Ok(mb as u64)
    }

    /// Configured maximum length for a length-prefixed type.
    pub fn length_limit(&self, type_: Type) -> u64 {
        match type_ {
            Type::String => self.config.max_string_length,
            Type::Bytes => self.config.max_bytes_length,
            Type::List => self.config.max_list_length,
            Type::Map => self.config.max_map_length,
            Type::Struct => MAX_STRUCT_FIELDS,
            _ => 0,
        }
    }

    /// Consumes a length-prefixed marker of the given type, enforcing the
    /// configured limit for that type.
    pub fn read_length_prefix_marker(&mut self, type_: Type) -> ReaderResult<u64> {
        let limit = self.length_limit(type_);
        self.read_length_prefix_marker_with_limit(type_, limit)
    }

    /// Consumes a length-prefixed marker of the given type.
    ///
    /// Fails with [`ReaderError::LimitExceeded`] when the declared length is
    /// larger than `limit`; nothing is allocated for the payload.
    pub fn read_length_prefix_marker_with_limit(
        &mut self,
        type_: Type,
        limit: u64,
    ) -> ReaderResult<u64> {
        let (mb, marker) = self.expect_type(type_)?;
        let prefix = marker.length_prefix();
        if prefix == LengthPrefix::None {
            return Err(ReaderError::Malformed(format!(
                "Marker 0x{mb:02X} does not carry a length"
            )));
        }

        self.ensure(1 + prefix.encoded_size())?;
        self.inner.advance(1);
        let length = match prefix {
            LengthPrefix::Nibble => (mb & 0x0F) as u64,
            LengthPrefix::Uint8 => self.inner.get_u8() as u64,
            LengthPrefix::Uint16 => self.inner.get_u16() as u64,
            LengthPrefix::Uint32 => self.inner.get_u32() as u64,
            LengthPrefix::None => 0,
        };

        if length > limit {
            debug!(type_ = %type_, declared = length, limit, "Rejecting oversized value");
            return Err(ReaderError::LimitExceeded {
                limit,
                actual: length,
            });
        }
        Ok(length)
    }

    pub fn read_null(&mut self) -> ReaderResult<()> {
        self.expect_type(Type::None)?;
        self.inner.advance(1);
        Ok(())
    }

    pub fn read_boolean(&mut self) -> ReaderResult<bool> {
        let (_, marker) = self.expect_type(Type::Boolean)?;
        self.inner.advance(1);
        Ok(marker == TypeMarker::True)
    }

    /// Reads an integer of any encoded width.
    pub fn read_int(&mut self) -> ReaderResult<i64> {
        let (mb, marker) = self.expect_type(Type::Int)?;
        let width = match marker {
            TypeMarker::Int8 => 1,
            TypeMarker::Int16 => 2,
            TypeMarker::Int32 => 4,
            TypeMarker::Int64 => 8,
            _ => 0,
        };
        self.ensure(1 + width)?;
        self.inner.advance(1);

        let value = match marker {
            TypeMarker::Int8 => self.inner.get_i8() as i64,
            TypeMarker::Int16 => self.inner.get_i16() as i64,
            TypeMarker::Int32 => self.inner.get_i32() as i64,
            TypeMarker::Int64 => self.inner.get_i64(),
            _ => mb as i8 as i64,
        };
        Ok(value)
    }

    pub fn read_float(&mut self) -> ReaderResult<f64> {
        self.expect_type(Type::Float)?;
        self.ensure(9)?;
        self.inner.advance(1);
        Ok(self.inner.get_f64())
    }

    /// Reads a byte array without copying its payload.
    pub fn read_bytes(&mut self) -> ReaderResult<Bytes> {
        let length = self.read_length_prefix_marker(Type::Bytes)? as usize;
        self.ensure(length)?;
        Ok(self.inner.split_to(length).freeze())
    }

    pub fn read_string(&mut self) -> ReaderResult<String> {
        let length = self.read_length_prefix_marker(Type::String)? as usize;
        self.ensure(length)?;
        let payload = self.inner.split_to(length);
        String::from_utf8(payload.to_vec()).map_err(|_| ReaderError::InvalidUtf8)
    }

    /// Reads a list, decoding every element with `reader`.
    pub fn read_list<T, E, F>(&mut self, mut reader: F) -> Result<Vec<T>, E>
    where
        E: From<ReaderError>,
        F: FnMut(&mut Self) -> Result<T, E>,
    {
        let length = self.read_length_prefix_marker(Type::List)?;
        let mut items = Vec::with_capacity(self.capacity_hint(length));
        for _ in 0..length {
            items.push(reader(self)?);
        }
        Ok(items)
    }

    /// Reads a map, decoding every value with `reader`. Keys are always
    /// strings and must be unique.
    pub fn read_map<T, E, F>(&mut self, mut reader: F) -> Result<OrderedMap<T>, E>
    where
        E: From<ReaderError>,
        F: FnMut(&mut Self) -> Result<T, E>,
    {
        let length = self.read_length_prefix_marker(Type::Map)?;
        let mut entries = OrderedMap::with_capacity(self.capacity_hint(length));
        for _ in 0..length {
            let key = self.read_string()?;
            if entries.contains_key(&key) {
                return Err(ReaderError::DuplicateMapKey(key).into());
            }
            let value = reader(self)?;
            entries.insert(key, value);
        }
        Ok(entries)
    }

    pub fn read_struct_header(&mut self) -> ReaderResult<StructHeader> {
        let length = self.read_length_prefix_marker(Type::Struct)?;
        self.ensure(1)?;
        let tag = self.inner.get_u8();
        Ok(StructHeader::new(length, tag))
    }

    /// Returns the next struct header without consuming it.
    pub fn peek_struct_header(&self) -> ReaderResult<StructHeader> {
        let (mb, _) = self.expect_type(Type::Struct)?;
        self.ensure(2)?;
        Ok(StructHeader::new((mb & 0x0F) as u64, self.inner[1]))
    }

    /// Reads any value, materialising structs as raw [`StructValue`]s.
    pub fn read_value(&mut self) -> ReaderResult<Value> {
        self.read_value_with(&mut read_struct_value)
    }

    /// Reads any value, delegating struct payloads to `structs`.
    ///
    /// The struct header has already been consumed when `structs` is invoked;
    /// it must read exactly `header.length` fields.
    pub fn read_value_with<S, E, F>(&mut self, structs: &mut F) -> Result<Value<S>, E>
    where
        E: From<ReaderError>,
        F: FnMut(&mut Self, StructHeader) -> Result<S, E>,
    {
        let value = match self.peek_type()? {
            Type::None => {
                self.read_null()?;
                Value::Null
            }
            Type::Boolean => Value::Boolean(self.read_boolean()?),
            Type::Int => Value::Int(self.read_int()?),
            Type::Float => Value::Float(self.read_float()?),
            Type::Bytes => Value::Bytes(self.read_bytes()?),
            Type::String => Value::String(self.read_string()?),
            Type::List => Value::List(
                self.descend(|buf| buf.read_list(|b| b.read_value_with::<S, E, F>(&mut *structs)))?,
            ),
            Type::Map => Value::Map(
                self.descend(|buf| buf.read_map(|b| b.read_value_with::<S, E, F>(&mut *structs)))?,
            ),
            Type::Struct => {
                let header = self.read_struct_header()?;
                Value::Struct(self.descend(|buf| structs(buf, header))?)
            }
            Type::Reserved => {
                let mb = self.peek_marker_byte()?;
                return Err(
                    ReaderError::Malformed(format!("Reserved marker 0x{mb:02X}")).into(),
                );
            }
        };
        Ok(value)
    }

    /// Skips over the next value of any type.
    pub fn skip(&mut self) -> ReaderResult<()> {
        match self.peek_type()? {
            Type::None => self.read_null(),
            Type::Boolean => self.read_boolean().map(drop),
            Type::Int => self.read_int().map(drop),
            Type::Float => self.read_float().map(drop),
            Type::Bytes | Type::String => {
                let type_ = self.peek_type()?;
                let length = self.read_length_prefix_marker(type_)? as usize;
                self.ensure(length)?;
                self.inner.advance(length);
                Ok(())
            }
            Type::List => {
                let length = self.read_length_prefix_marker(Type::List)?;
                self.descend(|buf| (0..length).try_for_each(|_| buf.skip()))
            }
            Type::Map => {
                let length = self.read_length_prefix_marker(Type::Map)?;
                self.descend(|buf| {
                    (0..length).try_for_each(|_| {
                        buf.read_string()?;
                        buf.skip()
                    })
                })
            }
            Type::Struct => {
                let header = self.read_struct_header()?;
                self.descend(|buf| (0..header.length).try_for_each(|_| buf.skip()))
            }
            Type::Reserved => {
                let mb = self.peek_marker_byte()?;
                Err(ReaderError::Malformed(format!("Reserved marker 0x{mb:02X}")))
            }
        }
    }
}

fn read_struct_value(buf: &mut PackstreamBuf, header: StructHeader) -> ReaderResult<StructValue> {
    let mut fields = Vec::with_capacity(header.length as usize);
    for _ in 0..header.length {
        fields.push(buf.read_value()?);
    }
    Ok(StructValue::new(header.tag, fields))
}
