//! Write operations.
//!
//! Integers and lengths are always written in the narrowest encoding able
//! to hold them.

use super::PackstreamBuf;
use crate::error::{WriterError, WriterResult};
use crate::map::OrderedMap;
use crate::marker::{LengthPrefix, Type, TypeMarker, TINY_INT_MAX, TINY_INT_MIN};
use crate::struct_registry::StructHeader;
use crate::value::{StructValue, Value};
use bytes::BufMut;

impl PackstreamBuf {
    pub fn write_marker_byte(&mut self, marker: u8) -> &mut Self {
        self.inner.put_u8(marker);
        self
    }

    /// Writes the narrowest marker out of `markers` able to hold `length`,
    /// followed by the length itself where required.
    pub fn write_length_marker(
        &mut self,
        markers: &[TypeMarker],
        length: u64,
    ) -> WriterResult<&mut Self> {
        let marker = markers
            .iter()
            .find(|m| length <= m.length_prefix().max_value())
            .copied();

        let Some(marker) = marker else {
            let type_ = markers.first().map_or(Type::Reserved, |m| m.type_());
            let max = markers
                .last()
                .map_or(0, |m| m.length_prefix().max_value());
            return Err(WriterError::LengthOutOfRange { type_, length, max });
        };

        match marker.length_prefix() {
            LengthPrefix::Nibble => self.inner.put_u8(marker.value() | length as u8),
            LengthPrefix::Uint8 => {
                self.inner.put_u8(marker.value());
                self.inner.put_u8(length as u8);
            }
            LengthPrefix::Uint16 => {
                self.inner.put_u8(marker.value());
                self.inner.put_u16(length as u16);
            }
            LengthPrefix::Uint32 => {
                self.inner.put_u8(marker.value());
                self.inner.put_u32(length as u32);
            }
            LengthPrefix::None => self.inner.put_u8(marker.value()),
        }
        Ok(self)
    }

    pub fn write_null(&mut self) -> &mut Self {
        self.write_marker_byte(TypeMarker::Null.value())
    }

    pub fn write_boolean(&mut self, value: bool) -> &mut Self {
        let marker = if value {
            TypeMarker::True
        } else {
            TypeMarker::False
        };
        self.write_marker_byte(marker.value())
    }

    pub fn write_int(&mut self, value: i64) -> &mut Self {
        if (TINY_INT_MIN..=TINY_INT_MAX).contains(&value) {
            self.inner.put_i8(value as i8);
        } else if (i8::MIN as i64..TINY_INT_MIN).contains(&value) {
            // INT8 only extends the negative range; positives up to 127 are tiny
            self.inner.put_u8(TypeMarker::Int8.value());
            self.inner.put_i8(value as i8);
        } else if (i16::MIN as i64..=i16::MAX as i64).contains(&value) {
            self.inner.put_u8(TypeMarker::Int16.value());
            self.inner.put_i16(value as i16);
        } else if (i32::MIN as i64..=i32::MAX as i64).contains(&value) {
            self.inner.put_u8(TypeMarker::Int32.value());
            self.inner.put_i32(value as i32);
        } else {
            self.inner.put_u8(TypeMarker::Int64.value());
            self.inner.put_i64(value);
        }
        self
    }

    pub fn write_float(&mut self, value: f64) -> &mut Self {
        self.inner.put_u8(TypeMarker::Float64.value());
        self.inner.put_f64(value);
        self
    }

    pub fn write_bytes(&mut self, payload: &[u8]) -> WriterResult<&mut Self> {
        self.write_length_marker(&TypeMarker::BYTES_TYPES, payload.len() as u64)?;
        self.inner.put_slice(payload);
        Ok(self)
    }

    pub fn write_string(&mut self, payload: &str) -> WriterResult<&mut Self> {
        self.write_length_marker(&TypeMarker::STRING_TYPES, payload.len() as u64)?;
        self.inner.put_slice(payload.as_bytes());
        Ok(self)
    }

    pub fn write_list_header(&mut self, length: usize) -> WriterResult<&mut Self> {
        self.write_length_marker(&TypeMarker::LIST_TYPES, length as u64)
    }

    /// Writes a list header followed by every element through `writer`.
    pub fn write_list<T, F>(&mut self, items: &[T], mut writer: F) -> WriterResult<&mut Self>
    where
        F: FnMut(&mut Self, &T) -> WriterResult<()>,
    {
        self.write_list_header(items.len())?;
        for item in items {
            writer(self, item)?;
        }
        Ok(self)
    }

    pub fn write_map_header(&mut self, length: usize) -> WriterResult<&mut Self> {
        self.write_length_marker(&TypeMarker::MAP_TYPES, length as u64)
    }

    /// Writes a map header followed by every entry, in insertion order.
    pub fn write_map<V, F>(&mut self, map: &OrderedMap<V>, mut writer: F) -> WriterResult<&mut Self>
    where
        F: FnMut(&mut Self, &V) -> WriterResult<()>,
    {
        self.write_map_header(map.len())?;
        for (key, value) in map.iter() {
            self.write_string(key)?;
            writer(self, value)?;
        }
        Ok(self)
    }

    pub fn write_struct_header(&mut self, header: StructHeader) -> WriterResult<&mut Self> {
        let max = LengthPrefix::Nibble.max_value();
        if header.length > max {
            return Err(WriterError::StructTooLarge {
                fields: header.length,
                max,
            });
        }
        self.write_length_marker(&TypeMarker::STRUCT_TYPES, header.length)?;
        self.inner.put_u8(header.tag);
        Ok(self)
    }

    pub fn write_struct(&mut self, value: &StructValue) -> WriterResult<&mut Self> {
        self.write_struct_header(StructHeader::new(value.fields.len() as u64, value.tag))?;
        for field in &value.fields {
            self.write_value(field)?;
        }
        Ok(self)
    }

    /// Writes any untyped value.
    pub fn write_value(&mut self, value: &Value) -> WriterResult<&mut Self> {
        match value {
            Value::Null => {
                self.write_null();
            }
            Value::Boolean(b) => {
                self.write_boolean(*b);
            }
            Value::Int(i) => {
                self.write_int(*i);
            }
            Value::Float(f) => {
                self.write_float(*f);
            }
            Value::Bytes(b) => {
                self.write_bytes(b)?;
            }
            Value::String(s) => {
                self.write_string(s)?;
            }
            Value::List(items) => {
                self.write_list(items, |buf, item| buf.write_value(item).map(drop))?;
            }
            Value::Map(map) => {
                self.write_map(map, |buf, item| buf.write_value(item).map(drop))?;
            }
            Value::Struct(s) => {
                self.write_struct(s)?;
            }
        }
        Ok(self)
    }
}
