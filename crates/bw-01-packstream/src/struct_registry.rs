//! # Struct Registry
//!
//! Resolves a struct's tag byte to a typed reader. A registry is built once
//! (builder pattern) and then shared read-only between any number of
//! concurrent decode calls.
//!
//! Readers are plain function pointers stored in a fixed 256-slot table,
//! so a lookup is a single index operation. Protocol revisions that map
//! the same conceptual type to different tags (or different readers) get
//! their own registry, usually derived from a base one via
//! [`StructRegistry::to_builder`].

use crate::buf::PackstreamBuf;
use crate::error::ReaderError;
use std::fmt;

/// Header preceding the fields of every struct.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct StructHeader {
    /// Number of fields following the header
    pub length: u64,
    /// Tag selecting the struct type
    pub tag: u8,
}

impl StructHeader {
    pub fn new(length: u64, tag: u8) -> Self {
        Self { length, tag }
    }
}

/// Reader for one struct type.
///
/// Invoked with the header already consumed; must read exactly
/// `header.length` fields.
pub type StructReader<C, O, E = ReaderError> = fn(&C, &mut PackstreamBuf, StructHeader) -> Result<O, E>;

/// Immutable tag → reader table.
pub struct StructRegistry<C, O, E = ReaderError> {
    readers: [Option<StructReader<C, O, E>>; 256],
}

impl<C, O, E> StructRegistry<C, O, E>
where
    E: From<ReaderError>,
{
    pub fn builder() -> StructRegistryBuilder<C, O, E> {
        StructRegistryBuilder {
            readers: [None; 256],
        }
    }

    /// Starts a new builder pre-populated with this registry's readers.
    pub fn to_builder(&self) -> StructRegistryBuilder<C, O, E> {
        StructRegistryBuilder {
            readers: self.readers,
        }
    }

    pub fn lookup(&self, tag: u8) -> Option<StructReader<C, O, E>> {
        self.readers[tag as usize]
    }

    pub fn contains(&self, tag: u8) -> bool {
        self.readers[tag as usize].is_some()
    }

    /// Registered tags in ascending order.
    pub fn tags(&self) -> impl Iterator<Item = u8> + '_ {
        self.readers
            .iter()
            .enumerate()
            .filter(|(_, r)| r.is_some())
            .map(|(tag, _)| tag as u8)
    }

    /// Dispatches an already read header to its reader.
    ///
    /// Unknown tags fail with [`ReaderError::UnexpectedStruct`].
    pub fn read(&self, ctx: &C, buf: &mut PackstreamBuf, header: StructHeader) -> Result<O, E> {
        let reader = self.lookup(header.tag).ok_or(ReaderError::UnexpectedStruct {
            tag: header.tag,
            length: header.length,
        })?;
        reader(ctx, buf, header)
    }
}

impl<C, O, E> Clone for StructRegistry<C, O, E> {
    fn clone(&self) -> Self {
        Self {
            readers: self.readers,
        }
    }
}

impl<C, O, E> fmt::Debug for StructRegistry<C, O, E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let tags: Vec<String> = self
            .readers
            .iter()
            .enumerate()
            .filter(|(_, r)| r.is_some())
            .map(|(tag, _)| format!("0x{tag:02X}"))
            .collect();
        f.debug_struct("StructRegistry").field("tags", &tags).finish()
    }
}

/// Builder for [`StructRegistry`].
pub struct StructRegistryBuilder<C, O, E = ReaderError> {
    readers: [Option<StructReader<C, O, E>>; 256],
}

impl<C, O, E> StructRegistryBuilder<C, O, E>
where
    E: From<ReaderError>,
{
    /// Registers (or replaces) the reader for `tag`.
    pub fn register(mut self, tag: u8, reader: StructReader<C, O, E>) -> Self {
        self.readers[tag as usize] = Some(reader);
        self
    }

    pub fn unregister(mut self, tag: u8) -> Self {
        self.readers[tag as usize] = None;
        self
    }

    pub fn build(self) -> StructRegistry<C, O, E> {
        StructRegistry {
            readers: self.readers,
        }
    }
}

impl PackstreamBuf {
    /// Reads a struct header and decodes the struct through `registry`.
    pub fn read_struct<C, O, E>(&mut self, ctx: &C, registry: &StructRegistry<C, O, E>) -> Result<O, E>
    where
        E: From<ReaderError>,
    {
        let header = self.read_struct_header()?;
        registry.read(ctx, self, header)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ReaderResult;

    #[derive(Debug, PartialEq)]
    enum Shape {
        Point(i64, i64),
        Label(String),
    }

    fn read_point(_: &(), buf: &mut PackstreamBuf, _: StructHeader) -> ReaderResult<Shape> {
        Ok(Shape::Point(buf.read_int()?, buf.read_int()?))
    }

    fn read_label(_: &(), buf: &mut PackstreamBuf, _: StructHeader) -> ReaderResult<Shape> {
        Ok(Shape::Label(buf.read_string()?))
    }

    fn read_label_upper(_: &(), buf: &mut PackstreamBuf, _: StructHeader) -> ReaderResult<Shape> {
        Ok(Shape::Label(buf.read_string()?.to_uppercase()))
    }

    fn registry() -> StructRegistry<(), Shape> {
        StructRegistry::builder()
            .register(0x50, read_point)
            .register(0x4C, read_label)
            .build()
    }

    #[test]
    fn test_dispatch_by_tag() {
        let mut buf = PackstreamBuf::new();
        buf.write_struct_header(StructHeader::new(2, 0x50)).unwrap();
        buf.write_int(3).write_int(-4);

        let shape = buf.read_struct(&(), &registry()).unwrap();
        assert_eq!(shape, Shape::Point(3, -4));
        assert!(buf.is_empty());
    }

    #[test]
    fn test_unknown_tag() {
        let mut buf = PackstreamBuf::new();
        buf.write_struct_header(StructHeader::new(0, 0x42)).unwrap();

        let err = buf.read_struct(&(), &registry()).unwrap_err();
        assert_eq!(err, ReaderError::UnexpectedStruct { tag: 0x42, length: 0 });
    }

    #[test]
    fn test_override_in_derived_registry() {
        let base = registry();
        let derived = base.to_builder().register(0x4C, read_label_upper).build();

        let mut buf = PackstreamBuf::new();
        buf.write_struct_header(StructHeader::new(1, 0x4C)).unwrap();
        buf.write_string("neo").unwrap();
        let mut copy = buf.clone();

        assert_eq!(buf.read_struct(&(), &base).unwrap(), Shape::Label("neo".into()));
        assert_eq!(copy.read_struct(&(), &derived).unwrap(), Shape::Label("NEO".into()));
    }

    #[test]
    fn test_tags_listing() {
        let registry = registry().to_builder().unregister(0x50).build();
        assert_eq!(registry.tags().collect::<Vec<_>>(), vec![0x4C]);
        assert!(!registry.contains(0x50));
    }
}
