//! Sequential writer with back-patching.
//!
//! [`PatchWriter`] is the write-side counterpart of
//! [`BinaryReader`](crate::BinaryReader): it tracks its own position, writes
//! little-endian primitives, pads to alignment boundaries, and can overwrite
//! a previously written 32-bit field without disturbing the write cursor.

use std::io::{Read, Seek, SeekFrom, Write};

use byteorder::{LittleEndian, WriteBytesExt};

use crate::{align_up, Error, Result};

/// A little-endian writer over a seekable stream.
///
/// # Example
///
/// ```
/// use std::io::Cursor;
/// use txpk_common::PatchWriter;
///
/// let mut writer = PatchWriter::new(Cursor::new(Vec::new())).unwrap();
/// writer.write_u32(0).unwrap();
/// writer.write_u8(1).unwrap();
/// writer.pad_to(8, 0xCC).unwrap();
/// writer.patch_u32(0, 0xDEADBEEF).unwrap();
///
/// let bytes = writer.into_inner().into_inner();
/// assert_eq!(bytes, [0xEF, 0xBE, 0xAD, 0xDE, 1, 0xCC, 0xCC, 0xCC]);
/// ```
#[derive(Debug)]
pub struct PatchWriter<W> {
    inner: W,
    position: u64,
}

impl<W: Write + Seek> PatchWriter<W> {
    /// Wrap a stream, starting at its current position.
    pub fn new(mut inner: W) -> Result<Self> {
        let position = inner.stream_position()?;
        Ok(Self { inner, position })
    }

    /// Current write position.
    #[inline]
    pub fn position(&self) -> u64 {
        self.position
    }

    /// Current write position as a 32-bit offset field value.
    pub fn position_u32(&self) -> Result<u32> {
        u32::try_from(self.position).map_err(|_| Error::OffsetOverflow(self.position))
    }

    /// Write raw bytes.
    pub fn write_bytes(&mut self, bytes: &[u8]) -> Result<()> {
        self.inner.write_all(bytes)?;
        self.position += bytes.len() as u64;
        Ok(())
    }

    /// Write a single byte.
    pub fn write_u8(&mut self, value: u8) -> Result<()> {
        self.inner.write_u8(value)?;
        self.position += 1;
        Ok(())
    }

    /// Write a little-endian u32.
    pub fn write_u32(&mut self, value: u32) -> Result<()> {
        self.inner.write_u32::<LittleEndian>(value)?;
        self.position += 4;
        Ok(())
    }

    /// Write `count` copies of `fill`.
    pub fn fill(&mut self, fill: u8, count: u64) -> Result<()> {
        std::io::copy(&mut std::io::repeat(fill).take(count), &mut self.inner)?;
        self.position += count;
        Ok(())
    }

    /// Pad with `fill` up to the next multiple of `align`.
    ///
    /// Returns the number of padding bytes written.
    pub fn pad_to(&mut self, align: u64, fill: u8) -> Result<u64> {
        let count = align_up(self.position, align) - self.position;
        self.fill(fill, count)?;
        Ok(count)
    }

    /// Overwrite a 32-bit field at `offset`, then return to the write cursor.
    pub fn patch_u32(&mut self, offset: u64, value: u32) -> Result<()> {
        self.inner.seek(SeekFrom::Start(offset))?;
        self.inner.write_u32::<LittleEndian>(value)?;
        self.inner.seek(SeekFrom::Start(self.position))?;
        Ok(())
    }

    /// Overwrite a 32-bit field at `offset` with the current write position.
    pub fn patch_with_position(&mut self, offset: u64) -> Result<()> {
        let value = self.position_u32()?;
        self.patch_u32(offset, value)
    }

    /// Flush the underlying stream.
    pub fn flush(&mut self) -> Result<()> {
        self.inner.flush()?;
        Ok(())
    }

    /// Consume the writer, returning the underlying stream.
    pub fn into_inner(self) -> W {
        self.inner
    }
}

#[cfg(test)]
mod tests {
    use std::io::Cursor;

    use super::*;

    fn writer() -> PatchWriter<Cursor<Vec<u8>>> {
        PatchWriter::new(Cursor::new(Vec::new())).unwrap()
    }

    #[test]
    fn test_little_endian_writes() {
        let mut w = writer();
        w.write_u8(0x01).unwrap();
        w.write_bytes(&[2, 3]).unwrap();
        w.write_u32(0x07060504).unwrap();
        assert_eq!(w.position(), 7);

        let bytes = w.into_inner().into_inner();
        assert_eq!(bytes, [1, 2, 3, 4, 5, 6, 7]);
    }

    #[test]
    fn test_pad_to_alignment() {
        let mut w = writer();
        w.write_bytes(&[1, 2, 3]).unwrap();
        assert_eq!(w.pad_to(16, 0xCC).unwrap(), 13);
        assert_eq!(w.position(), 16);
        // Already aligned: no padding.
        assert_eq!(w.pad_to(16, 0xCC).unwrap(), 0);

        let bytes = w.into_inner().into_inner();
        assert_eq!(bytes.len(), 16);
        assert!(bytes[3..].iter().all(|&b| b == 0xCC));
    }

    #[test]
    fn test_patch_keeps_cursor() {
        let mut w = writer();
        w.write_u32(0).unwrap();
        w.write_u32(0).unwrap();
        w.patch_with_position(0).unwrap();
        w.write_u8(0xAA).unwrap();
        assert_eq!(w.position(), 9);

        let bytes = w.into_inner().into_inner();
        assert_eq!(&bytes[..4], &8u32.to_le_bytes());
        assert_eq!(bytes[8], 0xAA);
    }

    #[test]
    fn test_starts_at_stream_position() {
        let mut cursor = Cursor::new(vec![0u8; 4]);
        cursor.set_position(4);
        let w = PatchWriter::new(cursor).unwrap();
        assert_eq!(w.position(), 4);
    }
}
