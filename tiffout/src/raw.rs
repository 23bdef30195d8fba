use std::io::{Cursor, Read, Seek, SeekFrom, Write};

use tiffout_common::byte_order::ByteOrder;
use tiffout_common::math::*;

/// Byte order aware cursor over a segment
#[derive(Debug, Clone)]
pub struct Raw<T> {
    pub byte_order: ByteOrder,
    buffer: Cursor<T>,
}

impl<T: AsRef<[u8]>> Raw<T> {
    pub fn new(buffer: T, byte_order: ByteOrder) -> Self {
        Self {
            byte_order,
            buffer: Cursor::new(buffer),
        }
    }

    pub fn len(&self) -> usize {
        self.buffer.get_ref().as_ref().len()
    }

    pub fn position(&self) -> Result<u32, MathError> {
        self.buffer.position().u32()
    }

    pub fn seek_start(&mut self, seek: impl ToU64) -> std::io::Result<()> {
        let seek = seek.u64().map_err(std::io::Error::other)?;
        self.buffer.seek(SeekFrom::Start(seek))?;

        Ok(())
    }

    pub fn read_exact<const N: usize>(&mut self) -> std::io::Result<[u8; N]> {
        let mut bytes: [u8; N] = [0; N];
        self.buffer.read_exact(&mut bytes)?;
        Ok(bytes)
    }

    pub fn read_u16(&mut self) -> std::io::Result<u16> {
        let bytes = self.read_exact()?;
        Ok(self.byte_order.u16(bytes))
    }

    pub fn read_u32(&mut self) -> std::io::Result<u32> {
        let bytes = self.read_exact()?;
        Ok(self.byte_order.u32(bytes))
    }

    /// Copies `len` bytes starting at `offset` without moving the cursor
    pub fn slice(&self, offset: u32, len: u32) -> Option<&[u8]> {
        let start = offset.usize().ok()?;
        let end = start.safe_add(len.usize().ok()?).ok()?;
        self.buffer.get_ref().as_ref().get(start..end)
    }
}

impl Raw<&mut [u8]> {
    pub fn write_all(&mut self, bytes: &[u8]) -> std::io::Result<()> {
        self.buffer.write_all(bytes)
    }

    pub fn write_u16(&mut self, value: u16) -> std::io::Result<()> {
        let bytes = self.byte_order.u16_bytes(value);
        self.write_all(&bytes)
    }

    pub fn write_u32(&mut self, value: u32) -> std::io::Result<()> {
        let bytes = self.byte_order.u32_bytes(value);
        self.write_all(&bytes)
    }
}
