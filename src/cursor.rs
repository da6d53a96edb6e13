//! A bounds-checked, seekable cursor over an owned byte buffer that can
//! also decode itself in place.
//!
//! Detection and record parsing both need a view that can (a) read
//! fixed-width little-endian integers and raw byte runs with
//! `byteorder`, in the style used throughout the archive-parsing crates
//! in this workspace's neighbourhood, and (b) mutate a window of its own
//! bytes with the rotating cipher immediately before reading through
//! it. [`std::io::Cursor`] gives us (a) for free via `Read`/`Seek`; (b)
//! needs direct slice access, so `ByteCursor` keeps the buffer borrowed
//! mutably and implements `Read`/`Seek` itself.

use std::io::{self, Read, Seek, SeekFrom};

use crate::cipher;
use crate::error::{Error, Result};

/// Cursor over a mutably-borrowed byte buffer.
pub struct ByteCursor<'a> {
    data: &'a mut [u8],
    pos: usize,
}

impl<'a> ByteCursor<'a> {
    pub fn new(data: &'a mut [u8]) -> Self {
        Self { data, pos: 0 }
    }

    pub fn len(&self) -> usize {
        self.data.len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    pub fn position(&self) -> usize {
        self.pos
    }

    pub fn remaining(&self) -> usize {
        self.data.len().saturating_sub(self.pos)
    }

    /// Borrows `len` bytes starting at the current position without
    /// advancing it, or `None` if that would run past the end.
    pub fn peek(&self, len: usize) -> Option<&[u8]> {
        let end = self.pos.checked_add(len)?;
        self.data.get(self.pos..end)
    }

    /// Applies [`cipher::decode`] to `data[start..start + len]`.
    ///
    /// Does not move the cursor's read position.
    pub fn decode_in_place(&mut self, start: usize, len: usize, n: u8) -> Result<()> {
        let end = start
            .checked_add(len)
            .filter(|&end| end <= self.data.len())
            .ok_or(Error::InputTooShort {
                needed: len,
                available: self.data.len().saturating_sub(start),
            })?;
        cipher::decode(&mut self.data[start..end], n);
        Ok(())
    }
}

impl Read for ByteCursor<'_> {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        if self.pos >= self.data.len() {
            return Ok(0);
        }
        let avail = self.data.len() - self.pos;
        let n = buf.len().min(avail);
        buf[..n].copy_from_slice(&self.data[self.pos..self.pos + n]);
        self.pos += n;
        Ok(n)
    }
}

impl Seek for ByteCursor<'_> {
    fn seek(&mut self, pos: SeekFrom) -> io::Result<u64> {
        let new_pos = match pos {
            SeekFrom::Start(p) => p as i64,
            SeekFrom::End(p) => self.data.len() as i64 + p,
            SeekFrom::Current(p) => self.pos as i64 + p,
        };
        if new_pos < 0 {
            return Err(io::Error::new(
                io::ErrorKind::InvalidInput,
                "seek to a negative position",
            ));
        }
        self.pos = new_pos as usize;
        Ok(self.pos as u64)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use byteorder::{LittleEndian, ReadBytesExt};

    #[test]
    fn read_exact_fails_cleanly_past_end() {
        let mut data = vec![1, 2, 3];
        let mut cursor = ByteCursor::new(&mut data);
        let mut buf = [0u8; 4];
        assert!(cursor.read_exact(&mut buf).is_err());
    }

    #[test]
    fn read_u16_little_endian() {
        let mut data = vec![0x34, 0x12];
        let mut cursor = ByteCursor::new(&mut data);
        assert_eq!(cursor.read_u16::<LittleEndian>().unwrap(), 0x1234);
    }

    #[test]
    fn decode_in_place_then_read() {
        let mut data = vec![0u8; 4];
        // Encode a known value, verify decode_in_place recovers it.
        let mut plain = [0xAA, 0x55, 0x0F, 0xF0];
        cipher::decode(&mut plain, 8 - 3); // pre-rotate by the inverse
        data.copy_from_slice(&plain);

        let mut cursor = ByteCursor::new(&mut data);
        cursor.decode_in_place(0, 4, 3).unwrap();
        let mut out = [0u8; 4];
        cursor.read_exact(&mut out).unwrap();
        assert_eq!(out, [0xAA, 0x55, 0x0F, 0xF0]);
    }

    #[test]
    fn seek_current_and_peek() {
        let mut data = vec![1, 2, 3, 4, 5];
        let mut cursor = ByteCursor::new(&mut data);
        cursor.seek(SeekFrom::Current(2)).unwrap();
        assert_eq!(cursor.peek(2), Some(&[3u8, 4u8][..]));
        assert_eq!(cursor.peek(10), None);
    }

    #[test]
    fn read_past_end_after_over_seek_yields_eof_not_panic() {
        let mut data = vec![1, 2, 3];
        let mut cursor = ByteCursor::new(&mut data);
        cursor.seek(SeekFrom::Start(1000)).unwrap();
        let mut buf = [0u8; 8];
        assert_eq!(cursor.read(&mut buf).unwrap(), 0);
    }
}
