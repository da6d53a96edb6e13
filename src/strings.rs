//! The string subsection: a count-prefixed offset+flags table followed
//! by zero-terminated, 4-byte-aligned string bodies.
//!
//! Only items carry this subsection. Failures here never abort the
//! surrounding item parse: a short count/table read yields zero
//! strings, and a bad individual entry yields an empty string in its
//! slot.

use std::io::{Read, Seek, SeekFrom};

use byteorder::{LittleEndian, ReadBytesExt};

/// Maximum number of bytes read for a single string body.
const STRING_SCRATCH_LIMIT: usize = 1024;
/// Strings are read in 4-byte-aligned chunks.
const STRING_CHUNK: usize = 4;
/// Padding skipped between the `indicator` word and the string body.
const STRING_BODY_PADDING: i64 = 4 * 6;

/// A single decoded string: owned bytes, declared length, and the
/// flags word carried alongside it in the offset table.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct XiString {
    /// Zero-terminated storage, `length + 1` bytes when non-empty.
    /// Empty for strings that failed to decode or were marked absent.
    data: Vec<u8>,
    /// Byte count excluding the terminator.
    length: usize,
    /// Flags word from the offset table entry.
    pub flags: u32,
}

impl XiString {
    fn empty(flags: u32) -> Self {
        Self {
            data: Vec::new(),
            length: 0,
            flags,
        }
    }

    /// The string's content, excluding the terminator.
    pub fn as_bytes(&self) -> &[u8] {
        if self.data.is_empty() {
            &[]
        } else {
            &self.data[..self.length]
        }
    }

    /// Declared byte length, excluding the terminator.
    pub fn len(&self) -> usize {
        self.length
    }

    pub fn is_empty(&self) -> bool {
        self.length == 0
    }

    /// Lossily decoded text, for display purposes.
    pub fn to_string_lossy(&self) -> std::borrow::Cow<'_, str> {
        String::from_utf8_lossy(self.as_bytes())
    }
}

/// Parses the string subsection at the reader's current position.
///
/// Offsets in the table are relative to the position the reader was at
/// when this function was called (the start of the subsection). Always
/// returns a `Vec`, even on failure: an empty `Vec` signals
/// "subsection unreadable".
pub fn read_string_subsection<R: Read + Seek>(r: &mut R) -> Vec<XiString> {
    let Ok(base) = r.stream_position() else {
        return Vec::new();
    };

    let Ok(num_strings) = r.read_u32::<LittleEndian>() else {
        return Vec::new();
    };

    // num_strings is an unvalidated word straight off the wire; growing
    // the table incrementally (rather than reserving it up front) keeps
    // a corrupted count from driving a multi-gigabyte allocation attempt.
    let mut table = Vec::new();
    for _ in 0..num_strings {
        let Ok(offset) = r.read_u32::<LittleEndian>() else {
            return Vec::new();
        };
        let Ok(flags) = r.read_u32::<LittleEndian>() else {
            return Vec::new();
        };
        table.push((offset, flags));
    }

    table
        .into_iter()
        .map(|(offset, flags)| read_one_string(r, base, offset, flags))
        .collect()
}

fn read_one_string<R: Read + Seek>(r: &mut R, base: u64, offset: u32, flags: u32) -> XiString {
    if r.seek(SeekFrom::Start(base + offset as u64)).is_err() {
        return XiString::empty(flags);
    }

    let Ok(indicator) = r.read_u32::<LittleEndian>() else {
        return XiString::empty(flags);
    };
    if indicator != 1 {
        return XiString::empty(flags);
    }

    if r.seek(SeekFrom::Current(STRING_BODY_PADDING)).is_err() {
        return XiString::empty(flags);
    }

    let Some((bytes, length)) = read_string_body(r) else {
        return XiString::empty(flags);
    };

    let mut data = bytes;
    data.truncate(length);
    data.push(0);
    XiString {
        data,
        length,
        flags,
    }
}

/// Reads a zero-terminated string body in 4-byte chunks, up to
/// [`STRING_SCRATCH_LIMIT`] bytes. Returns the non-terminator bytes
/// seen and their count.
fn read_string_body<R: Read>(r: &mut R) -> Option<(Vec<u8>, usize)> {
    let mut out = Vec::new();
    let mut chunk = [0u8; STRING_CHUNK];

    for _ in 0..(STRING_SCRATCH_LIMIT / STRING_CHUNK) {
        if r.read_exact(&mut chunk).is_err() {
            break;
        }
        let mut terminated = false;
        for &b in &chunk {
            if b == 0 {
                terminated = true;
                break;
            }
            out.push(b);
        }
        if terminated {
            break;
        }
    }

    let length = out.len();
    Some((out, length))
}
