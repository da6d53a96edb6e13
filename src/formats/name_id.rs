//! NameId detection and parsing.
//!
//! Unencrypted, no framing: a flat run of `{name[28], id: u32}` pairs
//! with the sentinel `"none"` + 28 zero bytes conventionally first.

use std::io::Read;

use byteorder::{LittleEndian, ReadBytesExt};

use crate::record::NameId;

const SENTINEL_LEN: usize = 32;

/// `size >= 32` and the first 32 bytes are `"none"` followed by 28
/// zero bytes.
pub fn detect(data: &[u8]) -> bool {
    if data.len() < SENTINEL_LEN {
        return false;
    }
    let head = &data[..SENTINEL_LEN];
    head[..4] == *b"none" && head[4..].iter().all(|&b| b == 0)
}

/// Reads `{name[28], id: u32}` records until a read fails (typically
/// end-of-buffer, possibly a short trailing tail).
pub fn parse<R: Read>(r: &mut R) -> Vec<NameId> {
    let mut out = Vec::new();
    loop {
        let mut name = [0u8; 28];
        if r.read_exact(&mut name).is_err() {
            break;
        }
        let Ok(id) = r.read_u32::<LittleEndian>() else {
            break;
        };
        out.push(NameId { name, id });
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    fn sentinel() -> Vec<u8> {
        let mut v = b"none".to_vec();
        v.extend(std::iter::repeat(0u8).take(28));
        v
    }

    #[test]
    fn detects_sentinel() {
        assert!(detect(&sentinel()));
    }

    #[test]
    fn rejects_short_or_mismatched() {
        assert!(!detect(&sentinel()[..31]));
        let mut bad = sentinel();
        bad[0] = b'x';
        assert!(!detect(&bad));
    }

    #[test]
    fn parses_sentinel_then_entries() {
        let mut buf = sentinel();
        buf.extend_from_slice(&0u32.to_le_bytes());

        let mut entry = b"Fire Crystal".to_vec();
        entry.resize(28, 0);
        buf.extend_from_slice(&entry);
        buf.extend_from_slice(&0x4090u32.to_le_bytes());

        let mut cursor = Cursor::new(buf);
        let records = parse(&mut cursor);
        assert_eq!(records.len(), 2);
        assert_eq!(records[0].name_str(), "none");
        assert_eq!(records[0].id, 0);
        assert_eq!(records[1].name_str(), "Fire Crystal");
        assert_eq!(records[1].id, 0x4090);
    }

    #[test]
    fn short_trailing_tail_is_ignored() {
        let mut buf = sentinel();
        buf.extend_from_slice(&0u32.to_le_bytes());
        buf.extend_from_slice(&[1, 2, 3]); // not enough for another record

        let mut cursor = Cursor::new(buf);
        let records = parse(&mut cursor);
        assert_eq!(records.len(), 1);
    }
}
