//! Ability detection and parsing.
//!
//! Abilities are packed into consecutive 0x400-byte frames, each
//! independently rotated: the rotation count is re-derived from that
//! frame's own (still-encrypted) bytes before every decode, including
//! the throwaway one detection performs on the buffer head.

use std::io::{Read, Seek, SeekFrom};

use byteorder::{LittleEndian, ReadBytesExt};

use crate::cipher;
use crate::cursor::ByteCursor;
use crate::record::Ability;

/// Total frame size; the structured prefix plus trailing pad/unknown.
pub const FRAME_SIZE: usize = 0x400;
/// Structured prefix size: `5 * u16 + name[32] + description[256]`.
const PREFIX_SIZE: usize = 2 * 5 + 32 + 256;
/// Bytes of pad/unknown following the prefix, bringing the frame to
/// [`FRAME_SIZE`].
const FRAME_SKIP: i64 = 0x2D6;

const EXPECTED_ICON_ID: u16 = 11776;

/// `size >= 0x400`; trial-decodes the first `PREFIX_SIZE` bytes and
/// checks the fixed sentinel fields.
pub fn detect(data: &[u8]) -> bool {
    if data.len() < FRAME_SIZE {
        return false;
    }
    let mut head = [0u8; PREFIX_SIZE];
    head.copy_from_slice(&data[..PREFIX_SIZE]);
    let n = cipher::variable_encryption_seed(&head);
    cipher::decode(&mut head, n);

    let index = u16::from_le_bytes([head[0], head[1]]);
    let icon_id = u16::from_le_bytes([head[2], head[3]]);
    let mp_cost = u16::from_le_bytes([head[4], head[5]]);
    let targets = u16::from_le_bytes([head[8], head[9]]);
    let name_first = head[10];
    let description_first = head[10 + 32];

    index == 0
        && icon_id == EXPECTED_ICON_ID
        && mp_cost == 0
        && targets == 1
        && name_first == b'.'
        && description_first == b'.'
}

/// Decodes and reads consecutive ability frames until a frame can't be
/// fully read, or fewer than [`FRAME_SIZE`] bytes remain.
///
/// Takes a [`ByteCursor`] rather than a generic `Read + Seek` because
/// each frame must be decoded in place immediately before it's read; a
/// plain `Read` impl only ever copies bytes out, never mutates its source.
pub fn parse(r: &mut ByteCursor<'_>) -> Vec<Ability> {
    let mut out = Vec::new();

    loop {
        if !decode_next_frame(r) {
            break;
        }

        let Some(ability) = read_prefix(r) else {
            break;
        };
        out.push(ability);

        if r.seek(SeekFrom::Current(FRAME_SKIP)).is_err() {
            break;
        }
    }

    out
}

fn decode_next_frame(r: &mut ByteCursor<'_>) -> bool {
    let Some(frame) = r.peek(FRAME_SIZE) else {
        return false;
    };
    let n = cipher::variable_encryption_seed(frame);
    let start = r.position();
    r.decode_in_place(start, FRAME_SIZE, n).is_ok()
}

fn read_prefix<R: Read>(r: &mut R) -> Option<Ability> {
    let index = r.read_u16::<LittleEndian>().ok()?;
    let icon_id = r.read_u16::<LittleEndian>().ok()?;
    let mp_cost = r.read_u16::<LittleEndian>().ok()?;
    let unknown = r.read_u16::<LittleEndian>().ok()?;
    let targets = r.read_u16::<LittleEndian>().ok()?;
    let mut name = [0u8; 32];
    r.read_exact(&mut name).ok()?;
    let mut description = [0u8; 256];
    r.read_exact(&mut description).ok()?;
    Some(Ability {
        index,
        icon_id,
        mp_cost,
        unknown,
        targets,
        name,
        description,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_frame() -> Vec<u8> {
        let mut prefix = Vec::with_capacity(PREFIX_SIZE);
        prefix.extend_from_slice(&0u16.to_le_bytes()); // index
        prefix.extend_from_slice(&EXPECTED_ICON_ID.to_le_bytes());
        prefix.extend_from_slice(&0u16.to_le_bytes()); // mp_cost
        prefix.extend_from_slice(&0u16.to_le_bytes()); // unknown
        prefix.extend_from_slice(&1u16.to_le_bytes()); // targets
        let mut name = b".".to_vec();
        name.resize(32, 0);
        prefix.extend_from_slice(&name);
        let mut description = b".".to_vec();
        description.resize(256, 0);
        prefix.extend_from_slice(&description);
        assert_eq!(prefix.len(), PREFIX_SIZE);

        let mut frame = prefix;
        frame.resize(FRAME_SIZE, 0);
        frame
    }

    #[test]
    fn detects_plain_frame() {
        // n=0 is a legal rotation (identity), so an unencrypted sample
        // frame is itself a valid detection fixture.
        assert!(detect(&sample_frame()));
    }

    #[test]
    fn rejects_too_short() {
        assert!(!detect(&sample_frame()[..0x3FF]));
    }

    #[test]
    fn parses_single_frame() {
        let mut frame = sample_frame();
        let mut cursor = ByteCursor::new(&mut frame);
        let records = parse(&mut cursor);
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].icon_id, EXPECTED_ICON_ID);
        assert_eq!(records[0].name[0], b'.');
        assert_eq!(records[0].description[0], b'.');
    }
}
