//! Spell detection and parsing.
//!
//! Same 0x400 per-frame framing and rotation discipline as abilities
//! (see `formats::ability`); the structured prefix and trailing skip
//! differ.

use std::io::SeekFrom;

use byteorder::{LittleEndian, ReadBytesExt};

use crate::cipher;
use crate::cursor::ByteCursor;
use crate::record::Spell;

pub const FRAME_SIZE: usize = 0x400;
/// `6 * u16 + 2 * u8 + level[24] + id(u16) + unknown(u8)
///   + jp_name[20] + en_name[20] + jp_description[128] + en_description[128]`
const PREFIX_SIZE: usize = 2 * 6 + 2 + 24 + 2 + 1 + 20 + 20 + 128 + 128;
const FRAME_SKIP: i64 = 0x2AF;

const EXPECTED_ELEMENT: u16 = 6;
const EXPECTED_TARGETS: u16 = 63;
const EXPECTED_SKILL: u16 = 32;

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
    let kind = u16::from_le_bytes([head[2], head[3]]);
    let element = u16::from_le_bytes([head[4], head[5]]);
    let targets = u16::from_le_bytes([head[6], head[7]]);
    let skill = u16::from_le_bytes([head[8], head[9]]);
    let mp_cost = u16::from_le_bytes([head[10], head[11]]);

    index == 0
        && kind == 0
        && element == EXPECTED_ELEMENT
        && targets == EXPECTED_TARGETS
        && skill == EXPECTED_SKILL
        && mp_cost == 0
}

/// Decodes and reads consecutive spell frames until a frame can't be
/// fully read.
pub fn parse(r: &mut ByteCursor<'_>) -> Vec<Spell> {
    let mut out = Vec::new();

    loop {
        if !decode_next_frame(r) {
            break;
        }

        let Some(spell) = read_prefix(r) else {
            break;
        };
        out.push(spell);

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

fn read_prefix(r: &mut ByteCursor<'_>) -> Option<Spell> {
    use std::io::Read;

    let index = r.read_u16::<LittleEndian>().ok()?;
    let kind = r.read_u16::<LittleEndian>().ok()?;
    let element = r.read_u16::<LittleEndian>().ok()?;
    let targets = r.read_u16::<LittleEndian>().ok()?;
    let skill = r.read_u16::<LittleEndian>().ok()?;
    let mp_cost = r.read_u16::<LittleEndian>().ok()?;
    let casting_time = r.read_u8().ok()?;
    let recast_delay = r.read_u8().ok()?;
    let mut level = [0u8; 24];
    r.read_exact(&mut level).ok()?;
    let id = r.read_u16::<LittleEndian>().ok()?;
    let unknown = r.read_u8().ok()?;
    let mut jp_name = [0u8; 20];
    r.read_exact(&mut jp_name).ok()?;
    let mut en_name = [0u8; 20];
    r.read_exact(&mut en_name).ok()?;
    let mut jp_description = [0u8; 128];
    r.read_exact(&mut jp_description).ok()?;
    let mut en_description = [0u8; 128];
    r.read_exact(&mut en_description).ok()?;

    Some(Spell {
        index,
        kind,
        element,
        targets,
        skill,
        mp_cost,
        casting_time,
        recast_delay,
        level,
        id,
        unknown,
        jp_name,
        en_name,
        jp_description,
        en_description,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_frame() -> Vec<u8> {
        let mut prefix = Vec::with_capacity(PREFIX_SIZE);
        prefix.extend_from_slice(&0u16.to_le_bytes()); // index
        prefix.extend_from_slice(&0u16.to_le_bytes()); // type
        prefix.extend_from_slice(&EXPECTED_ELEMENT.to_le_bytes());
        prefix.extend_from_slice(&EXPECTED_TARGETS.to_le_bytes());
        prefix.extend_from_slice(&EXPECTED_SKILL.to_le_bytes());
        prefix.extend_from_slice(&0u16.to_le_bytes()); // mp_cost
        prefix.push(4); // casting_time
        prefix.push(0); // recast_delay
        prefix.extend_from_slice(&[0xFFu8; 24]); // level
        prefix.extend_from_slice(&100u16.to_le_bytes()); // id
        prefix.push(0); // unknown
        prefix.extend_from_slice(&[0u8; 20]); // jp_name
        prefix.extend_from_slice(&[0u8; 20]); // en_name
        prefix.extend_from_slice(&[0u8; 128]); // jp_description
        prefix.extend_from_slice(&[0u8; 128]); // en_description
        assert_eq!(prefix.len(), PREFIX_SIZE);

        let mut frame = prefix;
        frame.resize(FRAME_SIZE, 0);
        frame
    }

    #[test]
    fn detects_plain_frame() {
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
        assert_eq!(records[0].element, EXPECTED_ELEMENT);
        assert_eq!(records[0].id, 100);
        assert_eq!(records[0].level[0], 0xFF);
    }
}
