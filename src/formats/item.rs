//! Item detection and parsing: the only record kind with a fixed,
//! whole-buffer rotation (5), a type/flag-discriminated subtype
//! payload, and a trailing string subsection.

use std::io::{Read, Seek, SeekFrom};

use byteorder::{LittleEndian, ReadBytesExt};

use crate::cipher;
use crate::record::{
    Armor, General, Item, ItemFlags, ItemPayload, ItemType, Puppet, TargetFlags, Usable, Weapon,
};
use crate::strings::read_string_subsection;

/// `id(u32) + flags/stack/type/resource/targets(5 * u16)`.
const HEADER_SIZE: usize = 4 + 2 * 5;
/// Fixed rotation applied to the whole buffer once an archive is
/// classified as Item.
pub const WHOLE_BUFFER_ROTATION: u8 = 5;
/// Slot size: header + subtype-payload region + string subsection,
/// measured from the start of each item's header to the next one's.
const SLOT_TAIL: usize = 0x202 + 0xA00 - 16;

/// `size >= HEADER_SIZE`; trial-decodes the header with the fixed
/// rotation and accepts if `id > 0` and `type != NONE`.
pub fn detect(data: &[u8]) -> bool {
    if data.len() < HEADER_SIZE {
        return false;
    }
    let mut head = [0u8; HEADER_SIZE];
    head.copy_from_slice(&data[..HEADER_SIZE]);
    cipher::decode(&mut head, WHOLE_BUFFER_ROTATION);

    let id = u32::from_le_bytes([head[0], head[1], head[2], head[3]]);
    let item_type = u16::from_le_bytes([head[8], head[9]]);
    id > 0 && !ItemType::from_raw(item_type).is_none()
}

/// Reads consecutive item slots. Expects the buffer to already be
/// decoded with [`WHOLE_BUFFER_ROTATION`] (the archive assembler does
/// this once, up front, rather than per slot).
pub fn parse<R: Read + Seek>(r: &mut R) -> Vec<Item> {
    let mut out = Vec::new();

    while let Some(item) = parse_one(r) {
        out.push(item);
    }

    out
}

fn parse_one<R: Read + Seek>(r: &mut R) -> Option<Item> {
    let id = r.read_u32::<LittleEndian>().ok()?;
    let flags = ItemFlags::from_bits_retain(r.read_u16::<LittleEndian>().ok()?);
    let stack = r.read_u16::<LittleEndian>().ok()?;
    let item_type = r.read_u16::<LittleEndian>().ok()?;
    let resource = r.read_u16::<LittleEndian>().ok()?;
    let targets = TargetFlags::from_bits_retain(r.read_u16::<LittleEndian>().ok()?);

    let header_end = r.stream_position().ok()?;
    let next = header_end + SLOT_TAIL as u64;

    let payload = read_payload(r, item_type, flags);
    let strings = read_string_subsection(r);

    // A failed seek back to the next slot boundary ends the loop: the
    // cursor is left wherever the partial read stranded it, and the
    // next `parse_one` header read will simply fail.
    let _ = r.seek(SeekFrom::Start(next));

    Some(Item {
        id,
        flags,
        stack,
        item_type,
        resource,
        targets,
        payload,
        strings,
    })
}

/// `type` is checked before `flags`, so a WEAPON/ARMOR/PUPPET/General-kind
/// item keeps its primary payload even if it also carries `USABLE`.
fn read_payload<R: Read>(r: &mut R, item_type: u16, flags: ItemFlags) -> ItemPayload {
    match ItemType::from_raw(item_type) {
        ItemType::Weapon => read_weapon(r).map(ItemPayload::Weapon),
        ItemType::Armor => read_armor(r).map(ItemPayload::Armor),
        ItemType::Puppet => read_puppet(r).map(ItemPayload::Puppet),
        ItemType::Furnishing | ItemType::Mannequin | ItemType::Flowerpot => {
            read_general(r).map(ItemPayload::General)
        }
        _ if flags.contains(ItemFlags::USABLE) => read_usable(r).map(ItemPayload::Usable),
        _ => None,
    }
    .unwrap_or(ItemPayload::None)
}

fn read_weapon<R: Read>(r: &mut R) -> Option<Weapon> {
    Some(Weapon {
        level: r.read_u16::<LittleEndian>().ok()?,
        slots: r.read_u16::<LittleEndian>().ok()?,
        races: r.read_u16::<LittleEndian>().ok()?,
        jobs: r.read_u32::<LittleEndian>().ok()?,
        damage: r.read_u16::<LittleEndian>().ok()?,
        delay: r.read_u16::<LittleEndian>().ok()?,
        dps: r.read_u16::<LittleEndian>().ok()?,
        skill: r.read_u8().ok()?,
        jug_size: r.read_u8().ok()?,
        unknown: r.read_u32::<LittleEndian>().ok()?,
        max_charges: r.read_u8().ok()?,
        casting_time: r.read_u8().ok()?,
        use_delay: r.read_u16::<LittleEndian>().ok()?,
        reuse_delay: r.read_u32::<LittleEndian>().ok()?,
        unknown2: r.read_u32::<LittleEndian>().ok()?,
    })
}

fn read_armor<R: Read>(r: &mut R) -> Option<Armor> {
    Some(Armor {
        level: r.read_u16::<LittleEndian>().ok()?,
        slots: r.read_u16::<LittleEndian>().ok()?,
        races: r.read_u16::<LittleEndian>().ok()?,
        jobs: r.read_u32::<LittleEndian>().ok()?,
        shield_size: r.read_u16::<LittleEndian>().ok()?,
        max_charges: r.read_u8().ok()?,
        casting_time: r.read_u8().ok()?,
        use_delay: r.read_u16::<LittleEndian>().ok()?,
        unknown: r.read_u16::<LittleEndian>().ok()?,
        reuse_delay: r.read_u32::<LittleEndian>().ok()?,
        unknown2: r.read_u32::<LittleEndian>().ok()?,
    })
}

fn read_puppet<R: Read>(r: &mut R) -> Option<Puppet> {
    Some(Puppet {
        slot: r.read_u16::<LittleEndian>().ok()?,
        element_charge: r.read_u32::<LittleEndian>().ok()?,
        unknown: r.read_u32::<LittleEndian>().ok()?,
    })
}

fn read_general<R: Read>(r: &mut R) -> Option<General> {
    Some(General {
        element: r.read_u16::<LittleEndian>().ok()?,
        storage_slots: r.read_u32::<LittleEndian>().ok()?,
    })
}

fn read_usable<R: Read>(r: &mut R) -> Option<Usable> {
    Some(Usable {
        activation_time: r.read_u16::<LittleEndian>().ok()?,
        unknown: r.read_u32::<LittleEndian>().ok()?,
        unknown2: r.read_u32::<LittleEndian>().ok()?,
    })
}
