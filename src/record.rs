//! The record kinds an archive can hold, and the item subtype payloads
//! nested inside [`Record::Item`].

use bitflags::bitflags;

use crate::strings::XiString;

/// One decoded entry from an archive.
///
/// An archive's records are homogeneous in kind except for the
/// [`Record::Unknown`] sentinel, which is always the archive's sole
/// record.
#[derive(Debug, Clone, PartialEq)]
pub enum Record {
    NameId(NameId),
    Ability(Ability),
    Spell(Spell),
    Item(Item),
    /// Emitted exactly once, alone, when no detector recognised the
    /// archive's contents.
    Unknown,
}

/// `name[28]` + `id: u32`. Unencrypted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NameId {
    /// Zero-padded to 28 bytes in the source; trailing zeros retained.
    pub name: [u8; 28],
    pub id: u32,
}

impl NameId {
    /// `name` with trailing zero padding trimmed, decoded lossily.
    pub fn name_str(&self) -> std::borrow::Cow<'_, str> {
        let end = self.name.iter().position(|&b| b == 0).unwrap_or(28);
        String::from_utf8_lossy(&self.name[..end])
    }
}

/// A job/weapon ability. One per 0x400-byte frame.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Ability {
    pub index: u16,
    pub icon_id: u16,
    pub mp_cost: u16,
    pub unknown: u16,
    pub targets: u16,
    pub name: [u8; 32],
    pub description: [u8; 256],
}

/// A magic spell. One per 0x400-byte frame.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Spell {
    pub index: u16,
    pub kind: u16,
    pub element: u16,
    pub targets: u16,
    pub skill: u16,
    pub mp_cost: u16,
    pub casting_time: u8,
    pub recast_delay: u8,
    /// One byte per job; `0xFF` where the spell isn't learnable.
    pub level: [u8; 24],
    pub id: u16,
    pub unknown: u8,
    pub jp_name: [u8; 20],
    pub en_name: [u8; 20],
    pub jp_description: [u8; 128],
    pub en_description: [u8; 128],
}

/// Item type discriminator (`struct xi_item::type` in the source format).
///
/// Values outside the known set are preserved as [`ItemType::Other`] so
/// that detection and dispatch logic never has to reject a valid-looking
/// header just because it names a kind this catalog doesn't model.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ItemType {
    None,
    Item,
    Quest,
    Fish,
    Weapon,
    Armor,
    Linkshell,
    Usable,
    Crystal,
    Furnishing,
    Plant,
    Flowerpot,
    Puppet,
    Mannequin,
    Book,
    Other(u16),
}

impl ItemType {
    pub fn from_raw(raw: u16) -> Self {
        match raw {
            0 => ItemType::None,
            1 => ItemType::Item,
            2 => ItemType::Quest,
            3 => ItemType::Fish,
            4 => ItemType::Weapon,
            5 => ItemType::Armor,
            6 => ItemType::Linkshell,
            7 => ItemType::Usable,
            8 => ItemType::Crystal,
            9 => ItemType::Furnishing,
            10 => ItemType::Plant,
            11 => ItemType::Flowerpot,
            12 => ItemType::Puppet,
            13 => ItemType::Mannequin,
            14 => ItemType::Book,
            other => ItemType::Other(other),
        }
    }

    pub fn is_none(&self) -> bool {
        matches!(self, ItemType::None)
    }
}

bitflags! {
    /// Item flag bits (`enum xi_item_flags` in the source format).
    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    pub struct ItemFlags: u16 {
        const UNKNOWN0 = 1 << 0;
        const UNKNOWN1 = 1 << 1;
        const UNKNOWN2 = 1 << 2;
        const UNKNOWN3 = 1 << 3;
        const UNKNOWN4 = 1 << 4;
        const INSCRIBABLE = 1 << 5;
        const UNSELLABLE_TO_AH = 1 << 6;
        const SCROLL = 1 << 7;
        const LINKSHELL = 1 << 8;
        const USABLE = 1 << 9;
        const TRADEABLE_TO_NPC = 1 << 10;
        const EQUIPABLE = 1 << 11;
        const UNSELLABLE_TO_NPC = 1 << 12;
        const MOGHOUSE_DENIED = 1 << 13;
        const UNTRADEABLE = 1 << 14;
        const RARE = 1 << 15;
        /// Combined mask (`XI_ITEM_EX` in the source format): unsellable
        /// to the AH, denied mog house storage, and untradeable.
        const EX = 0x6040;
    }
}

bitflags! {
    /// Valid-target bits (`enum xi_target_flags` in the source format).
    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    pub struct TargetFlags: u16 {
        const SELF = 1 << 0;
        const PLAYER = 1 << 1;
        const PARTY = 1 << 2;
        const ALLIANCE = 1 << 3;
        const NPC = 1 << 4;
        const ENEMY = 1 << 5;
        const UNKNOWN = 1 << 6;
        const CORPSE = 1 << 7;
    }
}

/// The item subtype payload. `type` is checked before `flags`, so a
/// WEAPON/ARMOR/PUPPET/General-kind item keeps its primary payload even
/// if it also carries the `USABLE` flag.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ItemPayload {
    None,
    Weapon(Weapon),
    Armor(Armor),
    Puppet(Puppet),
    General(General),
    Usable(Usable),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Weapon {
    pub level: u16,
    pub slots: u16,
    pub races: u16,
    pub jobs: u32,
    pub damage: u16,
    pub delay: u16,
    pub dps: u16,
    pub skill: u8,
    pub jug_size: u8,
    pub unknown: u32,
    pub max_charges: u8,
    pub casting_time: u8,
    pub use_delay: u16,
    pub reuse_delay: u32,
    pub unknown2: u32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Armor {
    pub level: u16,
    pub slots: u16,
    pub races: u16,
    pub jobs: u32,
    pub shield_size: u16,
    pub max_charges: u8,
    pub casting_time: u8,
    pub use_delay: u16,
    pub unknown: u16,
    pub reuse_delay: u32,
    pub unknown2: u32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Puppet {
    pub slot: u16,
    pub element_charge: u32,
    pub unknown: u32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct General {
    pub element: u16,
    pub storage_slots: u32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Usable {
    pub activation_time: u16,
    pub unknown: u32,
    pub unknown2: u32,
}

/// An inventory item: header, type-discriminated subtype payload, and
/// a string subsection.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Item {
    pub id: u32,
    pub flags: ItemFlags,
    pub stack: u16,
    pub item_type: u16,
    pub resource: u16,
    pub targets: TargetFlags,
    pub payload: ItemPayload,
    pub strings: Vec<XiString>,
}

impl Item {
    /// The [`ItemType`] this item's raw `item_type` field names.
    pub fn item_type(&self) -> ItemType {
        ItemType::from_raw(self.item_type)
    }
}
