//! The archive assembler: detect → optional whole-buffer decode →
//! parse → collect.

use tracing::{debug, trace};

use crate::cipher;
use crate::cursor::ByteCursor;
use crate::formats::{ability, item, name_id, spell};
use crate::record::Record;

/// A single decoded `.DAT` archive: a homogeneous, append-only
/// sequence of records in file-encounter order. The only exception is
/// the `Unknown` sentinel, which is always the archive's sole record.
#[derive(Debug, Clone, Default)]
pub struct Archive {
    records: Vec<Record>,
}

impl Archive {
    /// Detects the archive's record kind, decodes it as needed, and
    /// parses every record it contains.
    ///
    /// Mutates `bytes` in place when the detected kind has a fixed
    /// whole-buffer rotation (currently only Item); pass a private
    /// copy if the caller's buffer must stay untouched. Never fails:
    /// an archive whose kind can't be determined receives a single
    /// [`Record::Unknown`] rather than an error, matching the source
    /// contract that only allocation failure is fatal.
    pub fn load_from_bytes(bytes: &mut [u8]) -> Self {
        if name_id::detect(bytes) {
            debug!(kind = "name_id", "archive format detected");
            let mut cursor = ByteCursor::new(bytes);
            let records = name_id::parse(&mut cursor)
                .into_iter()
                .map(Record::NameId)
                .collect();
            return Self { records };
        }

        if ability::detect(bytes) {
            debug!(kind = "ability", "archive format detected");
            let mut cursor = ByteCursor::new(bytes);
            let records = ability::parse(&mut cursor)
                .into_iter()
                .map(Record::Ability)
                .collect();
            return Self { records };
        }

        if spell::detect(bytes) {
            debug!(kind = "spell", "archive format detected");
            let mut cursor = ByteCursor::new(bytes);
            let records = spell::parse(&mut cursor)
                .into_iter()
                .map(Record::Spell)
                .collect();
            return Self { records };
        }

        if item::detect(bytes) {
            debug!(kind = "item", "archive format detected");
            cipher::decode(bytes, item::WHOLE_BUFFER_ROTATION);
            let mut cursor = ByteCursor::new(bytes);
            let records = item::parse(&mut cursor)
                .into_iter()
                .map(Record::Item)
                .collect();
            return Self { records };
        }

        trace!("no known format detected, emitting Unknown record");
        Self {
            records: vec![Record::Unknown],
        }
    }

    /// The archive's records, in file-encounter order.
    pub fn records(&self) -> &[Record] {
        &self.records
    }

    pub fn into_records(self) -> Vec<Record> {
        self.records
    }
}

/// Maps an archive numeric id to its conventional on-disk path
/// (backslash-separated, matching the client's own path scheme).
pub fn archive_path_for_id(id: u16) -> String {
    format!("ROM\\{}\\{}.DAT", id >> 7, id & 0x7F)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::record::{ItemPayload, Record};

    #[test]
    fn path_for_id_matches_convention() {
        assert_eq!(archive_path_for_id(0), "ROM\\0\\0.DAT");
        assert_eq!(archive_path_for_id(0x4090), "ROM\\129\\16.DAT");
    }

    #[test]
    fn unknown_buffer_yields_single_unknown_record() {
        let mut data = vec![0x11u8; 64];
        let archive = Archive::load_from_bytes(&mut data);
        assert_eq!(archive.records().len(), 1);
        assert!(matches!(archive.records()[0], Record::Unknown));
    }

    #[test]
    fn name_id_archive_end_to_end() {
        let mut data = b"none".to_vec();
        data.extend(std::iter::repeat(0u8).take(28));
        data.extend_from_slice(&0u32.to_le_bytes());

        let mut name = b"Fire Crystal".to_vec();
        name.resize(28, 0);
        data.extend_from_slice(&name);
        data.extend_from_slice(&0x4090u32.to_le_bytes());

        let mut name2 = b"Ice Crystal".to_vec();
        name2.resize(28, 0);
        data.extend_from_slice(&name2);
        data.extend_from_slice(&0x4091u32.to_le_bytes());

        let archive = Archive::load_from_bytes(&mut data);
        assert_eq!(archive.records().len(), 3);
        for record in archive.records() {
            assert!(matches!(record, Record::NameId(_)));
        }
    }

    #[test]
    fn item_archive_decodes_whole_buffer_once() {
        let mut buf = Vec::new();
        buf.extend_from_slice(&0x1001u32.to_le_bytes());
        buf.extend_from_slice(&0u16.to_le_bytes()); // flags
        buf.extend_from_slice(&99u16.to_le_bytes()); // stack
        buf.extend_from_slice(&1u16.to_le_bytes()); // type = ITEM
        buf.extend_from_slice(&0u16.to_le_bytes()); // resource
        buf.extend_from_slice(&1u16.to_le_bytes()); // targets = SELF
        buf.extend_from_slice(&0u32.to_le_bytes()); // num_strings
        buf.resize(14 + 0x202 + 0xA00 - 16, 0);

        cipher::decode(&mut buf, 8 - item::WHOLE_BUFFER_ROTATION);

        let archive = Archive::load_from_bytes(&mut buf);
        assert_eq!(archive.records().len(), 1);
        match &archive.records()[0] {
            Record::Item(item) => {
                assert_eq!(item.id, 0x1001);
                assert_eq!(item.payload, ItemPayload::None);
            }
            other => panic!("expected Item, got {other:?}"),
        }
    }
}
