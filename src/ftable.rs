//! The ftable/vtable index reader: a trivial pairing of two parallel
//! index files listing which archives exist on disk and under what id.

use std::io::Cursor;

use byteorder::{LittleEndian, ReadBytesExt};

/// One archive's slot in the index: its numeric id and whether the
/// archive it names actually exists on disk.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FtableEntry {
    pub id: u16,
    pub exist: u8,
}

/// The decoded `{id, exist}` pairing for every archive slot.
#[derive(Debug, Clone, Default)]
pub struct Ftable {
    entries: Vec<FtableEntry>,
}

impl Ftable {
    /// Reads `u16` ids from `ftable_bytes` and paired `u8` existence
    /// flags from `vtable_bytes`, stopping when `ftable_bytes` is
    /// exhausted. A `vtable` that runs out first leaves `exist = 0`
    /// for the remaining entries.
    pub fn load_from_bytes(ftable_bytes: &[u8], vtable_bytes: &[u8]) -> Self {
        let mut f = Cursor::new(ftable_bytes);
        let mut v = Cursor::new(vtable_bytes);

        let mut entries = Vec::new();
        while let Ok(id) = f.read_u16::<LittleEndian>() {
            let exist = v.read_u8().unwrap_or(0);
            entries.push(FtableEntry { id, exist });
        }

        Self { entries }
    }

    pub fn entries(&self) -> &[FtableEntry] {
        &self.entries
    }

    pub fn into_entries(self) -> Vec<FtableEntry> {
        self.entries
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pairs_parallel_streams() {
        let ftable: Vec<u8> = [1u16, 2, 3]
            .iter()
            .flat_map(|id| id.to_le_bytes())
            .collect();
        let vtable = vec![1u8, 0, 1];

        let table = Ftable::load_from_bytes(&ftable, &vtable);
        assert_eq!(
            table.entries(),
            &[
                FtableEntry { id: 1, exist: 1 },
                FtableEntry { id: 2, exist: 0 },
                FtableEntry { id: 3, exist: 1 },
            ]
        );
    }

    #[test]
    fn short_vtable_leaves_remaining_absent() {
        let ftable: Vec<u8> = [1u16, 2].iter().flat_map(|id| id.to_le_bytes()).collect();
        let vtable = vec![1u8]; // only one entry

        let table = Ftable::load_from_bytes(&ftable, &vtable);
        assert_eq!(
            table.entries(),
            &[
                FtableEntry { id: 1, exist: 1 },
                FtableEntry { id: 2, exist: 0 },
            ]
        );
    }

    #[test]
    fn empty_ftable_yields_no_entries() {
        let table = Ftable::load_from_bytes(&[], &[]);
        assert!(table.entries().is_empty());
    }
}
