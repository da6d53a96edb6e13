//! Decoder for a classic MMORPG client's `.DAT` game-data archives.
//!
//! An archive is a single unlabelled file holding a homogeneous run of
//! one of four record kinds (name/ID pairs, abilities, spells, or
//! items); some kinds are additionally obscured by a rotation cipher
//! whose rotation count is derived from the content itself rather than
//! from an external key. [`Archive::load_from_bytes`] detects the kind,
//! undoes the cipher where needed, and parses every record.
//!
//! A companion index format (ftable/vtable) lists which archives exist
//! on disk and under what numeric id; see [`ftable::Ftable`].

pub mod archive;
pub mod cipher;
pub mod cursor;
pub mod error;
pub mod formats;
pub mod ftable;
pub mod record;
pub mod strings;

pub use archive::{archive_path_for_id, Archive};
pub use error::{Error, Result};
pub use ftable::{Ftable, FtableEntry};
pub use record::Record;
pub use strings::XiString;
