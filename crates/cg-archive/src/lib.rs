//! Store-only ZIP archive serializer.
//!
//! Output layout: every local entry (header, name, raw bytes) in input order,
//! then one central-directory record per entry, then the end record. Entries
//! are never compressed; each carries a CRC-32 of its bytes.

pub mod crc32;
pub mod error;
pub mod naming;
pub mod reader;
pub mod writer;

pub use crc32::{crc32, Crc32};
pub use error::{ArchiveError, Result};
pub use naming::{numbered_name, resolve_names};
pub use reader::{read_directory, DirectoryEntry};
pub use writer::{serialize_archive, ArchiveWriter};
