//! Central-directory reader for archives produced by this crate.

use crate::error::{ArchiveError, Result};
use crate::writer::{CENTRAL_HEADER_SIGNATURE, END_RECORD_LEN, END_RECORD_SIGNATURE};
use byteorder::{LittleEndian, ReadBytesExt};
use std::io::{Cursor, Read};

/// One central-directory record.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DirectoryEntry {
    pub name: String,
    pub version_made_by: u16,
    pub version_needed: u16,
    pub method: u16,
    pub crc: u32,
    pub compressed_size: u32,
    pub uncompressed_size: u32,
    pub local_header_offset: u32,
}

fn malformed(msg: impl Into<String>) -> ArchiveError {
    ArchiveError::Malformed(msg.into())
}

/// Parse the end record (assumed comment-free, at the very end) and the
/// directory it points at.
pub fn read_directory(bytes: &[u8]) -> Result<Vec<DirectoryEntry>> {
    if bytes.len() < END_RECORD_LEN {
        return Err(malformed("shorter than an end record"));
    }
    let mut end = Cursor::new(&bytes[bytes.len() - END_RECORD_LEN..]);
    if end.read_u32::<LittleEndian>()? != END_RECORD_SIGNATURE {
        return Err(malformed("missing end record"));
    }
    let _this_disk = end.read_u16::<LittleEndian>()?;
    let _dir_disk = end.read_u16::<LittleEndian>()?;
    let on_disk = end.read_u16::<LittleEndian>()?;
    let total = end.read_u16::<LittleEndian>()?;
    let dir_len = end.read_u32::<LittleEndian>()? as usize;
    let dir_offset = end.read_u32::<LittleEndian>()? as usize;
    if on_disk != total {
        return Err(malformed("entry counts disagree"));
    }
    if dir_offset + dir_len + END_RECORD_LEN != bytes.len() {
        return Err(malformed("directory bounds do not match archive length"));
    }

    let mut cur = Cursor::new(&bytes[dir_offset..dir_offset + dir_len]);
    let mut entries = Vec::with_capacity(total as usize);
    for _ in 0..total {
        if cur.read_u32::<LittleEndian>()? != CENTRAL_HEADER_SIGNATURE {
            return Err(malformed("bad central header signature"));
        }
        let version_made_by = cur.read_u16::<LittleEndian>()?;
        let version_needed = cur.read_u16::<LittleEndian>()?;
        let _flags = cur.read_u16::<LittleEndian>()?;
        let method = cur.read_u16::<LittleEndian>()?;
        let _time = cur.read_u16::<LittleEndian>()?;
        let _date = cur.read_u16::<LittleEndian>()?;
        let crc = cur.read_u32::<LittleEndian>()?;
        let compressed_size = cur.read_u32::<LittleEndian>()?;
        let uncompressed_size = cur.read_u32::<LittleEndian>()?;
        let name_len = cur.read_u16::<LittleEndian>()? as usize;
        let extra_len = cur.read_u16::<LittleEndian>()? as usize;
        let comment_len = cur.read_u16::<LittleEndian>()? as usize;
        let _disk = cur.read_u16::<LittleEndian>()?;
        let _internal = cur.read_u16::<LittleEndian>()?;
        let _external = cur.read_u32::<LittleEndian>()?;
        let local_header_offset = cur.read_u32::<LittleEndian>()?;

        let mut name = vec![0u8; name_len];
        cur.read_exact(&mut name)?;
        let skip = (extra_len + comment_len) as u64;
        cur.set_position(cur.position() + skip);

        entries.push(DirectoryEntry {
            name: String::from_utf8(name).map_err(|_| malformed("entry name is not UTF-8"))?,
            version_made_by,
            version_needed,
            method,
            crc,
            compressed_size,
            uncompressed_size,
            local_header_offset,
        });
    }
    if cur.position() as usize != dir_len {
        return Err(malformed("trailing bytes in directory"));
    }
    Ok(entries)
}
