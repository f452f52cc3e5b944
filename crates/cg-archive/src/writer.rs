//! ZIP store writer.

use crate::crc32::crc32;
use crate::error::{ArchiveError, Result};
use crate::naming::resolve_names;
use byteorder::{LittleEndian, WriteBytesExt};
use cg_core::NamedPayload;
use std::io::Write;
use tracing::info;

pub const LOCAL_HEADER_SIGNATURE: u32 = 0x0403_4B50;
pub const CENTRAL_HEADER_SIGNATURE: u32 = 0x0201_4B50;
pub const END_RECORD_SIGNATURE: u32 = 0x0605_4B50;

/// Version 1.0: no extra features.
pub const VERSION: u16 = 10;
pub const METHOD_STORED: u16 = 0;

pub const LOCAL_HEADER_LEN: usize = 30;
pub const CENTRAL_HEADER_LEN: usize = 46;
pub const END_RECORD_LEN: usize = 22;

/// One entry after validation, with its assigned local header offset.
#[derive(Debug, Clone)]
struct ArchiveEntry<'a> {
    name: Vec<u8>,
    content: &'a [u8],
    crc: u32,
    size: u32,
    offset: u32,
}

/// Lay out entries in one left-to-right pass, assigning offsets and checking
/// every field fits its on-disk width. Nothing is written on failure.
fn plan<'a>(payloads: &'a [NamedPayload]) -> Result<(Vec<ArchiveEntry<'a>>, u32, u32)> {
    if payloads.len() > usize::from(u16::MAX) {
        return Err(ArchiveError::TooManyEntries(payloads.len()));
    }

    let names = resolve_names(payloads.iter().map(|p| p.name.as_str()));
    let mut entries = Vec::with_capacity(payloads.len());
    let mut offset: u64 = 0;
    let mut directory_len: u64 = 0;

    for (index, (payload, name)) in payloads.iter().zip(names).enumerate() {
        if name.is_empty() {
            return Err(ArchiveError::EmptyName { index });
        }
        let name = name.into_bytes();
        if name.len() > usize::from(u16::MAX) {
            return Err(ArchiveError::NameTooLong { len: name.len() });
        }
        let size = u32::try_from(payload.bytes.len()).map_err(|_| ArchiveError::EntryTooLarge {
            name: payload.name.clone(),
            size: payload.bytes.len(),
        })?;
        let entry_offset = u32::try_from(offset).map_err(|_| ArchiveError::ArchiveTooLarge)?;

        offset += (LOCAL_HEADER_LEN + name.len()) as u64 + u64::from(size);
        directory_len += (CENTRAL_HEADER_LEN + name.len()) as u64;

        entries.push(ArchiveEntry {
            crc: crc32(&payload.bytes),
            content: &payload.bytes,
            name,
            size,
            offset: entry_offset,
        });
    }

    let directory_offset = u32::try_from(offset).map_err(|_| ArchiveError::ArchiveTooLarge)?;
    let directory_len = u32::try_from(directory_len).map_err(|_| ArchiveError::ArchiveTooLarge)?;
    if u64::from(directory_offset) + u64::from(directory_len) + END_RECORD_LEN as u64 > u64::from(u32::MAX) {
        return Err(ArchiveError::ArchiveTooLarge);
    }
    Ok((entries, directory_offset, directory_len))
}

fn write_local_entry(out: &mut Vec<u8>, entry: &ArchiveEntry<'_>) -> Result<()> {
    out.write_u32::<LittleEndian>(LOCAL_HEADER_SIGNATURE)?;
    out.write_u16::<LittleEndian>(VERSION)?;
    out.write_u16::<LittleEndian>(0)?; // flags
    out.write_u16::<LittleEndian>(METHOD_STORED)?;
    out.write_u16::<LittleEndian>(0)?; // mod time
    out.write_u16::<LittleEndian>(0)?; // mod date
    out.write_u32::<LittleEndian>(entry.crc)?;
    out.write_u32::<LittleEndian>(entry.size)?; // compressed
    out.write_u32::<LittleEndian>(entry.size)?; // uncompressed
    out.write_u16::<LittleEndian>(entry.name.len() as u16)?;
    out.write_u16::<LittleEndian>(0)?; // extra
    out.write_all(&entry.name)?;
    out.write_all(entry.content)?;
    Ok(())
}

fn write_central_record(out: &mut Vec<u8>, entry: &ArchiveEntry<'_>) -> Result<()> {
    out.write_u32::<LittleEndian>(CENTRAL_HEADER_SIGNATURE)?;
    out.write_u16::<LittleEndian>(VERSION)?; // made by
    out.write_u16::<LittleEndian>(VERSION)?; // needed
    out.write_u16::<LittleEndian>(0)?; // flags
    out.write_u16::<LittleEndian>(METHOD_STORED)?;
    out.write_u16::<LittleEndian>(0)?; // mod time
    out.write_u16::<LittleEndian>(0)?; // mod date
    out.write_u32::<LittleEndian>(entry.crc)?;
    out.write_u32::<LittleEndian>(entry.size)?;
    out.write_u32::<LittleEndian>(entry.size)?;
    out.write_u16::<LittleEndian>(entry.name.len() as u16)?;
    out.write_u16::<LittleEndian>(0)?; // extra
    out.write_u16::<LittleEndian>(0)?; // comment
    out.write_u16::<LittleEndian>(0)?; // disk number start
    out.write_u16::<LittleEndian>(0)?; // internal attrs
    out.write_u32::<LittleEndian>(0)?; // external attrs
    out.write_u32::<LittleEndian>(entry.offset)?;
    out.write_all(&entry.name)?;
    Ok(())
}

fn write_end_record(out: &mut Vec<u8>, count: u16, directory_len: u32, directory_offset: u32) -> Result<()> {
    out.write_u32::<LittleEndian>(END_RECORD_SIGNATURE)?;
    out.write_u16::<LittleEndian>(0)?; // this disk
    out.write_u16::<LittleEndian>(0)?; // directory disk
    out.write_u16::<LittleEndian>(count)?; // entries on this disk
    out.write_u16::<LittleEndian>(count)?; // entries total
    out.write_u32::<LittleEndian>(directory_len)?;
    out.write_u32::<LittleEndian>(directory_offset)?;
    out.write_u16::<LittleEndian>(0)?; // comment
    Ok(())
}

/// Serialize payloads into a complete store-only archive. Names are
/// sanitized and de-duplicated first. Either the whole archive is returned or
/// an error; there is no partial output.
pub fn serialize_archive(payloads: &[NamedPayload]) -> Result<Vec<u8>> {
    let (entries, directory_offset, directory_len) = plan(payloads)?;

    let total = directory_offset as usize + directory_len as usize + END_RECORD_LEN;
    let mut out = Vec::with_capacity(total);

    for entry in &entries {
        debug_assert_eq!(out.len(), entry.offset as usize);
        write_local_entry(&mut out, entry)?;
    }
    debug_assert_eq!(out.len(), directory_offset as usize);
    for entry in &entries {
        write_central_record(&mut out, entry)?;
    }
    write_end_record(&mut out, entries.len() as u16, directory_len, directory_offset)?;

    info!(entries = entries.len(), bytes = out.len(), "archive serialized");
    Ok(out)
}

/// Builder that collects payloads before serializing them together.
#[derive(Debug, Clone, Default)]
pub struct ArchiveWriter {
    payloads: Vec<NamedPayload>,
}

impl ArchiveWriter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_file(&mut self, name: impl Into<String>, bytes: impl Into<Vec<u8>>) -> &mut Self {
        self.payloads.push(NamedPayload::new(name, bytes));
        self
    }

    pub fn add_payload(&mut self, payload: NamedPayload) -> &mut Self {
        self.payloads.push(payload);
        self
    }

    pub fn len(&self) -> usize {
        self.payloads.len()
    }

    pub fn is_empty(&self) -> bool {
        self.payloads.is_empty()
    }

    pub fn finish(&self) -> Result<Vec<u8>> {
        serialize_archive(&self.payloads)
    }
}
