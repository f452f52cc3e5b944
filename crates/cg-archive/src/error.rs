use thiserror::Error;

#[derive(Error, Debug)]
pub enum ArchiveError {
    #[error("Entry {index} has an empty name")]
    EmptyName { index: usize },
    #[error("Entry name too long: {len} bytes")]
    NameTooLong { len: usize },
    #[error("Entry {name} too large: {size} bytes")]
    EntryTooLarge { name: String, size: usize },
    #[error("Too many entries: {0}")]
    TooManyEntries(usize),
    #[error("Archive exceeds 4 GiB")]
    ArchiveTooLarge,
    #[error("Malformed archive: {0}")]
    Malformed(String),
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, ArchiveError>;
