//! Subtitle archives.
//!
//! Providers often ship subtitles zipped, sometimes a whole season per
//! archive. [`open_archive`] sniffs the container format from its magic
//! bytes and [`select`] picks the entry matching the wanted video.

mod select;
mod tarball;
mod zipfile;

pub use select::{select, EpisodeTarget};
pub use tarball::TarKind;
pub use zipfile::ZipSubtitleArchive;

use std::collections::BTreeMap;
use std::io;
use std::path::Path;

use crate::Error;

/// Read access to the entries of an archive.
pub trait SubtitleArchive {
    /// Paths of the regular file entries.
    fn namelist(&self) -> Vec<String>;

    /// Full contents of one entry.
    fn read(&mut self, name: &str) -> Result<Vec<u8>, Error>;
}

/// Entries held in memory, for tar streams and already-extracted archives.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MemoryArchive {
    entries: BTreeMap<String, Vec<u8>>,
}

impl MemoryArchive {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, name: impl Into<String>, bytes: Vec<u8>) {
        self.entries.insert(name.into(), bytes);
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl<N: Into<String>> FromIterator<(N, Vec<u8>)> for MemoryArchive {
    fn from_iter<I: IntoIterator<Item = (N, Vec<u8>)>>(iter: I) -> Self {
        Self {
            entries: iter.into_iter().map(|(n, b)| (n.into(), b)).collect(),
        }
    }
}

impl SubtitleArchive for MemoryArchive {
    fn namelist(&self) -> Vec<String> {
        self.entries.keys().cloned().collect()
    }

    fn read(&mut self, name: &str) -> Result<Vec<u8>, Error> {
        self.entries.get(name).cloned().ok_or_else(|| {
            Error::Io(io::Error::new(
                io::ErrorKind::NotFound,
                format!("no archive entry {name}"),
            ))
        })
    }
}

const ZIP_MAGIC: &[&[u8]] = &[b"PK\x03\x04", b"PK\x05\x06"];
const GZIP_MAGIC: &[u8] = &[0x1f, 0x8b];
const XZ_MAGIC: &[u8] = &[0xfd, b'7', b'z', b'X', b'Z', 0x00];
const RAR_MAGIC: &[u8] = b"Rar!\x1a\x07";
const SEVEN_ZIP_MAGIC: &[u8] = &[b'7', b'z', 0xbc, 0xaf, 0x27, 0x1c];
const USTAR_OFFSET: usize = 257;

/// Open an archive held in memory, picking the backend from its magic bytes.
///
/// Rar and 7z are recognised but not supported. Bytes matching no known
/// format are reported as corrupt.
pub fn open_archive(bytes: Vec<u8>) -> Result<Box<dyn SubtitleArchive>, Error> {
    if ZIP_MAGIC.iter().any(|magic| bytes.starts_with(magic)) {
        return Ok(Box::new(ZipSubtitleArchive::new(bytes)?));
    }
    if bytes.starts_with(GZIP_MAGIC) {
        return Ok(Box::new(tarball::read_tar(&bytes, TarKind::Gzip)?));
    }
    if bytes.starts_with(XZ_MAGIC) {
        return Ok(Box::new(tarball::read_tar(&bytes, TarKind::Xz)?));
    }
    if bytes.get(USTAR_OFFSET..USTAR_OFFSET + 5) == Some(b"ustar".as_slice()) {
        return Ok(Box::new(tarball::read_tar(&bytes, TarKind::Plain)?));
    }
    if bytes.starts_with(RAR_MAGIC) {
        return Err(Error::UnsupportedArchive("rar".to_string()));
    }
    if bytes.starts_with(SEVEN_ZIP_MAGIC) {
        return Err(Error::UnsupportedArchive("7z".to_string()));
    }
    Err(Error::CorruptArchive("unknown archive format".to_string()))
}

/// Hidden files and macOS resource forks.
pub fn is_hidden(name: &str) -> bool {
    let path = Path::new(name);
    let hidden_file = path
        .file_name()
        .and_then(|n| n.to_str())
        .is_some_and(|n| n.starts_with('.'));
    hidden_file || path.components().any(|c| c.as_os_str() == "__MACOSX")
}
