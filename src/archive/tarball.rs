//! Tar backend, plain or compressed.
//!
//! Tar streams can't be read by name, so every regular entry is loaded into
//! a [`MemoryArchive`] up front.

use flate2::read::GzDecoder;
use std::io::Read;
use tar::Archive as TarArchive;
use xz2::read::XzDecoder;

use super::MemoryArchive;
use crate::Error;

/// Tar compression.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TarKind {
    Plain,
    Gzip,
    Xz,
}

pub(super) fn read_tar(bytes: &[u8], kind: TarKind) -> Result<MemoryArchive, Error> {
    let mut archive = MemoryArchive::new();
    let collected = match kind {
        TarKind::Plain => collect_tar_entries(&mut TarArchive::new(bytes), &mut archive),
        TarKind::Gzip => {
            collect_tar_entries(&mut TarArchive::new(GzDecoder::new(bytes)), &mut archive)
        }
        TarKind::Xz => {
            collect_tar_entries(&mut TarArchive::new(XzDecoder::new(bytes)), &mut archive)
        }
    };
    // anything wrong inside the stream means the archive itself is broken
    collected.map_err(|e| Error::CorruptArchive(format!("{:?} tar: {}", kind, e)))?;
    log::debug!("read {:?} tar with {} entries", kind, archive.len());
    Ok(archive)
}

fn collect_tar_entries<R: Read>(
    archive: &mut TarArchive<R>,
    files: &mut MemoryArchive,
) -> std::io::Result<()> {
    for entry in archive.entries()? {
        let mut entry = entry?;
        if entry.header().entry_type().is_file() {
            let path = entry.path()?.to_string_lossy().to_string();
            let mut bytes = Vec::with_capacity(entry.size() as usize);
            entry.read_to_end(&mut bytes)?;
            files.insert(path, bytes);
        }
    }
    Ok(())
}
