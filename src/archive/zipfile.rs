//! Zip backend.

use std::io::{Cursor, Read};
use zip::ZipArchive;

use super::SubtitleArchive;
use crate::Error;

/// A zip archive read from memory.
pub struct ZipSubtitleArchive {
    archive: ZipArchive<Cursor<Vec<u8>>>,
}

impl ZipSubtitleArchive {
    pub fn new(bytes: Vec<u8>) -> Result<Self, Error> {
        let archive = ZipArchive::new(Cursor::new(bytes))?;
        log::debug!("opened zip with {} entries", archive.len());
        Ok(Self { archive })
    }
}

impl SubtitleArchive for ZipSubtitleArchive {
    fn namelist(&self) -> Vec<String> {
        self.archive
            .file_names()
            .filter(|name| !name.ends_with('/'))
            .map(String::from)
            .collect()
    }

    fn read(&mut self, name: &str) -> Result<Vec<u8>, Error> {
        let mut entry = self.archive.by_name(name)?;
        let mut bytes = Vec::with_capacity(entry.size() as usize);
        entry.read_to_end(&mut bytes)?;
        Ok(bytes)
    }
}
