//! Random-access container seam used by the scanner.
//!
//! `ArchiveSource` opens a path as an `Archive`; production code uses
//! `ZipSource` (jars are zip files). Tests substitute sources that count opens
//! or serve in-memory entries.

use crate::error::DetectError;
use std::fs::File;
use std::io::{self, BufReader, Read};
use std::path::Path;

/// An opened container whose entries can be listed and streamed by index.
pub trait Archive {
    /// Number of entries in listing order.
    fn len(&self) -> usize;

    /// Entry path at `index`, or `None` when the name is not valid UTF-8.
    fn entry_name(&self, index: usize) -> Option<&str>;

    /// Stream the decompressed contents of one entry.
    fn open_entry(&mut self, index: usize) -> io::Result<Box<dyn Read + '_>>;
}

/// Opens archives by path.
pub trait ArchiveSource {
    type Archive: Archive;

    fn open(&self, path: &Path) -> Result<Self::Archive, DetectError>;
}

/// Opens jar/zip files from disk.
#[derive(Clone, Copy, Debug, Default)]
pub struct ZipSource;

/// A zip container backed by a buffered file handle. Closed on drop.
pub struct ZipContainer {
    inner: zip::ZipArchive<BufReader<File>>,
}

impl ArchiveSource for ZipSource {
    type Archive = ZipContainer;

    fn open(&self, path: &Path) -> Result<ZipContainer, DetectError> {
        let file = File::open(path).map_err(|err| DetectError::unreadable(path, err))?;
        let inner = zip::ZipArchive::new(BufReader::new(file))
            .map_err(|err| DetectError::unreadable(path, err))?;
        Ok(ZipContainer { inner })
    }
}

impl Archive for ZipContainer {
    fn len(&self) -> usize {
        self.inner.len()
    }

    fn entry_name(&self, index: usize) -> Option<&str> {
        self.inner.name_for_index(index)
    }

    fn open_entry(&mut self, index: usize) -> io::Result<Box<dyn Read + '_>> {
        let entry = self.inner.by_index(index).map_err(io::Error::other)?;
        Ok(Box::new(entry))
    }
}
