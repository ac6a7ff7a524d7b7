//! Streaming access to the gazetteer entry inside a zip archive.
//!
//! The entry is decompressed on the fly and handed out line by line, so the
//! multi-gigabyte dump never has to fit in memory or be extracted to disk.

use std::fs::File;
use std::io::{BufRead, BufReader, Read};
use std::iter::FusedIterator;
use std::path::{Path, PathBuf};

use tracing::{debug, info};
use zip::result::ZipError;
use zip::ZipArchive;

use crate::error::ArchiveError;

const READ_BUFFER_SIZE: usize = 1 << 20;

/// An opened gazetteer archive.
pub struct GazetteerArchive {
    path: PathBuf,
    archive: ZipArchive<BufReader<File>>,
}

impl GazetteerArchive {
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self, ArchiveError> {
        let path = path.as_ref().to_path_buf();

        let file = File::open(&path).map_err(|e| ArchiveError::Open {
            path: path.clone(),
            source: ZipError::from(e),
        })?;

        let archive =
            ZipArchive::new(BufReader::new(file)).map_err(|source| ArchiveError::Open {
                path: path.clone(),
                source,
            })?;

        debug!(
            "Opened archive {} with {} entries",
            path.display(),
            archive.len()
        );

        Ok(Self { path, archive })
    }

    /// Stream the named entry as lines.
    pub fn entry_lines(
        &mut self,
        entry: &str,
    ) -> Result<EntryLines<BufReader<impl Read + '_>>, ArchiveError> {
        let file = match self.archive.by_name(entry) {
            Ok(file) => file,
            Err(ZipError::FileNotFound) => {
                return Err(ArchiveError::EntryNotFound {
                    path: self.path.clone(),
                    entry: entry.to_string(),
                })
            }
            Err(source) => {
                return Err(ArchiveError::Open {
                    path: self.path.clone(),
                    source,
                })
            }
        };

        info!(
            "Streaming {} ({} bytes uncompressed) from {}",
            entry,
            file.size(),
            self.path.display()
        );

        Ok(EntryLines::new(BufReader::with_capacity(
            READ_BUFFER_SIZE,
            file,
        )))
    }
}

/// Line iterator over a buffered reader.
///
/// Lines are assembled across buffer refills, so a consumer never sees a
/// partial line. Invalid UTF-8 is replaced rather than rejected. Once the end
/// of the entry (or a read error) has been reported, the iterator stays done.
pub struct EntryLines<R> {
    reader: R,
    buf: Vec<u8>,
    done: bool,
}

impl<R: BufRead> EntryLines<R> {
    pub fn new(reader: R) -> Self {
        Self {
            reader,
            buf: Vec::with_capacity(512),
            done: false,
        }
    }
}

impl<R: BufRead> Iterator for EntryLines<R> {
    type Item = Result<String, ArchiveError>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.done {
            return None;
        }

        self.buf.clear();
        match self.reader.read_until(b'\n', &mut self.buf) {
            Ok(0) => {
                self.done = true;
                None
            }
            Ok(_) => {
                if self.buf.last() == Some(&b'\n') {
                    self.buf.pop();
                }
                if self.buf.last() == Some(&b'\r') {
                    self.buf.pop();
                }
                Some(Ok(String::from_utf8_lossy(&self.buf).into_owned()))
            }
            Err(e) => {
                self.done = true;
                Some(Err(ArchiveError::Read(e)))
            }
        }
    }
}

impl<R: BufRead> FusedIterator for EntryLines<R> {}
