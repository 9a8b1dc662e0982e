//! ZIP archives of CSV exports (e.g. a Takeout "Saved" folder).

use super::csv_rows::read_rows;
use super::InputError;
use crate::place::RawRow;
use std::fs::File;
use std::io::{Read, Seek};
use std::path::Path;
use tracing::debug;

/// One CSV found inside an archive.
#[derive(Debug, Clone)]
pub struct CsvEntry {
    /// Full entry name inside the archive.
    pub name: String,
    /// File name without directories or extension; names the output file.
    pub stem: String,
    pub rows: Vec<RawRow>,
}

/// A ZIP archive opened for its `.csv` entries.
///
/// Opening only scans entry names. Each CSV is parsed when it is asked for,
/// so a run holds at most one entry's rows at a time.
pub struct CsvArchive<R> {
    archive: zip::ZipArchive<R>,
    csv_indices: Vec<usize>,
}

impl CsvArchive<File> {
    pub fn open(path: &Path) -> Result<Self, InputError> {
        Self::new(File::open(path)?)
    }
}

impl<R: Read + Seek> CsvArchive<R> {
    pub fn new(reader: R) -> Result<Self, InputError> {
        let mut archive = zip::ZipArchive::new(reader)?;
        let mut csv_indices = Vec::new();
        for i in 0..archive.len() {
            let file = archive.by_index(i)?;
            if file.is_file() && file.name().to_lowercase().ends_with(".csv") {
                csv_indices.push(i);
            }
        }
        Ok(Self {
            archive,
            csv_indices,
        })
    }

    /// Number of CSV entries.
    pub fn len(&self) -> usize {
        self.csv_indices.len()
    }

    pub fn is_empty(&self) -> bool {
        self.csv_indices.is_empty()
    }

    /// Parse the `n`th CSV entry, counting in archive order.
    pub fn entry(&mut self, n: usize) -> Result<CsvEntry, InputError> {
        let index = self.csv_indices.get(n).copied().ok_or_else(|| {
            InputError::Io(std::io::Error::new(
                std::io::ErrorKind::NotFound,
                format!("no CSV entry #{n}"),
            ))
        })?;
        let file = self.archive.by_index(index)?;

        let name = file.name().to_string();
        let stem = Path::new(&name)
            .file_stem()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_else(|| name.clone());

        debug!("reading {name} from archive");
        let rows = read_rows(file)?;
        Ok(CsvEntry { name, stem, rows })
    }
}
