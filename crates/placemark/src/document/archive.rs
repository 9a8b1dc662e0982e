//! KMZ encoding: a zip archive holding a single `doc.kml` entry.

use super::error::DocumentError;
use std::io::{Cursor, Write};
use zip::write::SimpleFileOptions;
use zip::{CompressionMethod, ZipWriter};

/// Entry name KML viewers look for inside a KMZ.
pub const KMZ_ENTRY_NAME: &str = "doc.kml";

/// Deflate `kml` into a single-entry KMZ archive.
pub fn kmz_bytes(kml: &str) -> Result<Vec<u8>, DocumentError> {
    let mut zip = ZipWriter::new(Cursor::new(Vec::new()));
    let options = SimpleFileOptions::default().compression_method(CompressionMethod::Deflated);

    zip.start_file(KMZ_ENTRY_NAME, options)?;
    zip.write_all(kml.as_bytes())?;

    Ok(zip.finish()?.into_inner())
}
