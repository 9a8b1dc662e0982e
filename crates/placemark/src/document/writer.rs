//! Write a finished document set to disk.
//!
//! Layout for an output path `out/trip.kmz`:
//!
//! ```text
//! out/trip.kmz
//! out/layers/trip_sleep.kml
//! out/layers/trip_sleep.kmz
//! out/layers/trip_eat.kml
//! ...
//! ```
//!
//! Layer files are always written in both encodings.

use super::builder::DocumentOutput;
use super::error::DocumentError;
use serde::Serialize;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::debug;

/// Directory, next to the aggregate file, that holds per-layer files.
pub const LAYERS_DIR: &str = "layers";

/// Encoding of the aggregate document.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    Kml,
    Kmz,
}

impl OutputFormat {
    pub fn extension(&self) -> &'static str {
        match self {
            OutputFormat::Kml => "kml",
            OutputFormat::Kmz => "kmz",
        }
    }
}

/// Paths written for one document set.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct WrittenFiles {
    pub aggregate: PathBuf,
    pub layers: Vec<PathBuf>,
}

/// Write the aggregate to `path` and layer files under `<dir>/layers/`.
pub fn write_output(
    output: &DocumentOutput,
    path: &Path,
    format: OutputFormat,
) -> Result<WrittenFiles, DocumentError> {
    let dir = path.parent().unwrap_or_else(|| Path::new(""));
    if !dir.as_os_str().is_empty() {
        fs::create_dir_all(dir)?;
    }

    match format {
        OutputFormat::Kml => fs::write(path, output.aggregate.as_bytes())?,
        OutputFormat::Kmz => fs::write(path, output.aggregate.to_kmz()?)?,
    }
    debug!("wrote {}", path.display());

    let mut written = WrittenFiles {
        aggregate: path.to_path_buf(),
        layers: Vec::new(),
    };
    if output.layers.is_empty() {
        return Ok(written);
    }

    let layers_dir = dir.join(LAYERS_DIR);
    fs::create_dir_all(&layers_dir)?;
    let base = path
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_else(|| "places".to_string());

    for layer_doc in &output.layers {
        let stem = format!("{base}_{}", layer_doc.layer.slug());

        let kml_path = layers_dir.join(format!("{stem}.kml"));
        fs::write(&kml_path, layer_doc.document.as_bytes())?;

        let kmz_path = layers_dir.join(format!("{stem}.kmz"));
        fs::write(&kmz_path, layer_doc.document.to_kmz()?)?;

        debug!("wrote layer {} to {}", layer_doc.layer, kml_path.display());
        written.layers.push(kml_path);
        written.layers.push(kmz_path);
    }

    Ok(written)
}
