//! Document assembly: KML markup, KMZ packing and writing the file set.

pub mod archive;
pub mod builder;
pub mod error;
pub mod kml;
pub mod writer;

pub use builder::{DocumentBuilder, DocumentOutput, KmlDocument, LayerDocument, RenderOptions};
pub use error::DocumentError;
pub use writer::{write_output, OutputFormat, WrittenFiles};
