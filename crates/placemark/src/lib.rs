//! Convert Google Maps saved-place exports (CSV, or a ZIP of CSVs) into
//! layered KML/KMZ documents.
//!
//! Each row is resolved to coordinates by [`resolution::CoordinateResolver`],
//! optionally reverse-geocoded by [`acquisition::Geocoder`], classified into
//! a [`layers::Layer`] and rendered by [`document::DocumentBuilder`].
//! [`pipeline::Pipeline`] wires these together for one run.

pub mod acquisition;
pub mod cli;
pub mod config;
pub mod document;
pub mod input;
pub mod layers;
pub mod logging;
pub mod pipeline;
pub mod place;
pub mod resolution;

pub use pipeline::{Pipeline, PipelineOptions};
pub use place::{Failure, LatLon, Place, RawRow};
