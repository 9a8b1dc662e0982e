//! Row, place and failure records shared across the pipeline.

pub mod types;

pub use types::{Failure, LatLon, Place, RawRow};
