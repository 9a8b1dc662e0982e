//! Command-line surface for the `placemark` binary.

pub mod convert_cmd;
pub mod output;
pub mod progress;
