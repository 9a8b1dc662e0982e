//! Core record types: raw input rows, resolved places and failures.

use crate::resolution::error::ResolveError;
use serde::Serialize;
use std::collections::BTreeMap;

/// One input record: column name -> cell value, as exported.
pub type RawRow = BTreeMap<String, String>;

/// Latitude columns, highest priority first.
pub const LATITUDE_KEYS: &[&str] = &["Latitude", "latitude", "lat"];
/// Longitude columns, highest priority first.
pub const LONGITUDE_KEYS: &[&str] = &["Longitude", "longitude", "lon", "lng"];
/// Location-reference URL columns.
pub const URL_KEYS: &[&str] = &["URL", "Google Maps URL"];
/// Display name columns.
pub const NAME_KEYS: &[&str] = &["Title", "Name"];
/// Free-text note columns.
pub const NOTE_KEYS: &[&str] = &["Note", "Description"];

/// Return the first non-blank value found under `keys`, in order.
pub fn first_field<'a>(row: &'a RawRow, keys: &[&str]) -> Option<&'a str> {
    keys.iter()
        .filter_map(|k| row.get(*k))
        .map(|v| v.trim())
        .find(|v| !v.is_empty())
}

/// Columns consumed by resolution; everything else is passed through.
fn is_consumed_key(key: &str) -> bool {
    LATITUDE_KEYS
        .iter()
        .chain(LONGITUDE_KEYS)
        .chain(URL_KEYS)
        .chain(NAME_KEYS)
        .chain(NOTE_KEYS)
        .any(|k| *k == key)
}

/// A coordinate pair in decimal degrees.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LatLon {
    pub lat: f64,
    pub lon: f64,
}

impl LatLon {
    pub fn new(lat: f64, lon: f64) -> Self {
        Self { lat, lon }
    }

    /// Whether the pair lies within `[-90,90] x [-180,180]`.
    ///
    /// NaN in either component is out of range.
    pub fn in_range(&self) -> bool {
        (-90.0..=90.0).contains(&self.lat) && (-180.0..=180.0).contains(&self.lon)
    }

    /// Reject pairs outside the valid range.
    pub fn validate(self) -> Result<Self, ResolveError> {
        if self.in_range() {
            Ok(self)
        } else {
            Err(ResolveError::OutOfRangeCoordinates {
                lat: self.lat,
                lon: self.lon,
            })
        }
    }

    /// Geocode cache key: both components rounded to 5 decimals (~1.1 m).
    pub fn cache_key(&self) -> String {
        format!("{:.5},{:.5}", self.lat, self.lon)
    }

    /// KML `coordinates` text: longitude first, zero altitude.
    pub fn kml_coordinates(&self) -> String {
        format!("{},{},0", self.lon, self.lat)
    }
}

/// A row resolved to valid coordinates, ready for rendering.
#[derive(Debug, Clone, PartialEq)]
pub struct Place {
    pub name: String,
    pub latitude: f64,
    pub longitude: f64,
    pub source_url: Option<String>,
    pub note: Option<String>,
    /// Free-text place type, e.g. "Hotel" or "Italian restaurant".
    pub category: Option<String>,
    /// Reverse-geocoded address. May be empty when the geocoder had none.
    pub address: Option<String>,
    /// Original columns not consumed during resolution (phone, comments, ...).
    pub extra_raw: BTreeMap<String, String>,
}

impl Place {
    /// Build a place at `point`, rejecting out-of-range coordinates.
    pub fn at(name: impl Into<String>, point: LatLon) -> Result<Self, ResolveError> {
        let point = point.validate()?;
        Ok(Self {
            name: name.into(),
            latitude: point.lat,
            longitude: point.lon,
            source_url: None,
            note: None,
            category: None,
            address: None,
            extra_raw: BTreeMap::new(),
        })
    }

    /// Fill name, note and pass-through columns from the source row.
    pub fn with_row_fields(mut self, row: &RawRow) -> Self {
        if let Some(note) = first_field(row, NOTE_KEYS) {
            self.note = Some(note.to_string());
        }
        self.extra_raw = row
            .iter()
            .filter(|(k, _)| !is_consumed_key(k))
            .map(|(k, v)| (k.clone(), v.clone()))
            .collect();
        self
    }

    pub fn point(&self) -> LatLon {
        LatLon::new(self.latitude, self.longitude)
    }

    /// Phone number from the pass-through columns, matched case-insensitively.
    pub fn phone(&self) -> Option<&str> {
        self.extra_raw
            .iter()
            .find(|(k, v)| k.eq_ignore_ascii_case("phone") && !v.trim().is_empty())
            .map(|(_, v)| v.as_str())
    }
}

/// A row that could not be resolved. Kept for reporting only.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Failure {
    pub subject_name: String,
    pub source_url: Option<String>,
    pub reason: String,
}

impl Failure {
    /// Record `error` against the row it came from.
    pub fn from_row(row: &RawRow, error: &ResolveError) -> Self {
        Self {
            subject_name: first_field(row, NAME_KEYS).unwrap_or("Unknown").to_string(),
            source_url: first_field(row, URL_KEYS).map(String::from),
            reason: error.to_string(),
        }
    }
}
