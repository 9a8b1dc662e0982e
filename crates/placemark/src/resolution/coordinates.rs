//! Numeric extraction for each statically parseable URL shape.

use super::error::ResolveError;
use super::url_shape::UrlShape;
use crate::place::LatLon;

/// Longitude after `!4d` is read from at most this many characters.
const PLACE_DATA_LON_WINDOW: usize = 20;

/// Parse a single decimal-degree token.
pub fn parse_coordinate(token: &str) -> Option<f64> {
    token.trim().parse::<f64>().ok()
}

/// Extract coordinates from a URL whose shape carries them inline.
///
/// Returns `None` for shapes that need the network or are unrecognized.
pub fn extract_inline(shape: UrlShape, url: &str) -> Option<Result<LatLon, ResolveError>> {
    match shape {
        UrlShape::DroppedPin => Some(from_dropped_pin(url)),
        UrlShape::PlaceData => Some(from_place_data(url)),
        UrlShape::AtCoordinates => Some(from_at_sign(url)),
        UrlShape::PlaceLink | UrlShape::Unrecognized => None,
    }
}

/// `.../maps/search/<lat>,<lon>`
pub fn from_dropped_pin(url: &str) -> Result<LatLon, ResolveError> {
    let tail = url
        .rsplit_once("maps/search/")
        .map(|(_, rest)| rest)
        .ok_or(ResolveError::UnparseableCoordinates)?;
    leading_pair(tail)
}

/// `...!3d<lat>!4d<lon>[!...]`
pub fn from_place_data(url: &str) -> Result<LatLon, ResolveError> {
    let lat_start = url.find("!3d").ok_or(ResolveError::UnparseableCoordinates)? + 3;
    let lat_end = url[lat_start..]
        .find("!4d")
        .map(|i| lat_start + i)
        .ok_or(ResolveError::UnparseableCoordinates)?;

    let lon_window: String = url[lat_end + 3..]
        .chars()
        .take(PLACE_DATA_LON_WINDOW)
        .collect();
    let lon_token = lon_window.split('!').next().unwrap_or_default();

    parse_pair(&url[lat_start..lat_end], lon_token)
}

/// `...@<lat>,<lon>[,<zoom>...]`, read after the last `@`.
pub fn from_at_sign(url: &str) -> Result<LatLon, ResolveError> {
    let tail = url
        .rsplit_once('@')
        .map(|(_, rest)| rest)
        .ok_or(ResolveError::UnparseableCoordinates)?;
    leading_pair(tail)
}

/// First two comma-separated tokens as latitude, longitude.
fn leading_pair(text: &str) -> Result<LatLon, ResolveError> {
    let mut tokens = text.split(',');
    match (tokens.next(), tokens.next()) {
        (Some(lat), Some(lon)) => parse_pair(lat, lon),
        _ => Err(ResolveError::UnparseableCoordinates),
    }
}

fn parse_pair(lat: &str, lon: &str) -> Result<LatLon, ResolveError> {
    match (parse_coordinate(lat), parse_coordinate(lon)) {
        (Some(lat), Some(lon)) => Ok(LatLon::new(lat, lon)),
        _ => Err(ResolveError::UnparseableCoordinates),
    }
}
