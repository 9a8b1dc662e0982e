//! Turn one input row into a place, trying strategies in a fixed order.
//!
//! 1. Explicit latitude/longitude columns.
//! 2. Coordinates embedded in the location URL (shape decides the parser).
//! 3. For bare place links, one fetch of the link and a scan of the result.
//!
//! The first strategy that applies decides the outcome. Every error ends up
//! as a [`Failure`]; nothing here panics on bad input.

use super::coordinates::{extract_inline, parse_coordinate};
use super::error::ResolveError;
use super::page_scraper;
use super::url_shape::classify_url;
use crate::acquisition::PageFetcher;
use crate::place::types::{first_field, LATITUDE_KEYS, LONGITUDE_KEYS, NAME_KEYS, URL_KEYS};
use crate::place::{Failure, LatLon, Place, RawRow};
use std::sync::Arc;
use tracing::debug;

/// Coordinates plus whatever else the winning strategy learned.
#[derive(Debug, Clone, PartialEq)]
pub struct Located {
    pub point: LatLon,
    pub category: Option<String>,
    pub source_url: Option<String>,
}

impl Located {
    fn at(point: LatLon, source_url: Option<&str>) -> Self {
        Self {
            point,
            category: None,
            source_url: source_url.map(String::from),
        }
    }
}

/// Resolves rows to places. Short links are fetched exactly once per row.
pub struct CoordinateResolver {
    fetcher: Arc<dyn PageFetcher>,
}

impl CoordinateResolver {
    pub fn new(fetcher: Arc<dyn PageFetcher>) -> Self {
        Self { fetcher }
    }

    /// Resolve `row` to a validated place, or the failure explaining why not.
    pub async fn resolve(&self, row: &RawRow) -> Result<Place, Failure> {
        let name = first_field(row, NAME_KEYS).unwrap_or_default();

        let outcome = self
            .locate(row)
            .await
            .and_then(|located| build_place(name, located, row));

        outcome.map_err(|e| {
            debug!("row {name:?} failed: {e}");
            Failure::from_row(row, &e)
        })
    }

    /// Find raw coordinates for `row`. No range check is applied here.
    pub async fn locate(&self, row: &RawRow) -> Result<Located, ResolveError> {
        let url = first_field(row, URL_KEYS);

        let lat_raw = first_field(row, LATITUDE_KEYS);
        let lon_raw = first_field(row, LONGITUDE_KEYS);
        if let (Some(lat), Some(lon)) = (
            lat_raw.and_then(parse_coordinate),
            lon_raw.and_then(parse_coordinate),
        ) {
            debug!("coordinates from columns: {lat},{lon}");
            return Ok(Located::at(LatLon::new(lat, lon), url));
        }

        let Some(url) = url else {
            return Err(match non_numeric_column(lat_raw, lon_raw) {
                Some(detail) => ResolveError::MalformedRow(detail),
                None => ResolveError::MissingReference,
            });
        };

        let shape = classify_url(url);
        debug!("url shape {shape:?} for {url}");

        if let Some(extracted) = extract_inline(shape, url) {
            return extracted.map(|point| Located::at(point, Some(url)));
        }

        if shape.needs_network() {
            self.follow_place_link(url).await
        } else {
            Err(ResolveError::UnparseableCoordinates)
        }
    }

    /// Fetch a place link once and scan the final URL and body.
    async fn follow_place_link(&self, url: &str) -> Result<Located, ResolveError> {
        let resp = self
            .fetcher
            .fetch(url)
            .await
            .map_err(|e| ResolveError::NetworkResolutionFailure(e.to_string()))?;

        debug!(
            "place link {url} resolved to {} (status {})",
            resp.final_url, resp.status
        );

        let scraped = page_scraper::scrape(&resp.final_url, &resp.body);
        match scraped.coordinates {
            Some(Ok(point)) => Ok(Located {
                point,
                category: scraped.category,
                source_url: Some(resp.final_url),
            }),
            Some(Err(e)) => Err(e),
            None => Err(ResolveError::NoCoordinates),
        }
    }
}

fn build_place(name: &str, located: Located, row: &RawRow) -> Result<Place, ResolveError> {
    let mut place = Place::at(name, located.point)?.with_row_fields(row);
    place.source_url = located.source_url;
    place.category = located.category;
    Ok(place)
}

/// Describe a coordinate column that is present but not a number.
fn non_numeric_column(lat: Option<&str>, lon: Option<&str>) -> Option<String> {
    [("latitude", lat), ("longitude", lon)]
        .into_iter()
        .find_map(|(label, value)| {
            value
                .filter(|v| parse_coordinate(v).is_none())
                .map(|v| format!("{label} {v:?} is not a number"))
        })
}
