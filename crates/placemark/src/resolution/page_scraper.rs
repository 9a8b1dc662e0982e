//! Scan a resolved short-link (final URL and page body) for coordinates and
//! a place category.

use super::coordinates::{from_at_sign, parse_coordinate};
use super::error::ResolveError;
use crate::place::LatLon;
use regex::Regex;
use std::sync::LazyLock;
use tracing::debug;

static JSON_LAT_LON_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#""latitude":([0-9.-]+),"longitude":([0-9.-]+)"#).unwrap()
});

static PLACE_DATA_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"!3d([0-9.-]+)!4d([0-9.-]+)").unwrap());

static VIEWPORT_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"@([0-9.-]+),([0-9.-]+),").unwrap());

static CENTER_PARAM_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"center=([0-9.-]+)%2C([0-9.-]+)").unwrap());

static CATEGORY_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#""featureTypeDescription":"([^"]+)"|"([^"]+)"\s*:\s*"Point Of Interest""#)
        .unwrap()
});

/// Body patterns, tried in order.
static BODY_PATTERNS: LazyLock<[(&'static str, &'static Regex); 4]> = LazyLock::new(|| {
    [
        ("json", &*JSON_LAT_LON_RE),
        ("place_data", &*PLACE_DATA_RE),
        ("viewport", &*VIEWPORT_RE),
        ("center", &*CENTER_PARAM_RE),
    ]
});

/// What a fetched page yielded.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ScrapeResult {
    /// `None` when no strategy matched.
    pub coordinates: Option<Result<LatLon, ResolveError>>,
    pub category: Option<String>,
}

/// Scan the final URL first, then the body.
///
/// The final URL is only used when it carries a parseable `@lat,lon` pair;
/// otherwise the body patterns are tried and the first regex match wins. The
/// category scan is independent of how the coordinates were found.
pub fn scrape(final_url: &str, body: &str) -> ScrapeResult {
    let coordinates = match coordinates_in_final_url(final_url) {
        Some(point) => Some(Ok(point)),
        None => coordinates_in_body(body),
    };

    ScrapeResult {
        coordinates,
        category: category_in_body(body),
    }
}

/// `@lat,lon,` in the post-redirect URL. Parse failures fall through to the body.
pub fn coordinates_in_final_url(final_url: &str) -> Option<LatLon> {
    if !final_url.contains('@') {
        return None;
    }
    let point = from_at_sign(final_url).ok()?;
    debug!("coordinates from redirected URL: {},{}", point.lat, point.lon);
    Some(point)
}

/// First matching body pattern. A match whose numbers do not parse is
/// reported as unparseable rather than skipped.
pub fn coordinates_in_body(body: &str) -> Option<Result<LatLon, ResolveError>> {
    for (label, re) in BODY_PATTERNS.iter() {
        let Some(caps) = re.captures(body) else {
            continue;
        };
        let lat = caps.get(1).and_then(|m| parse_coordinate(m.as_str()));
        let lon = caps.get(2).and_then(|m| parse_coordinate(m.as_str()));
        return Some(match (lat, lon) {
            (Some(lat), Some(lon)) => {
                debug!("coordinates from page body ({label}): {lat},{lon}");
                Ok(LatLon::new(lat, lon))
            }
            _ => Err(ResolveError::UnparseableCoordinates),
        });
    }
    None
}

/// Place type from `featureTypeDescription`, or the key whose value is
/// `"Point Of Interest"`.
pub fn category_in_body(body: &str) -> Option<String> {
    let caps = CATEGORY_RE.captures(body)?;
    let category = caps
        .get(1)
        .or_else(|| caps.get(2))
        .map(|m| m.as_str().to_string())?;
    debug!("place type from page body: {category}");
    Some(category)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_final_url_wins_over_body() {
        let result = scrape(
            "https://www.google.com/maps/place/X/@10.5,20.25,17z/data=abc",
            r#"{"latitude":1.0,"longitude":2.0}"#,
        );
        assert_eq!(result.coordinates, Some(Ok(LatLon::new(10.5, 20.25))));
    }

    #[test]
    fn test_body_pattern_order() {
        // JSON form is tried before the data blob.
        let body = r#"... !3d5.5!4d6.5 ... "latitude":1.25,"longitude":-2.5 ..."#;
        assert_eq!(coordinates_in_body(body), Some(Ok(LatLon::new(1.25, -2.5))));

        let body = "window.APP_INIT=[null,'/maps/@7.5,8.5,12z'] center=1%2C2";
        assert_eq!(coordinates_in_body(body), Some(Ok(LatLon::new(7.5, 8.5))));

        let body = "<img src=\"https://maps.example/staticmap?center=51.5007%2C-0.1246&zoom=15\">";
        assert_eq!(coordinates_in_body(body), Some(Ok(LatLon::new(51.5007, -0.1246))));
    }

    #[test]
    fn test_unparseable_final_url_falls_back_to_body() {
        let result = scrape(
            "https://consent.example.com/?continue=x@y",
            "foo !3d48.8583701!4d2.2944813 bar",
        );
        assert_eq!(result.coordinates, Some(Ok(LatLon::new(48.8583701, 2.2944813))));
    }

    #[test]
    fn test_matched_but_unparseable_body() {
        let body = r#""latitude":1.2.3,"longitude":4"#;
        assert_eq!(
            coordinates_in_body(body),
            Some(Err(ResolveError::UnparseableCoordinates))
        );
    }

    #[test]
    fn test_nothing_found() {
        let result = scrape("https://www.google.com/maps/place/X", "<html></html>");
        assert_eq!(result, ScrapeResult::default());
    }

    #[test]
    fn test_category_extraction() {
        let body = r#"{"name":"Hotel Lux","featureTypeDescription":"Hotel"}"#;
        assert_eq!(category_in_body(body).as_deref(), Some("Hotel"));

        let body = r#"["Scenic lookout" : "Point Of Interest"]"#;
        assert_eq!(category_in_body(body).as_deref(), Some("Scenic lookout"));

        assert_eq!(category_in_body("{}"), None);
    }

    #[test]
    fn test_category_scanned_even_when_url_has_coordinates() {
        let result = scrape(
            "https://www.google.com/maps/place/X/@1.0,2.0,15z",
            r#""featureTypeDescription":"Italian restaurant""#,
        );
        assert_eq!(result.coordinates, Some(Ok(LatLon::new(1.0, 2.0))));
        assert_eq!(result.category.as_deref(), Some("Italian restaurant"));
    }
}
