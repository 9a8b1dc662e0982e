//! Row-local resolution errors. Every variant becomes a `Failure` record.

use thiserror::Error;

/// Why a row could not be turned into a place.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ResolveError {
    /// Neither coordinate columns nor a location URL.
    #[error("no URL")]
    MissingReference,

    /// A URL shape matched but its numeric tokens did not parse.
    #[error("unparseable coordinates")]
    UnparseableCoordinates,

    /// The place link was fetched but neither its final URL nor its body
    /// carried coordinates.
    #[error("could not extract coordinates from URL")]
    NoCoordinates,

    #[error("invalid coordinates {lat},{lon}")]
    OutOfRangeCoordinates { lat: f64, lon: f64 },

    /// The short-link fetch failed. Never retried.
    #[error("redirect/scrape failed: {0}")]
    NetworkResolutionFailure(String),

    /// A coordinate column held a non-numeric value and there was no URL to fall back on.
    #[error("malformed row: {0}")]
    MalformedRow(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_failure_reasons() {
        assert_eq!(ResolveError::MissingReference.to_string(), "no URL");
        assert_eq!(
            ResolveError::NoCoordinates.to_string(),
            "could not extract coordinates from URL"
        );
        assert_eq!(
            ResolveError::OutOfRangeCoordinates { lat: 91.5, lon: 0.0 }.to_string(),
            "invalid coordinates 91.5,0"
        );
    }
}
