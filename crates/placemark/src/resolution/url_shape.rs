//! Classify a location-reference URL by its structural shape.
//!
//! Classification only looks at markers in the URL text. Pulling numbers out
//! of a classified URL lives in [`super::coordinates`]; the first shape whose
//! marker is present wins even if its numbers later fail to parse.

/// Known URL shapes, in the order they are tested.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UrlShape {
    /// `.../maps/search/<lat>,<lon>` (a dropped pin).
    DroppedPin,
    /// `...!3d<lat>!4d<lon>...` embedded in a place data blob.
    PlaceData,
    /// `...@<lat>,<lon>,<zoom>...` viewport form.
    AtCoordinates,
    /// `.../maps/place/...` with no inline coordinates; needs a network round-trip.
    PlaceLink,
    /// None of the above.
    Unrecognized,
}

impl UrlShape {
    /// Whether coordinates can only be obtained over the network.
    pub fn needs_network(&self) -> bool {
        matches!(self, UrlShape::PlaceLink)
    }
}

/// Classify a URL. Marker checks are case-sensitive, like the URLs themselves.
pub fn classify_url(url: &str) -> UrlShape {
    if url.contains("maps/search/") {
        return UrlShape::DroppedPin;
    }

    if url.contains("!3d") && url.contains("!4d") {
        return UrlShape::PlaceData;
    }

    if url.contains('@') {
        return UrlShape::AtCoordinates;
    }

    if url.contains("maps/place/") {
        return UrlShape::PlaceLink;
    }

    UrlShape::Unrecognized
}
