//! Icon selection by category keyword.
//!
//! This table is independent of the layer keywords: it has hiking and
//! swimming buckets, and matches `bar`/`pub` after `restaurant`/`cafe`/`dining`.

use super::classifier::contains_any;

/// Icon bucket for a place.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Icon {
    Lodging,
    Restaurant,
    Bar,
    Hiking,
    Swimming,
    /// No category at all.
    Scenic,
    /// A category that matched nothing.
    Default,
}

/// Keyword groups in match order.
const ICON_KEYWORDS: &[(Icon, &[&str])] = &[
    (Icon::Lodging, &["hotel", "motel", "lodging"]),
    (Icon::Restaurant, &["restaurant", "cafe", "dining"]),
    (Icon::Bar, &["bar", "pub"]),
    (Icon::Hiking, &["hiking", "trail"]),
    (Icon::Swimming, &["swimming", "pool", "beach"]),
];

impl Icon {
    pub fn for_category(category: Option<&str>) -> Icon {
        let Some(category) = category.map(str::trim).filter(|c| !c.is_empty()) else {
            return Icon::Scenic;
        };
        let category = category.to_lowercase();

        ICON_KEYWORDS
            .iter()
            .find(|(_, keywords)| contains_any(&category, keywords))
            .map(|(icon, _)| *icon)
            .unwrap_or(Icon::Default)
    }

    /// Stock Google Earth palette icon.
    pub fn href(&self) -> &'static str {
        match self {
            Icon::Lodging => "http://maps.google.com/mapfiles/kml/pal4/icon57.png",
            Icon::Restaurant => "http://maps.google.com/mapfiles/kml/pal4/icon46.png",
            Icon::Bar => "http://maps.google.com/mapfiles/kml/pal4/icon7.png",
            Icon::Hiking => "http://maps.google.com/mapfiles/kml/pal4/icon13.png",
            Icon::Swimming => "http://maps.google.com/mapfiles/kml/pal4/icon61.png",
            Icon::Scenic => "http://maps.google.com/mapfiles/kml/pal4/icon38.png",
            Icon::Default => "http://maps.google.com/mapfiles/kml/pal4/icon49.png",
        }
    }
}
