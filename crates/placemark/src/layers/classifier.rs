//! Assign each place to one thematic layer from its category text.

use serde::Serialize;
use std::fmt;

/// Display label for places with no category.
pub const DEFAULT_CATEGORY_LABEL: &str = "Scenic spot";

const SLEEP_KEYWORDS: &[&str] = &["hotel", "motel", "lodging"];
const EAT_KEYWORDS: &[&str] = &["restaurant", "cafe", "bar", "pub", "dining"];

/// Thematic layer. Declaration order is output order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub enum Layer {
    Sleep,
    Eat,
    Do,
}

impl Layer {
    /// Pick the layer for a category. Total: unknown or missing categories land in `Do`.
    pub fn classify(category: Option<&str>) -> Layer {
        let category = category
            .map(str::trim)
            .filter(|c| !c.is_empty())
            .unwrap_or(DEFAULT_CATEGORY_LABEL)
            .to_lowercase();

        if contains_any(&category, SLEEP_KEYWORDS) {
            Layer::Sleep
        } else if contains_any(&category, EAT_KEYWORDS) {
            Layer::Eat
        } else {
            Layer::Do
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Layer::Sleep => "Sleep",
            Layer::Eat => "Eat",
            Layer::Do => "Do",
        }
    }

    pub fn description(&self) -> &'static str {
        match self {
            Layer::Sleep => "Hotels, motels and other lodging",
            Layer::Eat => "Restaurants, bars and cafes",
            Layer::Do => "Activities and other places",
        }
    }

    /// Lower-case suffix used in per-layer file names.
    pub fn slug(&self) -> &'static str {
        match self {
            Layer::Sleep => "sleep",
            Layer::Eat => "eat",
            Layer::Do => "do",
        }
    }
}

impl fmt::Display for Layer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

pub(crate) fn contains_any(haystack: &str, needles: &[&str]) -> bool {
    needles.iter().any(|n| haystack.contains(n))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_classify_keywords() {
        assert_eq!(Layer::classify(Some("Hotel")), Layer::Sleep);
        assert_eq!(Layer::classify(Some("Budget MOTEL")), Layer::Sleep);
        assert_eq!(Layer::classify(Some("Lodging")), Layer::Sleep);
        assert_eq!(Layer::classify(Some("Italian restaurant")), Layer::Eat);
        assert_eq!(Layer::classify(Some("Cafe")), Layer::Eat);
        assert_eq!(Layer::classify(Some("Cocktail bar")), Layer::Eat);
        assert_eq!(Layer::classify(Some("Irish pub")), Layer::Eat);
        assert_eq!(Layer::classify(Some("Fine dining")), Layer::Eat);
        assert_eq!(Layer::classify(Some("Hiking area")), Layer::Do);
        assert_eq!(Layer::classify(Some("Museum")), Layer::Do);
    }

    #[test]
    fn test_sleep_checked_before_eat() {
        assert_eq!(Layer::classify(Some("Hotel restaurant")), Layer::Sleep);
    }

    #[test]
    fn test_keywords_match_inside_words() {
        assert_eq!(Layer::classify(Some("Public pool")), Layer::Eat);
    }

    #[test]
    fn test_missing_category_is_do() {
        assert_eq!(Layer::classify(None), Layer::Do);
        assert_eq!(Layer::classify(Some("")), Layer::Do);
        assert_eq!(Layer::classify(Some("   ")), Layer::Do);
    }

    #[test]
    fn test_classify_is_deterministic() {
        for category in ["Hotel", "Bar", "Beach", ""] {
            let first = Layer::classify(Some(category));
            for _ in 0..5 {
                assert_eq!(Layer::classify(Some(category)), first);
            }
        }
    }

    #[test]
    fn test_layer_labels() {
        assert_eq!(Layer::Sleep.to_string(), "Sleep");
        assert_eq!(Layer::Eat.description(), "Restaurants, bars and cafes");
        assert_eq!(Layer::Do.slug(), "do");
    }
}
