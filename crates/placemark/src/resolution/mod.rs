//! Coordinate resolution: URL shapes, per-shape parsers, page scraping and
//! the ordered strategy chain that ties them together.

pub mod coordinates;
pub mod error;
pub mod page_scraper;
pub mod resolver;
pub mod url_shape;

pub use error::ResolveError;
pub use resolver::{CoordinateResolver, Located};
pub use url_shape::{classify_url, UrlShape};
