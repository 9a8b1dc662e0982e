//! Network-facing collaborators: page fetching and reverse geocoding.

pub mod geocode_cache;
pub mod geocoder;
pub mod http_client;

pub use geocode_cache::{EvictionPolicy, GeocodeCache};
pub use geocoder::{GeocodeStats, Geocoder, NominatimClient, RetryPolicy, ReverseGeocodeApi};
pub use http_client::{FetchError, HttpClient, HttpResponse, PageFetcher};
