//! One configurable conversion run: rows in, document set out.
//!
//! Rows are handled strictly one at a time and in input order. Each row is
//! resolved, optionally geocoded, then handed to the [`DocumentBuilder`].

use crate::acquisition::{
    EvictionPolicy, FetchError, GeocodeStats, Geocoder, HttpClient, NominatimClient, PageFetcher,
    RetryPolicy,
};
use crate::config::Settings;
use crate::document::{DocumentBuilder, DocumentError, DocumentOutput, RenderOptions};
use crate::place::{Failure, Place, RawRow};
use crate::resolution::CoordinateResolver;
use serde::Serialize;
use std::sync::Arc;
use tracing::{debug, info};

/// Optional enrichment stages. All three are on by default except geocoding.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct PipelineOptions {
    pub geocode: bool,
    pub layers: bool,
    pub icons: bool,
}

impl Default for PipelineOptions {
    fn default() -> Self {
        Self {
            geocode: false,
            layers: true,
            icons: true,
        }
    }
}

impl PipelineOptions {
    fn render(&self) -> RenderOptions {
        RenderOptions {
            layers: self.layers,
            icons: self.icons,
        }
    }
}

pub struct Pipeline {
    resolver: CoordinateResolver,
    geocoder: Option<Geocoder>,
    options: PipelineOptions,
}

impl Pipeline {
    /// Assemble a pipeline from injected capabilities.
    ///
    /// `geocoder` is only consulted when `options.geocode` is set.
    pub fn new(
        fetcher: Arc<dyn PageFetcher>,
        geocoder: Option<Geocoder>,
        options: PipelineOptions,
    ) -> Self {
        Self {
            resolver: CoordinateResolver::new(fetcher),
            geocoder: geocoder.filter(|_| options.geocode),
            options,
        }
    }

    /// Production wiring: one shared HTTP client for page fetches and geocoding.
    pub fn from_settings(settings: &Settings, options: PipelineOptions) -> Result<Self, FetchError> {
        let http = HttpClient::new(&settings.user_agent, settings.http_timeout)?;

        let geocoder = options.geocode.then(|| {
            let api = NominatimClient::new(http.clone(), settings.geocode_url.clone());
            Geocoder::new(
                Box::new(api),
                EvictionPolicy::from_capacity(settings.cache_capacity),
                RetryPolicy {
                    max_attempts: settings.geocode_attempts,
                    base_delay: settings.backoff_base,
                },
            )
        });

        Ok(Self::new(Arc::new(http), geocoder, options))
    }

    /// Resolve one row and, when enabled, attach its reverse-geocoded address.
    pub async fn process_row(&mut self, row: &RawRow) -> Result<Place, Failure> {
        let mut place = self.resolver.resolve(row).await?;

        if let Some(geocoder) = self.geocoder.as_mut() {
            place.address = geocoder.reverse_geocode(place.point()).await;
        }

        Ok(place)
    }

    /// Convert a whole batch of rows into a document set.
    pub async fn convert(
        &mut self,
        rows: &[RawRow],
        title: Option<&str>,
    ) -> Result<DocumentOutput, DocumentError> {
        self.convert_with_progress(rows, title, |_| {}).await
    }

    /// Like [`convert`](Self::convert), calling `on_row` after each row with
    /// the number of rows done so far.
    pub async fn convert_with_progress<F>(
        &mut self,
        rows: &[RawRow],
        title: Option<&str>,
        mut on_row: F,
    ) -> Result<DocumentOutput, DocumentError>
    where
        F: FnMut(usize),
    {
        let mut builder = DocumentBuilder::new(self.options.render());
        if let Some(title) = title {
            builder = builder.with_title(title);
        }

        for (i, row) in rows.iter().enumerate() {
            let outcome = self.process_row(row).await;
            if let Ok(place) = &outcome {
                debug!("row {}: {} at {}", i + 1, place.name, place.point().kml_coordinates());
            }
            builder.ingest(outcome);
            on_row(i + 1);
        }

        info!(
            "converted {} rows: {} places, {} failed",
            rows.len(),
            builder.place_count(),
            builder.failure_count()
        );
        builder.finalize()
    }

    /// Geocoder counters, if geocoding is enabled.
    pub fn geocode_stats(&self) -> Option<GeocodeStats> {
        self.geocoder.as_ref().map(Geocoder::stats)
    }
}
