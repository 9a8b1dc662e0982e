//! Accumulate places and failures, then render the document set.

use super::archive::kmz_bytes;
use super::error::DocumentError;
use super::kml::KmlWriter;
use crate::layers::{Icon, Layer};
use crate::place::{Failure, Place};
use serde::Serialize;
use std::collections::BTreeMap;

/// Which optional enrichments show up in the rendered markup.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct RenderOptions {
    /// Group places into layer folders and emit one document per layer.
    pub layers: bool,
    /// Attach a category icon style to every placemark.
    pub icons: bool,
}

impl Default for RenderOptions {
    fn default() -> Self {
        Self {
            layers: true,
            icons: true,
        }
    }
}

/// One rendered KML document.
#[derive(Debug, Clone, PartialEq)]
pub struct KmlDocument {
    pub kml: String,
}

impl KmlDocument {
    pub fn as_bytes(&self) -> &[u8] {
        self.kml.as_bytes()
    }

    /// The same document as a single-entry KMZ archive.
    pub fn to_kmz(&self) -> Result<Vec<u8>, DocumentError> {
        kmz_bytes(&self.kml)
    }
}

/// A document scoped to one layer.
#[derive(Debug, Clone, PartialEq)]
pub struct LayerDocument {
    pub layer: Layer,
    pub place_count: usize,
    pub document: KmlDocument,
}

/// Everything a finished run produced.
#[derive(Debug, Clone)]
pub struct DocumentOutput {
    /// All places plus the failure section.
    pub aggregate: KmlDocument,
    /// One entry per non-empty layer, in layer order. Empty when layering is off.
    pub layers: Vec<LayerDocument>,
    pub placed: usize,
    pub failures: Vec<Failure>,
}

impl DocumentOutput {
    pub fn failed(&self) -> usize {
        self.failures.len()
    }
}

/// Collects places in arrival order and partitions them by layer.
pub struct DocumentBuilder {
    options: RenderOptions,
    title: Option<String>,
    places: Vec<Place>,
    by_layer: BTreeMap<Layer, Vec<usize>>,
    failures: Vec<Failure>,
}

impl DocumentBuilder {
    pub fn new(options: RenderOptions) -> Self {
        Self {
            options,
            title: None,
            places: Vec::new(),
            by_layer: BTreeMap::new(),
            failures: Vec::new(),
        }
    }

    /// Name written on the aggregate `<Document>`.
    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    /// Add a resolved place; returns the layer it was filed under.
    pub fn ingest_place(&mut self, place: Place) -> Layer {
        let layer = Layer::classify(place.category.as_deref());
        self.by_layer
            .entry(layer)
            .or_default()
            .push(self.places.len());
        self.places.push(place);
        layer
    }

    pub fn ingest_failure(&mut self, failure: Failure) {
        self.failures.push(failure);
    }

    /// Add whichever side of a resolution outcome we got.
    pub fn ingest(&mut self, outcome: Result<Place, Failure>) {
        match outcome {
            Ok(place) => {
                self.ingest_place(place);
            }
            Err(failure) => self.ingest_failure(failure),
        }
    }

    pub fn place_count(&self) -> usize {
        self.places.len()
    }

    pub fn failure_count(&self) -> usize {
        self.failures.len()
    }

    /// Render the aggregate document and, with layering on, one per non-empty layer.
    pub fn finalize(self) -> Result<DocumentOutput, DocumentError> {
        let aggregate = KmlDocument {
            kml: self.render_aggregate()?,
        };

        let mut layers = Vec::new();
        if self.options.layers {
            for (layer, indices) in &self.by_layer {
                layers.push(LayerDocument {
                    layer: *layer,
                    place_count: indices.len(),
                    document: KmlDocument {
                        kml: self.render_layer(*layer, indices)?,
                    },
                });
            }
        }

        Ok(DocumentOutput {
            aggregate,
            layers,
            placed: self.places.len(),
            failures: self.failures,
        })
    }

    fn render_aggregate(&self) -> Result<String, DocumentError> {
        let mut w = KmlWriter::new();
        w.begin(self.title.as_deref())?;

        if self.options.layers {
            for (layer, indices) in &self.by_layer {
                w.begin_folder(layer.name(), layer.description())?;
                self.write_places(&mut w, indices)?;
                w.end_folder()?;
            }
        } else {
            for place in &self.places {
                w.placemark(place, self.icon_for(place))?;
            }
        }

        if !self.failures.is_empty() {
            w.failures(&self.failures)?;
        }
        w.finish()
    }

    fn render_layer(&self, layer: Layer, indices: &[usize]) -> Result<String, DocumentError> {
        let mut w = KmlWriter::new();
        w.begin(None)?;
        w.begin_folder(layer.name(), layer.description())?;
        self.write_places(&mut w, indices)?;
        w.end_folder()?;
        w.finish()
    }

    fn write_places(&self, w: &mut KmlWriter, indices: &[usize]) -> Result<(), DocumentError> {
        for &i in indices {
            let place = &self.places[i];
            w.placemark(place, self.icon_for(place))?;
        }
        Ok(())
    }

    fn icon_for(&self, place: &Place) -> Option<Icon> {
        self.options
            .icons
            .then(|| Icon::for_category(place.category.as_deref()))
    }
}
