use geojson::{Feature, FeatureCollection};
use serde::Serialize;

/// GeoJSON produced from a single upload.
///
/// Serializes exactly as the wrapped `FeatureCollection`, so it can be returned
/// as a response body untouched.
#[derive(Debug, Clone, Serialize)]
#[serde(transparent)]
pub struct GeoJsonDocument(FeatureCollection);

impl GeoJsonDocument {
    pub fn new(collection: FeatureCollection) -> Self {
        Self(collection)
    }

    pub fn features(&self) -> &[Feature] {
        &self.0.features
    }

    pub fn len(&self) -> usize {
        self.0.features.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.features.is_empty()
    }
}
