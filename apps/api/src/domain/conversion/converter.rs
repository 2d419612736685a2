use super::{document::GeoJsonDocument, errors::ConversionError};
use std::{io::Read, path::Path};

/// Capability that turns a KML byte stream into GeoJSON.
///
/// Implementations are blocking. `work_dir` is a scratch location the
/// implementation may write transient files into; cleaning them up is the
/// implementation's own business.
pub trait Converter: Send + Sync {
    fn convert(
        &self,
        source: &mut dyn Read,
        work_dir: &Path,
    ) -> Result<GeoJsonDocument, ConversionError>;
}
