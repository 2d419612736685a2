use crate::{
    application::convert_kml::dto::ConvertKmlRequest,
    domain::conversion::{
        converter::Converter, document::GeoJsonDocument, errors::ConversionError,
    },
};
use std::{io::Cursor, path::PathBuf, sync::Arc};
use tracing::{debug, info, instrument, warn};

/// Runs one upload through the configured [`Converter`].
///
/// The converter is blocking, so it is moved onto the tokio blocking pool.
/// The call completes only once the converter returns; there is no timeout.
pub struct ConvertKmlUseCase {
    converter: Arc<dyn Converter>,
    work_dir: PathBuf,
}

impl ConvertKmlUseCase {
    /// # Arguments
    /// * `converter` - KML to GeoJSON capability
    /// * `work_dir` - Scratch directory handed to the converter on every call
    pub fn new(converter: Arc<dyn Converter>, work_dir: PathBuf) -> Self {
        info!(work_dir = %work_dir.display(), "Initializing ConvertKmlUseCase");
        Self {
            converter,
            work_dir,
        }
    }

    /// Converts a single uploaded file.
    ///
    /// # Errors
    /// Returns the converter's [`ConversionError`] unchanged, or
    /// [`ConversionError::Worker`] if the blocking task panicked.
    #[instrument(skip(self, request), fields(
        filename = request.filename.as_deref().unwrap_or("<unnamed>"),
        size = request.content.len()
    ))]
    pub async fn execute(
        &self,
        request: ConvertKmlRequest,
    ) -> Result<GeoJsonDocument, ConversionError> {
        let converter = Arc::clone(&self.converter);
        let work_dir = self.work_dir.clone();

        let result = tokio::task::spawn_blocking(move || {
            let mut source = Cursor::new(request.content);
            converter.convert(&mut source, &work_dir)
        })
        .await
        .map_err(|e| ConversionError::Worker(e.to_string()))?;

        match &result {
            Ok(document) => debug!(features = document.len(), "Conversion complete"),
            Err(err) => warn!(error = %err, "Conversion failed"),
        }
        result
    }
}
